use utoipa::{IntoParams, OpenApi, ToSchema};

#[derive(ToSchema)]
pub struct HealthDoc {
    #[schema(example = "ok")]
    pub status: String,
    /// RFC 3339 timestamp
    pub timestamp: String,
}

/// Stored resource as returned by the API.
#[derive(ToSchema)]
#[allow(non_snake_case)]
pub struct ResourceDoc {
    /// Server-generated UUID
    pub id: String,
    #[schema(example = "Component library")]
    pub name: String,
    #[schema(example = "UI kit for the dashboard")]
    pub description: String,
    /// Lowercase, unique tags
    pub tags: Vec<String>,
    /// RFC 3339 creation timestamp
    pub createdAt: String,
    /// RFC 3339 last update timestamp
    pub updatedAt: String,
    /// Incremented on every update, starts at 1
    #[schema(minimum = 1)]
    pub version: u64,
}

#[derive(ToSchema)]
pub struct ResourceSingleDoc {
    pub data: ResourceDoc,
}

#[derive(ToSchema)]
pub struct ResourceListDoc {
    pub data: Vec<ResourceDoc>,
}

#[derive(ToSchema)]
pub struct ResourceCreateDoc {
    /// Required, non-empty
    pub name: String,
    pub description: Option<String>,
    /// Trimmed, lowercased and deduplicated on write
    pub tags: Option<Vec<String>>,
}

/// At least one field must be supplied.
#[derive(ToSchema)]
pub struct ResourceUpdateDoc {
    pub name: Option<String>,
    pub description: Option<String>,
    /// Replaces the full tag set
    pub tags: Option<Vec<String>>,
}

#[derive(ToSchema)]
pub struct ErrorDoc {
    pub error: String,
}

#[derive(IntoParams)]
#[into_params(parameter_in = Query)]
#[allow(non_snake_case)]
pub struct ListQueryDoc {
    /// Case-insensitive substring match against name and description
    pub search: Option<String>,
    /// Exact tag membership (compared lowercase)
    pub tag: Option<String>,
    /// Keep resources whose `updatedAt` is at or after this ISO-8601 timestamp
    pub updatedAfter: Option<String>,
}

#[derive(OpenApi)]
#[openapi(
    info(title = "Resource Registry API", description = "CRUD API for resource records. Responses use a `{ \"data\": ... }` envelope, errors `{ \"error\": ... }`."),
    paths(
        crate::routes::health,
        crate::routes::resources::list,
        crate::routes::resources::create,
        crate::routes::resources::get,
        crate::routes::resources::update,
        crate::routes::resources::delete,
    ),
    components(
        schemas(
            HealthDoc,
            ResourceDoc,
            ResourceSingleDoc,
            ResourceListDoc,
            ResourceCreateDoc,
            ResourceUpdateDoc,
            ErrorDoc,
        )
    ),
    tags(
        (name = "health"),
        (name = "resources")
    )
)]
pub struct ApiDoc;
