//! Category Models

use salvo::oapi::ToSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use campus_app::domain::categories::{data::CategoryDetails, records::CategoryRecord};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct CategoryResponse {
    pub uuid: Uuid,
    pub name: String,

    /// URL-safe identifier, unique across live categories
    pub slug: String,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<CategoryRecord> for CategoryResponse {
    fn from(category: CategoryRecord) -> Self {
        Self {
            uuid: category.uuid.into_uuid(),
            name: category.name,
            slug: category.slug,
            description: category.description,
            image_url: category.image_url,
            created_at: category.created_at.to_string(),
            updated_at: category.updated_at.to_string(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct CategoriesResponse {
    pub categories: Vec<CategoryResponse>,
}

/// Category fields accepted on create and on full update
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct CategoryRequest {
    pub name: String,

    /// Lowercase letters, digits and single hyphens
    pub slug: String,

    #[serde(default)]
    pub description: Option<String>,

    #[serde(default)]
    pub image_url: Option<String>,
}

impl From<CategoryRequest> for CategoryDetails {
    fn from(request: CategoryRequest) -> Self {
        Self {
            name: request.name,
            slug: request.slug,
            description: request.description,
            image_url: request.image_url,
        }
    }
}
