//! User Models

use salvo::oapi::ToSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use campus_app::domain::users::{data::ProfileUpdate, records::UserRecord};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct UserResponse {
    pub uuid: Uuid,
    pub email: String,
    pub name: String,

    /// `student` or `admin`
    pub role: String,

    pub phone: Option<String>,
    pub avatar_url: Option<String>,

    /// The date and time the account was created
    pub created_at: String,

    /// The date and time the account was last changed
    pub updated_at: String,
}

impl From<UserRecord> for UserResponse {
    fn from(user: UserRecord) -> Self {
        Self {
            uuid: user.uuid.into_uuid(),
            email: user.email,
            name: user.name,
            role: user.role.to_string(),
            phone: user.phone,
            avatar_url: user.avatar_url,
            created_at: user.created_at.to_string(),
            updated_at: user.updated_at.to_string(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct UsersResponse {
    pub users: Vec<UserResponse>,
}

impl From<Vec<UserRecord>> for UsersResponse {
    fn from(users: Vec<UserRecord>) -> Self {
        Self {
            users: users.into_iter().map(UserResponse::from).collect(),
        }
    }
}

/// Profile Update Request
///
/// Email and role are not editable here.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct ProfileRequest {
    pub name: String,
    pub phone: Option<String>,
    pub avatar_url: Option<String>,
}

impl From<ProfileRequest> for ProfileUpdate {
    fn from(request: ProfileRequest) -> Self {
        Self {
            name: request.name,
            phone: request.phone.filter(|phone| !phone.trim().is_empty()),
            avatar_url: request.avatar_url.filter(|url| !url.trim().is_empty()),
        }
    }
}

/// Role Change Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct RoleRequest {
    /// `student` or `admin`
    pub role: String,
}
