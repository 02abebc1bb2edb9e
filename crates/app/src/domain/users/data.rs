//! User Data

use crate::domain::users::records::Role;

/// New User Data
#[derive(Debug, Clone, PartialEq)]
pub struct NewUser {
    pub email: String,
    pub name: String,
    pub role: Role,
}

impl NewUser {
    pub(crate) fn problems(&self) -> Vec<String> {
        let mut problems = Vec::new();

        let email = self.email.trim();

        if email.is_empty() {
            problems.push("email is required".to_string());
        } else if !email.contains('@') {
            problems.push("email must contain '@'".to_string());
        }

        if self.name.trim().is_empty() {
            problems.push("name is required".to_string());
        }

        problems
    }
}

/// Profile fields a user may edit on their own account.
#[derive(Debug, Clone, PartialEq)]
pub struct ProfileUpdate {
    pub name: String,
    pub phone: Option<String>,
    pub avatar_url: Option<String>,
}

impl ProfileUpdate {
    pub(crate) fn problems(&self) -> Vec<String> {
        if self.name.trim().is_empty() {
            vec!["name is required".to_string()]
        } else {
            Vec::new()
        }
    }
}
