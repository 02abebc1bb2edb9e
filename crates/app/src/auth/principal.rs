//! Authenticated callers and what they may do.

use thiserror::Error;

use crate::domain::users::records::{Role, UserUuid};

/// Administrative abilities gated behind a role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Capability {
    ManageCatalog,
    ManageOrders,
    ManageUsers,
}

impl Role {
    #[must_use]
    pub const fn grants(self, capability: Capability) -> bool {
        match capability {
            Capability::ManageCatalog | Capability::ManageOrders | Capability::ManageUsers => {
                matches!(self, Self::Admin)
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("missing capability {0:?}")]
pub struct Forbidden(pub Capability);

/// The user a request acts for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Principal {
    pub user_uuid: UserUuid,
    pub role: Role,
}

impl Principal {
    /// # Errors
    ///
    /// Returns [`Forbidden`] when the principal's role does not grant `capability`.
    pub const fn require(&self, capability: Capability) -> Result<(), Forbidden> {
        if self.role.grants(capability) {
            Ok(())
        } else {
            Err(Forbidden(capability))
        }
    }
}
