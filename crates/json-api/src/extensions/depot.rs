//! Depot helper extensions.

use std::{any::Any, sync::Arc};

use campus_app::auth::Principal;
use salvo::prelude::Depot;

use crate::{errors::ApiError, state::State};

/// Typed access to what the middleware stack leaves in the depot.
pub(crate) trait DepotExt {
    fn obtain_or_500<T: Any + Send + Sync>(&self) -> Result<&T, ApiError>;

    fn state_or_500(&self) -> Result<&Arc<State>, ApiError> {
        self.obtain_or_500::<Arc<State>>()
    }

    fn insert_principal(&mut self, principal: Principal);

    fn principal_or_401(&self) -> Result<Principal, ApiError>;
}

impl DepotExt for Depot {
    fn obtain_or_500<T: Any + Send + Sync>(&self) -> Result<&T, ApiError> {
        self.obtain::<T>()
            .map_err(|_ignored| ApiError::internal())
    }

    fn insert_principal(&mut self, principal: Principal) {
        self.inject(principal);
    }

    fn principal_or_401(&self) -> Result<Principal, ApiError> {
        self.obtain::<Principal>()
            .copied()
            .map_err(|_ignored| ApiError::unauthenticated())
    }
}
