//! State

use std::sync::Arc;

use campus_app::context::AppContext;

/// Shared handler state, injected once at the root of the router.
#[derive(Clone)]
pub(crate) struct State {
    pub(crate) app: AppContext,
}

impl std::fmt::Debug for State {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("State").finish_non_exhaustive()
    }
}

impl State {
    #[must_use]
    pub(crate) fn new(app: AppContext) -> Self {
        Self { app }
    }

    #[must_use]
    pub(crate) fn from_app_context(app: AppContext) -> Arc<Self> {
        Arc::new(Self::new(app))
    }
}
