//! Bearer authentication and role gating

mod capability;
pub(crate) mod middleware;

pub(crate) use capability::RequireCapability;
