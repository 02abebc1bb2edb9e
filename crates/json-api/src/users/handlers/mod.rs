//! User Handlers

pub(crate) mod index;
pub(crate) mod profile;
pub(crate) mod role;
