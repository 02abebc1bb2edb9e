//! Wishlists

pub mod errors;
mod repository;
pub mod service;

pub use errors::WishlistsServiceError;
pub use service::*;
