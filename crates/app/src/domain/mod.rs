//! Campus Store Domain Concerns

pub mod carts;
pub mod categories;
pub mod orders;
pub mod products;
pub mod users;
pub mod wishlists;
