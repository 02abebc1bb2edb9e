//! App Context

use std::sync::Arc;

use crate::{
    auth::{AuthService, PgAuthService},
    database::Db,
    domain::{
        carts::{CartsService, PgCartsService},
        categories::{CategoriesService, PgCategoriesService},
        orders::{OrdersService, PgOrdersService, data::CheckoutPolicy},
        products::{PgProductsService, ProductsService},
        users::{PgUsersService, UsersService},
        wishlists::{PgWishlistsService, WishlistsService},
    },
};

/// Every service the HTTP layer talks to, sharing one storage handle.
#[derive(Clone)]
pub struct AppContext {
    pub users: Arc<dyn UsersService>,
    pub categories: Arc<dyn CategoriesService>,
    pub products: Arc<dyn ProductsService>,
    pub carts: Arc<dyn CartsService>,
    pub orders: Arc<dyn OrdersService>,
    pub wishlists: Arc<dyn WishlistsService>,
    pub auth: Arc<dyn AuthService>,
}

impl AppContext {
    #[must_use]
    pub fn new(db: &Db, checkout: CheckoutPolicy) -> Self {
        Self {
            users: Arc::new(PgUsersService::new(db.clone())),
            categories: Arc::new(PgCategoriesService::new(db.clone())),
            products: Arc::new(PgProductsService::new(db.clone())),
            carts: Arc::new(PgCartsService::new(db.clone())),
            orders: Arc::new(PgOrdersService::new(db.clone(), checkout)),
            wishlists: Arc::new(PgWishlistsService::new(db.clone())),
            auth: Arc::new(PgAuthService::new(db.pool().clone())),
        }
    }
}
