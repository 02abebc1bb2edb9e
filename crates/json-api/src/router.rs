//! App Router

use salvo::Router;

use campus_app::auth::Capability;

use crate::{
    auth::{RequireCapability, middleware},
    carts, categories, orders, products, users, wishlist,
};

/// Catalog reads anyone may make.
fn public_router() -> Router {
    Router::new()
        .push(Router::with_path("categories").get(categories::index::handler))
        .push(
            Router::with_path("categories/{category}").get(categories::get::handler),
        )
        .push(Router::with_path("products").get(products::index::handler))
        .push(Router::with_path("products/{product}").get(products::get::handler))
}

/// Routes acting on the caller's own cart, orders, profile and wishlist.
fn shopper_router() -> Router {
    Router::new()
        .push(
            Router::with_path("cart")
                .get(carts::get::handler)
                .delete(carts::clear::handler)
                .push(Router::with_path("validate").post(carts::validate::handler))
                .push(
                    Router::with_path("items")
                        .post(carts::items::create::handler)
                        .push(
                            Router::with_path("{item}")
                                .put(carts::items::update::handler)
                                .delete(carts::items::delete::handler),
                        ),
                ),
        )
        .push(
            Router::with_path("orders")
                .get(orders::index::handler)
                .post(orders::create::handler)
                .push(Router::with_path("{order}").get(orders::get::handler)),
        )
        .push(
            Router::with_path("profile")
                .get(users::profile::handler)
                .put(users::profile::update_handler),
        )
        .push(
            Router::with_path("wishlist")
                .get(wishlist::index::handler)
                .push(
                    Router::with_path("{product}")
                        .put(wishlist::add::handler)
                        .delete(wishlist::remove::handler),
                ),
        )
}

fn admin_router() -> Router {
    Router::with_path("admin")
        .push(
            Router::with_path("orders")
                .hoop(RequireCapability(Capability::ManageOrders))
                .get(orders::index::admin_handler)
                .push(
                    Router::with_path("{order}")
                        .get(orders::get::admin_handler)
                        .push(Router::with_path("status").patch(orders::status::handler)),
                ),
        )
        .push(
            Router::with_path("products")
                .hoop(RequireCapability(Capability::ManageCatalog))
                .get(products::index::admin_handler)
                .post(products::create::handler)
                .push(
                    Router::with_path("{product}")
                        .put(products::update::handler)
                        .delete(products::delete::handler),
                ),
        )
        .push(
            Router::with_path("categories")
                .hoop(RequireCapability(Capability::ManageCatalog))
                .post(categories::create::handler)
                .push(
                    Router::with_path("{category}")
                        .put(categories::update::handler)
                        .delete(categories::delete::handler),
                ),
        )
        .push(
            Router::with_path("users")
                .hoop(RequireCapability(Capability::ManageUsers))
                .get(users::index::handler)
                .push(Router::with_path("{user}/role").put(users::role::handler)),
        )
}

pub(crate) fn app_router() -> Router {
    Router::new().push(public_router()).push(
        Router::new()
            .hoop(middleware::handler)
            .push(shopper_router())
            .push(admin_router()),
    )
}
