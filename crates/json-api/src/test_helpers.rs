//! Test helpers.

use std::sync::Arc;

use jiff::Timestamp;
use salvo::{affix_state::inject, prelude::*};
use uuid::Uuid;

use campus_app::{
    auth::{MockAuthService, Principal},
    context::AppContext,
    domain::{
        carts::MockCartsService,
        categories::MockCategoriesService,
        orders::MockOrdersService,
        products::{
            MockProductsService,
            records::{ProductRecord, ProductUuid, ProductVariant},
        },
        users::{
            MockUsersService,
            records::{Role, UserUuid},
        },
        wishlists::MockWishlistsService,
    },
};

use crate::{extensions::*, state::State};

pub(crate) const TEST_USER_UUID: UserUuid = UserUuid::from_uuid(Uuid::nil());

pub(crate) const TEST_ADMIN_UUID: UserUuid = UserUuid::from_uuid(Uuid::from_u128(1));

/// One mock per service; any call without a matching expectation fails the test.
#[derive(Default)]
pub(crate) struct Mocks {
    pub(crate) users: MockUsersService,
    pub(crate) categories: MockCategoriesService,
    pub(crate) products: MockProductsService,
    pub(crate) carts: MockCartsService,
    pub(crate) orders: MockOrdersService,
    pub(crate) wishlists: MockWishlistsService,
    pub(crate) auth: MockAuthService,
}

impl Mocks {
    pub(crate) fn into_state(self) -> Arc<State> {
        State::from_app_context(AppContext {
            users: Arc::new(self.users),
            categories: Arc::new(self.categories),
            products: Arc::new(self.products),
            carts: Arc::new(self.carts),
            orders: Arc::new(self.orders),
            wishlists: Arc::new(self.wishlists),
            auth: Arc::new(self.auth),
        })
    }
}

#[salvo::handler]
pub(crate) async fn as_student(
    req: &mut Request,
    depot: &mut Depot,
    res: &mut Response,
    ctrl: &mut FlowCtrl,
) {
    depot.insert_principal(Principal {
        user_uuid: TEST_USER_UUID,
        role: Role::Student,
    });

    ctrl.call_next(req, depot, res).await;
}

#[salvo::handler]
pub(crate) async fn as_admin(
    req: &mut Request,
    depot: &mut Depot,
    res: &mut Response,
    ctrl: &mut FlowCtrl,
) {
    depot.insert_principal(Principal {
        user_uuid: TEST_ADMIN_UUID,
        role: Role::Admin,
    });

    ctrl.call_next(req, depot, res).await;
}

/// Serve `route` to an authenticated student.
pub(crate) fn student_service(mocks: Mocks, route: Router) -> Service {
    Service::new(
        Router::new()
            .hoop(inject(mocks.into_state()))
            .hoop(as_student)
            .push(route),
    )
}

/// Serve `route` to an authenticated admin.
pub(crate) fn admin_service(mocks: Mocks, route: Router) -> Service {
    Service::new(
        Router::new()
            .hoop(inject(mocks.into_state()))
            .hoop(as_admin)
            .push(route),
    )
}

/// Serve `route` without any principal, as public endpoints are.
pub(crate) fn public_service(mocks: Mocks, route: Router) -> Service {
    Service::new(Router::new().hoop(inject(mocks.into_state())).push(route))
}

pub(crate) fn make_product(uuid: ProductUuid) -> ProductRecord {
    ProductRecord {
        uuid,
        category_uuid: None,
        name: "Campus Hoodie".to_string(),
        description: Some("Heavyweight fleece".to_string()),
        price: 2_500,
        quantity: 12,
        active: true,
        image_url: None,
        variants: vec![ProductVariant {
            name: "size".to_string(),
            value: "XL".to_string(),
            price: 200,
        }],
        created_at: Timestamp::UNIX_EPOCH,
        updated_at: Timestamp::UNIX_EPOCH,
        deleted_at: None,
    }
}
