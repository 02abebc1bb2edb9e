//! API error responses.

use salvo::{
    http::StatusCode,
    oapi::{self, Components, EndpointOutRegister, Operation, ToSchema},
    prelude::{Json, Response},
    writing::Scribe,
};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use tracing::error;

use campus_app::{
    auth::{AuthServiceError, Forbidden},
    domain::{
        carts::CartsServiceError, categories::CategoriesServiceError,
        orders::OrdersServiceError, products::ProductsServiceError, users::UsersServiceError,
        wishlists::WishlistsServiceError,
    },
};

/// Error envelope returned by every failing endpoint.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct ErrorResponse {
    /// Error details
    pub error: ErrorBody,
}

/// Error details.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct ErrorBody {
    /// Stable machine-readable error code
    pub code: String,

    /// Human-readable summary
    pub message: String,

    /// Individual problems, when there is more than one thing wrong
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub reasons: Vec<String>,
}

/// A failed request, rendered as an [`ErrorResponse`].
#[derive(Debug)]
pub(crate) struct ApiError {
    status: StatusCode,
    code: &'static str,
    message: String,
    reasons: SmallVec<[String; 2]>,
}

impl ApiError {
    fn new(status: StatusCode, code: &'static str, message: impl Into<String>) -> Self {
        Self {
            status,
            code,
            message: message.into(),
            reasons: SmallVec::new(),
        }
    }

    #[must_use]
    fn with_reasons(mut self, reasons: Vec<String>) -> Self {
        self.reasons = SmallVec::from_vec(reasons);
        self
    }

    pub(crate) fn unauthenticated() -> Self {
        Self::new(
            StatusCode::UNAUTHORIZED,
            "unauthenticated",
            "missing or invalid bearer token",
        )
    }

    pub(crate) fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, "not_found", message)
    }

    pub(crate) fn validation_failed(reasons: Vec<String>) -> Self {
        Self::new(
            StatusCode::UNPROCESSABLE_ENTITY,
            "validation_failed",
            "request failed validation",
        )
        .with_reasons(reasons)
    }

    pub(crate) fn already_exists(message: impl Into<String>) -> Self {
        Self::new(StatusCode::CONFLICT, "already_exists", message)
    }

    pub(crate) fn product_unavailable(message: impl Into<String>) -> Self {
        Self::new(StatusCode::CONFLICT, "product_unavailable", message)
    }

    pub(crate) fn insufficient_stock(message: impl Into<String>) -> Self {
        Self::new(StatusCode::CONFLICT, "insufficient_stock", message)
    }

    pub(crate) fn internal() -> Self {
        Self::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            "internal_error",
            "internal server error",
        )
    }

    fn storage_timeout(source: &dyn std::error::Error) -> Self {
        error!("storage timed out: {source}");

        Self::new(
            StatusCode::SERVICE_UNAVAILABLE,
            "storage_timeout",
            "storage did not respond in time",
        )
    }

    fn storage_unavailable(source: &dyn std::error::Error) -> Self {
        error!("storage unavailable: {source}");

        Self::new(
            StatusCode::SERVICE_UNAVAILABLE,
            "storage_unavailable",
            "storage is unavailable",
        )
    }

    fn storage(source: &dyn std::error::Error) -> Self {
        error!("storage error: {source}");

        Self::internal()
    }

    pub(crate) fn status(&self) -> StatusCode {
        self.status
    }

    pub(crate) fn code(&self) -> &'static str {
        self.code
    }

    fn into_response(self) -> ErrorResponse {
        ErrorResponse {
            error: ErrorBody {
                code: self.code.to_string(),
                message: self.message,
                reasons: self.reasons.into_vec(),
            },
        }
    }
}

impl Scribe for ApiError {
    fn render(self, res: &mut Response) {
        res.status_code(self.status);
        res.render(Json(self.into_response()));
    }
}

impl EndpointOutRegister for ApiError {
    fn register(components: &mut Components, operation: &mut Operation) {
        for (status, description) in [
            (StatusCode::UNAUTHORIZED, "Unauthenticated"),
            (StatusCode::FORBIDDEN, "Forbidden"),
            (StatusCode::NOT_FOUND, "Not found"),
            (StatusCode::CONFLICT, "Conflict"),
            (StatusCode::UNPROCESSABLE_ENTITY, "Validation failed"),
            (StatusCode::SERVICE_UNAVAILABLE, "Storage unavailable"),
            (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error"),
        ] {
            operation.responses.insert(
                status.as_str(),
                oapi::Response::new(description)
                    .add_content("application/json", ErrorResponse::to_schema(components)),
            );
        }
    }
}

impl From<Forbidden> for ApiError {
    fn from(forbidden: Forbidden) -> Self {
        Self::new(StatusCode::FORBIDDEN, "forbidden", forbidden.to_string())
    }
}

impl From<AuthServiceError> for ApiError {
    fn from(error: AuthServiceError) -> Self {
        match error {
            AuthServiceError::Unauthenticated | AuthServiceError::UserNotFound => {
                Self::unauthenticated()
            }
            AuthServiceError::Token(source) => {
                error!("failed to process api token: {source}");

                Self::internal()
            }
            AuthServiceError::Constraint => {
                error!("api token violates a storage constraint");

                Self::internal()
            }
            AuthServiceError::StorageTimeout(source) => Self::storage_timeout(&source),
            AuthServiceError::StorageUnavailable(source) => Self::storage_unavailable(&source),
            AuthServiceError::Sql(source) => Self::storage(&source),
        }
    }
}

impl From<CartsServiceError> for ApiError {
    fn from(error: CartsServiceError) -> Self {
        match error {
            CartsServiceError::NotFound => Self::not_found("cart item not found"),
            CartsServiceError::ProductNotFound => Self::not_found("product not found"),
            CartsServiceError::Unavailable(product) => {
                Self::product_unavailable(format!("product {product} is not available"))
            }
            error @ CartsServiceError::InsufficientStock { .. } => {
                Self::insufficient_stock(error.to_string())
            }
            CartsServiceError::ValidationFailed(reasons) => Self::validation_failed(reasons),
            CartsServiceError::StorageTimeout(source) => Self::storage_timeout(&source),
            CartsServiceError::StorageUnavailable(source) => Self::storage_unavailable(&source),
            CartsServiceError::Sql(source) => Self::storage(&source),
        }
    }
}

impl From<CategoriesServiceError> for ApiError {
    fn from(error: CategoriesServiceError) -> Self {
        match error {
            CategoriesServiceError::AlreadyExists => {
                Self::already_exists("category slug already in use")
            }
            CategoriesServiceError::NotFound => Self::not_found("category not found"),
            CategoriesServiceError::InvalidData(reasons) => Self::validation_failed(reasons),
            CategoriesServiceError::StorageTimeout(source) => Self::storage_timeout(&source),
            CategoriesServiceError::StorageUnavailable(source) => {
                Self::storage_unavailable(&source)
            }
            CategoriesServiceError::Sql(source) => Self::storage(&source),
        }
    }
}

impl From<OrdersServiceError> for ApiError {
    fn from(error: OrdersServiceError) -> Self {
        match error {
            OrdersServiceError::NotFound => Self::not_found("order not found"),
            OrdersServiceError::ValidationFailed(reasons) => Self::validation_failed(reasons),
            OrdersServiceError::ProductUnavailable(product) => {
                Self::product_unavailable(format!("product {product} is not available"))
            }
            error @ OrdersServiceError::InsufficientStock { .. } => {
                Self::insufficient_stock(error.to_string())
            }
            error @ OrdersServiceError::OrderNumberExhausted { .. } => {
                error!("{error}");

                Self::new(
                    StatusCode::SERVICE_UNAVAILABLE,
                    "order_number_exhausted",
                    "could not allocate an order number, please retry",
                )
            }
            OrdersServiceError::StorageTimeout(source) => Self::storage_timeout(&source),
            OrdersServiceError::StorageUnavailable(source) => Self::storage_unavailable(&source),
            OrdersServiceError::Sql(source) => Self::storage(&source),
        }
    }
}

impl From<ProductsServiceError> for ApiError {
    fn from(error: ProductsServiceError) -> Self {
        match error {
            ProductsServiceError::AlreadyExists => Self::already_exists("product already exists"),
            ProductsServiceError::NotFound => Self::not_found("product not found"),
            ProductsServiceError::InvalidReference => {
                Self::validation_failed(vec!["category does not exist".to_string()])
            }
            ProductsServiceError::InvalidData(reasons) => Self::validation_failed(reasons),
            error @ ProductsServiceError::InsufficientStock { .. } => {
                Self::insufficient_stock(error.to_string())
            }
            ProductsServiceError::StorageTimeout(source) => Self::storage_timeout(&source),
            ProductsServiceError::StorageUnavailable(source) => Self::storage_unavailable(&source),
            ProductsServiceError::Sql(source) => Self::storage(&source),
        }
    }
}

impl From<UsersServiceError> for ApiError {
    fn from(error: UsersServiceError) -> Self {
        match error {
            UsersServiceError::AlreadyExists => Self::already_exists("user already exists"),
            UsersServiceError::NotFound => Self::not_found("user not found"),
            UsersServiceError::InvalidData(reasons) => Self::validation_failed(reasons),
            UsersServiceError::StorageTimeout(source) => Self::storage_timeout(&source),
            UsersServiceError::StorageUnavailable(source) => Self::storage_unavailable(&source),
            UsersServiceError::Sql(source) => Self::storage(&source),
        }
    }
}

impl From<WishlistsServiceError> for ApiError {
    fn from(error: WishlistsServiceError) -> Self {
        match error {
            WishlistsServiceError::ProductNotFound => Self::not_found("product not found"),
            WishlistsServiceError::Constraint => {
                error!("wishlist entry violates a storage constraint");

                Self::internal()
            }
            WishlistsServiceError::StorageTimeout(source) => Self::storage_timeout(&source),
            WishlistsServiceError::StorageUnavailable(source) => {
                Self::storage_unavailable(&source)
            }
            WishlistsServiceError::Sql(source) => Self::storage(&source),
        }
    }
}

#[cfg(test)]
mod tests {
    use campus_app::{auth::Capability, domain::products::records::ProductUuid};
    use salvo::{
        prelude::*,
        test::{ResponseExt, TestClient},
    };
    use testresult::TestResult;

    use super::*;

    #[handler]
    async fn fails_validation() -> Result<&'static str, ApiError> {
        Err(ApiError::validation_failed(vec![
            "shipping_address.city is required".to_string(),
            "unknown payment method: cheque".to_string(),
        ]))
    }

    #[handler]
    async fn fails_in_storage() -> Result<&'static str, ApiError> {
        Err(OrdersServiceError::Sql(sqlx_error()).into())
    }

    fn sqlx_error() -> sqlx::Error {
        sqlx::Error::Protocol("connection string contains secret=hunter2".to_string())
    }

    #[tokio::test]
    async fn validation_errors_list_every_reason() -> TestResult {
        let service = Service::new(Router::new().get(fails_validation));

        let mut res = TestClient::get("http://example.com").send(&service).await;
        let body: ErrorResponse = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::UNPROCESSABLE_ENTITY));
        assert_eq!(body.error.code, "validation_failed");
        assert_eq!(body.error.reasons.len(), 2);

        Ok(())
    }

    #[tokio::test]
    async fn storage_errors_do_not_leak_their_text() -> TestResult {
        let service = Service::new(Router::new().get(fails_in_storage));

        let mut res = TestClient::get("http://example.com").send(&service).await;
        let body = res.take_string().await?;

        assert_eq!(res.status_code, Some(StatusCode::INTERNAL_SERVER_ERROR));
        assert!(body.contains("internal_error"), "unexpected body {body}");
        assert!(!body.contains("hunter2"), "storage text leaked: {body}");

        Ok(())
    }

    #[test]
    fn checkout_failures_map_to_stable_codes() {
        let product = ProductUuid::new();

        let cases: [(ApiError, StatusCode, &str); 5] = [
            (
                OrdersServiceError::ProductUnavailable(product).into(),
                StatusCode::CONFLICT,
                "product_unavailable",
            ),
            (
                OrdersServiceError::InsufficientStock {
                    product,
                    requested: 2,
                    available: 1,
                }
                .into(),
                StatusCode::CONFLICT,
                "insufficient_stock",
            ),
            (
                OrdersServiceError::OrderNumberExhausted { attempts: 10 }.into(),
                StatusCode::SERVICE_UNAVAILABLE,
                "order_number_exhausted",
            ),
            (
                OrdersServiceError::StorageTimeout(sqlx::Error::PoolTimedOut).into(),
                StatusCode::SERVICE_UNAVAILABLE,
                "storage_timeout",
            ),
            (
                Forbidden(Capability::ManageOrders).into(),
                StatusCode::FORBIDDEN,
                "forbidden",
            ),
        ];

        for (error, status, code) in cases {
            assert_eq!(error.status(), status, "status for {code}");
            assert_eq!(error.code(), code, "code for {code}");
        }
    }

    #[test]
    fn unknown_tokens_and_users_are_both_unauthenticated() {
        let unknown_token: ApiError = AuthServiceError::Unauthenticated.into();
        let unknown_user: ApiError = AuthServiceError::UserNotFound.into();

        assert_eq!(unknown_token.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(unknown_user.code(), "unauthenticated");
    }
}
