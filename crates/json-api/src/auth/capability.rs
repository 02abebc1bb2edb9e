//! Capability gate for administrative routes.

use campus_app::auth::Capability;
use salvo::prelude::*;

use crate::{errors::ApiError, extensions::*};

/// Rejects callers whose role does not grant the wrapped capability.
#[derive(Debug, Clone, Copy)]
pub(crate) struct RequireCapability(pub(crate) Capability);

#[handler]
impl RequireCapability {
    async fn handle(
        &self,
        req: &mut Request,
        depot: &mut Depot,
        res: &mut Response,
        ctrl: &mut FlowCtrl,
    ) {
        let allowed = depot
            .principal_or_401()
            .and_then(|principal| principal.require(self.0).map_err(ApiError::from));

        if let Err(error) = allowed {
            res.render(error);
            ctrl.skip_rest();

            return;
        }

        ctrl.call_next(req, depot, res).await;
    }
}

#[cfg(test)]
mod tests {
    use salvo::test::TestClient;
    use testresult::TestResult;

    use crate::test_helpers::{as_admin, as_student};

    use super::*;

    #[handler]
    async fn ok() -> &'static str {
        "ok"
    }

    fn gated(principal: impl Handler) -> Service {
        Service::new(
            Router::new()
                .hoop(principal)
                .hoop(RequireCapability(Capability::ManageOrders))
                .get(ok),
        )
    }

    #[tokio::test]
    async fn students_are_forbidden() -> TestResult {
        let res = TestClient::get("http://example.com")
            .send(&gated(as_student))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::FORBIDDEN));

        Ok(())
    }

    #[tokio::test]
    async fn admins_pass_through() -> TestResult {
        let res = TestClient::get("http://example.com")
            .send(&gated(as_admin))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::OK));

        Ok(())
    }

    #[tokio::test]
    async fn missing_principal_is_unauthenticated() -> TestResult {
        let res = TestClient::get("http://example.com")
            .send(&Service::new(
                Router::new()
                    .hoop(RequireCapability(Capability::ManageCatalog))
                    .get(ok),
            ))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::UNAUTHORIZED));

        Ok(())
    }
}
