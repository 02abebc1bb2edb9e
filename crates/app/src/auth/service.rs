//! Auth service.

use async_trait::async_trait;
use jiff::Timestamp;
use mockall::automock;
use sqlx::PgPool;
use tracing::{Span, warn};
use uuid::Uuid;

use crate::{
    auth::{
        ApiTokenMetadata, ApiTokenVersion, AuthServiceError, IssuedApiToken, Principal,
        build_verifier_input, format_api_token, generate_api_token_secret, hash_verifier_input,
        models::NewApiToken, parse_api_token, repository::PgAuthRepository, verify_token_hash,
    },
    domain::users::records::UserUuid,
};

#[derive(Debug, Clone)]
pub struct PgAuthService {
    repository: PgAuthRepository,
}

impl PgAuthService {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self {
            repository: PgAuthRepository::new(pool),
        }
    }
}

#[async_trait]
impl AuthService for PgAuthService {
    async fn authenticate_bearer(&self, bearer_token: &str) -> Result<Principal, AuthServiceError> {
        let parsed_token =
            parse_api_token(bearer_token).map_err(|_| AuthServiceError::Unauthenticated)?;

        let token = self
            .repository
            .find_active_api_token(parsed_token.token_uuid, parsed_token.version)
            .await?
            .ok_or(AuthServiceError::Unauthenticated)?;

        let verifier_input = build_verifier_input(
            &parsed_token.token_uuid,
            parsed_token.version,
            &token.user_uuid,
            &parsed_token.secret,
        );

        if !verify_token_hash(&verifier_input, &token.token_hash) {
            return Err(AuthServiceError::Unauthenticated);
        }

        if let Err(error) = self
            .repository
            .touch_api_token_last_used(parsed_token.token_uuid)
            .await
        {
            warn!(%error, token_uuid = %parsed_token.token_uuid, "failed to record token use");
        }

        Ok(Principal {
            user_uuid: token.user_uuid,
            role: token.role,
        })
    }

    #[tracing::instrument(
        name = "auth.service.issue_api_token",
        skip(self),
        fields(user_uuid = %user, token_uuid = tracing::field::Empty),
        err
    )]
    async fn issue_api_token(
        &self,
        user: UserUuid,
        expires_at: Option<Timestamp>,
    ) -> Result<IssuedApiToken, AuthServiceError> {
        let token_uuid = Uuid::now_v7();
        let version = ApiTokenVersion::V1;
        let secret = generate_api_token_secret();
        let token = format_api_token(token_uuid, version, &secret);

        Span::current().record("token_uuid", tracing::field::display(token_uuid));

        let verifier_input = build_verifier_input(&token_uuid, version, &user, &secret);

        let metadata = self
            .repository
            .create_api_token(&NewApiToken {
                uuid: token_uuid,
                user_uuid: user,
                version,
                token_hash: hash_verifier_input(&verifier_input),
                expires_at,
            })
            .await?;

        Ok(IssuedApiToken { token, metadata })
    }

    async fn list_api_tokens(
        &self,
        user: UserUuid,
    ) -> Result<Vec<ApiTokenMetadata>, AuthServiceError> {
        Ok(self.repository.list_api_tokens_by_user(user).await?)
    }

    #[tracing::instrument(name = "auth.service.revoke_api_token", skip(self), err)]
    async fn revoke_api_token(&self, token_uuid: Uuid) -> Result<bool, AuthServiceError> {
        let revoked = self.repository.revoke_api_token(token_uuid).await?;

        Ok(revoked.is_some())
    }
}

#[automock]
#[async_trait]
pub trait AuthService: Send + Sync {
    /// Resolve a bearer token to the user it was issued for.
    async fn authenticate_bearer(&self, bearer_token: &str) -> Result<Principal, AuthServiceError>;

    /// Issue a new token. The raw token is only ever returned here.
    async fn issue_api_token(
        &self,
        user: UserUuid,
        expires_at: Option<Timestamp>,
    ) -> Result<IssuedApiToken, AuthServiceError>;

    /// List every token issued to a user, newest first.
    async fn list_api_tokens(&self, user: UserUuid)
    -> Result<Vec<ApiTokenMetadata>, AuthServiceError>;

    /// Revoke a token. Returns `true` if it was live.
    async fn revoke_api_token(&self, token_uuid: Uuid) -> Result<bool, AuthServiceError>;
}
