//! Users service.

use async_trait::async_trait;
use mockall::automock;
use tracing::Span;

use crate::{
    database::Db,
    domain::users::{
        data::{NewUser, ProfileUpdate},
        errors::UsersServiceError,
        records::{Role, UserRecord, UserUuid},
        repository::PgUsersRepository,
    },
};

#[derive(Debug, Clone)]
pub struct PgUsersService {
    db: Db,
    repository: PgUsersRepository,
}

impl PgUsersService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            repository: PgUsersRepository::new(),
        }
    }
}

#[async_trait]
impl UsersService for PgUsersService {
    async fn get_user(&self, user: UserUuid) -> Result<UserRecord, UsersServiceError> {
        let mut tx = self.db.begin().await?;

        let record = self.repository.get_user(&mut tx, user).await?;

        tx.commit().await?;

        Ok(record)
    }

    async fn find_user_by_email(&self, email: &str) -> Result<UserRecord, UsersServiceError> {
        let mut tx = self.db.begin().await?;

        let record = self.repository.find_user_by_email(&mut tx, email).await?;

        tx.commit().await?;

        Ok(record)
    }

    #[tracing::instrument(
        name = "users.service.create_user",
        skip(self, user),
        fields(user_uuid = tracing::field::Empty, role = %user.role),
        err
    )]
    async fn create_user(&self, user: NewUser) -> Result<UserRecord, UsersServiceError> {
        let problems = user.problems();

        if !problems.is_empty() {
            return Err(UsersServiceError::InvalidData(problems));
        }

        let uuid = UserUuid::new();

        Span::current().record("user_uuid", tracing::field::display(uuid));

        let mut tx = self.db.begin().await?;

        let created = self.repository.create_user(&mut tx, uuid, &user).await?;

        tx.commit().await?;

        Ok(created)
    }

    async fn list_users(&self) -> Result<Vec<UserRecord>, UsersServiceError> {
        let mut tx = self.db.begin().await?;

        let users = self.repository.list_users(&mut tx).await?;

        tx.commit().await?;

        Ok(users)
    }

    #[tracing::instrument(
        name = "users.service.update_profile",
        skip(self, update),
        fields(user_uuid = %user),
        err
    )]
    async fn update_profile(
        &self,
        user: UserUuid,
        update: ProfileUpdate,
    ) -> Result<UserRecord, UsersServiceError> {
        let problems = update.problems();

        if !problems.is_empty() {
            return Err(UsersServiceError::InvalidData(problems));
        }

        let mut tx = self.db.begin().await?;

        let updated = self
            .repository
            .update_profile(&mut tx, user, &update)
            .await?;

        tx.commit().await?;

        Ok(updated)
    }

    #[tracing::instrument(
        name = "users.service.update_role",
        skip(self),
        fields(user_uuid = %user, role = %role),
        err
    )]
    async fn update_role(&self, user: UserUuid, role: Role) -> Result<UserRecord, UsersServiceError> {
        let mut tx = self.db.begin().await?;

        let updated = self.repository.update_role(&mut tx, user, role).await?;

        tx.commit().await?;

        Ok(updated)
    }
}

#[automock]
#[async_trait]
pub trait UsersService: Send + Sync {
    /// Retrieve a single user.
    async fn get_user(&self, user: UserUuid) -> Result<UserRecord, UsersServiceError>;

    /// Look a user up by email, ignoring case.
    async fn find_user_by_email(&self, email: &str) -> Result<UserRecord, UsersServiceError>;

    /// Register a new user.
    async fn create_user(&self, user: NewUser) -> Result<UserRecord, UsersServiceError>;

    /// Retrieve every user, oldest first.
    async fn list_users(&self) -> Result<Vec<UserRecord>, UsersServiceError>;

    /// Replace the editable profile fields of a user.
    async fn update_profile(
        &self,
        user: UserUuid,
        update: ProfileUpdate,
    ) -> Result<UserRecord, UsersServiceError>;

    /// Change the role of a user.
    async fn update_role(&self, user: UserUuid, role: Role) -> Result<UserRecord, UsersServiceError>;
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use crate::test::TestContext;

    use super::*;

    #[tokio::test]
    async fn create_user_defaults_are_stored() -> TestResult {
        let ctx = TestContext::new().await;

        let user = ctx
            .users
            .create_user(NewUser {
                email: "ada@campus.test".to_string(),
                name: "Ada".to_string(),
                role: Role::Student,
            })
            .await?;

        assert_eq!(user.email, "ada@campus.test");
        assert_eq!(user.role, Role::Student);
        assert!(user.phone.is_none());

        Ok(())
    }

    #[tokio::test]
    async fn duplicate_email_ignoring_case_returns_already_exists() -> TestResult {
        let ctx = TestContext::new().await;

        ctx.users
            .create_user(NewUser {
                email: "grace@campus.test".to_string(),
                name: "Grace".to_string(),
                role: Role::Student,
            })
            .await?;

        let result = ctx
            .users
            .create_user(NewUser {
                email: "GRACE@campus.test".to_string(),
                name: "Grace Again".to_string(),
                role: Role::Admin,
            })
            .await;

        assert!(
            matches!(result, Err(UsersServiceError::AlreadyExists)),
            "expected AlreadyExists, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn create_user_rejects_blank_fields() {
        let ctx = TestContext::new().await;

        let result = ctx
            .users
            .create_user(NewUser {
                email: "  ".to_string(),
                name: String::new(),
                role: Role::Student,
            })
            .await;

        let Err(UsersServiceError::InvalidData(problems)) = result else {
            panic!("expected InvalidData, got {result:?}");
        };

        assert_eq!(problems.len(), 2);
    }

    #[tokio::test]
    async fn update_profile_replaces_editable_fields() -> TestResult {
        let ctx = TestContext::new().await;
        let user = ctx.create_user(Role::Student).await;

        let updated = ctx
            .users
            .update_profile(
                user,
                ProfileUpdate {
                    name: "New Name".to_string(),
                    phone: Some("+91 98765 43210".to_string()),
                    avatar_url: Some("https://media.test/avatar.png".to_string()),
                },
            )
            .await?;

        assert_eq!(updated.name, "New Name");
        assert_eq!(updated.phone.as_deref(), Some("+91 98765 43210"));
        assert!(updated.updated_at >= updated.created_at);

        Ok(())
    }

    #[tokio::test]
    async fn update_role_promotes_user() -> TestResult {
        let ctx = TestContext::new().await;
        let user = ctx.create_user(Role::Student).await;

        let updated = ctx.users.update_role(user, Role::Admin).await?;

        assert_eq!(updated.role, Role::Admin);
        assert_eq!(ctx.users.get_user(user).await?.role, Role::Admin);

        Ok(())
    }

    #[tokio::test]
    async fn update_role_unknown_user_returns_not_found() {
        let ctx = TestContext::new().await;

        let result = ctx.users.update_role(UserUuid::new(), Role::Admin).await;

        assert!(
            matches!(result, Err(UsersServiceError::NotFound)),
            "expected NotFound, got {result:?}"
        );
    }

    #[tokio::test]
    async fn find_user_by_email_ignores_case() -> TestResult {
        let ctx = TestContext::new().await;

        let created = ctx
            .users
            .create_user(NewUser {
                email: "Linus@Campus.test".to_string(),
                name: "Linus".to_string(),
                role: Role::Student,
            })
            .await?;

        let found = ctx.users.find_user_by_email("linus@campus.test").await?;

        assert_eq!(found.uuid, created.uuid);

        Ok(())
    }
}
