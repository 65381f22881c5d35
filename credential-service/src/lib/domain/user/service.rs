use std::sync::Arc;

use async_trait::async_trait;
use auth::AuthenticationError;
use auth::Authenticator;
use auth::Role;
use chrono::Utc;

use crate::domain::user::models::EmailAddress;
use crate::domain::user::models::LoginCommand;
use crate::domain::user::models::LoginView;
use crate::domain::user::models::NewUser;
use crate::domain::user::models::RegisterCommand;
use crate::domain::user::models::UpdateProfileCommand;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;
use crate::domain::user::models::UserView;
use crate::domain::user::models::Username;
use crate::user::errors::UniqueField;
use crate::user::errors::UserError;
use crate::user::ports::CredentialServicePort;
use crate::user::ports::UserRepository;

/// Domain service implementation for registration, login, and profiles.
///
/// Holds no mutable state of its own; everything mutable lives behind the
/// repository.
pub struct CredentialService<UR>
where
    UR: UserRepository,
{
    repository: Arc<UR>,
    authenticator: Arc<Authenticator>,
}

impl<UR> CredentialService<UR>
where
    UR: UserRepository,
{
    /// Create a new credential service with injected dependencies.
    ///
    /// # Arguments
    /// * `repository` - User persistence implementation
    /// * `authenticator` - Password hashing and token issuance
    pub fn new(repository: Arc<UR>, authenticator: Arc<Authenticator>) -> Self {
        Self {
            repository,
            authenticator,
        }
    }

    async fn ensure_username_free(
        &self,
        username: &Username,
        owner: Option<&UserId>,
    ) -> Result<(), UserError> {
        match self.repository.find_by_username(username).await? {
            Some(existing) if Some(&existing.id) != owner => {
                Err(UserError::UsernameTaken(username.to_string()))
            }
            _ => Ok(()),
        }
    }

    async fn ensure_email_free(
        &self,
        email: &EmailAddress,
        owner: Option<&UserId>,
    ) -> Result<(), UserError> {
        match self.repository.find_by_email(email).await? {
            Some(existing) if Some(&existing.id) != owner => {
                Err(UserError::EmailTaken(email.to_string()))
            }
            _ => Ok(()),
        }
    }
}

/// A store conflict means another writer won the race after our pre-check.
fn conflict_to_taken(
    error: UserError,
    username: &Username,
    email: Option<&EmailAddress>,
) -> UserError {
    match error {
        UserError::Conflict(UniqueField::Username) => {
            UserError::UsernameTaken(username.to_string())
        }
        UserError::Conflict(UniqueField::Email) => {
            UserError::EmailTaken(email.map(|e| e.to_string()).unwrap_or_default())
        }
        other => other,
    }
}

#[async_trait]
impl<UR> CredentialServicePort for CredentialService<UR>
where
    UR: UserRepository,
{
    async fn register(&self, command: RegisterCommand) -> Result<UserView, UserError> {
        self.ensure_username_free(&command.username, None).await?;
        if let Some(email) = &command.email {
            self.ensure_email_free(email, None).await?;
        }

        let password_hash = self.authenticator.hash_password(command.password.expose())?;

        let new_user = NewUser {
            username: command.username,
            email: command.email,
            password_hash,
            created_at: Utc::now(),
        };

        let username = new_user.username.clone();
        let email = new_user.email.clone();
        let created_user = self
            .repository
            .insert(new_user)
            .await
            .map_err(|e| conflict_to_taken(e, &username, email.as_ref()))?;

        tracing::info!(
            user_id = %created_user.id,
            username = %created_user.username,
            "User registered"
        );

        Ok(UserView::from(&created_user))
    }

    async fn login(&self, command: LoginCommand) -> Result<LoginView, UserError> {
        let Ok(username) = Username::new(command.username) else {
            tracing::info!("Login rejected: malformed username");
            return Err(UserError::InvalidCredentials);
        };

        let Some(user) = self.repository.find_by_username(&username).await? else {
            tracing::info!(username = %username, "Login rejected: unknown username");
            return Err(UserError::InvalidCredentials);
        };

        let result = self
            .authenticator
            .authenticate(
                &command.password,
                &user.password_hash,
                &user.id.to_string(),
                user.username.as_str(),
                Role::User,
                Utc::now(),
            )
            .map_err(|e| match e {
                AuthenticationError::InvalidCredentials => {
                    tracing::info!(user_id = %user.id, "Login rejected: password mismatch");
                    UserError::InvalidCredentials
                }
                AuthenticationError::JwtError(err) => UserError::Token(err),
            })?;

        tracing::info!(user_id = %user.id, expires_at = %result.expires_at, "Access token issued");

        Ok(LoginView {
            id: user.id,
            username: user.username.as_str().to_string(),
            access_token: result.access_token,
            expires_at: result.expires_at,
        })
    }

    async fn get_profile(&self, id: &UserId) -> Result<UserView, UserError> {
        self.repository
            .find_by_id(id)
            .await?
            .map(|user| UserView::from(&user))
            .ok_or(UserError::NotFound(id.to_string()))
    }

    async fn update_profile(
        &self,
        id: &UserId,
        command: UpdateProfileCommand,
    ) -> Result<UserView, UserError> {
        let mut user: User = self
            .repository
            .find_by_id(id)
            .await?
            .ok_or(UserError::NotFound(id.to_string()))?;

        if command.is_empty() {
            return Err(UserError::NoChanges);
        }

        if let Some(new_username) = command.username {
            self.ensure_username_free(&new_username, Some(&user.id)).await?;
            user.username = new_username;
        }

        if let Some(new_email) = command.email {
            self.ensure_email_free(&new_email, Some(&user.id)).await?;
            user.email = Some(new_email);
        }

        if let Some(new_password) = command.password {
            user.password_hash = self.authenticator.hash_password(new_password.expose())?;
        }

        let view = UserView::from(&user);
        let username = user.username.clone();
        let email = user.email.clone();
        self.repository
            .replace(user)
            .await
            .map_err(|e| conflict_to_taken(e, &username, email.as_ref()))?;

        tracing::info!(user_id = %id, "Profile updated");

        Ok(view)
    }
}
