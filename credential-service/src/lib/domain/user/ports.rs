use async_trait::async_trait;

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
use crate::user::errors::UserError;

/// Port for registration, login, and profile operations.
#[async_trait]
pub trait CredentialServicePort: Send + Sync + 'static {
    /// Register a new user.
    ///
    /// # Arguments
    /// * `command` - Validated command containing username, optional email, and password
    ///
    /// # Returns
    /// Public view of the created user
    ///
    /// # Errors
    /// * `UsernameTaken` - Username is already registered
    /// * `EmailTaken` - Email is already registered
    /// * `StoreUnavailable` - User store failed
    async fn register(&self, command: RegisterCommand) -> Result<UserView, UserError>;

    /// Verify credentials and issue an access token.
    ///
    /// # Errors
    /// * `InvalidCredentials` - Unknown username or wrong password
    /// * `StoreUnavailable` - User store failed
    async fn login(&self, command: LoginCommand) -> Result<LoginView, UserError>;

    /// Read the profile of a user.
    ///
    /// # Errors
    /// * `NotFound` - User does not exist
    /// * `StoreUnavailable` - User store failed
    async fn get_profile(&self, id: &UserId) -> Result<UserView, UserError>;

    /// Apply a partial update to a user.
    ///
    /// # Arguments
    /// * `id` - User ID to update
    /// * `command` - Command with optional username, email, and password fields
    ///
    /// # Returns
    /// Public view of the updated user
    ///
    /// # Errors
    /// * `NotFound` - User does not exist
    /// * `NoChanges` - Command carries no field
    /// * `UsernameTaken` - New username belongs to another user
    /// * `EmailTaken` - New email belongs to another user
    /// * `StoreUnavailable` - User store failed
    async fn update_profile(
        &self,
        id: &UserId,
        command: UpdateProfileCommand,
    ) -> Result<UserView, UserError>;
}

/// Persistence operations for user aggregate.
///
/// Lookups compare usernames and emails on their case-folded key.
/// Implementations enforce uniqueness themselves; a pre-check by the caller
/// is never sufficient on its own.
#[async_trait]
pub trait UserRepository: Send + Sync + 'static {
    /// Persist new user to storage and assign its id.
    ///
    /// # Errors
    /// * `Conflict` - Username or email already stored
    /// * `StoreUnavailable` - Backend operation failed
    async fn insert(&self, user: NewUser) -> Result<User, UserError>;

    /// Retrieve user by identifier.
    ///
    /// # Returns
    /// Optional user entity (None if not found)
    ///
    /// # Errors
    /// * `StoreUnavailable` - Backend operation failed
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserError>;

    /// Retrieve user by username.
    ///
    /// # Returns
    /// Optional user entity (None if not found)
    ///
    /// # Errors
    /// * `StoreUnavailable` - Backend operation failed
    async fn find_by_username(&self, username: &Username) -> Result<Option<User>, UserError>;

    /// Retrieve user by email address.
    ///
    /// # Returns
    /// Optional user entity (None if not found)
    ///
    /// # Errors
    /// * `StoreUnavailable` - Backend operation failed
    async fn find_by_email(&self, email: &EmailAddress) -> Result<Option<User>, UserError>;

    /// Overwrite the stored record that has the same id.
    ///
    /// # Errors
    /// * `NotFound` - No record with this id
    /// * `Conflict` - New username or email belongs to another record
    /// * `StoreUnavailable` - Backend operation failed
    async fn replace(&self, user: User) -> Result<(), UserError>;
}
