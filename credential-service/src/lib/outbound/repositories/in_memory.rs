use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::user::models::EmailAddress;
use crate::domain::user::models::NewUser;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;
use crate::domain::user::models::Username;
use crate::domain::user::ports::UserRepository;
use crate::user::errors::UniqueField;
use crate::user::errors::UserError;

/// Process-local user store.
///
/// Records are keyed by id, with case-folded username and email indexes.
/// Every write checks uniqueness and mutates under the same write lock.
#[derive(Default)]
pub struct InMemoryUserRepository {
    table: RwLock<UserTable>,
}

#[derive(Default)]
struct UserTable {
    users: HashMap<UserId, User>,
    by_username: HashMap<String, UserId>,
    by_email: HashMap<String, UserId>,
}

impl UserTable {
    /// Fails if `username`/`email` is indexed to a record other than `owner`.
    fn check_unique(
        &self,
        username: &Username,
        email: Option<&EmailAddress>,
        owner: Option<&UserId>,
    ) -> Result<(), UserError> {
        let taken_by_other = |id: &UserId| Some(id) != owner;

        if self.by_username.get(&username.key()).is_some_and(taken_by_other) {
            return Err(UserError::Conflict(UniqueField::Username));
        }
        if let Some(email) = email {
            if self.by_email.get(&email.key()).is_some_and(taken_by_other) {
                return Err(UserError::Conflict(UniqueField::Email));
            }
        }
        Ok(())
    }

    fn index(&mut self, user: &User) {
        self.by_username.insert(user.username.key(), user.id);
        if let Some(email) = &user.email {
            self.by_email.insert(email.key(), user.id);
        }
    }

    fn unindex(&mut self, user: &User) {
        self.by_username.remove(&user.username.key());
        if let Some(email) = &user.email {
            self.by_email.remove(&email.key());
        }
    }
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn insert(&self, user: NewUser) -> Result<User, UserError> {
        let mut table = self.table.write().await;
        table.check_unique(&user.username, user.email.as_ref(), None)?;

        let mut id = UserId::new();
        while table.users.contains_key(&id) {
            id = UserId::new();
        }

        let user = user.with_id(id);
        table.index(&user);
        table.users.insert(id, user.clone());

        tracing::debug!(user_id = %id, "User inserted");
        Ok(user)
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserError> {
        Ok(self.table.read().await.users.get(id).cloned())
    }

    async fn find_by_username(&self, username: &Username) -> Result<Option<User>, UserError> {
        let table = self.table.read().await;
        Ok(table
            .by_username
            .get(&username.key())
            .and_then(|id| table.users.get(id))
            .cloned())
    }

    async fn find_by_email(&self, email: &EmailAddress) -> Result<Option<User>, UserError> {
        let table = self.table.read().await;
        Ok(table
            .by_email
            .get(&email.key())
            .and_then(|id| table.users.get(id))
            .cloned())
    }

    async fn replace(&self, user: User) -> Result<(), UserError> {
        let mut table = self.table.write().await;

        let Some(previous) = table.users.get(&user.id).cloned() else {
            return Err(UserError::NotFound(user.id.to_string()));
        };
        table.check_unique(&user.username, user.email.as_ref(), Some(&user.id))?;

        table.unindex(&previous);
        table.index(&user);
        tracing::debug!(user_id = %user.id, "User replaced");
        table.users.insert(user.id, user);

        Ok(())
    }
}
