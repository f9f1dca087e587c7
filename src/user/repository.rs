//! Write-through repository for user accounts.

use mockable::Clock;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};
use thiserror::Error;
use tracing::{debug, warn};

use crate::storage::{EntityStore, StorageError, USERS_KEY};
use crate::user::domain::{NewUser, User, UserDomainError, UserId, UserUpdate};

/// Result type for user repository operations.
pub type UserRepositoryResult<T> = Result<T, UserRepositoryError>;

/// Errors returned by [`UserRepository`].
#[derive(Debug, Clone, Error)]
pub enum UserRepositoryError {
    /// Another user already has the username.
    #[error("username '{0}' is already taken")]
    DuplicateUsername(String),

    /// Another user already has the email address.
    #[error("email '{0}' is already registered")]
    DuplicateEmail(String),

    /// Domain validation failed.
    #[error(transparent)]
    Domain(#[from] UserDomainError),

    /// The storage port rejected a read or write.
    #[error(transparent)]
    Storage(#[from] StorageError),
}

#[derive(Debug, Default)]
struct UserIndex {
    users: HashMap<UserId, User>,
    order: Vec<UserId>,
}

impl UserIndex {
    fn from_users(users: Vec<User>) -> Self {
        let mut index = Self::default();
        for user in users {
            index.insert(user);
        }
        index
    }

    fn insert(&mut self, user: User) {
        let id = user.id();
        if self.users.insert(id, user).is_none() {
            self.order.push(id);
        }
    }

    fn iter(&self) -> impl Iterator<Item = &User> {
        self.order.iter().filter_map(|id| self.users.get(id))
    }

    fn others(&self, exclude: Option<UserId>) -> impl Iterator<Item = &User> {
        self.iter().filter(move |user| Some(user.id()) != exclude)
    }

    /// Checks username then email against every user except `exclude`.
    fn ensure_unique(
        &self,
        username: &str,
        email: &str,
        exclude: Option<UserId>,
    ) -> UserRepositoryResult<()> {
        if self.others(exclude).any(|user| user.username() == username) {
            return Err(UserRepositoryError::DuplicateUsername(username.to_owned()));
        }
        if self.others(exclude).any(|user| user.email() == email) {
            return Err(UserRepositoryError::DuplicateEmail(email.to_owned()));
        }
        Ok(())
    }
}

/// In-memory user index mirrored to an [`EntityStore`] after every mutation.
pub struct UserRepository<S, C>
where
    S: EntityStore,
    C: Clock,
{
    state: Arc<RwLock<UserIndex>>,
    store: Arc<S>,
    clock: Arc<C>,
}

impl<S, C> Clone for UserRepository<S, C>
where
    S: EntityStore,
    C: Clock,
{
    fn clone(&self) -> Self {
        Self {
            state: Arc::clone(&self.state),
            store: Arc::clone(&self.store),
            clock: Arc::clone(&self.clock),
        }
    }
}

impl<S, C> UserRepository<S, C>
where
    S: EntityStore,
    C: Clock,
{
    /// Hydrates a repository from the users saved in `store`.
    ///
    /// Unreadable or malformed stored data is logged and the repository
    /// starts empty.
    #[must_use]
    pub fn load(store: Arc<S>, clock: Arc<C>) -> Self {
        let users = match store.load(USERS_KEY) {
            Ok(Some(value)) => serde_json::from_value::<Vec<User>>(value).unwrap_or_else(|err| {
                warn!(key = USERS_KEY, error = %err, "discarding malformed stored users");
                Vec::new()
            }),
            Ok(None) => Vec::new(),
            Err(err) => {
                warn!(key = USERS_KEY, error = %err, "failed to load stored users");
                Vec::new()
            }
        };
        Self {
            state: Arc::new(RwLock::new(UserIndex::from_users(users))),
            store,
            clock,
        }
    }

    /// Creates and stores a new user.
    ///
    /// # Errors
    ///
    /// Returns [`UserRepositoryError::DuplicateUsername`] or
    /// [`UserRepositoryError::DuplicateEmail`] when either value is already
    /// in use (username is checked first), [`UserRepositoryError::Domain`]
    /// for malformed input, or [`UserRepositoryError::Storage`] when the
    /// write-through fails.
    pub fn create(&self, data: NewUser) -> UserRepositoryResult<User> {
        let mut state = self.write()?;
        state.ensure_unique(data.username().trim(), data.email().trim(), None)?;
        let user = User::new(data, &*self.clock)?;
        state.insert(user.clone());
        self.persist(&state)?;
        Ok(user)
    }

    /// Finds a user by identifier.
    ///
    /// # Errors
    ///
    /// Returns [`UserRepositoryError::Storage`] when the index lock is
    /// poisoned.
    pub fn find_by_id(&self, id: UserId) -> UserRepositoryResult<Option<User>> {
        Ok(self.read()?.users.get(&id).cloned())
    }

    /// Returns whether a user with the identifier exists.
    ///
    /// # Errors
    ///
    /// Returns [`UserRepositoryError::Storage`] when the index lock is
    /// poisoned.
    pub fn exists(&self, id: UserId) -> UserRepositoryResult<bool> {
        Ok(self.read()?.users.contains_key(&id))
    }

    /// Finds a user by exact, case-sensitive username.
    ///
    /// # Errors
    ///
    /// Returns [`UserRepositoryError::Storage`] when the index lock is
    /// poisoned.
    pub fn find_by_username(&self, username: &str) -> UserRepositoryResult<Option<User>> {
        self.find_first(|user| user.username() == username)
    }

    /// Finds a user by exact, case-sensitive email address.
    ///
    /// # Errors
    ///
    /// Returns [`UserRepositoryError::Storage`] when the index lock is
    /// poisoned.
    pub fn find_by_email(&self, email: &str) -> UserRepositoryResult<Option<User>> {
        self.find_first(|user| user.email() == email)
    }

    /// Returns every user in creation order.
    ///
    /// # Errors
    ///
    /// Returns [`UserRepositoryError::Storage`] when the index lock is
    /// poisoned.
    pub fn find_all(&self) -> UserRepositoryResult<Vec<User>> {
        self.find_where(|_| true)
    }

    /// Returns users whose account is active.
    ///
    /// # Errors
    ///
    /// Returns [`UserRepositoryError::Storage`] when the index lock is
    /// poisoned.
    pub fn find_active(&self) -> UserRepositoryResult<Vec<User>> {
        self.find_where(User::is_active)
    }

    /// Case-insensitive substring search over username, email and full name.
    ///
    /// # Errors
    ///
    /// Returns [`UserRepositoryError::Storage`] when the index lock is
    /// poisoned.
    pub fn search(&self, query: &str) -> UserRepositoryResult<Vec<User>> {
        let needle = query.to_lowercase();
        self.find_where(|user| {
            [user.username(), user.email(), user.full_name()]
                .iter()
                .any(|field| field.to_lowercase().contains(&needle))
        })
    }

    /// Applies a partial update. Returns `Ok(None)` when the user is absent.
    ///
    /// # Errors
    ///
    /// Returns a uniqueness error when the new username or email belongs to
    /// another user, [`UserRepositoryError::Domain`] for malformed values, or
    /// [`UserRepositoryError::Storage`] when the write-through fails.
    pub fn update(&self, id: UserId, update: &UserUpdate) -> UserRepositoryResult<Option<User>> {
        self.mutate(id, |state, draft, clock| {
            draft.apply_update(update, clock)?;
            state.ensure_unique(draft.username(), draft.email(), Some(id))
        })
    }

    /// Stamps the user's last login time.
    ///
    /// # Errors
    ///
    /// Returns [`UserRepositoryError::Storage`] when the write-through fails.
    pub fn record_login(&self, id: UserId) -> UserRepositoryResult<Option<User>> {
        self.mutate(id, |_, draft, clock| {
            draft.record_login(clock);
            Ok(())
        })
    }

    /// Marks the user inactive.
    ///
    /// # Errors
    ///
    /// Returns [`UserRepositoryError::Storage`] when the write-through fails.
    pub fn deactivate(&self, id: UserId) -> UserRepositoryResult<Option<User>> {
        self.mutate(id, |_, draft, clock| {
            draft.deactivate(clock);
            Ok(())
        })
    }

    /// Marks the user active.
    ///
    /// # Errors
    ///
    /// Returns [`UserRepositoryError::Storage`] when the write-through fails.
    pub fn activate(&self, id: UserId) -> UserRepositoryResult<Option<User>> {
        self.mutate(id, |_, draft, clock| {
            draft.activate(clock);
            Ok(())
        })
    }

    /// Runs `apply` against a draft copy and commits it only on success.
    fn mutate<F>(&self, id: UserId, apply: F) -> UserRepositoryResult<Option<User>>
    where
        F: FnOnce(&UserIndex, &mut User, &C) -> UserRepositoryResult<()>,
    {
        let mut state = self.write()?;
        let Some(current) = state.users.get(&id) else {
            return Ok(None);
        };
        let mut draft = current.clone();
        apply(&*state, &mut draft, &*self.clock)?;
        state.insert(draft.clone());
        self.persist(&state)?;
        Ok(Some(draft))
    }

    fn find_first(&self, predicate: impl Fn(&User) -> bool) -> UserRepositoryResult<Option<User>> {
        Ok(self.read()?.iter().find(|user| predicate(user)).cloned())
    }

    fn find_where(&self, predicate: impl Fn(&User) -> bool) -> UserRepositoryResult<Vec<User>> {
        Ok(self
            .read()?
            .iter()
            .filter(|user| predicate(user))
            .cloned()
            .collect())
    }

    fn persist(&self, state: &UserIndex) -> UserRepositoryResult<()> {
        let users: Vec<&User> = state.iter().collect();
        let value: Value = serde_json::to_value(&users)
            .map_err(|err| StorageError::serialization(USERS_KEY, err))?;
        self.store.save(USERS_KEY, value)?;
        debug!(key = USERS_KEY, count = users.len(), "persisted users");
        Ok(())
    }

    fn read(&self) -> UserRepositoryResult<RwLockReadGuard<'_, UserIndex>> {
        self.state
            .read()
            .map_err(|err| StorageError::poisoned(err).into())
    }

    fn write(&self) -> UserRepositoryResult<RwLockWriteGuard<'_, UserIndex>> {
        self.state
            .write()
            .map_err(|err| StorageError::poisoned(err).into())
    }
}
