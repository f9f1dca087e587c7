//! User aggregate and its input payloads.

use super::{UserDomainError, UserId};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// Input payload for creating a user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    username: String,
    email: String,
    full_name: String,
}

impl NewUser {
    /// Creates a payload with the required identity fields.
    #[must_use]
    pub fn new(username: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            email: email.into(),
            full_name: String::new(),
        }
    }

    /// Sets the display name.
    #[must_use]
    pub fn with_full_name(mut self, full_name: impl Into<String>) -> Self {
        self.full_name = full_name.into();
        self
    }

    /// Returns the requested username.
    #[must_use]
    pub fn username(&self) -> &str {
        &self.username
    }

    /// Returns the requested email address.
    #[must_use]
    pub fn email(&self) -> &str {
        &self.email
    }
}

/// Partial update for a user. Absent fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserUpdate {
    /// Replacement username.
    pub username: Option<String>,
    /// Replacement email address.
    pub email: Option<String>,
    /// Replacement display name.
    pub full_name: Option<String>,
    /// Replacement activity flag.
    pub is_active: Option<bool>,
}

/// User account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    id: UserId,
    username: String,
    email: String,
    full_name: String,
    is_active: bool,
    last_login_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl User {
    /// Creates an active user from validated input.
    ///
    /// # Errors
    ///
    /// Returns [`UserDomainError`] when the username or email is malformed.
    pub fn new(data: NewUser, clock: &impl Clock) -> Result<Self, UserDomainError> {
        let timestamp = clock.utc();
        Ok(Self {
            id: UserId::new(),
            username: validate_username(&data.username)?,
            email: validate_email(&data.email)?,
            full_name: data.full_name.trim().to_owned(),
            is_active: true,
            last_login_at: None,
            created_at: timestamp,
            updated_at: timestamp,
        })
    }

    /// Returns the user identifier.
    #[must_use]
    pub const fn id(&self) -> UserId {
        self.id
    }

    /// Returns the unique username.
    #[must_use]
    pub fn username(&self) -> &str {
        &self.username
    }

    /// Returns the unique email address.
    #[must_use]
    pub fn email(&self) -> &str {
        &self.email
    }

    /// Returns the display name.
    #[must_use]
    pub fn full_name(&self) -> &str {
        &self.full_name
    }

    /// Returns whether the account is active.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.is_active
    }

    /// Returns the last login timestamp, if the user has ever logged in.
    #[must_use]
    pub const fn last_login_at(&self) -> Option<DateTime<Utc>> {
        self.last_login_at
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the latest modification timestamp.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Applies a partial update.
    ///
    /// Validation happens before any field is written, so a rejected update
    /// leaves the user unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`UserDomainError`] when a replacement value is malformed.
    pub fn apply_update(
        &mut self,
        update: &UserUpdate,
        clock: &impl Clock,
    ) -> Result<(), UserDomainError> {
        let username = update
            .username
            .as_deref()
            .map(validate_username)
            .transpose()?;
        let email = update.email.as_deref().map(validate_email).transpose()?;

        if let Some(value) = username {
            self.username = value;
        }
        if let Some(value) = email {
            self.email = value;
        }
        if let Some(full_name) = &update.full_name {
            full_name.trim().clone_into(&mut self.full_name);
        }
        if let Some(is_active) = update.is_active {
            self.is_active = is_active;
        }
        self.touch(clock);
        Ok(())
    }

    /// Stamps the last login time.
    pub fn record_login(&mut self, clock: &impl Clock) {
        self.last_login_at = Some(clock.utc());
        self.touch(clock);
    }

    /// Marks the account inactive.
    pub fn deactivate(&mut self, clock: &impl Clock) {
        self.is_active = false;
        self.touch(clock);
    }

    /// Marks the account active again.
    pub fn activate(&mut self, clock: &impl Clock) {
        self.is_active = true;
        self.touch(clock);
    }

    fn touch(&mut self, clock: &impl Clock) {
        self.updated_at = clock.utc();
    }
}

fn validate_username(raw: &str) -> Result<String, UserDomainError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(UserDomainError::EmptyUsername);
    }
    if trimmed.chars().any(char::is_whitespace) {
        return Err(UserDomainError::InvalidUsername(raw.to_owned()));
    }
    Ok(trimmed.to_owned())
}

fn validate_email(raw: &str) -> Result<String, UserDomainError> {
    let trimmed = raw.trim();
    let is_valid = !trimmed.chars().any(char::is_whitespace)
        && trimmed.split_once('@').is_some_and(|(local, domain)| {
            !local.is_empty()
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
                && !domain.contains('@')
        });
    if !is_valid {
        return Err(UserDomainError::InvalidEmail(raw.to_owned()));
    }
    Ok(trimmed.to_owned())
}
