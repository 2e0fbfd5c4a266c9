//! User store adapter.
//! Loads the static user list once and resolves the user for a request. Every
//! failure degrades to a valid [`User`], so callers never handle a lookup error.

use indexmap::IndexMap;
use log::{debug, warn};
use rand::Rng;
use std::path::Path;

use crate::context::User;
use crate::error::{Error, Result};

/// Read-only user records keyed by username, in store order.
#[derive(Debug, Clone, Default)]
pub struct UserStore {
    users: IndexMap<String, User>,
}

/// Parses store content, trying JSON first and YAML second.
pub fn parse_users(content: &str) -> Result<Vec<User>> {
    match serde_json::from_str(content) {
        Ok(users) => Ok(users),
        Err(_) => serde_yaml::from_str(content)
            .map_err(|e| Error::StoreUnavailable(format!("invalid user store format: {e}"))),
    }
}

impl UserStore {
    pub fn new(users: Vec<User>) -> Self {
        let users = users
            .into_iter()
            .map(|user| (user.username.clone(), user))
            .collect();
        Self { users }
    }

    /// Reads the store from `path`.
    ///
    /// # Errors
    /// * `Error::StoreUnavailable` if the file is missing, unreadable or malformed
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        debug!("Loading user store from {}", path.display());
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::StoreUnavailable(format!("{}: {e}", path.display())))?;
        Ok(Self::new(parse_users(&content)?))
    }

    /// Like [`UserStore::load`], but an unavailable store yields an empty one,
    /// whose lookups all return the guest user.
    pub fn load_or_empty<P: AsRef<Path>>(path: P) -> Self {
        Self::load(path).unwrap_or_else(|e| {
            warn!("{e} Serving the guest user only");
            Self::default()
        })
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }

    /// Exact lookup by username.
    ///
    /// # Errors
    /// * `Error::UserNotFound` if no record has this username
    pub fn get(&self, username: &str) -> Result<&User> {
        self.users
            .get(username)
            .ok_or_else(|| Error::UserNotFound(username.to_string()))
    }

    /// Picks an arbitrary stored user.
    ///
    /// # Errors
    /// * `Error::StoreUnavailable` if the store holds no users
    pub fn any(&self) -> Result<&User> {
        if self.users.is_empty() {
            return Err(Error::StoreUnavailable("user store is empty".to_string()));
        }
        let index = rand::thread_rng().gen_range(0..self.users.len());
        self.users
            .get_index(index)
            .map(|(_, user)| user)
            .ok_or_else(|| Error::StoreUnavailable("user store is empty".to_string()))
    }

    /// Resolves the user for a request.
    ///
    /// A known username returns its record. An unknown or absent username
    /// falls back to an arbitrary user, and an empty store to [`User::guest`].
    pub fn lookup(&self, username: Option<&str>) -> User {
        let found = username
            .filter(|name| !name.is_empty())
            .map(|name| self.get(name));
        match found {
            Some(Ok(user)) => return user.clone(),
            Some(Err(e)) => debug!("{e} Picking an arbitrary user"),
            None => {}
        }
        match self.any() {
            Ok(user) => user.clone(),
            Err(e) => {
                warn!("{e} Using the guest user");
                User::guest()
            }
        }
    }
}
