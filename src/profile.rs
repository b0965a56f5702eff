//! The signed-in user, stored under the `user` key.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::store::{self, SharedStore, USER_KEY};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
}

impl UserProfile {
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
        }
    }

    fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(Error::validation("name", "name cannot be empty"));
        }
        if !self.email.contains('@') {
            return Err(Error::validation(
                "email",
                format!("'{}' is not an email address", self.email),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct ProfileRepository {
    store: SharedStore,
}

impl ProfileRepository {
    pub fn new(store: SharedStore) -> Self {
        Self { store }
    }

    /// The stored profile; `None` when nobody is signed in
    pub fn load(&self) -> Result<Option<UserProfile>> {
        store::read_json(self.store.as_ref(), USER_KEY)
    }

    /// Sign in, or update the signed-in profile
    pub fn save(&self, profile: &UserProfile) -> Result<()> {
        profile.validate()?;
        let trimmed = UserProfile::new(profile.name.trim(), profile.email.trim());
        let _lock = self.store.lock(USER_KEY)?;
        store::write_json(self.store.as_ref(), USER_KEY, &trimmed)?;
        tracing::info!(name = %trimmed.name, "profile saved");
        Ok(())
    }

    /// Sign out
    pub fn clear(&self) -> Result<()> {
        let _lock = self.store.lock(USER_KEY)?;
        self.store.remove(USER_KEY)?;
        tracing::info!("profile cleared");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{KeyValueStore, MemoryStore};

    #[test]
    fn save_load_clear() {
        let repo = ProfileRepository::new(MemoryStore::shared());
        assert_eq!(repo.load().unwrap(), None);

        repo.save(&UserProfile::new(" Jane Smith ", "jane@example.com")).unwrap();
        assert_eq!(
            repo.load().unwrap(),
            Some(UserProfile::new("Jane Smith", "jane@example.com"))
        );

        repo.clear().unwrap();
        assert_eq!(repo.load().unwrap(), None);
        repo.clear().unwrap();
    }

    #[test]
    fn save_rejects_blank_name() {
        let repo = ProfileRepository::new(MemoryStore::shared());
        let err = repo.save(&UserProfile::new("", "a@example.com")).unwrap_err();
        assert!(matches!(err, Error::Validation { field: "name", .. }));
        let err = repo.save(&UserProfile::new("Ana", "ana")).unwrap_err();
        assert!(matches!(err, Error::Validation { field: "email", .. }));
    }

    #[test]
    fn partial_user_document_loads() {
        let store = MemoryStore::shared();
        store.set(USER_KEY, r#"{"name":"John Doe"}"#).unwrap();
        let repo = ProfileRepository::new(store);
        let profile = repo.load().unwrap().unwrap();
        assert_eq!(profile.name, "John Doe");
        assert!(profile.email.is_empty());
    }

    #[test]
    fn concurrent_saves_leave_one_complete_profile() {
        use crate::store::DirStore;
        use std::sync::Arc;
        use std::thread;

        let temp = tempfile::tempdir().unwrap();
        let store: SharedStore = Arc::new(DirStore::open(temp.path()).unwrap());
        let handles: Vec<_> = (0..6)
            .map(|n| {
                let repo = ProfileRepository::new(store.clone());
                thread::spawn(move || {
                    for _ in 0..10 {
                        repo.save(&UserProfile::new(format!("User {n}"), format!("u{n}@example.com")))
                            .unwrap();
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let profile = ProfileRepository::new(store).load().unwrap().unwrap();
        assert!(profile.name.starts_with("User "));
        assert!(profile.email.ends_with("@example.com"));
    }
}
