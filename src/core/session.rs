//! Local accounts and the session provider seam.
//!
//! Accounts live entirely in browser storage. Passwords are base64-encoded,
//! which is reversible and is not a security boundary: this only keeps one
//! browser's users apart.

use std::rc::Rc;
use std::sync::LazyLock;

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use regex::Regex;
use serde_json::Value;

use crate::config::{AVATAR_BASE_URL, AVATAR_STYLE, AccountConfig};
use crate::core::error::{AuthError, StorageError};
use crate::core::persist;
use crate::models::{SavedItem, UserProfile, UserRecord};
use crate::utils::{Clock, KeyValueStore};

/// Which saved list is being mirrored into the user record.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MirroredCollection {
    Favorites,
    Watchlist,
}

/// Identity as seen by the persistence store.
pub trait SessionProvider {
    /// The signed-in user, if any.
    fn current_user(&self) -> Option<UserProfile>;

    fn is_authenticated(&self) -> bool {
        self.current_user().is_some()
    }

    /// Copy `items` into the signed-in user's record.
    fn mirror_collection(
        &self,
        collection: MirroredCollection,
        items: &[SavedItem],
    ) -> Result<(), AuthError>;
}

/// A session provider that never has a user.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoSession;

impl SessionProvider for NoSession {
    fn current_user(&self) -> Option<UserProfile> {
        None
    }

    fn mirror_collection(&self, _: MirroredCollection, _: &[SavedItem]) -> Result<(), AuthError> {
        Err(AuthError::NotAuthenticated)
    }
}

/// Sign-up form input.
#[derive(Clone, Debug, Default)]
pub struct Registration {
    pub name: String,
    pub email: String,
    pub password: String,
    pub confirm: String,
}

impl Registration {
    fn validate(&self, min_password_len: usize) -> Result<(), AuthError> {
        if self.name.trim().is_empty() {
            return Err(AuthError::InvalidName);
        }
        if !is_valid_email(&self.email) {
            return Err(AuthError::InvalidEmail);
        }
        if self.password != self.confirm {
            return Err(AuthError::PasswordMismatch);
        }
        if self.password.chars().count() < min_password_len {
            return Err(AuthError::PasswordTooShort {
                min: min_password_len,
            });
        }
        Ok(())
    }
}

/// `local@domain.tld` with no whitespace. ASCII classes only: the crate
/// builds `regex` without its Unicode Perl classes.
static EMAIL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^ \t\r\n@]+@[^ \t\r\n@]+\.[^ \t\r\n@]+$").expect("email pattern is valid")
});

/// Check an email address has the `local@domain.tld` shape.
pub fn is_valid_email(email: &str) -> bool {
    EMAIL.is_match(email.trim())
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

fn encode_password(password: &str) -> String {
    BASE64.encode(password.as_bytes())
}

fn avatar_url(name: &str) -> String {
    format!(
        "{}{}{}",
        AVATAR_BASE_URL,
        urlencoding::encode(name.trim()),
        AVATAR_STYLE
    )
}

/// Browser-local accounts: a users list plus the signed-in user's id.
pub struct AccountService {
    storage: Rc<dyn KeyValueStore>,
    clock: Rc<dyn Clock>,
    config: AccountConfig,
}

impl AccountService {
    pub fn new(storage: Rc<dyn KeyValueStore>, clock: Rc<dyn Clock>) -> Self {
        Self::with_config(storage, clock, AccountConfig::default())
    }

    pub fn with_config(
        storage: Rc<dyn KeyValueStore>,
        clock: Rc<dyn Clock>,
        config: AccountConfig,
    ) -> Self {
        Self {
            storage,
            clock,
            config,
        }
    }

    /// All registered users. Records that do not parse are skipped.
    pub fn users(&self) -> Vec<UserRecord> {
        persist::read_list(self.storage.as_ref(), &self.config.users_key)
    }

    fn save_users(&self, users: &[UserRecord]) -> Result<(), StorageError> {
        persist::write(self.storage.as_ref(), &self.config.users_key, &users)
    }

    /// The signed-in id. Older sessions stored the whole user object.
    fn current_user_id(&self) -> Option<String> {
        match persist::read::<Value>(self.storage.as_ref(), &self.config.current_user_key) {
            Value::String(id) => Some(id),
            Value::Object(user) => user.get("id").and_then(Value::as_str).map(str::to_string),
            _ => None,
        }
    }

    fn set_current_user_id(&self, id: Option<&str>) -> Result<(), StorageError> {
        match id {
            Some(id) => persist::write(self.storage.as_ref(), &self.config.current_user_key, &id),
            None => self.storage.remove_item(&self.config.current_user_key),
        }
    }

    /// Create an account and sign in as it.
    pub fn register(&self, form: &Registration) -> Result<UserProfile, AuthError> {
        form.validate(self.config.min_password_len)?;

        let mut users = self.users();
        let email = normalize_email(&form.email);
        if users.iter().any(|u| normalize_email(&u.profile.email) == email) {
            return Err(AuthError::EmailTaken);
        }

        let now = self.clock.now_ms();
        let mut id_ms = now;
        while users.iter().any(|u| u.profile.id == id_ms.to_string()) {
            id_ms += 1;
        }

        let profile = UserProfile {
            id: id_ms.to_string(),
            name: form.name.trim().to_string(),
            email,
            avatar: avatar_url(&form.name),
            created_at: now.into(),
            favorites: Vec::new(),
            watchlist: Vec::new(),
        };
        users.push(UserRecord {
            profile: profile.clone(),
            password: encode_password(&form.password),
        });

        self.save_users(&users)?;
        self.set_current_user_id(Some(&profile.id))?;
        tracing::info!(user_id = %profile.id, "registered local account");
        Ok(profile)
    }

    /// Sign in with email and password.
    pub fn login(&self, email: &str, password: &str) -> Result<UserProfile, AuthError> {
        let email = normalize_email(email);
        let encoded = encode_password(password);

        let profile = self
            .users()
            .into_iter()
            .find(|u| normalize_email(&u.profile.email) == email && u.password == encoded)
            .map(|u| u.profile)
            .ok_or(AuthError::InvalidCredentials)?;

        self.set_current_user_id(Some(&profile.id))?;
        tracing::info!(user_id = %profile.id, "signed in");
        Ok(profile)
    }

    /// Sign out. Saved collections stay in storage.
    pub fn logout(&self) -> Result<(), StorageError> {
        self.set_current_user_id(None)
    }
}

impl SessionProvider for AccountService {
    fn current_user(&self) -> Option<UserProfile> {
        let id = self.current_user_id()?;
        self.users()
            .into_iter()
            .find(|u| u.profile.id == id)
            .map(|u| u.profile)
    }

    fn mirror_collection(
        &self,
        collection: MirroredCollection,
        items: &[SavedItem],
    ) -> Result<(), AuthError> {
        let id = self.current_user_id().ok_or(AuthError::NotAuthenticated)?;
        let mut users = self.users();
        let user = users
            .iter_mut()
            .find(|u| u.profile.id == id)
            .ok_or(AuthError::NotAuthenticated)?;

        match collection {
            MirroredCollection::Favorites => user.profile.favorites = items.to_vec(),
            MirroredCollection::Watchlist => user.profile.watchlist = items.to_vec(),
        }
        self.save_users(&users)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{MediaItem, MediaKind};
    use crate::utils::{ManualClock, MemoryStorage};

    fn service() -> (AccountService, MemoryStorage, ManualClock) {
        let storage = MemoryStorage::new();
        let clock = ManualClock::new(1_700_000_000_000);
        let accounts = AccountService::new(Rc::new(storage.clone()), Rc::new(clock.clone()));
        (accounts, storage, clock)
    }

    fn form(name: &str, email: &str, password: &str) -> Registration {
        Registration {
            name: name.into(),
            email: email.into(),
            password: password.into(),
            confirm: password.into(),
        }
    }

    #[test]
    fn test_email_pattern_compiles() {
        LazyLock::force(&EMAIL);
    }

    #[test]
    fn test_register_with_dotted_address() {
        let (accounts, _, _) = service();
        let profile = accounts
            .register(&form("Ann", "user.name@mail.example.org", "secret1"))
            .unwrap();
        assert_eq!(profile.email, "user.name@mail.example.org");
        assert_eq!(
            accounts.login("User.Name@mail.example.org", "secret1"),
            Ok(profile)
        );
    }

    #[test]
    fn test_existing_iso_records_survive_registration() {
        let (accounts, storage, _) = service();
        storage
            .set_item(
                "cinevault_users",
                r#"[{"id":"1699999999999","name":"Old","email":"old@example.com",
                     "password":"c2VjcmV0MQ==","avatar":"a",
                     "createdAt":"2023-11-14T22:13:19.999Z","favorites":[],"watchlist":[]}]"#,
            )
            .unwrap();
        storage
            .set_item("cinevault_current_user", r#"{"id":"1699999999999","name":"Old"}"#)
            .unwrap();
        assert_eq!(accounts.current_user().map(|u| u.name), Some("Old".into()));

        accounts.register(&form("New", "new@example.com", "secret1")).unwrap();
        assert_eq!(accounts.users().len(), 2);
        assert!(accounts.login("old@example.com", "secret1").is_ok());
    }

    #[test]
    fn test_valid_emails() {
        assert!(is_valid_email("ann@example.com"));
        assert!(is_valid_email(" ann@mail.example.org "));
        assert!(!is_valid_email("ann@example"));
        assert!(!is_valid_email("ann example.com"));
        assert!(!is_valid_email(""));
    }

    #[test]
    fn test_register_signs_in() {
        let (accounts, storage, _) = service();
        let profile = accounts
            .register(&form("Ann Lee", "Ann@Example.com", "secret1"))
            .unwrap();

        assert_eq!(profile.id, "1700000000000");
        assert_eq!(profile.email, "ann@example.com");
        assert!(profile.avatar.contains("name=Ann%20Lee"));
        assert_eq!(accounts.current_user(), Some(profile));
        assert!(accounts.is_authenticated());

        let raw = storage.get_item("cinevault_users").unwrap().unwrap();
        assert!(raw.contains("c2VjcmV0MQ=="));
    }

    #[test]
    fn test_register_validation() {
        let (accounts, _, _) = service();

        assert_eq!(
            accounts.register(&form(" ", "a@b.co", "secret1")),
            Err(AuthError::InvalidName)
        );
        assert_eq!(
            accounts.register(&form("A", "not-an-email", "secret1")),
            Err(AuthError::InvalidEmail)
        );
        assert_eq!(
            accounts.register(&form("A", "a@b.co", "short")),
            Err(AuthError::PasswordTooShort { min: 6 })
        );

        let mut mismatch = form("A", "a@b.co", "secret1");
        mismatch.confirm = "secret2".into();
        assert_eq!(accounts.register(&mismatch), Err(AuthError::PasswordMismatch));
        assert!(accounts.users().is_empty());
    }

    #[test]
    fn test_duplicate_email_rejected() {
        let (accounts, _, clock) = service();
        accounts.register(&form("A", "a@b.co", "secret1")).unwrap();
        clock.advance(10);
        assert_eq!(
            accounts.register(&form("B", "A@B.CO", "secret2")),
            Err(AuthError::EmailTaken)
        );
        assert_eq!(accounts.users().len(), 1);
    }

    #[test]
    fn test_ids_unique_within_same_millisecond() {
        let (accounts, _, _) = service();
        let a = accounts.register(&form("A", "a@b.co", "secret1")).unwrap();
        let b = accounts.register(&form("B", "b@b.co", "secret1")).unwrap();
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_login_logout() {
        let (accounts, _, _) = service();
        let profile = accounts.register(&form("A", "a@b.co", "secret1")).unwrap();
        accounts.logout().unwrap();
        assert_eq!(accounts.current_user(), None);

        assert_eq!(
            accounts.login("a@b.co", "wrong!!"),
            Err(AuthError::InvalidCredentials)
        );
        assert_eq!(accounts.login(" A@b.co", "secret1"), Ok(profile.clone()));
        assert_eq!(accounts.current_user().map(|u| u.id), Some(profile.id));
    }

    #[test]
    fn test_mirror_collection() {
        let (accounts, _, _) = service();
        let items = vec![SavedItem {
            item: MediaItem::new(42, MediaKind::Movie, "Dune"),
            added_at: 5,
        }];

        assert_eq!(
            accounts.mirror_collection(MirroredCollection::Favorites, &items),
            Err(AuthError::NotAuthenticated)
        );

        accounts.register(&form("A", "a@b.co", "secret1")).unwrap();
        accounts
            .mirror_collection(MirroredCollection::Watchlist, &items)
            .unwrap();

        let user = accounts.current_user().unwrap();
        assert_eq!(user.watchlist, items);
        assert!(user.favorites.is_empty());
    }

    #[test]
    fn test_no_session() {
        assert!(!NoSession.is_authenticated());
        assert_eq!(
            NoSession.mirror_collection(MirroredCollection::Favorites, &[]),
            Err(AuthError::NotAuthenticated)
        );
    }
}
