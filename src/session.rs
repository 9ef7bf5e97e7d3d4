//! Per-session cache of the admin decision.
//!
//! The decision is stored in the session cookie together with the user id it
//! was made for. A different user on the same session triggers a fresh
//! lookup; signing out clears it. Failed lookups deny access and are not
//! cached.

use actix_session::Session;
use serde::{Deserialize, Serialize};

use crate::domain::admin_user::AdminAccess;
use crate::domain::user::User;
use crate::repository::AdminUserReader;
use crate::services::auth::lookup_admin_access;

const ADMIN_ACCESS_KEY: &str = "admin_access";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CachedAccess {
    pub user_id: i32,
    pub access: AdminAccess,
}

/// Storage for the cached decision.
pub trait AccessCache {
    fn load(&self) -> Option<CachedAccess>;
    fn store(&self, entry: CachedAccess);
    fn clear(&self);
}

impl AccessCache for Session {
    fn load(&self) -> Option<CachedAccess> {
        self.get::<CachedAccess>(ADMIN_ACCESS_KEY)
            .unwrap_or_else(|err| {
                log::warn!("Discarding unreadable admin access cache: {err}");
                None
            })
    }

    fn store(&self, entry: CachedAccess) {
        if let Err(err) = self.insert(ADMIN_ACCESS_KEY, entry) {
            log::warn!("Failed to cache admin access: {err}");
        }
    }

    fn clear(&self) {
        self.remove(ADMIN_ACCESS_KEY);
    }
}

/// Request-scoped view of the signed-in user and their admin rights.
pub struct SessionContext<C: AccessCache = Session> {
    cache: C,
    user: User,
}

impl<C: AccessCache> SessionContext<C> {
    pub fn new(cache: C, user: User) -> Self {
        Self { cache, user }
    }

    pub fn user(&self) -> &User {
        &self.user
    }

    /// Cached decision for this user, or a fresh lookup.
    pub fn admin_access<R>(&self, repo: &R) -> AdminAccess
    where
        R: AdminUserReader + ?Sized,
    {
        let user_id = self.user.id;

        match self.cache.load() {
            Some(entry) if entry.user_id == user_id.get() => return entry.access,
            Some(_) => self.cache.clear(),
            None => {}
        }

        match lookup_admin_access(repo, user_id) {
            Ok(access) => {
                self.cache.store(CachedAccess {
                    user_id: user_id.get(),
                    access,
                });
                access
            }
            Err(err) => {
                log::warn!("Admin lookup failed for user {user_id}, denying access: {err}");
                AdminAccess::Denied
            }
        }
    }

    pub fn invalidate(&self) {
        self.cache.clear();
    }
}

/// Drops any cached decision, e.g. on sign out.
pub fn forget_admin_access<C: AccessCache + ?Sized>(cache: &C) {
    cache.clear();
}

#[cfg(test)]
mod tests {
    use std::cell::{Cell, RefCell};

    use chrono::DateTime;

    use super::*;
    use crate::domain::admin_user::{AdminRole, AdminUser, AdminUserWithUser};
    use crate::domain::types::{AdminUserId, UserEmail, UserId};
    use crate::repository::errors::{RepositoryError, RepositoryResult};

    #[derive(Default)]
    struct MemoryCache(RefCell<Option<CachedAccess>>);

    impl AccessCache for MemoryCache {
        fn load(&self) -> Option<CachedAccess> {
            *self.0.borrow()
        }

        fn store(&self, entry: CachedAccess) {
            self.0.replace(Some(entry));
        }

        fn clear(&self) {
            self.0.replace(None);
        }
    }

    impl AccessCache for &MemoryCache {
        fn load(&self) -> Option<CachedAccess> {
            (**self).load()
        }

        fn store(&self, entry: CachedAccess) {
            (**self).store(entry)
        }

        fn clear(&self) {
            (**self).clear()
        }
    }

    struct CountingRepo {
        lookups: Cell<usize>,
        fail: bool,
    }

    impl CountingRepo {
        fn new(fail: bool) -> Self {
            Self {
                lookups: Cell::new(0),
                fail,
            }
        }
    }

    impl AdminUserReader for CountingRepo {
        fn get_admin_by_user_id(&self, user_id: UserId) -> RepositoryResult<Option<AdminUser>> {
            self.lookups.set(self.lookups.get() + 1);
            if self.fail {
                return Err(RepositoryError::ConnectionError("down".into()));
            }
            let now = DateTime::from_timestamp(0, 0).expect("epoch").naive_utc();
            Ok((user_id.get() == 1).then(|| AdminUser {
                id: AdminUserId::new(1).expect("id"),
                user_id,
                role: AdminRole::Admin,
                is_active: true,
                created_at: now,
                updated_at: now,
            }))
        }

        fn get_admin_by_id(&self, _id: AdminUserId) -> RepositoryResult<Option<AdminUser>> {
            Ok(None)
        }

        fn list_admin_users(&self) -> RepositoryResult<Vec<AdminUserWithUser>> {
            Ok(Vec::new())
        }
    }

    fn user(id: i32) -> User {
        let now = DateTime::from_timestamp(0, 0).expect("epoch").naive_utc();
        User {
            id: UserId::new(id).expect("id"),
            subject: format!("auth|{id}"),
            email: UserEmail::new(format!("user{id}@example.com")).expect("email"),
            full_name: None,
            created_at: now,
            last_sign_in_at: None,
        }
    }

    #[test]
    fn decision_is_cached_per_user() {
        let cache = MemoryCache::default();
        let repo = CountingRepo::new(false);
        let context = SessionContext::new(&cache, user(1));

        assert!(context.admin_access(&repo).is_granted());
        assert!(context.admin_access(&repo).is_granted());
        assert_eq!(repo.lookups.get(), 1);
    }

    #[test]
    fn user_change_triggers_fresh_lookup() {
        let cache = MemoryCache::default();
        let repo = CountingRepo::new(false);

        let admin = SessionContext::new(&cache, user(1));
        assert!(admin.admin_access(&repo).is_granted());

        let customer = SessionContext::new(&cache, user(2));
        assert_eq!(customer.admin_access(&repo), AdminAccess::Denied);
        assert_eq!(repo.lookups.get(), 2);
        assert_eq!(cache.load().map(|entry| entry.user_id), Some(2));
    }

    #[test]
    fn invalidation_forces_recheck() {
        let cache = MemoryCache::default();
        let repo = CountingRepo::new(false);
        let context = SessionContext::new(&cache, user(1));

        context.admin_access(&repo);
        context.invalidate();
        context.admin_access(&repo);
        assert_eq!(repo.lookups.get(), 2);

        forget_admin_access(&cache);
        assert!(cache.load().is_none());
    }

    #[test]
    fn failed_lookup_denies_and_is_not_cached() {
        let cache = MemoryCache::default();
        let repo = CountingRepo::new(true);
        let context = SessionContext::new(&cache, user(1));

        assert_eq!(context.admin_access(&repo), AdminAccess::Denied);
        assert!(cache.load().is_none());
    }
}
