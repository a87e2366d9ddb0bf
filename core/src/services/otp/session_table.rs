//! Session arena with alias keys
//!
//! Sessions live in an arena keyed by `SessionId`; canonical keys are
//! aliases that point into it. Every alias of a session therefore sees the
//! same attempts counter and verified flag. A session is dropped from the
//! arena when its last alias goes, so no alias ever dangles.

use chrono::{DateTime, Utc};
use std::collections::HashMap;

use crate::domain::{Session, SessionId};

#[derive(Debug)]
struct SessionEntry {
    session: Session,
    aliases: Vec<String>,
}

#[derive(Debug, Default)]
pub struct SessionTable {
    arena: HashMap<SessionId, SessionEntry>,
    aliases: HashMap<String, SessionId>,
}

impl SessionTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve a canonical key to its session id
    pub fn resolve(&self, key: &str) -> Option<SessionId> {
        self.aliases.get(key).copied()
    }

    pub fn get(&self, key: &str) -> Option<&Session> {
        let id = self.resolve(key)?;
        self.arena.get(&id).map(|entry| &entry.session)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut Session> {
        let id = self.resolve(key)?;
        self.arena.get_mut(&id).map(|entry| &mut entry.session)
    }

    /// Install a session under every key, replacing whatever those keys held
    pub fn install(&mut self, keys: &[String], session: Session) -> SessionId {
        for key in keys {
            self.remove_alias(key);
        }

        let id = session.id;
        for key in keys {
            self.aliases.insert(key.clone(), id);
        }
        self.arena.insert(
            id,
            SessionEntry {
                session,
                aliases: keys.to_vec(),
            },
        );
        id
    }

    /// Unbind one key; the session goes with its last alias
    ///
    /// Returns true when the key was bound.
    pub fn remove_alias(&mut self, key: &str) -> bool {
        let Some(id) = self.aliases.remove(key) else {
            return false;
        };

        let orphaned = match self.arena.get_mut(&id) {
            Some(entry) => {
                entry.aliases.retain(|alias| alias != key);
                entry.aliases.is_empty()
            }
            None => false,
        };
        if orphaned {
            self.arena.remove(&id);
        }
        true
    }

    /// Remove a session and every alias bound to it, returning the alias count
    pub fn remove_session(&mut self, id: SessionId) -> usize {
        let Some(entry) = self.arena.remove(&id) else {
            return 0;
        };
        for alias in &entry.aliases {
            self.aliases.remove(alias);
        }
        entry.aliases.len()
    }

    /// Ids of sessions past their expiry at `now`
    pub fn expired_ids(&self, now: DateTime<Utc>) -> Vec<SessionId> {
        self.arena
            .iter()
            .filter(|(_, entry)| entry.session.is_expired(now))
            .map(|(id, _)| *id)
            .collect()
    }

    pub fn session_count(&self) -> usize {
        self.arena.len()
    }

    pub fn alias_count(&self) -> usize {
        self.aliases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arena.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn session(now: DateTime<Utc>, code: &str) -> Session {
        Session::new(code.to_string(), now, Duration::minutes(10), None, None)
    }

    fn keys(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|k| k.to_string()).collect()
    }

    #[test]
    fn test_aliases_share_one_session() {
        let mut table = SessionTable::new();
        let now = Utc::now();
        let id = table.install(&keys(&["14155550123", "a@b.com"]), session(now, "111111"));

        table.get_mut("a@b.com").unwrap().attempts = 2;
        assert_eq!(table.get("14155550123").unwrap().attempts, 2);
        assert_eq!(table.resolve("14155550123"), Some(id));
        assert_eq!(table.session_count(), 1);
        assert_eq!(table.alias_count(), 2);
    }

    #[test]
    fn test_install_replaces_existing_binding() {
        let mut table = SessionTable::new();
        let now = Utc::now();
        table.install(&keys(&["phone", "mail"]), session(now, "111111"));
        table.install(&keys(&["phone"]), session(now, "222222"));

        assert_eq!(table.get("phone").unwrap().code, "222222");
        // The old session survives under its remaining alias
        assert_eq!(table.get("mail").unwrap().code, "111111");
        assert_eq!(table.session_count(), 2);

        table.install(&keys(&["mail"]), session(now, "333333"));
        assert_eq!(table.session_count(), 2);
    }

    #[test]
    fn test_last_alias_drops_session() {
        let mut table = SessionTable::new();
        let now = Utc::now();
        table.install(&keys(&["phone", "mail"]), session(now, "111111"));

        assert!(table.remove_alias("phone"));
        assert_eq!(table.session_count(), 1);
        assert!(table.remove_alias("mail"));
        assert!(table.is_empty());
        assert!(!table.remove_alias("mail"));
    }

    #[test]
    fn test_remove_session_cascades() {
        let mut table = SessionTable::new();
        let now = Utc::now();
        let id = table.install(&keys(&["phone", "mail"]), session(now, "111111"));

        assert_eq!(table.remove_session(id), 2);
        assert!(table.get("phone").is_none());
        assert!(table.get("mail").is_none());
        assert_eq!(table.alias_count(), 0);
        assert_eq!(table.remove_session(id), 0);
    }

    #[test]
    fn test_expired_ids() {
        let mut table = SessionTable::new();
        let now = Utc::now();
        let old = table.install(&keys(&["old"]), session(now - Duration::minutes(11), "1"));
        table.install(&keys(&["new"]), session(now, "2"));

        assert_eq!(table.expired_ids(now), vec![old]);
    }
}
