use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

/// Key under which the session JWT is stored.
pub const TOKEN_KEY: &str = "medmarket.authToken";

/// Small persistent key/value store, one JSON file per profile.
///
/// Only the session token is ever written to it; everything else is
/// refetched from the backend on each run.
pub struct TokenStore {
    path: PathBuf,
}

impl TokenStore {
    pub fn new(dir: &Path, profile: &str) -> Self {
        Self {
            path: dir.join(format!("session.{profile}.json")),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> Result<BTreeMap<String, String>> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }
        let content = fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read {}", self.path.display()))?;
        if content.trim().is_empty() {
            return Ok(BTreeMap::new());
        }
        serde_json::from_str(&content)
            .with_context(|| format!("Corrupt session file {}", self.path.display()))
    }

    fn write_all(&self, entries: &BTreeMap<String, String>) -> Result<()> {
        if let Some(dir) = self.path.parent() {
            fs::create_dir_all(dir)?;
        }
        let content = serde_json::to_string_pretty(entries)?;
        fs::write(&self.path, content)?;
        Ok(())
    }

    pub fn load_token(&self) -> Result<Option<String>> {
        Ok(self.read_all()?.remove(TOKEN_KEY).filter(|t| !t.is_empty()))
    }

    pub fn save_token(&self, token: &str) -> Result<()> {
        let mut entries = self.read_all().unwrap_or_default();
        entries.insert(TOKEN_KEY.to_string(), token.to_string());
        self.write_all(&entries)
    }

    /// Remove the token. Returns whether one was stored.
    pub fn clear_token(&self) -> Result<bool> {
        let mut entries = match self.read_all() {
            Ok(entries) => entries,
            Err(e) => {
                tracing::warn!(error = %e, "Discarding unreadable session file");
                fs::remove_file(&self.path)?;
                return Ok(true);
            }
        };
        let had_token = entries.remove(TOKEN_KEY).is_some();
        if entries.is_empty() {
            if self.path.exists() {
                fs::remove_file(&self.path)?;
            }
        } else {
            self.write_all(&entries)?;
        }
        Ok(had_token)
    }
}

/// Short, non-reversible preview of a token for display.
pub fn token_preview(token: &str) -> String {
    if token.len() > 20 && token.is_ascii() {
        format!("{}...{}", &token[..8], &token[token.len() - 8..])
    } else {
        "(hidden)".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_means_logged_out() {
        let dir = tempfile::tempdir().unwrap();
        let store = TokenStore::new(dir.path(), "default");
        assert_eq!(store.load_token().unwrap(), None);
        assert!(!store.clear_token().unwrap());
    }

    #[test]
    fn test_token_round_trip_under_fixed_key() {
        let dir = tempfile::tempdir().unwrap();
        let store = TokenStore::new(dir.path(), "default");
        store.save_token("jwt-abc").unwrap();

        assert_eq!(store.load_token().unwrap().as_deref(), Some("jwt-abc"));
        let raw: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(store.path()).unwrap()).unwrap();
        assert_eq!(raw[TOKEN_KEY], "jwt-abc");
    }

    #[test]
    fn test_profiles_are_isolated() {
        let dir = tempfile::tempdir().unwrap();
        TokenStore::new(dir.path(), "a").save_token("one").unwrap();
        assert_eq!(TokenStore::new(dir.path(), "b").load_token().unwrap(), None);
    }

    #[test]
    fn test_clear_removes_file() {
        let dir = tempfile::tempdir().unwrap();
        let store = TokenStore::new(dir.path(), "default");
        store.save_token("jwt").unwrap();
        assert!(store.clear_token().unwrap());
        assert!(!store.path().exists());
        assert_eq!(store.load_token().unwrap(), None);
    }

    #[test]
    fn test_corrupt_file_is_reported_then_clearable() {
        let dir = tempfile::tempdir().unwrap();
        let store = TokenStore::new(dir.path(), "default");
        fs::write(store.path(), "{ not json").unwrap();
        assert!(store.load_token().is_err());
        assert!(store.clear_token().unwrap());
        assert!(!store.path().exists());
    }

    #[test]
    fn test_token_preview() {
        assert_eq!(
            token_preview("eyJhbGciOiJIUzI1NiJ9.payload.signature"),
            "eyJhbGci...ignature"
        );
        assert_eq!(token_preview("short"), "(hidden)");
    }
}
