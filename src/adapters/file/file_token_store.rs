// Token store backed by a small file, so a CLI session survives between runs.
//
// The file holds the bare token and nothing else. A missing file means
// "signed out".

use crate::core::ports::{SessionError, TokenStore};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};
use tracing::debug;

pub struct FileTokenStore {
    path: PathBuf,
    cached: Mutex<Option<String>>,
}

impl FileTokenStore {
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, SessionError> {
        let path = path.into();
        let cached = match std::fs::read_to_string(&path) {
            Ok(contents) => Some(contents.trim().to_string()).filter(|t| !t.is_empty()),
            Err(error) if error.kind() == ErrorKind::NotFound => None,
            Err(error) => return Err(error.into()),
        };
        debug!(path = %path.display(), signed_in = cached.is_some(), "opened token file");
        Ok(Self {
            path,
            cached: Mutex::new(cached),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn slot(&self) -> MutexGuard<'_, Option<String>> {
        self.cached.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl TokenStore for FileTokenStore {
    fn get(&self) -> Option<String> {
        self.slot().clone()
    }

    fn set(&self, token: &str) -> Result<(), SessionError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.path, token)?;
        *self.slot() = Some(token.to_string());
        Ok(())
    }

    fn clear(&self) -> Result<(), SessionError> {
        *self.slot() = None;
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(error) if error.kind() == ErrorKind::NotFound => Ok(()),
            Err(error) => Err(error.into()),
        }
    }
}

#[cfg(test)]
mod file_token_store_tests {
    use super::*;
    use rstest::{fixture, rstest};
    use std::time::{SystemTime, UNIX_EPOCH};

    #[fixture]
    fn before_each() -> PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_nanos();
        std::env::temp_dir()
            .join(format!("timesheet-token-{}-{nanos}", std::process::id()))
            .join("session")
    }

    #[rstest]
    fn it_should_treat_a_missing_file_as_signed_out(before_each: PathBuf) {
        let store = FileTokenStore::open(&before_each).unwrap();
        assert_eq!(store.get(), None);
    }

    #[rstest]
    fn it_should_persist_the_token_across_instances(before_each: PathBuf) {
        let store = FileTokenStore::open(&before_each).unwrap();
        store.set("tok-123").unwrap();

        let reopened = FileTokenStore::open(&before_each).unwrap();
        assert_eq!(reopened.get().as_deref(), Some("tok-123"));

        reopened.clear().unwrap();
        assert!(!before_each.exists());
        assert_eq!(FileTokenStore::open(&before_each).unwrap().get(), None);
    }

    #[rstest]
    fn it_should_clear_twice_without_failing(before_each: PathBuf) {
        let store = FileTokenStore::open(&before_each).unwrap();
        assert!(store.clear().is_ok());
        assert!(store.clear().is_ok());
    }
}
