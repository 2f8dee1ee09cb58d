use crate::core::ports::{SessionError, TokenStore};
use std::sync::{Mutex, MutexGuard};

#[derive(Default)]
pub struct InMemoryTokenStore {
    token: Mutex<Option<String>>,
}

impl InMemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(token: &str) -> Self {
        Self {
            token: Mutex::new(Some(token.to_string())),
        }
    }

    fn slot(&self) -> MutexGuard<'_, Option<String>> {
        self.token.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl TokenStore for InMemoryTokenStore {
    fn get(&self) -> Option<String> {
        self.slot().clone()
    }

    fn set(&self, token: &str) -> Result<(), SessionError> {
        *self.slot() = Some(token.to_string());
        Ok(())
    }

    fn clear(&self) -> Result<(), SessionError> {
        *self.slot() = None;
        Ok(())
    }
}

#[cfg(test)]
mod in_memory_token_store_tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn it_should_start_empty() {
        assert_eq!(InMemoryTokenStore::new().get(), None);
    }

    #[rstest]
    fn it_should_replace_and_clear_the_token() {
        let store = InMemoryTokenStore::with_token("first");
        store.set("second").unwrap();
        assert_eq!(store.get().as_deref(), Some("second"));
        store.clear().unwrap();
        assert_eq!(store.get(), None);
    }
}
