//! API credential state.
//!
//! The host application owns the actual key-selection UI; the engine only
//! tracks whether a usable credential is currently selected. The flag is
//! explicit process state rather than an ambient global: unknown until the
//! first check, set by selection, cleared when a generation attempt is
//! denied for billing/permission reasons.

use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use tracing::info;

/// Credential flag lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum KeyState {
    /// Not yet resolved against the host
    #[default]
    Unchecked,
    /// A credential is selected
    Selected,
    /// No usable credential (never selected, or revoked after a denial)
    Missing,
}

impl KeyState {
    pub fn as_str(&self) -> &'static str {
        match self {
            KeyState::Unchecked => "unchecked",
            KeyState::Selected => "selected",
            KeyState::Missing => "missing",
        }
    }
}

/// Host-provided credential integration.
#[async_trait]
pub trait KeyHost: Send + Sync {
    /// Whether the user currently has an API key selected.
    async fn has_selected_key(&self) -> bool;

    /// Open the host's key selection flow. Fire-and-forget.
    async fn open_select_key(&self);
}

/// Process-wide credential flag backed by a [`KeyHost`].
pub struct KeyStore {
    host: Arc<dyn KeyHost>,
    state: RwLock<KeyState>,
}

impl KeyStore {
    pub fn new(host: Arc<dyn KeyHost>) -> Self {
        Self {
            host,
            state: RwLock::new(KeyState::Unchecked),
        }
    }

    /// Resolve the flag against the host.
    pub async fn check(&self) -> bool {
        let has_key = self.host.has_selected_key().await;
        *self.state.write().unwrap() = if has_key {
            KeyState::Selected
        } else {
            KeyState::Missing
        };
        has_key
    }

    /// Send the user through the host's key selection flow.
    ///
    /// The flow is assumed to succeed and the flag set optimistically; a
    /// bad key surfaces later as a permission denial, which revokes it.
    pub async fn select(&self) {
        self.host.open_select_key().await;
        *self.state.write().unwrap() = KeyState::Selected;
    }

    /// Revoke the flag after a permission denial, forcing re-selection.
    pub fn revoke(&self) {
        info!("Credential flag revoked after permission denial");
        *self.state.write().unwrap() = KeyState::Missing;
    }

    pub fn state(&self) -> KeyState {
        *self.state.read().unwrap()
    }

    pub fn is_selected(&self) -> bool {
        self.state() == KeyState::Selected
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, Ordering};

    struct StubHost {
        has_key: bool,
        opened: AtomicBool,
    }

    impl StubHost {
        fn new(has_key: bool) -> Arc<Self> {
            Arc::new(Self {
                has_key,
                opened: AtomicBool::new(false),
            })
        }
    }

    #[async_trait]
    impl KeyHost for StubHost {
        async fn has_selected_key(&self) -> bool {
            self.has_key
        }

        async fn open_select_key(&self) {
            self.opened.store(true, Ordering::SeqCst);
        }
    }

    #[tokio::test]
    async fn test_starts_unchecked_and_check_resolves() {
        let store = KeyStore::new(StubHost::new(true));
        assert_eq!(store.state(), KeyState::Unchecked);
        assert!(!store.is_selected());

        assert!(store.check().await);
        assert_eq!(store.state(), KeyState::Selected);
    }

    #[tokio::test]
    async fn test_check_without_key_is_missing() {
        let store = KeyStore::new(StubHost::new(false));
        assert!(!store.check().await);
        assert_eq!(store.state(), KeyState::Missing);
    }

    #[tokio::test]
    async fn test_select_opens_host_flow_and_sets_flag() {
        let host = StubHost::new(false);
        let store = KeyStore::new(Arc::clone(&host) as Arc<dyn KeyHost>);

        store.select().await;
        assert!(host.opened.load(Ordering::SeqCst));
        assert!(store.is_selected());
    }

    #[tokio::test]
    async fn test_revoke_forces_missing() {
        let store = KeyStore::new(StubHost::new(true));
        store.check().await;
        assert!(store.is_selected());

        store.revoke();
        assert_eq!(store.state(), KeyState::Missing);
    }
}
