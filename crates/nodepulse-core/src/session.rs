// ── Persisted client state ──
//
// The panel persists exactly two client-side values across restarts: the
// session token and the dark-mode flag. `StateStore` is that storage
// surface; the file-backed implementation lives in nodepulse-config, and
// tests use the in-memory one. Persistence failures are logged, never
// surfaced — losing a preference write must not break the panel.

use std::sync::Mutex;

use secrecy::SecretString;

/// Client-side persistent state: the sole source of "am I logged in" and
/// "which theme" at startup.
pub trait StateStore: Send + Sync + 'static {
    /// The persisted session token, if any.
    fn load_token(&self) -> Option<SecretString>;

    /// Persist the session token.
    fn save_token(&self, token: &SecretString);

    /// Remove the persisted token (logout, or bootstrap rejection).
    fn clear_token(&self);

    /// The persisted dark-mode preference (default false).
    fn load_dark_mode(&self) -> bool;

    /// Persist the dark-mode preference.
    fn save_dark_mode(&self, enabled: bool);
}

impl<S: StateStore> StateStore for std::sync::Arc<S> {
    fn load_token(&self) -> Option<SecretString> {
        (**self).load_token()
    }

    fn save_token(&self, token: &SecretString) {
        (**self).save_token(token);
    }

    fn clear_token(&self) {
        (**self).clear_token();
    }

    fn load_dark_mode(&self) -> bool {
        (**self).load_dark_mode()
    }

    fn save_dark_mode(&self, enabled: bool) {
        (**self).save_dark_mode(enabled);
    }
}

/// In-memory store for tests and ephemeral sessions.
#[derive(Default)]
pub struct MemoryStateStore {
    inner: Mutex<MemoryState>,
}

#[derive(Default)]
struct MemoryState {
    token: Option<String>,
    dark_mode: bool,
}

impl MemoryStateStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a token, as if a previous session had persisted one.
    pub fn with_token(token: &str) -> Self {
        let store = Self::default();
        store.inner.lock().expect("state lock poisoned").token = Some(token.to_owned());
        store
    }

    /// Whether a token is currently persisted (test observability).
    pub fn has_token(&self) -> bool {
        self.inner.lock().expect("state lock poisoned").token.is_some()
    }
}

impl StateStore for MemoryStateStore {
    fn load_token(&self) -> Option<SecretString> {
        self.inner
            .lock()
            .expect("state lock poisoned")
            .token
            .clone()
            .map(SecretString::from)
    }

    fn save_token(&self, token: &SecretString) {
        use secrecy::ExposeSecret;
        self.inner.lock().expect("state lock poisoned").token =
            Some(token.expose_secret().to_owned());
    }

    fn clear_token(&self) {
        self.inner.lock().expect("state lock poisoned").token = None;
    }

    fn load_dark_mode(&self) -> bool {
        self.inner.lock().expect("state lock poisoned").dark_mode
    }

    fn save_dark_mode(&self, enabled: bool) {
        self.inner.lock().expect("state lock poisoned").dark_mode = enabled;
    }
}
