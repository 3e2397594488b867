//! Session state and sync coordination.
//!
//! One optional [`Session`] exists per process. [`SessionCoordinator`] owns
//! it: it restores the provider's persisted session at startup, performs
//! sign-in/sign-up/sign-out transitions, notifies subscribers of every
//! transition, and runs the login-time reconciliation pass that pulls each
//! tracked category (and the custom roster) from the remote tier into the
//! local one. Remote state wins at login; nothing else ever merges.

use async_trait::async_trait;
use crossbeam_channel::{bounded, Receiver, Sender, TrySendError};
use parking_lot::{Mutex, RwLock};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};

use crate::custom::CustomRosterStore;
use crate::progress::ProgressStore;
use crate::remote::Identity;

/// Events delivered on each subscriber channel.
const EVENT_CAPACITY: usize = 64;

/// Errors surfaced by the identity provider.
///
/// These are the only remote failures shown to the user, as a short
/// message with no automatic retry.
#[derive(Debug, Error)]
pub enum AuthError {
    /// The provider rejected the credentials.
    #[error("{0}")]
    InvalidCredentials(String),

    /// The provider could not be reached.
    #[error("sign-in service unreachable: {0}")]
    Network(String),

    /// Any other provider-side failure.
    #[error("{0}")]
    Provider(String),
}

/// Result type for identity operations.
pub type AuthResult<T> = Result<T, AuthError>;

/// An authenticated session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    /// Opaque identity keying this user's remote records.
    pub identity: Identity,
    /// Email the session was established with.
    pub email: String,
}

impl Session {
    /// Create a session.
    pub fn new(identity: Identity, email: impl Into<String>) -> Self {
        Self {
            identity,
            email: email.into(),
        }
    }
}

/// Sign-in / sign-up credentials.
#[derive(Clone)]
pub struct Credentials {
    /// Account email.
    pub email: String,
    /// Account password.
    pub password: String,
}

impl Credentials {
    /// Create credentials.
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Session lifecycle notifications.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionEvent {
    /// Emitted once at startup with whatever session the provider restored.
    Restored(Option<Session>),
    /// A sign-in or sign-up transition completed.
    SignedIn(Session),
    /// The session was discarded.
    SignedOut,
}

/// Identity provider seam.
///
/// The core depends only on session presence and the opaque identity; the
/// provider owns tokens, refresh, and everything else.
#[async_trait]
pub trait AuthProvider: Send + Sync {
    /// The session persisted from a previous run, if any. Synchronous: the
    /// provider reads its own local state here, not the network.
    fn current_session(&self) -> AuthResult<Option<Session>>;

    /// Authenticate with existing credentials.
    async fn sign_in(&self, credentials: &Credentials) -> AuthResult<Session>;

    /// Register a new account and authenticate.
    async fn sign_up(&self, credentials: &Credentials) -> AuthResult<Session>;

    /// Invalidate the current session with the provider.
    async fn sign_out(&self) -> AuthResult<()>;
}

/// Shared read view of the process-wide session.
///
/// The coordinator writes it; the persistence stores read it. Cloning the
/// handle shares the same underlying slot.
#[derive(Debug, Clone, Default)]
pub struct SessionHandle {
    inner: Arc<RwLock<Option<Session>>>,
}

impl SessionHandle {
    /// Create an empty (anonymous) handle.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the current session.
    #[must_use]
    pub fn current(&self) -> Option<Session> {
        self.inner.read().clone()
    }

    /// The current identity, when authenticated.
    #[must_use]
    pub fn identity(&self) -> Option<Identity> {
        self.inner.read().as_ref().map(|s| s.identity.clone())
    }

    /// True while a session is present.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.inner.read().is_some()
    }

    pub(crate) fn set(&self, session: Option<Session>) {
        *self.inner.write() = session;
    }
}

/// Owns the session lifecycle and the login reconciliation flow.
pub struct SessionCoordinator {
    provider: Arc<dyn AuthProvider>,
    handle: SessionHandle,
    store: Arc<ProgressStore>,
    custom: Option<Arc<CustomRosterStore>>,
    tracked: Vec<String>,
    subscribers: Mutex<Vec<Sender<SessionEvent>>>,
}

impl SessionCoordinator {
    /// Create a coordinator. `handle` must be the same handle the stores
    /// were built with, and `tracked` lists the category keys pulled at
    /// login.
    #[must_use]
    pub fn new(
        provider: Arc<dyn AuthProvider>,
        handle: SessionHandle,
        store: Arc<ProgressStore>,
        tracked: Vec<String>,
    ) -> Self {
        Self {
            provider,
            handle,
            store,
            custom: None,
            tracked,
            subscribers: Mutex::new(Vec::new()),
        }
    }

    /// Also reconcile the custom roster at login.
    #[must_use]
    pub fn with_custom_roster(mut self, custom: Arc<CustomRosterStore>) -> Self {
        self.custom = Some(custom);
        self
    }

    /// Snapshot of the current session.
    #[must_use]
    pub fn session(&self) -> Option<Session> {
        self.handle.current()
    }

    /// True while a session is present.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.handle.is_authenticated()
    }

    /// Subscribe to session transitions. The `Restored` event is only seen
    /// by subscribers registered before [`restore`](Self::restore) runs;
    /// late subscribers read the current value via
    /// [`session`](Self::session).
    pub fn subscribe(&self) -> Receiver<SessionEvent> {
        let (sender, receiver) = bounded(EVENT_CAPACITY);
        self.subscribers.lock().push(sender);
        receiver
    }

    /// Restore the provider's persisted session, announce it, and — when
    /// one exists — run the login reconciliation pass. Call once at
    /// startup. A failed restore check degrades to anonymous.
    pub async fn restore(&self) {
        let restored = match self.provider.current_session() {
            Ok(session) => session,
            Err(e) => {
                warn!("session restore check failed: {e}");
                None
            },
        };

        self.handle.set(restored.clone());
        let authenticated = restored.is_some();
        self.publish(SessionEvent::Restored(restored));

        if authenticated {
            info!("restored session, reconciling remote state");
            self.reconcile_all().await;
        }
    }

    /// Sign in. Provider failures are returned to the caller as-is (short
    /// message, no retry); success stores the session, notifies
    /// subscribers, and pulls remote state over local (remote wins at
    /// login).
    pub async fn sign_in(&self, credentials: &Credentials) -> AuthResult<Session> {
        let session = self.provider.sign_in(credentials).await?;
        info!("signed in as {}", session.identity);
        self.handle.set(Some(session.clone()));
        self.publish(SessionEvent::SignedIn(session.clone()));
        self.reconcile_all().await;
        Ok(session)
    }

    /// Register and sign in. Same transition semantics as
    /// [`sign_in`](Self::sign_in).
    pub async fn sign_up(&self, credentials: &Credentials) -> AuthResult<Session> {
        let session = self.provider.sign_up(credentials).await?;
        info!("signed up as {}", session.identity);
        self.handle.set(Some(session.clone()));
        self.publish(SessionEvent::SignedIn(session.clone()));
        self.reconcile_all().await;
        Ok(session)
    }

    /// Sign out: drop the session, clear remote-derived in-memory caches,
    /// and notify subscribers. The local tier is left untouched; a
    /// provider-side failure is logged but never blocks the local
    /// transition.
    pub async fn sign_out(&self) {
        if let Err(e) = self.provider.sign_out().await {
            warn!("provider sign-out failed: {e}");
        }
        self.handle.set(None);
        self.store.clear_cache();
        self.publish(SessionEvent::SignedOut);
        info!("signed out");
    }

    /// Pull every tracked category (and the custom roster) from the remote
    /// tier into the local tier. Remote rows win; categories without a
    /// remote row keep their local state.
    pub async fn reconcile_all(&self) {
        for category in &self.tracked {
            self.store.reconcile(category).await;
        }
        if let Some(custom) = &self.custom {
            custom.pull_remote().await;
        }
    }

    /// Deliver an event to every live subscriber. Slow subscribers lose
    /// events rather than blocking the transition; disconnected ones are
    /// dropped.
    fn publish(&self, event: SessionEvent) {
        let mut subscribers = self.subscribers.lock();
        subscribers.retain(|sender| match sender.try_send(event.clone()) {
            Ok(()) => true,
            Err(TrySendError::Full(_)) => true,
            Err(TrySendError::Disconnected(_)) => false,
        });
    }
}

impl std::fmt::Debug for SessionCoordinator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionCoordinator")
            .field("authenticated", &self.is_authenticated())
            .field("tracked", &self.tracked)
            .field("subscribers", &self.subscribers.lock().len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::progress::ProgressStore;
    use crate::remote::{
        MemoryRecordStore, ProgressRecord, RecordStore, PROGRESS_TABLE,
    };
    use crate::store::LocalStore;
    use ringside_common::completion::CompletionMap;
    use tempfile::TempDir;

    /// Provider with scripted behavior.
    struct MockProvider {
        restored: Option<Session>,
        reject_sign_in: bool,
    }

    impl MockProvider {
        fn anonymous() -> Self {
            Self {
                restored: None,
                reject_sign_in: false,
            }
        }

        fn with_restored(session: Session) -> Self {
            Self {
                restored: Some(session),
                reject_sign_in: false,
            }
        }

        fn rejecting() -> Self {
            Self {
                restored: None,
                reject_sign_in: true,
            }
        }
    }

    #[async_trait]
    impl AuthProvider for MockProvider {
        fn current_session(&self) -> AuthResult<Option<Session>> {
            Ok(self.restored.clone())
        }

        async fn sign_in(&self, credentials: &Credentials) -> AuthResult<Session> {
            if self.reject_sign_in {
                return Err(AuthError::InvalidCredentials(
                    "invalid email or password".to_string(),
                ));
            }
            Ok(Session::new(Identity::new("u1"), credentials.email.clone()))
        }

        async fn sign_up(&self, credentials: &Credentials) -> AuthResult<Session> {
            Ok(Session::new(Identity::new("u-new"), credentials.email.clone()))
        }

        async fn sign_out(&self) -> AuthResult<()> {
            Ok(())
        }
    }

    struct Fixture {
        _dir: TempDir,
        local: LocalStore,
        remote: Arc<MemoryRecordStore>,
        handle: SessionHandle,
        store: Arc<ProgressStore>,
    }

    fn fixture() -> Fixture {
        let dir = TempDir::new().expect("temp dir");
        let local = LocalStore::new(dir.path());
        let remote = Arc::new(MemoryRecordStore::new());
        let handle = SessionHandle::new();
        let store = Arc::new(
            ProgressStore::new(local.clone(), handle.clone())
                .with_remote(Arc::clone(&remote) as Arc<dyn RecordStore>),
        );
        Fixture {
            _dir: dir,
            local,
            remote,
            handle,
            store,
        }
    }

    fn coordinator(fx: &Fixture, provider: MockProvider, tracked: &[&str]) -> SessionCoordinator {
        SessionCoordinator::new(
            Arc::new(provider),
            fx.handle.clone(),
            Arc::clone(&fx.store),
            tracked.iter().map(ToString::to_string).collect(),
        )
    }

    async fn seed_remote(fx: &Fixture, user: &str, category: &str, item: &str) {
        let record = ProgressRecord {
            identity: Identity::new(user),
            category: category.to_string(),
            data: [(item, true)].into_iter().collect(),
            updated_at: 1,
        };
        fx.remote
            .upsert(PROGRESS_TABLE, serde_json::to_value(&record).expect("row"))
            .await
            .expect("seed");
    }

    #[tokio::test]
    async fn test_restore_without_session_announces_anonymous() {
        let fx = fixture();
        let coordinator = coordinator(&fx, MockProvider::anonymous(), &["myrise"]);
        let events = coordinator.subscribe();

        coordinator.restore().await;

        assert!(!coordinator.is_authenticated());
        assert_eq!(events.try_recv(), Ok(SessionEvent::Restored(None)));
    }

    #[tokio::test]
    async fn test_restore_with_session_reconciles_tracked_categories() {
        let fx = fixture();
        seed_remote(&fx, "u1", "myrise", "c1-a").await;
        // Stale local state that must lose at login.
        fx.local
            .write_progress("myrise", &[("c1-stale", true)].into_iter().collect())
            .expect("seed local");

        let session = Session::new(Identity::new("u1"), "u1@example.com");
        let coordinator = coordinator(&fx, MockProvider::with_restored(session.clone()), &["myrise"]);
        let events = coordinator.subscribe();

        coordinator.restore().await;

        assert_eq!(coordinator.session(), Some(session.clone()));
        assert_eq!(events.try_recv(), Ok(SessionEvent::Restored(Some(session))));

        let local = fx.local.read_progress("myrise").expect("local");
        assert!(local.is_complete("c1-a"));
        assert!(!local.is_complete("c1-stale"));
    }

    #[tokio::test]
    async fn test_sign_in_sets_session_and_pulls_remote() {
        let fx = fixture();
        seed_remote(&fx, "u1", "mygm", "gm-p1-1").await;

        let coordinator = coordinator(&fx, MockProvider::anonymous(), &["mygm", "myrise"]);
        let events = coordinator.subscribe();

        let session = coordinator
            .sign_in(&Credentials::new("u1@example.com", "hunter2"))
            .await
            .expect("sign in");

        assert!(coordinator.is_authenticated());
        assert_eq!(session.identity.as_str(), "u1");
        assert_eq!(events.try_recv(), Ok(SessionEvent::SignedIn(session)));

        let local = fx.local.read_progress("mygm").expect("local");
        assert!(local.is_complete("gm-p1-1"));
        // Tracked category with no remote row stays absent locally.
        assert!(!fx.local.exists("myrise-progress"));
    }

    #[tokio::test]
    async fn test_rejected_sign_in_is_surfaced_and_leaves_state_anonymous() {
        let fx = fixture();
        let coordinator = coordinator(&fx, MockProvider::rejecting(), &["myrise"]);
        let events = coordinator.subscribe();

        let err = coordinator
            .sign_in(&Credentials::new("u1@example.com", "wrong"))
            .await
            .expect_err("must reject");

        assert_eq!(err.to_string(), "invalid email or password");
        assert!(!coordinator.is_authenticated());
        assert!(events.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_sign_out_clears_cache_but_not_local_tier() {
        let fx = fixture();
        let coordinator = coordinator(&fx, MockProvider::anonymous(), &["myrise"]);
        let events = coordinator.subscribe();

        coordinator
            .sign_in(&Credentials::new("u1@example.com", "hunter2"))
            .await
            .expect("sign in");
        let _ = events.try_recv();

        let map: CompletionMap = [("c1-a", true)].into_iter().collect();
        fx.store.save("myrise", &map).expect("save");
        assert!(fx.store.cached("myrise").is_some());

        coordinator.sign_out().await;

        assert!(!coordinator.is_authenticated());
        assert_eq!(events.try_recv(), Ok(SessionEvent::SignedOut));
        assert!(fx.store.cached("myrise").is_none());
        // Local tier survives sign-out.
        assert_eq!(fx.local.read_progress("myrise").expect("local"), map);
    }

    #[tokio::test]
    async fn test_sign_up_behaves_like_sign_in() {
        let fx = fixture();
        let coordinator = coordinator(&fx, MockProvider::anonymous(), &[]);

        let session = coordinator
            .sign_up(&Credentials::new("new@example.com", "hunter2"))
            .await
            .expect("sign up");
        assert_eq!(session.identity.as_str(), "u-new");
        assert!(coordinator.is_authenticated());
    }

    #[tokio::test]
    async fn test_event_order_across_full_lifecycle() {
        let fx = fixture();
        let coordinator = coordinator(&fx, MockProvider::anonymous(), &[]);
        let events = coordinator.subscribe();

        coordinator.restore().await;
        coordinator
            .sign_in(&Credentials::new("u1@example.com", "hunter2"))
            .await
            .expect("sign in");
        coordinator.sign_out().await;

        assert_eq!(events.try_recv(), Ok(SessionEvent::Restored(None)));
        assert!(matches!(events.try_recv(), Ok(SessionEvent::SignedIn(_))));
        assert_eq!(events.try_recv(), Ok(SessionEvent::SignedOut));
        assert!(events.try_recv().is_err());
    }

    #[test]
    fn test_credentials_debug_redacts_password() {
        let credentials = Credentials::new("u1@example.com", "hunter2");
        let rendered = format!("{credentials:?}");
        assert!(rendered.contains("u1@example.com"));
        assert!(!rendered.contains("hunter2"));
    }
}
