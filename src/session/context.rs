use thiserror::Error;
use tracing::{debug, warn};

use crate::{
    auth::dto::{AuthResponse, PublicUser},
    client::{ApiClient, ClientError},
};

use super::store::{Session, SessionError, SessionStore};

#[derive(Debug, Error)]
pub enum AuthError {
    #[error(transparent)]
    Client(#[from] ClientError),

    #[error(transparent)]
    Session(#[from] SessionError),

    #[error("not signed in")]
    NotSignedIn,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthState {
    Loading,
    Authenticated(Session),
    Anonymous,
}

/// Holds the current session and mirrors it into a [`SessionStore`].
pub struct AuthContext<S: SessionStore> {
    store: S,
    state: AuthState,
}

impl<S: SessionStore> AuthContext<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            state: AuthState::Loading,
        }
    }

    /// Construct and immediately [`mount`](Self::mount).
    pub fn load(store: S) -> Self {
        let mut ctx = Self::new(store);
        ctx.mount();
        ctx
    }

    /// Read the persisted session. Unreadable data is discarded.
    pub fn mount(&mut self) -> &AuthState {
        self.state = match self.store.load() {
            Ok(Some(session)) => {
                debug!(user_id = %session.user.id, "restored session");
                AuthState::Authenticated(session)
            }
            Ok(None) => AuthState::Anonymous,
            Err(e @ SessionError::Corrupt(_)) => {
                warn!(error = %e, "saved session is unreadable; discarding");
                if let Err(e) = self.store.clear() {
                    warn!(error = %e, "failed to discard saved session");
                }
                AuthState::Anonymous
            }
            // left in place: only a corrupt document is discarded
            Err(e @ SessionError::Io(_)) => {
                warn!(error = %e, "failed to read saved session");
                AuthState::Anonymous
            }
        };
        &self.state
    }

    pub fn state(&self) -> &AuthState {
        &self.state
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.state, AuthState::Loading)
    }

    pub fn session(&self) -> Option<&Session> {
        match &self.state {
            AuthState::Authenticated(s) => Some(s),
            _ => None,
        }
    }

    pub fn user(&self) -> Option<&PublicUser> {
        self.session().map(|s| &s.user)
    }

    /// Gate for protected views.
    pub fn require_session(&self) -> Result<&Session, AuthError> {
        self.session().ok_or(AuthError::NotSignedIn)
    }

    /// On failure neither the in-memory state nor the store is touched.
    pub async fn sign_in(
        &mut self,
        client: &ApiClient,
        email: &str,
        password: &str,
    ) -> Result<&Session, AuthError> {
        let resp = client.sign_in(email, password).await?;
        self.establish(resp)
    }

    pub async fn sign_up(
        &mut self,
        client: &ApiClient,
        email: &str,
        password: &str,
        name: &str,
    ) -> Result<&Session, AuthError> {
        let resp = client.sign_up(email, password, name).await?;
        self.establish(resp)
    }

    fn establish(&mut self, resp: AuthResponse) -> Result<&Session, AuthError> {
        let session = Session {
            token: resp.token,
            user: resp.user,
        };
        self.store.save(&session)?;
        self.state = AuthState::Authenticated(session);
        self.require_session()
    }

    /// Local only; the server keeps no session to invalidate.
    pub fn sign_out(&mut self) {
        self.state = AuthState::Anonymous;
        if let Err(e) = self.store.clear() {
            warn!(error = %e, "failed to clear saved session");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        session::store::{FileSessionStore, MemorySessionStore},
        testing::spawn_server,
    };
    use std::cell::Cell;
    use uuid::Uuid;

    fn stored(user_email: &str) -> Session {
        Session {
            token: "tok".into(),
            user: PublicUser {
                id: Uuid::new_v4(),
                email: user_email.into(),
                name: "A".into(),
            },
        }
    }

    #[test]
    fn starts_loading_until_mounted() {
        let store = MemorySessionStore::new();
        let mut ctx = AuthContext::new(&store);
        assert!(ctx.is_loading());
        assert_eq!(ctx.mount(), &AuthState::Anonymous);
    }

    #[test]
    fn mount_restores_saved_session() {
        let store = MemorySessionStore::new();
        let session = stored("a@b.com");
        store.save(&session).unwrap();

        let ctx = AuthContext::load(&store);
        assert_eq!(ctx.session(), Some(&session));
        assert_eq!(ctx.user().map(|u| u.email.as_str()), Some("a@b.com"));
    }

    #[test]
    fn mount_discards_corrupt_session() {
        let store = MemorySessionStore::with_raw("{not json");
        let ctx = AuthContext::load(&store);

        assert_eq!(ctx.state(), &AuthState::Anonymous);
        assert!(store.raw().is_none());
        assert!(matches!(ctx.require_session(), Err(AuthError::NotSignedIn)));
    }

    /// Every read fails with an io error; counts clears.
    #[derive(Default)]
    struct UnreadableStore {
        clears: Cell<usize>,
    }

    impl SessionStore for UnreadableStore {
        fn load(&self) -> Result<Option<Session>, SessionError> {
            Err(std::io::Error::from(std::io::ErrorKind::PermissionDenied).into())
        }

        fn save(&self, _session: &Session) -> Result<(), SessionError> {
            Ok(())
        }

        fn clear(&self) -> Result<(), SessionError> {
            self.clears.set(self.clears.get() + 1);
            Ok(())
        }
    }

    #[test]
    fn mount_keeps_session_it_could_not_read() {
        let store = UnreadableStore::default();
        let ctx = AuthContext::load(&store);

        assert_eq!(ctx.state(), &AuthState::Anonymous);
        assert_eq!(store.clears.get(), 0);
    }

    #[test]
    fn mount_keeps_session_file_on_io_error() {
        // a directory where the session file should be
        let dir = tempfile::tempdir().unwrap();
        let store = FileSessionStore::new(dir.path());
        let ctx = AuthContext::load(&store);

        assert_eq!(ctx.state(), &AuthState::Anonymous);
        assert!(dir.path().is_dir());
    }

    #[test]
    fn sign_out_clears_memory_and_storage() {
        let store = MemorySessionStore::new();
        store.save(&stored("a@b.com")).unwrap();
        let mut ctx = AuthContext::load(&store);

        ctx.sign_out();
        assert_eq!(ctx.state(), &AuthState::Anonymous);
        assert!(store.raw().is_none());

        // idempotent
        ctx.sign_out();
        assert_eq!(ctx.state(), &AuthState::Anonymous);
    }

    #[tokio::test]
    async fn failed_sign_in_leaves_state_untouched() {
        let client = ApiClient::new(&spawn_server().await);
        client.sign_up("a@b.com", "right", "A").await.unwrap();

        let store = MemorySessionStore::new();
        let previous = stored("someone@else.com");
        store.save(&previous).unwrap();
        let before_raw = store.raw();
        let mut ctx = AuthContext::load(&store);

        let err = ctx.sign_in(&client, "a@b.com", "wrong").await.unwrap_err();
        assert_eq!(err.to_string(), "Invalid email or password");
        assert_eq!(ctx.session(), Some(&previous));
        assert_eq!(store.raw(), before_raw);
    }

    #[tokio::test]
    async fn sign_in_persists_session() {
        let client = ApiClient::new(&spawn_server().await);
        client.sign_up("a@b.com", "x", "A").await.unwrap();

        let store = MemorySessionStore::new();
        let mut ctx = AuthContext::load(&store);
        let session = ctx.sign_in(&client, "a@b.com", "x").await.unwrap().clone();

        assert!(!session.token.is_empty());
        assert_eq!(session.user.name, "A");

        // a fresh context over the same storage picks it up
        let again = AuthContext::load(&store);
        assert_eq!(again.session(), Some(&session));
    }

    #[tokio::test]
    async fn sign_up_signs_in() {
        let client = ApiClient::new(&spawn_server().await);
        let store = MemorySessionStore::new();
        let mut ctx = AuthContext::load(&store);

        ctx.sign_up(&client, "new@b.com", "x", "New").await.unwrap();
        assert_eq!(ctx.user().unwrap().email, "new@b.com");
        assert!(store.raw().is_some());

        let err = ctx.sign_up(&client, "new@b.com", "x", "New").await.unwrap_err();
        assert_eq!(err.to_string(), "Email already in use");
    }
}
