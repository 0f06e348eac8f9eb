//! Client-side session handling: a persisted `{token, user}` pair and the
//! auth state machine built on top of it.

pub mod context;
pub mod store;

pub use context::{AuthContext, AuthError, AuthState};
pub use store::{FileSessionStore, MemorySessionStore, Session, SessionError, SessionStore};
