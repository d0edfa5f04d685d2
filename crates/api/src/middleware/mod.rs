//! Request middleware and extractors.

pub mod auth;

pub use auth::{RequireAuth, RequireSession, SESSION_COOKIE_NAME};
