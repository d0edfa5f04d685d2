//! Domain types for the API.
//!
//! These are validated domain objects, kept separate from database row
//! types (which live next to their repositories).

pub mod auth;
pub mod product;
pub mod session;
pub mod store;
pub mod user;

pub use auth::{AuthContext, CurrentUser};
pub use product::Product;
pub use session::Session;
pub use store::Store;
pub use user::User;
