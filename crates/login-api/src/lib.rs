// login-api: Async Rust client for the identity service user API

pub mod auth;
pub mod error;
pub mod models;
pub mod transport;
pub mod users;

pub use auth::authentication_challenge;
pub use error::Error;
pub use models::{User, UserAttributes};
pub use transport::{TlsMode, TransportConfig};
pub use users::UsersClient;
