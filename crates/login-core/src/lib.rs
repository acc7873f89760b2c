//! Reactive service layer between `login-api` and its consumers.
//!
//! - **[`Broadcaster`]**: process-wide publish/subscribe bus for named
//!   application events (`loggedin`, `logout`, `authenticationError`).
//!   Consumers depend on the narrow [`EventBus`] trait, not the concrete bus.
//!
//! - **[`UserService`]**: keeps the current logged-in user as a `watch`
//!   value driven by login/logout events, and resolves users by id or
//!   username. Authentication challenges from the API are re-published
//!   on the bus as `authenticationError`.
//!
//! - **[`UserStream`]**: subscription handle for the current user.
//!   Exposes `current()` / `latest()` / `changed()` and a `Stream` adapter.

pub mod bus;
pub mod config;
pub mod error;
pub mod service;
pub mod stream;

// ── Primary re-exports ──────────────────────────────────────────────
pub use bus::{AppEvent, Broadcaster, BusEvent, EventBus, EventSubscription};
pub use config::{ServiceConfig, TlsVerification};
pub use error::CoreError;
pub use service::UserService;
pub use stream::UserStream;

pub use login_api::{User, UserAttributes};
