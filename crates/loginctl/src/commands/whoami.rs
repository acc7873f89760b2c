//! `whoami`: load the logged-in account.
//!
//! Subscribes to `authenticationError` before running the login flow so a
//! challenge is reported even when the caller only sees an error.

use login_core::{AppEvent, Broadcaster, UserService};
use tracing::{debug, info};

use crate::cli::GlobalOpts;
use crate::error::CliError;

use super::users;

pub async fn handle(
    service: &UserService,
    bus: &Broadcaster,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let mut auth_errors = bus.on(AppEvent::AuthenticationError);

    let result = service.handle_logged_in().await;
    if let Some(event) = auth_errors.try_recv() {
        info!(payload = %event.payload, "authentication challenge received");
    }
    let user = result?;

    debug!(user_id = %user.id, "current user resolved");
    users::print_user(&user, global)
}
