//! Command dispatch: bridges CLI args -> `UserService` calls -> output formatting.

pub mod config_cmd;
pub mod users;
pub mod whoami;

use login_core::{Broadcaster, UserService};

use crate::cli::{Command, GlobalOpts};
use crate::error::CliError;

/// Dispatch an API-bound command to the appropriate handler.
pub async fn dispatch(
    cmd: Command,
    service: &UserService,
    bus: &Broadcaster,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match cmd {
        Command::Whoami => whoami::handle(service, bus, global).await,
        Command::Users(args) => users::handle(service, args, global).await,
        Command::Config(_) | Command::Completions(_) => Err(CliError::Internal(
            "config and completions are handled before dispatch".into(),
        )),
    }
}
