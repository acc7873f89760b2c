//! Clap derive structures for the `loginctl` CLI.
//!
//! Defines the command tree, global flags, and shared types.

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// loginctl -- look up identity users from the command line
#[derive(Debug, Parser)]
#[command(
    name = "loginctl",
    version,
    about = "Query identity users and the logged-in account",
    long_about = "A small client for an identity users API.\n\n\
        Resolves users by id or username, lists and searches them, and\n\
        shows the account the configured token belongs to.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Configuration profile to use
    #[arg(long, short = 'p', env = "LOGIN_PROFILE", global = true)]
    pub profile: Option<String>,

    /// API base URL (overrides profile)
    #[arg(long, env = "LOGIN_API_URL", global = true)]
    pub api_url: Option<String>,

    /// Bearer token (overrides profile and keyring)
    #[arg(long, env = "LOGIN_TOKEN", global = true, hide_env_values = true)]
    pub token: Option<String>,

    /// Output format [default: `defaults.output` from config, else table]
    #[arg(long, short = 'o', env = "LOGIN_OUTPUT", global = true)]
    pub output: Option<OutputFormat>,

    /// When to use color output
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorMode,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Accept invalid TLS certificates
    #[arg(long, short = 'k', env = "LOGIN_INSECURE", global = true)]
    pub insecure: bool,

    /// Request timeout in seconds (overrides profile)
    #[arg(long, env = "LOGIN_TIMEOUT", global = true)]
    pub timeout: Option<u64>,
}

impl GlobalOpts {
    /// The selected output format, falling back to a table.
    pub fn output_format(&self) -> OutputFormat {
        self.output.clone().unwrap_or(OutputFormat::Table)
    }
}

// ── Output & Color Enums ─────────────────────────────────────────────

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
    /// Plain text, one value per line (scripting)
    Plain,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum ColorMode {
    /// Auto-detect (color if terminal is interactive)
    Auto,
    /// Always emit color codes
    Always,
    /// Never emit color codes
    Never,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Show the account the configured token belongs to
    Whoami,

    /// Look up identity users
    #[command(alias = "u")]
    Users(UsersArgs),

    /// Manage CLI configuration and profiles
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ── Users ────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct UsersArgs {
    #[command(subcommand)]
    pub command: UsersCommand,
}

#[derive(Debug, Subcommand)]
pub enum UsersCommand {
    /// Get a user by id
    Get {
        /// User id
        id: String,
    },

    /// Find a user by exact username (email addresses allowed)
    Find {
        /// Username to match
        username: String,
    },

    /// List all visible users
    #[command(alias = "ls")]
    List,

    /// Free-text user search
    Search {
        /// Search query
        query: String,
    },

    /// Re-send the email verification link for the current account
    VerifyEmail,
}

// ── Config ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Print the config file path
    Path,

    /// Show the resolved configuration (tokens redacted)
    Show,

    /// Create or replace a profile from --api-url / --token / --profile
    Init {
        /// Store the token in the system keyring instead of the config file
        #[arg(long)]
        keyring: bool,
    },
}

// ── Completions ──────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn command_tree_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "loginctl", "users", "get", "abc", "-o", "json", "--api-url", "http://x",
        ])
        .unwrap_or_else(|e| panic!("{e}"));
        assert!(matches!(cli.global.output, Some(OutputFormat::Json)));
        assert_eq!(cli.global.api_url.as_deref(), Some("http://x"));
        assert!(matches!(cli.global.output_format(), OutputFormat::Json));
        match cli.command {
            Command::Users(UsersArgs {
                command: UsersCommand::Get { id },
            }) => assert_eq!(id, "abc"),
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn output_flag_is_optional() {
        let cli = Cli::try_parse_from(["loginctl", "whoami"]).unwrap_or_else(|e| panic!("{e}"));
        if std::env::var_os("LOGIN_OUTPUT").is_none() {
            assert!(cli.global.output.is_none());
            assert!(matches!(cli.global.output_format(), OutputFormat::Table));
        }
    }
}
