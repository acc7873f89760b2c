//! Config subcommand handlers.

use owo_colors::OwoColorize;

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts};
use crate::config::{self, Config, Profile};
use crate::error::CliError;
use crate::output;

const REDACTED: &str = "********";

/// Copy of `cfg` with plaintext tokens masked.
fn redacted(mut cfg: Config) -> Config {
    for profile in cfg.profiles.values_mut() {
        if profile.token.is_some() {
            profile.token = Some(REDACTED.into());
        }
    }
    cfg
}

fn success(global: &GlobalOpts, message: &str) {
    if global.quiet {
        return;
    }
    if output::should_color(&global.color) {
        eprintln!("{} {message}", "✓".green());
    } else {
        eprintln!("✓ {message}");
    }
}

// ── Handler ─────────────────────────────────────────────────────────

pub fn handle(args: ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        ConfigCommand::Path => {
            output::print_output(&config::config_path().display().to_string(), global.quiet);
            Ok(())
        }

        ConfigCommand::Show => {
            let cfg = redacted(config::load_config()?);
            let out = toml::to_string_pretty(&cfg).map_err(|e| CliError::Render(e.to_string()))?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        ConfigCommand::Init { keyring } => {
            let api_url = global.api_url.as_deref().ok_or_else(|| CliError::Validation {
                field: "api-url".into(),
                reason: "config init requires --api-url".into(),
            })?;
            config::parse_api_url(api_url)?;

            let mut cfg = config::load_config()?;
            let profile_name = global.profile.clone().unwrap_or_else(|| "default".into());

            let token = match (&global.token, keyring) {
                (Some(token), true) => {
                    config::store_token(&profile_name, token)?;
                    success(global, "Token stored in system keyring");
                    None
                }
                (Some(token), false) => Some(token.clone()),
                (None, true) => {
                    return Err(CliError::Validation {
                        field: "keyring".into(),
                        reason: "--keyring needs a --token to store".into(),
                    });
                }
                (None, false) => None,
            };

            cfg.profiles.insert(
                profile_name.clone(),
                Profile {
                    api_url: api_url.to_owned(),
                    token,
                    insecure: global.insecure.then_some(true),
                    timeout: global.timeout,
                    ..Profile::default()
                },
            );
            if cfg.profiles.len() == 1 {
                cfg.default_profile = Some(profile_name.clone());
            }

            config::save_config(&cfg)?;
            success(
                global,
                &format!(
                    "Profile '{profile_name}' written to {}",
                    config::config_path().display()
                ),
            );
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn show_masks_plaintext_tokens() {
        let mut cfg = Config::default();
        cfg.profiles.insert(
            "default".into(),
            Profile {
                api_url: "https://api.example.com".into(),
                token: Some("s3cret".into()),
                ..Profile::default()
            },
        );
        cfg.profiles.insert(
            "anon".into(),
            Profile {
                api_url: "https://api.example.com".into(),
                ..Profile::default()
            },
        );

        let cfg = redacted(cfg);
        assert_eq!(cfg.profiles["default"].token.as_deref(), Some(REDACTED));
        assert!(cfg.profiles["anon"].token.is_none());
    }
}
