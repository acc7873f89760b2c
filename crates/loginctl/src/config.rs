//! CLI configuration: thin wrapper around `login_config` shared types.
//!
//! Re-exports the shared types and adds resolution that respects
//! `GlobalOpts` flag overrides (--api-url, --token, --insecure, --timeout).

use std::time::Duration;

use clap::ValueEnum;
use secrecy::SecretString;

use login_core::{ServiceConfig, TlsVerification};

use crate::cli::{GlobalOpts, OutputFormat};
use crate::error::CliError;

pub use login_config::{
    Config, Defaults, Profile, config_path, load_config, save_config, store_token,
};

/// Resolve the active profile name from CLI flags and config.
pub fn active_profile_name(global: &GlobalOpts, config: &Config) -> String {
    global
        .profile
        .clone()
        .or_else(|| config.default_profile.clone())
        .unwrap_or_else(|| "default".into())
}

/// Fill in `--output` from `defaults.output` when the flag is absent.
pub fn apply_output_default(global: &mut GlobalOpts, cfg: &Config) -> Result<(), CliError> {
    if global.output.is_none() {
        let format = OutputFormat::from_str(&cfg.defaults.output, true).map_err(|_| {
            CliError::Validation {
                field: "defaults.output".into(),
                reason: format!(
                    "unknown output format '{}' (expected table, json, json-compact, yaml, plain)",
                    cfg.defaults.output
                ),
            }
        })?;
        global.output = Some(format);
    }
    Ok(())
}

/// Build the `ServiceConfig` for this invocation.
///
/// Uses the active profile when one exists, with flags taking priority.
/// Without a profile, `--api-url` alone is enough.
pub fn build_service_config(global: &GlobalOpts, cfg: &Config) -> Result<ServiceConfig, CliError> {
    let profile_name = active_profile_name(global, cfg);

    if let Some(profile) = cfg.profiles.get(&profile_name) {
        return resolve_profile(profile, &profile_name, &cfg.defaults, global);
    }

    // An explicitly requested profile must exist.
    if global.profile.is_some() && global.api_url.is_none() {
        return Err(CliError::ProfileNotFound {
            name: profile_name,
            available: available_profiles(cfg),
        });
    }

    let url_str = global.api_url.as_deref().ok_or_else(|| CliError::NoConfig {
        path: config_path().display().to_string(),
    })?;

    Ok(ServiceConfig {
        api_url: parse_api_url(url_str)?,
        token: global.token.clone().map(SecretString::from),
        tls: if global.insecure {
            TlsVerification::DangerAcceptInvalid
        } else {
            TlsVerification::SystemDefaults
        },
        timeout: Duration::from_secs(global.timeout.unwrap_or(cfg.defaults.timeout)),
    })
}

/// Translate a `Profile` + global flags into a `ServiceConfig`.
fn resolve_profile(
    profile: &Profile,
    profile_name: &str,
    defaults: &Defaults,
    global: &GlobalOpts,
) -> Result<ServiceConfig, CliError> {
    let mut service = login_config::profile_to_service_config(profile, profile_name, defaults)?;

    if let Some(ref url_str) = global.api_url {
        service.api_url = parse_api_url(url_str)?;
    }
    if let Some(ref token) = global.token {
        service.token = Some(SecretString::from(token.clone()));
    }
    if global.insecure {
        service.tls = TlsVerification::DangerAcceptInvalid;
    }
    if let Some(secs) = global.timeout {
        service.timeout = Duration::from_secs(secs);
    }

    Ok(service)
}

pub fn parse_api_url(url_str: &str) -> Result<url::Url, CliError> {
    url_str.parse().map_err(|_| CliError::Validation {
        field: "api-url".into(),
        reason: format!("invalid URL: {url_str}"),
    })
}

/// Comma-separated profile names, or `(none)`.
pub fn available_profiles(cfg: &Config) -> String {
    let mut names: Vec<_> = cfg.profiles.keys().cloned().collect();
    if names.is_empty() {
        return "(none)".into();
    }
    names.sort();
    names.join(", ")
}
