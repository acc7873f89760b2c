//! User lookup command handlers.

use owo_colors::OwoColorize;
use tabled::Tabled;

use login_core::{User, UserService};

use crate::cli::{GlobalOpts, UsersArgs, UsersCommand};
use crate::error::CliError;
use crate::output;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct UserRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Username")]
    username: String,
    #[tabled(rename = "Name")]
    full_name: String,
    #[tabled(rename = "Email")]
    email: String,
}

impl From<&User> for UserRow {
    fn from(u: &User) -> Self {
        Self {
            id: u.id.clone(),
            username: u.attributes.username.clone(),
            full_name: u.attributes.full_name.clone(),
            email: u.attributes.email.clone().unwrap_or_default(),
        }
    }
}

// ── Detail view ─────────────────────────────────────────────────────

/// Key/value detail block for a single user.
pub fn user_detail(user: &User, color: bool) -> String {
    let attrs = &user.attributes;
    let mut fields: Vec<(&str, String)> = vec![
        ("ID", user.id.clone()),
        ("Username", attrs.username.clone()),
        ("Name", attrs.full_name.clone()),
    ];
    let optional = [
        ("Email", attrs.email.clone()),
        (
            "Verified",
            attrs.email_verified.map(|v| if v { "yes" } else { "no" }.into()),
        ),
        ("Company", attrs.company.clone()),
        ("URL", attrs.url.clone()),
        ("Cluster", attrs.cluster.clone()),
        ("Created", attrs.created_at.clone()),
    ];
    fields.extend(optional.into_iter().filter_map(|(k, v)| v.map(|v| (k, v))));
    if !attrs.image_url.is_empty() {
        fields.push(("Image", attrs.image_url.clone()));
    }

    fields
        .into_iter()
        .map(|(label, value)| {
            let label = format!("{label}:");
            if color {
                format!("{:<10} {value}", label.bold())
            } else {
                format!("{label:<10} {value}")
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Print one user in the selected output format.
pub fn print_user(user: &User, global: &GlobalOpts) -> Result<(), CliError> {
    let color = output::should_color(&global.color);
    let out = output::render_single(
        &global.output_format(),
        user,
        |u| user_detail(u, color),
        |u| u.id.clone(),
    )?;
    output::print_output(&out, global.quiet);
    Ok(())
}

fn print_users(users: &[User], global: &GlobalOpts) -> Result<(), CliError> {
    let out = output::render_list(
        &global.output_format(),
        users,
        |u| UserRow::from(u),
        |u| u.id.clone(),
    )?;
    output::print_output(&out, global.quiet);
    Ok(())
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    service: &UserService,
    args: UsersArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        UsersCommand::Get { id } => {
            let user = service.get_user_by_user_id(&id).await?;
            print_user(&user, global)
        }

        UsersCommand::Find { username } => {
            let user = service
                .get_user_by_username(&username)
                .await?
                .ok_or(CliError::UserNotFound {
                    identifier: username,
                })?;
            print_user(&user, global)
        }

        UsersCommand::List => {
            let users = service.get_all_users().await?;
            print_users(&users, global)
        }

        UsersCommand::Search { query } => {
            let users = service.search_users(&query).await?;
            print_users(&users, global)
        }

        UsersCommand::VerifyEmail => {
            service.send_email_verification_link().await?;
            if !global.quiet {
                eprintln!("Verification email requested");
            }
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use login_core::UserAttributes;

    #[test]
    fn detail_skips_absent_fields() {
        let user = User {
            id: "userId".into(),
            kind: "identities".into(),
            attributes: UserAttributes {
                username: "myUser".into(),
                full_name: "name".into(),
                email: Some("me@example.com".into()),
                ..UserAttributes::default()
            },
        };

        let detail = user_detail(&user, false);
        assert!(detail.contains("ID:        userId"));
        assert!(detail.contains("Email:     me@example.com"));
        assert!(!detail.contains("Company"));
        assert!(!detail.contains("Image"));
    }
}
