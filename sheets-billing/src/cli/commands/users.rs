use anyhow::{Result, bail};
use clap::Subcommand;
use colored::Colorize;

use super::{parse_body, require};
use crate::cli::{CommandContext, output};
use crate::error::StoreError;
use crate::store::entities::{NewUser, User, UserPatch, UserProfile};

#[derive(Subcommand, Debug)]
pub enum UserCommands {
    /// List users (passwords omitted)
    List {
        /// Only users with this role
        #[arg(long)]
        role: Option<String>,
    },

    /// Show one user by ID, or by email with --email
    Get {
        #[arg(required_unless_present = "email")]
        id: Option<String>,
        #[arg(long, conflicts_with = "id")]
        email: Option<String>,
    },

    /// Create a user. The password must already be hashed.
    Create {
        /// JSON body ({"username", "email", "password", "role", "status"}), or @file
        #[arg(short, long)]
        data: String,
    },

    /// Change fields of a user
    Update {
        id: String,
        #[arg(short, long)]
        data: String,
    },

    /// Set status to inactive
    Deactivate { id: String },

    /// Set status to active
    Activate { id: String },

    /// Replace the stored password hash
    Password {
        id: String,
        /// New password hash
        #[arg(long)]
        hash: String,
    },

    /// Counts by status and role
    Stats,
}

fn profiles(users: &[User]) -> Vec<UserProfile> {
    users.iter().map(User::profile).collect()
}

pub async fn handle(ctx: &CommandContext, cmd: UserCommands) -> Result<()> {
    let store = &ctx.store;

    match cmd {
        UserCommands::List { role } => {
            let users = match role {
                Some(role) => store.users.find_where(|u| u.role == role).await?,
                None => store.users.list_all().await?,
            };
            output::print(&profiles(&users), ctx.format)
        }
        UserCommands::Get { id, email } => {
            let user = match (id, email) {
                (_, Some(email)) => store
                    .find_user_by_email(&email)
                    .await?
                    .ok_or_else(|| StoreError::not_found("Users", email.clone()))?,
                (Some(id), None) => require(&store.users, &id).await?,
                (None, None) => bail!("Either an ID or --email is required"),
            };
            output::print(&user.profile(), ctx.format)
        }
        UserCommands::Create { data } => {
            let draft: NewUser = parse_body(&data)?;
            if store.find_user_by_email(&draft.email).await?.is_some() {
                bail!("A user with email {} already exists", draft.email);
            }
            let user = store.users.create(draft).await?;
            eprintln!("{} {}", "User created:".green(), user.id.bright_white());
            output::print(&user.profile(), ctx.format)
        }
        UserCommands::Update { id, data } => {
            let patch: UserPatch = parse_body(&data)?;
            if let Some(email) = &patch.email {
                let taken = store.find_user_by_email(email).await?;
                if taken.is_some_and(|other| other.id != id) {
                    bail!("A user with email {} already exists", email);
                }
            }
            let user = store.users.update(&id, patch).await?;
            eprintln!("{} {}", "User updated:".green(), id.bright_white());
            output::print(&user.profile(), ctx.format)
        }
        UserCommands::Deactivate { id } => {
            let user = store.deactivate_user(&id).await?;
            eprintln!("{} {}", "User deactivated:".yellow(), id.bright_white());
            output::print(&user.profile(), ctx.format)
        }
        UserCommands::Activate { id } => {
            let user = store.activate_user(&id).await?;
            eprintln!("{} {}", "User activated:".green(), id.bright_white());
            output::print(&user.profile(), ctx.format)
        }
        UserCommands::Password { id, hash } => {
            let user = store.change_password(&id, hash).await?;
            eprintln!("{} {}", "Password changed for:".green(), id.bright_white());
            output::print(&user.profile(), ctx.format)
        }
        UserCommands::Stats => output::print(&store.user_stats().await?, ctx.format),
    }
}
