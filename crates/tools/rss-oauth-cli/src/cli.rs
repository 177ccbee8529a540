use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use rss_identity_oauth2::OAuthClient;
use serde_json::{Value, json};
use std::path::PathBuf;

/// Check revenue-sharing logins against the Identity Manager
#[derive(Parser, Debug)]
#[command(name = "rss-oauth")]
#[command(about = "Check revenue-sharing logins against the Identity Manager")]
#[command(version)]
pub struct Args {
    /// Configuration file (defaults to RSS_CONFIG_FILE or rss.toml)
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Log at debug level
    #[arg(short, long)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Print the URL users are redirected to for login
    AuthorizeUrl,

    /// Exchange an authorization code for an access token
    Exchange {
        #[arg(long)]
        code: String,
    },

    /// Exchange a code and check the user's granted role
    Login {
        #[arg(long)]
        code: String,
    },

    /// Validate an access token (bypassed when use_oauth is N)
    CheckToken {
        #[arg(long)]
        token: Option<String>,
    },

    /// List the client applications of an actor
    Applications {
        #[arg(long)]
        token: String,

        #[arg(long)]
        actor_id: String,

        /// Fail unless this client is among the applications
        #[arg(long)]
        verify: bool,
    },

    /// Report whether the token's owner is an administrator
    IsAdmin {
        #[arg(long)]
        token: String,
    },
}

impl Command {
    pub async fn run(&self, client: &OAuthClient) -> Result<Value> {
        match self {
            Command::AuthorizeUrl => {
                let url = client
                    .authorization_url()
                    .context("Failed to build authorization URL")?;
                Ok(json!({ "authorization_url": url.as_str() }))
            }
            Command::Exchange { code } => {
                let session = client.exchange_code_for_token(code).await?;
                Ok(serde_json::to_value(session)?)
            }
            Command::Login { code } => {
                let session = client.complete_login(code).await?;
                Ok(serde_json::to_value(session)?)
            }
            Command::CheckToken { token } => {
                match client.check_authentication_token(token.as_deref()).await? {
                    Some(validated) => Ok(serde_json::to_value(validated)?),
                    None => Ok(json!({ "validated": null })),
                }
            }
            Command::Applications {
                token,
                actor_id,
                verify,
            } => {
                let applications = client.fetch_client_applications(token, actor_id).await?;
                if *verify {
                    client.verify_client_registration(&applications)?;
                }
                Ok(serde_json::to_value(applications)?)
            }
            Command::IsAdmin { token } => {
                let validated = client
                    .fetch_validated_token(token)
                    .await?
                    .unwrap_or_default();
                Ok(json!({
                    "email": validated.email,
                    "is_admin": client.is_admin(&validated),
                }))
            }
        }
    }
}
