use anyhow::Result;
use clap::Parser;
use rss_identity_oauth2::{IdmHttpClient, OAuthClient};
use rss_oauth_cli::cli::Args;
use rss_oauth_cli::settings::Settings;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    let args = Args::parse();

    let settings = match &args.config {
        Some(path) => Settings::load_from(path)?,
        None => Settings::load()?,
    };

    let filter = if args.verbose {
        "rss_oauth_cli=debug,rss_identity_oauth2=debug".to_string()
    } else {
        settings.log_filter()
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let http = Arc::new(IdmHttpClient::new(settings.http.clone())?);
    let client = OAuthClient::new(settings.oauth.clone(), http.clone())?;

    let result = args.command.run(&client).await;

    drop(client);
    if let Ok(http) = Arc::try_unwrap(http) {
        http.shutdown();
    }

    match result {
        Ok(output) => {
            println!("{}", serde_json::to_string_pretty(&output)?);
            Ok(())
        }
        Err(e) => {
            eprintln!("Error: {:#}", e);
            std::process::exit(1);
        }
    }
}
