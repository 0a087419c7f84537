use std::net::SocketAddr;
use std::sync::Arc;

use clap::Parser;
use inkwell_core::InkwellConfig;
use inkwell_discord::commands::register_commands;
use inkwell_discord::DiscordFollowUp;
use inkwell_gateway::app::{build_router, AppState};
use inkwell_github::GitHubClient;
use tracing::{info, warn};

/// Discord `/post` webhook that publishes to a site repository via pull request.
#[derive(Parser, Debug)]
#[command(name = "inkwell-gateway", version, about)]
struct Cli {
    /// Path to inkwell.toml (falls back to INKWELL_CONFIG, then ~/.inkwell/inkwell.toml).
    #[arg(long, short)]
    config: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "inkwell_gateway=info,inkwell_github=info,inkwell_discord=info,tower_http=debug"
                    .into()
            }),
        )
        .init();

    let cli = Cli::parse();

    // load config: --config > INKWELL_CONFIG env > ~/.inkwell/inkwell.toml
    let config_path = cli
        .config
        .or_else(|| std::env::var("INKWELL_CONFIG").ok());
    let config = InkwellConfig::load(config_path.as_deref())?;

    let addr: SocketAddr = format!("{}:{}", config.server.bind, config.server.port).parse()?;

    let discord_http = reqwest::Client::builder()
        .user_agent(concat!("inkwell/", env!("CARGO_PKG_VERSION")))
        .build()?;

    if config.discord.register_commands {
        if let Err(e) = register_commands(
            &discord_http,
            &config.discord.api_base,
            &config.discord.application_id,
            config.discord.bot_token.as_deref(),
        )
        .await
        {
            warn!(error = %e, "slash command registration failed; continuing");
        }
    }

    if config.discord.authorized_users.is_empty() {
        warn!("discord.authorized_users is empty; every submission will be rejected");
    }

    let github = Arc::new(GitHubClient::from_config(&config.github)?);
    let followups = Arc::new(DiscordFollowUp::new(
        discord_http,
        config.discord.api_base.clone(),
    ));

    info!(
        owner = %config.github.owner,
        repo = %config.github.repo,
        base = %config.github.base_branch,
        "publishing target"
    );

    let state = Arc::new(AppState::new(config, github, followups)?);
    let router = build_router(state);

    info!(
        version = env!("CARGO_PKG_VERSION"),
        git_sha = inkwell_gateway::GIT_SHA,
        "Inkwell gateway listening on {}",
        addr
    );

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router).await?;
    Ok(())
}
