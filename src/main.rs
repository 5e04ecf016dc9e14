// main.rs
mod commands;
mod config;
mod error;
mod events;
mod images;
mod log_webhook;

use crate::config::Config;
use crate::error::Error;
use crate::images::HttpFetcher;
use crate::log_webhook::WebhookLayer;
use poise::serenity_prelude as serenity;
use serenity::{GatewayIntents, ShardManager};
use std::sync::Arc;
use std::time::Duration;
use tracing::Level;
use tracing_subscriber::{filter::LevelFilter, fmt, prelude::*};

#[derive(Clone)]
pub struct Data {
    pub config: Arc<Config>,
    pub fetcher: HttpFetcher,
}

async fn wait_for_shutdown(shard_manager: Arc<ShardManager>) {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};

        match signal(SignalKind::terminate()) {
            Ok(mut terminate) => {
                tokio::select! {
                    _ = tokio::signal::ctrl_c() => {}
                    _ = terminate.recv() => {}
                }
            }
            Err(e) => {
                tracing::warn!("Could not listen for SIGTERM: {}", e);
                let _ = tokio::signal::ctrl_c().await;
            }
        }
    }
    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }

    tracing::info!("Shutting down...");
    shard_manager.shutdown_all().await;
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    let config = Config::load().await?;

    let (webhook_layer, log_lines) = match config.log_webhook_url {
        Some(_) => {
            let (layer, receiver) = WebhookLayer::new();
            (Some(layer), Some(receiver))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(LevelFilter::from_level(config.max_level().unwrap_or(Level::INFO)))
        .with(fmt::layer())
        .with(webhook_layer)
        .init();

    if let (Some(receiver), Some(url)) = (log_lines, config.log_webhook_url.clone()) {
        tokio::spawn(log_webhook::forward(receiver, url));
        tracing::info!("Shipping logs to the configured webhook");
    }
    if config.max_level().is_none() {
        tracing::warn!("Unknown log level {:?}, falling back to info", config.log_level);
    }

    tracing::info!("Starting Kitsune-Bot...");

    let fetcher = HttpFetcher::new(Duration::from_secs(config.request_timeout_secs))?;
    let data = Data {
        config: Arc::new(config),
        fetcher,
    };
    let token = data.config.bot_token.clone();

    let framework = poise::Framework::builder()
        .options(poise::FrameworkOptions {
            commands: commands::get_commands(),
            on_error: |error| Box::pin(events::on_error(error)),
            pre_command: |ctx| {
                Box::pin(async move {
                    tracing::info!("Invoke command: {}", ctx.command().name);
                })
            },
            event_handler: |ctx, event, framework, data| {
                Box::pin(events::handle_event(ctx, event, framework, data))
            },
            ..Default::default()
        })
        .setup(move |ctx, _ready, framework| {
            Box::pin(async move {
                poise::builtins::register_globally(ctx, &framework.options().commands).await?;
                tracing::info!(
                    "Registered {} global commands",
                    framework.options().commands.len()
                );

                Ok(data)
            })
        })
        .build();

    let mut client = serenity::ClientBuilder::new(&token, GatewayIntents::non_privileged())
        .framework(framework)
        .await?;

    tokio::spawn(wait_for_shutdown(client.shard_manager.clone()));

    tracing::info!("Bot is now running. Press CTRL-C to exit.");
    client.start_autosharded().await.map_err(Error::from)
}
