// commands/random_image.rs
use crate::error::Error;
use crate::images::{self, Command};
use crate::Data;

type Context<'a> = poise::Context<'a, Data, Error>;

async fn send_image(ctx: Context<'_>, command: Command) -> Result<(), Error> {
    ctx.defer().await?;

    let data = ctx.data();
    let payload = images::dispatch(&data.fetcher, &data.config.api, command).await;

    ctx.send(super::build_reply(payload, ctx.framework().bot_id)).await?;

    Ok(())
}

/// Sends a nice random Kitsune
#[poise::command(slash_command)]
pub async fn kitsune(ctx: Context<'_>) -> Result<(), Error> {
    send_image(ctx, Command::Kitsune).await
}

/// Sends a nice random Senko
#[poise::command(slash_command)]
pub async fn senko(ctx: Context<'_>) -> Result<(), Error> {
    send_image(ctx, Command::Senko).await
}

/// Sends a nice random Shiro
#[poise::command(slash_command)]
pub async fn shiro(ctx: Context<'_>) -> Result<(), Error> {
    send_image(ctx, Command::Shiro).await
}

/// Sends a nice random fox tail
#[poise::command(slash_command)]
pub async fn tail(ctx: Context<'_>) -> Result<(), Error> {
    send_image(ctx, Command::Tail).await
}

/// Sends a nice random fox fluff
#[poise::command(slash_command)]
pub async fn fluff(ctx: Context<'_>) -> Result<(), Error> {
    send_image(ctx, Command::Fluff).await
}

/// Sends a nice random Fox
#[poise::command(slash_command)]
pub async fn fox(ctx: Context<'_>) -> Result<(), Error> {
    send_image(ctx, Command::Fox).await
}
