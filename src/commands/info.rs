// commands/info.rs
use crate::error::Error;
use crate::images::{self, Command};
use crate::Data;
use poise::serenity_prelude::{CreateActionRow, CreateAttachment, CreateButton, CreateEmbed, UserId};
use poise::CreateReply;

type Context<'a> = poise::Context<'a, Data, Error>;

const SENKO_IMAGE: &[u8] = include_bytes!("../../assets/senko.png");
const SENKO_FILENAME: &str = "senko.png";

const DESCRIPTION: &str = "Hi, I'm a small bot which delivers you Kitsune, Senko and Fox images.\nI hope you enjoy the images.";
const GITHUB_URL: &str = "https://github.com/TopiSenpai/Kitsune-Bot";
const DISCORD_URL: &str = "https://discord.gg/sD3ABd5";

fn invite_url(bot_id: UserId) -> String {
    format!(
        "https://discord.com/oauth2/authorize?client_id={}&scope=applications.commands",
        bot_id
    )
}

pub fn info_reply(bot_id: UserId) -> CreateReply {
    let embed = CreateEmbed::new()
        .description(DESCRIPTION)
        .color(super::EMBED_COLOR)
        .thumbnail(format!("attachment://{}", SENKO_FILENAME));

    let buttons = vec![
        CreateButton::new_link(GITHUB_URL).label("GitHub"),
        CreateButton::new_link(DISCORD_URL).label("Discord"),
        CreateButton::new_link(invite_url(bot_id)).label("Invite Me"),
    ];

    CreateReply::default()
        .embed(embed)
        .attachment(CreateAttachment::bytes(SENKO_IMAGE, SENKO_FILENAME))
        .components(vec![CreateActionRow::Buttons(buttons)])
}

/// Sends some info about me
#[poise::command(slash_command)]
pub async fn info(ctx: Context<'_>) -> Result<(), Error> {
    let data = ctx.data();
    let payload = images::dispatch(&data.fetcher, &data.config.api, Command::Info).await;

    // Failing to send is only worth a log line, there is nothing left to tell the user.
    if let Err(e) = ctx.send(super::build_reply(payload, ctx.framework().bot_id)).await {
        tracing::error!("Error while sending info message: {}", e);
    }

    Ok(())
}
