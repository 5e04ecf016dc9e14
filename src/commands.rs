// commands.rs
mod info;
mod random_image;

use crate::error::Error;
use crate::images::ReplyPayload;
use crate::Data;
use poise::serenity_prelude::{CreateEmbed, UserId};
use poise::CreateReply;

pub const EMBED_COLOR: u32 = 0xFC9803;

pub fn get_commands() -> Vec<poise::Command<Data, Error>> {
    vec![
        random_image::kitsune(),
        random_image::senko(),
        random_image::shiro(),
        random_image::tail(),
        random_image::fluff(),
        random_image::fox(),
        info::info(),
    ]
}

/// Turns a dispatcher outcome into the message we answer the interaction with.
pub fn build_reply(payload: ReplyPayload, bot_id: UserId) -> CreateReply {
    match payload {
        ReplyPayload::Image(url) => {
            CreateReply::default().embed(CreateEmbed::new().color(EMBED_COLOR).image(url))
        }
        ReplyPayload::Error(message) => CreateReply::default().content(message),
        ReplyPayload::Info => info::info_reply(bot_id),
    }
}
