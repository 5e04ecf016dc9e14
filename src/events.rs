// events.rs
use crate::commands;
use crate::error::Error;
use crate::images::{self, Command};
use crate::Data;
use poise::serenity_prelude::{
    CommandInteraction, Context, CreateInteractionResponse, CreateInteractionResponseMessage,
    EditInteractionResponse, FullEvent, Ready,
};
use poise::FrameworkContext;

pub async fn handle_event(
    _ctx: &Context,
    event: &FullEvent,
    _framework: FrameworkContext<'_, Data, Error>,
    _data: &Data,
) -> Result<(), Error> {
    if let FullEvent::Ready { data_about_bot } = event {
        handle_ready(data_about_bot);
    }
    Ok(())
}

fn handle_ready(ready: &Ready) {
    tracing::info!(
        "{} is connected and serving {} guilds",
        ready.user.name,
        ready.guilds.len()
    );
}

pub async fn on_error(error: poise::FrameworkError<'_, Data, Error>) {
    match error {
        poise::FrameworkError::Setup { error, .. } => {
            tracing::error!("Failed to set up framework: {}", error);
        }
        poise::FrameworkError::Command { error, ctx, .. } => {
            tracing::error!("Error in command `{}`: {}", ctx.command().name, error);
        }
        poise::FrameworkError::UnknownInteraction {
            ctx,
            framework,
            interaction,
            ..
        } => {
            if let Err(e) = handle_unknown_command(ctx, framework, interaction).await {
                tracing::error!("Error while answering unknown command: {}", e);
            }
        }
        error => {
            if let Err(e) = poise::builtins::on_error(error).await {
                tracing::error!("Error while handling error: {}", e);
            }
        }
    }
}

/// Whether answering `name` goes out to an image API and so has to defer first.
fn fetches_image(name: &str) -> bool {
    name.parse::<Command>()
        .ok()
        .and_then(Command::image_request)
        .is_some()
}

/// Answers a command that is still registered on Discord's side but no longer known here.
async fn handle_unknown_command(
    ctx: &Context,
    framework: FrameworkContext<'_, Data, Error>,
    interaction: &CommandInteraction,
) -> Result<(), Error> {
    let data = framework.user_data;
    let name = &interaction.data.name;

    if fetches_image(name) {
        interaction.defer(ctx).await?;
        let payload = images::dispatch_named(&data.fetcher, &data.config.api, name).await;
        let edit = commands::build_reply(payload, framework.bot_id)
            .to_slash_initial_response_edit(EditInteractionResponse::new());
        interaction.edit_response(ctx, edit).await?;
        return Ok(());
    }

    let payload = images::dispatch_named(&data.fetcher, &data.config.api, name).await;
    let message = commands::build_reply(payload, framework.bot_id)
        .to_slash_initial_response(CreateInteractionResponseMessage::new());
    interaction
        .create_response(ctx, CreateInteractionResponse::Message(message))
        .await?;

    Ok(())
}
