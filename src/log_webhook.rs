// log_webhook.rs
use poise::serenity_prelude::{ExecuteWebhook, Http, Webhook};
use std::fmt::Write as _;
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};
use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::{Context, Layer};

/// Discord rejects message content longer than this.
const MAX_CONTENT_LEN: usize = 2000;

/// Copies info-and-above events emitted by this crate onto a channel drained by [`forward`].
///
/// Events from serenity and reqwest are skipped so that posting a log line can't log again.
pub struct WebhookLayer {
    sender: UnboundedSender<String>,
}

impl WebhookLayer {
    pub fn new() -> (Self, UnboundedReceiver<String>) {
        let (sender, receiver) = unbounded_channel();
        (Self { sender }, receiver)
    }
}

impl<S: Subscriber> Layer<S> for WebhookLayer {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let metadata = event.metadata();
        if *metadata.level() > Level::INFO || !metadata.target().starts_with(env!("CARGO_CRATE_NAME")) {
            return;
        }

        let mut visitor = MessageVisitor::default();
        event.record(&mut visitor);

        // The receiver is gone once the forwarder gave up, nothing left to do then.
        let _ = self
            .sender
            .send(format_line(metadata.level(), metadata.target(), &visitor.0));
    }
}

#[derive(Default)]
struct MessageVisitor(String);

impl Visit for MessageVisitor {
    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "message" {
            self.0.push_str(value);
        } else {
            let _ = write!(self.0, " {}={}", field.name(), value);
        }
    }

    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        if field.name() == "message" {
            let _ = write!(self.0, "{:?}", value);
        } else {
            let _ = write!(self.0, " {}={:?}", field.name(), value);
        }
    }
}

fn format_line(level: &Level, target: &str, message: &str) -> String {
    let mut line = format!("**{}** `{}` {}", level, target, message);
    if line.len() > MAX_CONTENT_LEN {
        let mut end = MAX_CONTENT_LEN - '…'.len_utf8();
        while !line.is_char_boundary(end) {
            end -= 1;
        }
        line.truncate(end);
        line.push('…');
    }
    line
}

/// Posts every queued log line to the webhook at `url` until the layer is dropped.
pub async fn forward(mut receiver: UnboundedReceiver<String>, url: String) {
    let http = Http::new("");
    let webhook = match Webhook::from_url(&http, &url).await {
        Ok(webhook) => webhook,
        Err(e) => {
            // Logging here would only queue more lines nobody reads.
            eprintln!("Error resolving log webhook, remote logging disabled: {:?}", e);
            return;
        }
    };

    while let Some(line) = receiver.recv().await {
        if let Err(e) = webhook
            .execute(&http, false, ExecuteWebhook::new().content(line))
            .await
        {
            eprintln!("Error sending log line to webhook: {:?}", e);
        }
    }
}
