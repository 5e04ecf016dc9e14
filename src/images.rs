// images.rs
use crate::config::ApiConfig;
use crate::error::Error;
use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Deserialize;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

/// Every command the bot registers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Kitsune,
    Senko,
    Shiro,
    Tail,
    Fluff,
    Fox,
    Info,
}

impl Command {
    pub const ALL: [Command; 7] = [
        Command::Kitsune,
        Command::Senko,
        Command::Shiro,
        Command::Tail,
        Command::Fluff,
        Command::Fox,
        Command::Info,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Command::Kitsune => "kitsune",
            Command::Senko => "senko",
            Command::Shiro => "shiro",
            Command::Tail => "tail",
            Command::Fluff => "fluff",
            Command::Fox => "fox",
            Command::Info => "info",
        }
    }

    /// The image lookup behind this command, `None` for commands that never hit the network.
    pub fn image_request(self) -> Option<ImageRequest> {
        let purrbot = |category, animated| ImageRequest {
            provider: Provider::Purrbot,
            category,
            animated,
        };

        match self {
            Command::Kitsune => Some(purrbot("kitsune", false)),
            Command::Senko => Some(purrbot("senko", false)),
            Command::Shiro => Some(purrbot("shiro", false)),
            Command::Tail => Some(purrbot("tail", true)),
            Command::Fluff => Some(purrbot("fluff", true)),
            Command::Fox => Some(ImageRequest {
                provider: Provider::RandomFox,
                category: "floof",
                animated: false,
            }),
            Command::Info => None,
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownCommand(pub String);

impl FromStr for Command {
    type Err = UnknownCommand;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Command::ALL
            .into_iter()
            .find(|command| command.name() == s)
            .ok_or_else(|| UnknownCommand(s.to_string()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provider {
    Purrbot,
    RandomFox,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageRequest {
    pub provider: Provider,
    pub category: &'static str,
    pub animated: bool,
}

impl ImageRequest {
    pub fn url(&self, api: &ApiConfig) -> String {
        match self.provider {
            Provider::Purrbot => format!(
                "{}/img/sfw/{}/{}",
                api.purrbot_url.trim_end_matches('/'),
                self.category,
                if self.animated { "gif" } else { "img" }
            ),
            Provider::RandomFox => format!(
                "{}/{}",
                api.randomfox_url.trim_end_matches('/'),
                self.category
            ),
        }
    }

    /// Pulls the image link out of a provider response body.
    fn image_link(&self, body: &str) -> Result<String, Error> {
        let link = match self.provider {
            Provider::Purrbot => {
                let response: PurrbotResponse = serde_json::from_str(body)?;
                if response.error {
                    return Err(Error::Unknown("purrbot reported an error".to_string()));
                }
                response.link
            }
            Provider::RandomFox => serde_json::from_str::<RandomFoxResponse>(body)?.image,
        };

        if link.trim().is_empty() {
            return Err(Error::Unknown("response carried an empty image link".to_string()));
        }
        Ok(link)
    }
}

#[derive(Debug, Deserialize)]
struct PurrbotResponse {
    #[serde(default)]
    error: bool,
    link: String,
}

#[derive(Debug, Deserialize)]
struct RandomFoxResponse {
    image: String,
}

/// What a command resolves to, ready to be turned into a reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplyPayload {
    Image(String),
    Error(String),
    Info,
}

impl ReplyPayload {
    fn unreachable_api(command: Command) -> Self {
        ReplyPayload::Error(format!("Sowy I had trouble reaching my {command} API ≧ ﹏ ≦"))
    }

    fn undecodable_api(command: Command) -> Self {
        ReplyPayload::Error(format!("Sowy I had trouble decoding my {command} API ≧ ﹏ ≦"))
    }

    pub fn unknown_command() -> Self {
        ReplyPayload::Error("Sowy I don't know this command ≧ ﹏ ≦".to_string())
    }
}

#[derive(Debug, Clone)]
pub struct Fetched {
    pub status: StatusCode,
    pub body: String,
}

#[async_trait]
pub trait Fetch: Send + Sync {
    async fn get(&self, url: &str) -> Result<Fetched, Error>;
}

/// Single-attempt HTTP fetcher shared by every command invocation.
#[derive(Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    pub fn new(timeout: Duration) -> Result<Self, Error> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl Fetch for HttpFetcher {
    async fn get(&self, url: &str) -> Result<Fetched, Error> {
        let response = self.client.get(url).send().await?;
        let status = response.status();
        let body = response.text().await?;
        Ok(Fetched { status, body })
    }
}

pub async fn dispatch(fetcher: &dyn Fetch, api: &ApiConfig, command: Command) -> ReplyPayload {
    let Some(request) = command.image_request() else {
        return ReplyPayload::Info;
    };
    let url = request.url(api);
    tracing::debug!("Fetching {} image from {}", command, url);

    let fetched = match fetcher.get(&url).await {
        Ok(fetched) => fetched,
        Err(e) => {
            tracing::error!("Error retrieving {} from {}: {}", command, url, e);
            return ReplyPayload::unreachable_api(command);
        }
    };

    if !fetched.status.is_success() {
        tracing::error!(
            "Error retrieving {} from {}: status {}, body: {}",
            command,
            url,
            fetched.status,
            fetched.body
        );
        return ReplyPayload::unreachable_api(command);
    }

    match request.image_link(&fetched.body) {
        Ok(link) => ReplyPayload::Image(link),
        Err(e) => {
            tracing::error!("Error decoding {} response from {}: {}", command, url, e);
            ReplyPayload::undecodable_api(command)
        }
    }
}

pub async fn dispatch_named(fetcher: &dyn Fetch, api: &ApiConfig, name: &str) -> ReplyPayload {
    match name.parse::<Command>() {
        Ok(command) => dispatch(fetcher, api, command).await,
        Err(UnknownCommand(name)) => {
            tracing::warn!("Unknown command with name {} received", name);
            ReplyPayload::unknown_command()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::sync::Mutex;

    /// Answers every request with the same canned response and remembers the URLs asked for.
    struct FakeFetcher {
        response: Option<(u16, &'static str)>,
        urls: Mutex<Vec<String>>,
    }

    impl FakeFetcher {
        fn ok(body: &'static str) -> Self {
            Self::with_status(200, body)
        }

        fn with_status(status: u16, body: &'static str) -> Self {
            Self {
                response: Some((status, body)),
                urls: Mutex::new(Vec::new()),
            }
        }

        fn offline() -> Self {
            Self {
                response: None,
                urls: Mutex::new(Vec::new()),
            }
        }

        fn calls(&self) -> Vec<String> {
            self.urls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Fetch for FakeFetcher {
        async fn get(&self, url: &str) -> Result<Fetched, Error> {
            self.urls.lock().unwrap().push(url.to_string());
            match self.response {
                Some((status, body)) => Ok(Fetched {
                    status: StatusCode::from_u16(status).unwrap(),
                    body: body.to_string(),
                }),
                None => Err(Error::Unknown("connection refused".to_string())),
            }
        }
    }

    const PURRBOT_OK: &str = r#"{"error":false,"link":"https://cdn.purrbot.site/sfw/kitsune/img/1.jpg","time":12}"#;
    const FOX_OK: &str = r#"{"image":"https://x/1.png","link":"https://x/1"}"#;

    #[test]
    fn urls_follow_provider_templates() {
        let api = ApiConfig::default();
        let urls: Vec<(&str, Option<String>)> = Command::ALL
            .into_iter()
            .map(|command| (command.name(), command.image_request().map(|r| r.url(&api))))
            .collect();

        assert_eq!(
            urls,
            vec![
                ("kitsune", Some("https://purrbot.site/api/img/sfw/kitsune/img".to_string())),
                ("senko", Some("https://purrbot.site/api/img/sfw/senko/img".to_string())),
                ("shiro", Some("https://purrbot.site/api/img/sfw/shiro/img".to_string())),
                ("tail", Some("https://purrbot.site/api/img/sfw/tail/gif".to_string())),
                ("fluff", Some("https://purrbot.site/api/img/sfw/fluff/gif".to_string())),
                ("fox", Some("https://randomfox.ca/floof".to_string())),
                ("info", None),
            ]
        );
    }

    #[test]
    fn trailing_slash_on_base_is_ignored() {
        let api = ApiConfig {
            purrbot_url: "http://localhost/api/".to_string(),
            randomfox_url: "http://localhost/".to_string(),
        };

        assert_eq!(
            Command::Tail.image_request().unwrap().url(&api),
            "http://localhost/api/img/sfw/tail/gif"
        );
        assert_eq!(Command::Fox.image_request().unwrap().url(&api), "http://localhost/floof");
    }

    #[test]
    fn names_round_trip() {
        for command in Command::ALL {
            assert_eq!(command.name().parse::<Command>(), Ok(command));
        }
        assert_eq!("Fox".parse::<Command>(), Err(UnknownCommand("Fox".to_string())));
    }

    #[tokio::test]
    async fn fox_returns_image_field() {
        let fetcher = FakeFetcher::ok(FOX_OK);
        let payload = dispatch(&fetcher, &ApiConfig::default(), Command::Fox).await;

        assert_eq!(payload, ReplyPayload::Image("https://x/1.png".to_string()));
        assert_eq!(fetcher.calls(), vec!["https://randomfox.ca/floof".to_string()]);
    }

    #[tokio::test]
    async fn purrbot_returns_link_field() {
        let fetcher = FakeFetcher::ok(PURRBOT_OK);
        let payload = dispatch(&fetcher, &ApiConfig::default(), Command::Kitsune).await;

        assert_eq!(
            payload,
            ReplyPayload::Image("https://cdn.purrbot.site/sfw/kitsune/img/1.jpg".to_string())
        );
    }

    #[tokio::test]
    async fn server_error_names_the_command() {
        for command in Command::ALL.into_iter().filter(|c| c.image_request().is_some()) {
            for status in [404, 500, 503] {
                let body = if command == Command::Fox { FOX_OK } else { PURRBOT_OK };
                let fetcher = FakeFetcher::with_status(status, body);
                let payload = dispatch(&fetcher, &ApiConfig::default(), command).await;

                match payload {
                    ReplyPayload::Error(text) => {
                        assert!(text.contains(&format!("{} API", command)), "{status}: {text}")
                    }
                    other => panic!("{command} with {status}: expected an error, got {other:?}"),
                }
                assert_eq!(fetcher.calls().len(), 1, "{command} with {status}");
            }
        }
    }

    #[tokio::test]
    async fn any_success_status_is_decoded() {
        let fetcher = FakeFetcher::with_status(203, FOX_OK);
        let payload = dispatch(&fetcher, &ApiConfig::default(), Command::Fox).await;

        assert_eq!(payload, ReplyPayload::Image("https://x/1.png".to_string()));
    }

    #[tokio::test]
    async fn transport_failure_is_an_error_payload() {
        let fetcher = FakeFetcher::offline();
        let payload = dispatch(&fetcher, &ApiConfig::default(), Command::Fox).await;

        assert_eq!(
            payload,
            ReplyPayload::Error("Sowy I had trouble reaching my fox API ≧ ﹏ ≦".to_string())
        );
    }

    #[tokio::test]
    async fn malformed_bodies_are_decode_errors() {
        let decode_error =
            ReplyPayload::Error("Sowy I had trouble decoding my tail API ≧ ﹏ ≦".to_string());

        for body in [
            "not json",
            r#"{"image":"https://x/1.png"}"#,
            r#"{"error":true,"link":"https://x/1.gif","time":1}"#,
            r#"{"error":false,"link":"","time":1}"#,
        ] {
            let fetcher = FakeFetcher {
                response: Some((200, body)),
                urls: Mutex::new(Vec::new()),
            };
            let payload = dispatch(&fetcher, &ApiConfig::default(), Command::Tail).await;
            assert_eq!(payload, decode_error, "body: {body}");
        }
    }

    #[tokio::test]
    async fn info_never_fetches() {
        let fetcher = FakeFetcher::offline();

        assert_eq!(dispatch(&fetcher, &ApiConfig::default(), Command::Info).await, ReplyPayload::Info);
        assert_eq!(dispatch_named(&fetcher, &ApiConfig::default(), "info").await, ReplyPayload::Info);
        assert!(fetcher.calls().is_empty());
    }

    #[tokio::test]
    async fn unknown_command_never_fetches() {
        let fetcher = FakeFetcher::ok(FOX_OK);
        let payload = dispatch_named(&fetcher, &ApiConfig::default(), "wolf").await;

        assert_eq!(payload, ReplyPayload::unknown_command());
        assert!(fetcher.calls().is_empty());
    }

    #[tokio::test]
    async fn named_dispatch_hits_the_mapped_endpoint() {
        let fetcher = FakeFetcher::ok(PURRBOT_OK);
        dispatch_named(&fetcher, &ApiConfig::default(), "fluff").await;

        assert_eq!(
            fetcher.calls(),
            vec!["https://purrbot.site/api/img/sfw/fluff/gif".to_string()]
        );
    }
}
