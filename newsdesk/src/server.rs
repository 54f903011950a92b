use std::sync::Arc;

use anyhow::{anyhow, Result};
use chrono::{SecondsFormat, Utc};
use rocket::fairing::{Fairing, Info, Kind};
use rocket::http::{Header, Status};
use rocket::response::{self, status, Responder};
use rocket::serde::json::Json;
use rocket::{catch, catchers, get, options, routes, Build, Request, Response, Rocket, State};
use serde::Serialize;

use common::Config;

use crate::analysis::topics::{topic_names, Topic};
use crate::analysis::EnrichedArticle;
use crate::processing::Aggregator;
use crate::sources::{feed_category, find_source, source_names, NEWS_SOURCES};

/// Application state stored inside Rocket managed state.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub aggregator: Aggregator,
}

impl AppState {
    pub async fn from_config(config: Config) -> Result<Self> {
        let aggregator = Aggregator::from_config(&config).await?;
        Ok(Self {
            config: Arc::new(config),
            aggregator,
        })
    }
}

fn now() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Article listing shared by the news routes. Filters that were not
/// applied are left out of the JSON.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct NewsResponse {
    status: &'static str,
    timestamp: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    source: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    topic: Option<String>,
    article_count: usize,
    articles: Vec<EnrichedArticle>,
    #[serde(skip_serializing_if = "Option::is_none")]
    sources_scraped: Option<Vec<&'static str>>,
}

impl NewsResponse {
    fn new(articles: Vec<EnrichedArticle>) -> Self {
        Self {
            status: "success",
            timestamp: now(),
            source: None,
            topic: None,
            article_count: articles.len(),
            articles,
            sources_scraped: None,
        }
    }
}

#[derive(Serialize)]
struct TopicsResponse {
    status: &'static str,
    timestamp: String,
    topics: Vec<&'static str>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SourceInfo {
    name: &'static str,
    feed_count: usize,
    categories: Vec<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SourcesResponse {
    status: &'static str,
    timestamp: String,
    source_count: usize,
    sources: Vec<SourceInfo>,
}

/// Body of every error response.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ErrorBody {
    status: &'static str,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    available_sources: Option<Vec<&'static str>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    available_topics: Option<Vec<&'static str>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    timestamp: String,
}

impl ErrorBody {
    fn new(message: impl Into<String>) -> Self {
        Self {
            status: "error",
            message: message.into(),
            available_sources: None,
            available_topics: None,
            error: None,
            timestamp: now(),
        }
    }
}

/// Lookup failures reported to the client as 404 with the valid choices.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Source '{0}' not found")]
    UnknownSource(String),
    #[error("Topic '{0}' not found")]
    UnknownTopic(String),
}

impl<'r> Responder<'r, 'static> for ApiError {
    fn respond_to(self, request: &'r Request<'_>) -> response::Result<'static> {
        let mut body = ErrorBody::new(self.to_string());
        match self {
            ApiError::UnknownSource(_) => body.available_sources = Some(source_names()),
            ApiError::UnknownTopic(_) => body.available_topics = Some(topic_names()),
        }
        status::Custom(Status::NotFound, Json(body)).respond_to(request)
    }
}

fn parse_topic(topic: &str) -> Result<Topic, ApiError> {
    topic
        .parse()
        .map_err(|_| ApiError::UnknownTopic(topic.to_string()))
}

#[get("/health")]
async fn health() -> &'static str {
    "OK"
}

/// Every source, every feed.
#[get("/analyze-news")]
async fn analyze_news(state: &State<AppState>) -> Json<NewsResponse> {
    tracing::info!("Starting news analysis");
    let articles = state.aggregator.fetch_all().await;
    tracing::info!("Analysis complete, {} articles", articles.len());

    let mut response = NewsResponse::new(articles);
    response.sources_scraped = Some(source_names());
    Json(response)
}

#[get("/news/source/<source_name>")]
async fn news_by_source(
    state: &State<AppState>,
    source_name: &str,
) -> Result<Json<NewsResponse>, ApiError> {
    let source =
        find_source(source_name).ok_or_else(|| ApiError::UnknownSource(source_name.to_string()))?;

    let mut response = NewsResponse::new(state.aggregator.fetch_source(source).await);
    response.source = Some(source.name);
    Ok(Json(response))
}

/// The topic is echoed back as requested, matching is case-insensitive.
#[get("/news/topic/<topic>")]
async fn news_by_topic(state: &State<AppState>, topic: &str) -> Result<Json<NewsResponse>, ApiError> {
    let wanted = parse_topic(topic)?;

    let articles = state
        .aggregator
        .fetch_all()
        .await
        .into_iter()
        .filter(|article| article.topic == wanted)
        .collect();

    let mut response = NewsResponse::new(articles);
    response.topic = Some(topic.to_string());
    Ok(Json(response))
}

#[get("/news/source/<source_name>/topic/<topic>")]
async fn news_by_source_and_topic(
    state: &State<AppState>,
    source_name: &str,
    topic: &str,
) -> Result<Json<NewsResponse>, ApiError> {
    let source =
        find_source(source_name).ok_or_else(|| ApiError::UnknownSource(source_name.to_string()))?;
    let wanted = parse_topic(topic)?;

    let articles = state
        .aggregator
        .fetch_source(source)
        .await
        .into_iter()
        .filter(|article| article.topic == wanted)
        .collect();

    let mut response = NewsResponse::new(articles);
    response.source = Some(source.name);
    response.topic = Some(topic.to_string());
    Ok(Json(response))
}

#[get("/topics")]
async fn topics() -> Json<TopicsResponse> {
    Json(TopicsResponse {
        status: "success",
        timestamp: now(),
        topics: topic_names(),
    })
}

#[get("/sources")]
async fn sources() -> Json<SourcesResponse> {
    let sources: Vec<SourceInfo> = NEWS_SOURCES
        .iter()
        .map(|source| SourceInfo {
            name: source.name,
            feed_count: source.feeds.len(),
            categories: source.feeds.iter().map(|feed| feed_category(feed)).collect(),
        })
        .collect();

    Json(SourcesResponse {
        status: "success",
        timestamp: now(),
        source_count: sources.len(),
        sources,
    })
}

/// CORS preflight for any path. The headers come from the `Cors` fairing.
#[options("/<_..>")]
async fn preflight() -> Status {
    Status::NoContent
}

#[catch(404)]
fn not_found() -> status::Custom<Json<ErrorBody>> {
    status::Custom(Status::NotFound, Json(ErrorBody::new("Route not found")))
}

#[catch(500)]
fn internal_error(request: &Request<'_>) -> status::Custom<Json<ErrorBody>> {
    let development = request
        .rocket()
        .state::<AppState>()
        .map(|state| state.config.server.development)
        .unwrap_or(false);

    tracing::error!(method = %request.method(), uri = %request.uri(), "request failed");

    let mut body = ErrorBody::new("Something went wrong!");
    if development {
        body.error = Some(format!("{} {} failed", request.method(), request.uri()));
    }
    status::Custom(Status::InternalServerError, Json(body))
}

/// Permissive CORS: the request origin is echoed back with credentials allowed.
pub struct Cors;

#[rocket::async_trait]
impl Fairing for Cors {
    fn info(&self) -> Info {
        Info {
            name: "CORS headers",
            kind: Kind::Response,
        }
    }

    async fn on_response<'r>(&self, request: &'r Request<'_>, response: &mut Response<'r>) {
        if let Some(origin) = request.headers().get_one("Origin") {
            response.set_header(Header::new("Access-Control-Allow-Origin", origin.to_string()));
        }
        let allowed_headers = request
            .headers()
            .get_one("Access-Control-Request-Headers")
            .unwrap_or("*")
            .to_string();

        response.set_header(Header::new("Vary", "Origin"));
        response.set_header(Header::new(
            "Access-Control-Allow-Methods",
            "GET, HEAD, PUT, PATCH, POST, DELETE, OPTIONS",
        ));
        response.set_header(Header::new("Access-Control-Allow-Headers", allowed_headers));
        response.set_header(Header::new("Access-Control-Allow-Credentials", "true"));
    }
}

/// Assemble the Rocket instance with routes, catchers and the CORS fairing.
/// `server.bind` and `server.port` from the configuration are merged into
/// Rocket's own figment.
pub fn build_rocket(state: AppState) -> Rocket<Build> {
    let figment = rocket::Config::figment()
        .merge(("address", state.config.server.bind.clone()))
        .merge(("port", state.config.server.port));

    rocket::custom(figment)
        .manage(state)
        .attach(Cors)
        .mount(
            "/",
            routes![
                health,
                analyze_news,
                news_by_source,
                news_by_topic,
                news_by_source_and_topic,
                topics,
                sources,
                preflight,
            ],
        )
        .register("/", catchers![not_found, internal_error])
}

/// Build and launch the server. Blocks until Rocket shuts down.
pub async fn launch_rocket(state: AppState) -> Result<()> {
    tracing::info!(
        bind = %state.config.server.bind,
        port = state.config.server.port,
        "Starting Rocket HTTP server"
    );

    build_rocket(state)
        .launch()
        .await
        .map_err(|e| anyhow!("Rocket failed: {}", e))?;

    tracing::info!("Rocket HTTP server has shut down");
    Ok(())
}
