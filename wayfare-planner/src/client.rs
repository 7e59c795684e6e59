use serde::{Deserialize, Serialize};
use tracing::error;

use crate::models::{TripPlan, TripPlanRequest};
use crate::prompt;
use crate::PlannerError;

/// Gateway connection settings, loaded from application configuration. The
/// key never travels in a request body.
#[derive(Debug, Clone, Deserialize)]
pub struct PlannerConfig {
    pub api_url: String,
    pub api_key: String,
    pub model: String,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Deserialize)]
struct ChatChoiceMessage {
    content: Option<String>,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

/// Client for the chat-completions gateway that writes itineraries.
///
/// Calls are synchronous from the caller's point of view and are never
/// retried; rate limits and exhausted credits surface as their own errors so
/// the API can map them to distinct statuses.
pub struct PlannerClient {
    http: reqwest::Client,
    config: PlannerConfig,
}

impl PlannerClient {
    pub fn new(config: PlannerConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            config,
        }
    }

    pub async fn generate_plan(&self, request: &TripPlanRequest) -> Result<TripPlan, PlannerError> {
        request.validate()?;

        let system = prompt::system_prompt();
        let user = prompt::user_prompt(request);
        let body = ChatRequest {
            model: &self.config.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: &system,
                },
                ChatMessage {
                    role: "user",
                    content: &user,
                },
            ],
        };

        let response = self
            .http
            .post(&self.config.api_url)
            .bearer_auth(&self.config.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| PlannerError::Upstream(e.to_string()))?;

        match response.status().as_u16() {
            429 => return Err(PlannerError::RateLimited),
            402 => return Err(PlannerError::CreditsExhausted),
            status if status >= 400 => {
                let detail = response.text().await.unwrap_or_default();
                error!(status, %detail, "planner gateway error");
                return Err(PlannerError::Upstream(format!("status {status}")));
            }
            _ => {}
        }

        let chat: ChatResponse = response
            .json()
            .await
            .map_err(|e| PlannerError::Upstream(e.to_string()))?;

        let content = chat
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or(PlannerError::BadItinerary)?;

        parse_plan(&content)
    }
}

fn parse_plan(content: &str) -> Result<TripPlan, PlannerError> {
    let json = prompt::strip_code_fence(content);
    serde_json::from_str(json).map_err(|e| {
        error!(%e, "unparseable itinerary from planner gateway");
        PlannerError::BadItinerary
    })
}
