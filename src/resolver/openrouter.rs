use async_trait::async_trait;
use log::debug;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::errors::{DashboardError, Result};
use crate::resolver::NameLookup;

#[derive(Serialize, Debug)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage>,
}

#[derive(Serialize, Deserialize, Debug)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Deserialize, Debug)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize, Debug)]
struct ChatChoice {
    message: ChatMessage,
}

/// Asks an OpenRouter chat model for the ticker of a company name.
pub struct OpenRouterLookup {
    client: Client,
    url: String,
    model: String,
    api_key: String,
}

impl OpenRouterLookup {
    /// `None` when no API key is configured.
    pub fn from_config(config: &Config) -> Result<Option<Self>> {
        let Some(api_key) = config.openrouter_api_key.clone() else {
            return Ok(None);
        };
        let client = Client::builder().timeout(config.request_timeout).build()?;
        Ok(Some(Self {
            client,
            url: config.openrouter_url.clone(),
            model: config.openrouter_model.clone(),
            api_key,
        }))
    }

    fn prompt(name: &str) -> String {
        format!(
            "What is the stock ticker symbol for {name}? Only return the ticker symbol in capital letters, nothing else."
        )
    }
}

#[async_trait]
impl NameLookup for OpenRouterLookup {
    async fn lookup(&self, name: &str) -> Result<Option<String>> {
        let request = ChatRequest {
            model: &self.model,
            messages: vec![ChatMessage {
                role: "user".to_string(),
                content: Self::prompt(name),
            }],
        };

        let response = self
            .client
            .post(&self.url)
            .bearer_auth(&self.api_key)
            .header("X-Title", "finviz-dashboard")
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(DashboardError::LookupError(format!(
                "lookup service answered {status}"
            )));
        }

        let body: ChatResponse = response.json().await?;
        let answer = body
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content.trim().to_uppercase())
            .filter(|content| !content.is_empty());
        debug!("lookup answer for '{}': {:?}", name, answer);
        Ok(answer)
    }
}
