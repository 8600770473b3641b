use async_trait::async_trait;
use log::{debug, warn};
use reqwest::Client;

use super::{AskError, ResumeQuery};
use crate::state::{ChatRequest, ChatResponse};

#[derive(Clone)]
pub struct ResumeClient {
    client: Client,
    base_url: String,
}

impl ResumeClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn chat_url(&self) -> String {
        format!("{}/api/chat", self.base_url)
    }
}

#[async_trait]
impl ResumeQuery for ResumeClient {
    async fn ask(&self, question: &str) -> Result<ChatResponse, AskError> {
        let url = self.chat_url();
        debug!("POST {} ({} chars)", url, question.chars().count());

        let request = ChatRequest {
            question: question.to_string(),
        };

        // reqwest sets Content-Type: application/json for .json()
        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                warn!("Resume backend unreachable at {}: {}", url, e);
                AskError::generic()
            })?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            warn!("Resume backend returned {}", status);
            return Err(AskError::from_body(&text));
        }

        response.json::<ChatResponse>().await.map_err(|e| {
            warn!("Could not decode resume backend response: {}", e);
            AskError::generic()
        })
    }
}
