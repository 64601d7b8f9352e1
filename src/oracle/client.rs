use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use reqwest::{Client, ClientBuilder};
use serde::Deserialize;
use tokio::sync::Semaphore;
use tracing::{debug, instrument, warn};

use crate::config::Config;
use crate::extractor::ProductRaw;
use crate::oracle::{
    errors::OracleError,
    model::{OracleJudgment, parse_judgment},
    prompt::{chat_request, user_message},
};

const CHAT_COMPLETIONS_PATH: &str = "/v1/chat/completions";

/// Caller-supplied API key for the inference service.
///
/// Passed explicitly with every analysis; never stored by the service.
#[derive(Clone, PartialEq, Eq)]
pub struct OracleCredential(String);

impl OracleCredential {
    /// Returns `None` for a blank key.
    pub fn new(key: impl Into<String>) -> Option<Self> {
        let key = key.into();
        let trimmed = key.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_string()))
        }
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for OracleCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("OracleCredential(***)")
    }
}

/// Anything that can turn product text into a judgment.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Oracle: Send + Sync {
    async fn judge(
        &self,
        product: &ProductRaw,
        credential: &OracleCredential,
    ) -> Result<OracleJudgment, OracleError>;
}

/// Chat-completion client speaking the OpenAI wire format.
#[derive(Clone)]
pub struct OracleClient {
    client: Client,
    endpoint: String,
    model: String,
    limiter: Arc<Semaphore>,
}

impl OracleClient {
    pub fn new(config: &Config) -> Result<Self, OracleError> {
        let client = ClientBuilder::new()
            .connect_timeout(config.connect_timeout())
            .timeout(config.oracle_timeout())
            .build()
            .map_err(|e| OracleError::Transport(e.to_string()))?;

        Ok(Self {
            client,
            endpoint: format!(
                "{}{}",
                config.oracle_base_url().trim_end_matches('/'),
                CHAT_COMPLETIONS_PATH
            ),
            model: config.oracle_model().to_string(),
            limiter: Arc::new(Semaphore::new(config.outbound_concurrency())),
        })
    }

    /// Share an outbound concurrency cap with other upstream clients.
    pub fn with_limiter(mut self, limiter: Arc<Semaphore>) -> Self {
        self.limiter = limiter;
        self
    }

    #[instrument(skip_all, fields(model = %self.model))]
    pub async fn judge(
        &self,
        product: &ProductRaw,
        credential: &OracleCredential,
    ) -> Result<OracleJudgment, OracleError> {
        let user_content = user_message(product);
        debug!(prompt_chars = user_content.len(), "querying oracle");
        let body = chat_request(&self.model, &user_content);

        let _permit = self
            .limiter
            .acquire()
            .await
            .map_err(|e| OracleError::Transport(e.to_string()))?;

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(credential.expose())
            .json(&body)
            .send()
            .await
            .map_err(OracleError::from_reqwest_error)?;

        let status = response.status();
        if !status.is_success() {
            let detail = response
                .text()
                .await
                .unwrap_or_else(|_| "<body unavailable>".to_string());
            warn!(%status, "oracle returned an error status");
            return Err(OracleError::Transport(format!(
                "oracle returned {status}: {detail}"
            )));
        }

        let envelope: ChatResponse = response
            .json()
            .await
            .map_err(|e| OracleError::Transport(format!("unreadable reply envelope: {e}")))?;

        let content = envelope
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| OracleError::Transport("reply carried no message content".to_string()))?;

        parse_judgment(&content).inspect_err(|e| warn!(error = %e, "oracle reply rejected"))
    }
}

#[async_trait]
impl Oracle for OracleClient {
    async fn judge(
        &self,
        product: &ProductRaw,
        credential: &OracleCredential,
    ) -> Result<OracleJudgment, OracleError> {
        OracleClient::judge(self, product, credential).await
    }
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: AssistantMessage,
}

#[derive(Debug, Deserialize)]
struct AssistantMessage {
    content: Option<String>,
}
