//! HTTP+JSON conversation backend client.

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
use tracing::{debug, info};
use url::Url;

use super::error::{BackendError, BackendResult};
use super::wire::{ConversationList, CreatedConversation, PromptBody};
use super::{BackendFuture, ConversationBackend, SendRequest};
use crate::config::ClientConfig;
use crate::session::types::{Conversation, ConversationId};

/// Collection endpoint, relative to the base URL.
const CONVERSATION_PATH: &str = "api/conversation";

/// Single-attempt client for the remote conversation service.
#[derive(Clone, Debug)]
pub struct HttpConversationBackend {
    client: reqwest::Client,
    base_url: Url,
}

impl HttpConversationBackend {
    /// Create a client from configuration.
    ///
    /// # Errors
    /// Returns an error if the base URL is invalid or the HTTP client cannot be built.
    pub fn new(config: &ClientConfig) -> BackendResult<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(config.request_timeout)
            .connect_timeout(config.connect_timeout)
            .build()
            .map_err(|e| BackendError::HttpClient(e.to_string()))?;

        Self::with_client(client, &config.api_base_url)
    }

    /// Create a client around an existing `reqwest::Client`.
    ///
    /// # Errors
    /// Returns an error if the base URL is invalid.
    pub fn with_client(client: reqwest::Client, base_url: &str) -> BackendResult<Self> {
        let mut base_url = Url::parse(base_url)?;
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }
        Ok(Self { client, base_url })
    }

    /// Base URL requests are resolved against.
    #[must_use]
    pub const fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn collection_url(&self) -> BackendResult<Url> {
        Ok(self.base_url.join(CONVERSATION_PATH)?)
    }

    fn item_url(&self, id: &ConversationId) -> BackendResult<Url> {
        let mut url = self.collection_url()?;
        url.path_segments_mut()
            .map_err(|()| BackendError::HttpClient("base URL cannot have path segments".to_string()))?
            .push(id.as_str());
        Ok(url)
    }

    async fn create(&self, prompt: &str, model: &str) -> BackendResult<Conversation> {
        let url = self.collection_url()?;
        let response = self
            .client
            .post(url)
            .json(&PromptBody { prompt, model })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(BackendError::Status {
                operation: "create conversation",
                status: status.as_u16(),
            });
        }

        let created: CreatedConversation = response.json().await?;
        info!("Created conversation {}", created.conversation.id);
        Ok(created.conversation)
    }

    async fn update(
        &self,
        id: &ConversationId,
        prompt: &str,
        model: &str,
    ) -> BackendResult<Conversation> {
        let url = self.item_url(id)?;
        let response = self
            .client
            .put(url)
            .json(&PromptBody { prompt, model })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(BackendError::Status {
                operation: "update conversation",
                status: status.as_u16(),
            });
        }

        let conversation: Conversation = response.json().await?;
        debug!(
            "Updated conversation {} ({} messages)",
            conversation.id,
            conversation.messages.len()
        );
        Ok(conversation)
    }
}

impl ConversationBackend for HttpConversationBackend {
    fn send(&self, request: SendRequest) -> BackendFuture<'_, BackendResult<Conversation>> {
        Box::pin(async move {
            match request {
                SendRequest::NewConversation { prompt, model } => {
                    self.create(&prompt, &model).await
                }
                SendRequest::ContinueConversation { id, prompt, model } => {
                    self.update(&id, &prompt, &model).await
                }
            }
        })
    }

    fn delete(&self, id: ConversationId) -> BackendFuture<'_, BackendResult<()>> {
        Box::pin(async move {
            let url = self.item_url(&id)?;
            let response = self.client.delete(url).send().await?;

            let status = response.status();
            if !status.is_success() {
                return Err(BackendError::Status {
                    operation: "delete conversation",
                    status: status.as_u16(),
                });
            }

            info!("Deleted conversation {id}");
            Ok(())
        })
    }

    fn list(&self) -> BackendFuture<'_, BackendResult<Vec<Conversation>>> {
        Box::pin(async move {
            let url = self.collection_url()?;
            let response = self.client.get(url).send().await?;

            let status = response.status();
            if !status.is_success() {
                return Err(BackendError::Status {
                    operation: "list conversations",
                    status: status.as_u16(),
                });
            }

            let list: ConversationList = response.json().await?;
            let conversations = list.into_vec();
            debug!("Fetched {} conversations", conversations.len());
            Ok(conversations)
        })
    }
}
