// Configuration layer for provider-agnostic client creation

use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::error::Result;
use crate::mock::MockClient;
use crate::openai::OpenAiClient;
use crate::traits::CompletionClient;

/// Which provider backs the completion client.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "provider", rename_all = "lowercase")]
pub enum ProviderConfig {
    OpenAi {
        api_key: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        base_url: Option<String>,
    },
    Mock,
}

impl ProviderConfig {
    pub fn openai(api_key: impl Into<String>) -> Self {
        Self::OpenAi {
            api_key: api_key.into(),
            base_url: None,
        }
    }

    pub fn mock() -> Self {
        Self::Mock
    }
}

/// Factory for creating completion clients from configuration
pub struct ClientFactory;

impl ClientFactory {
    pub fn create(config: ProviderConfig) -> Result<Arc<dyn CompletionClient>> {
        match config {
            ProviderConfig::OpenAi { api_key, base_url } => {
                let mut client = OpenAiClient::new(api_key)?;
                if let Some(base_url) = base_url {
                    client = client.with_base_url(base_url);
                }
                Ok(Arc::new(client))
            }
            ProviderConfig::Mock => Ok(Arc::new(MockClient::new())),
        }
    }
}
