use super::{Provider, ProviderConfig};
use anyhow::Result;

/// S3-compatible service reached through an explicit endpoint (LocalStack, MinIO)
pub struct EndpointProvider {
    endpoint_url: String,
    region: Option<String>,
}

impl EndpointProvider {
    pub fn new(endpoint_url: String, region: Option<String>) -> Self {
        Self {
            endpoint_url,
            region,
        }
    }
}

#[async_trait::async_trait]
impl Provider for EndpointProvider {
    fn name(&self) -> &str {
        "endpoint"
    }

    async fn build_config(&self) -> Result<ProviderConfig> {
        Ok(ProviderConfig {
            endpoint_url: Some(self.endpoint_url.clone()),
            force_path_style: true,
            region: self.region.clone(),
        })
    }
}
