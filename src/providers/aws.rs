use super::{Provider, ProviderConfig};
use anyhow::Result;

/// AWS S3 provider (default)
pub struct AwsProvider {
    region: Option<String>,
}

impl AwsProvider {
    pub fn new(region: Option<String>) -> Self {
        Self { region }
    }
}

#[async_trait::async_trait]
impl Provider for AwsProvider {
    fn name(&self) -> &str {
        "aws"
    }

    async fn build_config(&self) -> Result<ProviderConfig> {
        Ok(ProviderConfig {
            endpoint_url: None,
            force_path_style: false,
            region: self.region.clone(),
        })
    }
}
