mod aws;
mod endpoint;

pub use aws::AwsProvider;
pub use endpoint::EndpointProvider;

use anyhow::Result;
use aws_sdk_s3::Client;
use tracing::debug;

/// Configuration for creating an S3 client
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProviderConfig {
    /// Optional custom endpoint URL
    pub endpoint_url: Option<String>,
    /// Whether to use path-style addressing (required for some S3-compatible services)
    pub force_path_style: bool,
    /// Optional region override
    pub region: Option<String>,
}

/// Trait for object-store provider implementations
/// Providers supply configuration for creating S3 clients
#[async_trait::async_trait]
pub trait Provider: Send + Sync {
    /// Get the provider name
    fn name(&self) -> &str;

    /// Build the provider configuration
    async fn build_config(&self) -> Result<ProviderConfig>;
}

/// Pick the provider for a stage invocation: a custom endpoint when one was
/// given on the command line, plain AWS otherwise
pub fn select_provider(endpoint_url: Option<String>, region: Option<String>) -> Box<dyn Provider> {
    match endpoint_url {
        Some(url) => Box::new(EndpointProvider::new(url, region)),
        None => Box::new(AwsProvider::new(region)),
    }
}

/// Factory function to create an S3 client from provider configuration
pub async fn create_s3_client(config: ProviderConfig) -> Result<Client> {
    let mut sdk_config = aws_config::defaults(aws_config::BehaviorVersion::latest());

    if let Some(region) = config.region {
        sdk_config = sdk_config.region(aws_config::Region::new(region));
    }

    let base_config = sdk_config.load().await;
    debug!(
        region = base_config.region().map(|r| r.as_ref()).unwrap_or("unset"),
        "loaded AWS configuration"
    );

    // Build S3-specific config
    let mut s3_config_builder = aws_sdk_s3::config::Builder::from(&base_config);

    if let Some(endpoint) = config.endpoint_url {
        s3_config_builder = s3_config_builder.endpoint_url(endpoint);
    }

    if config.force_path_style {
        s3_config_builder = s3_config_builder.force_path_style(true);
    }

    Ok(Client::from_conf(s3_config_builder.build()))
}
