/// S3 connection configuration shared by the transcoding services
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct S3Config {
    /// AWS region
    pub region: String,
    /// Static access key (falls back to the default credential chain when unset)
    pub access_key_id: Option<String>,
    /// Static secret key
    pub secret_access_key: Option<String>,
    /// Custom endpoint for S3-compatible storage (MinIO, LocalStack)
    pub endpoint: Option<String>,
    /// Whether to use path-style URLs (false = virtual-hosted-style)
    pub path_style: bool,
}

impl Default for S3Config {
    fn default() -> Self {
        Self {
            region: "us-east-1".to_string(),
            access_key_id: None,
            secret_access_key: None,
            endpoint: None,
            path_style: false,
        }
    }
}

impl S3Config {
    /// Load S3 configuration from environment variables
    pub fn from_env() -> Self {
        let endpoint = std::env::var("S3_ENDPOINT").ok().filter(|e| !e.is_empty());
        Self {
            region: std::env::var("AWS_REGION").unwrap_or_else(|_| "us-east-1".to_string()),
            access_key_id: std::env::var("AWS_ACCESS_KEY_ID").ok(),
            secret_access_key: std::env::var("AWS_SECRET_ACCESS_KEY").ok(),
            // Custom endpoints are almost always MinIO-style, which wants path-style URLs
            path_style: std::env::var("S3_PATH_STYLE")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(endpoint.is_some()),
            endpoint,
        }
    }

    /// Static credentials, if both halves are configured
    pub fn static_credentials(&self) -> Option<(&str, &str)> {
        match (&self.access_key_id, &self.secret_access_key) {
            (Some(id), Some(secret)) => Some((id.as_str(), secret.as_str())),
            _ => None,
        }
    }
}
