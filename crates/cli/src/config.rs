use std::net::SocketAddr;
use std::time::Duration;

use collaborators::{CollaboratorEndpoint, SetupError};
use config::{Config, ConfigError, Environment};
use serde::Deserialize;

/// Gateway configuration, read from the process environment.
///
/// Every key is the lower-cased name of an environment variable, so
/// `NLP_SERVICE_URL` populates `nlp_service_url`.
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct GatewayConfig {
    /// Classification service base URL
    #[serde(default = "default_nlp_service_url")]
    pub nlp_service_url: String,

    /// Storage service base URL
    #[serde(default = "default_complaints_service_url")]
    pub complaints_service_url: String,

    /// Deadline for each collaborator call, in seconds
    #[serde(default = "default_collaborator_timeout_secs")]
    pub collaborator_timeout_secs: u64,

    /// Address the gateway listens on
    #[serde(default = "default_bind_address")]
    pub bind_address: String,

    /// Log level (trace, debug, info, warn, error); `RUST_LOG` takes precedence
    #[serde(default = "default_log_level")]
    pub log_level: String,

    #[serde(default)]
    pub otel_enabled: bool,

    /// OTLP gRPC collector endpoint
    #[serde(default = "default_otel_endpoint")]
    pub otel_endpoint: String,

    #[serde(default = "default_otel_service_name")]
    pub otel_service_name: String,
}

impl GatewayConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::load(Environment::default())
    }

    fn load(environment: Environment) -> Result<Self, ConfigError> {
        Config::builder()
            .add_source(environment.try_parsing(true))
            .build()?
            .try_deserialize()
    }

    pub fn collaborator_timeout(&self) -> Duration {
        Duration::from_secs(self.collaborator_timeout_secs)
    }

    pub fn classification_endpoint(&self) -> Result<CollaboratorEndpoint, SetupError> {
        self.endpoint(&self.nlp_service_url)
    }

    pub fn storage_endpoint(&self) -> Result<CollaboratorEndpoint, SetupError> {
        self.endpoint(&self.complaints_service_url)
    }

    pub fn bind_address(&self) -> Result<SocketAddr, std::net::AddrParseError> {
        self.bind_address.parse()
    }

    fn endpoint(&self, base_url: &str) -> Result<CollaboratorEndpoint, SetupError> {
        let mut endpoint = CollaboratorEndpoint::parse(base_url)?;
        endpoint.timeout = self.collaborator_timeout();
        Ok(endpoint)
    }
}

fn default_nlp_service_url() -> String {
    "http://nlp-service:8001".to_string()
}

fn default_complaints_service_url() -> String {
    "http://complaints-service:8002".to_string()
}

fn default_collaborator_timeout_secs() -> u64 {
    5
}

fn default_bind_address() -> String {
    "0.0.0.0:8000".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_otel_endpoint() -> String {
    "http://localhost:4317".to_string()
}

fn default_otel_service_name() -> String {
    "health-diary-gateway".to_string()
}
