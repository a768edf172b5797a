//! Time-bounded JSON calls to a named collaborator.

use std::time::{Duration, Instant};

use diary::{Collaborator, CollaboratorError};
use reqwest::RequestBuilder;
use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;
use tracing::debug;
use url::Url;

/// Deadline applied to every collaborator call unless configured otherwise.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// Where a collaborator lives and how long a single call may take.
///
/// Built once from configuration and handed to each adapter at construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollaboratorEndpoint {
    pub base_url: Url,
    /// Covers connecting, sending and reading the whole response.
    pub timeout: Duration,
}

impl CollaboratorEndpoint {
    pub fn new(base_url: Url, timeout: Duration) -> Self {
        Self { base_url, timeout }
    }

    /// Parses `base_url` and applies [`DEFAULT_TIMEOUT`].
    pub fn parse(base_url: &str) -> Result<Self, SetupError> {
        let url = Url::parse(base_url).map_err(|source| SetupError::InvalidBaseUrl {
            url: base_url.to_owned(),
            source,
        })?;
        Ok(Self::new(url, DEFAULT_TIMEOUT))
    }
}

/// Failures constructing a [`RemoteClient`]. These only happen at startup.
#[derive(Debug, Error)]
pub enum SetupError {
    #[error("Invalid collaborator base URL '{url}'")]
    InvalidBaseUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("Collaborator timeout must be greater than zero")]
    ZeroTimeout,

    #[error("Failed to build HTTP client")]
    Client(#[source] reqwest::Error),
}

/// Issues JSON requests to one collaborator and classifies every failure.
///
/// One attempt per call. The underlying connection pool is shared by clones
/// and carries no per-request state.
#[derive(Debug, Clone)]
pub struct RemoteClient {
    collaborator: Collaborator,
    base_url: String,
    http: reqwest::Client,
}

impl RemoteClient {
    /// Creates a client for `collaborator` at `endpoint`.
    ///
    /// # Errors
    ///
    /// [`SetupError::ZeroTimeout`] for a zero deadline, [`SetupError::Client`]
    /// if the TLS backend cannot be initialised.
    pub fn new(
        collaborator: Collaborator,
        endpoint: &CollaboratorEndpoint,
    ) -> Result<Self, SetupError> {
        if endpoint.timeout.is_zero() {
            return Err(SetupError::ZeroTimeout);
        }
        let http = reqwest::Client::builder()
            .timeout(endpoint.timeout)
            .connect_timeout(endpoint.timeout)
            .build()
            .map_err(SetupError::Client)?;

        Ok(Self {
            collaborator,
            base_url: endpoint.base_url.as_str().trim_end_matches('/').to_owned(),
            http,
        })
    }

    /// `POST {base}{path}` with a JSON body, decoding a JSON response.
    pub async fn post_json<B, T>(&self, path: &str, body: &B) -> Result<T, CollaboratorError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let request = self.http.post(self.url(path)).json(body);
        self.dispatch("POST", path, request).await
    }

    /// `GET {base}{path}?{query}`, decoding a JSON response.
    pub async fn get_json<T>(&self, path: &str, query: &[(&str, &str)]) -> Result<T, CollaboratorError>
    where
        T: DeserializeOwned,
    {
        let request = self.http.get(self.url(path)).query(query);
        self.dispatch("GET", path, request).await
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    async fn dispatch<T>(
        &self,
        method: &'static str,
        path: &str,
        request: RequestBuilder,
    ) -> Result<T, CollaboratorError>
    where
        T: DeserializeOwned,
    {
        let started = Instant::now();
        let response = request.send().await.map_err(|err| {
            debug!(
                collaborator = %self.collaborator,
                method,
                path,
                elapsed_ms = started.elapsed().as_millis() as u64,
                error = %err,
                "collaborator unreachable"
            );
            self.unavailable(&err)
        })?;

        let status = response.status();
        // A body that cannot be read in time is as good as no response.
        let body = response.bytes().await.map_err(|err| self.unavailable(&err))?;

        debug!(
            collaborator = %self.collaborator,
            method,
            path,
            status = status.as_u16(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "collaborator responded"
        );

        if !status.is_success() {
            return Err(CollaboratorError::Failed {
                collaborator: self.collaborator,
                status: status.as_u16(),
                body: String::from_utf8_lossy(&body).into_owned(),
            });
        }

        serde_json::from_slice(&body).map_err(|err| CollaboratorError::MalformedResponse {
            collaborator: self.collaborator,
            reason: err.to_string(),
        })
    }

    fn unavailable(&self, err: &reqwest::Error) -> CollaboratorError {
        let reason = if err.is_timeout() {
            "deadline elapsed".to_owned()
        } else {
            err.to_string()
        };
        CollaboratorError::Unavailable {
            collaborator: self.collaborator,
            reason,
        }
    }
}
