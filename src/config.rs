use std::{sync::Arc, time::Duration};

use crate::{DirectusClient, Result, Transport};

/// Configuration for [`DirectusClient`].
pub struct ClientConfig {
    pub(crate) base_url: String,
    pub(crate) project: Option<String>,
    pub(crate) token: Option<String>,
    pub(crate) timeout: Duration,
    pub(crate) user_agent: String,
    pub(crate) transport: Option<Arc<dyn Transport + Send + Sync>>,
}

impl ClientConfig {
    /// Create a default configuration for the Directus installation at `base_url`.
    ///
    /// ```
    /// # use directus::ClientConfig;
    /// ClientConfig::new("https://cms.example.com");
    /// ```
    pub fn new(base_url: impl Into<String>) -> Self {
        ClientConfig {
            base_url: base_url.into(),
            project: None,
            token: None,
            timeout: ClientConfig::DEFAULT_TIMEOUT,
            user_agent: ClientConfig::DEFAULT_USER_AGENT.to_owned(),
            transport: None,
        }
    }

    /// Default timeout of the built-in HTTP transport.
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

    /// Default `User-Agent` of the built-in HTTP transport.
    pub const DEFAULT_USER_AGENT: &'static str =
        concat!("directus-rust/", env!("CARGO_PKG_VERSION"));

    /// Project targeted by `:project` endpoints.
    pub fn project(&mut self, project: impl Into<String>) -> &mut Self {
        self.project = Some(project.into());
        self
    }

    /// Start the session with an already known access token.
    pub fn token(&mut self, token: impl Into<String>) -> &mut Self {
        self.token = Some(token.into());
        self
    }

    /// Request timeout. Ignored when a custom transport is set.
    pub fn timeout(&mut self, timeout: Duration) -> &mut Self {
        self.timeout = timeout;
        self
    }

    /// `User-Agent` header value. Ignored when a custom transport is set.
    pub fn user_agent(&mut self, user_agent: impl Into<String>) -> &mut Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Replace the built-in `reqwest` transport.
    ///
    /// ```
    /// # use directus::{ClientConfig, HttpRequest, HttpResponse};
    /// ClientConfig::new("https://cms.example.com").transport(
    ///     |_request: &HttpRequest| -> directus::Result<HttpResponse> {
    ///         Ok(HttpResponse { status: 200, body: br#"{"data":[]}"#.to_vec() })
    ///     },
    /// );
    /// ```
    pub fn transport(&mut self, transport: impl Transport + Send + Sync + 'static) -> &mut Self {
        self.transport = Some(Arc::new(transport));
        self
    }

    /// Create a new [`DirectusClient`] using this configuration.
    ///
    /// ```
    /// # use directus::{ClientConfig, DirectusClient};
    /// let client: DirectusClient = ClientConfig::new("https://cms.example.com")
    ///     .project("shop")
    ///     .to_client()
    ///     .unwrap();
    /// ```
    pub fn to_client(&self) -> Result<DirectusClient> {
        DirectusClient::from_config(self)
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use crate::Error;

    use super::ClientConfig;

    #[test]
    fn defaults() {
        let config = ClientConfig::new("http://localhost:8080");
        assert_eq!(config.timeout, ClientConfig::DEFAULT_TIMEOUT);
        assert!(config.user_agent.starts_with("directus-rust/"));
        assert!(config.project.is_none());
        assert!(config.token.is_none());
        assert!(config.transport.is_none());
    }

    #[test]
    fn setters_chain() {
        let mut config = ClientConfig::new("http://localhost:8080");
        config
            .project("shop")
            .token("abc")
            .timeout(Duration::from_secs(5))
            .user_agent("tests");

        assert_eq!(config.project.as_deref(), Some("shop"));
        assert_eq!(config.token.as_deref(), Some("abc"));
        assert_eq!(config.timeout, Duration::from_secs(5));
        assert_eq!(config.user_agent, "tests");
    }

    #[test]
    fn rejects_invalid_base_url() {
        let result = ClientConfig::new("not a url").to_client();
        assert!(matches!(result, Err(Error::InvalidBaseUrl(_))));
    }

    #[test]
    fn rejects_base_url_without_path() {
        let result = ClientConfig::new("mailto:admin@example.com").to_client();
        assert!(matches!(result, Err(Error::CannotBeABase)));
    }
}
