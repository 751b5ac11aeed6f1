use std::{collections::BTreeMap, fmt::Display, sync::Arc};

use serde_json::{Map, Value};
use url::Url;

use crate::{
    query::{self, Filter, QueryValue},
    template::Template,
    ClientConfig, Endpoint, Error, HttpRequest, HttpResponse, Method, ReqwestTransport, Result,
    Transport,
};

/// A fluent client for the Directus API.
///
/// The client accumulates one request at a time: select an endpoint, bind its placeholders, add
/// query parameters, body attributes and headers, then run a verb. After a successful call the
/// pending request is cleared, while the session (project and access token) is kept so the
/// client can be reused right away.
///
/// A client holds the state of a single in-flight request. Use [`DirectusClient::fork`] to get an
/// independent client for the same session.
///
/// # Examples
/// ```no_run
/// # use directus::{DirectusClient, Endpoint};
/// let mut client = DirectusClient::new("https://cms.example.com", Some("shop"))?;
/// client.authenticate("admin@example.com", "password", None, None)?;
///
/// let products = client
///     .endpoint(Endpoint::Items)
///     .parameter("collection", "products")
///     .sort(["-price", "name"])
///     .limit(10)
///     .get()?;
/// # Ok::<(), directus::Error>(())
/// ```
pub struct DirectusClient {
    base_url: Url,
    transport: Arc<dyn Transport + Send + Sync>,
    project: Option<String>,
    token: Option<String>,
    pending: PendingRequest,
}

/// The request being assembled by a [`DirectusClient`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PendingRequest {
    /// Selected endpoint, if any.
    pub template: Option<Template>,
    /// Values bound to `:name` placeholders.
    pub parameters: BTreeMap<String, String>,
    /// Normalized query parameters.
    pub queries: BTreeMap<String, QueryValue>,
    /// Body attributes.
    pub attributes: Map<String, Value>,
    /// Keyed by lower-cased header name.
    pub headers: BTreeMap<String, String>,
}

impl DirectusClient {
    /// Create a client with the default HTTP transport.
    pub fn new(base_url: &str, project: Option<&str>) -> Result<Self> {
        let mut config = ClientConfig::new(base_url);
        if let Some(project) = project {
            config.project(project);
        }
        config.to_client()
    }

    pub(crate) fn from_config(config: &ClientConfig) -> Result<Self> {
        let base_url = Url::parse(&config.base_url).map_err(Error::InvalidBaseUrl)?;
        if base_url.cannot_be_a_base() {
            return Err(Error::CannotBeABase);
        }

        let transport: Arc<dyn Transport + Send + Sync> = match &config.transport {
            Some(transport) => Arc::clone(transport),
            None => Arc::new(ReqwestTransport::new(config.timeout, &config.user_agent)?),
        };

        let mut client = DirectusClient {
            base_url,
            transport,
            project: config.project.clone(),
            token: None,
            pending: PendingRequest::default(),
        };
        if let Some(token) = &config.token {
            client.set_token(token.clone());
        }
        client.clear();

        Ok(client)
    }

    /// A new client for the same session, with a fresh pending request.
    ///
    /// The transport is shared; project and token are copied.
    pub fn fork(&self) -> DirectusClient {
        let mut client = DirectusClient {
            base_url: self.base_url.clone(),
            transport: Arc::clone(&self.transport),
            project: self.project.clone(),
            token: self.token.clone(),
            pending: PendingRequest::default(),
        };
        client.clear();
        client
    }

    /// Base URL every endpoint is resolved against.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Project of the session.
    pub fn project(&self) -> Option<&str> {
        self.project.as_deref()
    }

    /// Access token of the session.
    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    /// The request assembled so far.
    pub fn pending(&self) -> &PendingRequest {
        &self.pending
    }

    /// Select a registered endpoint.
    pub fn endpoint(&mut self, endpoint: Endpoint) -> &mut Self {
        self.select(endpoint)
    }

    /// Select an arbitrary endpoint template. Bindings made so far are kept.
    pub fn select(&mut self, template: impl Into<Template>) -> &mut Self {
        self.pending.template = Some(template.into());
        self
    }

    /// Select an endpoint provided by a custom extension, `custom/<path>`.
    pub fn custom<I, K, V>(&mut self, path: &str, parameters: I) -> &mut Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Display,
    {
        self.select(format!("custom/{}", path.trim_start_matches('/')))
            .parameters(parameters)
    }

    /// Bind the `:name` placeholder.
    pub fn parameter(&mut self, name: impl Into<String>, value: impl Display) -> &mut Self {
        self.pending
            .parameters
            .insert(name.into(), value.to_string());
        self
    }

    /// Bind several placeholders at once. Later bindings win.
    pub fn parameters<I, K, V>(&mut self, parameters: I) -> &mut Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Display,
    {
        for (name, value) in parameters {
            self.parameter(name, value);
        }
        self
    }

    /// Set a query parameter, normalizing the value for recognized keys.
    pub fn query(&mut self, key: impl Into<String>, value: impl Into<QueryValue>) -> &mut Self {
        let key = key.into();
        let value = query::normalize(&key, value.into());
        self.pending.queries.insert(key, value);
        self
    }

    /// Set several query parameters at once.
    pub fn queries<I, K, V>(&mut self, queries: I) -> &mut Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<QueryValue>,
    {
        for (key, value) in queries {
            self.query(key, value);
        }
        self
    }

    /// Set a body attribute. Attributes are sent with `POST` and `PATCH`.
    pub fn attribute(&mut self, key: impl Into<String>, value: impl Into<Value>) -> &mut Self {
        self.pending.attributes.insert(key.into(), value.into());
        self
    }

    /// Set several body attributes at once.
    pub fn attributes<I, K, V>(&mut self, attributes: I) -> &mut Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        for (key, value) in attributes {
            self.attribute(key, value);
        }
        self
    }

    /// Set a request header. Names are case-insensitive.
    pub fn header(&mut self, name: impl AsRef<str>, value: impl Into<String>) -> &mut Self {
        self.pending
            .headers
            .insert(name.as_ref().to_ascii_lowercase(), value.into());
        self
    }

    /// Use `token` as the bearer token for this and all following requests.
    pub fn set_token(&mut self, token: impl Into<String>) -> &mut Self {
        let token = token.into();
        log::debug!(target: "directus", "session token updated");
        self.header("Authorization", format!("Bearer {token}"));
        self.token = Some(token);
        self
    }

    /// Return the result as a single object instead of a list.
    pub fn single(&mut self, single: bool) -> &mut Self {
        self.query("single", single)
    }

    /// Maximum number of items returned. `-1` returns everything.
    pub fn limit(&mut self, limit: i64) -> &mut Self {
        self.query("limit", limit)
    }

    /// Return all items.
    pub fn all(&mut self) -> &mut Self {
        self.limit(-1)
    }

    /// Number of items to skip.
    pub fn offset(&mut self, offset: i64) -> &mut Self {
        self.query("offset", offset)
    }

    /// Page of results, counted from 1, sized by `limit`.
    pub fn page(&mut self, page: i64) -> &mut Self {
        self.query("page", page)
    }

    /// Metadata to return, `*` for all of it.
    pub fn meta(&mut self, meta: impl Into<QueryValue>) -> &mut Self {
        self.query("meta", meta)
    }

    /// Item statuses to return, `*` for all of them.
    pub fn status(&mut self, status: impl Into<QueryValue>) -> &mut Self {
        self.query("status", status)
    }

    /// Sort fields; prefix a field with `-` for descending order.
    pub fn sort(&mut self, sort: impl Into<QueryValue>) -> &mut Self {
        self.query("sort", sort)
    }

    /// Full-text search.
    pub fn q(&mut self, q: impl Into<String>) -> &mut Self {
        self.query("q", q.into())
    }

    /// Only return items matching `filter`.
    pub fn filter(&mut self, filter: Filter) -> &mut Self {
        self.query("filter", filter)
    }

    /// Fields to return. Dotted paths reach into relations.
    pub fn fields(&mut self, fields: impl Into<QueryValue>) -> &mut Self {
        self.query("fields", fields)
    }

    /// Drop the pending request and go back to the session baseline.
    pub fn clear(&mut self) -> &mut Self {
        self.pending = PendingRequest::default();

        if let Some(project) = self.project.clone() {
            self.parameter("project", &project);
            self.query("project", project);
        }
        if let Some(token) = &self.token {
            let authorization = format!("Bearer {token}");
            self.header("Authorization", authorization);
        }

        self
    }

    /// Resolve the pending request without sending it.
    pub fn prepare(&self, method: Method) -> Result<HttpRequest> {
        let template = self.pending.template.as_ref().ok_or(Error::NoEndpoint)?;
        let segments = template.resolve(&self.pending.parameters)?;

        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| Error::CannotBeABase)?
            .pop_if_empty()
            .extend(&segments);

        if !self.pending.queries.is_empty() {
            let mut serializer = url.query_pairs_mut();
            for (key, value) in &self.pending.queries {
                for (name, value) in query::to_pairs(key, value) {
                    serializer.append_pair(&name, &value);
                }
            }
        }

        let body = if method.has_body() {
            let body = serde_json::to_vec(&self.pending.attributes)
                .map_err(|err| Error::Encode(Arc::new(err)))?;
            Some(body)
        } else {
            None
        };

        let headers = self
            .pending
            .headers
            .iter()
            .map(|(name, value)| (name.clone(), value.clone()))
            .collect();

        Ok(HttpRequest {
            method,
            url,
            headers,
            body,
        })
    }

    /// Send the pending request and decode the JSON response.
    ///
    /// API-level errors are returned as `Ok`; check them with [`DirectusClient::is_error`]. On
    /// success the pending request is cleared. On failure it is left untouched so the request can
    /// be inspected or retried.
    pub fn execute(&mut self, method: Method) -> Result<Value> {
        let request = self.prepare(method)?;

        log::debug!(target: "directus",
                    method = method.as_str(),
                    url:% = request.url;
                    "sending request");

        let response = self.transport.send(&request).inspect_err(|err| {
            log::warn!(target: "directus",
                       method = method.as_str(),
                       url:% = request.url;
                       "request failed: {:?}", err);
        })?;

        let status = response.status;
        let value = decode(response).inspect_err(|err| {
            log::warn!(target: "directus",
                       method = method.as_str(),
                       url:% = request.url,
                       status;
                       "failed to decode response: {:?}", err);
        })?;

        if Self::is_error(&value) {
            log::debug!(target: "directus",
                        method = method.as_str(),
                        url:% = request.url,
                        status;
                        "API returned an error");
        }
        log::trace!(target: "directus",
                    response:serde = value;
                    "received response");

        self.clear();
        Ok(value)
    }

    /// Shorthand for `execute(Method::Get)`.
    pub fn get(&mut self) -> Result<Value> {
        self.execute(Method::Get)
    }

    /// Shorthand for `execute(Method::Post)`.
    pub fn post(&mut self) -> Result<Value> {
        self.execute(Method::Post)
    }

    /// Shorthand for `execute(Method::Patch)`.
    pub fn patch(&mut self) -> Result<Value> {
        self.execute(Method::Patch)
    }

    /// Shorthand for `execute(Method::Delete)`.
    pub fn delete(&mut self) -> Result<Value> {
        self.execute(Method::Delete)
    }

    /// Whether a decoded response carries an API error.
    pub fn is_error(response: &Value) -> bool {
        response.get("error").is_some_and(|error| !error.is_null())
    }

    /// Retrieve a temporary access token and use it for the rest of the session.
    ///
    /// `mode` is either `jwt` (default) or `cookie`. `otp` is required when 2FA is enabled. The
    /// response is returned as is; the token is only stored when the response is not an error
    /// and contains `data.token`.
    pub fn authenticate(
        &mut self,
        email: &str,
        password: &str,
        mode: Option<&str>,
        otp: Option<&str>,
    ) -> Result<Value> {
        self.endpoint(Endpoint::Authenticate)
            .attribute("email", email)
            .attribute("password", password);
        if let Some(mode) = mode {
            self.attribute("mode", mode);
        }
        if let Some(otp) = otp {
            self.attribute("otp", otp);
        }

        let response = self.post()?;
        self.store_token(&response);
        Ok(response)
    }

    /// Exchange the current token for a fresh one.
    pub fn refresh_token(&mut self) -> Result<Value> {
        let token = self.token.clone().ok_or(Error::MissingToken)?;

        let response = self
            .endpoint(Endpoint::RefreshToken)
            .attribute("token", token)
            .post()?;
        self.store_token(&response);
        Ok(response)
    }

    fn store_token(&mut self, response: &Value) {
        if Self::is_error(response) {
            return;
        }
        if let Some(token) = response.pointer("/data/token").and_then(Value::as_str) {
            self.set_token(token);
        }
    }
}

fn decode(response: HttpResponse) -> Result<Value> {
    if response.is_success() && response.body.iter().all(u8::is_ascii_whitespace) {
        return Ok(Value::Null);
    }

    match serde_json::from_slice(&response.body) {
        Ok(value) => Ok(value),
        Err(err) if response.is_success() => Err(Error::Decode(Arc::new(err))),
        Err(_) => Err(Error::Http {
            status: response.status,
            body: String::from_utf8_lossy(&response.body).into_owned(),
        }),
    }
}
