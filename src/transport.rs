//! HTTP transport used by [`DirectusClient`](crate::DirectusClient) to dispatch resolved requests.
//!
//! The client only depends on the narrow [`Transport`] contract: it hands over a fully resolved
//! [`HttpRequest`] and expects the raw status and body back. Status interpretation and JSON
//! decoding stay in the client.
use std::time::Duration;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::Result;

/// HTTP verbs supported by the API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Method {
    /// `GET`
    Get,
    /// `POST`
    Post,
    /// `PATCH`
    Patch,
    /// `DELETE`
    Delete,
}

impl Method {
    /// Upper-case verb as sent on the wire.
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Patch => "PATCH",
            Method::Delete => "DELETE",
        }
    }

    /// Whether requests with this verb carry the body attributes.
    pub fn has_body(&self) -> bool {
        matches!(self, Method::Post | Method::Patch)
    }
}

/// A fully resolved request, ready to be sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    /// HTTP verb.
    pub method: Method,
    /// Absolute URL, query string included.
    pub url: Url,
    /// Header names are lower-cased.
    pub headers: Vec<(String, String)>,
    /// JSON-encoded body attributes, present for `POST` and `PATCH` only.
    pub body: Option<Vec<u8>>,
}

impl HttpRequest {
    /// Case-insensitive header lookup.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    /// URL path without the leading slash.
    pub fn path(&self) -> &str {
        self.url.path().trim_start_matches('/')
    }

    /// Decoded query pairs, in the order they appear in the URL.
    pub fn query_pairs(&self) -> Vec<(String, String)> {
        self.url.query_pairs().into_owned().collect()
    }
}

/// Raw response as returned by the transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    /// HTTP status code.
    pub status: u16,
    /// Raw response body.
    pub body: Vec<u8>,
}

impl HttpResponse {
    /// Whether the status is in the 2xx range.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Sends a resolved request over the wire.
///
/// Implementations must return every HTTP status as `Ok`; only failures to obtain a response
/// at all (connection errors, timeouts) are reported as errors.
pub trait Transport {
    /// Send `request` and return the response, whatever its status.
    fn send(&self, request: &HttpRequest) -> Result<HttpResponse>;
}

impl<T: Fn(&HttpRequest) -> Result<HttpResponse>> Transport for T {
    fn send(&self, request: &HttpRequest) -> Result<HttpResponse> {
        self(request)
    }
}

/// Default [`Transport`] backed by a blocking `reqwest` client.
pub struct ReqwestTransport {
    // Client holds a connection pool internally, so we're reusing the client between requests.
    client: reqwest::blocking::Client,
}

impl ReqwestTransport {
    /// Create a transport with its own connection pool.
    pub fn new(timeout: Duration, user_agent: &str) -> Result<ReqwestTransport> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .build()?;
        Ok(ReqwestTransport { client })
    }

    fn build_request(&self, request: &HttpRequest) -> Result<reqwest::blocking::Request> {
        let method = match request.method {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Patch => reqwest::Method::PATCH,
            Method::Delete => reqwest::Method::DELETE,
        };

        let mut builder = self.client.request(method, request.url.clone());
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(body) = &request.body {
            // `header` appends, so only default the content type when the caller did not set one.
            if request.header("content-type").is_none() {
                builder = builder.header(reqwest::header::CONTENT_TYPE, "application/json");
            }
            builder = builder.body(body.clone());
        }

        Ok(builder.build()?)
    }
}

impl Transport for ReqwestTransport {
    fn send(&self, request: &HttpRequest) -> Result<HttpResponse> {
        let response = self.client.execute(self.build_request(request)?)?;
        let status = response.status().as_u16();
        let body = response.bytes()?.to_vec();

        Ok(HttpResponse { status, body })
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use url::Url;

    use super::{HttpRequest, HttpResponse, Method, ReqwestTransport, Transport};

    fn request() -> HttpRequest {
        HttpRequest {
            method: Method::Get,
            url: Url::parse("http://localhost:8080/shop/items/products?limit=1").unwrap(),
            headers: vec![("authorization".to_owned(), "Bearer abc".to_owned())],
            body: None,
        }
    }

    #[test]
    fn header_lookup_ignores_case() {
        let request = request();
        assert_eq!(request.header("Authorization"), Some("Bearer abc"));
        assert_eq!(request.header("AUTHORIZATION"), Some("Bearer abc"));
        assert_eq!(request.header("accept"), None);
    }

    #[test]
    fn path_has_no_leading_slash() {
        assert_eq!(request().path(), "shop/items/products");
    }

    #[test]
    fn only_writes_carry_a_body() {
        assert!(Method::Post.has_body());
        assert!(Method::Patch.has_body());
        assert!(!Method::Get.has_body());
        assert!(!Method::Delete.has_body());
    }

    fn reqwest_transport() -> ReqwestTransport {
        ReqwestTransport::new(Duration::from_secs(1), "tests").unwrap()
    }

    fn content_types(request: &reqwest::blocking::Request) -> Vec<&str> {
        request
            .headers()
            .get_all(reqwest::header::CONTENT_TYPE)
            .iter()
            .map(|value| value.to_str().unwrap())
            .collect()
    }

    #[test]
    fn writes_default_to_json_content_type() {
        let request = HttpRequest {
            method: Method::Post,
            body: Some(b"{}".to_vec()),
            ..request()
        };

        let built = reqwest_transport().build_request(&request).unwrap();
        assert_eq!(content_types(&built), vec!["application/json"]);
        assert_eq!(
            built.headers().get(reqwest::header::AUTHORIZATION).unwrap(),
            "Bearer abc"
        );
    }

    #[test]
    fn caller_content_type_is_not_duplicated() {
        let mut request = HttpRequest {
            method: Method::Patch,
            body: Some(b"{}".to_vec()),
            ..request()
        };
        request
            .headers
            .push(("content-type".to_owned(), "text/plain".to_owned()));

        let built = reqwest_transport().build_request(&request).unwrap();
        assert_eq!(content_types(&built), vec!["text/plain"]);
    }

    #[test]
    fn reads_carry_no_content_type() {
        let built = reqwest_transport().build_request(&request()).unwrap();
        assert!(content_types(&built).is_empty());
        assert!(built.body().is_none());
    }

    #[test]
    fn closures_are_transports() {
        let transport = |request: &HttpRequest| -> crate::Result<HttpResponse> {
            Ok(HttpResponse {
                status: 200,
                body: request.path().as_bytes().to_vec(),
            })
        };

        let response = transport.send(&request()).unwrap();
        assert!(response.is_success());
        assert_eq!(response.body, b"shop/items/products");
    }
}
