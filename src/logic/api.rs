// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Client for the remote inbox API.
//!
//! The API exposes a single `GET <base>/api` endpoint queried either by
//! receiver (`?to=<address>`) or by domain (`?domain=<domain>`), and answers
//! with a JSON array of [`FetchedEmail`] records (some deployments wrap the
//! array as `{"emails": [...]}`).

use std::time::Duration;

use reqwest::blocking::Client;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};
use url::Url;

use crate::config::AppConfig;
use crate::models::email::FetchedEmail;

/// Errors surfaced by the inbox API client.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("invalid API URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
    #[error("{0}")]
    Transport(#[from] reqwest::Error),
    /// Non-2xx response; `body` is the raw response text.
    #[error("{}", status_message(.body))]
    Status { status: u16, body: String },
    #[error("invalid response from server: {0}")]
    Decode(#[from] serde_json::Error),
    /// The 400 fallback request failed as well; displays the fallback's error.
    #[error("{0}")]
    Fallback(Box<ApiError>),
}

impl ApiError {
    /// HTTP status of the failing response, looking through fallbacks.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            Self::Fallback(inner) => inner.status(),
            _ => None,
        }
    }
}

/// The response body when it has text, otherwise a generic message.
fn status_message(body: &str) -> String {
    let body = body.trim();
    if body.is_empty() {
        "Request failed".to_string()
    } else {
        body.to_string()
    }
}

/// Read access to disposable inboxes.
pub trait InboxApi: Send + Sync {
    /// All messages delivered to one address.
    fn fetch_inbox(&self, address: &str) -> Result<Vec<FetchedEmail>, ApiError>;

    /// All messages delivered to any address at `domain`.
    ///
    /// Implementations retry once as a receiver query when the server rejects
    /// the domain query with HTTP 400.
    fn fetch_domain(
        &self,
        domain: &str,
        subject: Option<&str>,
    ) -> Result<Vec<FetchedEmail>, ApiError>;
}

/// Blocking HTTP implementation of [`InboxApi`].
pub struct HttpInboxClient {
    http: Client,
    endpoint: Url,
}

impl HttpInboxClient {
    /// Build a client for `<base_url>/api`.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ApiError> {
        let http = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("tempinbox/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Self::with_client(base_url, http)
    }

    pub fn from_config(config: &AppConfig) -> Result<Self, ApiError> {
        Self::new(&config.api_base_url, config.request_timeout())
    }

    /// Use a preconfigured reqwest client.
    pub fn with_client(base_url: &str, http: Client) -> Result<Self, ApiError> {
        let endpoint = endpoint_url(base_url)?;
        Ok(Self { http, endpoint })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    fn get(&self, params: &[(&str, &str)]) -> Result<Vec<FetchedEmail>, ApiError> {
        debug!(endpoint = %self.endpoint, ?params, "requesting emails");
        let response = self.http.get(self.endpoint.clone()).query(params).send()?;
        let status = response.status();
        let body = response.text()?;

        if !status.is_success() {
            warn!(status = status.as_u16(), ?params, "inbox API returned an error");
            return Err(ApiError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let emails = parse_email_list(&body)?;
        debug!(count = emails.len(), "received emails");
        Ok(emails)
    }
}

impl InboxApi for HttpInboxClient {
    fn fetch_inbox(&self, address: &str) -> Result<Vec<FetchedEmail>, ApiError> {
        self.get(&[("to", address)])
    }

    fn fetch_domain(
        &self,
        domain: &str,
        subject: Option<&str>,
    ) -> Result<Vec<FetchedEmail>, ApiError> {
        let mut params = vec![("domain", domain)];
        params.extend(subject.map(|s| ("subject", s)));

        match self.get(&params) {
            Err(err) if err.status() == Some(400) => {
                warn!(domain, "domain query rejected, retrying as receiver query");
                let mut fallback = vec![("to", domain)];
                fallback.extend(subject.map(|s| ("subject", s)));
                self.get(&fallback)
                    .map_err(|err| ApiError::Fallback(Box::new(err)))
            }
            other => other,
        }
    }
}

/// Join the configured base with the fixed `/api` path.
fn endpoint_url(base_url: &str) -> Result<Url, ApiError> {
    let joined = format!("{}/api", base_url.trim().trim_end_matches('/'));
    Ok(Url::parse(&joined)?)
}

/// Decode a response body into email records.
///
/// Accepts a bare array or an object with an `emails` array; any other JSON
/// value yields an empty list. Records with unexpected field types are
/// skipped rather than failing the whole response.
pub fn parse_email_list(body: &str) -> Result<Vec<FetchedEmail>, ApiError> {
    let items = match serde_json::from_str::<Value>(body)? {
        Value::Array(items) => items,
        Value::Object(mut map) => match map.remove("emails") {
            Some(Value::Array(items)) => items,
            _ => return Ok(Vec::new()),
        },
        _ => return Ok(Vec::new()),
    };

    Ok(items
        .into_iter()
        .filter_map(|item| match serde_json::from_value::<FetchedEmail>(item) {
            Ok(email) => Some(email),
            Err(err) => {
                warn!(%err, "skipping malformed email record");
                None
            }
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{BufRead, BufReader, Write};
    use std::net::TcpListener;
    use std::thread::{self, JoinHandle};

    /// Serve the given responses in order, one connection each, and return the
    /// request lines that were received.
    fn serve(responses: Vec<(u16, &'static str)>) -> (String, JoinHandle<Vec<String>>) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        let handle = thread::spawn(move || {
            let mut seen = Vec::new();
            for (status, body) in responses {
                let (mut stream, _) = listener.accept().unwrap();
                let mut reader = BufReader::new(stream.try_clone().unwrap());
                let mut request_line = String::new();
                reader.read_line(&mut request_line).unwrap();
                loop {
                    let mut line = String::new();
                    let n = reader.read_line(&mut line).unwrap();
                    if n == 0 || line == "\r\n" {
                        break;
                    }
                }
                seen.push(request_line.trim().to_string());
                write!(
                    stream,
                    "HTTP/1.1 {status} Status\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                    body.len()
                )
                .unwrap();
                stream.flush().unwrap();
            }
            seen
        });
        (format!("http://{addr}/api/api.php"), handle)
    }

    fn client(base: &str) -> HttpInboxClient {
        let http = Client::builder()
            .no_proxy()
            .timeout(Duration::from_secs(5))
            .build()
            .unwrap();
        HttpInboxClient::with_client(base, http).unwrap()
    }

    #[test]
    fn endpoint_appends_api_path_once() {
        let url = endpoint_url("https://cigaop.club/api/api.php/").unwrap();
        assert_eq!(url.as_str(), "https://cigaop.club/api/api.php/api");
    }

    #[test]
    fn parse_accepts_array_and_wrapped_object() {
        let array = parse_email_list(r#"[{"id":"1","subject":"a"}]"#).unwrap();
        assert_eq!(array.len(), 1);

        let wrapped = parse_email_list(r#"{"emails":[{"id":"1"},{"id":"2"}]}"#).unwrap();
        assert_eq!(wrapped.len(), 2);

        assert!(parse_email_list(r#"{"status":"ok"}"#).unwrap().is_empty());
        assert!(parse_email_list("null").unwrap().is_empty());
    }

    #[test]
    fn parse_skips_malformed_records() {
        let emails = parse_email_list(r#"[{"id":"1"},{"id":"2","subject":{"x":1}}]"#).unwrap();
        assert_eq!(emails.len(), 1);
        assert_eq!(emails[0].id, "1");
    }

    #[test]
    fn parse_keeps_records_with_null_fields() {
        let emails = parse_email_list(
            r#"[{"id":"1","from":"a@b.c","to":null,"subject":"Hi","snippet":null,"body":null,"timestamp":null}]"#,
        )
        .unwrap();

        assert_eq!(emails.len(), 1);
        assert_eq!(emails[0].subject, "Hi");
        assert!(emails[0].to.is_empty());
        assert!(emails[0].snippet.is_empty());
    }

    #[test]
    fn parse_rejects_non_json() {
        let err = parse_email_list("<html>oops</html>").unwrap_err();
        assert!(matches!(err, ApiError::Decode(_)));
    }

    #[test]
    fn fetch_inbox_sends_encoded_receiver_query() {
        let (base, server) = serve(vec![(200, r#"[{"id":"1","from":"a@b.c"}]"#)]);

        let emails = client(&base).fetch_inbox("user+x@brarov.tech").unwrap();

        assert_eq!(emails.len(), 1);
        let seen = server.join().unwrap();
        assert_eq!(seen[0], "GET /api/api.php/api?to=user%2Bx%40brarov.tech HTTP/1.1");
    }

    #[test]
    fn fetch_domain_falls_back_to_receiver_query_on_400() {
        let (base, server) = serve(vec![
            (400, "unknown parameter"),
            (200, r#"{"emails":[{"id":"9","to":"x@devilott.site"}]}"#),
        ]);

        let emails = client(&base).fetch_domain("devilott.site", None).unwrap();

        assert_eq!(emails[0].to, "x@devilott.site");
        let seen = server.join().unwrap();
        assert!(seen[0].contains("?domain=devilott.site"));
        assert!(seen[1].contains("?to=devilott.site"));
    }

    #[test]
    fn fallback_keeps_subject_and_reports_body() {
        let (base, server) = serve(vec![(400, ""), (500, "server exploded")]);

        let err = client(&base)
            .fetch_domain("devilott.art", Some("promo"))
            .unwrap_err();

        assert!(matches!(err, ApiError::Fallback(_)));
        assert_eq!(err.to_string(), "server exploded");
        assert_eq!(err.status(), Some(500));
        let seen = server.join().unwrap();
        assert!(seen[1].contains("to=devilott.art&subject=promo"));
    }

    #[test]
    fn failed_fallback_with_empty_body_reads_request_failed() {
        let (base, server) = serve(vec![(400, ""), (500, "")]);

        let err = client(&base).fetch_domain("vaultmail.xyz", None).unwrap_err();

        assert!(matches!(err, ApiError::Fallback(_)));
        assert_eq!(err.to_string(), "Request failed");
        assert_eq!(err.status(), Some(500));
        assert_eq!(server.join().unwrap().len(), 2);
    }

    #[test]
    fn non_400_errors_do_not_retry() {
        let (base, server) = serve(vec![(503, "")]);

        let err = client(&base).fetch_domain("brarov.tech", None).unwrap_err();

        assert_eq!(err.status(), Some(503));
        assert_eq!(err.to_string(), "Request failed");
        assert_eq!(server.join().unwrap().len(), 1);
    }
}
