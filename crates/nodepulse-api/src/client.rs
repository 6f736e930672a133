// Panel API HTTP client
//
// Wraps `reqwest::Client` with panel-specific URL construction, per-request
// header building, and envelope unwrapping. Endpoint methods live in the
// per-resource modules (auth, nodes, speedtest, ...) as inherent impls,
// keeping this module focused on transport mechanics.

use std::sync::RwLock;

use reqwest::StatusCode;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use crate::error::Error;
use crate::models::Envelope;
use crate::transport::TransportConfig;

/// Raw HTTP client for the speed-test panel API.
///
/// Handles the `{ code, message, data }` envelope and bearer-token
/// attachment. All methods return unwrapped `data` payloads — callers never
/// see the envelope.
pub struct PanelClient {
    http: reqwest::Client,
    base_url: Url,
    /// Session token. Read on every request so login/logout between calls
    /// takes effect immediately; never baked into default headers.
    token: RwLock<Option<SecretString>>,
}

impl PanelClient {
    /// Create a new client from a `TransportConfig`. The `base_url` is the
    /// panel root (e.g. `http://panel.example:8080`); endpoint paths are
    /// joined under `/api`.
    pub fn new(base_url: Url, transport: &TransportConfig) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Ok(Self::with_client(http, base_url))
    }

    /// Create a client with a pre-built `reqwest::Client` (tests, custom TLS).
    pub fn with_client(http: reqwest::Client, base_url: Url) -> Self {
        Self {
            http,
            base_url,
            token: RwLock::new(None),
        }
    }

    /// The panel base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// The underlying HTTP client (for flows that bypass the envelope).
    pub(crate) fn http(&self) -> &reqwest::Client {
        &self.http
    }

    // ── Token management ─────────────────────────────────────────────

    /// Install the session token used for subsequent requests.
    pub fn set_token(&self, token: SecretString) {
        debug!("installing session token");
        *self.token.write().expect("token lock poisoned") = Some(token);
    }

    /// Drop the session token (logout / expired session).
    pub fn clear_token(&self) {
        debug!("clearing session token");
        *self.token.write().expect("token lock poisoned") = None;
    }

    /// Whether a session token is currently installed.
    pub fn has_token(&self) -> bool {
        self.token.read().expect("token lock poisoned").is_some()
    }

    /// Build the per-request header set: always a JSON content type, plus
    /// the bearer credential when a token is installed. Recomputed on every
    /// call — the token can change between calls.
    pub(crate) fn request_headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let guard = self.token.read().expect("token lock poisoned");
        if let Some(token) = guard.as_ref() {
            if let Ok(mut value) =
                HeaderValue::from_str(&format!("Bearer {}", token.expose_secret()))
            {
                value.set_sensitive(true);
                headers.insert(AUTHORIZATION, value);
            }
        }
        headers
    }

    // ── URL builder ──────────────────────────────────────────────────

    /// Build a full URL for an API path: `{base}/api/{path}`.
    pub(crate) fn api_url(&self, path: &str) -> Url {
        let base = self.base_url.as_str().trim_end_matches('/');
        let full = format!("{base}/api/{path}");
        Url::parse(&full).expect("invalid API URL")
    }

    // ── Request helpers ──────────────────────────────────────────────

    /// GET, expecting a data payload.
    pub(crate) async fn get<T: DeserializeOwned>(&self, url: Url) -> Result<T, Error> {
        debug!("GET {}", url);
        let resp = self
            .http
            .get(url)
            .headers(self.request_headers())
            .send()
            .await
            .map_err(Error::Transport)?;
        require_data(parse_envelope(resp).await?)
    }

    /// POST with a JSON body, expecting a data payload.
    pub(crate) async fn post<T: DeserializeOwned>(
        &self,
        url: Url,
        body: &(impl Serialize + Sync),
    ) -> Result<T, Error> {
        debug!("POST {}", url);
        let resp = self
            .http
            .post(url)
            .headers(self.request_headers())
            .json(body)
            .send()
            .await
            .map_err(Error::Transport)?;
        require_data(parse_envelope(resp).await?)
    }

    /// POST with a JSON body, ignoring any data payload.
    pub(crate) async fn post_unit(
        &self,
        url: Url,
        body: &(impl Serialize + Sync),
    ) -> Result<(), Error> {
        debug!("POST {}", url);
        let resp = self
            .http
            .post(url)
            .headers(self.request_headers())
            .json(body)
            .send()
            .await
            .map_err(Error::Transport)?;
        parse_envelope::<serde_json::Value>(resp).await.map(|_| ())
    }

    /// PUT with a JSON body, expecting a data payload.
    pub(crate) async fn put<T: DeserializeOwned>(
        &self,
        url: Url,
        body: &(impl Serialize + Sync),
    ) -> Result<T, Error> {
        debug!("PUT {}", url);
        let resp = self
            .http
            .put(url)
            .headers(self.request_headers())
            .json(body)
            .send()
            .await
            .map_err(Error::Transport)?;
        require_data(parse_envelope(resp).await?)
    }

    /// PUT with a JSON body, ignoring any data payload.
    pub(crate) async fn put_unit(
        &self,
        url: Url,
        body: &(impl Serialize + Sync),
    ) -> Result<(), Error> {
        debug!("PUT {}", url);
        let resp = self
            .http
            .put(url)
            .headers(self.request_headers())
            .json(body)
            .send()
            .await
            .map_err(Error::Transport)?;
        parse_envelope::<serde_json::Value>(resp).await.map(|_| ())
    }

    /// DELETE, ignoring any data payload.
    pub(crate) async fn delete_unit(&self, url: Url) -> Result<(), Error> {
        debug!("DELETE {}", url);
        let resp = self
            .http
            .delete(url)
            .headers(self.request_headers())
            .send()
            .await
            .map_err(Error::Transport)?;
        parse_envelope::<serde_json::Value>(resp).await.map(|_| ())
    }
}

/// Parse the `{ code, message, data }` envelope.
///
/// Returns the (possibly absent) `data` on `code == 0`. Any other code is a
/// failure regardless of HTTP status; a non-JSON body falls back to
/// status-based errors.
pub(crate) async fn parse_envelope<T: DeserializeOwned>(
    resp: reqwest::Response,
) -> Result<Option<T>, Error> {
    let status = resp.status();
    let body = resp.text().await.map_err(Error::Transport)?;

    let envelope: Envelope<T> = match serde_json::from_str(&body) {
        Ok(envelope) => envelope,
        Err(e) => {
            if status == StatusCode::UNAUTHORIZED {
                return Err(Error::Authentication {
                    message: "session expired or missing credentials".into(),
                });
            }
            if !status.is_success() {
                return Err(Error::Http {
                    status: status.as_u16(),
                    message: preview(&body),
                });
            }
            return Err(Error::Deserialization {
                message: format!("{e} (body preview: {:?})", preview(&body)),
                body,
            });
        }
    };

    match envelope.code {
        0 => Ok(envelope.data),
        401 => Err(Error::Authentication {
            message: envelope
                .message
                .unwrap_or_else(|| "authentication required".into()),
        }),
        code => Err(Error::Api {
            code,
            message: envelope.message.unwrap_or_else(|| format!("code={code}")),
        }),
    }
}

fn require_data<T>(data: Option<T>) -> Result<T, Error> {
    data.ok_or_else(|| Error::Deserialization {
        message: "reply envelope carried no data".into(),
        body: String::new(),
    })
}

fn preview(body: &str) -> String {
    body.chars().take(200).collect()
}
