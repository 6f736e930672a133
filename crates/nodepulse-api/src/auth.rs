// Authentication endpoints
//
// Login is the one call that never carries a bearer credential, even when a
// stale token is still installed; it goes through the raw HTTP client with
// an explicit JSON content type.

use secrecy::{ExposeSecret, SecretString};
use serde_json::json;
use tracing::debug;

use crate::client::{PanelClient, parse_envelope};
use crate::error::Error;
use crate::models::{LoginReply, User};

impl PanelClient {
    /// Authenticate with username/password.
    ///
    /// `POST /login`. Returns the issued token and user; the token is NOT
    /// installed on the client — that is the caller's decision.
    pub async fn login(&self, username: &str, password: &SecretString) -> Result<LoginReply, Error> {
        let url = self.api_url("login");
        debug!(username, "logging in");

        let body = json!({
            "username": username,
            "password": password.expose_secret(),
        });

        let resp = self
            .http()
            .post(url)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .json(&body)
            .send()
            .await
            .map_err(Error::Transport)?;

        parse_envelope(resp).await?.ok_or_else(|| Error::Deserialization {
            message: "login reply carried no data".into(),
            body: String::new(),
        })
    }

    /// End the current session.
    ///
    /// `POST /logout`. The installed token is left untouched; callers clear
    /// it themselves so local logout succeeds even when this call fails.
    pub async fn logout(&self) -> Result<(), Error> {
        let url = self.api_url("logout");
        debug!("logging out");
        self.post_unit(url, &json!({})).await
    }

    /// Fetch the user owning the current session token.
    ///
    /// `GET /user`. Fails with an authentication error when the token is
    /// missing, expired, or revoked — the bootstrap path relies on that.
    pub async fn current_user(&self) -> Result<User, Error> {
        let url = self.api_url("user");
        debug!("fetching current user");
        self.get(url).await
    }
}
