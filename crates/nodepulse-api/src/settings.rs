// Settings and stats endpoints

use tracing::debug;

use crate::client::PanelClient;
use crate::error::Error;
use crate::models::{PanelStats, Settings};

impl PanelClient {
    /// Fetch the whole settings map.
    ///
    /// `GET /settings`
    pub async fn get_settings(&self) -> Result<Settings, Error> {
        let url = self.api_url("settings");
        debug!("fetching settings");
        self.get(url).await
    }

    /// Replace the settings map wholesale.
    ///
    /// `PUT /settings`
    pub async fn update_settings(&self, settings: &Settings) -> Result<(), Error> {
        let url = self.api_url("settings");
        debug!(keys = settings.len(), "updating settings");
        self.put_unit(url, settings).await
    }

    /// Fetch the dashboard aggregates.
    ///
    /// `GET /stats`
    pub async fn stats(&self) -> Result<PanelStats, Error> {
        let url = self.api_url("stats");
        debug!("fetching stats");
        self.get(url).await
    }
}
