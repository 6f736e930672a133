// Speed-test endpoints

use tracing::debug;

use crate::client::PanelClient;
use crate::error::Error;
use crate::models::{ResultPage, ResultsQuery, SpeedTestRequest, SpeedTestResult, TestTicket};

impl PanelClient {
    /// List speed-test results, newest first.
    ///
    /// `GET /speedtest/results` with optional `page` / `pageSize` / `nodeId`
    /// query parameters.
    pub async fn list_results(&self, query: &ResultsQuery) -> Result<ResultPage, Error> {
        let mut url = self.api_url("speedtest/results");
        query.apply(&mut url);
        debug!("listing speed-test results");
        self.get(url).await
    }

    /// Fetch a single result.
    ///
    /// `GET /speedtest/results/{id}`
    pub async fn get_result(&self, id: &str) -> Result<SpeedTestResult, Error> {
        let url = self.api_url(&format!("speedtest/results/{id}"));
        debug!(id, "fetching speed-test result");
        self.get(url).await
    }

    /// Queue a speed test between two nodes.
    ///
    /// `POST /speedtest`. The test runs server-side; the reply only confirms
    /// acceptance. Progress is observed by re-listing results.
    pub async fn start_test(&self, request: &SpeedTestRequest) -> Result<TestTicket, Error> {
        let url = self.api_url("speedtest");
        debug!(
            source = %request.source_node_id,
            target = %request.target_node_id,
            kind = request.kind.as_str(),
            "starting speed test"
        );
        self.post(url, request).await
    }
}
