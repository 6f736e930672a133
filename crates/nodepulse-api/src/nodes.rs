// Node endpoints

use tracing::debug;

use crate::client::PanelClient;
use crate::error::Error;
use crate::models::{InstallCommand, Node, NodeCreated, NodeDraft, NodePage};

impl PanelClient {
    /// List all managed nodes.
    ///
    /// `GET /nodes`
    pub async fn list_nodes(&self) -> Result<NodePage, Error> {
        let url = self.api_url("nodes");
        debug!("listing nodes");
        self.get(url).await
    }

    /// Fetch a single node.
    ///
    /// `GET /nodes/{id}`
    pub async fn get_node(&self, id: &str) -> Result<Node, Error> {
        let url = self.api_url(&format!("nodes/{id}"));
        debug!(id, "fetching node");
        self.get(url).await
    }

    /// Register a new node.
    ///
    /// `POST /nodes`
    pub async fn create_node(&self, draft: &NodeDraft) -> Result<NodeCreated, Error> {
        let url = self.api_url("nodes");
        debug!(name = %draft.name, "creating node");
        self.post(url, draft).await
    }

    /// Update an existing node's editable fields.
    ///
    /// `PUT /nodes/{id}`
    pub async fn update_node(&self, id: &str, draft: &NodeDraft) -> Result<Node, Error> {
        let url = self.api_url(&format!("nodes/{id}"));
        debug!(id, "updating node");
        self.put(url, draft).await
    }

    /// Delete a node.
    ///
    /// `DELETE /nodes/{id}`
    pub async fn delete_node(&self, id: &str) -> Result<(), Error> {
        let url = self.api_url(&format!("nodes/{id}"));
        debug!(id, "deleting node");
        self.delete_unit(url).await
    }

    /// Generate the one-line agent install command for a node.
    ///
    /// `GET /nodes/{id}/install-command`
    pub async fn install_command(&self, id: &str) -> Result<InstallCommand, Error> {
        let url = self.api_url(&format!("nodes/{id}/install-command"));
        debug!(id, "generating install command");
        self.get(url).await
    }
}
