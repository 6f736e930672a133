// ── Panel view-model ──
//
// Single source of truth for the panel UI: which page is shown, what data
// is loaded for it, the busy flag, and the dark-mode preference. Action
// handlers perform one HTTP round trip each and reconcile the reply into
// state; shells (CLI / TUI) subscribe through watch channels and decide how
// to surface failures.
//
// Error surfacing follows the panel's two tiers: load handlers log their
// failure and hand it back, and every routed or cascaded invocation
// discards it — passive navigation never alerts. User-initiated actions
// (login, save, delete, install-command, speedtest, settings) propagate the
// failure so the shell can alert with the server's message.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use secrecy::SecretString;
use tokio::sync::watch;
use tracing::{debug, warn};

use nodepulse_api::{
    InstallCommand, Node, NodeDraft, PanelClient, PanelStats, ResultPage, ResultsQuery, Settings,
    SpeedTestRequest, SpeedTestResult, TestKind, TestTicket, User,
};

use crate::error::CoreError;
use crate::session::StateStore;
use crate::store::Snapshot;

/// Delay before the fire-and-forget results reload after queueing a test.
const RESULTS_RELOAD_DELAY: Duration = Duration::from_secs(3);

// ── Pages ───────────────────────────────────────────────────────────

/// The panel's pages. Switching pages triggers the page's load action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Page {
    #[default]
    Login,
    Dashboard,
    Nodes,
    Speedtest,
    Settings,
}

impl Page {
    /// Pages reachable from navigation, in tab order. Login is routed to by
    /// session state, never by navigation.
    pub const TABS: [Page; 4] = [Self::Dashboard, Self::Nodes, Self::Speedtest, Self::Settings];

    pub fn title(self) -> &'static str {
        match self {
            Self::Login => "Login",
            Self::Dashboard => "Dashboard",
            Self::Nodes => "Nodes",
            Self::Speedtest => "Speedtest",
            Self::Settings => "Settings",
        }
    }
}

// ── Forms ───────────────────────────────────────────────────────────

/// How an open node form routes its save: `Add` POSTs to /nodes, `Edit`
/// PUTs to /nodes/{id}. Captured when the form is opened — never inferred
/// from whether the draft carries an id, since an edit form cleared by the
/// user would otherwise misroute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeFormMode {
    Add,
    Edit,
}

/// An open node create/edit form.
#[derive(Debug, Clone)]
pub struct NodeForm {
    pub mode: NodeFormMode,
    pub draft: NodeDraft,
}

// ── Panel ───────────────────────────────────────────────────────────

/// The panel view-model. Cheaply cloneable; all state lives behind an Arc.
#[derive(Clone)]
pub struct Panel {
    inner: Arc<PanelInner>,
}

struct PanelInner {
    client: PanelClient,
    state: Box<dyn StateStore>,
    reload_delay: Duration,

    // Scalar view state
    page: watch::Sender<Page>,
    busy: watch::Sender<bool>,
    dark_mode: watch::Sender<bool>,
    user: watch::Sender<Option<Arc<User>>>,
    login_error: watch::Sender<Option<String>>,

    // Collection snapshots (full replacement on every load)
    nodes: Snapshot<Vec<Node>>,
    results: Snapshot<Vec<SpeedTestResult>>,
    stats: Snapshot<PanelStats>,
    settings: Snapshot<Settings>,

    // Modal / form state
    node_form: watch::Sender<Option<NodeForm>>,
    speedtest_form: watch::Sender<Option<SpeedTestRequest>>,
    install_command: watch::Sender<Option<InstallCommand>>,
    /// Editable copy of the settings map; saved wholesale.
    settings_form: Mutex<Settings>,
}

/// Sets the shared busy flag on creation and clears it on drop, so every
/// exit path of a handler releases it. Not reference-counted: the flag is a
/// UI affordance, not a lock, and overlapping handlers may stomp each
/// other's clears.
struct BusyGuard<'a> {
    busy: &'a watch::Sender<bool>,
}

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.busy.send_replace(false);
    }
}

impl Panel {
    pub fn new(client: PanelClient, state: impl StateStore) -> Self {
        Self::with_reload_delay(client, state, RESULTS_RELOAD_DELAY)
    }

    /// Like [`new`](Self::new) with an explicit post-speedtest reload delay.
    pub fn with_reload_delay(
        client: PanelClient,
        state: impl StateStore,
        reload_delay: Duration,
    ) -> Self {
        let dark_mode = state.load_dark_mode();
        Self {
            inner: Arc::new(PanelInner {
                client,
                state: Box::new(state),
                reload_delay,
                page: watch::Sender::new(Page::default()),
                busy: watch::Sender::new(false),
                dark_mode: watch::Sender::new(dark_mode),
                user: watch::Sender::new(None),
                login_error: watch::Sender::new(None),
                nodes: Snapshot::default(),
                results: Snapshot::default(),
                stats: Snapshot::default(),
                settings: Snapshot::default(),
                node_form: watch::Sender::new(None),
                speedtest_form: watch::Sender::new(None),
                install_command: watch::Sender::new(None),
                settings_form: Mutex::new(Settings::new()),
            }),
        }
    }

    fn busy_guard(&self) -> BusyGuard<'_> {
        self.inner.busy.send_replace(true);
        BusyGuard {
            busy: &self.inner.busy,
        }
    }

    // ── Session lifecycle ────────────────────────────────────────────

    /// Restore a previously persisted session, if any.
    ///
    /// Silent on every failure path: a missing token leaves the panel
    /// logged out, a rejected or unreachable validation discards the token
    /// and leaves the panel logged out. No retry, no alert.
    pub async fn bootstrap(&self) -> bool {
        if self.restore_session().await {
            self.goto(Page::Dashboard).await;
            true
        } else {
            false
        }
    }

    /// Validate and install the persisted session without routing anywhere.
    /// One-shot consumers (the CLI) use this to skip the dashboard cascade.
    pub async fn restore_session(&self) -> bool {
        let Some(token) = self.inner.state.load_token() else {
            debug!("no persisted session token");
            return false;
        };

        self.inner.client.set_token(token);
        match self.inner.client.current_user().await {
            Ok(user) => {
                debug!(username = %user.username, "session restored");
                self.inner.user.send_replace(Some(Arc::new(user)));
                true
            }
            Err(err) => {
                debug!(error = %err, "persisted session rejected, discarding token");
                self.inner.state.clear_token();
                self.inner.client.clear_token();
                false
            }
        }
    }

    /// Authenticate and open the dashboard.
    ///
    /// On success the token is persisted and installed before the page
    /// routes. On failure the message lands in [`login_error`]
    /// (the login form's inline error) and nothing is persisted.
    ///
    /// [`login_error`]: Self::login_error
    pub async fn login(&self, username: &str, password: &SecretString) -> Result<(), CoreError> {
        let _busy = self.busy_guard();
        self.inner.login_error.send_replace(None);

        match self.inner.client.login(username, password).await {
            Ok(reply) => {
                let token = SecretString::from(reply.token);
                self.inner.state.save_token(&token);
                self.inner.client.set_token(token);
                self.inner.user.send_replace(Some(Arc::new(reply.user)));
                self.goto(Page::Dashboard).await;
                Ok(())
            }
            Err(err) => {
                warn!(error = %err, "login failed");
                let message = err
                    .server_message()
                    .unwrap_or("login failed, try again later")
                    .to_owned();
                self.inner.login_error.send_replace(Some(message));
                Err(err.into())
            }
        }
    }

    /// End the session.
    ///
    /// Any reply from the panel — success or rejection — discards the local
    /// session; only a transport failure leaves it intact.
    pub async fn logout(&self) -> Result<(), CoreError> {
        let _busy = self.busy_guard();

        match self.inner.client.logout().await {
            Ok(()) => {}
            Err(err @ nodepulse_api::Error::Transport(_)) => {
                warn!(error = %err, "logout request failed");
                return Err(err.into());
            }
            Err(err) => {
                warn!(error = %err, "logout rejected by panel, clearing session anyway");
            }
        }

        self.clear_session().await;
        Ok(())
    }

    /// Drop the local session and route to the login page.
    pub async fn clear_session(&self) {
        self.inner.state.clear_token();
        self.inner.client.clear_token();
        self.inner.user.send_replace(None);
        self.goto(Page::Login).await;
    }

    // ── Page router ──────────────────────────────────────────────────

    /// Switch pages. The page is committed first, then the page's load
    /// action runs; its failure is absorbed (passive navigation never
    /// alerts).
    pub async fn goto(&self, page: Page) {
        self.inner.page.send_replace(page);
        let _ = match page {
            Page::Dashboard => self.load_dashboard().await,
            Page::Nodes => self.load_nodes().await,
            Page::Speedtest => self.load_results().await,
            Page::Settings => self.load_settings().await,
            Page::Login => Ok(()),
        };
    }

    // ── Load handlers ────────────────────────────────────────────────

    /// Load the dashboard: stats, then nodes, then recent results.
    ///
    /// A rejected stats envelope is skipped and the cascade continues; a
    /// transport failure aborts the remaining loads.
    pub async fn load_dashboard(&self) -> Result<(), CoreError> {
        let _busy = self.busy_guard();

        match self.inner.client.stats().await {
            Ok(stats) => self.inner.stats.replace(stats),
            Err(err @ nodepulse_api::Error::Api { .. }) => {
                warn!(error = %err, "stats load rejected");
            }
            Err(err) => {
                warn!(error = %err, "dashboard load failed");
                return Err(err.into());
            }
        }

        self.load_nodes().await?;
        self.load_results().await?;
        Ok(())
    }

    /// Replace the node list with the server's current snapshot.
    pub async fn load_nodes(&self) -> Result<(), CoreError> {
        let _busy = self.busy_guard();
        match self.inner.client.list_nodes().await {
            Ok(page) => {
                self.inner.nodes.replace(page.nodes);
                Ok(())
            }
            Err(err) => {
                warn!(error = %err, "node list load failed");
                Err(err.into())
            }
        }
    }

    /// Replace the speed-test result list with the server's current snapshot.
    pub async fn load_results(&self) -> Result<(), CoreError> {
        let _busy = self.busy_guard();
        match self.inner.client.list_results(&ResultsQuery::default()).await {
            Ok(page) => {
                self.inner.results.replace(page.results);
                Ok(())
            }
            Err(err) => {
                warn!(error = %err, "result list load failed");
                Err(err.into())
            }
        }
    }

    /// Replace the settings map and reset the editable copy to match.
    pub async fn load_settings(&self) -> Result<(), CoreError> {
        let _busy = self.busy_guard();
        match self.inner.client.get_settings().await {
            Ok(settings) => {
                *self.inner.settings_form.lock().expect("settings form lock poisoned") =
                    settings.clone();
                self.inner.settings.replace(settings);
                Ok(())
            }
            Err(err) => {
                warn!(error = %err, "settings load failed");
                Err(err.into())
            }
        }
    }

    // ── Node actions ─────────────────────────────────────────────────

    /// Open an empty node form in Add mode.
    pub fn open_add_node_form(&self) {
        self.inner.node_form.send_replace(Some(NodeForm {
            mode: NodeFormMode::Add,
            draft: NodeDraft::default(),
        }));
    }

    /// Open a node form in Edit mode, pre-populated from an existing node.
    pub fn open_edit_node_form(&self, node: &Node) {
        self.inner.node_form.send_replace(Some(NodeForm {
            mode: NodeFormMode::Edit,
            draft: NodeDraft {
                id: node.id.clone(),
                name: node.name.clone(),
                ip: node.ip.clone(),
                location: node.location.clone(),
                description: node.description.clone(),
                tags: node.tags.clone(),
            },
        }));
    }

    /// Mutate the open node form in place (no-op when none is open).
    pub fn update_node_form(&self, f: impl FnOnce(&mut NodeDraft)) {
        self.inner.node_form.send_modify(|form| {
            if let Some(form) = form.as_mut() {
                f(&mut form.draft);
            }
        });
    }

    /// Close the node form without saving.
    pub fn close_node_form(&self) {
        self.inner.node_form.send_replace(None);
    }

    /// Save the open node form: Add mode POSTs, Edit mode PUTs. On success
    /// the form closes and the node list reloads; on failure the form stays
    /// open for correction.
    pub async fn save_node(&self) -> Result<(), CoreError> {
        let form = self.inner.node_form.borrow().clone();
        let Some(form) = form else {
            return Err(CoreError::ValidationFailed {
                message: "no node form is open".into(),
            });
        };

        self.submit_node(form.mode, &form.draft).await?;
        self.inner.node_form.send_replace(None);
        Ok(())
    }

    /// Create or update a node directly (the CLI path — no form involved).
    /// Routing is decided by `mode` alone, never by the draft's id field.
    pub async fn submit_node(&self, mode: NodeFormMode, draft: &NodeDraft) -> Result<(), CoreError> {
        let _busy = self.busy_guard();

        let outcome = match mode {
            NodeFormMode::Edit => self
                .inner
                .client
                .update_node(&draft.id, draft)
                .await
                .map(|_| ()),
            NodeFormMode::Add => self.inner.client.create_node(draft).await.map(|_| ()),
        };

        match outcome {
            Ok(()) => {
                let _ = self.load_nodes().await;
                Ok(())
            }
            Err(err) => {
                warn!(error = %err, "node save failed");
                Err(err.into())
            }
        }
    }

    /// Delete a node and reload the list. Confirmation is the shell's duty;
    /// a declined prompt means this is simply never called.
    pub async fn delete_node(&self, id: &str) -> Result<(), CoreError> {
        let _busy = self.busy_guard();
        match self.inner.client.delete_node(id).await {
            Ok(()) => {
                let _ = self.load_nodes().await;
                Ok(())
            }
            Err(err) => {
                warn!(error = %err, "node delete failed");
                Err(err.into())
            }
        }
    }

    /// Fetch a single node (detail views).
    pub async fn get_node(&self, id: &str) -> Result<Node, CoreError> {
        let _busy = self.busy_guard();
        self.inner.client.get_node(id).await.map_err(CoreError::from)
    }

    /// Generate the agent install command for a node and publish it to the
    /// install-command modal.
    pub async fn generate_install_command(&self, id: &str) -> Result<InstallCommand, CoreError> {
        let _busy = self.busy_guard();
        match self.inner.client.install_command(id).await {
            Ok(command) => {
                self.inner.install_command.send_replace(Some(command.clone()));
                Ok(command)
            }
            Err(err) => {
                warn!(error = %err, "install command generation failed");
                Err(err.into())
            }
        }
    }

    /// Dismiss the install-command modal.
    pub fn dismiss_install_command(&self) {
        self.inner.install_command.send_replace(None);
    }

    // ── Speed-test actions ───────────────────────────────────────────

    /// Open the speed-test launcher, pre-filled with the first two loaded
    /// nodes (matching the panel's default selection).
    pub fn open_speedtest_form(&self) {
        let nodes = self.inner.nodes.get();
        self.inner.speedtest_form.send_replace(Some(SpeedTestRequest {
            source_node_id: nodes.first().map(|n| n.id.clone()).unwrap_or_default(),
            target_node_id: nodes.get(1).map(|n| n.id.clone()).unwrap_or_default(),
            kind: TestKind::Full,
        }));
    }

    /// Mutate the open speed-test form in place (no-op when none is open).
    pub fn update_speedtest_form(&self, f: impl FnOnce(&mut SpeedTestRequest)) {
        self.inner.speedtest_form.send_modify(|form| {
            if let Some(form) = form.as_mut() {
                f(form);
            }
        });
    }

    /// Close the speed-test launcher without starting a test.
    pub fn close_speedtest_form(&self) {
        self.inner.speedtest_form.send_replace(None);
    }

    /// Queue a speed test. On success the launcher closes and a results
    /// reload is scheduled after a fixed delay — fired and forgotten, never
    /// awaited, never cancelled.
    pub async fn start_test(&self, request: SpeedTestRequest) -> Result<TestTicket, CoreError> {
        let _busy = self.busy_guard();
        match self.inner.client.start_test(&request).await {
            Ok(ticket) => {
                self.inner.speedtest_form.send_replace(None);
                self.schedule_results_reload();
                Ok(ticket)
            }
            Err(err) => {
                warn!(error = %err, "speed test request failed");
                Err(err.into())
            }
        }
    }

    /// Queue a speed test from the open launcher form.
    pub async fn start_test_from_form(&self) -> Result<TestTicket, CoreError> {
        let form = self.inner.speedtest_form.borrow().clone();
        let Some(request) = form else {
            return Err(CoreError::ValidationFailed {
                message: "no speed-test form is open".into(),
            });
        };
        self.start_test(request).await
    }

    fn schedule_results_reload(&self) {
        let panel = self.clone();
        let delay = self.inner.reload_delay;
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let _ = panel.load_results().await;
        });
    }

    /// Fetch a page of results with explicit pagination/filtering (detail
    /// and scripting views; does not touch the results snapshot).
    pub async fn results_page(&self, query: &ResultsQuery) -> Result<ResultPage, CoreError> {
        let _busy = self.busy_guard();
        self.inner
            .client
            .list_results(query)
            .await
            .map_err(CoreError::from)
    }

    /// Fetch a single result.
    pub async fn get_result(&self, id: &str) -> Result<SpeedTestResult, CoreError> {
        let _busy = self.busy_guard();
        self.inner.client.get_result(id).await.map_err(CoreError::from)
    }

    // ── Settings actions ─────────────────────────────────────────────

    /// Edit one key in the settings form copy (not yet saved).
    pub fn set_setting(&self, key: &str, value: &str) {
        self.inner
            .settings_form
            .lock()
            .expect("settings form lock poisoned")
            .insert(key.to_owned(), value.to_owned());
    }

    /// The current editable settings copy.
    pub fn edited_settings(&self) -> Settings {
        self.inner
            .settings_form
            .lock()
            .expect("settings form lock poisoned")
            .clone()
    }

    /// Discard edits, resetting the form copy to the loaded snapshot.
    pub fn reset_settings_form(&self) {
        let snapshot = self.inner.settings.get();
        *self
            .inner
            .settings_form
            .lock()
            .expect("settings form lock poisoned") = (*snapshot).clone();
    }

    /// PUT the edited copy wholesale; on success it becomes the canonical
    /// settings snapshot.
    pub async fn save_settings(&self) -> Result<(), CoreError> {
        let form = self.edited_settings();
        let _busy = self.busy_guard();
        match self.inner.client.update_settings(&form).await {
            Ok(()) => {
                self.inner.settings.replace(form);
                Ok(())
            }
            Err(err) => {
                warn!(error = %err, "settings save failed");
                Err(err.into())
            }
        }
    }

    // ── Dark mode ────────────────────────────────────────────────────

    /// Commit the dark-mode flag, then persist it. Theme watchers observe
    /// exactly one change per toggle.
    pub fn set_dark_mode(&self, enabled: bool) {
        self.inner.dark_mode.send_replace(enabled);
        self.inner.state.save_dark_mode(enabled);
    }

    pub fn toggle_dark_mode(&self) {
        let current = *self.inner.dark_mode.borrow();
        self.set_dark_mode(!current);
    }

    // ── Accessors ────────────────────────────────────────────────────

    pub fn page(&self) -> watch::Receiver<Page> {
        self.inner.page.subscribe()
    }

    pub fn current_page(&self) -> Page {
        *self.inner.page.borrow()
    }

    pub fn busy(&self) -> watch::Receiver<bool> {
        self.inner.busy.subscribe()
    }

    pub fn is_busy(&self) -> bool {
        *self.inner.busy.borrow()
    }

    pub fn dark_mode(&self) -> watch::Receiver<bool> {
        self.inner.dark_mode.subscribe()
    }

    pub fn is_dark_mode(&self) -> bool {
        *self.inner.dark_mode.borrow()
    }

    pub fn user(&self) -> watch::Receiver<Option<Arc<User>>> {
        self.inner.user.subscribe()
    }

    pub fn current_user(&self) -> Option<Arc<User>> {
        self.inner.user.borrow().clone()
    }

    pub fn is_logged_in(&self) -> bool {
        self.inner.user.borrow().is_some()
    }

    pub fn login_error(&self) -> watch::Receiver<Option<String>> {
        self.inner.login_error.subscribe()
    }

    pub fn nodes(&self) -> watch::Receiver<Arc<Vec<Node>>> {
        self.inner.nodes.subscribe()
    }

    pub fn nodes_snapshot(&self) -> Arc<Vec<Node>> {
        self.inner.nodes.get()
    }

    pub fn results(&self) -> watch::Receiver<Arc<Vec<SpeedTestResult>>> {
        self.inner.results.subscribe()
    }

    pub fn results_snapshot(&self) -> Arc<Vec<SpeedTestResult>> {
        self.inner.results.get()
    }

    pub fn stats(&self) -> watch::Receiver<Arc<PanelStats>> {
        self.inner.stats.subscribe()
    }

    pub fn stats_snapshot(&self) -> Arc<PanelStats> {
        self.inner.stats.get()
    }

    pub fn settings(&self) -> watch::Receiver<Arc<Settings>> {
        self.inner.settings.subscribe()
    }

    pub fn settings_snapshot(&self) -> Arc<Settings> {
        self.inner.settings.get()
    }

    pub fn node_form(&self) -> watch::Receiver<Option<NodeForm>> {
        self.inner.node_form.subscribe()
    }

    pub fn speedtest_form(&self) -> watch::Receiver<Option<SpeedTestRequest>> {
        self.inner.speedtest_form.subscribe()
    }

    pub fn install_command(&self) -> watch::Receiver<Option<InstallCommand>> {
        self.inner.install_command.subscribe()
    }
}
