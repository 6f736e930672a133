//! Clap derive structures for the `nodepulse` CLI.

use clap::{Args, Parser, Subcommand, ValueEnum};

use nodepulse_core::TestKind;

// ── Top-level CLI ────────────────────────────────────────────────────

/// nodepulse -- manage a node speed-testing panel from the command line
#[derive(Debug, Parser)]
#[command(
    name = "nodepulse",
    version,
    about = "Administer a nodepulse speed-test panel",
    long_about = "A CLI for the nodepulse panel: manage nodes, trigger pairwise\n\
        speed tests, and edit system settings over the panel's HTTP API.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Panel base URL (overrides the config file)
    #[arg(long, short = 'p', env = "NODEPULSE_PANEL", global = true)]
    pub panel: Option<String>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "NODEPULSE_OUTPUT",
        default_value = "table",
        global = true
    )]
    pub output: OutputFormat,

    /// When to use color output
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorMode,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Skip confirmation prompts
    #[arg(long, short = 'y', global = true)]
    pub yes: bool,

    /// Accept self-signed TLS certificates
    #[arg(long, short = 'k', env = "NODEPULSE_INSECURE", global = true)]
    pub insecure: bool,

    /// Request timeout in seconds
    #[arg(long, env = "NODEPULSE_TIMEOUT", global = true)]
    pub timeout: Option<u64>,
}

// ── Output & color enums ─────────────────────────────────────────────

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
    /// Plain text, one value per line (scripting)
    Plain,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum ColorMode {
    /// Auto-detect (color if the terminal is interactive)
    Auto,
    /// Always emit color codes
    Always,
    /// Never emit color codes
    Never,
}

// ── Commands ─────────────────────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Log in to the panel and persist the session token
    Login(LoginArgs),

    /// End the session and discard the persisted token
    Logout,

    /// Show the user owning the current session
    Whoami,

    /// Show stats, nodes, and recent test results
    #[command(alias = "dash")]
    Dashboard,

    /// Manage speed-test nodes
    #[command(alias = "n")]
    Nodes(NodesArgs),

    /// Trigger speed tests and inspect results
    #[command(alias = "st")]
    Speedtest(SpeedtestArgs),

    /// View and edit panel settings
    Settings(SettingsArgs),

    /// Inspect CLI configuration
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ── Auth ─────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct LoginArgs {
    /// Username (prompted when omitted)
    #[arg(long, short = 'u')]
    pub username: Option<String>,

    /// Read the password from stdin instead of prompting
    #[arg(long)]
    pub password_stdin: bool,
}

// ── Nodes ────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct NodesArgs {
    #[command(subcommand)]
    pub command: NodesCommand,
}

#[derive(Debug, Subcommand)]
pub enum NodesCommand {
    /// List all nodes
    #[command(alias = "ls")]
    List,

    /// Show one node in detail
    Get {
        /// Node id
        id: String,
    },

    /// Register a new node
    Add {
        /// Display name
        #[arg(long)]
        name: String,

        /// Node IP address
        #[arg(long)]
        ip: String,

        /// Physical location label
        #[arg(long, default_value = "")]
        location: String,

        /// Free-form description
        #[arg(long, default_value = "")]
        description: String,

        /// Tags (repeatable)
        #[arg(long = "tag")]
        tags: Vec<String>,
    },

    /// Edit an existing node (unspecified fields are kept)
    Edit {
        /// Node id
        id: String,

        #[arg(long)]
        name: Option<String>,

        #[arg(long)]
        ip: Option<String>,

        #[arg(long)]
        location: Option<String>,

        #[arg(long)]
        description: Option<String>,

        /// Replace the tag list (repeatable)
        #[arg(long = "tag")]
        tags: Option<Vec<String>>,
    },

    /// Delete a node (asks for confirmation)
    #[command(alias = "rm")]
    Delete {
        /// Node id
        id: String,
    },

    /// Generate the one-line agent install command for a node
    InstallCommand {
        /// Node id
        id: String,
    },
}

// ── Speedtest ────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct SpeedtestArgs {
    #[command(subcommand)]
    pub command: SpeedtestCommand,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum TestKindArg {
    Download,
    Upload,
    Ping,
    Full,
}

impl From<TestKindArg> for TestKind {
    fn from(kind: TestKindArg) -> Self {
        match kind {
            TestKindArg::Download => TestKind::Download,
            TestKindArg::Upload => TestKind::Upload,
            TestKindArg::Ping => TestKind::Ping,
            TestKindArg::Full => TestKind::Full,
        }
    }
}

#[derive(Debug, Subcommand)]
pub enum SpeedtestCommand {
    /// Queue a speed test between two nodes
    Run {
        /// Source node id
        #[arg(long, short = 's')]
        source: String,

        /// Target node id
        #[arg(long, short = 't')]
        target: String,

        /// Test type
        #[arg(long = "type", default_value = "full")]
        kind: TestKindArg,
    },

    /// List test results
    #[command(alias = "ls")]
    Results {
        /// Only results involving this node
        #[arg(long)]
        node: Option<String>,

        /// Page number (1-based)
        #[arg(long)]
        page: Option<u32>,

        /// Results per page
        #[arg(long)]
        page_size: Option<u32>,
    },

    /// Show one result in detail
    Get {
        /// Result id
        id: String,
    },
}

// ── Settings ─────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct SettingsArgs {
    #[command(subcommand)]
    pub command: SettingsCommand,
}

#[derive(Debug, Subcommand)]
pub enum SettingsCommand {
    /// Show all settings
    Show,

    /// Set one or more KEY=VALUE pairs (the whole map is saved back)
    Set {
        /// KEY=VALUE pairs
        #[arg(required = true)]
        pairs: Vec<String>,
    },
}

// ── Config / completions ─────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Print the config file path
    Path,

    /// Show the effective configuration
    Show,
}

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
