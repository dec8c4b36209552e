use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser)]
#[command(name = "iconize")]
#[command(about = "Rule-based icon assignment for files and folders")]
#[command(version)]
pub struct Cli {
    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Quiet output (errors only)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Base directory (default: ~/.iconize)
    #[arg(long, global = true)]
    pub base_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
#[allow(clippy::enum_variant_names)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
    Elvish,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum Kind {
    File,
    Folder,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum Scope {
    Everything,
    Files,
    Folders,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show which custom rule applies to a path
    Resolve {
        /// Tree path (e.g., notes/daily/2024-01-01.md)
        path: String,

        /// Entry type; scope is only checked when given
        #[arg(short, long, value_enum)]
        kind: Option<Kind>,
    },

    /// Apply custom rules to every entry under a directory
    Apply {
        /// Root directory of the tree
        root: PathBuf,

        /// Apply only the rule at this position (default: all rules, first match wins)
        #[arg(short, long)]
        rule: Option<usize>,

        /// Show what would be assigned without saving
        #[arg(long)]
        dry_run: bool,
    },

    /// Rewrite legacy Font Awesome icon identifiers
    Migrate {
        /// Show what would change without saving
        #[arg(long)]
        dry_run: bool,

        /// Run even if the data file is already marked migrated
        #[arg(short, long)]
        force: bool,
    },

    /// Manage custom rules
    Rule {
        #[command(subcommand)]
        action: RuleAction,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Subcommand)]
pub enum RuleAction {
    /// List rules in priority order
    List,

    /// Add a rule (appended unless --at is given)
    Add {
        /// Name pattern (regex, or literal text if not a valid regex)
        pattern: String,

        /// Icon identifier (e.g., FasStar) or emoji
        icon: String,

        /// Icon color (e.g., #ff0000)
        #[arg(short, long)]
        color: Option<String>,

        /// Which entries the rule targets
        #[arg(long = "for", value_enum, default_value = "everything")]
        scope: Scope,

        /// Insert at this position
        #[arg(long)]
        at: Option<usize>,
    },

    /// Remove the rule at a position
    Remove {
        /// Rule position (see `rule list`)
        index: usize,
    },

    /// Move a rule to a new position
    Move {
        /// Current position
        from: usize,

        /// New position
        to: usize,
    },
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Get a config value
    Get {
        /// Config key (e.g., rules.enforce_scope)
        key: String,
    },

    /// Set a config value
    Set {
        /// Config key (e.g., rules.enforce_scope)
        key: String,

        /// Value to set (e.g., "false")
        value: String,
    },

    /// List all config values
    List,

    /// Show config file path
    Path,

    /// Create config file with default template
    Init,
}
