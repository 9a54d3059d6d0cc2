use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "structsync",
    about = "structsync: reconcile local schema files against a remote schema catalog",
    version
)]
pub struct Cli {
    /// Path to a TOML config file (default: ./structsync.toml when present)
    #[arg(long, global = true)]
    pub config: Option<String>,

    /// Log debug events to stderr
    #[arg(long, global = true, conflicts_with_all = ["quiet", "silent"])]
    pub debug: bool,

    /// Log warnings and errors only
    #[arg(long, global = true, conflicts_with = "silent")]
    pub quiet: bool,

    /// Disable logging entirely
    #[arg(long, global = true)]
    pub silent: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Compute the actions that bring the catalog in line with local files
    Changes {
        /// Files or directories holding schema documents (default: config `paths`, then `data-structures`)
        paths: Vec<String>,

        /// Path to a JSON snapshot of the catalog listing
        #[arg(long)]
        listing: Option<String>,

        /// Target environment: dev, validated, or prod
        #[arg(long)]
        env: Option<String>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print the identity and canonical content hash of one schema file
    Hash {
        /// Schema file (.yaml, .yml or .json)
        file: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print the identity fields, Iglu URI and catalog key of one schema file
    Identity {
        /// Schema file (.yaml, .yml or .json)
        file: String,

        /// Organization ID used to derive the catalog key
        #[arg(long)]
        org_id: Option<String>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}
