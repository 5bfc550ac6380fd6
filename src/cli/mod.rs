//! CLI module - Command-line interface for mysql-user-controller
//!
//! Each lifecycle operation is exposed as a subcommand; resource state is kept
//! in the configured state directory between invocations.

mod commands;

use clap::{Args, Parser, Subcommand};

/// Reconcile MySQL user accounts against a declared desired state
#[derive(Parser)]
#[command(name = "mysql-user-controller")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to a config file (overrides the search path)
    #[arg(long, global = true)]
    pub config: Option<std::path::PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Desired credential. Omitted attributes are treated as unset.
#[derive(Args, Debug, Default)]
pub struct CredentialArgs {
    /// Password for the account (stored only as a digest)
    #[arg(long, conflicts_with = "password")]
    pub plaintext_password: Option<String>,

    /// Deprecated: use --plaintext-password
    #[arg(long)]
    pub password: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create a user account
    Create {
        /// User name
        #[arg(long)]
        user: String,
        /// Host the account is bound to
        #[arg(long, default_value = "localhost")]
        host: String,
        #[command(flatten)]
        credential: CredentialArgs,
        /// AWSAuthenticationPlugin or mysql_no_login
        #[arg(long, conflicts_with_all = ["plaintext_password", "password"])]
        auth_plugin: Option<String>,
    },

    /// Check whether a managed account still exists
    Read {
        /// Identifier in USER@HOST form
        id: String,
    },

    /// Rotate the password of a managed account
    Update {
        /// Identifier in USER@HOST form
        id: String,
        #[command(flatten)]
        credential: CredentialArgs,
    },

    /// Drop a managed account
    #[command(alias = "rm")]
    Delete {
        /// Identifier in USER@HOST form
        id: String,
    },

    /// Start managing an existing account
    Import {
        /// Identifier in USER@HOST form
        id: String,
    },

    /// Print the effective configuration
    ShowConfig,
}

pub use commands::*;
