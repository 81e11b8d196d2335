//! HMS Access CLI Module
//! Command-line interface for inspecting the permission catalog

pub mod formatter;

use crate::engine::rbac::Role;
use crate::engine::session::{self, load_actor, Actor, SessionError};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "hms-access")]
#[command(author = "HMS Team")]
#[command(version)]
#[command(about = "Inspect HMS role permissions and navigation visibility", long_about = None)]
pub struct Cli {
    /// Project directory holding hms-access.config.json (defaults to current directory)
    #[arg(short, long, global = true)]
    pub project: Option<PathBuf>,

    /// Output format (json for scripting)
    #[arg(short, long, global = true, default_value = "text")]
    pub format: OutputFormat,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

/// Where the acting role comes from
#[derive(Args, Debug, Clone, Default)]
pub struct ActorArgs {
    /// Role to evaluate as (unknown roles fall back to receptionist)
    #[arg(short, long)]
    pub role: Option<String>,

    /// Saved actor profile (JSON as returned by login)
    #[arg(short, long, conflicts_with = "role")]
    pub session: Option<PathBuf>,
}

impl ActorArgs {
    pub fn actor(&self) -> Result<Option<Actor>, SessionError> {
        match (&self.role, &self.session) {
            (Some(role), _) => Ok(Some(Actor::with_role(role))),
            (None, Some(path)) => load_actor(path).map(Some),
            (None, None) => Ok(None),
        }
    }

    pub fn active_role(&self) -> Result<Role, SessionError> {
        Ok(session::active_role(&self.actor()?))
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Check one action on one resource
    Check {
        /// Resource identifier (e.g. patients, appointments)
        resource: String,

        /// Action: read, write or delete
        #[arg(default_value = "read")]
        action: String,

        #[command(flatten)]
        actor: ActorArgs,
    },

    /// Check whether a resource is visible at all
    Access {
        resource: String,

        #[command(flatten)]
        actor: ActorArgs,
    },

    /// Show the resolved active role
    Whoami {
        #[command(flatten)]
        actor: ActorArgs,
    },

    /// List visible navigation entries
    Nav {
        #[command(flatten)]
        actor: ActorArgs,
    },

    /// Print the full permission matrix
    Matrix,
}

impl Cli {
    pub fn get_project_dir(&self) -> PathBuf {
        self.project
            .clone()
            .unwrap_or_else(|| std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")))
    }
}
