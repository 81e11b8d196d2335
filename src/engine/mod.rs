// HMS Access Engine - Core module structure
pub mod rbac;
pub mod session;
pub mod guards;
pub mod config;
pub mod cli;

pub use config::Config;
pub use rbac::{AccessPolicy, PermissionResolver};
pub use session::{SessionProvider, SharedSession};
