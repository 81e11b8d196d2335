//! RBAC Module
//!
//! Role-Based Access Control with a compiled permission catalog

pub mod policy;
pub mod enforcer;

pub use policy::{Action, Catalog, PermissionSet, RbacError, Resource, Role};
pub use enforcer::{AccessPolicy, PermissionResolver, RoleView};
