//! HMS Access - role-based authorization for the hospital management UI
//!
//! A compiled role x resource permission catalog, a resolver bound to the
//! live session, and render guards built on the resolver.

pub mod engine;

pub use engine::guards::{
    default_navigation, filter_navigation, protect_page, protected, role_guard, AccessDenied, Guard,
    NavItem, Predicate,
};
pub use engine::rbac::{
    AccessPolicy, Action, Catalog, PermissionResolver, PermissionSet, RbacError, Resource, Role,
    RoleView,
};
pub use engine::session::{active_role, load_actor, Actor, SessionError, SessionProvider, SharedSession};
