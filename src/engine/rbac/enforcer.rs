//! RBAC Enforcement Layer
//!
//! Point queries against the permission catalog for the active role

use super::policy::{Action, Catalog, PermissionSet, Resource, Role};
use crate::engine::session::{self, SessionProvider};
use serde::Serialize;

/// Decision surface shared by the live resolver and per-pass snapshots.
///
/// `can_access` is the navigation visibility rule: a resource is visible when
/// the role holds any action on it.
pub trait AccessPolicy {
    fn active_role(&self) -> Role;

    fn permissions(&self, resource: Resource) -> PermissionSet {
        Catalog::permissions_for(self.active_role(), resource)
    }

    fn has_permission(&self, resource: Resource, action: Action) -> bool {
        let role = self.active_role();
        let allowed = Catalog::permissions_for(role, resource).contains(action);
        if allowed {
            tracing::trace!(%role, %resource, %action, "permission granted");
        } else {
            tracing::debug!(%role, %resource, %action, "permission denied");
        }
        allowed
    }

    fn can_access(&self, resource: Resource) -> bool {
        let role = self.active_role();
        let visible = !Catalog::permissions_for(role, resource).is_empty();
        if !visible {
            tracing::debug!(%role, %resource, "resource hidden");
        }
        visible
    }

    /// Raw-identifier variant of [`AccessPolicy::has_permission`]. Unparseable input is a denial.
    fn has_permission_str(&self, resource: &str, action: &str) -> bool {
        match (resource.parse::<Resource>(), action.parse::<Action>()) {
            (Ok(resource), Ok(action)) => self.has_permission(resource, action),
            _ => {
                tracing::debug!(resource, action, "unresolved identifier, denying");
                false
            }
        }
    }

    fn can_access_str(&self, resource: &str) -> bool {
        match resource.parse::<Resource>() {
            Ok(resource) => self.can_access(resource),
            Err(e) => {
                tracing::debug!(error = %e, "unresolved identifier, denying");
                false
            }
        }
    }

    fn is_admin(&self) -> bool {
        self.active_role() == Role::Administrator
    }

    fn is_clinician(&self) -> bool {
        self.active_role() == Role::Clinician
    }

    fn is_care_staff(&self) -> bool {
        self.active_role() == Role::CareStaff
    }

    fn is_front_desk(&self) -> bool {
        self.active_role() == Role::FrontDesk
    }
}

/// Resolver bound to a live session. The role is re-read on every query.
pub struct PermissionResolver<S> {
    session: S,
}

impl<S: SessionProvider> PermissionResolver<S> {
    pub fn new(session: S) -> Self {
        Self { session }
    }

    pub fn session(&self) -> &S {
        &self.session
    }

    /// Capture the active role once for a sequence of related decisions
    pub fn snapshot(&self) -> RoleView {
        RoleView::new(self.active_role())
    }
}

impl<S: SessionProvider> AccessPolicy for PermissionResolver<S> {
    fn active_role(&self) -> Role {
        session::active_role(&self.session)
    }
}

/// Fixed-role view, used when one render pass must see a single role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RoleView {
    role: Role,
}

impl RoleView {
    pub fn new(role: Role) -> Self {
        Self { role }
    }
}

impl AccessPolicy for RoleView {
    fn active_role(&self) -> Role {
        self.role
    }
}
