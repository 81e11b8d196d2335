//! Render Guards
//!
//! Gates that decide between protected content and a fallback. Every guard is
//! a [`Guard`] holding one predicate; the decision always goes through
//! [`AccessPolicy`], never straight to the catalog.

use crate::engine::rbac::{AccessPolicy, Action, Resource, Role, RoleView};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// What a guard checks
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Predicate {
    /// Active role holds `action` on `resource`
    Permission { resource: Resource, action: Action },
    /// Active role is one of the listed roles, regardless of the catalog
    RoleIn(Vec<Role>),
    /// An identifier could not be resolved
    Deny,
}

impl Predicate {
    pub fn allows<P: AccessPolicy + ?Sized>(&self, policy: &P) -> bool {
        match self {
            Predicate::Permission { resource, action } => policy.has_permission(*resource, *action),
            Predicate::RoleIn(roles) => {
                let role = policy.active_role();
                let allowed = roles.contains(&role);
                if !allowed {
                    tracing::debug!(%role, ?roles, "role not in allow-list");
                }
                allowed
            }
            Predicate::Deny => false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Guard {
    predicate: Predicate,
}

impl Guard {
    pub fn new(predicate: Predicate) -> Self {
        Self { predicate }
    }

    /// Component gate. `action` defaults to read.
    pub fn permission(resource: Resource, action: Option<Action>) -> Self {
        Self::new(Predicate::Permission {
            resource,
            action: action.unwrap_or_default(),
        })
    }

    /// Component gate over raw identifiers from the render tree
    pub fn permission_str(resource: &str, action: Option<&str>) -> Self {
        let parsed = action.map_or(Ok(Action::default()), str::parse::<Action>);
        match (resource.parse::<Resource>(), parsed) {
            (Ok(resource), Ok(action)) => Self::new(Predicate::Permission { resource, action }),
            _ => {
                tracing::debug!(resource, ?action, "guard over unresolved identifier");
                Self::new(Predicate::Deny)
            }
        }
    }

    /// Role-list gate
    pub fn roles(allowed: &[Role]) -> Self {
        Self::new(Predicate::RoleIn(allowed.to_vec()))
    }

    /// Role-list gate over raw role names. Unknown names never match.
    pub fn roles_str(allowed: &[&str]) -> Self {
        let roles = allowed.iter().filter_map(|r| r.parse::<Role>().ok()).collect();
        Self::new(Predicate::RoleIn(roles))
    }

    pub fn predicate(&self) -> &Predicate {
        &self.predicate
    }

    pub fn allows<P: AccessPolicy + ?Sized>(&self, policy: &P) -> bool {
        self.predicate.allows(policy)
    }

    /// Produce `content` when allowed, otherwise `fallback`. Only one producer runs.
    pub fn render<P, T, C, F>(&self, policy: &P, content: C, fallback: F) -> T
    where
        P: AccessPolicy + ?Sized,
        C: FnOnce() -> T,
        F: FnOnce() -> T,
    {
        if self.allows(policy) {
            content()
        } else {
            fallback()
        }
    }

    /// Like [`Guard::render`] with the default fallback of rendering nothing
    pub fn render_or_nothing<P, T, C>(&self, policy: &P, content: C) -> Option<T>
    where
        P: AccessPolicy + ?Sized,
        C: FnOnce() -> T,
    {
        self.render(policy, || Some(content()), || None)
    }
}

/// Shorthand for a component gate rendered with a fallback
pub fn protected<P, T>(
    policy: &P,
    resource: Resource,
    action: Option<Action>,
    content: impl FnOnce() -> T,
    fallback: impl FnOnce() -> T,
) -> T
where
    P: AccessPolicy + ?Sized,
{
    Guard::permission(resource, action).render(policy, content, fallback)
}

/// Shorthand for a role-list gate rendered with a fallback
pub fn role_guard<P, T>(
    policy: &P,
    allowed: &[Role],
    content: impl FnOnce() -> T,
    fallback: impl FnOnce() -> T,
) -> T
where
    P: AccessPolicy + ?Sized,
{
    Guard::roles(allowed).render(policy, content, fallback)
}

/// Details handed to a page-level fallback
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize)]
#[error("Access denied. Current role: {role}. Required permission: {action} access to {resource}")]
pub struct AccessDenied {
    pub role: Role,
    pub action: Action,
    pub resource: Resource,
}

/// Page gate: the whole page renders, or the caller gets the denial details.
pub fn protect_page<P, T>(
    policy: &P,
    resource: Resource,
    action: Option<Action>,
    content: impl FnOnce() -> T,
) -> Result<T, AccessDenied>
where
    P: AccessPolicy + ?Sized,
{
    let view = RoleView::new(policy.active_role());
    let action = action.unwrap_or_default();
    Guard::permission(resource, Some(action)).render(
        &view,
        || Ok(content()),
        || {
            Err(AccessDenied {
                role: view.active_role(),
                action,
                resource,
            })
        },
    )
}

/// Sidebar entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavItem {
    pub label: String,
    pub route: String,
    pub resource: Resource,
}

impl NavItem {
    pub fn new(label: &str, route: &str, resource: Resource) -> Self {
        Self {
            label: label.to_string(),
            route: route.to_string(),
            resource,
        }
    }
}

/// The application sidebar, in display order
pub fn default_navigation() -> Vec<NavItem> {
    vec![
        NavItem::new("Dashboard", "/", Resource::Dashboard),
        NavItem::new("Patients", "/patients", Resource::PatientRecords),
        NavItem::new("Appointments", "/appointments", Resource::Scheduling),
        NavItem::new("Doctors", "/doctors", Resource::ClinicalStaff),
        NavItem::new("Wards", "/wards", Resource::WardManagement),
        NavItem::new("Medical Records", "/medical-records", Resource::ClinicalDocumentation),
        NavItem::new("Claims", "/schemes", Resource::Claims),
        NavItem::new("Lab", "/lab", Resource::LabOrders),
        NavItem::new("Pharmacy", "/pharmacy", Resource::PharmacyOrders),
        NavItem::new("Bills", "/bills", Resource::Billing),
        NavItem::new("Users", "/users", Resource::UserAdministration),
        NavItem::new("Reports", "/reports", Resource::Reporting),
        NavItem::new("Settings", "/settings", Resource::Settings),
    ]
}

/// Entries the active role can access, in their original order.
///
/// The role is read once for the whole list.
pub fn filter_navigation<'a, P>(policy: &P, items: &'a [NavItem]) -> Vec<&'a NavItem>
where
    P: AccessPolicy + ?Sized,
{
    let view = RoleView::new(policy.active_role());
    items.iter().filter(|item| view.can_access(item.resource)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::rbac::PermissionResolver;
    use crate::engine::session::Actor;

    #[test]
    fn test_component_gate_defaults_to_read() {
        let nurse = RoleView::new(Role::CareStaff);
        assert_eq!(
            Guard::permission(Resource::PharmacyOrders, None).predicate(),
            &Predicate::Permission { resource: Resource::PharmacyOrders, action: Action::Read }
        );
        assert_eq!(Guard::permission(Resource::PharmacyOrders, None).render_or_nothing(&nurse, || "list"), Some("list"));
        assert_eq!(
            Guard::permission(Resource::PharmacyOrders, Some(Action::Write)).render_or_nothing(&nurse, || "new order"),
            None
        );
    }

    #[test]
    fn test_only_one_producer_runs() {
        let admin = RoleView::new(Role::Administrator);
        let out = protected(
            &admin,
            Resource::UserAdministration,
            Some(Action::Delete),
            || "delete button",
            || panic!("fallback must not run"),
        );
        assert_eq!(out, "delete button");
    }

    #[test]
    fn test_role_guard_denies_outside_allow_list() {
        let resolver = PermissionResolver::new(Some(Actor::with_role("doctor")));
        let out = role_guard(&resolver, &[Role::Administrator], || "admin panel", || "fallback");
        assert_eq!(out, "fallback");

        let out = role_guard(&resolver, &[Role::Administrator, Role::Clinician], || "panel", || "fallback");
        assert_eq!(out, "panel");
    }

    #[test]
    fn test_role_guard_ignores_catalog() {
        // front desk may delete appointments but is not on the list
        let front_desk = RoleView::new(Role::FrontDesk);
        assert!(front_desk.has_permission(Resource::Scheduling, Action::Delete));
        assert!(!Guard::roles(&[Role::Administrator]).allows(&front_desk));
        assert!(!Guard::roles(&[]).allows(&front_desk));
    }

    #[test]
    fn test_raw_identifiers_fail_closed() {
        let admin = RoleView::new(Role::Administrator);
        assert!(Guard::permission_str("users", None).allows(&admin));
        assert!(Guard::permission_str("users", Some("delete")).allows(&admin));
        assert_eq!(Guard::permission_str("inventory", None).predicate(), &Predicate::Deny);
        assert!(!Guard::permission_str("users", Some("approve")).allows(&admin));

        assert!(Guard::roles_str(&["admin"]).allows(&admin));
        assert!(!Guard::roles_str(&["root", "superuser"]).allows(&admin));
    }

    #[test]
    fn test_protect_page() {
        let front_desk = RoleView::new(Role::FrontDesk);
        assert_eq!(protect_page(&front_desk, Resource::Billing, Some(Action::Write), || 42), Ok(42));

        let denied = protect_page(&front_desk, Resource::Reporting, None, || 42).unwrap_err();
        assert_eq!(denied.role, Role::FrontDesk);
        assert_eq!(denied.action, Action::Read);
        assert_eq!(
            denied.to_string(),
            "Access denied. Current role: receptionist. Required permission: read access to reports"
        );
    }

    #[test]
    fn test_navigation_filter() {
        let nav = default_navigation();
        let nurse = RoleView::new(Role::CareStaff);
        let visible: Vec<&str> = filter_navigation(&nurse, &nav).iter().map(|i| i.label.as_str()).collect();
        assert_eq!(
            visible,
            vec![
                "Dashboard",
                "Patients",
                "Appointments",
                "Wards",
                "Medical Records",
                "Claims",
                "Lab",
                "Pharmacy",
                "Bills",
                "Reports",
                "Settings",
            ]
        );

        let admin = RoleView::new(Role::Administrator);
        assert_eq!(filter_navigation(&admin, &nav).len(), nav.len());
    }

    #[test]
    fn test_default_navigation_covers_every_resource() {
        let nav = default_navigation();
        for resource in Resource::ALL {
            assert!(nav.iter().any(|i| i.resource == resource), "{resource} missing");
        }
    }
}
