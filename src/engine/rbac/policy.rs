//! Role-Based Access Control (RBAC) Permission Catalog
//!
//! Closed role/resource/action enumerations and the compiled permission matrix

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RbacError {
    #[error("Unknown role: {0}")]
    UnknownRole(String),
    #[error("Unknown resource: {0}")]
    UnknownResource(String),
    #[error("Unknown action: {0}")]
    UnknownAction(String),
}

/// Action types. `Write` covers create and update; `Delete` is never implied by it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    #[default]
    Read,
    Write,
    Delete,
}

impl Action {
    pub const ALL: [Action; 3] = [Action::Read, Action::Write, Action::Delete];

    pub fn as_str(self) -> &'static str {
        match self {
            Action::Read => "read",
            Action::Write => "write",
            Action::Delete => "delete",
        }
    }

    const fn bit(self) -> u8 {
        match self {
            Action::Read => 0b001,
            Action::Write => 0b010,
            Action::Delete => 0b100,
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Action {
    type Err = RbacError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Action::ALL
            .into_iter()
            .find(|a| a.as_str() == s)
            .ok_or_else(|| RbacError::UnknownAction(s.to_string()))
    }
}

/// Roles, ordered as declared. The ordering carries no privilege ranking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    #[serde(rename = "admin", alias = "administrator")]
    Administrator,
    #[serde(rename = "doctor", alias = "clinician")]
    Clinician,
    #[serde(rename = "nurse", alias = "care_staff")]
    CareStaff,
    #[serde(rename = "receptionist", alias = "front_desk")]
    FrontDesk,
}

impl Role {
    pub const ALL: [Role; 4] = [
        Role::Administrator,
        Role::Clinician,
        Role::CareStaff,
        Role::FrontDesk,
    ];

    /// Role assumed when the session carries no usable identity.
    pub const LEAST_PRIVILEGED: Role = Role::FrontDesk;

    /// Identifier used by the session profile.
    pub fn as_str(self) -> &'static str {
        match self {
            Role::Administrator => "admin",
            Role::Clinician => "doctor",
            Role::CareStaff => "nurse",
            Role::FrontDesk => "receptionist",
        }
    }

    fn alias(self) -> &'static str {
        match self {
            Role::Administrator => "administrator",
            Role::Clinician => "clinician",
            Role::CareStaff => "care_staff",
            Role::FrontDesk => "front_desk",
        }
    }

    /// Parse a raw role string, falling back to [`Role::LEAST_PRIVILEGED`].
    pub fn parse_or_least_privileged(raw: Option<&str>) -> Role {
        match raw.map(|s| s.parse::<Role>()) {
            Some(Ok(role)) => role,
            Some(Err(e)) => {
                tracing::debug!(error = %e, "unrecognised role, using least privileged");
                Role::LEAST_PRIVILEGED
            }
            None => {
                tracing::debug!("no role present, using least privileged");
                Role::LEAST_PRIVILEGED
            }
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = RbacError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Role::ALL
            .into_iter()
            .find(|r| r.as_str() == s || r.alias() == s)
            .ok_or_else(|| RbacError::UnknownRole(s.to_string()))
    }
}

/// Protectable application areas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Resource {
    #[serde(rename = "dashboard")]
    Dashboard,
    #[serde(rename = "patients", alias = "patient_records")]
    PatientRecords,
    #[serde(rename = "appointments", alias = "scheduling")]
    Scheduling,
    #[serde(rename = "doctors", alias = "clinical_staff")]
    ClinicalStaff,
    #[serde(rename = "wards", alias = "ward_management")]
    WardManagement,
    #[serde(rename = "medical_records", alias = "clinical_documentation")]
    ClinicalDocumentation,
    #[serde(rename = "claims")]
    Claims,
    #[serde(rename = "lab", alias = "lab_orders")]
    LabOrders,
    #[serde(rename = "pharmacy", alias = "pharmacy_orders")]
    PharmacyOrders,
    #[serde(rename = "bills", alias = "billing")]
    Billing,
    #[serde(rename = "users", alias = "user_administration")]
    UserAdministration,
    #[serde(rename = "settings")]
    Settings,
    #[serde(rename = "reports", alias = "reporting")]
    Reporting,
}

impl Resource {
    pub const ALL: [Resource; 13] = [
        Resource::Dashboard,
        Resource::PatientRecords,
        Resource::Scheduling,
        Resource::ClinicalStaff,
        Resource::WardManagement,
        Resource::ClinicalDocumentation,
        Resource::Claims,
        Resource::LabOrders,
        Resource::PharmacyOrders,
        Resource::Billing,
        Resource::UserAdministration,
        Resource::Settings,
        Resource::Reporting,
    ];

    /// Identifier used by routes and the render tree.
    pub fn as_str(self) -> &'static str {
        match self {
            Resource::Dashboard => "dashboard",
            Resource::PatientRecords => "patients",
            Resource::Scheduling => "appointments",
            Resource::ClinicalStaff => "doctors",
            Resource::WardManagement => "wards",
            Resource::ClinicalDocumentation => "medical_records",
            Resource::Claims => "claims",
            Resource::LabOrders => "lab",
            Resource::PharmacyOrders => "pharmacy",
            Resource::Billing => "bills",
            Resource::UserAdministration => "users",
            Resource::Settings => "settings",
            Resource::Reporting => "reports",
        }
    }

    fn alias(self) -> &'static str {
        match self {
            Resource::Dashboard => "dashboard",
            Resource::PatientRecords => "patient_records",
            Resource::Scheduling => "scheduling",
            Resource::ClinicalStaff => "clinical_staff",
            Resource::WardManagement => "ward_management",
            Resource::ClinicalDocumentation => "clinical_documentation",
            Resource::Claims => "claims",
            Resource::LabOrders => "lab_orders",
            Resource::PharmacyOrders => "pharmacy_orders",
            Resource::Billing => "billing",
            Resource::UserAdministration => "user_administration",
            Resource::Settings => "settings",
            Resource::Reporting => "reporting",
        }
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Resource {
    type Err = RbacError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Resource::ALL
            .into_iter()
            .find(|r| r.as_str() == s || r.alias() == s)
            .ok_or_else(|| RbacError::UnknownResource(s.to_string()))
    }
}

/// Set of actions granted for one (role, resource) pair
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct PermissionSet(u8);

impl PermissionSet {
    pub const NONE: PermissionSet = PermissionSet(0);
    pub const READ: PermissionSet = PermissionSet::of(&[Action::Read]);
    pub const READ_WRITE: PermissionSet = PermissionSet::of(&[Action::Read, Action::Write]);
    pub const FULL: PermissionSet = PermissionSet::of(&[Action::Read, Action::Write, Action::Delete]);

    pub const fn of(actions: &[Action]) -> Self {
        let mut bits = 0;
        let mut i = 0;
        while i < actions.len() {
            bits |= actions[i].bit();
            i += 1;
        }
        PermissionSet(bits)
    }

    pub const fn contains(self, action: Action) -> bool {
        self.0 & action.bit() != 0
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn actions(self) -> Vec<Action> {
        Action::ALL.into_iter().filter(|a| self.contains(*a)).collect()
    }
}

impl fmt::Debug for PermissionSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.actions()).finish()
    }
}

impl Serialize for PermissionSet {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.actions())
    }
}

/// The compiled role x resource permission matrix.
///
/// Entries are authored per pair and are not derived from any role ranking:
/// front desk may delete appointments while nurses may not.
pub struct Catalog;

impl Catalog {
    pub const fn permissions_for(role: Role, resource: Resource) -> PermissionSet {
        use PermissionSet as P;
        use Resource::*;

        match role {
            Role::Administrator => match resource {
                Dashboard => P::READ,
                _ => P::FULL,
            },
            Role::Clinician => match resource {
                Dashboard => P::READ,
                PatientRecords => P::FULL,
                Scheduling => P::FULL,
                ClinicalStaff => P::READ,
                WardManagement => P::READ_WRITE,
                ClinicalDocumentation => P::FULL,
                Claims => P::READ_WRITE,
                LabOrders => P::READ_WRITE,
                PharmacyOrders => P::READ_WRITE,
                Billing => P::READ_WRITE,
                UserAdministration => P::NONE,
                Settings => P::READ,
                Reporting => P::READ_WRITE,
            },
            Role::CareStaff => match resource {
                Dashboard => P::READ,
                PatientRecords => P::READ_WRITE,
                Scheduling => P::READ_WRITE,
                ClinicalStaff => P::NONE,
                WardManagement => P::READ_WRITE,
                ClinicalDocumentation => P::READ_WRITE,
                Claims => P::READ,
                LabOrders => P::READ_WRITE,
                PharmacyOrders => P::READ,
                Billing => P::READ,
                UserAdministration => P::NONE,
                Settings => P::READ,
                Reporting => P::READ,
            },
            Role::FrontDesk => match resource {
                Dashboard => P::READ,
                PatientRecords => P::READ_WRITE,
                Scheduling => P::FULL,
                ClinicalStaff => P::READ,
                WardManagement => P::READ,
                ClinicalDocumentation => P::READ,
                Claims => P::READ_WRITE,
                LabOrders => P::READ,
                PharmacyOrders => P::READ,
                Billing => P::READ_WRITE,
                UserAdministration => P::NONE,
                Settings => P::READ,
                Reporting => P::NONE,
            },
        }
    }

    /// Every (role, resource, permissions) triple in declaration order
    pub fn entries() -> impl Iterator<Item = (Role, Resource, PermissionSet)> {
        Role::ALL.into_iter().flat_map(|role| {
            Resource::ALL
                .into_iter()
                .map(move |resource| (role, resource, Catalog::permissions_for(role, resource)))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identifier_parsing() {
        assert_eq!("doctor".parse::<Role>(), Ok(Role::Clinician));
        assert_eq!("care_staff".parse::<Role>(), Ok(Role::CareStaff));
        assert_eq!("scheduling".parse::<Resource>(), Ok(Resource::Scheduling));
        assert_eq!("bills".parse::<Resource>(), Ok(Resource::Billing));
        assert_eq!("delete".parse::<Action>(), Ok(Action::Delete));

        assert_eq!("superuser".parse::<Role>(), Err(RbacError::UnknownRole("superuser".into())));
        assert!("Admin".parse::<Role>().is_err());
        assert!("inventory".parse::<Resource>().is_err());
        assert!("create".parse::<Action>().is_err());
    }

    #[test]
    fn test_identifiers_round_trip_through_display() {
        for role in Role::ALL {
            assert_eq!(role.to_string().parse::<Role>(), Ok(role));
        }
        for resource in Resource::ALL {
            assert_eq!(resource.to_string().parse::<Resource>(), Ok(resource));
        }
    }

    #[test]
    fn test_least_privileged_fallback() {
        assert_eq!(Role::parse_or_least_privileged(Some("admin")), Role::Administrator);
        assert_eq!(Role::parse_or_least_privileged(Some("root")), Role::FrontDesk);
        assert_eq!(Role::parse_or_least_privileged(Some("")), Role::FrontDesk);
        assert_eq!(Role::parse_or_least_privileged(None), Role::FrontDesk);
    }

    #[test]
    fn test_permission_set() {
        let set = PermissionSet::of(&[Action::Read, Action::Delete]);
        assert!(set.contains(Action::Read));
        assert!(!set.contains(Action::Write));
        assert!(set.contains(Action::Delete));
        assert!(PermissionSet::NONE.is_empty());
        assert_eq!(PermissionSet::FULL.actions(), Action::ALL.to_vec());
        assert_eq!(serde_json::to_string(&PermissionSet::READ_WRITE).unwrap(), r#"["read","write"]"#);
    }

    #[test]
    fn test_write_does_not_imply_delete() {
        for (_, _, set) in Catalog::entries() {
            if set.contains(Action::Delete) {
                assert!(set.contains(Action::Write));
            }
        }
        assert!(!Catalog::permissions_for(Role::Clinician, Resource::WardManagement).contains(Action::Delete));
    }

    #[test]
    fn test_catalog_is_total() {
        assert_eq!(Catalog::entries().count(), Role::ALL.len() * Resource::ALL.len());
    }

    #[test]
    fn test_catalog_seed_entries() {
        assert!(Catalog::permissions_for(Role::Clinician, Resource::PatientRecords).contains(Action::Delete));
        assert!(Catalog::permissions_for(Role::CareStaff, Resource::UserAdministration).is_empty());
        assert_eq!(Catalog::permissions_for(Role::Administrator, Resource::Dashboard), PermissionSet::READ);
        for role in Role::ALL {
            assert!(Catalog::permissions_for(role, Resource::Settings).contains(Action::Read));
            assert!(Catalog::permissions_for(role, Resource::Dashboard).contains(Action::Read));
        }
    }

    #[test]
    fn test_catalog_is_not_monotonic() {
        let front_desk = Catalog::permissions_for(Role::FrontDesk, Resource::Scheduling);
        let care_staff = Catalog::permissions_for(Role::CareStaff, Resource::Scheduling);
        assert!(front_desk.contains(Action::Delete));
        assert!(!care_staff.contains(Action::Delete));

        // care staff cannot see the clinical staff directory, front desk can
        assert!(Catalog::permissions_for(Role::CareStaff, Resource::ClinicalStaff).is_empty());
        assert!(!Catalog::permissions_for(Role::FrontDesk, Resource::ClinicalStaff).is_empty());
    }
}
