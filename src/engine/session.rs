//! Session Role Binding
//!
//! Reads the signed-in actor from the session collaborator and resolves the
//! single active role. Nothing here is cached: every call re-reads the session.

use crate::engine::rbac::Role;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::{Arc, RwLock};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SessionError {
    #[error("Failed to read saved actor: {0}")]
    Read(#[from] std::io::Error),
    #[error("Invalid saved actor: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Profile of the signed-in user as returned by the login endpoint.
///
/// Only `role` is consulted for authorization; it is kept as the raw string
/// and validated when the active role is resolved.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    #[serde(default)]
    pub id: Option<u64>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub is_active: Option<bool>,
}

impl Actor {
    pub fn with_role(role: &str) -> Self {
        Self {
            role: Some(role.to_string()),
            ..Self::default()
        }
    }
}

/// Source of the current actor
pub trait SessionProvider {
    fn current_actor(&self) -> Option<Actor>;
}

impl SessionProvider for Option<Actor> {
    fn current_actor(&self) -> Option<Actor> {
        self.clone()
    }
}

impl<T: SessionProvider + ?Sized> SessionProvider for &T {
    fn current_actor(&self) -> Option<Actor> {
        (**self).current_actor()
    }
}

impl<T: SessionProvider + ?Sized> SessionProvider for Arc<T> {
    fn current_actor(&self) -> Option<Actor> {
        (**self).current_actor()
    }
}

/// Resolve the active role from whatever the provider holds right now.
///
/// A missing actor, a missing role, or a role outside the closed set all
/// resolve to [`Role::LEAST_PRIVILEGED`].
pub fn active_role<S: SessionProvider + ?Sized>(session: &S) -> Role {
    let actor = session.current_actor();
    Role::parse_or_least_privileged(actor.as_ref().and_then(|a| a.role.as_deref()))
}

/// Mutable session slot shared between the login flow and the resolver.
#[derive(Debug, Default)]
pub struct SharedSession {
    actor: RwLock<Option<Actor>>,
}

impl SharedSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_actor(actor: Actor) -> Self {
        Self {
            actor: RwLock::new(Some(actor)),
        }
    }

    pub fn login(&self, actor: Actor) {
        tracing::debug!(role = ?actor.role, "session login");
        self.set_actor(Some(actor));
    }

    pub fn logout(&self) {
        tracing::debug!("session logout");
        self.set_actor(None);
    }

    pub fn set_actor(&self, actor: Option<Actor>) {
        match self.actor.write() {
            Ok(mut slot) => *slot = actor,
            Err(poisoned) => *poisoned.into_inner() = actor,
        }
    }
}

impl SessionProvider for SharedSession {
    fn current_actor(&self) -> Option<Actor> {
        // a poisoned slot is treated as signed out
        self.actor.read().ok().and_then(|slot| slot.clone())
    }
}

/// Load a saved actor profile (the JSON persisted after login)
pub fn load_actor(path: &Path) -> Result<Actor, SessionError> {
    let content = std::fs::read_to_string(path)?;
    let actor: Actor = serde_json::from_str(&content)?;
    Ok(actor)
}
