// 👥 Role context - the two hard-coded personas and who may open what
//
// The active persona is the only process-wide mutable state. It decides the
// navigation set and which routes are reachable.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum UserRole {
    TaxClerk,
    Client,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::TaxClerk => "tax-clerk",
            UserRole::Client => "client",
        }
    }

    /// Path shown right after switching to this role
    pub fn start_path(&self) -> &'static str {
        match self {
            UserRole::TaxClerk => "/",
            UserRole::Client => "/mandant/dashboard",
        }
    }

    pub fn navigation(&self) -> Vec<NavItem> {
        match self {
            UserRole::TaxClerk => vec![
                NavItem::new("Mandanten", "/"),
                NavItem::new("Posteingang", "/inbox"),
            ],
            UserRole::Client => vec![
                NavItem::new("Dashboard", "/mandant/dashboard"),
                NavItem::new("Beleg-Upload", "/mandant/beleg-upload"),
                NavItem::new("Konto-Vorgänge", "/mandant/konto-vorgaenge"),
                NavItem::new("Belege", "/mandant/belege"),
            ],
        }
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UserRole {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "tax-clerk" => Ok(UserRole::TaxClerk),
            "client" => Ok(UserRole::Client),
            other => Err(Error::invalid("role", other)),
        }
    }
}

/// Sidebar entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavItem {
    pub title: String,
    pub path: String,
}

impl NavItem {
    fn new(title: &str, path: &str) -> Self {
        NavItem {
            title: title.to_string(),
            path: path.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub name: String,
    pub role: UserRole,
    pub role_label: String,
}

impl User {
    pub fn initials(&self) -> String {
        crate::format::initials(&self.name)
    }
}

/// The available personas, clerk first
pub fn available_users() -> Vec<User> {
    vec![
        User {
            name: "Sabine Kramer".to_string(),
            role: UserRole::TaxClerk,
            role_label: "Steuerfachangestellte".to_string(),
        },
        User {
            name: "Muster-Mandant GmbH".to_string(),
            role: UserRole::Client,
            role_label: "Mandant".to_string(),
        },
    ]
}

// ============================================================================
// ROLE CONTEXT
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleContext {
    current: User,
    users: Vec<User>,
}

impl RoleContext {
    pub fn new(role: UserRole) -> Self {
        let users = available_users();
        let current = users
            .iter()
            .find(|u| u.role == role)
            .cloned()
            .unwrap_or_else(|| users[0].clone());
        RoleContext { current, users }
    }

    pub fn current(&self) -> &User {
        &self.current
    }

    pub fn role(&self) -> UserRole {
        self.current.role
    }

    pub fn users(&self) -> &[User] {
        &self.users
    }

    /// Switch persona. Returns the start path to navigate to.
    pub fn switch_to(&mut self, role: UserRole) -> &'static str {
        if let Some(user) = self.users.iter().find(|u| u.role == role) {
            self.current = user.clone();
        }
        tracing::info!(role = %role, user = %self.current.name, "Switched persona");
        role.start_path()
    }

    /// Flip between the two personas
    pub fn toggle(&mut self) -> &'static str {
        let next = match self.role() {
            UserRole::TaxClerk => UserRole::Client,
            UserRole::Client => UserRole::TaxClerk,
        };
        self.switch_to(next)
    }

    pub fn navigation(&self) -> Vec<NavItem> {
        self.role().navigation()
    }
}

impl Default for RoleContext {
    fn default() -> Self {
        Self::new(UserRole::TaxClerk)
    }
}
