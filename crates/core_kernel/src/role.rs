//! Roles and acting principals
//!
//! A role determines which claims a user can see and what approval
//! authority they hold. Firm codes carry the role in their first letter.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::CoreError;
use crate::identifiers::UserId;

/// User role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Employee,
    Manager,
    Admin,
}

impl Role {
    pub const ALL: [Role; 3] = [Role::Employee, Role::Manager, Role::Admin];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Employee => "employee",
            Role::Manager => "manager",
            Role::Admin => "admin",
        }
    }

    /// Maps a firm code to the role encoded in its first letter
    ///
    /// `E` = employee, `M` = manager, `A` = admin. Case-insensitive.
    pub fn from_firm_code(code: &str) -> Option<Role> {
        match code.trim().chars().next()?.to_ascii_uppercase() {
            'E' => Some(Role::Employee),
            'M' => Some(Role::Manager),
            'A' => Some(Role::Admin),
            _ => None,
        }
    }

    /// Returns true if this role may submit expense claims
    pub fn can_submit(&self) -> bool {
        matches!(self, Role::Employee | Role::Manager)
    }

    /// Returns true if this role may approve or reject claims
    pub fn can_approve(&self) -> bool {
        matches!(self, Role::Manager | Role::Admin)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "employee" => Ok(Role::Employee),
            "manager" => Ok(Role::Manager),
            "admin" => Ok(Role::Admin),
            other => Err(CoreError::validation(format!("Unknown role: {}", other))),
        }
    }
}

/// The authenticated principal performing an operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    pub user_id: UserId,
    pub role: Role,
}

impl Actor {
    pub fn new(user_id: UserId, role: Role) -> Self {
        Self { user_id, role }
    }

    pub fn employee(user_id: UserId) -> Self {
        Self::new(user_id, Role::Employee)
    }

    pub fn manager(user_id: UserId) -> Self {
        Self::new(user_id, Role::Manager)
    }

    pub fn admin(user_id: UserId) -> Self {
        Self::new(user_id, Role::Admin)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_firm_code_prefixes() {
        assert_eq!(Role::from_firm_code("E001"), Some(Role::Employee));
        assert_eq!(Role::from_firm_code("M100"), Some(Role::Manager));
        assert_eq!(Role::from_firm_code("a7"), Some(Role::Admin));
        assert_eq!(Role::from_firm_code("X123"), None);
        assert_eq!(Role::from_firm_code(""), None);
    }

    #[test]
    fn test_role_round_trip_through_str() {
        for role in Role::ALL {
            assert_eq!(role.as_str().parse::<Role>().unwrap(), role);
        }
        assert!("owner".parse::<Role>().is_err());
    }

    #[test]
    fn test_authority_flags() {
        assert!(Role::Employee.can_submit());
        assert!(!Role::Employee.can_approve());
        assert!(Role::Manager.can_submit());
        assert!(Role::Manager.can_approve());
        assert!(!Role::Admin.can_submit());
    }
}
