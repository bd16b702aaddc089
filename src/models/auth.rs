//! Roles de usuario
//!
//! El registro de usuarios vive en el proveedor de identidad; el core solo
//! necesita `{id, role}` del token verificado.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Rol del usuario autenticado
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Owner,
    Admin,
    Driver,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Owner => "owner",
            UserRole::Admin => "admin",
            UserRole::Driver => "driver",
        }
    }

    /// Owner y admin comparten las operaciones de dispatch
    pub fn is_dispatcher(&self) -> bool {
        matches!(self, UserRole::Owner | UserRole::Admin)
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dispatcher_roles() {
        assert!(UserRole::Owner.is_dispatcher());
        assert!(UserRole::Admin.is_dispatcher());
        assert!(!UserRole::Driver.is_dispatcher());
    }

    #[test]
    fn test_serde_lowercase() {
        let role: UserRole = serde_json::from_str("\"driver\"").unwrap();
        assert_eq!(role, UserRole::Driver);
        assert_eq!(serde_json::to_string(&UserRole::Owner).unwrap(), "\"owner\"");
    }
}
