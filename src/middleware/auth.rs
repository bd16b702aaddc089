//! Autenticación por bearer token
//!
//! El proveedor de identidad es externo; aquí solo se verifica el JWT y se
//! expone `{id, role}` a los handlers vía el extractor `AuthUser`.

use axum::{async_trait, extract::FromRequestParts, http::request::Parts};

use crate::models::auth::UserRole;
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::utils::jwt::{extract_token_from_header, verify_token};

/// Identidad del caller autenticado
#[derive(Debug, Clone, Copy)]
pub struct AuthUser {
    pub id: i64,
    pub role: UserRole,
}

impl AuthUser {
    /// Exigir uno de los roles dados
    pub fn require_role(&self, allowed: &[UserRole]) -> Result<(), AppError> {
        if allowed.contains(&self.role) {
            return Ok(());
        }
        Err(AppError::Forbidden(format!(
            "Role '{}' cannot perform this action",
            self.role
        )))
    }

    /// Exigir admin u owner (operaciones de dispatch)
    pub fn require_dispatcher(&self) -> Result<(), AppError> {
        if self.role.is_dispatcher() {
            return Ok(());
        }
        Err(AppError::Forbidden(
            "Only admin or owner can perform this action".to_string(),
        ))
    }

    /// Exigir rol driver
    pub fn require_driver(&self) -> Result<(), AppError> {
        self.require_role(&[UserRole::Driver])
    }
}

#[async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get("Authorization")
            .and_then(|h| h.to_str().ok())
            .ok_or_else(|| AppError::Unauthorized("No token provided".to_string()))?;

        let token = extract_token_from_header(auth_header)?;
        let claims = verify_token(token, &state.jwt_config())?;

        Ok(AuthUser {
            id: claims.sub,
            role: claims.role,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_require_dispatcher() {
        let admin = AuthUser { id: 1, role: UserRole::Admin };
        let owner = AuthUser { id: 2, role: UserRole::Owner };
        let driver = AuthUser { id: 5, role: UserRole::Driver };

        assert!(admin.require_dispatcher().is_ok());
        assert!(owner.require_dispatcher().is_ok());
        assert!(driver.require_dispatcher().is_err());
    }

    #[test]
    fn test_require_driver() {
        let driver = AuthUser { id: 5, role: UserRole::Driver };
        let admin = AuthUser { id: 1, role: UserRole::Admin };

        assert!(driver.require_driver().is_ok());
        assert!(admin.require_driver().is_err());
    }
}
