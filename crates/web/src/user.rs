//! The signed-in user, as asserted by the upstream authentication gateway.

use crate::error::AppError;
use async_trait::async_trait;
use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use contacts_core::constants::APPROVE_VISITORS_ROLE;

pub const USERNAME_HEADER: &str = "x-auth-username";
pub const ROLES_HEADER: &str = "x-auth-roles";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrentUser {
    pub token: String,
    pub username: String,
    pub roles: Vec<String>,
}

impl CurrentUser {
    /// Roles may arrive with or without the `ROLE_` prefix.
    pub fn has_role(&self, role: &str) -> bool {
        self.roles
            .iter()
            .any(|r| r.strip_prefix("ROLE_").unwrap_or(r) == role)
    }

    pub fn can_approve_visitors(&self) -> bool {
        self.has_role(APPROVE_VISITORS_ROLE)
    }
}

fn header<'a>(parts: &'a Parts, name: &str) -> Option<&'a str> {
    parts
        .headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
}

#[async_trait]
impl<S: Send + Sync> FromRequestParts<S> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let token = header(parts, AUTHORIZATION.as_str())
            .and_then(|v| v.strip_prefix("Bearer "))
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or(AppError::Unauthorised)?
            .to_string();
        let username = header(parts, USERNAME_HEADER).unwrap_or("UNKNOWN").to_string();
        let roles = header(parts, ROLES_HEADER)
            .map(|v| {
                v.split(',')
                    .map(str::trim)
                    .filter(|r| !r.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();
        Ok(Self {
            token,
            username,
            roles,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    async fn extract(builder: axum::http::request::Builder) -> Result<CurrentUser, AppError> {
        let (mut parts, _) = builder.body(()).unwrap().into_parts();
        CurrentUser::from_request_parts(&mut parts, &()).await
    }

    #[tokio::test]
    async fn test_reads_gateway_headers() {
        let user = extract(
            Request::builder()
                .header("Authorization", "Bearer abc")
                .header(USERNAME_HEADER, "USER1")
                .header(ROLES_HEADER, "ROLE_PRISON, ROLE_CONTACTS_AUTHORISER"),
        )
        .await
        .unwrap();
        assert_eq!(user.token, "abc");
        assert_eq!(user.username, "USER1");
        assert!(user.can_approve_visitors());
    }

    #[tokio::test]
    async fn test_missing_token_is_unauthorised() {
        let err = extract(Request::builder().header(USERNAME_HEADER, "USER1"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Unauthorised));
    }

    #[tokio::test]
    async fn test_without_role_cannot_approve() {
        let user = extract(Request::builder().header("Authorization", "Bearer abc"))
            .await
            .unwrap();
        assert_eq!(user.username, "UNKNOWN");
        assert!(!user.can_approve_visitors());
    }
}
