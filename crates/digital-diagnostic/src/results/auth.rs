use std::fmt;

use axum::http::{header, HeaderMap};
use serde::Serialize;
use subtle::ConstantTimeEq;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    Authenticated,
    Unauthenticated,
}

/// Bearer-token gate for the admin routes.
///
/// With no token configured every request is unauthenticated.
#[derive(Clone, Default)]
pub struct AdminAuth {
    token: Option<String>,
}

impl AdminAuth {
    pub fn new(token: Option<String>) -> Self {
        let token = token
            .map(|token| token.trim().to_string())
            .filter(|token| !token.is_empty());
        Self { token }
    }

    pub fn is_configured(&self) -> bool {
        self.token.is_some()
    }

    pub fn check_token(&self, presented: &str) -> SessionStatus {
        match &self.token {
            Some(expected) if constant_time_compare(expected.as_bytes(), presented.as_bytes()) => {
                SessionStatus::Authenticated
            }
            _ => SessionStatus::Unauthenticated,
        }
    }

    pub fn status(&self, headers: &HeaderMap) -> SessionStatus {
        headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "))
            .map_or(SessionStatus::Unauthenticated, |token| {
                self.check_token(token.trim())
            })
    }
}

impl fmt::Debug for AdminAuth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AdminAuth")
            .field("token", &self.token.as_ref().map(|_| "***"))
            .finish()
    }
}

fn constant_time_compare(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.ct_eq(b).into()
}
