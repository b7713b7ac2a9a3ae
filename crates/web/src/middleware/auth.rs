use axum::{
    extract::{Request, State},
    http::{HeaderMap, header},
    middleware::Next,
    response::Response,
};
use std::collections::HashSet;
use std::sync::Arc;

use crate::error::WebError;

pub const ADMIN_TOKEN_HEADER: &str = "x-admin-token";

/// Rejects the request with 401 unless it carries a known admin token, either
/// as `X-Admin-Token` or as a bearer token.
pub async fn require_auth(
    State(tokens): State<AdminTokens>,
    request: Request,
    next: Next,
) -> Result<Response, WebError> {
    match presented_token(request.headers()) {
        Some(token) if tokens.is_valid(token) => Ok(next.run(request).await),
        Some(_) => {
            tracing::warn!("Invalid admin token attempt");
            Err(WebError::Unauthorized)
        }
        None => Err(WebError::Unauthorized),
    }
}

fn presented_token(headers: &HeaderMap) -> Option<&str> {
    if let Some(token) = headers
        .get(ADMIN_TOKEN_HEADER)
        .and_then(|v| v.to_str().ok())
    {
        return Some(token.trim());
    }

    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
}

#[derive(Clone, Default)]
pub struct AdminTokens {
    tokens: Arc<HashSet<String>>,
}

impl AdminTokens {
    pub fn from_comma_separated(tokens_str: &str) -> Self {
        let tokens = tokens_str
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(String::from)
            .collect();

        Self {
            tokens: Arc::new(tokens),
        }
    }

    pub fn is_valid(&self, token: &str) -> bool {
        !token.is_empty() && self.tokens.contains(token)
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_tokens_from_comma_separated() {
        let tokens = AdminTokens::from_comma_separated(" alpha, ,beta,");

        assert_eq!(tokens.len(), 2);
        assert!(tokens.is_valid("alpha"));
        assert!(tokens.is_valid("beta"));
        assert!(!tokens.is_valid(""));
        assert!(!tokens.is_valid("gamma"));
    }

    #[test]
    fn test_presented_token_prefers_admin_header() {
        let mut headers = HeaderMap::new();
        headers.insert(ADMIN_TOKEN_HEADER, HeaderValue::from_static("from-header"));
        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer from-bearer"));

        assert_eq!(presented_token(&headers), Some("from-header"));
    }

    #[test]
    fn test_presented_token_bearer() {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer secret"));
        assert_eq!(presented_token(&headers), Some("secret"));

        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Basic secret"));
        assert_eq!(presented_token(&headers), None);
    }
}
