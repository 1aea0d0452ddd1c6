//! UI 会话识别
//!
//! 每个控制台标签页带 `X-Console-Session` 头，拥有独立的待提交缓冲区。

use axum::extract::FromRequestParts;
use http::request::Parts;
use std::convert::Infallible;

use crate::catalog::DEFAULT_SESSION;

pub const SESSION_HEADER: &str = "x-console-session";

/// 当前请求所属会话
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionId(pub String);

impl SessionId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl<S> FromRequestParts<S> for SessionId
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let session = parts
            .headers
            .get(SESSION_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .unwrap_or(DEFAULT_SESSION);
        Ok(Self(session.to_string()))
    }
}
