use axum::http::{header, HeaderMap, StatusCode};
use axum::Json;
use sha2::{Digest, Sha256};

use crate::api::ApiResponse;
use crate::state::AppState;

/// Cookie carrying the admin token / 管理令牌Cookie名称
pub const ADMIN_COOKIE_NAME: &str = "admin_token";

// 从Cookie中提取管理令牌
fn extract_cookie_token(headers: &HeaderMap) -> Option<String> {
    headers.get(header::COOKIE)
        .and_then(|cookie_header| cookie_header.to_str().ok())
        .and_then(|cookie_str| {
            for cookie in cookie_str.split(';') {
                let cookie = cookie.trim();
                if let Some((key, value)) = cookie.split_once('=') {
                    if key.trim() == ADMIN_COOKIE_NAME {
                        return Some(value.trim().to_string());
                    }
                }
            }
            None
        })
}

/// Admin token from `Authorization: Bearer` or the admin cookie / 从请求头或Cookie中提取管理令牌
pub fn extract_admin_token(headers: &HeaderMap) -> Option<String> {
    headers.get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .or_else(|| extract_cookie_token(headers))
}

// Compare digests so timing does not depend on the secret / 比较摘要
fn token_matches(presented: &str, expected: &str) -> bool {
    if expected.is_empty() {
        return false;
    }
    Sha256::digest(presented.as_bytes()) == Sha256::digest(expected.as_bytes())
}

/// 验证管理员权限
pub fn require_admin(headers: &HeaderMap, state: &AppState) -> Result<(), (StatusCode, Json<ApiResponse<()>>)> {
    let token = extract_admin_token(headers).ok_or_else(|| {
        (StatusCode::UNAUTHORIZED, Json(ApiResponse::with_code(StatusCode::UNAUTHORIZED, "Admin token required")))
    })?;

    if !token_matches(&token, &state.config.security.admin_token) {
        tracing::warn!("Rejected admin request with invalid token");
        return Err((StatusCode::FORBIDDEN, Json(ApiResponse::with_code(StatusCode::FORBIDDEN, "Invalid admin token"))));
    }
    Ok(())
}
