//! Anti-forgery tokens / 防伪令牌
//!
//! Tokens are bound to a logical action and to a time tick. A tick lasts half
//! the configured lifetime, and a token verifies during the tick it was issued
//! in and the one after it, so its effective age is between L/2 and L.
//! 令牌绑定动作与时间片；每个时间片为有效期的一半，签发时间片及下一时间片内有效。

use hmac::{Hmac, Mac};
use sha2::Sha256;

use crate::search::request::{Marker, SearchRequest};
use crate::search::FormIdentity;

type HmacSha256 = Hmac<Sha256>;

/// Truncated MAC length in bytes (16 hex chars) / 截断后的MAC字节数
const TOKEN_BYTES: usize = 8;

/// How old a verified token is / 令牌新旧程度
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NonceAge {
    /// Issued during the current tick / 当前时间片签发
    Fresh,
    /// Issued during the previous tick / 上一时间片签发
    Aging,
}

/// Issues and verifies action-bound tokens / 签发与校验令牌
#[derive(Clone)]
pub struct NonceIssuer {
    mac: HmacSha256,
    lifetime_secs: i64,
}

impl std::fmt::Debug for NonceIssuer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NonceIssuer")
            .field("lifetime_secs", &self.lifetime_secs)
            .finish_non_exhaustive()
    }
}

impl NonceIssuer {
    pub fn new(secret: &str, lifetime_secs: i64) -> Result<Self, String> {
        if secret.is_empty() {
            return Err("Anti-forgery secret must not be empty".to_string());
        }
        let mac = HmacSha256::new_from_slice(secret.as_bytes())
            .map_err(|e| format!("HMAC初始化失败: {}", e))?;
        Ok(Self {
            mac,
            lifetime_secs: lifetime_secs.max(2),
        })
    }

    /// ceil(now / (lifetime / 2))
    fn tick(&self, now: i64) -> i64 {
        let half = self.lifetime_secs / 2;
        (now + half - 1).div_euclid(half)
    }

    fn keyed(&self, tick: i64, action: &str) -> HmacSha256 {
        let mut mac = self.mac.clone();
        mac.update(format!("{}|{}", tick, action).as_bytes());
        mac
    }

    /// Issue a token for `action` at unix time `now` / 签发令牌
    pub fn issue(&self, action: &str, now: i64) -> String {
        let tag = self.keyed(self.tick(now), action).finalize().into_bytes();
        hex::encode(&tag[..TOKEN_BYTES])
    }

    /// Verify a token, `None` when invalid or expired / 校验令牌，无效或过期时返回 None
    pub fn verify(&self, action: &str, token: &str, now: i64) -> Option<NonceAge> {
        let bytes = hex::decode(token.trim()).ok()?;
        if bytes.len() != TOKEN_BYTES {
            return None;
        }
        let tick = self.tick(now);
        if self.keyed(tick, action).verify_truncated_left(&bytes).is_ok() {
            return Some(NonceAge::Fresh);
        }
        if self.keyed(tick - 1, action).verify_truncated_left(&bytes).is_ok() {
            return Some(NonceAge::Aging);
        }
        None
    }
}

/// Result of the authentication gate / 认证结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthResult {
    /// Plugin filtering not requested, pass through / 未请求插件过滤
    NotRequested,
    /// Marker present with a bad token / 令牌无效
    Unauthenticated,
    Authenticated(FormIdentity),
}

impl AuthResult {
    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Authenticated(_))
    }
}

/// Check that a request carries a fresh token for the form it claims to act for.
/// Pure check, never logs the token.
pub fn authenticate(request: &SearchRequest, issuer: &NonceIssuer, now: i64) -> AuthResult {
    if matches!(request.marker, Marker::Absent) {
        return AuthResult::NotRequested;
    }
    let Some(token) = request.token.as_deref() else {
        return AuthResult::NotRequested;
    };
    match request.marker {
        Marker::Claims(identity) => match issuer.verify(&identity.action(), token, now) {
            Some(_) => AuthResult::Authenticated(identity),
            None => AuthResult::Unauthenticated,
        },
        _ => AuthResult::Unauthenticated,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LIFETIME: i64 = 86_400;
    const NOW: i64 = 1_760_000_000;

    fn issuer() -> NonceIssuer {
        NonceIssuer::new("test-secret", LIFETIME).unwrap()
    }

    fn request(marker: Marker, token: Option<String>) -> SearchRequest {
        SearchRequest {
            marker,
            token,
            term: "sale".to_string(),
            host_term: String::new(),
            page: 1,
        }
    }

    #[test]
    fn test_issue_format() {
        let token = issuer().issue("customizable_search:general", NOW);
        assert_eq!(token.len(), 16);
        assert!(token.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_verify_same_action() {
        let issuer = issuer();
        let token = issuer.issue("trend_alert_search", NOW);
        assert_eq!(issuer.verify("trend_alert_search", &token, NOW), Some(NonceAge::Fresh));
    }

    #[test]
    fn test_verify_rejects_other_action() {
        let issuer = issuer();
        let token = issuer.issue(&FormIdentity::Form(3).action(), NOW);
        assert_eq!(issuer.verify(&FormIdentity::Form(4).action(), &token, NOW), None);
        assert_eq!(issuer.verify(&FormIdentity::General.action(), &token, NOW), None);
    }

    #[test]
    fn test_verify_rejects_other_secret() {
        let token = issuer().issue("a", NOW);
        let other = NonceIssuer::new("other-secret", LIFETIME).unwrap();
        assert_eq!(other.verify("a", &token, NOW), None);
    }

    #[test]
    fn test_token_ages_then_expires() {
        let issuer = issuer();
        let half = LIFETIME / 2;
        // Issue at the start of a tick / 在时间片起点签发
        let issued_at = (NOW / half) * half + 1;
        let token = issuer.issue("a", issued_at);

        assert_eq!(issuer.verify("a", &token, issued_at + half - 1), Some(NonceAge::Fresh));
        assert_eq!(issuer.verify("a", &token, issued_at + half), Some(NonceAge::Aging));
        assert_eq!(issuer.verify("a", &token, issued_at + LIFETIME), None);
    }

    #[test]
    fn test_verify_garbage() {
        let issuer = issuer();
        assert_eq!(issuer.verify("a", "", NOW), None);
        assert_eq!(issuer.verify("a", "zzzz", NOW), None);
        assert_eq!(issuer.verify("a", "abcd", NOW), None);
    }

    #[test]
    fn test_empty_secret_rejected() {
        assert!(NonceIssuer::new("", LIFETIME).is_err());
    }

    #[test]
    fn test_authenticate_without_marker_passes_through() {
        let issuer = issuer();
        let token = issuer.issue(&FormIdentity::General.action(), NOW);
        let result = authenticate(&request(Marker::Absent, Some(token)), &issuer, NOW);
        assert_eq!(result, AuthResult::NotRequested);
        assert!(!result.is_valid());
    }

    #[test]
    fn test_authenticate_without_token_passes_through() {
        let result = authenticate(&request(Marker::Claims(FormIdentity::General), None), &issuer(), NOW);
        assert_eq!(result, AuthResult::NotRequested);
    }

    #[test]
    fn test_authenticate_valid_and_invalid() {
        let issuer = issuer();
        let identity = FormIdentity::Form(9);
        let token = issuer.issue(&identity.action(), NOW);

        let ok = authenticate(&request(Marker::Claims(identity), Some(token.clone())), &issuer, NOW);
        assert_eq!(ok, AuthResult::Authenticated(identity));
        assert!(ok.is_valid());

        let wrong_form = authenticate(&request(Marker::Claims(FormIdentity::Form(10)), Some(token.clone())), &issuer, NOW);
        assert_eq!(wrong_form, AuthResult::Unauthenticated);

        let malformed = authenticate(&request(Marker::Malformed, Some(token)), &issuer, NOW);
        assert_eq!(malformed, AuthResult::Unauthenticated);
    }
}
