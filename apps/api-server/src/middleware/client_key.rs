//! Client identification for rate limiting.

use std::future::{Ready, ready};

use actix_web::{FromRequest, HttpRequest, dev::Payload};

const FORWARDED_FOR: &str = "x-forwarded-for";
const UNKNOWN_CLIENT: &str = "unknown";

/// Rate limit key of the caller.
///
/// The raw `X-Forwarded-For` header when present, else the peer IP address,
/// else `"unknown"`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientKey(pub String);

impl ClientKey {
    pub fn resolve(req: &HttpRequest) -> Self {
        let key = req
            .headers()
            .get(FORWARDED_FOR)
            .and_then(|value| value.to_str().ok())
            .filter(|value| !value.is_empty())
            .map(str::to_owned)
            .or_else(|| req.peer_addr().map(|addr| addr.ip().to_string()))
            .unwrap_or_else(|| UNKNOWN_CLIENT.to_string());

        Self(key)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromRequest for ClientKey {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(Ok(Self::resolve(req)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::TestRequest;

    #[test]
    fn test_forwarded_header_wins() {
        let req = TestRequest::default()
            .insert_header((FORWARDED_FOR, "203.0.113.9, 10.0.0.1"))
            .peer_addr("192.0.2.1:4000".parse().unwrap())
            .to_http_request();
        assert_eq!(ClientKey::resolve(&req).as_str(), "203.0.113.9, 10.0.0.1");
    }

    #[test]
    fn test_peer_address_fallback() {
        let req = TestRequest::default()
            .peer_addr("192.0.2.1:4000".parse().unwrap())
            .to_http_request();
        assert_eq!(ClientKey::resolve(&req).as_str(), "192.0.2.1");
    }

    #[test]
    fn test_unknown_client() {
        let req = TestRequest::default().to_http_request();
        assert_eq!(ClientKey::resolve(&req).as_str(), "unknown");
    }
}
