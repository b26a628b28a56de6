use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{request::Parts, HeaderMap, StatusCode},
};

pub const UID_HEADER: &str = "x-auth-uid";
pub const EMAIL_HEADER: &str = "x-auth-email";
pub const PICTURE_HEADER: &str = "x-auth-picture";

/// Caller identity as forwarded by the upstream authenticator.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Payload {
    pub uid: String,
    pub email: Option<String>,
    pub picture: Option<String>,
}

fn header(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}

#[async_trait]
impl<S: Send + Sync> FromRequestParts<S> for Payload {
    type Rejection = StatusCode;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let Some(uid) = header(&parts.headers, UID_HEADER) else {
            log::debug!("Request to {} without {}", parts.uri.path(), UID_HEADER);
            return Err(StatusCode::UNAUTHORIZED);
        };
        Ok(Payload {
            uid,
            email: header(&parts.headers, EMAIL_HEADER),
            picture: header(&parts.headers, PICTURE_HEADER),
        })
    }
}
