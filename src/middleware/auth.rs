use axum::http::{header, HeaderMap};
use tower_cookies::Cookies;

use crate::{error::ApiError, utils::verify_token};

/// The authenticated caller as reported by the identity provider. Carries
/// no database state; handlers look the user row up themselves.
#[derive(Debug, Clone)]
pub struct Identity {
    pub user_id: String,
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub profile_image_url: Option<String>,
}

/// Resolve the caller's identity from the `auth_token` cookie or an
/// `Authorization: Bearer` header.
pub fn get_identity(cookies: &Cookies, headers: &HeaderMap) -> Result<Identity, ApiError> {
    let token = cookies
        .get("auth_token")
        .map(|cookie| cookie.value().to_string())
        .or_else(|| bearer_token(headers).map(str::to_string))
        .ok_or(ApiError::Unauthorized)?;

    let claims = verify_token(&token).map_err(|_| ApiError::Unauthorized)?;

    Ok(Identity {
        user_id: claims.sub,
        email: claims.email,
        first_name: claims.first_name,
        last_name: claims.last_name,
        profile_image_url: claims.profile_image_url,
    })
}

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn bearer_header_is_parsed() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::AUTHORIZATION,
            HeaderValue::from_static("Bearer abc.def.ghi"),
        );
        assert_eq!(bearer_token(&headers), Some("abc.def.ghi"));
    }

    #[test]
    fn non_bearer_authorization_is_ignored() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::AUTHORIZATION,
            HeaderValue::from_static("Basic dXNlcjpwYXNz"),
        );
        assert_eq!(bearer_token(&headers), None);
        assert_eq!(bearer_token(&HeaderMap::new()), None);
    }
}
