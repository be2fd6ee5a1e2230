use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::env;
use chrono::{Duration, Utc};

/// Claims issued by the identity provider. `sub` is the opaque user id;
/// the profile fields are optional and only used to sync the user row.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub profile_image_url: Option<String>,
    pub exp: i64,
    pub iat: i64,
}

impl Claims {
    pub fn new(user_id: String) -> Self {
        let now = Utc::now();
        let exp = now + Duration::hours(24); // Token expires in 24 hours

        Self {
            sub: user_id,
            email: None,
            first_name: None,
            last_name: None,
            profile_image_url: None,
            exp: exp.timestamp(),
            iat: now.timestamp(),
        }
    }

    pub fn with_profile(
        mut self,
        email: Option<String>,
        first_name: Option<String>,
        last_name: Option<String>,
        profile_image_url: Option<String>,
    ) -> Self {
        self.email = email;
        self.first_name = first_name;
        self.last_name = last_name;
        self.profile_image_url = profile_image_url;
        self
    }
}

pub fn create_token(claims: &Claims) -> Result<String, jsonwebtoken::errors::Error> {
    let secret = env::var("JWT_SECRET").expect("JWT_SECRET must be set");

    encode(
        &Header::default(),
        claims,
        &EncodingKey::from_secret(secret.as_ref()),
    )
}

pub fn verify_token(token: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
    let secret = env::var("JWT_SECRET").expect("JWT_SECRET must be set");

    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_ref()),
        &Validation::default(),
    )?;

    Ok(token_data.claims)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_round_trip_preserves_claims() {
        env::set_var("JWT_SECRET", "test-secret");

        let claims = Claims::new("ext-user-42".to_string()).with_profile(
            Some("staff@bokpharm.example".to_string()),
            Some("Ada".to_string()),
            None,
            None,
        );
        let token = create_token(&claims).unwrap();
        let decoded = verify_token(&token).unwrap();

        assert_eq!(decoded.sub, "ext-user-42");
        assert_eq!(decoded.email.as_deref(), Some("staff@bokpharm.example"));
        assert_eq!(decoded.first_name.as_deref(), Some("Ada"));
        assert!(decoded.last_name.is_none());
    }

    #[test]
    fn tampered_token_is_rejected() {
        env::set_var("JWT_SECRET", "test-secret");

        let claims = Claims::new("ext-user-42".to_string());
        let mut token = create_token(&claims).unwrap();
        token.push('x');
        assert!(verify_token(&token).is_err());
    }
}
