//! Session identity issued by the external auth service.
//!
//! The identity cookie stores a signed JWT. Handlers take
//! [`AuthenticatedUser`] as an extractor; a missing or invalid token yields
//! `401 Unauthorized`, which [`crate::middleware::RedirectUnauthorized`]
//! turns into a redirect to the sign-in page.

use std::future::{Ready, ready};

use actix_identity::Identity;
use actix_web::{FromRequest, HttpRequest, dev::Payload, web};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use crate::models::config::ServerConfig;

/// Claims of the signed-in user.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct AuthenticatedUser {
    /// Subject assigned by the identity provider.
    pub sub: String,
    pub email: String,
    #[serde(default)]
    pub name: Option<String>,
    pub exp: usize,
}

impl AuthenticatedUser {
    /// Name to greet the user with: the full name, else the email local part.
    pub fn display_name(&self) -> &str {
        match self.name.as_deref().map(str::trim) {
            Some(name) if !name.is_empty() => name,
            _ => self.email.split('@').next().unwrap_or(&self.email),
        }
    }

    pub fn to_jwt(&self, secret: &str) -> Result<String, jsonwebtoken::errors::Error> {
        encode(
            &Header::default(),
            self,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
    }

    pub fn from_jwt(token: &str, secret: &str) -> Result<Self, jsonwebtoken::errors::Error> {
        let data = decode::<Self>(
            token,
            &DecodingKey::from_secret(secret.as_bytes()),
            &Validation::default(),
        )?;
        Ok(data.claims)
    }
}

impl FromRequest for AuthenticatedUser {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let identity = match Identity::from_request(req, payload).into_inner() {
            Ok(identity) => identity,
            Err(err) => return ready(Err(err)),
        };

        let token = match identity.id() {
            Ok(token) => token,
            Err(_) => return ready(Err(actix_web::error::ErrorUnauthorized("Invalid identity"))),
        };

        let Some(config) = req.app_data::<web::Data<ServerConfig>>() else {
            log::error!("ServerConfig is not registered in app data");
            return ready(Err(actix_web::error::ErrorInternalServerError(
                "Server misconfigured",
            )));
        };

        match AuthenticatedUser::from_jwt(&token, &config.secret) {
            Ok(claims) => ready(Ok(claims)),
            Err(err) => {
                log::warn!("Rejected session token: {err}");
                ready(Err(actix_web::error::ErrorUnauthorized("Invalid token")))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn claims() -> AuthenticatedUser {
        AuthenticatedUser {
            sub: "auth|42".into(),
            email: "jane@example.com".into(),
            name: None,
            exp: 4_102_444_800,
        }
    }

    #[test]
    fn token_round_trips_with_the_shared_secret() {
        let token = claims().to_jwt("secret").expect("encode");
        assert_eq!(AuthenticatedUser::from_jwt(&token, "secret").expect("decode"), claims());
        assert!(AuthenticatedUser::from_jwt(&token, "other").is_err());
    }

    #[test]
    fn expired_token_is_rejected() {
        let mut expired = claims();
        expired.exp = 1;
        let token = expired.to_jwt("secret").expect("encode");
        assert!(AuthenticatedUser::from_jwt(&token, "secret").is_err());
    }

    #[test]
    fn display_name_falls_back_to_email() {
        assert_eq!(claims().display_name(), "jane");
        let mut named = claims();
        named.name = Some("Jane Doe".into());
        assert_eq!(named.display_name(), "Jane Doe");
    }
}
