use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, TokenData, Validation};
use uuid::Uuid;

use crate::config::Config;
use crate::models::auth_model::Claims;

pub struct JwtUtils;

impl JwtUtils {
    /// Issues an access token for `user_id`. Returns the token and its expiry
    /// as a unix timestamp.
    pub fn generate_jwt(cfg: &Config, user_id: i64) -> Result<(String, usize), jsonwebtoken::errors::Error> {
        let now = Utc::now();
        let expire = now + Duration::minutes(cfg.jwt_expires_in);
        let claims = Claims {
            sub: user_id,
            exp: expire.timestamp() as usize,
            iat: now.timestamp() as usize,
            jti: Uuid::new_v4().to_string(),
        };
        let token = encode(&Header::default(), &claims, &EncodingKey::from_secret(cfg.jwt_secret.as_bytes()))?;
        Ok((token, claims.exp))
    }

    pub fn validate_jwt(cfg: &Config, token: &str) -> Result<TokenData<Claims>, jsonwebtoken::errors::Error> {
        let decoding_key = DecodingKey::from_secret(cfg.jwt_secret.as_bytes());
        let mut validation = Validation::default();
        validation.validate_exp = true;

        decode::<Claims>(token, &decoding_key, &validation)
    }
}
