use axum::{
    body::Body,
    extract::State,
    http::{header, Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use jsonwebtoken::errors::ErrorKind;
use sea_orm::EntityTrait;

use crate::config::AppState;
use crate::entities::user;
use crate::models::auth_model::CurrentUser;
use crate::utils::api_response::ResponseBuilder;
use crate::utils::jwt_utils::JwtUtils;

/// Resolves the `Authorization` header into a `CurrentUser` extension.
///
/// No header means an anonymous request and passes through untouched. A
/// header that is present but unusable is rejected with 401 here, so handlers
/// never see a half-authenticated request.
pub async fn identify_user(State(state): State<AppState>, mut req: Request<Body>, next: Next) -> Response {
    let Some(auth_header) = req.headers().get(header::AUTHORIZATION) else {
        return next.run(req).await;
    };

    let Ok(auth_str) = auth_header.to_str() else {
        return unauthorized("AUTH_INVALID_FORMAT", "Invalid Authorization header format");
    };

    let Some(token) = bearer_token(auth_str) else {
        return unauthorized("AUTH_INVALID_SCHEME", "Expected 'Bearer <token>' or 'Token <token>'");
    };

    let token_data = match JwtUtils::validate_jwt(&state.config, token) {
        Ok(data) => data,
        Err(e) => {
            let (code, message) = match e.kind() {
                ErrorKind::ExpiredSignature => ("TOKEN_EXPIRED", "Token has expired"),
                ErrorKind::InvalidSignature => ("TOKEN_BAD_SIGNATURE", "Invalid token signature"),
                _ => ("TOKEN_INVALID", "Token is invalid"),
            };
            return unauthorized(code, message);
        }
    };

    let found = match user::Entity::find_by_id(token_data.claims.sub).one(&state.db).await {
        Ok(Some(u)) => u,
        Ok(None) => return unauthorized("USER_NOT_FOUND", "User no longer exists"),
        Err(e) => {
            tracing::error!("User lookup failed during authentication: {}", e);
            return ResponseBuilder::error::<()>(StatusCode::INTERNAL_SERVER_ERROR, "DB_ERR", "Database error")
                .into_response();
        }
    };

    req.extensions_mut().insert(CurrentUser {
        id: found.id,
        username: found.username,
        email: found.email,
        is_staff: found.is_staff,
    });

    next.run(req).await
}

fn bearer_token(header_value: &str) -> Option<&str> {
    let (scheme, token) = header_value.trim().split_once(' ')?;
    let token = token.trim();
    if token.is_empty() {
        return None;
    }
    match scheme {
        "Bearer" | "Token" => Some(token),
        _ => None,
    }
}

fn unauthorized(code: &str, message: &str) -> Response {
    ResponseBuilder::error::<()>(StatusCode::UNAUTHORIZED, code, message).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_bearer_and_token_schemes() {
        assert_eq!(bearer_token("Bearer abc.def"), Some("abc.def"));
        assert_eq!(bearer_token("Token abc.def"), Some("abc.def"));
        assert_eq!(bearer_token("Basic abc"), None);
        assert_eq!(bearer_token("Bearer "), None);
        assert_eq!(bearer_token("abc"), None);
    }
}
