use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::{header, Method, StatusCode},
    middleware::Next,
    response::Response,
};
use axum_extra::extract::cookie::CookieJar;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use service::honor::{repo::seaorm::SeaOrmHonorRepository, HonorService};

pub const AUTH_COOKIE: &str = "auth_token";
pub const ADMIN_ROLE: &str = "ADMIN";

#[derive(Clone)]
pub struct ServerAuthConfig {
    pub jwt_secret: String,
}

#[derive(Clone)]
pub struct ServerState {
    pub honor: Arc<HonorService<SeaOrmHonorRepository>>,
    pub auth: ServerAuthConfig,
    /// Body limit for spreadsheet uploads.
    pub max_upload_bytes: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    #[serde(default)]
    pub roles: Vec<String>,
    pub exp: usize,
}

impl Claims {
    /// `ADMIN` and the prefixed `ROLE_ADMIN` form both count.
    pub fn is_admin(&self) -> bool {
        self.roles.iter().any(|r| r.trim_start_matches("ROLE_").eq_ignore_ascii_case(ADMIN_ROLE))
    }
}

/// HS256 token for `claims`; used by operators' tooling and tests.
pub fn encode_token(secret: &str, claims: &Claims) -> Result<String, jsonwebtoken::errors::Error> {
    encode(&Header::new(Algorithm::HS256), claims, &EncodingKey::from_secret(secret.as_bytes()))
}

/// 校验 Authorization: Bearer <token>，缺失时回退到 auth_token Cookie。
/// 缺失 token 返回 400，非法或过期返回 401；通过后把 Claims 放入请求扩展。
pub async fn require_bearer_token_state(
    State(state): State<ServerState>,
    mut req: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    if req.method() == Method::OPTIONS {
        return Ok(next.run(req).await);
    }
    let path = req.uri().path().to_string();

    let token = match req.headers().get(header::AUTHORIZATION).and_then(|v| v.to_str().ok()) {
        Some(h) => match h.strip_prefix("Bearer ") {
            Some(t) => t.trim().to_string(),
            None => {
                tracing::warn!(path = %path, "invalid Authorization format (expect Bearer)");
                return Err(StatusCode::UNAUTHORIZED);
            }
        },
        None => {
            let jar = CookieJar::from_headers(req.headers());
            match jar.get(AUTH_COOKIE).map(|c| c.value().to_string()) {
                Some(t) if !t.is_empty() => t,
                _ => {
                    tracing::warn!(path = %path, "missing Authorization header and auth_token cookie");
                    return Err(StatusCode::BAD_REQUEST);
                }
            }
        }
    };

    let key = DecodingKey::from_secret(state.auth.jwt_secret.as_bytes());
    let mut validation = Validation::new(Algorithm::HS256);
    validation.validate_exp = true;

    match decode::<Claims>(&token, &key, &validation) {
        Ok(data) => {
            req.extensions_mut().insert(data.claims);
            Ok(next.run(req).await)
        }
        Err(e) => {
            tracing::error!(path = %path, err = %e, "token validation failed");
            Err(StatusCode::UNAUTHORIZED)
        }
    }
}

/// Runs inside `require_bearer_token_state`; rejects callers without the admin role.
pub async fn require_admin(req: Request, next: Next) -> Result<Response, StatusCode> {
    match req.extensions().get::<Claims>() {
        Some(c) if c.is_admin() => Ok(next.run(req).await),
        Some(c) => {
            tracing::warn!(sub = %c.sub, path = %req.uri().path(), "admin role required");
            Err(StatusCode::FORBIDDEN)
        }
        None => Err(StatusCode::UNAUTHORIZED),
    }
}
