use std::sync::Arc;

use axum::{http::StatusCode, response::Json, Extension};
use modkit::{api::problem::ProblemResponse, AuthUser};
use tracing::{info, warn};

use crate::api::rest::dto::{LoginReq, ProfileDto, RegisterReq, RegisterResp, TokenResp};
use crate::api::rest::error::map_domain_error;
use crate::domain::service::Service;

/// POST /register
pub async fn register(
    Extension(svc): Extension<Arc<Service>>,
    Json(req_body): Json<RegisterReq>,
) -> Result<(StatusCode, Json<RegisterResp>), ProblemResponse> {
    info!("Registering user: {}", req_body.redacted());

    match svc.register(req_body.into()).await {
        Ok(token) => Ok((
            StatusCode::CREATED,
            Json(RegisterResp {
                message: "User registered successfully".to_string(),
                token,
            }),
        )),
        Err(e) => {
            warn!("Failed to register user: {}", e);
            Err(map_domain_error(&e))
        }
    }
}

/// POST /login
pub async fn login(
    Extension(svc): Extension<Arc<Service>>,
    Json(req_body): Json<LoginReq>,
) -> Result<Json<TokenResp>, ProblemResponse> {
    match svc.login(&req_body.email, &req_body.password).await {
        Ok(token) => Ok(Json(TokenResp { token })),
        Err(e) => {
            info!("Login rejected: {}", e);
            Err(map_domain_error(&e))
        }
    }
}

/// GET /profile (behind the bearer guard)
pub async fn profile(
    Extension(svc): Extension<Arc<Service>>,
    Extension(AuthUser(user_id)): Extension<AuthUser>,
) -> Result<Json<ProfileDto>, ProblemResponse> {
    match svc.profile(user_id).await {
        Ok(user) => Ok(Json(user.into())),
        Err(e) => {
            warn!("Failed to load profile {}: {}", user_id, e);
            Err(map_domain_error(&e))
        }
    }
}
