use std::sync::Arc;

use axum::{extract::Path, http::StatusCode, response::Json, Extension};
use modkit::{api::problem::ProblemResponse, AuthUser};
use tracing::{info, warn};
use uuid::Uuid;

use crate::api::rest::dto::{
    polls_dto, CreatePollReq, MessageResp, PollDto, PollsResp, UpdatePollReq, VoteReq, VoteResp,
};
use crate::api::rest::error::map_domain_error;
use crate::domain::error::DomainError;
use crate::domain::service::Service;

type Svc = Extension<Arc<Service>>;

fn parse_id(raw: &str, not_found: impl FnOnce() -> DomainError) -> Result<Uuid, ProblemResponse> {
    Uuid::parse_str(raw.trim()).map_err(|_| map_domain_error(&not_found()))
}

fn fail(op: &str, e: DomainError) -> ProblemResponse {
    warn!("Failed to {op}: {e}");
    map_domain_error(&e)
}

/// GET /
pub async fn list_polls(Extension(svc): Svc) -> Result<Json<Vec<PollDto>>, ProblemResponse> {
    svc.list_polls()
        .await
        .map(|polls| Json(polls_dto(polls)))
        .map_err(|e| fail("list polls", e))
}

/// GET /{poll_id}
pub async fn get_poll(
    Extension(svc): Svc,
    Path(poll_id): Path<String>,
) -> Result<Json<PollDto>, ProblemResponse> {
    let id = parse_id(&poll_id, || DomainError::poll_not_found(&poll_id))?;
    svc.get_poll(id)
        .await
        .map(|p| Json(p.into()))
        .map_err(|e| fail("get poll", e))
}

/// GET /user/{user_id}
pub async fn list_polls_by_owner(
    Extension(svc): Svc,
    Path(user_id): Path<String>,
) -> Result<Json<Vec<PollDto>>, ProblemResponse> {
    let owner = parse_id(&user_id, || DomainError::no_polls_for_owner(&user_id))?;
    svc.list_polls_by_owner(owner)
        .await
        .map(|polls| Json(polls_dto(polls)))
        .map_err(|e| fail("list polls by owner", e))
}

/// POST / (bearer)
pub async fn create_poll(
    Extension(svc): Svc,
    Extension(AuthUser(owner)): Extension<AuthUser>,
    Json(req_body): Json<CreatePollReq>,
) -> Result<(StatusCode, Json<PollsResp>), ProblemResponse> {
    info!(
        question = %req_body.question,
        options = req_body.options.len(),
        "Creating poll"
    );

    let polls = svc
        .create_poll(owner, req_body.into())
        .await
        .map_err(|e| fail("create poll", e))?;
    Ok((
        StatusCode::CREATED,
        Json(PollsResp {
            message: "Poll created successfully".to_string(),
            polls: polls_dto(polls),
        }),
    ))
}

/// POST /vote (anonymous)
pub async fn vote(
    Extension(svc): Svc,
    Json(req_body): Json<VoteReq>,
) -> Result<Json<VoteResp>, ProblemResponse> {
    let poll_id = parse_id(&req_body.poll_id, || {
        DomainError::poll_not_found(&req_body.poll_id)
    })?;
    let option_id = parse_id(&req_body.option_id, || {
        DomainError::option_not_found(poll_id, &req_body.option_id)
    })?;

    let poll = svc
        .vote(poll_id, option_id)
        .await
        .map_err(|e| fail("vote", e))?;
    Ok(Json(VoteResp {
        message: "Vote registered successfully".to_string(),
        poll: poll.into(),
    }))
}

/// PUT /{poll_id} (bearer, owner only)
pub async fn update_poll(
    Extension(svc): Svc,
    Extension(AuthUser(caller)): Extension<AuthUser>,
    Path(poll_id): Path<String>,
    Json(req_body): Json<UpdatePollReq>,
) -> Result<Json<PollsResp>, ProblemResponse> {
    let id = parse_id(&poll_id, || DomainError::poll_not_found(&poll_id))?;
    let polls = svc
        .update_poll(caller, id, req_body.into())
        .await
        .map_err(|e| fail("update poll", e))?;
    Ok(Json(PollsResp {
        message: "Poll updated successfully".to_string(),
        polls: polls_dto(polls),
    }))
}

/// DELETE /{poll_id} (bearer, owner only)
pub async fn delete_poll(
    Extension(svc): Svc,
    Extension(AuthUser(caller)): Extension<AuthUser>,
    Path(poll_id): Path<String>,
) -> Result<Json<MessageResp>, ProblemResponse> {
    let id = parse_id(&poll_id, || DomainError::poll_not_found(&poll_id))?;
    svc.delete_poll(caller, id)
        .await
        .map_err(|e| fail("delete poll", e))?;
    Ok(Json(MessageResp {
        message: "Poll deleted successfully".to_string(),
    }))
}
