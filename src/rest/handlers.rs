use std::str::FromStr;

use axum::{
    body::Bytes,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::Value;

use crate::{
    repository::{Client, Entity, ProfileType, Template},
    storage::DocumentStore,
};

use super::{
    identity::Payload,
    models::{CreateQuery, HealthResponse, ProfileResponse},
    AppState,
};

pub async fn health<S: DocumentStore + Clone + Send + Sync + 'static>(
    State(state): State<AppState<S>>,
) -> impl IntoResponse {
    let uptime_secs = state.started_at.elapsed().map(|d| d.as_secs()).unwrap_or(0);
    (
        StatusCode::OK,
        Json(HealthResponse {
            status: "ok".to_string(),
            uptime_secs,
        }),
    )
}

#[tracing::instrument(skip_all, fields(uid = %payload.uid))]
pub async fn create_profile<S: DocumentStore + Clone + Send + Sync + 'static>(
    State(state): State<AppState<S>>,
    payload: Payload,
    Query(query): Query<CreateQuery>,
    body: Bytes,
) -> StatusCode {
    match state.db.exists_profile(&payload.uid) {
        Ok(false) => {}
        Ok(true) => {
            log::debug!("Profile already exists with the associated account");
            return StatusCode::BAD_REQUEST;
        }
        Err(err) => {
            log::error!("Failed to check existing profile {}: {:#}", payload.uid, err);
            return StatusCode::INTERNAL_SERVER_ERROR;
        }
    }

    let kind = match query.kind.as_deref().map(ProfileType::from_str) {
        Some(Ok(kind)) => kind,
        Some(Err(err)) => {
            log::debug!("{}", err);
            return StatusCode::BAD_REQUEST;
        }
        None => {
            log::debug!("Missing profile type");
            return StatusCode::BAD_REQUEST;
        }
    };

    let Some(form) = parse_form(&body) else {
        return StatusCode::BAD_REQUEST;
    };

    match kind {
        ProfileType::Individual => insert_profile(&state.db.inds, &payload, &form),
        ProfileType::Organization => insert_profile(&state.db.orgs, &payload, &form),
    }
}

fn insert_profile<E: Entity, S: DocumentStore>(
    repo: &Template<E, S>,
    payload: &Payload,
    form: &Value,
) -> StatusCode {
    let validated = match repo.validate(form) {
        Ok(validated) => validated,
        Err(err) => {
            log::debug!("{}", err);
            return StatusCode::BAD_REQUEST;
        }
    };

    let mut doc = repo.form_to_document(validated);
    doc.id = payload.uid.clone();
    doc.email = payload.email.clone().unwrap_or_default();
    doc.picture = payload.picture.clone().unwrap_or_default();

    match repo.insert(&doc) {
        Ok(()) => {
            log::info!("Created {} profile {}", repo.collection(), doc.id);
            StatusCode::OK
        }
        Err(err) => {
            log::error!("Failed to insert profile {}: {:#}", doc.id, err);
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

#[tracing::instrument(skip_all, fields(uid = %payload.uid))]
pub async fn get_profile<S: DocumentStore + Clone + Send + Sync + 'static>(
    State(state): State<AppState<S>>,
    payload: Payload,
) -> Response {
    match state.db.find(&payload.uid) {
        Ok(found) => {
            let kind = found.as_ref().map(|(kind, _)| *kind);
            Json(ProfileResponse {
                client: Client::of(kind),
                profile: found.map(|(_, data)| data),
            })
            .into_response()
        }
        Err(err) => {
            log::error!("Failed to load profile {}: {:#}", payload.uid, err);
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

#[tracing::instrument(skip_all, fields(uid = %payload.uid))]
pub async fn update_profile<S: DocumentStore + Clone + Send + Sync + 'static>(
    State(state): State<AppState<S>>,
    payload: Payload,
    body: Bytes,
) -> StatusCode {
    let kind = match state.db.profile_type(&payload.uid) {
        Ok(Some(kind)) => kind,
        Ok(None) => {
            log::debug!("No profile to update");
            return StatusCode::BAD_REQUEST;
        }
        Err(err) => {
            log::error!("Failed to load profile {}: {:#}", payload.uid, err);
            return StatusCode::INTERNAL_SERVER_ERROR;
        }
    };

    let Some(form) = parse_form(&body) else {
        return StatusCode::BAD_REQUEST;
    };

    match kind {
        ProfileType::Individual => replace_profile(&state.db.inds, &payload.uid, &form),
        ProfileType::Organization => replace_profile(&state.db.orgs, &payload.uid, &form),
    }
}

fn replace_profile<E: Entity, S: DocumentStore>(
    repo: &Template<E, S>,
    uid: &str,
    form: &Value,
) -> StatusCode {
    let validated = match repo.validate(form) {
        Ok(validated) => validated,
        Err(err) => {
            log::debug!("{}", err);
            return StatusCode::BAD_REQUEST;
        }
    };

    match repo.update(uid, &repo.create(validated)) {
        Ok(true) => {
            log::info!("Updated {} profile {}", repo.collection(), uid);
            StatusCode::OK
        }
        Ok(false) => {
            log::debug!("Profile {} vanished before update", uid);
            StatusCode::BAD_REQUEST
        }
        Err(err) => {
            log::error!("Failed to update profile {}: {:#}", uid, err);
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

#[tracing::instrument(skip_all, fields(uid = %payload.uid))]
pub async fn delete_profile<S: DocumentStore + Clone + Send + Sync + 'static>(
    State(state): State<AppState<S>>,
    payload: Payload,
) -> StatusCode {
    match state.db.delete_profile(&payload.uid) {
        Ok(true) => {
            log::info!("Deleted profile {}", payload.uid);
            StatusCode::OK
        }
        Ok(false) => {
            log::debug!("No profile to delete");
            StatusCode::BAD_REQUEST
        }
        Err(err) => {
            log::error!("Failed to delete profile {}: {:#}", payload.uid, err);
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

pub async fn not_found() -> impl IntoResponse {
    StatusCode::NOT_FOUND
}

fn parse_form(body: &[u8]) -> Option<Value> {
    match serde_json::from_slice(body) {
        Ok(form) => Some(form),
        Err(err) => {
            log::debug!("Malformed profile body: {}", err);
            None
        }
    }
}
