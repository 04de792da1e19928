use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    Json,
};

use crate::{
    web::{
        types::{DeserSubscriber, SubscribeSuccess, ValidEmail},
        WebResult,
    },
    AppState,
};

/// Validates the submitted email and adds it to the store.
/// A body that isn't valid JSON is rejected with `400` like an invalid email.
#[tracing::instrument(
    name = "Adding a new subscriber",
    skip(app_state, payload),
    fields(subscriber_email = tracing::field::Empty)
)]
pub async fn subscribe(
    State(app_state): State<AppState>,
    payload: Result<Json<DeserSubscriber>, JsonRejection>,
) -> WebResult<(StatusCode, Json<SubscribeSuccess>)> {
    let Json(subscriber) = payload?;
    let email = ValidEmail::try_from(subscriber)?;
    tracing::Span::current().record("subscriber_email", email.as_ref());

    let created = app_state.store.subscribe(&email).await?;

    Ok((StatusCode::CREATED, Json(SubscribeSuccess::new(created))))
}
