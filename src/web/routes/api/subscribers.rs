use axum::{extract::State, Json};

use crate::{web::types::SubscriberCount, AppState};

/// Never fails, an unreadable store counts as empty.
#[tracing::instrument(name = "Counting subscribers", skip(app_state))]
pub async fn subscribers_count(State(app_state): State<AppState>) -> Json<SubscriberCount> {
    let count = app_state.store.count().await;
    Json(SubscriberCount { count })
}
