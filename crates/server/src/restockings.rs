//! Restocking endpoints.

use api_types::restocking::{
    ContributionView, RestockingNew, RestockingView, RestockingsResponse,
};
use axum::{Extension, Json, extract::State, http::StatusCode};
use chrono::Utc;
use engine::{MoneyCents, RestockCmd};

use crate::{ServerError, server::ServerState, user};

fn restocking_view(restocking: engine::Restocking) -> RestockingView {
    RestockingView {
        id: restocking.id,
        drink_id: restocking.drink_id,
        quantity: restocking.quantity,
        total_minor: restocking.total.cents(),
        created_at: restocking.created_at,
        contributions: restocking
            .contributions
            .into_iter()
            .map(|contribution| ContributionView {
                user: contribution.user_id,
                share_minor: contribution.share.cents(),
            })
            .collect(),
    }
}

/// Record a restocking and credit the contributors. Admin only.
pub async fn create(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Json(payload): Json<RestockingNew>,
) -> Result<(StatusCode, Json<RestockingView>), ServerError> {
    let cmd = RestockCmd {
        drink_name: payload.drink,
        quantity: payload.quantity,
        contributors: payload.contributors,
        total: MoneyCents::new(payload.total_minor),
        occurred_at: Utc::now(),
    };
    let restocking = state.engine.restock(&user.name, cmd).await?;
    Ok((StatusCode::CREATED, Json(restocking_view(restocking))))
}

/// List restockings, most recent first.
pub async fn list(
    _: Extension<user::Model>,
    State(state): State<ServerState>,
) -> Result<Json<RestockingsResponse>, ServerError> {
    let restockings = state.engine.list_restockings().await?;
    Ok(Json(RestockingsResponse {
        restockings: restockings.into_iter().map(restocking_view).collect(),
    }))
}
