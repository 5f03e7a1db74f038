//! Drink catalog endpoints and the purchase endpoint.

use api_types::drink::{BuyDrink, DrinkNew, DrinkView, DrinksResponse};
use api_types::transaction::TransactionView;
use axum::{Extension, Json, extract::State, http::StatusCode};
use chrono::Utc;
use engine::MoneyCents;

use crate::{ServerError, server::ServerState, user};

fn drink_view(drink: engine::Drink) -> DrinkView {
    DrinkView {
        id: drink.id,
        name: drink.name,
        price_minor: drink.price.cents(),
        stock: drink.stock,
    }
}

/// The catalog, ordered by name.
pub async fn list(
    _: Extension<user::Model>,
    State(state): State<ServerState>,
) -> Result<Json<DrinksResponse>, ServerError> {
    let drinks = state.engine.list_drinks().await?;
    Ok(Json(DrinksResponse {
        drinks: drinks.into_iter().map(drink_view).collect(),
    }))
}

/// Add a drink to the catalog. Admin only.
pub async fn create(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Json(payload): Json<DrinkNew>,
) -> Result<(StatusCode, Json<DrinkView>), ServerError> {
    let drink = state
        .engine
        .new_drink(
            &user.name,
            &payload.name,
            MoneyCents::new(payload.price_minor),
            payload.stock,
        )
        .await?;
    Ok((StatusCode::CREATED, Json(drink_view(drink))))
}

/// Buy one drink for the authenticated user.
pub async fn buy(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Json(payload): Json<BuyDrink>,
) -> Result<(StatusCode, Json<TransactionView>), ServerError> {
    let tx = state
        .engine
        .buy_drink(&user.name, &payload.drink, Utc::now())
        .await?;
    Ok((StatusCode::CREATED, Json(user::transaction_view(tx))))
}
