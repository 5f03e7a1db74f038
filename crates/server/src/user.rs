//! The module contains the server-side user entity (used by the auth
//! middleware) and the user-facing account endpoints.

use api_types::transaction::{TransactionView, TransactionsResponse};
use api_types::user::{CreditUser, ResetDrinks, UserNew, UserView, UsersResponse};
use axum::{Extension, Json, extract::State, http::StatusCode};
use engine::{MoneyCents, Role};
use sea_orm::entity::prelude::*;

use crate::{ServerError, server::ServerState};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub name: String,
    pub password: String,
    pub roles: String,
    pub balance: i64,
    pub drinks: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

pub(crate) fn user_view(user: engine::User) -> UserView {
    UserView {
        balance_minor: user.balance.cents(),
        balance: user.formatted_balance(),
        drinks: user.drinks,
        roles: user.roles.iter().map(|role| role.as_str().to_string()).collect(),
        name: user.name,
    }
}

pub(crate) fn transaction_view(tx: engine::Transaction) -> TransactionView {
    TransactionView {
        id: tx.id,
        drink: tx.drink,
        description: tx.description,
        amount_minor: tx.amount.cents(),
        created_at: tx.created_at,
    }
}

fn parse_roles(raw: &[String]) -> Result<Vec<Role>, ServerError> {
    raw.iter()
        .map(|role| Role::try_from(role.as_str()).map_err(ServerError::from))
        .collect()
}

/// The authenticated user's own ledger state.
pub async fn me(
    Extension(user): Extension<Model>,
    State(state): State<ServerState>,
) -> Result<Json<UserView>, ServerError> {
    let user = state.engine.user(&user.name).await?;
    Ok(Json(user_view(user)))
}

/// List every account. Admin only.
pub async fn list(
    Extension(user): Extension<Model>,
    State(state): State<ServerState>,
) -> Result<Json<UsersResponse>, ServerError> {
    let users = state.engine.list_users(&user.name).await?;
    Ok(Json(UsersResponse {
        users: users.into_iter().map(user_view).collect(),
    }))
}

/// Create an account with a zero balance. Admin only.
pub async fn create(
    Extension(user): Extension<Model>,
    State(state): State<ServerState>,
    Json(payload): Json<UserNew>,
) -> Result<(StatusCode, Json<UserView>), ServerError> {
    let roles = parse_roles(&payload.roles)?;
    let created = state
        .engine
        .new_user(&user.name, &payload.name, &payload.password, &roles)
        .await?;
    Ok((StatusCode::CREATED, Json(user_view(created))))
}

/// Credit an account's prepaid balance. Admin only.
pub async fn credit(
    Extension(user): Extension<Model>,
    State(state): State<ServerState>,
    Json(payload): Json<CreditUser>,
) -> Result<Json<UserView>, ServerError> {
    let credited = state
        .engine
        .credit_user(&user.name, &payload.name, MoneyCents::new(payload.amount_minor))
        .await?;
    Ok(Json(user_view(credited)))
}

/// Reset an account's consumed-drinks counter. Admin only.
pub async fn reset_drinks(
    Extension(user): Extension<Model>,
    State(state): State<ServerState>,
    Json(payload): Json<ResetDrinks>,
) -> Result<Json<UserView>, ServerError> {
    let reset = state.engine.reset_drinks(&user.name, &payload.name).await?;
    Ok(Json(user_view(reset)))
}

/// The authenticated user's purchase history, most recent first.
pub async fn transactions(
    Extension(user): Extension<Model>,
    State(state): State<ServerState>,
) -> Result<Json<TransactionsResponse>, ServerError> {
    let transactions = state.engine.list_transactions(&user.name).await?;
    Ok(Json(TransactionsResponse {
        transactions: transactions.into_iter().map(transaction_view).collect(),
    }))
}
