//! Purchase records.
//!
//! A `Transaction` is the immutable audit entry written when a user buys a
//! drink. It is insert-only: the engine exposes no update or delete path.

use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{Drink, EngineError, MoneyCents, Translate, User};

/// One drink purchase by one user.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: Uuid,
    pub user_id: String,
    pub drink: String,
    /// Human-readable description, localized at creation time.
    pub description: String,
    pub amount: MoneyCents,
    pub created_at: DateTime<Utc>,
}

/// Builds purchase records with a localized description.
///
/// The factory only constructs the value: debiting the buyer and persisting
/// both sides is the caller's job ([`crate::Engine::buy_drink`]).
#[derive(Clone, Debug)]
pub struct TransactionFactory<T> {
    translator: T,
}

impl<T: Translate> TransactionFactory<T> {
    pub fn new(translator: T) -> Self {
        Self { translator }
    }

    /// Creates a transaction for `user` buying one `drink`.
    ///
    /// The description comes from the translator, falling back to the raw
    /// drink name when no translation exists.
    pub fn create(&self, user: &User, drink: &Drink, created_at: DateTime<Utc>) -> Transaction {
        Transaction {
            id: Uuid::new_v4(),
            user_id: user.name.clone(),
            drink: drink.name.clone(),
            description: self.translator.translate(&drink.name),
            amount: drink.price,
            created_at,
        }
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "transactions")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub user_id: String,
    pub drink: String,
    pub description: String,
    pub amount_minor: i64,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::UserId",
        to = "super::users::Column::Name"
    )]
    Users,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Users.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Transaction> for ActiveModel {
    fn from(tx: &Transaction) -> Self {
        Self {
            id: ActiveValue::Set(tx.id.to_string()),
            user_id: ActiveValue::Set(tx.user_id.clone()),
            drink: ActiveValue::Set(tx.drink.clone()),
            description: ActiveValue::Set(tx.description.clone()),
            amount_minor: ActiveValue::Set(tx.amount.cents()),
            created_at: ActiveValue::Set(tx.created_at),
        }
    }
}

impl TryFrom<Model> for Transaction {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: Uuid::parse_str(&model.id)
                .map_err(|_| EngineError::KeyNotFound("transaction not exists".to_string()))?,
            user_id: model.user_id,
            drink: model.drink,
            description: model.description,
            amount: MoneyCents::new(model.amount_minor),
            created_at: model.created_at,
        })
    }
}
