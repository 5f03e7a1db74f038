//! Restocking the shelf.
//!
//! One restocking is applied as a single all-or-nothing unit: the record,
//! the per-contributor rows, every contributor's credit and the stock
//! increase commit in the same database transaction. If any contributor is
//! unknown or any write fails, the whole restocking rolls back.

use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseTransaction, EntityTrait, QueryFilter, QueryOrder,
    TransactionTrait,
};
use uuid::Uuid;

use crate::{
    Contribution, Drink, EngineError, MoneyCents, Restocking, RestockingFactory, ResultEngine,
    restockings,
};

use super::{Engine, with_tx};

/// Parameters for [`Engine::restock`].
#[derive(Clone, Debug)]
pub struct RestockCmd {
    pub drink_name: String,
    pub quantity: i64,
    pub contributors: Vec<String>,
    pub total: MoneyCents,
    pub occurred_at: DateTime<Utc>,
}

impl Engine {
    /// Record a restocking: refill `quantity` units of the drink and credit
    /// every contributor their share of the total. Admin only.
    ///
    /// The shares are the factory's deterministic even split; their sum
    /// equals the total exactly.
    pub async fn restock(&self, acting_user: &str, cmd: RestockCmd) -> ResultEngine<Restocking> {
        with_tx!(self, |db_tx| {
            self.require_admin(&db_tx, acting_user).await?;
            let drink = Drink::try_from(self.require_drink(&db_tx, &cmd.drink_name).await?)?;

            let restocking = RestockingFactory::create(
                &drink,
                cmd.quantity,
                &cmd.contributors,
                cmd.total,
                cmd.occurred_at,
            )?;

            // Unknown contributors abort the whole restocking, before any
            // contributor row hits the FK on the users table.
            for contribution in &restocking.contributions {
                self.require_user(&db_tx, &contribution.user_id).await?;
            }

            restockings::ActiveModel::from(&restocking)
                .insert(&db_tx)
                .await?;
            for model in restocking.contributor_models() {
                model.insert(&db_tx).await?;
            }

            for contribution in &restocking.contributions {
                self.apply_balance_delta(&db_tx, &contribution.user_id, contribution.share)
                    .await?;
            }

            self.apply_stock_delta(
                &db_tx,
                &drink.id.to_string(),
                &drink.name,
                restocking.quantity,
            )
            .await?;

            Ok(restocking)
        })
    }

    /// List restockings, most recent first, with their contributor shares.
    pub async fn list_restockings(&self) -> ResultEngine<Vec<Restocking>> {
        with_tx!(self, |db_tx| {
            let models = restockings::Entity::find()
                .order_by_desc(restockings::Column::CreatedAt)
                .all(&db_tx)
                .await?;

            let mut result = Vec::with_capacity(models.len());
            for model in models {
                let restocking = self.load_restocking(&db_tx, model).await?;
                result.push(restocking);
            }
            Ok(result)
        })
    }

    async fn load_restocking(
        &self,
        db: &DatabaseTransaction,
        model: restockings::Model,
    ) -> ResultEngine<Restocking> {
        let contributions = restockings::contributors::Entity::find()
            .filter(restockings::contributors::Column::RestockingId.eq(model.id.clone()))
            .order_by_asc(restockings::contributors::Column::UserId)
            .all(db)
            .await?
            .into_iter()
            .map(|row| Contribution {
                user_id: row.user_id,
                share: MoneyCents::new(row.share_minor),
            })
            .collect();

        Ok(Restocking {
            id: Uuid::parse_str(&model.id)
                .map_err(|_| EngineError::KeyNotFound("restocking not exists".to_string()))?,
            drink_id: Uuid::parse_str(&model.drink_id)
                .map_err(|_| EngineError::KeyNotFound("drink not exists".to_string()))?,
            quantity: model.quantity,
            total: MoneyCents::new(model.total_minor),
            created_at: model.created_at,
            contributions,
        })
    }
}
