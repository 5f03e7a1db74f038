//! Drink catalog operations.

use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseTransaction, EntityTrait, QueryFilter, QueryOrder,
    TransactionTrait, sea_query::Expr,
};

use crate::{Drink, EngineError, MoneyCents, ResultEngine, drinks};

use super::{Engine, normalize_required_name, with_tx};

impl Engine {
    pub(super) async fn require_drink(
        &self,
        db: &DatabaseTransaction,
        name: &str,
    ) -> ResultEngine<drinks::Model> {
        drinks::Entity::find()
            .filter(drinks::Column::Name.eq(name))
            .one(db)
            .await?
            .ok_or_else(|| EngineError::UnknownDrink(name.to_string()))
    }

    /// Adjusts a drink's stock by `delta` atomically.
    ///
    /// A purchase passes -1 and is rejected when the shelf is already
    /// empty; a restocking passes the restocked quantity.
    pub(super) async fn apply_stock_delta(
        &self,
        db: &DatabaseTransaction,
        drink_id: &str,
        name: &str,
        delta: i64,
    ) -> ResultEngine<()> {
        let mut update = drinks::Entity::update_many()
            .col_expr(
                drinks::Column::Stock,
                Expr::col(drinks::Column::Stock).add(delta),
            )
            .filter(drinks::Column::Id.eq(drink_id));
        if delta < 0 {
            update = update.filter(drinks::Column::Stock.gte(-delta));
        }
        let result = update.exec(db).await?;
        if result.rows_affected == 0 {
            if delta < 0 {
                return Err(EngineError::OutOfStock(name.to_string()));
            }
            return Err(EngineError::KeyNotFound(name.to_string()));
        }
        Ok(())
    }

    /// Add a drink to the catalog. Admin only.
    pub async fn new_drink(
        &self,
        acting_user: &str,
        name: &str,
        price: MoneyCents,
        stock: i64,
    ) -> ResultEngine<Drink> {
        let name = normalize_required_name(name, "drink")?;
        with_tx!(self, |db_tx| {
            self.require_admin(&db_tx, acting_user).await?;
            if drinks::Entity::find()
                .filter(drinks::Column::Name.eq(name.clone()))
                .one(&db_tx)
                .await?
                .is_some()
            {
                return Err(EngineError::ExistingKey(name));
            }

            let drink = Drink::new(name, price, stock)?;
            let model: drinks::ActiveModel = (&drink).into();
            model.insert(&db_tx).await?;
            Ok(drink)
        })
    }

    /// List the catalog, ordered by name.
    pub async fn list_drinks(&self) -> ResultEngine<Vec<Drink>> {
        let models = drinks::Entity::find()
            .order_by_asc(drinks::Column::Name)
            .all(&self.database)
            .await?;
        models.into_iter().map(Drink::try_from).collect()
    }
}
