//! Buying drinks.
//!
//! A purchase is one atomic unit: the transaction record, the buyer's
//! debit, the drink counter bump and the stock decrement commit together
//! or not at all.

use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, TransactionTrait,
};

use crate::{Drink, ResultEngine, Transaction, User, transactions};

use super::{Engine, with_tx};

impl Engine {
    /// Buy one drink for `user_id`.
    ///
    /// Looks up the catalog entry (`UnknownDrink` if absent), builds the
    /// immutable transaction record through the factory, then debits the
    /// buyer and adjusts the counters with atomic column updates. The
    /// balance may go negative; the stock may not.
    pub async fn buy_drink(
        &self,
        user_id: &str,
        drink_name: &str,
        now: DateTime<Utc>,
    ) -> ResultEngine<Transaction> {
        with_tx!(self, |db_tx| {
            let user = User::try_from(self.require_user(&db_tx, user_id).await?)?;
            let drink_model = self.require_drink(&db_tx, drink_name).await?;
            let drink = Drink::try_from(drink_model)?;

            let tx = self.transaction_factory.create(&user, &drink, now);
            transactions::ActiveModel::from(&tx).insert(&db_tx).await?;

            self.apply_balance_delta(&db_tx, &user.name, -drink.price)
                .await?;
            self.bump_drink_counter(&db_tx, &user.name).await?;
            self.apply_stock_delta(&db_tx, &drink.id.to_string(), &drink.name, -1)
                .await?;

            Ok(tx)
        })
    }

    /// List a user's purchases, most recent first.
    pub async fn list_transactions(&self, user_id: &str) -> ResultEngine<Vec<Transaction>> {
        let models = transactions::Entity::find()
            .filter(transactions::Column::UserId.eq(user_id))
            .order_by_desc(transactions::Column::CreatedAt)
            .all(&self.database)
            .await?;
        models.into_iter().map(Transaction::try_from).collect()
    }
}
