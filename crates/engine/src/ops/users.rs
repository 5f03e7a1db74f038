//! User operations: lookups, account creation, admin credits and drink
//! counter resets.
//!
//! Balance and counter mutations are expressed as atomic column updates
//! (`balance = balance + ?`) inside a transaction, never as a read followed
//! by a write from application code. Two concurrent mutations of the same
//! user therefore serialize in the database and both take effect.

use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, DatabaseTransaction, EntityTrait, QueryFilter,
    QueryOrder, TransactionTrait, sea_query::Expr,
};

use crate::{EngineError, MoneyCents, ResultEngine, Role, User, users};

use super::{Engine, normalize_required_name, with_tx};

impl Engine {
    pub(super) async fn require_user(
        &self,
        db: &DatabaseTransaction,
        name: &str,
    ) -> ResultEngine<users::Model> {
        users::Entity::find_by_id(name.to_string())
            .one(db)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound(name.to_string()))
    }

    pub(super) async fn require_admin(
        &self,
        db: &DatabaseTransaction,
        name: &str,
    ) -> ResultEngine<()> {
        let model = self.require_user(db, name).await?;
        let user = User::try_from(model)?;
        if !user.is_admin() {
            return Err(EngineError::Forbidden(format!(
                "{name} is not an administrator"
            )));
        }
        Ok(())
    }

    /// Applies a balance delta with an atomic column update.
    ///
    /// Returns `KeyNotFound` when no row matched.
    pub(super) async fn apply_balance_delta(
        &self,
        db: &DatabaseTransaction,
        name: &str,
        delta: MoneyCents,
    ) -> ResultEngine<()> {
        let result = users::Entity::update_many()
            .col_expr(
                users::Column::Balance,
                Expr::col(users::Column::Balance).add(delta.cents()),
            )
            .filter(users::Column::Name.eq(name))
            .exec(db)
            .await?;
        if result.rows_affected == 0 {
            return Err(EngineError::KeyNotFound(name.to_string()));
        }
        Ok(())
    }

    pub(super) async fn bump_drink_counter(
        &self,
        db: &DatabaseTransaction,
        name: &str,
    ) -> ResultEngine<()> {
        let result = users::Entity::update_many()
            .col_expr(
                users::Column::Drinks,
                Expr::col(users::Column::Drinks).add(1),
            )
            .filter(users::Column::Name.eq(name))
            .exec(db)
            .await?;
        if result.rows_affected == 0 {
            return Err(EngineError::KeyNotFound(name.to_string()));
        }
        Ok(())
    }

    /// Fetch one user's ledger state.
    pub async fn user(&self, name: &str) -> ResultEngine<User> {
        with_tx!(self, |db_tx| {
            let model = self.require_user(&db_tx, name).await?;
            User::try_from(model)
        })
    }

    /// List every user, ordered by name.
    pub async fn list_users(&self, acting_user: &str) -> ResultEngine<Vec<User>> {
        with_tx!(self, |db_tx| {
            self.require_admin(&db_tx, acting_user).await?;
            let models = users::Entity::find()
                .order_by_asc(users::Column::Name)
                .all(&db_tx)
                .await?;
            models.into_iter().map(User::try_from).collect()
        })
    }

    /// Create a user account with a zero balance. Admin only.
    pub async fn new_user(
        &self,
        acting_user: &str,
        name: &str,
        password: &str,
        roles: &[Role],
    ) -> ResultEngine<User> {
        let name = normalize_required_name(name, "user")?;
        with_tx!(self, |db_tx| {
            self.require_admin(&db_tx, acting_user).await?;
            if users::Entity::find_by_id(name.clone())
                .one(&db_tx)
                .await?
                .is_some()
            {
                return Err(EngineError::ExistingKey(name));
            }

            let user = User::new(name, roles.to_vec());
            let mut model: users::ActiveModel = (&user).into();
            model.password = ActiveValue::Set(password.to_string());
            model.insert(&db_tx).await?;
            Ok(user)
        })
    }

    /// Credit a user's prepaid balance. Admin only; the amount must be >= 0.
    pub async fn credit_user(
        &self,
        acting_user: &str,
        name: &str,
        amount: MoneyCents,
    ) -> ResultEngine<User> {
        if amount.is_negative() {
            return Err(EngineError::InvalidAmount(
                "credit amount must be >= 0".to_string(),
            ));
        }
        with_tx!(self, |db_tx| {
            self.require_admin(&db_tx, acting_user).await?;
            self.apply_balance_delta(&db_tx, name, amount).await?;
            let model = self.require_user(&db_tx, name).await?;
            User::try_from(model)
        })
    }

    /// Reset a user's consumed-drinks counter to zero. Admin only.
    pub async fn reset_drinks(&self, acting_user: &str, name: &str) -> ResultEngine<User> {
        with_tx!(self, |db_tx| {
            self.require_admin(&db_tx, acting_user).await?;
            let result = users::Entity::update_many()
                .col_expr(users::Column::Drinks, Expr::value(0))
                .filter(users::Column::Name.eq(name))
                .exec(&db_tx)
                .await?;
            if result.rows_affected == 0 {
                return Err(EngineError::KeyNotFound(name.to_string()));
            }
            let model = self.require_user(&db_tx, name).await?;
            User::try_from(model)
        })
    }
}
