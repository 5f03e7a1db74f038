//! The ledger owner: a user with a prepaid balance and a drink counter.
//!
//! The stored balance is only ever changed through [`User::credit`] and
//! [`User::debit`]; persistence applies the same deltas with atomic column
//! updates (see `ops::users`), so two concurrent mutations serialize in the
//! database instead of overwriting each other.

use sea_orm::{ActiveValue, entity::prelude::*};

use crate::{EngineError, MoneyCents, ResultEngine};

/// Role granted to a user.
///
/// Stored as a comma-delimited string in the `roles` column (the historical
/// format); exposed as a typed enum everywhere else.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Role {
    Staff,
    Admin,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Staff => "staff",
            Self::Admin => "admin",
        }
    }
}

impl TryFrom<&str> for Role {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim() {
            "staff" => Ok(Self::Staff),
            "admin" => Ok(Self::Admin),
            other => Err(EngineError::InvalidRole(format!("invalid role: {other}"))),
        }
    }
}

/// Parses the comma-delimited `roles` column into typed roles.
pub(crate) fn parse_roles(raw: &str) -> ResultEngine<Vec<Role>> {
    raw.split(',')
        .filter(|part| !part.trim().is_empty())
        .map(Role::try_from)
        .collect()
}

/// Joins typed roles back into the delimited storage format.
pub(crate) fn join_roles(roles: &[Role]) -> String {
    roles
        .iter()
        .map(|role| role.as_str())
        .collect::<Vec<_>>()
        .join(",")
}

/// A user's ledger state.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct User {
    pub name: String,
    pub balance: MoneyCents,
    pub drinks: i64,
    pub roles: Vec<Role>,
}

impl User {
    pub fn new(name: String, roles: Vec<Role>) -> Self {
        Self {
            name,
            balance: MoneyCents::ZERO,
            drinks: 0,
            roles,
        }
    }

    /// Adds `amount` to the balance. The amount must be >= 0; there is no
    /// upper bound.
    pub fn credit(&mut self, amount: MoneyCents) -> ResultEngine<()> {
        if amount.is_negative() {
            return Err(EngineError::InvalidAmount(
                "credit amount must be >= 0".to_string(),
            ));
        }
        self.balance += amount;
        Ok(())
    }

    /// Subtracts `amount` from the balance. The amount must be >= 0.
    ///
    /// There is no floor: the balance may go negative, matching the original
    /// product behavior.
    pub fn debit(&mut self, amount: MoneyCents) -> ResultEngine<()> {
        if amount.is_negative() {
            return Err(EngineError::InvalidAmount(
                "debit amount must be >= 0".to_string(),
            ));
        }
        self.balance -= amount;
        Ok(())
    }

    /// Bumps the consumed-drinks counter.
    pub fn add_drink(&mut self) {
        self.drinks += 1;
    }

    /// Resets the consumed-drinks counter to zero.
    pub fn reset_drinks(&mut self) {
        self.drinks = 0;
    }

    /// Display form of the balance ("1.50€"). Presentation only; the stored
    /// value stays in cents.
    #[must_use]
    pub fn formatted_balance(&self) -> String {
        self.balance.to_string()
    }

    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.roles.contains(&Role::Admin)
    }
}

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
pub enum Relation {
    #[sea_orm(has_many = "super::transactions::Entity")]
    Transactions,
    #[sea_orm(has_many = "super::restockings::contributors::Entity")]
    RestockingContributors,
}

impl Related<super::transactions::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Transactions.def()
    }
}

impl Related<super::restockings::contributors::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::RestockingContributors.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl TryFrom<Model> for User {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            name: model.name,
            balance: MoneyCents::new(model.balance),
            drinks: model.drinks,
            roles: parse_roles(&model.roles)?,
        })
    }
}

impl From<&User> for ActiveModel {
    fn from(user: &User) -> Self {
        Self {
            name: ActiveValue::Set(user.name.clone()),
            roles: ActiveValue::Set(join_roles(&user.roles)),
            balance: ActiveValue::Set(user.balance.cents()),
            drinks: ActiveValue::Set(user.drinks),
            ..Default::default()
        }
    }
}
