//! Restocking records.
//!
//! A `Restocking` is the immutable event written when a group of users
//! fronts money to refill the shelf. The total cost is split evenly across
//! the contributors and each contributor is credited their share.
//!
//! Share invariant: the per-contributor shares always sum to the total
//! exactly. The even split uses integer division; contributors are ordered
//! by name and the first `total % n` of them carry one extra cent.

use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{Drink, EngineError, MoneyCents, ResultEngine};

/// One contributor's slice of a restocking.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contribution {
    pub user_id: String,
    pub share: MoneyCents,
}

/// A group purchase that refills a drink's stock.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Restocking {
    pub id: Uuid,
    pub drink_id: Uuid,
    pub quantity: i64,
    pub total: MoneyCents,
    pub created_at: DateTime<Utc>,
    pub contributions: Vec<Contribution>,
}

/// Builds restocking records with a deterministic cost split.
///
/// The factory only constructs the value; crediting the contributors and
/// persisting everything as one unit is [`crate::Engine::restock`]'s job.
pub struct RestockingFactory;

impl RestockingFactory {
    /// Creates a restocking of `quantity` units of `drink` paid by
    /// `contributors` for `total`.
    ///
    /// Fails with [`EngineError::NoContributors`] on an empty contributor
    /// set and [`EngineError::InvalidAmount`] when the total or quantity is
    /// not positive. Duplicate contributor names collapse to one entry.
    pub fn create(
        drink: &Drink,
        quantity: i64,
        contributors: &[String],
        total: MoneyCents,
        created_at: DateTime<Utc>,
    ) -> ResultEngine<Restocking> {
        if !total.is_positive() {
            return Err(EngineError::InvalidAmount(
                "restocking total must be > 0".to_string(),
            ));
        }
        if quantity <= 0 {
            return Err(EngineError::InvalidAmount(
                "restocking quantity must be > 0".to_string(),
            ));
        }

        let mut names: Vec<String> = contributors.to_vec();
        names.sort();
        names.dedup();
        if names.is_empty() {
            return Err(EngineError::NoContributors);
        }

        let count = names.len() as i64;
        let base = total.cents() / count;
        let remainder = total.cents() % count;

        let contributions = names
            .into_iter()
            .enumerate()
            .map(|(index, user_id)| Contribution {
                user_id,
                share: MoneyCents::new(base + i64::from((index as i64) < remainder)),
            })
            .collect();

        Ok(Restocking {
            id: Uuid::new_v4(),
            drink_id: drink.id,
            quantity,
            total,
            created_at,
            contributions,
        })
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "restockings")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub drink_id: String,
    pub quantity: i64,
    pub total_minor: i64,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::drinks::Entity",
        from = "Column::DrinkId",
        to = "super::drinks::Column::Id"
    )]
    Drinks,
    #[sea_orm(has_many = "contributors::Entity")]
    Contributors,
}

impl Related<super::drinks::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Drinks.def()
    }
}

impl Related<contributors::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Contributors.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Restocking> for ActiveModel {
    fn from(restocking: &Restocking) -> Self {
        Self {
            id: ActiveValue::Set(restocking.id.to_string()),
            drink_id: ActiveValue::Set(restocking.drink_id.to_string()),
            quantity: ActiveValue::Set(restocking.quantity),
            total_minor: ActiveValue::Set(restocking.total.cents()),
            created_at: ActiveValue::Set(restocking.created_at),
        }
    }
}

/// Per-contributor rows of a restocking.
pub mod contributors {
    use sea_orm::entity::prelude::*;

    #[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
    #[sea_orm(table_name = "restocking_contributors")]
    pub struct Model {
        #[sea_orm(primary_key, auto_increment = false)]
        pub restocking_id: String,
        #[sea_orm(primary_key, auto_increment = false)]
        pub user_id: String,
        pub share_minor: i64,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {
        #[sea_orm(
            belongs_to = "super::Entity",
            from = "Column::RestockingId",
            to = "super::Column::Id"
        )]
        Restockings,
        #[sea_orm(
            belongs_to = "crate::users::Entity",
            from = "Column::UserId",
            to = "crate::users::Column::Name"
        )]
        Users,
    }

    impl Related<super::Entity> for Entity {
        fn to() -> RelationDef {
            Relation::Restockings.def()
        }
    }

    impl Related<crate::users::Entity> for Entity {
        fn to() -> RelationDef {
            Relation::Users.def()
        }
    }

    impl ActiveModelBehavior for ActiveModel {}
}

impl Restocking {
    /// Rows for the `restocking_contributors` table.
    pub(crate) fn contributor_models(&self) -> Vec<contributors::ActiveModel> {
        self.contributions
            .iter()
            .map(|contribution| contributors::ActiveModel {
                restocking_id: ActiveValue::Set(self.id.to_string()),
                user_id: ActiveValue::Set(contribution.user_id.clone()),
                share_minor: ActiveValue::Set(contribution.share.cents()),
            })
            .collect()
    }
}
