//! The drink catalog: what can be bought, at which price, and how many
//! units are left on the shelf.

use sea_orm::{ActiveValue, entity::prelude::*};
use uuid::Uuid;

use crate::{EngineError, MoneyCents, ResultEngine};

/// A catalog entry.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Drink {
    pub id: Uuid,
    pub name: String,
    pub price: MoneyCents,
    pub stock: i64,
}

impl Drink {
    pub fn new(name: String, price: MoneyCents, stock: i64) -> ResultEngine<Self> {
        if !price.is_positive() {
            return Err(EngineError::InvalidAmount(
                "drink price must be > 0".to_string(),
            ));
        }
        if stock < 0 {
            return Err(EngineError::InvalidAmount(
                "drink stock must be >= 0".to_string(),
            ));
        }
        Ok(Self {
            id: Uuid::new_v4(),
            name,
            price,
            stock,
        })
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "drinks")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub name: String,
    pub price_minor: i64,
    pub stock: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::restockings::Entity")]
    Restockings,
}

impl Related<super::restockings::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Restockings.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Drink> for ActiveModel {
    fn from(drink: &Drink) -> Self {
        Self {
            id: ActiveValue::Set(drink.id.to_string()),
            name: ActiveValue::Set(drink.name.clone()),
            price_minor: ActiveValue::Set(drink.price.cents()),
            stock: ActiveValue::Set(drink.stock),
        }
    }
}

impl TryFrom<Model> for Drink {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: Uuid::parse_str(&model.id)
                .map_err(|_| EngineError::KeyNotFound("drink not exists".to_string()))?,
            name: model.name,
            price: MoneyCents::new(model.price_minor),
            stock: model.stock,
        })
    }
}
