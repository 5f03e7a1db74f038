//! The drinks ledger core.
//!
//! Users hold a prepaid balance in integer cents and a consumed-drinks
//! counter. Buying a drink writes an immutable [`Transaction`] and debits
//! the buyer; a [`Restocking`] refills the shelf and credits the users who
//! fronted the money. The [`Engine`] is the single entry point and applies
//! every balance change as an atomic unit against the database.

pub use drinks::Drink;
pub use error::EngineError;
pub use money::MoneyCents;
pub use ops::{Engine, EngineBuilder, RestockCmd};
pub use restockings::{Contribution, Restocking, RestockingFactory};
pub use transactions::{Transaction, TransactionFactory};
pub use translate::{Translate, Translations};
pub use users::{Role, User};

mod drinks;
mod error;
mod money;
mod ops;
mod restockings;
mod transactions;
mod translate;
mod users;

type ResultEngine<T> = Result<T, EngineError>;
