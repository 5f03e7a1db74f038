use sea_orm::DatabaseConnection;

use crate::{EngineError, ResultEngine, TransactionFactory, Translations};

mod drinks;
mod purchases;
mod restockings;
mod users;

pub use restockings::RestockCmd;

/// Run a block inside a DB transaction, committing on success and rolling back on error.
macro_rules! with_tx {
    ($self:expr, |$tx:ident| $body:expr) => {{
        let $tx = $self.database.begin().await?;
        let result = $body;
        match result {
            Ok(value) => {
                $tx.commit().await?;
                Ok(value)
            }
            Err(err) => Err(err),
        }
    }};
}

pub(crate) use with_tx;

/// The drinks ledger engine.
///
/// Stateless facade over the database: every operation runs against the
/// store, and balance changes are applied as atomic column updates inside a
/// transaction so concurrent requests never lose an update.
#[derive(Debug)]
pub struct Engine {
    database: DatabaseConnection,
    transaction_factory: TransactionFactory<Translations>,
}

impl Engine {
    /// Return a builder for `Engine`. Help to build the struct.
    pub fn builder() -> EngineBuilder {
        EngineBuilder::default()
    }
}

fn normalize_required_name(value: &str, label: &str) -> ResultEngine<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(EngineError::InvalidAmount(format!(
            "{label} name must not be empty"
        )));
    }
    Ok(trimmed.to_string())
}

/// The builder for `Engine`
#[derive(Default)]
pub struct EngineBuilder {
    database: DatabaseConnection,
    translations: Translations,
}

impl EngineBuilder {
    /// Pass the required database
    pub fn database(mut self, db: DatabaseConnection) -> EngineBuilder {
        self.database = db;
        self
    }

    /// Pass the translation table used for transaction descriptions
    pub fn translations(mut self, translations: Translations) -> EngineBuilder {
        self.translations = translations;
        self
    }

    /// Construct `Engine`
    pub async fn build(self) -> ResultEngine<Engine> {
        Ok(Engine {
            database: self.database,
            transaction_factory: TransactionFactory::new(self.translations),
        })
    }
}
