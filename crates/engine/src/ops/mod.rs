use sea_orm::DatabaseConnection;

use crate::ResultEngine;

mod purchase;
mod reports;
mod search;

pub use purchase::{
    MAX_PURCHASE_QUANTITY, PurchaseCmd, PurchaseDetails, PurchaseOutcome,
};
pub use reports::{CountFilter, MaskSort, PharmacyMaskCount, SortOrder, TopUser, TransactionTotals};
pub use search::{SearchHit, SearchKind};

/// Run a block inside a DB transaction, committing on success and rolling back
/// on error.
///
/// Dropping an uncommitted transaction also rolls back, so a future cancelled
/// at a deadline releases its row locks; the explicit rollback here covers the
/// ordinary error paths.
macro_rules! with_tx {
    ($self:expr, |$tx:ident| $body:expr) => {{
        let $tx = $self.database.begin().await?;
        let result = $body;
        match result {
            Ok(value) => {
                $tx.commit().await?;
                Ok(value)
            }
            Err(err) => {
                $tx.rollback().await.ok();
                Err(err)
            }
        }
    }};
}

pub(crate) use with_tx;

#[derive(Debug)]
pub struct Engine {
    database: DatabaseConnection,
}

impl Engine {
    /// Return a builder for `Engine`. Help to build the struct.
    pub fn builder() -> EngineBuilder {
        EngineBuilder::default()
    }
}

/// The builder for `Engine`
#[derive(Default)]
pub struct EngineBuilder {
    database: DatabaseConnection,
}

impl EngineBuilder {
    /// Pass the required database
    pub fn database(mut self, db: DatabaseConnection) -> EngineBuilder {
        self.database = db;
        self
    }

    /// Construct `Engine`
    pub async fn build(self) -> ResultEngine<Engine> {
        Ok(Engine {
            database: self.database,
        })
    }
}
