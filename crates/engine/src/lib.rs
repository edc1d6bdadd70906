pub use error::EngineError;
pub use money::MoneyCents;
pub use ops::{
    CountFilter, Engine, EngineBuilder, MAX_PURCHASE_QUANTITY, MaskSort, PharmacyMaskCount,
    PurchaseCmd, PurchaseDetails, PurchaseOutcome, SearchHit, SearchKind, SortOrder, TopUser,
    TransactionTotals,
};

pub mod etl;
pub mod masks;
pub mod opening_hours;
pub mod pharmacies;
pub mod purchases;
pub mod users;

mod error;
mod money;
mod ops;

type ResultEngine<T> = Result<T, EngineError>;
