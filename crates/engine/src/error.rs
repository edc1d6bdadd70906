//! The module contains the error the engine can throw.
//!
//! Three families exist:
//!
//! - not-found errors ([`UserNotFound`], [`MaskNotFound`], [`PharmacyNotFound`])
//!   and business-rule violations ([`MaskPharmacyMismatch`],
//!   [`InsufficientBalance`]) are terminal and must not be retried;
//! - [`Timeout`] signals a transient store failure that the caller may retry;
//! - [`Database`] wraps any other store failure after a full rollback.
//!
//!  [`UserNotFound`]: EngineError::UserNotFound
//!  [`MaskNotFound`]: EngineError::MaskNotFound
//!  [`PharmacyNotFound`]: EngineError::PharmacyNotFound
//!  [`MaskPharmacyMismatch`]: EngineError::MaskPharmacyMismatch
//!  [`InsufficientBalance`]: EngineError::InsufficientBalance
//!  [`Timeout`]: EngineError::Timeout
//!  [`Database`]: EngineError::Database
use sea_orm::DbErr;
use thiserror::Error;

/// Engine custom errors.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("user {0} not found")]
    UserNotFound(i64),
    #[error("pharmacy {0} not found")]
    PharmacyNotFound(i64),
    #[error("mask {0} not found")]
    MaskNotFound(i64),
    #[error("mask belongs to pharmacy {mask_pharmacy_id}, not {requested_pharmacy_id}")]
    MaskPharmacyMismatch {
        mask_pharmacy_id: i64,
        requested_pharmacy_id: i64,
    },
    #[error("insufficient balance: required {required_cents}, available {balance_cents}")]
    InsufficientBalance {
        required_cents: i64,
        balance_cents: i64,
    },
    #[error("invalid quantity: {0}")]
    InvalidQuantity(String),
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("store timeout: {0}")]
    Timeout(String),
    #[error(transparent)]
    Database(DbErr),
}

impl EngineError {
    /// `true` for transient store failures worth retrying; business-rule and
    /// not-found errors are terminal.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Timeout(_))
    }
}

impl From<DbErr> for EngineError {
    fn from(err: DbErr) -> Self {
        if matches!(err, DbErr::ConnectionAcquire(_)) {
            Self::Timeout(err.to_string())
        } else {
            Self::Database(err)
        }
    }
}

impl PartialEq for EngineError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::UserNotFound(a), Self::UserNotFound(b)) => a == b,
            (Self::PharmacyNotFound(a), Self::PharmacyNotFound(b)) => a == b,
            (Self::MaskNotFound(a), Self::MaskNotFound(b)) => a == b,
            (
                Self::MaskPharmacyMismatch {
                    mask_pharmacy_id: a1,
                    requested_pharmacy_id: a2,
                },
                Self::MaskPharmacyMismatch {
                    mask_pharmacy_id: b1,
                    requested_pharmacy_id: b2,
                },
            ) => a1 == b1 && a2 == b2,
            (
                Self::InsufficientBalance {
                    required_cents: a1,
                    balance_cents: a2,
                },
                Self::InsufficientBalance {
                    required_cents: b1,
                    balance_cents: b2,
                },
            ) => a1 == b1 && a2 == b2,
            (Self::InvalidQuantity(a), Self::InvalidQuantity(b)) => a == b,
            (Self::InvalidInput(a), Self::InvalidInput(b)) => a == b,
            (Self::Timeout(a), Self::Timeout(b)) => a == b,
            (Self::Database(a), Self::Database(b)) => a.to_string() == b.to_string(),
            _ => false,
        }
    }
}
