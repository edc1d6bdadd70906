//! The purchase transaction engine.
//!
//! One call transfers money from a user to a pharmacy and emits one audit
//! record per purchased unit, all inside a single DB transaction. Every abort
//! path leaves the store exactly as it was before the call.

use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue, DatabaseTransaction, QuerySelect, TransactionTrait, prelude::*};

use crate::{EngineError, MoneyCents, ResultEngine, masks, pharmacies, purchases, users};

use super::{Engine, with_tx};

/// Upper bound (exclusive) for the number of units in a single purchase.
pub const MAX_PURCHASE_QUANTITY: u32 = 1000;

/// A validated purchase request: who buys how many units of which mask from
/// which pharmacy.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PurchaseCmd {
    pub user_id: i64,
    pub pharmacy_id: i64,
    pub mask_id: i64,
    pub quantity: u32,
}

impl PurchaseCmd {
    fn validate(&self) -> ResultEngine<()> {
        if self.user_id <= 0 || self.pharmacy_id <= 0 || self.mask_id <= 0 {
            return Err(EngineError::InvalidInput(
                "ids must be positive".to_string(),
            ));
        }
        if self.quantity == 0 {
            return Err(EngineError::InvalidQuantity(
                "quantity must be at least 1".to_string(),
            ));
        }
        if self.quantity >= MAX_PURCHASE_QUANTITY {
            return Err(EngineError::InvalidQuantity(format!(
                "quantity must be below {MAX_PURCHASE_QUANTITY}"
            )));
        }
        Ok(())
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PurchaseDetails {
    pub user_id: i64,
    pub user_name: String,
    pub pharmacy_id: i64,
    pub pharmacy_name: String,
    pub mask_id: i64,
    pub mask_name: String,
    pub unit_price_cents: i64,
    pub quantity: u32,
    pub total_cents: i64,
    pub previous_balance_cents: i64,
    pub new_balance_cents: i64,
}

#[derive(Clone, Debug)]
pub struct PurchaseOutcome {
    /// Ids of the per-unit records created by this purchase, in creation
    /// order.
    pub purchase_ids: Vec<i64>,
    pub details: PurchaseDetails,
    pub completed_at: DateTime<Utc>,
}

impl Engine {
    /// Processes one purchase as a single atomic unit of work.
    ///
    /// The buyer and seller rows are fetched with an exclusive row lock,
    /// buyer first, then seller, so two purchases against the same user
    /// serialize on the balance check-and-debit instead of racing it. The
    /// fetch order must stay the same at every call site to avoid
    /// lock-ordering deadlocks.
    ///
    /// Balance sufficiency and mask ownership are re-checked here regardless
    /// of upstream validation, since both depend on data only visible inside
    /// the transaction.
    pub async fn process_purchase(&self, cmd: PurchaseCmd) -> ResultEngine<PurchaseOutcome> {
        cmd.validate()?;
        with_tx!(self, |db_tx| self.purchase_in_tx(&db_tx, cmd).await)
    }

    async fn purchase_in_tx(
        &self,
        db_tx: &DatabaseTransaction,
        cmd: PurchaseCmd,
    ) -> ResultEngine<PurchaseOutcome> {
        let user = users::Entity::find_by_id(cmd.user_id)
            .lock_exclusive()
            .one(db_tx)
            .await?
            .ok_or(EngineError::UserNotFound(cmd.user_id))?;

        // No lock on the mask: the price is read once and immutable for the
        // duration of the transaction.
        let mask = masks::Entity::find_by_id(cmd.mask_id)
            .one(db_tx)
            .await?
            .ok_or(EngineError::MaskNotFound(cmd.mask_id))?;

        if mask.pharmacy_id != cmd.pharmacy_id {
            return Err(EngineError::MaskPharmacyMismatch {
                mask_pharmacy_id: mask.pharmacy_id,
                requested_pharmacy_id: cmd.pharmacy_id,
            });
        }

        let pharmacy = pharmacies::Entity::find_by_id(cmd.pharmacy_id)
            .lock_exclusive()
            .one(db_tx)
            .await?
            .ok_or(EngineError::PharmacyNotFound(cmd.pharmacy_id))?;

        let unit_price = MoneyCents::new(mask.price_cents);
        let total = unit_price
            .checked_mul(i64::from(cmd.quantity))
            .ok_or_else(|| {
                EngineError::InvalidQuantity("total amount overflows".to_string())
            })?;
        let previous_balance = MoneyCents::new(user.cash_balance_cents);

        // Strict less-than: an exact balance match goes through.
        if previous_balance < total {
            return Err(EngineError::InsufficientBalance {
                required_cents: total.cents(),
                balance_cents: previous_balance.cents(),
            });
        }

        let new_balance = previous_balance - total;
        let mut buyer: users::ActiveModel = user.clone().into();
        buyer.cash_balance_cents = ActiveValue::Set(new_balance.cents());
        buyer.update(db_tx).await?;

        let credited = MoneyCents::new(pharmacy.cash_balance_cents) + total;
        let mut seller: pharmacies::ActiveModel = pharmacy.clone().into();
        seller.cash_balance_cents = ActiveValue::Set(credited.cents());
        seller.update(db_tx).await?;

        // One record per unit, denormalized to names so the audit trail stays
        // readable if the catalog changes later.
        let completed_at = Utc::now();
        let mut purchase_ids = Vec::with_capacity(cmd.quantity as usize);
        for _ in 0..cmd.quantity {
            let record = purchases::ActiveModel {
                id: ActiveValue::NotSet,
                user_id: ActiveValue::Set(user.id),
                pharmacy_name: ActiveValue::Set(pharmacy.name.clone()),
                mask_name: ActiveValue::Set(mask.name.clone()),
                amount_cents: ActiveValue::Set(unit_price.cents()),
                transaction_date: ActiveValue::Set(completed_at),
            };
            let inserted = record.insert(db_tx).await?;
            purchase_ids.push(inserted.id);
        }

        tracing::debug!(
            user_id = user.id,
            pharmacy_id = pharmacy.id,
            mask_id = mask.id,
            quantity = cmd.quantity,
            total = %total,
            "purchase applied"
        );

        Ok(PurchaseOutcome {
            purchase_ids,
            details: PurchaseDetails {
                user_id: user.id,
                user_name: user.name,
                pharmacy_id: pharmacy.id,
                pharmacy_name: pharmacy.name,
                mask_id: mask.id,
                mask_name: mask.name,
                unit_price_cents: unit_price.cents(),
                quantity: cmd.quantity,
                total_cents: total.cents(),
                previous_balance_cents: previous_balance.cents(),
                new_balance_cents: new_balance.cents(),
            },
            completed_at,
        })
    }
}
