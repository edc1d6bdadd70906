//! Read-only reporting queries.
//!
//! None of these take row locks; a report running concurrently with a
//! purchase may observe either pre- or post-commit state.

use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Utc};
use sea_orm::{
    FromQueryResult, JoinType, Order, QueryFilter, QueryOrder, QuerySelect, Statement, prelude::*,
};

use crate::{EngineError, ResultEngine, masks, opening_hours, pharmacies};

use super::Engine;

/// Hard cap on rows returned by a single report query.
const REPORT_ROW_CAP: u64 = 1000;

/// Sort key for a pharmacy's mask listing.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum MaskSort {
    #[default]
    Name,
    Price,
}

impl TryFrom<&str> for MaskSort {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "name" => Ok(Self::Name),
            "price" => Ok(Self::Price),
            other => Err(EngineError::InvalidInput(format!(
                "invalid sort field: {other}"
            ))),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl TryFrom<&str> for SortOrder {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "asc" => Ok(Self::Asc),
            "desc" => Ok(Self::Desc),
            other => Err(EngineError::InvalidInput(format!(
                "invalid sort order: {other}"
            ))),
        }
    }
}

impl From<SortOrder> for Order {
    fn from(value: SortOrder) -> Self {
        match value {
            SortOrder::Asc => Order::Asc,
            SortOrder::Desc => Order::Desc,
        }
    }
}

/// Direction of the mask-count filter: keep pharmacies with more or fewer
/// in-range masks than the threshold.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CountFilter {
    MoreThan,
    FewerThan,
}

impl TryFrom<&str> for CountFilter {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "more" => Ok(Self::MoreThan),
            "less" => Ok(Self::FewerThan),
            other => Err(EngineError::InvalidInput(format!(
                "invalid count operator: {other}"
            ))),
        }
    }
}

#[derive(Debug, FromQueryResult)]
pub struct PharmacyMaskCount {
    pub id: i64,
    pub name: String,
    pub cash_balance_cents: i64,
    pub mask_count: i64,
}

#[derive(Debug, FromQueryResult)]
pub struct TopUser {
    pub user_id: i64,
    pub user_name: String,
    pub total_amount_cents: i64,
    pub transaction_count: i64,
}

#[derive(Debug, Default, FromQueryResult)]
pub struct TransactionTotals {
    pub total_masks: i64,
    pub total_value_cents: i64,
}

/// Expands an inclusive date range into UTC timestamps covering the whole of
/// both days.
fn day_range(start: NaiveDate, end: NaiveDate) -> (DateTime<Utc>, DateTime<Utc>) {
    let from = start.and_time(NaiveTime::MIN).and_utc();
    let to = end.and_time(NaiveTime::MIN).and_utc() + Duration::days(1) - Duration::seconds(1);
    (from, to)
}

impl Engine {
    /// Lists pharmacies with an opening window covering `time` on `day`.
    ///
    /// Both window bounds are inclusive, so a pharmacy closing at exactly
    /// `time` is still listed.
    pub async fn open_pharmacies(
        &self,
        day: &str,
        time: &str,
    ) -> ResultEngine<Vec<pharmacies::Model>> {
        let day = opening_hours::canonical_day(day)
            .ok_or_else(|| EngineError::InvalidInput(format!("invalid day of week: {day}")))?;

        Ok(pharmacies::Entity::find()
            .join(JoinType::InnerJoin, pharmacies::Relation::OpeningHours.def())
            .filter(opening_hours::Column::DayOfWeek.eq(day))
            .filter(opening_hours::Column::OpenTime.lte(time))
            .filter(opening_hours::Column::CloseTime.gte(time))
            .distinct()
            .limit(REPORT_ROW_CAP)
            .all(&self.database)
            .await?)
    }

    /// Lists the masks sold by one pharmacy, sorted by name or price.
    pub async fn pharmacy_masks(
        &self,
        pharmacy_id: i64,
        sort: MaskSort,
        order: SortOrder,
    ) -> ResultEngine<(pharmacies::Model, Vec<masks::Model>)> {
        let pharmacy = pharmacies::Entity::find_by_id(pharmacy_id)
            .one(&self.database)
            .await?
            .ok_or(EngineError::PharmacyNotFound(pharmacy_id))?;

        let column = match sort {
            MaskSort::Name => masks::Column::Name,
            MaskSort::Price => masks::Column::PriceCents,
        };
        let masks = masks::Entity::find()
            .filter(masks::Column::PharmacyId.eq(pharmacy_id))
            .order_by(column, order.into())
            .limit(REPORT_ROW_CAP)
            .all(&self.database)
            .await?;

        Ok((pharmacy, masks))
    }

    /// Lists pharmacies with more/fewer than `count` masks priced within the
    /// given range, together with the matching mask count.
    pub async fn pharmacies_by_mask_count(
        &self,
        filter: CountFilter,
        count: i64,
        min_price_cents: i64,
        max_price_cents: i64,
    ) -> ResultEngine<Vec<PharmacyMaskCount>> {
        let operator = match filter {
            CountFilter::MoreThan => ">",
            CountFilter::FewerThan => "<",
        };
        let stmt = Statement::from_sql_and_values(
            self.database.get_database_backend(),
            format!(
                "SELECT p.id, p.name, p.cash_balance_cents, COUNT(m.id) AS mask_count \
                 FROM pharmacies AS p \
                 LEFT JOIN masks AS m \
                   ON m.pharmacy_id = p.id AND m.price_cents BETWEEN ? AND ? \
                 GROUP BY p.id, p.name, p.cash_balance_cents \
                 HAVING COUNT(m.id) {operator} ? \
                 LIMIT {REPORT_ROW_CAP}"
            ),
            vec![
                min_price_cents.into(),
                max_price_cents.into(),
                count.into(),
            ],
        );

        Ok(PharmacyMaskCount::find_by_statement(stmt)
            .all(&self.database)
            .await?)
    }

    /// Ranks users by total purchase amount within the inclusive date range.
    pub async fn top_users(
        &self,
        start: NaiveDate,
        end: NaiveDate,
        limit: u64,
    ) -> ResultEngine<Vec<TopUser>> {
        let (from, to) = day_range(start, end);
        let stmt = Statement::from_sql_and_values(
            self.database.get_database_backend(),
            "SELECT u.id AS user_id, u.name AS user_name, \
             COALESCE(SUM(p.amount_cents), 0) AS total_amount_cents, \
             COUNT(p.id) AS transaction_count \
             FROM purchases AS p \
             JOIN users AS u ON u.id = p.user_id \
             WHERE p.transaction_date BETWEEN ? AND ? \
             GROUP BY u.id, u.name \
             ORDER BY total_amount_cents DESC \
             LIMIT ?",
            vec![from.into(), to.into(), i64::try_from(limit).unwrap_or(i64::MAX).into()],
        );

        Ok(TopUser::find_by_statement(stmt).all(&self.database).await?)
    }

    /// Totals the per-unit purchase records within the inclusive date range.
    ///
    /// `total_masks` equals the transaction count because each record covers
    /// exactly one unit.
    pub async fn transaction_summary(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> ResultEngine<TransactionTotals> {
        let (from, to) = day_range(start, end);
        let stmt = Statement::from_sql_and_values(
            self.database.get_database_backend(),
            "SELECT COUNT(*) AS total_masks, \
             COALESCE(SUM(amount_cents), 0) AS total_value_cents \
             FROM purchases \
             WHERE transaction_date BETWEEN ? AND ?",
            vec![from.into(), to.into()],
        );

        Ok(TransactionTotals::find_by_statement(stmt)
            .one(&self.database)
            .await?
            .unwrap_or_default())
    }
}
