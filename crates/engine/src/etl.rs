//! Seed-time import of sample users and pharmacies.
//!
//! The input documents carry decimal amounts, free-text opening hours and
//! purchase dates as strings; everything is normalized here before touching
//! the store. Import is idempotent by name: a user or pharmacy whose name is
//! already present is skipped.

use std::sync::OnceLock;

use chrono::NaiveDateTime;
use regex::Regex;
use sea_orm::{ActiveModelTrait, ActiveValue, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter};
use serde::Deserialize;

use crate::{MoneyCents, ResultEngine, masks, opening_hours, pharmacies, purchases, users};

const PURCHASE_DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawPurchase {
    pub pharmacy_name: String,
    pub mask_name: String,
    pub transaction_amount: f64,
    pub transaction_date: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawUser {
    pub name: String,
    pub cash_balance: f64,
    #[serde(default)]
    pub purchase_histories: Vec<RawPurchase>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawMask {
    pub name: String,
    pub price: f64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawPharmacy {
    pub name: String,
    pub cash_balance: f64,
    #[serde(default)]
    pub opening_hours: String,
    #[serde(default)]
    pub masks: Vec<RawMask>,
}

/// One normalized opening window extracted from the free-text field.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OpeningWindow {
    pub day: &'static str,
    pub open: String,
    pub close: String,
}

fn segment_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r"(?i)((?:mon|tue|wed|thu|thur|fri|sat|sun)[\w,\s-]*?)\s*:?(\d{1,2}[:.]?\d{0,2}\s*(?:am|pm)?)\s*[-–to]+\s*(\d{1,2}[:.]?\d{0,2}\s*(?:am|pm)?)",
        )
        .expect("opening-hours pattern is valid")
    })
}

/// Parses a free-text opening-hours field ("Mon, Wed 08:00 - 12:00 / Tue
/// 2pm - 6pm") into normalized windows.
pub fn parse_opening_hours(raw: &str) -> Vec<OpeningWindow> {
    let mut result = Vec::new();
    for segment in raw.split('/') {
        let segment = segment.trim();
        for caps in segment_pattern().captures_iter(segment) {
            let open = parse_flexible_time(&caps[2]);
            let close = parse_flexible_time(&caps[3]);
            for day in expand_days(&caps[1]) {
                result.push(OpeningWindow {
                    day,
                    open: open.clone(),
                    close: close.clone(),
                });
            }
        }
    }
    result
}

/// Normalizes a flexible time expression ("08.00", "8", "2pm", "14:30") to a
/// zero-padded "HH:MM" string. Unparseable input falls back to "00:00".
fn parse_flexible_time(raw: &str) -> String {
    const FALLBACK: &str = "00:00";

    let mut text = raw.trim().to_lowercase().replace('.', ":");
    let mut pm = false;
    let mut am = false;
    if let Some(stripped) = text.strip_suffix("pm") {
        pm = true;
        text = stripped.trim().to_string();
    } else if let Some(stripped) = text.strip_suffix("am") {
        am = true;
        text = stripped.trim().to_string();
    }

    let (hour_text, minute_text) = match text.split_once(':') {
        Some((hour, minute)) => (hour, minute),
        None => (text.as_str(), ""),
    };

    let Ok(mut hour) = hour_text.trim().parse::<u32>() else {
        return FALLBACK.to_string();
    };
    let minute = if minute_text.trim().is_empty() {
        0
    } else {
        match minute_text.trim().parse::<u32>() {
            Ok(minute) => minute,
            Err(_) => return FALLBACK.to_string(),
        }
    };

    if pm && hour < 12 {
        hour += 12;
    }
    if am && hour == 12 {
        hour = 0;
    }
    if hour > 23 || minute > 59 {
        return FALLBACK.to_string();
    }

    format!("{hour:02}:{minute:02}")
}

/// Expands a day expression ("Mon, Wed", "Fri - Mon") into canonical day
/// names. Ranges wrap around the week; unknown tokens are dropped.
fn expand_days(expr: &str) -> Vec<&'static str> {
    let mut result = Vec::new();
    for part in expr.split(',') {
        let part = part.trim();
        if let Some((start, end)) = part.split_once('-') {
            let (Some(start), Some(end)) = (
                opening_hours::day_from_abbrev(start),
                opening_hours::day_from_abbrev(end),
            ) else {
                continue;
            };
            let Some(start_idx) = opening_hours::DAYS.iter().position(|d| *d == start) else {
                continue;
            };
            let Some(end_idx) = opening_hours::DAYS.iter().position(|d| *d == end) else {
                continue;
            };
            let mut i = start_idx;
            loop {
                result.push(opening_hours::DAYS[i]);
                if i == end_idx {
                    break;
                }
                i = (i + 1) % opening_hours::DAYS.len();
            }
        } else if let Some(day) = opening_hours::day_from_abbrev(part) {
            result.push(day);
        }
    }
    result
}

/// Imports users and their purchase histories, skipping names already
/// present. Returns the number of users inserted.
pub async fn import_users(
    db: &DatabaseConnection,
    raw_users: &[RawUser],
) -> ResultEngine<usize> {
    let mut imported = 0;
    for raw in raw_users {
        let existing = users::Entity::find()
            .filter(users::Column::Name.eq(raw.name.as_str()))
            .one(db)
            .await?;
        if existing.is_some() {
            tracing::debug!(user = %raw.name, "user already present, skipping");
            continue;
        }

        let balance = MoneyCents::from_major_units(raw.cash_balance);
        if balance.is_negative() {
            tracing::warn!(user = %raw.name, balance = %balance, "importing user with negative balance");
        }
        let user = users::ActiveModel {
            id: ActiveValue::NotSet,
            name: ActiveValue::Set(raw.name.clone()),
            cash_balance_cents: ActiveValue::Set(balance.cents()),
        }
        .insert(db)
        .await?;

        for purchase in &raw.purchase_histories {
            let Ok(date) =
                NaiveDateTime::parse_from_str(&purchase.transaction_date, PURCHASE_DATE_FORMAT)
            else {
                tracing::warn!(
                    user = %raw.name,
                    date = %purchase.transaction_date,
                    "skipping purchase with unparseable date"
                );
                continue;
            };
            purchases::ActiveModel {
                id: ActiveValue::NotSet,
                user_id: ActiveValue::Set(user.id),
                pharmacy_name: ActiveValue::Set(purchase.pharmacy_name.clone()),
                mask_name: ActiveValue::Set(purchase.mask_name.clone()),
                amount_cents: ActiveValue::Set(
                    MoneyCents::from_major_units(purchase.transaction_amount).cents(),
                ),
                transaction_date: ActiveValue::Set(date.and_utc()),
            }
            .insert(db)
            .await?;
        }

        tracing::info!(user = %raw.name, balance = %balance, "imported user");
        imported += 1;
    }
    Ok(imported)
}

/// Imports pharmacies with their catalogs and opening windows, skipping names
/// already present. Returns the number of pharmacies inserted.
pub async fn import_pharmacies(
    db: &DatabaseConnection,
    raw_pharmacies: &[RawPharmacy],
) -> ResultEngine<usize> {
    let mut imported = 0;
    for raw in raw_pharmacies {
        let existing = pharmacies::Entity::find()
            .filter(pharmacies::Column::Name.eq(raw.name.as_str()))
            .one(db)
            .await?;
        if existing.is_some() {
            tracing::debug!(pharmacy = %raw.name, "pharmacy already present, skipping");
            continue;
        }

        let balance = MoneyCents::from_major_units(raw.cash_balance);
        let pharmacy = pharmacies::ActiveModel {
            id: ActiveValue::NotSet,
            name: ActiveValue::Set(raw.name.clone()),
            cash_balance_cents: ActiveValue::Set(balance.cents()),
        }
        .insert(db)
        .await?;

        for mask in &raw.masks {
            masks::ActiveModel {
                id: ActiveValue::NotSet,
                name: ActiveValue::Set(mask.name.clone()),
                price_cents: ActiveValue::Set(MoneyCents::from_major_units(mask.price).cents()),
                pharmacy_id: ActiveValue::Set(pharmacy.id),
            }
            .insert(db)
            .await?;
        }

        for window in parse_opening_hours(&raw.opening_hours) {
            opening_hours::ActiveModel {
                id: ActiveValue::NotSet,
                pharmacy_id: ActiveValue::Set(pharmacy.id),
                day_of_week: ActiveValue::Set(window.day.to_string()),
                open_time: ActiveValue::Set(window.open),
                close_time: ActiveValue::Set(window.close),
            }
            .insert(db)
            .await?;
        }

        tracing::info!(pharmacy = %raw.name, balance = %balance, "imported pharmacy");
        imported += 1;
    }
    Ok(imported)
}
