//! Stock monitor: derives expiry and low-stock alerts from the medicine stock.
//!
//! Pure function of (stock, thresholds, existing alerts, now). The store
//! calls it after every stock or settings change. An alert is never
//! regenerated while any alert for the same `(related_id, type)` pair
//! exists, read or not.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::config::{DEFAULT_EXPIRY_THRESHOLD_DAYS, DEFAULT_LOW_STOCK_QUANTITY};
use crate::models::enums::AlertType;
use crate::models::{Alert, MedicineStock};

const SECONDS_PER_DAY: f64 = 86_400.0;

/// User-tunable alert thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockThresholds {
    /// Raise an expiry warning this many days ahead (inclusive).
    pub expiry_threshold_days: u32,
    /// Raise a low-stock alert at or below this quantity.
    pub low_stock_quantity: u32,
}

impl Default for StockThresholds {
    fn default() -> Self {
        Self {
            expiry_threshold_days: DEFAULT_EXPIRY_THRESHOLD_DAYS,
            low_stock_quantity: DEFAULT_LOW_STOCK_QUANTITY,
        }
    }
}

/// Parse a stored expiry date. Accepts `YYYY-MM-DD` (midnight UTC) and RFC 3339.
pub fn parse_expiry(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return date.and_hms_opt(0, 0, 0).map(|dt| dt.and_utc());
    }
    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

/// Fractional days from `now` until the expiry date.
/// Unparseable dates never expire.
pub fn days_until_expiry(raw: &str, now: DateTime<Utc>) -> f64 {
    match parse_expiry(raw) {
        Some(expiry) => (expiry - now).num_milliseconds() as f64 / 1000.0 / SECONDS_PER_DAY,
        None => f64::INFINITY,
    }
}

pub fn expiry_alert_id(stock_id: &str) -> String {
    format!("alert-exp-{stock_id}")
}

pub fn low_stock_alert_id(stock_id: &str) -> String {
    format!("alert-low-{stock_id}")
}

/// Evaluate the stock list and return the alerts that are not yet present.
///
/// Output follows input order; for a single item the expiry warning comes
/// before the low-stock alert.
pub fn evaluate(
    stocks: &[MedicineStock],
    thresholds: &StockThresholds,
    existing: &[Alert],
    now: DateTime<Utc>,
) -> Vec<Alert> {
    let mut new_alerts: Vec<Alert> = Vec::new();
    let already_alerted = |new_alerts: &[Alert], id: &str, alert_type: AlertType| {
        existing
            .iter()
            .chain(new_alerts.iter())
            .any(|a| a.covers(id, alert_type))
    };

    for item in stocks {
        let days = days_until_expiry(&item.expiry_date, now);
        if days > 0.0
            && days <= f64::from(thresholds.expiry_threshold_days)
            && !already_alerted(new_alerts.as_slice(), &item.id, AlertType::ExpiryWarning)
        {
            new_alerts.push(Alert::new(
                expiry_alert_id(&item.id),
                AlertType::ExpiryWarning,
                format!("{} is expiring in {} days.", item.name, days.ceil() as i64),
                now,
                Some(item.id.clone()),
            ));
        }

        if item.quantity <= thresholds.low_stock_quantity
            && !already_alerted(new_alerts.as_slice(), &item.id, AlertType::LowStock)
        {
            new_alerts.push(Alert::new(
                low_stock_alert_id(&item.id),
                AlertType::LowStock,
                format!(
                    "{} is low on stock with only {} remaining.",
                    item.name, item.quantity
                ),
                now,
                Some(item.id.clone()),
            ));
        }
    }

    if !new_alerts.is_empty() {
        tracing::debug!(
            stock_items = stocks.len(),
            new_alerts = new_alerts.len(),
            "Stock monitor raised alerts"
        );
    }

    new_alerts
}
