//! In-memory health store.
//!
//! `HealthStore` is the single shared state container, owned by the
//! composition root and shared with every handler as `Arc<HealthStore>`.
//! Every mutation happens under one write lock, and stock or settings
//! mutations re-run the stock monitor before the lock is released, so
//! readers never see stock without its alerts.

use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::enums::{AlertType, ChatRole, PrescriptionStatus};
use crate::models::reminder::DEFAULT_USER_ID;
use crate::models::{
    Alert, ChatMessage, MedicationReminder, Medicine, MedicineStock, Prescription, ReminderDraft,
    ReminderError,
};
use crate::monitor::{self, StockThresholds};

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Store lock poisoned")]
    LockPoisoned,

    #[error("{kind} not found: {id}")]
    NotFound { kind: &'static str, id: String },

    #[error(transparent)]
    InvalidReminder(#[from] ReminderError),
}

/// Stock item as submitted by the client, before an id is assigned.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockDraft {
    pub name: String,
    pub expiry_date: String,
    pub quantity: u32,
    pub daily_usage: u32,
}

impl StockDraft {
    fn into_stock(self, id: String) -> MedicineStock {
        MedicineStock {
            id,
            name: self.name,
            expiry_date: self.expiry_date,
            quantity: self.quantity,
            daily_usage: self.daily_usage,
        }
    }
}

/// Partial settings update. Absent fields keep their current value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettingsUpdate {
    pub expiry_threshold_days: Option<u32>,
    pub low_stock_quantity: Option<u32>,
}

#[derive(Debug, Default)]
struct StoreData {
    /// Newest first.
    prescriptions: Vec<Prescription>,
    /// Insertion order.
    stocks: Vec<MedicineStock>,
    /// Newest first.
    alerts: Vec<Alert>,
    /// Newest first.
    reminders: Vec<MedicationReminder>,
    /// Oldest first.
    chat: Vec<ChatMessage>,
    settings: StockThresholds,
}

impl StoreData {
    /// Run the stock monitor and prepend whatever it raises.
    fn refresh_alerts(&mut self, now: DateTime<Utc>) -> usize {
        let raised = monitor::evaluate(&self.stocks, &self.settings, &self.alerts, now);
        let count = raised.len();
        if count > 0 {
            self.alerts.splice(0..0, raised);
        }
        count
    }
}

/// Shared application state.
pub struct HealthStore {
    data: RwLock<StoreData>,
}

impl Default for HealthStore {
    fn default() -> Self {
        Self::new()
    }
}

impl HealthStore {
    /// Empty store with default thresholds.
    pub fn new() -> Self {
        Self {
            data: RwLock::new(StoreData::default()),
        }
    }

    /// Store preloaded with the demo data set, after an initial monitor pass.
    pub fn seeded() -> Self {
        let now = Utc::now();
        let mut data = StoreData {
            prescriptions: vec![Prescription {
                id: "p1".into(),
                uploaded_at: now - Duration::days(2),
                ocr_text: None,
                medicines: vec![
                    Medicine {
                        id: "m1".into(),
                        name: "Lisinopril".into(),
                        dosage: "10mg".into(),
                        frequency: "1 daily".into(),
                        duration: "30 days".into(),
                    },
                    Medicine {
                        id: "m2".into(),
                        name: "Metformin".into(),
                        dosage: "500mg".into(),
                        frequency: "2 daily".into(),
                        duration: "30 days".into(),
                    },
                ],
                warnings: Vec::new(),
                status: PrescriptionStatus::Verified,
            }],
            stocks: vec![
                seed_stock("ms1", "Lisinopril", "2025-12-31", 50, 1),
                seed_stock("ms2", "Metformin", "2024-09-30", 8, 2),
                seed_stock("ms3", "Ibuprofen", "2024-08-15", 25, 0),
            ],
            alerts: vec![Alert::new(
                "a1",
                AlertType::LowStock,
                "Metformin is low on stock with only 8 remaining.",
                now - Duration::days(1),
                Some("ms2".into()),
            )],
            reminders: Vec::new(),
            chat: vec![ChatMessage {
                id: "c1".into(),
                role: ChatRole::Model,
                text: "Hello! I am Nalamdhaanaa. How can I help you today? Please describe your symptoms."
                    .into(),
                timestamp: now,
            }],
            settings: StockThresholds::default(),
        };
        let raised = data.refresh_alerts(now);
        tracing::info!(
            stocks = data.stocks.len(),
            alerts = data.alerts.len(),
            raised,
            "Seeded demo data"
        );
        Self {
            data: RwLock::new(data),
        }
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, StoreData>, StoreError> {
        self.data.read().map_err(|_| StoreError::LockPoisoned)
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, StoreData>, StoreError> {
        self.data.write().map_err(|_| StoreError::LockPoisoned)
    }

    // ── Prescriptions ───────────────────────────────────────

    pub fn prescriptions(&self) -> Result<Vec<Prescription>, StoreError> {
        Ok(self.read()?.prescriptions.clone())
    }

    pub fn add_prescription(&self, prescription: Prescription) -> Result<(), StoreError> {
        self.write()?.prescriptions.insert(0, prescription);
        Ok(())
    }

    // ── Stock ───────────────────────────────────────────────

    pub fn stocks(&self) -> Result<Vec<MedicineStock>, StoreError> {
        Ok(self.read()?.stocks.clone())
    }

    pub fn add_stock(&self, draft: StockDraft) -> Result<MedicineStock, StoreError> {
        let stock = draft.into_stock(format!("ms-{}", uuid::Uuid::new_v4()));
        let mut data = self.write()?;
        data.stocks.push(stock.clone());
        let raised = data.refresh_alerts(Utc::now());
        tracing::debug!(stock_id = %stock.id, raised, "Stock added");
        Ok(stock)
    }

    pub fn update_stock(&self, id: &str, draft: StockDraft) -> Result<MedicineStock, StoreError> {
        let mut data = self.write()?;
        let slot = data
            .stocks
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or_else(|| not_found("Stock item", id))?;
        *slot = draft.into_stock(id.to_string());
        let updated = slot.clone();
        let raised = data.refresh_alerts(Utc::now());
        tracing::debug!(stock_id = id, raised, "Stock updated");
        Ok(updated)
    }

    /// Remove a stock item. Its alerts stay in the list.
    pub fn delete_stock(&self, id: &str) -> Result<(), StoreError> {
        let mut data = self.write()?;
        let before = data.stocks.len();
        data.stocks.retain(|s| s.id != id);
        if data.stocks.len() == before {
            return Err(not_found("Stock item", id));
        }
        data.refresh_alerts(Utc::now());
        Ok(())
    }

    // ── Alerts ──────────────────────────────────────────────

    pub fn alerts(&self) -> Result<Vec<Alert>, StoreError> {
        Ok(self.read()?.alerts.clone())
    }

    /// Prepend alerts produced outside the monitor (prescription checks).
    pub fn add_alerts(&self, alerts: Vec<Alert>) -> Result<(), StoreError> {
        if alerts.is_empty() {
            return Ok(());
        }
        self.write()?.alerts.splice(0..0, alerts);
        Ok(())
    }

    /// Flag an alert as read. The alert keeps suppressing regeneration.
    pub fn mark_alert_read(&self, id: &str) -> Result<Alert, StoreError> {
        let mut data = self.write()?;
        let alert = data
            .alerts
            .iter_mut()
            .find(|a| a.id == id)
            .ok_or_else(|| not_found("Alert", id))?;
        alert.is_read = true;
        Ok(alert.clone())
    }

    pub fn unread_alert_count(&self) -> Result<usize, StoreError> {
        Ok(self.read()?.alerts.iter().filter(|a| !a.is_read).count())
    }

    // ── Medication reminders ────────────────────────────────

    pub fn reminders(&self) -> Result<Vec<MedicationReminder>, StoreError> {
        Ok(self.read()?.reminders.clone())
    }

    pub fn add_reminder(&self, draft: ReminderDraft) -> Result<MedicationReminder, StoreError> {
        draft.validate()?;
        let reminder = MedicationReminder {
            id: uuid::Uuid::new_v4().to_string(),
            user_id: DEFAULT_USER_ID,
            draft,
        };
        self.write()?.reminders.insert(0, reminder.clone());
        Ok(reminder)
    }

    pub fn delete_reminder(&self, id: &str) -> Result<(), StoreError> {
        let mut data = self.write()?;
        let before = data.reminders.len();
        data.reminders.retain(|r| r.id != id);
        if data.reminders.len() == before {
            return Err(not_found("Reminder", id));
        }
        Ok(())
    }

    // ── Chat ────────────────────────────────────────────────

    pub fn chat_history(&self) -> Result<Vec<ChatMessage>, StoreError> {
        Ok(self.read()?.chat.clone())
    }

    pub fn add_chat_message(&self, message: ChatMessage) -> Result<(), StoreError> {
        self.write()?.chat.push(message);
        Ok(())
    }

    // ── Settings ────────────────────────────────────────────

    pub fn settings(&self) -> Result<StockThresholds, StoreError> {
        Ok(self.read()?.settings)
    }

    pub fn update_settings(&self, update: SettingsUpdate) -> Result<StockThresholds, StoreError> {
        let mut data = self.write()?;
        if let Some(days) = update.expiry_threshold_days {
            data.settings.expiry_threshold_days = days;
        }
        if let Some(quantity) = update.low_stock_quantity {
            data.settings.low_stock_quantity = quantity;
        }
        let raised = data.refresh_alerts(Utc::now());
        tracing::info!(
            expiry_threshold_days = data.settings.expiry_threshold_days,
            low_stock_quantity = data.settings.low_stock_quantity,
            raised,
            "Settings updated"
        );
        Ok(data.settings)
    }
}

fn seed_stock(id: &str, name: &str, expiry: &str, quantity: u32, daily_usage: u32) -> MedicineStock {
    MedicineStock {
        id: id.into(),
        name: name.into(),
        expiry_date: expiry.into(),
        quantity,
        daily_usage,
    }
}

fn not_found(kind: &'static str, id: &str) -> StoreError {
    StoreError::NotFound {
        kind,
        id: id.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::reminder::sample_draft;

    fn draft(name: &str, expiry_in_days: i64, quantity: u32) -> StockDraft {
        StockDraft {
            name: name.into(),
            expiry_date: (Utc::now() + Duration::days(expiry_in_days))
                .format("%Y-%m-%d")
                .to_string(),
            quantity,
            daily_usage: 1,
        }
    }

    #[test]
    fn seeded_store_has_demo_data() {
        let store = HealthStore::seeded();
        assert_eq!(store.prescriptions().unwrap().len(), 1);
        assert_eq!(store.stocks().unwrap().len(), 3);
        assert_eq!(store.chat_history().unwrap()[0].id, "c1");

        // a1 already covers ms2's low stock; the seed dates are all past.
        let alerts = store.alerts().unwrap();
        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].id, "a1");
        assert_eq!(store.unread_alert_count().unwrap(), 1);
    }

    #[test]
    fn adding_stock_raises_alerts_once() {
        let store = HealthStore::new();
        let stock = store.add_stock(draft("Aspirin", 5, 3)).unwrap();
        assert!(stock.id.starts_with("ms-"));

        let alerts = store.alerts().unwrap();
        assert_eq!(alerts.len(), 2);
        assert_eq!(alerts[0].alert_type, AlertType::ExpiryWarning);
        assert_eq!(alerts[1].alert_type, AlertType::LowStock);

        store.add_stock(draft("Vitamin D", 365, 100)).unwrap();
        assert_eq!(store.alerts().unwrap().len(), 2);
    }

    #[test]
    fn new_alerts_are_prepended() {
        let store = HealthStore::new();
        store.add_stock(draft("First", 365, 1)).unwrap();
        store.add_stock(draft("Second", 365, 1)).unwrap();
        let alerts = store.alerts().unwrap();
        assert!(alerts[0].message.starts_with("Second"));
        assert!(alerts[1].message.starts_with("First"));
    }

    #[test]
    fn update_stock_replaces_and_rechecks() {
        let store = HealthStore::new();
        let stock = store.add_stock(draft("Aspirin", 365, 50)).unwrap();
        assert!(store.alerts().unwrap().is_empty());

        let updated = store.update_stock(&stock.id, draft("Aspirin", 365, 4)).unwrap();
        assert_eq!(updated.id, stock.id);
        assert_eq!(updated.quantity, 4);
        assert_eq!(store.alerts().unwrap().len(), 1);
    }

    #[test]
    fn update_and_delete_unknown_stock() {
        let store = HealthStore::new();
        assert!(matches!(
            store.update_stock("nope", draft("X", 1, 1)),
            Err(StoreError::NotFound { .. })
        ));
        assert!(matches!(
            store.delete_stock("nope"),
            Err(StoreError::NotFound { .. })
        ));
    }

    #[test]
    fn delete_stock_keeps_alerts() {
        let store = HealthStore::new();
        let stock = store.add_stock(draft("Aspirin", 365, 1)).unwrap();
        store.delete_stock(&stock.id).unwrap();
        assert!(store.stocks().unwrap().is_empty());
        assert_eq!(store.alerts().unwrap().len(), 1);
    }

    #[test]
    fn marking_read_does_not_rearm() {
        let store = HealthStore::new();
        let stock = store.add_stock(draft("Aspirin", 365, 2)).unwrap();
        let alert_id = store.alerts().unwrap()[0].id.clone();
        let alert = store.mark_alert_read(&alert_id).unwrap();
        assert!(alert.is_read);
        assert_eq!(store.unread_alert_count().unwrap(), 0);

        store.update_stock(&stock.id, draft("Aspirin", 365, 1)).unwrap();
        assert_eq!(store.alerts().unwrap().len(), 1);
        assert_eq!(store.unread_alert_count().unwrap(), 0);
    }

    #[test]
    fn mark_unknown_alert_is_not_found() {
        let store = HealthStore::new();
        assert!(matches!(
            store.mark_alert_read("missing"),
            Err(StoreError::NotFound { kind: "Alert", .. })
        ));
    }

    #[test]
    fn settings_update_is_partial_and_rechecks() {
        let store = HealthStore::new();
        store.add_stock(draft("Aspirin", 365, 15)).unwrap();
        assert!(store.alerts().unwrap().is_empty());

        let settings = store
            .update_settings(SettingsUpdate {
                low_stock_quantity: Some(20),
                ..Default::default()
            })
            .unwrap();
        assert_eq!(settings.low_stock_quantity, 20);
        assert_eq!(settings.expiry_threshold_days, 14);
        assert_eq!(store.alerts().unwrap().len(), 1);
    }

    #[test]
    fn reminders_get_id_and_default_user() {
        let store = HealthStore::new();
        let first = store.add_reminder(sample_draft()).unwrap();
        let second = store.add_reminder(sample_draft()).unwrap();
        assert_eq!(first.user_id, 1);
        assert_ne!(first.id, second.id);

        let reminders = store.reminders().unwrap();
        assert_eq!(reminders[0].id, second.id);

        store.delete_reminder(&first.id).unwrap();
        assert_eq!(store.reminders().unwrap().len(), 1);
        assert!(store.delete_reminder(&first.id).is_err());
    }

    #[test]
    fn invalid_reminder_is_rejected() {
        let store = HealthStore::new();
        let mut bad = sample_draft();
        bad.schedule.times.clear();
        assert!(matches!(
            store.add_reminder(bad),
            Err(StoreError::InvalidReminder(ReminderError::NoTimes))
        ));
        assert!(store.reminders().unwrap().is_empty());
    }

    #[test]
    fn chat_and_prescription_ordering() {
        let store = HealthStore::seeded();
        store
            .add_chat_message(ChatMessage::new(ChatRole::User, "hi"))
            .unwrap();
        let chat = store.chat_history().unwrap();
        assert_eq!(chat.last().unwrap().text, "hi");

        store
            .add_prescription(Prescription {
                id: "p2".into(),
                uploaded_at: Utc::now(),
                ocr_text: None,
                medicines: Vec::new(),
                warnings: Vec::new(),
                status: PrescriptionStatus::Verified,
            })
            .unwrap();
        assert_eq!(store.prescriptions().unwrap()[0].id, "p2");
    }
}
