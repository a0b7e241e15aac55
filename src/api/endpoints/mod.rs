//! API endpoint handlers.

pub mod alerts;
pub mod chat;
pub mod claims;
pub mod facilities;
pub mod health;
pub mod medications;
pub mod prescriptions;
pub mod reminders;
pub mod settings;
pub mod shortage;
pub mod stocks;
