pub mod alert;
pub mod chat;
pub mod enums;
pub mod medicine;
pub mod reminder;

pub use alert::Alert;
pub use chat::ChatMessage;
pub use medicine::{Medicine, MedicineStock, Prescription};
pub use reminder::{MedicationReminder, QuietHours, ReminderDraft, ReminderError, Schedule};
