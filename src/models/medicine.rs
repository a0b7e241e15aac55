use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::enums::PrescriptionStatus;

/// One line of a prescription.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Medicine {
    pub id: String,
    pub name: String,
    pub dosage: String,
    pub frequency: String,
    pub duration: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Prescription {
    pub id: String,
    pub uploaded_at: DateTime<Utc>,
    pub ocr_text: Option<String>,
    pub medicines: Vec<Medicine>,
    pub warnings: Vec<String>,
    pub status: PrescriptionStatus,
}

/// A medicine the user keeps at home.
///
/// `expiry_date` is stored as entered; the stock monitor parses it on each
/// pass and treats anything unparseable as never expiring.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MedicineStock {
    pub id: String,
    pub name: String,
    pub expiry_date: String,
    pub quantity: u32,
    pub daily_usage: u32,
}
