use serde::{Deserialize, Serialize};

use super::ShortageError;
use crate::models::enums::Availability;

/// Catalog bundled into the binary.
const BUNDLED_CATALOG: &str = include_str!("../../resources/drug_catalog.json");

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alternative {
    pub name: String,
    pub price: f64,
    pub availability: Availability,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DrugCatalogEntry {
    pub name: String,
    pub generic_name: String,
    pub category: String,
    /// Stored shortage risk in `0.0..=1.0`.
    pub shortage_risk: f64,
    pub risk_factors: Vec<String>,
    pub alternatives: Vec<Alternative>,
    pub average_price: f64,
}

/// Read-only drug reference table.
#[derive(Debug, Clone)]
pub struct DrugCatalog {
    entries: Vec<DrugCatalogEntry>,
}

impl DrugCatalog {
    /// Load the catalog shipped with the crate.
    pub fn bundled() -> Result<Self, ShortageError> {
        Self::from_json(BUNDLED_CATALOG)
    }

    /// Parse and validate a catalog from JSON.
    pub fn from_json(json: &str) -> Result<Self, ShortageError> {
        let entries: Vec<DrugCatalogEntry> = serde_json::from_str(json)
            .map_err(|e| ShortageError::CatalogParse(e.to_string()))?;
        Self::from_entries(entries)
    }

    pub fn from_entries(entries: Vec<DrugCatalogEntry>) -> Result<Self, ShortageError> {
        if let Some(bad) = entries
            .iter()
            .find(|e| !(0.0..=1.0).contains(&e.shortage_risk))
        {
            return Err(ShortageError::InvalidRiskScore {
                drug: bad.name.clone(),
                score: bad.shortage_risk,
            });
        }
        Ok(Self { entries })
    }

    /// Exact name match, ignoring case. No trimming or fuzzy matching:
    /// "Amoxicillin" does not find "Amoxicillin 500mg".
    pub fn lookup(&self, name: &str) -> Option<&DrugCatalogEntry> {
        let wanted = name.to_lowercase();
        self.entries.iter().find(|e| e.name.to_lowercase() == wanted)
    }

    pub fn entries(&self) -> &[DrugCatalogEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bundled_catalog_loads() {
        let catalog = DrugCatalog::bundled().unwrap();
        assert_eq!(catalog.len(), 49);
        assert!(catalog.entries().iter().all(|e| !e.alternatives.is_empty()));
    }

    #[test]
    fn lookup_ignores_case() {
        let catalog = DrugCatalog::bundled().unwrap();
        let lower = catalog.lookup("amoxicillin 500mg").unwrap();
        let proper = catalog.lookup("Amoxicillin 500mg").unwrap();
        assert_eq!(lower, proper);
        assert_eq!(proper.generic_name, "Amoxicillin");
    }

    #[test]
    fn lookup_requires_exact_name() {
        let catalog = DrugCatalog::bundled().unwrap();
        assert!(catalog.lookup("Amoxicillin").is_none());
        assert!(catalog.lookup(" Amoxicillin 500mg").is_none());
    }

    #[test]
    fn out_of_range_score_is_rejected() {
        let json = r#"[{"name":"X","generic_name":"X","category":"C","shortage_risk":1.5,
            "risk_factors":[],"alternatives":[],"average_price":1}]"#;
        assert!(matches!(
            DrugCatalog::from_json(json),
            Err(ShortageError::InvalidRiskScore { .. })
        ));
    }

    #[test]
    fn malformed_json_is_rejected() {
        assert!(matches!(
            DrugCatalog::from_json("{"),
            Err(ShortageError::CatalogParse(_))
        ));
    }
}
