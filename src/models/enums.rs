use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
#[error("Invalid {field} value: {value}")]
pub struct ParseEnumError {
    pub field: String,
    pub value: String,
}

/// Macro to generate enum with as_str + std::str::FromStr pattern.
/// The string form doubles as the serde wire name.
macro_rules! str_enum {
    ($name:ident { $($variant:ident => $s:literal),+ $(,)? }) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $(#[serde(rename = $s)] $variant),+
        }

        impl $name {
            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $s),+
                }
            }
        }

        impl std::str::FromStr for $name {
            type Err = ParseEnumError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($s => Ok(Self::$variant)),+,
                    _ => Err(ParseEnumError {
                        field: stringify!($name).into(),
                        value: s.into(),
                    }),
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

str_enum!(AlertType {
    DrugInteraction => "drug_interaction",
    LowStock => "low_stock",
    ExpiryWarning => "expiry_warning",
    DoctorVisit => "doctor_visit",
});

str_enum!(PrescriptionStatus {
    Verified => "verified",
    PendingReview => "pending_review",
    Error => "error",
});

str_enum!(ChatRole {
    User => "user",
    Model => "model",
});

str_enum!(Channel {
    Email => "email",
    Telegram => "telegram",
});

str_enum!(ReminderFrequency {
    Daily => "daily",
});

str_enum!(Verdict {
    True => "TRUE",
    False => "FALSE",
    Misleading => "MISLEADING",
    Unverified => "UNVERIFIED",
});

str_enum!(RiskTier {
    Low => "LOW",
    Medium => "MEDIUM",
    High => "HIGH",
    Unknown => "UNKNOWN",
});

str_enum!(RecommendationPriority {
    Urgent => "URGENT",
    High => "HIGH",
    Medium => "MEDIUM",
    Low => "LOW",
});

str_enum!(Availability {
    High => "high",
    Medium => "medium",
    Low => "low",
});

str_enum!(FacilityCategory {
    Hospital => "hospital",
    Pharmacy => "pharmacy",
    Clinic => "clinic",
});

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn alert_type_round_trip() {
        for (variant, s) in [
            (AlertType::DrugInteraction, "drug_interaction"),
            (AlertType::LowStock, "low_stock"),
            (AlertType::ExpiryWarning, "expiry_warning"),
            (AlertType::DoctorVisit, "doctor_visit"),
        ] {
            assert_eq!(variant.as_str(), s);
            assert_eq!(AlertType::from_str(s).unwrap(), variant);
        }
    }

    #[test]
    fn verdict_round_trip() {
        for (variant, s) in [
            (Verdict::True, "TRUE"),
            (Verdict::False, "FALSE"),
            (Verdict::Misleading, "MISLEADING"),
            (Verdict::Unverified, "UNVERIFIED"),
        ] {
            assert_eq!(variant.as_str(), s);
            assert_eq!(Verdict::from_str(s).unwrap(), variant);
        }
    }

    #[test]
    fn serde_uses_string_form() {
        let json = serde_json::to_string(&PrescriptionStatus::PendingReview).unwrap();
        assert_eq!(json, "\"pending_review\"");
        let tier: RiskTier = serde_json::from_str("\"HIGH\"").unwrap();
        assert_eq!(tier, RiskTier::High);
    }

    #[test]
    fn display_matches_as_str() {
        assert_eq!(FacilityCategory::Pharmacy.to_string(), "pharmacy");
    }

    #[test]
    fn invalid_enum_returns_error() {
        let err = AlertType::from_str("Low Stock").unwrap_err();
        assert_eq!(err.field, "AlertType");
        assert!(Availability::from_str("").is_err());
        assert!(Channel::from_str("sms").is_err());
    }
}
