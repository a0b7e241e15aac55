use chrono::{Days, NaiveDate};
use serde::Serialize;

use super::catalog::{Alternative, DrugCatalog, DrugCatalogEntry};
use crate::models::enums::{RecommendationPriority, RiskTier};

/// Scores at or above this are HIGH.
pub const HIGH_RISK_THRESHOLD: f64 = 0.70;
/// Scores at or above this (and below HIGH) are MEDIUM.
pub const MEDIUM_RISK_THRESHOLD: f64 = 0.40;
/// Horizon used to turn a risk score into days.
pub const SHORTAGE_HORIZON_DAYS: f64 = 180.0;
/// Savings are quoted per month of daily doses.
pub const DAYS_PER_MONTH: f64 = 30.0;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RiskAssessment {
    pub level: RiskTier,
    pub score: f64,
    pub percentage: String,
    pub icon: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PricingSummary {
    pub current_price: String,
    pub cheapest_alternative: String,
    pub monthly_savings: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Recommendation {
    pub priority: RecommendationPriority,
    pub action: String,
    pub details: String,
}

/// Result of a shortage query. Recomputed per request, never stored.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ShortageEstimate {
    pub found: bool,
    pub drug_name: String,
    pub generic_name: String,
    pub category: String,
    pub shortage_risk: RiskAssessment,
    pub warning: String,
    pub days_until_shortage: u32,
    pub estimated_shortage_date: Option<NaiveDate>,
    pub cheapest_alternative: Option<Alternative>,
    pub monthly_savings: f64,
    pub pricing: PricingSummary,
    pub alternatives: Vec<Alternative>,
    pub risk_factors: Vec<String>,
    pub recommendations: Vec<Recommendation>,
}

impl ShortageEstimate {
    /// Result for a drug that is not in the catalog.
    pub fn not_found(drug_name: &str) -> Self {
        Self {
            found: false,
            drug_name: drug_name.to_string(),
            generic_name: String::new(),
            category: String::new(),
            shortage_risk: RiskAssessment {
                level: RiskTier::Unknown,
                score: 0.0,
                percentage: "0%".into(),
                icon: tier_icon(RiskTier::Unknown),
            },
            warning: String::new(),
            days_until_shortage: 0,
            estimated_shortage_date: None,
            cheapest_alternative: None,
            monthly_savings: 0.0,
            pricing: PricingSummary {
                current_price: String::new(),
                cheapest_alternative: String::new(),
                monthly_savings: String::new(),
            },
            alternatives: Vec::new(),
            risk_factors: Vec::new(),
            recommendations: Vec::new(),
        }
    }
}

pub fn risk_tier(score: f64) -> RiskTier {
    if score >= HIGH_RISK_THRESHOLD {
        RiskTier::High
    } else if score >= MEDIUM_RISK_THRESHOLD {
        RiskTier::Medium
    } else {
        RiskTier::Low
    }
}

pub fn tier_icon(tier: RiskTier) -> &'static str {
    match tier {
        RiskTier::High => "🔴",
        RiskTier::Medium => "🟡",
        RiskTier::Low => "🟢",
        RiskTier::Unknown => "❓",
    }
}

/// `max(1, floor((1 − score) × 180))`, always in `1..=180` for scores in `0..=1`.
pub fn days_until_shortage(score: f64) -> u32 {
    let days = ((1.0 - score) * SHORTAGE_HORIZON_DAYS).floor();
    days.clamp(1.0, SHORTAGE_HORIZON_DAYS) as u32
}

/// Lowest-priced alternative; the first one listed wins a tie.
pub fn cheapest_alternative(alternatives: &[Alternative]) -> Option<&Alternative> {
    alternatives.iter().fold(None, |best, alt| match best {
        Some(b) if b.price <= alt.price => Some(b),
        _ => Some(alt),
    })
}

pub fn monthly_savings(average_price: f64, cheapest: Option<&Alternative>) -> f64 {
    cheapest
        .map(|alt| ((average_price - alt.price) * DAYS_PER_MONTH).max(0.0))
        .unwrap_or(0.0)
}

fn recommendations(
    tier: RiskTier,
    entry: &DrugCatalogEntry,
    cheapest: Option<&Alternative>,
) -> Vec<Recommendation> {
    let mut recs = Vec::with_capacity(3);

    if tier == RiskTier::High {
        recs.push(Recommendation {
            priority: RecommendationPriority::Urgent,
            action: "Stock up immediately".into(),
            details: format!(
                "Purchase a 2-3 month supply of {} from multiple pharmacies to ensure availability.",
                entry.name
            ),
        });
    }

    recs.push(Recommendation {
        priority: if tier == RiskTier::High {
            RecommendationPriority::High
        } else {
            RecommendationPriority::Medium
        },
        action: "Consider alternatives".into(),
        details: format!(
            "Consult your doctor about switching to {}.",
            cheapest
                .map(|alt| alt.name.as_str())
                .unwrap_or("alternative medications")
        ),
    });

    recs.push(Recommendation {
        priority: RecommendationPriority::Low,
        action: "Monitor regularly".into(),
        details: "Check back weekly for updated shortage predictions and availability status."
            .into(),
    });

    recs
}

/// Estimate shortage risk for `drug_name` as of `today`.
///
/// A catalog miss is a normal outcome and yields [`ShortageEstimate::not_found`].
pub fn estimate(catalog: &DrugCatalog, drug_name: &str, today: NaiveDate) -> ShortageEstimate {
    let Some(entry) = catalog.lookup(drug_name) else {
        tracing::debug!(drug = drug_name, "Drug not in shortage catalog");
        return ShortageEstimate::not_found(drug_name);
    };

    let score = entry.shortage_risk;
    let tier = risk_tier(score);
    let days = days_until_shortage(score);
    let cheapest = cheapest_alternative(&entry.alternatives);
    let savings = monthly_savings(entry.average_price, cheapest);

    ShortageEstimate {
        found: true,
        drug_name: entry.name.clone(),
        generic_name: entry.generic_name.clone(),
        category: entry.category.clone(),
        shortage_risk: RiskAssessment {
            level: tier,
            score,
            percentage: format!("{}%", (score * 100.0).round() as i64),
            icon: tier_icon(tier),
        },
        warning: format!("{} risk of shortage detected for {}", tier, entry.name),
        days_until_shortage: days,
        estimated_shortage_date: today.checked_add_days(Days::new(u64::from(days))),
        cheapest_alternative: cheapest.cloned(),
        monthly_savings: savings,
        pricing: PricingSummary {
            current_price: format!("₹{}", entry.average_price),
            cheapest_alternative: cheapest.map(|alt| alt.name.clone()).unwrap_or_default(),
            monthly_savings: format!("₹{savings:.0}"),
        },
        alternatives: entry.alternatives.clone(),
        risk_factors: entry.risk_factors.clone(),
        recommendations: recommendations(tier, entry, cheapest),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::enums::Availability;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 1, 10).unwrap()
    }

    fn alt(name: &str, price: f64) -> Alternative {
        Alternative {
            name: name.into(),
            price,
            availability: Availability::High,
        }
    }

    #[test]
    fn tier_boundaries() {
        assert_eq!(risk_tier(0.69), RiskTier::Medium);
        assert_eq!(risk_tier(0.70), RiskTier::High);
        assert_eq!(risk_tier(0.39), RiskTier::Low);
        assert_eq!(risk_tier(0.40), RiskTier::Medium);
        assert_eq!(risk_tier(0.0), RiskTier::Low);
        assert_eq!(risk_tier(1.0), RiskTier::High);
    }

    #[test]
    fn days_until_shortage_bounds() {
        assert_eq!(days_until_shortage(1.0), 1);
        assert_eq!(days_until_shortage(0.0), 180);
        assert_eq!(days_until_shortage(0.78), 39);
        assert_eq!(days_until_shortage(0.999), 1);
    }

    #[test]
    fn days_decrease_with_risk() {
        let mut previous = u32::MAX;
        for step in 0..=20 {
            let days = days_until_shortage(f64::from(step) / 20.0);
            assert!(days <= previous);
            previous = days;
        }
    }

    #[test]
    fn cheapest_picks_minimum_price() {
        let alts = vec![alt("A", 180.0), alt("B", 120.0)];
        assert_eq!(cheapest_alternative(&alts).unwrap().name, "B");
    }

    #[test]
    fn cheapest_tie_keeps_first() {
        let alts = vec![alt("A", 50.0), alt("B", 50.0), alt("C", 70.0)];
        assert_eq!(cheapest_alternative(&alts).unwrap().name, "A");
        assert!(cheapest_alternative(&[]).is_none());
    }

    #[test]
    fn savings_never_negative() {
        assert_eq!(monthly_savings(75.0, Some(&alt("X", 120.0))), 0.0);
        assert_eq!(monthly_savings(30.0, Some(&alt("X", 20.0))), 300.0);
        assert_eq!(monthly_savings(30.0, None), 0.0);
    }

    #[test]
    fn high_risk_drug_estimate() {
        let catalog = DrugCatalog::bundled().unwrap();
        let est = estimate(&catalog, "amoxicillin 500mg", today());

        assert!(est.found);
        assert_eq!(est.drug_name, "Amoxicillin 500mg");
        assert_eq!(est.shortage_risk.level, RiskTier::High);
        assert_eq!(est.shortage_risk.percentage, "78%");
        assert_eq!(est.shortage_risk.icon, "🔴");
        assert_eq!(est.warning, "HIGH risk of shortage detected for Amoxicillin 500mg");
        assert_eq!(est.days_until_shortage, 39);
        assert_eq!(
            est.estimated_shortage_date,
            NaiveDate::from_ymd_opt(2026, 2, 18)
        );
        assert_eq!(est.cheapest_alternative.as_ref().unwrap().name, "Cephalexin 500mg");
        assert_eq!(est.monthly_savings, 0.0);
        assert_eq!(est.pricing.current_price, "₹75");
        assert_eq!(est.pricing.monthly_savings, "₹0");

        let priorities: Vec<_> = est.recommendations.iter().map(|r| r.priority).collect();
        assert_eq!(
            priorities,
            vec![
                RecommendationPriority::Urgent,
                RecommendationPriority::High,
                RecommendationPriority::Low,
            ]
        );
        assert!(est.recommendations[1].details.contains("Cephalexin 500mg"));
    }

    #[test]
    fn low_risk_drug_estimate() {
        let catalog = DrugCatalog::bundled().unwrap();
        let est = estimate(&catalog, "Paracetamol 500mg", today());

        assert_eq!(est.shortage_risk.level, RiskTier::Low);
        assert_eq!(est.days_until_shortage, 117);
        assert_eq!(est.cheapest_alternative.as_ref().unwrap().name, "Aspirin 300mg");
        assert_eq!(est.monthly_savings, 300.0);
        assert_eq!(est.pricing.monthly_savings, "₹300");
        assert_eq!(est.recommendations.len(), 2);
        assert_eq!(est.recommendations[0].priority, RecommendationPriority::Medium);
        assert_eq!(est.recommendations[1].action, "Monitor regularly");
    }

    #[test]
    fn miss_returns_sentinel() {
        let catalog = DrugCatalog::bundled().unwrap();
        let est = estimate(&catalog, "Amoxicillin", today());
        assert!(!est.found);
        assert_eq!(est.drug_name, "Amoxicillin");
        assert_eq!(est.shortage_risk.level, RiskTier::Unknown);
        assert_eq!(est.shortage_risk.percentage, "0%");
        assert_eq!(est.days_until_shortage, 0);
        assert!(est.estimated_shortage_date.is_none());
        assert!(est.recommendations.is_empty());
        assert!(est.alternatives.is_empty());
    }

    #[test]
    fn estimate_is_deterministic() {
        let catalog = DrugCatalog::bundled().unwrap();
        let a = estimate(&catalog, "Warfarin 5mg", today());
        let b = estimate(&catalog, "Warfarin 5mg", today());
        assert_eq!(a, b);
    }
}
