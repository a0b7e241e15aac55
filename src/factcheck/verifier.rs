use serde::Serialize;

use super::records::{self, ReferenceRecord};
use crate::models::enums::Verdict;

/// A topic predicate: every clause must match, and a clause matches when
/// any of its substrings occurs in the lower-cased claim.
struct TopicRule {
    all_of: &'static [&'static [&'static str]],
    record: ReferenceRecord,
}

impl TopicRule {
    fn matches(&self, lowered: &str) -> bool {
        self.all_of
            .iter()
            .all(|any_of| any_of.iter().any(|needle| lowered.contains(needle)))
    }
}

/// Priority order. The first matching rule wins.
static TOPIC_RULES: &[TopicRule] = &[
    TopicRule {
        all_of: &[&["5g"]],
        record: records::FIVE_G,
    },
    TopicRule {
        all_of: &[&["wash"], &["hand"]],
        record: records::HANDWASHING,
    },
    TopicRule {
        all_of: &[&["ivermectin"]],
        record: records::IVERMECTIN,
    },
    TopicRule {
        all_of: &[&["vaccine"], &["autism"]],
        record: records::VACCINE_AUTISM,
    },
    TopicRule {
        all_of: &[&["alkaline"], &["cancer"]],
        record: records::ALKALINE_DIET,
    },
    TopicRule {
        all_of: &[&["vitamin c"], &["cold", "prevent"]],
        record: records::VITAMIN_C,
    },
    TopicRule {
        all_of: &[&["sunscreen"], &["cancer"]],
        record: records::SUNSCREEN,
    },
    TopicRule {
        all_of: &[&["detox"], &["tea", "cleanse"]],
        record: records::DETOX_TEA,
    },
    TopicRule {
        all_of: &[&["microwave"], &["nutrient", "kill"]],
        record: records::MICROWAVE_NUTRIENTS,
    },
];

/// Verdict returned to the caller, carrying the caller's claim text.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FactCheckRecord {
    pub user_claim: String,
    pub matched_claim: Option<String>,
    pub similarity_score: f64,
    pub verdict: Verdict,
    pub verdict_icon: &'static str,
    pub source: String,
    pub source_url: Option<String>,
    pub category: String,
    pub evidence_score: u8,
    pub recommendation: String,
    pub date_fact_checked: Option<String>,
}

impl FactCheckRecord {
    fn from_reference(claim: &str, reference: &ReferenceRecord) -> Self {
        Self {
            user_claim: claim.to_string(),
            matched_claim: reference.matched_claim.map(str::to_string),
            similarity_score: reference.similarity_score,
            verdict: reference.verdict,
            verdict_icon: verdict_icon(reference.verdict),
            source: reference.source.to_string(),
            source_url: reference.source_url.map(str::to_string),
            category: reference.category.to_string(),
            evidence_score: reference.evidence_score,
            recommendation: reference.recommendation.to_string(),
            date_fact_checked: reference.date_fact_checked.map(str::to_string),
        }
    }
}

pub fn verdict_icon(verdict: Verdict) -> &'static str {
    match verdict {
        Verdict::True => "✅",
        Verdict::False => "❌",
        Verdict::Misleading => "⚠️",
        Verdict::Unverified => "❓",
    }
}

/// Map a free-text claim to its fact-check record.
///
/// Claims that mention several topics only ever match the first one in
/// priority order. Anything unmatched gets the UNVERIFIED record.
pub fn verify(claim: &str) -> FactCheckRecord {
    let lowered = claim.to_lowercase();
    let reference = TOPIC_RULES
        .iter()
        .find(|rule| rule.matches(&lowered))
        .map(|rule| &rule.record)
        .unwrap_or(&records::UNVERIFIED);

    tracing::debug!(topic = reference.topic, "Claim checked");
    FactCheckRecord::from_reference(claim, reference)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn five_g_claim_is_false() {
        let result = verify("5G towers spread coronavirus");
        assert_eq!(result.verdict, Verdict::False);
        assert_eq!(result.source, "WHO Mythbusters");
        assert_eq!(result.verdict_icon, "❌");
        assert_eq!(result.user_claim, "5G towers spread coronavirus");
    }

    #[test]
    fn nonsense_claim_is_unverified() {
        let result = verify("xyz nonsense claim");
        assert_eq!(result.verdict, Verdict::Unverified);
        assert_eq!(result.user_claim, "xyz nonsense claim");
        assert_eq!(result.source, "N/A");
        assert!(result.matched_claim.is_none());
        assert!(result.source_url.is_none());
        assert_eq!(result.similarity_score, 0.0);
    }

    #[test]
    fn matching_ignores_case() {
        assert_eq!(verify("IVERMECTIN CURES COVID").verdict, Verdict::Misleading);
        assert_eq!(verify("Wash Your HANDS").verdict, Verdict::True);
    }

    #[test]
    fn every_clause_must_match() {
        assert_eq!(verify("vaccines are safe").verdict, Verdict::Unverified);
        assert_eq!(verify("vitamin c is tasty").verdict, Verdict::Unverified);
        assert_eq!(
            verify("Vitamin C prevents flu").matched_claim.as_deref(),
            Some("Taking high doses of Vitamin C can prevent the common cold.")
        );
    }

    #[test]
    fn any_substring_satisfies_a_clause() {
        assert_eq!(verify("a detox cleanse works").category, "Wellness & Diet");
        assert_eq!(verify("detox tea").category, "Wellness & Diet");
        assert_eq!(verify("microwave ovens kill food").category, "Food & Nutrition");
    }

    #[test]
    fn first_topic_wins_when_several_match() {
        // Mentions both ivermectin and the vaccine/autism topic.
        let result = verify("ivermectin and vaccines cause autism");
        assert_eq!(result.verdict, Verdict::Misleading);
        assert_eq!(result.source, "FDA");

        // 5G outranks everything.
        let result = verify("sunscreen causes cancer and 5g");
        assert_eq!(result.source, "WHO Mythbusters");
    }

    #[test]
    fn sunscreen_outranked_by_alkaline() {
        let result = verify("alkaline sunscreen prevents cancer");
        assert_eq!(result.category, "Cancer Treatment Myths");
    }

    #[test]
    fn every_rule_reachable_from_its_example_claim() {
        for rule in TOPIC_RULES {
            let result = verify(rule.record.example_claim);
            assert_eq!(result.matched_claim.as_deref(), rule.record.matched_claim);
        }
    }
}
