//! Fixed fact-check reference records.

use crate::models::enums::Verdict;

/// Immutable reference entry, keyed by topic.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReferenceRecord {
    pub topic: &'static str,
    pub example_claim: &'static str,
    pub matched_claim: Option<&'static str>,
    pub similarity_score: f64,
    pub verdict: Verdict,
    pub source: &'static str,
    pub source_url: Option<&'static str>,
    pub category: &'static str,
    pub evidence_score: u8,
    pub recommendation: &'static str,
    pub date_fact_checked: Option<&'static str>,
}

pub const FIVE_G: ReferenceRecord = ReferenceRecord {
    topic: "5G_FALSE",
    example_claim: "5G towers spread coronavirus",
    matched_claim: Some("5G mobile networks spread COVID-19"),
    similarity_score: 92.4,
    verdict: Verdict::False,
    source: "WHO Mythbusters",
    source_url: Some(
        "https://www.who.int/emergencies/diseases/novel-coronavirus-2019/advice-for-public/myth-busters#5g",
    ),
    category: "COVID-19",
    evidence_score: 10,
    recommendation: "This claim has been debunked by the World Health Organization. Viruses cannot travel on radio waves or mobile networks. COVID-19 is spread through respiratory droplets when an infected person coughs, sneezes or speaks.",
    date_fact_checked: Some("2020-04-08"),
};

pub const HANDWASHING: ReferenceRecord = ReferenceRecord {
    topic: "HANDWASHING_TRUE",
    example_claim: "Washing hands prevents infections",
    matched_claim: Some("Regular handwashing protects against COVID-19 infection"),
    similarity_score: 95.8,
    verdict: Verdict::True,
    source: "CDC",
    source_url: Some("https://www.cdc.gov/handwashing/when-how-handwashing.html"),
    category: "General Health",
    evidence_score: 95,
    recommendation: "This claim is supported by health authorities like the CDC. Frequent handwashing with soap and water for at least 20 seconds is one of the most effective ways to prevent the spread of germs, including the virus that causes COVID-19.",
    date_fact_checked: Some("2021-10-26"),
};

pub const IVERMECTIN: ReferenceRecord = ReferenceRecord {
    topic: "IVERMECTIN_MISLEADING",
    example_claim: "ivermectin cures covid",
    matched_claim: Some("Ivermectin is an effective treatment for COVID-19"),
    similarity_score: 88.1,
    verdict: Verdict::Misleading,
    source: "FDA",
    source_url: Some(
        "https://www.fda.gov/consumers/consumer-updates/why-you-should-not-use-ivermectin-treat-or-prevent-covid-19",
    ),
    category: "COVID-19 Treatment",
    evidence_score: 30,
    recommendation: "The FDA has not authorized or approved ivermectin for use in preventing or treating COVID-19. While some initial research was conducted, large-scale clinical trials have not shown it to be an effective treatment. Taking large doses of this drug is dangerous.",
    date_fact_checked: Some("2022-03-15"),
};

pub const VACCINE_AUTISM: ReferenceRecord = ReferenceRecord {
    topic: "VACCINE_AUTISM_FALSE",
    example_claim: "vaccines cause autism",
    matched_claim: Some("Childhood vaccines are linked to autism spectrum disorder."),
    similarity_score: 98.2,
    verdict: Verdict::False,
    source: "Centers for Disease Control and Prevention (CDC)",
    source_url: Some("https://www.cdc.gov/vaccinesafety/concerns/autism.html"),
    category: "Vaccine Safety",
    evidence_score: 5,
    recommendation: "This claim is false. Numerous large-scale scientific studies have found no link between vaccines, or their ingredients, and autism. The original 1998 study that suggested a link was retracted due to serious procedural errors, undisclosed financial conflicts of interest, and ethical violations.",
    date_fact_checked: Some("2019-11-12"),
};

pub const ALKALINE_DIET: ReferenceRecord = ReferenceRecord {
    topic: "ALKALINE_DIET_FALSE",
    example_claim: "alkaline diet cures cancer",
    matched_claim: Some("Eating an alkaline diet can treat or cure cancer."),
    similarity_score: 91.5,
    verdict: Verdict::False,
    source: "MD Anderson Cancer Center",
    source_url: Some(
        "https://www.mdanderson.org/cancerwise/alkaline-diet-what-you-need-to-know.h00-159385038.html",
    ),
    category: "Cancer Treatment Myths",
    evidence_score: 8,
    recommendation: "This claim is false. There is no scientific evidence that an alkaline diet can prevent or cure cancer. The body naturally maintains a tightly controlled pH balance regardless of diet. While eating more fruits and vegetables is healthy, it does not change the body's pH or affect cancer cells.",
    date_fact_checked: Some("2021-06-22"),
};

pub const VITAMIN_C: ReferenceRecord = ReferenceRecord {
    topic: "VITAMIN_C_MISLEADING",
    example_claim: "vitamin c prevents colds",
    matched_claim: Some("Taking high doses of Vitamin C can prevent the common cold."),
    similarity_score: 85.3,
    verdict: Verdict::Misleading,
    source: "National Institutes of Health (NIH)",
    source_url: Some("https://ods.od.nih.gov/factsheets/VitaminC-HealthProfessional/#h8"),
    category: "Supplements & Colds",
    evidence_score: 45,
    recommendation: "For most people, taking Vitamin C supplements regularly does not prevent colds but may slightly reduce a cold's duration or severity. Taking a supplement only after a cold starts does not appear to be helpful. A balanced diet is the best source of vitamins.",
    date_fact_checked: Some("2023-01-10"),
};

pub const SUNSCREEN: ReferenceRecord = ReferenceRecord {
    topic: "SUNSCREEN_TRUE",
    example_claim: "sunscreen prevents skin cancer",
    matched_claim: Some("Using sunscreen regularly helps prevent the development of skin cancer."),
    similarity_score: 96.0,
    verdict: Verdict::True,
    source: "Skin Cancer Foundation",
    source_url: Some("https://www.skincancer.org/skin-cancer-prevention/sun-protection/sunscreen/"),
    category: "Cancer Prevention",
    evidence_score: 98,
    recommendation: "This is true. Broad-spectrum sunscreens with an SPF of 15 or higher are proven to significantly reduce the risk of developing squamous cell carcinoma, melanoma, and premature skin aging when used as directed with other sun protection measures.",
    date_fact_checked: Some("2022-05-18"),
};

pub const DETOX_TEA: ReferenceRecord = ReferenceRecord {
    topic: "DETOX_TEA_FALSE",
    example_claim: "detox teas work",
    matched_claim: Some("Detox teas and cleanses are effective at removing toxins from the body."),
    similarity_score: 89.9,
    verdict: Verdict::False,
    source: "Cleveland Clinic",
    source_url: Some("https://health.clevelandclinic.org/what-does-a-detox-tea-do"),
    category: "Wellness & Diet",
    evidence_score: 15,
    recommendation: "This claim is false. There is no scientific evidence that detox teas provide any health benefits. The human body has its own highly effective detoxification system: the liver and kidneys. These teas often contain laxatives, which can be harmful with prolonged use.",
    date_fact_checked: Some("2022-09-01"),
};

pub const MICROWAVE_NUTRIENTS: ReferenceRecord = ReferenceRecord {
    topic: "MICROWAVE_NUTRIENTS_FALSE",
    example_claim: "microwaves kill nutrients",
    matched_claim: Some("Microwaving food destroys its nutritional value."),
    similarity_score: 93.1,
    verdict: Verdict::False,
    source: "Harvard Health Publishing",
    source_url: Some("https://www.health.harvard.edu/staying-healthy/microwave-cooking-and-nutrition"),
    category: "Food & Nutrition",
    evidence_score: 20,
    recommendation: "This claim is false. Because microwave cooking times are shorter and use less water, this method often retains more vitamins and minerals than other cooking methods like boiling. The best cooking method for nutrient retention varies by nutrient and food type.",
    date_fact_checked: Some("2020-11-30"),
};

/// Returned when no topic matches.
pub const UNVERIFIED: ReferenceRecord = ReferenceRecord {
    topic: "UNVERIFIED",
    example_claim: "",
    matched_claim: None,
    similarity_score: 0.0,
    verdict: Verdict::Unverified,
    source: "N/A",
    source_url: None,
    category: "N/A",
    evidence_score: 0,
    recommendation: "We could not find a close match for this claim in our fact-check database. This does not mean the claim is true or false. Please consult a qualified healthcare professional and trusted public health websites for more information.",
    date_fact_checked: None,
};
