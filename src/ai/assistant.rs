use std::sync::{Arc, LazyLock};

use base64::Engine;
use chrono::Utc;
use regex::Regex;
use serde::{Deserialize, Serialize};

use super::prompts;
use super::{AiError, ChatTurn, LlmClient};
use crate::models::enums::{AlertType, ChatRole, PrescriptionStatus};
use crate::models::{Alert, ChatMessage, Medicine, Prescription};
use crate::store::HealthStore;

/// Reply when the model call fails.
pub const CHAT_FAILURE_REPLY: &str =
    "I'm sorry, I encountered an error and can't respond right now. Please try again later.";

/// Reply when no model is configured.
pub const CHAT_UNAVAILABLE_REPLY: &str =
    "The AI chat feature is currently unavailable. Please set HEALTHASSIST_OLLAMA_MODEL to an installed Ollama model.";

/// `**Header**` markers in medication summaries.
static BOLD_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\*\*(.*?)\*\*").expect("valid regex"));

/// Leftover numbered-list marker at the end of a text run ("...\n2.").
static TRAILING_LIST_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n\s*\d+\.\s*$").expect("valid regex"));

/// A text run holding nothing but a list marker ("1.", "-").
static BARE_LIST_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d+\.|[-*])$").expect("valid regex"));

/// Medicines and transcription read from a prescription image.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExtractedPrescription {
    pub medicines: Vec<Medicine>,
    pub raw_text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InfoSection {
    pub title: String,
    pub body: String,
}

/// Short patient-facing medication summary.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MedicationInfo {
    pub name: String,
    pub text: String,
    pub sections: Vec<InfoSection>,
}

#[derive(Deserialize)]
struct RawExtraction {
    medicines: Vec<RawMedicine>,
    #[serde(rename = "rawText")]
    raw_text: String,
}

#[derive(Deserialize)]
struct RawMedicine {
    #[serde(default)]
    id: String,
    #[serde(default)]
    name: String,
    #[serde(default)]
    dosage: String,
    #[serde(default)]
    frequency: String,
    #[serde(default)]
    duration: String,
}

#[derive(Deserialize)]
struct RawVerification {
    warnings: Vec<String>,
}

/// Front door to the language model for chat, OCR and medication checks.
#[derive(Clone)]
pub struct AiAssistant {
    client: Arc<dyn LlmClient>,
    model: Option<String>,
}

impl AiAssistant {
    /// `model = None` leaves the assistant disabled.
    pub fn new(client: Arc<dyn LlmClient>, model: Option<String>) -> Self {
        Self { client, model }
    }

    pub fn is_configured(&self) -> bool {
        self.model.is_some()
    }

    fn model(&self) -> Result<&str, AiError> {
        self.model.as_deref().ok_or(AiError::NotConfigured)
    }

    /// Whether the configured model is installed on the backend.
    /// `medgemma` matches any `medgemma:<tag>`.
    pub fn model_installed(&self) -> Result<bool, AiError> {
        let model = self.model()?;
        let installed = self.client.list_models()?;
        Ok(installed.iter().any(|name| {
            name == model
                || name
                    .strip_prefix(model)
                    .is_some_and(|tag| tag.starts_with(':'))
        }))
    }

    /// Reply to the user in the context of the prior conversation.
    /// Always resolves to displayable text.
    pub fn chat_reply(&self, history: &[ChatMessage], message: &str) -> String {
        let Some(model) = self.model.as_deref() else {
            return CHAT_UNAVAILABLE_REPLY.to_string();
        };

        let mut turns: Vec<ChatTurn> = history
            .iter()
            .map(|m| ChatTurn::text(m.role, m.text.clone()))
            .collect();
        turns.push(ChatTurn::text(ChatRole::User, message));

        match self.client.chat(model, prompts::CHAT_SYSTEM_PROMPT, &turns) {
            Ok(reply) => reply,
            Err(e) => {
                tracing::warn!(error = %e, "AI chat reply failed");
                CHAT_FAILURE_REPLY.to_string()
            }
        }
    }

    /// Read medicines and raw text from a prescription image.
    pub fn extract_prescription(
        &self,
        mime_type: &str,
        image: &[u8],
    ) -> Result<ExtractedPrescription, AiError> {
        if !mime_type.starts_with("image/") {
            return Err(AiError::UnsupportedImage(mime_type.to_string()));
        }
        let model = self.model()?;

        let turn = ChatTurn {
            role: ChatRole::User,
            content: prompts::PRESCRIPTION_EXTRACTION_PROMPT.to_string(),
            images: vec![base64::engine::general_purpose::STANDARD.encode(image)],
        };
        let reply = self
            .client
            .chat(model, prompts::JSON_SYSTEM_PROMPT, std::slice::from_ref(&turn))?;

        let parsed: RawExtraction = parse_json_reply(&reply)?;
        let medicines = parsed
            .medicines
            .into_iter()
            .map(|m| Medicine {
                id: if m.id.trim().is_empty() {
                    format!("med-{}", uuid::Uuid::new_v4())
                } else {
                    m.id
                },
                name: m.name,
                dosage: m.dosage,
                frequency: m.frequency,
                duration: m.duration,
            })
            .collect::<Vec<_>>();

        tracing::info!(medicines = medicines.len(), "Prescription image extracted");
        Ok(ExtractedPrescription {
            medicines,
            raw_text: parsed.raw_text,
        })
    }

    /// Interaction and dosage warnings for a medicine list.
    pub fn verify_prescription(&self, medicines: &[Medicine]) -> Result<Vec<String>, AiError> {
        if medicines.is_empty() {
            return Ok(Vec::new());
        }
        let model = self.model()?;

        let reply = self.client.generate(
            model,
            &prompts::verification_prompt(medicines),
            prompts::JSON_SYSTEM_PROMPT,
        )?;
        let parsed: RawVerification = parse_json_reply(&reply)?;
        Ok(parsed.warnings)
    }

    pub fn medication_info(&self, name: &str) -> Result<MedicationInfo, AiError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(AiError::EmptyMedicationName);
        }
        let model = self.model()?;

        let text = self
            .client
            .generate(model, &prompts::medication_info_prompt(name), "")?;
        let sections = parse_sections(&text);

        Ok(MedicationInfo {
            name: name.to_string(),
            text,
            sections,
        })
    }

    /// Full upload flow: extract, verify, record the prescription and raise
    /// one DrugInteraction alert per warning.
    pub fn process_prescription(
        &self,
        store: &HealthStore,
        mime_type: &str,
        image: &[u8],
    ) -> Result<Prescription, AiError> {
        let extracted = self.extract_prescription(mime_type, image)?;
        let warnings = self.verify_prescription(&extracted.medicines)?;

        let now = Utc::now();
        let stamp = now.timestamp_millis();
        let alerts: Vec<Alert> = warnings
            .iter()
            .enumerate()
            .map(|(i, warning)| {
                Alert::new(
                    format!("alert-presc-{stamp}-{i}"),
                    AlertType::DrugInteraction,
                    warning.clone(),
                    now,
                    None,
                )
            })
            .collect();

        let prescription = Prescription {
            id: format!("p-{stamp}"),
            uploaded_at: now,
            ocr_text: Some(extracted.raw_text),
            medicines: extracted.medicines,
            status: if warnings.is_empty() {
                PrescriptionStatus::Verified
            } else {
                PrescriptionStatus::PendingReview
            },
            warnings,
        };

        store.add_prescription(prescription.clone())?;
        store.add_alerts(alerts)?;

        tracing::info!(
            prescription_id = %prescription.id,
            status = %prescription.status,
            warnings = prescription.warnings.len(),
            "Prescription processed"
        );
        Ok(prescription)
    }
}

/// Strip Markdown code fences and surrounding chatter, then parse.
fn parse_json_reply<T: for<'de> Deserialize<'de>>(reply: &str) -> Result<T, AiError> {
    let trimmed = reply.trim();
    let body = match (trimmed.find('{'), trimmed.rfind('}')) {
        (Some(start), Some(end)) if start < end => &trimmed[start..=end],
        _ => {
            return Err(AiError::MalformedResponse(
                "no JSON object in model reply".into(),
            ))
        }
    };
    serde_json::from_str(body).map_err(|e| AiError::MalformedResponse(e.to_string()))
}

/// Split text on `**Header**` markers: each bold run titles the text that
/// follows it. Text before the first header becomes an untitled section.
pub fn parse_sections(text: &str) -> Vec<InfoSection> {
    let headers: Vec<_> = BOLD_MARKER.captures_iter(text).collect();
    let mut sections = Vec::with_capacity(headers.len() + 1);

    let lead_end = headers
        .first()
        .and_then(|caps| caps.get(0))
        .map_or(text.len(), |m| m.start());
    let lead = TRAILING_LIST_MARKER.replace(text[..lead_end].trim(), "");
    let lead = lead.trim();
    if !lead.is_empty() && !BARE_LIST_MARKER.is_match(lead) {
        sections.push(InfoSection {
            title: String::new(),
            body: lead.to_string(),
        });
    }

    for (i, caps) in headers.iter().enumerate() {
        let (Some(whole), Some(title)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        let body_end = headers
            .get(i + 1)
            .and_then(|next| next.get(0))
            .map(|m| m.start())
            .unwrap_or(text.len());
        let body = text[whole.end()..body_end].trim();
        let body = TRAILING_LIST_MARKER.replace(body, "");

        sections.push(InfoSection {
            title: title.as_str().trim().trim_end_matches(':').trim().to_string(),
            body: body.trim().to_string(),
        });
    }
    sections
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::MockLlmClient;

    const EXTRACTION_REPLY: &str = r#"```json
{"medicines":[{"id":"a1","name":"Lisinopril","dosage":"10mg","frequency":"1 daily","duration":"30 days"},
{"id":"","name":"Ibuprofen","dosage":"400mg","frequency":"as needed","duration":""}],
"rawText":"Rx Lisinopril 10mg"}
```"#;

    fn assistant(client: MockLlmClient) -> AiAssistant {
        AiAssistant::new(Arc::new(client), Some("medgemma".into()))
    }

    fn medicine(name: &str) -> Medicine {
        Medicine {
            id: name.to_lowercase(),
            name: name.into(),
            dosage: "10mg".into(),
            frequency: "1 daily".into(),
            duration: "30 days".into(),
        }
    }

    #[test]
    fn chat_reply_passes_through_model_text() {
        let ai = assistant(MockLlmClient::new("Rest and hydrate."));
        let history = vec![ChatMessage::new(ChatRole::Model, "Hello!")];
        assert_eq!(ai.chat_reply(&history, "I have a cold"), "Rest and hydrate.");
    }

    #[test]
    fn chat_reply_apologises_on_failure() {
        let ai = assistant(MockLlmClient::failing(500));
        assert_eq!(ai.chat_reply(&[], "hi"), CHAT_FAILURE_REPLY);
    }

    #[test]
    fn chat_reply_without_model_is_unavailable() {
        let ai = AiAssistant::new(Arc::new(MockLlmClient::new("x")), None);
        assert!(!ai.is_configured());
        assert_eq!(ai.chat_reply(&[], "hi"), CHAT_UNAVAILABLE_REPLY);
        assert!(CHAT_UNAVAILABLE_REPLY.contains("HEALTHASSIST_OLLAMA_MODEL"));
    }

    #[test]
    fn extraction_strips_fences_and_fills_ids() {
        let ai = assistant(MockLlmClient::new(EXTRACTION_REPLY));
        let result = ai.extract_prescription("image/png", b"png").unwrap();
        assert_eq!(result.raw_text, "Rx Lisinopril 10mg");
        assert_eq!(result.medicines.len(), 2);
        assert_eq!(result.medicines[0].id, "a1");
        assert!(result.medicines[1].id.starts_with("med-"));
    }

    #[test]
    fn extraction_rejects_non_images() {
        let ai = assistant(MockLlmClient::new(EXTRACTION_REPLY));
        assert!(matches!(
            ai.extract_prescription("application/pdf", b"%PDF"),
            Err(AiError::UnsupportedImage(_))
        ));
    }

    #[test]
    fn extraction_rejects_wrong_shape() {
        let ai = assistant(MockLlmClient::new(r#"{"medicines":"none"}"#));
        assert!(matches!(
            ai.extract_prescription("image/jpeg", b"jpg"),
            Err(AiError::MalformedResponse(_))
        ));
        let ai = assistant(MockLlmClient::new("I cannot read this image."));
        assert!(matches!(
            ai.extract_prescription("image/jpeg", b"jpg"),
            Err(AiError::MalformedResponse(_))
        ));
    }

    #[test]
    fn verification_of_empty_list_skips_model() {
        let client = Arc::new(MockLlmClient::new("not json"));
        let ai = AiAssistant::new(client.clone(), Some("m".into()));
        assert!(ai.verify_prescription(&[]).unwrap().is_empty());
        assert!(client.calls().is_empty());
    }

    #[test]
    fn verification_returns_warnings() {
        let ai = assistant(MockLlmClient::new(
            r#"{"warnings":["Potential interaction between A and B."]}"#,
        ));
        let warnings = ai.verify_prescription(&[medicine("A"), medicine("B")]).unwrap();
        assert_eq!(warnings, vec!["Potential interaction between A and B."]);
    }

    #[test]
    fn medication_info_rejects_blank_name() {
        let ai = assistant(MockLlmClient::new("x"));
        assert!(matches!(
            ai.medication_info("   "),
            Err(AiError::EmptyMedicationName)
        ));
    }

    #[test]
    fn medication_info_without_model_is_not_configured() {
        let ai = AiAssistant::new(Arc::new(MockLlmClient::new("x")), None);
        assert!(matches!(
            ai.medication_info("Aspirin"),
            Err(AiError::NotConfigured)
        ));
    }

    #[test]
    fn sections_split_on_bold_headers() {
        let text = "1.  **Common Uses:** Relieves pain and fever.\n2.  **Important Note:** Can upset the stomach.";
        let sections = parse_sections(text);
        assert_eq!(
            sections,
            vec![
                InfoSection {
                    title: "Common Uses".into(),
                    body: "Relieves pain and fever.".into(),
                },
                InfoSection {
                    title: "Important Note".into(),
                    body: "Can upset the stomach.".into(),
                },
            ]
        );
    }

    #[test]
    fn text_without_headers_is_one_untitled_section() {
        assert_eq!(
            parse_sections("Plain answer."),
            vec![InfoSection {
                title: String::new(),
                body: "Plain answer.".into(),
            }]
        );
        assert!(parse_sections("  ").is_empty());
    }

    #[test]
    fn text_before_first_header_is_kept() {
        let sections = parse_sections("Aspirin is a common painkiller. **Common Uses:** Pain.");
        assert_eq!(
            sections,
            vec![
                InfoSection {
                    title: String::new(),
                    body: "Aspirin is a common painkiller.".into(),
                },
                InfoSection {
                    title: "Common Uses".into(),
                    body: "Pain.".into(),
                },
            ]
        );
    }

    #[test]
    fn medication_info_carries_sections() {
        let ai = assistant(MockLlmClient::new("**Common Uses:** Pain.\n**Important Note:** Bleeding."));
        let info = ai.medication_info(" Aspirin ").unwrap();
        assert_eq!(info.name, "Aspirin");
        assert_eq!(info.sections.len(), 2);
        assert_eq!(info.sections[1].body, "Bleeding.");
    }

    #[test]
    fn processing_with_warnings_is_pending_review() {
        let store = HealthStore::new();
        let ai = assistant(MockLlmClient::sequence(&[
            EXTRACTION_REPLY,
            r#"{"warnings":["Check dose.","Interaction."]}"#,
        ]));
        let prescription = ai.process_prescription(&store, "image/png", b"png").unwrap();

        assert_eq!(prescription.status, PrescriptionStatus::PendingReview);
        assert_eq!(prescription.ocr_text.as_deref(), Some("Rx Lisinopril 10mg"));

        let alerts = store.alerts().unwrap();
        assert_eq!(alerts.len(), 2);
        assert!(alerts.iter().all(|a| a.alert_type == AlertType::DrugInteraction));
        assert!(alerts.iter().all(|a| a.related_id.is_none()));
        assert!(alerts[0].id.starts_with("alert-presc-"));
        assert!(alerts[0].id.ends_with("-0"));
        assert_eq!(store.prescriptions().unwrap()[0].id, prescription.id);
    }

    #[test]
    fn processing_without_warnings_is_verified() {
        let store = HealthStore::new();
        let ai = assistant(MockLlmClient::sequence(&[EXTRACTION_REPLY, r#"{"warnings":[]}"#]));
        let prescription = ai.process_prescription(&store, "image/png", b"png").unwrap();
        assert_eq!(prescription.status, PrescriptionStatus::Verified);
        assert!(store.alerts().unwrap().is_empty());
    }

    #[test]
    fn failed_extraction_stores_nothing() {
        let store = HealthStore::new();
        let ai = assistant(MockLlmClient::failing(500));
        assert!(ai.process_prescription(&store, "image/png", b"png").is_err());
        assert!(store.prescriptions().unwrap().is_empty());
    }

    #[test]
    fn installed_model_matches_any_tag() {
        let ai = AiAssistant::new(Arc::new(MockLlmClient::new("")), Some("medgemma".into()));
        assert!(ai.model_installed().unwrap());
        let ai = AiAssistant::new(Arc::new(MockLlmClient::new("")), Some("medgem".into()));
        assert!(!ai.model_installed().unwrap());
        let ai = AiAssistant::new(Arc::new(MockLlmClient::new("")), None);
        assert!(matches!(ai.model_installed(), Err(AiError::NotConfigured)));
    }
}
