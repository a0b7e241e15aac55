//! Client for the local symptom-prediction service.
//!
//! The service takes free-text symptoms and returns ranked conditions.
//! `predict_reply` turns that into chat prose and never fails: connection
//! problems and bad responses become fixed apology texts.

use std::fmt::Write as _;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Reply when the service cannot be reached.
pub const SERVICE_UNAVAILABLE_REPLY: &str = "I'm sorry, the symptom checker service is currently unavailable. Please make sure it is running at the address set in HEALTHASSIST_SYMPTOM_URL, or switch to the \"ai\" chat engine instead.";

/// Reply for any other failure.
pub const ANALYSIS_FAILED_REPLY: &str = "I'm sorry, I encountered an error while analyzing your symptoms. Please try again or switch to the \"ai\" chat engine.";

const GENERAL_RECOMMENDATIONS: &[&str] = &[
    "Monitor your symptoms and note any changes",
    "Stay hydrated and get adequate rest",
    "Seek immediate medical attention if symptoms worsen",
];

const RED_FLAG_SYMPTOMS: &[&str] = &[
    "Difficulty breathing or shortness of breath",
    "Chest pain or pressure",
    "High fever (above 103°F/39.4°C)",
    "Severe abdominal pain",
    "Signs of severe dehydration",
    "Loss of consciousness or confusion",
];

const DISCLAIMER: &str = "**Disclaimer:** This AI analysis is based on machine learning and is not a medical diagnosis. Please consult a healthcare provider for proper medical evaluation and treatment.";

#[derive(Error, Debug)]
pub enum SymptomError {
    #[error("Symptom service is not reachable at {0}")]
    Connection(String),

    #[error("Symptom service timed out after {0}s")]
    Timeout(u64),

    #[error("Symptom service returned status {0}")]
    Status(u16),

    #[error("HTTP client error: {0}")]
    HttpClient(String),

    #[error("Response parsing error: {0}")]
    ResponseParsing(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SymptomPrediction {
    pub condition: String,
    /// Model confidence in `0.0..=1.0`.
    pub confidence: f64,
    pub specialty: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SymptomResponse {
    pub input: String,
    pub predictions: Vec<SymptomPrediction>,
}

pub trait SymptomPredictor: Send + Sync {
    fn predict(&self, symptoms: &str) -> Result<SymptomResponse, SymptomError>;
}

#[derive(Serialize)]
struct PredictRequest<'a> {
    symptoms: &'a str,
}

/// HTTP client for `POST {symptoms}`.
pub struct SymptomClient {
    url: String,
    client: reqwest::blocking::Client,
    timeout_secs: u64,
}

impl SymptomClient {
    pub fn new(url: &str, timeout: Duration, connect_timeout: Duration) -> Result<Self, SymptomError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .connect_timeout(connect_timeout)
            .build()
            .map_err(|e| SymptomError::HttpClient(e.to_string()))?;
        Ok(Self {
            url: url.to_string(),
            client,
            timeout_secs: timeout.as_secs(),
        })
    }
}

impl SymptomPredictor for SymptomClient {
    fn predict(&self, symptoms: &str) -> Result<SymptomResponse, SymptomError> {
        let response = self
            .client
            .post(&self.url)
            .json(&PredictRequest { symptoms })
            .send()
            .map_err(|e| {
                if e.is_connect() {
                    SymptomError::Connection(self.url.clone())
                } else if e.is_timeout() {
                    SymptomError::Timeout(self.timeout_secs)
                } else {
                    SymptomError::HttpClient(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(SymptomError::Status(status.as_u16()));
        }

        response
            .json()
            .map_err(|e| SymptomError::ResponseParsing(e.to_string()))
    }
}

/// Render predictions as chat prose with recommendations and a disclaimer.
pub fn format_predictions(response: &SymptomResponse) -> String {
    let mut out = format!("Based on your symptoms: \"{}\"\n\n", response.input);
    out.push_str("Here are the possible conditions I've identified:\n\n");

    for (i, p) in response.predictions.iter().enumerate() {
        let _ = write!(
            out,
            "{}. **{}** ({:.1}% confidence)\n   Recommended specialist: {}\n\n",
            i + 1,
            p.condition,
            p.confidence * 100.0,
            p.specialty
        );
    }

    out.push_str("**General Recommendations:**\n");
    for line in GENERAL_RECOMMENDATIONS {
        let _ = writeln!(out, "• {line}");
    }
    out.push('\n');

    out.push_str("**Red Flag Symptoms - Seek immediate medical care if you experience:**\n");
    for line in RED_FLAG_SYMPTOMS {
        let _ = writeln!(out, "• {line}");
    }
    out.push('\n');

    out.push_str(DISCLAIMER);
    out
}

/// Ask the predictor and format the answer. Always resolves.
pub fn predict_reply(predictor: &dyn SymptomPredictor, symptoms: &str) -> String {
    match predictor.predict(symptoms) {
        Ok(response) => format_predictions(&response),
        Err(SymptomError::Connection(url)) => {
            tracing::warn!(url = %url, "Symptom service unreachable");
            SERVICE_UNAVAILABLE_REPLY.to_string()
        }
        Err(e) => {
            tracing::warn!(error = %e, "Symptom prediction failed");
            ANALYSIS_FAILED_REPLY.to_string()
        }
    }
}

/// Test double returning a canned response or a canned failure.
#[cfg(test)]
pub(crate) struct MockSymptomPredictor {
    pub(crate) outcome: Result<SymptomResponse, fn() -> SymptomError>,
}

#[cfg(test)]
impl SymptomPredictor for MockSymptomPredictor {
    fn predict(&self, symptoms: &str) -> Result<SymptomResponse, SymptomError> {
        match &self.outcome {
            Ok(response) => Ok(SymptomResponse {
                input: symptoms.to_string(),
                predictions: response.predictions.clone(),
            }),
            Err(make) => Err(make()),
        }
    }
}

#[cfg(test)]
pub(crate) fn sample_response() -> SymptomResponse {
    SymptomResponse {
        input: "fever and cough".into(),
        predictions: vec![
            SymptomPrediction {
                condition: "Common Cold".into(),
                confidence: 0.8234,
                specialty: "General Physician".into(),
            },
            SymptomPrediction {
                condition: "Influenza".into(),
                confidence: 0.15,
                specialty: "Internal Medicine".into(),
            },
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_numbered_conditions_with_one_decimal() {
        let text = format_predictions(&sample_response());
        assert!(text.starts_with("Based on your symptoms: \"fever and cough\"\n\n"));
        assert!(text.contains(
            "1. **Common Cold** (82.3% confidence)\n   Recommended specialist: General Physician\n\n"
        ));
        assert!(text.contains("2. **Influenza** (15.0% confidence)"));
    }

    #[test]
    fn formatted_reply_ends_with_disclaimer() {
        let text = format_predictions(&sample_response());
        assert!(text.contains("• Stay hydrated and get adequate rest\n"));
        assert!(text.contains("• High fever (above 103°F/39.4°C)\n"));
        assert_eq!(text.matches("• ").count(), 9);
        assert!(text.ends_with(DISCLAIMER));
    }

    #[test]
    fn no_predictions_still_formats() {
        let text = format_predictions(&SymptomResponse {
            input: "x".into(),
            predictions: Vec::new(),
        });
        assert!(text.contains("Here are the possible conditions I've identified:\n\n**General"));
    }

    #[test]
    fn connection_failure_gets_unavailable_reply() {
        let predictor = MockSymptomPredictor {
            outcome: Err(|| SymptomError::Connection("http://localhost:5000".into())),
        };
        assert_eq!(predict_reply(&predictor, "headache"), SERVICE_UNAVAILABLE_REPLY);
        assert!(SERVICE_UNAVAILABLE_REPLY.contains("HEALTHASSIST_SYMPTOM_URL"));
        assert!(!SERVICE_UNAVAILABLE_REPLY.contains("localhost"));
    }

    #[test]
    fn other_failures_get_generic_apology() {
        let predictor = MockSymptomPredictor {
            outcome: Err(|| SymptomError::Status(500)),
        };
        assert_eq!(predict_reply(&predictor, "headache"), ANALYSIS_FAILED_REPLY);

        let predictor = MockSymptomPredictor {
            outcome: Err(|| SymptomError::Timeout(30)),
        };
        assert_eq!(predict_reply(&predictor, "headache"), ANALYSIS_FAILED_REPLY);
    }

    #[test]
    fn successful_prediction_echoes_input() {
        let predictor = MockSymptomPredictor {
            outcome: Ok(sample_response()),
        };
        let reply = predict_reply(&predictor, "sore throat");
        assert!(reply.starts_with("Based on your symptoms: \"sore throat\""));
    }
}
