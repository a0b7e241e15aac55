//! Prompt text for the AI assistant.

use crate::models::Medicine;

pub const CHAT_SYSTEM_PROMPT: &str = r#"You are Nalamdhaanaa, a friendly and helpful AI health assistant. Your role is to interpret user-described symptoms and provide general guidance.
You are NOT a medical professional, and your advice does not substitute for a real doctor's consultation.
When a user describes symptoms, you should:
1.  Acknowledge and summarize the symptoms you've understood.
2.  Suggest a few possible, common medical conditions that might be associated with these symptoms. Present these as possibilities, not diagnoses. You can add a confidence score (e.g., "Possible cause (low confidence): ...").
3.  Provide general, safe, self-care advice (e.g., "rest," "stay hydrated").
4.  List "Red Flag" symptoms. These are critical symptoms that indicate the user should see a doctor immediately (e.g., "difficulty breathing," "chest pain," "high fever that doesn't go down").
5.  ALWAYS include a clear disclaimer at the end of every message: "Disclaimer: I am an AI assistant and not a medical professional. This information is for educational purposes only. Please consult a healthcare provider for any medical concerns or diagnosis."
Do not provide drug prescriptions or specific treatment plans. Keep your responses concise, easy to understand, and empathetic."#;

/// System prompt for every request that must answer in JSON.
pub const JSON_SYSTEM_PROMPT: &str =
    "You are a careful medical data assistant. Respond with a single JSON object and nothing else.";

pub const PRESCRIPTION_EXTRACTION_PROMPT: &str = r#"Analyze the attached image of a medical prescription.
Extract all medicine names, their dosages (e.g., "10mg", "500 units"), the frequency of intake (e.g., "1 per day", "twice daily"), and the duration (e.g., "30 days", "as needed").
Also extract the full, raw text from the prescription.
Return the extracted information in a JSON format. The JSON object should have two keys: "medicines" and "rawText".
The "medicines" key should be an array of objects, where each object represents a medicine and has the following keys: "id", "name", "dosage", "frequency", "duration".
The "rawText" key should contain the full transcribed text from the image.
If any information for a field is not available, return an empty string for that field.
For the 'id' field, generate a unique random string for each medicine."#;

pub fn verification_prompt(medicines: &[Medicine]) -> String {
    let list = medicines
        .iter()
        .map(|m| format!("- {} ({})", m.name, m.dosage))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        r#"As a clinical pharmacist AI, analyze the following list of medications for potential issues.
The list is:
{list}

Your tasks are:
1. Identify any potential drug-drug interactions between these medications.
2. Flag any dosages that seem unusually high or low for standard adult use.
3. Consolidate your findings into a clear, concise list of warnings for the patient.

Return the results in a JSON format. The JSON object should have one key: "warnings".
The "warnings" key should be an array of strings, where each string is a specific warning.
For example: "Potential interaction between [Drug A] and [Drug B]. Consult your doctor." or "The dosage for [Drug C] appears high. Please verify with your healthcare provider."

If you find no issues, return an empty "warnings" array."#
    )
}

pub fn medication_info_prompt(name: &str) -> String {
    format!(
        r#"Provide a brief, patient-friendly summary for the medication: "{name}".
The summary should be easy to understand for a non-medical person.
Include the following sections:
1.  **Common Uses:** What is it generally prescribed for?
2.  **Important Note:** One single, most critical side effect or warning to be aware of.

Keep the entire response under 100 words and format it as a single block of text, using markdown for bolding section titles."#
    )
}
