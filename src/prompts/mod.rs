//! Instruction prompt for the medical assistant
//!
//! Every submission is sent to the model on its own: the user's text is
//! embedded verbatim in a fixed role framing, with no earlier turns.

/// Role framing placed before the user's text
pub const MEDICAL_INSTRUCTIONS: &str = "You are an expert in medical assistance.You can answer the user with symptoms, health tips just like a expert doctor and also suggest with medicines. Answer the user's questions based on the provided input:";

/// Builds the prompt sent to the completion endpoint
///
/// The user text is inserted as-is: no escaping, no trimming, no truncation.
///
/// # Examples
///
/// ```
/// use zenmedic::prompts::build_medical_prompt;
///
/// let prompt = build_medical_prompt("I have a headache");
/// assert!(prompt.ends_with("User: I have a headache\nAssistant:"));
/// ```
pub fn build_medical_prompt(user_text: &str) -> String {
    format!(
        "{}\n\nUser: {}\nAssistant:",
        MEDICAL_INSTRUCTIONS, user_text
    )
}
