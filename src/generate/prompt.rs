use crate::facts::Facts;

/// Cap on common names included in the prompt.
const MAX_COMMON_NAMES: usize = 5;
/// Cap on host plants included in the prompt.
const MAX_HOSTS: usize = 10;

/// System prompt framing the model as an agricultural advisor grounded in
/// EPPO data.
pub const SYSTEM_PROMPT: &str = "\
You are an expert plant pathologist and agricultural advisor. Your expertise \
includes disease diagnosis, treatment protocols, and integrated pest management.

Your communication style:
- Clear, concise, and action-oriented
- Use simple language accessible to farmers and gardeners
- Provide specific, practical advice, including dosages, timing, and \
application methods when relevant
- Acknowledge limitations or uncertainties honestly

Your response structure:
1. Confirmation: state clearly if the prediction matches the EPPO data (Yes/No plus reasoning)
2. Disease overview: cause, symptoms, and impact in 2-3 sentences
3. Treatment: 3-5 concrete actions with implementation details
4. Prevention: 3-5 preventive measures in priority order

Never include unverified information that is not supported by the EPPO data, \
and never recommend products without naming active ingredients.";

/// Renders `facts` into the prompt's evidence block.
///
/// Returns an empty string when the facts carry no text at all; callers
/// treat that as "nothing to generate from".
pub fn format_facts(facts: &Facts) -> String {
    let mut parts: Vec<String> = Vec::new();

    if let Some(name) = &facts.preferred_name {
        parts.push(format!("Disease/Pest: {name}"));
    }
    if !facts.eppocode.is_empty() && facts.preferred_name.is_some() {
        parts.push(format!("EPPO Code: {}", facts.eppocode));
    }

    if !facts.common_names.is_empty() {
        let names: Vec<&str> = facts
            .common_names
            .iter()
            .take(MAX_COMMON_NAMES)
            .map(String::as_str)
            .collect();
        parts.push(format!("Also known as: {}", names.join(", ")));
    }

    if !facts.hosts.is_empty() {
        let hosts: Vec<String> = facts
            .hosts
            .iter()
            .take(MAX_HOSTS)
            .map(|h| match &h.class_label {
                Some(label) => format!("{} ({label})", h.name),
                None => h.name.clone(),
            })
            .collect();
        parts.push(format!("Commonly affects: {}", hosts.join(", ")));
    }

    parts.join("\n")
}

/// Builds the user message for one diagnosis request.
pub fn build_user_prompt(label: &str, formatted_facts: &str) -> String {
    format!(
        "Vision Model Prediction: \"{label}\"\n\n\
         === EPPO DATABASE INFORMATION ===\n\
         {formatted_facts}\n\n\
         === YOUR TASK ===\n\
         Analyze the prediction against the EPPO data and respond with the \
         four sections from your instructions: confirmation, disease \
         overview, treatment options in order of effectiveness, and \
         prevention strategies in priority order. Keep each section concise \
         (3-5 bullet points) and focus on what farmers can DO."
    )
}
