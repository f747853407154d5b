//! Prompt templates for the planner features
//!
//! Templates use plain `format!()` interpolation. Inputs are inserted
//! verbatim; nothing is escaped or truncated here.

/// Build the day-of timeline prompt from the assembled intake context.
///
/// `reference_example` is an existing timeline used only as a model for
/// structure and tone. A missing or blank example drops that block entirely.
///
/// # Example
/// ```
/// use bouquet::llm::prompts::timeline_prompt;
///
/// let prompt = timeline_prompt("Ceremony at 4pm in the garden", None);
/// assert!(prompt.contains("Ceremony at 4pm"));
/// assert!(!prompt.contains("Reference timeline"));
/// ```
pub fn timeline_prompt(context: &str, reference_example: Option<&str>) -> String {
    let reference = match reference_example.map(str::trim) {
        Some(example) if !example.is_empty() => format!(
            r#"
Reference timeline (use it to model the structure, tone, and formatting, not its content):
---
{example}
---
"#
        ),
        _ => String::new(),
    };

    format!(
        r#"You are a professional wedding planner AI assistant.

Below is the intake information collected for this wedding: planning documents, meeting transcripts, and the couple's instructions.
---
{context}
---
{reference}
Using this information, create a detailed Day-of Wedding Timeline.

Requirements:
- Give every entry a time, the activity, and a brief note on who is involved or what to prepare.
- Follow the parameters from the intake (hair and makeup, first look, ceremony, cocktail hour, dinner, speeches, exit).
- Where the intake is silent, propose sensible times and mark them as suggestions.
- Organize the day under clear headers, using bullet points or a table.

Return only the timeline, formatted as a polished, professional schedule."#
    )
}

/// Opening turn of a chat session: a short, warm greeting.
pub fn chat_first_turn_prompt(message: &str) -> String {
    format!(
        r#"You are a warm, friendly wedding planner chatbot.
Greet the user casually and kindly.
Keep the message short and natural (2-3 lines max).

User: {message}"#
    )
}

/// Every turn after the first: the detailed planner persona.
pub fn chat_follow_up_prompt(message: &str) -> String {
    format!(
        r#"You are an expert wedding planner chatbot assistant.
Be friendly, creative, and detail-oriented.

The user may ask about:
- Wedding timeline suggestions
- Venue ideas
- Budget planning
- Vendor coordination
- Decoration themes
- Guest management
- Bridal preparation or schedule
- Dietary restrictions
- Wrap-up & exit

Always reply naturally, as if chatting with a couple planning their big day.

User: {message}"#
    )
}

/// Ask the assistant to review a file the user dropped into the chat.
pub fn file_analysis_prompt(file_name: &str, text: &str) -> String {
    format!(
        r#"You are an expert wedding planner chatbot assistant.
The couple just shared a file named "{file_name}". Its extracted content is below.
---
{text}
---

Summarize what the file covers in a few sentences, then point out anything that matters for planning: dates and times, vendors, costs, guest counts, dietary needs, or open questions to follow up on.
Reply in a friendly, conversational tone."#
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timeline_prompt_embeds_context_between_markers() {
        let prompt = timeline_prompt("### Document 1: intake.pdf\nCeremony at 4pm", None);
        assert!(prompt.contains("---\n### Document 1: intake.pdf\nCeremony at 4pm\n---"));
        assert!(prompt.contains("Day-of Wedding Timeline"));
        assert!(prompt.starts_with("You are a professional wedding planner"));
    }

    #[test]
    fn test_timeline_prompt_includes_reference_when_present() {
        let prompt = timeline_prompt("context", Some("2:00 PM - Hair and makeup"));
        assert!(prompt.contains("Reference timeline"));
        assert!(prompt.contains("2:00 PM - Hair and makeup"));

        let context_at = prompt.find("context").unwrap();
        let reference_at = prompt.find("Reference timeline").unwrap();
        assert!(context_at < reference_at);
    }

    #[test]
    fn test_timeline_prompt_drops_blank_reference() {
        let without = timeline_prompt("context", None);
        let blank = timeline_prompt("context", Some("  \n "));
        assert_eq!(without, blank);
        assert!(!blank.contains("Reference timeline"));
    }

    #[test]
    fn test_chat_prompts_differ_by_turn() {
        let first = chat_first_turn_prompt("Hello!");
        let later = chat_follow_up_prompt("What about venues?");

        assert!(first.contains("2-3 lines"));
        assert!(first.ends_with("User: Hello!"));
        assert!(!first.contains("Venue ideas"));

        assert!(later.contains("Venue ideas"));
        assert!(later.contains("Dietary restrictions"));
        assert!(later.ends_with("User: What about venues?"));
    }

    #[test]
    fn test_file_analysis_prompt_names_file() {
        let prompt = file_analysis_prompt("vendors.csv", "Florist  1200");
        assert!(prompt.contains("\"vendors.csv\""));
        assert!(prompt.contains("Florist  1200"));
    }
}
