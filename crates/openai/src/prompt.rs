//! Prompt text sent to the language model.

/// Persona the model speaks as for every script.
pub const SYSTEM_PROMPT: &str = "You are an experienced meditation guide creating calming, \
therapeutic meditation scripts. You excel at incorporating natural sounds and specific \
emotional themes into your guided meditations.";

/// Sampling temperature: enough variety between scripts while staying coherent.
pub const TEMPERATURE: f32 = 0.7;

/// Parameters of one script.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScriptRequest<'a> {
    pub duration: i32,
    pub feeling: &'a str,
    pub style: &'a str,
    pub prompt: &'a str,
    pub sounds: &'a str,
}

/// Build the user instruction for a script.
///
/// Empty `prompt` or `sounds` still produce their labelled lines.
pub fn build_user_prompt(req: &ScriptRequest<'_>) -> String {
    let ScriptRequest {
        duration,
        feeling,
        style,
        prompt,
        sounds,
    } = *req;

    format!(
        "Create a {duration}-minute {style} meditation focused on {feeling}.\n\
         Additional context: {prompt}\n\
         Ambient sounds to incorporate: {sounds}\n\
         \n\
         The meditation should:\n\
         - Be calming and guided\n\
         - Include breathing exercises\n\
         - Naturally incorporate the specified ambient sounds\n\
         - Follow the specific style ({style})\n\
         - Address the emotional focus ({feeling})\n\
         \n\
         Format the response as a natural, flowing meditation script."
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> ScriptRequest<'static> {
        ScriptRequest {
            duration: 10,
            feeling: "anxiety",
            style: "breathing",
            prompt: "After a long day",
            sounds: "rain",
        }
    }

    #[test]
    fn opening_line_names_duration_style_and_feeling() {
        let text = build_user_prompt(&request());
        assert!(text.starts_with("Create a 10-minute breathing meditation focused on anxiety.\n"));
    }

    #[test]
    fn includes_context_sounds_and_requirements() {
        let text = build_user_prompt(&request());
        assert!(text.contains("Additional context: After a long day\n"));
        assert!(text.contains("Ambient sounds to incorporate: rain\n"));
        assert!(text.contains("- Be calming and guided"));
        assert!(text.contains("- Include breathing exercises"));
        assert!(text.contains("- Follow the specific style (breathing)"));
        assert!(text.contains("- Address the emotional focus (anxiety)"));
    }

    #[test]
    fn empty_extras_keep_their_labels() {
        let req = ScriptRequest {
            prompt: "",
            sounds: "",
            ..request()
        };
        let text = build_user_prompt(&req);
        assert!(text.contains("Additional context: \n"));
        assert!(text.contains("Ambient sounds to incorporate: \n"));
    }
}
