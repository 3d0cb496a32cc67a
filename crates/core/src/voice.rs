//! Voice keys accepted by the API and the synthesis-provider voices they map to.
//!
//! Callers pick a short key (`"brittney"`, `"ryan"`); the pipeline resolves it
//! to a provider voice identifier right before audio synthesis.

/// A caller-facing voice key and the provider voice it selects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Voice {
    pub key: &'static str,
    pub provider_id: &'static str,
}

/// Every voice key the service knows about.
pub const VOICES: &[Voice] = &[
    Voice {
        key: "brittney",
        provider_id: "pjcYQlDFKMbcOUp6F5GD",
    },
    Voice {
        key: "ryan",
        provider_id: "pjcYQlDFKMbcOUp6F5GD",
    },
];

/// Resolve a voice key to its provider voice identifier.
///
/// Returns `None` for unmapped keys; the caller decides how that fails.
pub fn provider_voice_id(key: &str) -> Option<&'static str> {
    VOICES
        .iter()
        .find(|voice| voice.key == key)
        .map(|voice| voice.provider_id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_keys_resolve() {
        assert_eq!(provider_voice_id("brittney"), Some("pjcYQlDFKMbcOUp6F5GD"));
        assert_eq!(provider_voice_id("ryan"), Some("pjcYQlDFKMbcOUp6F5GD"));
    }

    #[test]
    fn unknown_key_is_none() {
        assert_eq!(provider_voice_id("morgan"), None);
    }

    #[test]
    fn lookup_is_case_sensitive() {
        assert_eq!(provider_voice_id("Brittney"), None);
    }
}
