use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct TranslationEntry {
    pub context: String,

    pub source_text: String,

    #[serde(default)]
    pub translation: String,

    #[serde(default)]
    pub status: EntryStatus,

    #[serde(default)]
    pub disambiguation: Option<String>,

    /// Plural forms for `numerus="yes"` messages; `translation` mirrors the first one.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub numerus_forms: Vec<String>,

    #[serde(default)]
    pub extra_comment: Option<String>,

    #[serde(default)]
    pub translator_comment: Option<String>,

    #[serde(default)]
    pub locations: Vec<Location>,
}

impl TranslationEntry {
    pub fn key(&self) -> MessageKey {
        MessageKey::new(
            self.context.as_str(),
            self.source_text.as_str(),
            self.disambiguation.as_deref(),
        )
    }

    pub fn is_numerus(&self) -> bool {
        !self.numerus_forms.is_empty()
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum EntryStatus {
    Finished,
    Unfinished,
    Vanished,
    Obsolete,
}

impl EntryStatus {
    /// Finished and unfinished entries are still referenced by the source and may be surfaced.
    pub fn is_live(self) -> bool {
        matches!(self, EntryStatus::Finished | EntryStatus::Unfinished)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            EntryStatus::Finished => "finished",
            EntryStatus::Unfinished => "unfinished",
            EntryStatus::Vanished => "vanished",
            EntryStatus::Obsolete => "obsolete",
        }
    }
}

impl Default for EntryStatus {
    fn default() -> Self {
        EntryStatus::Finished
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Location {
    pub filename: String,

    #[serde(default)]
    pub line: Option<u32>,
}

/// Lookup tuple; unique within one catalog.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MessageKey {
    pub context: String,
    pub source_text: String,
    pub disambiguation: Option<String>,
}

impl MessageKey {
    pub fn new(context: &str, source_text: &str, disambiguation: Option<&str>) -> Self {
        MessageKey {
            context: context.to_string(),
            source_text: source_text.to_string(),
            disambiguation: disambiguation
                .filter(|d| !d.is_empty())
                .map(str::to_string),
        }
    }
}

impl std::fmt::Display for MessageKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.disambiguation {
            Some(d) => write!(f, "{}::{:?} ({d})", self.context, self.source_text),
            None => write!(f, "{}::{:?}", self.context, self.source_text),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_disambiguation_is_no_disambiguation() {
        assert_eq!(
            MessageKey::new("About", "Version %1", Some("")),
            MessageKey::new("About", "Version %1", None)
        );
    }

    #[test]
    fn status_serializes_snake_case() {
        let v = serde_json::to_value(EntryStatus::Unfinished).unwrap();
        assert_eq!(v, serde_json::json!("unfinished"));
        assert!(EntryStatus::Finished.is_live());
        assert!(!EntryStatus::Vanished.is_live());
        assert!(!EntryStatus::Obsolete.is_live());
    }
}
