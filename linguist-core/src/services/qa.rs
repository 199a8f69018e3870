use std::collections::BTreeSet;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::model::catalog::Catalog;
use crate::model::entry::{EntryStatus, TranslationEntry};
use crate::services::plural::PluralRule;

// %1..%99, %n, and their localized %L forms.
static PLACEHOLDER: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"%L?(\d{1,2}|n)").unwrap());

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct QaIssue {
    pub context: String,
    pub source_text: String,
    #[serde(default)]
    pub disambiguation: Option<String>,
    pub code: String,
    pub message: String,
}

/// `language_id` picks the plural rule when the document declares no language.
pub fn run(catalog: &Catalog, language_id: &str) -> Vec<QaIssue> {
    let mut issues: Vec<QaIssue> = Vec::new();
    let rule = PluralRule::for_language(catalog.language().unwrap_or(language_id));

    for e in catalog.entries() {
        // Superseded entries are never shown, nothing to check.
        if !e.status.is_live() {
            continue;
        }

        let mut push = |code: &str, message: String| {
            issues.push(QaIssue {
                context: e.context.clone(),
                source_text: e.source_text.clone(),
                disambiguation: e.disambiguation.clone(),
                code: code.to_string(),
                message,
            });
        };

        let translation_trim = e.translation.trim();

        if translation_trim.is_empty() {
            match e.status {
                EntryStatus::Finished => push(
                    "FINISHED_BUT_EMPTY",
                    "marked finished but the translation is empty".to_string(),
                ),
                _ => push("UNFINISHED", "no translation yet".to_string()),
            }
            // Nothing else is meaningful without text.
            continue;
        }

        if translation_trim == e.source_text.trim() {
            push(
                "SAME_AS_SOURCE",
                "translation is identical to the source text".to_string(),
            );
        }

        for text in translations(e) {
            let expected = placeholders(&e.source_text);
            let found = placeholders(text);
            if expected != found {
                push(
                    "PLACEHOLDER_MISMATCH",
                    format!("expected placeholders {expected:?}, found {found:?}"),
                );
                break;
            }
        }

        if e.is_numerus() && e.numerus_forms.len() != rule.form_count() {
            push(
                "NUMERUS_FORM_COUNT",
                format!(
                    "expected {} plural forms, found {}",
                    rule.form_count(),
                    e.numerus_forms.len()
                ),
            );
        }

        if has_mnemonic(&e.source_text) != has_mnemonic(&e.translation) {
            push(
                "ACCELERATOR_MISMATCH",
                "keyboard accelerator (&) present in only one of source and translation"
                    .to_string(),
            );
        }
    }

    issues
}

fn translations(e: &TranslationEntry) -> Vec<&str> {
    if e.is_numerus() {
        e.numerus_forms.iter().map(String::as_str).collect()
    } else {
        vec![e.translation.as_str()]
    }
}

fn placeholders(text: &str) -> BTreeSet<String> {
    PLACEHOLDER
        .captures_iter(text)
        .filter_map(|c| c.get(1).map(|m| m.as_str().to_string()))
        .collect()
}

/// `&` followed by a visible character; `&&` is a literal ampersand.
fn has_mnemonic(text: &str) -> bool {
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        if c != '&' {
            continue;
        }
        match chars.peek() {
            Some('&') => {
                chars.next();
            }
            Some(next) if !next.is_whitespace() => return true,
            _ => {}
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parsers::ts;

    fn codes(doc: &str) -> Vec<String> {
        run(&ts::parse(doc).unwrap(), "es").into_iter().map(|i| i.code).collect()
    }

    fn wrap(messages: &str) -> String {
        format!("<TS language=\"es\"><context><name>Main</name>{messages}</context></TS>")
    }

    #[test]
    fn clean_catalog_has_no_issues() {
        let doc = wrap("<message><source>&amp;Open %1</source><translation>&amp;Abrir %1</translation></message>");
        assert!(codes(&doc).is_empty());
    }

    #[test]
    fn empty_translations_are_reported_by_status() {
        let doc = wrap(
            "<message><source>A</source><translation></translation></message>\
             <message><source>B</source><translation type=\"unfinished\"></translation></message>",
        );
        assert_eq!(codes(&doc), vec!["FINISHED_BUT_EMPTY", "UNFINISHED"]);
    }

    #[test]
    fn placeholder_mismatch_is_reported() {
        let doc = wrap("<message><source>Line %1 of %2</source><translation>Línea %1</translation></message>");
        assert_eq!(codes(&doc), vec!["PLACEHOLDER_MISMATCH"]);
    }

    #[test]
    fn localized_placeholder_counts_as_same() {
        let doc = wrap("<message><source>%1 files</source><translation>%L1 archivos</translation></message>");
        assert!(codes(&doc).is_empty());
    }

    #[test]
    fn accelerator_and_same_as_source() {
        let doc = wrap(
            "<message><source>&amp;Help</source><translation>Ayuda</translation></message>\
             <message><source>OK</source><translation>OK</translation></message>",
        );
        assert_eq!(codes(&doc), vec!["ACCELERATOR_MISMATCH", "SAME_AS_SOURCE"]);
    }

    #[test]
    fn vanished_entries_are_skipped() {
        let doc = wrap("<message><source>Old %1</source><translation type=\"vanished\">Viejo</translation></message>");
        assert!(codes(&doc).is_empty());
    }

    #[test]
    fn literal_ampersand_is_not_a_mnemonic() {
        assert!(!has_mnemonic("Save && Quit"));
        assert!(!has_mnemonic("Tom & Jerry"));
        assert!(has_mnemonic("&File"));
    }

    #[test]
    fn numerus_form_count_follows_language() {
        let es = wrap(
            "<message numerus=\"yes\"><source>%n file(s)</source>\
             <translation><numerusform>%n archivo</numerusform><numerusform>%n archivos</numerusform></translation></message>",
        );
        assert!(codes(&es).is_empty());

        let ru = "<TS><context><name>Main</name>\
            <message numerus=\"yes\"><source>%n file(s)</source>\
            <translation><numerusform>%n файл</numerusform><numerusform>%n файла</numerusform></translation></message>\
            </context></TS>";
        let issues = run(&ts::parse(ru).unwrap(), "ru_RU");
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].code, "NUMERUS_FORM_COUNT");
    }
}
