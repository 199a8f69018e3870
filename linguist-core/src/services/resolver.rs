use crate::model::catalog::Catalog;
use crate::model::entry::TranslationEntry;
use crate::services::plural::PluralRule;

/// Answers lookups against a single catalog. Never fails: anything that
/// can't be translated comes back as the source text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Resolver {
    /// When set, a live entry with an empty translation falls back to the source text.
    pub treat_empty_as_missing: bool,
}

impl Resolver {
    pub fn new(treat_empty_as_missing: bool) -> Self {
        Resolver {
            treat_empty_as_missing,
        }
    }

    pub fn resolve(
        &self,
        catalog: &Catalog,
        context: &str,
        source_text: &str,
        disambiguation: Option<&str>,
    ) -> String {
        match self.usable(catalog, context, source_text, disambiguation) {
            Some(e) => e.translation.clone(),
            None => source_text.to_string(),
        }
    }

    /// Picks the numerus form for `n`, then substitutes `%n`. The plural
    /// rule follows the document's `language` attribute, or `language_id`
    /// when the document declares none.
    pub fn resolve_plural(
        &self,
        catalog: &Catalog,
        language_id: &str,
        context: &str,
        source_text: &str,
        disambiguation: Option<&str>,
        n: u64,
    ) -> String {
        let text = match self.usable(catalog, context, source_text, disambiguation) {
            Some(e) if e.is_numerus() => {
                let rule = PluralRule::for_language(catalog.language().unwrap_or(language_id));
                let idx = rule.form_index(n).min(e.numerus_forms.len() - 1);
                let form = &e.numerus_forms[idx];
                if form.is_empty() && self.treat_empty_as_missing {
                    source_text
                } else {
                    form.as_str()
                }
            }
            Some(e) => e.translation.as_str(),
            None => source_text,
        };

        text.replace("%n", &n.to_string())
    }

    fn usable<'c>(
        &self,
        catalog: &'c Catalog,
        context: &str,
        source_text: &str,
        disambiguation: Option<&str>,
    ) -> Option<&'c TranslationEntry> {
        catalog
            .lookup(context, source_text, disambiguation)
            .filter(|e| e.status.is_live())
            // Numerus entries are checked per selected form in `resolve_plural`.
            .filter(|e| !(self.treat_empty_as_missing && !e.is_numerus() && e.translation.is_empty()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parsers::ts;

    const DOC: &str = r#"<TS version="2.1" language="es_ES">
<context>
    <name>About</name>
    <message><source>About Cppcheck</source><translation>Acerca de Cppcheck</translation></message>
    <message><source>Version %1</source><translation type="unfinished"></translation></message>
    <message><source>Close</source><translation type="unfinished">Cerrar</translation></message>
</context>
<context>
    <name>ResultsTree</name>
    <message><source>File</source><translation type="vanished">Archivo</translation></message>
    <message><source>Line</source><translation type="obsolete">Línea</translation></message>
    <message><source>Open</source><comment>verb</comment><translation>Abrir</translation></message>
    <message><source>Open</source><comment>adjective</comment><translation>Abierto</translation></message>
    <message numerus="yes">
        <source>%n error(s)</source>
        <translation><numerusform>%n error</numerusform><numerusform>%n errores</numerusform></translation>
    </message>
</context>
</TS>"#;

    fn catalog() -> Catalog {
        ts::parse(DOC).unwrap()
    }

    #[test]
    fn finished_translation_is_returned() {
        let r = Resolver::default();
        assert_eq!(r.resolve(&catalog(), "About", "About Cppcheck", None), "Acerca de Cppcheck");
    }

    #[test]
    fn unfinished_translation_is_returned() {
        let r = Resolver::default();
        assert_eq!(r.resolve(&catalog(), "About", "Close", None), "Cerrar");
    }

    #[test]
    fn empty_translation_by_default_is_returned_empty() {
        let r = Resolver::default();
        assert_eq!(r.resolve(&catalog(), "About", "Version %1", None), "");
    }

    #[test]
    fn empty_translation_falls_back_when_treated_as_missing() {
        let r = Resolver::new(true);
        assert_eq!(r.resolve(&catalog(), "About", "Version %1", None), "Version %1");
        assert_eq!(r.resolve(&catalog(), "About", "Close", None), "Cerrar");
    }

    #[test]
    fn vanished_and_obsolete_fall_back_to_source() {
        let r = Resolver::default();
        let cat = catalog();
        assert_eq!(r.resolve(&cat, "ResultsTree", "File", None), "File");
        assert_eq!(r.resolve(&cat, "ResultsTree", "Line", None), "Line");
    }

    #[test]
    fn unknown_message_falls_back_to_source() {
        let r = Resolver::default();
        assert_eq!(r.resolve(&catalog(), "Nonexistent", "Nothing", None), "Nothing");
    }

    #[test]
    fn disambiguation_never_crosses_over() {
        let r = Resolver::default();
        let cat = catalog();
        assert_eq!(r.resolve(&cat, "ResultsTree", "Open", Some("verb")), "Abrir");
        assert_eq!(r.resolve(&cat, "ResultsTree", "Open", Some("adjective")), "Abierto");
        assert_eq!(r.resolve(&cat, "ResultsTree", "Open", Some("noun")), "Open");
        assert_eq!(r.resolve(&cat, "ResultsTree", "Open", None), "Open");
    }

    #[test]
    fn plural_picks_form_and_substitutes_count() {
        let r = Resolver::default();
        let cat = catalog();
        assert_eq!(r.resolve_plural(&cat, "es_ES", "ResultsTree", "%n error(s)", None, 1), "1 error");
        assert_eq!(r.resolve_plural(&cat, "es_ES", "ResultsTree", "%n error(s)", None, 7), "7 errores");
    }

    #[test]
    fn plural_fallback_substitutes_count_in_source() {
        let r = Resolver::default();
        assert_eq!(
            r.resolve_plural(&catalog(), "es_ES", "ResultsTree", "%n warning(s)", None, 3),
            "3 warning(s)"
        );
    }

    const RU_NO_LANGUAGE: &str = r#"<TS version="2.1">
<context>
    <name>Main</name>
    <message numerus="yes">
        <source>%n file(s)</source>
        <translation>
            <numerusform>%n файл</numerusform>
            <numerusform>%n файла</numerusform>
            <numerusform>%n файлов</numerusform>
        </translation>
    </message>
</context>
</TS>"#;

    #[test]
    fn plural_rule_comes_from_load_id_without_language_attribute() {
        let cat = ts::parse(RU_NO_LANGUAGE).unwrap();
        assert_eq!(cat.language(), None);

        let r = Resolver::default();
        assert_eq!(r.resolve_plural(&cat, "ru_RU", "Main", "%n file(s)", None, 1), "1 файл");
        assert_eq!(r.resolve_plural(&cat, "ru_RU", "Main", "%n file(s)", None, 3), "3 файла");
        assert_eq!(r.resolve_plural(&cat, "ru_RU", "Main", "%n file(s)", None, 5), "5 файлов");
    }

    #[test]
    fn empty_first_form_does_not_hide_other_forms() {
        let doc = r#"<TS language="es_ES"><context><name>Main</name>
            <message numerus="yes"><source>%n file(s)</source>
                <translation type="unfinished"><numerusform></numerusform><numerusform>%n archivos</numerusform></translation>
            </message>
        </context></TS>"#;
        let cat = ts::parse(doc).unwrap();
        let r = Resolver::new(true);

        assert_eq!(r.resolve_plural(&cat, "es_ES", "Main", "%n file(s)", None, 3), "3 archivos");
        assert_eq!(r.resolve_plural(&cat, "es_ES", "Main", "%n file(s)", None, 1), "1 file(s)");
    }
}
