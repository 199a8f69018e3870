//! Numerus form selection for `numerus="yes"` messages.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PluralRule {
    OneForm,
    TwoFormsSingularOne,
    TwoFormsSingularZeroOne,
    ThreeFormsSlavic,
    ThreeFormsPolish,
    ThreeFormsCzech,
}

impl PluralRule {
    /// Accepts `es`, `es_ES`, `pt-BR` and similar tags.
    pub fn for_language(tag: &str) -> Self {
        let tag = tag.trim().replace('-', "_").to_lowercase();
        let lang = tag.split('_').next().unwrap_or("");

        if tag == "pt_br" {
            return PluralRule::TwoFormsSingularZeroOne;
        }

        match lang {
            "ja" | "zh" | "ko" | "vi" | "th" | "id" | "ms" | "tr" | "ka" => PluralRule::OneForm,
            "fr" | "fil" | "hy" => PluralRule::TwoFormsSingularZeroOne,
            "ru" | "uk" | "be" | "sr" | "hr" | "bs" => PluralRule::ThreeFormsSlavic,
            "pl" => PluralRule::ThreeFormsPolish,
            "cs" | "sk" => PluralRule::ThreeFormsCzech,
            _ => PluralRule::TwoFormsSingularOne,
        }
    }

    pub fn form_count(self) -> usize {
        match self {
            PluralRule::OneForm => 1,
            PluralRule::TwoFormsSingularOne | PluralRule::TwoFormsSingularZeroOne => 2,
            PluralRule::ThreeFormsSlavic
            | PluralRule::ThreeFormsPolish
            | PluralRule::ThreeFormsCzech => 3,
        }
    }

    pub fn form_index(self, n: u64) -> usize {
        let few = |n: u64| (2..=4).contains(&(n % 10)) && !(12..=14).contains(&(n % 100));

        match self {
            PluralRule::OneForm => 0,
            PluralRule::TwoFormsSingularOne => usize::from(n != 1),
            PluralRule::TwoFormsSingularZeroOne => usize::from(n > 1),
            PluralRule::ThreeFormsSlavic => {
                if n % 10 == 1 && n % 100 != 11 {
                    0
                } else if few(n) {
                    1
                } else {
                    2
                }
            }
            PluralRule::ThreeFormsPolish => {
                if n == 1 {
                    0
                } else if few(n) {
                    1
                } else {
                    2
                }
            }
            PluralRule::ThreeFormsCzech => match n {
                1 => 0,
                2..=4 => 1,
                _ => 2,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn language_tags_map_to_rules() {
        assert_eq!(PluralRule::for_language("es_ES"), PluralRule::TwoFormsSingularOne);
        assert_eq!(PluralRule::for_language("pt-BR"), PluralRule::TwoFormsSingularZeroOne);
        assert_eq!(PluralRule::for_language("pt_PT"), PluralRule::TwoFormsSingularOne);
        assert_eq!(PluralRule::for_language("ja"), PluralRule::OneForm);
        assert_eq!(PluralRule::for_language("ru_RU"), PluralRule::ThreeFormsSlavic);
        assert_eq!(PluralRule::for_language(""), PluralRule::TwoFormsSingularOne);
    }

    #[test]
    fn slavic_forms() {
        let r = PluralRule::ThreeFormsSlavic;
        assert_eq!(r.form_index(1), 0);
        assert_eq!(r.form_index(21), 0);
        assert_eq!(r.form_index(11), 2);
        assert_eq!(r.form_index(3), 1);
        assert_eq!(r.form_index(13), 2);
        assert_eq!(r.form_index(5), 2);
    }

    #[test]
    fn polish_and_czech_forms() {
        assert_eq!(PluralRule::ThreeFormsPolish.form_index(1), 0);
        assert_eq!(PluralRule::ThreeFormsPolish.form_index(22), 1);
        assert_eq!(PluralRule::ThreeFormsPolish.form_index(21), 2);
        assert_eq!(PluralRule::ThreeFormsCzech.form_index(4), 1);
        assert_eq!(PluralRule::ThreeFormsCzech.form_index(22), 2);
    }

    #[test]
    fn french_treats_zero_as_singular() {
        assert_eq!(PluralRule::TwoFormsSingularZeroOne.form_index(0), 0);
        assert_eq!(PluralRule::TwoFormsSingularOne.form_index(0), 1);
    }
}
