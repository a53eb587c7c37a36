use crate::catalog::TrickyCase;
use crate::error::LintError;

/// Report each catalog pattern found anywhere in `text`.
///
/// At most one finding per pattern, in catalog order. The whole block is
/// searched, comments included.
pub fn scan_patterns(text: &str, catalog: &[TrickyCase]) -> Vec<LintError> {
    catalog
        .iter()
        .filter(|case| case.matches(text))
        .map(|case| LintError::TrickyCase(case.pattern.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::default_catalog;

    fn scan(text: &str) -> Vec<String> {
        scan_patterns(text, &default_catalog())
            .iter()
            .map(|e| e.to_string())
            .collect()
    }

    #[test]
    fn null_check_is_exempt() {
        assert!(scan("if (this == null) {\n}").is_empty());
    }

    #[test]
    fn loose_equality_is_reported() {
        assert_eq!(
            scan("if (this == 'x') {\n}"),
            vec!["\" == \" found in JavaScript!"]
        );
    }

    #[test]
    fn one_finding_per_pattern() {
        assert_eq!(
            scan("self.a = 1;\nself.b = 2;\n"),
            vec!["\"self.\" found in JavaScript!"]
        );
    }

    #[test]
    fn findings_follow_catalog_order() {
        assert_eq!(
            scan("alien.y = alien.x; // self."),
            vec![
                "\"self.\" found in JavaScript!",
                "\".x\" found in JavaScript!",
                "\".y\" found in JavaScript!",
            ]
        );
    }

    #[test]
    fn empty_catalog_finds_nothing() {
        assert!(scan_patterns("self.x", &[]).is_empty());
    }
}
