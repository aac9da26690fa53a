/// Parse `tesseract --list-langs` output.
///
/// The first line is a header (`List of available languages in "..." (N):`)
/// and is skipped along with blank lines.
pub fn parse_languages(output: &str) -> Vec<String> {
    output
        .lines()
        .skip(1)
        .map(|l| l.trim_end_matches('\r').trim())
        .filter(|l| !l.is_empty())
        .map(str::to_string)
        .collect()
}

/// Split a language list such as `eng+fra` into its codes
pub fn split_languages(langs: &str) -> impl Iterator<Item = &str> {
    langs.split('+').map(str::trim).filter(|code| !code.is_empty())
}

/// First code of `langs` missing from `available`
pub fn missing_language<'a>(langs: &'a str, available: &[String]) -> Option<&'a str> {
    split_languages(langs).find(|code| !available.iter().any(|l| l == code))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_languages_skips_header() {
        let out = "List of available languages in \"/usr/share/tessdata/\" (3):\neng\nfra\nosd\n";
        assert_eq!(parse_languages(out), vec!["eng", "fra", "osd"]);
    }

    #[test]
    fn test_parse_languages_crlf() {
        let out = "List of available languages (2):\r\neng\r\n\r\njpn\r\n";
        assert_eq!(parse_languages(out), vec!["eng", "jpn"]);
    }

    #[test]
    fn test_parse_languages_header_only() {
        assert!(parse_languages("List of available languages (0):\n").is_empty());
        assert!(parse_languages("").is_empty());
    }

    #[test]
    fn test_missing_language_checks_each_code() {
        let available = vec!["eng".to_string(), "fra".to_string()];
        assert_eq!(missing_language("eng+fra", &available), None);
        assert_eq!(missing_language("eng+deu", &available), Some("deu"));
        assert_eq!(missing_language("invalid", &available), Some("invalid"));
    }

    #[test]
    fn test_split_languages_ignores_empty_parts() {
        assert_eq!(split_languages("eng++fra+").collect::<Vec<_>>(), vec!["eng", "fra"]);
    }
}
