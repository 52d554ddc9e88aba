use regex::Regex;

/// Validate the shape of a Brazilian CEP.
///
/// Accepts exactly five digits, an optional literal hyphen, then exactly
/// three digits (`NNNNN-NNN` or `NNNNNNNN`). The value is not normalized:
/// a hyphen, when present, is preserved when the CEP is forwarded.
pub fn is_valid_cep(cep: &str) -> bool {
    let pattern = Regex::new(r"^\d{5}-?\d{3}$").unwrap();
    pattern.is_match(cep)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_hyphenated_and_plain_forms() {
        assert!(is_valid_cep("01310-100"));
        assert!(is_valid_cep("01310100"));
    }

    #[test]
    fn rejects_wrong_lengths() {
        assert!(!is_valid_cep(""));
        assert!(!is_valid_cep("123"));
        assert!(!is_valid_cep("0131-100"));
        assert!(!is_valid_cep("013101000"));
        assert!(!is_valid_cep("01310-1000"));
    }

    #[test]
    fn rejects_non_digits() {
        assert!(!is_valid_cep("abcde-123"));
        assert!(!is_valid_cep("01310-10a"));
        assert!(!is_valid_cep("01310 100"));
    }

    #[test]
    fn rejects_misplaced_or_repeated_hyphens() {
        assert!(!is_valid_cep("013-10100"));
        assert!(!is_valid_cep("01310--100"));
        assert!(!is_valid_cep("-01310100"));
        assert!(!is_valid_cep("01310100-"));
    }
}
