//! Client (buyer) extraction.

use super::patterns::{CLIENT_RULES, ICO_FRAGMENT, LEADING_NON_WORD};
use super::{ExtractionMatch, FieldExtractor, RuleTable};

/// Extract the client name from the buyer block.
pub fn extract_client(text: &str) -> Option<ExtractionMatch<String>> {
    RuleTable::new(&CLIENT_RULES).extract(text)
}

/// Strip `IČO: <digits>` fragments and leading punctuation from a captured client name.
///
/// Names of 3 characters or fewer, or of 200 or more, are rejected.
pub fn clean_client_name(raw: &str) -> Option<String> {
    let name = ICO_FRAGMENT.replace_all(raw.trim(), "");
    let name = LEADING_NON_WORD.replace(name.trim(), "");
    let name = name.trim();

    let len = name.chars().count();
    (len > 3 && len < 200).then(|| name.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(text: &str) -> Option<String> {
        extract_client(text).map(|m| m.value)
    }

    #[test]
    fn test_client_three_lines_below_label() {
        assert_eq!(
            client("Odběratel:\nFoo\nBar\nAcme s.r.o."),
            Some("Acme s.r.o.".to_string())
        );
    }

    #[test]
    fn test_client_on_label_line() {
        let text = "Odběratel: Beta a.s.\nIČO: 12345678\nPraha 4\nCZ";
        assert_eq!(client(text), Some("Beta a.s.".to_string()));
    }

    #[test]
    fn test_client_one_line_below() {
        let text = "Odběratel:\n- Gamma spol. s r.o.\nNa Příkopě 1\n";
        assert_eq!(client(text), Some("Gamma spol.".to_string()));
    }

    #[test]
    fn test_english_buyer() {
        let text = "Buyer:\nContoso Ltd.\n1 Main Street";
        assert_eq!(client(text), Some("Contoso Ltd.".to_string()));
    }

    #[test]
    fn test_generic_client_line_strips_ico() {
        let text = "Client: Delta Consulting IČO: 87654321";
        assert_eq!(client(text), Some("Delta Consulting".to_string()));
    }

    #[test]
    fn test_clean_client_name() {
        assert_eq!(
            clean_client_name("  :: Acme s.r.o. IČO: 123"),
            Some("Acme s.r.o.".to_string())
        );
        assert_eq!(clean_client_name("— ab"), None);
        assert_eq!(clean_client_name(&"x".repeat(200)), None);
    }

    #[test]
    fn test_no_client() {
        assert_eq!(client("Dodavatel: Seller s.r.o."), None);
    }
}
