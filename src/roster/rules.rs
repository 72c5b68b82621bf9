//! Keyword to rule-text lookup.

use std::collections::BTreeMap;
use std::sync::OnceLock;

use regex::Regex;

/// Trailing numeric or dice value, e.g. " 2", " D3", " 4+".
fn value_suffix() -> &'static Regex {
    static SUFFIX: OnceLock<Regex> = OnceLock::new();
    SUFFIX.get_or_init(|| {
        Regex::new(r"(?i)\s(\d+|d\d+)(\+)?$").expect("static rule suffix pattern is valid")
    })
}

/// Find the rule text for a weapon or unit keyword.
///
/// Tries the keyword itself, then the keyword without its value
/// ("Sustained Hits 2" -> "sustained hits"), then the generic "anti-" rule
/// for any "Anti-X N+" keyword.
pub fn find_rule<'a>(rules: &'a BTreeMap<String, String>, keyword: &str) -> Option<&'a str> {
    let key = keyword.trim().to_lowercase();
    if key.is_empty() {
        return None;
    }

    if let Some(text) = rules.get(&key) {
        return Some(text);
    }

    let base = value_suffix().replace(&key, "");
    if let Some(text) = rules.get(base.trim()) {
        return Some(text);
    }

    if key.starts_with("anti-") {
        return rules.get("anti-").map(String::as_str);
    }

    None
}

/// Strip `**bold**` and `^^keyword^^` markers from rule text.
pub fn clean_rule_text(text: &str) -> String {
    text.replace("**", "").replace("^^", "")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rules() -> BTreeMap<String, String> {
        [
            ("sustained hits", "Extra hits on a Critical Hit."),
            ("rapid fire", "Extra attacks at half range."),
            ("lethal hits", "Critical Hits auto-wound."),
            ("anti-", "Critical Wound on X+."),
            ("heavy", "+1 to hit if Remained Stationary."),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
    }

    #[test]
    fn test_find_rule_exact() {
        let rules = rules();
        assert_eq!(
            find_rule(&rules, "Lethal Hits"),
            Some("Critical Hits auto-wound.")
        );
        assert_eq!(find_rule(&rules, "  HEAVY "), Some("+1 to hit if Remained Stationary."));
    }

    #[test]
    fn test_find_rule_strips_value_suffix() {
        let rules = rules();
        assert_eq!(
            find_rule(&rules, "Sustained Hits 2"),
            Some("Extra hits on a Critical Hit.")
        );
        assert_eq!(
            find_rule(&rules, "Rapid Fire D3"),
            Some("Extra attacks at half range.")
        );
        assert_eq!(
            find_rule(&rules, "Sustained Hits D6+"),
            Some("Extra hits on a Critical Hit.")
        );
    }

    #[test]
    fn test_find_rule_anti_prefix() {
        let rules = rules();
        assert_eq!(find_rule(&rules, "Anti-Infantry 4+"), Some("Critical Wound on X+."));
    }

    #[test]
    fn test_find_rule_missing() {
        let rules = rules();
        assert_eq!(find_rule(&rules, "Blast"), None);
        assert_eq!(find_rule(&rules, ""), None);
        assert_eq!(find_rule(&BTreeMap::new(), "Anti-Vehicle 2+"), None);
    }

    #[test]
    fn test_clean_rule_text() {
        assert_eq!(
            clean_rule_text("Each time a **model** with ^^Leader^^ attacks"),
            "Each time a model with Leader attacks"
        );
    }
}
