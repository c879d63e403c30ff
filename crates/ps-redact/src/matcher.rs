//! Word-boundary matching of field names against pattern tokens.
//!
//! A token matches when it occurs (case-insensitively) with a word boundary
//! on *both* sides. Checking only the trailing side is what lets `filename`
//! match `name`; the leading side is what rejects it.
//!
//! Leading boundaries:
//! - start of the field name
//! - a separator (`_` or any other non-alphanumeric character) or a digit
//! - a camelCase transition: the match starts uppercase after a lowercase
//!   character, or starts the last capital of an acronym run (`HTTPPassword`)
//!
//! Trailing boundaries:
//! - end of the field name
//! - a separator
//! - a camelCase transition out of the match (`tokenId`, `APIKEYValue`)
//! - a purely numeric suffix (`password1`, `token99`, `token9_old`): the digit
//!   run must itself end at a boundary, so `token9x` does not match

use crate::registry::{MatchStrategy, PatternRegistry, PiiPattern};

/// Decide whether `field_name` matches `pattern`.
pub fn matches(field_name: &str, pattern: &PiiPattern) -> bool {
    match pattern.strategy {
        MatchStrategy::WordBoundary => matches_word(field_name, pattern),
        MatchStrategy::SpecificCompound(compounds) => compounds
            .iter()
            .any(|compound| compound.eq_ignore_ascii_case(field_name)),
    }
}

/// First built-in pattern that flags `field_name`, secrets checked first.
pub fn field_is_sensitive(field_name: &str) -> Option<&'static PiiPattern> {
    PatternRegistry::global().find_match(field_name)
}

fn matches_word(field_name: &str, pattern: &PiiPattern) -> bool {
    let locator = pattern.locator();
    let mut from = 0;

    while let Some(hit) = locator.find_at(field_name, from) {
        if leading_boundary(field_name, hit.start()) && trailing_boundary(field_name, hit.end()) {
            return true;
        }
        // Step a single character so overlapping occurrences are still tried.
        from = hit.start()
            + field_name[hit.start()..]
                .chars()
                .next()
                .map_or(1, char::len_utf8);
    }

    false
}

fn is_separator(c: char) -> bool {
    !c.is_alphanumeric()
}

fn leading_boundary(field_name: &str, start: usize) -> bool {
    let Some(prev) = field_name[..start].chars().next_back() else {
        return true;
    };
    if is_separator(prev) || prev.is_ascii_digit() {
        return true;
    }

    let mut rest = field_name[start..].chars();
    let Some(first) = rest.next() else {
        return false;
    };
    if !first.is_uppercase() {
        return false;
    }
    if prev.is_lowercase() {
        return true;
    }
    // Acronym run: the word starts at the last capital before a lowercase.
    prev.is_uppercase() && rest.next().is_some_and(char::is_lowercase)
}

fn trailing_boundary(field_name: &str, end: usize) -> bool {
    let rest = &field_name[end..];
    let Some(next) = rest.chars().next() else {
        return true;
    };
    if is_separator(next) {
        return true;
    }

    if next.is_ascii_digit() {
        let after_digits = rest.trim_start_matches(|c: char| c.is_ascii_digit());
        return after_digits
            .chars()
            .next()
            .map_or(true, |c| is_separator(c) || c.is_uppercase());
    }

    if !next.is_uppercase() {
        return false;
    }
    let Some(last) = field_name[..end].chars().next_back() else {
        return false;
    };
    if last.is_lowercase() {
        return true;
    }
    last.is_uppercase() && rest.chars().nth(1).is_some_and(char::is_lowercase)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::category::PiiCategory;

    fn name() -> PiiPattern {
        PiiPattern::word("name", PiiCategory::Identity)
    }

    #[test]
    fn test_exact_and_case_insensitive() {
        let pattern = name();
        for field in ["name", "Name", "NAME", "NaMe"] {
            assert!(matches(field, &pattern), "{} should match", field);
        }
    }

    #[test]
    fn test_camel_case_boundaries() {
        let pattern = name();
        for field in ["userName", "firstName", "nameFirst", "lastNameValue", "userNAME"] {
            assert!(matches(field, &pattern), "{} should match", field);
        }
    }

    #[test]
    fn test_snake_case_boundaries() {
        let pattern = name();
        for field in ["user_name", "first_name", "name_backup", "_name_", "user-name", "user.name"] {
            assert!(matches(field, &pattern), "{} should match", field);
        }
    }

    #[test]
    fn test_embedded_substrings_rejected() {
        let pattern = name();
        for field in ["filename", "username", "USERNAME", "names", "renamed", "namespace", "nameless"] {
            assert!(!matches(field, &pattern), "{} should not match", field);
        }
    }

    #[test]
    fn test_leading_boundary_required() {
        // Trailing side is fine here ("name" ends the string); only the
        // leading side rejects it.
        assert!(!matches("filename", &name()));
        assert!(matches("fileName", &name()));
    }

    #[test]
    fn test_numeric_suffixes() {
        let token = PiiPattern::word("token", PiiCategory::AuthenticationSecret);
        for field in ["token1", "token99", "token_2", "token9_old", "token9X", "refreshToken2"] {
            assert!(matches(field, &token), "{} should match", field);
        }
        for field in ["token9x", "token99abc", "tokens"] {
            assert!(!matches(field, &token), "{} should not match", field);
        }

        let password = PiiPattern::word("password", PiiCategory::AuthenticationSecret);
        assert!(matches("password1", &password));
        assert!(matches("name_backup_1", &name()));
    }

    #[test]
    fn test_digit_prefix_is_boundary() {
        let token = PiiPattern::word("token", PiiCategory::AuthenticationSecret);
        assert!(matches("oauth2token", &token));
        assert!(matches("v2_token", &token));
    }

    #[test]
    fn test_acronym_runs() {
        let password = PiiPattern::word("password", PiiCategory::AuthenticationSecret);
        assert!(matches("HTTPPassword", &password));
        assert!(matches("DB_PASSWORD", &password));

        let apikey = PiiPattern::word("apikey", PiiCategory::AuthenticationSecret);
        assert!(matches("APIKEYValue", &apikey));
        assert!(matches("userAPIKey", &apikey));
    }

    #[test]
    fn test_overlapping_occurrences() {
        // First "cvc" in "cvcvc" has no trailing boundary; the overlapping one
        // at offset 2 ends the string but has no leading boundary either.
        let cvc = PiiPattern::word("cvc", PiiCategory::Financial);
        assert!(!matches("cvcvc", &cvc));
        assert!(matches("cvcCvc", &cvc));
        assert!(matches("xcvc_cvc", &cvc));
    }

    #[test]
    fn test_specific_compound() {
        let ip = PiiPattern::compound("ip", PiiCategory::Network, &["ipAddress", "client_ip"]);
        assert!(matches("ipAddress", &ip));
        assert!(matches("IPADDRESS", &ip));
        assert!(matches("Client_IP", &ip));
        for field in ["zip", "ship", "tip", "relationship", "ip_addr", "clientIpv6"] {
            assert!(!matches(field, &ip), "{} should not match", field);
        }
    }

    #[test]
    fn test_field_is_sensitive_precedence() {
        for field in ["tokenId", "apiKeyFilename", "secretManagerConfig", "authName"] {
            let pattern = field_is_sensitive(field).expect(field);
            assert!(pattern.category.is_secret(), "{} classified as {}", field, pattern.category);
        }
    }

    #[test]
    fn test_field_is_sensitive_safe_fields() {
        for field in [
            "id", "filename", "amount", "zip", "shipmentId", "username", "status", "createdAt",
            "company", "timeSpan", "author", "setting", "private", "description",
        ] {
            assert!(
                field_is_sensitive(field).is_none(),
                "{} flagged by {:?}",
                field,
                field_is_sensitive(field).map(|p| p.text)
            );
        }
    }

    #[test]
    fn test_compound_tokens_need_full_word() {
        // "credential" must not fire inside "credentials"; the longer token does.
        let hit = field_is_sensitive("credentials").unwrap();
        assert_eq!(hit.text, "credentials");
        let hit = field_is_sensitive("Authorization").unwrap();
        assert_eq!(hit.text, "authorization");
    }

    #[test]
    fn test_non_ascii_field_names() {
        assert!(field_is_sensitive("nombreÉmail").is_none());
        assert!(field_is_sensitive("ユーザー_email").is_some());
        assert!(field_is_sensitive("").is_none());
    }
}
