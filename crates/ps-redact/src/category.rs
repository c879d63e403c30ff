//! PII categories for sensitive field-name patterns.

use serde::{Deserialize, Serialize};

/// Priority assigned to authentication secrets. Checked first.
pub const SECRET_PRIORITY: u8 = 0;

/// Priority assigned to every other PII category.
pub const PII_PRIORITY: u8 = 1;

/// Family of sensitive data a field name points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PiiCategory {
    /// Email, phone, postal address
    Contact,
    /// Personal name, date of birth
    Identity,
    /// Cards, bank accounts, routing data
    Financial,
    /// Passwords, tokens, API keys (grants system access)
    AuthenticationSecret,
    /// IP addresses
    Network,
    /// SSN, passport, licenses, national IDs
    GovernmentId,
    /// Tax identifiers
    TaxId,
}

impl PiiCategory {
    /// Returns the registry priority every pattern in this category must carry.
    pub fn expected_priority(&self) -> u8 {
        match self {
            PiiCategory::AuthenticationSecret => SECRET_PRIORITY,
            _ => PII_PRIORITY,
        }
    }

    /// Whether exposure of this category grants access rather than exposing
    /// user data.
    pub fn is_secret(&self) -> bool {
        matches!(self, PiiCategory::AuthenticationSecret)
    }

    /// Parse a category from its snake_case name.
    pub fn parse_str(s: &str) -> Option<Self> {
        match s {
            "contact" => Some(PiiCategory::Contact),
            "identity" => Some(PiiCategory::Identity),
            "financial" => Some(PiiCategory::Financial),
            "authentication_secret" => Some(PiiCategory::AuthenticationSecret),
            "network" => Some(PiiCategory::Network),
            "government_id" => Some(PiiCategory::GovernmentId),
            "tax_id" => Some(PiiCategory::TaxId),
            _ => None,
        }
    }
}

impl std::fmt::Display for PiiCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            PiiCategory::Contact => "contact",
            PiiCategory::Identity => "identity",
            PiiCategory::Financial => "financial",
            PiiCategory::AuthenticationSecret => "authentication_secret",
            PiiCategory::Network => "network",
            PiiCategory::GovernmentId => "government_id",
            PiiCategory::TaxId => "tax_id",
        };
        write!(f, "{}", s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [PiiCategory; 7] = [
        PiiCategory::Contact,
        PiiCategory::Identity,
        PiiCategory::Financial,
        PiiCategory::AuthenticationSecret,
        PiiCategory::Network,
        PiiCategory::GovernmentId,
        PiiCategory::TaxId,
    ];

    #[test]
    fn test_display_parses_back() {
        for category in ALL {
            assert_eq!(PiiCategory::parse_str(&category.to_string()), Some(category));
        }
        assert_eq!(PiiCategory::parse_str("biometric"), None);
    }

    #[test]
    fn test_serde_matches_display() {
        for category in ALL {
            let json = serde_json::to_string(&category).unwrap();
            assert_eq!(json, format!("\"{}\"", category));
        }
    }

    #[test]
    fn test_only_secrets_get_priority_zero() {
        for category in ALL {
            let expected = if category.is_secret() { 0 } else { 1 };
            assert_eq!(category.expected_priority(), expected);
        }
    }
}
