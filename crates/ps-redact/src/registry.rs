//! Built-in table of sensitive field-name patterns.
//!
//! The table is built once on first use and never mutated afterwards, so it
//! is shared by every caller and every thread without locking. Patterns are
//! ordered by priority (authentication secrets first) and, within a priority,
//! by registration order below.

use std::collections::HashSet;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

use crate::category::PiiCategory;
use crate::error::{RedactionError, Result};
use crate::matcher;

/// Whole field names the `ip` pattern is allowed to match.
///
/// A bare `ip` token would otherwise hit `zip`, `ship`, `tip` and friends.
pub const IP_COMPOUNDS: &[&str] = &[
    "ip",
    "ipAddress",
    "ip_address",
    "remoteIp",
    "remote_ip",
    "clientIp",
    "client_ip",
];

/// How a pattern token is compared against a field name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "compounds")]
pub enum MatchStrategy {
    /// Token must sit between word boundaries (case-insensitive).
    WordBoundary,
    /// Field name must equal one of the listed names (case-insensitive).
    SpecificCompound(&'static [&'static str]),
}

/// One sensitive field-name family.
#[derive(Debug, Clone, Serialize)]
pub struct PiiPattern {
    /// Lowercase token, e.g. `password`.
    pub text: &'static str,
    pub category: PiiCategory,
    pub strategy: MatchStrategy,
    /// 0 for authentication secrets, 1 for all other PII.
    pub priority: u8,
    #[serde(skip)]
    locator: Regex,
}

impl PiiPattern {
    /// Pattern matched at word boundaries.
    pub fn word(text: &'static str, category: PiiCategory) -> Self {
        Self::build(text, category, MatchStrategy::WordBoundary)
    }

    /// Pattern restricted to an explicit list of whole field names.
    pub fn compound(
        text: &'static str,
        category: PiiCategory,
        compounds: &'static [&'static str],
    ) -> Self {
        Self::build(text, category, MatchStrategy::SpecificCompound(compounds))
    }

    fn build(text: &'static str, category: PiiCategory, strategy: MatchStrategy) -> Self {
        let locator = Regex::new(&format!("(?i){}", regex::escape(text)))
            .expect("escaped literal always compiles");
        Self {
            text,
            category,
            strategy,
            priority: category.expected_priority(),
            locator,
        }
    }

    /// Case-insensitive locator for the raw token, used by the boundary matcher.
    pub(crate) fn locator(&self) -> &Regex {
        &self.locator
    }

    /// Whether `field_name` matches this pattern.
    pub fn matches(&self, field_name: &str) -> bool {
        matcher::matches(field_name, self)
    }
}

static REGISTRY: Lazy<PatternRegistry> = Lazy::new(PatternRegistry::builtin);

/// Immutable, priority-ordered pattern table.
#[derive(Debug, Clone)]
pub struct PatternRegistry {
    patterns: Vec<PiiPattern>,
}

impl PatternRegistry {
    /// The process-wide built-in registry.
    pub fn global() -> &'static PatternRegistry {
        &REGISTRY
    }

    fn builtin() -> Self {
        use PiiCategory::*;

        let mut patterns = vec![
            // Authentication secrets
            PiiPattern::word("password", AuthenticationSecret),
            PiiPattern::word("passwd", AuthenticationSecret),
            PiiPattern::word("token", AuthenticationSecret),
            PiiPattern::word("bearer", AuthenticationSecret),
            PiiPattern::word("apikey", AuthenticationSecret),
            PiiPattern::word("api_key", AuthenticationSecret),
            PiiPattern::word("accesskey", AuthenticationSecret),
            PiiPattern::word("access_key", AuthenticationSecret),
            PiiPattern::word("secret", AuthenticationSecret),
            PiiPattern::word("auth", AuthenticationSecret),
            PiiPattern::word("credential", AuthenticationSecret),
            PiiPattern::word("credentials", AuthenticationSecret),
            PiiPattern::word("authorization", AuthenticationSecret),
            // Contact
            PiiPattern::word("email", Contact),
            PiiPattern::word("phone", Contact),
            PiiPattern::word("address", Contact),
            // Identity
            PiiPattern::word("name", Identity),
            PiiPattern::word("dob", Identity),
            PiiPattern::word("birthdate", Identity),
            PiiPattern::word("dateofbirth", Identity),
            // Government identifiers
            PiiPattern::word("ssn", GovernmentId),
            PiiPattern::word("passport", GovernmentId),
            PiiPattern::word("license", GovernmentId),
            PiiPattern::word("driverslicense", GovernmentId),
            PiiPattern::word("nationalid", GovernmentId),
            // Financial
            PiiPattern::word("card", Financial),
            PiiPattern::word("cardnumber", Financial),
            PiiPattern::word("pan", Financial),
            PiiPattern::word("cvv", Financial),
            PiiPattern::word("cvc", Financial),
            PiiPattern::word("expiry", Financial),
            PiiPattern::word("account", Financial),
            PiiPattern::word("bankaccount", Financial),
            PiiPattern::word("routing", Financial),
            PiiPattern::word("iban", Financial),
            PiiPattern::word("swift", Financial),
            // Tax identifiers
            PiiPattern::word("tin", TaxId),
            PiiPattern::word("taxid", TaxId),
            PiiPattern::word("vat", TaxId),
            // Network
            PiiPattern::compound("ip", Network, IP_COMPOUNDS),
        ];

        // Stable: equal priorities keep registration order.
        patterns.sort_by_key(|p| p.priority);

        let registry = Self { patterns };
        debug_assert!(
            registry.validate().is_ok(),
            "built-in pattern registry violates its invariants"
        );
        registry
    }

    /// All patterns, highest priority first.
    pub fn patterns(&self) -> &[PiiPattern] {
        &self.patterns
    }

    pub fn iter(&self) -> std::slice::Iter<'_, PiiPattern> {
        self.patterns.iter()
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    /// Look up a pattern by its token.
    pub fn get(&self, text: &str) -> Option<&PiiPattern> {
        self.patterns.iter().find(|p| p.text == text)
    }

    /// First pattern (in priority order) that matches `field_name`.
    pub fn find_match(&self, field_name: &str) -> Option<&PiiPattern> {
        self.patterns.iter().find(|p| p.matches(field_name))
    }

    /// Check the registry invariants.
    pub fn validate(&self) -> Result<()> {
        let mut seen = HashSet::new();
        let mut last_priority = 0u8;

        for pattern in &self.patterns {
            if pattern.text.is_empty() || pattern.text.chars().any(char::is_uppercase) {
                return Err(RedactionError::InvalidToken(pattern.text.to_string()));
            }

            let expected = pattern.category.expected_priority();
            if pattern.priority != expected {
                return Err(RedactionError::PriorityMismatch {
                    pattern: pattern.text.to_string(),
                    category: pattern.category,
                    priority: pattern.priority,
                    expected,
                });
            }

            if pattern.priority < last_priority {
                return Err(RedactionError::UnsortedRegistry {
                    pattern: pattern.text.to_string(),
                    priority: pattern.priority,
                });
            }
            last_priority = pattern.priority;

            if !seen.insert(pattern.text) {
                return Err(RedactionError::DuplicateToken(pattern.text.to_string()));
            }

            if let MatchStrategy::SpecificCompound(compounds) = pattern.strategy {
                if compounds.is_empty() {
                    return Err(RedactionError::MissingCompounds(pattern.text.to_string()));
                }
            }
        }

        Ok(())
    }
}

/// All built-in patterns, highest priority first.
pub fn all_patterns() -> &'static [PiiPattern] {
    PatternRegistry::global().patterns()
}
