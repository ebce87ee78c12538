//! Tax
//!
//! Country-keyed tax rules. The built-in table covers the G20 destinations
//! the storefront ships to; a destination the table does not know falls
//! back to the first entry (India). That fallback is policy, not an error.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A country's tax treatment: a percentage rate plus a display label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxRule {
    /// Country name, as presented in the address form.
    pub country: String,

    /// ISO 3166-1 alpha-2 country code.
    pub code: String,

    /// Tax rate as a percentage. May be fractional (e.g. 8.5).
    pub rate: Decimal,

    /// Display label (e.g. "GST", "VAT").
    pub label: String,
}

/// Errors raised while building a tax table.
#[derive(Debug, Error)]
pub enum TaxTableError {
    /// A table needs at least one rule to act as the fallback.
    #[error("tax table must contain at least one rule")]
    Empty,

    /// YAML parsing error.
    #[error("failed to parse tax table: {0}")]
    Yaml(#[from] serde_norway::Error),
}

/// An immutable, ordered set of tax rules.
///
/// The first rule doubles as the fallback for unrecognised countries, so a
/// table is non-empty by construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaxTable {
    first: TaxRule,
    rest: Vec<TaxRule>,
}

impl TaxTable {
    /// Build a table from an ordered rule list.
    ///
    /// # Errors
    ///
    /// Returns [`TaxTableError::Empty`] if no rules are given.
    pub fn new(rules: Vec<TaxRule>) -> Result<Self, TaxTableError> {
        let mut rules = rules.into_iter();
        let first = rules.next().ok_or(TaxTableError::Empty)?;

        Ok(Self {
            first,
            rest: rules.collect(),
        })
    }

    /// Load a table from a YAML document with a top-level `rules` list.
    ///
    /// # Errors
    ///
    /// Returns a [`TaxTableError`] if the document cannot be parsed or
    /// contains no rules.
    pub fn from_yaml(yaml: &str) -> Result<Self, TaxTableError> {
        #[derive(Deserialize)]
        struct TaxTableFile {
            rules: Vec<TaxRule>,
        }

        let file: TaxTableFile = serde_norway::from_str(yaml)?;

        Self::new(file.rules)
    }

    /// The rule applied to unrecognised countries.
    #[must_use]
    pub fn default_rule(&self) -> &TaxRule {
        &self.first
    }

    /// The rule for a destination country, falling back to
    /// [`default_rule`](Self::default_rule) when the country is unknown.
    #[must_use]
    pub fn rule_for(&self, country: &str) -> &TaxRule {
        self.iter()
            .find(|rule| rule.country == country)
            .unwrap_or(&self.first)
    }

    /// Iterate over the rules in table order.
    pub fn iter(&self) -> impl Iterator<Item = &TaxRule> {
        std::iter::once(&self.first).chain(self.rest.iter())
    }

    /// Number of rules in the table.
    #[must_use]
    pub fn len(&self) -> usize {
        1 + self.rest.len()
    }

    /// Always `false`; a table is non-empty by construction.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        false
    }

    /// The G20 table the storefront ships with. India leads and is
    /// therefore the fallback.
    #[must_use]
    pub fn g20() -> Self {
        fn rule(country: &str, code: &str, mantissa: i64, scale: u32, label: &str) -> TaxRule {
            TaxRule {
                country: country.to_owned(),
                code: code.to_owned(),
                rate: Decimal::new(mantissa, scale),
                label: label.to_owned(),
            }
        }

        Self {
            first: rule("India", "IN", 18, 0, "GST"),
            rest: vec![
                rule("United States", "US", 85, 1, "Sales Tax"),
                rule("United Kingdom", "GB", 20, 0, "VAT"),
                rule("Germany", "DE", 19, 0, "VAT"),
                rule("France", "FR", 20, 0, "VAT"),
                rule("Italy", "IT", 22, 0, "VAT"),
                rule("Canada", "CA", 13, 0, "HST"),
                rule("Japan", "JP", 10, 0, "Consumption Tax"),
                rule("Australia", "AU", 10, 0, "GST"),
                rule("Brazil", "BR", 17, 0, "ICMS"),
                rule("Mexico", "MX", 16, 0, "IVA"),
                rule("Argentina", "AR", 21, 0, "IVA"),
                rule("South Africa", "ZA", 15, 0, "VAT"),
                rule("South Korea", "KR", 10, 0, "VAT"),
                rule("China", "CN", 13, 0, "VAT"),
                rule("Russia", "RU", 20, 0, "VAT"),
                rule("Turkey", "TR", 18, 0, "KDV"),
                rule("Saudi Arabia", "SA", 15, 0, "VAT"),
                rule("Indonesia", "ID", 11, 0, "PPN"),
            ],
        }
    }
}

impl Default for TaxTable {
    fn default() -> Self {
        Self::g20()
    }
}
