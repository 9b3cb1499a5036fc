//! # Currency & Tax Catalog
//!
//! Static configuration: the currencies QuickInvoice supports and the
//! jurisdiction tax presets an invoice can be created from.
//!
//! The catalog is compiled in. Invoices denormalize the chosen currency and
//! tax treatment onto themselves, so editing this table never rewrites
//! history.

use crate::error::{CoreError, CoreResult};
use crate::types::{Currency, TaxMode, TaxTreatment};

// =============================================================================
// Definitions
// =============================================================================

/// A supported currency. Every entry uses two minor digits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CurrencyDef {
    pub code: &'static str,
    pub symbol: &'static str,
}

impl CurrencyDef {
    /// Converts the static definition into the owned type invoices carry.
    pub fn to_currency(&self) -> Currency {
        Currency {
            code: self.code.to_string(),
            symbol: self.symbol.to_string(),
        }
    }
}

/// A jurisdiction tax preset: label + rate + computation mode, plus the
/// currency and invoice-number prefix that jurisdiction uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaxPresetDef {
    /// Stable lookup key ("INDIA_GST").
    pub key: &'static str,

    /// Human-readable label for the preset picker.
    pub label: &'static str,

    pub currency: CurrencyDef,
    pub mode: TaxMode,

    /// Tax line label on the totals panel and the document.
    pub tax_label: &'static str,

    /// Rate in basis points (1800 = 18%).
    pub rate_bps: u32,

    /// Prefix for generated invoice numbers ("GST" → GST-2026-0001).
    pub number_prefix: &'static str,
}

impl TaxPresetDef {
    /// The owned currency for an invoice created from this preset.
    pub fn currency(&self) -> Currency {
        self.currency.to_currency()
    }

    /// The owned tax treatment for an invoice created from this preset.
    pub fn tax(&self) -> TaxTreatment {
        TaxTreatment {
            mode: self.mode,
            label: self.tax_label.to_string(),
            rate_bps: self.rate_bps,
            number_prefix: self.number_prefix.to_string(),
        }
    }
}

// =============================================================================
// Catalog Tables
// =============================================================================

const INR: CurrencyDef = CurrencyDef { code: "INR", symbol: "₹" };
const USD: CurrencyDef = CurrencyDef { code: "USD", symbol: "$" };
const EUR: CurrencyDef = CurrencyDef { code: "EUR", symbol: "€" };
const GBP: CurrencyDef = CurrencyDef { code: "GBP", symbol: "£" };
const AED: CurrencyDef = CurrencyDef { code: "AED", symbol: "AED " };

/// All supported currencies.
pub const CURRENCIES: &[CurrencyDef] = &[INR, USD, EUR, GBP, AED];

/// All jurisdiction presets, in picker order.
pub const PRESETS: &[TaxPresetDef] = &[
    TaxPresetDef {
        key: "INDIA_GST",
        label: "India — GST 18%",
        currency: INR,
        mode: TaxMode::FixedRate,
        tax_label: "GST",
        rate_bps: 1800,
        number_prefix: "GST",
    },
    TaxPresetDef {
        key: "UAE_VAT",
        label: "UAE — VAT 5%",
        currency: AED,
        mode: TaxMode::FixedRate,
        tax_label: "VAT",
        rate_bps: 500,
        number_prefix: "VAT",
    },
    TaxPresetDef {
        key: "UK_VAT",
        label: "UK — VAT 20%",
        currency: GBP,
        mode: TaxMode::FixedRate,
        tax_label: "VAT",
        rate_bps: 2000,
        number_prefix: "VAT",
    },
    TaxPresetDef {
        key: "EU_VAT",
        label: "EU — VAT 19%",
        currency: EUR,
        mode: TaxMode::FixedRate,
        tax_label: "VAT",
        rate_bps: 1900,
        number_prefix: "VAT",
    },
    TaxPresetDef {
        key: "NO_TAX",
        label: "No tax",
        currency: USD,
        mode: TaxMode::None,
        tax_label: "",
        rate_bps: 0,
        number_prefix: "INV",
    },
];

// =============================================================================
// Lookups
// =============================================================================

/// Looks up a tax preset by key.
pub fn preset(key: &str) -> CoreResult<&'static TaxPresetDef> {
    PRESETS
        .iter()
        .find(|p| p.key == key)
        .ok_or_else(|| CoreError::UnknownPreset(key.to_string()))
}

/// Looks up a currency by ISO code.
pub fn currency(code: &str) -> CoreResult<&'static CurrencyDef> {
    CURRENCIES
        .iter()
        .find(|c| c.code == code)
        .ok_or_else(|| CoreError::UnknownCurrency(code.to_string()))
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preset_lookup() {
        let gst = preset("INDIA_GST").unwrap();
        assert_eq!(gst.rate_bps, 1800);
        assert_eq!(gst.currency.code, "INR");
        assert_eq!(gst.mode, TaxMode::FixedRate);
        assert_eq!(gst.tax().number_prefix, "GST");

        assert!(preset("MARS_TAX").is_err());
    }

    #[test]
    fn test_currency_lookup() {
        assert_eq!(currency("USD").unwrap().symbol, "$");
        assert!(currency("XYZ").is_err());
    }

    #[test]
    fn test_no_tax_preset() {
        let none = preset("NO_TAX").unwrap();
        assert_eq!(none.mode, TaxMode::None);
        assert_eq!(none.rate_bps, 0);
        assert_eq!(none.tax().number_prefix, "INV");
    }

    #[test]
    fn test_preset_keys_unique() {
        for (i, a) in PRESETS.iter().enumerate() {
            for b in &PRESETS[i + 1..] {
                assert_ne!(a.key, b.key);
            }
        }
    }
}
