//! Price resolution and store/language-aware formatting.

use chrono::NaiveDate;

use crate::catalog::ProductPrice;
use crate::store::{Language, MerchantStore};
use crate::types::MinorUnits;

/// Currencies quoted without a fractional part.
const ZERO_DECIMAL_CURRENCIES: &[&str] = &["JPY", "KRW", "CLP", "ISK", "VND"];

/// Languages that write `1.234,56` rather than `1,234.56`.
const COMMA_DECIMAL_LANGUAGES: &[&str] = &["fr", "de", "es", "it", "pt", "nl"];

/// The price a customer pays on a given day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FinalPrice {
    pub original: MinorUnits,
    pub final_amount: MinorUnits,
    pub discounted: bool,
}

/// Resolve the price in effect on `today`.
///
/// A special applies when it is set, lower than the base price, and `today`
/// falls inside its optional start/end window (both inclusive).
pub fn final_price(price: &ProductPrice, today: NaiveDate) -> FinalPrice {
    let special = price.special_amount.filter(|special| {
        *special < price.amount
            && price.special_start.map_or(true, |start| start <= today)
            && price.special_end.map_or(true, |end| today <= end)
    });

    match special {
        Some(special) => FinalPrice {
            original: price.amount,
            final_amount: special,
            discounted: true,
        },
        None => FinalPrice {
            original: price.amount,
            final_amount: price.amount,
            discounted: false,
        },
    }
}

/// Number of fractional digits for an ISO 4217 code.
pub fn fraction_digits(currency_code: &str) -> u32 {
    if ZERO_DECIMAL_CURRENCIES
        .iter()
        .any(|c| c.eq_ignore_ascii_case(currency_code))
    {
        0
    } else {
        2
    }
}

/// Format an amount in minor units for display in `store`'s currency.
///
/// # Examples
///
/// ```
/// use storefront_core::pricing::format_amount;
/// use storefront_core::store::{Language, MerchantStore};
///
/// let store = MerchantStore {
///     id: 1,
///     code: "demo".into(),
///     name: "Demo".into(),
///     currency_code: "USD".into(),
///     currency_symbol: "$".into(),
///     currency_format_national: true,
///     default_language: "en".into(),
/// };
/// let en = Language { id: 1, code: "en".into() };
/// assert_eq!(format_amount(123456, &store, &en), "$1,234.56");
/// ```
pub fn format_amount(amount: MinorUnits, store: &MerchantStore, language: &Language) -> String {
    let digits = fraction_digits(&store.currency_code);
    let (decimal_sep, group_sep) = if COMMA_DECIMAL_LANGUAGES
        .iter()
        .any(|l| l.eq_ignore_ascii_case(&language.code))
    {
        (',', '.')
    } else {
        ('.', ',')
    };

    let sign = if amount < 0 { "-" } else { "" };
    let abs = amount.unsigned_abs();
    let scale = 10u64.pow(digits);
    let units = group_thousands(abs / scale, group_sep);

    let number = if digits == 0 {
        units
    } else {
        format!(
            "{units}{decimal_sep}{:0width$}",
            abs % scale,
            width = digits as usize
        )
    };

    if store.currency_format_national {
        format!("{sign}{}{number}", store.currency_symbol)
    } else {
        format!("{sign}{} {number}", store.currency_code)
    }
}

fn group_thousands(value: u64, separator: char) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(separator);
        }
        out.push(c);
    }
    out
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
