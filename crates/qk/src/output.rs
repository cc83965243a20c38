//! Output formatting helpers for the `qk` CLI.

use serde::Serialize;

use quotekit_config::CurrencyConfig;

/// Serializes `value` as pretty JSON to stdout.
pub fn output_json<T: Serialize>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => println!("{json}"),
        Err(err) => eprintln!("Error: failed to serialize output: {err}"),
    }
}

/// Formats a minor-unit price with the configured currency symbol,
/// e.g. `1550` -> `$15.50`.
pub fn format_price(currency: &CurrencyConfig, minor_units: i64) -> String {
    let places = u32::from(currency.decimal_places);
    if places == 0 {
        return format!("{}{}", currency.symbol, minor_units);
    }
    let divisor = 10_u64.pow(places);
    let sign = if minor_units < 0 { "-" } else { "" };
    let magnitude = minor_units.unsigned_abs();
    format!(
        "{}{}{}.{:0width$}",
        sign,
        currency.symbol,
        magnitude / divisor,
        magnitude % divisor,
        width = places as usize
    )
}
