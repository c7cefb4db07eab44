//! Inch value parsing and fixed-decimal formatting
//!
//! All thread and tool dimensions are in inches. Input may be decimal
//! (`0.4375`) or fractional (`7/16`, `1 1/4`). Output words are written with a
//! fixed number of decimals from integer counts so that no `-0.0000` or
//! accumulated rounding can appear in a program.

/// Parse an inch value, accepting decimal or fractional notation
///
/// * `input` - String to parse, e.g. `"0.5"`, `"1/2"`, `"1 1/4"`, `"-0.1"`
pub fn parse_inches(input: &str) -> Result<f64, String> {
    let input = input.trim();
    if input.is_empty() {
        return Err("Empty value".to_string());
    }

    if !input.contains('/') {
        return input
            .parse::<f64>()
            .map_err(|e| format!("Invalid number '{}': {}", input, e));
    }

    let (negative, body) = match input.strip_prefix('-') {
        Some(rest) => (true, rest.trim_start()),
        None => (false, input),
    };

    let mut total_inches = 0.0;
    for part in body.split_whitespace() {
        if part.contains('/') {
            let frac_parts: Vec<&str> = part.split('/').collect();
            if frac_parts.len() != 2 {
                return Err("Invalid fraction format".to_string());
            }
            let num = frac_parts[0]
                .parse::<f64>()
                .map_err(|_| "Invalid numerator".to_string())?;
            let den = frac_parts[1]
                .parse::<f64>()
                .map_err(|_| "Invalid denominator".to_string())?;
            if den == 0.0 {
                return Err("Division by zero".to_string());
            }
            total_inches += num / den;
        } else {
            total_inches += part
                .parse::<f64>()
                .map_err(|_| "Invalid number part".to_string())?;
        }
    }

    Ok(if negative { -total_inches } else { total_inches })
}

/// Quantize a value to an integer count of `10^-decimals` units
pub fn quantize(value: f64, decimals: u32) -> i64 {
    (value * 10f64.powi(decimals as i32)).round() as i64
}

/// Format a quantized count with exactly `decimals` fractional digits
///
/// `format_quantized(-500, 4)` yields `"-0.0500"`.
pub fn format_quantized(count: i64, decimals: u32) -> String {
    let scale = 10i64.pow(decimals);
    let sign = if count < 0 { "-" } else { "" };
    let magnitude = count.unsigned_abs();
    let whole = magnitude / scale as u64;
    if decimals == 0 {
        return format!("{}{}", sign, whole);
    }
    let frac = magnitude % scale as u64;
    format!(
        "{}{}.{:0width$}",
        sign,
        whole,
        frac,
        width = decimals as usize
    )
}

/// Format a value with exactly `decimals` fractional digits, never `-0`
pub fn format_fixed(value: f64, decimals: u32) -> String {
    format_quantized(quantize(value, decimals), decimals)
}
