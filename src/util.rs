// Numeric helpers shared by the loader, the summary and the narrative.
//
// Statistics return `Option` so an empty input can never turn into a
// silent zero on screen.
use num_format::{Locale, ToFormattedString};

/// Parse a required integer cell. Whitespace is trimmed; empty cells are
/// rejected.
pub fn parse_i32_strict(s: &str) -> Option<i32> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    s.parse::<i32>().ok()
}

pub fn parse_u32_strict(s: &str) -> Option<u32> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    s.parse::<u32>().ok()
}

/// Parse a required measurement cell.
///
/// - Trims whitespace.
/// - Accepts scientific notation such as `1.5e-05`.
/// - Returns `None` for empty cells and for anything that is not a finite
///   number, so `NaN` and `inf` never reach the statistics.
pub fn parse_f64_strict(s: &str) -> Option<f64> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    s.parse::<f64>().ok().filter(|v| v.is_finite())
}

pub fn average(v: &[f64]) -> Option<f64> {
    if v.is_empty() {
        return None;
    }
    let sum: f64 = v.iter().copied().sum();
    Some(sum / v.len() as f64)
}

pub fn median(mut v: Vec<f64>) -> Option<f64> {
    // Takes the vector by value so it can be sorted in place.
    if v.is_empty() {
        return None;
    }
    v.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    let mid = v.len() / 2;
    if v.len() % 2 == 1 {
        Some(v[mid])
    } else {
        Some((v[mid - 1] + v[mid]) / 2.0)
    }
}

/// Format a value with a fixed number of decimals and `en` thousands
/// separators, e.g. `1,234,567.89`.
pub fn format_number(n: f64, decimals: usize) -> String {
    let s = format!("{:.*}", decimals, n.abs());
    let mut parts = s.split('.');
    let int_part = parts.next().unwrap_or("0");
    let frac_part = parts.next();
    let mut res = match int_part.parse::<u64>() {
        Ok(int_val) => int_val.to_formatted_string(&Locale::en),
        // Beyond u64: group the digits directly.
        Err(_) => group_thousands(int_part),
    };
    if let Some(frac) = frac_part {
        res.push('.');
        res.push_str(frac);
    }
    // A value that rounds to zero is printed without a minus sign.
    let rounds_to_zero = s.chars().all(|c| c == '0' || c == '.');
    if n.is_sign_negative() && !rounds_to_zero {
        format!("-{}", res)
    } else {
        res
    }
}

fn group_thousands(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// Like [`format_number`] but always carries an explicit sign: `+50.00`,
/// `-20.00`, `+0.00`.
pub fn format_signed(n: f64, decimals: usize) -> String {
    let body = format_number(n, decimals);
    if body.starts_with('-') {
        body
    } else {
        format!("+{}", body)
    }
}

pub fn format_int<T>(n: T) -> String
where
    T: ToFormattedString,
{
    n.to_formatted_string(&Locale::en)
}
