/// Formats an amount as whole Japanese Yen, e.g. `1234567.8` -> `￥1,234,568`.
pub fn format_currency(value: f64) -> String {
    if value.is_nan() {
        return "NaN".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "￥∞" } else { "-￥∞" }.to_string();
    }

    // f64::round is half away from zero.
    let rounded = value.round();
    let sign = if rounded < 0.0 { "-" } else { "" };
    format!("{sign}￥{}", group_thousands(rounded.abs()))
}

/// Formats a fraction as a whole percentage, e.g. `0.4` -> `40%`.
pub fn format_percent(ratio: f64) -> String {
    format!("{:.0}%", (ratio * 100.0).round())
}

fn group_thousands(whole: f64) -> String {
    let digits = format!("{whole:.0}");
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
