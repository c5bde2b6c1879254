//! Argument parsing helpers

use std::time::Duration;

/// Splits a comma separated list, trimming spaces and dropping empty values
pub fn comma_separated_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

/// Parses durations such as `10s`, `15m`, `1h30m` or `500ms`
///
/// Used as a clap value parser, hence the `String` error.
pub fn parse_duration(input: &str) -> Result<Duration, String> {
    let input = input.trim();
    if input.is_empty() {
        return Err("duration cannot be empty".to_string());
    }

    let mut total = Duration::ZERO;
    let mut current_num = String::new();
    let mut chars = input.chars().peekable();

    while let Some(c) = chars.next() {
        if c.is_ascii_digit() {
            current_num.push(c);
            continue;
        }

        let unit = match c {
            'm' if chars.peek() == Some(&'s') => {
                chars.next();
                "ms"
            }
            'h' => "h",
            'm' => "m",
            's' => "s",
            other => {
                return Err(format!("invalid character '{}' in duration '{}'", other, input));
            }
        };

        if current_num.is_empty() {
            return Err(format!("missing number before '{}' in duration '{}'", unit, input));
        }
        let value: u64 = current_num
            .parse()
            .map_err(|_| format!("invalid number in duration '{}'", input))?;
        current_num.clear();

        let part = match unit {
            "h" => value.checked_mul(60 * 60).map(Duration::from_secs),
            "m" => value.checked_mul(60).map(Duration::from_secs),
            "s" => Some(Duration::from_secs(value)),
            _ => Some(Duration::from_millis(value)),
        };
        total = part
            .and_then(|part| total.checked_add(part))
            .ok_or_else(|| format!("duration '{}' is too large", input))?;
    }

    if !current_num.is_empty() {
        return Err(format!(
            "missing unit in duration '{}' (use ms, s, m or h)",
            input
        ));
    }

    Ok(total)
}
