// de-DE presentation helpers shared by both front ends

use chrono::{Datelike, NaiveDate, NaiveDateTime};

const MONTHS_DE: [&str; 12] = [
    "Januar", "Februar", "März", "April", "Mai", "Juni", "Juli", "August", "September",
    "Oktober", "November", "Dezember",
];

/// Shortest decimal rendering, the form users type into search boxes
pub fn plain_number(value: f64) -> String {
    format!("{}", value)
}

/// Two decimals with German separators: 1234.5 → "1.234,50"
pub fn decimal_de(value: f64) -> String {
    let cents = (value.abs() * 100.0).round() as u64;
    let whole = (cents / 100).to_string();
    let fraction = cents % 100;

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, digit) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(digit);
    }

    let sign = if value < 0.0 && cents > 0 { "-" } else { "" };
    format!("{}{},{:02}", sign, grouped, fraction)
}

/// "-5.000,00 €"
pub fn euro_de(value: f64) -> String {
    format!("{} €", decimal_de(value))
}

/// Missing or zero amounts read "n/a"
pub fn euro_de_opt(value: Option<f64>) -> String {
    match value {
        Some(v) if v != 0.0 => euro_de(v),
        _ => "n/a".to_string(),
    }
}

/// "05.03.2026"
pub fn date_de(date: NaiveDate) -> String {
    date.format("%d.%m.%Y").to_string()
}

/// "15.03.2026, 10:30"
pub fn datetime_de(value: NaiveDateTime) -> String {
    value.format("%d.%m.%Y, %H:%M").to_string()
}

/// "18. Oktober 2026"
pub fn long_date_de(date: NaiveDate) -> String {
    format!(
        "{:02}. {} {}",
        date.day(),
        month_name_de(date.month()),
        date.year()
    )
}

pub fn month_name_de(month: u32) -> &'static str {
    MONTHS_DE
        .get(month.saturating_sub(1) as usize)
        .copied()
        .unwrap_or("")
}

/// Avatar initials: first letters of the first two words, else the first two characters
pub fn initials(name: &str) -> String {
    let parts: Vec<&str> = name.split(' ').filter(|p| !p.is_empty()).collect();
    if parts.len() >= 2 {
        parts[0]
            .chars()
            .take(1)
            .chain(parts[1].chars().take(1))
            .collect()
    } else {
        name.chars().take(2).collect::<String>().to_uppercase()
    }
}

/// Shorten to `max_len` characters with a trailing "..."
pub fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

/// Greedy word wrap into lines of at most `width` characters
pub fn wrap_text(text: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current_line = String::new();

    for word in text.split_whitespace() {
        if !current_line.is_empty()
            && current_line.chars().count() + word.chars().count() + 1 > width
        {
            lines.push(std::mem::take(&mut current_line));
        }
        if !current_line.is_empty() {
            current_line.push(' ');
        }
        current_line.push_str(word);
    }

    if !current_line.is_empty() {
        lines.push(current_line);
    }

    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decimal_de_grouping() {
        assert_eq!(decimal_de(0.0), "0,00");
        assert_eq!(decimal_de(89.9), "89,90");
        assert_eq!(decimal_de(1234.5), "1.234,50");
        assert_eq!(decimal_de(-5000.0), "-5.000,00");
        assert_eq!(decimal_de(1_250_000.0), "1.250.000,00");
    }

    #[test]
    fn test_euro_formats() {
        assert_eq!(euro_de(-798.32), "-798,32 €");
        assert_eq!(euro_de_opt(None), "n/a");
        assert_eq!(euro_de_opt(Some(0.0)), "n/a");
    }

    #[test]
    fn test_dates() {
        let date = NaiveDate::from_ymd_opt(2026, 3, 5).unwrap();
        assert_eq!(date_de(date), "05.03.2026");
        assert_eq!(long_date_de(date), "05. März 2026");
        assert_eq!(
            datetime_de(date.and_hms_opt(8, 45, 0).unwrap()),
            "05.03.2026, 08:45"
        );
    }

    #[test]
    fn test_initials() {
        assert_eq!(initials("Sabine Kramer"), "SK");
        assert_eq!(initials("Muster-Mandant GmbH"), "MG");
        assert_eq!(initials("system"), "SY");
    }

    #[test]
    fn test_truncate_and_wrap() {
        assert_eq!(truncate("CLIENT PAYMENT - INV 2024-045", 10), "CLIENT ...");
        assert_eq!(truncate("SHORT", 10), "SHORT");
        assert_eq!(
            wrap_text("Office supplies - paper, pens, folders", 16),
            vec!["Office supplies", "- paper, pens,", "folders"]
        );
    }
}
