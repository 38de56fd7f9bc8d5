//! Human-readable number formatting for display surfaces.
//!
//! Independent of the join engine; downstream display code calls this on
//! raw cell values. The contract is fixed by the observed behavior of the
//! original formatter, including its deliberately asymmetric unit
//! placement: `$`/`£` always attach directly before the number regardless
//! of `space_before_unit`, while every other unit is appended after the
//! number with an optional space.

/// How to compress large magnitudes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum NumberAbbreviation {
    /// `million` / `billion` / `trillion` / `quadrillion` words.
    #[default]
    Long,
    /// `M` / `B` / `T` / `Quad` suffixes.
    Short,
    /// Full grouped-digit rendering, no abbreviation at any magnitude.
    Off,
}

#[derive(Debug, Clone, Default)]
pub struct FormatOptions {
    /// Decimal places after rounding; defaults to 2.
    pub num_decimal_places: Option<u32>,
    pub number_abbreviation: NumberAbbreviation,
    pub unit: Option<String>,
    pub space_before_unit: bool,
    /// `true` pads to exactly `num_decimal_places`; `false` strips
    /// insignificant trailing zeroes after rounding.
    pub trailing_zeroes: bool,
    /// Prepends `+` to non-negative values. Negative values always carry
    /// `-` either way.
    pub show_plus: bool,
}

/// Magnitude thresholds, largest first.
const ABBREVIATIONS: &[(f64, &str, &str)] = &[
    (1e15, "Quad", "quadrillion"),
    (1e12, "T", "trillion"),
    (1e9, "B", "billion"),
    (1e6, "M", "million"),
];

/// Formats a numeric value into a human string per the options.
pub fn format_value(value: f64, options: &FormatOptions) -> String {
    let decimals = options.num_decimal_places.unwrap_or(2);
    let abbreviation = options.number_abbreviation;
    let abs = value.abs();
    let negative = value < 0.0;

    // Small nonzero values clamp to a "below threshold" marker instead of
    // rounding down to a bare zero.
    let threshold = 10f64.powi(-(decimals as i32));
    if value != 0.0 && abs < threshold {
        let marker = strip_trailing_zeroes(&fixed_decimals(threshold, decimals));
        return if negative {
            format!(">-{marker}")
        } else {
            format!("<{marker}")
        };
    }

    let body = if abbreviation != NumberAbbreviation::Off && abs >= 1e6 {
        abbreviated(abs, decimals, abbreviation, options.trailing_zeroes)
    } else if abbreviation != NumberAbbreviation::Off && abs >= 1e3 && value.fract() == 0.0 {
        // Whole values in the thousands round to three significant digits.
        let exponent = abs.log10().floor() as i32;
        let scale = 10f64.powi(exponent - 2);
        group_thousands(&fixed_decimals((abs / scale).round() * scale, 0))
    } else {
        let text = fixed_decimals(abs, decimals);
        let text = if options.trailing_zeroes {
            text
        } else {
            strip_trailing_zeroes(&text)
        };
        group_thousands(&text)
    };

    let sign = if negative {
        "-"
    } else if options.show_plus {
        "+"
    } else {
        ""
    };

    match options.unit.as_deref() {
        // Currency symbols always attach directly before the number,
        // whatever space_before_unit says. Intentional asymmetry with the
        // percent-style case below.
        Some(unit @ ("$" | "£")) => format!("{sign}{unit}{body}"),
        Some(unit) => {
            let space = if options.space_before_unit { " " } else { "" };
            format!("{sign}{body}{space}{unit}")
        }
        None => format!("{sign}{body}"),
    }
}

fn abbreviated(
    abs: f64,
    decimals: u32,
    abbreviation: NumberAbbreviation,
    trailing_zeroes: bool,
) -> String {
    let (magnitude, short, long) = ABBREVIATIONS
        .iter()
        .copied()
        .find(|(magnitude, _, _)| abs >= *magnitude)
        .unwrap_or((1e6, "M", "million"));
    let scaled = fixed_decimals(abs / magnitude, decimals);
    let scaled = if trailing_zeroes {
        scaled
    } else {
        strip_trailing_zeroes(&scaled)
    };
    match abbreviation {
        NumberAbbreviation::Short => format!("{scaled}{short}"),
        _ => format!("{scaled} {long}"),
    }
}

fn fixed_decimals(value: f64, decimals: u32) -> String {
    format!("{value:.prec$}", prec = decimals as usize)
}

/// Drops insignificant trailing zero digits (and a dangling decimal point).
fn strip_trailing_zeroes(text: &str) -> String {
    if !text.contains('.') {
        return text.to_string();
    }
    let trimmed = text.trim_end_matches('0').trim_end_matches('.');
    trimmed.to_string()
}

/// Inserts thousands separators into the integer part of an unsigned
/// numeric string.
fn group_thousands(text: &str) -> String {
    let (integer, fraction) = match text.split_once('.') {
        Some((integer, fraction)) => (integer, Some(fraction)),
        None => (text, None),
    };
    let mut grouped = String::with_capacity(integer.len() + integer.len() / 3);
    let digits: Vec<char> = integer.chars().collect();
    for (idx, digit) in digits.iter().enumerate() {
        if idx > 0 && (digits.len() - idx) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(*digit);
    }
    match fraction {
        Some(fraction) => format!("{grouped}.{fraction}"),
        None => grouped,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn default_options() -> FormatOptions {
        FormatOptions::default()
    }

    #[test]
    fn defaults_cover_sign_grouping_and_abbreviation() {
        let options = default_options();
        assert_eq!(format_value(1.0, &options), "1");
        assert_eq!(format_value(-1.0, &options), "-1");
        assert_eq!(format_value(1000.0, &options), "1,000");
        assert_eq!(format_value(1_234_567_890.0, &options), "1.23 billion");
        assert_eq!(format_value(0.0000000001, &options), "<0.01");
    }

    #[test]
    fn whole_thousands_round_to_three_significant_digits() {
        let options = default_options();
        assert_eq!(format_value(123456.0, &options), "123,000");
        assert_eq!(format_value(123456.789, &options), "123,456.79");
    }

    #[test]
    fn currency_units_always_prefix() {
        let with_space = FormatOptions {
            unit: Some("$".to_string()),
            space_before_unit: true,
            ..FormatOptions::default()
        };
        let without_space = FormatOptions {
            space_before_unit: false,
            ..with_space.clone()
        };
        assert_eq!(format_value(1.1, &with_space), "$1.1");
        assert_eq!(format_value(1.1, &without_space), "$1.1");
        assert_eq!(format_value(-1.0, &without_space), "-$1");
    }
}
