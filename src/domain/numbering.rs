//! Letter numbering rules.
//!
//! A letter number is produced from a printf-like pattern with three
//! positional arguments: the running number, the month as a Roman numeral and
//! the four-digit year. The running number is recovered from an existing
//! number by reading its second `/`-separated segment.

pub const DEFAULT_NUMBER_FORMAT: &str = "SKH/%d/%s/%d";

/// Numbers of deleted letters are rewritten with this prefix so the original
/// number can be issued again.
pub const DELETED_PREFIX: &str = "DELETED_";

const ROMAN_MONTHS: [&str; 12] = [
    "I", "II", "III", "IV", "V", "VI", "VII", "VIII", "IX", "X", "XI", "XII",
];

/// Roman numeral for a calendar month, or an empty string outside 1..=12.
#[must_use]
pub fn month_to_roman(month: u32) -> &'static str {
    month
        .checked_sub(1)
        .and_then(|idx| ROMAN_MONTHS.get(idx as usize))
        .copied()
        .unwrap_or("")
}

/// Running number embedded in a letter number (`SKH/007/X/2026` -> 7).
#[must_use]
pub fn parse_running_number(document_number: &str) -> Option<u32> {
    document_number.split('/').nth(1)?.trim().parse().ok()
}

#[must_use]
pub const fn next_running_number(last_persisted: u32, configured: u32) -> u32 {
    let base = if last_persisted > configured {
        last_persisted
    } else {
        configured
    };
    base.saturating_add(1)
}

#[must_use]
pub fn format_document_number(pattern: &str, running: u32, month: u32, year: i32) -> String {
    let pattern = if pattern.trim().is_empty() {
        DEFAULT_NUMBER_FORMAT
    } else {
        pattern
    };

    render(
        pattern,
        &[
            FormatArg::Int(i64::from(running)),
            FormatArg::Str(month_to_roman(month)),
            FormatArg::Int(i64::from(year)),
        ],
    )
}

#[must_use]
pub fn deleted_number(original: &str, deleted_at_unix: i64) -> String {
    format!("{DELETED_PREFIX}{deleted_at_unix}_{original}")
}

#[derive(Debug, Clone, Copy)]
pub enum FormatArg<'a> {
    Int(i64),
    Str(&'a str),
}

/// Expands `%d`, `%s`, `%v` (with optional `0` flag and width) and `%%`.
///
/// Arguments are consumed in order regardless of the verb. A verb without a
/// remaining argument renders as `%!MISSING`; surplus arguments are ignored.
#[must_use]
pub fn render(pattern: &str, args: &[FormatArg<'_>]) -> String {
    let mut out = String::with_capacity(pattern.len() + 16);
    let mut chars = pattern.chars().peekable();
    let mut next_arg = 0;

    while let Some(c) = chars.next() {
        if c != '%' {
            out.push(c);
            continue;
        }

        if chars.peek() == Some(&'%') {
            chars.next();
            out.push('%');
            continue;
        }

        let zero_pad = chars.next_if_eq(&'0').is_some();
        let mut width = 0usize;
        while let Some(digit) = chars.peek().and_then(|d| d.to_digit(10)) {
            width = width * 10 + digit as usize;
            chars.next();
        }

        let Some(verb) = chars.next() else {
            out.push_str("%!(NOVERB)");
            break;
        };

        if !matches!(verb, 'd' | 's' | 'v') {
            out.push('%');
            out.push(verb);
            continue;
        }

        let Some(arg) = args.get(next_arg) else {
            out.push_str("%!MISSING");
            continue;
        };
        next_arg += 1;

        let (text, numeric) = match arg {
            FormatArg::Int(n) => (n.to_string(), true),
            FormatArg::Str(s) => ((*s).to_string(), false),
        };

        let len = text.chars().count();
        if len < width {
            let fill = if zero_pad && numeric { '0' } else { ' ' };
            out.extend(std::iter::repeat_n(fill, width - len));
        }
        out.push_str(&text);
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roman_months() {
        assert_eq!(month_to_roman(1), "I");
        assert_eq!(month_to_roman(4), "IV");
        assert_eq!(month_to_roman(9), "IX");
        assert_eq!(month_to_roman(12), "XII");
        assert_eq!(month_to_roman(0), "");
        assert_eq!(month_to_roman(13), "");
    }

    #[test]
    fn formats_zero_padded_number() {
        let number = format_document_number("SKH/%03d/%s/TUK.7.2./%d", 7, 10, 2026);
        assert_eq!(number, "SKH/007/X/TUK.7.2./2026");
    }

    #[test]
    fn empty_pattern_uses_default() {
        assert_eq!(format_document_number("", 12, 3, 2025), "SKH/12/III/2025");
        assert_eq!(format_document_number("   ", 1, 1, 2025), "SKH/1/I/2025");
    }

    #[test]
    fn literal_percent_and_missing_arguments() {
        assert_eq!(render("%d%%", &[FormatArg::Int(5)]), "5%");
        assert_eq!(render("A/%d/%s", &[FormatArg::Int(1)]), "A/1/%!MISSING");
        assert_eq!(render("X-%q", &[]), "X-%q");
    }

    #[test]
    fn surplus_arguments_are_ignored() {
        assert_eq!(format_document_number("STATIC", 3, 2, 2026), "STATIC");
        assert_eq!(format_document_number("N-%d", 3, 2, 2026), "N-3");
    }

    #[test]
    fn parses_running_segment() {
        assert_eq!(parse_running_number("SKH/007/X/TUK.7.2./2026"), Some(7));
        assert_eq!(parse_running_number("SKH/41/II/2026"), Some(41));
        assert_eq!(parse_running_number("SKH-41"), None);
        assert_eq!(parse_running_number("SKH/abc/II/2026"), None);
    }

    #[test]
    fn next_number_takes_the_larger_source() {
        assert_eq!(next_running_number(0, 0), 1);
        assert_eq!(next_running_number(9, 3), 10);
        assert_eq!(next_running_number(2, 40), 41);
    }

    #[test]
    fn deleted_number_keeps_original() {
        let renamed = deleted_number("SKH/007/X/2026", 1_760_000_000);
        assert_eq!(renamed, "DELETED_1760000000_SKH/007/X/2026");
        assert!(renamed.starts_with(DELETED_PREFIX));
    }
}
