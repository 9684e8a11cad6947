use regex::Regex;
use std::sync::OnceLock;

static LINE_NUMBER_REGEX: OnceLock<Regex> = OnceLock::new();

fn line_number_regex() -> &'static Regex {
    LINE_NUMBER_REGEX.get_or_init(|| {
        Regex::new(r"(?:L|line-)?(\d+)").expect("line number pattern is valid")
    })
}

/// Extract the 1-based line number from a link fragment.
///
/// Accepts `L42`, `line-42` or `42`; the first run of digits wins.
pub fn line_number_from_fragment(fragment: &str) -> Option<u32> {
    line_number_regex()
        .captures(fragment)
        .and_then(|caps| caps.get(1))
        .and_then(|digits| digits.as_str().parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("L42", Some(42))]
    #[case("line-7", Some(7))]
    #[case("15", Some(15))]
    #[case("L1", Some(1))]
    #[case("section-3-L9", Some(3))]
    #[case("installation", None)]
    #[case("line-", None)]
    #[case("", None)]
    #[case("L99999999999", None)]
    fn test_line_number_from_fragment(#[case] fragment: &str, #[case] expected: Option<u32>) {
        assert_eq!(line_number_from_fragment(fragment), expected);
    }
}
