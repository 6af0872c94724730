use regex::Regex;
use std::sync::OnceLock;

fn digit_run() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[0-9]+").expect("valid regex"))
}

/// Number of recipes the caller asked for, taken from the first run of
/// decimal digits in the query ("give me 3 pasta recipes" -> 3).
///
/// Falls back to `default` when there are no digits or the number does not
/// fit in a `usize`.
pub fn extract_result_count(query: &str, default: usize) -> usize {
    digit_run()
        .find(query)
        .and_then(|m| m.as_str().parse().ok())
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_digit_run_wins() {
        assert_eq!(extract_result_count("give me 3 pasta recipes", 5), 3);
        assert_eq!(extract_result_count("12 soups for 4 people", 5), 12);
        assert_eq!(extract_result_count("top10 curries", 5), 10);
    }

    #[test]
    fn test_default_without_digits() {
        assert_eq!(extract_result_count("pasta recipes", 5), 5);
        assert_eq!(extract_result_count("", 7), 7);
    }

    #[test]
    fn test_zero_and_overflow() {
        assert_eq!(extract_result_count("0 recipes", 5), 0);
        assert_eq!(
            extract_result_count("99999999999999999999999999 cookies", 5),
            5
        );
    }

    #[test]
    fn test_non_ascii_digits_ignored() {
        // only ASCII digits count
        assert_eq!(extract_result_count("٣ recipes", 5), 5);
    }
}
