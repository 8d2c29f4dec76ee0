/// Whole-number percentage of `part` in `whole`, rounded and clamped to 0..=100.
/// An empty whole counts as 0%.
pub fn percent(part: usize, whole: usize) -> u8 {
    if whole == 0 {
        return 0;
    }

    // round half up on 100 * part / whole without leaving integers
    ((200 * part + whole) / (2 * whole)).min(100) as u8
}

/// Render a countdown as m:ss
pub fn format_countdown(secs: u64) -> String {
    format!("{}:{:02}", secs / 60, secs % 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_percent_rounding() {
        assert_eq!(percent(1, 3), 33);
        assert_eq!(percent(2, 3), 67);
        assert_eq!(percent(1, 2), 50);
        assert_eq!(percent(3, 3), 100);
    }

    #[test]
    fn test_percent_exact_halves_round_up() {
        assert_eq!(percent(23, 40), 58);
        assert_eq!(percent(29, 200), 15);
        assert_eq!(percent(57, 200), 29);
        assert_eq!(percent(1, 8), 13);
    }

    #[test]
    fn test_percent_empty_whole() {
        assert_eq!(percent(0, 0), 0);
        assert_eq!(percent(5, 0), 0);
    }

    #[test]
    fn test_percent_clamped() {
        assert_eq!(percent(7, 3), 100);
    }

    #[test]
    fn test_format_countdown() {
        assert_eq!(format_countdown(45), "0:45");
        assert_eq!(format_countdown(60), "1:00");
        assert_eq!(format_countdown(125), "2:05");
        assert_eq!(format_countdown(0), "0:00");
    }
}
