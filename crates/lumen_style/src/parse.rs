//! Small helpers for picking values back out of style text.

use std::sync::OnceLock;

use regex::Regex;

/// Pull the unsigned integers out of a style fragment, in document order.
///
/// Useful for widgets that need the numeric parts of a resolved token such
/// as `"4px 8px"` or `"1px solid"`.
///
/// ```
/// use lumen_style::parse::extract_numbers;
///
/// assert_eq!(extract_numbers("padding: 4px 8px;"), vec![4, 8]);
/// assert_eq!(extract_numbers("none"), Vec::<i64>::new());
/// ```
pub fn extract_numbers(input: &str) -> Vec<i64> {
    static NUMBER: OnceLock<Regex> = OnceLock::new();
    let pattern = NUMBER.get_or_init(|| Regex::new(r"\d+").expect("static pattern"));
    pattern
        .find_iter(input)
        .filter_map(|m| m.as_str().parse().ok())
        .collect()
}
