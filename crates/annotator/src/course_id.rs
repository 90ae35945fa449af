use once_cell::sync::Lazy;
use regex::Regex;

/// Markup patterns carrying the course id, most specific first.
static COURSE_ID_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r#"data-clp-course-id\s*=\s*["'](\d+)["']"#,
        r#"data-course-id\s*=\s*["'](\d+)["']"#,
        r#""course_?[iI]d"\s*:\s*"?(\d+)"#,
    ]
    .iter()
    .filter_map(|pattern| Regex::new(pattern).ok())
    .collect()
});

/// Finds the course id in page markup; `None` means the page is not a
/// course page and nothing should activate.
pub fn extract_course_id(markup: &str) -> Option<u64> {
    COURSE_ID_PATTERNS.iter().find_map(|pattern| {
        pattern
            .captures(markup)
            .and_then(|caps| caps.get(1))
            .and_then(|m| m.as_str().parse().ok())
    })
}
