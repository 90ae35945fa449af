/// Canonical form of a display title used as the matching key.
///
/// Lower-cases, collapses whitespace runs to a single space and trims both
/// ends. Titles are "the same entry" iff their normalized forms are equal;
/// there is no fuzzy matching beyond this.
pub fn normalize_title(title: &str) -> String {
    let mut out = String::with_capacity(title.len());
    for word in title.split_whitespace() {
        if !out.is_empty() {
            out.push(' ');
        }
        out.push_str(&word.to_lowercase());
    }
    out
}
