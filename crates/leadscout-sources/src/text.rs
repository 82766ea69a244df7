//! Small text helpers shared by the scraping sources.

/// Collapses runs of whitespace into single spaces and trims the ends.
pub(crate) fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// `"auto repair"` → `"Auto Repair"`.
pub(crate) fn title_case(s: &str) -> String {
    s.split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => {
                    first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase()
                }
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Lower-cases and strips whitespace so `"Auto Repair"` and `"autorepair"`
/// compare equal.
pub(crate) fn category_key(s: &str) -> String {
    s.chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_lowercase)
        .collect()
}

/// Category label attached to records, or `None` for the catch-all query.
pub(crate) fn category_label(category: &str) -> Option<String> {
    let trimmed = category.trim();
    if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("all") {
        None
    } else {
        Some(title_case(trimmed))
    }
}

pub(crate) fn digit_count(s: &str) -> usize {
    s.chars().filter(char::is_ascii_digit).count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collapse_whitespace_trims_and_joins() {
        assert_eq!(collapse_whitespace("  Quick \n Fix\tPlumbing "), "Quick Fix Plumbing");
    }

    #[test]
    fn title_case_capitalizes_each_word() {
        assert_eq!(title_case("auto REPAIR"), "Auto Repair");
        assert_eq!(title_case(""), "");
    }

    #[test]
    fn category_key_ignores_case_and_spaces() {
        assert_eq!(category_key("Auto Repair"), "autorepair");
        assert_eq!(category_key("hvac"), "hvac");
    }

    #[test]
    fn category_label_skips_catch_all() {
        assert_eq!(category_label("all"), None);
        assert_eq!(category_label("  "), None);
        assert_eq!(category_label("plumber").as_deref(), Some("Plumber"));
    }

    #[test]
    fn digit_count_counts_ascii_digits() {
        assert_eq!(digit_count("(775) 555-0101"), 10);
        assert_eq!(digit_count("no digits"), 0);
    }
}
