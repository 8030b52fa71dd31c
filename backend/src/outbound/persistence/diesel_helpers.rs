//! Small query helpers shared by the Diesel repositories.

use crate::domain::SearchKeyword;

/// `ILIKE` pattern matching `keyword` anywhere in a column.
///
/// `%`, `_` and `\` are escaped with PostgreSQL's default escape character so
/// they match literally.
pub(crate) fn contains_pattern(keyword: &SearchKeyword) -> String {
    let raw = keyword.as_str();
    let mut pattern = String::with_capacity(raw.len() + 2);
    pattern.push('%');
    for ch in raw.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(ch);
    }
    pattern.push('%');
    pattern
}

/// Convert a Diesel affected-row count to the ports' `u64`.
pub(crate) fn to_count(rows: usize) -> u64 {
    u64::try_from(rows).unwrap_or(u64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("bosch", "%bosch%")]
    #[case("50%", "%50\\%%")]
    #[case("F_1", "%F\\_1%")]
    #[case("a\\b", "%a\\\\b%")]
    fn escapes_like_metacharacters(#[case] keyword: &str, #[case] expected: &str) {
        let keyword = SearchKeyword::new(keyword).expect("valid keyword");

        assert_eq!(contains_pattern(&keyword), expected);
    }

    #[rstest]
    fn counts_convert_losslessly() {
        assert_eq!(to_count(42), 42);
    }
}
