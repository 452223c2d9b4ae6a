//! Keyword tables and regular expressions shared by the extraction stages.

use once_cell::sync::Lazy;
use regex::Regex;

/// Lexical markers of an address fragment.
pub const ADDRESS_KEYWORDS: &[&str] = &[
    "省", "市", "区", "县", "镇", "街道", "路", "街", "号", "村", "组", "小区", "大厦", "广场", "园区",
    "工业区", "开发区", "新区", "大道", "巷", "弄", "里", "幢", "栋", "单元", "室", "层", "自治区",
    "特别行政区",
];

/// Direct-administered municipalities as `(full name, short name)`.
pub const DIRECT_MUNICIPALITIES: &[(&str, &str)] = &[
    ("北京市", "北京"),
    ("上海市", "上海"),
    ("天津市", "天津"),
    ("重庆市", "重庆"),
];

#[expect(clippy::expect_used, reason = "pattern is a compile-time constant")]
pub static MOBILE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"1[3-9]\d{9}").expect("mobile pattern should compile"));

#[expect(clippy::expect_used, reason = "pattern is a compile-time constant")]
pub static FIXED_LINE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"0\d{2,3}-?\d{7,8}").expect("fixed-line pattern should compile"));

/// A whole string of 2 to 4 Han characters.
#[expect(clippy::expect_used, reason = "pattern is a compile-time constant")]
pub static BARE_NAME_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[\x{4e00}-\x{9fa5}]{2,4}$").expect("name pattern should compile")
});

#[expect(clippy::expect_used, reason = "pattern is a compile-time constant")]
pub static HAN_RUN_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[\x{4e00}-\x{9fa5}]+").expect("han run pattern should compile"));

#[expect(clippy::expect_used, reason = "pattern is a compile-time constant")]
static DIGIT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\d").expect("digit pattern should compile"));

#[must_use]
pub fn has_address_keyword(text: &str) -> bool {
    ADDRESS_KEYWORDS.iter().any(|kw| text.contains(kw))
}

/// Number of distinct keywords present in `text` (overlapping keywords such
/// as `区` and `自治区` each count).
#[must_use]
pub fn address_keyword_count(text: &str) -> usize {
    ADDRESS_KEYWORDS.iter().filter(|kw| text.contains(*kw)).count()
}

#[must_use]
pub fn contains_digit(text: &str) -> bool {
    DIGIT_RE.is_match(text)
}

#[must_use]
pub fn is_bare_name(text: &str) -> bool {
    BARE_NAME_RE.is_match(text)
}

/// First 11-digit mobile number in `text`.
#[must_use]
pub fn find_mobile(text: &str) -> Option<&str> {
    MOBILE_RE.find(text).map(|m| m.as_str())
}

#[must_use]
pub fn char_len(text: &str) -> usize {
    text.chars().count()
}

/// Substring between two character offsets, clamped to the text.
#[must_use]
pub fn char_slice(text: &str, start: usize, end: usize) -> &str {
    let byte_at = |idx: usize| {
        text.char_indices()
            .nth(idx)
            .map_or(text.len(), |(byte, _)| byte)
    };
    let from = byte_at(start);
    let to = byte_at(end).max(from);
    &text[from..to]
}

/// Character offset of the first occurrence of `needle`.
#[must_use]
pub fn char_find(text: &str, needle: &str) -> Option<usize> {
    if needle.is_empty() {
        return None;
    }
    text.find(needle).map(|byte| text[..byte].chars().count())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keyword_detection() {
        assert!(has_address_keyword("长坑路西2巷"));
        assert!(!has_address_keyword("黄大大"));
        assert_eq!(address_keyword_count("广东省深圳市龙岗区"), 3);
    }

    #[test]
    fn bare_name_is_anchored() {
        assert!(is_bare_name("黄大大"));
        assert!(is_bare_name("欧阳娜娜"));
        assert!(!is_bare_name("黄"));
        assert!(!is_bare_name("黄大大大大"));
        assert!(!is_bare_name("黄大大1"));
    }

    #[test]
    fn mobile_search() {
        assert_eq!(find_mobile("黄大大 18273778575"), Some("18273778575"));
        assert_eq!(find_mobile("0755-12345678"), None);
    }

    #[test]
    fn char_offsets() {
        let text = "广东省深圳市";
        assert_eq!(char_slice(text, 3, 6), "深圳市");
        assert_eq!(char_slice(text, 4, 100), "圳市");
        assert_eq!(char_slice(text, 5, 2), "");
        assert_eq!(char_find(text, "深圳"), Some(3));
        assert_eq!(char_find(text, "北京"), None);
        assert_eq!(char_find(text, ""), None);
    }
}
