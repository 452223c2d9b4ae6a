//! Splits free text into person name, phone number and address.
//!
//! Input is expected to look like `地址 姓名 电话` but tokens may come in any
//! order. The phone is located first; the text before it is tokenized on
//! whitespace and each token is assigned to the address or the name.

use addrkit_core::patterns::{
    FIXED_LINE_RE, MOBILE_RE, char_len, contains_digit, has_address_keyword, is_bare_name,
};
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Result of [`decompose`]. Empty strings mean "not found".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Decomposition {
    pub person_name: String,
    pub phone: String,
    pub address: String,
    /// Text after the phone number, trimmed. Kept for inspection only and
    /// never assigned to a field.
    pub trailing: String,
}

/// Split `raw` into name, phone and address.
#[must_use]
pub fn decompose(raw: &str) -> Decomposition {
    let mut result = Decomposition::default();

    let phone = MOBILE_RE.find(raw).or_else(|| FIXED_LINE_RE.find(raw));
    let before = match phone {
        Some(m) => {
            result.phone = m.as_str().to_string();
            result.trailing = raw[m.end()..].trim().to_string();
            &raw[..m.start()]
        }
        None => raw,
    };

    let tokens: Vec<&str> = before.split_whitespace().collect();
    if tokens.is_empty() {
        return result;
    }

    let (address, names) = match tokens.iter().position(|t| is_address_like(t)) {
        Some(start) => split_from_start(&tokens, start),
        None => split_without_start(&tokens),
    };

    result.address = join_address(&address, raw);
    result.person_name = names.join(" ");
    result
}

fn is_address_like(token: &str) -> bool {
    has_address_keyword(token) || contains_digit(token)
}

fn is_name_token(token: &str) -> bool {
    is_bare_name(token) && !has_address_keyword(token)
}

/// Assign tokens once the first address-like token at `start` is known.
fn split_from_start<'a>(tokens: &[&'a str], start: usize) -> (Vec<&'a str>, Vec<&'a str>) {
    let mut address = Vec::new();
    let mut names = Vec::new();

    for token in &tokens[..start] {
        if is_bare_name(token) {
            names.push(*token);
        } else {
            address.push(*token);
        }
    }

    let run_start = address.len();
    for (i, token) in tokens.iter().enumerate().skip(start) {
        if is_name_token(token) {
            // first name-shaped token closes the address
            names.extend_from_slice(&tokens[i..]);
            break;
        }
        if is_address_like(token) || address.len() > run_start {
            address.push(*token);
        } else {
            names.push(*token);
        }
    }

    (address, names)
}

/// Per-token fallback when no token carries a keyword or digit.
fn split_without_start<'a>(tokens: &[&'a str]) -> (Vec<&'a str>, Vec<&'a str>) {
    let mut address = Vec::new();
    let mut names = Vec::new();
    for token in tokens {
        if contains_digit(token) && char_len(token) > 2 {
            address.push(*token);
        } else if is_bare_name(token) {
            names.push(*token);
        } else {
            address.push(*token);
        }
    }
    (address, names)
}

/// Concatenate address tokens, keeping a single space only where the raw
/// text separated that exact pair with whitespace.
fn join_address(tokens: &[&str], raw: &str) -> String {
    let mut joined = String::new();
    for (i, token) in tokens.iter().enumerate() {
        if i > 0 && separated_in(raw, tokens[i - 1], token) {
            joined.push(' ');
        }
        joined.push_str(token);
    }
    joined
}

fn separated_in(raw: &str, prev: &str, next: &str) -> bool {
    let pattern = format!(r"{}\s+{}", regex::escape(prev), regex::escape(next));
    Regex::new(&pattern).is_ok_and(|re| re.is_match(raw))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_address_name_phone() {
        let d = decompose("广东省深圳市龙岗区坂田街道长坑路西2巷2号202 黄大大 18273778575");
        assert_eq!(d.phone, "18273778575");
        assert_eq!(d.address, "广东省深圳市龙岗区坂田街道长坑路西2巷2号202");
        assert_eq!(d.person_name, "黄大大");
        assert_eq!(d.trailing, "");
    }

    #[test]
    fn test_spaced_address_keeps_single_spaces() {
        let d = decompose("广东省深圳市  龙岗区 坂田街道 黄大大 18273778575");
        assert_eq!(d.address, "广东省深圳市 龙岗区 坂田街道");
        assert_eq!(d.person_name, "黄大大");
    }

    #[test]
    fn test_name_before_address() {
        let d = decompose("黄大大 广东省深圳市龙岗区 18273778575");
        assert_eq!(d.person_name, "黄大大");
        assert_eq!(d.address, "广东省深圳市龙岗区");
    }

    #[test]
    fn test_leading_tokens_keep_order() {
        let d = decompose("张三 李四 深圳市南山区 13800138000");
        assert_eq!(d.person_name, "张三 李四");
        assert_eq!(d.address, "深圳市南山区");
    }

    #[test]
    fn test_name_terminates_address() {
        let d = decompose("深圳市南山区 科技园 王五 备注 13800138000");
        assert_eq!(d.address, "深圳市南山区");
        assert_eq!(d.person_name, "科技园 王五 备注");
    }

    #[test]
    fn test_fixed_line_and_trailing_text() {
        let d = decompose("北京市朝阳区建国路1号 王五 010-12345678 工作日送达");
        assert_eq!(d.phone, "010-12345678");
        assert_eq!(d.address, "北京市朝阳区建国路1号");
        assert_eq!(d.person_name, "王五");
        assert_eq!(d.trailing, "工作日送达");
    }

    #[test]
    fn test_no_phone_no_keyword_fallback() {
        let d = decompose("黄大大 abc");
        assert_eq!(d.phone, "");
        assert_eq!(d.person_name, "黄大大");
        assert_eq!(d.address, "abc");
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(decompose(""), Decomposition::default());
        assert_eq!(decompose("   "), Decomposition::default());
    }

    #[test]
    fn test_phone_only() {
        let d = decompose("18273778575");
        assert_eq!(d.phone, "18273778575");
        assert!(d.address.is_empty());
        assert!(d.person_name.is_empty());
    }
}
