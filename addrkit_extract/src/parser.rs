//! Regex cascade splitting a Chinese address into administrative levels.

use addrkit_core::patterns::DIRECT_MUNICIPALITIES;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

#[expect(clippy::expect_used, reason = "pattern is a compile-time constant")]
static PROVINCE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[^省市区县]+(?:省|自治区|特别行政区)").expect("province pattern should compile")
});

#[expect(clippy::expect_used, reason = "pattern is a compile-time constant")]
static CITY_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^省市区县]+市").expect("city pattern should compile"));

#[expect(clippy::expect_used, reason = "pattern is a compile-time constant")]
static DISTRICT_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[^省市区县街道镇乡]+(?:区|县)").expect("district pattern should compile")
});

#[expect(clippy::expect_used, reason = "pattern is a compile-time constant")]
static STREET_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[^省市区县街道镇乡]+(?:街道|镇|乡)").expect("street pattern should compile")
});

/// Output of [`parse_address`]; empty strings for levels that did not match.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedAddress {
    pub province: String,
    pub city: String,
    pub district: String,
    pub street: String,
    pub address: String,
}

/// Split `text` into province, city, district, street and the remainder.
///
/// Levels are matched as prefixes in strict top-down order; each match is
/// consumed before the next level is tried and a missing level never blocks
/// the ones below it. Direct-administered municipalities land in `province`.
#[must_use]
pub fn parse_address(text: &str) -> ParsedAddress {
    let mut parsed = ParsedAddress::default();
    let mut rest = text.trim();
    if rest.is_empty() {
        return parsed;
    }

    let municipality = DIRECT_MUNICIPALITIES.iter().find_map(|(full, short)| {
        let with_suffix = format!("{short}市");
        if rest.starts_with(full) {
            Some((*full).to_string())
        } else if rest.starts_with(&with_suffix) {
            Some(with_suffix)
        } else {
            None
        }
    });

    match municipality {
        Some(name) => {
            rest = rest[name.len()..].trim();
            parsed.province = name;
        }
        None => parsed.province = consume(&PROVINCE_RE, &mut rest),
    }
    parsed.city = consume(&CITY_RE, &mut rest);
    parsed.district = consume(&DISTRICT_RE, &mut rest);
    parsed.street = consume(&STREET_RE, &mut rest);
    parsed.address = rest.to_string();

    parsed
}

fn consume(re: &Regex, rest: &mut &str) -> String {
    match re.find(rest) {
        Some(m) => {
            let matched = m.as_str().to_string();
            *rest = rest[m.end()..].trim();
            matched
        }
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_address() {
        let parsed = parse_address("广东省深圳市龙岗区坂田街道长坑路西2巷2号202");
        assert_eq!(
            parsed,
            ParsedAddress {
                province: "广东省".to_string(),
                city: "深圳市".to_string(),
                district: "龙岗区".to_string(),
                street: "坂田街道".to_string(),
                address: "长坑路西2巷2号202".to_string(),
            }
        );
    }

    #[test]
    fn test_direct_municipality() {
        let parsed = parse_address("北京市朝阳区建国路1号");
        assert_eq!(parsed.province, "北京市");
        assert_eq!(parsed.city, "");
        assert_eq!(parsed.district, "朝阳区");
        assert_eq!(parsed.street, "");
        assert_eq!(parsed.address, "建国路1号");
    }

    #[test]
    fn test_autonomous_region_and_county() {
        let parsed = parse_address("广西壮族自治区南宁市武鸣县城厢镇民主路8号");
        assert_eq!(parsed.province, "广西壮族自治区");
        assert_eq!(parsed.city, "南宁市");
        assert_eq!(parsed.district, "武鸣县");
        assert_eq!(parsed.street, "城厢镇");
        assert_eq!(parsed.address, "民主路8号");
    }

    #[test]
    fn test_missing_levels_do_not_block() {
        let parsed = parse_address("深圳市 坂田街道 长坑路");
        assert_eq!(parsed.province, "");
        assert_eq!(parsed.city, "深圳市");
        assert_eq!(parsed.district, "");
        assert_eq!(parsed.street, "坂田街道");
        assert_eq!(parsed.address, "长坑路");
    }

    #[test]
    fn test_empty_and_plain_text() {
        assert_eq!(parse_address("   "), ParsedAddress::default());
        assert_eq!(parse_address("长坑路西2巷").address, "长坑路西2巷");
    }
}
