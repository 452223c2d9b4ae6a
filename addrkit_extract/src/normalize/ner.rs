use addrkit_core::{
    AddressField, AddressRecord, EntityMappingConfig, EntityPayload, ResultNormalizer,
};
use serde_json::Value;
use tracing::debug;

use super::unwrap_output;
use crate::classify::{
    address_ranges, classify, extract_name, extract_phone, fill_from_composite, fill_record,
    find_large_location_entity,
};

/// Normalizer for general NER taggers (`人物` / `地理位置` style labels).
///
/// Spans are bucketed through the configured [`EntityMappingConfig`]. When the
/// model returned one big location span it is parsed as a whole address
/// instead of trusting the per-level buckets.
pub struct NerNormalizer {
    mapping: EntityMappingConfig,
}

impl NerNormalizer {
    #[must_use]
    pub const fn new(mapping: EntityMappingConfig) -> Self {
        Self { mapping }
    }
}

impl ResultNormalizer for NerNormalizer {
    fn normalize(&self, output: &Value, text: &str) -> addrkit_core::Result<AddressRecord> {
        let unwrapped = unwrap_output(output, text)?;
        let text = unwrapped.text;
        let entities_value = unwrapped.payload.get("entities").unwrap_or(&Value::Null);
        let entities = EntityPayload::from_value(entities_value).into_entities(text);

        let mut record = AddressRecord::default();
        if entities.is_empty() {
            debug!("No entities in NER output");
            if let Some(phone) = extract_phone(text) {
                record.set(AddressField::Mobile, phone);
            }
            return Ok(record);
        }

        let classified = classify(&entities, &self.mapping);
        match find_large_location_entity(&entities, &self.mapping) {
            Some(span) => {
                debug!("Parsing composite location span: {span}");
                fill_from_composite(&mut record, span);
            }
            None => fill_record(&mut record, &classified, &entities, &self.mapping),
        }

        let ranges = address_ranges(&entities, &self.mapping);
        if let Some(name) = extract_name(&classified.person, text, ranges) {
            record.set(AddressField::Name, name);
        }
        if let Some(phone) = extract_phone(text) {
            record.set(AddressField::Mobile, phone);
        }

        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const TEXT: &str = "广东省深圳市龙岗区坂田街道长坑路西2巷2号202 黄大大 18273778575";

    #[test]
    #[expect(clippy::expect_used, reason = "Test failure should panic with context")]
    fn test_per_level_spans() {
        // detailed span kept under three keywords so it is not treated as composite
        let text = "广东省深圳市龙岗区坂田街道长坑路西2巷202 黄大大 18273778575";
        let output = json!({
            "text": text,
            "entities": {
                "output": [
                    [{"type": "地理位置", "span": "广东省", "offset": [0, 3]}],
                    [{"type": "地理位置", "span": "深圳市", "offset": [3, 6]}],
                    [{"type": "地理位置", "span": "龙岗区", "offset": [6, 9]}],
                    [{"type": "地理位置", "span": "坂田街道", "offset": [9, 13]}],
                    [{"type": "地理位置", "span": "长坑路西2巷202", "offset": [13, 22]}],
                    [{"type": "人物", "span": "黄大大", "offset": [23, 26]}]
                ]
            }
        });
        let record = NerNormalizer::new(EntityMappingConfig::default())
            .normalize(&output, "")
            .expect("output should normalize");

        assert_eq!(record.province_name, "广东省");
        assert_eq!(record.city_name, "深圳市");
        assert_eq!(record.exp_area_name, "龙岗区");
        assert_eq!(record.street_name, "坂田街道");
        assert_eq!(record.address, "长坑路西2巷202");
        assert_eq!(record.name, "黄大大");
        assert_eq!(record.mobile, "18273778575");
    }

    #[test]
    #[expect(clippy::expect_used, reason = "Test failure should panic with context")]
    fn test_composite_span_is_parsed() {
        let output = json!({
            "entities": {
                "地理位置": [{"text": "广东省深圳市龙岗区坂田街道长坑路西2巷2号202", "start": 0, "end": 24}]
            }
        });
        let record = NerNormalizer::new(EntityMappingConfig::default())
            .normalize(&output, TEXT)
            .expect("output should normalize");

        assert_eq!(record.province_name, "广东省");
        assert_eq!(record.street_name, "坂田街道");
        assert_eq!(record.address, "长坑路西2巷2号202");
        // no person entity, the name comes from outside the location span
        assert_eq!(record.name, "黄大大");
    }

    #[test]
    #[expect(clippy::expect_used, reason = "Test failure should panic with context")]
    fn test_no_entities_keeps_phone() {
        let output = json!({"entities": {"output": []}});
        let record = NerNormalizer::new(EntityMappingConfig::default())
            .normalize(&output, "黄大大 18273778575")
            .expect("output should normalize");
        assert!(record.has_no_address());
        assert_eq!(record.mobile, "18273778575");
        assert_eq!(record.name, "");
    }

    #[test]
    fn test_error_output() {
        let output = json!({"error": "inference failed"});
        let result = NerNormalizer::new(EntityMappingConfig::default()).normalize(&output, TEXT);
        assert!(matches!(result, Err(addrkit_core::Error::Backend(_))));
    }
}
