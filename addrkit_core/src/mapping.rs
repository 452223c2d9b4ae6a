//! Entity-type to record-field mapping used by the classifier.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Classification bucket, in evaluation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityCategory {
    Province,
    City,
    District,
    Street,
    Address,
    Person,
}

impl EntityCategory {
    /// Fixed evaluation order: the first matching category claims an entity.
    pub const ORDER: [Self; 6] = [
        Self::Province,
        Self::City,
        Self::District,
        Self::Street,
        Self::Address,
        Self::Person,
    ];

    /// Categories that describe part of an address.
    pub const ADDRESS: [Self; 5] = [
        Self::Province,
        Self::City,
        Self::District,
        Self::Street,
        Self::Address,
    ];
}

/// Source tags and optional span filters for one category.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryMapping {
    #[serde(default)]
    pub entity_types: Vec<String>,
    #[serde(default)]
    pub patterns: Vec<String>,
}

impl CategoryMapping {
    #[must_use]
    pub fn new(entity_types: &[&str], patterns: &[&str]) -> Self {
        Self {
            entity_types: entity_types.iter().map(ToString::to_string).collect(),
            patterns: patterns.iter().map(ToString::to_string).collect(),
        }
    }

    #[must_use]
    pub fn accepts_type(&self, entity_type: &str) -> bool {
        self.entity_types.iter().any(|t| t == entity_type)
    }

    /// Type must be listed; if patterns are configured the span must also
    /// contain at least one of them.
    #[must_use]
    pub fn matches(&self, entity_type: &str, span: &str) -> bool {
        self.accepts_type(entity_type)
            && (self.patterns.is_empty() || self.patterns.iter().any(|p| span.contains(p.as_str())))
    }
}

/// Mapping from record field to the entity tags that may fill it.
///
/// Keys follow the record's wire names. A category missing from a loaded
/// document is empty and never matches.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct EntityMappingConfig {
    #[serde(default)]
    pub province_name: CategoryMapping,
    #[serde(default)]
    pub city_name: CategoryMapping,
    #[serde(default)]
    pub exp_area_name: CategoryMapping,
    #[serde(default)]
    pub street_name: CategoryMapping,
    #[serde(default)]
    pub address: CategoryMapping,
    #[serde(default)]
    pub name: CategoryMapping,
}

impl Default for EntityMappingConfig {
    fn default() -> Self {
        const LOCATION: &[&str] = &["地理位置"];
        Self {
            province_name: CategoryMapping::new(LOCATION, &["省", "自治区", "特别行政区"]),
            city_name: CategoryMapping::new(LOCATION, &["市"]),
            exp_area_name: CategoryMapping::new(LOCATION, &["区", "县"]),
            street_name: CategoryMapping::new(LOCATION, &["街道", "镇", "乡"]),
            address: CategoryMapping::new(LOCATION, &["路", "街", "大道", "巷", "号", "弄", "里"]),
            name: CategoryMapping::new(&["人物"], &[]),
        }
    }
}

impl EntityMappingConfig {
    #[must_use]
    pub const fn category(&self, category: EntityCategory) -> &CategoryMapping {
        match category {
            EntityCategory::Province => &self.province_name,
            EntityCategory::City => &self.city_name,
            EntityCategory::District => &self.exp_area_name,
            EntityCategory::Street => &self.street_name,
            EntityCategory::Address => &self.address,
            EntityCategory::Person => &self.name,
        }
    }

    /// First category (in evaluation order) that claims the entity.
    #[must_use]
    pub fn classify(&self, entity_type: &str, span: &str) -> Option<EntityCategory> {
        EntityCategory::ORDER
            .into_iter()
            .find(|c| self.category(*c).matches(entity_type, span))
    }

    /// True if the tag belongs to any address category, patterns ignored.
    #[must_use]
    pub fn is_address_type(&self, entity_type: &str) -> bool {
        EntityCategory::ADDRESS
            .iter()
            .any(|c| self.category(*c).accepts_type(entity_type))
    }

    /// Extract the mapping from an entity configuration document.
    ///
    /// Accepts the full document (`entities.output_schema.mapping`), the
    /// `entities` object, an `output_schema` object, or a bare mapping.
    pub fn from_document(document: &Value) -> crate::Result<Self> {
        let mapping = [
            "/entities/output_schema/mapping",
            "/output_schema/mapping",
            "/mapping",
        ]
        .iter()
        .find_map(|path| document.pointer(path))
        .unwrap_or(document);

        if !mapping.is_object() {
            return Err(crate::Error::Config(
                "entity mapping must be a JSON object".to_string(),
            ));
        }
        Ok(serde_json::from_value(mapping.clone())?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn default_mapping_buckets_by_suffix() {
        let mapping = EntityMappingConfig::default();
        assert_eq!(mapping.classify("地理位置", "广东省"), Some(EntityCategory::Province));
        assert_eq!(mapping.classify("地理位置", "深圳市"), Some(EntityCategory::City));
        assert_eq!(mapping.classify("地理位置", "坂田街道"), Some(EntityCategory::Street));
        assert_eq!(mapping.classify("人物", "黄大大"), Some(EntityCategory::Person));
        assert_eq!(mapping.classify("组织机构", "华为"), None);
    }

    #[test]
    fn first_category_wins() {
        // "龙岗区长坑路" carries both a district and an address pattern.
        let mapping = EntityMappingConfig::default();
        assert_eq!(mapping.classify("地理位置", "龙岗区长坑路"), Some(EntityCategory::District));
    }

    #[test]
    #[expect(clippy::expect_used, reason = "Test failure should panic with context")]
    fn document_loading() {
        let doc = json!({
            "entities": {
                "output_schema": {
                    "mapping": {
                        "ProvinceName": {"entity_types": ["LOC"], "patterns": ["省"]},
                        "Name": {"entity_types": ["PER"]}
                    }
                }
            }
        });
        let mapping = EntityMappingConfig::from_document(&doc).expect("document should parse");
        assert_eq!(mapping.classify("LOC", "广东省"), Some(EntityCategory::Province));
        assert_eq!(mapping.classify("PER", "张三"), Some(EntityCategory::Person));
        assert!(mapping.city_name.entity_types.is_empty());
        assert!(mapping.is_address_type("LOC"));
        assert!(!mapping.is_address_type("PER"));
    }

    #[test]
    fn non_object_document_is_rejected() {
        assert!(EntityMappingConfig::from_document(&json!("mapping")).is_err());
    }
}
