//! Buckets NER spans into address levels and recovers name and phone.

use addrkit_core::patterns::{
    HAN_RUN_RE, address_keyword_count, char_len, char_slice, find_mobile, has_address_keyword,
};
use addrkit_core::{AddressField, AddressRecord, EntityCategory, EntityMappingConfig, RawEntity};
use tracing::debug;

use crate::parser::parse_address;

/// Keyword count at which a single span is treated as a whole address.
const COMPOSITE_KEYWORD_THRESHOLD: usize = 3;

/// Character length above which a lone location span is treated as a whole
/// address.
const COMPOSITE_MIN_CHARS: usize = 10;

/// Entities grouped by the category that claimed them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClassifiedEntities {
    pub province: Vec<RawEntity>,
    pub city: Vec<RawEntity>,
    pub district: Vec<RawEntity>,
    pub street: Vec<RawEntity>,
    pub address: Vec<RawEntity>,
    pub person: Vec<RawEntity>,
}

impl ClassifiedEntities {
    #[must_use]
    pub fn bucket(&self, category: EntityCategory) -> &[RawEntity] {
        match category {
            EntityCategory::Province => &self.province,
            EntityCategory::City => &self.city,
            EntityCategory::District => &self.district,
            EntityCategory::Street => &self.street,
            EntityCategory::Address => &self.address,
            EntityCategory::Person => &self.person,
        }
    }

    fn bucket_mut(&mut self, category: EntityCategory) -> &mut Vec<RawEntity> {
        match category {
            EntityCategory::Province => &mut self.province,
            EntityCategory::City => &mut self.city,
            EntityCategory::District => &mut self.district,
            EntityCategory::Street => &mut self.street,
            EntityCategory::Address => &mut self.address,
            EntityCategory::Person => &mut self.person,
        }
    }

    /// Total number of classified entities.
    #[must_use]
    pub fn len(&self) -> usize {
        EntityCategory::ORDER
            .iter()
            .map(|c| self.bucket(*c).len())
            .sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Assign every entity to the first category that accepts it.
#[must_use]
pub fn classify(entities: &[RawEntity], mapping: &EntityMappingConfig) -> ClassifiedEntities {
    let mut classified = ClassifiedEntities::default();
    for entity in entities {
        if let Some(category) = mapping.classify(&entity.entity_type, &entity.span) {
            classified.bucket_mut(category).push(entity.clone());
        }
    }
    classified
}

/// A location span that holds a whole address rather than one level.
///
/// Looks at entities whose type belongs to the province category. The first
/// span with at least three address keywords wins; otherwise a single such
/// entity longer than ten characters is returned.
#[must_use]
pub fn find_large_location_entity<'a>(
    entities: &'a [RawEntity],
    mapping: &EntityMappingConfig,
) -> Option<&'a str> {
    let province = mapping.category(EntityCategory::Province);
    let mut locations = Vec::new();

    for entity in entities
        .iter()
        .filter(|e| province.accepts_type(&e.entity_type))
    {
        if address_keyword_count(&entity.span) >= COMPOSITE_KEYWORD_THRESHOLD {
            return Some(entity.span.as_str());
        }
        locations.push(entity.span.as_str());
    }

    match locations.as_slice() {
        [single] if char_len(single) > COMPOSITE_MIN_CHARS => Some(*single),
        _ => None,
    }
}

/// Fill the region and address fields of `record` from classified buckets.
///
/// Region levels take the leftmost span of their bucket; `Address` joins all
/// address spans in position order. If province or city is still empty the
/// first province-type entity is run through [`parse_address`] and its parts
/// fill whatever is still missing.
pub fn fill_record(
    record: &mut AddressRecord,
    classified: &ClassifiedEntities,
    entities: &[RawEntity],
    mapping: &EntityMappingConfig,
) {
    let levels = [
        (EntityCategory::Province, AddressField::Province),
        (EntityCategory::City, AddressField::City),
        (EntityCategory::District, AddressField::District),
        (EntityCategory::Street, AddressField::Street),
    ];
    for (category, field) in levels {
        if let Some(first) = sorted(classified.bucket(category)).first() {
            record.set(field, first.span.clone());
        }
    }

    let address: String = sorted(&classified.address)
        .iter()
        .map(|e| e.span.as_str())
        .collect();
    if !address.is_empty() {
        record.set(AddressField::Address, address);
    }

    if record.province_name.is_empty() || record.city_name.is_empty() {
        let province = mapping.category(EntityCategory::Province);
        if let Some(entity) = entities
            .iter()
            .find(|e| province.accepts_type(&e.entity_type))
        {
            debug!("Re-parsing location span for missing levels: {}", entity.span);
            fill_missing_from_parse(record, &entity.span);
        }
    }
}

/// Populate `record` entirely from one composite address span.
pub fn fill_from_composite(record: &mut AddressRecord, span: &str) {
    let parsed = parse_address(span);
    record.set(AddressField::Province, parsed.province);
    record.set(AddressField::City, parsed.city);
    record.set(AddressField::District, parsed.district);
    record.set(AddressField::Street, parsed.street);
    record.set(AddressField::Address, parsed.address);
}

fn fill_missing_from_parse(record: &mut AddressRecord, span: &str) {
    let parsed = parse_address(span);
    let parts = [
        (AddressField::Province, parsed.province),
        (AddressField::City, parsed.city),
        (AddressField::District, parsed.district),
        (AddressField::Street, parsed.street),
        (AddressField::Address, parsed.address),
    ];
    for (field, value) in parts {
        if record.get(field).is_empty() && !value.is_empty() {
            record.set(field, value);
        }
    }
}

fn sorted(entities: &[RawEntity]) -> Vec<&RawEntity> {
    let mut refs: Vec<&RawEntity> = entities.iter().collect();
    refs.sort_by_key(|e| e.sort_key());
    refs
}

/// Character ranges of entities whose type belongs to any address category.
#[must_use]
pub fn address_ranges(entities: &[RawEntity], mapping: &EntityMappingConfig) -> Vec<(usize, usize)> {
    entities
        .iter()
        .filter(|e| mapping.is_address_type(&e.entity_type))
        .filter_map(RawEntity::range)
        .collect()
}

/// Sort and merge overlapping or touching ranges.
#[must_use]
pub fn merge_ranges(mut ranges: Vec<(usize, usize)>) -> Vec<(usize, usize)> {
    ranges.sort_unstable();
    let mut merged: Vec<(usize, usize)> = Vec::with_capacity(ranges.len());
    for (start, end) in ranges {
        match merged.last_mut() {
            Some(last) if start <= last.1 => last.1 = last.1.max(end),
            _ => merged.push((start, end)),
        }
    }
    merged
}

/// First bare 2 to 4 character Han run outside the address ranges that
/// carries no address keyword.
#[must_use]
pub fn find_name_outside(text: &str, ranges: Vec<(usize, usize)>) -> Option<String> {
    let total = char_len(text);
    let mut cursor = 0;
    let mut gaps = Vec::new();
    for (start, end) in merge_ranges(ranges) {
        if start > cursor {
            gaps.push((cursor, start));
        }
        cursor = cursor.max(end);
    }
    if cursor < total {
        gaps.push((cursor, total));
    }

    gaps.into_iter().find_map(|(start, end)| {
        HAN_RUN_RE
            .find_iter(char_slice(text, start, end))
            .map(|m| m.as_str())
            .find(|run| (2..=4).contains(&char_len(run)) && !has_address_keyword(run))
            .map(ToString::to_string)
    })
}

/// Person name: the first person entity without an address keyword, else a
/// name-shaped run outside the address ranges.
#[must_use]
pub fn extract_name(
    persons: &[RawEntity],
    text: &str,
    ranges: Vec<(usize, usize)>,
) -> Option<String> {
    sorted(persons)
        .into_iter()
        .map(|e| e.span.trim())
        .find(|span| !span.is_empty() && !has_address_keyword(span))
        .map(ToString::to_string)
        .or_else(|| find_name_outside(text, ranges))
}

/// First mobile number anywhere in `text`.
#[must_use]
pub fn extract_phone(text: &str) -> Option<String> {
    find_mobile(text).map(ToString::to_string)
}
