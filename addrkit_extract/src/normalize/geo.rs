use addrkit_core::entity::sort_by_start;
use addrkit_core::patterns::{MOBILE_RE, is_bare_name};
use addrkit_core::{AddressField, AddressRecord, EntityPayload, RegionLevel, ResultNormalizer};
use serde_json::Value;

use super::unwrap_output;
use crate::classify::{extract_phone, find_name_outside};

/// Label set of a geographic tagging model.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeoScheme {
    /// `PB`/`PC`/`PD`/`PF` levels, `RD`/`UA`/`NumEng` address parts, `ZZ` other.
    Composition,
    /// `prov`/`city`/`district`/`town` levels, `road`/`road_number`/`poi`/
    /// `house_number` address parts, `other` other.
    Tagging,
}

/// What a label contributes to the record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum GeoRole {
    Level(RegionLevel),
    Address,
    Other,
}

impl GeoScheme {
    fn role(self, label: &str) -> Option<GeoRole> {
        let role = match (self, label) {
            (Self::Composition, "PB") | (Self::Tagging, "prov") => {
                GeoRole::Level(RegionLevel::Province)
            }
            (Self::Composition, "PC") | (Self::Tagging, "city") => GeoRole::Level(RegionLevel::City),
            (Self::Composition, "PD") | (Self::Tagging, "district") => {
                GeoRole::Level(RegionLevel::District)
            }
            (Self::Composition, "PF") | (Self::Tagging, "town") => {
                GeoRole::Level(RegionLevel::Street)
            }
            (Self::Composition, "RD" | "UA" | "NumEng")
            | (Self::Tagging, "road" | "road_number" | "poi" | "house_number") => GeoRole::Address,
            (Self::Composition, "ZZ") | (Self::Tagging, "other") => GeoRole::Other,
            _ => return None,
        };
        Some(role)
    }
}

/// Normalizer for the geographic tagging models.
///
/// Spans are visited in position order. A later span of the same level
/// overwrites an earlier one, address parts are concatenated and `other`
/// spans are checked for a phone number or a bare name.
pub struct GeoTagNormalizer {
    scheme: GeoScheme,
}

impl GeoTagNormalizer {
    #[must_use]
    pub const fn new(scheme: GeoScheme) -> Self {
        Self { scheme }
    }
}

impl ResultNormalizer for GeoTagNormalizer {
    fn normalize(&self, output: &Value, text: &str) -> addrkit_core::Result<AddressRecord> {
        let unwrapped = unwrap_output(output, text)?;
        let text = unwrapped.text;
        let entities_value = unwrapped.payload.get("entities").unwrap_or(&Value::Null);
        let mut entities = EntityPayload::from_value(entities_value).into_entities(text);
        sort_by_start(&mut entities);

        let mut record = AddressRecord::default();
        let mut address = String::new();
        let mut address_ranges = Vec::new();

        for entity in &entities {
            let Some(role) = self.scheme.role(&entity.entity_type) else {
                continue;
            };
            match role {
                GeoRole::Level(level) => {
                    record.set(level.field(), entity.span.clone());
                    address_ranges.extend(entity.range());
                }
                GeoRole::Address => {
                    address.push_str(&entity.span);
                    address_ranges.extend(entity.range());
                }
                GeoRole::Other => {
                    let span = entity.span.trim();
                    match MOBILE_RE.find(span) {
                        Some(m) if m.start() == 0 => record.set(AddressField::Mobile, m.as_str()),
                        _ if is_bare_name(span) => record.set(AddressField::Name, span),
                        _ => {}
                    }
                }
            }
        }
        record.set(AddressField::Address, address);

        if record.mobile.is_empty() {
            if let Some(phone) = extract_phone(text) {
                record.set(AddressField::Mobile, phone);
            }
        }
        if record.name.is_empty() {
            if let Some(name) = find_name_outside(text, address_ranges) {
                record.set(AddressField::Name, name);
            }
        }

        Ok(record)
    }
}
