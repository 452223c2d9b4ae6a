//! Region-chain reconciliation.
//!
//! [`AddressCompleter`] anchors on the most specific filled region field,
//! walks the parent chain in the reference store and then fills, keeps or
//! replaces the province, city, district and street fields against it.

use std::collections::HashMap;

use addrkit_core::{AddressField, AddressRecord, RegionLevel, RegionRecord, RegionStore, RegionTypeCodes};
use tracing::{debug, error, info, warn};

/// Hierarchy depth; a chain never has more entries than this.
const MAX_CHAIN_DEPTH: usize = 4;

/// Canonical and alternate spelling of one region on the chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChainEntry {
    pub region_name: String,
    pub alias_name: Option<String>,
}

impl ChainEntry {
    fn from_region(region: &RegionRecord) -> Self {
        Self {
            // trimmed on purpose so a second pass compares equal to the fill
            region_name: region.region_name.trim().to_string(),
            alias_name: region.alias().map(ToString::to_string),
        }
    }
}

/// Regions above (and including) the anchor, keyed by level.
pub type ParentChain = HashMap<RegionLevel, ChainEntry>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChangeKind {
    /// Field was empty and took the canonical name.
    Filled,
    /// Field matched neither canonical name nor alias.
    Replaced { previous: String },
}

/// One modification made by the completer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldChange {
    pub field: AddressField,
    pub value: String,
    pub kind: ChangeKind,
}

/// Result of [`AddressCompleter::complete_with_changes`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Completion {
    pub record: AddressRecord,
    pub changes: Vec<FieldChange>,
}

impl Completion {
    fn unchanged(record: &AddressRecord) -> Self {
        Self {
            record: record.clone(),
            changes: Vec::new(),
        }
    }
}

/// Validates and completes the region fields of a record against the store.
///
/// Never fails: store errors are logged and the input record is returned
/// unchanged.
pub struct AddressCompleter<S> {
    store: S,
    codes: RegionTypeCodes,
}

impl<S: RegionStore> AddressCompleter<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            codes: RegionTypeCodes::default(),
        }
    }

    #[must_use]
    pub fn with_codes(mut self, codes: RegionTypeCodes) -> Self {
        self.codes = codes;
        self
    }

    /// Reconcile `record` and return the result.
    pub async fn complete(&self, record: &AddressRecord) -> AddressRecord {
        self.complete_with_changes(record).await.record
    }

    /// Reconcile `record`, also reporting which fields were touched.
    pub async fn complete_with_changes(&self, record: &AddressRecord) -> Completion {
        match self.try_complete(record).await {
            Ok(completion) => completion,
            Err(e) => {
                error!("Address completion failed, keeping input record: {e:#}");
                Completion::unchanged(record)
            }
        }
    }

    async fn try_complete(&self, record: &AddressRecord) -> anyhow::Result<Completion> {
        let Some((level, name)) = anchor(record) else {
            debug!("No region field to anchor on");
            return Ok(Completion::unchanged(record));
        };

        let Some(start) = self
            .store
            .find_by_name_and_type(name, self.codes.code(level))
            .await?
        else {
            warn!("Anchor region not found: {level}={name}");
            return Ok(Completion::unchanged(record));
        };

        let chain = self.parent_chain(start).await?;

        let mut completed = record.clone();
        let mut changes = Vec::new();
        // Every field is compared against the chain only, so the order here
        // never changes the outcome.
        for level in RegionLevel::TOP_DOWN {
            let Some(entry) = chain.get(&level) else {
                continue;
            };
            changes.extend(reconcile_field(&mut completed, level.field(), entry));
        }

        Ok(Completion {
            record: completed,
            changes,
        })
    }

    /// Follow parent pointers from `start`, collecting at most one region per
    /// level.
    pub async fn parent_chain(&self, start: RegionRecord) -> anyhow::Result<ParentChain> {
        let mut chain = ParentChain::new();
        let mut current = start;

        for _ in 0..MAX_CHAIN_DEPTH {
            match self.codes.level(current.region_type) {
                Some(level) => {
                    chain.insert(level, ChainEntry::from_region(&current));
                }
                None => debug!(
                    "Region {} has unknown type {}",
                    current.id, current.region_type
                ),
            }

            let Some(parent_id) = current.parent() else {
                break;
            };

            let parent = match self.codes.parent_code(current.region_type) {
                Some(parent_type) => {
                    self.store
                        .find_by_type_and_id(parent_type, parent_id)
                        .await?
                }
                None => self.store.find_by_id(parent_id).await?,
            };

            match parent {
                Some(parent) => current = parent,
                None => {
                    warn!("Parent region {parent_id} of {} not found", current.id);
                    break;
                }
            }
        }

        Ok(chain)
    }
}

/// Most specific non-blank region field of the record.
#[must_use]
pub fn anchor(record: &AddressRecord) -> Option<(RegionLevel, &str)> {
    RegionLevel::ANCHOR_ORDER.into_iter().find_map(|level| {
        let value = record.get(level.field()).trim();
        (!value.is_empty()).then_some((level, value))
    })
}

fn reconcile_field(
    record: &mut AddressRecord,
    field: AddressField,
    entry: &ChainEntry,
) -> Option<FieldChange> {
    let current = record.get(field).trim().to_string();

    if current.is_empty() {
        info!("Filled {field} with {}", entry.region_name);
        record.set(field, entry.region_name.clone());
        return Some(FieldChange {
            field,
            value: entry.region_name.clone(),
            kind: ChangeKind::Filled,
        });
    }

    if current == entry.region_name {
        return None;
    }

    if entry.alias_name.as_deref() == Some(current.as_str()) {
        debug!("Kept alias {current} for {field} ({})", entry.region_name);
        return None;
    }

    info!("Replaced {field}: {current} -> {}", entry.region_name);
    record.set(field, entry.region_name.clone());
    Some(FieldChange {
        field,
        value: entry.region_name.clone(),
        kind: ChangeKind::Replaced { previous: current },
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(name: &str, alias: Option<&str>) -> ChainEntry {
        ChainEntry {
            region_name: name.to_string(),
            alias_name: alias.map(ToString::to_string),
        }
    }

    #[test]
    fn anchor_prefers_most_specific_field() {
        let mut record = AddressRecord::default();
        assert_eq!(anchor(&record), None);

        record.set(AddressField::Province, "广东省");
        record.set(AddressField::City, "深圳市");
        assert_eq!(anchor(&record), Some((RegionLevel::City, "深圳市")));

        record.set(AddressField::Street, "  坂田街道 ");
        assert_eq!(anchor(&record), Some((RegionLevel::Street, "坂田街道")));
    }

    #[test]
    fn whitespace_only_field_is_not_an_anchor() {
        let mut record = AddressRecord::default();
        record.set(AddressField::District, "   ");
        record.set(AddressField::Province, "广东省");
        assert_eq!(anchor(&record), Some((RegionLevel::Province, "广东省")));
    }

    #[test]
    fn reconcile_fills_keeps_and_replaces() {
        let shenzhen = entry("深圳市", Some("深圳"));
        let mut record = AddressRecord::default();

        let change = reconcile_field(&mut record, AddressField::City, &shenzhen);
        assert_eq!(change.map(|c| c.kind), Some(ChangeKind::Filled));
        assert_eq!(record.city_name, "深圳市");

        record.set(AddressField::City, "深圳");
        assert!(reconcile_field(&mut record, AddressField::City, &shenzhen).is_none());
        assert_eq!(record.city_name, "深圳");

        record.set(AddressField::City, " 深圳市 ");
        assert!(reconcile_field(&mut record, AddressField::City, &shenzhen).is_none());

        record.set(AddressField::City, "珠海");
        let change = reconcile_field(&mut record, AddressField::City, &shenzhen);
        assert_eq!(
            change.map(|c| c.kind),
            Some(ChangeKind::Replaced {
                previous: "珠海".to_string()
            })
        );
        assert_eq!(record.city_name, "深圳市");
    }

    #[test]
    fn missing_alias_never_matches() {
        let guangdong = entry("广东省", None);
        let mut record = AddressRecord::default();
        record.set(AddressField::Province, "广东");
        let change = reconcile_field(&mut record, AddressField::Province, &guangdong);
        assert!(change.is_some());
        assert_eq!(record.province_name, "广东省");
    }
}
