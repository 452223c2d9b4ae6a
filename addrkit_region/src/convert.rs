use addrkit_core::RegionRecord;
use addrkit_entities::regions;

pub fn region_from_model(m: regions::Model) -> RegionRecord {
    RegionRecord {
        id: m.id,
        parent_id: m.parent_id,
        region_name: m.region_name,
        region_type: m.region_type,
        alias_name: m.alias_name,
    }
}
