//! sea-orm entities for the region reference database.

pub mod regions;
