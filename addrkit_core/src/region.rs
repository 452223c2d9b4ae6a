//! Administrative region hierarchy and the reference store contract.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::record::AddressField;

/// Hierarchy level of an administrative region, highest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RegionLevel {
    Province,
    City,
    District,
    Street,
}

impl RegionLevel {
    /// Levels in top-down order.
    pub const TOP_DOWN: [Self; 4] = [Self::Province, Self::City, Self::District, Self::Street];

    /// Levels in the order they are tried as an anchor (most specific first).
    pub const ANCHOR_ORDER: [Self; 4] = [Self::Street, Self::District, Self::City, Self::Province];

    /// The record field a region of this level fills.
    #[must_use]
    pub const fn field(&self) -> AddressField {
        match self {
            Self::Province => AddressField::Province,
            Self::City => AddressField::City,
            Self::District => AddressField::District,
            Self::Street => AddressField::Street,
        }
    }

    /// Level one step up, `None` for provinces.
    #[must_use]
    pub const fn parent(&self) -> Option<Self> {
        match self {
            Self::Street => Some(Self::District),
            Self::District => Some(Self::City),
            Self::City => Some(Self::Province),
            Self::Province => None,
        }
    }

    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Province => "province",
            Self::City => "city",
            Self::District => "district",
            Self::Street => "street",
        }
    }
}

impl std::fmt::Display for RegionLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Integer `region_type` codes used by the region table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegionTypeCodes {
    #[serde(default = "RegionTypeCodes::default_province")]
    pub province: i32,
    #[serde(default = "RegionTypeCodes::default_city")]
    pub city: i32,
    #[serde(default = "RegionTypeCodes::default_district")]
    pub district: i32,
    #[serde(default = "RegionTypeCodes::default_street")]
    pub street: i32,
}

impl Default for RegionTypeCodes {
    fn default() -> Self {
        Self {
            province: Self::default_province(),
            city: Self::default_city(),
            district: Self::default_district(),
            street: Self::default_street(),
        }
    }
}

impl RegionTypeCodes {
    const fn default_province() -> i32 {
        1001
    }

    const fn default_city() -> i32 {
        1002
    }

    const fn default_district() -> i32 {
        1003
    }

    const fn default_street() -> i32 {
        1004
    }

    #[must_use]
    pub const fn code(&self, level: RegionLevel) -> i32 {
        match level {
            RegionLevel::Province => self.province,
            RegionLevel::City => self.city,
            RegionLevel::District => self.district,
            RegionLevel::Street => self.street,
        }
    }

    /// Level for a raw `region_type`, `None` for codes outside the hierarchy.
    #[must_use]
    pub fn level(&self, code: i32) -> Option<RegionLevel> {
        RegionLevel::TOP_DOWN
            .into_iter()
            .find(|level| self.code(*level) == code)
    }

    /// Expected `region_type` of the parent of a region with `code`.
    #[must_use]
    pub fn parent_code(&self, code: i32) -> Option<i32> {
        self.level(code)
            .and_then(|level| level.parent())
            .map(|parent| self.code(parent))
    }
}

/// A row of the region reference table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegionRecord {
    pub id: i64,
    pub parent_id: Option<i64>,
    pub region_name: String,
    pub region_type: i32,
    pub alias_name: Option<String>,
}

impl RegionRecord {
    /// Parent id, treating `0` like a missing pointer.
    #[must_use]
    pub fn parent(&self) -> Option<i64> {
        self.parent_id.filter(|id| *id != 0)
    }

    /// Alias trimmed, with blank aliases collapsed to `None`.
    #[must_use]
    pub fn alias(&self) -> Option<&str> {
        self.alias_name
            .as_deref()
            .map(str::trim)
            .filter(|a| !a.is_empty())
    }
}

/// Read-only access to the region reference table.
///
/// Implementations only perform point lookups; each call is independent and
/// no transaction spans several calls.
#[async_trait]
pub trait RegionStore: Send + Sync {
    async fn find_by_name_and_type(
        &self,
        name: &str,
        region_type: i32,
    ) -> anyhow::Result<Option<RegionRecord>>;

    async fn find_by_name(&self, name: &str) -> anyhow::Result<Option<RegionRecord>>;

    async fn find_by_id(&self, id: i64) -> anyhow::Result<Option<RegionRecord>>;

    async fn find_by_type_and_id(
        &self,
        region_type: i32,
        id: i64,
    ) -> anyhow::Result<Option<RegionRecord>>;
}

#[async_trait]
impl<T: RegionStore + ?Sized> RegionStore for Arc<T> {
    async fn find_by_name_and_type(
        &self,
        name: &str,
        region_type: i32,
    ) -> anyhow::Result<Option<RegionRecord>> {
        (**self).find_by_name_and_type(name, region_type).await
    }

    async fn find_by_name(&self, name: &str) -> anyhow::Result<Option<RegionRecord>> {
        (**self).find_by_name(name).await
    }

    async fn find_by_id(&self, id: i64) -> anyhow::Result<Option<RegionRecord>> {
        (**self).find_by_id(id).await
    }

    async fn find_by_type_and_id(
        &self,
        region_type: i32,
        id: i64,
    ) -> anyhow::Result<Option<RegionRecord>> {
        (**self).find_by_type_and_id(region_type, id).await
    }
}
