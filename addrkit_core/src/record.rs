//! Canonical address record and the response envelope that carries it.

use serde::{Deserialize, Deserializer, Serialize};

/// Default business id stamped on every envelope.
pub const DEFAULT_EBUSINESS_ID: &str = "1279441";

pub const REASON_SUCCESS: &str = "解析成功";
pub const REASON_FAILURE: &str = "解析失败";
pub const REASON_EMPTY_INPUT: &str = "输入文本为空";
pub const REASON_NO_ADDRESS: &str = "未检测到地址信息";

/// One field of an [`AddressRecord`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AddressField {
    Province,
    City,
    District,
    Street,
    Address,
    Mobile,
    Name,
}

impl AddressField {
    /// Wire key of the field.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Province => "ProvinceName",
            Self::City => "CityName",
            Self::District => "ExpAreaName",
            Self::Street => "StreetName",
            Self::Address => "Address",
            Self::Mobile => "Mobile",
            Self::Name => "Name",
        }
    }
}

impl std::fmt::Display for AddressField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The canonical output unit.
///
/// All seven keys are always serialized; an absent value is the empty string.
/// Deserialization is lenient: missing keys default to `""`, `null` becomes
/// `""` and numbers or booleans are turned into their text form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct AddressRecord {
    #[serde(default, deserialize_with = "lenient_string")]
    pub province_name: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub city_name: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub exp_area_name: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub street_name: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub address: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub mobile: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub name: String,
}

impl AddressRecord {
    #[must_use]
    pub fn get(&self, field: AddressField) -> &str {
        match field {
            AddressField::Province => &self.province_name,
            AddressField::City => &self.city_name,
            AddressField::District => &self.exp_area_name,
            AddressField::Street => &self.street_name,
            AddressField::Address => &self.address,
            AddressField::Mobile => &self.mobile,
            AddressField::Name => &self.name,
        }
    }

    pub fn set(&mut self, field: AddressField, value: impl Into<String>) {
        let slot = match field {
            AddressField::Province => &mut self.province_name,
            AddressField::City => &mut self.city_name,
            AddressField::District => &mut self.exp_area_name,
            AddressField::Street => &mut self.street_name,
            AddressField::Address => &mut self.address,
            AddressField::Mobile => &mut self.mobile,
            AddressField::Name => &mut self.name,
        };
        *slot = value.into();
    }

    /// True when none of the five address fields carries a value.
    #[must_use]
    pub fn has_no_address(&self) -> bool {
        [
            AddressField::Province,
            AddressField::City,
            AddressField::District,
            AddressField::Street,
            AddressField::Address,
        ]
        .iter()
        .all(|f| self.get(*f).trim().is_empty())
    }
}

fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(match value {
        serde_json::Value::String(s) => s,
        serde_json::Value::Number(n) => n.to_string(),
        serde_json::Value::Bool(b) => b.to_string(),
        _ => String::new(),
    })
}

/// Result code carried in the envelope.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResultCode {
    Success,
    EmptyInput,
    NoAddress,
    InternalError,
}

impl ResultCode {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Success => "100",
            Self::EmptyInput => "101",
            Self::NoAddress => "102",
            Self::InternalError => "103",
        }
    }
}

/// Response envelope wrapping an [`AddressRecord`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractResponse {
    #[serde(rename = "EBusinessID")]
    pub ebusiness_id: String,
    #[serde(rename = "Data")]
    pub data: AddressRecord,
    #[serde(rename = "Success")]
    pub success: bool,
    #[serde(rename = "Reason")]
    pub reason: String,
    #[serde(rename = "ResultCode")]
    pub result_code: String,
}

impl ExtractResponse {
    #[must_use]
    pub fn success(data: AddressRecord) -> Self {
        Self {
            ebusiness_id: DEFAULT_EBUSINESS_ID.to_string(),
            data,
            success: true,
            reason: REASON_SUCCESS.to_string(),
            result_code: ResultCode::Success.as_str().to_string(),
        }
    }

    #[must_use]
    pub fn failure(code: ResultCode, reason: impl Into<String>, data: AddressRecord) -> Self {
        Self {
            ebusiness_id: DEFAULT_EBUSINESS_ID.to_string(),
            data,
            success: false,
            reason: reason.into(),
            result_code: code.as_str().to_string(),
        }
    }
}
