use addrkit_core::{AddressField, AddressRecord, Error, ResultNormalizer};
use serde_json::Value;

use super::unwrap_output;

/// Normalizer for backends that already return the record's field names,
/// such as the LLM address backend.
///
/// Values are coerced to strings and trimmed; unknown keys are ignored.
pub struct StructuredNormalizer;

impl ResultNormalizer for StructuredNormalizer {
    fn normalize(&self, output: &Value, text: &str) -> addrkit_core::Result<AddressRecord> {
        let unwrapped = unwrap_output(output, text)?;
        if !unwrapped.payload.is_object() {
            return Err(Error::MalformedOutput(format!(
                "expected an address object, got {}",
                unwrapped.payload
            )));
        }

        let mut record: AddressRecord = serde_json::from_value(unwrapped.payload.clone())?;
        for field in [
            AddressField::Province,
            AddressField::City,
            AddressField::District,
            AddressField::Street,
            AddressField::Address,
            AddressField::Mobile,
            AddressField::Name,
        ] {
            let trimmed = record.get(field).trim().to_string();
            record.set(field, trimmed);
        }
        Ok(record)
    }
}
