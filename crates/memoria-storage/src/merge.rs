//! Shared partial-update merge logic: both backends apply an
//! `update(id, partial)` by merging a JSON object over the stored
//! document and re-deserializing (spec §4.1).

use memoria_core::errors::{MemoriaError, MemoriaResult};
use memoria_core::memory::MemoryRecord;
use serde_json::Value;

pub fn apply_partial(record: &MemoryRecord, partial: Value) -> MemoriaResult<MemoryRecord> {
    let mut base = serde_json::to_value(record)
        .map_err(|e| MemoriaError::store(format!("failed to serialize record: {e}")))?;

    let Value::Object(partial_map) = partial else {
        return Err(MemoriaError::store(
            "update partial must be a JSON object".to_string(),
        ));
    };

    let base_map = base
        .as_object_mut()
        .expect("MemoryRecord always serializes to an object");
    for (k, v) in partial_map {
        base_map.insert(k, v);
    }

    serde_json::from_value(base)
        .map_err(|e| MemoriaError::store(format!("failed to deserialize merged record: {e}")))
}
