use crate::error::LineError;
use crate::geometry::limits;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayerConfig {
    /// Compact on every removal or resize instead of at the next update.
    /// Bounds peak memory at the cost of moving data more often.
    pub eager_compaction: bool,
    /// Re-check index values while building the mesh.
    pub check_indices: bool,
    pub initial_point_capacity: usize,
    pub initial_index_capacity: usize,
}

impl Default for LayerConfig {
    fn default() -> Self {
        LayerConfig {
            eager_compaction: false,
            check_indices: cfg!(debug_assertions),
            initial_point_capacity: 0,
            initial_index_capacity: 0,
        }
    }
}

impl LayerConfig {
    pub fn from_json_value(v: serde_json::Value) -> Result<LayerConfig, LineError> {
        let cfg: LayerConfig =
            serde_json::from_value(v).map_err(|e| LineError::InvalidConfig(e.to_string()))?;
        if cfg.initial_point_capacity > limits::MAX_ARENA_LEN
            || cfg.initial_index_capacity > limits::MAX_ARENA_LEN
        {
            return Err(LineError::InvalidConfig("initial capacity".into()));
        }
        Ok(cfg)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn missing_fields_take_defaults() {
        let cfg = LayerConfig::from_json_value(json!({"eager_compaction": true})).unwrap();
        assert!(cfg.eager_compaction);
        assert_eq!(cfg.initial_point_capacity, 0);
        assert_eq!(cfg.check_indices, cfg!(debug_assertions));
    }

    #[test]
    fn rejects_bad_types_and_caps() {
        let e = LayerConfig::from_json_value(json!({"eager_compaction": "yes"})).unwrap_err();
        assert_eq!(e.code(), "invalid_config");
        assert!(LayerConfig::from_json_value(json!({"initial_point_capacity": u64::MAX})).is_err());
    }
}
