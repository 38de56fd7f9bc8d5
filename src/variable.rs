//! Serde model for the legacy variable bundle.
//!
//! This is the wire shape the external data-fetching layer hands over: a map
//! of variable id to one sparse series (`entities`/`values`/`years` aligned
//! 1:1) plus its metadata. Field names follow the upstream camelCase JSON.

use std::collections::HashMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::{
    entity::EntityId,
    error::ConfigurationError,
    time::{Time, TimeKind},
};

/// Numeric identifier of one independently stored variable.
pub type VariableId = u32;

/// Everything the join needs, keyed by variable id.
pub type VariableBundle = HashMap<VariableId, VariableEntry>;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VariableEntry {
    pub data: VariableData,
    pub metadata: VariableMetadata,
}

/// One sparse series. The three sequences are aligned: index `i` is one
/// observation (entity, value, native time).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct VariableData {
    pub entities: Vec<EntityId>,
    pub values: Vec<f64>,
    /// Native times: calendar years, or raw day offsets from the variable's
    /// own `zeroDay` when `display.yearIsDay` is set.
    pub years: Vec<Time>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct VariableMetadata {
    pub id: VariableId,
    pub name: Option<String>,
    pub unit: Option<String>,
    pub short_unit: Option<String>,
    pub description: Option<String>,
    pub source: Option<VariableSource>,
    pub non_redistributable: bool,
    pub display: VariableDisplay,
    pub dimensions: VariableDimensions,
}

impl VariableMetadata {
    pub fn time_kind(&self) -> TimeKind {
        if self.display.year_is_day {
            TimeKind::Day
        } else {
            TimeKind::Year
        }
    }

    /// Resolves the anchor date for a day-kind variable's raw offsets.
    pub fn zero_day(&self) -> Result<NaiveDate, ConfigurationError> {
        let raw = self
            .display
            .zero_day
            .as_deref()
            .ok_or(ConfigurationError::MissingZeroDay {
                variable_id: self.id,
            })?;
        NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|_| {
            ConfigurationError::InvalidZeroDay {
                variable_id: self.id,
                raw: raw.to_string(),
            }
        })
    }
}

/// Per-variable display overrides, the weaker half of the override
/// precedence (chart dimension overrides beat these).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct VariableDisplay {
    pub name: Option<String>,
    pub unit: Option<String>,
    pub short_unit: Option<String>,
    pub conversion_factor: Option<f64>,
    pub year_is_day: bool,
    pub zero_day: Option<String>,
    pub tolerance: Option<Time>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct VariableSource {
    pub id: Option<u32>,
    pub name: Option<String>,
    pub link: Option<String>,
}

/// Dimension value tables: which entities and times the series may refer to.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct VariableDimensions {
    pub entities: EntityDimension,
    pub years: YearDimension,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EntityDimension {
    pub values: Vec<EntityValue>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntityValue {
    pub id: EntityId,
    pub name: String,
    #[serde(default)]
    pub code: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct YearDimension {
    pub values: Vec<YearValue>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct YearValue {
    pub id: Time,
}
