//! Chart configuration: which variables participate in a join and in which
//! visual role, plus per-dimension overrides and selection highlighting.

use serde::{Deserialize, Serialize};

use crate::{entity::EntityId, time::Time, variable::VariableId};

/// Chart kinds. Only the scatter-style kinds activate tolerance joins; the
/// join engine is otherwise indifferent to the kind.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChartType {
    #[default]
    LineChart,
    ScatterPlot,
    TimeScatter,
    StackedArea,
    StackedBar,
    DiscreteBar,
    SlopeChart,
}

impl ChartType {
    pub fn is_scatter(self) -> bool {
        matches!(self, ChartType::ScatterPlot | ChartType::TimeScatter)
    }
}

/// The visual role a dimension's variable plays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DimensionProperty {
    Y,
    X,
    Size,
    Color,
    Table,
}

impl DimensionProperty {
    pub fn as_str(self) -> &'static str {
        match self {
            DimensionProperty::Y => "y",
            DimensionProperty::X => "x",
            DimensionProperty::Size => "size",
            DimensionProperty::Color => "color",
            DimensionProperty::Table => "table",
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ChartConfig {
    #[serde(rename = "type")]
    pub chart_type: ChartType,
    pub dimensions: Vec<ChartDimension>,
    pub selected_data: Vec<SelectedEntity>,
}

/// One reference to a variable in a visual role.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartDimension {
    pub variable_id: VariableId,
    pub property: DimensionProperty,
    /// Pins the dimension to a representative time for scatter-style charts;
    /// ignored for every other chart kind. The upstream wire name is
    /// `targetYear` even for day-based variables.
    #[serde(default, rename = "targetYear", alias = "targetTime")]
    pub target_time: Option<Time>,
    #[serde(default)]
    pub display: DimensionDisplay,
}

/// Chart-level display overrides, the stronger half of the override
/// precedence.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DimensionDisplay {
    pub name: Option<String>,
    pub unit: Option<String>,
    pub short_unit: Option<String>,
    pub conversion_factor: Option<f64>,
    pub tolerance: Option<Time>,
}

/// Highlighted entity with an optional fixed color.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectedEntity {
    pub entity_id: EntityId,
    pub index: usize,
    #[serde(default)]
    pub color: Option<String>,
}
