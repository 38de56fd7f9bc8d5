//! Resolved column descriptors.
//!
//! A [`ColumnDef`] is the normalized metadata for one output column after
//! all override precedence has been applied: chart-dimension display
//! overrides beat the variable's own display block, which beats the bare
//! variable metadata.

use crate::{
    config::{ChartDimension, DimensionProperty},
    time::Time,
    variable::{VariableId, VariableMetadata},
};

/// Slugs of the standard identity and time columns.
pub mod slugs {
    pub const ENTITY_NAME: &str = "entityName";
    pub const ENTITY_ID: &str = "entityId";
    pub const ENTITY_CODE: &str = "entityCode";
    pub const ENTITY_COLOR: &str = "entityColor";
    pub const YEAR: &str = "year";
    pub const DAY: &str = "day";
    pub const TIME: &str = "time";
}

#[derive(Debug, Clone, PartialEq)]
pub struct ColumnDef {
    /// Internal column key: a standard slug, the decimal variable id, or
    /// `variableId-targetTime` for pinned scatter columns.
    pub slug: String,
    /// Human-readable name from the variable metadata.
    pub name: Option<String>,
    /// Display-name override from the dimension or variable display block.
    pub display_name: Option<String>,
    pub unit: Option<String>,
    pub short_unit: Option<String>,
    pub source_name: Option<String>,
    pub non_redistributable: bool,
    /// Backing variable, absent for identity/time columns.
    pub variable_id: Option<VariableId>,
    pub property: Option<DimensionProperty>,
    pub conversion_factor: f64,
    pub tolerance: Time,
    pub target_time: Option<Time>,
}

impl ColumnDef {
    /// Descriptor for a standard identity or time column.
    pub fn standard(slug: &str, name: Option<&str>) -> Self {
        Self {
            slug: slug.to_string(),
            name: name.map(str::to_string),
            display_name: None,
            unit: None,
            short_unit: None,
            source_name: None,
            non_redistributable: false,
            variable_id: None,
            property: None,
            conversion_factor: 1.0,
            tolerance: 0,
            target_time: None,
        }
    }

    /// Label preferred for presentation: display override, then name, then
    /// slug.
    pub fn label(&self) -> &str {
        self.display_name
            .as_deref()
            .or(self.name.as_deref())
            .unwrap_or(&self.slug)
    }

    /// Header used in exports: the variable name first, then the display
    /// label.
    pub fn export_header(&self) -> &str {
        self.name
            .as_deref()
            .or(self.display_name.as_deref())
            .unwrap_or(&self.slug)
    }
}

/// Resolves the effective descriptor for one chart dimension. `pinned` marks
/// a scatter-mode dimension joined against its target time, which gets a
/// distinct `variableId-targetTime` slug.
pub fn resolve_dimension_column(
    meta: &VariableMetadata,
    dimension: &ChartDimension,
    pinned: bool,
) -> ColumnDef {
    let target_time = if pinned { dimension.target_time } else { None };
    let slug = match target_time {
        Some(target) => format!("{}-{}", meta.id, target),
        None => meta.id.to_string(),
    };
    ColumnDef {
        slug,
        name: meta.name.clone(),
        display_name: dimension
            .display
            .name
            .clone()
            .or_else(|| meta.display.name.clone()),
        unit: dimension
            .display
            .unit
            .clone()
            .or_else(|| meta.display.unit.clone())
            .or_else(|| meta.unit.clone()),
        short_unit: dimension
            .display
            .short_unit
            .clone()
            .or_else(|| meta.display.short_unit.clone())
            .or_else(|| meta.short_unit.clone()),
        source_name: meta.source.as_ref().and_then(|source| source.name.clone()),
        non_redistributable: meta.non_redistributable,
        variable_id: Some(meta.id),
        property: Some(dimension.property),
        conversion_factor: dimension
            .display
            .conversion_factor
            .or(meta.display.conversion_factor)
            .unwrap_or(1.0),
        tolerance: dimension
            .display
            .tolerance
            .or(meta.display.tolerance)
            .unwrap_or(0),
        target_time,
    }
}
