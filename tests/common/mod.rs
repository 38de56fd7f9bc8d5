#![allow(dead_code)]

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::{TempDir, tempdir};

use chart_table::{
    config::{ChartConfig, ChartDimension, DimensionDisplay, DimensionProperty},
    entity::EntityId,
    time::Time,
    variable::{
        EntityValue, VariableBundle, VariableData, VariableEntry, VariableId, VariableMetadata,
        YearValue,
    },
};

/// Scratch directory helper that cleans up files automatically on drop.
pub struct TestWorkspace {
    temp_dir: TempDir,
}

impl TestWorkspace {
    /// Creates a fresh scratch directory for the current test case.
    pub fn new() -> Self {
        Self {
            temp_dir: tempdir().expect("temp dir"),
        }
    }

    /// Returns the root path for all files owned by this workspace.
    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Writes `contents` into a file under the workspace and returns the path.
    pub fn write(&self, name: &str, contents: &str) -> PathBuf {
        let path = self.temp_dir.path().join(name);
        let mut file = File::create(&path).expect("create temp file");
        file.write_all(contents.as_bytes())
            .expect("write temp file contents");
        path
    }
}

/// Builds one variable entry from aligned observation triples and the
/// entity dimension table `(id, name, code)`.
pub fn variable(
    id: VariableId,
    observations: &[(EntityId, Time, f64)],
    entities: &[(EntityId, &str, Option<&str>)],
) -> VariableEntry {
    let mut metadata = VariableMetadata {
        id,
        ..VariableMetadata::default()
    };
    metadata.dimensions.entities.values = entities
        .iter()
        .map(|(id, name, code)| EntityValue {
            id: *id,
            name: (*name).to_string(),
            code: code.map(str::to_string),
        })
        .collect();
    metadata.dimensions.years.values = observations
        .iter()
        .map(|(_, time, _)| YearValue { id: *time })
        .collect();
    VariableEntry {
        data: VariableData {
            entities: observations.iter().map(|(entity, _, _)| *entity).collect(),
            values: observations.iter().map(|(_, _, value)| *value).collect(),
            years: observations.iter().map(|(_, time, _)| *time).collect(),
        },
        metadata,
    }
}

/// A day-kind variant of [`variable`], anchored at `zero_day`.
pub fn day_variable(
    id: VariableId,
    zero_day: &str,
    observations: &[(EntityId, Time, f64)],
    entities: &[(EntityId, &str, Option<&str>)],
) -> VariableEntry {
    let mut entry = variable(id, observations, entities);
    entry.metadata.display.year_is_day = true;
    entry.metadata.display.zero_day = Some(zero_day.to_string());
    entry
}

pub fn bundle(entries: Vec<VariableEntry>) -> VariableBundle {
    entries
        .into_iter()
        .map(|entry| (entry.metadata.id, entry))
        .collect()
}

pub fn y_dimension(variable_id: VariableId) -> ChartDimension {
    ChartDimension {
        variable_id,
        property: DimensionProperty::Y,
        target_time: None,
        display: DimensionDisplay::default(),
    }
}

pub fn config_with_dimensions(dimensions: Vec<ChartDimension>) -> ChartConfig {
    ChartConfig {
        dimensions,
        ..ChartConfig::default()
    }
}
