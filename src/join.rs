//! The join engine: merges independently fetched variable series into one
//! dense entity/time table.
//!
//! The engine is a pure function of its inputs. It builds the row-key
//! universe as the union of every (entity, canonical time) pair observed in
//! any ingested dimension (outer join), fills cells without a source match
//! with the [`Cell::NoMatchingValueAfterJoin`] sentinel, and derives a
//! canonical `time` column unifying year and day axes. Scatter-style charts
//! additionally pin dimensions carrying a target time to their nearest
//! in-tolerance observation per entity.

use std::collections::{HashMap, HashSet};

use itertools::izip;
use log::{debug, warn};

use crate::{
    column::{ColumnDef, resolve_dimension_column, slugs},
    config::{ChartConfig, ChartDimension, DimensionProperty},
    entity::{EntityId, EntityRegistry},
    error::ConfigurationError,
    table::{Cell, Column, Table},
    time::{Time, TimeKind, determine_time_kind, to_canonical_day},
    variable::{VariableBundle, VariableData, VariableId, VariableMetadata},
};

/// Result of one join call: the table plus one resolved entry per chart
/// dimension pointing at its effective value column.
#[derive(Debug, Clone)]
pub struct JoinOutput {
    pub table: Table,
    pub dimensions: Vec<ResolvedDimension>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedDimension {
    pub variable_id: VariableId,
    pub property: DimensionProperty,
    /// Slug of the column this dimension should read: the variable id, or
    /// `variableId-targetTime` when the dimension was pinned.
    pub slug: String,
}

/// One ingested observation on the canonical time axis, conversion factor
/// already applied.
#[derive(Debug, Clone, Copy)]
struct Observation {
    entity_id: EntityId,
    time: Time,
    value: f64,
}

struct Ingested<'a> {
    dimension: &'a ChartDimension,
    meta: &'a VariableMetadata,
    kind: TimeKind,
    /// Scatter-mode dimensions with a target time join against the target
    /// instead of contributing row keys.
    pinned: bool,
    observations: Vec<Observation>,
}

/// Seed for one output row, keyed by (entity, canonical time).
struct RowSeed {
    entity_id: EntityId,
    /// `None` for rows that exist only because a pinned dimension observed
    /// the entity.
    time: Option<Time>,
    year_sourced: bool,
    day_sourced: bool,
}

/// Converts a legacy variable bundle plus a chart configuration into the
/// canonical table. Structural input problems abort the whole join; missing
/// per-cell data never does.
pub fn legacy_to_table(
    bundle: &VariableBundle,
    config: &ChartConfig,
) -> Result<JoinOutput, ConfigurationError> {
    let scatter = config.chart_type.is_scatter();

    let entries = config
        .dimensions
        .iter()
        .map(|dimension| {
            bundle
                .get(&dimension.variable_id)
                .map(|entry| (dimension, entry))
                .ok_or(ConfigurationError::UnknownVariable {
                    variable_id: dimension.variable_id,
                })
        })
        .collect::<Result<Vec<_>, _>>()?;

    let canonical_kind = determine_time_kind(entries.iter().map(|(_, entry)| &entry.metadata));

    let mut registry = EntityRegistry::new();
    let mut ingested = Vec::with_capacity(entries.len());
    for (dimension, entry) in entries {
        ingested.push(ingest(
            dimension,
            &entry.metadata,
            &entry.data,
            scatter,
            &mut registry,
        )?);
    }

    let rows = build_row_universe(&ingested);
    debug!(
        "joined {} dimension(s) into {} row(s) on the {} axis",
        ingested.len(),
        rows.len(),
        canonical_kind.label()
    );

    let selected_colors: HashMap<EntityId, &str> = config
        .selected_data
        .iter()
        .filter_map(|selected| {
            selected
                .color
                .as_deref()
                .map(|color| (selected.entity_id, color))
        })
        .collect();

    let mut columns = Vec::new();
    columns.extend(entity_columns(&rows, &registry, &selected_colors));
    columns.extend(native_time_columns(&rows, &ingested));

    let mut dimensions = Vec::with_capacity(ingested.len());
    for ing in &ingested {
        let plain_def = resolve_dimension_column(ing.meta, ing.dimension, false);
        let mut slug = plain_def.slug.clone();
        columns.push(plain_column(ing, plain_def, &rows));

        if ing.pinned
            && let Some(target) = ing.dimension.target_time
        {
            let pinned_def = resolve_dimension_column(ing.meta, ing.dimension, true);
            slug = pinned_def.slug.clone();
            columns.push(pinned_column(ing, pinned_def, target, &rows));
        }
        dimensions.push(ResolvedDimension {
            variable_id: ing.meta.id,
            property: ing.dimension.property,
            slug,
        });
    }

    columns.push(derived_time_column(&rows, canonical_kind));

    let entity_colors = selected_colors
        .iter()
        .filter_map(|(entity_id, color)| {
            registry
                .lookup(*entity_id)
                .ok()
                .map(|entity| (entity.name.clone(), (*color).to_string()))
        })
        .collect();

    Ok(JoinOutput {
        table: Table::new(columns, entity_colors),
        dimensions,
    })
}

fn ingest<'a>(
    dimension: &'a ChartDimension,
    meta: &'a VariableMetadata,
    data: &VariableData,
    scatter: bool,
    registry: &mut EntityRegistry,
) -> Result<Ingested<'a>, ConfigurationError> {
    let kind = meta.time_kind();
    let shift = match kind {
        TimeKind::Day => to_canonical_day(0, meta.zero_day()?),
        TimeKind::Year => 0,
    };

    for value in &meta.dimensions.entities.values {
        registry.register(value.id, &value.name, value.code.as_deref());
    }

    if data.entities.len() != data.values.len() || data.values.len() != data.years.len() {
        warn!(
            "variable {}: entities/values/years lengths differ ({}/{}/{}); truncating to the shortest",
            meta.id,
            data.entities.len(),
            data.values.len(),
            data.years.len()
        );
    }

    // Dimension-level conversion factor beats the variable display's.
    let factor = dimension
        .display
        .conversion_factor
        .or(meta.display.conversion_factor)
        .unwrap_or(1.0);

    let mut observations = Vec::with_capacity(data.values.len());
    for (&entity_id, &value, &raw_time) in izip!(&data.entities, &data.values, &data.years) {
        if !registry.contains(entity_id) {
            // Unlisted entity: keep the observation joinable under a
            // placeholder name rather than dropping it.
            debug!(
                "variable {}: entity {} missing from its dimension table",
                meta.id, entity_id
            );
            registry.register(entity_id, &entity_id.to_string(), None);
        }
        observations.push(Observation {
            entity_id,
            time: raw_time + shift,
            value: value * factor,
        });
    }

    Ok(Ingested {
        dimension,
        meta,
        kind,
        pinned: scatter && dimension.target_time.is_some(),
        observations,
    })
}

/// Union of all (entity, canonical time) keys across unpinned dimensions, in
/// first-seen order, plus one timeless row per entity known only to pinned
/// dimensions.
fn build_row_universe(ingested: &[Ingested<'_>]) -> Vec<RowSeed> {
    let mut index: HashMap<(EntityId, Time), usize> = HashMap::new();
    let mut rows: Vec<RowSeed> = Vec::new();
    let mut seen_entities: HashSet<EntityId> = HashSet::new();

    for ing in ingested.iter().filter(|ing| !ing.pinned) {
        for obs in &ing.observations {
            let idx = *index.entry((obs.entity_id, obs.time)).or_insert_with(|| {
                rows.push(RowSeed {
                    entity_id: obs.entity_id,
                    time: Some(obs.time),
                    year_sourced: false,
                    day_sourced: false,
                });
                rows.len() - 1
            });
            seen_entities.insert(obs.entity_id);
            match ing.kind {
                TimeKind::Year => rows[idx].year_sourced = true,
                TimeKind::Day => rows[idx].day_sourced = true,
            }
        }
    }

    for ing in ingested.iter().filter(|ing| ing.pinned) {
        for obs in &ing.observations {
            if seen_entities.insert(obs.entity_id) {
                rows.push(RowSeed {
                    entity_id: obs.entity_id,
                    time: None,
                    year_sourced: false,
                    day_sourced: false,
                });
            }
        }
    }

    rows
}

fn entity_columns(
    rows: &[RowSeed],
    registry: &EntityRegistry,
    selected_colors: &HashMap<EntityId, &str>,
) -> Vec<Column> {
    let mut names = Vec::with_capacity(rows.len());
    let mut ids = Vec::with_capacity(rows.len());
    let mut codes = Vec::with_capacity(rows.len());
    let mut colors = Vec::with_capacity(rows.len());

    for row in rows {
        let entity = registry.lookup(row.entity_id).ok();
        names.push(Cell::Text(
            entity.map_or_else(|| row.entity_id.to_string(), |e| e.name.clone()),
        ));
        ids.push(Cell::Integer(i64::from(row.entity_id)));
        codes.push(Cell::Text(
            entity.and_then(|e| e.code.clone()).unwrap_or_default(),
        ));
        colors.push(Cell::Text(
            selected_colors
                .get(&row.entity_id)
                .map(|color| (*color).to_string())
                .unwrap_or_default(),
        ));
    }

    vec![
        Column::new(
            ColumnDef::standard(slugs::ENTITY_NAME, Some("Entity")),
            names,
        ),
        Column::new(ColumnDef::standard(slugs::ENTITY_ID, None), ids),
        Column::new(ColumnDef::standard(slugs::ENTITY_CODE, Some("Code")), codes),
        Column::new(ColumnDef::standard(slugs::ENTITY_COLOR, None), colors),
    ]
}

/// One native column per time kind present among the ingested dimensions.
/// Rows keyed by the other kind hold the sentinel.
fn native_time_columns(rows: &[RowSeed], ingested: &[Ingested<'_>]) -> Vec<Column> {
    let mut columns = Vec::new();
    for kind in [TimeKind::Year, TimeKind::Day] {
        if !ingested.iter().any(|ing| ing.kind == kind) {
            continue;
        }
        let cells = rows
            .iter()
            .map(|row| {
                let sourced = match kind {
                    TimeKind::Year => row.year_sourced,
                    TimeKind::Day => row.day_sourced,
                };
                match row.time {
                    Some(time) if sourced => Cell::Integer(time),
                    _ => Cell::NoMatchingValueAfterJoin,
                }
            })
            .collect();
        columns.push(Column::new(
            ColumnDef::standard(kind.slug(), Some(kind.label())),
            cells,
        ));
    }
    columns
}

fn plain_column(ing: &Ingested<'_>, def: ColumnDef, rows: &[RowSeed]) -> Column {
    // First observation wins on duplicate keys within one series.
    let mut lookup: HashMap<(EntityId, Time), f64> = HashMap::new();
    for obs in &ing.observations {
        lookup.entry((obs.entity_id, obs.time)).or_insert(obs.value);
    }

    let cells = rows
        .iter()
        .map(|row| match row.time {
            Some(time) => lookup
                .get(&(row.entity_id, time))
                .map_or(Cell::NoMatchingValueAfterJoin, |value| Cell::Number(*value)),
            None => Cell::NoMatchingValueAfterJoin,
        })
        .collect();
    Column::new(def, cells)
}

/// Tolerance join: per entity, the single observation closest to the target
/// time within ±tolerance, ties broken by the earlier time, broadcast to all
/// of the entity's rows with its original time recorded.
fn pinned_column(ing: &Ingested<'_>, def: ColumnDef, target: Time, rows: &[RowSeed]) -> Column {
    let tolerance = def.tolerance;
    let mut best: HashMap<EntityId, (Time, f64)> = HashMap::new();
    for obs in &ing.observations {
        let distance = (obs.time - target).abs();
        if distance > tolerance {
            continue;
        }
        let replace = match best.get(&obs.entity_id) {
            Some((prev_time, _)) => {
                let prev_distance = (prev_time - target).abs();
                distance < prev_distance || (distance == prev_distance && obs.time < *prev_time)
            }
            None => true,
        };
        if replace {
            best.insert(obs.entity_id, (obs.time, obs.value));
        }
    }

    let mut cells = Vec::with_capacity(rows.len());
    let mut original_times = Vec::with_capacity(rows.len());
    for row in rows {
        match best.get(&row.entity_id) {
            Some((time, value)) => {
                cells.push(Cell::Number(*value));
                original_times.push(Some(*time));
            }
            None => {
                cells.push(Cell::NoMatchingValueAfterJoin);
                original_times.push(None);
            }
        }
    }

    let mut column = Column::new(def, cells);
    column.original_times = Some(original_times);
    column
}

/// The duplicate `time` column always carries the finer-grained kind present
/// in the join. Calendar years are not representable on a day axis, so rows
/// keyed by a year in a mixed join hold the sentinel here.
fn derived_time_column(rows: &[RowSeed], canonical_kind: TimeKind) -> Column {
    let cells = rows
        .iter()
        .map(|row| match row.time {
            Some(time) if canonical_kind == TimeKind::Year || row.day_sourced => Cell::Integer(time),
            _ => Cell::NoMatchingValueAfterJoin,
        })
        .collect();
    Column::new(ColumnDef::standard(slugs::TIME, None), cells)
}
