//! The dense output table produced by a join.
//!
//! Column-oriented storage: every column holds one cell per row, and a cell
//! with no matching source observation is the explicit
//! [`Cell::NoMatchingValueAfterJoin`] sentinel, never a default number or a
//! missing entry. Row order is the insertion order of the join's row-key
//! universe; exports sort explicitly.

use std::collections::HashMap;

use anyhow::{Context, Result};
use itertools::Itertools;

use crate::{
    column::{ColumnDef, slugs},
    error::UnknownColumn,
    time::Time,
};

/// One table cell.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Text(String),
    Integer(i64),
    Number(f64),
    /// No source observation matched this row's key for this column.
    NoMatchingValueAfterJoin,
}

impl Cell {
    pub fn is_missing(&self) -> bool {
        matches!(self, Cell::NoMatchingValueAfterJoin)
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Cell::Number(value) => Some(*value),
            Cell::Integer(value) => Some(*value as f64),
            _ => None,
        }
    }

    pub fn as_time(&self) -> Option<Time> {
        match self {
            Cell::Integer(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_display(&self) -> String {
        match self {
            Cell::Text(text) => text.clone(),
            Cell::Integer(value) => value.to_string(),
            Cell::Number(value) => {
                if value.fract() == 0.0 {
                    (*value as i64).to_string()
                } else {
                    value.to_string()
                }
            }
            Cell::NoMatchingValueAfterJoin => String::new(),
        }
    }
}

/// One output column: resolved descriptor plus one cell per row.
#[derive(Debug, Clone)]
pub struct Column {
    pub def: ColumnDef,
    pub cells: Vec<Cell>,
    /// For tolerance-joined columns only: the native time of the matched
    /// observation behind each cell.
    pub original_times: Option<Vec<Option<Time>>>,
}

impl Column {
    pub fn new(def: ColumnDef, cells: Vec<Cell>) -> Self {
        Self {
            def,
            cells,
            original_times: None,
        }
    }

    pub fn slug(&self) -> &str {
        &self.def.slug
    }

    /// Numeric values in row order, skipping sentinel cells.
    pub fn values(&self) -> impl Iterator<Item = f64> + '_ {
        self.cells.iter().filter_map(Cell::as_number)
    }
}

/// Immutable result of one join call.
#[derive(Debug, Clone)]
pub struct Table {
    columns: Vec<Column>,
    index: HashMap<String, usize>,
    entity_colors: HashMap<String, String>,
    num_rows: usize,
}

impl Table {
    pub fn new(columns: Vec<Column>, entity_colors: HashMap<String, String>) -> Self {
        let num_rows = columns.first().map_or(0, |column| column.cells.len());
        debug_assert!(columns.iter().all(|column| column.cells.len() == num_rows));
        let index = columns
            .iter()
            .enumerate()
            .map(|(idx, column)| (column.def.slug.clone(), idx))
            .collect();
        Self {
            columns,
            index,
            entity_colors,
            num_rows,
        }
    }

    pub fn num_rows(&self) -> usize {
        self.num_rows
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column_slugs(&self) -> Vec<&str> {
        self.columns.iter().map(Column::slug).collect()
    }

    pub fn has_column(&self, slug: &str) -> bool {
        self.index.contains_key(slug)
    }

    /// Fetches a column by slug. Asking for a slug the join never produced
    /// is caller misuse, reported as [`UnknownColumn`].
    pub fn get(&self, slug: &str) -> Result<&Column, UnknownColumn> {
        self.index
            .get(slug)
            .map(|idx| &self.columns[*idx])
            .ok_or_else(|| UnknownColumn(slug.to_string()))
    }

    /// Color pinned for an entity by the chart's selection, if any. Never
    /// inferred from data.
    pub fn get_color_for_entity_name(&self, name: &str) -> Option<&str> {
        self.entity_colors.get(name).map(String::as_str)
    }

    /// Renders the table as CSV for export.
    ///
    /// Bookkeeping columns (`entityId`, `entityColor`, the derived `time`)
    /// are omitted; headers use export names; rows sort by entity name then
    /// time; sentinel cells become empty fields. No trailing newline.
    pub fn to_csv(&self) -> Result<String> {
        let exported = self.exported_columns();
        let mut writer = csv::Writer::from_writer(Vec::new());
        writer
            .write_record(exported.iter().map(|column| column.def.export_header()))
            .context("Writing CSV header")?;

        for row in self.export_row_order() {
            writer
                .write_record(exported.iter().map(|column| column.cells[row].as_display()))
                .context("Writing CSV row")?;
        }

        let bytes = writer.into_inner().context("Flushing CSV buffer")?;
        let mut text = String::from_utf8(bytes).context("CSV output was not UTF-8")?;
        while text.ends_with('\n') || text.ends_with('\r') {
            text.pop();
        }
        Ok(text)
    }

    fn exported_columns(&self) -> Vec<&Column> {
        self.columns
            .iter()
            .filter(|column| {
                let slug = column.slug();
                slug == slugs::ENTITY_NAME
                    || slug == slugs::ENTITY_CODE
                    || slug == slugs::YEAR
                    || slug == slugs::DAY
                    || column.def.variable_id.is_some()
            })
            .collect()
    }

    /// Row indices sorted by entity name then canonical time, sentinel
    /// times last.
    fn export_row_order(&self) -> Vec<usize> {
        let names: Vec<String> = match self.get(slugs::ENTITY_NAME) {
            Ok(column) => column.cells.iter().map(Cell::as_display).collect(),
            Err(_) => vec![String::new(); self.num_rows],
        };
        let times: Vec<Time> = match self.get(slugs::TIME) {
            Ok(column) => column
                .cells
                .iter()
                .map(|cell| cell.as_time().unwrap_or(Time::MAX))
                .collect(),
            Err(_) => vec![0; self.num_rows],
        };
        (0..self.num_rows)
            .sorted_by_key(|&row| (names[row].clone(), times[row]))
            .collect()
    }
}
