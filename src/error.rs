//! Error taxonomy for the join engine and table lookups.
//!
//! Structural problems with the inputs ([`ConfigurationError`]) abort the
//! whole join; there is never a partial table. Missing per-cell data is not
//! an error at all — it is the [`Cell::NoMatchingValueAfterJoin`] sentinel
//! in the data model.
//!
//! [`Cell::NoMatchingValueAfterJoin`]: crate::table::Cell::NoMatchingValueAfterJoin

use thiserror::Error;

use crate::{entity::EntityId, variable::VariableId};

/// Malformed or incomplete input detected before or during a join.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigurationError {
    /// A day-kind variable declared `yearIsDay` without a `zeroDay`, so its
    /// raw offsets cannot be anchored to the canonical epoch.
    #[error("variable {variable_id} declares yearIsDay but provides no zeroDay")]
    MissingZeroDay { variable_id: VariableId },
    /// A `zeroDay` was present but not a parseable calendar date.
    #[error("variable {variable_id} has an unparseable zeroDay '{raw}'")]
    InvalidZeroDay { variable_id: VariableId, raw: String },
    /// A chart dimension references a variable id absent from the bundle.
    #[error("chart dimension references unknown variable {variable_id}")]
    UnknownVariable { variable_id: VariableId },
}

/// Lookup against a column slug the join never produced.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown column '{0}'")]
pub struct UnknownColumn(pub String);

/// Lookup against an entity id that was never registered during ingestion.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown entity id {0}")]
pub struct UnknownEntity(pub EntityId);
