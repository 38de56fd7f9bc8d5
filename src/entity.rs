//! Deduplicated entity identities accumulated while ingesting variables.

use std::collections::HashMap;

use crate::error::UnknownEntity;

/// Stable numeric identity of an entity across all variables in a join.
pub type EntityId = u32;

/// Descriptive attributes of one entity. Identity lives in the id key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entity {
    pub name: String,
    pub code: Option<String>,
}

/// Registry of every entity seen during ingestion.
#[derive(Debug, Clone, Default)]
pub struct EntityRegistry {
    entries: HashMap<EntityId, Entity>,
}

impl EntityRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records an entity on first sight. Later registrations for the same id
    /// keep the first name and code even when they disagree: source data is
    /// known to be inconsistent across variables, and the original behavior
    /// tolerates that rather than reconciling it. Changing this to
    /// last-write-wins is a behavior change, not a fix.
    pub fn register(&mut self, id: EntityId, name: &str, code: Option<&str>) {
        self.entries.entry(id).or_insert_with(|| Entity {
            name: name.to_string(),
            code: code.map(str::to_string),
        });
    }

    /// Looks up a registered entity. Given ingestion order this should never
    /// miss, but callers get a typed error instead of a panic when it does.
    pub fn lookup(&self, id: EntityId) -> Result<&Entity, UnknownEntity> {
        self.entries.get(&id).ok_or(UnknownEntity(id))
    }

    pub fn contains(&self, id: EntityId) -> bool {
        self.entries.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_registration_wins() {
        let mut registry = EntityRegistry::new();
        registry.register(45, "Cape Verde", Some("CPV"));
        registry.register(45, "Cabo Verde", Some("CV"));

        let entity = registry.lookup(45).unwrap();
        assert_eq!(entity.name, "Cape Verde");
        assert_eq!(entity.code.as_deref(), Some("CPV"));
    }

    #[test]
    fn lookup_of_unregistered_entity_fails() {
        let registry = EntityRegistry::new();
        assert!(matches!(registry.lookup(7), Err(UnknownEntity(7))));
    }

    #[test]
    fn register_keeps_missing_codes_missing() {
        let mut registry = EntityRegistry::new();
        registry.register(2, "High-income", None);
        assert_eq!(registry.lookup(2).unwrap().code, None);
    }
}
