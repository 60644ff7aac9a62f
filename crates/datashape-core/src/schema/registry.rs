use std::collections::{BTreeMap, HashSet};
use std::sync::{PoisonError, RwLock};

use super::reflect::ReflectedClass;

/// Registry of every reflected record in a project.
///
/// Records are kept ordered by name so that anything generated from the
/// registry comes out in a stable order.
pub struct SchemaRegistry {
    records: RwLock<BTreeMap<String, ReflectedClass>>,
}

impl SchemaRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self {
            records: RwLock::new(BTreeMap::new()),
        }
    }

    /// Register a record, replacing any previous one with the same name.
    pub fn register(&self, class: ReflectedClass) {
        let name = class.name.clone();
        let mut records = self.records.write().unwrap_or_else(PoisonError::into_inner);
        if records.insert(name.clone(), class).is_some() {
            tracing::debug!(record = %name, "Replaced previously registered record");
        }
    }

    /// Get a record by name.
    pub fn get(&self, name: &str) -> Option<ReflectedClass> {
        let records = self.records.read().unwrap_or_else(PoisonError::into_inner);
        records.get(name).cloned()
    }

    /// Whether `name` is registered as a data record.
    pub fn is_data(&self, name: &str) -> bool {
        let records = self.records.read().unwrap_or_else(PoisonError::into_inner);
        records.get(name).is_some_and(|class| class.is_data)
    }

    /// Names of every data record.
    pub fn data_names(&self) -> HashSet<String> {
        let records = self.records.read().unwrap_or_else(PoisonError::into_inner);
        records
            .values()
            .filter(|class| class.is_data)
            .map(|class| class.name.clone())
            .collect()
    }

    /// All data records, ordered by name.
    pub fn all_data(&self) -> Vec<ReflectedClass> {
        let records = self.records.read().unwrap_or_else(PoisonError::into_inner);
        records
            .values()
            .filter(|class| class.is_data)
            .cloned()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.records
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Rewrite `Named` references to data records as `Record` references,
    /// in declared types and in collection element rules.
    ///
    /// Call once every source has been registered.
    pub fn resolve_references(&self) {
        let names = self.data_names();
        let mut records = self.records.write().unwrap_or_else(PoisonError::into_inner);
        for class in records.values_mut() {
            for property in &mut class.properties {
                property.declared = property.declared.resolve_records(&names);
                for rule in &mut property.rules {
                    *rule = rule.resolve_records(&names);
                }
            }
        }
    }
}

impl Default for SchemaRegistry {
    fn default() -> Self {
        Self::new()
    }
}
