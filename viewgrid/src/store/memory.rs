use std::collections::HashMap;

use anyhow::Result;
use extent_grid::GridResult;

use super::ResultStore;

/// Stockage en mémoire, utile pour les tests et l'intégration dans un hôte
#[derive(Debug, Default)]
pub struct MemoryStore {
    layers: HashMap<String, GridResult>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&GridResult> {
        self.layers.get(name)
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }
}

impl ResultStore for MemoryStore {
    fn replace_named_result(&mut self, name: &str, result: &GridResult) -> Result<()> {
        self.layers.insert(name.to_string(), result.clone());
        Ok(())
    }

    fn location(&self, name: &str) -> String {
        format!("memory:{}", name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use extent_grid::{generate, CoordinateSystem, Extent, GridRequest};

    fn grid(max_x: f64) -> GridResult {
        let request = GridRequest::new(
            Extent::new(0.0, 0.0, max_x, 100.0).unwrap(),
            CoordinateSystem::puwg1992(),
            100.0,
        );
        generate(&request).unwrap()
    }

    #[test]
    fn test_replace_not_append() {
        let mut store = MemoryStore::new();
        store.replace_named_result("Grid", &grid(450.0)).unwrap();
        store.replace_named_result("Grid", &grid(150.0)).unwrap();

        assert_eq!(store.len(), 1);
        assert_eq!(store.get("Grid").unwrap().count(), 4);
    }

    #[test]
    fn test_names_are_independent() {
        let mut store = MemoryStore::new();
        store.replace_named_result("A", &grid(450.0)).unwrap();
        store.replace_named_result("B", &grid(150.0)).unwrap();

        assert_eq!(store.len(), 2);
        assert_eq!(store.location("A"), "memory:A");
    }
}
