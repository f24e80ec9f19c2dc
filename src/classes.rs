//! Class list handling
//!
//! Class indices follow the order of `classes.json`, starting at 0.

use log::warn;
use std::collections::HashMap;
use std::path::Path;

use crate::types::ClassEntry;
use crate::utils::read_and_parse_json;

/// Stable mapping between class names and YOLO class indices
#[derive(Debug, Clone, Default)]
pub struct ClassMap {
    names: Vec<String>,
    index: HashMap<String, usize>,
}

impl ClassMap {
    /// Assign indices in input order. A repeated name keeps its first index.
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut map = ClassMap::default();
        for name in names {
            let name = name.into();
            if map.index.contains_key(&name) {
                warn!("Duplicate class '{}' in class list, keeping its first index", name);
                continue;
            }
            map.index.insert(name.clone(), map.names.len());
            map.names.push(name);
        }
        map
    }

    /// Read a SuperAnnotate `classes.json` file
    pub fn load(path: &Path) -> std::io::Result<Self> {
        let entries: Vec<ClassEntry> = read_and_parse_json(path)?;
        Ok(Self::from_names(entries.into_iter().map(|entry| entry.name)))
    }

    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    /// Class names ordered by index
    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}
