use std::{collections::HashMap, sync::Arc};

use super::RegionKey;

/// One entry of the attribute table: a region key plus raw text values by column name.
/// Empty cells are `None`.
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    pub key: RegionKey,
    pub values: HashMap<String, Option<Arc<str>>>,
}

impl Row {
    pub fn new(key: impl Into<RegionKey>) -> Self {
        Self { key: key.into(), values: HashMap::new() }
    }

    /// Builder-style insert, mostly for tests and in-memory tables.
    pub fn with(mut self, attribute: impl Into<String>, raw: impl AsRef<str>) -> Self {
        self.values.insert(attribute.into(), Some(Arc::from(raw.as_ref())));
        self
    }

    /// Raw text for `attribute`, `None` when the column is absent or the cell is empty.
    #[inline]
    pub fn raw(&self, attribute: &str) -> Option<&str> {
        self.values.get(attribute).and_then(|v| v.as_deref())
    }
}
