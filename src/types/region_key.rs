use std::{borrow::Borrow, fmt, sync::Arc};

use serde::{Deserialize, Serialize};

/// Region identifier shared between tabular rows and geographic features.
/// Keeps the original text (with leading zeros, e.g. "08001") and compares by exact equality.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RegionKey(Arc<str>);

impl RegionKey {
    pub fn new(id: impl AsRef<str>) -> Self {
        Self(Arc::from(id.as_ref()))
    }

    #[inline]
    pub fn as_str(&self) -> &str { &self.0 }
}

impl fmt::Display for RegionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for RegionKey {
    fn borrow(&self) -> &str { &self.0 }
}

impl From<&str> for RegionKey {
    fn from(id: &str) -> Self { Self::new(id) }
}

impl From<String> for RegionKey {
    fn from(id: String) -> Self { Self(Arc::from(id)) }
}
