//! Dataset configuration.

use alloc::string::String;

/// Options a dataset is opened with.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DatasetConfig {
    name: String,
    read_only: bool,
}

impl DatasetConfig {
    /// Creates a writable configuration with the given dataset name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            read_only: false,
        }
    }

    /// Sets whether write transactions are rejected.
    ///
    /// Tables can still be created on a read-only dataset while setting it up.
    pub fn read_only(mut self, read_only: bool) -> Self {
        self.read_only = read_only;
        self
    }

    /// Returns the dataset name.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns whether write transactions are rejected.
    #[inline]
    pub fn is_read_only(&self) -> bool {
        self.read_only
    }
}

impl Default for DatasetConfig {
    fn default() -> Self {
        Self::new("default")
    }
}
