//! What the compression layer needs to know about a tablespace

/// Tablespace properties consulted while compressing and reporting
pub trait Tablespace {
    /// Tablespace id
    fn id(&self) -> u32;

    /// Tablespace name, used in diagnostics only
    fn name(&self) -> &str;

    /// Whether the tablespace uses the compressed row format
    ///
    /// Row-compressed pages are never page-compressed as well.
    fn is_row_compressed(&self) -> bool {
        false
    }
}

/// Plain tablespace descriptor for callers without their own tablespace type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpaceInfo {
    /// Tablespace id
    pub id: u32,
    /// Tablespace name
    pub name: String,
    /// Compressed row format in use
    pub row_compressed: bool,
}

impl SpaceInfo {
    /// Describe a tablespace with the regular row format
    pub fn new<S: Into<String>>(id: u32, name: S) -> Self {
        Self {
            id,
            name: name.into(),
            row_compressed: false,
        }
    }

    /// Mark the tablespace as using the compressed row format
    #[must_use]
    pub fn row_compressed(mut self, row_compressed: bool) -> Self {
        self.row_compressed = row_compressed;
        self
    }
}

impl Tablespace for SpaceInfo {
    fn id(&self) -> u32 {
        self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn is_row_compressed(&self) -> bool {
        self.row_compressed
    }
}
