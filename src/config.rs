//! Reader configuration

/// Bounds applied while parsing container directories
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseLimits {
    /// Deepest directory nesting accepted below the root
    pub max_depth: usize,
    /// Most entries a single directory may declare
    pub max_entries_per_directory: u64,
}

impl Default for ParseLimits {
    fn default() -> Self {
        ParseLimits {
            max_depth: 64,
            max_entries_per_directory: 65_536,
        }
    }
}

/// Options shared by every format reader of an `ImageReader`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReaderOptions {
    /// Emit trace records on entry and exit of DM4 reads
    pub trace_reads: bool,
    pub limits: ParseLimits,
}
