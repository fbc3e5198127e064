//! Decoder configuration.
//!
//! ```rust
//! use darwin_plist::DecodeOptions;
//!
//! let options = DecodeOptions::default().max_depth(64);
//! assert_eq!(options.max_depth, 64);
//! ```

/// Default limit on element nesting inside `<plist>`.
pub const DEFAULT_MAX_DEPTH: usize = 512;

/// Options shared by the value builder and the target binder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodeOptions {
    /// Maximum nesting of container elements before the document is rejected.
    pub max_depth: usize,
}

impl Default for DecodeOptions {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl DecodeOptions {
    pub fn max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }
}
