//! Configuration options for the tnetstring parser and renderer.
//!
//! ## Examples
//!
//! ```rust
//! use serde_tnetstring::{parse_with_options, TnetOptions};
//!
//! // Refuse anything nested more than two containers deep
//! let options = TnetOptions::new().with_max_depth(2);
//! assert!(parse_with_options(b"3:0:]]", &options).is_ok());
//! assert!(parse_with_options(b"6:3:0:]]]", &options).is_err());
//! ```

/// Nesting limit applied when no other is configured.
pub const DEFAULT_MAX_DEPTH: usize = 128;

/// Starting size of the render buffer, in bytes.
pub const DEFAULT_INITIAL_CAPACITY: usize = 64;

/// Configuration options for parsing and rendering.
///
/// # Examples
///
/// ```rust
/// use serde_tnetstring::TnetOptions;
///
/// let options = TnetOptions::new()
///     .with_max_depth(32)
///     .with_initial_capacity(4096);
/// assert_eq!(options.max_depth, 32);
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TnetOptions {
    /// Maximum number of nested containers accepted by the parser and
    /// walked by the renderer.
    pub max_depth: usize,
    /// Capacity the render buffer starts with before doubling.
    pub initial_capacity: usize,
}

impl Default for TnetOptions {
    fn default() -> Self {
        TnetOptions {
            max_depth: DEFAULT_MAX_DEPTH,
            initial_capacity: DEFAULT_INITIAL_CAPACITY,
        }
    }
}

impl TnetOptions {
    /// Creates default options (depth limit 128, 64-byte initial buffer).
    ///
    /// # Examples
    ///
    /// ```rust
    /// use serde_tnetstring::TnetOptions;
    ///
    /// let options = TnetOptions::new();
    /// assert_eq!(options.max_depth, 128);
    /// assert_eq!(options.initial_capacity, 64);
    /// ```
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the maximum container nesting depth.
    ///
    /// A depth of 0 rejects every list and dict; scalars are always accepted.
    #[must_use]
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Sets the initial render buffer capacity.
    ///
    /// Large values avoid regrowth when output sizes are known in advance.
    #[must_use]
    pub fn with_initial_capacity(mut self, initial_capacity: usize) -> Self {
        self.initial_capacity = initial_capacity;
        self
    }
}
