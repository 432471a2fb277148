// -----------------------------------------------------------------------------
// SerializerSettings

/// Knobs of the graph converter and the writer orchestrator.
///
/// ```
/// use odc_serializer::SerializerSettings;
///
/// let settings = SerializerSettings::default()
///     .with_max_depth(64)
///     .with_annotate_structured_literals(false);
///
/// assert_eq!(settings.max_depth, 64);
/// assert!(!settings.post_only_set_properties);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub struct SerializerSettings {
    /// JSON-shaped URI literals of complex values carry `@odata.type`.
    pub annotate_structured_literals: bool,
    /// Added entries only send the properties recorded as set.
    pub post_only_set_properties: bool,
    /// Nesting limit for complex values.
    ///
    /// Conversion itself does not recurse, but writing a nested resource
    /// does, once per level.
    pub max_depth: usize,
}

impl SerializerSettings {
    pub const DEFAULT_MAX_DEPTH: usize = 1024;

    pub const fn new() -> Self {
        Self {
            annotate_structured_literals: true,
            post_only_set_properties: false,
            max_depth: Self::DEFAULT_MAX_DEPTH,
        }
    }

    pub const fn with_annotate_structured_literals(mut self, annotate: bool) -> Self {
        self.annotate_structured_literals = annotate;
        self
    }

    pub const fn with_post_only_set_properties(mut self, only_set: bool) -> Self {
        self.post_only_set_properties = only_set;
        self
    }

    pub const fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }
}

impl Default for SerializerSettings {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}
