/// Options shared by [`Serializer`](crate::serial::Serializer) and
/// [`Deserializer`](crate::serial::Deserializer).
///
/// # Examples
///
/// ```
/// use ogs_reflect::serial::SerialConfig;
///
/// let strict = SerialConfig::default()
///     .with_unknown_types(false)
///     .with_absorb_missing_members(false)
///     .with_max_depth(Some(64));
///
/// assert!(!strict.unknown_types);
/// assert_eq!(strict.max_depth, Some(64));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SerialConfig {
    /// Decode unresolvable schemas into
    /// [`DynamicObject`](crate::graph::DynamicObject)s instead of failing.
    pub unknown_types: bool,
    /// Read and drop wire members the target type does not declare, when it
    /// has no extra-field slot. When `false` such members fail with
    /// [`SerialError::MissingMember`](crate::serial::SerialError::MissingMember).
    pub absorb_missing_members: bool,
    /// Limit on nested objects. `None` leaves recursion unbounded.
    pub max_depth: Option<usize>,
}

impl Default for SerialConfig {
    #[inline]
    fn default() -> Self {
        Self {
            unknown_types: true,
            absorb_missing_members: true,
            max_depth: None,
        }
    }
}

impl SerialConfig {
    #[inline]
    pub const fn with_unknown_types(mut self, enabled: bool) -> Self {
        self.unknown_types = enabled;
        self
    }

    #[inline]
    pub const fn with_absorb_missing_members(mut self, enabled: bool) -> Self {
        self.absorb_missing_members = enabled;
        self
    }

    #[inline]
    pub const fn with_max_depth(mut self, max_depth: Option<usize>) -> Self {
        self.max_depth = max_depth;
        self
    }

    // The options that change how a schema binds. Part of the plan cache key.
    #[inline]
    pub(crate) const fn binding_flags(&self) -> u8 {
        (self.unknown_types as u8) | ((self.absorb_missing_members as u8) << 1)
    }
}
