use core::any::TypeId;
use core::fmt;

// -----------------------------------------------------------------------------
// TypePath

/// Stable, human readable names for a type.
///
/// Unlike [`core::any::type_name`], the output is part of the wire format:
/// descriptors carry [`type_path`](TypePath::type_path), and a reader that
/// meets an unregistered path falls back to a dynamic object.
///
/// `#[derive(Reflect)]` implements this with `module_path!()` plus the
/// identifier, or with the literal given in `#[reflect(type_path = "...")]`.
///
/// # Examples
///
/// ```
/// use ogs_reflect::info::TypePath;
///
/// assert_eq!(<Vec<u8> as TypePath>::type_path(), "alloc::vec::Vec<u8>");
/// assert_eq!(<Vec<u8> as TypePath>::type_name(), "Vec<u8>");
/// ```
pub trait TypePath: 'static {
    /// Fully qualified path including generics. Unique per type.
    fn type_path() -> &'static str;

    /// Short name including generics. May collide across modules.
    fn type_name() -> &'static str;
}

// -----------------------------------------------------------------------------
// Type

/// A [`TypeId`] bundled with its [`TypePath`] functions.
#[derive(Clone, Copy)]
pub struct Type {
    id: TypeId,
    path: fn() -> &'static str,
    name: fn() -> &'static str,
}

impl Type {
    #[inline]
    pub fn of<T: TypePath + ?Sized>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            path: T::type_path,
            name: T::type_name,
        }
    }

    #[inline(always)]
    pub const fn id(&self) -> TypeId {
        self.id
    }

    #[inline]
    pub fn path(&self) -> &'static str {
        (self.path)()
    }

    #[inline]
    pub fn name(&self) -> &'static str {
        (self.name)()
    }

    /// Returns `true` if this describes `T`.
    #[inline]
    pub fn is<T: ?Sized + 'static>(&self) -> bool {
        self.id == TypeId::of::<T>()
    }
}

impl PartialEq for Type {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Type {}

impl fmt::Debug for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}
