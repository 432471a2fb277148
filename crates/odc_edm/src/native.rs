//! Runtime handles for client-side types.
//!
//! Rust has no runtime subtyping, so the metadata layer describes the type
//! hierarchy explicitly: a [`NativeType`] knows its [`TypeId`], whether it
//! can be derived from, and the bases it derives from. The registry only
//! ever inspects these handles.

use alloc::sync::Arc;
use alloc::vec::Vec;
use core::any::{TypeId, type_name};
use core::fmt;
use core::hash::{Hash, Hasher};

// -----------------------------------------------------------------------------
// NativeType

struct NativeTypeData {
    id: TypeId,
    path: &'static str,
    sealed: bool,
    builtin: bool,
    bases: Vec<NativeType>,
    wrapped: Option<NativeType>,
}

/// A cheap, clonable handle describing one native type.
///
/// Equality and hashing only consider the [`TypeId`].
///
/// # Examples
///
/// ```
/// use odc_edm::native::{Native, NativeType, geography};
///
/// struct Landmark;
///
/// let landmark = NativeType::builder::<Landmark>()
///     .derives_from(geography::Point::native_type())
///     .build();
///
/// assert!(landmark.is_subtype_of(&geography::Geography::native_type()));
/// assert!(!landmark.is_subtype_of(&geography::LineString::native_type()));
/// ```
#[derive(Clone)]
pub struct NativeType(Arc<NativeTypeData>);

impl NativeType {
    /// A sealed type: nothing derives from it.
    pub fn of<T: ?Sized + 'static>() -> Self {
        Self::builder::<T>().build()
    }

    /// A language builtin (`bool`, integers, floats, `char`).
    ///
    /// Builtins are implicitly sealed.
    pub fn builtin<T: ?Sized + 'static>() -> Self {
        let mut builder = Self::builder::<T>();
        builder.builtin = true;
        builder.build()
    }

    /// A type other types may derive from.
    pub fn derivable<T: ?Sized + 'static>() -> Self {
        Self::builder::<T>().sealed(false).build()
    }

    /// `Option<T>`, wrapping the handle of `T`.
    pub fn option_of<T: 'static>(inner: NativeType) -> Self {
        debug_assert_eq!(inner.id(), TypeId::of::<T>(), "wrapped handle must describe `T`");
        let mut builder = Self::builder::<Option<T>>();
        builder.wrapped = Some(inner);
        builder.build()
    }

    pub fn builder<T: ?Sized + 'static>() -> NativeTypeBuilder {
        NativeTypeBuilder {
            id: TypeId::of::<T>(),
            path: type_name::<T>(),
            sealed: true,
            builtin: false,
            bases: Vec::new(),
            wrapped: None,
        }
    }

    /// Strips an optional wrapper, if any.
    #[inline]
    pub fn unwrap_optional(&self) -> &NativeType {
        match &self.0.wrapped {
            Some(inner) => inner,
            None => self,
        }
    }

    /// Whether `self` is `other` or derives from it, directly or transitively.
    pub fn is_subtype_of(&self, other: &NativeType) -> bool {
        self == other || self.0.bases.iter().any(|base| base.is_subtype_of(other))
    }

    #[inline]
    pub fn id(&self) -> TypeId {
        self.0.id
    }

    /// Full type path, e.g. `alloc::string::String`.
    #[inline]
    pub fn path(&self) -> &'static str {
        self.0.path
    }

    /// Last path segment, without generic arguments.
    pub fn name(&self) -> &'static str {
        let path = self.0.path;
        let head = path.split('<').next().unwrap_or(path);
        head.rsplit("::").next().unwrap_or(head)
    }

    #[inline]
    pub fn is_sealed(&self) -> bool {
        self.0.sealed || self.0.builtin
    }

    #[inline]
    pub fn is_builtin(&self) -> bool {
        self.0.builtin
    }

    #[inline]
    pub fn is_optional(&self) -> bool {
        self.0.wrapped.is_some()
    }

    #[inline]
    pub fn bases(&self) -> &[NativeType] {
        &self.0.bases
    }
}

impl PartialEq for NativeType {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.0.id == other.0.id
    }
}

impl Eq for NativeType {}

impl Hash for NativeType {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.id.hash(state);
    }
}

impl fmt::Debug for NativeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0.path)
    }
}

impl fmt::Display for NativeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.name())
    }
}

// -----------------------------------------------------------------------------
// NativeTypeBuilder

/// Builder for [`NativeType`], see [`NativeType::builder`].
#[must_use]
pub struct NativeTypeBuilder {
    id: TypeId,
    path: &'static str,
    sealed: bool,
    builtin: bool,
    bases: Vec<NativeType>,
    wrapped: Option<NativeType>,
}

impl NativeTypeBuilder {
    /// Overrides the reported path (defaults to [`core::any::type_name`]).
    pub fn path(mut self, path: &'static str) -> Self {
        self.path = path;
        self
    }

    pub fn derives_from(mut self, base: NativeType) -> Self {
        self.bases.push(base);
        self
    }

    pub fn sealed(mut self, sealed: bool) -> Self {
        self.sealed = sealed;
        self
    }

    pub fn build(self) -> NativeType {
        NativeType(Arc::new(NativeTypeData {
            id: self.id,
            path: self.path,
            sealed: self.sealed,
            builtin: self.builtin,
            bases: self.bases,
            wrapped: self.wrapped,
        }))
    }
}

// -----------------------------------------------------------------------------
// Native

/// Types with a canonical [`NativeType`] handle.
pub trait Native: 'static {
    fn native_type() -> NativeType;
}

macro_rules! impl_native {
    ($ctor:ident: $($ty:ty),* $(,)?) => {
        $(
            impl Native for $ty {
                #[inline]
                fn native_type() -> NativeType {
                    NativeType::$ctor::<$ty>()
                }
            }
        )*
    };
}

impl_native!(builtin: bool, char, u8, i8, i16, i32, i64, u16, u32, u64, f32, f64);
impl_native!(
    of: alloc::string::String,
    alloc::boxed::Box<str>,
    Vec<char>,
    Vec<u8>,
    alloc::boxed::Box<[u8]>,
    uuid::Uuid,
    chrono::DateTime<chrono::FixedOffset>,
    chrono::DateTime<chrono::Utc>,
    chrono::NaiveDate,
    chrono::NaiveTime,
    chrono::TimeDelta,
    crate::value::Decimal,
    crate::value::StreamLink,
);

impl<T: Native> Native for Option<T> {
    fn native_type() -> NativeType {
        NativeType::option_of::<T>(T::native_type())
    }
}

// -----------------------------------------------------------------------------
// Spatial markers

macro_rules! spatial_markers {
    ($family:ident: $($shape:ident),*) => {
        $(
            /// Marker for a spatial shape; derive client types from its handle.
            #[derive(Debug, Clone, Copy)]
            pub struct $shape;

            impl $crate::native::Native for $shape {
                fn native_type() -> $crate::native::NativeType {
                    $crate::native::NativeType::builder::<$shape>()
                        .sealed(false)
                        .derives_from(<$family as $crate::native::Native>::native_type())
                        .build()
                }
            }
        )*
    };
}

/// Round-earth spatial markers.
pub mod geography {
    /// Root of the geography family.
    #[derive(Debug, Clone, Copy)]
    pub struct Geography;

    impl super::Native for Geography {
        fn native_type() -> super::NativeType {
            super::NativeType::derivable::<Geography>()
        }
    }

    spatial_markers!(Geography: Point, LineString, Polygon, MultiPoint, MultiLineString, MultiPolygon, Collection);
}

/// Flat-earth spatial markers.
pub mod geometry {
    /// Root of the geometry family.
    #[derive(Debug, Clone, Copy)]
    pub struct Geometry;

    impl super::Native for Geometry {
        fn native_type() -> super::NativeType {
            super::NativeType::derivable::<Geometry>()
        }
    }

    spatial_markers!(Geometry: Point, LineString, Polygon, MultiPoint, MultiLineString, MultiPolygon, Collection);
}

// -----------------------------------------------------------------------------
// Tests
