use alloc::sync::Arc;
use alloc::vec::Vec;
use core::fmt;
use core::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, PoisonError};

use log::{debug, warn};
use odc_utils::hash::HashMap;
use odc_utils::{TypeIdMap, TypeIdSet};

use super::{PrimitiveDescriptor, well_known};
use crate::convert::NumericParsing;
use crate::native::{Native, NativeType};
use crate::{EdmError, ParserToken, PrimitiveKind, PrimitiveValue, TypeResolutionError};

// -----------------------------------------------------------------------------
// TypeRegistry

/// Maps native types to protocol primitive descriptors.
///
/// The registry holds three tables:
///
/// - the *known* table, filled by [`TypeRegistryBuilder::build`] and never
///   mutated afterwards,
/// - a cache of *derived* types: natives that are not registered themselves
///   but derive from a registered, derivable native,
/// - a set of natives already proven *non-primitive*.
///
/// A type lives in at most one of them. The two mutable tables are each
/// guarded by their own lock, so a registry can be shared across threads
/// (usually behind an [`Arc`]).
///
/// # Examples
///
/// ```
/// use odc_edm::native::{Native, NativeType, geography};
/// use odc_edm::{PrimitiveKind, TypeRegistry};
///
/// struct Landmark;
///
/// let registry = TypeRegistry::new();
/// let landmark = NativeType::builder::<Landmark>()
///     .derives_from(geography::Point::native_type())
///     .build();
///
/// let desc = registry.resolve(&landmark).unwrap();
/// assert_eq!(desc.kind(), PrimitiveKind::GeographyPoint);
/// assert!(registry.resolve(&NativeType::of::<Vec<String>>()).is_none());
/// ```
pub struct TypeRegistry {
    known: TypeIdMap<Arc<PrimitiveDescriptor>>,
    by_name: HashMap<PrimitiveKind, Arc<PrimitiveDescriptor>>,
    derivable: Vec<Arc<PrimitiveDescriptor>>,
    derived: Mutex<TypeIdMap<Arc<PrimitiveDescriptor>>>,
    non_primitive: Mutex<TypeIdSet>,
    comparisons: AtomicUsize,
    parsing: NumericParsing,
}

impl Default for TypeRegistry {
    /// See [`TypeRegistry::new`].
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl TypeRegistry {
    /// A registry with every well-known registration and lenient parsing.
    pub fn new() -> Self {
        Self::builder().with_well_known().build()
    }

    /// An empty builder.
    #[inline]
    pub fn builder() -> TypeRegistryBuilder {
        TypeRegistryBuilder::new()
    }

    /// Resolves a native type to its primitive descriptor.
    ///
    /// `Option<T>` handles resolve as `T`. Returns `None` when the type is
    /// not primitive; callers then treat it as an enum, complex or
    /// collection type.
    pub fn resolve(&self, ty: &NativeType) -> Option<Arc<PrimitiveDescriptor>> {
        let ty = ty.unwrap_optional();
        let id = ty.id();

        if let Some(desc) = self.known.get(&id) {
            return Some(desc.clone());
        }

        if self
            .non_primitive
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .contains(&id)
        {
            return None;
        }

        if let Some(desc) = self
            .derived
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&id)
        {
            return Some(desc.clone());
        }

        match self.most_derived_match(ty) {
            Some(desc) => {
                debug!("`{}` resolved as {} via `{}`", ty.path(), desc.kind(), desc.native().path());
                self.derived
                    .lock()
                    .unwrap_or_else(PoisonError::into_inner)
                    .try_insert(id, || desc.clone());
                Some(desc)
            }
            None => {
                debug!("`{}` is not a primitive type", ty.path());
                self.non_primitive
                    .lock()
                    .unwrap_or_else(PoisonError::into_inner)
                    .insert(id);
                None
            }
        }
    }

    /// Like [`resolve`](Self::resolve), but fails with
    /// [`TypeResolutionError::NotPrimitive`].
    pub fn resolve_or_err(&self, ty: &NativeType) -> Result<Arc<PrimitiveDescriptor>, TypeResolutionError> {
        self.resolve(ty)
            .ok_or_else(|| TypeResolutionError::NotPrimitive(ty.unwrap_optional().path()))
    }

    /// Resolves the descriptor of `T`.
    #[inline]
    pub fn resolve_of<T: Native>(&self) -> Option<Arc<PrimitiveDescriptor>> {
        self.resolve(&T::native_type())
    }

    #[inline]
    pub fn is_primitive(&self, ty: &NativeType) -> bool {
        self.resolve(ty).is_some()
    }

    /// Reverse lookup: a protocol type name to its canonical descriptor.
    ///
    /// Accepts `Edm.Int32` as well as `Int32`.
    ///
    /// # Errors
    ///
    /// - [`TypeResolutionError::UnsupportedReverseMapping`] for the unsigned
    ///   family (`Edm.UInt16`, `Edm.UInt32`, `Edm.UInt64`).
    /// - [`TypeResolutionError::UnknownTypeName`] for anything else without a
    ///   canonical registration.
    pub fn resolve_name(&self, name: &str) -> Result<Arc<PrimitiveDescriptor>, TypeResolutionError> {
        if let Some(&kind) = PrimitiveKind::ALL.iter().find(|kind| {
            kind.is_unmapped() && (kind.edm_name() == name || kind.short_name() == name)
        }) {
            return Err(TypeResolutionError::UnsupportedReverseMapping(kind.edm_name()));
        }
        PrimitiveKind::from_edm_name(name)
            .and_then(|kind| self.by_name.get(&kind))
            .cloned()
            .ok_or_else(|| TypeResolutionError::UnknownTypeName(name.into()))
    }

    /// Materializes a token as a value of the native type `ty`.
    pub fn materialize(&self, token: ParserToken, ty: &NativeType) -> Result<PrimitiveValue, EdmError> {
        let desc = self.resolve_or_err(ty)?;
        token.materialize(&desc, self.parsing)
    }

    /// Materializes a token against a protocol type name.
    pub fn materialize_as(&self, token: ParserToken, name: &str) -> Result<PrimitiveValue, EdmError> {
        let desc = self.resolve_name(name)?;
        token.materialize(&desc, self.parsing)
    }

    /// The parsing policy handed to converters.
    #[inline]
    pub fn parsing(&self) -> NumericParsing {
        self.parsing
    }

    /// Number of candidate comparisons made by derived-type searches so far.
    #[inline]
    pub fn comparison_count(&self) -> usize {
        self.comparisons.load(Ordering::Relaxed)
    }

    /// Forgets every derived and non-primitive classification.
    ///
    /// Only meant for tests; classifications are otherwise permanent.
    pub fn reset_discovered_types(&self) {
        self.derived
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
        self.non_primitive
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
        self.comparisons.store(0, Ordering::Relaxed);
    }

    // Among the derivable registrations `ty` is a subtype of, picks the one
    // that is itself a subtype of every other match seen before it.
    fn most_derived_match(&self, ty: &NativeType) -> Option<Arc<PrimitiveDescriptor>> {
        let mut best: Option<&Arc<PrimitiveDescriptor>> = None;
        for candidate in &self.derivable {
            self.comparisons.fetch_add(1, Ordering::Relaxed);
            if !ty.is_subtype_of(candidate.native()) {
                continue;
            }
            best = match best {
                Some(current) if !candidate.native().is_subtype_of(current.native()) => Some(current),
                _ => Some(candidate),
            };
        }
        best.cloned()
    }
}

impl fmt::Debug for TypeRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeRegistry")
            .field("known", &self.known.len())
            .field("derivable", &self.derivable.len())
            .field("parsing", &self.parsing)
            .finish_non_exhaustive()
    }
}

// -----------------------------------------------------------------------------
// TypeRegistryBuilder

/// Collects registrations for a [`TypeRegistry`].
///
/// The first registration of a native type wins; so does the first
/// canonical registration of a kind.
#[must_use]
pub struct TypeRegistryBuilder {
    descriptors: Vec<PrimitiveDescriptor>,
    parsing: NumericParsing,
}

impl Default for TypeRegistryBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TypeRegistryBuilder {
    pub fn new() -> Self {
        Self {
            descriptors: Vec::new(),
            parsing: NumericParsing::default(),
        }
    }

    /// Adds a custom registration.
    pub fn register(mut self, descriptor: PrimitiveDescriptor) -> Self {
        self.descriptors.push(descriptor);
        self
    }

    /// Adds every built-in registration.
    ///
    /// Custom registrations made before this call take precedence.
    pub fn with_well_known(mut self) -> Self {
        self.descriptors.extend(well_known::descriptors());
        self
    }

    pub fn numeric_parsing(mut self, parsing: NumericParsing) -> Self {
        self.parsing = parsing;
        self
    }

    pub fn build(self) -> TypeRegistry {
        let mut known = TypeIdMap::with_capacity(self.descriptors.len());
        let mut by_name: HashMap<PrimitiveKind, Arc<PrimitiveDescriptor>> = HashMap::default();
        let mut derivable = Vec::new();

        for desc in self.descriptors {
            let desc = Arc::new(desc);
            let id = desc.native().id();
            if !known.try_insert(id, || desc.clone()) {
                warn!("`{}` is already registered, ignoring the duplicate", desc.native().path());
                continue;
            }
            if desc.has_reverse_mapping() {
                if let Some(existing) = by_name.get(&desc.kind()) {
                    warn!(
                        "{} already maps back to `{}`, `{}` is not canonical",
                        desc.kind(),
                        existing.native().path(),
                        desc.native().path(),
                    );
                } else {
                    by_name.insert(desc.kind(), desc.clone());
                }
            }
            if !desc.native().is_sealed() {
                derivable.push(desc);
            }
        }

        TypeRegistry {
            known,
            by_name,
            derivable,
            derived: Mutex::new(TypeIdMap::new()),
            non_primitive: Mutex::new(TypeIdSet::new()),
            comparisons: AtomicUsize::new(0),
            parsing: self.parsing,
        }
    }
}
