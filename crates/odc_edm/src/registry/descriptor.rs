use alloc::boxed::Box;
use alloc::string::String;
use core::fmt;

use crate::convert::{NumericParsing, PrimitiveConverter};
use crate::native::NativeType;
use crate::{FormatError, PrimitiveKind, PrimitiveValue, TypeResolutionError};

// -----------------------------------------------------------------------------
// PrimitiveDescriptor

/// The mapping of one native type to a protocol primitive kind.
///
/// Immutable once registered. Several natives may share a kind; at most one
/// of them is the canonical target of a reverse (name to type) lookup.
///
/// # Examples
///
/// ```
/// use odc_edm::convert::StringConverter;
/// use odc_edm::native::NativeType;
/// use odc_edm::registry::PrimitiveDescriptor;
/// use odc_edm::PrimitiveKind;
///
/// struct Email;
///
/// let desc = PrimitiveDescriptor::new(
///     NativeType::of::<Email>(),
///     PrimitiveKind::String,
///     StringConverter,
/// );
///
/// assert_eq!(desc.protocol_type_name(), Ok("Edm.String"));
/// assert!(!desc.has_reverse_mapping());
/// ```
pub struct PrimitiveDescriptor {
    native: NativeType,
    kind: PrimitiveKind,
    converter: Box<dyn PrimitiveConverter>,
    reverse: bool,
}

impl PrimitiveDescriptor {
    /// Creates a non-canonical descriptor.
    pub fn new(native: NativeType, kind: PrimitiveKind, converter: impl PrimitiveConverter) -> Self {
        Self {
            native,
            kind,
            converter: Box::new(converter),
            reverse: false,
        }
    }

    /// Marks this descriptor as the canonical reverse-mapping target of its
    /// kind. Ignored for unmapped kinds.
    pub fn canonical(mut self) -> Self {
        self.reverse = !self.kind.is_unmapped();
        self
    }

    #[inline]
    pub fn native(&self) -> &NativeType {
        &self.native
    }

    #[inline]
    pub fn kind(&self) -> PrimitiveKind {
        self.kind
    }

    /// The protocol type name, including for unmapped kinds.
    #[inline]
    pub fn edm_name(&self) -> &'static str {
        self.kind.edm_name()
    }

    /// The protocol type name to put on the wire.
    ///
    /// # Errors
    ///
    /// [`TypeResolutionError::UnsupportedReverseMapping`] for unmapped kinds,
    /// which have no name a service could read back.
    pub fn protocol_type_name(&self) -> Result<&'static str, TypeResolutionError> {
        if self.kind.is_unmapped() {
            Err(TypeResolutionError::UnsupportedReverseMapping(self.kind.edm_name()))
        } else {
            Ok(self.kind.edm_name())
        }
    }

    #[inline]
    pub fn has_reverse_mapping(&self) -> bool {
        self.reverse
    }

    #[inline]
    pub fn converter(&self) -> &dyn PrimitiveConverter {
        &*self.converter
    }

    #[inline]
    pub fn parse(&self, text: &str, parsing: NumericParsing) -> Result<PrimitiveValue, FormatError> {
        self.converter.parse(text, parsing)
    }

    #[inline]
    pub fn format(&self, value: &PrimitiveValue) -> Result<String, FormatError> {
        self.converter.format(value)
    }
}

impl fmt::Debug for PrimitiveDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PrimitiveDescriptor")
            .field("native", &self.native)
            .field("kind", &self.kind)
            .field("reverse", &self.reverse)
            .finish_non_exhaustive()
    }
}
