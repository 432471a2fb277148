use core::fmt;

// -----------------------------------------------------------------------------
// PrimitiveKind

/// The fixed primitive vocabulary of the protocol.
///
/// The unsigned family (`UInt16`, `UInt32`, `UInt64`) is not part of the
/// protocol itself. Those kinds can be written but have no reverse mapping:
/// a protocol type name never resolves to them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum PrimitiveKind {
    Boolean,
    Byte,
    Binary,
    DateTimeOffset,
    Decimal,
    Double,
    Guid,
    Int16,
    Int32,
    Int64,
    Single,
    String,
    SByte,
    Duration,
    Date,
    TimeOfDay,
    Stream,

    Geography,
    GeographyPoint,
    GeographyLineString,
    GeographyPolygon,
    GeographyMultiPoint,
    GeographyMultiLineString,
    GeographyMultiPolygon,
    GeographyCollection,

    Geometry,
    GeometryPoint,
    GeometryLineString,
    GeometryPolygon,
    GeometryMultiPoint,
    GeometryMultiLineString,
    GeometryMultiPolygon,
    GeometryCollection,

    UInt16,
    UInt32,
    UInt64,
}

macro_rules! define_names {
    ($($kind:ident => $name:literal,)*) => {
        impl PrimitiveKind {
            /// Every kind, in declaration order.
            pub const ALL: &'static [PrimitiveKind] = &[$(PrimitiveKind::$kind,)*];

            /// Returns the qualified protocol type name, e.g. `Edm.Int32`.
            ///
            /// Unmapped kinds return a descriptive name (`Edm.UInt16`) that is
            /// never accepted by [`PrimitiveKind::from_edm_name`].
            pub const fn edm_name(self) -> &'static str {
                match self {
                    $(PrimitiveKind::$kind => $name,)*
                }
            }
        }
    };
}

define_names! {
    Boolean => "Edm.Boolean",
    Byte => "Edm.Byte",
    Binary => "Edm.Binary",
    DateTimeOffset => "Edm.DateTimeOffset",
    Decimal => "Edm.Decimal",
    Double => "Edm.Double",
    Guid => "Edm.Guid",
    Int16 => "Edm.Int16",
    Int32 => "Edm.Int32",
    Int64 => "Edm.Int64",
    Single => "Edm.Single",
    String => "Edm.String",
    SByte => "Edm.SByte",
    Duration => "Edm.Duration",
    Date => "Edm.Date",
    TimeOfDay => "Edm.TimeOfDay",
    Stream => "Edm.Stream",
    Geography => "Edm.Geography",
    GeographyPoint => "Edm.GeographyPoint",
    GeographyLineString => "Edm.GeographyLineString",
    GeographyPolygon => "Edm.GeographyPolygon",
    GeographyMultiPoint => "Edm.GeographyMultiPoint",
    GeographyMultiLineString => "Edm.GeographyMultiLineString",
    GeographyMultiPolygon => "Edm.GeographyMultiPolygon",
    GeographyCollection => "Edm.GeographyCollection",
    Geometry => "Edm.Geometry",
    GeometryPoint => "Edm.GeometryPoint",
    GeometryLineString => "Edm.GeometryLineString",
    GeometryPolygon => "Edm.GeometryPolygon",
    GeometryMultiPoint => "Edm.GeometryMultiPoint",
    GeometryMultiLineString => "Edm.GeometryMultiLineString",
    GeometryMultiPolygon => "Edm.GeometryMultiPolygon",
    GeometryCollection => "Edm.GeometryCollection",
    UInt16 => "Edm.UInt16",
    UInt32 => "Edm.UInt32",
    UInt64 => "Edm.UInt64",
}

impl PrimitiveKind {
    /// Resolves a protocol type name to its kind.
    ///
    /// Accepts the qualified form (`Edm.Int32`) and, for compatibility with
    /// older payloads, the unqualified one (`Int32`). Unmapped kinds are
    /// never returned.
    ///
    /// # Examples
    ///
    /// ```
    /// use odc_edm::PrimitiveKind;
    ///
    /// assert_eq!(PrimitiveKind::from_edm_name("Edm.Int32"), Some(PrimitiveKind::Int32));
    /// assert_eq!(PrimitiveKind::from_edm_name("Guid"), Some(PrimitiveKind::Guid));
    /// assert_eq!(PrimitiveKind::from_edm_name("Edm.UInt16"), None);
    /// ```
    pub fn from_edm_name(name: &str) -> Option<Self> {
        let short = name.strip_prefix("Edm.").unwrap_or(name);
        Self::ALL
            .iter()
            .copied()
            .filter(|kind| !kind.is_unmapped())
            .find(|kind| kind.short_name() == short)
    }

    /// Returns the type name without the `Edm.` namespace.
    #[inline]
    pub fn short_name(self) -> &'static str {
        let name = self.edm_name();
        name.strip_prefix("Edm.").unwrap_or(name)
    }

    /// Whether this kind belongs to the unsigned extension family.
    #[inline]
    pub const fn is_unmapped(self) -> bool {
        matches!(self, Self::UInt16 | Self::UInt32 | Self::UInt64)
    }

    #[inline]
    pub const fn is_geography(self) -> bool {
        matches!(
            self,
            Self::Geography
                | Self::GeographyPoint
                | Self::GeographyLineString
                | Self::GeographyPolygon
                | Self::GeographyMultiPoint
                | Self::GeographyMultiLineString
                | Self::GeographyMultiPolygon
                | Self::GeographyCollection
        )
    }

    #[inline]
    pub const fn is_geometry(self) -> bool {
        matches!(
            self,
            Self::Geometry
                | Self::GeometryPoint
                | Self::GeometryLineString
                | Self::GeometryPolygon
                | Self::GeometryMultiPoint
                | Self::GeometryMultiLineString
                | Self::GeometryMultiPolygon
                | Self::GeometryCollection
        )
    }

    #[inline]
    pub const fn is_spatial(self) -> bool {
        self.is_geography() || self.is_geometry()
    }

    /// Whether the kind holds an integer (signed, unsigned or byte).
    #[inline]
    pub const fn is_integral(self) -> bool {
        matches!(
            self,
            Self::Byte
                | Self::SByte
                | Self::Int16
                | Self::Int32
                | Self::Int64
                | Self::UInt16
                | Self::UInt32
                | Self::UInt64
        )
    }

    /// Whether a value of kind `other` may be written where `self` is declared.
    ///
    /// Identical kinds are always assignable; the abstract spatial roots
    /// accept every shape of their family.
    ///
    /// # Examples
    ///
    /// ```
    /// use odc_edm::PrimitiveKind;
    ///
    /// assert!(PrimitiveKind::Geography.accepts(PrimitiveKind::GeographyPoint));
    /// assert!(!PrimitiveKind::Geography.accepts(PrimitiveKind::GeometryPoint));
    /// assert!(!PrimitiveKind::Int32.accepts(PrimitiveKind::Int64));
    /// ```
    #[inline]
    pub const fn accepts(self, other: PrimitiveKind) -> bool {
        if self as u8 == other as u8 {
            return true;
        }
        match self {
            Self::Geography => other.is_geography(),
            Self::Geometry => other.is_geometry(),
            _ => false,
        }
    }
}

impl fmt::Display for PrimitiveKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.edm_name())
    }
}

// -----------------------------------------------------------------------------
// Tests
