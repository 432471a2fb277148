use alloc::string::{String, ToString};

use super::{NumericParsing, PrimitiveConverter};
use crate::value::{SpatialFamily, SpatialValue};
use crate::{FormatError, MarkupReader, ParserToken, PrimitiveKind, PrimitiveValue};

/// Codec for one geography or geometry kind.
///
/// The abstract family roots accept every shape of their family; concrete
/// kinds only accept their own shape. Markup is always pre-materialized.
pub struct SpatialConverter {
    kind: PrimitiveKind,
    family: SpatialFamily,
}

impl SpatialConverter {
    /// Returns `None` for non-spatial kinds.
    pub const fn new(kind: PrimitiveKind) -> Option<Self> {
        match SpatialFamily::of_kind(kind) {
            Some(family) => Some(Self { kind, family }),
            None => None,
        }
    }

    fn read(&self, text: &str) -> Result<SpatialValue, FormatError> {
        let value = SpatialValue::parse(self.family, text)
            .map_err(|reason| FormatError::invalid(self.kind, text, reason))?;
        if !self.kind.accepts(value.kind()) {
            return Err(FormatError::KindMismatch {
                expected: self.kind,
                actual: value.kind(),
            });
        }
        Ok(value)
    }
}

impl PrimitiveConverter for SpatialConverter {
    fn parse(&self, text: &str, _: NumericParsing) -> Result<PrimitiveValue, FormatError> {
        self.read(text).map(PrimitiveValue::Spatial)
    }

    fn format(&self, value: &PrimitiveValue) -> Result<String, FormatError> {
        match value {
            PrimitiveValue::Spatial(v) if self.kind.accepts(v.kind()) => Ok(v.to_string()),
            _ => Err(FormatError::KindMismatch {
                expected: self.kind,
                actual: value.kind(),
            }),
        }
    }

    fn tokenize(&self, reader: &mut dyn MarkupReader) -> Result<ParserToken, FormatError> {
        let text = reader.read_element_text()?;
        self.read(&text)
            .map(|v| ParserToken::Instance(PrimitiveValue::Spatial(v)))
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use super::*;
    use crate::StrMarkupReader;

    #[test]
    fn root_accepts_any_shape_of_its_family() {
        let root = SpatialConverter::new(PrimitiveKind::Geography).unwrap();
        let v = root.parse("LINESTRING (0 0, 1 1)", NumericParsing::Strict).unwrap();
        assert_eq!(v.kind(), PrimitiveKind::GeographyLineString);
        assert_eq!(root.format(&v).unwrap(), "SRID=4326;LINESTRING (0 0, 1 1)");

        let point = SpatialConverter::new(PrimitiveKind::GeographyPoint).unwrap();
        assert!(point.format(&v).is_err());
        assert!(point.parse("LINESTRING (0 0, 1 1)", NumericParsing::Strict).is_err());
    }

    #[test]
    fn markup_is_pre_materialized() {
        let c = SpatialConverter::new(PrimitiveKind::GeometryPoint).unwrap();
        let mut reader = StrMarkupReader::new("SRID=0;POINT (1 2)");
        let token = c.tokenize(&mut reader).unwrap();
        assert!(matches!(token, ParserToken::Instance(PrimitiveValue::Spatial(_))));
    }

    #[test]
    fn non_spatial_kinds_have_no_converter() {
        assert!(SpatialConverter::new(PrimitiveKind::String).is_none());
    }
}
