use alloc::string::String;

use crate::convert::NumericParsing;
use crate::registry::PrimitiveDescriptor;
use crate::{EdmError, PrimitiveValue, TypeResolutionError};

// -----------------------------------------------------------------------------
// ParserToken

/// A wire value that has been read but not yet materialized.
///
/// Tokens are consumed exactly once by [`materialize`](Self::materialize).
#[derive(Debug, Clone, PartialEq)]
pub enum ParserToken {
    /// Raw text, parsed against the target type on materialization.
    Textual(String),
    /// A value whose markup had to be parsed eagerly.
    Instance(PrimitiveValue),
}

impl ParserToken {
    /// Produces a value of the descriptor's kind.
    ///
    /// # Errors
    ///
    /// - [`FormatError`](crate::FormatError) if textual content is invalid for the kind.
    /// - [`TypeResolutionError::MismatchedToken`] if a pre-materialized value
    ///   cannot stand in for the descriptor's kind.
    pub fn materialize(
        self,
        descriptor: &PrimitiveDescriptor,
        parsing: NumericParsing,
    ) -> Result<PrimitiveValue, EdmError> {
        match self {
            Self::Textual(text) => Ok(descriptor.parse(&text, parsing)?),
            Self::Instance(value) => {
                let expected = descriptor.kind();
                if expected.accepts(value.kind()) {
                    Ok(value)
                } else {
                    Err(TypeResolutionError::MismatchedToken {
                        expected,
                        actual: value.kind(),
                    }
                    .into())
                }
            }
        }
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use alloc::string::String;

    use super::ParserToken;
    use crate::native::{Native, geography};
    use crate::value::{Shape, SpatialValue};
    use crate::{EdmError, PrimitiveValue, TypeRegistry, TypeResolutionError};

    #[test]
    fn textual_tokens_parse_late() {
        let registry = TypeRegistry::new();
        let token = ParserToken::Textual(String::from("42"));
        let value = registry.materialize(token, &i32::native_type()).unwrap();
        assert_eq!(value, PrimitiveValue::Int32(42));

        let token = ParserToken::Textual(String::from("forty-two"));
        let err = registry.materialize(token, &i32::native_type()).unwrap_err();
        assert!(matches!(err, EdmError::Format(_)));
    }

    #[test]
    fn instance_tokens_must_fit_target() {
        let registry = TypeRegistry::new();
        let point = PrimitiveValue::Spatial(SpatialValue::geography(Shape::point(1.0, 2.0)));

        let token = ParserToken::Instance(point.clone());
        let root = geography::Geography::native_type();
        assert_eq!(registry.materialize(token, &root).unwrap(), point);

        let token = ParserToken::Instance(point);
        let err = registry.materialize(token, &String::native_type()).unwrap_err();
        assert!(matches!(
            err,
            EdmError::TypeResolution(TypeResolutionError::MismatchedToken { .. })
        ));
    }
}
