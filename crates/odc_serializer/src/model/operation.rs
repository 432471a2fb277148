use super::{ClientProperty, FieldValue};

/// An argument of a service operation call.
///
/// The property describes the parameter: its name is the parameter name,
/// its flags and types say how the value is converted.
#[derive(Debug, Clone)]
pub struct OperationParameter<'a> {
    pub property: ClientProperty,
    pub value: FieldValue<'a>,
}

impl<'a> OperationParameter<'a> {
    pub fn new(property: ClientProperty, value: impl Into<FieldValue<'a>>) -> Self {
        Self {
            property,
            value: value.into(),
        }
    }

    #[inline]
    pub fn name(&self) -> &str {
        self.property.name()
    }
}
