use alloc::string::String;
use alloc::sync::Arc;
use alloc::vec::Vec;
use core::any::Any;

use bitflags::bitflags;
use odc_edm::{NativeType, PrimitiveValue};

use super::EnumType;

// -----------------------------------------------------------------------------
// PropertyFlags

bitflags! {
    /// Classification of a client property, computed by the metadata layer.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct PropertyFlags: u8 {
        const PRIMITIVE  = 1 << 0;
        const ENUM       = 1 << 1;
        const COMPLEX    = 1 << 2;
        const COLLECTION = 1 << 3;
        /// Navigation property; written as a link, never as a value.
        const ENTITY     = 1 << 4;
        const NULLABLE   = 1 << 5;
    }
}

// -----------------------------------------------------------------------------
// ClientProperty

/// One declared property of a client type.
///
/// For collections the native type, enum type or structural name describe
/// the item.
#[derive(Debug, Clone)]
pub struct ClientProperty {
    name: String,
    flags: PropertyFlags,
    native: Option<NativeType>,
    enum_type: Option<Arc<EnumType>>,
    structural_name: Option<String>,
}

impl ClientProperty {
    fn with(name: impl Into<String>, flags: PropertyFlags) -> Self {
        Self {
            name: name.into(),
            flags: flags | PropertyFlags::NULLABLE,
            native: None,
            enum_type: None,
            structural_name: None,
        }
    }

    pub fn primitive(name: impl Into<String>, native: NativeType) -> Self {
        let mut p = Self::with(name, PropertyFlags::PRIMITIVE);
        p.native = Some(native);
        p
    }

    pub fn enumeration(name: impl Into<String>, enum_type: Arc<EnumType>) -> Self {
        let mut p = Self::with(name, PropertyFlags::ENUM);
        p.enum_type = Some(enum_type);
        p
    }

    pub fn complex(name: impl Into<String>, type_name: impl Into<String>) -> Self {
        let mut p = Self::with(name, PropertyFlags::COMPLEX);
        p.structural_name = Some(type_name.into());
        p
    }

    pub fn primitive_collection(name: impl Into<String>, item: NativeType) -> Self {
        let mut p = Self::primitive(name, item);
        p.flags |= PropertyFlags::COLLECTION;
        p
    }

    pub fn enum_collection(name: impl Into<String>, enum_type: Arc<EnumType>) -> Self {
        let mut p = Self::enumeration(name, enum_type);
        p.flags |= PropertyFlags::COLLECTION;
        p
    }

    pub fn complex_collection(name: impl Into<String>, type_name: impl Into<String>) -> Self {
        let mut p = Self::complex(name, type_name);
        p.flags |= PropertyFlags::COLLECTION;
        p
    }

    /// A navigation property to one entity, or to many when `to_many`.
    pub fn navigation(name: impl Into<String>, to_many: bool) -> Self {
        let flags = if to_many {
            PropertyFlags::ENTITY | PropertyFlags::COLLECTION
        } else {
            PropertyFlags::ENTITY
        };
        Self::with(name, flags)
    }

    /// Marks the property as non-nullable.
    pub fn required(mut self) -> Self {
        self.flags.remove(PropertyFlags::NULLABLE);
        self
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn flags(&self) -> PropertyFlags {
        self.flags
    }

    /// Declared native type of a primitive property or primitive item.
    #[inline]
    pub fn native(&self) -> Option<&NativeType> {
        self.native.as_ref()
    }

    #[inline]
    pub fn enum_type(&self) -> Option<&EnumType> {
        self.enum_type.as_deref()
    }

    /// Structural name of a complex property or complex item.
    #[inline]
    pub fn structural_name(&self) -> Option<&str> {
        self.structural_name.as_deref()
    }

    #[inline]
    pub fn is_nullable(&self) -> bool {
        self.flags.contains(PropertyFlags::NULLABLE)
    }

    #[inline]
    pub fn is_collection(&self) -> bool {
        self.flags.contains(PropertyFlags::COLLECTION)
    }

    #[inline]
    pub fn is_entity(&self) -> bool {
        self.flags.contains(PropertyFlags::ENTITY)
    }
}

// -----------------------------------------------------------------------------
// ClientType

/// The structural description of an entity or complex type.
#[derive(Debug, Clone)]
pub struct ClientType {
    name: String,
    properties: Vec<ClientProperty>,
}

impl ClientType {
    /// `name` is the qualified protocol name, e.g. `NS.Address`.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            properties: Vec::new(),
        }
    }

    pub fn with_property(mut self, property: ClientProperty) -> Self {
        self.properties.push(property);
        self
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Properties in declaration order.
    #[inline]
    pub fn properties(&self) -> &[ClientProperty] {
        &self.properties
    }

    pub fn property(&self, name: &str) -> Option<&ClientProperty> {
        self.properties.iter().find(|p| p.name == name)
    }
}

// -----------------------------------------------------------------------------
// Structured

/// A domain object the serializer can walk.
///
/// Implemented by the metadata layer, usually through generated code.
pub trait Structured: Any {
    fn client_type(&self) -> &ClientType;

    /// Current value of a declared property, `None` if there is no such field.
    fn field(&self, name: &str) -> Option<FieldValue<'_>>;
}

/// A property value as seen by the serializer.
#[derive(Clone)]
pub enum FieldValue<'a> {
    Null,
    Primitive(PrimitiveValue),
    /// The underlying value of an enum member or flag combination.
    Enum(i64),
    Structured(&'a dyn Structured),
    Collection(Vec<FieldValue<'a>>),
}

impl core::fmt::Debug for FieldValue<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Null => f.write_str("Null"),
            Self::Primitive(v) => f.debug_tuple("Primitive").field(v).finish(),
            Self::Enum(v) => f.debug_tuple("Enum").field(v).finish(),
            Self::Structured(v) => f.debug_tuple("Structured").field(&v.client_type().name()).finish(),
            Self::Collection(v) => f.debug_tuple("Collection").field(v).finish(),
        }
    }
}

impl From<PrimitiveValue> for FieldValue<'_> {
    #[inline]
    fn from(value: PrimitiveValue) -> Self {
        Self::Primitive(value)
    }
}

impl<'a, T: Structured> From<&'a T> for FieldValue<'a> {
    #[inline]
    fn from(value: &'a T) -> Self {
        Self::Structured(value)
    }
}
