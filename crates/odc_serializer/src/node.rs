use alloc::string::String;
use alloc::vec::Vec;

use odc_edm::PrimitiveValue;

// -----------------------------------------------------------------------------
// ValueNode

/// The wire-value tree of one property, produced by the graph converter.
#[derive(Debug, Clone, PartialEq)]
pub enum ValueNode {
    Null,
    Primitive {
        value: PrimitiveValue,
        /// Set when the value's type must be stated explicitly.
        type_name: Option<&'static str>,
    },
    Enum {
        /// Member name(s), e.g. `Red` or `Read,Write`.
        value: String,
        type_name: String,
    },
    Complex(ComplexNode),
    Collection(CollectionNode),
}

impl ValueNode {
    /// A primitive node without type annotation.
    #[inline]
    pub fn primitive(value: impl Into<PrimitiveValue>) -> Self {
        Self::Primitive {
            value: value.into(),
            type_name: None,
        }
    }
}

/// A complex value: a structural type name and its properties in order.
#[derive(Debug, Clone, PartialEq)]
pub struct ComplexNode {
    pub type_name: String,
    pub properties: Vec<PropertyNode>,
}

/// What a collection holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ItemKind {
    Primitive,
    Enum,
    Complex,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CollectionNode {
    pub item_type_name: String,
    pub item_kind: ItemKind,
    pub items: Vec<ValueNode>,
}

/// A named property value.
#[derive(Debug, Clone, PartialEq)]
pub struct PropertyNode {
    pub name: String,
    pub value: ValueNode,
}

impl PropertyNode {
    #[inline]
    pub fn new(name: impl Into<String>, value: ValueNode) -> Self {
        Self {
            name: name.into(),
            value,
        }
    }
}
