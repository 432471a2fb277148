//! Object graph to value-node conversion.
//!
//! [`GraphConverter`] walks a domain object through its [`ClientType`]
//! metadata and produces one [`PropertyNode`] per serialized property.
//! Nested complex values and collections are converted on an explicit
//! stack of frames, so the nesting depth is bounded by
//! [`SerializerSettings::max_depth`] and not by the native stack. Every
//! object on the current path is tracked, so a complex value that reaches
//! itself again fails with [`GraphError::CycleDetected`].

// -----------------------------------------------------------------------------
// Modules

mod guard;

use alloc::string::{String, ToString};
use alloc::vec::{self, Vec};
use core::mem;
use core::slice;

use log::trace;
use odc_edm::{PrimitiveKind, TypeRegistry};

use crate::error::GraphError;
use crate::model::{ClientProperty, ClientType, EntityDescriptor, FieldValue, PropertyFlags, Structured};
use crate::node::{CollectionNode, ComplexNode, ItemKind, PropertyNode, ValueNode};
use crate::settings::SerializerSettings;

use guard::{CycleGuard, Visit};

// -----------------------------------------------------------------------------
// GraphConverter

/// Converts domain objects into value-node trees.
///
/// The converter holds no per-call state, so one instance may serve many
/// entries. It only reads the objects it is given.
///
/// # Examples
///
/// ```
/// use odc_edm::{Native, PrimitiveValue, TypeRegistry};
/// use odc_serializer::GraphConverter;
/// use odc_serializer::model::{ClientProperty, ClientType, FieldValue, Structured};
/// use odc_serializer::node::ValueNode;
///
/// struct Product {
///     ty: ClientType,
///     name: String,
/// }
///
/// impl Structured for Product {
///     fn client_type(&self) -> &ClientType {
///         &self.ty
///     }
///     fn field(&self, name: &str) -> Option<FieldValue<'_>> {
///         match name {
///             "Name" => Some(PrimitiveValue::from(self.name.as_str()).into()),
///             _ => None,
///         }
///     }
/// }
///
/// let product = Product {
///     ty: ClientType::new("NS.Product")
///         .with_property(ClientProperty::primitive("Name", String::native_type())),
///     name: "Chai".into(),
/// };
///
/// let registry = TypeRegistry::new();
/// let nodes = GraphConverter::new(&registry).convert_all(&product).unwrap();
///
/// assert_eq!(nodes[0].name, "Name");
/// assert_eq!(nodes[0].value, ValueNode::primitive("Chai"));
/// ```
#[derive(Debug, Clone, Copy)]
pub struct GraphConverter<'r> {
    registry: &'r TypeRegistry,
    settings: SerializerSettings,
}

impl<'r> GraphConverter<'r> {
    #[inline]
    pub fn new(registry: &'r TypeRegistry) -> Self {
        Self::with_settings(registry, SerializerSettings::new())
    }

    #[inline]
    pub fn with_settings(registry: &'r TypeRegistry, settings: SerializerSettings) -> Self {
        Self { registry, settings }
    }

    #[inline]
    pub fn registry(&self) -> &'r TypeRegistry {
        self.registry
    }

    #[inline]
    pub fn settings(&self) -> &SerializerSettings {
        &self.settings
    }

    fn walk(&self) -> Walk<'_, 'r> {
        Walk {
            converter: self,
            guard: CycleGuard::default(),
        }
    }

    /// Converts the given properties of `object`, in the given order.
    ///
    /// Navigation properties are skipped; they are written as links.
    pub fn convert_entry(
        &self,
        object: &dyn Structured,
        properties: &[&ClientProperty],
    ) -> Result<Vec<PropertyNode>, GraphError> {
        let walk = self.walk();
        let Some(_visit) = walk.guard.enter(object) else {
            return Err(GraphError::CycleDetected {
                name: object.client_type().name().to_string(),
            });
        };

        let mut nodes = Vec::with_capacity(properties.len());
        for &property in properties.iter().filter(|p| !p.is_entity()) {
            let value = field(object, property)?;
            nodes.push(PropertyNode::new(property.name(), walk.value(property, value, 0)?));
        }
        Ok(nodes)
    }

    /// Converts every declared value property of `object`.
    pub fn convert_all(&self, object: &dyn Structured) -> Result<Vec<PropertyNode>, GraphError> {
        let properties: Vec<&ClientProperty> = object.client_type().properties().iter().collect();
        self.convert_entry(object, &properties)
    }

    /// Converts the properties a tracked entity should send.
    ///
    /// See [`EntityDescriptor::properties_to_serialize`].
    pub fn convert_entity(&self, descriptor: &EntityDescriptor<'_>) -> Result<Vec<PropertyNode>, GraphError> {
        let properties = descriptor.properties_to_serialize(&self.settings);
        self.convert_entry(descriptor.entity, &properties)
    }

    /// Converts a standalone value declared by `property`.
    ///
    /// Used for operation parameters, which have no owning object.
    pub fn convert_value(&self, property: &ClientProperty, value: FieldValue<'_>) -> Result<ValueNode, GraphError> {
        self.walk().value(property, value, 0)
    }
}

fn field<'a>(object: &'a dyn Structured, property: &ClientProperty) -> Result<FieldValue<'a>, GraphError> {
    object
        .field(property.name())
        .ok_or_else(|| GraphError::UnknownProperty {
            type_name: object.client_type().name().to_string(),
            name: property.name().to_string(),
        })
}

// -----------------------------------------------------------------------------
// Frames

/// A complex value or collection whose children are still being converted.
enum Frame<'a, 'g> {
    Complex {
        object: &'a dyn Structured,
        properties: slice::Iter<'a, ClientProperty>,
        /// Name of the property whose value is converted next.
        current: &'a str,
        nodes: Vec<PropertyNode>,
        depth: usize,
        _visit: Visit<'g>,
    },
    Collection {
        property: &'a ClientProperty,
        items: vec::IntoIter<FieldValue<'a>>,
        item_kind: ItemKind,
        item_type_name: String,
        nodes: Vec<ValueNode>,
        depth: usize,
    },
}

enum Child<'a> {
    Property(&'a ClientProperty, FieldValue<'a>),
    Item(&'a ClientProperty, ItemKind, FieldValue<'a>),
}

/// Outcome of converting one value.
enum Step<'a, 'g> {
    Leaf(ValueNode),
    Enter(Frame<'a, 'g>),
}

impl<'a> Frame<'a, '_> {
    fn depth(&self) -> usize {
        match self {
            Self::Complex { depth, .. } | Self::Collection { depth, .. } => *depth,
        }
    }

    fn next_child(&mut self) -> Result<Option<Child<'a>>, GraphError> {
        match self {
            Self::Complex {
                object,
                properties,
                current,
                ..
            } => {
                let Some(property) = properties.find(|p| !p.is_entity()) else {
                    return Ok(None);
                };
                *current = property.name();
                let value = field(*object, property)?;
                Ok(Some(Child::Property(property, value)))
            }
            Self::Collection {
                property,
                items,
                item_kind,
                ..
            } => Ok(items.next().map(|item| Child::Item(*property, *item_kind, item))),
        }
    }

    fn accept(&mut self, node: ValueNode) {
        match self {
            Self::Complex { current, nodes, .. } => nodes.push(PropertyNode::new(*current, node)),
            Self::Collection { nodes, .. } => nodes.push(node),
        }
    }

    fn finish(self) -> ValueNode {
        match self {
            Self::Complex { object, nodes, .. } => ValueNode::Complex(ComplexNode {
                type_name: object.client_type().name().to_string(),
                properties: nodes,
            }),
            Self::Collection {
                item_kind,
                item_type_name,
                nodes,
                ..
            } => ValueNode::Collection(CollectionNode {
                item_type_name,
                item_kind,
                items: nodes,
            }),
        }
    }
}

// -----------------------------------------------------------------------------
// Walk

/// Per-call state.
struct Walk<'c, 'r> {
    converter: &'c GraphConverter<'r>,
    guard: CycleGuard,
}

impl Walk<'_, '_> {
    /// Converts one value, descending into nested values through a stack of
    /// open frames.
    fn value<'a>(&self, property: &'a ClientProperty, value: FieldValue<'a>, depth: usize) -> Result<ValueNode, GraphError> {
        let mut frame = match self.step(property, value, depth)? {
            Step::Leaf(node) => return Ok(node),
            Step::Enter(frame) => frame,
        };
        let mut parents = Vec::new();

        loop {
            let step = match frame.next_child()? {
                Some(Child::Property(property, value)) => self.step(property, value, frame.depth())?,
                Some(Child::Item(property, kind, item)) => self.item(property, kind, item, frame.depth())?,
                None => {
                    let node = frame.finish();
                    match parents.pop() {
                        Some(parent) => frame = parent,
                        None => return Ok(node),
                    }
                    frame.accept(node);
                    continue;
                }
            };
            match step {
                Step::Leaf(node) => frame.accept(node),
                Step::Enter(child) => parents.push(mem::replace(&mut frame, child)),
            }
        }
    }

    fn step<'a>(
        &self,
        property: &'a ClientProperty,
        value: FieldValue<'a>,
        depth: usize,
    ) -> Result<Step<'a, '_>, GraphError> {
        if let FieldValue::Null = value {
            if property.is_collection() || !property.is_nullable() {
                return Err(GraphError::NullNotSupported {
                    name: property.name().into(),
                });
            }
            return Ok(Step::Leaf(ValueNode::Null));
        }

        if property.is_collection() {
            return self.collection(property, value, depth).map(Step::Enter);
        }

        let flags = property.flags();
        if flags.contains(PropertyFlags::ENUM) {
            self.enumeration(property, value).map(Step::Leaf)
        } else if flags.contains(PropertyFlags::COMPLEX) {
            self.complex(property, value, depth).map(Step::Enter)
        } else {
            self.primitive(property, value).map(Step::Leaf)
        }
    }

    fn item<'a>(
        &self,
        property: &'a ClientProperty,
        kind: ItemKind,
        item: FieldValue<'a>,
        depth: usize,
    ) -> Result<Step<'a, '_>, GraphError> {
        let name = property.name();
        match (item, kind) {
            (FieldValue::Null, ItemKind::Complex) => Ok(Step::Leaf(ValueNode::Null)),
            (FieldValue::Null, _) => Err(GraphError::NullCollectionItem { name: name.into() }),
            (FieldValue::Collection(_), _) => Err(GraphError::KindMismatch {
                name: name.into(),
                expected: kind.describe(),
            }),
            (item, ItemKind::Primitive) => self.primitive(property, item).map(Step::Leaf),
            (item, ItemKind::Enum) => self.enumeration(property, item).map(Step::Leaf),
            (item, ItemKind::Complex) => self.complex(property, item, depth).map(Step::Enter),
        }
    }

    fn primitive(&self, property: &ClientProperty, value: FieldValue<'_>) -> Result<ValueNode, GraphError> {
        let name = property.name();
        let FieldValue::Primitive(value) = value else {
            return Err(GraphError::KindMismatch {
                name: name.into(),
                expected: "primitive",
            });
        };
        let Some(declared) = property.native() else {
            return Err(GraphError::KindMismatch {
                name: name.into(),
                expected: "primitive",
            });
        };

        let desc = self
            .converter
            .registry
            .resolve_or_err(declared)
            .map_err(|e| GraphError::from_resolution(name, e))?;

        let kind = value.kind();
        if !desc.kind().accepts(kind) {
            return Err(GraphError::KindMismatch {
                name: name.into(),
                expected: desc.edm_name(),
            });
        }

        let type_name = if !declared.unwrap_optional().is_sealed() || kind != desc.kind() {
            Some(protocol_name(name, kind)?)
        } else {
            None
        };
        Ok(ValueNode::Primitive { value, type_name })
    }

    fn enumeration(&self, property: &ClientProperty, value: FieldValue<'_>) -> Result<ValueNode, GraphError> {
        let name = property.name();
        let (Some(enum_type), FieldValue::Enum(raw)) = (property.enum_type(), value) else {
            return Err(GraphError::KindMismatch {
                name: name.into(),
                expected: "enum",
            });
        };
        Ok(ValueNode::Enum {
            value: enum_type.format_value(raw),
            type_name: enum_type.name().to_string(),
        })
    }

    fn complex<'a>(
        &self,
        property: &'a ClientProperty,
        value: FieldValue<'a>,
        depth: usize,
    ) -> Result<Frame<'a, '_>, GraphError> {
        let name = property.name();
        let FieldValue::Structured(object) = value else {
            return Err(GraphError::KindMismatch {
                name: name.into(),
                expected: "complex",
            });
        };

        let depth = depth + 1;
        if depth > self.converter.settings.max_depth {
            return Err(GraphError::TooDeep {
                name: name.into(),
                depth,
            });
        }

        let Some(visit) = self.guard.enter(object) else {
            return Err(GraphError::CycleDetected { name: name.into() });
        };

        let ty: &ClientType = object.client_type();
        trace!("converting `{name}` as `{}` at depth {depth}", ty.name());
        Ok(Frame::Complex {
            object,
            properties: ty.properties().iter(),
            current: "",
            nodes: Vec::with_capacity(ty.properties().len()),
            depth,
            _visit: visit,
        })
    }

    fn collection<'a>(
        &self,
        property: &'a ClientProperty,
        value: FieldValue<'a>,
        depth: usize,
    ) -> Result<Frame<'a, '_>, GraphError> {
        let FieldValue::Collection(items) = value else {
            return Err(GraphError::KindMismatch {
                name: property.name().into(),
                expected: "collection",
            });
        };

        let (item_kind, item_type_name) = self.item_type(property)?;
        Ok(Frame::Collection {
            property,
            nodes: Vec::with_capacity(items.len()),
            items: items.into_iter(),
            item_kind,
            item_type_name,
            depth,
        })
    }

    fn item_type(&self, property: &ClientProperty) -> Result<(ItemKind, String), GraphError> {
        let name = property.name();
        let flags = property.flags();

        if flags.contains(PropertyFlags::ENUM) {
            if let Some(enum_type) = property.enum_type() {
                return Ok((ItemKind::Enum, enum_type.name().to_string()));
            }
        } else if flags.contains(PropertyFlags::COMPLEX) {
            if let Some(type_name) = property.structural_name() {
                return Ok((ItemKind::Complex, type_name.to_string()));
            }
        } else if let Some(native) = property.native() {
            let desc = self
                .converter
                .registry
                .resolve_or_err(native)
                .map_err(|e| GraphError::from_resolution(name, e))?;
            let edm = desc
                .protocol_type_name()
                .map_err(|e| GraphError::from_resolution(name, e))?;
            return Ok((ItemKind::Primitive, edm.to_string()));
        }

        Err(GraphError::KindMismatch {
            name: name.into(),
            expected: "collection",
        })
    }
}

/// The protocol name written as a type annotation for a value of `kind`.
fn protocol_name(name: &str, kind: PrimitiveKind) -> Result<&'static str, GraphError> {
    if kind.is_unmapped() {
        return Err(GraphError::UnsupportedReverseMapping {
            name: name.into(),
            edm: kind.edm_name(),
        });
    }
    Ok(kind.edm_name())
}

impl ItemKind {
    fn describe(self) -> &'static str {
        match self {
            Self::Primitive => "primitive",
            Self::Enum => "enum",
            Self::Complex => "complex",
        }
    }
}

// -----------------------------------------------------------------------------
// Tests
