use alloc::string::{String, ToString};
use alloc::vec::Vec;
use core::fmt::Display;
use core::ptr;

use log::{debug, trace};
use odc_edm::TypeRegistry;
use odc_utils::hash::HashMap;

use crate::error::{GraphError, ProtocolUsageError, SerializeError};
use crate::graph::GraphConverter;
use crate::model::{EntityDescriptor, EntityState, LinkDescriptor, OperationParameter, Structured};
use crate::node::{CollectionNode, ComplexNode, ItemKind, PropertyNode, ValueNode};
use crate::settings::SerializerSettings;
use crate::uri::UriLiteral;
use crate::writer::{
    EntryArgs, EntryState, LinkGroupArgs, NestedLink, NestedLinkArgs, ODataWriter, ParameterWriter, Resource, WritingHooks,
};

#[inline]
fn sink<E: Display>(error: E) -> SerializeError {
    SerializeError::Writer(error.to_string())
}

// -----------------------------------------------------------------------------
// Serializer

/// Drives an [`ODataWriter`] through the events of entries, links and
/// operation parameters.
///
/// Every call converts its whole input before the first event is emitted,
/// so a graph failure never leaves a half-written entry behind.
pub struct Serializer<'r, W, H = ()> {
    converter: GraphConverter<'r>,
    writer: W,
    hooks: H,
}

impl<'r, W: ODataWriter> Serializer<'r, W, ()> {
    /// Creates a serializer without hooks.
    #[inline]
    pub fn new(registry: &'r TypeRegistry, writer: W) -> Self {
        Self {
            converter: GraphConverter::new(registry),
            writer,
            hooks: (),
        }
    }
}

impl<'r, W: ODataWriter, H: WritingHooks> Serializer<'r, W, H> {
    /// Replaces the hooks.
    pub fn with_hooks<H2: WritingHooks>(self, hooks: H2) -> Serializer<'r, W, H2> {
        Serializer {
            converter: self.converter,
            writer: self.writer,
            hooks,
        }
    }

    pub fn with_settings(mut self, settings: SerializerSettings) -> Self {
        self.converter = GraphConverter::with_settings(self.converter.registry(), settings);
        self
    }

    #[inline]
    pub fn converter(&self) -> &GraphConverter<'r> {
        &self.converter
    }

    #[inline]
    pub fn writer(&self) -> &W {
        &self.writer
    }

    #[inline]
    pub fn hooks(&self) -> &H {
        &self.hooks
    }

    #[inline]
    pub fn into_writer(self) -> W {
        self.writer
    }

    /// Writes one entry with its value properties and, for an added entity,
    /// its links.
    ///
    /// Links are grouped by navigation property in first-seen order; each
    /// group becomes one nested link holding one entity reference per link.
    /// Links whose source is not `entity` are ignored.
    ///
    /// # Errors
    ///
    /// Graph failures and links without a target identity are reported
    /// before anything is written. Writer failures surface as
    /// [`SerializeError::Writer`].
    pub fn write_entry(
        &mut self,
        entity: &EntityDescriptor<'_>,
        links: &[LinkDescriptor<'_>],
    ) -> Result<(), SerializeError> {
        let properties = self.converter.convert_entity(entity)?;
        let groups = if entity.state == EntityState::Added {
            group_links(entity.entity, links)?
        } else {
            if !links.is_empty() {
                debug!("links of a {:?} entity are not written inline", entity.state);
            }
            Vec::new()
        };

        let mut entry = EntryWriter::new(&mut self.writer, &mut self.hooks, entity);
        entry.start()?;
        for property in properties {
            entry.write_property(property)?;
        }
        for group in &groups {
            entry.write_links(group.name, group.is_collection, &group.links)?;
        }
        entry.end()
    }

    /// Starts a stepwise entry write.
    #[inline]
    pub fn entry<'e>(&'e mut self, entity: &'e EntityDescriptor<'e>) -> EntryWriter<'e, W, H> {
        EntryWriter::new(&mut self.writer, &mut self.hooks, entity)
    }

    /// Writes the body of a single link binding: one entity reference.
    pub fn write_entity_reference_link(&mut self, link: &LinkDescriptor<'_>) -> Result<(), SerializeError> {
        let url = target_url(link)?;
        trace!("entity reference `{url}` for `{}`", link.source_property);
        self.writer.write_entity_reference_link(url).map_err(sink)
    }

    /// Writes operation parameters as a request body.
    ///
    /// # Errors
    ///
    /// [`ProtocolUsageError::InvalidParameterType`] for entity-typed
    /// parameters; the parameter writer is not touched then.
    pub fn write_body_operation_parameters<P: ParameterWriter + ?Sized>(
        &self,
        writer: &mut P,
        parameters: &[OperationParameter<'_>],
    ) -> Result<(), SerializeError> {
        let nodes = self.convert_parameters(parameters)?;

        writer.start_parameters().map_err(sink)?;
        for node in &nodes {
            let name = node.name.as_str();
            match &node.value {
                ValueNode::Complex(complex) => {
                    let inner = writer.write_resource(name).map_err(sink)?;
                    emit(inner, Pending::Resource(complex))?;
                }
                ValueNode::Collection(collection) if collection.item_kind == ItemKind::Complex => {
                    let inner = writer.write_resource_set(name).map_err(sink)?;
                    emit(inner, Pending::ResourceSet(collection))?;
                }
                value => writer.write_value(name, value).map_err(sink)?,
            }
        }
        writer.end_parameters().map_err(sink)
    }

    /// Formats operation parameters as the parenthesized argument list of
    /// a function call in a URI, e.g. `(a=1,b=%27x%27)`.
    pub fn write_uri_operation_parameters(
        &self,
        parameters: &[OperationParameter<'_>],
    ) -> Result<String, SerializeError> {
        let nodes = self.convert_parameters(parameters)?;
        let uri = UriLiteral {
            registry: self.converter.registry(),
            settings: self.converter.settings(),
        };

        let mut out = String::from("(");
        for (i, node) in nodes.iter().enumerate() {
            if i > 0 {
                out.push(',');
            }
            out.push_str(&node.name);
            out.push('=');
            out.push_str(&uri.escaped(&node.name, &node.value)?);
        }
        out.push(')');
        Ok(out)
    }

    fn convert_parameters(&self, parameters: &[OperationParameter<'_>]) -> Result<Vec<PropertyNode>, SerializeError> {
        parameters
            .iter()
            .map(|parameter| -> Result<PropertyNode, SerializeError> {
                let name = parameter.name();
                if parameter.property.is_entity() {
                    return Err(ProtocolUsageError::InvalidParameterType {
                        parameter: name.into(),
                        kind: "entity",
                    }
                    .into());
                }
                let value = self.converter.convert_value(&parameter.property, parameter.value.clone())?;
                if let ValueNode::Primitive { value: v, .. } = &value
                    && v.kind().is_unmapped()
                {
                    return Err(GraphError::UnsupportedReverseMapping {
                        name: name.into(),
                        edm: v.kind().edm_name(),
                    }
                    .into());
                }
                Ok(PropertyNode::new(name, value))
            })
            .collect()
    }
}

// -----------------------------------------------------------------------------
// Link grouping

struct LinkGroup<'l> {
    name: &'l str,
    is_collection: bool,
    links: Vec<&'l LinkDescriptor<'l>>,
}

fn group_links<'l>(
    source: &dyn Structured,
    links: &'l [LinkDescriptor<'l>],
) -> Result<Vec<LinkGroup<'l>>, SerializeError> {
    let ty = source.client_type();
    let mut index: HashMap<&str, usize> = HashMap::default();
    let mut groups: Vec<LinkGroup<'l>> = Vec::new();

    for link in links {
        if !ptr::addr_eq(ptr::from_ref(link.source), ptr::from_ref(source)) {
            debug!("skipping link `{}` of another source", link.source_property);
            continue;
        }
        target_url(link)?;

        let name = link.source_property.as_str();
        if let Some(&i) = index.get(name) {
            groups[i].links.push(link);
            continue;
        }
        let Some(property) = ty.property(name) else {
            return Err(GraphError::UnknownProperty {
                type_name: ty.name().to_string(),
                name: name.to_string(),
            }
            .into());
        };
        index.insert(name, groups.len());
        groups.push(LinkGroup {
            name,
            is_collection: property.is_collection(),
            links: Vec::from([link]),
        });
    }
    Ok(groups)
}

fn target_url<'l>(link: &'l LinkDescriptor<'_>) -> Result<&'l str, ProtocolUsageError> {
    link.target_identity
        .as_deref()
        .ok_or_else(|| ProtocolUsageError::MissingIdentity {
            name: link.source_property.clone(),
        })
}

// -----------------------------------------------------------------------------
// Nested resources

/// Structural events still owed to the writer for a node tree.
enum Pending<'n> {
    Property(&'n PropertyNode),
    Resource(&'n ComplexNode),
    ResourceSet(&'n CollectionNode),
    NullResource,
    EndResource,
    EndResourceSet,
    EndNestedLink,
}

/// Emits the events of `first`, expanding complex values into nested
/// resources. Nesting is tracked on a heap stack, one entry per open event.
fn emit<W: ODataWriter + ?Sized>(writer: &mut W, first: Pending<'_>) -> Result<(), SerializeError> {
    let mut pending = Vec::from([first]);
    while let Some(next) = pending.pop() {
        match next {
            Pending::Property(property) => {
                let name = property.name.as_str();
                match &property.value {
                    ValueNode::Complex(complex) => {
                        writer
                            .start_nested_link(&NestedLink {
                                name,
                                is_collection: false,
                            })
                            .map_err(sink)?;
                        pending.extend([Pending::EndNestedLink, Pending::Resource(complex)]);
                    }
                    ValueNode::Collection(collection) if collection.item_kind == ItemKind::Complex => {
                        writer
                            .start_nested_link(&NestedLink {
                                name,
                                is_collection: true,
                            })
                            .map_err(sink)?;
                        pending.extend([Pending::EndNestedLink, Pending::ResourceSet(collection)]);
                    }
                    value => writer.write_property(name, value).map_err(sink)?,
                }
            }
            Pending::Resource(complex) => {
                trace!("resource `{}`", complex.type_name);
                writer
                    .start_resource(Some(&Resource::new(&complex.type_name)))
                    .map_err(sink)?;
                pending.push(Pending::EndResource);
                pending.extend(complex.properties.iter().rev().map(Pending::Property));
            }
            Pending::ResourceSet(collection) => {
                writer
                    .start_resource_set(&collection.item_type_name)
                    .map_err(sink)?;
                pending.push(Pending::EndResourceSet);
                pending.extend(collection.items.iter().rev().map(|item| match item {
                    ValueNode::Complex(complex) => Pending::Resource(complex),
                    _ => Pending::NullResource,
                }));
            }
            Pending::NullResource => {
                writer.start_resource(None).map_err(sink)?;
                writer.end_resource().map_err(sink)?;
            }
            Pending::EndResource => writer.end_resource().map_err(sink)?,
            Pending::EndResourceSet => writer.end_resource_set().map_err(sink)?,
            Pending::EndNestedLink => writer.end_nested_link().map_err(sink)?,
        }
    }
    Ok(())
}

// -----------------------------------------------------------------------------
// EntryWriter

/// A single entry write, checked against [`EntryState`].
///
/// Events must come in the order `start`, properties, link groups, `end`.
/// Anything after `end` fails with [`ProtocolUsageError::EntryClosed`].
pub struct EntryWriter<'a, W: ?Sized, H: ?Sized> {
    writer: &'a mut W,
    hooks: &'a mut H,
    entity: &'a dyn Structured,
    resource: Resource<'a>,
    written: Vec<PropertyNode>,
    state: EntryState,
}

impl<'a, W: ODataWriter + ?Sized, H: WritingHooks + ?Sized> EntryWriter<'a, W, H> {
    pub fn new(writer: &'a mut W, hooks: &'a mut H, entity: &'a EntityDescriptor<'_>) -> Self {
        let resource = Resource {
            type_name: entity.entity.client_type().name(),
            id: entity.identity.as_deref(),
            edit_link: entity.edit_link.as_deref(),
        };
        Self {
            writer,
            hooks,
            entity: entity.entity,
            resource,
            written: Vec::new(),
            state: EntryState::NotStarted,
        }
    }

    #[inline]
    pub fn state(&self) -> EntryState {
        self.state
    }

    fn check(&self, event: &'static str, next: Option<EntryState>) -> Result<EntryState, ProtocolUsageError> {
        match (self.state, next) {
            (_, Some(next)) => Ok(next),
            (EntryState::EntryClosed, None) => Err(ProtocolUsageError::EntryClosed),
            (state, None) => Err(ProtocolUsageError::UnexpectedEvent { state, event }),
        }
    }

    /// Opens the entry. Runs [`WritingHooks::on_entry_starting`] first.
    pub fn start(&mut self) -> Result<(), SerializeError> {
        let next = (self.state == EntryState::NotStarted).then_some(EntryState::EntryOpen);
        let next = self.check("start the entry", next)?;

        trace!("start entry `{}`", self.resource.type_name);
        let args = EntryArgs {
            resource: &self.resource,
            entity: self.entity,
            properties: &self.written,
        };
        self.hooks.on_entry_starting(&args);
        self.writer.start_resource(Some(&self.resource)).map_err(sink)?;
        self.state = next;
        Ok(())
    }

    /// Writes one value property.
    pub fn write_property(&mut self, property: PropertyNode) -> Result<(), SerializeError> {
        let next = self.check("write a property", self.state.on_property())?;

        trace!("property `{}`", property.name);
        emit(&mut *self.writer, Pending::Property(&property))?;
        self.written.push(property);
        self.state = next;
        Ok(())
    }

    /// Writes one nested link holding a reference to every link's target.
    pub fn write_links(
        &mut self,
        name: &str,
        is_collection: bool,
        links: &[&LinkDescriptor<'_>],
    ) -> Result<(), SerializeError> {
        let next = self.check("write a nested link", self.state.on_nested_link())?;
        for link in links {
            target_url(link)?;
        }

        trace!("nested link `{name}` with {} reference(s)", links.len());
        let nested = NestedLink { name, is_collection };
        let group = LinkGroupArgs {
            link: &nested,
            source: self.entity,
            len: links.len(),
        };
        self.hooks.on_link_group_starting(&group);
        self.writer.start_nested_link(&nested).map_err(sink)?;
        for link in links {
            let args = NestedLinkArgs {
                link: &nested,
                source: link.source,
                target: link.target,
                target_url: target_url(link)?,
            };
            self.hooks.on_nested_link_starting(&args);
            self.writer.write_entity_reference_link(args.target_url).map_err(sink)?;
            self.hooks.on_nested_link_ending(&args);
        }
        self.writer.end_nested_link().map_err(sink)?;
        self.hooks.on_link_group_ending(&group);
        self.state = next;
        Ok(())
    }

    /// Closes the entry. Runs [`WritingHooks::on_entry_ending`] last.
    pub fn end(&mut self) -> Result<(), SerializeError> {
        let next = self.state.is_open().then_some(EntryState::EntryClosed);
        let next = self.check("end the entry", next)?;

        trace!("end entry `{}`", self.resource.type_name);
        self.writer.end_resource().map_err(sink)?;
        self.state = next;
        let args = EntryArgs {
            resource: &self.resource,
            entity: self.entity,
            properties: &self.written,
        };
        self.hooks.on_entry_ending(&args);
        Ok(())
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use alloc::rc::Rc;
    use alloc::string::String;
    use alloc::vec::Vec;

    use odc_edm::{Native, PrimitiveValue, TypeRegistry};

    use super::Serializer;
    use crate::error::{GraphError, ProtocolUsageError, SerializeError};
    use crate::model::{ClientProperty, EntityDescriptor, EntityState, FieldValue, LinkDescriptor, OperationParameter};
    use crate::node::{PropertyNode, ValueNode};
    use crate::testing::{self, Record, Slot};
    use crate::writer::recording::{Event, Log, RecordingHooks, RecordingParameterWriter, RecordingWriter};
    use crate::writer::EntryState;

    fn link<'a>(source: &'a Record, name: &str, target: &'a Record, id: &str) -> LinkDescriptor<'a> {
        LinkDescriptor::new(source, name, target, Some(id.into()))
    }

    fn events(log: &Log) -> Vec<Event> {
        log.borrow().clone()
    }

    #[test]
    fn added_entry_with_grouped_links() {
        let registry = TypeRegistry::new();
        let log = Log::default();
        let customer = testing::customer(1);
        let (o1, o2, friend) = (testing::order(10), testing::order(11), testing::customer(2));

        let entity = EntityDescriptor::new(EntityState::Added, &*customer);
        let links = [
            link(&customer, "Orders", &o1, "Orders(10)"),
            link(&customer, "BestFriend", &friend, "Customers(2)"),
            link(&customer, "Orders", &o2, "Orders(11)"),
        ];

        let mut serializer = Serializer::new(&registry, RecordingWriter::new(&log));
        serializer.write_entry(&entity, &links).unwrap();

        let events = events(&log);
        assert_eq!(events[0], Event::StartResource(Some("NS.Customer".into())));
        assert_eq!(events[1], Event::Property("Id".into(), ValueNode::primitive(1)));

        let address = events
            .iter()
            .position(|e| *e == Event::StartNestedLink("Address".into(), false))
            .unwrap();
        assert_eq!(events[address + 1], Event::StartResource(Some("NS.Address".into())));
        assert_eq!(events[address + 4], Event::EndResource);
        assert_eq!(events[address + 5], Event::EndNestedLink);

        let orders = events
            .iter()
            .position(|e| *e == Event::StartNestedLink("Orders".into(), true))
            .unwrap();
        assert_eq!(
            events[orders..],
            [
                Event::StartNestedLink("Orders".into(), true),
                Event::ReferenceLink("Orders(10)".into()),
                Event::ReferenceLink("Orders(11)".into()),
                Event::EndNestedLink,
                Event::StartNestedLink("BestFriend".into(), false),
                Event::ReferenceLink("Customers(2)".into()),
                Event::EndNestedLink,
                Event::EndResource,
            ]
        );
    }

    #[test]
    fn hooks_wrap_entries_and_links() {
        let registry = TypeRegistry::new();
        let log = Log::default();
        let customer = testing::customer(1);
        let order = testing::order(10);
        let entity = EntityDescriptor::new(EntityState::Added, &*customer).with_set_properties(["Id"]);
        let links = [link(&customer, "Orders", &order, "Orders(10)")];

        let hooks = RecordingHooks { log: log.clone() };
        let mut serializer = Serializer::new(&registry, RecordingWriter::new(&log)).with_hooks(hooks);
        serializer.write_entry(&entity, &links).unwrap();

        let events = events(&log);
        let hooks: Vec<&Event> = events
            .iter()
            .filter(|e| matches!(e, Event::Hook(..) | Event::ReferenceLink(_)))
            .collect();
        assert_eq!(
            hooks,
            [
                &Event::Hook("entry_starting", "NS.Customer".into()),
                &Event::Hook("group_starting", "Orders".into()),
                &Event::Hook("link_starting", "Orders(10)".into()),
                &Event::ReferenceLink("Orders(10)".into()),
                &Event::Hook("link_ending", "Orders(10)".into()),
                &Event::Hook("group_ending", "Orders".into()),
                &Event::Hook("entry_ending", "NS.Customer".into()),
            ]
        );
        assert_eq!(events[0], Event::Hook("entry_starting", "NS.Customer".into()));
        assert_eq!(events.last(), Some(&Event::Hook("entry_ending", "NS.Customer".into())));
    }

    #[test]
    fn modified_entry_skips_links() {
        let registry = TypeRegistry::new();
        let log = Log::default();
        let customer = testing::customer(1);
        let order = testing::order(10);
        let entity = EntityDescriptor::new(EntityState::Modified, &*customer).with_set_properties(["Name"]);
        let links = [link(&customer, "Orders", &order, "Orders(10)")];

        let mut serializer = Serializer::new(&registry, RecordingWriter::new(&log));
        serializer.write_entry(&entity, &links).unwrap();

        assert_eq!(
            events(&log),
            [
                Event::StartResource(Some("NS.Customer".into())),
                Event::Property("Name".into(), ValueNode::primitive("Alice")),
                Event::EndResource,
            ]
        );
    }

    #[test]
    fn failures_leave_no_partial_output() {
        let registry = TypeRegistry::new();
        let log = Log::default();
        let broken = Rc::new(Record::new(testing::order_type()).with("Id", Slot::Null));
        let entity = EntityDescriptor::new(EntityState::Added, &*broken);

        let mut serializer = Serializer::new(&registry, RecordingWriter::new(&log));
        assert_eq!(
            serializer.write_entry(&entity, &[]),
            Err(SerializeError::Graph(GraphError::NullNotSupported { name: "Id".into() }))
        );
        assert!(events(&log).is_empty());

        let customer = testing::customer(1);
        let order = testing::order(10);
        let entity = EntityDescriptor::new(EntityState::Added, &*customer);
        let links = [LinkDescriptor::new(&*customer, "Orders", &*order, None)];
        assert_eq!(
            serializer.write_entry(&entity, &links),
            Err(SerializeError::Protocol(ProtocolUsageError::MissingIdentity { name: "Orders".into() }))
        );
        assert!(events(&log).is_empty());
    }

    #[test]
    fn writer_failures_are_reported() {
        let registry = TypeRegistry::new();
        let log = Log::default();
        let order = testing::order(10);
        let entity = EntityDescriptor::new(EntityState::Added, &*order);

        let mut writer = RecordingWriter::new(&log);
        writer.fail_on = Some("end_resource");
        let mut serializer = Serializer::new(&registry, writer);

        assert_eq!(
            serializer.write_entry(&entity, &[]),
            Err(SerializeError::Writer("end_resource refused".into()))
        );
    }

    #[test]
    fn deep_entry_at_default_limit() {
        let registry = TypeRegistry::new();
        let log = Log::default();
        let mut serializer = Serializer::new(&registry, RecordingWriter::new(&log));
        let limit = serializer.converter().settings().max_depth;

        let (head, _) = testing::chain(limit + 1);
        let entity = EntityDescriptor::new(EntityState::Added, &*head);
        serializer.write_entry(&entity, &[]).unwrap();

        let events = events(&log);
        let opened = events.iter().filter(|e| matches!(e, Event::StartResource(_))).count();
        let closed = events.iter().filter(|e| **e == Event::EndResource).count();
        assert_eq!((opened, closed), (limit + 1, limit + 1));
        assert_eq!(events[events.len() - 2], Event::EndNestedLink);
        assert_eq!(events.last(), Some(&Event::EndResource));
    }

    #[test]
    fn entry_state_machine() {
        let registry = TypeRegistry::new();
        let log = Log::default();
        let order = testing::order(10);
        let other = testing::order(11);
        let entity = EntityDescriptor::new(EntityState::Added, &*order);
        let id = || PropertyNode::new("Id", ValueNode::primitive(10));

        let mut serializer = Serializer::new(&registry, RecordingWriter::new(&log));
        let mut entry = serializer.entry(&entity);
        assert_eq!(
            entry.write_property(id()),
            Err(SerializeError::Protocol(ProtocolUsageError::UnexpectedEvent {
                state: EntryState::NotStarted,
                event: "write a property",
            }))
        );

        entry.start().unwrap();
        assert_eq!(entry.state(), EntryState::EntryOpen);
        entry.write_property(id()).unwrap();
        assert_eq!(entry.state(), EntryState::PropertiesWritten);

        let links = LinkDescriptor::new(&*order, "Related", &*other, Some("Orders(11)".into()));
        entry.write_links("Related", false, &[&links]).unwrap();
        assert_eq!(entry.state(), EntryState::NestedLinksWritten);
        assert!(matches!(
            entry.write_property(id()),
            Err(SerializeError::Protocol(ProtocolUsageError::UnexpectedEvent {
                state: EntryState::NestedLinksWritten,
                ..
            }))
        ));

        entry.end().unwrap();
        assert_eq!(entry.state(), EntryState::EntryClosed);
        for result in [entry.write_property(id()), entry.end(), entry.start()] {
            assert_eq!(result, Err(SerializeError::Protocol(ProtocolUsageError::EntryClosed)));
        }
        assert_eq!(events(&log).last(), Some(&Event::EndResource));
    }

    #[test]
    fn reference_link_needs_identity() {
        let registry = TypeRegistry::new();
        let log = Log::default();
        let customer = testing::customer(1);
        let order = testing::order(10);
        let mut serializer = Serializer::new(&registry, RecordingWriter::new(&log));

        serializer
            .write_entity_reference_link(&link(&customer, "Orders", &order, "Orders(10)"))
            .unwrap();
        assert!(serializer
            .write_entity_reference_link(&LinkDescriptor::new(&*customer, "Orders", &*order, None))
            .is_err());
        assert_eq!(events(&log), [Event::ReferenceLink("Orders(10)".into())]);
    }

    #[test]
    fn uri_parameters() {
        let registry = TypeRegistry::new();
        let serializer = Serializer::new(&registry, RecordingWriter::default());

        let parameters = [
            OperationParameter::new(ClientProperty::primitive("a", i32::native_type()), PrimitiveValue::Int32(1)),
            OperationParameter::new(ClientProperty::primitive("b", String::native_type()), PrimitiveValue::from("x")),
        ];
        assert_eq!(serializer.write_uri_operation_parameters(&parameters).unwrap(), "(a=1,b=%27x%27)");

        let parameters = [
            OperationParameter::new(ClientProperty::enumeration("c", testing::color()), FieldValue::Enum(2)),
            OperationParameter::new(ClientProperty::primitive("d", String::native_type()), FieldValue::Null),
        ];
        assert_eq!(
            serializer.write_uri_operation_parameters(&parameters).unwrap(),
            "(c=NS.Color%27Green%27,d=null)"
        );
        assert_eq!(serializer.write_uri_operation_parameters(&[]).unwrap(), "()");
    }

    #[test]
    fn invalid_parameters() {
        let registry = TypeRegistry::new();
        let serializer = Serializer::new(&registry, RecordingWriter::default());
        let order = testing::order(10);

        let entity = [OperationParameter::new(
            ClientProperty::navigation("order", false),
            FieldValue::Structured(&*order),
        )];
        assert_eq!(
            serializer.write_uri_operation_parameters(&entity),
            Err(SerializeError::Protocol(ProtocolUsageError::InvalidParameterType {
                parameter: "order".into(),
                kind: "entity",
            }))
        );

        let unsigned = [OperationParameter::new(
            ClientProperty::primitive("n", u16::native_type()),
            PrimitiveValue::UInt16(1),
        )];
        assert_eq!(
            serializer.write_uri_operation_parameters(&unsigned),
            Err(SerializeError::Graph(GraphError::UnsupportedReverseMapping {
                name: "n".into(),
                edm: "Edm.UInt16",
            }))
        );

        let log = Log::default();
        let mut writer = RecordingParameterWriter::new(&log);
        assert!(serializer.write_body_operation_parameters(&mut writer, &entity).is_err());
        assert!(events(&log).is_empty());
    }

    #[test]
    fn body_parameters() {
        let registry = TypeRegistry::new();
        let serializer = Serializer::new(&registry, RecordingWriter::default());
        let home = testing::address("1 Main St", "Redmond");

        let parameters = [
            OperationParameter::new(ClientProperty::primitive("a", i32::native_type()), PrimitiveValue::Int32(1)),
            OperationParameter::new(ClientProperty::complex("home", "NS.Address"), FieldValue::Structured(&*home)),
            OperationParameter::new(
                ClientProperty::complex_collection("all", "NS.Address"),
                FieldValue::Collection(Vec::from([FieldValue::Structured(&*home), FieldValue::Null])),
            ),
        ];

        let log = Log::default();
        let mut writer = RecordingParameterWriter::new(&log);
        serializer.write_body_operation_parameters(&mut writer, &parameters).unwrap();

        assert_eq!(
            events(&log),
            [
                Event::StartParameters,
                Event::Value("a".into(), ValueNode::primitive(1)),
                Event::Parameter("home".into()),
                Event::StartResource(Some("NS.Address".into())),
                Event::Property("Street".into(), ValueNode::primitive("1 Main St")),
                Event::Property("City".into(), ValueNode::primitive("Redmond")),
                Event::EndResource,
                Event::Parameter("all".into()),
                Event::StartResourceSet("NS.Address".into()),
                Event::StartResource(Some("NS.Address".into())),
                Event::Property("Street".into(), ValueNode::primitive("1 Main St")),
                Event::Property("City".into(), ValueNode::primitive("Redmond")),
                Event::EndResource,
                Event::StartResource(None),
                Event::EndResource,
                Event::EndResourceSet,
                Event::EndParameters,
            ]
        );
    }
}
