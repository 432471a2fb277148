//! Writers and hooks that record what they are told, for tests.

use alloc::format;
use alloc::rc::Rc;
use alloc::string::{String, ToString};
use alloc::vec::Vec;
use core::cell::RefCell;

use super::{EntryArgs, LinkGroupArgs, NestedLink, NestedLinkArgs, ODataWriter, ParameterWriter, Resource, WritingHooks};
use crate::node::ValueNode;

#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    StartResource(Option<String>),
    EndResource,
    Property(String, ValueNode),
    StartNestedLink(String, bool),
    EndNestedLink,
    StartResourceSet(String),
    EndResourceSet,
    ReferenceLink(String),
    StartParameters,
    Value(String, ValueNode),
    Parameter(String),
    EndParameters,
    /// A hook call and the entry type or link target it saw.
    Hook(&'static str, String),
}

pub type Log = Rc<RefCell<Vec<Event>>>;

/// Records every event into a shared log.
#[derive(Default)]
pub struct RecordingWriter {
    pub log: Log,
    /// Fails the first event whose name starts with this prefix.
    pub fail_on: Option<&'static str>,
}

impl RecordingWriter {
    pub fn new(log: &Log) -> Self {
        Self {
            log: log.clone(),
            fail_on: None,
        }
    }

    fn push(&mut self, name: &'static str, event: Event) -> Result<(), String> {
        if self.fail_on.is_some_and(|prefix| name.starts_with(prefix)) {
            return Err(format!("{name} refused"));
        }
        self.log.borrow_mut().push(event);
        Ok(())
    }
}

impl ODataWriter for RecordingWriter {
    type Error = String;

    fn start_resource(&mut self, resource: Option<&Resource<'_>>) -> Result<(), String> {
        self.push("start_resource", Event::StartResource(resource.map(|r| r.type_name.to_string())))
    }

    fn end_resource(&mut self) -> Result<(), String> {
        self.push("end_resource", Event::EndResource)
    }

    fn write_property(&mut self, name: &str, value: &ValueNode) -> Result<(), String> {
        self.push("write_property", Event::Property(name.into(), value.clone()))
    }

    fn start_nested_link(&mut self, link: &NestedLink<'_>) -> Result<(), String> {
        self.push("start_nested_link", Event::StartNestedLink(link.name.into(), link.is_collection))
    }

    fn end_nested_link(&mut self) -> Result<(), String> {
        self.push("end_nested_link", Event::EndNestedLink)
    }

    fn start_resource_set(&mut self, item_type_name: &str) -> Result<(), String> {
        self.push("start_resource_set", Event::StartResourceSet(item_type_name.into()))
    }

    fn end_resource_set(&mut self) -> Result<(), String> {
        self.push("end_resource_set", Event::EndResourceSet)
    }

    fn write_entity_reference_link(&mut self, url: &str) -> Result<(), String> {
        self.push("write_entity_reference_link", Event::ReferenceLink(url.into()))
    }
}

/// Records parameter events; resources go through an inner [`RecordingWriter`].
pub struct RecordingParameterWriter {
    inner: RecordingWriter,
}

impl RecordingParameterWriter {
    pub fn new(log: &Log) -> Self {
        Self {
            inner: RecordingWriter::new(log),
        }
    }
}

impl ParameterWriter for RecordingParameterWriter {
    type Error = String;

    fn start_parameters(&mut self) -> Result<(), String> {
        self.inner.push("start_parameters", Event::StartParameters)
    }

    fn write_value(&mut self, name: &str, value: &ValueNode) -> Result<(), String> {
        self.inner.push("write_value", Event::Value(name.into(), value.clone()))
    }

    fn write_resource(&mut self, name: &str) -> Result<&mut dyn ODataWriter<Error = String>, String> {
        self.inner.push("write_resource", Event::Parameter(name.into()))?;
        Ok(&mut self.inner)
    }

    fn write_resource_set(&mut self, name: &str) -> Result<&mut dyn ODataWriter<Error = String>, String> {
        self.inner.push("write_resource_set", Event::Parameter(name.into()))?;
        Ok(&mut self.inner)
    }

    fn end_parameters(&mut self) -> Result<(), String> {
        self.inner.push("end_parameters", Event::EndParameters)
    }
}

/// Records hook calls into the same log as the writer.
pub struct RecordingHooks {
    pub log: Log,
}

impl WritingHooks for RecordingHooks {
    fn on_entry_starting(&mut self, args: &EntryArgs<'_>) {
        let name = args.resource.type_name.to_string();
        self.log.borrow_mut().push(Event::Hook("entry_starting", name));
    }

    fn on_entry_ending(&mut self, args: &EntryArgs<'_>) {
        let name = args.resource.type_name.to_string();
        self.log.borrow_mut().push(Event::Hook("entry_ending", name));
    }

    fn on_link_group_starting(&mut self, args: &LinkGroupArgs<'_>) {
        let name = args.link.name.to_string();
        self.log.borrow_mut().push(Event::Hook("group_starting", name));
    }

    fn on_link_group_ending(&mut self, args: &LinkGroupArgs<'_>) {
        let name = args.link.name.to_string();
        self.log.borrow_mut().push(Event::Hook("group_ending", name));
    }

    fn on_nested_link_starting(&mut self, args: &NestedLinkArgs<'_>) {
        let target = args.target_url.to_string();
        self.log.borrow_mut().push(Event::Hook("link_starting", target));
    }

    fn on_nested_link_ending(&mut self, args: &NestedLinkArgs<'_>) {
        let target = args.target_url.to_string();
        self.log.borrow_mut().push(Event::Hook("link_ending", target));
    }
}
