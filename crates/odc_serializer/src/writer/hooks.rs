use crate::model::Structured;
use crate::node::PropertyNode;

use super::{NestedLink, Resource};

// -----------------------------------------------------------------------------
// Args

/// The entry being written.
#[derive(Clone, Copy)]
pub struct EntryArgs<'a> {
    pub resource: &'a Resource<'a>,
    pub entity: &'a dyn Structured,
    pub properties: &'a [PropertyNode],
}

/// A navigation property whose links are written as one nested link.
#[derive(Clone, Copy)]
pub struct LinkGroupArgs<'a> {
    pub link: &'a NestedLink<'a>,
    pub source: &'a dyn Structured,
    /// Number of entity references in the group.
    pub len: usize,
}

/// A link being written inside an entry.
#[derive(Clone, Copy)]
pub struct NestedLinkArgs<'a> {
    pub link: &'a NestedLink<'a>,
    pub source: &'a dyn Structured,
    pub target: &'a dyn Structured,
    pub target_url: &'a str,
}

// -----------------------------------------------------------------------------
// WritingHooks

/// Callbacks around entry and nested-link boundaries.
///
/// A link group brackets one navigation property; the nested-link hooks
/// then run once per entity reference inside it. `*_starting` runs before
/// the writer sees the start event, `*_ending` after it saw the end event. Every method defaults to doing nothing, and
/// `()` is the hook set that does nothing at all.
pub trait WritingHooks {
    fn on_entry_starting(&mut self, args: &EntryArgs<'_>) {
        let _ = args;
    }

    fn on_entry_ending(&mut self, args: &EntryArgs<'_>) {
        let _ = args;
    }

    fn on_link_group_starting(&mut self, args: &LinkGroupArgs<'_>) {
        let _ = args;
    }

    fn on_link_group_ending(&mut self, args: &LinkGroupArgs<'_>) {
        let _ = args;
    }

    fn on_nested_link_starting(&mut self, args: &NestedLinkArgs<'_>) {
        let _ = args;
    }

    fn on_nested_link_ending(&mut self, args: &NestedLinkArgs<'_>) {
        let _ = args;
    }
}

impl WritingHooks for () {}
