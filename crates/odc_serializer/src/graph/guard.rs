use core::any::{Any, TypeId};
use core::cell::RefCell;

use odc_utils::hash::HashSet;

use crate::model::Structured;

// -----------------------------------------------------------------------------
// Identity

/// Address plus concrete type, so a struct and its first field do not
/// collide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct Identity {
    addr: usize,
    ty: TypeId,
}

impl Identity {
    fn of(object: &dyn Structured) -> Self {
        let any: &dyn Any = object;
        Self {
            addr: core::ptr::from_ref(object).cast::<()>().addr(),
            ty: any.type_id(),
        }
    }
}

// -----------------------------------------------------------------------------
// CycleGuard

/// The set of objects on the current conversion path.
#[derive(Default)]
pub(super) struct CycleGuard {
    visiting: RefCell<HashSet<Identity>>,
}

impl CycleGuard {
    /// Marks `object` as being visited until the returned guard drops.
    ///
    /// Returns `None` if it is already on the path.
    pub fn enter(&self, object: &dyn Structured) -> Option<Visit<'_>> {
        let identity = Identity::of(object);
        if !self.visiting.borrow_mut().insert(identity) {
            return None;
        }
        Some(Visit {
            guard: self,
            identity,
        })
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.visiting.borrow().is_empty()
    }
}

/// Removes its object from the path on drop.
pub(super) struct Visit<'g> {
    guard: &'g CycleGuard,
    identity: Identity,
}

impl Drop for Visit<'_> {
    fn drop(&mut self) {
        self.guard.visiting.borrow_mut().remove(&self.identity);
    }
}

// -----------------------------------------------------------------------------
// Tests
