//! Fixtures shared by the unit tests.

use alloc::rc::Rc;
use alloc::string::String;
use alloc::sync::Arc;
use alloc::vec::Vec;
use core::cell::OnceCell;

use odc_edm::native::geography;
use odc_edm::value::SpatialValue;
use odc_edm::{Native, PrimitiveValue};

use crate::model::{ClientProperty, ClientType, EnumType, FieldValue, Structured};

/// An owned property value.
pub enum Slot {
    Null,
    Primitive(PrimitiveValue),
    Enum(i64),
    Object(Rc<Record>),
    /// An object attached after construction, for building cycles.
    Late(OnceCell<Rc<Record>>),
    List(Vec<Slot>),
}

impl Slot {
    pub fn late() -> Self {
        Self::Late(OnceCell::new())
    }

    fn view(&self) -> FieldValue<'_> {
        match self {
            Self::Null => FieldValue::Null,
            Self::Primitive(v) => FieldValue::Primitive(v.clone()),
            Self::Enum(v) => FieldValue::Enum(*v),
            Self::Object(r) => FieldValue::Structured(&**r),
            Self::Late(cell) => cell.get().map_or(FieldValue::Null, |r| FieldValue::Structured(&**r)),
            Self::List(items) => FieldValue::Collection(items.iter().map(Slot::view).collect()),
        }
    }
}

macro_rules! slot_from {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Slot {
                fn from(value: $ty) -> Self {
                    Self::Primitive(value.into())
                }
            }
        )*
    };
}

slot_from!(PrimitiveValue, SpatialValue, &str, bool, i32, i64, u16, f64);

/// A structured object backed by a list of named slots.
pub struct Record {
    ty: ClientType,
    slots: Vec<(String, Slot)>,
}

impl Record {
    pub fn new(ty: ClientType) -> Self {
        Self { ty, slots: Vec::new() }
    }

    pub fn with(mut self, name: &str, slot: impl Into<Slot>) -> Self {
        self.slots.push((name.into(), slot.into()));
        self
    }

    /// Fills a [`Slot::Late`] slot.
    pub fn link(&self, name: &str, target: Rc<Record>) {
        let slot = self.slots.iter().find(|(n, _)| n == name).map(|(_, s)| s);
        let Some(Slot::Late(cell)) = slot else {
            panic!("`{name}` is not a late slot");
        };
        assert!(cell.set(target).is_ok(), "`{name}` is already linked");
    }
}

impl Structured for Record {
    fn client_type(&self) -> &ClientType {
        &self.ty
    }

    fn field(&self, name: &str) -> Option<FieldValue<'_>> {
        self.slots.iter().find(|(n, _)| n == name).map(|(_, s)| s.view())
    }
}

// -----------------------------------------------------------------------------
// Model

pub fn color() -> Arc<EnumType> {
    Arc::new(
        EnumType::new("NS.Color")
            .with_member("Red", 1)
            .with_member("Green", 2)
            .with_member("Blue", 3),
    )
}

pub fn access() -> Arc<EnumType> {
    Arc::new(
        EnumType::flags("NS.Access")
            .with_member("None", 0)
            .with_member("Read", 1)
            .with_member("Write", 2),
    )
}

pub fn address_type() -> ClientType {
    ClientType::new("NS.Address")
        .with_property(ClientProperty::primitive("Street", String::native_type()))
        .with_property(ClientProperty::primitive("City", String::native_type()))
}

pub fn address(street: &str, city: &str) -> Rc<Record> {
    Rc::new(
        Record::new(address_type())
            .with("Street", street)
            .with("City", city),
    )
}

/// `NS.Node { Name, Next: NS.Node }`.
pub fn node_type() -> ClientType {
    ClientType::new("NS.Node")
        .with_property(ClientProperty::primitive("Name", String::native_type()))
        .with_property(ClientProperty::complex("Next", "NS.Node"))
}

/// `len` linked `NS.Node`s from head to last; the last `Next` is left open.
pub fn chain(len: usize) -> (Rc<Record>, Rc<Record>) {
    let last = Rc::new(Record::new(node_type()).with("Name", "last").with("Next", Slot::late()));
    let mut head = last.clone();
    for _ in 1..len {
        head = Rc::new(Record::new(node_type()).with("Name", "n").with("Next", Slot::Object(head)));
    }
    (head, last)
}

pub fn customer_type() -> ClientType {
    ClientType::new("NS.Customer")
        .with_property(ClientProperty::primitive("Id", i32::native_type()).required())
        .with_property(ClientProperty::primitive("Name", String::native_type()))
        .with_property(ClientProperty::primitive("Location", geography::Geography::native_type()))
        .with_property(ClientProperty::enumeration("Color", color()))
        .with_property(ClientProperty::complex("Address", "NS.Address"))
        .with_property(ClientProperty::primitive_collection("Tags", String::native_type()))
        .with_property(ClientProperty::navigation("Orders", true))
        .with_property(ClientProperty::navigation("BestFriend", false))
}

pub fn order_type() -> ClientType {
    ClientType::new("NS.Order").with_property(ClientProperty::primitive("Id", i32::native_type()).required())
}

pub fn customer(id: i32) -> Rc<Record> {
    Rc::new(
        Record::new(customer_type())
            .with("Id", id)
            .with("Name", "Alice")
            .with("Location", Slot::Null)
            .with("Color", Slot::Enum(1))
            .with("Address", Slot::Object(address("1 Main St", "Redmond")))
            .with("Tags", Slot::List(Vec::from(["a".into(), "b".into()]))),
    )
}

pub fn order(id: i32) -> Rc<Record> {
    Rc::new(Record::new(order_type()).with("Id", id))
}
