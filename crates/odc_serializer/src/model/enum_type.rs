use alloc::string::{String, ToString};
use alloc::vec::Vec;

// -----------------------------------------------------------------------------
// EnumType

/// A protocol enum type with its members in declaration order.
///
/// # Examples
///
/// ```
/// use odc_serializer::model::EnumType;
///
/// let access = EnumType::flags("NS.Access")
///     .with_member("None", 0)
///     .with_member("Read", 1)
///     .with_member("Write", 2);
///
/// assert_eq!(access.format_value(3), "Read,Write");
/// assert_eq!(access.format_value(0), "None");
/// assert_eq!(access.format_value(8), "8");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumType {
    name: String,
    members: Vec<(String, i64)>,
    is_flags: bool,
}

impl EnumType {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            members: Vec::new(),
            is_flags: false,
        }
    }

    /// An enum whose values combine members bitwise.
    pub fn flags(name: impl Into<String>) -> Self {
        Self {
            is_flags: true,
            ..Self::new(name)
        }
    }

    pub fn with_member(mut self, name: impl Into<String>, value: i64) -> Self {
        self.members.push((name.into(), value));
        self
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn is_flags(&self) -> bool {
        self.is_flags
    }

    #[inline]
    pub fn members(&self) -> &[(String, i64)] {
        &self.members
    }

    /// Symbolic text of a value.
    ///
    /// Flag values are decomposed in declaration order and joined with `,`.
    /// A value no combination of members can express is written as its
    /// decimal number.
    pub fn format_value(&self, value: i64) -> String {
        if let Some((name, _)) = self.members.iter().find(|(_, v)| *v == value) {
            return name.clone();
        }
        if !self.is_flags || value == 0 {
            return value.to_string();
        }

        let mut names = Vec::new();
        let mut remaining = value;
        for (name, bits) in &self.members {
            if *bits != 0 && value & bits == *bits && remaining & bits != 0 {
                names.push(name.as_str());
                remaining &= !bits;
            }
        }
        if remaining != 0 {
            return value.to_string();
        }
        names.join(",")
    }
}

// -----------------------------------------------------------------------------
// Tests
