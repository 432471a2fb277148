use alloc::borrow::Cow;
use alloc::format;
use alloc::string::{String, ToString};

use roxmltree::Document;

use crate::FormatError;

// -----------------------------------------------------------------------------
// MarkupReader

/// Element-level access to a markup payload.
///
/// Only the operation the converters need is modelled; the streaming reader
/// behind it belongs to the wire layer.
pub trait MarkupReader {
    /// Reads the decoded text content of the current element and moves past it.
    fn read_element_text(&mut self) -> Result<String, FormatError>;
}

// -----------------------------------------------------------------------------
// StrMarkupReader

/// A [`MarkupReader`] over the raw content of a single element.
///
/// The content is parsed as the body of an element, so entity and character
/// references, CDATA sections and comments follow the XML rules. Child
/// elements are rejected.
///
/// # Examples
///
/// ```
/// use odc_edm::{MarkupReader, StrMarkupReader};
///
/// let mut reader = StrMarkupReader::new("Fish &amp; Chips &#x263A;");
/// assert_eq!(reader.read_element_text().unwrap(), "Fish & Chips \u{263A}");
/// assert!(reader.read_element_text().is_err());
/// ```
#[derive(Debug, Clone)]
pub struct StrMarkupReader<'a> {
    content: Option<&'a str>,
}

impl<'a> StrMarkupReader<'a> {
    #[inline]
    pub const fn new(content: &'a str) -> Self {
        Self {
            content: Some(content),
        }
    }
}

impl MarkupReader for StrMarkupReader<'_> {
    fn read_element_text(&mut self) -> Result<String, FormatError> {
        let content = self
            .content
            .take()
            .ok_or(FormatError::InvalidMarkup(Cow::Borrowed("element already consumed")))?;
        element_text(content)
    }
}

fn element_text(content: &str) -> Result<String, FormatError> {
    let xml = format!("<value>{content}</value>");
    let doc = Document::parse(&xml).map_err(|e| FormatError::InvalidMarkup(Cow::Owned(e.to_string())))?;
    let element = doc.root_element();

    if element.children().any(|n| n.is_element()) {
        return Err(FormatError::InvalidMarkup(Cow::Borrowed("unexpected child element")));
    }
    Ok(element
        .children()
        .filter(|n| n.is_text())
        .filter_map(|n| n.text())
        .collect())
}

// -----------------------------------------------------------------------------
// Tests
