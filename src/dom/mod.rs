//! Document tree: arena storage, XML and HTML builders, and selector
//! matching glue.

mod arena;
mod element_ref;
mod tree_sink;
mod xml;

use std::path::Path;

pub use arena::{
    Ancestors, ArenaDom, ArenaNode, ArenaNodeData, ArenaNodeId, Attribute, ChildrenIter,
    Descendants, DocumentKind,
};
pub use element_ref::ElementRef;
pub use tree_sink::{ArenaSink, parse_html};
pub use xml::parse_xml;

use crate::css::{Declaration, parse_inline_style};
use crate::error::Result;

impl ArenaDom {
    /// Parse an XML document such as a standalone SVG file.
    pub fn parse_xml(xml: &str) -> Result<Self> {
        parse_xml(xml)
    }

    /// Parse an HTML document. Inline `<svg>` lands in the SVG namespace.
    pub fn parse_html(html: &str) -> Self {
        parse_html(html)
    }

    /// Load a document from disk. `.html` and `.htm` files are parsed as
    /// HTML, anything else as XML.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let source = String::from_utf8(std::fs::read(path)?)?;
        let is_html = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("html") || ext.eq_ignore_ascii_case("htm"));

        log::debug!("loading {} as {}", path.display(), if is_html { "HTML" } else { "XML" });
        if is_html {
            Ok(parse_html(&source))
        } else {
            parse_xml(&source)
        }
    }

    /// Declarations of an element's `style` attribute, in order.
    pub fn inline_style(&self, id: ArenaNodeId) -> Vec<Declaration> {
        self.get_attr(id, "style")
            .map(parse_inline_style)
            .unwrap_or_default()
    }
}
