//! html5ever TreeSink implementation for ArenaDom.
//!
//! Used for HTML documents that embed `<svg>` islands. html5ever places
//! those elements in the SVG namespace with their case-corrected names.

use std::borrow::Cow;
use std::cell::RefCell;

use html5ever::driver::ParseOpts;
use html5ever::parse_document;
use html5ever::tendril::{StrTendril, TendrilSink};
use html5ever::tree_builder::{ElementFlags, NodeOrText, QuirksMode, TreeSink};
use html5ever::{Attribute as Html5Attribute, QualName};

use super::arena::{ArenaDom, ArenaNodeData, ArenaNodeId, Attribute, DocumentKind};

/// Parse an HTML document into an arena. HTML parsing never fails.
pub fn parse_html(html: &str) -> ArenaDom {
    let sink = ArenaSink::new();
    parse_document(sink, ParseOpts::default())
        .from_utf8()
        .one(html.as_bytes())
        .into_dom()
}

/// Handle used by TreeSink to reference nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NodeHandle(pub ArenaNodeId);

/// TreeSink that builds an ArenaDom.
///
/// html5ever's TreeSink methods take `&self`, so the arena sits in a RefCell.
pub struct ArenaSink {
    dom: RefCell<ArenaDom>,
}

impl Default for ArenaSink {
    fn default() -> Self {
        Self::new()
    }
}

impl ArenaSink {
    pub fn new() -> Self {
        Self {
            dom: RefCell::new(ArenaDom::with_kind(DocumentKind::Html)),
        }
    }

    /// Consume the sink and return the DOM.
    pub fn into_dom(self) -> ArenaDom {
        self.dom.into_inner()
    }

    fn append_to(&self, parent: ArenaNodeId, child: NodeOrText<NodeHandle>) {
        let mut dom = self.dom.borrow_mut();
        match child {
            NodeOrText::AppendNode(node) => dom.append(parent, node.0),
            NodeOrText::AppendText(text) => dom.append_text(parent, &text),
        }
    }
}

impl TreeSink for ArenaSink {
    type Handle = NodeHandle;
    type Output = Self;
    type ElemName<'a>
        = &'a QualName
    where
        Self: 'a;

    fn finish(self) -> Self::Output {
        self
    }

    fn parse_error(&self, msg: Cow<'static, str>) {
        log::trace!("html parse error: {msg}");
    }

    fn get_document(&self) -> Self::Handle {
        NodeHandle(self.dom.borrow().document())
    }

    fn elem_name<'a>(&'a self, target: &'a Self::Handle) -> Self::ElemName<'a> {
        static EMPTY: QualName = QualName {
            prefix: None,
            ns: html5ever::ns!(),
            local: html5ever::local_name!(""),
        };

        let dom = self.dom.borrow();
        match dom.get(target.0).map(|n| &n.data) {
            Some(ArenaNodeData::Element { name, .. }) => {
                let name: &QualName = name;
                // SAFETY: the QualName sits in its own `Arc` allocation, not in
                // the node vector, so arena reallocation does not move it.
                // Nodes are never dropped and element names never replaced
                // while the sink is alive, which keeps the `Arc` (and the
                // pointee) alive for `'a` after the RefCell guard goes.
                unsafe { std::mem::transmute::<&QualName, &'a QualName>(name) }
            }
            _ => &EMPTY,
        }
    }

    fn create_element(
        &self,
        name: QualName,
        attrs: Vec<Html5Attribute>,
        _flags: ElementFlags,
    ) -> Self::Handle {
        let attrs = attrs
            .into_iter()
            .map(|a| Attribute {
                name: a.name,
                value: a.value.to_string(),
            })
            .collect();

        NodeHandle(self.dom.borrow_mut().create_element(name, attrs))
    }

    fn create_comment(&self, text: StrTendril) -> Self::Handle {
        NodeHandle(self.dom.borrow_mut().create_comment(text.to_string()))
    }

    fn create_pi(&self, _target: StrTendril, data: StrTendril) -> Self::Handle {
        NodeHandle(self.dom.borrow_mut().create_comment(data.to_string()))
    }

    fn append(&self, parent: &Self::Handle, child: NodeOrText<Self::Handle>) {
        self.append_to(parent.0, child);
    }

    fn append_based_on_parent_node(
        &self,
        element: &Self::Handle,
        prev_element: &Self::Handle,
        child: NodeOrText<Self::Handle>,
    ) {
        let has_parent = self
            .dom
            .borrow()
            .get(element.0)
            .is_some_and(|n| n.parent.is_some());
        if has_parent {
            self.append_before_sibling(element, child);
        } else {
            self.append_to(prev_element.0, child);
        }
    }

    fn append_doctype_to_document(
        &self,
        name: StrTendril,
        public_id: StrTendril,
        system_id: StrTendril,
    ) {
        let mut dom = self.dom.borrow_mut();
        let doc = dom.document();
        let doctype = dom.create_doctype(
            name.to_string(),
            public_id.to_string(),
            system_id.to_string(),
        );
        dom.append(doc, doctype);
    }

    fn get_template_contents(&self, target: &Self::Handle) -> Self::Handle {
        // Template contents stay inline
        *target
    }

    fn same_node(&self, x: &Self::Handle, y: &Self::Handle) -> bool {
        x.0 == y.0
    }

    fn set_quirks_mode(&self, _mode: QuirksMode) {}

    fn append_before_sibling(&self, sibling: &Self::Handle, new_node: NodeOrText<Self::Handle>) {
        let mut dom = self.dom.borrow_mut();
        let node = match new_node {
            NodeOrText::AppendNode(node) => node.0,
            NodeOrText::AppendText(text) => dom.create_text(text.to_string()),
        };
        dom.insert_before(sibling.0, node);
    }

    fn add_attrs_if_missing(&self, target: &Self::Handle, attrs: Vec<Html5Attribute>) {
        let mut dom = self.dom.borrow_mut();
        if let Some(node) = dom.get_mut(target.0)
            && let ArenaNodeData::Element {
                attrs: existing, ..
            } = &mut node.data
        {
            for attr in attrs {
                if !existing.iter().any(|a| a.name == attr.name) {
                    existing.push(Attribute {
                        name: attr.name,
                        value: attr.value.to_string(),
                    });
                }
            }
        }
    }

    fn remove_from_parent(&self, target: &Self::Handle) {
        self.dom.borrow_mut().detach(target.0);
    }

    fn reparent_children(&self, node: &Self::Handle, new_parent: &Self::Handle) {
        let mut dom = self.dom.borrow_mut();
        let children: Vec<_> = dom.children(node.0).collect();
        for child in children {
            dom.detach(child);
            dom.append(new_parent.0, child);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inline_svg_is_in_svg_namespace() {
        let dom = parse_html(
            r#"<html><body><svg><g fill="red"><rect id="r"></rect></g></svg></body></html>"#,
        );

        let rect = dom.get_by_id("r").expect("should find rect");
        assert_eq!(dom.element_name(rect).unwrap().as_ref(), "rect");
        assert_eq!(
            dom.element_namespace(rect).unwrap().as_ref(),
            "http://www.w3.org/2000/svg"
        );
        assert_eq!(dom.kind(), DocumentKind::Html);
    }

    #[test]
    fn test_style_text_collected() {
        let dom = parse_html("<html><head><style>p { color: red }</style></head></html>");

        let style = dom.find_by_tag("style").expect("should find style");
        assert_eq!(dom.child_text(style), "p { color: red }");
    }

    #[test]
    fn test_names_stay_valid_while_the_arena_grows() {
        // Misnested formatting and foster-parented table content make the
        // tree builder compare element names while new nodes are appended.
        let mut html = String::from("<table>");
        for i in 0..200 {
            html.push_str(&format!("<b id='b{i}'><p>x</b>y</p>text<tr><td><i>z</table><table>"));
        }
        html.push_str("</table>");

        let dom = parse_html(&html);

        let cells = dom
            .elements()
            .filter(|&id| dom.element_name(id).is_some_and(|n| n.as_ref() == "td"))
            .count();
        assert_eq!(cells, 200);
        for i in [0, 99, 199] {
            let b = dom.get_by_id(&format!("b{i}")).expect("should find b");
            assert_eq!(dom.element_name(b).unwrap().as_ref(), "b");
        }
    }

    #[test]
    fn test_svg_camel_case_names() {
        let dom = parse_html("<svg><lineargradient id='g'></lineargradient></svg>");

        let gradient = dom.get_by_id("g").expect("should find gradient");
        assert_eq!(dom.element_name(gradient).unwrap().as_ref(), "linearGradient");
    }
}
