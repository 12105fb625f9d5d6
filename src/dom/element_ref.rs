//! selectors crate Element implementation for ArenaDom.

use std::fmt;

use html5ever::ns;
use selectors::OpaqueElement;
use selectors::attr::{AttrSelectorOperation, CaseSensitivity, NamespaceConstraint};
use selectors::context::MatchingContext;
use selectors::matching::ElementSelectorFlags;

use super::arena::{ArenaDom, ArenaNodeData, ArenaNodeId, DocumentKind};
use crate::css::{
    CssLocalName, CssNamespace, IdentStr, NonTSPseudoClass, PseudoElement, SvgSelectors,
};

/// Reference to an element in the ArenaDom for selector matching.
#[derive(Clone, Copy)]
pub struct ElementRef<'a> {
    pub dom: &'a ArenaDom,
    pub id: ArenaNodeId,
}

impl<'a> ElementRef<'a> {
    pub fn new(dom: &'a ArenaDom, id: ArenaNodeId) -> Self {
        Self { dom, id }
    }

    fn wrap(&self, id: ArenaNodeId) -> Self {
        Self::new(self.dom, id)
    }

    fn sibling_element(&self, forward: bool) -> Option<Self> {
        let node = self.dom.get(self.id)?;
        let mut current = if forward {
            node.next_sibling
        } else {
            node.prev_sibling
        };
        while current.is_some() {
            if self.dom.is_element(current) {
                return Some(self.wrap(current));
            }
            let node = self.dom.get(current)?;
            current = if forward {
                node.next_sibling
            } else {
                node.prev_sibling
            };
        }
        None
    }

    fn is_anchor_with_href(&self) -> bool {
        self.dom
            .element_name(self.id)
            .is_some_and(|n| n.as_ref() == "a")
            && self.dom.get_attr(self.id, "href").is_some()
    }
}

impl fmt::Debug for ElementRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ElementRef")
            .field("id", &self.id)
            .field("name", &self.dom.describe(self.id))
            .finish()
    }
}

impl<'a> selectors::Element for ElementRef<'a> {
    type Impl = SvgSelectors;

    fn opaque(&self) -> OpaqueElement {
        OpaqueElement::new(self)
    }

    fn parent_element(&self) -> Option<Self> {
        self.dom.parent_element(self.id).map(|id| self.wrap(id))
    }

    fn parent_node_is_shadow_root(&self) -> bool {
        false
    }

    fn containing_shadow_host(&self) -> Option<Self> {
        None
    }

    fn is_pseudo_element(&self) -> bool {
        false
    }

    fn prev_sibling_element(&self) -> Option<Self> {
        self.sibling_element(false)
    }

    fn next_sibling_element(&self) -> Option<Self> {
        self.sibling_element(true)
    }

    fn first_element_child(&self) -> Option<Self> {
        self.dom
            .children(self.id)
            .find(|&child| self.dom.is_element(child))
            .map(|child| self.wrap(child))
    }

    fn is_html_element_in_html_document(&self) -> bool {
        self.dom.kind() == DocumentKind::Html
            && self
                .dom
                .element_namespace(self.id)
                .is_some_and(|n| *n == ns!(html))
    }

    fn has_local_name(&self, name: &CssLocalName) -> bool {
        self.dom
            .element_name(self.id)
            .is_some_and(|n| n == &name.0)
    }

    fn has_namespace(&self, ns: &CssNamespace) -> bool {
        self.dom
            .element_namespace(self.id)
            .is_some_and(|n| n == &ns.0)
    }

    fn is_same_type(&self, other: &Self) -> bool {
        self.dom.element_name(self.id) == other.dom.element_name(other.id)
            && self.dom.element_namespace(self.id) == other.dom.element_namespace(other.id)
    }

    fn attr_matches(
        &self,
        ns: &NamespaceConstraint<&CssNamespace>,
        local_name: &CssLocalName,
        operation: &AttrSelectorOperation<&IdentStr>,
    ) -> bool {
        self.dom.attributes(self.id).iter().any(|attr| {
            let ns_match = match ns {
                NamespaceConstraint::Any => true,
                NamespaceConstraint::Specific(ns) => attr.name.ns == ns.0,
            };
            ns_match && attr.name.local == local_name.0 && operation.eval_str(&attr.value)
        })
    }

    fn match_non_ts_pseudo_class(
        &self,
        _pc: &NonTSPseudoClass,
        _context: &mut MatchingContext<'_, Self::Impl>,
    ) -> bool {
        // Pseudo-classes are stripped before matching. Anything that reaches
        // here depends on runtime state we do not have.
        false
    }

    fn match_pseudo_element(
        &self,
        _pe: &PseudoElement,
        _context: &mut MatchingContext<'_, Self::Impl>,
    ) -> bool {
        false
    }

    fn is_link(&self) -> bool {
        self.is_anchor_with_href()
    }

    fn is_html_slot_element(&self) -> bool {
        false
    }

    fn has_id(&self, id: &IdentStr, case_sensitivity: CaseSensitivity) -> bool {
        self.dom
            .element_id(self.id)
            .is_some_and(|elem_id| case_sensitivity.eq(elem_id.as_bytes(), id.0.as_bytes()))
    }

    fn has_class(&self, name: &IdentStr, case_sensitivity: CaseSensitivity) -> bool {
        self.dom
            .element_classes(self.id)
            .iter()
            .any(|c| case_sensitivity.eq(c.as_bytes(), name.0.as_bytes()))
    }

    fn imported_part(&self, _name: &IdentStr) -> Option<IdentStr> {
        None
    }

    fn is_part(&self, _name: &IdentStr) -> bool {
        false
    }

    fn is_empty(&self) -> bool {
        self.dom.children(self.id).all(|child| match self.dom.get(child) {
            Some(node) => match &node.data {
                ArenaNodeData::Element { .. } => false,
                ArenaNodeData::Text(t) => t.is_empty(),
                _ => true,
            },
            None => true,
        })
    }

    fn is_root(&self) -> bool {
        self.dom
            .get(self.id)
            .and_then(|n| self.dom.get(n.parent))
            .is_some_and(|parent| matches!(parent.data, ArenaNodeData::Document))
    }

    fn apply_selector_flags(&self, _flags: ElementSelectorFlags) {}

    fn add_element_unique_hashes(&self, _filter: &mut selectors::bloom::BloomFilter) -> bool {
        false
    }

    fn has_custom_state(&self, _name: &IdentStr) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::css::{SelectorEngine, ServoSelectorEngine};
    use crate::dom::parse_xml;

    fn matches(dom: &ArenaDom, id: ArenaNodeId, selector: &str) -> bool {
        let engine = ServoSelectorEngine;
        let compiled = engine.compile(selector).expect("selector should compile");
        engine.matches(ElementRef::new(dom, id), &compiled, &mut Default::default())
    }

    const SVG: &str = r#"<svg xmlns="http://www.w3.org/2000/svg">
        <g id="layer" class="shapes">
            <rect id="first" class="big Red" fill="red"/>
            <circle id="second"/>
        </g>
        <linearGradient id="grad"/>
    </svg>"#;

    #[test]
    fn test_type_selector() {
        let dom = parse_xml(SVG).unwrap();
        let rect = dom.get_by_id("first").unwrap();

        assert!(matches(&dom, rect, "rect"));
        assert!(!matches(&dom, rect, "circle"));
    }

    #[test]
    fn test_xml_names_are_case_sensitive() {
        let dom = parse_xml(SVG).unwrap();
        let gradient = dom.get_by_id("grad").unwrap();

        assert!(matches(&dom, gradient, "linearGradient"));
        assert!(!matches(&dom, gradient, "lineargradient"));
    }

    #[test]
    fn test_class_and_id_selectors() {
        let dom = parse_xml(SVG).unwrap();
        let rect = dom.get_by_id("first").unwrap();

        assert!(matches(&dom, rect, ".big"));
        assert!(matches(&dom, rect, ".Red"));
        assert!(!matches(&dom, rect, ".red"));
        assert!(matches(&dom, rect, "rect#first.big"));
        assert!(!matches(&dom, rect, "#second"));
    }

    #[test]
    fn test_attribute_selector() {
        let dom = parse_xml(SVG).unwrap();
        let rect = dom.get_by_id("first").unwrap();

        assert!(matches(&dom, rect, "[fill]"));
        assert!(matches(&dom, rect, "[fill=red]"));
        assert!(!matches(&dom, rect, "[fill=blue]"));
    }

    #[test]
    fn test_combinators() {
        let dom = parse_xml(SVG).unwrap();
        let circle = dom.get_by_id("second").unwrap();

        assert!(matches(&dom, circle, "svg circle"));
        assert!(matches(&dom, circle, "g.shapes > circle"));
        assert!(matches(&dom, circle, "rect + circle"));
        assert!(matches(&dom, circle, "rect ~ circle"));
        assert!(!matches(&dom, circle, "svg > circle"));
    }

    #[test]
    fn test_root_and_structural() {
        let dom = parse_xml(SVG).unwrap();
        let svg = dom.find_by_tag("svg").unwrap();
        let rect = dom.get_by_id("first").unwrap();

        assert!(matches(&dom, svg, ":root"));
        assert!(matches(&dom, rect, ":first-child"));
        assert!(!matches(&dom, rect, ":last-child"));
    }

    #[test]
    fn test_state_pseudo_classes_never_match() {
        let dom = parse_xml(SVG).unwrap();
        let rect = dom.get_by_id("first").unwrap();

        assert!(!matches(&dom, rect, "rect:hover"));
    }
}
