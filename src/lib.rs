//! # svgcascade
//!
//! Static CSS cascade for SVG documents: computes the presentation
//! properties that apply to an element without a layout engine.
//!
//! ## Features
//!
//! - Presentation attributes, `<style>` rules and `style` attributes merged
//!   by specificity and `!important`
//! - Inheritance of SVG properties from ancestors
//! - Rules that depend on runtime state (`:hover`, `@media`, ...) are
//!   reported as [`ComputedEntry::Dynamic`] instead of guessed
//! - Standalone SVG via `quick-xml`, HTML with inline SVG via `html5ever`
//!
//! ## Quick Start
//!
//! ```
//! use svgcascade::{ArenaDom, compute_style};
//!
//! let dom = ArenaDom::parse_xml(
//!     r#"<svg xmlns="http://www.w3.org/2000/svg">
//!         <style>.shape { fill: red } rect:hover { stroke: blue }</style>
//!         <g stroke-width="2"><rect id="r" class="shape"/></g>
//!     </svg>"#,
//! )
//! .unwrap();
//!
//! let rect = dom.get_by_id("r").unwrap();
//! let style = compute_style(&dom, rect).unwrap();
//!
//! assert_eq!(style.value("fill"), Some("red"));
//! assert_eq!(style.value("stroke-width"), Some("2"));
//! assert!(style.is_dynamic("stroke"));
//! ```
//!
//! ## Many Elements
//!
//! [`compute_style`] parses the document's stylesheets on every call. To
//! style many elements, build the [`RuleSet`] once and share it:
//!
//! ```
//! use svgcascade::{ArenaDom, RuleSet, StyleResolver};
//!
//! let dom = ArenaDom::parse_xml(
//!     r#"<svg xmlns="http://www.w3.org/2000/svg"><style>circle { fill: blue }</style><circle/><circle/></svg>"#,
//! )
//! .unwrap();
//! let rules = RuleSet::from_document(&dom).unwrap();
//! let resolver = StyleResolver::new(&rules);
//!
//! for id in dom.elements() {
//!     let style = resolver.resolve(&dom, id);
//!     if dom.element_name(id).is_some_and(|n| n.as_ref() == "circle") {
//!         assert_eq!(style.value("fill"), Some("blue"));
//!     }
//! }
//! ```

pub mod css;
pub mod dom;
pub mod error;
pub mod style;

pub use css::{
    Declaration, RuleSet, SelectorEngine, ServoSelectorEngine, Specificity, StyleRule,
    extract_stylesheets, parse_stylesheet, sort_rules,
};
pub use dom::{ArenaDom, ArenaNodeId, DocumentKind, ElementRef};
pub use error::{Result, StyleError};
pub use style::{ComputedEntry, ComputedStyleMap, StyleResolver, Vocabulary};

/// Compute the style of one element, collecting the document's stylesheets
/// first.
///
/// Fails if any stylesheet is malformed.
pub fn compute_style(dom: &ArenaDom, id: ArenaNodeId) -> Result<ComputedStyleMap> {
    let rules = RuleSet::from_document(dom)?;
    Ok(StyleResolver::new(&rules).resolve(dom, id))
}
