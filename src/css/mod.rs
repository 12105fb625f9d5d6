//! CSS parsing: declarations, selectors, specificity and stylesheets.

mod declaration;
mod selector;
mod specificity;
mod stylesheet;


pub use declaration::{Declaration, parse_inline_style};
pub use selector::{
    CssLocalName, CssNamespace, IdentStr, NonTSPseudoClass, PseudoElement, SelectorEngine,
    ServoSelectorEngine, SvgSelectors, strip_pseudo_classes,
};
pub use specificity::Specificity;
pub use stylesheet::{
    RuleSet, StyleRule, extract_stylesheets, parse_stylesheet, parse_stylesheet_with, sort_rules,
};
