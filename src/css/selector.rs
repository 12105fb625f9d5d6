//! Selector parsing, specificity and matching.
//!
//! The cascade talks to selectors through [`SelectorEngine`] so another CSS
//! engine can be swapped in. [`ServoSelectorEngine`] is the default, backed
//! by the `selectors` crate. This module also holds the pseudo-class
//! stripping used to build statically matchable selectors.

use std::fmt;

use cssparser::{
    CowRcStr, ParseError, Parser, ParserInput, SourceLocation, ToCss, Token,
    match_ignore_ascii_case,
};
use html5ever::{LocalName, Namespace, ns};
use selectors::SelectorImpl;
use selectors::context::{MatchingContext, SelectorCaches};
use selectors::parser::{ParseRelative, Selector, SelectorList, SelectorParseErrorKind};

use super::specificity::Specificity;
use crate::dom::ElementRef;
use crate::error::{Result, StyleError};

/// Capability interface for a selector engine.
pub trait SelectorEngine {
    /// Engine-specific compiled form of a selector list.
    type Compiled: fmt::Debug;

    /// Specificity of a selector list exactly as written, pseudo-classes
    /// included. For several selectors, the highest one.
    fn specificity(&self, selectors: &str) -> Result<Specificity>;

    /// Compile a selector list for matching. `None` means the engine cannot
    /// evaluate it; such selectors never match.
    fn compile(&self, selectors: &str) -> Option<Self::Compiled>;

    /// Scratch state reused across the matches of one query.
    type Caches: Default;

    /// Whether `element` matches any selector of the compiled list.
    fn matches(
        &self,
        element: ElementRef<'_>,
        compiled: &Self::Compiled,
        caches: &mut Self::Caches,
    ) -> bool;
}

/// Our selector implementation for the selectors crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SvgSelectors;

/// [`SelectorEngine`] backed by the `selectors` crate.
#[derive(Debug, Clone, Copy, Default)]
pub struct ServoSelectorEngine;

impl ServoSelectorEngine {
    fn parse_list<'i>(
        input: &mut Parser<'i, '_>,
    ) -> std::result::Result<Vec<Selector<SvgSelectors>>, ParseError<'i, SelectorParseErrorKind<'i>>>
    {
        let list = SelectorList::parse(&SvgSelectors, input, ParseRelative::No)?;
        Ok(list.slice().to_vec())
    }
}

impl SelectorEngine for ServoSelectorEngine {
    type Compiled = Vec<Selector<SvgSelectors>>;
    type Caches = SelectorCaches;

    fn specificity(&self, selectors: &str) -> Result<Specificity> {
        let mut input = ParserInput::new(selectors);
        let mut parser = Parser::new(&mut input);
        let list = Self::parse_list(&mut parser)
            .map_err(|e| StyleError::stylesheet(selectors, &e))?;
        Ok(list
            .iter()
            .map(Specificity::from_selector)
            .max()
            .unwrap_or_default())
    }

    fn compile(&self, selectors: &str) -> Option<Self::Compiled> {
        let mut input = ParserInput::new(selectors);
        let mut parser = Parser::new(&mut input);
        match Self::parse_list(&mut parser) {
            Ok(list) => Some(list),
            Err(e) => {
                log::debug!("selector `{selectors}` cannot be matched: {:?}", e.kind);
                None
            }
        }
    }

    fn matches(
        &self,
        element: ElementRef<'_>,
        compiled: &Self::Compiled,
        caches: &mut Self::Caches,
    ) -> bool {
        let mut context = MatchingContext::new(
            selectors::matching::MatchingMode::Normal,
            None,
            caches,
            selectors::context::QuirksMode::NoQuirks,
            selectors::matching::NeedsSelectorFlags::No,
            selectors::matching::MatchingForInvalidation::No,
        );

        compiled.iter().any(|selector| {
            selectors::matching::matches_selector(selector, 0, None, &element, &mut context)
        })
    }
}

/// Remove every pseudo-class from a selector list.
///
/// Returns the matchable selector text and whether anything was removed.
/// Both `:name` and `:name(...)` forms go, including single-colon legacy
/// pseudo-elements such as `:before`; `::name` pseudo-elements stay. A
/// compound selector left empty becomes `*`, so `g :hover` matches like
/// `g *`.
pub fn strip_pseudo_classes(selectors: &str) -> (String, bool) {
    let mut input = ParserInput::new(selectors);
    let mut parser = Parser::new(&mut input);
    let mut out = String::with_capacity(selectors.len());
    let mut stripped = false;
    // Whether the current compound selector has emitted anything yet
    let mut in_compound = false;

    loop {
        let start = parser.position();
        let token = match parser.next_including_whitespace() {
            Ok(token) => token.clone(),
            Err(_) => break,
        };
        match token {
            Token::WhiteSpace(_) => {
                if !out.ends_with(' ') {
                    out.push(' ');
                }
                in_compound = false;
            }
            Token::Comma => {
                out.push(',');
                in_compound = false;
            }
            Token::Delim('>' | '+' | '~') => {
                out.push_str(parser.slice_from(start));
                in_compound = false;
            }
            Token::Colon => {
                let after_colon = parser.state();
                let removed = match parser.next_including_whitespace().cloned() {
                    Ok(Token::Colon) => {
                        // `::name` or `::name(...)`
                        let is_function = matches!(
                            parser.next_including_whitespace(),
                            Ok(Token::Function(_))
                        );
                        if is_function {
                            skip_block(&mut parser);
                        }
                        out.push_str(parser.slice_from(start));
                        in_compound = true;
                        false
                    }
                    Ok(Token::Ident(_)) => true,
                    Ok(Token::Function(_)) => {
                        skip_block(&mut parser);
                        true
                    }
                    _ => {
                        // Not a pseudo selector; leave it for the engine to reject.
                        parser.reset(&after_colon);
                        out.push(':');
                        in_compound = true;
                        false
                    }
                };
                if removed {
                    stripped = true;
                    if !in_compound {
                        out.push('*');
                        in_compound = true;
                    }
                }
            }
            Token::Function(_) | Token::SquareBracketBlock | Token::ParenthesisBlock => {
                skip_block(&mut parser);
                out.push_str(parser.slice_from(start));
                in_compound = true;
            }
            _ => {
                out.push_str(parser.slice_from(start));
                in_compound = true;
            }
        }
    }

    (out.trim().to_string(), stripped)
}

fn skip_block<'i>(parser: &mut Parser<'i, '_>) {
    let _ = parser.parse_nested_block(|block| -> std::result::Result<(), ParseError<'i, ()>> {
        while block.next().is_ok() {}
        Ok(())
    });
}

/// Identifier string type.
#[derive(Debug, Clone, PartialEq, Eq, Default, Hash)]
pub struct IdentStr(pub String);

impl precomputed_hash::PrecomputedHash for IdentStr {
    fn precomputed_hash(&self) -> u32 {
        let mut h: u32 = 0;
        for byte in self.0.bytes() {
            h = h.wrapping_mul(31).wrapping_add(byte as u32);
        }
        h
    }
}

impl AsRef<str> for IdentStr {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<String> for IdentStr {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl<'a> From<&'a str> for IdentStr {
    fn from(s: &'a str) -> Self {
        Self(s.to_string())
    }
}

impl ToCss for IdentStr {
    fn to_css<W: fmt::Write>(&self, dest: &mut W) -> fmt::Result {
        cssparser::serialize_identifier(&self.0, dest)
    }
}

/// LocalName wrapper that implements ToCss.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CssLocalName(pub LocalName);

impl precomputed_hash::PrecomputedHash for CssLocalName {
    fn precomputed_hash(&self) -> u32 {
        self.0.precomputed_hash()
    }
}

impl ToCss for CssLocalName {
    fn to_css<W: fmt::Write>(&self, dest: &mut W) -> fmt::Result {
        dest.write_str(self.0.as_ref())
    }
}

impl From<String> for CssLocalName {
    fn from(s: String) -> Self {
        Self(LocalName::from(s))
    }
}

impl<'a> From<&'a str> for CssLocalName {
    fn from(s: &'a str) -> Self {
        Self(LocalName::from(s))
    }
}

impl AsRef<str> for CssLocalName {
    fn as_ref(&self) -> &str {
        self.0.as_ref()
    }
}

/// Namespace wrapper that implements ToCss.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct CssNamespace(pub Namespace);

impl precomputed_hash::PrecomputedHash for CssNamespace {
    fn precomputed_hash(&self) -> u32 {
        self.0.precomputed_hash()
    }
}

impl ToCss for CssNamespace {
    fn to_css<W: fmt::Write>(&self, dest: &mut W) -> fmt::Result {
        dest.write_str(self.0.as_ref())
    }
}

impl From<String> for CssNamespace {
    fn from(s: String) -> Self {
        Self(Namespace::from(s))
    }
}

impl<'a> From<&'a str> for CssNamespace {
    fn from(s: &'a str) -> Self {
        Self(Namespace::from(s))
    }
}

/// Any pseudo-element, kept by name. Elements never match them.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PseudoElement(pub IdentStr);

impl ToCss for PseudoElement {
    fn to_css<W: fmt::Write>(&self, dest: &mut W) -> fmt::Result {
        dest.write_str("::")?;
        self.0.to_css(dest)
    }
}

impl selectors::parser::PseudoElement for PseudoElement {
    type Impl = SvgSelectors;

    fn accepts_state_pseudo_classes(&self) -> bool {
        true
    }

    fn valid_after_slotted(&self) -> bool {
        false
    }
}

/// Pseudo-classes the selectors crate leaves to the implementation.
///
/// Any name is accepted so specificity can be computed for selectors we
/// will never match, like `:hover` or `:lang(en)`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum NonTSPseudoClass {
    Hover,
    Active,
    Focus,
    Other(IdentStr),
    Functional(IdentStr, String),
}

impl selectors::parser::NonTSPseudoClass for NonTSPseudoClass {
    type Impl = SvgSelectors;

    fn is_active_or_hover(&self) -> bool {
        matches!(self, Self::Hover | Self::Active)
    }

    fn is_user_action_state(&self) -> bool {
        matches!(self, Self::Hover | Self::Active | Self::Focus)
    }
}

impl ToCss for NonTSPseudoClass {
    fn to_css<W: fmt::Write>(&self, dest: &mut W) -> fmt::Result {
        match self {
            Self::Hover => dest.write_str(":hover"),
            Self::Active => dest.write_str(":active"),
            Self::Focus => dest.write_str(":focus"),
            Self::Other(name) => {
                dest.write_char(':')?;
                name.to_css(dest)
            }
            Self::Functional(name, args) => {
                dest.write_char(':')?;
                name.to_css(dest)?;
                write!(dest, "({args})")
            }
        }
    }
}

impl SelectorImpl for SvgSelectors {
    type ExtraMatchingData<'a> = ();
    type AttrValue = IdentStr;
    type Identifier = IdentStr;
    type LocalName = CssLocalName;
    type NamespaceUrl = CssNamespace;
    type NamespacePrefix = IdentStr;
    type BorrowedLocalName = CssLocalName;
    type BorrowedNamespaceUrl = CssNamespace;
    type NonTSPseudoClass = NonTSPseudoClass;
    type PseudoElement = PseudoElement;
}

impl<'i> selectors::parser::Parser<'i> for SvgSelectors {
    type Impl = SvgSelectors;
    type Error = SelectorParseErrorKind<'i>;

    fn parse_is_and_where(&self) -> bool {
        true
    }

    fn parse_has(&self) -> bool {
        true
    }

    fn parse_non_ts_pseudo_class(
        &self,
        _location: SourceLocation,
        name: CowRcStr<'i>,
    ) -> std::result::Result<NonTSPseudoClass, ParseError<'i, Self::Error>> {
        let class = match_ignore_ascii_case! { &*name,
            "hover" => NonTSPseudoClass::Hover,
            "active" => NonTSPseudoClass::Active,
            "focus" => NonTSPseudoClass::Focus,
            _ => NonTSPseudoClass::Other(name.to_ascii_lowercase().into()),
        };
        Ok(class)
    }

    fn parse_non_ts_functional_pseudo_class<'t>(
        &self,
        name: CowRcStr<'i>,
        arguments: &mut Parser<'i, 't>,
        _after_part: bool,
    ) -> std::result::Result<NonTSPseudoClass, ParseError<'i, Self::Error>> {
        let start = arguments.position();
        while arguments.next().is_ok() {}
        let args = arguments.slice_from(start).trim().to_string();
        Ok(NonTSPseudoClass::Functional(
            name.to_ascii_lowercase().into(),
            args,
        ))
    }

    fn parse_pseudo_element(
        &self,
        _location: SourceLocation,
        name: CowRcStr<'i>,
    ) -> std::result::Result<PseudoElement, ParseError<'i, Self::Error>> {
        Ok(PseudoElement(name.to_ascii_lowercase().into()))
    }

    fn parse_functional_pseudo_element<'t>(
        &self,
        name: CowRcStr<'i>,
        arguments: &mut Parser<'i, 't>,
    ) -> std::result::Result<PseudoElement, ParseError<'i, Self::Error>> {
        while arguments.next().is_ok() {}
        Ok(PseudoElement(name.to_ascii_lowercase().into()))
    }

    fn namespace_for_prefix(&self, prefix: &IdentStr) -> Option<CssNamespace> {
        let ns = match prefix.0.as_str() {
            "svg" => ns!(svg),
            "html" => ns!(html),
            "xlink" => ns!(xlink),
            "xml" => ns!(xml),
            _ => return None,
        };
        Some(CssNamespace(ns))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strip(s: &str) -> (String, bool) {
        strip_pseudo_classes(s)
    }

    #[test]
    fn test_strip_leaves_plain_selectors_alone() {
        assert_eq!(strip("rect"), ("rect".to_string(), false));
        assert_eq!(strip("g > rect.a#b"), ("g > rect.a#b".to_string(), false));
        assert_eq!(
            strip(r#"rect[fill="red"], circle"#),
            (r#"rect[fill="red"], circle"#.to_string(), false)
        );
    }

    #[test]
    fn test_strip_removes_pseudo_classes() {
        assert_eq!(strip("a:hover"), ("a".to_string(), true));
        assert_eq!(strip("g:first-child > rect"), ("g > rect".to_string(), true));
        assert_eq!(strip("text:lang(en)"), ("text".to_string(), true));
        assert_eq!(strip("rect:not(.a, .b)"), ("rect".to_string(), true));
    }

    #[test]
    fn test_strip_fills_empty_compounds() {
        assert_eq!(strip(":hover"), ("*".to_string(), true));
        assert_eq!(strip("g :focus"), ("g *".to_string(), true));
        assert_eq!(strip("rect, :active"), ("rect, *".to_string(), true));
        assert_eq!(strip("g>:first-child"), ("g>*".to_string(), true));
    }

    #[test]
    fn test_strip_keeps_pseudo_elements() {
        assert_eq!(strip("text::first-line"), ("text::first-line".to_string(), false));
        assert_eq!(strip("text:before"), ("text".to_string(), true));
    }

    #[test]
    fn test_stripped_selectors_compile() {
        let engine = ServoSelectorEngine;
        for selector in ["a:hover", ":hover", "g :focus", "rect, :active"] {
            let (stripped, _) = strip(selector);
            assert!(engine.compile(&stripped).is_some(), "{stripped}");
        }
    }

    #[test]
    fn test_specificity_keeps_pseudo_classes() {
        let engine = ServoSelectorEngine;
        assert_eq!(
            engine.specificity("a:hover").unwrap(),
            Specificity::new(0, 1, 1)
        );
        assert_eq!(
            engine.specificity("rect:not(#x)").unwrap(),
            Specificity::new(1, 0, 1)
        );
    }

    #[test]
    fn test_specificity_of_malformed_selector_is_an_error() {
        let err = ServoSelectorEngine.specificity("rect >").unwrap_err();
        assert!(matches!(err, StyleError::StylesheetParse { .. }));
    }

    #[test]
    fn test_namespace_prefixes() {
        let engine = ServoSelectorEngine;
        assert!(engine.compile("svg|rect").is_some());
        assert!(engine.compile("foo|rect").is_none());
    }

    #[test]
    fn test_shared_caches_agree_with_fresh_ones() {
        let dom = crate::dom::parse_xml(
            r#"<svg xmlns="http://www.w3.org/2000/svg">
                <g class="a"><rect/><circle id="c"/><rect class="b"/></g>
            </svg>"#,
        )
        .unwrap();
        let engine = ServoSelectorEngine;
        let lists: Vec<_> = [
            "rect:nth-child(1)",
            "rect:nth-last-child(1)",
            ".a > *:nth-of-type(2)",
            "circle",
            "#c ~ rect",
        ]
        .iter()
        .map(|s| engine.compile(s).unwrap())
        .collect();

        for id in dom.elements() {
            let mut shared = SelectorCaches::default();
            for compiled in &lists {
                let element = ElementRef::new(&dom, id);
                assert_eq!(
                    engine.matches(element, compiled, &mut shared),
                    engine.matches(element, compiled, &mut SelectorCaches::default()),
                    "{} / {compiled:?}",
                    dom.describe(id)
                );
            }
        }
    }

    #[test]
    fn test_uncompilable_selector() {
        assert!(ServoSelectorEngine.compile("rect >").is_none());
        assert!(ServoSelectorEngine.compile("").is_none());
    }
}
