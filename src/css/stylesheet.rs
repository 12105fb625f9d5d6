//! Stylesheet extraction, rule normalization and cascade ordering.
//!
//! A document's `<style>` elements are parsed into [`StyleRule`]s, sorted by
//! specificity and compiled into a [`RuleSet`] that the resolver reads.

use cssparser::{
    AtRuleParser, CowRcStr, ParseError, ParseErrorKind, Parser, ParserInput, ParserState,
    QualifiedRuleParser, SourceLocation, StyleSheetParser, match_ignore_ascii_case,
};

use super::declaration::{Declaration, parse_declaration_block};
use super::selector::{SelectorEngine, ServoSelectorEngine, strip_pseudo_classes};
use super::specificity::Specificity;
use crate::dom::{ArenaDom, ElementRef};
use crate::error::{Result, StyleError};

/// A normalized style rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyleRule {
    /// Selector list with pseudo-classes removed, used for matching.
    pub selector: String,
    /// Specificity of the selector list as written.
    pub specificity: Specificity,
    pub declarations: Vec<Declaration>,
    /// The rule depends on state a static pass cannot see: a pseudo-class
    /// or an enclosing conditional at-rule.
    pub dynamic: bool,
}

/// Collect the text of every `<style>` element, in document order.
///
/// Elements with a `type` other than `text/css` are skipped, as are
/// elements with no text.
pub fn extract_stylesheets(dom: &ArenaDom) -> Vec<String> {
    dom.elements()
        .filter(|&id| {
            dom.element_name(id)
                .is_some_and(|name| name.as_ref() == "style")
        })
        .filter(|&id| {
            dom.get_attr(id, "type").is_none_or(|ty| {
                let ty = ty.trim();
                ty.is_empty() || ty.eq_ignore_ascii_case("text/css")
            })
        })
        .map(|id| dom.child_text(id))
        .filter(|css| !css.trim().is_empty())
        .collect()
}

/// Parse a stylesheet into rules in source order.
pub fn parse_stylesheet(css: &str) -> Result<Vec<StyleRule>> {
    parse_stylesheet_with(css, &ServoSelectorEngine)
}

/// Parse a stylesheet, computing specificity with `engine`.
///
/// Any malformed rule fails the whole stylesheet. A well-formed selector the
/// engine cannot parse is kept with a token-level specificity and will not
/// match.
pub fn parse_stylesheet_with<E: SelectorEngine>(css: &str, engine: &E) -> Result<Vec<StyleRule>> {
    let mut input = ParserInput::new(css);
    let mut parser = Parser::new(&mut input);
    let mut rules = Vec::new();

    let mut rule_parser = TopLevelRuleParser {
        engine,
        rules: &mut rules,
        conditional: false,
    };
    for result in StyleSheetParser::new(&mut parser, &mut rule_parser) {
        if let Err((error, _slice)) = result {
            return Err(match error.kind {
                ParseErrorKind::Custom(custom) => custom,
                ParseErrorKind::Basic(_) => StyleError::stylesheet(css, &error),
            });
        }
    }

    Ok(rules)
}

/// Order rules for the cascade: ascending specificity, ties in source order.
pub fn sort_rules(mut rules: Vec<StyleRule>) -> Vec<StyleRule> {
    rules.sort_by(|a, b| a.specificity.cmp(&b.specificity));
    rules
}

/// Sorted rules of a document with their compiled selectors.
///
/// Built once per document and shared read-only by every style query.
pub struct RuleSet<E: SelectorEngine = ServoSelectorEngine> {
    rules: Vec<StyleRule>,
    compiled: Vec<Option<E::Compiled>>,
    engine: E,
}

impl RuleSet {
    /// Parse a stylesheet with the default selector engine.
    pub fn parse(css: &str) -> Result<Self> {
        Self::parse_with(css, ServoSelectorEngine)
    }

    /// Collect and parse every stylesheet of a document.
    pub fn from_document(dom: &ArenaDom) -> Result<Self> {
        Self::from_document_with(dom, ServoSelectorEngine)
    }
}

impl<E: SelectorEngine> RuleSet<E> {
    /// Sort and compile already normalized rules.
    pub fn from_rules(rules: Vec<StyleRule>, engine: E) -> Self {
        let rules = sort_rules(rules);
        let compiled: Vec<_> = rules
            .iter()
            .map(|rule| engine.compile(&rule.selector))
            .collect();

        log::debug!(
            "rule set: {} rules, {} dynamic, {} unmatchable",
            rules.len(),
            rules.iter().filter(|rule| rule.dynamic).count(),
            compiled.iter().filter(|c| c.is_none()).count()
        );

        Self {
            rules,
            compiled,
            engine,
        }
    }

    pub fn parse_with(css: &str, engine: E) -> Result<Self> {
        let rules = parse_stylesheet_with(css, &engine)?;
        Ok(Self::from_rules(rules, engine))
    }

    pub fn from_document_with(dom: &ArenaDom, engine: E) -> Result<Self> {
        let mut rules = Vec::new();
        for css in extract_stylesheets(dom) {
            rules.extend(parse_stylesheet_with(&css, &engine)?);
        }
        Ok(Self::from_rules(rules, engine))
    }

    /// Rules in cascade order.
    pub fn rules(&self) -> &[StyleRule] {
        &self.rules
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Rules whose selector matches `element`, in cascade order.
    ///
    /// One set of engine caches serves every rule of the query.
    pub fn matching<'a>(&'a self, element: ElementRef<'a>) -> impl Iterator<Item = &'a StyleRule> {
        let mut caches = E::Caches::default();
        self.rules
            .iter()
            .zip(&self.compiled)
            .filter_map(move |(rule, compiled)| {
                let compiled = compiled.as_ref()?;
                self.engine
                    .matches(element, compiled, &mut caches)
                    .then_some(rule)
            })
    }
}

impl<E: SelectorEngine + std::fmt::Debug> std::fmt::Debug for RuleSet<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RuleSet")
            .field("rules", &self.rules)
            .field("engine", &self.engine)
            .finish()
    }
}

// =============================================================================
// CSS Parser Implementation
// =============================================================================

struct TopLevelRuleParser<'a, E> {
    engine: &'a E,
    rules: &'a mut Vec<StyleRule>,
    /// Inside a grouping at-rule whose condition is unknown.
    conditional: bool,
}

enum AtRulePrelude {
    /// `@media`, `@supports` and friends: rules inside still apply,
    /// conditionally.
    Group,
    /// Anything else. Its contents are not style rules.
    Ignore,
}

struct SelectorPrelude {
    text: String,
    specificity: Specificity,
}

impl<'i, E: SelectorEngine> AtRuleParser<'i> for TopLevelRuleParser<'_, E> {
    type Prelude = AtRulePrelude;
    type AtRule = ();
    type Error = StyleError;

    fn parse_prelude<'t>(
        &mut self,
        name: CowRcStr<'i>,
        input: &mut Parser<'i, 't>,
    ) -> std::result::Result<Self::Prelude, ParseError<'i, Self::Error>> {
        while input.next().is_ok() {}
        let prelude = match_ignore_ascii_case! { &*name,
            "media" | "supports" | "document" | "-moz-document" | "container" | "layer"
                | "scope" | "starting-style" => AtRulePrelude::Group,
            _ => AtRulePrelude::Ignore,
        };
        Ok(prelude)
    }

    fn rule_without_block(
        &mut self,
        _prelude: Self::Prelude,
        _start: &ParserState,
    ) -> std::result::Result<Self::AtRule, ()> {
        // @import, @charset, @namespace, `@layer a, b;`
        Ok(())
    }

    fn parse_block<'t>(
        &mut self,
        prelude: Self::Prelude,
        _start: &ParserState,
        input: &mut Parser<'i, 't>,
    ) -> std::result::Result<Self::AtRule, ParseError<'i, Self::Error>> {
        match prelude {
            AtRulePrelude::Ignore => {
                while input.next().is_ok() {}
            }
            AtRulePrelude::Group => {
                let mut nested = TopLevelRuleParser {
                    engine: self.engine,
                    rules: &mut *self.rules,
                    conditional: true,
                };
                for result in StyleSheetParser::new(input, &mut nested) {
                    result.map_err(|(error, _slice)| error)?;
                }
            }
        }
        Ok(())
    }
}

impl<'i, E: SelectorEngine> QualifiedRuleParser<'i> for TopLevelRuleParser<'_, E> {
    type Prelude = SelectorPrelude;
    type QualifiedRule = ();
    type Error = StyleError;

    fn parse_prelude<'t>(
        &mut self,
        input: &mut Parser<'i, 't>,
    ) -> std::result::Result<Self::Prelude, ParseError<'i, Self::Error>> {
        let location = input.current_source_location();
        let start = input.position();
        while input.next().is_ok() {}
        let text = input.slice_from(start).trim();

        // A well-formed selector the engine refuses keeps its rule and never
        // matches; only text that is no selector list at all is fatal.
        let specificity = match self.engine.specificity(text) {
            Ok(specificity) => specificity,
            Err(e) => match Specificity::estimate(text) {
                Some(specificity) => {
                    log::debug!("selector `{text}` not supported, estimated {specificity}: {e}");
                    specificity
                }
                None => return Err(located(location, e)),
            },
        };

        Ok(SelectorPrelude {
            text: text.to_string(),
            specificity,
        })
    }

    fn parse_block<'t>(
        &mut self,
        prelude: Self::Prelude,
        _start: &ParserState,
        input: &mut Parser<'i, 't>,
    ) -> std::result::Result<Self::QualifiedRule, ParseError<'i, Self::Error>> {
        let declarations = parse_declaration_block(input)?;
        let (selector, stripped) = strip_pseudo_classes(&prelude.text);

        self.rules.push(StyleRule {
            selector,
            specificity: prelude.specificity,
            declarations,
            dynamic: self.conditional || stripped,
        });
        Ok(())
    }
}

fn located<'i>(location: SourceLocation, error: StyleError) -> ParseError<'i, StyleError> {
    location.new_custom_error(error.relocate(location))
}
