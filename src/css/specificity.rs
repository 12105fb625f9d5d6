//! CSS specificity triples.

use std::cmp::Ordering;
use std::fmt;
use std::ops::Add;

use cssparser::{ParseError, Parser, ParserInput, Token, match_ignore_ascii_case};
use selectors::parser::Selector;

use super::selector::SvgSelectors;

/// CSS specificity for cascade ordering: `(ids, classes, elements)`.
///
/// `classes` counts class, attribute and pseudo-class selectors; `elements`
/// counts type selectors and pseudo-elements. Ordering is lexicographic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Specificity {
    pub ids: u16,
    pub classes: u16,
    pub elements: u16,
}

impl Specificity {
    pub const ZERO: Specificity = Specificity::new(0, 0, 0);

    pub const fn new(ids: u16, classes: u16, elements: u16) -> Self {
        Self {
            ids,
            classes,
            elements,
        }
    }

    pub fn from_selector(selector: &Selector<SvgSelectors>) -> Self {
        Self::from_packed(selector.specificity())
    }

    /// Decode the selectors crate's packed form,
    /// `(id << 20) | (class << 10) | elements`.
    pub(crate) fn from_packed(spec: u32) -> Self {
        Self {
            ids: ((spec >> 20) & 0x3FF) as u16,
            classes: ((spec >> 10) & 0x3FF) as u16,
            elements: (spec & 0x3FF) as u16,
        }
    }

    /// Specificity of a selector list read straight from its tokens.
    ///
    /// For well-formed selectors a selector engine refuses, like an unknown
    /// namespace prefix or a vendor pseudo-element with state. Returns `None`
    /// when the text is not a selector list: an empty member, a dangling
    /// combinator or a token no selector can contain.
    pub fn estimate(selectors: &str) -> Option<Self> {
        let mut input = ParserInput::new(selectors);
        let mut parser = Parser::new(&mut input);
        estimate_list(&mut parser, false)
    }
}

impl Add for Specificity {
    type Output = Specificity;

    fn add(self, other: Self) -> Self {
        Self {
            ids: self.ids.saturating_add(other.ids),
            classes: self.classes.saturating_add(other.classes),
            elements: self.elements.saturating_add(other.elements),
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Position {
    Start,
    InCompound,
    AfterSpace,
    AfterCombinator,
}

impl Position {
    fn ends_selector(self) -> bool {
        matches!(self, Position::InCompound | Position::AfterSpace)
    }
}

/// Highest specificity in a comma-separated list. `relative` lets each
/// member start with a combinator, as inside `:has()`.
fn estimate_list(parser: &mut Parser<'_, '_>, relative: bool) -> Option<Specificity> {
    let mut best = None;
    let mut current = Specificity::ZERO;
    let mut position = Position::Start;

    loop {
        let token = match parser.next_including_whitespace() {
            Ok(token) => token.clone(),
            Err(_) => break,
        };
        match token {
            Token::WhiteSpace(_) => {
                if position == Position::InCompound {
                    position = Position::AfterSpace;
                }
            }
            Token::Comma => {
                if !position.ends_selector() {
                    return None;
                }
                best = best.max(Some(current));
                current = Specificity::ZERO;
                position = Position::Start;
            }
            Token::Delim('>' | '+' | '~') => {
                let leading = relative && position == Position::Start;
                if !leading && !position.ends_selector() {
                    return None;
                }
                position = Position::AfterCombinator;
            }
            token => {
                current = current + estimate_simple(parser, &token)?;
                position = Position::InCompound;
            }
        }
    }

    if !position.ends_selector() {
        return None;
    }
    best.max(Some(current))
}

fn estimate_simple(parser: &mut Parser<'_, '_>, token: &Token<'_>) -> Option<Specificity> {
    match token {
        Token::IDHash(_) => Some(Specificity::new(1, 0, 0)),
        Token::SquareBracketBlock => Some(Specificity::new(0, 1, 0)),
        Token::Delim('.') => match parser.next_including_whitespace() {
            Ok(Token::Ident(_)) => Some(Specificity::new(0, 1, 0)),
            _ => None,
        },
        // `|rect`: no namespace
        Token::Delim('|') => type_selector(parser.next_including_whitespace().ok()?),
        Token::Ident(_) | Token::Delim('*') => {
            let state = parser.state();
            if matches!(parser.next_including_whitespace(), Ok(Token::Delim('|'))) {
                type_selector(parser.next_including_whitespace().ok()?)
            } else {
                parser.reset(&state);
                type_selector(token)
            }
        }
        Token::Colon => match parser.next_including_whitespace().ok()?.clone() {
            Token::Colon => match parser.next_including_whitespace() {
                Ok(Token::Ident(_) | Token::Function(_)) => Some(Specificity::new(0, 0, 1)),
                _ => None,
            },
            Token::Ident(_) => Some(Specificity::new(0, 1, 0)),
            Token::Function(name) => match_ignore_ascii_case! { &*name,
                "not" | "is" | "matches" | "-webkit-any" | "-moz-any" => nested(parser, false),
                "has" => nested(parser, true),
                "where" => Some(Specificity::ZERO),
                _ => Some(Specificity::new(0, 1, 0)),
            },
            _ => None,
        },
        _ => None,
    }
}

fn type_selector(token: &Token<'_>) -> Option<Specificity> {
    match token {
        Token::Ident(_) => Some(Specificity::new(0, 0, 1)),
        Token::Delim('*') => Some(Specificity::ZERO),
        _ => None,
    }
}

fn nested<'i>(parser: &mut Parser<'i, '_>, relative: bool) -> Option<Specificity> {
    parser
        .parse_nested_block(|block| Ok::<_, ParseError<'i, ()>>(estimate_list(block, relative)))
        .ok()
        .flatten()
}

impl Ord for Specificity {
    fn cmp(&self, other: &Self) -> Ordering {
        self.ids
            .cmp(&other.ids)
            .then(self.classes.cmp(&other.classes))
            .then(self.elements.cmp(&other.elements))
    }
}

impl PartialOrd for Specificity {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl From<(u16, u16, u16)> for Specificity {
    fn from((ids, classes, elements): (u16, u16, u16)) -> Self {
        Self::new(ids, classes, elements)
    }
}

impl fmt::Display for Specificity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{},{})", self.ids, self.classes, self.elements)
    }
}
