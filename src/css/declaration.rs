//! CSS declarations and declaration-list parsing.

use cssparser::{
    AtRuleParser, CowRcStr, DeclarationParser, ParseError, Parser, ParserInput, ParserState,
    QualifiedRuleParser, RuleBodyItemParser, RuleBodyParser, Token,
};

use crate::error::StyleError;

/// A CSS declaration (`name: value [!important]`).
///
/// The value is kept as authored, minus surrounding whitespace and the
/// `!important` marker. Property names are lowercased except for custom
/// properties.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Declaration {
    pub name: String,
    pub value: String,
    pub important: bool,
}

impl Declaration {
    pub fn new(name: impl Into<String>, value: impl Into<String>, important: bool) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            important,
        }
    }
}

/// Parse the body of a style rule. The first invalid declaration aborts.
pub(crate) fn parse_declaration_block<'i>(
    input: &mut Parser<'i, '_>,
) -> Result<Vec<Declaration>, ParseError<'i, StyleError>> {
    let mut declarations = Vec::new();
    let mut parser = DeclarationListParser {
        declarations: &mut declarations,
    };
    for result in RuleBodyParser::new(input, &mut parser) {
        result.map_err(|(error, _slice)| error)?;
    }
    Ok(declarations)
}

/// Parse a `style` attribute.
///
/// Inline styles are parsed leniently: an invalid declaration is dropped and
/// the rest still apply.
pub fn parse_inline_style(style: &str) -> Vec<Declaration> {
    let mut parser_input = ParserInput::new(style);
    let mut input = Parser::new(&mut parser_input);
    let mut declarations = Vec::new();
    let mut parser = DeclarationListParser {
        declarations: &mut declarations,
    };
    for result in RuleBodyParser::new(&mut input, &mut parser) {
        if let Err((error, slice)) = result {
            log::debug!("skipping invalid inline declaration `{slice}`: {:?}", error.kind);
        }
    }
    declarations
}

struct DeclarationListParser<'a> {
    declarations: &'a mut Vec<Declaration>,
}

impl<'i> DeclarationParser<'i> for DeclarationListParser<'_> {
    type Declaration = ();
    type Error = StyleError;

    fn parse_value<'t>(
        &mut self,
        name: CowRcStr<'i>,
        input: &mut Parser<'i, 't>,
        _start: &ParserState,
    ) -> Result<Self::Declaration, ParseError<'i, Self::Error>> {
        let name = if name.starts_with("--") {
            name.to_string()
        } else {
            name.to_ascii_lowercase()
        };

        let start = input.position();
        let mut end = start;
        let mut important = false;
        while !input.is_exhausted() {
            if input.try_parse(cssparser::parse_important).is_ok() {
                important = true;
                input.expect_exhausted()?;
                break;
            }
            let opens_block = matches!(
                input.next()?,
                Token::Function(_)
                    | Token::ParenthesisBlock
                    | Token::SquareBracketBlock
                    | Token::CurlyBracketBlock
            );
            if opens_block {
                input.parse_nested_block(|block| {
                    while block.next().is_ok() {}
                    Ok::<(), ParseError<'i, StyleError>>(())
                })?;
            }
            end = input.position();
        }

        let value = input.slice(start..end).trim().to_string();
        self.declarations.push(Declaration {
            name,
            value,
            important,
        });
        Ok(())
    }
}

impl<'i> AtRuleParser<'i> for DeclarationListParser<'_> {
    type Prelude = ();
    type AtRule = ();
    type Error = StyleError;
}

impl<'i> QualifiedRuleParser<'i> for DeclarationListParser<'_> {
    type Prelude = ();
    type QualifiedRule = ();
    type Error = StyleError;
}

impl<'i> RuleBodyItemParser<'i, (), StyleError> for DeclarationListParser<'_> {
    fn parse_declarations(&self) -> bool {
        true
    }

    fn parse_qualified(&self) -> bool {
        false
    }
}
