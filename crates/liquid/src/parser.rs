//! Turns lexer tokens into a [`Template`] AST.
//!
//! The parser owns the registries: built-in control tags are matched by
//! name here, and anything else is looked up in the [`TagRegistry`] the
//! dialect populated. Block factories consume their bodies through
//! [`Parser::parse_until`].

use crate::ast::{ForNode, IfBranch, Node, Template, WhenArm};
use crate::error::LiquidError;
use crate::expr::{
    parse_assign_head, parse_expression, parse_filtered, parse_for_head, parse_when_values,
};
use crate::filters::{Filter, FilterRegistry};
use crate::lexer::{RawToken, tokenize};
use crate::tags::{TagFactory, TagRegistry};
use std::collections::VecDeque;
use std::sync::Arc;

/// The stream of raw tokens a parse consumes.
#[derive(Debug)]
pub struct TokenStream {
    tokens: VecDeque<RawToken>,
}

impl TokenStream {
    fn new(tokens: Vec<RawToken>) -> Self {
        Self {
            tokens: tokens.into(),
        }
    }

    pub fn next(&mut self) -> Option<RawToken> {
        self.tokens.pop_front()
    }
}

/// A terminator tag encountered by [`Parser::parse_until`].
#[derive(Debug, Clone, PartialEq)]
pub struct EndTag {
    pub name: String,
    pub markup: String,
}

/// The template parser: lexes source, builds the AST, and dispatches
/// registered custom tags.
#[derive(Debug, Default)]
pub struct Parser {
    tags: TagRegistry,
    filters: Arc<FilterRegistry>,
}

impl Parser {
    /// Creates a parser with the generic built-in filters and no custom
    /// tags.
    pub fn new() -> Self {
        Self {
            tags: TagRegistry::new(),
            filters: Arc::new(FilterRegistry::default()),
        }
    }

    /// Registers a custom tag factory.
    pub fn register_tag(&mut self, name: &str, factory: Arc<dyn TagFactory>) {
        self.tags.register(name, factory);
    }

    /// Registers (or replaces) a filter.
    pub fn register_filter(&mut self, name: &str, filter: Filter) {
        Arc::make_mut(&mut self.filters).register(name, filter);
    }

    pub fn filters(&self) -> &Arc<FilterRegistry> {
        &self.filters
    }

    /// Parses template source into a reusable AST.
    pub fn parse(&self, source: &str) -> Result<Template, LiquidError> {
        let tokens = tokenize(source)?;
        let mut stream = TokenStream::new(tokens);
        let (nodes, end) = self.parse_until(&mut stream, &[])?;
        if let Some(end) = end {
            return Err(LiquidError::UnexpectedTag(end.name));
        }
        Ok(Template { nodes })
    }

    /// Parses nodes until one of `terminators` (or end of input) is hit.
    /// Returns the nodes and the terminator found, if any.
    pub fn parse_until(
        &self,
        stream: &mut TokenStream,
        terminators: &[&str],
    ) -> Result<(Vec<Node>, Option<EndTag>), LiquidError> {
        let mut nodes = Vec::new();

        while let Some(token) = stream.next() {
            match token {
                RawToken::Text(text) => nodes.push(Node::Text(text)),
                RawToken::Output { markup } => {
                    nodes.push(Node::Output(parse_filtered(&markup)?));
                }
                RawToken::Tag { name, markup } => {
                    if terminators.contains(&name.as_str()) {
                        return Ok((nodes, Some(EndTag { name, markup })));
                    }
                    nodes.push(self.parse_tag(&name, &markup, stream)?);
                }
            }
        }

        if terminators.is_empty() {
            Ok((nodes, None))
        } else {
            Err(LiquidError::UnclosedTag(terminators[0].to_string()))
        }
    }

    fn parse_tag(
        &self,
        name: &str,
        markup: &str,
        stream: &mut TokenStream,
    ) -> Result<Node, LiquidError> {
        match name {
            "if" => self.parse_if(markup, stream),
            "unless" => self.parse_unless(markup, stream),
            "for" => self.parse_for(markup, stream),
            "assign" => {
                let (target, value) = parse_assign_head(markup)?;
                Ok(Node::Assign { target, value })
            }
            "capture" => {
                let target = markup.trim().to_string();
                if target.is_empty() {
                    return Err(LiquidError::Parse("capture needs a name".to_string()));
                }
                let (body, end) = self.parse_until(stream, &["endcapture"])?;
                debug_assert!(end.is_some());
                Ok(Node::Capture { target, body })
            }
            "case" => self.parse_case(markup, stream),
            "comment" => {
                self.skip_until(stream, "endcomment")?;
                Ok(Node::Text(String::new()))
            }
            other => match self.tags.get(other) {
                Some(factory) => {
                    let factory = Arc::clone(factory);
                    Ok(Node::Custom(factory.parse(markup, self, stream)?))
                }
                None => Err(LiquidError::UnknownTag(other.to_string())),
            },
        }
    }

    fn parse_if(&self, markup: &str, stream: &mut TokenStream) -> Result<Node, LiquidError> {
        let mut branches = Vec::new();
        let mut else_body = None;
        let mut condition = parse_expression(markup)?;

        loop {
            let (body, end) = self.parse_until(stream, &["elsif", "else", "endif"])?;
            let end = end.ok_or_else(|| LiquidError::UnclosedTag("if".to_string()))?;
            branches.push(IfBranch { condition, body });
            match end.name.as_str() {
                "elsif" => condition = parse_expression(&end.markup)?,
                "else" => {
                    let (body, _) = self.parse_until(stream, &["endif"])?;
                    else_body = Some(body);
                    break;
                }
                _ => break,
            }
        }
        Ok(Node::If {
            branches,
            else_body,
        })
    }

    fn parse_unless(&self, markup: &str, stream: &mut TokenStream) -> Result<Node, LiquidError> {
        let condition = parse_expression(markup)?;
        let (body, end) = self.parse_until(stream, &["else", "endunless"])?;
        let end = end.ok_or_else(|| LiquidError::UnclosedTag("unless".to_string()))?;
        let else_body = if end.name == "else" {
            let (body, _) = self.parse_until(stream, &["endunless"])?;
            Some(body)
        } else {
            None
        };
        Ok(Node::Unless {
            condition,
            body,
            else_body,
        })
    }

    fn parse_for(&self, markup: &str, stream: &mut TokenStream) -> Result<Node, LiquidError> {
        let head = parse_for_head(markup)?;
        let limit = head
            .params
            .into_iter()
            .find(|(key, _)| key == "limit")
            .map(|(_, expr)| expr);

        let (body, end) = self.parse_until(stream, &["else", "endfor"])?;
        let end = end.ok_or_else(|| LiquidError::UnclosedTag("for".to_string()))?;
        let else_body = if end.name == "else" {
            let (body, _) = self.parse_until(stream, &["endfor"])?;
            Some(body)
        } else {
            None
        };

        Ok(Node::For(ForNode {
            var: head.var,
            iterable: head.iterable,
            limit,
            body,
            else_body,
        }))
    }

    fn parse_case(&self, markup: &str, stream: &mut TokenStream) -> Result<Node, LiquidError> {
        let subject = parse_expression(markup)?;
        // Whatever sits between `case` and the first `when` is dead
        // whitespace by grammar; discard it.
        let (_, first) = self.parse_until(stream, &["when", "else", "endcase"])?;
        let mut end = first.ok_or_else(|| LiquidError::UnclosedTag("case".to_string()))?;

        let mut whens = Vec::new();
        let mut else_body = None;
        loop {
            match end.name.as_str() {
                "when" => {
                    let values = parse_when_values(&end.markup)?;
                    let (body, next) = self.parse_until(stream, &["when", "else", "endcase"])?;
                    whens.push(WhenArm { values, body });
                    end = next.ok_or_else(|| LiquidError::UnclosedTag("case".to_string()))?;
                }
                "else" => {
                    let (body, next) = self.parse_until(stream, &["endcase"])?;
                    debug_assert!(next.is_some());
                    else_body = Some(body);
                    break;
                }
                _ => break,
            }
        }
        Ok(Node::Case {
            subject,
            whens,
            else_body,
        })
    }

    /// Skips tokens up to a closing tag without parsing them; comment and
    /// metadata bodies may contain markup that is not valid Liquid.
    pub fn skip_until(&self, stream: &mut TokenStream, closer: &str) -> Result<(), LiquidError> {
        while let Some(token) = stream.next() {
            if let RawToken::Tag { name, .. } = token
                && name == closer
            {
                return Ok(());
            }
        }
        Err(LiquidError::UnclosedTag(
            closer.trim_start_matches("end").to_string(),
        ))
    }
}
