//! The expression sub-language: literals, variable paths, comparisons and
//! filter chains.
//!
//! Parsed with `nom`, in the same manner as the JPath expression parser
//! this engine descends from.

use crate::error::LiquidError;
use nom::{
    IResult, Parser,
    branch::alt,
    bytes::complete::{is_not, tag, take_while, take_while1},
    character::complete::{char, multispace0},
    combinator::{map, opt, recognize, value},
    multi::{many0, separated_list0, separated_list1},
    sequence::{delimited, pair, preceded, separated_pair},
};
use serde_json::{Number, Value, json};

// --- AST ---

/// An expression evaluated against the render context.
#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    Literal(Value),
    /// A variable path like `product.images[0].src`.
    Path(Vec<PathSegment>),
    BinaryOp {
        op: BinaryOperator,
        left: Box<Expression>,
        right: Box<Expression>,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub enum PathSegment {
    Key(String),
    Index(usize),
    /// A bracket segment whose key is only known at render time, e.g.
    /// `section.blocks[block_id]`.
    Dynamic(Box<Expression>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOperator {
    Equals,
    NotEquals,
    LessThan,
    LessThanOrEqual,
    GreaterThan,
    GreaterThanOrEqual,
    Contains,
    And,
    Or,
}

/// An expression plus its trailing filter chain, as written in output
/// markup or an `assign` tag.
#[derive(Debug, Clone, PartialEq)]
pub struct FilteredExpression {
    pub expr: Expression,
    pub filters: Vec<FilterCall>,
}

/// One `| name: arg, key: arg` element of a filter chain.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterCall {
    pub name: String,
    pub args: Vec<Expression>,
    pub kwargs: Vec<(String, Expression)>,
}

// --- Main Public Parsers ---

/// Parses a bare expression (a tag condition, a `for` iterable, ...).
pub fn parse_expression(input: &str) -> Result<Expression, LiquidError> {
    finish(input, expression(input.trim()))
}

/// Parses an expression with an optional filter chain (output markup,
/// `assign` right-hand sides).
pub fn parse_filtered(input: &str) -> Result<FilteredExpression, LiquidError> {
    finish(input, filtered_expression(input.trim()))
}

/// Parses a tag argument list: leading positional expressions followed by
/// `key: value` pairs, comma separated. Used by dialect tags such as
/// `render` and `content_for`.
pub fn parse_tag_arguments(
    input: &str,
) -> Result<(Vec<Expression>, Vec<(String, Expression)>), LiquidError> {
    finish(input, tag_arguments(input.trim()))
}

fn finish<O>(input: &str, result: IResult<&str, O>) -> Result<O, LiquidError> {
    match result {
        Ok(("", parsed)) => Ok(parsed),
        Ok((rem, _)) => Err(LiquidError::ExprParse(
            input.to_string(),
            format!("parser did not consume all input, remainder: '{rem}'"),
        )),
        Err(e) => Err(LiquidError::ExprParse(input.to_string(), e.to_string())),
    }
}

// --- Combinators & Helpers ---

fn ws<'a, F, O, E>(inner: F) -> impl Parser<&'a str, Output = O, Error = E>
where
    F: Parser<&'a str, Output = O, Error = E>,
    E: nom::error::ParseError<&'a str>,
{
    delimited(multispace0, inner, multispace0)
}

fn identifier(input: &str) -> IResult<&str, &str> {
    recognize(pair(
        take_while1(|c: char| c.is_alphabetic() || c == '_'),
        take_while(|c: char| c.is_alphanumeric() || c == '_'),
    ))
    .parse(input)
}

// --- Literal Parsers ---

fn string_literal(input: &str) -> IResult<&str, Value> {
    alt((
        map(
            delimited(char('\''), opt(is_not("'")), char('\'')),
            |s: Option<&str>| json!(s.unwrap_or("")),
        ),
        map(
            delimited(char('"'), opt(is_not("\"")), char('"')),
            |s: Option<&str>| json!(s.unwrap_or("")),
        ),
    ))
    .parse(input)
}

fn number_literal(input: &str) -> IResult<&str, Value> {
    let (rest, text) = recognize((
        opt(char('-')),
        take_while1(|c: char| c.is_ascii_digit()),
        opt(pair(char('.'), take_while1(|c: char| c.is_ascii_digit()))),
    ))
    .parse(input)?;

    let value = if text.contains('.') {
        text.parse::<f64>()
            .ok()
            .and_then(Number::from_f64)
            .map(Value::Number)
            .unwrap_or(Value::Null)
    } else {
        text.parse::<i64>()
            .map(|n| Value::Number(n.into()))
            .unwrap_or(Value::Null)
    };
    Ok((rest, value))
}

fn keyword_literal(input: &str) -> IResult<&str, Value> {
    // Keyword literals must not swallow the head of a longer identifier
    // such as `nilable`, so the match is re-checked against a full ident.
    let (rest, ident) = identifier(input)?;
    let parsed = match ident {
        "true" => Some(json!(true)),
        "false" => Some(json!(false)),
        "nil" | "null" | "empty" | "blank" => Some(Value::Null),
        _ => None,
    };
    match parsed {
        Some(v) => Ok((rest, v)),
        None => Err(nom::Err::Error(nom::error::Error::new(
            input,
            nom::error::ErrorKind::Tag,
        ))),
    }
}

fn literal(input: &str) -> IResult<&str, Value> {
    alt((string_literal, number_literal, keyword_literal)).parse(input)
}

// --- Path Parser ---

fn key_segment(input: &str) -> IResult<&str, PathSegment> {
    map(preceded(char('.'), identifier), |s| {
        PathSegment::Key(s.to_string())
    })
    .parse(input)
}

fn index_segment(input: &str) -> IResult<&str, PathSegment> {
    delimited(
        char('['),
        ws(alt((
            map(take_while1(|c: char| c.is_ascii_digit()), |digits: &str| {
                PathSegment::Index(digits.parse().unwrap_or(0))
            }),
            map(string_literal, |v| {
                PathSegment::Key(v.as_str().unwrap_or_default().to_string())
            }),
            map(expression, |e| PathSegment::Dynamic(Box::new(e))),
        ))),
        char(']'),
    )
    .parse(input)
}

fn path(input: &str) -> IResult<&str, Expression> {
    map(
        pair(identifier, many0(alt((key_segment, index_segment)))),
        |(head, mut rest)| {
            let mut segments = vec![PathSegment::Key(head.to_string())];
            segments.append(&mut rest);
            Expression::Path(segments)
        },
    )
    .parse(input)
}

// --- Expression Parsers (in order of precedence) ---

fn atom(input: &str) -> IResult<&str, Expression> {
    alt((map(literal, Expression::Literal), path)).parse(input)
}

fn comparison_op(input: &str) -> IResult<&str, BinaryOperator> {
    alt((
        value(BinaryOperator::Equals, tag("==")),
        value(BinaryOperator::NotEquals, tag("!=")),
        value(BinaryOperator::LessThanOrEqual, tag("<=")),
        value(BinaryOperator::GreaterThanOrEqual, tag(">=")),
        value(BinaryOperator::LessThan, tag("<")),
        value(BinaryOperator::GreaterThan, tag(">")),
        value(BinaryOperator::Contains, tag("contains")),
    ))
    .parse(input)
}

fn comparison(input: &str) -> IResult<&str, Expression> {
    let (input, left) = atom(input)?;
    let (input, rest) = opt(pair(ws(comparison_op), atom)).parse(input)?;
    match rest {
        Some((op, right)) => Ok((
            input,
            Expression::BinaryOp {
                op,
                left: Box::new(left),
                right: Box::new(right),
            },
        )),
        None => Ok((input, left)),
    }
}

fn fold_binary<'a, F, G>(
    sub: F,
    op_parser: G,
) -> impl FnMut(&'a str) -> IResult<&'a str, Expression>
where
    F: Parser<&'a str, Output = Expression, Error = nom::error::Error<&'a str>> + Clone,
    G: Parser<&'a str, Output = BinaryOperator, Error = nom::error::Error<&'a str>> + Clone,
{
    move |input: &str| {
        let (input, mut left) = sub.clone().parse(input)?;
        let (input, rest) = many0(pair(ws(op_parser.clone()), sub.clone())).parse(input)?;
        for (op, right) in rest {
            left = Expression::BinaryOp {
                op,
                left: Box::new(left),
                right: Box::new(right),
            };
        }
        Ok((input, left))
    }
}

fn and_op(input: &str) -> IResult<&str, BinaryOperator> {
    value(BinaryOperator::And, tag("and")).parse(input)
}

fn or_op(input: &str) -> IResult<&str, BinaryOperator> {
    value(BinaryOperator::Or, tag("or")).parse(input)
}

fn and_expr(input: &str) -> IResult<&str, Expression> {
    fold_binary(comparison, and_op)(input)
}

fn expression(input: &str) -> IResult<&str, Expression> {
    fold_binary(and_expr, or_op)(input)
}

// --- Filter Chain Parsers ---

fn kwarg(input: &str) -> IResult<&str, (String, Expression)> {
    map(
        separated_pair(identifier, ws(char(':')), expression),
        |(k, v)| (k.to_string(), v),
    )
    .parse(input)
}

fn filter_argument(input: &str) -> IResult<&str, FilterArg> {
    alt((
        map(kwarg, |(k, v)| FilterArg::Named(k, v)),
        map(expression, FilterArg::Positional),
    ))
    .parse(input)
}

enum FilterArg {
    Positional(Expression),
    Named(String, Expression),
}

fn filter_call(input: &str) -> IResult<&str, FilterCall> {
    let (input, name) = ws(identifier).parse(input)?;
    let (input, raw_args) = opt(preceded(
        ws(char(':')),
        separated_list1(ws(char(',')), filter_argument),
    ))
    .parse(input)?;

    let mut args = Vec::new();
    let mut kwargs = Vec::new();
    for arg in raw_args.unwrap_or_default() {
        match arg {
            FilterArg::Positional(e) => args.push(e),
            FilterArg::Named(k, e) => kwargs.push((k, e)),
        }
    }
    Ok((
        input,
        FilterCall {
            name: name.to_string(),
            args,
            kwargs,
        },
    ))
}

fn filtered_expression(input: &str) -> IResult<&str, FilteredExpression> {
    map(
        pair(ws(expression), many0(preceded(char('|'), filter_call))),
        |(expr, filters)| FilteredExpression { expr, filters },
    )
    .parse(input)
}

// --- Tag Head Parsers ---

/// The parsed head of a `{% for %}` tag.
#[derive(Debug, Clone, PartialEq)]
pub struct ForHead {
    pub var: String,
    pub iterable: Expression,
    /// Trailing `limit: n`-style parameters, space separated.
    pub params: Vec<(String, Expression)>,
}

/// Parses `item in collection limit: 3`.
pub fn parse_for_head(input: &str) -> Result<ForHead, LiquidError> {
    finish(input, for_head(input.trim()))
}

fn for_head(input: &str) -> IResult<&str, ForHead> {
    map(
        (
            identifier,
            ws(tag("in")),
            expression,
            many0(ws(kwarg)),
        ),
        |(var, _, iterable, params)| ForHead {
            var: var.to_string(),
            iterable,
            params,
        },
    )
    .parse(input)
}

/// Parses `name = expression | filters` for `{% assign %}`.
pub fn parse_assign_head(input: &str) -> Result<(String, FilteredExpression), LiquidError> {
    finish(
        input,
        map(
            separated_pair(identifier, ws(char('=')), filtered_expression),
            |(name, value)| (name.to_string(), value),
        )
        .parse(input.trim()),
    )
}

/// Parses the value list of a `{% when %}` arm: comparisons separated by
/// `or` or commas.
pub fn parse_when_values(input: &str) -> Result<Vec<Expression>, LiquidError> {
    finish(
        input,
        separated_list1(ws(alt((tag("or"), tag(",")))), comparison).parse(input.trim()),
    )
}

// --- Tag Argument List ---

fn tag_arguments(input: &str) -> IResult<&str, (Vec<Expression>, Vec<(String, Expression)>)> {
    map(
        separated_list0(ws(char(',')), filter_argument),
        |raw_args| {
            let mut args = Vec::new();
            let mut kwargs = Vec::new();
            for arg in raw_args {
                match arg {
                    FilterArg::Positional(e) => args.push(e),
                    FilterArg::Named(k, e) => kwargs.push((k, e)),
                }
            }
            (args, kwargs)
        },
    )
    .parse(input)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple_path() {
        let expr = parse_expression("product.title").unwrap();
        assert_eq!(
            expr,
            Expression::Path(vec![
                PathSegment::Key("product".into()),
                PathSegment::Key("title".into())
            ])
        );
    }

    #[test]
    fn test_parse_path_with_index_and_bracket_key() {
        let expr = parse_expression("product.images[0]['src']").unwrap();
        assert_eq!(
            expr,
            Expression::Path(vec![
                PathSegment::Key("product".into()),
                PathSegment::Key("images".into()),
                PathSegment::Index(0),
                PathSegment::Key("src".into()),
            ])
        );
    }

    #[test]
    fn test_parse_literals() {
        assert_eq!(
            parse_expression("'hello'").unwrap(),
            Expression::Literal(json!("hello"))
        );
        assert_eq!(
            parse_expression("42").unwrap(),
            Expression::Literal(json!(42))
        );
        assert_eq!(
            parse_expression("-3.5").unwrap(),
            Expression::Literal(json!(-3.5))
        );
        assert_eq!(
            parse_expression("true").unwrap(),
            Expression::Literal(json!(true))
        );
        assert_eq!(
            parse_expression("nil").unwrap(),
            Expression::Literal(Value::Null)
        );
        assert_eq!(
            parse_expression("''").unwrap(),
            Expression::Literal(json!(""))
        );
    }

    #[test]
    fn test_keyword_does_not_swallow_identifier_head() {
        // `nilable` is a path, not the literal `nil` followed by junk.
        let expr = parse_expression("nilable").unwrap();
        assert_eq!(
            expr,
            Expression::Path(vec![PathSegment::Key("nilable".into())])
        );
    }

    #[test]
    fn test_parse_comparison_and_logic() {
        let expr = parse_expression("a == 1 and b > 2 or c contains 'x'").unwrap();
        // Outermost operator is `or`.
        match expr {
            Expression::BinaryOp {
                op: BinaryOperator::Or,
                ..
            } => {}
            other => panic!("expected top-level or, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_filter_chain() {
        let fe = parse_filtered("product.title | upcase | truncate: 8, '...'").unwrap();
        assert_eq!(fe.filters.len(), 2);
        assert_eq!(fe.filters[0].name, "upcase");
        assert_eq!(fe.filters[1].name, "truncate");
        assert_eq!(fe.filters[1].args.len(), 2);
    }

    #[test]
    fn test_parse_filter_with_kwargs() {
        let fe = parse_filtered("image | image_url: width: 400").unwrap();
        assert_eq!(fe.filters[0].kwargs[0].0, "width");
    }

    #[test]
    fn test_parse_tag_arguments() {
        let (args, kwargs) =
            parse_tag_arguments("'price', product: product, show_vendor: true").unwrap();
        assert_eq!(args, vec![Expression::Literal(json!("price"))]);
        assert_eq!(kwargs.len(), 2);
        assert_eq!(kwargs[0].0, "product");
        assert_eq!(kwargs[1].1, Expression::Literal(json!(true)));
    }

    #[test]
    fn test_parse_rejects_trailing_garbage() {
        assert!(parse_expression("a.b ???").is_err());
    }
}
