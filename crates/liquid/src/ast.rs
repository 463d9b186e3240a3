//! Abstract syntax tree for parsed templates.
//!
//! A [`Template`] is a flat list of [`Node`]s. Control-flow tags that the
//! generic dialect ships (`if`, `for`, `case`, ...) are first-class
//! variants; everything registered through the tag registry parses into a
//! [`Node::Custom`] trait object.

use crate::expr::{Expression, FilteredExpression};
use crate::tags::Tag;

/// A parsed, reusable template artifact.
#[derive(Debug, Default)]
pub struct Template {
    pub nodes: Vec<Node>,
}

/// One node of a parsed template.
#[derive(Debug)]
pub enum Node {
    /// Literal output text.
    Text(String),
    /// `{{ expression | filters }}`
    Output(FilteredExpression),
    /// `{% if %}` / `{% elsif %}` / `{% else %}`
    If {
        branches: Vec<IfBranch>,
        else_body: Option<Vec<Node>>,
    },
    /// `{% unless %}`
    Unless {
        condition: Expression,
        body: Vec<Node>,
        else_body: Option<Vec<Node>>,
    },
    /// `{% for item in collection %}`
    For(ForNode),
    /// `{% assign name = expression | filters %}`
    Assign {
        target: String,
        value: FilteredExpression,
    },
    /// `{% capture name %}...{% endcapture %}`
    Capture { target: String, body: Vec<Node> },
    /// `{% case %}` / `{% when %}`
    Case {
        subject: Expression,
        whens: Vec<WhenArm>,
        else_body: Option<Vec<Node>>,
    },
    /// A tag supplied by the dialect layer.
    Custom(Box<dyn Tag>),
}

#[derive(Debug)]
pub struct IfBranch {
    pub condition: Expression,
    pub body: Vec<Node>,
}

#[derive(Debug)]
pub struct ForNode {
    pub var: String,
    pub iterable: Expression,
    pub limit: Option<Expression>,
    pub body: Vec<Node>,
    /// `{% else %}` body rendered when the iterable is empty.
    pub else_body: Option<Vec<Node>>,
}

#[derive(Debug)]
pub struct WhenArm {
    pub values: Vec<Expression>,
    pub body: Vec<Node>,
}
