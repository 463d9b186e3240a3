//! Expression evaluation and the async tree-walking renderer.
//!
//! Rendering is asynchronous because dialect tags fetch templates
//! mid-render; recursion through node bodies is boxed. Everything is
//! awaited in order, so output is deterministic for a given context.

use crate::ast::{ForNode, Node, Template};
use crate::context::RenderContext;
use crate::error::LiquidError;
use crate::expr::{BinaryOperator, Expression, FilterCall, FilteredExpression, PathSegment};
use crate::filters::FilterArgs;
use crate::value::{apply_comparison, is_truthy, size_of, to_output_string};
use log::warn;
use serde_json::{Map, Value, json};
use std::future::Future;
use std::pin::Pin;

/// Renders a parsed template against a context.
pub async fn render(template: &Template, ctx: &mut RenderContext) -> Result<String, LiquidError> {
    let mut out = String::new();
    render_nodes(&template.nodes, ctx, &mut out).await?;
    Ok(out)
}

/// Renders a node list into `out`. Public so dialect tags can render the
/// bodies they parsed.
pub fn render_nodes<'a>(
    nodes: &'a [Node],
    ctx: &'a mut RenderContext,
    out: &'a mut String,
) -> Pin<Box<dyn Future<Output = Result<(), LiquidError>> + Send + 'a>> {
    Box::pin(async move {
        for node in nodes {
            render_node(node, ctx, out).await?;
        }
        Ok(())
    })
}

async fn render_node(
    node: &Node,
    ctx: &mut RenderContext,
    out: &mut String,
) -> Result<(), LiquidError> {
    match node {
        Node::Text(text) => out.push_str(text),
        Node::Output(fe) => {
            let value = evaluate_filtered(fe, ctx)?;
            out.push_str(&to_output_string(&value));
        }
        Node::If {
            branches,
            else_body,
        } => {
            for branch in branches {
                if is_truthy(&evaluate(&branch.condition, ctx)?) {
                    return render_nodes(&branch.body, ctx, out).await;
                }
            }
            if let Some(body) = else_body {
                render_nodes(body, ctx, out).await?;
            }
        }
        Node::Unless {
            condition,
            body,
            else_body,
        } => {
            if !is_truthy(&evaluate(condition, ctx)?) {
                render_nodes(body, ctx, out).await?;
            } else if let Some(body) = else_body {
                render_nodes(body, ctx, out).await?;
            }
        }
        Node::For(for_node) => render_for(for_node, ctx, out).await?,
        Node::Assign { target, value } => {
            let value = evaluate_filtered(value, ctx)?;
            ctx.assign(target.clone(), value);
        }
        Node::Capture { target, body } => {
            let mut captured = String::new();
            render_nodes(body, ctx, &mut captured).await?;
            ctx.assign(target.clone(), Value::String(captured));
        }
        Node::Case {
            subject,
            whens,
            else_body,
        } => {
            let subject = evaluate(subject, ctx)?;
            for arm in whens {
                let mut matched = false;
                for value in &arm.values {
                    if crate::value::values_equal(&subject, &evaluate(value, ctx)?) {
                        matched = true;
                        break;
                    }
                }
                if matched {
                    return render_nodes(&arm.body, ctx, out).await;
                }
            }
            if let Some(body) = else_body {
                render_nodes(body, ctx, out).await?;
            }
        }
        Node::Custom(tag) => tag.render(ctx, out).await?,
    }
    Ok(())
}

async fn render_for(
    for_node: &ForNode,
    ctx: &mut RenderContext,
    out: &mut String,
) -> Result<(), LiquidError> {
    let iterable = evaluate(&for_node.iterable, ctx)?;
    let mut items: Vec<Value> = match iterable {
        Value::Array(items) => items,
        // Iterating a map yields its values; keyed block maps come
        // through here when a theme loops them directly.
        Value::Object(map) => map.into_iter().map(|(_, v)| v).collect(),
        Value::Null => Vec::new(),
        other => vec![other],
    };

    if let Some(limit_expr) = &for_node.limit {
        let limit = crate::value::to_number(&evaluate(limit_expr, ctx)?) as usize;
        items.truncate(limit);
    }

    if items.is_empty() {
        if let Some(body) = &for_node.else_body {
            render_nodes(body, ctx, out).await?;
        }
        return Ok(());
    }

    let length = items.len();
    for (index, item) in items.into_iter().enumerate() {
        let mut scope = Map::new();
        scope.insert(for_node.var.clone(), item);
        scope.insert(
            "forloop".to_string(),
            json!({
                "index": index + 1,
                "index0": index,
                "first": index == 0,
                "last": index + 1 == length,
                "length": length,
            }),
        );
        ctx.push_scope(scope);
        let result = render_nodes(&for_node.body, ctx, out).await;
        ctx.pop_scope();
        result?;
    }
    Ok(())
}

// --- Expression Evaluation ---

/// Evaluates an expression against the context. Path lookups never fail;
/// missing data resolves to `Null`.
pub fn evaluate(expr: &Expression, ctx: &RenderContext) -> Result<Value, LiquidError> {
    match expr {
        Expression::Literal(value) => Ok(value.clone()),
        Expression::Path(segments) => Ok(resolve_path(segments, ctx)),
        Expression::BinaryOp { op, left, right } => match op {
            BinaryOperator::And => {
                let left = evaluate(left, ctx)?;
                if !is_truthy(&left) {
                    return Ok(Value::Bool(false));
                }
                Ok(Value::Bool(is_truthy(&evaluate(right, ctx)?)))
            }
            BinaryOperator::Or => {
                let left = evaluate(left, ctx)?;
                if is_truthy(&left) {
                    return Ok(Value::Bool(true));
                }
                Ok(Value::Bool(is_truthy(&evaluate(right, ctx)?)))
            }
            _ => {
                let left = evaluate(left, ctx)?;
                let right = evaluate(right, ctx)?;
                Ok(Value::Bool(apply_comparison(*op, &left, &right)))
            }
        },
    }
}

/// Evaluates an expression and applies its filter chain.
pub fn evaluate_filtered(
    fe: &FilteredExpression,
    ctx: &RenderContext,
) -> Result<Value, LiquidError> {
    let mut value = evaluate(&fe.expr, ctx)?;
    for call in &fe.filters {
        value = apply_filter(call, value, ctx)?;
    }
    Ok(value)
}

fn apply_filter(
    call: &FilterCall,
    input: Value,
    ctx: &RenderContext,
) -> Result<Value, LiquidError> {
    let Some(filter) = ctx.filters().get(&call.name).copied() else {
        // Unknown filters degrade to the input; a broken preview beats a
        // dead one.
        warn!("[LIQUID] unknown filter '{}', passing value through", call.name);
        return Ok(input);
    };

    let mut args = FilterArgs::default();
    for arg in &call.args {
        args.positional.push(evaluate(arg, ctx)?);
    }
    for (key, arg) in &call.kwargs {
        args.named.insert(key.clone(), evaluate(arg, ctx)?);
    }
    filter(input, &args, ctx)
}

fn resolve_path(segments: &[PathSegment], ctx: &RenderContext) -> Value {
    let Some(PathSegment::Key(head)) = segments.first() else {
        return Value::Null;
    };
    let Some(mut current) = ctx.lookup(head) else {
        return Value::Null;
    };

    for segment in &segments[1..] {
        // Dynamic bracket keys evaluate against the same context.
        let resolved;
        let segment = match segment {
            PathSegment::Dynamic(expr) => {
                let key = evaluate(expr, ctx).unwrap_or(Value::Null);
                resolved = match key {
                    Value::String(s) => PathSegment::Key(s),
                    Value::Number(n) => PathSegment::Index(n.as_u64().unwrap_or(0) as usize),
                    _ => return Value::Null,
                };
                &resolved
            }
            other => other,
        };

        let next = match segment {
            PathSegment::Key(key) => match current {
                Value::Object(map) => map.get(key.as_str()),
                _ => None,
            },
            PathSegment::Index(i) => match current {
                Value::Array(items) => items.get(*i),
                _ => None,
            },
            PathSegment::Dynamic(_) => unreachable!(),
        };

        match next {
            Some(value) => current = value,
            None => {
                // `size` works as a trailing pseudo-property on anything
                // sized, matching the `size` filter.
                if matches!(segment, PathSegment::Key(k) if k == "size") {
                    return Value::Number(size_of(current).into());
                }
                return Value::Null;
            }
        }
    }
    current.clone()
}
