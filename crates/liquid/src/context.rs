//! The render context: scope stack, type-keyed registers and the engine
//! handles a render needs.
//!
//! A context is assembled fresh per page render and is never shared
//! mutably across concurrent renders; tags receive `&mut` access for the
//! duration of their own subtree only.

use crate::filters::FilterRegistry;
use crate::parser::Parser;
use serde_json::{Map, Value};
use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::sync::Arc;

/// Type-keyed side state for dialect extensions.
///
/// Values are `Arc`ed so a register read does not borrow the context; a
/// tag that rebinds state (the active section, say) inserts a replacement
/// and restores the previous value afterwards.
#[derive(Default, Clone)]
pub struct Registers {
    entries: HashMap<TypeId, Arc<dyn Any + Send + Sync>>,
}

impl Registers {
    pub fn insert<T: Any + Send + Sync>(&mut self, value: T) {
        self.entries.insert(TypeId::of::<T>(), Arc::new(value));
    }

    pub fn insert_arc<T: Any + Send + Sync>(&mut self, value: Arc<T>) {
        self.entries.insert(TypeId::of::<T>(), value);
    }

    pub fn get<T: Any + Send + Sync>(&self) -> Option<Arc<T>> {
        self.entries
            .get(&TypeId::of::<T>())
            .cloned()
            .and_then(|arc| arc.downcast::<T>().ok())
    }

    pub fn remove<T: Any + Send + Sync>(&mut self) -> Option<Arc<T>> {
        self.entries
            .remove(&TypeId::of::<T>())
            .and_then(|arc| arc.downcast::<T>().ok())
    }
}

impl std::fmt::Debug for Registers {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registers")
            .field("entries", &self.entries.len())
            .finish()
    }
}

/// Maximum nesting of section/snippet/block includes before the engine
/// refuses to recurse further.
pub const MAX_INCLUDE_DEPTH: usize = 24;

/// Per-render state: the scope stack, registers, and shared engine
/// handles (parser and filter registry).
#[derive(Debug, Clone)]
pub struct RenderContext {
    scopes: Vec<Map<String, Value>>,
    registers: Registers,
    parser: Arc<Parser>,
    /// Include depth guard against recursive snippets.
    depth: usize,
}

impl RenderContext {
    /// Creates a context with one global scope.
    pub fn new(parser: Arc<Parser>, globals: Map<String, Value>) -> Self {
        Self {
            scopes: vec![globals],
            registers: Registers::default(),
            parser,
            depth: 0,
        }
    }

    pub fn parser(&self) -> &Arc<Parser> {
        &self.parser
    }

    pub fn filters(&self) -> &Arc<FilterRegistry> {
        self.parser.filters()
    }

    pub fn registers(&self) -> &Registers {
        &self.registers
    }

    pub fn registers_mut(&mut self) -> &mut Registers {
        &mut self.registers
    }

    // --- Scope Handling ---

    pub fn push_scope(&mut self, scope: Map<String, Value>) {
        self.scopes.push(scope);
    }

    pub fn pop_scope(&mut self) -> Option<Map<String, Value>> {
        // The global scope stays.
        if self.scopes.len() > 1 {
            self.scopes.pop()
        } else {
            None
        }
    }

    /// Sets a name in the innermost scope (`assign`, `capture`, loop vars).
    pub fn assign(&mut self, name: impl Into<String>, value: Value) {
        if let Some(top) = self.scopes.last_mut() {
            top.insert(name.into(), value);
        }
    }

    /// Looks a bare name up through the scope stack, innermost first.
    pub fn lookup(&self, name: &str) -> Option<&Value> {
        self.scopes.iter().rev().find_map(|scope| scope.get(name))
    }

    // --- Include Support ---

    /// Forks a context for an included template: the calling scopes plus
    /// one scope holding only the given bindings. Assignments inside the
    /// callee do not leak back.
    pub fn fork_with(&self, bindings: Map<String, Value>) -> Self {
        let mut forked = self.clone();
        forked.scopes.push(bindings);
        forked.depth += 1;
        forked
    }

    pub fn depth(&self) -> usize {
        self.depth
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn ctx_with(globals: Value) -> RenderContext {
        let Value::Object(map) = globals else {
            panic!("globals must be an object")
        };
        RenderContext::new(Arc::new(Parser::new()), map)
    }

    #[test]
    fn test_scope_shadowing() {
        let mut ctx = ctx_with(json!({"name": "global"}));
        let mut inner = Map::new();
        inner.insert("name".into(), json!("inner"));
        ctx.push_scope(inner);
        assert_eq!(ctx.lookup("name"), Some(&json!("inner")));
        ctx.pop_scope();
        assert_eq!(ctx.lookup("name"), Some(&json!("global")));
    }

    #[test]
    fn test_global_scope_cannot_be_popped() {
        let mut ctx = ctx_with(json!({"a": 1}));
        assert!(ctx.pop_scope().is_none());
        assert_eq!(ctx.lookup("a"), Some(&json!(1)));
    }

    #[test]
    fn test_fork_with_does_not_leak_assigns() {
        let ctx = ctx_with(json!({"shop": "Acme"}));
        let mut bindings = Map::new();
        bindings.insert("price".into(), json!(100));
        let mut forked = ctx.fork_with(bindings);
        forked.assign("leaked", json!(true));

        assert_eq!(forked.lookup("shop"), Some(&json!("Acme")));
        assert_eq!(forked.lookup("price"), Some(&json!(100)));
        assert!(ctx.lookup("leaked").is_none());
        assert_eq!(forked.depth(), 1);
    }

    #[test]
    fn test_registers_round_trip() {
        #[derive(Debug, PartialEq)]
        struct Marker(u32);

        let mut ctx = ctx_with(json!({}));
        ctx.registers_mut().insert(Marker(7));
        assert_eq!(ctx.registers().get::<Marker>().unwrap().0, 7);
        ctx.registers_mut().remove::<Marker>();
        assert!(ctx.registers().get::<Marker>().is_none());
    }
}
