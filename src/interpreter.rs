/// Tree-walking evaluator for the thicket language.
///
/// Two walks share one `Environment`: the statement/expression walk (ordinary
/// imperative evaluation) and the tree walk, which shapes the emitted
/// task-tree forest by expanding meta-nodes at evaluation time. `@load`
/// recurses into a brand new `Interpreter` per loaded file — there is no
/// shared state and no memoization between loads.
use std::cell::RefCell;
use std::fs;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use crate::ast::{BinaryOp, Expr, Program, Stmt, TreeNode, UnaryOp};
use crate::callable::Callable;
use crate::env::Environment;
use crate::error::{EvalError, EvalResult};
use crate::lexer::Lexer;
use crate::parser::Parser;
use crate::stdlib;
use crate::tree::{BuiltNode, Forest};
use crate::value::{Array, Value};

/// Result of executing a statement: either it ran to completion, or it
/// triggered a non-local exit that must bubble up to the right boundary
/// (a loop for `break`/`continue`, a callable invocation for `return`).
#[derive(Debug, Clone, PartialEq)]
pub enum Signal {
    Normal,
    Return(Option<Value>),
    Break,
    Continue,
}

pub struct Interpreter {
    env: Environment,
    /// Directory `@load` paths are resolved relative to, so a loaded file's
    /// own `@load`s keep working no matter where the top-level script lives.
    base_dir: PathBuf,
    /// Execution tracing, mirroring the teacher interpreter's `DEBUG:`
    /// indent-tracking trace of assignments, conditionals, and loops.
    debug: bool,
    debug_indent: usize,
}

impl Interpreter {
    pub fn new() -> Self {
        Interpreter {
            env: Environment::new(),
            base_dir: PathBuf::new(),
            debug: false,
            debug_indent: 0,
        }
    }

    pub fn with_base_dir(base_dir: PathBuf) -> Self {
        Interpreter {
            env: Environment::new(),
            base_dir,
            debug: false,
            debug_indent: 0,
        }
    }

    /// Enable or disable `DEBUG:`-prefixed execution tracing on stderr.
    pub fn set_debug(&mut self, debug: bool) {
        self.debug = debug;
    }

    fn trace(&self, message: impl AsRef<str>) {
        if self.debug {
            let indent = " ".repeat(self.debug_indent);
            eprintln!("DEBUG: {indent}{}", message.as_ref());
        }
    }

    /// Runs a whole program: bind inputs, execute top-level statements in
    /// source order, then build the tree root into a forest. A stray
    /// `break`/`continue` that reaches the top level without an enclosing
    /// loop is a fatal error, not a silent no-op.
    pub fn run(&mut self, program: &Program, call_args: &[Value]) -> EvalResult<Forest> {
        self.bind_inputs(program, call_args)?;
        match self.exec_statements_in_order(&program.statements)? {
            Signal::Break => return Err(EvalError::BreakOutsideLoop),
            Signal::Continue => return Err(EvalError::ContinueOutsideLoop),
            Signal::Normal | Signal::Return(_) => {}
        }
        let roots = self.build_node(&program.tree_root)?;
        Ok(Forest::new(roots))
    }

    fn bind_inputs(&mut self, program: &Program, call_args: &[Value]) -> EvalResult<()> {
        for input in &program.inputs {
            let value = match &input.default {
                Some(expr) => self.eval_expr(expr)?,
                None => Value::None,
            };
            self.env.set(input.name.clone(), value);
        }
        for (input, arg) in program.inputs.iter().zip(call_args.iter()) {
            self.env.set(input.name.clone(), arg.clone());
        }
        Ok(())
    }

    // ---- statements ----

    fn exec_statements_in_order(&mut self, stmts: &[Stmt]) -> EvalResult<Signal> {
        for stmt in stmts {
            let signal = self.exec_stmt(stmt)?;
            if signal != Signal::Normal {
                return Ok(signal);
            }
        }
        Ok(Signal::Normal)
    }

    /// Statement lists inside a `Block` (and a callable's body) run in
    /// reverse source order, not forward.
    fn exec_statements_reversed(&mut self, stmts: &[Stmt]) -> EvalResult<Signal> {
        for stmt in stmts.iter().rev() {
            let signal = self.exec_stmt(stmt)?;
            if signal != Signal::Normal {
                return Ok(signal);
            }
        }
        Ok(Signal::Normal)
    }

    fn exec_stmt(&mut self, stmt: &Stmt) -> EvalResult<Signal> {
        match stmt {
            Stmt::VarDecl { name, value, .. } => {
                let value = self.eval_expr(value)?;
                self.trace(format!("var {name}: {value}"));
                self.env.set(name.clone(), value);
                Ok(Signal::Normal)
            }
            Stmt::ExprStmt(expr) => {
                self.eval_expr(expr)?;
                Ok(Signal::Normal)
            }
            Stmt::Block(stmts) => {
                self.env.push();
                let result = self.exec_statements_reversed(stmts);
                self.env.pop();
                result
            }
            Stmt::If {
                cond,
                then_branch,
                else_branch,
            } => {
                let taken = self.eval_bool(cond)?;
                self.trace(format!("if: {taken}"));
                self.debug_indent += 2;
                let result = if taken {
                    self.exec_stmt(then_branch)
                } else if let Some(else_branch) = else_branch {
                    self.exec_stmt(else_branch)
                } else {
                    Ok(Signal::Normal)
                };
                self.debug_indent -= 2;
                result
            }
            Stmt::While { cond, body } => {
                while self.eval_bool(cond)? {
                    self.trace("while: true");
                    self.debug_indent += 2;
                    let signal = self.exec_stmt(body);
                    self.debug_indent -= 2;
                    match signal? {
                        Signal::Break => break,
                        Signal::Continue | Signal::Normal => {}
                        signal @ Signal::Return(_) => return Ok(signal),
                    }
                }
                Ok(Signal::Normal)
            }
            Stmt::ForIn { name, iter, body } => {
                let iter_value = self.eval_expr(iter)?;
                let elements = self.iterable_elements(iter_value)?;
                for element in elements {
                    self.trace(format!("for {name}: {element}"));
                    self.env.push();
                    self.env.set(name.clone(), element);
                    self.debug_indent += 2;
                    let signal = self.exec_stmt(body);
                    self.debug_indent -= 2;
                    self.env.pop();
                    match signal? {
                        Signal::Break => break,
                        Signal::Continue | Signal::Normal => {}
                        signal @ Signal::Return(_) => return Ok(signal),
                    }
                }
                Ok(Signal::Normal)
            }
            Stmt::FnDecl {
                name, params, body, ..
            } => {
                let callable = Callable {
                    params: params.clone(),
                    body: body.clone(),
                };
                self.env.set(name.clone(), Value::Function(Rc::new(callable)));
                Ok(Signal::Normal)
            }
            Stmt::Return(expr) => {
                let value = match expr {
                    Some(expr) => Some(self.eval_expr(expr)?),
                    None => None,
                };
                Ok(Signal::Return(value))
            }
            Stmt::Break => Ok(Signal::Break),
            Stmt::Continue => Ok(Signal::Continue),
        }
    }

    fn eval_bool(&mut self, expr: &Expr) -> EvalResult<bool> {
        match self.eval_expr(expr)? {
            Value::Bool(b) => Ok(b),
            other => Err(EvalError::ShapeError {
                expected: "bool condition".to_string(),
                found: other.kind_name().to_string(),
            }),
        }
    }

    fn iterable_elements(&self, value: Value) -> EvalResult<Vec<Value>> {
        match value {
            Value::Array(arr) => Ok(arr.borrow().as_slice().to_vec()),
            Value::Str(s) => Ok(s.chars().map(|c| Value::Str(c.to_string())).collect()),
            other => Err(EvalError::ShapeError {
                expected: "array or string".to_string(),
                found: other.kind_name().to_string(),
            }),
        }
    }

    // ---- expressions ----

    fn eval_expr(&mut self, expr: &Expr) -> EvalResult<Value> {
        match expr {
            Expr::Int(n) => Ok(Value::Int(*n)),
            Expr::Float(n) => Ok(Value::Float(*n)),
            Expr::Str(s) => Ok(Value::Str(s.clone())),
            Expr::Bool(b) => Ok(Value::Bool(*b)),
            Expr::None => Ok(Value::None),
            Expr::Identifier(name) => self
                .env
                .get(name)
                .ok_or_else(|| EvalError::UndefinedVariable(name.clone())),
            Expr::Array(elements) => {
                let mut slots: Vec<Option<Value>> = vec![None; elements.len()];
                for i in (0..elements.len()).rev() {
                    slots[i] = Some(self.eval_expr(&elements[i])?);
                }
                let values = slots.into_iter().map(|v| v.expect("every slot filled")).collect();
                Ok(Value::Array(Rc::new(RefCell::new(Array::new(values)))))
            }
            Expr::ArrayAccess { name, index } => {
                let array = self.lookup_array(name)?;
                let idx = self.eval_index(index)?;
                let array = array.borrow();
                array.get(idx).cloned().ok_or_else(|| EvalError::ShapeError {
                    expected: "in-range array index".to_string(),
                    found: format!("index {idx} into array of length {}", array.len()),
                })
            }
            Expr::ArrayAssign { name, index, value } => {
                let idx = self.eval_index(index)?;
                let value = self.eval_expr(value)?;
                let array = self.lookup_array(name)?;
                array.borrow_mut().set(idx, value);
                Ok(Value::None)
            }
            Expr::Unary { op, expr } => {
                let value = self.eval_expr(expr)?;
                self.eval_unary(*op, value)
            }
            Expr::Binary { left, op, right } => {
                let left = self.eval_expr(left)?;
                let right = self.eval_expr(right)?;
                self.eval_binary(*op, left, right)
            }
            Expr::Ternary {
                cond,
                then_branch,
                else_branch,
            } => {
                if self.eval_bool(cond)? {
                    self.eval_expr(then_branch)
                } else {
                    self.eval_expr(else_branch)
                }
            }
            Expr::Assign { name, value } => {
                if !self.env.contains(name) {
                    return Err(EvalError::UndefinedVariable(name.clone()));
                }
                let old = self.env.get(name);
                let value = self.eval_expr(value)?;
                if self.debug {
                    let old_str = old.map(|v| v.to_string()).unwrap_or_else(|| "undefined".to_string());
                    self.trace(format!("{name}: {old_str} -> {value}"));
                }
                self.env.set(name.clone(), value);
                Ok(Value::None)
            }
            Expr::Call { name, args } => self.eval_call(name, args),
            Expr::Lambda { params, body } => {
                let callable = Callable {
                    params: params.clone(),
                    body: vec![Stmt::Return(Some((**body).clone()))],
                };
                Ok(Value::Function(Rc::new(callable)))
            }
        }
    }

    fn eval_index(&mut self, expr: &Expr) -> EvalResult<usize> {
        match self.eval_expr(expr)? {
            Value::Int(n) if n >= 0 => Ok(n as usize),
            Value::Int(n) => Err(EvalError::NegativeIndex(n)),
            other => Err(EvalError::ShapeError {
                expected: "int index".to_string(),
                found: other.kind_name().to_string(),
            }),
        }
    }

    fn lookup_array(&self, name: &str) -> EvalResult<Rc<RefCell<Array>>> {
        match self.env.get(name) {
            Some(Value::Array(arr)) => Ok(arr),
            Some(other) => Err(EvalError::ShapeError {
                expected: "array".to_string(),
                found: other.kind_name().to_string(),
            }),
            None => Err(EvalError::UndefinedVariable(name.to_string())),
        }
    }

    fn eval_unary(&self, op: UnaryOp, value: Value) -> EvalResult<Value> {
        match (op, value) {
            (UnaryOp::Neg, Value::Int(n)) => Ok(Value::Int(-n)),
            (UnaryOp::Neg, Value::Float(n)) => Ok(Value::Float(-n)),
            (UnaryOp::Not, Value::Bool(b)) => Ok(Value::Bool(!b)),
            (UnaryOp::Neg, other) => Err(EvalError::ShapeError {
                expected: "int or float".to_string(),
                found: other.kind_name().to_string(),
            }),
            (UnaryOp::Not, other) => Err(EvalError::ShapeError {
                expected: "bool".to_string(),
                found: other.kind_name().to_string(),
            }),
        }
    }

    fn eval_binary(&self, op: BinaryOp, left: Value, right: Value) -> EvalResult<Value> {
        use BinaryOp::*;
        use Value::*;

        let mismatch = |op: BinaryOp, left: &Value, right: &Value| EvalError::TypeMismatch {
            op: format!("{op:?}"),
            left: left.kind_name().to_string(),
            right: right.kind_name().to_string(),
        };

        match (op, &left, &right) {
            (Add, Int(a), Int(b)) => Ok(Int(a + b)),
            (Add, Float(a), Float(b)) => Ok(Float(a + b)),
            (Add, Str(a), Str(b)) => Ok(Str(format!("{a}{b}"))),
            (Sub, Int(a), Int(b)) => Ok(Int(a - b)),
            (Sub, Float(a), Float(b)) => Ok(Float(a - b)),
            (Mul, Int(a), Int(b)) => Ok(Int(a * b)),
            (Mul, Float(a), Float(b)) => Ok(Float(a * b)),
            (Div, Int(_), Int(0)) => Err(EvalError::DivisionByZero),
            (Div, Int(a), Int(b)) => Ok(Int(a / b)),
            (Div, Float(a), Float(b)) => Ok(Float(a / b)),
            (Rem, Int(_), Int(0)) => Err(EvalError::DivisionByZero),
            (Rem, Int(a), Int(b)) => Ok(Int(a % b)),
            (Eq, Int(a), Int(b)) => Ok(Bool(a == b)),
            (Eq, Float(a), Float(b)) => Ok(Bool(a == b)),
            (Eq, Str(a), Str(b)) => Ok(Bool(a == b)),
            (Eq, Bool(a), Bool(b)) => Ok(Bool(a == b)),
            (Ne, Int(a), Int(b)) => Ok(Bool(a != b)),
            (Ne, Float(a), Float(b)) => Ok(Bool(a != b)),
            (Ne, Str(a), Str(b)) => Ok(Bool(a != b)),
            (Ne, Bool(a), Bool(b)) => Ok(Bool(a != b)),
            (Lt, Int(a), Int(b)) => Ok(Bool(a < b)),
            (Lt, Float(a), Float(b)) => Ok(Bool(a < b)),
            (Le, Int(a), Int(b)) => Ok(Bool(a <= b)),
            (Le, Float(a), Float(b)) => Ok(Bool(a <= b)),
            (Gt, Int(a), Int(b)) => Ok(Bool(a > b)),
            (Gt, Float(a), Float(b)) => Ok(Bool(a > b)),
            (Ge, Int(a), Int(b)) => Ok(Bool(a >= b)),
            (Ge, Float(a), Float(b)) => Ok(Bool(a >= b)),
            _ => Err(mismatch(op, &left, &right)),
        }
    }

    fn eval_call(&mut self, name: &str, args: &[Expr]) -> EvalResult<Value> {
        if stdlib::is_builtin_name(name) && !self.env.contains(name) {
            let values = self.eval_args_in_order(args)?;
            return stdlib::call(name, &values);
        }

        match self.env.get(name) {
            Some(Value::Function(callable)) => {
                let values = self.eval_args_in_order(args)?;
                self.call_function(name, &callable, values)
            }
            Some(other) => Err(EvalError::NotCallable(other.kind_name().to_string())),
            None => Err(EvalError::UndefinedFunction(name.to_string())),
        }
    }

    fn eval_args_in_order(&mut self, args: &[Expr]) -> EvalResult<Vec<Value>> {
        args.iter().map(|arg| self.eval_expr(arg)).collect()
    }

    /// Pushes one scope onto the *same* stack the caller is using, binds
    /// parameters there, runs the body in reverse order like any other
    /// block, then pops. A `break`/`continue` that unwinds all the way out
    /// of the body without being caught by an enclosing loop is a fatal
    /// error, not a silent `None`.
    fn call_function(&mut self, name: &str, callable: &Callable, args: Vec<Value>) -> EvalResult<Value> {
        if callable.params.len() != args.len() {
            return Err(EvalError::ArityMismatch {
                name: name.to_string(),
                expected: callable.params.len(),
                found: args.len(),
            });
        }

        self.env.push();
        for ((param_name, _ty), value) in callable.params.iter().zip(args) {
            self.env.set(param_name.clone(), value);
        }
        let signal = self.exec_statements_reversed(&callable.body);
        self.env.pop();

        match signal? {
            Signal::Return(value) => Ok(value.unwrap_or(Value::None)),
            Signal::Break => Err(EvalError::BreakOutsideLoop),
            Signal::Continue => Err(EvalError::ContinueOutsideLoop),
            Signal::Normal => Ok(Value::None),
        }
    }

    // ---- tree builder ----

    /// Builds whatever a single tree node contributes at its source
    /// position: one entry for a plain compound/Behavior node, zero or many
    /// for a meta-node's expansion or an `@load`'s forest.
    fn build_node(&mut self, node: &TreeNode) -> EvalResult<Vec<BuiltNode>> {
        match node {
            TreeNode::And(children) => Ok(vec![BuiltNode::And(self.build_children(children, true)?)]),
            TreeNode::Or(children) => Ok(vec![BuiltNode::Or(self.build_children(children, true)?)]),
            TreeNode::Then(children) => Ok(vec![BuiltNode::Then(self.build_children(children, true)?)]),
            TreeNode::Behavior { name, args } => {
                let args = self
                    .eval_args_in_order(args)?
                    .iter()
                    .map(Value::to_display_string)
                    .collect();
                Ok(vec![BuiltNode::Behavior {
                    name: name.clone(),
                    args,
                }])
            }
            TreeNode::If { cond, children } => {
                let taken = self.eval_bool(cond)?;
                self.trace(format!("@if: {taken}"));
                if taken {
                    self.build_children(children, true)
                } else {
                    Ok(Vec::new())
                }
            }
            TreeNode::IfElse {
                cond,
                then_children,
                else_children,
            } => {
                let taken = self.eval_bool(cond)?;
                self.trace(format!("@if/else: {taken}"));
                if taken {
                    self.build_children(then_children, true)
                } else {
                    self.build_children(else_children, true)
                }
            }
            TreeNode::For {
                name,
                iter,
                children,
            } => {
                let iter_value = self.eval_expr(iter)?;
                let elements = self.iterable_elements(iter_value)?;
                let mut result = Vec::new();
                for element in elements {
                    self.trace(format!("@for {name}: {element}"));
                    self.env.push();
                    self.env.set(name.clone(), element);
                    self.debug_indent += 2;
                    let built = self.build_children(children, false);
                    self.debug_indent -= 2;
                    self.env.pop();
                    result.extend(built?);
                }
                Ok(result)
            }
            TreeNode::Load { path, args } => self.eval_load(path, args),
        }
    }

    /// Evaluates `children` in the requested order (reversed for compound
    /// and `@if`/`@if-else` nodes, source order for `@for` bodies), but
    /// always reassembles the per-child contributions back into source
    /// order before returning — a child contributes 0, 1, or many entries,
    /// so this can't be a blind stack pop.
    fn build_children(&mut self, children: &[TreeNode], reverse: bool) -> EvalResult<Vec<BuiltNode>> {
        let mut slots: Vec<Vec<BuiltNode>> = vec![Vec::new(); children.len()];
        let order: Box<dyn Iterator<Item = usize>> = if reverse {
            Box::new((0..children.len()).rev())
        } else {
            Box::new(0..children.len())
        };
        for i in order {
            slots[i] = self.build_node(&children[i])?;
        }
        Ok(slots.into_iter().flatten().collect())
    }

    /// Parses and evaluates `path` as an independent sub-program in a fresh
    /// interpreter, with `args` bound positionally to its declared inputs.
    /// No caching — every `@load` reparses the file. `path` and `args`
    /// together are one argument list, evaluated right-to-left and
    /// reassembled back into source order before use, the same
    /// reverse-then-reassemble idiom `Expr::Array` uses.
    fn eval_load(&mut self, path: &Expr, args: &[Expr]) -> EvalResult<Vec<BuiltNode>> {
        let mut all_exprs: Vec<&Expr> = Vec::with_capacity(args.len() + 1);
        all_exprs.push(path);
        all_exprs.extend(args.iter());

        let mut values: Vec<Option<Value>> = vec![None; all_exprs.len()];
        for i in (0..all_exprs.len()).rev() {
            values[i] = Some(self.eval_expr(all_exprs[i])?);
        }
        let mut values = values.into_iter().map(|v| v.expect("every slot filled"));

        let path_str = match values.next().expect("path slot always present") {
            Value::Str(s) => s,
            _ => return Err(EvalError::LoadPathNotString),
        };
        let extra_args: Vec<Value> = values.collect();

        let full_path = self.resolve_load_path(&path_str);
        let source = fs::read_to_string(&full_path)?;
        let tokens = Lexer::new(&source).tokenize()?;
        let sub_program = Parser::new(tokens).parse_program()?;

        let sub_base_dir = full_path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| self.base_dir.clone());
        let mut sub_interpreter = Interpreter::with_base_dir(sub_base_dir);
        let forest = sub_interpreter.run(&sub_program, &extra_args)?;
        Ok(forest.roots)
    }

    fn resolve_load_path(&self, path: &str) -> PathBuf {
        let candidate = Path::new(path);
        if candidate.is_absolute() {
            candidate.to_path_buf()
        } else {
            self.base_dir.join(candidate)
        }
    }
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run_source(src: &str) -> Forest {
        let tokens = Lexer::new(src).tokenize().unwrap();
        let program = Parser::new(tokens).parse_program().unwrap();
        Interpreter::new().run(&program, &[]).unwrap()
    }

    #[test]
    fn evaluates_arithmetic_and_behavior_args() {
        let forest = run_source("Behavior(1 + 2 * 3)");
        match &forest.roots[0] {
            BuiltNode::Behavior { args, .. } => assert_eq!(args, &vec!["7".to_string()]),
            other => panic!("expected Behavior, got {other:?}"),
        }
    }

    #[test]
    fn and_node_preserves_source_order_of_children() {
        let forest = run_source("AND { Behavior(1) Behavior(2) Behavior(3) }");
        match &forest.roots[0] {
            BuiltNode::And(children) => {
                let names: Vec<_> = children
                    .iter()
                    .map(|c| match c {
                        BuiltNode::Behavior { args, .. } => args[0].clone(),
                        _ => panic!("expected Behavior"),
                    })
                    .collect();
                assert_eq!(names, vec!["1", "2", "3"]);
            }
            other => panic!("expected And, got {other:?}"),
        }
    }

    #[test]
    fn if_true_expands_children_if_false_empty() {
        let forest = run_source("@if (true) { Behavior(1) }");
        assert_eq!(forest.roots.len(), 1);
        let forest = run_source("@if (false) { Behavior(1) }");
        assert_eq!(forest.roots.len(), 0);
    }

    #[test]
    fn if_else_picks_branch() {
        let forest = run_source("@if (false) { Behavior(1) } else { Behavior(2) }");
        match &forest.roots[0] {
            BuiltNode::Behavior { args, .. } => assert_eq!(args, &vec!["2".to_string()]),
            other => panic!("expected Behavior, got {other:?}"),
        }
    }

    #[test]
    fn for_meta_node_expands_once_per_element_in_order() {
        let forest = run_source("@for (i in range(3)) { Behavior(i) }");
        let values: Vec<_> = forest
            .roots
            .iter()
            .map(|n| match n {
                BuiltNode::Behavior { args, .. } => args[0].clone(),
                _ => panic!("expected Behavior"),
            })
            .collect();
        assert_eq!(values, vec!["0", "1", "2"]);
    }

    #[test]
    fn functions_return_values_and_recurse_through_globals() {
        let forest = run_source(
            "fn add(a: int, b: int) -> int { return a + b }\nBehavior(add(2, 3))",
        );
        match &forest.roots[0] {
            BuiltNode::Behavior { args, .. } => assert_eq!(args, &vec!["5".to_string()]),
            other => panic!("expected Behavior, got {other:?}"),
        }
    }

    #[test]
    fn array_auto_extends_on_out_of_range_write() {
        let forest = run_source(
            "var a: array of int = [1]\na[2] = 9\nBehavior(a[1])",
        );
        match &forest.roots[0] {
            BuiltNode::Behavior { args, .. } => assert_eq!(args, &vec!["0".to_string()]),
            other => panic!("expected Behavior, got {other:?}"),
        }
    }

    #[test]
    fn while_loop_honors_break() {
        let forest = run_source(
            "var i: int = 0\nwhile (i < 10) { i = i + 1\nif (i == 3) { break } }\nBehavior(i)",
        );
        match &forest.roots[0] {
            BuiltNode::Behavior { args, .. } => assert_eq!(args, &vec!["3".to_string()]),
            other => panic!("expected Behavior, got {other:?}"),
        }
    }

    #[test]
    fn division_by_zero_is_an_error() {
        let tokens = Lexer::new("Behavior(1 / 0)").tokenize().unwrap();
        let program = Parser::new(tokens).parse_program().unwrap();
        let err = Interpreter::new().run(&program, &[]).unwrap_err();
        assert!(matches!(err, EvalError::DivisionByZero));
    }

    #[test]
    fn for_in_string_iterates_single_character_values() {
        let forest = run_source(
            "var out: string = \"\"\nfor (c in \"abc\") { out = out + c }\nBehavior(out)",
        );
        match &forest.roots[0] {
            BuiltNode::Behavior { args, .. } => assert_eq!(args, &vec!["abc".to_string()]),
            other => panic!("expected Behavior, got {other:?}"),
        }
    }

    #[test]
    fn block_runs_its_statements_in_reverse_source_order() {
        // a Block's own statement list runs last-to-first (unlike the
        // top-level statement list, which runs in source order), so the
        // *first* assignment here wins by executing *last*.
        let forest = run_source("var x: int = 0\n{\n    x = 1\n    x = 2\n}\nBehavior(x)");
        match &forest.roots[0] {
            BuiltNode::Behavior { args, .. } => assert_eq!(args, &vec!["1".to_string()]),
            other => panic!("expected Behavior, got {other:?}"),
        }
    }

    #[test]
    fn call_arguments_evaluate_left_to_right_despite_block_reversal() {
        // record()'s side effect lets us observe evaluation order without
        // capturing stdout: call arguments (unlike a Block's statements)
        // evaluate in source order, so "a" is appended before "b".
        let forest = run_source(concat!(
            "var log: string = \"\"\n",
            "fn record(tag: string) -> int { log = log + tag\nreturn 0 }\n",
            "fn combine(a: int, b: int) -> int { return 0 }\n",
            "combine(record(\"a\"), record(\"b\"))\n",
            "Behavior(log)",
        ));
        match &forest.roots[0] {
            BuiltNode::Behavior { args, .. } => assert_eq!(args, &vec!["ab".to_string()]),
            other => panic!("expected Behavior, got {other:?}"),
        }
    }
}
