/// A captured function: a parameter list plus a body.
///
/// A lambda's body is synthesized as a single `Return` statement wrapping
/// its expression, so invocation never needs to special-case lambdas versus
/// ordinary `fn` declarations.
use crate::ast::{Stmt, Type};

#[derive(Debug, Clone, PartialEq)]
pub struct Callable {
    pub params: Vec<(String, Type)>,
    pub body: Vec<Stmt>,
}
