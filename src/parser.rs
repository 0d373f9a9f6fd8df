/// Recursive-descent parser for the thicket language.
///
/// A program is `input` declarations, then statements, then a single
/// trailing tree expression. Expressions are parsed by precedence climbing:
/// assignment -> ternary -> equality -> comparison -> additive ->
/// multiplicative -> unary -> postfix -> primary.
use crate::ast::{BinaryOp, Expr, InputDecl, Program, Stmt, TreeNode, Type, UnaryOp};
use crate::error::{EvalError, EvalResult, Pos};
use crate::lexer::Token;

pub struct Parser {
    tokens: Vec<(Token, Pos)>,
    current: usize,
}

impl Parser {
    pub fn new(tokens: Vec<(Token, Pos)>) -> Self {
        Parser { tokens, current: 0 }
    }

    pub fn parse_program(&mut self) -> EvalResult<Program> {
        self.skip_newlines();
        let mut inputs = Vec::new();
        while self.check(&Token::Input) {
            inputs.push(self.parse_input_decl()?);
            self.skip_newlines();
        }

        let mut statements = Vec::new();
        while !self.check(&Token::And) && !self.check(&Token::Or) && !self.check(&Token::Then)
            && !self.check(&Token::Behavior) && !self.check(&Token::At) && !self.is_at_end()
        {
            statements.push(self.parse_stmt()?);
            self.skip_newlines();
        }

        let tree_root = self.parse_tree_node()?;
        self.skip_newlines();

        Ok(Program {
            inputs,
            statements,
            tree_root,
        })
    }

    fn parse_input_decl(&mut self) -> EvalResult<InputDecl> {
        self.consume(&Token::Input, "expected 'input'")?;
        let name = self.consume_identifier("expected input name")?;
        self.consume(&Token::Colon, "expected ':' after input name")?;
        let ty = self.parse_type()?;
        let default = if self.match_token(&Token::Equals) {
            Some(self.parse_expr()?)
        } else {
            None
        };
        Ok(InputDecl { name, ty, default })
    }

    fn parse_type(&mut self) -> EvalResult<Type> {
        let ty = match self.peek_token().clone() {
            Token::TyInt => {
                self.advance();
                Type::Int
            }
            Token::TyFloat => {
                self.advance();
                Type::Float
            }
            Token::TyString => {
                self.advance();
                Type::Str
            }
            Token::TyBool => {
                self.advance();
                Type::Bool
            }
            Token::TyNone => {
                self.advance();
                Type::None
            }
            Token::TyArray => {
                self.advance();
                self.consume(&Token::Of, "expected 'of' after 'array'")?;
                Type::Array(Box::new(self.parse_type()?))
            }
            Token::Fn => {
                self.advance();
                self.consume(&Token::LeftParen, "expected '(' after 'fn' in function type")?;
                let mut params = Vec::new();
                if !self.check(&Token::RightParen) {
                    loop {
                        params.push(self.parse_type()?);
                        if !self.match_token(&Token::Comma) {
                            break;
                        }
                    }
                }
                self.consume(&Token::RightParen, "expected ')' after function type parameters")?;
                self.consume(&Token::Arrow, "expected '->' after function type parameters")?;
                let ret = self.parse_type()?;
                Type::Function {
                    params,
                    ret: Box::new(ret),
                }
            }
            other => {
                return Err(self.error(format!("expected type, found {other:?}")));
            }
        };
        Ok(ty)
    }

    // ---- statements ----

    fn parse_stmt(&mut self) -> EvalResult<Stmt> {
        let stmt = match self.peek_token().clone() {
            Token::Var => self.parse_var_decl()?,
            Token::Fn => self.parse_fn_decl()?,
            Token::If => self.parse_if_stmt()?,
            Token::While => self.parse_while_stmt()?,
            Token::For => self.parse_for_stmt()?,
            Token::Return => {
                self.advance();
                let value = if self.check(&Token::Newline) || self.check(&Token::Semicolon) {
                    None
                } else {
                    Some(self.parse_expr()?)
                };
                Stmt::Return(value)
            }
            Token::Break => {
                self.advance();
                Stmt::Break
            }
            Token::Continue => {
                self.advance();
                Stmt::Continue
            }
            Token::LeftBrace => Stmt::Block(self.parse_block()?),
            _ => Stmt::ExprStmt(self.parse_expr()?),
        };
        self.consume_stmt_terminator();
        Ok(stmt)
    }

    fn consume_stmt_terminator(&mut self) {
        while self.check(&Token::Newline) || self.check(&Token::Semicolon) {
            self.advance();
        }
    }

    fn parse_var_decl(&mut self) -> EvalResult<Stmt> {
        self.consume(&Token::Var, "expected 'var'")?;
        let name = self.consume_identifier("expected variable name")?;
        self.consume(&Token::Colon, "expected ':' after variable name")?;
        let ty = self.parse_type()?;
        self.consume(&Token::Equals, "expected '=' in variable declaration")?;
        let value = self.parse_expr()?;
        Ok(Stmt::VarDecl { name, ty, value })
    }

    fn parse_fn_decl(&mut self) -> EvalResult<Stmt> {
        self.consume(&Token::Fn, "expected 'fn'")?;
        let name = self.consume_identifier("expected function name")?;
        self.consume(&Token::LeftParen, "expected '(' after function name")?;
        let params = self.parse_param_list()?;
        self.consume(&Token::RightParen, "expected ')' after parameters")?;
        let ret = if self.match_token(&Token::Arrow) {
            self.parse_type()?
        } else {
            Type::None
        };
        let body = self.parse_block()?;
        Ok(Stmt::FnDecl {
            name,
            params,
            ret,
            body,
        })
    }

    fn parse_param_list(&mut self) -> EvalResult<Vec<(String, Type)>> {
        let mut params = Vec::new();
        if self.check(&Token::RightParen) {
            return Ok(params);
        }
        loop {
            let name = self.consume_identifier("expected parameter name")?;
            self.consume(&Token::Colon, "expected ':' after parameter name")?;
            let ty = self.parse_type()?;
            params.push((name, ty));
            if !self.match_token(&Token::Comma) {
                break;
            }
        }
        Ok(params)
    }

    fn parse_block(&mut self) -> EvalResult<Vec<Stmt>> {
        self.consume(&Token::LeftBrace, "expected '{'")?;
        self.skip_newlines();
        let mut stmts = Vec::new();
        while !self.check(&Token::RightBrace) && !self.is_at_end() {
            stmts.push(self.parse_stmt()?);
            self.skip_newlines();
        }
        self.consume(&Token::RightBrace, "expected '}'")?;
        Ok(stmts)
    }

    fn parse_if_stmt(&mut self) -> EvalResult<Stmt> {
        self.consume(&Token::If, "expected 'if'")?;
        self.consume(&Token::LeftParen, "expected '(' after 'if'")?;
        let cond = self.parse_expr()?;
        self.consume(&Token::RightParen, "expected ')' after condition")?;
        let then_branch = Box::new(Stmt::Block(self.parse_block()?));
        self.skip_newlines_peeking_else();
        let else_branch = if self.match_token(&Token::Else) {
            if self.check(&Token::If) {
                Some(Box::new(self.parse_if_stmt()?))
            } else {
                Some(Box::new(Stmt::Block(self.parse_block()?)))
            }
        } else {
            None
        };
        Ok(Stmt::If {
            cond,
            then_branch,
            else_branch,
        })
    }

    /// Looks past newlines for a following `else` without consuming them
    /// permanently when there isn't one.
    fn skip_newlines_peeking_else(&mut self) {
        let saved = self.current;
        self.skip_newlines();
        if !self.check(&Token::Else) {
            self.current = saved;
        }
    }

    fn parse_while_stmt(&mut self) -> EvalResult<Stmt> {
        self.consume(&Token::While, "expected 'while'")?;
        self.consume(&Token::LeftParen, "expected '(' after 'while'")?;
        let cond = self.parse_expr()?;
        self.consume(&Token::RightParen, "expected ')' after condition")?;
        let body = Box::new(Stmt::Block(self.parse_block()?));
        Ok(Stmt::While { cond, body })
    }

    fn parse_for_stmt(&mut self) -> EvalResult<Stmt> {
        self.consume(&Token::For, "expected 'for'")?;
        self.consume(&Token::LeftParen, "expected '(' after 'for'")?;
        let name = self.consume_identifier("expected loop variable name")?;
        self.consume(&Token::In, "expected 'in'")?;
        let iter = self.parse_expr()?;
        self.consume(&Token::RightParen, "expected ')' after for-clause")?;
        let body = Box::new(Stmt::Block(self.parse_block()?));
        Ok(Stmt::ForIn { name, iter, body })
    }

    // ---- expressions ----

    fn parse_expr(&mut self) -> EvalResult<Expr> {
        self.parse_assignment()
    }

    fn parse_assignment(&mut self) -> EvalResult<Expr> {
        let expr = self.parse_ternary()?;

        if self.match_token(&Token::Equals) {
            let value = self.parse_assignment()?;
            return match expr {
                Expr::Identifier(name) => Ok(Expr::Assign {
                    name,
                    value: Box::new(value),
                }),
                Expr::ArrayAccess { name, index } => Ok(Expr::ArrayAssign {
                    name,
                    index,
                    value: Box::new(value),
                }),
                _ => Err(self.error("invalid assignment target".to_string())),
            };
        }

        Ok(expr)
    }

    fn parse_ternary(&mut self) -> EvalResult<Expr> {
        let cond = self.parse_equality()?;
        if self.match_token(&Token::Question) {
            let then_branch = self.parse_ternary()?;
            self.consume(&Token::Colon, "expected ':' in ternary expression")?;
            let else_branch = self.parse_ternary()?;
            return Ok(Expr::Ternary {
                cond: Box::new(cond),
                then_branch: Box::new(then_branch),
                else_branch: Box::new(else_branch),
            });
        }
        Ok(cond)
    }

    fn parse_equality(&mut self) -> EvalResult<Expr> {
        let mut expr = self.parse_comparison()?;
        loop {
            let op = match self.peek_token() {
                Token::EqualEqual => BinaryOp::Eq,
                Token::BangEqual => BinaryOp::Ne,
                _ => break,
            };
            self.advance();
            let right = self.parse_comparison()?;
            expr = Expr::Binary {
                left: Box::new(expr),
                op,
                right: Box::new(right),
            };
        }
        Ok(expr)
    }

    fn parse_comparison(&mut self) -> EvalResult<Expr> {
        let mut expr = self.parse_additive()?;
        loop {
            let op = match self.peek_token() {
                Token::Less => BinaryOp::Lt,
                Token::LessEqual => BinaryOp::Le,
                Token::Greater => BinaryOp::Gt,
                Token::GreaterEqual => BinaryOp::Ge,
                _ => break,
            };
            self.advance();
            let right = self.parse_additive()?;
            expr = Expr::Binary {
                left: Box::new(expr),
                op,
                right: Box::new(right),
            };
        }
        Ok(expr)
    }

    fn parse_additive(&mut self) -> EvalResult<Expr> {
        let mut expr = self.parse_multiplicative()?;
        loop {
            let op = match self.peek_token() {
                Token::Plus => BinaryOp::Add,
                Token::Minus => BinaryOp::Sub,
                _ => break,
            };
            self.advance();
            let right = self.parse_multiplicative()?;
            expr = Expr::Binary {
                left: Box::new(expr),
                op,
                right: Box::new(right),
            };
        }
        Ok(expr)
    }

    fn parse_multiplicative(&mut self) -> EvalResult<Expr> {
        let mut expr = self.parse_unary()?;
        loop {
            let op = match self.peek_token() {
                Token::Star => BinaryOp::Mul,
                Token::Slash => BinaryOp::Div,
                Token::Percent => BinaryOp::Rem,
                _ => break,
            };
            self.advance();
            let right = self.parse_unary()?;
            expr = Expr::Binary {
                left: Box::new(expr),
                op,
                right: Box::new(right),
            };
        }
        Ok(expr)
    }

    fn parse_unary(&mut self) -> EvalResult<Expr> {
        let op = match self.peek_token() {
            Token::Minus => Some(UnaryOp::Neg),
            Token::Not => Some(UnaryOp::Not),
            _ => None,
        };
        if let Some(op) = op {
            self.advance();
            let expr = self.parse_unary()?;
            return Ok(Expr::Unary {
                op,
                expr: Box::new(expr),
            });
        }
        self.parse_postfix()
    }

    fn parse_postfix(&mut self) -> EvalResult<Expr> {
        let mut expr = self.parse_primary()?;
        loop {
            if self.match_token(&Token::LeftBracket) {
                let index = self.parse_expr()?;
                self.consume(&Token::RightBracket, "expected ']' after index")?;
                expr = match expr {
                    Expr::Identifier(name) => Expr::ArrayAccess {
                        name,
                        index: Box::new(index),
                    },
                    _ => return Err(self.error("can only index a named array".to_string())),
                };
            } else {
                break;
            }
        }
        Ok(expr)
    }

    fn parse_primary(&mut self) -> EvalResult<Expr> {
        let token = self.peek_token().clone();
        let expr = match token {
            Token::Int(n) => {
                self.advance();
                Expr::Int(n)
            }
            Token::Float(n) => {
                self.advance();
                Expr::Float(n)
            }
            Token::Str(s) => {
                self.advance();
                Expr::Str(s)
            }
            Token::True => {
                self.advance();
                Expr::Bool(true)
            }
            Token::False => {
                self.advance();
                Expr::Bool(false)
            }
            Token::NoneLit => {
                self.advance();
                Expr::None
            }
            Token::LeftBracket => {
                self.advance();
                let mut elements = Vec::new();
                if !self.check(&Token::RightBracket) {
                    loop {
                        elements.push(self.parse_expr()?);
                        if !self.match_token(&Token::Comma) {
                            break;
                        }
                    }
                }
                self.consume(&Token::RightBracket, "expected ']' after array literal")?;
                Expr::Array(elements)
            }
            Token::Bar => self.parse_lambda()?,
            Token::LeftParen => {
                self.advance();
                let expr = self.parse_expr()?;
                self.consume(&Token::RightParen, "expected ')'")?;
                expr
            }
            Token::Identifier(name) => {
                self.advance();
                if self.match_token(&Token::LeftParen) {
                    let args = self.parse_arg_list()?;
                    self.consume(&Token::RightParen, "expected ')' after arguments")?;
                    Expr::Call { name, args }
                } else {
                    Expr::Identifier(name)
                }
            }
            other => return Err(self.error(format!("unexpected token {other:?}"))),
        };
        Ok(expr)
    }

    fn parse_lambda(&mut self) -> EvalResult<Expr> {
        self.consume(&Token::Bar, "expected '|'")?;
        let mut params = Vec::new();
        if !self.check(&Token::Bar) {
            loop {
                let name = self.consume_identifier("expected parameter name")?;
                self.consume(&Token::Colon, "expected ':' after parameter name")?;
                let ty = self.parse_type()?;
                params.push((name, ty));
                if !self.match_token(&Token::Comma) {
                    break;
                }
            }
        }
        self.consume(&Token::Bar, "expected closing '|'")?;
        let body = self.parse_expr()?;
        Ok(Expr::Lambda {
            params,
            body: Box::new(body),
        })
    }

    fn parse_arg_list(&mut self) -> EvalResult<Vec<Expr>> {
        let mut args = Vec::new();
        if self.check(&Token::RightParen) {
            return Ok(args);
        }
        loop {
            args.push(self.parse_expr()?);
            if !self.match_token(&Token::Comma) {
                break;
            }
        }
        Ok(args)
    }

    // ---- tree sublanguage ----

    fn parse_tree_node(&mut self) -> EvalResult<TreeNode> {
        self.skip_newlines();
        let token = self.peek_token().clone();
        match token {
            Token::And => {
                self.advance();
                Ok(TreeNode::And(self.parse_tree_children()?))
            }
            Token::Or => {
                self.advance();
                Ok(TreeNode::Or(self.parse_tree_children()?))
            }
            Token::Then => {
                self.advance();
                Ok(TreeNode::Then(self.parse_tree_children()?))
            }
            Token::Behavior => {
                self.advance();
                let args = if self.match_token(&Token::LeftParen) {
                    let args = self.parse_arg_list()?;
                    self.consume(&Token::RightParen, "expected ')' after behavior arguments")?;
                    args
                } else {
                    Vec::new()
                };
                Ok(TreeNode::Behavior {
                    name: "Behavior".to_string(),
                    args,
                })
            }
            Token::At => self.parse_meta_node(),
            other => Err(self.error(format!("expected a tree node, found {other:?}"))),
        }
    }

    fn parse_tree_children(&mut self) -> EvalResult<Vec<TreeNode>> {
        self.consume(&Token::LeftBrace, "expected '{' to open tree node children")?;
        self.skip_newlines();
        let mut children = Vec::new();
        while !self.check(&Token::RightBrace) && !self.is_at_end() {
            children.push(self.parse_tree_node()?);
            self.skip_newlines();
        }
        self.consume(&Token::RightBrace, "expected '}' to close tree node children")?;
        Ok(children)
    }

    fn parse_meta_node(&mut self) -> EvalResult<TreeNode> {
        self.consume(&Token::At, "expected '@'")?;
        let token = self.peek_token().clone();
        match token {
            Token::If => {
                self.advance();
                self.consume(&Token::LeftParen, "expected '(' after '@if'")?;
                let cond = self.parse_expr()?;
                self.consume(&Token::RightParen, "expected ')' after condition")?;
                let children = self.parse_tree_children()?;
                self.skip_newlines_peeking_else();
                if self.match_token(&Token::Else) {
                    let else_children = self.parse_tree_children()?;
                    Ok(TreeNode::IfElse {
                        cond,
                        then_children: children,
                        else_children,
                    })
                } else {
                    Ok(TreeNode::If { cond, children })
                }
            }
            Token::For => {
                self.advance();
                self.consume(&Token::LeftParen, "expected '(' after '@for'")?;
                let name = self.consume_identifier("expected loop variable name")?;
                self.consume(&Token::In, "expected 'in'")?;
                let iter = self.parse_expr()?;
                self.consume(&Token::RightParen, "expected ')' after for-clause")?;
                let children = self.parse_tree_children()?;
                Ok(TreeNode::For {
                    name,
                    iter,
                    children,
                })
            }
            Token::Identifier(name) if name == "load" => {
                self.advance();
                self.consume(&Token::LeftParen, "expected '(' after '@load'")?;
                let mut args = self.parse_arg_list()?;
                self.consume(&Token::RightParen, "expected ')' after load arguments")?;
                if args.is_empty() {
                    return Err(self.error("'@load' requires a path argument".to_string()));
                }
                let path = Box::new(args.remove(0));
                Ok(TreeNode::Load { path, args })
            }
            other => Err(self.error(format!("unknown meta-node '@{other:?}'"))),
        }
    }

    // ---- low-level helpers ----

    fn peek_token(&self) -> &Token {
        &self.tokens[self.current].0
    }

    fn peek_pos(&self) -> Pos {
        self.tokens[self.current].1
    }

    fn is_at_end(&self) -> bool {
        matches!(self.peek_token(), Token::Eof)
    }

    fn advance(&mut self) -> Token {
        let token = self.tokens[self.current].0.clone();
        if !self.is_at_end() {
            self.current += 1;
        }
        token
    }

    fn check(&self, expected: &Token) -> bool {
        self.peek_token() == expected
    }

    fn match_token(&mut self, expected: &Token) -> bool {
        if self.check(expected) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn consume(&mut self, expected: &Token, message: &str) -> EvalResult<Token> {
        if self.check(expected) {
            Ok(self.advance())
        } else {
            let found = self.peek_token().clone();
            Err(EvalError::ParseError {
                message: message.to_string(),
                found: format!("{found:?}"),
                pos: self.peek_pos(),
            })
        }
    }

    fn consume_identifier(&mut self, message: &str) -> EvalResult<String> {
        match self.peek_token().clone() {
            Token::Identifier(name) => {
                self.advance();
                Ok(name)
            }
            other => Err(EvalError::ParseError {
                message: message.to_string(),
                found: format!("{other:?}"),
                pos: self.peek_pos(),
            }),
        }
    }

    fn skip_newlines(&mut self) {
        while self.check(&Token::Newline) {
            self.advance();
        }
    }

    fn error(&self, message: String) -> EvalError {
        EvalError::ParseError {
            message,
            found: format!("{:?}", self.peek_token()),
            pos: self.peek_pos(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::Lexer;

    fn parse(src: &str) -> Program {
        let tokens = Lexer::new(src).tokenize().unwrap();
        Parser::new(tokens).parse_program().unwrap()
    }

    #[test]
    fn parses_minimal_program() {
        let program = parse("Behavior(1)");
        assert!(program.inputs.is_empty());
        assert!(program.statements.is_empty());
        match program.tree_root {
            TreeNode::Behavior { name, args } => {
                assert_eq!(name, "Behavior");
                assert_eq!(args.len(), 1);
            }
            other => panic!("expected Behavior, got {other:?}"),
        }
    }

    #[test]
    fn parses_input_decl_with_default() {
        let program = parse("input x: int = 5\nBehavior()");
        assert_eq!(program.inputs.len(), 1);
        assert_eq!(program.inputs[0].name, "x");
        assert_eq!(program.inputs[0].ty, Type::Int);
        assert!(program.inputs[0].default.is_some());
    }

    #[test]
    fn parses_and_with_nested_children() {
        let program = parse("AND { Behavior() OR { Behavior() Behavior() } }");
        match program.tree_root {
            TreeNode::And(children) => {
                assert_eq!(children.len(), 2);
                assert!(matches!(children[1], TreeNode::Or(_)));
            }
            other => panic!("expected And, got {other:?}"),
        }
    }

    #[test]
    fn parses_if_else_meta_node() {
        let program = parse("@if (true) { Behavior() } else { Behavior() }");
        assert!(matches!(program.tree_root, TreeNode::IfElse { .. }));
    }

    #[test]
    fn parses_for_meta_node() {
        let program = parse("@for (i in range(3)) { Behavior(i) }");
        match program.tree_root {
            TreeNode::For { name, .. } => assert_eq!(name, "i"),
            other => panic!("expected For, got {other:?}"),
        }
    }

    #[test]
    fn parses_load_meta_node() {
        let program = parse("@load(\"sub.thicket\", 1, 2)");
        match program.tree_root {
            TreeNode::Load { args, .. } => assert_eq!(args.len(), 2),
            other => panic!("expected Load, got {other:?}"),
        }
    }

    #[test]
    fn operator_precedence_matches_table() {
        let program = parse("var x: int = 1 + 2 * 3\nBehavior()");
        match &program.statements[0] {
            Stmt::VarDecl { value, .. } => match value {
                Expr::Binary { op: BinaryOp::Add, right, .. } => {
                    assert!(matches!(**right, Expr::Binary { op: BinaryOp::Mul, .. }));
                }
                other => panic!("expected top-level Add, got {other:?}"),
            },
            other => panic!("expected VarDecl, got {other:?}"),
        }
    }

    #[test]
    fn parses_function_type_annotation() {
        let program = parse("var f: fn(int, int) -> int = |a: int, b: int| a + b\nBehavior()");
        match &program.statements[0] {
            Stmt::VarDecl { ty, .. } => match ty {
                Type::Function { params, ret } => {
                    assert_eq!(params, &vec![Type::Int, Type::Int]);
                    assert_eq!(**ret, Type::Int);
                }
                other => panic!("expected Type::Function, got {other:?}"),
            },
            other => panic!("expected VarDecl, got {other:?}"),
        }
    }

    #[test]
    fn parses_lambda_expression() {
        let program = parse("var f: int = |x: int| x + 1\nBehavior()");
        match &program.statements[0] {
            Stmt::VarDecl { value, .. } => assert!(matches!(value, Expr::Lambda { .. })),
            other => panic!("expected VarDecl, got {other:?}"),
        }
    }
}
