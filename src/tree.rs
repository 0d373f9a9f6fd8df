/// The task/behavior tree emitted by evaluating a program's tree expression.
/// Meta-nodes (`@if`, `@if/else`, `@for`, `@load`) never appear here: they
/// are fully resolved during tree-building and replaced by whatever plain
/// nodes they expanded to.
use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum BuiltNode {
    And(Vec<BuiltNode>),
    Or(Vec<BuiltNode>),
    Then(Vec<BuiltNode>),
    Behavior { name: String, args: Vec<String> },
}

impl fmt::Display for BuiltNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_indented(self, f, 0)
    }
}

fn write_indented(node: &BuiltNode, f: &mut fmt::Formatter<'_>, depth: usize) -> fmt::Result {
    let pad = "  ".repeat(depth);
    match node {
        BuiltNode::And(children) => {
            writeln!(f, "{pad}AND")?;
            for child in children {
                write_indented(child, f, depth + 1)?;
            }
            Ok(())
        }
        BuiltNode::Or(children) => {
            writeln!(f, "{pad}OR")?;
            for child in children {
                write_indented(child, f, depth + 1)?;
            }
            Ok(())
        }
        BuiltNode::Then(children) => {
            writeln!(f, "{pad}THEN")?;
            for child in children {
                write_indented(child, f, depth + 1)?;
            }
            Ok(())
        }
        BuiltNode::Behavior { name, args } => {
            if args.is_empty() {
                writeln!(f, "{pad}{name}")
            } else {
                writeln!(f, "{pad}{name}({})", args.join(", "))
            }
        }
    }
}

/// The forest produced by a single `@load`: zero or more root nodes, pushed
/// directly onto the caller's node stack rather than wrapped in a compound
/// node — the one meta-node that doesn't contribute through a pseudo
/// container.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Forest {
    pub roots: Vec<BuiltNode>,
}

impl Forest {
    pub fn new(roots: Vec<BuiltNode>) -> Self {
        Forest { roots }
    }
}

impl fmt::Display for Forest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for root in &self.roots {
            write!(f, "{root}")?;
        }
        Ok(())
    }
}
