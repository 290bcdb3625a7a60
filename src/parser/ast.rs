// AST (Abstract Syntax Tree) definitions for the Jutsu front end

use std::fmt;

/// Source location information for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourceLocation {
    pub line: usize,
    pub column: usize,
}

impl SourceLocation {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}, column {}", self.line, self.column)
    }
}

/// Node kinds of the syntax tree.
///
/// The kind fixes the shape of a node's children:
///
/// | kind           | value            | children                               |
/// |----------------|------------------|----------------------------------------|
/// | `Program`      | –                | statements                             |
/// | `Body`         | –                | statements                             |
/// | `AssignStmt`   | –                | target `Variable`, value               |
/// | `ReturnStmt`   | –                | `Expr`                                 |
/// | `CallStmt`     | callee           | `Argument`*                            |
/// | `IfStmt`       | –                | `Expr` condition, optional `Body`      |
/// | `BinaryOp`     | operator         | left, right                            |
/// | `UnaryOp`      | operator         | operand                                |
/// | `Expr`         | –                | expression root                        |
/// | `Argument`     | –                | `Expr`                                 |
/// | `VarDecl`      | function name    | `Variable`* parameters, then `Body`    |
/// | `Variable`     | identifier       | –                                      |
/// | `IntegerConst` | digits           | –                                      |
/// | `StringConst`  | contents         | –                                      |
/// | `BooleanConst` | `1` or `0`       | –                                      |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Program,
    Body,
    AssignStmt,
    ReturnStmt,
    CallStmt,
    IfStmt,
    BinaryOp,
    UnaryOp,
    Expr,
    Argument,
    VarDecl,
    Variable,
    IntegerConst,
    StringConst,
    BooleanConst,
}

impl NodeKind {
    pub fn as_str(self) -> &'static str {
        match self {
            NodeKind::Program => "Program",
            NodeKind::Body => "Body",
            NodeKind::AssignStmt => "AssignStmt",
            NodeKind::ReturnStmt => "ReturnStmt",
            NodeKind::CallStmt => "CallStmt",
            NodeKind::IfStmt => "IfStmt",
            NodeKind::BinaryOp => "BinaryOp",
            NodeKind::UnaryOp => "UnaryOp",
            NodeKind::Expr => "Expr",
            NodeKind::Argument => "Argument",
            NodeKind::VarDecl => "VarDecl",
            NodeKind::Variable => "Variable",
            NodeKind::IntegerConst => "IntegerConst",
            NodeKind::StringConst => "StringConst",
            NodeKind::BooleanConst => "BooleanConst",
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A node of the syntax tree.
///
/// Every node is a kind, an optional literal payload (identifier, digits,
/// string contents or operator symbol) and the children it owns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    pub kind: NodeKind,
    pub value: Option<String>,
    pub children: Vec<Node>,
}

impl Node {
    pub fn new(kind: NodeKind) -> Self {
        Self {
            kind,
            value: None,
            children: Vec::new(),
        }
    }

    pub fn with_value(kind: NodeKind, value: impl Into<String>) -> Self {
        Self {
            kind,
            value: Some(value.into()),
            children: Vec::new(),
        }
    }

    /// Builder form of [`Node::push`].
    pub fn with_child(mut self, child: Node) -> Self {
        self.children.push(child);
        self
    }

    pub fn push(&mut self, child: Node) {
        self.children.push(child);
    }

    pub fn program(statements: Vec<Node>) -> Self {
        Self {
            kind: NodeKind::Program,
            value: None,
            children: statements,
        }
    }

    pub fn body(statements: Vec<Node>) -> Self {
        Self {
            kind: NodeKind::Body,
            value: None,
            children: statements,
        }
    }

    pub fn expr(inner: Node) -> Self {
        Node::new(NodeKind::Expr).with_child(inner)
    }

    pub fn binary(op: &str, left: Node, right: Node) -> Self {
        Node::with_value(NodeKind::BinaryOp, op)
            .with_child(left)
            .with_child(right)
    }

    pub fn unary(op: &str, operand: Node) -> Self {
        Node::with_value(NodeKind::UnaryOp, op).with_child(operand)
    }

    pub fn variable(name: impl Into<String>) -> Self {
        Node::with_value(NodeKind::Variable, name)
    }

    pub fn integer(digits: impl Into<String>) -> Self {
        Node::with_value(NodeKind::IntegerConst, digits)
    }

    pub fn string(contents: impl Into<String>) -> Self {
        Node::with_value(NodeKind::StringConst, contents)
    }

    pub fn boolean(value: bool) -> Self {
        Node::with_value(NodeKind::BooleanConst, if value { "1" } else { "0" })
    }

    pub fn assign(target: Node, value: Node) -> Self {
        Node::new(NodeKind::AssignStmt)
            .with_child(target)
            .with_child(value)
    }

    /// A call with each argument expression wrapped in an `Argument` node.
    pub fn call(callee: impl Into<String>, args: Vec<Node>) -> Self {
        let mut node = Node::with_value(NodeKind::CallStmt, callee);
        for arg in args {
            node.push(Node::new(NodeKind::Argument).with_child(arg));
        }
        node
    }

    pub fn value(&self) -> Option<&str> {
        self.value.as_deref()
    }

    pub fn is(&self, kind: NodeKind) -> bool {
        self.kind == kind
    }

    /// Depth-first, pre-order traversal starting at (and including) `self`.
    pub fn iter(&self) -> PreOrder<'_> {
        PreOrder { stack: vec![self] }
    }

    /// Indented multi-line dump; same text as the `Display` impl.
    pub fn dump(&self) -> String {
        self.to_string()
    }

    fn write_indented(&self, f: &mut fmt::Formatter<'_>, depth: usize) -> fmt::Result {
        for _ in 0..depth {
            f.write_str("  ")?;
        }
        match &self.value {
            Some(value) => write!(f, "{{{}, {}}}", self.kind, value)?,
            None => write!(f, "{{{}}}", self.kind)?,
        }
        for child in &self.children {
            f.write_str("\n")?;
            child.write_indented(f, depth + 1)?;
        }
        Ok(())
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_indented(f, 0)
    }
}

/// Iterator returned by [`Node::iter`].
pub struct PreOrder<'a> {
    stack: Vec<&'a Node>,
}

impl<'a> Iterator for PreOrder<'a> {
    type Item = &'a Node;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.stack.extend(node.children.iter().rev());
        Some(node)
    }
}

impl<'a> IntoIterator for &'a Node {
    type Item = &'a Node;
    type IntoIter = PreOrder<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dump_indents_children() {
        let tree = Node::program(vec![Node::expr(Node::binary(
            "+",
            Node::integer("1"),
            Node::variable("x"),
        ))]);

        let expected = "{Program}\n  {Expr}\n    {BinaryOp, +}\n      {IntegerConst, 1}\n      {Variable, x}";
        assert_eq!(tree.dump(), expected);
    }

    #[test]
    fn test_pre_order_traversal() {
        let tree = Node::binary(
            "-",
            Node::binary("-", Node::integer("1"), Node::integer("2")),
            Node::integer("3"),
        );

        let values: Vec<_> = tree.iter().filter_map(Node::value).collect();
        assert_eq!(values, vec!["-", "-", "1", "2", "3"]);
    }

    #[test]
    fn test_call_wraps_arguments() {
        let call = Node::call("f", vec![Node::expr(Node::integer("1"))]);

        assert_eq!(call.value(), Some("f"));
        assert_eq!(call.children.len(), 1);
        assert!(call.children[0].is(NodeKind::Argument));
        assert!(call.children[0].children[0].is(NodeKind::Expr));
    }

    #[test]
    fn test_boolean_payload() {
        assert_eq!(Node::boolean(true).value(), Some("1"));
        assert_eq!(Node::boolean(false).value(), Some("0"));
    }
}
