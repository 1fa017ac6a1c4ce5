// Syntax tree consumed and produced by the post-parse normalization pass.
// Parser output and normalized output share one node type; the output-only
// kinds (ListDestructure, InstanceProperty, Intrinsic, SpreadArgs) are never
// produced by the parser.

pub mod source_gen;
pub use source_gen::ToSource;

use std::fmt;

use serde::{Deserialize, Serialize};

/// Source position of a node: file plus 1-based line.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Location {
    pub file: String,
    pub line: u32,
}

impl Location {
    pub fn new(file: impl Into<String>, line: u32) -> Self {
        Self {
            file: file.into(),
            line,
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.file.is_empty() {
            write!(f, "<unknown>:{}", self.line)
        } else {
            write!(f, "{}:{}", self.file, self.line)
        }
    }
}

/// Integer vs floating-point literal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NumericKind {
    Int,
    Float,
}

/// Operator of a unary sign expression
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SignOp {
    Plus,
    Minus,
}

impl SignOp {
    pub fn symbol(self) -> &'static str {
        match self {
            SignOp::Plus => "+",
            SignOp::Minus => "-",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BinaryOp {
    Add,
    Subtract,
    Multiply,
    Divide,
    Concat,
    Equal,
    NotEqual,
    Less,
    Greater,
    And,
    Or,
}

impl BinaryOp {
    pub fn symbol(self) -> &'static str {
        match self {
            BinaryOp::Add => "+",
            BinaryOp::Subtract => "-",
            BinaryOp::Multiply => "*",
            BinaryOp::Divide => "/",
            BinaryOp::Concat => ".",
            BinaryOp::Equal => "==",
            BinaryOp::NotEqual => "!=",
            BinaryOp::Less => "<",
            BinaryOp::Greater => ">",
            BinaryOp::And => "&&",
            BinaryOp::Or => "||",
        }
    }
}

/// How a call is dispatched by later resolution stages
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum CallKind {
    /// `foo($a)`: resolved by name
    #[default]
    Function,
    /// `$obj->foo($a)`: first argument is the receiver
    Member,
}

/// Scope classification of a variable reference
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum VarScope {
    #[default]
    Local,
    /// Visible in every function without an explicit `global` import
    Superglobal,
}

/// Operation codes of compiler-recognized intrinsics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IntrinsicOp {
    ConvString,
    ConvInt,
    ConvBool,
    ConvFloat,
    ConvArray,
    ConvUint,
    ConvLong,
    ConvUlong,
    Fork,
    Pow,
}

impl IntrinsicOp {
    pub fn as_str(self) -> &'static str {
        match self {
            IntrinsicOp::ConvString => "conv_string",
            IntrinsicOp::ConvInt => "conv_int",
            IntrinsicOp::ConvBool => "conv_bool",
            IntrinsicOp::ConvFloat => "conv_float",
            IntrinsicOp::ConvArray => "conv_array",
            IntrinsicOp::ConvUint => "conv_uint",
            IntrinsicOp::ConvLong => "conv_long",
            IntrinsicOp::ConvUlong => "conv_ulong",
            IntrinsicOp::Fork => "fork",
            IntrinsicOp::Pow => "pow",
        }
    }
}

impl fmt::Display for IntrinsicOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum NodeKind {
    // Literals
    NumericLiteral {
        value: String,
        kind: NumericKind,
    },
    StringLiteral(String),

    // Names and references
    VarRef {
        name: String,
        #[serde(default)]
        scope: VarScope,
    },
    /// Bare name, e.g. the `name` in `$obj->name`
    Name(String),

    // Expressions
    Call {
        name: String,
        args: Vec<Node>,
        #[serde(default)]
        kind: CallKind,
    },
    UnarySign {
        op: SignOp,
        operand: Box<Node>,
    },
    Binary {
        op: BinaryOp,
        left: Box<Node>,
        right: Box<Node>,
    },
    Assign {
        lhs: Box<Node>,
        rhs: Box<Node>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        doc: Option<String>,
    },
    /// `list($a, $b)` on the left of an assignment
    ListConstructor {
        targets: Vec<Node>,
    },
    /// `$base->member`, member is a `Name` or a `Call`
    MemberAccess {
        base: Box<Node>,
        member: Box<Node>,
    },
    ArrayLiteral(Vec<Node>),

    // Normalized forms
    ListDestructure {
        targets: Vec<Node>,
        source: Box<Node>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        doc: Option<String>,
    },
    InstanceProperty {
        owner: Box<Node>,
        property: String,
    },
    Intrinsic {
        op: IntrinsicOp,
        operands: Vec<Node>,
    },
    /// Expand the wrapped value as the full argument list at call time
    SpreadArgs(Box<Node>),

    // Statements
    ExprStatement(Box<Node>),
    Return(Option<Box<Node>>),
    Block(Vec<Node>),
    Function {
        name: String,
        params: Vec<Node>,
        body: Box<Node>,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub kind: NodeKind,
    #[serde(default)]
    pub location: Location,
    /// Set on the operand of a `fork` intrinsic
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub fork_context: bool,
}

// Constructors
impl Node {
    pub fn new(kind: NodeKind, location: Location) -> Self {
        Self {
            kind,
            location,
            fork_context: false,
        }
    }

    pub fn int(value: impl Into<String>, location: Location) -> Self {
        Self::new(
            NodeKind::NumericLiteral {
                value: value.into(),
                kind: NumericKind::Int,
            },
            location,
        )
    }

    pub fn float(value: impl Into<String>, location: Location) -> Self {
        Self::new(
            NodeKind::NumericLiteral {
                value: value.into(),
                kind: NumericKind::Float,
            },
            location,
        )
    }

    pub fn string(value: impl Into<String>, location: Location) -> Self {
        Self::new(NodeKind::StringLiteral(value.into()), location)
    }

    pub fn var(name: impl Into<String>, location: Location) -> Self {
        Self::new(
            NodeKind::VarRef {
                name: name.into(),
                scope: VarScope::Local,
            },
            location,
        )
    }

    pub fn name(name: impl Into<String>, location: Location) -> Self {
        Self::new(NodeKind::Name(name.into()), location)
    }

    pub fn call(name: impl Into<String>, args: Vec<Node>, location: Location) -> Self {
        Self::new(
            NodeKind::Call {
                name: name.into(),
                args,
                kind: CallKind::Function,
            },
            location,
        )
    }

    pub fn member_call(name: impl Into<String>, args: Vec<Node>, location: Location) -> Self {
        Self::new(
            NodeKind::Call {
                name: name.into(),
                args,
                kind: CallKind::Member,
            },
            location,
        )
    }

    pub fn unary(op: SignOp, operand: Node, location: Location) -> Self {
        Self::new(
            NodeKind::UnarySign {
                op,
                operand: Box::new(operand),
            },
            location,
        )
    }

    pub fn binary(op: BinaryOp, left: Node, right: Node, location: Location) -> Self {
        Self::new(
            NodeKind::Binary {
                op,
                left: Box::new(left),
                right: Box::new(right),
            },
            location,
        )
    }

    pub fn assign(lhs: Node, rhs: Node, location: Location) -> Self {
        Self::new(
            NodeKind::Assign {
                lhs: Box::new(lhs),
                rhs: Box::new(rhs),
                doc: None,
            },
            location,
        )
    }

    pub fn list(targets: Vec<Node>, location: Location) -> Self {
        Self::new(NodeKind::ListConstructor { targets }, location)
    }

    pub fn member_access(base: Node, member: Node, location: Location) -> Self {
        Self::new(
            NodeKind::MemberAccess {
                base: Box::new(base),
                member: Box::new(member),
            },
            location,
        )
    }

    pub fn array(elements: Vec<Node>, location: Location) -> Self {
        Self::new(NodeKind::ArrayLiteral(elements), location)
    }

    pub fn spread(value: Node, location: Location) -> Self {
        Self::new(NodeKind::SpreadArgs(Box::new(value)), location)
    }

    pub fn expr_stmt(expr: Node) -> Self {
        let location = expr.location.clone();
        Self::new(NodeKind::ExprStatement(Box::new(expr)), location)
    }

    pub fn ret(value: Option<Node>, location: Location) -> Self {
        Self::new(NodeKind::Return(value.map(Box::new)), location)
    }

    pub fn block(stmts: Vec<Node>, location: Location) -> Self {
        Self::new(NodeKind::Block(stmts), location)
    }

    pub fn function(
        name: impl Into<String>,
        params: Vec<Node>,
        body: Node,
        location: Location,
    ) -> Self {
        Self::new(
            NodeKind::Function {
                name: name.into(),
                params,
                body: Box::new(body),
            },
            location,
        )
    }

    pub fn with_location(mut self, location: Location) -> Self {
        self.location = location;
        self
    }

    /// Attach a documentation comment; ignored by kinds that carry none
    pub fn with_doc(mut self, text: impl Into<String>) -> Self {
        match &mut self.kind {
            NodeKind::Assign { doc, .. } | NodeKind::ListDestructure { doc, .. } => {
                *doc = Some(text.into());
            }
            _ => {}
        }
        self
    }
}

// Queries
impl Node {
    pub fn kind_name(&self) -> &'static str {
        match &self.kind {
            NodeKind::NumericLiteral { .. } => "NumericLiteral",
            NodeKind::StringLiteral(_) => "StringLiteral",
            NodeKind::VarRef { .. } => "VarRef",
            NodeKind::Name(_) => "Name",
            NodeKind::Call { .. } => "Call",
            NodeKind::UnarySign { .. } => "UnarySign",
            NodeKind::Binary { .. } => "Binary",
            NodeKind::Assign { .. } => "Assign",
            NodeKind::ListConstructor { .. } => "ListConstructor",
            NodeKind::MemberAccess { .. } => "MemberAccess",
            NodeKind::ArrayLiteral(_) => "ArrayLiteral",
            NodeKind::ListDestructure { .. } => "ListDestructure",
            NodeKind::InstanceProperty { .. } => "InstanceProperty",
            NodeKind::Intrinsic { .. } => "Intrinsic",
            NodeKind::SpreadArgs(_) => "SpreadArgs",
            NodeKind::ExprStatement(_) => "ExprStatement",
            NodeKind::Return(_) => "Return",
            NodeKind::Block(_) => "Block",
            NodeKind::Function { .. } => "Function",
        }
    }

    /// Direct children in source order
    pub fn children(&self) -> Vec<&Node> {
        match &self.kind {
            NodeKind::NumericLiteral { .. }
            | NodeKind::StringLiteral(_)
            | NodeKind::VarRef { .. }
            | NodeKind::Name(_) => Vec::new(),
            NodeKind::Call { args, .. } => args.iter().collect(),
            NodeKind::UnarySign { operand, .. } => vec![&**operand],
            NodeKind::Binary { left, right, .. } => vec![&**left, &**right],
            NodeKind::Assign { lhs, rhs, .. } => vec![&**lhs, &**rhs],
            NodeKind::ListConstructor { targets } => targets.iter().collect(),
            NodeKind::MemberAccess { base, member } => vec![&**base, &**member],
            NodeKind::ArrayLiteral(elements) => elements.iter().collect(),
            NodeKind::ListDestructure {
                targets, source, ..
            } => targets.iter().chain(std::iter::once(&**source)).collect(),
            NodeKind::InstanceProperty { owner, .. } => vec![&**owner],
            NodeKind::Intrinsic { operands, .. } => operands.iter().collect(),
            NodeKind::SpreadArgs(value) | NodeKind::ExprStatement(value) => vec![&**value],
            NodeKind::Return(value) => value.iter().map(|v| &**v).collect(),
            NodeKind::Block(stmts) => stmts.iter().collect(),
            NodeKind::Function { params, body, .. } => {
                params.iter().chain(std::iter::once(&**body)).collect()
            }
        }
    }

    /// Total number of nodes in this subtree, including `self`
    pub fn size(&self) -> usize {
        1 + self.children().into_iter().map(Node::size).sum::<usize>()
    }

    /// Consume the node and rebuild it with every direct child passed through
    /// `f`, in the same order as [`Node::children`].
    pub fn map_children<F>(self, mut f: F) -> Node
    where
        F: FnMut(Node) -> Node,
    {
        let Node {
            kind,
            location,
            fork_context,
        } = self;

        let kind = match kind {
            leaf @ (NodeKind::NumericLiteral { .. }
            | NodeKind::StringLiteral(_)
            | NodeKind::VarRef { .. }
            | NodeKind::Name(_)) => leaf,
            NodeKind::Call { name, args, kind } => NodeKind::Call {
                name,
                args: args.into_iter().map(&mut f).collect(),
                kind,
            },
            NodeKind::UnarySign { op, operand } => NodeKind::UnarySign {
                op,
                operand: Box::new(f(*operand)),
            },
            NodeKind::Binary { op, left, right } => {
                let left = Box::new(f(*left));
                let right = Box::new(f(*right));
                NodeKind::Binary { op, left, right }
            }
            NodeKind::Assign { lhs, rhs, doc } => {
                let lhs = Box::new(f(*lhs));
                let rhs = Box::new(f(*rhs));
                NodeKind::Assign { lhs, rhs, doc }
            }
            NodeKind::ListConstructor { targets } => NodeKind::ListConstructor {
                targets: targets.into_iter().map(&mut f).collect(),
            },
            NodeKind::MemberAccess { base, member } => {
                let base = Box::new(f(*base));
                let member = Box::new(f(*member));
                NodeKind::MemberAccess { base, member }
            }
            NodeKind::ArrayLiteral(elements) => {
                NodeKind::ArrayLiteral(elements.into_iter().map(&mut f).collect())
            }
            NodeKind::ListDestructure {
                targets,
                source,
                doc,
            } => {
                let targets = targets.into_iter().map(&mut f).collect();
                let source = Box::new(f(*source));
                NodeKind::ListDestructure {
                    targets,
                    source,
                    doc,
                }
            }
            NodeKind::InstanceProperty { owner, property } => NodeKind::InstanceProperty {
                owner: Box::new(f(*owner)),
                property,
            },
            NodeKind::Intrinsic { op, operands } => NodeKind::Intrinsic {
                op,
                operands: operands.into_iter().map(&mut f).collect(),
            },
            NodeKind::SpreadArgs(value) => NodeKind::SpreadArgs(Box::new(f(*value))),
            NodeKind::ExprStatement(expr) => NodeKind::ExprStatement(Box::new(f(*expr))),
            NodeKind::Return(value) => NodeKind::Return(value.map(|v| Box::new(f(*v)))),
            NodeKind::Block(stmts) => NodeKind::Block(stmts.into_iter().map(&mut f).collect()),
            NodeKind::Function { name, params, body } => {
                let params = params.into_iter().map(&mut f).collect();
                let body = Box::new(f(*body));
                NodeKind::Function { name, params, body }
            }
        };

        Node {
            kind,
            location,
            fork_context,
        }
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_source())
    }
}
