//! ESTree syntax tree
//!
//! Nodes own their children; there are no parent links. Serialization
//! follows the ESTree JSON layout: a `type` tag, camelCase fields and optional
//! `range`/`loc`.

use serde::Serialize;

use crate::lexer::{Range, SourceLocation};

/// A syntax tree node with its source span
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Node {
    #[serde(flatten)]
    pub kind: NodeKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub range: Option<Range>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub loc: Option<SourceLocation>,
}

impl Node {
    pub fn new(kind: NodeKind) -> Self {
        Node {
            kind,
            range: None,
            loc: None,
        }
    }

    /// ESTree type name
    pub fn type_name(&self) -> &'static str {
        self.kind.type_name()
    }
}

/// Decoded literal value
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum LiteralValue {
    /// `null`, and the value of regular expression literals
    Null,
    Boolean(bool),
    Number(f64),
    String(String),
}

/// Pattern and flags of a regular expression literal
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RegexLiteral {
    pub pattern: String,
    pub flags: String,
}

/// Raw and cooked text of a template chunk
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TemplateValue {
    pub raw: String,
    pub cooked: String,
}

/// Shared shape of function declarations, expressions and arrows
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Function {
    pub id: Option<Box<Node>>,
    pub params: Vec<Node>,
    pub body: Box<Node>,
    pub generator: bool,
    /// Arrow function whose body is an expression
    pub expression: bool,
}

/// Shared shape of class declarations and expressions
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Class {
    pub id: Option<Box<Node>>,
    pub super_class: Option<Box<Node>>,
    pub body: Box<Node>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PropertyKind {
    Init,
    Get,
    Set,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MethodKind {
    Constructor,
    Method,
    Get,
    Set,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum VariableKind {
    Var,
    Let,
    Const,
}

impl VariableKind {
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword {
            "var" => Some(Self::Var),
            "let" => Some(Self::Let),
            "const" => Some(Self::Const),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceType {
    Script,
    Module,
}

/// Node kinds
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all_fields = "camelCase")]
pub enum NodeKind {
    Program {
        body: Vec<Node>,
        source_type: SourceType,
    },

    // Expressions
    Identifier {
        name: String,
    },
    Literal {
        value: LiteralValue,
        raw: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        regex: Option<RegexLiteral>,
    },
    ThisExpression,
    Super,
    ArrayExpression {
        elements: Vec<Option<Node>>,
    },
    ObjectExpression {
        properties: Vec<Node>,
    },
    Property {
        key: Box<Node>,
        value: Box<Node>,
        kind: PropertyKind,
        method: bool,
        shorthand: bool,
        computed: bool,
    },
    FunctionExpression(Function),
    ArrowFunctionExpression(Function),
    ClassExpression(Class),
    ClassBody {
        body: Vec<Node>,
    },
    MethodDefinition {
        key: Box<Node>,
        value: Box<Node>,
        kind: MethodKind,
        computed: bool,
        r#static: bool,
    },
    TemplateLiteral {
        quasis: Vec<Node>,
        expressions: Vec<Node>,
    },
    TemplateElement {
        value: TemplateValue,
        tail: bool,
    },
    TaggedTemplateExpression {
        tag: Box<Node>,
        quasi: Box<Node>,
    },
    MemberExpression {
        object: Box<Node>,
        property: Box<Node>,
        computed: bool,
    },
    CallExpression {
        callee: Box<Node>,
        arguments: Vec<Node>,
    },
    NewExpression {
        callee: Box<Node>,
        arguments: Vec<Node>,
    },
    SpreadElement {
        argument: Box<Node>,
    },
    UpdateExpression {
        operator: String,
        argument: Box<Node>,
        prefix: bool,
    },
    UnaryExpression {
        operator: String,
        argument: Box<Node>,
        prefix: bool,
    },
    BinaryExpression {
        operator: String,
        left: Box<Node>,
        right: Box<Node>,
    },
    LogicalExpression {
        operator: String,
        left: Box<Node>,
        right: Box<Node>,
    },
    ConditionalExpression {
        test: Box<Node>,
        consequent: Box<Node>,
        alternate: Box<Node>,
    },
    AssignmentExpression {
        operator: String,
        left: Box<Node>,
        right: Box<Node>,
    },
    SequenceExpression {
        expressions: Vec<Node>,
    },
    YieldExpression {
        argument: Option<Box<Node>>,
        delegate: bool,
    },

    // Patterns
    ArrayPattern {
        elements: Vec<Option<Node>>,
    },
    ObjectPattern {
        properties: Vec<Node>,
    },
    AssignmentPattern {
        left: Box<Node>,
        right: Box<Node>,
    },
    RestElement {
        argument: Box<Node>,
    },

    // Statements
    BlockStatement {
        body: Vec<Node>,
    },
    EmptyStatement,
    ExpressionStatement {
        expression: Box<Node>,
    },
    IfStatement {
        test: Box<Node>,
        consequent: Box<Node>,
        alternate: Option<Box<Node>>,
    },
    LabeledStatement {
        label: Box<Node>,
        body: Box<Node>,
    },
    BreakStatement {
        label: Option<Box<Node>>,
    },
    ContinueStatement {
        label: Option<Box<Node>>,
    },
    WithStatement {
        object: Box<Node>,
        body: Box<Node>,
    },
    SwitchStatement {
        discriminant: Box<Node>,
        cases: Vec<Node>,
    },
    SwitchCase {
        test: Option<Box<Node>>,
        consequent: Vec<Node>,
    },
    ReturnStatement {
        argument: Option<Box<Node>>,
    },
    ThrowStatement {
        argument: Box<Node>,
    },
    TryStatement {
        block: Box<Node>,
        handler: Option<Box<Node>>,
        finalizer: Option<Box<Node>>,
    },
    CatchClause {
        param: Option<Box<Node>>,
        body: Box<Node>,
    },
    WhileStatement {
        test: Box<Node>,
        body: Box<Node>,
    },
    DoWhileStatement {
        body: Box<Node>,
        test: Box<Node>,
    },
    ForStatement {
        init: Option<Box<Node>>,
        test: Option<Box<Node>>,
        update: Option<Box<Node>>,
        body: Box<Node>,
    },
    ForInStatement {
        left: Box<Node>,
        right: Box<Node>,
        body: Box<Node>,
    },
    ForOfStatement {
        left: Box<Node>,
        right: Box<Node>,
        body: Box<Node>,
    },
    DebuggerStatement,

    // Declarations
    FunctionDeclaration(Function),
    VariableDeclaration {
        declarations: Vec<Node>,
        kind: VariableKind,
    },
    VariableDeclarator {
        id: Box<Node>,
        init: Option<Box<Node>>,
    },
    ClassDeclaration(Class),

    // Modules
    ImportDeclaration {
        specifiers: Vec<Node>,
        source: Box<Node>,
    },
    ImportSpecifier {
        imported: Box<Node>,
        local: Box<Node>,
    },
    ImportDefaultSpecifier {
        local: Box<Node>,
    },
    ImportNamespaceSpecifier {
        local: Box<Node>,
    },
    ExportNamedDeclaration {
        declaration: Option<Box<Node>>,
        specifiers: Vec<Node>,
        source: Option<Box<Node>>,
    },
    ExportDefaultDeclaration {
        declaration: Box<Node>,
    },
    ExportAllDeclaration {
        source: Box<Node>,
    },
    ExportSpecifier {
        local: Box<Node>,
        exported: Box<Node>,
    },
}

impl NodeKind {
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Program { .. } => "Program",
            Self::Identifier { .. } => "Identifier",
            Self::Literal { .. } => "Literal",
            Self::ThisExpression => "ThisExpression",
            Self::Super => "Super",
            Self::ArrayExpression { .. } => "ArrayExpression",
            Self::ObjectExpression { .. } => "ObjectExpression",
            Self::Property { .. } => "Property",
            Self::FunctionExpression(_) => "FunctionExpression",
            Self::ArrowFunctionExpression(_) => "ArrowFunctionExpression",
            Self::ClassExpression(_) => "ClassExpression",
            Self::ClassBody { .. } => "ClassBody",
            Self::MethodDefinition { .. } => "MethodDefinition",
            Self::TemplateLiteral { .. } => "TemplateLiteral",
            Self::TemplateElement { .. } => "TemplateElement",
            Self::TaggedTemplateExpression { .. } => "TaggedTemplateExpression",
            Self::MemberExpression { .. } => "MemberExpression",
            Self::CallExpression { .. } => "CallExpression",
            Self::NewExpression { .. } => "NewExpression",
            Self::SpreadElement { .. } => "SpreadElement",
            Self::UpdateExpression { .. } => "UpdateExpression",
            Self::UnaryExpression { .. } => "UnaryExpression",
            Self::BinaryExpression { .. } => "BinaryExpression",
            Self::LogicalExpression { .. } => "LogicalExpression",
            Self::ConditionalExpression { .. } => "ConditionalExpression",
            Self::AssignmentExpression { .. } => "AssignmentExpression",
            Self::SequenceExpression { .. } => "SequenceExpression",
            Self::YieldExpression { .. } => "YieldExpression",
            Self::ArrayPattern { .. } => "ArrayPattern",
            Self::ObjectPattern { .. } => "ObjectPattern",
            Self::AssignmentPattern { .. } => "AssignmentPattern",
            Self::RestElement { .. } => "RestElement",
            Self::BlockStatement { .. } => "BlockStatement",
            Self::EmptyStatement => "EmptyStatement",
            Self::ExpressionStatement { .. } => "ExpressionStatement",
            Self::IfStatement { .. } => "IfStatement",
            Self::LabeledStatement { .. } => "LabeledStatement",
            Self::BreakStatement { .. } => "BreakStatement",
            Self::ContinueStatement { .. } => "ContinueStatement",
            Self::WithStatement { .. } => "WithStatement",
            Self::SwitchStatement { .. } => "SwitchStatement",
            Self::SwitchCase { .. } => "SwitchCase",
            Self::ReturnStatement { .. } => "ReturnStatement",
            Self::ThrowStatement { .. } => "ThrowStatement",
            Self::TryStatement { .. } => "TryStatement",
            Self::CatchClause { .. } => "CatchClause",
            Self::WhileStatement { .. } => "WhileStatement",
            Self::DoWhileStatement { .. } => "DoWhileStatement",
            Self::ForStatement { .. } => "ForStatement",
            Self::ForInStatement { .. } => "ForInStatement",
            Self::ForOfStatement { .. } => "ForOfStatement",
            Self::DebuggerStatement => "DebuggerStatement",
            Self::FunctionDeclaration(_) => "FunctionDeclaration",
            Self::VariableDeclaration { .. } => "VariableDeclaration",
            Self::VariableDeclarator { .. } => "VariableDeclarator",
            Self::ClassDeclaration(_) => "ClassDeclaration",
            Self::ImportDeclaration { .. } => "ImportDeclaration",
            Self::ImportSpecifier { .. } => "ImportSpecifier",
            Self::ImportDefaultSpecifier { .. } => "ImportDefaultSpecifier",
            Self::ImportNamespaceSpecifier { .. } => "ImportNamespaceSpecifier",
            Self::ExportNamedDeclaration { .. } => "ExportNamedDeclaration",
            Self::ExportDefaultDeclaration { .. } => "ExportDefaultDeclaration",
            Self::ExportAllDeclaration { .. } => "ExportAllDeclaration",
            Self::ExportSpecifier { .. } => "ExportSpecifier",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_serialize_estree_shape() {
        let mut node = Node::new(NodeKind::Literal {
            value: LiteralValue::Number(1.0),
            raw: "1".to_string(),
            regex: None,
        });
        node.range = Some((0, 1));
        assert_eq!(
            serde_json::to_value(&node).unwrap(),
            json!({"type": "Literal", "value": 1.0, "raw": "1", "range": [0, 1]})
        );

        let this = Node::new(NodeKind::ThisExpression);
        assert_eq!(serde_json::to_value(&this).unwrap(), json!({"type": "ThisExpression"}));
    }

    #[test]
    fn test_serialize_camel_case_fields() {
        let body = Node::new(NodeKind::ClassBody { body: Vec::new() });
        let class = Node::new(NodeKind::ClassExpression(Class {
            id: None,
            super_class: Some(Box::new(Node::new(NodeKind::Identifier {
                name: "Base".to_string(),
            }))),
            body: Box::new(body),
        }));
        let json = serde_json::to_value(&class).unwrap();
        assert_eq!(json["type"], "ClassExpression");
        assert_eq!(json["superClass"]["name"], "Base");
        assert_eq!(json["id"], serde_json::Value::Null);

        let method = Node::new(NodeKind::MethodDefinition {
            key: Box::new(Node::new(NodeKind::Identifier { name: "m".to_string() })),
            value: Box::new(Node::new(NodeKind::EmptyStatement)),
            kind: MethodKind::Method,
            computed: false,
            r#static: true,
        });
        let json = serde_json::to_value(&method).unwrap();
        assert_eq!(json["static"], true);
        assert_eq!(json["kind"], "method");
    }

    #[test]
    fn test_type_name() {
        let node = Node::new(NodeKind::Program {
            body: Vec::new(),
            source_type: SourceType::Script,
        });
        assert_eq!(node.type_name(), "Program");
        assert_eq!(serde_json::to_value(&node).unwrap()["sourceType"], "script");
    }
}
