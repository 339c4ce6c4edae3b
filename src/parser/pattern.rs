//! Destructuring patterns
//!
//! Array and object literals are parsed as expressions first and rewritten
//! into patterns once an `=`, an arrow or a binding position shows they are
//! targets.

use crate::error::Result;
use crate::lexer::TokenKind;

use super::ast::{Node, NodeKind, PropertyKind};
use super::parser::Parser;

impl<'a> Parser<'a> {
    /// Rewrite an expression into an assignment or binding target.
    ///
    /// Binding targets only admit identifiers at the leaves; assignment
    /// targets also admit member expressions.
    pub(crate) fn into_pattern(&self, node: Node, binding: bool) -> Result<Node> {
        let Node { kind, range, loc } = node;
        let kind = match kind {
            kind @ (NodeKind::Identifier { .. }
            | NodeKind::ArrayPattern { .. }
            | NodeKind::ObjectPattern { .. }
            | NodeKind::AssignmentPattern { .. }
            | NodeKind::RestElement { .. }) => kind,
            kind @ NodeKind::MemberExpression { .. } if !binding => kind,
            NodeKind::ArrayExpression { elements } => NodeKind::ArrayPattern {
                elements: elements
                    .into_iter()
                    .map(|element| element.map(|e| self.into_pattern(e, binding)).transpose())
                    .collect::<Result<_>>()?,
            },
            NodeKind::ObjectExpression { properties } => NodeKind::ObjectPattern {
                properties: properties
                    .into_iter()
                    .map(|property| self.into_property_pattern(property, binding))
                    .collect::<Result<_>>()?,
            },
            NodeKind::AssignmentExpression {
                operator,
                left,
                right,
            } if operator == "=" => NodeKind::AssignmentPattern {
                left: Box::new(self.into_pattern(*left, binding)?),
                right,
            },
            NodeKind::SpreadElement { argument } => NodeKind::RestElement {
                argument: Box::new(self.into_pattern(*argument, binding)?),
            },
            kind => {
                let node = Node { kind, range, loc };
                return Err(self.error_at(&node, "Invalid destructuring target"));
            }
        };
        Ok(Node { kind, range, loc })
    }

    fn into_property_pattern(&self, property: Node, binding: bool) -> Result<Node> {
        let Node { kind, range, loc } = property;
        let kind = match kind {
            NodeKind::Property {
                key,
                value,
                kind: PropertyKind::Init,
                method: false,
                shorthand,
                computed,
            } => NodeKind::Property {
                key,
                value: Box::new(self.into_pattern(*value, binding)?),
                kind: PropertyKind::Init,
                method: false,
                shorthand,
                computed,
            },
            NodeKind::SpreadElement { argument } => NodeKind::RestElement {
                argument: Box::new(self.into_pattern(*argument, binding)?),
            },
            kind => {
                let node = Node { kind, range, loc };
                return Err(self.error_at(&node, "Invalid destructuring target"));
            }
        };
        Ok(Node { kind, range, loc })
    }

    /// Operand of `++`, `--` or a compound assignment
    pub(crate) fn check_simple_target(&self, node: Node) -> Result<Node> {
        match node.kind {
            NodeKind::Identifier { .. } | NodeKind::MemberExpression { .. } => Ok(node),
            _ => Err(self.error_at(&node, "Invalid left-hand side in assignment")),
        }
    }

    /// Identifier, array pattern or object pattern in a declaration
    pub(crate) fn parse_binding_target(&mut self) -> Result<Node> {
        match self.current_kind() {
            Some(TokenKind::Identifier) => self.parse_identifier(),
            Some(TokenKind::Punctuator) if self.is("[") || self.is("{") => {
                let outer_init = self.shorthand_init.take();
                let literal = if self.is("[") {
                    self.parse_array_literal()?
                } else {
                    self.parse_object_literal()?
                };
                let pattern = self.into_pattern(literal, true)?;
                self.shorthand_init = outer_init;
                Ok(pattern)
            }
            _ => Err(self.unexpected()),
        }
    }

    /// Binding target with an optional default value
    pub(crate) fn parse_binding_element(&mut self) -> Result<Node> {
        let start = self.start();
        let target = self.parse_binding_target()?;
        if !self.eat("=") {
            return Ok(target);
        }
        let default = self.parse_assignment(true)?;
        Ok(self.finish(
            start,
            NodeKind::AssignmentPattern {
                left: Box::new(target),
                right: Box::new(default),
            },
        ))
    }

    /// `...target` in a parameter list or arrow head
    pub(crate) fn parse_rest_element(&mut self) -> Result<Node> {
        let start = self.start();
        self.expect("...")?;
        let argument = self.parse_binding_target()?;
        Ok(self.finish(
            start,
            NodeKind::RestElement {
                argument: Box::new(argument),
            },
        ))
    }
}

#[cfg(test)]
mod tests {
    use crate::options::ParseOptions;
    use crate::parser::parse;
    use test_log::test;

    fn program(source: &str) -> serde_json::Value {
        serde_json::to_value(parse(source, &ParseOptions::default()).unwrap()).unwrap()
    }

    #[test]
    fn test_assignment_destructuring() {
        let tree = program("[a, , b = 1, ...c] = d");
        let left = &tree["body"][0]["expression"]["left"];
        assert_eq!(left["type"], "ArrayPattern");
        assert_eq!(left["elements"][1], serde_json::Value::Null);
        assert_eq!(left["elements"][2]["type"], "AssignmentPattern");
        assert_eq!(left["elements"][3]["type"], "RestElement");

        let tree = program("({a, b: [c], d = 1, ...e} = f)");
        let left = &tree["body"][0]["expression"]["left"];
        assert_eq!(left["type"], "ObjectPattern");
        assert_eq!(left["properties"][1]["value"]["type"], "ArrayPattern");
        assert_eq!(left["properties"][2]["value"]["type"], "AssignmentPattern");
        assert_eq!(left["properties"][3]["type"], "RestElement");

        let tree = program("[a.b, c[0]] = d");
        assert_eq!(tree["body"][0]["expression"]["left"]["elements"][0]["type"], "MemberExpression");
    }

    #[test]
    fn test_binding_patterns() {
        let tree = program("var {a, b: {c}} = d, [e = 1] = f;");
        let declarations = &tree["body"][0]["declarations"];
        assert_eq!(declarations[0]["id"]["type"], "ObjectPattern");
        assert_eq!(declarations[0]["id"]["properties"][1]["value"]["type"], "ObjectPattern");
        assert_eq!(declarations[1]["id"]["elements"][0]["type"], "AssignmentPattern");

        let tree = program("function f([a], {b} = {}, ...c) {}");
        let params = &tree["body"][0]["params"];
        assert_eq!(params[0]["type"], "ArrayPattern");
        assert_eq!(params[1]["type"], "AssignmentPattern");
        assert_eq!(params[2]["type"], "RestElement");
    }

    #[test]
    fn test_invalid_targets() {
        let options = ParseOptions::default();
        assert!(parse("[1] = a", &options).is_err());
        assert!(parse("({a() {}} = b)", &options).is_err());
        assert!(parse("var [a.b] = c", &options).is_err());
        let err = parse("f() = 1", &options).unwrap_err();
        assert_eq!(err.message, "Invalid destructuring target");
    }
}
