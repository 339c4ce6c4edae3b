//! Expression grammar
//!
//! Precedence, from loosest: sequence, assignment/arrow/yield, conditional,
//! binary operators by precedence climbing, unary, postfix, then member
//! access, calls and `new` over primary expressions.

use crate::error::Result;
use crate::lexer::{RegexParts, TokenKind};

use super::ast::{
    Class, Function, LiteralValue, MethodKind, Node, NodeKind, PropertyKind, RegexLiteral,
    TemplateValue,
};
use super::literal::{decode_escapes, parse_numeric, parse_string};
use super::parser::{Marker, Parser, PendingRevision};

const ASSIGNMENT_OPERATORS: &[&str] = &[
    "=", "+=", "-=", "*=", "/=", "%=", "<<=", ">>=", ">>>=", "&=", "|=", "^=",
];

const UNARY_OPERATORS: &[&str] = &["-", "+", "!", "~", "typeof", "void", "delete"];

/// Loosest binary precedence
const LOWEST_PRECEDENCE: u8 = 10;

/// Binding precedence of a binary operator; smaller binds tighter
fn binary_precedence(operator: &str) -> Option<u8> {
    let precedence = match operator {
        "*" | "/" | "%" => 1,
        "+" | "-" => 2,
        "<<" | ">>" | ">>>" => 3,
        "<" | ">" | "<=" | ">=" | "instanceof" | "in" => 4,
        "==" | "!=" | "===" | "!==" => 5,
        "&" => 6,
        "^" => 7,
        "|" => 8,
        "&&" => 9,
        "||" => 10,
        _ => return None,
    };
    Some(precedence)
}

/// Where a member definition appears
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum MemberContext {
    Object,
    Class,
}

impl<'a> Parser<'a> {
    /// Comma-separated expressions
    pub(crate) fn parse_expression(&mut self, allow_in: bool) -> Result<Node> {
        let start = self.start();
        let first = self.parse_assignment(allow_in)?;
        if !self.is(",") {
            return Ok(first);
        }

        let mut expressions = vec![first];
        while self.eat(",") {
            expressions.push(self.parse_assignment(allow_in)?);
        }
        Ok(self.finish(start, NodeKind::SequenceExpression { expressions }))
    }

    pub(crate) fn parse_assignment(&mut self, allow_in: bool) -> Result<Node> {
        if self.in_generator && self.is_kind(TokenKind::Keyword) && self.is("yield") {
            return self.parse_yield(allow_in);
        }
        if self.is_kind(TokenKind::Identifier) && self.arrow_follows(1) {
            let start = self.start();
            let param = self.parse_identifier()?;
            return self.parse_arrow_rest(start, vec![param]);
        }

        let start = self.start();
        let outer_init = self.shorthand_init.take();
        let left = self.parse_conditional(allow_in)?;
        let Some(operator) = self.assignment_operator() else {
            self.keep_shorthand_init(outer_init);
            return Ok(left);
        };

        let left = if operator == "=" {
            let pattern = self.into_pattern(left, false)?;
            self.shorthand_init = None;
            pattern
        } else {
            self.check_simple_target(left)?
        };
        self.advance();
        let right = self.parse_assignment(allow_in)?;
        self.keep_shorthand_init(outer_init);
        Ok(self.finish(
            start,
            NodeKind::AssignmentExpression {
                operator: operator.to_string(),
                left: Box::new(left),
                right: Box::new(right),
            },
        ))
    }

    fn assignment_operator(&self) -> Option<&'a str> {
        let token = self.current()?;
        (token.kind == TokenKind::Punctuator && ASSIGNMENT_OPERATORS.contains(&token.value))
            .then_some(token.value)
    }

    /// `=>` follows `ahead` tokens from here on the same line
    fn arrow_follows(&self, ahead: usize) -> bool {
        self.peek(ahead)
            .is_some_and(|token| token.is_punctuator("=>") && !token.has_line_terminator_before)
    }

    fn parse_yield(&mut self, allow_in: bool) -> Result<Node> {
        let start = self.start();
        self.advance();

        let delegate = !self.newline_before() && self.eat("*");
        let ends_here = self.at_end()
            || (!delegate && self.newline_before())
            || [")", "]", "}", ",", ";", ":"].iter().any(|text| self.is(text));
        let argument = if ends_here && !delegate {
            None
        } else {
            Some(Box::new(self.parse_assignment(allow_in)?))
        };
        Ok(self.finish(start, NodeKind::YieldExpression { argument, delegate }))
    }

    fn parse_conditional(&mut self, allow_in: bool) -> Result<Node> {
        let start = self.start();
        let test = self.parse_binary(allow_in, LOWEST_PRECEDENCE)?;
        if !self.eat("?") {
            return Ok(test);
        }

        let consequent = self.parse_assignment(true)?;
        self.expect(":")?;
        let alternate = self.parse_assignment(allow_in)?;
        Ok(self.finish(
            start,
            NodeKind::ConditionalExpression {
                test: Box::new(test),
                consequent: Box::new(consequent),
                alternate: Box::new(alternate),
            },
        ))
    }

    fn current_binary_precedence(&self, allow_in: bool) -> Option<u8> {
        let token = self.current()?;
        match token.kind {
            TokenKind::Punctuator => binary_precedence(token.value),
            TokenKind::Keyword if token.value == "instanceof" => binary_precedence(token.value),
            TokenKind::Keyword if token.value == "in" && allow_in => binary_precedence(token.value),
            _ => None,
        }
    }

    /// Operators binding no looser than `max`, left associative
    fn parse_binary(&mut self, allow_in: bool, max: u8) -> Result<Node> {
        let start = self.start();
        let mut left = self.parse_unary()?;
        while let Some(precedence) = self.current_binary_precedence(allow_in) {
            if precedence > max {
                break;
            }
            let operator = self.current_value().to_string();
            self.advance();
            let right = self.parse_binary(allow_in, precedence - 1)?;
            let (left_box, right_box) = (Box::new(left), Box::new(right));
            let kind = if operator == "&&" || operator == "||" {
                NodeKind::LogicalExpression {
                    operator,
                    left: left_box,
                    right: right_box,
                }
            } else {
                NodeKind::BinaryExpression {
                    operator,
                    left: left_box,
                    right: right_box,
                }
            };
            left = self.finish(start, kind);
        }
        Ok(left)
    }

    fn parse_unary(&mut self) -> Result<Node> {
        let start = self.start();
        let operator = match self.current() {
            Some(token) if matches!(token.kind, TokenKind::Punctuator | TokenKind::Keyword) => {
                token.value
            }
            _ => "",
        };

        if operator == "++" || operator == "--" {
            self.advance();
            let argument = self.parse_unary()?;
            let argument = self.check_simple_target(argument)?;
            return Ok(self.finish(
                start,
                NodeKind::UpdateExpression {
                    operator: operator.to_string(),
                    argument: Box::new(argument),
                    prefix: true,
                },
            ));
        }
        if !UNARY_OPERATORS.contains(&operator) {
            return self.parse_postfix();
        }

        self.advance();
        let argument = self.parse_unary()?;
        Ok(self.finish(
            start,
            NodeKind::UnaryExpression {
                operator: operator.to_string(),
                argument: Box::new(argument),
                prefix: true,
            },
        ))
    }

    fn parse_postfix(&mut self) -> Result<Node> {
        let start = self.start();
        let expr = self.parse_member(true)?;
        if self.newline_before() || !(self.is("++") || self.is("--")) {
            return Ok(expr);
        }

        let expr = self.check_simple_target(expr)?;
        let operator = self.current_value().to_string();
        self.advance();
        Ok(self.finish(
            start,
            NodeKind::UpdateExpression {
                operator,
                argument: Box::new(expr),
                prefix: false,
            },
        ))
    }

    /// Member access, calls and tagged templates over a primary expression.
    /// Calls are left for the caller when parsing a `new` callee.
    pub(crate) fn parse_member(&mut self, allow_call: bool) -> Result<Node> {
        let start = self.start();
        let mut expr = if self.is_kind(TokenKind::Keyword) && self.is("new") {
            self.parse_new()?
        } else if self.is_kind(TokenKind::Keyword) && self.is("super") {
            self.advance();
            self.finish(start, NodeKind::Super)
        } else {
            self.parse_primary()?
        };

        loop {
            if self.eat(".") {
                let property = self.parse_identifier_name()?;
                expr = self.finish(
                    start,
                    NodeKind::MemberExpression {
                        object: Box::new(expr),
                        property: Box::new(property),
                        computed: false,
                    },
                );
            } else if self.eat("[") {
                let property = self.parse_expression(true)?;
                self.expect("]")?;
                expr = self.finish(
                    start,
                    NodeKind::MemberExpression {
                        object: Box::new(expr),
                        property: Box::new(property),
                        computed: true,
                    },
                );
            } else if allow_call && self.is("(") {
                let arguments = self.parse_arguments()?;
                expr = self.finish(
                    start,
                    NodeKind::CallExpression {
                        callee: Box::new(expr),
                        arguments,
                    },
                );
            } else if self.is_kind(TokenKind::Template) && self.current_value().starts_with('`') {
                let quasi = self.parse_template()?;
                expr = self.finish(
                    start,
                    NodeKind::TaggedTemplateExpression {
                        tag: Box::new(expr),
                        quasi: Box::new(quasi),
                    },
                );
            } else {
                return Ok(expr);
            }
        }
    }

    fn parse_new(&mut self) -> Result<Node> {
        let start = self.start();
        self.expect("new")?;
        let callee = self.parse_member(false)?;
        let arguments = if self.is("(") {
            self.parse_arguments()?
        } else {
            Vec::new()
        };
        Ok(self.finish(
            start,
            NodeKind::NewExpression {
                callee: Box::new(callee),
                arguments,
            },
        ))
    }

    fn parse_arguments(&mut self) -> Result<Vec<Node>> {
        self.expect("(")?;
        let mut arguments = Vec::new();
        while !self.is(")") {
            if self.is("...") {
                arguments.push(self.parse_spread()?);
            } else {
                arguments.push(self.parse_assignment(true)?);
            }
            if !self.is(")") {
                self.expect(",")?;
            }
        }
        self.expect(")")?;
        Ok(arguments)
    }

    fn parse_spread(&mut self) -> Result<Node> {
        let start = self.start();
        self.expect("...")?;
        let argument = self.parse_assignment(true)?;
        Ok(self.finish(
            start,
            NodeKind::SpreadElement {
                argument: Box::new(argument),
            },
        ))
    }

    fn parse_primary(&mut self) -> Result<Node> {
        let start = self.start();
        let Some(token) = self.current() else {
            return Err(self.unexpected());
        };
        let (kind, value) = (token.kind, token.value);

        match kind {
            TokenKind::Numeric => {
                self.advance();
                Ok(self.literal(start, LiteralValue::Number(parse_numeric(value)), value))
            }
            TokenKind::String => {
                let decoded = parse_string(value).map_err(|err| self.locate(err))?;
                self.advance();
                Ok(self.literal(start, LiteralValue::String(decoded), value))
            }
            TokenKind::Boolean => {
                self.advance();
                Ok(self.literal(start, LiteralValue::Boolean(value == "true"), value))
            }
            TokenKind::Null => {
                self.advance();
                Ok(self.literal(start, LiteralValue::Null, value))
            }
            TokenKind::RegularExpression => {
                let parts = RegexParts::split(value);
                self.advance();
                Ok(self.finish(
                    start,
                    NodeKind::Literal {
                        value: LiteralValue::Null,
                        raw: value.to_string(),
                        regex: Some(RegexLiteral {
                            pattern: parts.pattern.to_string(),
                            flags: parts.flags.to_string(),
                        }),
                    },
                ))
            }
            TokenKind::Identifier => self.parse_identifier(),
            TokenKind::Template if value.starts_with('`') => self.parse_template(),
            TokenKind::Keyword => match value {
                "this" => {
                    self.advance();
                    Ok(self.finish(start, NodeKind::ThisExpression))
                }
                "function" => self.parse_function_expression(),
                "class" => {
                    let class = self.parse_class(false)?;
                    Ok(self.finish(start, NodeKind::ClassExpression(class)))
                }
                _ => Err(self.unexpected()),
            },
            TokenKind::Punctuator => match value {
                "(" => self.parse_group(),
                "[" => self.parse_array_literal(),
                "{" => self.parse_object_literal(),
                _ => Err(self.unexpected()),
            },
            _ => Err(self.unexpected()),
        }
    }

    fn literal(&self, start: Marker, value: LiteralValue, raw: &str) -> Node {
        self.finish(
            start,
            NodeKind::Literal {
                value,
                raw: raw.to_string(),
                regex: None,
            },
        )
    }

    pub(crate) fn parse_identifier(&mut self) -> Result<Node> {
        if !self.is_kind(TokenKind::Identifier) {
            return Err(self.unexpected());
        }
        self.parse_identifier_name()
    }

    /// Any word, reserved or not, as after `.` or as a property key
    pub(crate) fn parse_identifier_name(&mut self) -> Result<Node> {
        let start = self.start();
        match self.current_kind() {
            Some(
                TokenKind::Identifier | TokenKind::Keyword | TokenKind::Boolean | TokenKind::Null,
            ) => {
                let name = self.current_value().to_string();
                self.advance();
                Ok(self.finish(start, NodeKind::Identifier { name }))
            }
            _ => Err(self.unexpected()),
        }
    }

    /// Parenthesized expression or arrow function parameters
    fn parse_group(&mut self) -> Result<Node> {
        let open = self.start();
        self.expect("(")?;
        if self.eat(")") {
            if !self.is("=>") {
                return Err(self.unexpected());
            }
            return self.parse_arrow_rest(open, Vec::new());
        }

        let inner = self.start();
        let outer_init = self.shorthand_init.take();
        let mut items = Vec::new();
        let mut rest = None;
        // Some item is itself wrapped in parens, which no parameter may be
        let mut wrapped_item = false;
        loop {
            if self.is("...") {
                rest = Some(self.parse_rest_element()?);
                break;
            }
            let item_start = self.start();
            items.push(self.parse_assignment(true)?);
            wrapped_item |= self.parenthesized == Some((item_start, self.last(item_start)));
            if !self.eat(",") {
                break;
            }
        }
        let inner_end = self.last(inner);
        self.expect(")")?;

        let expr = if items.len() == 1 && rest.is_none() {
            items.remove(0)
        } else {
            self.finish_sequence(inner, inner_end, items)
        };
        let pending = PendingRevision::new(expr, inner, inner_end);

        let arrow = !self.newline_before() && self.is("=>");
        if !arrow {
            if rest.is_some() {
                return Err(self.unexpected());
            }
            self.keep_shorthand_init(outer_init);
            self.parenthesized = Some((open, self.last(open)));
            return Ok(pending.commit(self));
        }
        if wrapped_item {
            return Err(self.unexpected());
        }
        self.shorthand_init = outer_init;

        let mut params = match pending.discard() {
            Node {
                kind: NodeKind::SequenceExpression { expressions },
                ..
            } => expressions,
            single => vec![single],
        };
        params = params
            .into_iter()
            .map(|param| self.into_pattern(param, true))
            .collect::<Result<_>>()?;
        params.extend(rest);
        self.parse_arrow_rest(open, params)
    }

    fn finish_sequence(&self, start: Marker, end: Marker, expressions: Vec<Node>) -> Node {
        let mut node = Node::new(NodeKind::SequenceExpression { expressions });
        self.respan(&mut node, start, end);
        node
    }

    /// `=> body` of an arrow function whose parameters are already parsed
    fn parse_arrow_rest(&mut self, start: Marker, params: Vec<Node>) -> Result<Node> {
        self.expect("=>")?;
        let outer_generator = std::mem::replace(&mut self.in_generator, false);
        let body = if self.is("{") {
            self.parse_function_body()
        } else {
            self.parse_assignment(true)
        };
        self.in_generator = outer_generator;
        let body = body?;

        let expression = !matches!(body.kind, NodeKind::BlockStatement { .. });
        Ok(self.finish(
            start,
            NodeKind::ArrowFunctionExpression(Function {
                id: None,
                params,
                body: Box::new(body),
                generator: false,
                expression,
            }),
        ))
    }

    pub(crate) fn parse_array_literal(&mut self) -> Result<Node> {
        let start = self.start();
        self.expect("[")?;
        let mut elements = Vec::new();
        while !self.is("]") {
            if self.eat(",") {
                elements.push(None);
                continue;
            }
            let element = if self.is("...") {
                self.parse_spread()?
            } else {
                self.parse_assignment(true)?
            };
            elements.push(Some(element));
            if !self.is("]") {
                self.expect(",")?;
            }
        }
        self.expect("]")?;
        Ok(self.finish(start, NodeKind::ArrayExpression { elements }))
    }

    pub(crate) fn parse_object_literal(&mut self) -> Result<Node> {
        let start = self.start();
        self.expect("{")?;
        let mut properties = Vec::new();
        while !self.is("}") {
            properties.push(self.parse_member_definition(MemberContext::Object)?);
            if !self.is("}") {
                self.expect(",")?;
            }
        }
        self.expect("}")?;
        Ok(self.finish(start, NodeKind::ObjectExpression { properties }))
    }

    /// Object property or class member. Both share key syntax, accessors,
    /// generator methods and method bodies.
    pub(crate) fn parse_member_definition(&mut self, context: MemberContext) -> Result<Node> {
        let start = self.start();
        if context == MemberContext::Object && self.is("...") {
            return self.parse_spread();
        }

        let is_static = context == MemberContext::Class
            && self.is_kind(TokenKind::Keyword)
            && self.is("static")
            && !self.peek(1).is_some_and(|token| token.is_punctuator("("));
        if is_static {
            self.advance();
        }

        let generator = self.eat("*");
        let mut accessor = None;
        if !generator && (self.is("get") || self.is("set")) && self.is_kind(TokenKind::Identifier) {
            let key_follows = self.peek(1).is_some_and(|token| {
                !(token.kind == TokenKind::Punctuator && ["(", ",", ":", "}", "="].contains(&token.value))
            });
            if key_follows {
                accessor = Some(self.current_value());
                self.advance();
            }
        }

        let key_start = self.start();
        let plain_identifier_key = self.is_kind(TokenKind::Identifier);
        let (key, computed) = self.parse_property_key()?;

        match context {
            MemberContext::Object => {
                if accessor.is_some() || generator || self.is("(") {
                    let value = self.parse_method_value(generator)?;
                    let kind = match accessor {
                        Some("get") => PropertyKind::Get,
                        Some(_) => PropertyKind::Set,
                        None => PropertyKind::Init,
                    };
                    return Ok(self.finish(
                        start,
                        NodeKind::Property {
                            key: Box::new(key),
                            value: Box::new(value),
                            kind,
                            method: kind == PropertyKind::Init,
                            shorthand: false,
                            computed,
                        },
                    ));
                }

                if self.eat(":") {
                    let value = self.parse_assignment(true)?;
                    return Ok(self.property(start, key, value, computed, false));
                }

                if computed || !plain_identifier_key {
                    return Err(self.unexpected_at(key_start));
                }
                // Shorthand, optionally with a default that only a
                // destructuring pattern accepts
                let assign = self.start();
                let value = if self.eat("=") {
                    self.shorthand_init.get_or_insert(assign);
                    let right = self.parse_assignment(true)?;
                    self.finish(
                        start,
                        NodeKind::AssignmentPattern {
                            left: Box::new(key.clone()),
                            right: Box::new(right),
                        },
                    )
                } else {
                    key.clone()
                };
                Ok(self.property(start, key, value, false, true))
            }
            MemberContext::Class => {
                let value = self.parse_method_value(generator)?;
                let kind = match accessor {
                    Some("get") => MethodKind::Get,
                    Some(_) => MethodKind::Set,
                    None if !is_static && !computed && property_key_name(&key) == Some("constructor") => {
                        MethodKind::Constructor
                    }
                    None => MethodKind::Method,
                };
                Ok(self.finish(
                    start,
                    NodeKind::MethodDefinition {
                        key: Box::new(key),
                        value: Box::new(value),
                        kind,
                        computed,
                        r#static: is_static,
                    },
                ))
            }
        }
    }

    fn property(&self, start: Marker, key: Node, value: Node, computed: bool, shorthand: bool) -> Node {
        self.finish(
            start,
            NodeKind::Property {
                key: Box::new(key),
                value: Box::new(value),
                kind: PropertyKind::Init,
                method: false,
                shorthand,
                computed,
            },
        )
    }

    /// Property key and whether it is computed
    fn parse_property_key(&mut self) -> Result<(Node, bool)> {
        let start = self.start();
        if self.eat("[") {
            let key = self.parse_assignment(true)?;
            self.expect("]")?;
            return Ok((key, true));
        }

        let Some(token) = self.current() else {
            return Err(self.unexpected());
        };
        let (kind, value) = (token.kind, token.value);
        let key = match kind {
            TokenKind::String => {
                let decoded = parse_string(value).map_err(|err| self.locate(err))?;
                self.advance();
                self.literal(start, LiteralValue::String(decoded), value)
            }
            TokenKind::Numeric => {
                self.advance();
                self.literal(start, LiteralValue::Number(parse_numeric(value)), value)
            }
            _ => self.parse_identifier_name()?,
        };
        Ok((key, false))
    }

    /// Function expression holding a method's parameters and body
    fn parse_method_value(&mut self, generator: bool) -> Result<Node> {
        let start = self.start();
        let function = self.parse_function_rest(None, generator)?;
        Ok(self.finish(start, NodeKind::FunctionExpression(function)))
    }

    fn parse_function_expression(&mut self) -> Result<Node> {
        let start = self.start();
        self.expect("function")?;
        let generator = self.eat("*");
        let id = if self.is_kind(TokenKind::Identifier) {
            Some(Box::new(self.parse_identifier()?))
        } else {
            None
        };
        let function = self.parse_function_rest(id, generator)?;
        Ok(self.finish(start, NodeKind::FunctionExpression(function)))
    }

    /// Parameters and body of a function
    pub(crate) fn parse_function_rest(&mut self, id: Option<Box<Node>>, generator: bool) -> Result<Function> {
        let outer_generator = std::mem::replace(&mut self.in_generator, generator);
        let parsed = self
            .parse_params()
            .and_then(|params| Ok((params, self.parse_function_body()?)));
        self.in_generator = outer_generator;
        let (params, body) = parsed?;

        Ok(Function {
            id,
            params,
            body: Box::new(body),
            generator,
            expression: false,
        })
    }

    fn parse_params(&mut self) -> Result<Vec<Node>> {
        self.expect("(")?;
        let mut params = Vec::new();
        while !self.is(")") {
            if self.is("...") {
                params.push(self.parse_rest_element()?);
                break;
            }
            params.push(self.parse_binding_element()?);
            if !self.is(")") {
                self.expect(",")?;
            }
        }
        self.expect(")")?;
        Ok(params)
    }

    pub(crate) fn parse_function_body(&mut self) -> Result<Node> {
        let start = self.start();
        self.expect("{")?;
        let mut body = Vec::new();
        while !self.is("}") {
            body.push(self.parse_statement_list_item()?);
        }
        self.expect("}")?;
        Ok(self.finish(start, NodeKind::BlockStatement { body }))
    }

    /// Class head and body; the name is optional for expressions
    pub(crate) fn parse_class(&mut self, require_id: bool) -> Result<Class> {
        self.expect("class")?;
        let id = if self.is_kind(TokenKind::Identifier) {
            Some(Box::new(self.parse_identifier()?))
        } else if require_id {
            return Err(self.unexpected());
        } else {
            None
        };
        let super_class = if self.is_kind(TokenKind::Keyword) && self.eat("extends") {
            Some(Box::new(self.parse_member(true)?))
        } else {
            None
        };

        let start = self.start();
        self.expect("{")?;
        let mut members = Vec::new();
        while !self.is("}") {
            if self.eat(";") {
                continue;
            }
            members.push(self.parse_member_definition(MemberContext::Class)?);
        }
        self.expect("}")?;
        let body = self.finish(start, NodeKind::ClassBody { body: members });

        Ok(Class {
            id,
            super_class,
            body: Box::new(body),
        })
    }

    /// Template literal from its opening chunk through the tail chunk
    fn parse_template(&mut self) -> Result<Node> {
        let start = self.start();
        let mut quasis = Vec::new();
        let mut expressions = Vec::new();
        loop {
            let (element, tail) = self.parse_template_element()?;
            quasis.push(element);
            if tail {
                break;
            }
            expressions.push(self.parse_expression(true)?);
            if !(self.is_kind(TokenKind::Template) && self.current_value().starts_with('}')) {
                return Err(self.unexpected());
            }
        }
        Ok(self.finish(start, NodeKind::TemplateLiteral { quasis, expressions }))
    }

    fn parse_template_element(&mut self) -> Result<(Node, bool)> {
        let start = self.start();
        let chunk = self.current_value();
        if !self.is_kind(TokenKind::Template) || chunk.len() < 2 {
            return Err(self.unexpected());
        }

        let tail = !chunk.ends_with("${");
        let body_end = chunk.len() - if tail { 1 } else { 2 };
        let raw = &chunk[1..body_end];
        let cooked = decode_escapes(raw).map_err(|err| self.locate(err))?;
        self.advance();

        let element = self.finish(
            start,
            NodeKind::TemplateElement {
                value: TemplateValue {
                    raw: raw.to_string(),
                    cooked,
                },
                tail,
            },
        );
        Ok((element, tail))
    }
}

/// Static name of a property key
fn property_key_name(key: &Node) -> Option<&str> {
    match &key.kind {
        NodeKind::Identifier { name } => Some(name),
        NodeKind::Literal {
            value: LiteralValue::String(value),
            ..
        } => Some(value),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use crate::options::ParseOptions;
    use crate::parser::ast::{LiteralValue, MethodKind, Node, NodeKind};
    use crate::parser::parse;
    use test_log::test;

    /// Parse a single expression statement
    fn expr(source: &str) -> Node {
        let program = parse(source, &ParseOptions { range: true, loc: false }).unwrap();
        let NodeKind::Program { mut body, .. } = program.kind else {
            panic!("not a program");
        };
        match body.remove(0).kind {
            NodeKind::ExpressionStatement { expression } => *expression,
            other => panic!("not an expression statement: {other:?}"),
        }
    }

    fn json(source: &str) -> serde_json::Value {
        serde_json::to_value(expr(source)).unwrap()
    }

    #[test]
    fn test_precedence() {
        let tree = json("1 + 2 * 3");
        assert_eq!(tree["type"], "BinaryExpression");
        assert_eq!(tree["operator"], "+");
        assert_eq!(tree["left"]["value"], 1.0);
        assert_eq!(tree["right"]["operator"], "*");
        assert_eq!(tree["right"]["range"], serde_json::json!([4, 9]));

        let tree = json("a - b - c");
        assert_eq!(tree["left"]["operator"], "-");
        assert_eq!(tree["right"]["name"], "c");

        let tree = json("a || b && c");
        assert_eq!(tree["type"], "LogicalExpression");
        assert_eq!(tree["operator"], "||");
        assert_eq!(tree["right"]["operator"], "&&");

        let tree = json("a = b = c");
        assert_eq!(tree["right"]["type"], "AssignmentExpression");
    }

    #[test]
    fn test_unary_and_update() {
        let tree = json("typeof -x");
        assert_eq!(tree["operator"], "typeof");
        assert_eq!(tree["argument"]["operator"], "-");

        let tree = json("++a.b");
        assert_eq!(tree["type"], "UpdateExpression");
        assert_eq!(tree["prefix"], true);

        let tree = json("a--");
        assert_eq!(tree["prefix"], false);

        assert!(parse("++1", &ParseOptions::default()).is_err());
        assert!(parse("1 += 2", &ParseOptions::default()).is_err());
    }

    #[test]
    fn test_member_call_new() {
        let tree = json("new Foo(1).bar(2)[3]");
        assert_eq!(tree["type"], "MemberExpression");
        assert_eq!(tree["computed"], true);
        let call = &tree["object"];
        assert_eq!(call["type"], "CallExpression");
        assert_eq!(call["callee"]["object"]["type"], "NewExpression");
        assert_eq!(call["callee"]["object"]["arguments"][0]["value"], 1.0);

        let tree = json("new Foo");
        assert_eq!(tree["arguments"], serde_json::json!([]));

        let tree = json("f(...xs, 1,)");
        assert_eq!(tree["arguments"][0]["type"], "SpreadElement");
        assert_eq!(tree["arguments"].as_array().unwrap().len(), 2);

        let tree = json("a.if.null");
        assert_eq!(tree["property"]["name"], "null");
    }

    #[test]
    fn test_group_span_excludes_parens() {
        let tree = json("(a + b) * c");
        assert_eq!(tree["left"]["type"], "BinaryExpression");
        assert_eq!(tree["left"]["range"], serde_json::json!([1, 6]));
        assert_eq!(tree["range"], serde_json::json!([0, 11]));

        let tree = json("(a, b)");
        assert_eq!(tree["type"], "SequenceExpression");
        assert_eq!(tree["range"], serde_json::json!([1, 5]));
    }

    #[test]
    fn test_arrow_functions() {
        let tree = json("(a, b = 1, ...c) => a + b");
        assert_eq!(tree["type"], "ArrowFunctionExpression");
        assert_eq!(tree["expression"], true);
        assert_eq!(tree["range"], serde_json::json!([0, 25]));
        let params = tree["params"].as_array().unwrap();
        assert_eq!(params[0]["type"], "Identifier");
        assert_eq!(params[1]["type"], "AssignmentPattern");
        assert_eq!(params[2]["type"], "RestElement");

        let tree = json("x => { return x }");
        assert_eq!(tree["expression"], false);
        assert_eq!(tree["body"]["type"], "BlockStatement");

        let tree = json("() => 1");
        assert_eq!(tree["params"], serde_json::json!([]));

        let tree = json("([a, b], {c}) => a");
        assert_eq!(tree["params"][0]["type"], "ArrayPattern");
        assert_eq!(tree["params"][1]["type"], "ObjectPattern");

        assert!(parse("(a + 1) => a", &ParseOptions::default()).is_err());
        assert!(parse("(a, ...b)", &ParseOptions::default()).is_err());

        let err = parse("((a)) => 1", &ParseOptions::default()).unwrap_err();
        assert_eq!(err.to_string(), "Unexpected token '=>'");
        assert!(parse("(b, (a)) => 1", &ParseOptions::default()).is_err());
        assert_eq!(json("((a)) + 1")["left"]["name"], "a");
    }

    #[test]
    fn test_shorthand_initializers() {
        let options = ParseOptions { range: false, loc: true };
        let err = parse("x = 1;\n({a = 1})", &options).unwrap_err();
        assert_eq!(err.to_string(), "Invalid shorthand property initializer at line 2 column 4");
        assert!(parse("f({a = 1})", &ParseOptions::default()).is_err());
        assert!(parse("[{a = 1}]", &ParseOptions::default()).is_err());
        assert!(parse("x => ({a = 1})", &ParseOptions::default()).is_err());
        assert!(parse("for ({a = 1}; ;);", &ParseOptions::default()).is_err());

        let tree = json("({a = 1} = b)");
        assert_eq!(tree["left"]["type"], "ObjectPattern");
        assert_eq!(tree["left"]["properties"][0]["value"]["type"], "AssignmentPattern");
        assert_eq!(json("[{a = 1}] = b")["left"]["type"], "ArrayPattern");
        assert_eq!(json("({a = 1}) => a")["type"], "ArrowFunctionExpression");
        for source in [
            "for ({a = 1} of xs);",
            "function f({a = 1}) {}",
            "var {a = 1, b: [c = 2]} = d;",
        ] {
            assert!(parse(source, &ParseOptions::default()).is_ok(), "{source}");
        }
    }

    #[test]
    fn test_shorthand_requires_identifier() {
        let err = parse("({if})", &ParseOptions::default()).unwrap_err();
        assert_eq!(err.to_string(), "Unexpected token 'if'");
        assert!(parse("({true})", &ParseOptions::default()).is_err());
        assert!(parse("({'a'})", &ParseOptions::default()).is_err());
        assert_eq!(json("({if: 1})")["properties"][0]["key"]["name"], "if");
        assert_eq!(json("({get, set})")["properties"][1]["shorthand"], true);
    }

    #[test]
    fn test_literals() {
        let tree = json("/ab+c/gi");
        assert_eq!(tree["regex"]["pattern"], "ab+c");
        assert_eq!(tree["regex"]["flags"], "gi");
        assert_eq!(tree["value"], serde_json::Value::Null);

        let tree = json("'a\\u0041'");
        assert_eq!(tree["value"], "aA");
        assert_eq!(tree["raw"], "'a\\u0041'");

        match expr("0x10").kind {
            NodeKind::Literal { value, .. } => assert_eq!(value, LiteralValue::Number(16.0)),
            other => panic!("unexpected {other:?}"),
        }

        let tree = json("[1, , ...a]");
        assert_eq!(tree["elements"][1], serde_json::Value::Null);
        assert_eq!(tree["elements"][2]["type"], "SpreadElement");
    }

    #[test]
    fn test_object_literal() {
        let tree = json("({a, b: 1, [c]: 2, 'd': 3, get e() {}, set e(v) {}, f() {}, *g() {}, ...h})");
        let props = tree["properties"].as_array().unwrap();
        assert_eq!(props[0]["shorthand"], true);
        assert_eq!(props[1]["value"]["value"], 1.0);
        assert_eq!(props[2]["computed"], true);
        assert_eq!(props[3]["key"]["value"], "d");
        assert_eq!(props[4]["kind"], "get");
        assert_eq!(props[5]["kind"], "set");
        assert_eq!(props[6]["method"], true);
        assert_eq!(props[7]["value"]["generator"], true);
        assert_eq!(props[8]["type"], "SpreadElement");

        let tree = json("({get: 1, set() {}})");
        assert_eq!(tree["properties"][0]["key"]["name"], "get");
        assert_eq!(tree["properties"][1]["kind"], "init");
    }

    #[test]
    fn test_class_expression() {
        let tree = json("(class A extends B { constructor() {} static s() {} get g() {} static() {} })");
        assert_eq!(tree["type"], "ClassExpression");
        assert_eq!(tree["superClass"]["name"], "B");
        let members = tree["body"]["body"].as_array().unwrap();
        assert_eq!(members[0]["kind"], "constructor");
        assert_eq!(members[1]["static"], true);
        assert_eq!(members[2]["kind"], "get");
        assert_eq!(members[3]["key"]["name"], "static");
        assert_eq!(members[3]["static"], false);

        match expr("(class { 'constructor'() {} })").kind {
            NodeKind::ClassExpression(class) => match &class.body.kind {
                NodeKind::ClassBody { body } => match &body[0].kind {
                    NodeKind::MethodDefinition { kind, .. } => assert_eq!(*kind, MethodKind::Constructor),
                    other => panic!("unexpected {other:?}"),
                },
                other => panic!("unexpected {other:?}"),
            },
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_templates() {
        let tree = json("`a${b}c${d + 1}`");
        assert_eq!(tree["type"], "TemplateLiteral");
        let quasis = tree["quasis"].as_array().unwrap();
        assert_eq!(quasis.len(), 3);
        assert_eq!(quasis[0]["value"]["raw"], "a");
        assert_eq!(quasis[1]["value"]["cooked"], "c");
        assert_eq!(quasis[2]["tail"], true);
        assert_eq!(tree["expressions"][1]["operator"], "+");

        let tree = json("`${ (() => { if (a) { return `x${b}` } })() }`");
        assert_eq!(tree["quasis"].as_array().unwrap().len(), 2);
        let inner = &tree["expressions"][0]["callee"]["body"]["body"][0]["consequent"]["body"][0];
        assert_eq!(inner["argument"]["type"], "TemplateLiteral");
        assert_eq!(inner["argument"]["expressions"][0]["name"], "b");

        let tree = json("tag`x\\ty`");
        assert_eq!(tree["type"], "TaggedTemplateExpression");
        assert_eq!(tree["quasi"]["quasis"][0]["value"]["raw"], "x\\ty");
        assert_eq!(tree["quasi"]["quasis"][0]["value"]["cooked"], "x\ty");
    }

    #[test]
    fn test_conditional_and_sequence() {
        let tree = json("a ? b : c, d");
        assert_eq!(tree["type"], "SequenceExpression");
        assert_eq!(tree["expressions"][0]["type"], "ConditionalExpression");
    }

    #[test]
    fn test_yield_only_in_generators() {
        let program = parse("function* g() { yield; yield* a; yield b }", &ParseOptions::default()).unwrap();
        let tree = serde_json::to_value(program).unwrap();
        let body = &tree["body"][0]["body"]["body"];
        assert_eq!(body[0]["expression"]["argument"], serde_json::Value::Null);
        assert_eq!(body[1]["expression"]["delegate"], true);
        assert_eq!(body[2]["expression"]["argument"]["name"], "b");

        assert!(parse("function f() { yield 1 }", &ParseOptions::default()).is_err());
    }
}
