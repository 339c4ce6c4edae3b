//! Statement and module grammar

use crate::error::{Result, SyntaxError};
use crate::lexer::TokenKind;

use super::ast::{LiteralValue, Node, NodeKind, SourceType, VariableKind};
use super::literal::parse_string;
use super::parser::{Marker, Parser};

impl<'a> Parser<'a> {
    /// Whole program
    pub fn parse_program(mut self) -> Result<Node> {
        let mut body = Vec::new();
        let mut source_type = SourceType::Script;
        while self.has_more_tokens() {
            if self.is_kind(TokenKind::Keyword) && (self.is("import") || self.is("export")) {
                source_type = SourceType::Module;
            }
            body.push(self.parse_statement_list_item()?);
        }
        if !self.at_end() {
            return Err(self.unexpected());
        }

        let mut program = Node::new(NodeKind::Program { body, source_type });
        if self.token_count() == 0 {
            let (range, loc) = self.empty_span();
            program.range = range;
            program.loc = loc;
        } else {
            self.respan(&mut program, 0, self.token_count() - 1);
        }
        Ok(program)
    }

    fn is_keyword(&self, keyword: &str) -> bool {
        self.current().is_some_and(|token| token.is_keyword(keyword))
    }

    /// Statement or declaration
    pub(crate) fn parse_statement_list_item(&mut self) -> Result<Node> {
        let item = if self.is_kind(TokenKind::Keyword) {
            match self.current_value() {
                "function" => self.parse_function_declaration(false),
                "class" => self.parse_class_declaration(false),
                "let" | "const" => self.parse_variable_statement(),
                "import" => self.parse_import(),
                "export" => self.parse_export(),
                _ => self.parse_statement(),
            }
        } else {
            self.parse_statement()
        }?;
        self.check_shorthand_init()?;
        Ok(item)
    }

    fn parse_statement(&mut self) -> Result<Node> {
        let start = self.start();
        let Some(token) = self.current() else {
            return Err(self.unexpected());
        };
        let (kind, value) = (token.kind, token.value);

        match (kind, value) {
            (TokenKind::Punctuator, "{") => self.parse_block(),
            (TokenKind::Punctuator, ";") => {
                self.advance();
                Ok(self.finish(start, NodeKind::EmptyStatement))
            }
            (TokenKind::Keyword, "var") => self.parse_variable_statement(),
            (TokenKind::Keyword, "if") => self.parse_if(),
            (TokenKind::Keyword, "for") => self.parse_for(),
            (TokenKind::Keyword, "while") => {
                self.advance();
                let test = self.parse_paren_expression()?;
                let body = self.parse_statement()?;
                Ok(self.finish(
                    start,
                    NodeKind::WhileStatement {
                        test: Box::new(test),
                        body: Box::new(body),
                    },
                ))
            }
            (TokenKind::Keyword, "do") => {
                self.advance();
                let body = self.parse_statement()?;
                self.expect("while")?;
                let test = self.parse_paren_expression()?;
                self.eat(";");
                Ok(self.finish(
                    start,
                    NodeKind::DoWhileStatement {
                        body: Box::new(body),
                        test: Box::new(test),
                    },
                ))
            }
            (TokenKind::Keyword, "continue" | "break") => {
                self.advance();
                let label = if !self.newline_before() && self.is_kind(TokenKind::Identifier) {
                    Some(Box::new(self.parse_identifier()?))
                } else {
                    None
                };
                self.consume_semicolon()?;
                let kind = if value == "break" {
                    NodeKind::BreakStatement { label }
                } else {
                    NodeKind::ContinueStatement { label }
                };
                Ok(self.finish(start, kind))
            }
            (TokenKind::Keyword, "return") => {
                self.advance();
                let argument = if self.is(";") || self.is("}") || self.at_end() || self.newline_before() {
                    None
                } else {
                    Some(Box::new(self.parse_expression(true)?))
                };
                self.consume_semicolon()?;
                Ok(self.finish(start, NodeKind::ReturnStatement { argument }))
            }
            (TokenKind::Keyword, "throw") => {
                self.advance();
                if self.newline_before() {
                    return Err(self.locate(SyntaxError::new("Illegal newline after throw")));
                }
                let argument = self.parse_expression(true)?;
                self.consume_semicolon()?;
                Ok(self.finish(
                    start,
                    NodeKind::ThrowStatement {
                        argument: Box::new(argument),
                    },
                ))
            }
            (TokenKind::Keyword, "with") => {
                self.advance();
                let object = self.parse_paren_expression()?;
                let body = self.parse_statement()?;
                Ok(self.finish(
                    start,
                    NodeKind::WithStatement {
                        object: Box::new(object),
                        body: Box::new(body),
                    },
                ))
            }
            (TokenKind::Keyword, "switch") => self.parse_switch(),
            (TokenKind::Keyword, "try") => self.parse_try(),
            (TokenKind::Keyword, "debugger") => {
                self.advance();
                self.consume_semicolon()?;
                Ok(self.finish(start, NodeKind::DebuggerStatement))
            }
            (TokenKind::Keyword, "function") => self.parse_function_declaration(false),
            (TokenKind::Identifier, _)
                if self.peek(1).is_some_and(|token| token.is_punctuator(":")) =>
            {
                let label = self.parse_identifier()?;
                self.advance();
                let body = self.parse_statement()?;
                Ok(self.finish(
                    start,
                    NodeKind::LabeledStatement {
                        label: Box::new(label),
                        body: Box::new(body),
                    },
                ))
            }
            _ => {
                let expression = self.parse_expression(true)?;
                self.consume_semicolon()?;
                Ok(self.finish(
                    start,
                    NodeKind::ExpressionStatement {
                        expression: Box::new(expression),
                    },
                ))
            }
        }
    }

    fn parse_block(&mut self) -> Result<Node> {
        let start = self.start();
        self.expect("{")?;
        let mut body = Vec::new();
        while !self.is("}") {
            body.push(self.parse_statement_list_item()?);
        }
        self.expect("}")?;
        Ok(self.finish(start, NodeKind::BlockStatement { body }))
    }

    fn parse_paren_expression(&mut self) -> Result<Node> {
        self.expect("(")?;
        let expression = self.parse_expression(true)?;
        self.expect(")")?;
        Ok(expression)
    }

    fn parse_variable_statement(&mut self) -> Result<Node> {
        let start = self.start();
        let mut declaration = self.parse_variable_declaration(true)?;
        self.consume_semicolon()?;
        let end = self.last(start);
        self.respan(&mut declaration, start, end);
        Ok(declaration)
    }

    /// `var`, `let` or `const` with its declarators, without the terminator
    fn parse_variable_declaration(&mut self, allow_in: bool) -> Result<Node> {
        let start = self.start();
        let Some(kind) = VariableKind::from_keyword(self.current_value()) else {
            return Err(self.unexpected());
        };
        self.advance();

        let mut declarations = Vec::new();
        loop {
            let declarator_start = self.start();
            let id = self.parse_binding_target()?;
            let init = if self.eat("=") {
                Some(Box::new(self.parse_assignment(allow_in)?))
            } else {
                None
            };
            declarations.push(self.finish(
                declarator_start,
                NodeKind::VariableDeclarator {
                    id: Box::new(id),
                    init,
                },
            ));
            if !self.eat(",") {
                break;
            }
        }
        Ok(self.finish(start, NodeKind::VariableDeclaration { declarations, kind }))
    }

    fn parse_if(&mut self) -> Result<Node> {
        let start = self.start();
        self.expect("if")?;
        let test = self.parse_paren_expression()?;
        let consequent = self.parse_statement()?;
        let alternate = if self.is_keyword("else") {
            self.advance();
            Some(Box::new(self.parse_statement()?))
        } else {
            None
        };
        Ok(self.finish(
            start,
            NodeKind::IfStatement {
                test: Box::new(test),
                consequent: Box::new(consequent),
                alternate,
            },
        ))
    }

    fn parse_for(&mut self) -> Result<Node> {
        let start = self.start();
        self.expect("for")?;
        self.expect("(")?;

        let mut init = None;
        if !self.is(";") {
            let head = if self.is_kind(TokenKind::Keyword) && VariableKind::from_keyword(self.current_value()).is_some() {
                let declaration = self.parse_variable_declaration(false)?;
                let single = matches!(
                    &declaration.kind,
                    NodeKind::VariableDeclaration { declarations, .. } if declarations.len() == 1
                );
                if single && self.at_for_in_of() {
                    return self.parse_for_in_of(start, declaration);
                }
                declaration
            } else {
                let outer_init = self.shorthand_init.take();
                let expression = self.parse_expression(false)?;
                if self.at_for_in_of() {
                    let left = self.into_pattern(expression, false)?;
                    self.shorthand_init = outer_init;
                    return self.parse_for_in_of(start, left);
                }
                self.keep_shorthand_init(outer_init);
                expression
            };
            init = Some(Box::new(head));
        }

        self.expect(";")?;
        let test = if self.is(";") {
            None
        } else {
            Some(Box::new(self.parse_expression(true)?))
        };
        self.expect(";")?;
        let update = if self.is(")") {
            None
        } else {
            Some(Box::new(self.parse_expression(true)?))
        };
        self.expect(")")?;
        let body = self.parse_statement()?;
        Ok(self.finish(
            start,
            NodeKind::ForStatement {
                init,
                test,
                update,
                body: Box::new(body),
            },
        ))
    }

    fn at_for_in_of(&self) -> bool {
        self.is_keyword("in") || (self.is_kind(TokenKind::Identifier) && self.is("of"))
    }

    fn parse_for_in_of(&mut self, start: Marker, left: Node) -> Result<Node> {
        let is_of = self.is("of");
        self.advance();
        let right = if is_of {
            self.parse_assignment(true)?
        } else {
            self.parse_expression(true)?
        };
        self.expect(")")?;
        let body = self.parse_statement()?;

        let (left, right, body) = (Box::new(left), Box::new(right), Box::new(body));
        let kind = if is_of {
            NodeKind::ForOfStatement { left, right, body }
        } else {
            NodeKind::ForInStatement { left, right, body }
        };
        Ok(self.finish(start, kind))
    }

    fn parse_switch(&mut self) -> Result<Node> {
        let start = self.start();
        self.expect("switch")?;
        let discriminant = self.parse_paren_expression()?;
        self.expect("{")?;

        let mut cases = Vec::new();
        let mut seen_default = false;
        while !self.is("}") {
            let case_start = self.start();
            let test = if self.is_keyword("case") {
                self.advance();
                Some(Box::new(self.parse_expression(true)?))
            } else if self.is_keyword("default") && !seen_default {
                self.advance();
                seen_default = true;
                None
            } else {
                return Err(self.unexpected());
            };
            self.expect(":")?;

            let mut consequent = Vec::new();
            while !(self.is("}") || self.is_keyword("case") || self.is_keyword("default")) {
                consequent.push(self.parse_statement_list_item()?);
            }
            cases.push(self.finish(case_start, NodeKind::SwitchCase { test, consequent }));
        }
        self.expect("}")?;
        Ok(self.finish(
            start,
            NodeKind::SwitchStatement {
                discriminant: Box::new(discriminant),
                cases,
            },
        ))
    }

    fn parse_try(&mut self) -> Result<Node> {
        let start = self.start();
        self.expect("try")?;
        let block = self.parse_block()?;

        let handler = if self.is_keyword("catch") {
            let catch_start = self.start();
            self.advance();
            let param = if self.eat("(") {
                let param = self.parse_binding_target()?;
                self.expect(")")?;
                Some(Box::new(param))
            } else {
                None
            };
            let body = self.parse_block()?;
            Some(Box::new(self.finish(
                catch_start,
                NodeKind::CatchClause {
                    param,
                    body: Box::new(body),
                },
            )))
        } else {
            None
        };
        let finalizer = if self.is_keyword("finally") {
            self.advance();
            Some(Box::new(self.parse_block()?))
        } else {
            None
        };
        if handler.is_none() && finalizer.is_none() {
            return Err(self.unexpected());
        }

        Ok(self.finish(
            start,
            NodeKind::TryStatement {
                block: Box::new(block),
                handler,
                finalizer,
            },
        ))
    }

    /// Function declaration; the name may be omitted after `export default`
    fn parse_function_declaration(&mut self, optional_id: bool) -> Result<Node> {
        let start = self.start();
        self.expect("function")?;
        let generator = self.eat("*");
        let id = if self.is_kind(TokenKind::Identifier) {
            Some(Box::new(self.parse_identifier()?))
        } else if optional_id {
            None
        } else {
            return Err(self.unexpected());
        };
        let function = self.parse_function_rest(id, generator)?;
        Ok(self.finish(start, NodeKind::FunctionDeclaration(function)))
    }

    fn parse_class_declaration(&mut self, optional_id: bool) -> Result<Node> {
        let start = self.start();
        let class = self.parse_class(!optional_id)?;
        Ok(self.finish(start, NodeKind::ClassDeclaration(class)))
    }

    /// Module specifier string
    fn parse_module_source(&mut self) -> Result<Node> {
        let start = self.start();
        if !self.is_kind(TokenKind::String) {
            return Err(self.unexpected());
        }
        let raw = self.current_value();
        let value = parse_string(raw).map_err(|err| self.locate(err))?;
        self.advance();
        Ok(self.finish(
            start,
            NodeKind::Literal {
                value: LiteralValue::String(value),
                raw: raw.to_string(),
                regex: None,
            },
        ))
    }

    fn expect_contextual(&mut self, word: &str) -> Result<()> {
        if self.is_kind(TokenKind::Identifier) && self.is(word) {
            self.advance();
            Ok(())
        } else {
            Err(self.unexpected())
        }
    }

    fn parse_import(&mut self) -> Result<Node> {
        let start = self.start();
        self.expect("import")?;

        let mut specifiers = Vec::new();
        if !self.is_kind(TokenKind::String) {
            if self.is_kind(TokenKind::Identifier) {
                let local_start = self.start();
                let local = self.parse_identifier()?;
                specifiers.push(self.finish(
                    local_start,
                    NodeKind::ImportDefaultSpecifier {
                        local: Box::new(local),
                    },
                ));
                if self.eat(",") && !(self.is("*") || self.is("{")) {
                    return Err(self.unexpected());
                }
            }
            if self.is("*") {
                let namespace_start = self.start();
                self.advance();
                self.expect_contextual("as")?;
                let local = self.parse_identifier()?;
                specifiers.push(self.finish(
                    namespace_start,
                    NodeKind::ImportNamespaceSpecifier {
                        local: Box::new(local),
                    },
                ));
            } else if self.is("{") {
                specifiers.extend(self.parse_specifier_list(true)?);
            }
            if specifiers.is_empty() {
                return Err(self.unexpected());
            }
            self.expect_contextual("from")?;
        }

        let source = self.parse_module_source()?;
        self.consume_semicolon()?;
        Ok(self.finish(
            start,
            NodeKind::ImportDeclaration {
                specifiers,
                source: Box::new(source),
            },
        ))
    }

    /// `{ a, b as c }` in an import or export clause
    fn parse_specifier_list(&mut self, import: bool) -> Result<Vec<Node>> {
        self.expect("{")?;
        let mut specifiers = Vec::new();
        while !self.is("}") {
            let start = self.start();
            let name = self.parse_identifier_name()?;
            let alias = if self.is_kind(TokenKind::Identifier) && self.is("as") {
                self.advance();
                if import {
                    self.parse_identifier()?
                } else {
                    self.parse_identifier_name()?
                }
            } else {
                name.clone()
            };
            let kind = if import {
                NodeKind::ImportSpecifier {
                    imported: Box::new(name),
                    local: Box::new(alias),
                }
            } else {
                NodeKind::ExportSpecifier {
                    local: Box::new(name),
                    exported: Box::new(alias),
                }
            };
            specifiers.push(self.finish(start, kind));
            if !self.is("}") {
                self.expect(",")?;
            }
        }
        self.expect("}")?;
        Ok(specifiers)
    }

    fn parse_export(&mut self) -> Result<Node> {
        let start = self.start();
        self.expect("export")?;

        if self.eat("*") {
            self.expect_contextual("from")?;
            let source = self.parse_module_source()?;
            self.consume_semicolon()?;
            return Ok(self.finish(
                start,
                NodeKind::ExportAllDeclaration {
                    source: Box::new(source),
                },
            ));
        }

        if self.is_keyword("default") {
            self.advance();
            let declaration = if self.is_keyword("function") {
                self.parse_function_declaration(true)?
            } else if self.is_keyword("class") {
                self.parse_class_declaration(true)?
            } else {
                let expression = self.parse_assignment(true)?;
                self.consume_semicolon()?;
                expression
            };
            return Ok(self.finish(
                start,
                NodeKind::ExportDefaultDeclaration {
                    declaration: Box::new(declaration),
                },
            ));
        }

        if self.is("{") {
            let specifiers = self.parse_specifier_list(false)?;
            let source = if self.is_kind(TokenKind::Identifier) && self.is("from") {
                self.advance();
                Some(Box::new(self.parse_module_source()?))
            } else {
                None
            };
            self.consume_semicolon()?;
            return Ok(self.finish(
                start,
                NodeKind::ExportNamedDeclaration {
                    declaration: None,
                    specifiers,
                    source,
                },
            ));
        }

        let declaration = match self.current_value() {
            "var" | "let" | "const" => self.parse_variable_statement()?,
            "function" => self.parse_function_declaration(false)?,
            "class" => self.parse_class_declaration(false)?,
            _ => return Err(self.unexpected()),
        };
        Ok(self.finish(
            start,
            NodeKind::ExportNamedDeclaration {
                declaration: Some(Box::new(declaration)),
                specifiers: Vec::new(),
                source: None,
            },
        ))
    }
}
