//! Parsing of expressions, blocks and statements.
//!
//! Infix operators are ordinary method names. Their precedence is determined by the first
//! character of the operator; operators ending with `:` associate to the right. An infix
//! operator, call parentheses or `=` at the beginning of a line never continue the expression
//! on the previous line.

use crate::ast;
use crate::parser::globals::ParameterSite;
use crate::parser::tokens::primary::TokenKind;
use crate::parser::{ParseResult, Parser, SyntaxError};

/// Compound assignment operators such as `+=` bind weaker than everything else.
fn is_assignment_operator(operator: &str) -> bool {
    operator.ends_with('=')
        && !operator.starts_with('=')
        && !["<=", ">=", "!="].contains(&operator)
}

fn infix_precedence(operator: &str) -> u8 {
    if is_assignment_operator(operator) {
        return 0;
    }

    match operator.chars().next() {
        Some('|') => 2,
        Some('^') => 3,
        Some('&') => 4,
        Some('=') | Some('!') => 5,
        Some('<') | Some('>') => 6,
        Some(':') => 7,
        Some('+') | Some('-') => 8,
        Some('*') | Some('/') | Some('%') => 9,
        _ => 10,
    }
}

fn is_right_associative(operator: &str) -> bool {
    operator.ends_with(':') || is_assignment_operator(operator)
}

const PREFIX_OPERATORS: [&str; 4] = ["-", "+", "!", "~"];

fn unescape(text: &str) -> Option<String> {
    let mut result = String::with_capacity(text.len());
    let mut chars = text.chars();

    while let Some(c) = chars.next() {
        if c != '\\' {
            result.push(c);
            continue;
        }

        let escaped = match chars.next()? {
            'n' => '\n',
            't' => '\t',
            'r' => '\r',
            '0' => '\0',
            '\\' => '\\',
            '"' => '"',
            '\'' => '\'',
            _ => return None,
        };
        result.push(escaped);
    }

    Some(result)
}

/// Strips the delimiting quotes from a string or character literal.
fn literal_contents(lexeme: &str) -> &str {
    &lexeme[1..lexeme.len() - 1]
}

impl Parser {
    pub(super) fn parse_expression(&mut self) -> ParseResult<ast::Expression> {
        match self.stream.peek_kind() {
            TokenKind::KwIf => return self.parse_if(),
            TokenKind::KwWhile => return self.parse_while(),
            TokenKind::LeftParen if self.at_closure_parameters() => return self.parse_closure(),
            TokenKind::Identifier if self.stream.peek_nth(1).payload == TokenKind::Arrow => {
                return self.parse_closure()
            }
            _ => (),
        }

        let start_span = self.stream.peek().span;
        let target = self.parse_infix(0)?;

        if self.stream.at_on_same_line(TokenKind::Equals) {
            self.stream.next();
            let value = self.parse_expression()?;
            return Ok(ast::Expression::Assign(ast::AssignExpr {
                span: start_span.to(value.span()),
                target: Box::new(target),
                value: Box::new(value),
            }));
        }

        Ok(target)
    }

    /// Whether the parenthesized group at the cursor is followed by `=>`.
    fn at_closure_parameters(&self) -> bool {
        let mut depth = 0;
        let mut offset = 0;

        loop {
            match self.stream.peek_nth(offset).payload {
                TokenKind::LeftParen => depth += 1,
                TokenKind::RightParen => {
                    depth -= 1;
                    if depth == 0 {
                        return self.stream.peek_nth(offset + 1).payload == TokenKind::Arrow;
                    }
                }
                TokenKind::Eof => return false,
                _ => (),
            }
            offset += 1;
        }
    }

    fn parse_closure(&mut self) -> ParseResult<ast::Expression> {
        let start_span = self.stream.peek().span;

        let parameters = if self.stream.at(TokenKind::LeftParen) {
            self.parse_parameter_clause(ParameterSite::Closure)?
        } else {
            vec![self.parse_parameter(ParameterSite::Closure)?]
        };
        self.stream.expect(TokenKind::Arrow, "`=>`")?;
        let body = self.parse_expression()?;

        Ok(ast::Expression::Closure(ast::ClosureExpr {
            parameters,
            span: start_span.to(body.span()),
            body: Box::new(body),
        }))
    }

    fn parse_if(&mut self) -> ParseResult<ast::Expression> {
        let start_span = self.stream.expect(TokenKind::KwIf, "`if`")?.span;
        self.stream.expect(TokenKind::LeftParen, "`(`")?;
        let cond = self.parse_expression()?;
        self.stream.expect(TokenKind::RightParen, "`)`")?;
        let then = self.parse_expression()?;

        let else_ = if self.stream.eat(TokenKind::KwElse).is_some() {
            Some(Box::new(self.parse_expression()?))
        } else {
            None
        };

        Ok(ast::Expression::If(ast::IfExpr {
            cond: Box::new(cond),
            then: Box::new(then),
            else_,
            span: start_span.to(self.stream.previous_span()),
        }))
    }

    fn parse_while(&mut self) -> ParseResult<ast::Expression> {
        let start_span = self.stream.expect(TokenKind::KwWhile, "`while`")?.span;
        self.stream.expect(TokenKind::LeftParen, "`(`")?;
        let cond = self.parse_expression()?;
        self.stream.expect(TokenKind::RightParen, "`)`")?;
        let body = self.parse_expression()?;

        Ok(ast::Expression::While(ast::WhileExpr {
            cond: Box::new(cond),
            span: start_span.to(body.span()),
            body: Box::new(body),
        }))
    }

    fn parse_infix(&mut self, min_precedence: u8) -> ParseResult<ast::Expression> {
        let mut lhs = self.parse_prefix()?;

        loop {
            let token = self.stream.peek();
            if token.payload != TokenKind::OperatorIdentifier || token.preceded_by_newline {
                break;
            }

            let precedence = infix_precedence(&token.lexeme);
            if precedence < min_precedence {
                break;
            }

            let token = self.stream.next();
            let operator = ast::Identifier {
                text: token.lexeme,
                span: token.span,
            };
            let next_min_precedence = if is_right_associative(&operator.text) {
                precedence
            } else {
                precedence + 1
            };
            let rhs = self.parse_infix(next_min_precedence)?;

            lhs = ast::Expression::BinaryOp(ast::BinaryOperatorExpr {
                span: lhs.span().to(rhs.span()),
                operator,
                lhs: Box::new(lhs),
                rhs: Box::new(rhs),
            });
        }

        Ok(lhs)
    }

    fn parse_prefix(&mut self) -> ParseResult<ast::Expression> {
        let token = self.stream.peek();
        if token.payload == TokenKind::OperatorIdentifier
            && PREFIX_OPERATORS.contains(&token.lexeme.as_str())
        {
            let token = self.stream.next();
            let operand = self.parse_prefix()?;
            return Ok(ast::Expression::UnaryOp(ast::UnaryOperatorExpr {
                span: token.span.to(operand.span()),
                operator: ast::Identifier {
                    text: token.lexeme,
                    span: token.span,
                },
                operand: Box::new(operand),
            }));
        }

        self.parse_postfix()
    }

    fn parse_postfix(&mut self) -> ParseResult<ast::Expression> {
        let mut expression = self.parse_simple_expression()?;

        loop {
            if self.stream.eat(TokenKind::Dot).is_some() {
                let name = self.parse_method_name_or_identifier()?;
                expression = ast::Expression::Select(ast::SelectExpr {
                    span: expression.span().to(name.span),
                    receiver: Box::new(expression),
                    name,
                });
            } else if self.stream.at_on_same_line(TokenKind::LeftParen) {
                let arguments = self.parse_arguments()?;
                expression = ast::Expression::Call(ast::CallExpr {
                    span: expression.span().to(self.stream.previous_span()),
                    callee: Box::new(expression),
                    arguments,
                });
            } else {
                break;
            }
        }

        Ok(expression)
    }

    fn parse_method_name_or_identifier(&mut self) -> ParseResult<ast::Identifier> {
        if self.stream.at(TokenKind::OperatorIdentifier) {
            let token = self.stream.next();
            return Ok(ast::Identifier {
                text: token.lexeme,
                span: token.span,
            });
        }
        self.parse_identifier()
    }

    pub(super) fn parse_arguments(&mut self) -> ParseResult<Vec<ast::Expression>> {
        self.stream.expect(TokenKind::LeftParen, "`(`")?;
        let mut arguments = Vec::new();

        if self.stream.eat(TokenKind::RightParen).is_some() {
            return Ok(arguments);
        }

        loop {
            arguments.push(self.parse_expression()?);
            if self.stream.eat(TokenKind::Comma).is_none() {
                break;
            }
        }

        self.stream.expect(TokenKind::RightParen, "`,` or `)`")?;
        Ok(arguments)
    }

    fn parse_simple_expression(&mut self) -> ParseResult<ast::Expression> {
        let token = self.stream.peek().clone();
        let span = token.span;

        let expression = match token.payload {
            TokenKind::IntLiteral => {
                let digits = token.lexeme.trim_end_matches(|c| c == 'l' || c == 'L');
                let value = digits.parse::<i64>().map_err(|_| SyntaxError::InvalidLiteral {
                    lexeme: token.lexeme.clone(),
                    span,
                })?;
                ast::Expression::IntLiteral(ast::IntLiteralExpr { value, span })
            }
            TokenKind::FloatLiteral => {
                let value = token
                    .lexeme
                    .parse::<f64>()
                    .map_err(|_| SyntaxError::InvalidLiteral {
                        lexeme: token.lexeme.clone(),
                        span,
                    })?;
                ast::Expression::FloatLiteral(ast::FloatLiteralExpr { value, span })
            }
            TokenKind::StringLiteral => {
                let value = unescape(literal_contents(&token.lexeme)).ok_or_else(|| {
                    SyntaxError::InvalidLiteral {
                        lexeme: token.lexeme.clone(),
                        span,
                    }
                })?;
                ast::Expression::StringLiteral(ast::StringLiteralExpr { value, span })
            }
            TokenKind::CharLiteral => {
                let invalid = || SyntaxError::InvalidLiteral {
                    lexeme: token.lexeme.clone(),
                    span,
                };
                let text = unescape(literal_contents(&token.lexeme)).ok_or_else(invalid)?;
                let mut chars = text.chars();
                let value = match (chars.next(), chars.next()) {
                    (Some(value), None) => value,
                    _ => return Err(invalid()),
                };
                ast::Expression::CharLiteral(ast::CharLiteralExpr { value, span })
            }
            TokenKind::KwTrue | TokenKind::KwFalse => {
                ast::Expression::BoolLiteral(ast::BoolLiteralExpr {
                    value: token.payload == TokenKind::KwTrue,
                    span,
                })
            }
            TokenKind::KwNull => ast::Expression::Null(ast::NullExpr { span }),
            TokenKind::KwThis => ast::Expression::This(ast::ThisExpr { span }),
            TokenKind::Identifier => {
                let name = self.parse_identifier()?;
                return Ok(ast::Expression::Variable(ast::VariableExpr { name, span }));
            }
            TokenKind::KwNew => return self.parse_new(),
            TokenKind::LeftBrace => return self.parse_block(),
            TokenKind::LeftParen => {
                self.stream.next();
                if let Some(right_paren) = self.stream.eat(TokenKind::RightParen) {
                    return Ok(ast::Expression::Unit(ast::UnitExpr {
                        span: span.to(right_paren.span),
                    }));
                }
                let inner = self.parse_expression()?;
                self.stream.expect(TokenKind::RightParen, "`)`")?;
                return Ok(inner);
            }
            _ => return Err(self.stream.unexpected("expression")),
        };

        self.stream.next();
        Ok(expression)
    }

    fn parse_new(&mut self) -> ParseResult<ast::Expression> {
        let start_span = self.stream.expect(TokenKind::KwNew, "`new`")?.span;
        let type_ = self.parse_named_type()?;
        let arguments = if self.stream.at_on_same_line(TokenKind::LeftParen) {
            self.parse_arguments()?
        } else {
            vec![]
        };

        Ok(ast::Expression::New(ast::NewExpr {
            type_,
            arguments,
            span: start_span.to(self.stream.previous_span()),
        }))
    }

    pub(super) fn parse_block(&mut self) -> ParseResult<ast::Expression> {
        let start_span = self.stream.expect(TokenKind::LeftBrace, "`{`")?.span;
        let mut statements = Vec::new();

        loop {
            while self.stream.eat(TokenKind::Semicolon).is_some() {}
            if self.stream.eat(TokenKind::RightBrace).is_some() {
                break;
            }

            let statement = match self.stream.peek_kind() {
                TokenKind::KwVal | TokenKind::KwVar => ast::Statement::Local(self.parse_local()?),
                _ => ast::Statement::Expr(self.parse_expression()?),
            };
            statements.push(statement);
            self.expect_statement_end(TokenKind::RightBrace)?;
        }

        Ok(ast::Expression::Block(ast::BlockExpr {
            statements,
            span: start_span.to(self.stream.previous_span()),
        }))
    }

    fn parse_local(&mut self) -> ParseResult<ast::LocalDef> {
        let keyword = self.stream.next();
        let mutable = keyword.payload == TokenKind::KwVar;
        let name = self.parse_identifier()?;

        let type_ = if self.stream.eat(TokenKind::Colon).is_some() {
            Some(self.parse_type()?)
        } else {
            None
        };

        self.stream.expect(TokenKind::Equals, "`=`")?;
        let initializer = self.parse_expression()?;

        Ok(ast::LocalDef {
            mutable,
            name,
            type_,
            span: keyword.span.to(initializer.span()),
            initializer,
        })
    }
}
