//! Parsing of top-level definitions and their members.

use crate::ast;
use crate::ast::{Binding, Modifiers, TypeDefKind, Variance};
use crate::parser::tokens::primary::TokenKind;
use crate::parser::{ParseResult, Parser, SyntaxError};
use crate::source::InputSpan;

/// Where a parameter clause appears. Decides which parameter features are allowed.
#[derive(Clone, Copy, PartialEq, Eq)]
pub(super) enum ParameterSite {
    Class { case: bool },
    Method,
    Closure,
}

impl Parser {
    pub(super) fn parse_modifiers(&mut self) -> ast::ModifierList {
        let mut modifiers = ast::ModifierList::new();
        while self.stream.peek_kind().is_modifier() {
            let token = self.stream.next();
            if let Some(modifier) = Modifiers::from_keyword(&token.lexeme) {
                modifiers.add(modifier, token.span);
            }
        }
        modifiers
    }

    fn reject_modifiers(
        &self,
        modifiers: &ast::ModifierList,
        rejected: Modifiers,
        target: &'static str,
    ) -> ParseResult<()> {
        match modifiers
            .spans
            .iter()
            .find(|(modifier, _)| rejected.contains(*modifier))
        {
            Some((modifier, span)) => Err(SyntaxError::IllegalModifier {
                modifier: modifier.keyword().unwrap_or("?"),
                target,
                span: *span,
            }),
            None => Ok(()),
        }
    }

    pub(super) fn parse_type_def(&mut self) -> ParseResult<ast::TypeDef> {
        let start_span = self.stream.peek().span;
        let modifiers = self.parse_modifiers();

        let kind = match self.stream.peek_kind() {
            TokenKind::KwClass => TypeDefKind::Class,
            TokenKind::KwTrait => TypeDefKind::Trait,
            TokenKind::KwObject => TypeDefKind::Object,
            _ => return Err(self.stream.unexpected("`class`, `trait` or `object`")),
        };
        self.stream.next();

        self.reject_modifiers(&modifiers, Modifiers::LAZY | Modifiers::OVERRIDE, "types")?;
        match kind {
            TypeDefKind::Class => (),
            TypeDefKind::Trait => self.reject_modifiers(&modifiers, Modifiers::CASE, "traits")?,
            TypeDefKind::Object => self.reject_modifiers(
                &modifiers,
                Modifiers::ABSTRACT | Modifiers::SEALED,
                "objects",
            )?,
        }

        let name = self.parse_identifier()?;
        let signature_span = start_span.to(name.span);

        let type_parameters = if self.stream.at_on_same_line(TokenKind::LeftBracket) {
            self.parse_type_parameters()?
        } else {
            vec![]
        };

        let parameters = if self.stream.at_on_same_line(TokenKind::LeftParen) {
            if kind != TypeDefKind::Class {
                return Err(SyntaxError::ParametersNotAllowed {
                    kind,
                    span: self.stream.peek().span,
                });
            }
            let case = modifiers.contains(Modifiers::CASE);
            self.parse_parameter_clause(ParameterSite::Class { case })?
        } else {
            vec![]
        };

        let mut parents = Vec::new();
        if self.stream.eat(TokenKind::KwExtends).is_some() {
            parents.push(self.parse_parent()?);
            while self.stream.eat(TokenKind::KwWith).is_some() {
                parents.push(self.parse_parent()?);
            }
        }

        let members = if self.stream.at_on_same_line(TokenKind::LeftBrace) {
            self.parse_template_body()?
        } else {
            vec![]
        };
        self.expect_statement_end(TokenKind::Eof)?;

        Ok(ast::TypeDef {
            kind,
            modifiers,
            name,
            type_parameters,
            parameters,
            parents,
            members,
            signature_span,
        })
    }

    pub(super) fn parse_type_parameters(&mut self) -> ParseResult<Vec<ast::TypeParameter>> {
        self.stream.expect(TokenKind::LeftBracket, "`[`")?;
        let mut type_parameters = Vec::new();

        loop {
            let start_span = self.stream.peek().span;
            let variance = if self.stream.at(TokenKind::OperatorIdentifier) {
                match self.stream.peek().lexeme.as_str() {
                    "+" => Variance::Covariant,
                    "-" => Variance::Contravariant,
                    _ => return Err(self.stream.unexpected("type parameter")),
                }
            } else {
                Variance::Invariant
            };
            if variance != Variance::Invariant {
                self.stream.next();
            }

            let name = self.parse_identifier()?;
            let upper_bound = if self.stream.eat(TokenKind::Subtype).is_some() {
                Some(self.parse_type()?)
            } else {
                None
            };

            type_parameters.push(ast::TypeParameter {
                name,
                variance,
                upper_bound,
                span: start_span.to(self.stream.previous_span()),
            });

            if self.stream.eat(TokenKind::Comma).is_none() {
                break;
            }
        }

        self.stream.expect(TokenKind::RightBracket, "`,` or `]`")?;
        Ok(type_parameters)
    }

    pub(super) fn parse_parameter_clause(
        &mut self,
        site: ParameterSite,
    ) -> ParseResult<Vec<ast::Parameter>> {
        self.stream.expect(TokenKind::LeftParen, "`(`")?;
        let mut parameters = Vec::new();

        if self.stream.eat(TokenKind::RightParen).is_some() {
            return Ok(parameters);
        }

        loop {
            parameters.push(self.parse_parameter(site)?);
            if self.stream.eat(TokenKind::Comma).is_none() {
                break;
            }
        }

        self.stream.expect(TokenKind::RightParen, "`,` or `)`")?;
        Ok(parameters)
    }

    pub(super) fn parse_parameter(&mut self, site: ParameterSite) -> ParseResult<ast::Parameter> {
        let start_span = self.stream.peek().span;
        let modifiers = self.parse_modifiers();
        let allowed = match site {
            ParameterSite::Class { .. } => {
                Modifiers::PRIVATE | Modifiers::PROTECTED | Modifiers::OVERRIDE
            }
            ParameterSite::Method => Modifiers::IMPLICIT,
            ParameterSite::Closure => Modifiers::empty(),
        };
        self.reject_modifiers(&modifiers, allowed.complement(), "parameters")?;

        let binding = match (site, self.stream.peek_kind()) {
            (ParameterSite::Class { .. }, TokenKind::KwVal) => {
                self.stream.next();
                Some(Binding::Val)
            }
            (ParameterSite::Class { .. }, TokenKind::KwVar) => {
                self.stream.next();
                Some(Binding::Var)
            }
            (ParameterSite::Class { case: true }, _) => Some(Binding::Val),
            _ => None,
        };

        let name = self.parse_identifier()?;

        let type_ = if site == ParameterSite::Closure {
            if self.stream.eat(TokenKind::Colon).is_some() {
                Some(self.parse_type()?)
            } else {
                None
            }
        } else {
            self.stream.expect(TokenKind::Colon, "`:`")?;
            Some(self.parse_type()?)
        };

        let default = if site != ParameterSite::Closure && self.stream.eat(TokenKind::Equals).is_some()
        {
            Some(self.parse_expression()?)
        } else {
            None
        };

        Ok(ast::Parameter {
            modifiers,
            binding,
            name,
            type_,
            default,
            span: start_span.to(self.stream.previous_span()),
        })
    }

    fn parse_parent(&mut self) -> ParseResult<ast::ParentRef> {
        let named = self.parse_named_type()?;
        let start_span = named.span;

        let arguments = if self.stream.at_on_same_line(TokenKind::LeftParen) {
            self.parse_arguments()?
        } else {
            vec![]
        };

        Ok(ast::ParentRef {
            type_: ast::TypeExpr::Named(named),
            arguments,
            span: start_span.to(self.stream.previous_span()),
        })
    }

    fn parse_template_body(&mut self) -> ParseResult<Vec<ast::Member>> {
        self.stream.expect(TokenKind::LeftBrace, "`{`")?;
        let mut members = Vec::new();

        loop {
            while self.stream.eat(TokenKind::Semicolon).is_some() {}
            if self.stream.eat(TokenKind::RightBrace).is_some() {
                break;
            }

            members.push(self.parse_member()?);
            self.expect_statement_end(TokenKind::RightBrace)?;
        }

        Ok(members)
    }

    fn parse_member(&mut self) -> ParseResult<ast::Member> {
        let start_span = self.stream.peek().span;
        let modifiers = self.parse_modifiers();
        self.reject_modifiers(&modifiers, Modifiers::CASE | Modifiers::SEALED, "members")?;

        match self.stream.peek_kind() {
            TokenKind::KwVal | TokenKind::KwVar => {
                let field = self.parse_field(modifiers, start_span)?;
                Ok(ast::Member::Field(field))
            }
            TokenKind::KwDef => {
                self.reject_modifiers(&modifiers, Modifiers::LAZY, "methods")?;
                let method = self.parse_method(modifiers, start_span)?;
                Ok(ast::Member::Method(method))
            }
            _ => Err(self.stream.unexpected("`val`, `var` or `def`")),
        }
    }

    fn parse_field(
        &mut self,
        modifiers: ast::ModifierList,
        start_span: InputSpan,
    ) -> ParseResult<ast::FieldDef> {
        let mutable = self.stream.next().payload == TokenKind::KwVar;
        if mutable {
            self.reject_modifiers(&modifiers, Modifiers::LAZY, "variables")?;
        }

        let name = self.parse_identifier()?;
        let type_ = if self.stream.eat(TokenKind::Colon).is_some() {
            Some(self.parse_type()?)
        } else {
            None
        };

        let initializer = if self.stream.eat(TokenKind::Equals).is_some() {
            self.parse_expression()?
        } else {
            ast::Expression::Empty(ast::EmptyExpr {
                span: self.stream.after_previous(),
            })
        };

        Ok(ast::FieldDef {
            modifiers,
            mutable,
            name,
            type_,
            initializer: Some(initializer),
            span: start_span.to(self.stream.previous_span()),
        })
    }

    fn parse_method(
        &mut self,
        modifiers: ast::ModifierList,
        start_span: InputSpan,
    ) -> ParseResult<ast::FunctionDef> {
        self.stream.expect(TokenKind::KwDef, "`def`")?;
        let name = self.parse_method_name()?;

        let type_parameters = if self.stream.at_on_same_line(TokenKind::LeftBracket) {
            self.parse_type_parameters()?
        } else {
            vec![]
        };

        let mut parameter_lists = Vec::new();
        while self.stream.at_on_same_line(TokenKind::LeftParen) {
            parameter_lists.push(self.parse_parameter_clause(ParameterSite::Method)?);
        }

        let return_type = if self.stream.eat(TokenKind::Colon).is_some() {
            Some(self.parse_type()?)
        } else {
            None
        };
        let signature_span = start_span.to(self.stream.previous_span());

        let body = if self.stream.eat(TokenKind::Equals).is_some() {
            Some(self.parse_expression()?)
        } else if self.stream.at_on_same_line(TokenKind::LeftBrace) {
            Some(self.parse_block()?)
        } else {
            None
        };

        Ok(ast::FunctionDef {
            modifiers,
            name,
            type_parameters,
            parameter_lists,
            return_type,
            body,
            signature_span,
        })
    }

    /// Method names may also be operators: `def +(other: V): V`.
    fn parse_method_name(&mut self) -> ParseResult<ast::Identifier> {
        if self.stream.at(TokenKind::OperatorIdentifier) {
            let token = self.stream.next();
            return Ok(ast::Identifier {
                text: token.lexeme,
                span: token.span,
            });
        }
        self.parse_identifier()
    }
}
