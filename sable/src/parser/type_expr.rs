//! Parsing of type expressions.

use crate::ast;
use crate::parser::tokens::primary::TokenKind;
use crate::parser::{ParseResult, Parser};

impl Parser {
    pub(super) fn parse_type(&mut self) -> ParseResult<ast::TypeExpr> {
        let start_span = self.stream.peek().span;

        if self.stream.eat(TokenKind::LeftParen).is_some() {
            let elements = if self.stream.at(TokenKind::RightParen) {
                vec![]
            } else {
                self.parse_type_list()?
            };
            self.stream.expect(TokenKind::RightParen, "`,` or `)`")?;

            if self.stream.eat(TokenKind::Arrow).is_some() {
                let result = self.parse_type()?;
                return Ok(ast::TypeExpr::Function(ast::FunctionTypeExpr {
                    parameters: elements,
                    span: start_span.to(result.span()),
                    result: Box::new(result),
                }));
            }

            let mut elements = elements;
            if elements.len() == 1 {
                return Ok(elements.remove(0));
            }
            return Ok(ast::TypeExpr::Tuple(ast::TupleTypeExpr {
                elements,
                span: start_span.to(self.stream.previous_span()),
            }));
        }

        let named = ast::TypeExpr::Named(self.parse_named_type()?);
        if self.stream.at_on_same_line(TokenKind::Arrow) {
            self.stream.next();
            let result = self.parse_type()?;
            return Ok(ast::TypeExpr::Function(ast::FunctionTypeExpr {
                parameters: vec![named],
                span: start_span.to(result.span()),
                result: Box::new(result),
            }));
        }

        Ok(named)
    }

    /// `Name` or `Name[Arg, ...]`.
    pub(super) fn parse_named_type(&mut self) -> ParseResult<ast::NamedTypeExpr> {
        let name = self.parse_identifier()?;
        let start_span = name.span;

        let arguments = if self.stream.at_on_same_line(TokenKind::LeftBracket) {
            self.stream.next();
            let arguments = self.parse_type_list()?;
            self.stream.expect(TokenKind::RightBracket, "`,` or `]`")?;
            arguments
        } else {
            vec![]
        };

        Ok(ast::NamedTypeExpr {
            name,
            arguments,
            span: start_span.to(self.stream.previous_span()),
        })
    }

    fn parse_type_list(&mut self) -> ParseResult<Vec<ast::TypeExpr>> {
        let mut types = vec![self.parse_type()?];
        while self.stream.eat(TokenKind::Comma).is_some() {
            types.push(self.parse_type()?);
        }
        Ok(types)
    }
}

#[cfg(test)]
mod tests {
    use crate::ast::{Member, TypeExpr};
    use crate::parser::{parse, tokenize};
    use crate::source::InputSpanFile;

    fn field_type(source: &str) -> TypeExpr {
        let program = parse(tokenize(source, InputSpanFile::UserProgram)).unwrap();
        match &program.definitions[0].members[0] {
            Member::Field(field) => field.type_.clone().unwrap(),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn displays_parsed_types() {
        let cases = [
            ("Int", "Int"),
            ("Map[String, List[Int]]", "Map[String, List[Int]]"),
            ("Int => String", "(Int) => String"),
            ("(Int, Int) => Int => Int", "(Int, Int) => (Int) => Int"),
            ("() => Unit", "() => Unit"),
            ("(Int, String)", "(Int, String)"),
            ("(Int)", "Int"),
        ];

        for (source, expected) in cases.iter() {
            let type_ = field_type(&format!("class C {{ val x: {} }}", source));
            assert_eq!(type_.to_string(), *expected);
        }
    }

    #[test]
    fn function_type_is_recognized() {
        match field_type("class C { val f: Int => Int }") {
            TypeExpr::Function(function) => assert_eq!(function.parameters.len(), 1),
            other => panic!("unexpected {:?}", other),
        }
    }
}
