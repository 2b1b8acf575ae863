//! Expression parsing.
//!
//! Binary operators go through one binding-power table instead of a
//! function per precedence level. All operators are left-associative; the
//! tiers from loosest to tightest are `or`, `and`, comparisons, additive,
//! multiplicative.

use crate::cdl::ast::{BinaryOp, Diagnostic, Node};
use crate::cdl::parsing::parser::Parser;
use crate::cdl::parsing::unquote;
use crate::cdl::token::TokenKind;

/// Left and right binding power for an infix operator token, or `None` when
/// the token is not an operator.
fn binding_power(kind: TokenKind, lexeme: &str) -> Option<(BinaryOp, u8, u8)> {
    let (op, power) = match kind {
        TokenKind::Keyword => match lexeme.to_ascii_lowercase().as_str() {
            "or" => (BinaryOp::Or, 1),
            "and" => (BinaryOp::And, 3),
            _ => return None,
        },
        TokenKind::Equal => (BinaryOp::Eq, 5),
        TokenKind::NotEqual => (BinaryOp::NotEq, 5),
        TokenKind::LessThan => (BinaryOp::Less, 5),
        TokenKind::LessThanOrEqual => (BinaryOp::LessEq, 5),
        TokenKind::MoreThan => (BinaryOp::Greater, 5),
        TokenKind::MoreThanOrEqual => (BinaryOp::GreaterEq, 5),
        TokenKind::Plus => (BinaryOp::Add, 7),
        TokenKind::Minus => (BinaryOp::Sub, 7),
        TokenKind::Star => (BinaryOp::Mul, 9),
        TokenKind::Slash => (BinaryOp::Div, 9),
        TokenKind::Percent => (BinaryOp::Mod, 9),
        _ => return None,
    };
    Some((op, power, power + 1))
}

pub(crate) fn parse_expression(parser: &mut Parser) -> Node {
    parse_binary(parser, 0)
}

fn parse_binary(parser: &mut Parser, min_power: u8) -> Node {
    let mut lhs = parse_factor(parser);
    loop {
        let Some(token) = parser.peek() else { break };
        let Some((op, left_power, right_power)) = binding_power(token.kind, &token.lexeme)
        else {
            break;
        };
        if left_power < min_power {
            break;
        }
        parser.advance();
        let rhs = parse_binary(parser, right_power);
        let span = lhs.span().to(rhs.span());
        lhs = Node::Binary {
            span,
            op,
            lhs: Box::new(lhs),
            rhs: Box::new(rhs),
        };
    }
    lhs
}

fn can_start_factor(kind: Option<TokenKind>, lexeme: Option<&str>) -> bool {
    match kind {
        Some(
            TokenKind::Identifier
            | TokenKind::Number
            | TokenKind::String
            | TokenKind::Color
            | TokenKind::Reference
            | TokenKind::OpenParen
            | TokenKind::Minus
            | TokenKind::Error,
        ) => true,
        Some(TokenKind::Keyword) => matches!(lexeme, Some("true") | Some("false")),
        _ => false,
    }
}

fn parse_factor(parser: &mut Parser) -> Node {
    match parser.peek_kind() {
        Some(TokenKind::Number) => parse_number(parser, false),
        Some(TokenKind::Minus) => {
            if parser.kind_at(1) == Some(TokenKind::Number) {
                return parse_number(parser, true);
            }
            // A bare dash is the empty-value marker, e.g. `emptyValue: -`.
            let token = parser.advance();
            Node::Identifier {
                span: token.span(),
                name: "-".to_string(),
            }
        }
        Some(TokenKind::String) => {
            let token = parser.advance();
            Node::Str {
                span: token.span(),
                value: unquote(&token.lexeme),
            }
        }
        Some(TokenKind::Keyword) if matches!(parser.lexeme_at(0), Some("true") | Some("false")) => {
            let token = parser.advance();
            Node::Boolean {
                span: token.span(),
                value: token.lexeme == "true",
            }
        }
        Some(TokenKind::Color) => {
            let token = parser.advance();
            Node::Color {
                span: token.span(),
                value: token.lexeme,
            }
        }
        Some(TokenKind::Reference) => {
            let token = parser.advance();
            Node::Reference {
                span: token.span(),
                path: token.lexeme[1..].to_string(),
                resolved: None,
            }
        }
        Some(TokenKind::Identifier) => match parser.kind_at(1) {
            Some(TokenKind::OpenParen) => parse_function(parser),
            Some(TokenKind::Colon) => parse_vpath(parser),
            _ => {
                let token = parser.advance();
                Node::Identifier {
                    span: token.span(),
                    name: token.lexeme,
                }
            }
        },
        Some(TokenKind::OpenParen) => {
            let open = parser.advance();
            let inner = parse_expression(parser);
            if parser.peek_kind() == Some(TokenKind::CloseParen) {
                parser.advance();
            } else {
                parser.push_diagnostic(Diagnostic::error(
                    "expected `)`",
                    open.span(),
                    "parse",
                ));
            }
            inner
        }
        Some(TokenKind::Error) => {
            // Already diagnosed by the lexer.
            let token = parser.advance();
            Node::Error {
                span: token.span(),
                message: "unrecognized input".to_string(),
            }
        }
        _ => recover_expression(parser),
    }
}

fn parse_number(parser: &mut Parser, negated: bool) -> Node {
    let start_span;
    let mut text = String::new();
    if negated {
        let minus = parser.advance();
        start_span = minus.span();
        text.push('-');
    } else {
        start_span = parser.current_span();
    }
    let token = parser.advance();
    text.push_str(&token.lexeme);
    let value: f64 = text.parse().unwrap_or(0.0);
    let mut span = start_span.to(token.span());

    // `100%` is a percentage literal; `a % b` keeps `%` as an operator. The
    // percent sign is absorbed only when what follows cannot start a factor.
    if parser.peek_kind() == Some(TokenKind::Percent)
        && !can_start_factor(parser.kind_at(1), parser.lexeme_at(1))
    {
        let percent = parser.advance();
        span = span.to(percent.span());
        text.push('%');
    }

    Node::Number { span, value, text }
}

fn parse_function(parser: &mut Parser) -> Node {
    let name = parser.advance();
    let open = parser.advance();
    let mut end_span = open.span();
    let mut args = Vec::new();
    loop {
        match parser.peek_kind() {
            Some(TokenKind::CloseParen) => {
                let close = parser.advance();
                end_span = close.span();
                break;
            }
            Some(TokenKind::Comma) => {
                parser.advance();
            }
            None | Some(TokenKind::Eol) => {
                parser.push_diagnostic(Diagnostic::error(
                    format!("unterminated argument list for `{}`", name.lexeme),
                    open.span(),
                    "parse",
                ));
                break;
            }
            _ => {
                let arg = parse_expression(parser);
                end_span = arg.span();
                args.push(arg);
            }
        }
    }
    Node::Function {
        span: name.span().to(end_span),
        name: name.lexeme,
        args,
    }
}

fn parse_vpath(parser: &mut Parser) -> Node {
    let table = parser.advance();
    let colon = parser.advance();
    let mut span = table.span().to(colon.span());
    let mut field = None;
    if parser.peek_kind() == Some(TokenKind::Identifier) {
        let token = parser.advance();
        span = span.to(token.span());
        field = Some(token.lexeme);
    }
    Node::VPath {
        span,
        table: table.lexeme,
        field,
    }
}

/// An expression position holds a token that cannot start a factor. Skip to
/// the nearest expression boundary and cover the gap with an `Error` node.
fn recover_expression(parser: &mut Parser) -> Node {
    let start_span = parser.current_span();
    let mut end_span = start_span;
    while let Some(kind) = parser.peek_kind() {
        if matches!(
            kind,
            TokenKind::Eol
                | TokenKind::Comma
                | TokenKind::CloseBrace
                | TokenKind::CloseParen
                | TokenKind::OpenBrace
        ) {
            break;
        }
        end_span = parser.current_span();
        parser.advance();
    }
    let span = start_span.to(end_span);
    parser.push_diagnostic(Diagnostic::error("expected a value", span, "parse"));
    Node::Error {
        span,
        message: "expected a value".to_string(),
    }
}
