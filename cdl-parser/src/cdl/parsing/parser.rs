//! Statement-level parsing: script, titles, table aliases, entities,
//! properties, and resynchronizing error recovery.

use crate::cdl::ast::{Diagnostic, Node};
use crate::cdl::parsing::expr::parse_expression;
use crate::cdl::parsing::unquote;
use crate::cdl::token::{Span, Token, TokenKind};

pub struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    diagnostics: Vec<Diagnostic>,
}

impl Parser {
    pub fn new(tokens: Vec<Token>) -> Self {
        Self {
            tokens,
            pos: 0,
            diagnostics: Vec::new(),
        }
    }

    pub fn into_diagnostics(self) -> Vec<Diagnostic> {
        self.diagnostics
    }

    pub(crate) fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    pub(crate) fn peek_kind(&self) -> Option<TokenKind> {
        self.peek().map(|t| t.kind)
    }

    pub(crate) fn kind_at(&self, offset: usize) -> Option<TokenKind> {
        self.tokens.get(self.pos + offset).map(|t| t.kind)
    }

    pub(crate) fn lexeme_at(&self, offset: usize) -> Option<&str> {
        self.tokens.get(self.pos + offset).map(|t| t.lexeme.as_str())
    }

    pub(crate) fn advance(&mut self) -> Token {
        let token = self.tokens[self.pos].clone();
        self.pos += 1;
        token
    }

    pub(crate) fn at_end(&self) -> bool {
        self.pos >= self.tokens.len()
    }

    /// Span of the current token, or a zero-width span at the end of the
    /// last consumed token when the stream is exhausted.
    pub(crate) fn current_span(&self) -> Span {
        match self.peek() {
            Some(token) => token.span(),
            None => match self.tokens.last() {
                Some(last) => {
                    let end = last.end_position();
                    Span::new(end, end)
                }
                None => Span::empty(),
            },
        }
    }

    pub(crate) fn push_diagnostic(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }

    pub fn parse_script(&mut self) -> Node {
        let start = self
            .tokens
            .first()
            .map(|t| t.position)
            .unwrap_or_default();
        let end = self
            .tokens
            .last()
            .map(|t| t.end_position())
            .unwrap_or_default();

        let mut children = Vec::new();
        while !self.at_end() {
            if self.peek_kind() == Some(TokenKind::Eol) {
                self.advance();
                continue;
            }
            children.push(self.parse_statement());
        }

        Node::Root {
            span: Span::new(start, end),
            children,
        }
    }

    pub(crate) fn parse_statement(&mut self) -> Node {
        match self.peek_kind() {
            Some(TokenKind::Identifier) => {
                if self.lexeme_at(0) == Some("title") && self.kind_at(1) == Some(TokenKind::String)
                {
                    return self.parse_title();
                }
                if self.lexeme_at(0) == Some("table")
                    && self.kind_at(1) == Some(TokenKind::Identifier)
                    && self.kind_at(2) == Some(TokenKind::Equal)
                {
                    return self.parse_table_alias();
                }
                if self.kind_at(1) == Some(TokenKind::Colon) {
                    return self.parse_property();
                }
                self.parse_entity()
            }
            Some(TokenKind::Error) => {
                // Already diagnosed by the lexer; represent it in the tree.
                let token = self.advance();
                Node::Error {
                    span: token.span(),
                    message: "unrecognized input".to_string(),
                }
            }
            _ => self.recover_statement("expected a statement"),
        }
    }

    fn parse_title(&mut self) -> Node {
        let keyword = self.advance();
        let text_token = self.advance();
        Node::Title {
            span: keyword.span().to(text_token.span()),
            text: unquote(&text_token.lexeme),
        }
    }

    fn parse_table_alias(&mut self) -> Node {
        let keyword = self.advance();
        let alias = self.advance();
        self.advance(); // '='
        let target = parse_expression(self);
        Node::TableAlias {
            span: keyword.span().to(target.span()),
            alias: alias.lexeme,
            target: Box::new(target),
        }
    }

    fn parse_property(&mut self) -> Node {
        let name = self.advance();
        let colon = self.advance();

        if self.value_position_is_empty() {
            let span = Span::new(colon.end_position(), colon.end_position());
            self.push_diagnostic(Diagnostic::error(
                format!("missing value for property `{}`", name.lexeme),
                span,
                "parse",
            ));
            return Node::Property {
                span: name.span().to(colon.span()),
                name: name.lexeme,
                value: Box::new(Node::Error {
                    span,
                    message: "missing property value".to_string(),
                }),
            };
        }

        let value = self.parse_expr_list();
        Node::Property {
            span: name.span().to(value.span()),
            name: name.lexeme,
            value: Box::new(value),
        }
    }

    fn value_position_is_empty(&self) -> bool {
        matches!(
            self.peek_kind(),
            None | Some(TokenKind::Eol) | Some(TokenKind::CloseBrace)
        )
    }

    /// One expression, or a `List` when two or more are comma-separated.
    /// A comma may be followed by a single line break, continuing the list
    /// on the next line.
    fn parse_expr_list(&mut self) -> Node {
        let first = parse_expression(self);
        let mut items = vec![first];
        while self.peek_kind() == Some(TokenKind::Comma) {
            self.advance();
            if self.peek_kind() == Some(TokenKind::Eol) {
                self.advance();
            }
            if self.value_position_is_empty() {
                break;
            }
            items.push(parse_expression(self));
        }
        if items.len() == 1 {
            items.pop().expect("one item")
        } else {
            let span = items[0].span().to(items[items.len() - 1].span());
            Node::List { span, items }
        }
    }

    fn parse_entity(&mut self) -> Node {
        let first = self.advance();
        let start_span = first.span();
        let mut end_span = start_span;
        let mut terms = vec![first.lexeme];

        while self.peek_kind() == Some(TokenKind::Identifier) {
            let term = self.advance();
            end_span = term.span();
            terms.push(term.lexeme);
        }

        let mut label = None;
        if self.peek_kind() == Some(TokenKind::String) {
            let token = self.advance();
            end_span = token.span();
            label = Some(unquote(&token.lexeme));
        }

        let mut reference = None;
        if self.peek_kind() == Some(TokenKind::Reference) {
            let token = self.advance();
            end_span = token.span();
            reference = Some(token.lexeme[1..].to_string());
        }

        let mut entity_id = None;
        if self.peek_kind() == Some(TokenKind::Hash)
            && self.kind_at(1) == Some(TokenKind::Identifier)
        {
            self.advance();
            let token = self.advance();
            end_span = token.span();
            entity_id = Some(token.lexeme);
        }

        let mut children = Vec::new();

        // Anything else before the block or line end is a malformed header.
        if !matches!(
            self.peek_kind(),
            None | Some(TokenKind::OpenBrace)
                | Some(TokenKind::Eol)
                | Some(TokenKind::CloseBrace)
        ) {
            let error = self.recover_statement("unexpected token in entity header");
            end_span = error.span();
            children.push(error);
        }

        if self.peek_kind() == Some(TokenKind::OpenBrace) {
            let open = self.advance();
            end_span = open.span();
            loop {
                match self.peek_kind() {
                    None => {
                        self.push_diagnostic(Diagnostic::error(
                            "unclosed entity block",
                            open.span(),
                            "parse",
                        ));
                        break;
                    }
                    Some(TokenKind::Eol) => {
                        self.advance();
                    }
                    Some(TokenKind::CloseBrace) => {
                        let close = self.advance();
                        end_span = close.span();
                        break;
                    }
                    _ => children.push(self.parse_statement()),
                }
            }
        }

        Node::Entity {
            span: start_span.to(end_span),
            terms,
            label,
            reference,
            entity_id,
            children,
        }
    }

    /// Skip to the next statement boundary, producing one diagnostic and one
    /// `Error` node over everything skipped. Consumes at least one token
    /// when not already at end of input, so parsing always makes progress.
    pub(crate) fn recover_statement(&mut self, message: &str) -> Node {
        let start_span = self.current_span();
        let mut end_span = start_span;
        let mut consumed = 0;
        while let Some(token) = self.peek() {
            let kind = token.kind;
            if consumed > 0
                && matches!(
                    kind,
                    TokenKind::Eol | TokenKind::OpenBrace | TokenKind::CloseBrace
                )
            {
                break;
            }
            end_span = token.span();
            self.advance();
            consumed += 1;
            if kind == TokenKind::Eol {
                break;
            }
        }
        let span = start_span.to(end_span);
        self.push_diagnostic(Diagnostic::error(message, span, "parse"));
        Node::Error {
            span,
            message: message.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cdl::ast::Severity;
    use crate::cdl::lexing::lex;
    use crate::cdl::parsing::parse_tokens;

    fn parse(source: &str) -> (Node, Vec<Diagnostic>) {
        parse_tokens(lex(source))
    }

    fn root_children(node: &Node) -> &[Node] {
        match node {
            Node::Root { children, .. } => children,
            other => panic!("expected root, got {:?}", other),
        }
    }

    #[test]
    fn empty_input_parses_to_empty_root() {
        let (root, diagnostics) = parse("");
        assert_eq!(root_children(&root).len(), 0);
        assert_eq!(root.span(), Span::empty());
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn parses_entity_with_terms_reference() {
        let (root, diagnostics) = parse("widget kpi @default");
        assert!(diagnostics.is_empty());
        let children = root_children(&root);
        assert_eq!(children.len(), 1);
        match &children[0] {
            Node::Entity {
                terms, reference, ..
            } => {
                assert_eq!(terms, &["widget".to_string(), "kpi".to_string()]);
                assert_eq!(reference.as_deref(), Some("default"));
            }
            other => panic!("expected entity, got {:?}", other),
        }
    }

    #[test]
    fn parses_entity_with_label_id_and_body() {
        let (root, diagnostics) = parse("page account \"Account\" #p1 {\n    hub: 432\n}\n");
        assert!(diagnostics.is_empty());
        match &root_children(&root)[0] {
            Node::Entity {
                terms,
                label,
                entity_id,
                children,
                ..
            } => {
                assert_eq!(terms, &["page".to_string(), "account".to_string()]);
                assert_eq!(label.as_deref(), Some("Account"));
                assert_eq!(entity_id.as_deref(), Some("p1"));
                assert_eq!(children.len(), 1);
                assert!(matches!(children[0], Node::Property { .. }));
            }
            other => panic!("expected entity, got {:?}", other),
        }
    }

    #[test]
    fn parses_title_directive() {
        let (root, diagnostics) = parse("title \"For QA testing\"\n");
        assert!(diagnostics.is_empty());
        match &root_children(&root)[0] {
            Node::Title { text, .. } => assert_eq!(text, "For QA testing"),
            other => panic!("expected title, got {:?}", other),
        }
    }

    #[test]
    fn parses_table_alias() {
        let (root, diagnostics) = parse("table accounts = crmdata.ArtuAccountHierarchy\n");
        assert!(diagnostics.is_empty());
        match &root_children(&root)[0] {
            Node::TableAlias { alias, target, .. } => {
                assert_eq!(alias, "accounts");
                assert!(matches!(**target, Node::Identifier { .. }));
            }
            other => panic!("expected table alias, got {:?}", other),
        }
    }

    #[test]
    fn parses_comma_list_property() {
        let (root, diagnostics) = parse("palette: \"#86ABE2\",\"#4079D0\",\"#1B6600\"\n");
        assert!(diagnostics.is_empty());
        match &root_children(&root)[0] {
            Node::Property { value, .. } => match &**value {
                Node::List { items, .. } => assert_eq!(items.len(), 3),
                other => panic!("expected list, got {:?}", other),
            },
            other => panic!("expected property, got {:?}", other),
        }
    }

    #[test]
    fn missing_property_value_recovers_with_error_node() {
        let (root, diagnostics) = parse("config hub {\n    hub:\n    next: 1\n}\n");
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].severity, Severity::Error);
        match &root_children(&root)[0] {
            Node::Entity { children, .. } => {
                assert_eq!(children.len(), 2);
                match &children[0] {
                    Node::Property { value, .. } => {
                        assert!(matches!(**value, Node::Error { .. }))
                    }
                    other => panic!("expected property, got {:?}", other),
                }
                assert!(matches!(children[1], Node::Property { .. }));
            }
            other => panic!("expected entity, got {:?}", other),
        }
    }

    #[test]
    fn stray_token_produces_one_error_node_and_resumes() {
        let (root, diagnostics) = parse("} \nconfig hub {\n    hub: 1\n}\n");
        assert_eq!(diagnostics.len(), 1);
        let children = root_children(&root);
        assert_eq!(children.len(), 2);
        assert!(matches!(children[0], Node::Error { .. }));
        assert!(matches!(children[1], Node::Entity { .. }));
    }

    #[test]
    fn unclosed_entity_reports_and_keeps_children() {
        let (root, diagnostics) = parse("config hub {\n    hub: 1\n");
        assert_eq!(diagnostics.len(), 1);
        assert!(diagnostics[0].message.contains("unclosed"));
        match &root_children(&root)[0] {
            Node::Entity { children, .. } => assert_eq!(children.len(), 1),
            other => panic!("expected entity, got {:?}", other),
        }
    }

    #[test]
    fn lexer_error_token_becomes_error_node_without_extra_diagnostic() {
        let (root, diagnostics) = parse("config hub\n§§\nwidget kpi\n");
        // The lex diagnostic is collected separately; the parser adds none.
        assert!(diagnostics.is_empty());
        let children = root_children(&root);
        assert_eq!(children.len(), 3);
        assert!(matches!(children[1], Node::Error { .. }));
    }

    #[test]
    fn root_span_covers_whole_input() {
        let source = "config hub {\n    hub: 432\n}\n";
        let (root, _) = parse(source);
        assert_eq!(root.span().start.byte_offset, 0);
        assert_eq!(root.span().end.byte_offset, source.len());
    }
}
