//! BEL statement model and a structural statement parser.
//!
//! Grammar accepted by [`BelStatementParser`]:
//!
//! ```text
//! statement := term [relationship object]
//! object    := term | "(" statement ")"
//! term      := function "(" [arg ("," arg)*] ")"
//! arg       := term | [prefix ":"] value
//! value     := bare-token | "quoted \"string\""
//! ```
//!
//! Parsing normalizes whitespace and quoting; the rendered form parses back
//! to the same statement. Namespaces and function names are not checked
//! against any vocabulary.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;
use thiserror::Error;

use crate::model::RawNanopub;

static FUNCTION_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z][A-Za-z0-9_]*$").unwrap_or_else(|_| unreachable!())
});

static RELATIONSHIP_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:[A-Za-z][A-Za-z0-9_]*|->|-\||=>|=\||--|:>|>>)$")
        .unwrap_or_else(|_| unreachable!())
});

/// Statement text could not be parsed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message} at offset {offset}")]
pub struct StatementError {
    pub message: String,
    /// Byte offset into the statement text.
    pub offset: usize,
}

impl StatementError {
    fn new(message: impl Into<String>, offset: usize) -> Self {
        Self {
            message: message.into(),
            offset,
        }
    }
}

/// Turns the raw statement text of a record into a [`Statement`].
///
/// Implementations receive the whole record so they can use the citation or
/// summary text as context.
pub trait StatementParser {
    fn parse_statement(&self, raw: &RawNanopub) -> Result<Statement, StatementError>;
}

/// Default parser for BEL statement text.
#[derive(Debug, Clone, Copy, Default)]
pub struct BelStatementParser;

impl StatementParser for BelStatementParser {
    fn parse_statement(&self, raw: &RawNanopub) -> Result<Statement, StatementError> {
        tracing::trace!(citation = %raw.citation(), "parsing BEL statement");
        raw.bel_statement().parse()
    }
}

/// A namespace-qualified (or bare) value, e.g. `HGNC:AKT1` or `"apoptotic process"`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Parameter {
    pub prefix: Option<String>,
    pub value: String,
}

impl Parameter {
    pub fn new(prefix: Option<&str>, value: impl Into<String>) -> Self {
        Self {
            prefix: prefix.map(str::to_string),
            value: value.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Argument {
    Term(Term),
    Parameter(Parameter),
}

/// A function applied to arguments, e.g. `p(HGNC:AKT1,pmod(Ph))`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Term {
    pub function: String,
    pub arguments: Vec<Argument>,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Relationship(String);

impl Relationship {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Object {
    Term(Term),
    Statement(Box<Statement>),
}

/// A parsed BEL statement: a subject term with an optional relationship and object.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct Statement {
    subject: Term,
    predicate: Option<(Relationship, Object)>,
}

impl Statement {
    pub fn subject(&self) -> &Term {
        &self.subject
    }

    pub fn relationship(&self) -> Option<&Relationship> {
        self.predicate.as_ref().map(|(rel, _)| rel)
    }

    pub fn object(&self) -> Option<&Object> {
        self.predicate.as_ref().map(|(_, obj)| obj)
    }

    /// True for a lone term with no relationship.
    pub fn is_term_only(&self) -> bool {
        self.predicate.is_none()
    }
}

impl FromStr for Statement {
    type Err = StatementError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut cursor = Cursor::new(s);
        cursor.skip_ws();
        if cursor.at_end() {
            return Err(cursor.error("empty statement"));
        }

        let statement = cursor.statement()?;
        cursor.skip_ws();
        if !cursor.at_end() {
            return Err(cursor.error("unexpected trailing input"));
        }
        Ok(statement)
    }
}

impl TryFrom<String> for Statement {
    type Error = StatementError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Statement> for String {
    fn from(statement: Statement) -> Self {
        statement.to_string()
    }
}

fn needs_quotes(value: &str) -> bool {
    value.is_empty() || value.chars().any(is_delimiter)
}

fn write_value(f: &mut fmt::Formatter<'_>, value: &str) -> fmt::Result {
    if !needs_quotes(value) {
        return f.write_str(value);
    }
    f.write_str("\"")?;
    for ch in value.chars() {
        if ch == '"' || ch == '\\' {
            f.write_str("\\")?;
        }
        write!(f, "{ch}")?;
    }
    f.write_str("\"")
}

impl fmt::Display for Parameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(prefix) = &self.prefix {
            write_value(f, prefix)?;
            f.write_str(":")?;
        }
        write_value(f, &self.value)
    }
}

impl fmt::Display for Argument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Argument::Term(term) => write!(f, "{term}"),
            Argument::Parameter(param) => write!(f, "{param}"),
        }
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(", self.function)?;
        for (i, arg) in self.arguments.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write!(f, "{arg}")?;
        }
        f.write_str(")")
    }
}

impl fmt::Display for Relationship {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Display for Object {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Object::Term(term) => write!(f, "{term}"),
            Object::Statement(nested) => write!(f, "({nested})"),
        }
    }
}

impl fmt::Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.subject)?;
        if let Some((rel, obj)) = &self.predicate {
            write!(f, " {rel} {obj}")?;
        }
        Ok(())
    }
}

fn is_delimiter(c: char) -> bool {
    c.is_whitespace() || matches!(c, ',' | '(' | ')' | ':' | '"')
}

/// Deepest nesting of terms and parenthesized statements the parser accepts.
pub const MAX_DEPTH: usize = 256;

struct Cursor<'a> {
    text: &'a str,
    pos: usize,
    depth: usize,
}

impl<'a> Cursor<'a> {
    fn new(text: &'a str) -> Self {
        Self {
            text,
            pos: 0,
            depth: 0,
        }
    }

    /// Run `parse` one nesting level down, failing past [`MAX_DEPTH`].
    fn nested<T>(
        &mut self,
        parse: impl FnOnce(&mut Self) -> Result<T, StatementError>,
    ) -> Result<T, StatementError> {
        if self.depth >= MAX_DEPTH {
            return Err(self.error("statement nested too deeply"));
        }
        self.depth += 1;
        let result = parse(self);
        self.depth -= 1;
        result
    }

    fn rest(&self) -> &'a str {
        &self.text[self.pos..]
    }

    fn at_end(&self) -> bool {
        self.pos >= self.text.len()
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.pos += ch.len_utf8();
        Some(ch)
    }

    fn skip_ws(&mut self) {
        while self.peek().is_some_and(char::is_whitespace) {
            self.bump();
        }
    }

    fn eat(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.bump();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, expected: char) -> Result<(), StatementError> {
        if self.eat(expected) {
            Ok(())
        } else {
            Err(self.error(format!("expected '{expected}'")))
        }
    }

    fn error(&self, message: impl Into<String>) -> StatementError {
        StatementError::new(message, self.pos)
    }

    fn take_while(&mut self, keep: impl Fn(char) -> bool) -> &'a str {
        let start = self.pos;
        while self.peek().is_some_and(&keep) {
            self.bump();
        }
        &self.text[start..self.pos]
    }

    fn statement(&mut self) -> Result<Statement, StatementError> {
        self.skip_ws();
        let subject = self.term()?;
        self.skip_ws();
        if self.at_end() || self.peek() == Some(')') {
            return Ok(Statement {
                subject,
                predicate: None,
            });
        }

        let start = self.pos;
        let rel = self.take_while(|c| !c.is_whitespace() && c != '(' && c != ')');
        if !RELATIONSHIP_PATTERN.is_match(rel) {
            return Err(StatementError::new(
                format!("invalid relationship '{rel}'"),
                start,
            ));
        }
        let relationship = Relationship(rel.to_string());

        self.skip_ws();
        let object = if self.eat('(') {
            let nested = self.nested(Self::statement)?;
            self.skip_ws();
            self.expect(')')?;
            Object::Statement(Box::new(nested))
        } else {
            Object::Term(self.term()?)
        };

        Ok(Statement {
            subject,
            predicate: Some((relationship, object)),
        })
    }

    fn term(&mut self) -> Result<Term, StatementError> {
        self.skip_ws();
        let start = self.pos;
        let function = self.take_while(|c| !is_delimiter(c));
        if function.is_empty() {
            return Err(self.error("expected function name"));
        }
        self.term_arguments(function, start)
    }

    /// Parse `(args...)` following an already consumed function name.
    fn term_arguments(&mut self, function: &str, start: usize) -> Result<Term, StatementError> {
        if !FUNCTION_PATTERN.is_match(function) {
            return Err(StatementError::new(
                format!("invalid function name '{function}'"),
                start,
            ));
        }
        self.expect('(')?;

        let arguments = self.nested(|cursor| {
            let mut arguments = Vec::new();
            cursor.skip_ws();
            if cursor.eat(')') {
                return Ok(arguments);
            }
            loop {
                arguments.push(cursor.argument()?);
                cursor.skip_ws();
                if cursor.eat(',') {
                    continue;
                }
                cursor.expect(')')?;
                return Ok(arguments);
            }
        })?;

        Ok(Term {
            function: function.to_string(),
            arguments,
        })
    }

    fn argument(&mut self) -> Result<Argument, StatementError> {
        self.skip_ws();
        if self.peek() == Some('"') {
            let value = self.quoted()?;
            return self.parameter_tail(value);
        }

        let start = self.pos;
        let token = self.take_while(|c| !is_delimiter(c));
        if token.is_empty() {
            return Err(self.error("expected argument"));
        }
        if self.peek() == Some('(') {
            return Ok(Argument::Term(self.term_arguments(token, start)?));
        }
        self.parameter_tail(token.to_string())
    }

    /// `first` was read; an optional `:value` turns it into a prefix.
    fn parameter_tail(&mut self, first: String) -> Result<Argument, StatementError> {
        if !self.eat(':') {
            return Ok(Argument::Parameter(Parameter {
                prefix: None,
                value: first,
            }));
        }
        let value = self.value()?;
        Ok(Argument::Parameter(Parameter {
            prefix: Some(first),
            value,
        }))
    }

    fn value(&mut self) -> Result<String, StatementError> {
        if self.peek() == Some('"') {
            return self.quoted();
        }
        let token = self.take_while(|c| !is_delimiter(c));
        if token.is_empty() {
            return Err(self.error("expected value"));
        }
        Ok(token.to_string())
    }

    fn quoted(&mut self) -> Result<String, StatementError> {
        let start = self.pos;
        self.expect('"')?;
        let mut out = String::new();
        loop {
            match self.bump() {
                Some('"') => return Ok(out),
                Some('\\') => match self.bump() {
                    Some(ch) => out.push(ch),
                    None => break,
                },
                Some(ch) => out.push(ch),
                None => break,
            }
        }
        Err(StatementError::new("unterminated quoted value", start))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(s: &str) -> Statement {
        s.parse().unwrap()
    }

    #[test]
    fn test_parses_simple_statement() {
        let stmt = parse("p(HGNC:AKT1) increases p(HGNC:AKT2)");
        assert_eq!(stmt.subject().function, "p");
        assert_eq!(
            stmt.subject().arguments,
            vec![Argument::Parameter(Parameter::new(Some("HGNC"), "AKT1"))]
        );
        assert_eq!(stmt.relationship().unwrap().as_str(), "increases");
        assert_eq!(stmt.to_string(), "p(HGNC:AKT1) increases p(HGNC:AKT2)");
    }

    #[test]
    fn test_normalizes_whitespace() {
        let stmt = parse("  p( HGNC:AKT1 , pmod(Ph, S, 473) )\t->   bp(GO:apoptosis) ");
        assert_eq!(
            stmt.to_string(),
            "p(HGNC:AKT1,pmod(Ph,S,473)) -> bp(GO:apoptosis)"
        );
    }

    #[test]
    fn test_term_only_statement() {
        let stmt = parse("a(CHEBI:\"nitric oxide\")");
        assert!(stmt.is_term_only());
        assert!(stmt.object().is_none());
        assert_eq!(stmt.to_string(), "a(CHEBI:\"nitric oxide\")");
    }

    #[test]
    fn test_nested_statement() {
        let stmt = parse("p(HGNC:A) increases (p(HGNC:B) decreases bp(GO:\"cell death\"))");
        match stmt.object().unwrap() {
            Object::Statement(nested) => {
                assert_eq!(nested.relationship().unwrap().as_str(), "decreases");
            }
            other => panic!("expected nested statement, got {other:?}"),
        }
        assert_eq!(
            stmt.to_string(),
            "p(HGNC:A) increases (p(HGNC:B) decreases bp(GO:\"cell death\"))"
        );
    }

    #[test]
    fn test_drops_needless_quotes() {
        assert_eq!(parse("p(HGNC:\"AKT1\")").to_string(), "p(HGNC:AKT1)");
    }

    #[test]
    fn test_escapes_quotes_in_values() {
        let stmt = parse(r#"a(CHEBI:"a \"b\" c")"#);
        match &stmt.subject().arguments[0] {
            Argument::Parameter(p) => assert_eq!(p.value, "a \"b\" c"),
            other => panic!("expected parameter, got {other:?}"),
        }
        assert_eq!(stmt.to_string(), r#"a(CHEBI:"a \"b\" c")"#);
    }

    #[test]
    fn test_normalization_is_idempotent() {
        let inputs = [
            "p(HGNC:AKT1) increases p(HGNC:AKT2)",
            "complex( p(HGNC:A),p(HGNC:\"B 2\") )  =|  a(CHEBI:x)",
            "p(HGNC:A) -| (p(HGNC:B) => p(HGNC:C))",
            "bp(GO:\"\")",
            "tscript(p(HGNC:TP53)) directlyIncreases r(HGNC:MDM2)",
        ];
        for input in inputs {
            let once = parse(input);
            let twice = parse(&once.to_string());
            assert_eq!(once, twice, "input: {input}");
            assert_eq!(once.to_string(), twice.to_string());
        }
    }

    #[test]
    fn test_empty_statement_is_error() {
        let err = "   ".parse::<Statement>().unwrap_err();
        assert_eq!(err.message, "empty statement");
    }

    #[test]
    fn test_unbalanced_parens_is_error() {
        let err = "p(HGNC:AKT1".parse::<Statement>().unwrap_err();
        assert_eq!(err.message, "expected ')'");
        assert_eq!(err.offset, 11);
    }

    #[test]
    fn test_invalid_relationship_is_error() {
        let err = "p(HGNC:A) in,creases p(HGNC:B)"
            .parse::<Statement>()
            .unwrap_err();
        assert!(err.message.contains("invalid relationship"));
        assert_eq!(err.offset, 10);
    }

    #[test]
    fn test_missing_object_is_error() {
        assert!("p(HGNC:A) increases".parse::<Statement>().is_err());
    }

    #[test]
    fn test_trailing_input_is_error() {
        let err = "p(HGNC:A) increases p(HGNC:B) extra"
            .parse::<Statement>()
            .unwrap_err();
        assert_eq!(err.message, "unexpected trailing input");
    }

    #[test]
    fn test_unterminated_quote_is_error() {
        let err = "p(HGNC:\"AKT1)".parse::<Statement>().unwrap_err();
        assert_eq!(err.message, "unterminated quoted value");
    }

    fn nested_terms(depth: usize) -> String {
        format!("{}A{}", "p(".repeat(depth), ")".repeat(depth))
    }

    #[test]
    fn test_deep_nesting_is_error() {
        let err = nested_terms(10_000).parse::<Statement>().unwrap_err();
        assert_eq!(err.message, "statement nested too deeply");
        assert_eq!(err.offset, MAX_DEPTH * 2 + 2);

        let ok = nested_terms(MAX_DEPTH).parse::<Statement>().unwrap();
        assert_eq!(ok.to_string(), nested_terms(MAX_DEPTH));
        assert!(nested_terms(MAX_DEPTH + 1).parse::<Statement>().is_err());
    }

    #[test]
    fn test_deeply_nested_statements_are_error() {
        let text = format!(
            "{}p(A){}",
            "p(A) -> (".repeat(MAX_DEPTH),
            ")".repeat(MAX_DEPTH)
        );
        let err = text.parse::<Statement>().unwrap_err();
        assert_eq!(err.message, "statement nested too deeply");
    }

    #[test]
    fn test_bel_parser_uses_record_text() {
        use crate::model::{Citation, SummaryText};

        let raw = RawNanopub::create(
            Citation::new("PMID", "1"),
            SummaryText::new("text"),
            "p(HGNC:A)  increases p(HGNC:B)",
        );
        let stmt = BelStatementParser.parse_statement(&raw).unwrap();
        assert_eq!(stmt.to_string(), "p(HGNC:A) increases p(HGNC:B)");
    }
}
