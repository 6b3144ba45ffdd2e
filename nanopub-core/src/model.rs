//! Nanopub record types: citation, summary text, and the parsed statement.
//!
//! Records are built in two stages. A [`RawNanopub`] holds the statement as
//! text; handing it to a [`StatementParser`] yields the final [`Nanopub`]
//! with the parsed statement already in place.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::statement::{Statement, StatementError, StatementParser};

/// Identifies the source document of a nanopub (e.g. `PMID` / `12345`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Citation {
    #[serde(rename = "type")]
    pub kind: String,
    pub id: String,
}

impl Citation {
    pub fn new(kind: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            id: id.into(),
        }
    }
}

impl fmt::Display for Citation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.kind, self.id)
    }
}

/// Free-form support text quoted from the cited source.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SummaryText(String);

impl SummaryText {
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for SummaryText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A nanopub whose statement has not been parsed yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawNanopub {
    citation: Citation,
    summary_text: SummaryText,
    bel_statement: String,
}

impl RawNanopub {
    pub fn create(
        citation: Citation,
        summary_text: SummaryText,
        bel_statement: impl Into<String>,
    ) -> Self {
        Self {
            citation,
            summary_text,
            bel_statement: bel_statement.into(),
        }
    }

    pub fn citation(&self) -> &Citation {
        &self.citation
    }

    pub fn summary_text(&self) -> &SummaryText {
        &self.summary_text
    }

    /// Statement text exactly as it appeared in the source.
    pub fn bel_statement(&self) -> &str {
        &self.bel_statement
    }

    /// Run `parser` over this record and build the final nanopub.
    pub fn parse_with<P>(self, parser: &P) -> Result<Nanopub, StatementError>
    where
        P: StatementParser + ?Sized,
    {
        let statement = parser.parse_statement(&self)?;
        Ok(Nanopub::new(self.citation, self.summary_text, statement))
    }
}

/// A scientific assertion: citation, support text, and a parsed BEL statement.
///
/// The statement is absent only for records read from a line that had no
/// statement field at all (see the lenient TSV policy).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Nanopub {
    citation: Citation,
    summary_text: SummaryText,
    bel_statement: Option<Statement>,
}

impl Nanopub {
    pub fn new(citation: Citation, summary_text: SummaryText, bel_statement: Statement) -> Self {
        Self {
            citation,
            summary_text,
            bel_statement: Some(bel_statement),
        }
    }

    /// A record whose source carried no statement.
    pub fn without_statement(citation: Citation, summary_text: SummaryText) -> Self {
        Self {
            citation,
            summary_text,
            bel_statement: None,
        }
    }

    pub fn citation(&self) -> &Citation {
        &self.citation
    }

    pub fn summary_text(&self) -> &SummaryText {
        &self.summary_text
    }

    pub fn bel_statement(&self) -> Option<&Statement> {
        self.bel_statement.as_ref()
    }
}
