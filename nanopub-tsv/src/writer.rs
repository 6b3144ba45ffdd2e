//! TSV writer: nanopubs → text, one line per record.

use nanopub_core::Nanopub;
use std::io::{self, Write};
use tracing::debug;

use crate::error::TsvError;

/// Append one tab-joined line per nanopub to `sink` and hand the sink back.
///
/// Newlines in the summary text are removed so every record stays on one
/// line. Fields are written as-is; embedded tabs are not escaped. A record
/// without a statement gets an empty last field. The sink is never flushed.
pub fn write_nanopubs<'a, I, W>(nanopubs: I, mut sink: W) -> Result<W, TsvError>
where
    I: IntoIterator<Item = &'a Nanopub>,
    W: Write,
{
    let builder = line_builder();
    let mut line = Vec::new();

    let mut count = 0usize;
    for nanopub in nanopubs {
        line = encode_line(&builder, nanopub, line)?;
        sink.write_all(&line)?;
        line.clear();
        count += 1;
    }

    debug!(records = count, "wrote tsv nanopubs");
    Ok(sink)
}

fn line_builder() -> csv::WriterBuilder {
    let mut builder = csv::WriterBuilder::new();
    builder
        .delimiter(b'\t')
        .quote_style(csv::QuoteStyle::Never)
        .terminator(csv::Terminator::Any(b'\n'))
        .has_headers(false);
    builder
}

/// Encode one record into `buf`, which comes back holding the line.
fn encode_line(
    builder: &csv::WriterBuilder,
    nanopub: &Nanopub,
    buf: Vec<u8>,
) -> Result<Vec<u8>, TsvError> {
    let citation = nanopub.citation();
    let summary = strip_newlines(nanopub.summary_text().as_str());
    let statement = nanopub
        .bel_statement()
        .map(ToString::to_string)
        .unwrap_or_default();

    let mut wtr = builder.from_writer(buf);
    wtr.write_record([
        citation.kind.as_str(),
        citation.id.as_str(),
        summary.as_str(),
        statement.as_str(),
    ])?;
    let buf = wtr
        .into_inner()
        .map_err(|err| io::Error::new(err.error().kind(), err.to_string()))?;
    Ok(buf)
}

/// Write into a fresh in-memory buffer and return it as text.
pub fn write_to_string<'a, I>(nanopubs: I) -> Result<String, TsvError>
where
    I: IntoIterator<Item = &'a Nanopub>,
{
    let buf = write_nanopubs(nanopubs, Vec::new())?;
    String::from_utf8(buf)
        .map_err(|err| TsvError::Io(io::Error::new(io::ErrorKind::InvalidData, err)))
}

fn strip_newlines(text: &str) -> String {
    text.chars().filter(|c| *c != '\n' && *c != '\r').collect()
}
