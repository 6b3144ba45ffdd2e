//! TSV reader: text → nanopubs.
//!
//! Each non-blank line is trimmed and split on tabs into
//! `(citation type, citation id, summary text, statement)`. Fields past the
//! fourth are ignored. The statement is parsed before the record is built,
//! so every returned [`Nanopub`] already holds its normalized statement.
//! Under [`MalformedLinePolicy::Lenient`] a short line has no statement field
//! and yields a record without one.

use nanopub_core::{Citation, Nanopub, RawNanopub, StatementParser, SummaryText};
use tracing::{debug, warn};

use crate::error::TsvError;
use crate::options::{MalformedLinePolicy, TsvOptions};

/// Number of positional fields per line.
pub const FIELD_COUNT: usize = 4;

/// Parse a whole TSV document.
///
/// The read is atomic: the first malformed line or rejected statement fails
/// the call and nothing parsed before it is returned.
///
/// Trimming also strips leading tabs, so a line whose citation type is empty
/// loses that field and reads as one field short.
pub fn read_nanopubs<P>(
    data: &str,
    parser: &P,
    options: &TsvOptions,
) -> Result<Vec<Nanopub>, TsvError>
where
    P: StatementParser + ?Sized,
{
    let mut out = Vec::new();

    for (idx, line) in data.lines().enumerate() {
        let line_no = idx + 1;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let ([ctype, cid, summary, statement], found) =
            split_fields(line, line_no, options.malformed_lines)?;
        let citation = Citation::new(ctype, cid);
        let summary = SummaryText::new(summary);

        if found < FIELD_COUNT {
            out.push(Nanopub::without_statement(citation, summary));
            continue;
        }

        let nanopub = RawNanopub::create(citation, summary, statement)
            .parse_with(parser)
            .map_err(|source| TsvError::Statement {
                line: line_no,
                source,
            })?;
        out.push(nanopub);
    }

    debug!(records = out.len(), "read tsv nanopubs");
    Ok(out)
}

fn split_fields(
    line: &str,
    line_no: usize,
    policy: MalformedLinePolicy,
) -> Result<([&str; FIELD_COUNT], usize), TsvError> {
    let mut fields = [""; FIELD_COUNT];
    let mut found = 0;

    for part in line.split('\t') {
        if let Some(slot) = fields.get_mut(found) {
            *slot = part;
        }
        found += 1;
    }

    if found > FIELD_COUNT {
        debug!(
            line = line_no,
            extra = found - FIELD_COUNT,
            "ignoring fields past the statement"
        );
    }

    if found < FIELD_COUNT {
        match policy {
            MalformedLinePolicy::Reject => {
                return Err(TsvError::MalformedLine {
                    line: line_no,
                    found,
                });
            }
            MalformedLinePolicy::Lenient => {
                warn!(line = line_no, found, "short line, reading it without a statement");
            }
        }
    }

    Ok((fields, found))
}

#[cfg(test)]
mod tests {
    use super::*;
    use nanopub_core::BelStatementParser;

    const LINE: &str = "PMID\t12345\tsome support text\tp(HGNC:AKT1) increases p(HGNC:AKT2)";

    fn read(data: &str) -> Result<Vec<Nanopub>, TsvError> {
        read_nanopubs(data, &BelStatementParser, &TsvOptions::default())
    }

    #[test]
    fn test_reads_concrete_line() {
        let nanopubs = read(LINE).unwrap();
        assert_eq!(nanopubs.len(), 1);

        let n = &nanopubs[0];
        assert_eq!(n.citation().kind, "PMID");
        assert_eq!(n.citation().id, "12345");
        assert_eq!(n.summary_text().as_str(), "some support text");
        assert_eq!(
            n.bel_statement().unwrap().to_string(),
            "p(HGNC:AKT1) increases p(HGNC:AKT2)"
        );
    }

    #[test]
    fn test_empty_input_reads_nothing() {
        assert!(read("").unwrap().is_empty());
        assert!(read("\n  \n\t\n").unwrap().is_empty());
    }

    #[test]
    fn test_preserves_order_and_skips_blank_lines() {
        let data = "PMID\t1\tfirst\tp(HGNC:A) increases p(HGNC:B)\n\n  \n\
                    PMID\t2\tsecond\tp(HGNC:C)\r\n\
                    DOI\t10.1/x\tthird\tbp(GO:x) -> bp(GO:y)\n";
        let nanopubs = read(data).unwrap();
        let ids: Vec<_> = nanopubs.iter().map(|n| n.citation().id.as_str()).collect();
        assert_eq!(ids, vec!["1", "2", "10.1/x"]);
        assert_eq!(nanopubs[2].citation().kind, "DOI");
    }

    #[test]
    fn test_trims_each_line() {
        let nanopubs = read(&format!("   {LINE}   \n")).unwrap();
        assert_eq!(nanopubs[0].citation().kind, "PMID");
        assert_eq!(
            nanopubs[0].bel_statement().unwrap().to_string(),
            "p(HGNC:AKT1) increases p(HGNC:AKT2)"
        );
    }

    #[test]
    fn test_ignores_extra_fields() {
        let nanopubs = read(&format!("{LINE}\textra\tmore")).unwrap();
        assert_eq!(nanopubs.len(), 1);
        assert_eq!(
            nanopubs[0].bel_statement().unwrap().to_string(),
            "p(HGNC:AKT1) increases p(HGNC:AKT2)"
        );
    }

    #[test]
    fn test_empty_summary_field_is_kept() {
        let nanopubs = read("PMID\t9\t\tp(HGNC:A)").unwrap();
        assert!(nanopubs[0].summary_text().is_empty());
    }

    #[test]
    fn test_short_line_rejected_by_default() {
        let data = format!("{LINE}\nPMID\t12345\tno statement here\n");
        match read(&data) {
            Err(TsvError::MalformedLine { line, found }) => {
                assert_eq!(line, 2);
                assert_eq!(found, 3);
            }
            other => panic!("expected MalformedLine, got {other:?}"),
        }
    }

    #[test]
    fn test_lenient_policy_reads_every_short_line() {
        let data = "PMID\t1\tno statement\n\
                    PMID\t2\n\
                    PMID\n\
                    PMID\t4\ttext\tp(HGNC:A)\n";
        let nanopubs = read_nanopubs(data, &BelStatementParser, &TsvOptions::lenient()).unwrap();
        assert_eq!(nanopubs.len(), 4);

        assert_eq!(nanopubs[0].summary_text().as_str(), "no statement");
        assert!(nanopubs[0].bel_statement().is_none());
        assert_eq!(nanopubs[1].citation().id, "2");
        assert!(nanopubs[1].summary_text().is_empty());
        assert_eq!(nanopubs[2].citation(), &Citation::new("PMID", ""));
        assert_eq!(nanopubs[3].bel_statement().unwrap().to_string(), "p(HGNC:A)");

        let (fields, found) = split_fields("PMID\t1", 1, MalformedLinePolicy::Lenient).unwrap();
        assert_eq!(fields, ["PMID", "1", "", ""]);
        assert_eq!(found, 2);
    }

    #[test]
    fn test_lenient_policy_still_rejects_bad_statements() {
        let data = "PMID\t1\n\
                    PMID\t2\ttext\tp(HGNC:A\n";
        let err = read_nanopubs(data, &BelStatementParser, &TsvOptions::lenient()).unwrap_err();
        assert!(matches!(err, TsvError::Statement { line: 2, .. }));
    }

    #[test]
    fn test_trim_drops_empty_leading_field() {
        match read("\t1\ttext\tp(HGNC:A)") {
            Err(TsvError::MalformedLine { line: 1, found: 3 }) => {}
            other => panic!("expected MalformedLine, got {other:?}"),
        }
    }

    #[test]
    fn test_statement_error_reports_line() {
        let data = format!("{LINE}\n\nPMID\t2\ttext\tp(HGNC:A\n");
        let err = read(&data).unwrap_err();
        assert_eq!(err.line(), Some(3));
        assert!(matches!(err, TsvError::Statement { .. }));
    }
}
