//! Tabular export of the visible rows.

use csv::{QuoteStyle, Terminator, WriterBuilder};

use crate::error::Result;
use crate::projection::ProjectedRow;

/// Default file name of the exported artifact.
pub const EXPORT_FILE_NAME: &str = "opportunities.csv";

/// Header line, written unquoted.
pub const CSV_HEADER: &str = "title,summary,source,score";

/// Serialize rows as CSV in projection order.
///
/// Every data field is double-quoted with embedded quotes doubled. A missing
/// score is an empty field; a present score keeps its exact value.
pub fn export_csv(rows: &[ProjectedRow<'_>]) -> Result<String> {
    let mut buffer = Vec::with_capacity(CSV_HEADER.len() + 1 + rows.len() * 64);
    buffer.extend_from_slice(CSV_HEADER.as_bytes());
    buffer.push(b'\n');

    let mut writer = WriterBuilder::new()
        .quote_style(QuoteStyle::Always)
        .terminator(Terminator::Any(b'\n'))
        .from_writer(buffer);
    for row in rows {
        let op = row.opportunity;
        let score = op.score_text();
        writer.write_record([op.title(), op.summary(), op.source(), score.as_str()])?;
    }
    let bytes = writer.into_inner().map_err(|err| err.into_error())?;
    Ok(String::from_utf8(bytes)?)
}
