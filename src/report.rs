//! Text and JSON reports over ranked results.

use crate::config::{OutputConfig, OutputFormat};
use crate::{MatchRange, RankedResult, Result, Snippet};
use serde::{Deserialize, Serialize};
use std::io::Write;
use tracing::info;

const HIGHLIGHT_BEGIN: &str = "\x1b[1;31m";
const HIGHLIGHT_END: &str = "\x1b[0m";
const HEADER_BEGIN: &str = "\x1b[35m";
const SEPARATOR: &str = "----------";

/// One JSON record per ranked document, built from its best snippet.
///
/// `matchlocations` index into `content`, leading indicator included.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportRecord {
    pub filename: String,
    pub location: String,
    pub content: String,
    pub score: f64,
    pub matchlocations: Vec<MatchRange>,
}

impl From<&RankedResult> for ReportRecord {
    fn from(result: &RankedResult) -> Self {
        let (content, matchlocations) = result
            .snippets
            .first()
            .map(|s| (s.content.clone(), content_ranges(s)))
            .unwrap_or_default();

        Self {
            filename: result.filename.clone(),
            location: result.location.clone(),
            content,
            score: result.score,
            matchlocations,
        }
    }
}

/// Wrap each range of `text` in `begin`/`end` markers.
///
/// Ranges are applied in order; ones that overlap an earlier range, run past
/// the text or do not sit on char boundaries are skipped.
pub fn highlight(text: &str, ranges: &[MatchRange], begin: &str, end: &str) -> String {
    let mut sorted = ranges.to_vec();
    sorted.sort_unstable();

    let mut out = String::with_capacity(text.len() + sorted.len() * (begin.len() + end.len()));
    let mut cursor = 0;

    for range in sorted {
        if range.start < cursor
            || range.start > range.end
            || range.end > text.len()
            || !text.is_char_boundary(range.start)
            || !text.is_char_boundary(range.end)
        {
            continue;
        }
        out.push_str(&text[cursor..range.start]);
        out.push_str(begin);
        out.push_str(&text[range.start..range.end]);
        out.push_str(end);
        cursor = range.end;
    }

    out.push_str(&text[cursor..]);
    out
}

/// Window-local highlights shifted past the leading indicator.
fn content_ranges(snippet: &Snippet) -> Vec<MatchRange> {
    snippet
        .highlights
        .iter()
        .map(|r| MatchRange::new(r.start + snippet.lead, r.end + snippet.lead))
        .collect()
}

fn display_snippet(snippet: &Snippet, no_color: bool) -> String {
    // Sentinel snippets have nothing to highlight.
    if no_color || snippet.is_sentinel() {
        return snippet.content.clone();
    }

    highlight(&snippet.content, &content_ranges(snippet), HIGHLIGHT_BEGIN, HIGHLIGHT_END)
}

pub fn format_text(results: &[RankedResult], no_color: bool) -> String {
    let mut out = String::new();

    for result in results {
        let header = format!("{} ({:.3})", result.location, result.score);
        if no_color {
            out.push_str(&header);
        } else {
            out.push_str(HEADER_BEGIN);
            out.push_str(&header);
            out.push_str(HIGHLIGHT_END);
        }
        out.push('\n');

        if let Some(error) = &result.error {
            out.push_str(&format!("error: {error}\n\n"));
            continue;
        }

        for (i, snippet) in result.snippets.iter().enumerate() {
            out.push_str(&display_snippet(snippet, no_color));
            out.push('\n');
            if i + 1 < result.snippets.len() {
                out.push('\n');
                out.push_str(SEPARATOR);
                out.push_str("\n\n");
            } else {
                out.push('\n');
            }
        }
    }

    out
}

pub fn format_json(results: &[RankedResult]) -> Result<String> {
    let records: Vec<ReportRecord> = results.iter().map(ReportRecord::from).collect();
    Ok(serde_json::to_string(&records)?)
}

pub fn render(results: &[RankedResult], output: &OutputConfig) -> Result<String> {
    match output.format {
        OutputFormat::Text => Ok(format_text(results, output.no_color)),
        OutputFormat::Json => format_json(results),
    }
}

/// Render and write to the configured destination (stdout when unset).
pub fn write_report(results: &[RankedResult], output: &OutputConfig) -> Result<()> {
    let rendered = render(results, output)?;

    match &output.file {
        Some(path) => {
            std::fs::write(path, rendered.as_bytes())?;
            info!("[REPORT] Wrote {} results to {}", results.len(), path.display());
            println!("results written to {}", path.display());
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(rendered.as_bytes())?;
            if output.format == OutputFormat::Json {
                stdout.write_all(b"\n")?;
            }
            stdout.flush()?;
        }
    }

    Ok(())
}
