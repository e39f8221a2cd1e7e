//! Read-only inspection of every clipboard unit

use std::io::{self, Write};

use iffclip_formats::iff::{StreamHead, TypeTag, find_all};
use iffclip_storage::{RouterVersion, StorageError, Unit};
use tracing::{debug, warn};

use crate::context::ClipContext;
use crate::error::ClipResult;
use crate::peek::Peeked;

/// How a unit's content starts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentKind {
    /// A group chunk (`FORM`, `LIST`, `CAT `, `PROP`)
    Group(TypeTag),
    /// A bare leaf chunk without an enclosing group
    Bare,
    /// Not recognisable as IFF
    Unrecognized,
}

/// One row of the listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnitSummary {
    /// Unit inspected
    pub unit: Unit,
    /// Content shape
    pub kind: ContentKind,
    /// Form type (groups) or chunk id (bare chunks)
    pub tag: Option<TypeTag>,
    /// Declared size from the header, or the raw length if unrecognised
    pub size: u64,
    /// Unit the router suggests for `tag`
    pub suggested: Option<Unit>,
    /// Sanitised start of the text, for `FORM FTXT`
    pub preview: Option<String>,
}

/// Inspect one unit.
///
/// Returns `None` for an empty unit and for a unit claimed by another
/// session. The session is drained before returning on every path.
pub fn inspect_unit(ctx: &ClipContext, unit: Unit) -> ClipResult<Option<UnitSummary>> {
    let mut session = match ctx.device().open_read(unit) {
        Ok(session) => session,
        Err(StorageError::UnitUnavailable { reason, .. }) => {
            debug!(%unit, %reason, "skipping unit");
            return Ok(None);
        }
        Err(e) => return Err(e.into()),
    };
    if session.is_empty() {
        session.close()?;
        return Ok(None);
    }

    let total = session.len();
    let peeked = Peeked::read_from(&mut session)?;
    let head = peeked.head();
    let (kind, tag, size) = match head {
        StreamHead::Group(h) => (ContentKind::Group(h.id), Some(h.subtype), u64::from(h.size)),
        StreamHead::Chunk(h) => (ContentKind::Bare, Some(h.id), u64::from(h.size)),
        StreamHead::Unrecognized => (ContentKind::Unrecognized, None, total),
    };

    let preview = if head.is_text() {
        let limit = ctx.config().preview_len;
        let mut text = Vec::with_capacity(limit);
        let scanner = find_all(peeked.replay(&mut session), TypeTag::FTXT, TypeTag::CHRS)
            .with_payload_limit(limit);
        for run in scanner {
            match run {
                Ok(run) => {
                    let take = run.len().min(limit - text.len());
                    text.extend_from_slice(&run[..take]);
                    if text.len() >= limit {
                        break;
                    }
                }
                Err(e) => {
                    debug!(%unit, error = %e, "preview cut short");
                    break;
                }
            }
        }
        (!text.is_empty()).then(|| sanitize_preview(&text))
    } else {
        None
    };

    session.close()?;
    Ok(Some(UnitSummary {
        unit,
        kind,
        tag,
        size,
        suggested: tag.map(|tag| ctx.router().route(tag)),
        preview,
    }))
}

/// Inspect units 0 through 255, skipping units that fail to read
pub fn inspect_all(ctx: &ClipContext) -> Vec<UnitSummary> {
    Unit::all()
        .filter_map(|unit| match inspect_unit(ctx, unit) {
            Ok(summary) => summary,
            Err(e) => {
                warn!(%unit, error = %e, "cannot inspect unit");
                None
            }
        })
        .collect()
}

/// Make text safe for a one-line preview.
///
/// Newline, carriage return and tab become a space; any other byte outside
/// printable ASCII becomes `.`.
pub fn sanitize_preview(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|&b| match b {
            b'\n' | b'\r' | b'\t' => ' ',
            0x20..=0x7e => char::from(b),
            _ => '.',
        })
        .collect()
}

/// Format one listing row
pub fn format_row(summary: &UnitSummary) -> String {
    let tag = summary
        .tag
        .map_or_else(|| "????".to_string(), |tag| tag.to_string());
    let mut row = format!(
        "{:4}  {:<4}   {:6}",
        summary.unit.number(),
        tag,
        summary.size
    );
    match summary.suggested {
        Some(suggested) if suggested == summary.unit => row.push_str("  [mapped]"),
        Some(suggested) => row.push_str(&format!("  (maps to {suggested})")),
        None => {}
    }
    if let Some(preview) = &summary.preview {
        row.push_str("   ");
        row.push_str(preview);
    }
    row
}

/// Write the full listing
pub fn render(
    summaries: &[UnitSummary],
    version: RouterVersion,
    out: &mut dyn Write,
) -> io::Result<()> {
    writeln!(out, "Current clipboard contents:")?;
    writeln!(out, "Unit  Type    Size    Preview (FTXT only)")?;
    writeln!(out, "----  ----    ----    -------------------")?;
    for summary in summaries {
        writeln!(out, "{}", format_row(summary))?;
    }
    if summaries.is_empty() {
        writeln!(out, "No clipboard units contain data.")?;
    } else {
        writeln!(out)?;
        writeln!(out, "Total: {} clipboard unit(s) in use.", summaries.len())?;
        writeln!(out, "Suggested units from router {version}.")?;
    }
    out.flush()
}
