//! Picks how a stored file is previewed and loads what that preview needs.

use crate::api::ApiClient;
use crate::catalog::{fetch_file_payload, file_url};
use crate::decode::{decode_preview, DelimitedTextDecoder, PreviewGrid, SpreadsheetDecoder, TabularDecoder};
use crate::error::PreviewError;
use crate::FileRecord;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PreviewKind {
    Image,
    EmbeddedDocument,
    DelimitedTable,
    SpreadsheetTable,
    Unsupported,
}

pub struct PreviewRule {
    pub name: &'static str,
    pub applies: fn(&FileRecord) -> bool,
    pub kind: PreviewKind,
}

fn is_pdf(record: &FileRecord) -> bool {
    record.mimetype.contains("pdf")
}

fn is_image(record: &FileRecord) -> bool {
    record.mimetype.contains("image")
}

fn is_csv(record: &FileRecord) -> bool {
    record.mimetype.contains("csv")
}

fn is_spreadsheet(record: &FileRecord) -> bool {
    record.mimetype.contains("sheet")
        || record.mimetype.contains("excel")
        || record.name.ends_with(".xlsx")
        || record.name.ends_with(".xls")
}

fn is_json(record: &FileRecord) -> bool {
    record.mimetype.contains("json")
}

/// Evaluated top to bottom; the first rule that applies wins. A MIME type
/// can satisfy several rules, so the order matters.
pub const PREVIEW_RULES: &[PreviewRule] = &[
    PreviewRule {
        name: "pdf",
        applies: is_pdf,
        kind: PreviewKind::EmbeddedDocument,
    },
    PreviewRule {
        name: "image",
        applies: is_image,
        kind: PreviewKind::Image,
    },
    PreviewRule {
        name: "csv",
        applies: is_csv,
        kind: PreviewKind::DelimitedTable,
    },
    PreviewRule {
        name: "spreadsheet",
        applies: is_spreadsheet,
        kind: PreviewKind::SpreadsheetTable,
    },
    PreviewRule {
        name: "json",
        applies: is_json,
        kind: PreviewKind::EmbeddedDocument,
    },
];

pub fn select_preview(record: &FileRecord) -> PreviewKind {
    PREVIEW_RULES
        .iter()
        .find(|rule| (rule.applies)(record))
        .map_or(PreviewKind::Unsupported, |rule| rule.kind)
}

#[derive(Debug, Clone, Default, PartialEq)]
pub enum PreviewState {
    #[default]
    Loading,
    Image { url: String },
    Document { url: String },
    Table(PreviewGrid),
    Failed(String),
    Unsupported,
}

/// Resolves the preview for `record`. Image and document previews only need
/// the retrieval URL; tables fetch and decode the payload here. Failures are
/// folded into [`PreviewState::Failed`].
pub async fn load_preview(api: &ApiClient, record: &FileRecord) -> PreviewState {
    match select_preview(record) {
        PreviewKind::Image => PreviewState::Image {
            url: file_url(api, &record.id),
        },
        PreviewKind::EmbeddedDocument => PreviewState::Document {
            url: file_url(api, &record.id),
        },
        PreviewKind::Unsupported => PreviewState::Unsupported,
        PreviewKind::DelimitedTable => load_table(api, record, &DelimitedTextDecoder).await,
        PreviewKind::SpreadsheetTable => load_table(api, record, &SpreadsheetDecoder).await,
    }
}

async fn load_table(
    api: &ApiClient,
    record: &FileRecord,
    decoder: &dyn TabularDecoder,
) -> PreviewState {
    match fetch_and_decode(api, record, decoder).await {
        Ok(grid) => PreviewState::Table(grid),
        Err(e) => {
            log::warn!("Preview of {} failed: {}", record.name, e);
            PreviewState::Failed(e.user_message().to_string())
        }
    }
}

async fn fetch_and_decode(
    api: &ApiClient,
    record: &FileRecord,
    decoder: &dyn TabularDecoder,
) -> Result<PreviewGrid, PreviewError> {
    let payload = fetch_file_payload(api, &record.id).await?;
    Ok(decode_preview(decoder, &payload)?)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PreviewTicket(u64);

/// Holds the preview currently on screen. Every new load takes a ticket, and
/// only the most recent ticket may write its result, so a slow response for
/// a file the user already moved past is dropped.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PreviewSlot {
    generation: u64,
    state: PreviewState,
}

impl PreviewSlot {
    pub fn begin(&mut self) -> PreviewTicket {
        self.generation += 1;
        self.state = PreviewState::Loading;
        PreviewTicket(self.generation)
    }

    /// Returns `false` when `ticket` has been superseded.
    pub fn resolve(&mut self, ticket: PreviewTicket, state: PreviewState) -> bool {
        if ticket.0 != self.generation {
            log::debug!("Dropping stale preview result {}", ticket.0);
            return false;
        }
        self.state = state;
        true
    }

    pub fn state(&self) -> &PreviewState {
        &self.state
    }
}
