use serde::{Deserialize, Serialize};

use crate::record::Record;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViewMode {
    #[default]
    Table,
    Cards,
}

/// A displayed field and its header/detail label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnSpec {
    pub field: String,
    pub label: String,
}

impl ColumnSpec {
    pub fn new(field: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            label: label.into(),
        }
    }
}

/// Which fields a renderer reads besides the columns.
#[derive(Debug, Clone, Copy)]
pub struct RenderSpec<'a> {
    pub columns: &'a [ColumnSpec],
    pub identity_field: &'a str,
    pub title_field: Option<&'a str>,
    pub image_field: Option<&'a str>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableRow {
    pub id: String,
    pub cells: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Card {
    pub id: String,
    pub title: String,
    pub image: Option<String>,
    pub details: Vec<(String, String)>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum RenderedView {
    Table {
        headers: Vec<String>,
        rows: Vec<TableRow>,
    },
    Cards {
        cards: Vec<Card>,
    },
}

impl RenderedView {
    pub fn len(&self) -> usize {
        match self {
            RenderedView::Table { rows, .. } => rows.len(),
            RenderedView::Cards { cards } => cards.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

pub fn render(records: &[Record], spec: &RenderSpec<'_>, mode: ViewMode) -> RenderedView {
    match mode {
        ViewMode::Table => RenderedView::Table {
            headers: spec.columns.iter().map(|c| c.label.clone()).collect(),
            rows: records
                .iter()
                .map(|record| TableRow {
                    id: record.get(spec.identity_field).display(),
                    cells: spec
                        .columns
                        .iter()
                        .map(|c| record.get(&c.field).display())
                        .collect(),
                })
                .collect(),
        },
        ViewMode::Cards => RenderedView::Cards {
            cards: records.iter().map(|record| card(record, spec)).collect(),
        },
    }
}

fn card(record: &Record, spec: &RenderSpec<'_>) -> Card {
    let id = record.get(spec.identity_field).display();
    let title = spec
        .title_field
        .map(|field| record.get(field))
        .filter(|value| !value.is_empty())
        .map(|value| value.display())
        .unwrap_or_else(|| id.clone());
    let image = spec
        .image_field
        .map(|field| record.get(field))
        .filter(|value| !value.is_empty())
        .map(|value| value.display());

    Card {
        id,
        title,
        image,
        details: spec
            .columns
            .iter()
            .map(|c| (c.label.clone(), record.get(&c.field).display()))
            .collect(),
    }
}
