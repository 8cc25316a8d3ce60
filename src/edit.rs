use crate::error::ConsoleError;
use crate::record::{FieldValue, Record};

/// Where a submitted draft goes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpsertRoute {
    Create,
    Update(String),
}

/// A draft carrying an identity value updates that identity; anything else
/// is a create.
pub fn upsert_route(draft: &Record, identity_field: &str) -> UpsertRoute {
    match draft.get(identity_field) {
        value if value.is_empty() => UpsertRoute::Create,
        value => UpsertRoute::Update(value.display()),
    }
}

pub fn validate_required(draft: &Record, required: &[String]) -> Result<(), ConsoleError> {
    let missing: Vec<&str> = required
        .iter()
        .filter(|field| !draft.has(field))
        .map(String::as_str)
        .collect();
    if missing.is_empty() {
        Ok(())
    } else {
        Err(ConsoleError::Validation(format!(
            "missing required fields: {}",
            missing.join(", ")
        )))
    }
}

/// The record currently held by the edit form.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingEdit {
    draft: Record,
    original: Option<Record>,
}

impl PendingEdit {
    pub fn draft(&self) -> &Record {
        &self.draft
    }

    /// The snapshot record this edit started from, if any.
    pub fn original(&self) -> Option<&Record> {
        self.original.as_ref()
    }

    pub fn is_update(&self) -> bool {
        self.original.is_some()
    }
}

/// Edit form lifecycle. Only `Closed -> Open` and `Open -> Closed` move the
/// state; a failed submit leaves it `Open` with the draft intact.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum EditState {
    #[default]
    Closed,
    Open(PendingEdit),
}

impl EditState {
    pub fn is_open(&self) -> bool {
        matches!(self, EditState::Open(_))
    }

    pub fn pending(&self) -> Option<&PendingEdit> {
        match self {
            EditState::Open(pending) => Some(pending),
            EditState::Closed => None,
        }
    }

    pub fn open_new(&mut self) -> Result<(), ConsoleError> {
        self.open(PendingEdit {
            draft: Record::new(),
            original: None,
        })
    }

    pub fn open_existing(&mut self, record: Record) -> Result<(), ConsoleError> {
        self.open(PendingEdit {
            draft: record.clone(),
            original: Some(record),
        })
    }

    fn open(&mut self, pending: PendingEdit) -> Result<(), ConsoleError> {
        if self.is_open() {
            return Err(ConsoleError::EditInProgress);
        }
        *self = EditState::Open(pending);
        Ok(())
    }

    pub fn set_field(
        &mut self,
        field: &str,
        value: impl Into<FieldValue>,
    ) -> Result<(), ConsoleError> {
        match self {
            EditState::Open(pending) => {
                pending.draft.set(field, value);
                Ok(())
            }
            EditState::Closed => Err(ConsoleError::NoPendingEdit),
        }
    }

    /// Discards the draft. Closing an already closed form is a no-op.
    pub fn close(&mut self) {
        *self = EditState::Closed;
    }
}
