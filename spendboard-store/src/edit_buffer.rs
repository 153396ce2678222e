//! Local edit buffers and commits.
//!
//! An [`EditBufferController`] owns a private copy of one editable slice.
//! Edits never reach the [`ViewModel`] on their own; a commit sends the whole
//! buffer to the backend and leaves it untouched whatever the outcome.

use spendboard_core::{CostSample, SliceUpdate, UsageBreakdown, ViewModel};
use spendboard_fetch::DashboardApi;
use std::fmt;
use tracing::{debug, info, warn};

use crate::error::StoreError;

// ============================================================================
// Buffer
// ============================================================================

/// Which slice an edit session works on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EditTarget {
    /// Monthly cost rows (`month`, `cost`).
    CostSeries,
    /// Service-usage values (`value`).
    ServiceUsage,
}

impl EditTarget {
    fn noun(self) -> &'static str {
        match self {
            EditTarget::CostSeries => "cost",
            EditTarget::ServiceUsage => "usage",
        }
    }
}

impl fmt::Display for EditTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EditTarget::CostSeries => write!(f, "cloud costs"),
            EditTarget::ServiceUsage => write!(f, "service usage"),
        }
    }
}

/// A mutable copy of one editable slice.
#[derive(Debug, Clone, PartialEq)]
pub enum EditBuffer {
    /// Copy of the cost series.
    CostSeries(Vec<CostSample>),
    /// Copy of the service-usage breakdown.
    ServiceUsage(UsageBreakdown),
}

impl EditBuffer {
    /// Copies the targeted slice out of a view-model snapshot.
    pub fn from_view(target: EditTarget, view: &ViewModel) -> Self {
        match target {
            EditTarget::CostSeries => EditBuffer::CostSeries(view.cost_series.clone()),
            EditTarget::ServiceUsage => EditBuffer::ServiceUsage(view.service_usage.clone()),
        }
    }

    /// The slice this buffer edits.
    pub fn target(&self) -> EditTarget {
        match self {
            EditBuffer::CostSeries(_) => EditTarget::CostSeries,
            EditBuffer::ServiceUsage(_) => EditTarget::ServiceUsage,
        }
    }

    /// Number of editable rows.
    pub fn len(&self) -> usize {
        match self {
            EditBuffer::CostSeries(rows) => rows.len(),
            EditBuffer::ServiceUsage(usage) => usage.data.len(),
        }
    }

    /// Returns true if there is nothing to edit.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The buffer as a whole-slice replacement.
    pub fn to_update(&self) -> SliceUpdate {
        match self {
            EditBuffer::CostSeries(rows) => SliceUpdate::CostSeries(rows.clone()),
            EditBuffer::ServiceUsage(usage) => SliceUpdate::ServiceUsage(usage.clone()),
        }
    }

    fn set(&mut self, index: usize, field: EditField, value: &str) -> Result<(), StoreError> {
        let len = self.len();
        if index >= len {
            return Err(StoreError::IndexOutOfBounds { index, len });
        }

        match (self, field) {
            (EditBuffer::CostSeries(rows), EditField::Month) => {
                rows[index].month = value.to_string();
            }
            (EditBuffer::CostSeries(rows), EditField::Cost) => {
                rows[index].cost = parse_number(field, value)?;
            }
            (EditBuffer::ServiceUsage(usage), EditField::Value) => {
                usage.data[index] = parse_number(field, value)?;
            }
            (buffer, field) => {
                return Err(StoreError::UnknownField {
                    field: field.name().to_string(),
                    buffer: buffer.target().noun(),
                });
            }
        }
        Ok(())
    }
}

/// An editable column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EditField {
    /// Cost row month label, stored verbatim.
    Month,
    /// Cost row amount, numeric.
    Cost,
    /// Usage value, numeric.
    Value,
}

impl EditField {
    /// Resolves a field name for a target.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::UnknownField`] if the target has no such column.
    pub fn parse(name: &str, target: EditTarget) -> Result<Self, StoreError> {
        match (target, name.trim().to_ascii_lowercase().as_str()) {
            (EditTarget::CostSeries, "month") => Ok(EditField::Month),
            (EditTarget::CostSeries, "cost") => Ok(EditField::Cost),
            (EditTarget::ServiceUsage, "value" | "usage") => Ok(EditField::Value),
            _ => Err(StoreError::UnknownField {
                field: name.to_string(),
                buffer: target.noun(),
            }),
        }
    }

    /// Column name.
    pub fn name(self) -> &'static str {
        match self {
            EditField::Month => "month",
            EditField::Cost => "cost",
            EditField::Value => "value",
        }
    }
}

fn parse_number(field: EditField, value: &str) -> Result<f64, StoreError> {
    value
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| StoreError::InvalidNumber {
            field: field.name(),
            value: value.to_string(),
        })
}

// ============================================================================
// Controller
// ============================================================================

/// State of an edit session.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum EditState {
    /// Buffer matches the snapshot it was taken from.
    #[default]
    Clean,
    /// At least one field changed since the last commit.
    Editing,
    /// Commit in flight.
    Committing,
    /// Last commit succeeded.
    Committed,
    /// Last commit failed; carries the reason.
    Failed(String),
}

/// Result of a commit.
#[derive(Debug, Clone, PartialEq)]
pub enum CommitOutcome {
    /// The backend accepted the buffer. Carries what was sent.
    Committed(SliceUpdate),
    /// The backend rejected the buffer or could not be reached.
    Failed(String),
}

impl CommitOutcome {
    /// Operator-facing notice.
    pub fn notice(&self, target: EditTarget) -> String {
        match self {
            CommitOutcome::Committed(_) => {
                let mut text = target.to_string();
                if let Some(first) = text.get_mut(..1) {
                    first.make_ascii_uppercase();
                }
                format!("{text} updated successfully")
            }
            CommitOutcome::Failed(_) => format!("Failed to update {target}"),
        }
    }
}

/// Owns one edit session at a time.
#[derive(Debug, Default)]
pub struct EditBufferController {
    buffer: Option<EditBuffer>,
    state: EditState,
}

impl EditBufferController {
    /// Creates a controller with no session.
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a session from a view-model snapshot, replacing any previous one.
    pub fn begin_edit(&mut self, target: EditTarget, snapshot: &ViewModel) {
        let buffer = EditBuffer::from_view(target, snapshot);
        debug!(target = %target, rows = buffer.len(), "Edit session started");
        self.buffer = Some(buffer);
        self.state = EditState::Clean;
    }

    /// The current buffer.
    pub fn buffer(&self) -> Option<&EditBuffer> {
        self.buffer.as_ref()
    }

    /// The session state.
    pub fn state(&self) -> &EditState {
        &self.state
    }

    /// Sets one field. Numeric columns are parsed as floating point.
    ///
    /// # Errors
    ///
    /// Fails without touching the buffer if no session exists, the row is out
    /// of range, the field is unknown, or a numeric value does not parse.
    pub fn set_field(&mut self, index: usize, field: &str, value: &str) -> Result<(), StoreError> {
        let buffer = self.buffer.as_mut().ok_or(StoreError::NotEditing)?;
        let field = EditField::parse(field, buffer.target())?;
        buffer.set(index, field, value)?;
        self.state = EditState::Editing;
        Ok(())
    }

    /// Sends the whole buffer to the backend.
    ///
    /// The buffer is left as-is on success and on failure.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotEditing`] if no session exists. Backend
    /// failures are reported as [`CommitOutcome::Failed`].
    pub async fn commit<A>(&mut self, api: &A) -> Result<CommitOutcome, StoreError>
    where
        A: DashboardApi + ?Sized,
    {
        let buffer = self.buffer.as_ref().ok_or(StoreError::NotEditing)?;
        let target = buffer.target();
        self.state = EditState::Committing;
        info!(target = %target, rows = buffer.len(), "Committing edits");

        let result = match buffer {
            EditBuffer::CostSeries(rows) => api.update_cloud_costs(rows).await,
            EditBuffer::ServiceUsage(usage) => api.update_service_usage(usage).await,
        };

        Ok(match result {
            Ok(()) => {
                self.state = EditState::Committed;
                CommitOutcome::Committed(buffer.to_update())
            }
            Err(e) => {
                warn!(target = %target, error = %e, "Commit failed");
                self.state = EditState::Failed(e.to_string());
                CommitOutcome::Failed(e.to_string())
            }
        })
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn view() -> ViewModel {
        let mut view = ViewModel::new();
        view.cost_series = vec![CostSample::new("Jan", 100.0), CostSample::new("Feb", 120.0)];
        view.service_usage = UsageBreakdown::from_pairs([("EC2", 60.0), ("S3", 40.0)]);
        view
    }

    #[test]
    fn test_set_field_coerces_types() {
        let mut editor = EditBufferController::new();
        editor.begin_edit(EditTarget::CostSeries, &view());
        assert_eq!(editor.state(), &EditState::Clean);

        editor.set_field(0, "month", "January").unwrap();
        editor.set_field(1, "cost", " 133.5 ").unwrap();

        let Some(EditBuffer::CostSeries(rows)) = editor.buffer() else {
            panic!("expected cost buffer");
        };
        assert_eq!(rows[0].month, "January");
        assert_eq!(rows[1].cost, 133.5);
        assert_eq!(editor.state(), &EditState::Editing);
    }

    #[test]
    fn test_buffer_is_independent_of_snapshot() {
        let snapshot = view();
        let mut editor = EditBufferController::new();
        editor.begin_edit(EditTarget::ServiceUsage, &snapshot);
        editor.set_field(0, "value", "75").unwrap();

        assert_eq!(snapshot.service_usage.data[0], 60.0);
        let Some(EditBuffer::ServiceUsage(usage)) = editor.buffer() else {
            panic!("expected usage buffer");
        };
        assert_eq!(usage.data[0], 75.0);
        assert_eq!(usage.labels, snapshot.service_usage.labels);
    }

    #[test]
    fn test_out_of_range_index_rejected() {
        let mut editor = EditBufferController::new();
        editor.begin_edit(EditTarget::CostSeries, &view());
        let err = editor.set_field(2, "cost", "1").unwrap_err();
        assert!(matches!(err, StoreError::IndexOutOfBounds { index: 2, len: 2 }));
        assert_eq!(editor.state(), &EditState::Clean);
    }

    #[test]
    fn test_bad_input_rejected() {
        let mut editor = EditBufferController::new();
        assert!(matches!(
            editor.set_field(0, "cost", "1"),
            Err(StoreError::NotEditing)
        ));

        editor.begin_edit(EditTarget::ServiceUsage, &view());
        assert!(matches!(
            editor.set_field(0, "label", "EKS"),
            Err(StoreError::UnknownField { .. })
        ));
        assert!(matches!(
            editor.set_field(0, "value", "lots"),
            Err(StoreError::InvalidNumber { .. })
        ));
        assert!(matches!(
            editor.set_field(0, "value", "NaN"),
            Err(StoreError::InvalidNumber { .. })
        ));
    }

    #[test]
    fn test_notice_text() {
        let ok = CommitOutcome::Committed(SliceUpdate::CostSeries(vec![]));
        assert_eq!(ok.notice(EditTarget::CostSeries), "Cloud costs updated successfully");
        let failed = CommitOutcome::Failed("boom".into());
        assert_eq!(failed.notice(EditTarget::ServiceUsage), "Failed to update service usage");
    }
}
