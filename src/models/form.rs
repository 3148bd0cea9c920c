// ABOUTME: Shared shape of editable forms - rows, collapsible sections, and the edit operations
// Manual key handling and the tour's rollback/reset both go through these methods

use crate::models::Role;
use crate::tour::{TourDomain, TourTarget};
use thiserror::Error;

/// Collapsible groups of rows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SectionId {
    Details,
    Medical,
    Commercial,
}

/// A collapsible section and the targets that only have layout while it is open
#[derive(Debug, Clone, Copy)]
pub struct Section {
    pub id: SectionId,
    pub title: &'static str,
    pub owns: &'static [TourTarget],
    pub starts_open: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowKind {
    Header(SectionId),
    Select,
    List,
    Counter,
    Text,
    Button,
}

/// One laid-out row of a form
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormRow {
    pub target: TourTarget,
    pub label: &'static str,
    pub value: String,
    pub kind: RowKind,
    pub section: Option<SectionId>,
    pub height: u16,
}

impl FormRow {
    pub fn new(target: TourTarget, label: &'static str, value: impl Into<String>, kind: RowKind) -> Self {
        let height = match kind {
            RowKind::Header(_) => 1,
            RowKind::Text => 5,
            _ => 3,
        };
        Self {
            target,
            label,
            value: value.into(),
            kind,
            section: None,
            height,
        }
    }

    pub fn header(section: Section) -> Self {
        Self::new(TourTarget::None, section.title, "", RowKind::Header(section.id))
    }

    #[must_use]
    pub const fn in_section(mut self, section: SectionId) -> Self {
        self.section = Some(section);
        self
    }

    #[must_use]
    pub const fn with_height(mut self, height: u16) -> Self {
        self.height = height;
        self
    }
}

/// Submission errors shown in the status bar
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormError {
    #[error("{0} is required")]
    MissingField(&'static str),

    #[error("Every product line needs a quantity")]
    EmptyQuantity,
}

/// A form screen's model
pub trait FormModel: TourDomain {
    fn title(&self) -> &'static str;

    fn sections(&self) -> &'static [Section];

    /// Rows in display order for `role`, ignoring section collapse
    fn rows(&self, role: Role) -> Vec<FormRow>;

    /// Enter/space on a row: cycle a selector, press a button
    fn activate(&mut self, target: TourTarget);

    /// +/- on a counter row
    fn adjust(&mut self, target: TourTarget, delta: i32);

    /// Delete on a row
    fn clear(&mut self, target: TourTarget);

    /// Editable text behind a text row
    fn text_mut(&mut self, target: TourTarget) -> Option<&mut String>;

    fn validate(&self, role: Role) -> Result<(), FormError>;
}

/// Apply a signed delta to a count without wrapping
pub fn adjust_count(count: u32, delta: i32) -> u32 {
    if delta.is_negative() {
        count.saturating_sub(delta.unsigned_abs())
    } else {
        count.saturating_add(delta.unsigned_abs())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_adjust_count_saturates() {
        assert_eq!(adjust_count(0, -1), 0);
        assert_eq!(adjust_count(2, 3), 5);
        assert_eq!(adjust_count(u32::MAX, 1), u32::MAX);
    }

    #[test]
    fn test_row_heights_by_kind() {
        assert_eq!(FormRow::new(TourTarget::NoteField, "Note", "", RowKind::Text).height, 5);
        assert_eq!(FormRow::new(TourTarget::ClientType, "Type", "", RowKind::Select).height, 3);
        let header = FormRow::header(Section {
            id: SectionId::Medical,
            title: "Medical visit",
            owns: &[],
            starts_open: true,
        });
        assert_eq!(header.height, 1);
        assert_eq!(header.target, TourTarget::None);
    }
}
