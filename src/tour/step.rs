// ABOUTME: Step descriptors for the guided tour
// A step names the region to highlight, how to scroll before measuring, and whether it blocks

use serde::Serialize;

/// Stable identity of a tour step across catalog recomputations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StepKey {
    Intro,
    // Purchase order screen
    OrderClientType,
    OrderClient,
    OrderAddProduct,
    OrderQuantity,
    OrderNote,
    OrderUnavailable,
    // Visit report screen
    ReportDoctor,
    ReportProducts,
    ReportNote,
    ReportAddCommercial,
    ReportClientType,
    ReportClient,
    ReportCommercialProduct,
    ReportStock,
    ReportQuantity,
    Submit,
}

impl StepKey {
    /// Whether this step belongs to the medical half of a visit report
    pub const fn is_medical(self) -> bool {
        matches!(self, Self::ReportDoctor | Self::ReportProducts | Self::ReportNote)
    }

    /// Whether this step belongs to the commercial half of a visit report
    pub const fn is_commercial(self) -> bool {
        matches!(
            self,
            Self::ReportClientType
                | Self::ReportClient
                | Self::ReportCommercialProduct
                | Self::ReportStock
                | Self::ReportQuantity
        )
    }
}

/// Logical UI region a step points at
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TourTarget {
    /// Untargeted step, rendered as a full-screen dim with a centered tooltip
    None,
    ClientType,
    ClientPicker,
    DoctorPicker,
    ProductPicker,
    ProductLines,
    QuantityField,
    NoteField,
    PresentedProducts,
    AddCommercialButton,
    StockChoice,
    SubmitButton,
}

impl TourTarget {
    /// Every targetable region
    pub const ALL: [TourTarget; 11] = [
        Self::ClientType,
        Self::ClientPicker,
        Self::DoctorPicker,
        Self::ProductPicker,
        Self::ProductLines,
        Self::QuantityField,
        Self::NoteField,
        Self::PresentedProducts,
        Self::AddCommercialButton,
        Self::StockChoice,
        Self::SubmitButton,
    ];

    pub const fn is_none(self) -> bool {
        matches!(self, Self::None)
    }
}

/// Anchor applied to the scroll viewport before the target is centered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ScrollIntent {
    TopOfForm,
    IntoList,
    ToBottom,
}

/// Debounce class used before auto-advancing a satisfied step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Settle {
    Quick,
    Standard,
    Slow,
}

/// One stage of the guided tour
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Step {
    pub key: StepKey,
    pub title: &'static str,
    pub body: &'static str,
    pub target: TourTarget,
    pub scroll_intent: ScrollIntent,
    /// Blocks manual next and enables auto-advance until satisfied
    pub required: bool,
    /// Text-entry steps never auto-advance, so typing isn't interrupted
    pub free_text: bool,
    pub settle: Settle,
    pub highlight_corner_radius: u16,
}

impl Step {
    pub const fn new(key: StepKey, title: &'static str, body: &'static str) -> Self {
        Self {
            key,
            title,
            body,
            target: TourTarget::None,
            scroll_intent: ScrollIntent::IntoList,
            required: false,
            free_text: false,
            settle: Settle::Standard,
            highlight_corner_radius: 1,
        }
    }

    #[must_use]
    pub const fn target(mut self, target: TourTarget) -> Self {
        self.target = target;
        self
    }

    #[must_use]
    pub const fn scroll(mut self, intent: ScrollIntent) -> Self {
        self.scroll_intent = intent;
        self
    }

    #[must_use]
    pub const fn required(mut self) -> Self {
        self.required = true;
        self
    }

    #[must_use]
    pub const fn free_text(mut self) -> Self {
        self.free_text = true;
        self
    }

    #[must_use]
    pub const fn settle(mut self, settle: Settle) -> Self {
        self.settle = settle;
        self
    }

    #[must_use]
    pub const fn corner_radius(mut self, radius: u16) -> Self {
        self.highlight_corner_radius = radius;
        self
    }

    /// Whether a satisfied step moves on by itself
    pub const fn auto_advances(&self) -> bool {
        self.required && !self.free_text
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_defaults() {
        let step = Step::new(StepKey::Intro, "Welcome", "Let's go");
        assert_eq!(step.target, TourTarget::None);
        assert!(!step.required);
        assert!(!step.auto_advances());
    }

    #[test]
    fn test_free_text_never_auto_advances() {
        let step = Step::new(StepKey::ReportNote, "Note", "Type it")
            .target(TourTarget::NoteField)
            .required()
            .free_text();
        assert!(step.required);
        assert!(!step.auto_advances());

        let picker = Step::new(StepKey::ReportDoctor, "Doctor", "Pick one").required();
        assert!(picker.auto_advances());
    }

    #[test]
    fn test_key_halves() {
        assert!(StepKey::ReportDoctor.is_medical());
        assert!(!StepKey::ReportDoctor.is_commercial());
        assert!(StepKey::ReportQuantity.is_commercial());
        assert!(!StepKey::Submit.is_medical());
    }
}
