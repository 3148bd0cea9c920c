// ABOUTME: Step catalogs for the order and visit-report screens
// Catalogs are pure functions of (role, mode); unavailable features are omitted, never disabled

use super::step::{ScrollIntent, Settle, Step, StepKey, TourTarget};
use crate::models::Role;

/// Form state that changes which report steps apply
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReportMode {
    /// A commercial visit has been attached to the report
    pub commercial_added: bool,
}

fn intro(body: &'static str) -> Step {
    Step::new(StepKey::Intro, "Guided tour", body).scroll(ScrollIntent::TopOfForm)
}

fn submit(body: &'static str) -> Step {
    Step::new(StepKey::Submit, "Save", body)
        .target(TourTarget::SubmitButton)
        .scroll(ScrollIntent::ToBottom)
        .corner_radius(2)
}

/// Steps for creating a purchase order
pub fn order_catalog(role: Role) -> Vec<Step> {
    if !role.can_commercial() {
        return finalize(vec![
            intro("Purchase orders are taken during commercial visits."),
            Step::new(
                StepKey::OrderUnavailable,
                "Not available",
                "Your profile has no commercial permission, so orders cannot be created here.",
            ),
        ]);
    }

    finalize(vec![
        intro("Let's walk through a purchase order, one field at a time."),
        Step::new(
            StepKey::OrderClientType,
            "Client type",
            "Choose who the order is for: pharmacy, wholesaler or clinic.",
        )
        .target(TourTarget::ClientType)
        .scroll(ScrollIntent::TopOfForm)
        .required()
        .settle(Settle::Quick),
        Step::new(StepKey::OrderClient, "Client", "Pick the client from the directory.")
            .target(TourTarget::ClientPicker)
            .required()
            .settle(Settle::Standard),
        Step::new(StepKey::OrderAddProduct, "Add a product", "Add a product line to the order.")
            .target(TourTarget::ProductPicker)
            .required()
            .settle(Settle::Slow),
        Step::new(StepKey::OrderQuantity, "Quantity", "Set how many units of this product.")
            .target(TourTarget::QuantityField)
            .required()
            .settle(Settle::Standard),
        Step::new(
            StepKey::OrderNote,
            "Note",
            "Optionally add delivery instructions. Press next when you're done.",
        )
        .target(TourTarget::NoteField)
        .free_text(),
        submit("Save the order once every line looks right."),
    ])
}

/// Steps for writing a visit report
pub fn report_catalog(role: Role, mode: ReportMode) -> Vec<Step> {
    let mut steps = vec![intro("Let's fill in a visit report together.")];

    if role.can_medical() {
        steps.push(
            Step::new(StepKey::ReportDoctor, "Doctor", "Select the doctor you visited.")
                .target(TourTarget::DoctorPicker)
                .scroll(ScrollIntent::TopOfForm)
                .required()
                .settle(Settle::Standard),
        );
        steps.push(
            Step::new(
                StepKey::ReportProducts,
                "Presented products",
                "Mark at least one product you presented.",
            )
            .target(TourTarget::PresentedProducts)
            .required()
            .settle(Settle::Slow),
        );
        steps.push(
            Step::new(
                StepKey::ReportNote,
                "Visit note",
                "Summarize the doctor's feedback, then press next.",
            )
            .target(TourTarget::NoteField)
            .required()
            .free_text(),
        );
    }

    if role.can_commercial() {
        if role.can_medical() {
            steps.push(
                Step::new(
                    StepKey::ReportAddCommercial,
                    "Commercial visit",
                    "You can attach a commercial visit to this report, or skip it.",
                )
                .target(TourTarget::AddCommercialButton),
            );
        }

        if !role.can_medical() || mode.commercial_added {
            steps.extend(commercial_steps());
        }
    }

    steps.push(submit("Save the report to send it to your supervisor."));
    finalize(steps)
}

fn commercial_steps() -> [Step; 5] {
    [
        Step::new(
            StepKey::ReportClientType,
            "Client type",
            "Choose the kind of client you visited.",
        )
        .target(TourTarget::ClientType)
        .required()
        .settle(Settle::Quick),
        Step::new(StepKey::ReportClient, "Client", "Pick the client from the directory.")
            .target(TourTarget::ClientPicker)
            .required(),
        Step::new(
            StepKey::ReportCommercialProduct,
            "Product",
            "Select the product you checked on the shelf.",
        )
        .target(TourTarget::ProductPicker)
        .required()
        .settle(Settle::Slow),
        Step::new(StepKey::ReportStock, "In stock?", "Tell us whether the client has it in stock.")
            .target(TourTarget::StockChoice)
            .required()
            .settle(Settle::Quick),
        Step::new(StepKey::ReportQuantity, "Quantity", "How many units are on the shelf?")
            .target(TourTarget::QuantityField)
            .required(),
    ]
}

/// The last step must always let the user finish
fn finalize(mut steps: Vec<Step>) -> Vec<Step> {
    if let Some(last) = steps.last_mut() {
        last.required = false;
    }
    steps
}

/// Clamp an index into a catalog of `len` steps
pub const fn clamp_index(index: usize, len: usize) -> usize {
    if len == 0 {
        0
    } else if index >= len {
        len - 1
    } else {
        index
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn all_catalogs() -> Vec<Vec<Step>> {
        let mut catalogs = Vec::new();
        for role in Role::all() {
            catalogs.push(order_catalog(*role));
            for commercial_added in [false, true] {
                catalogs.push(report_catalog(*role, ReportMode { commercial_added }));
            }
        }
        catalogs
    }

    #[test]
    fn test_last_step_never_required() {
        for catalog in all_catalogs() {
            let last = catalog.last().expect("catalog is never empty");
            assert!(!last.required, "{:?} is required", last.key);
        }
    }

    #[test]
    fn test_keys_unique_within_catalog() {
        for catalog in all_catalogs() {
            let mut keys: Vec<_> = catalog.iter().map(|s| s.key).collect();
            let len = keys.len();
            keys.sort_by_key(|k| format!("{k:?}"));
            keys.dedup();
            assert_eq!(keys.len(), len);
        }
    }

    #[test]
    fn test_commercial_only_report_skips_medical() {
        let steps = report_catalog(Role::Commercial, ReportMode::default());
        assert!(steps.iter().all(|s| !s.key.is_medical()));
        assert_eq!(steps[0].key, StepKey::Intro);
        assert_eq!(steps[1].key, StepKey::ReportClientType);
        assert!(steps.iter().all(|s| s.key != StepKey::ReportAddCommercial));
    }

    #[test]
    fn test_medical_only_report_has_no_commercial() {
        let steps = report_catalog(Role::Medical, ReportMode { commercial_added: true });
        assert!(steps.iter().all(|s| !s.key.is_commercial()));
        assert!(steps.iter().all(|s| s.key != StepKey::ReportAddCommercial));
    }

    #[test]
    fn test_hybrid_report_grows_when_commercial_added() {
        let before = report_catalog(Role::Hybrid, ReportMode::default());
        let after = report_catalog(Role::Hybrid, ReportMode { commercial_added: true });

        assert!(before.iter().any(|s| s.key == StepKey::ReportAddCommercial));
        assert!(before.iter().all(|s| !s.key.is_commercial()));
        assert_eq!(after.len(), before.len() + 5);

        let bridge = after.iter().position(|s| s.key == StepKey::ReportAddCommercial).unwrap();
        assert_eq!(after[bridge + 1].key, StepKey::ReportClientType);
        assert_eq!(after.last().unwrap().key, StepKey::Submit);
    }

    #[test]
    fn test_order_catalog_without_commercial_permission() {
        let steps = order_catalog(Role::Medical);
        assert_eq!(steps.len(), 2);
        assert!(steps.iter().all(|s| !s.required));
    }

    #[test]
    fn test_clamp_index() {
        assert_eq!(clamp_index(0, 0), 0);
        assert_eq!(clamp_index(3, 10), 3);
        assert_eq!(clamp_index(10, 4), 3);
    }
}
