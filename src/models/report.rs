// ABOUTME: Visit report form ("rapport de visite") with optional commercial visit, plus its tour wiring

use super::directory::Directory;
use super::form::{adjust_count, FormError, FormModel, FormRow, RowKind, Section, SectionId};
use super::role::{ClientType, Role};
use crate::tour::domain::apply_rollback;
use crate::tour::{report_catalog, ReportMode, Rollback, Step, StepKey, TourDomain, TourTarget};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReportForm {
    pub doctor: Option<&'static str>,
    pub presented: Vec<&'static str>,
    pub note: String,
    pub commercial_added: bool,
    pub client_type: Option<ClientType>,
    pub client: Option<&'static str>,
    pub product: Option<&'static str>,
    pub in_stock: Option<bool>,
    pub quantity: u32,
}

const SECTIONS: &[Section] = &[
    Section {
        id: SectionId::Medical,
        title: "Medical visit",
        owns: &[
            TourTarget::DoctorPicker,
            TourTarget::PresentedProducts,
            TourTarget::NoteField,
        ],
        starts_open: true,
    },
    Section {
        id: SectionId::Commercial,
        title: "Commercial visit",
        owns: &[
            TourTarget::ClientType,
            TourTarget::ClientPicker,
            TourTarget::ProductPicker,
            TourTarget::StockChoice,
            TourTarget::QuantityField,
        ],
        starts_open: true,
    },
];

/// Fields each report step populates, cleared when stepping back from it
pub const REPORT_ROLLBACKS: &[(StepKey, Rollback<ReportForm>)] = &[
    (StepKey::ReportDoctor, ReportForm::clear_doctor as Rollback<ReportForm>),
    (StepKey::ReportProducts, ReportForm::clear_presented as Rollback<ReportForm>),
    (StepKey::ReportNote, ReportForm::clear_note as Rollback<ReportForm>),
    (StepKey::ReportAddCommercial, ReportForm::detach_commercial as Rollback<ReportForm>),
    (StepKey::ReportClientType, ReportForm::clear_client_type as Rollback<ReportForm>),
    (StepKey::ReportClient, ReportForm::clear_client as Rollback<ReportForm>),
    (StepKey::ReportCommercialProduct, ReportForm::clear_product as Rollback<ReportForm>),
    (StepKey::ReportStock, ReportForm::clear_stock as Rollback<ReportForm>),
    (StepKey::ReportQuantity, ReportForm::clear_quantity as Rollback<ReportForm>),
];

impl ReportForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub const fn mode(&self) -> ReportMode {
        ReportMode {
            commercial_added: self.commercial_added,
        }
    }

    /// Whether the commercial part is shown and validated for `role`
    pub const fn has_commercial(&self, role: Role) -> bool {
        role.can_commercial() && (!role.can_medical() || self.commercial_added)
    }

    // === Edits ===

    pub fn cycle_doctor(&mut self) {
        self.doctor = Directory::cycle(Directory.doctors(), self.doctor);
    }

    /// Mark the next product not yet presented
    pub fn present_next(&mut self) {
        let next = Directory
            .products()
            .iter()
            .find(|p| !self.presented.contains(p));
        if let Some(product) = next {
            self.presented.push(product);
        }
    }

    pub fn attach_commercial(&mut self) {
        self.commercial_added = true;
    }

    pub fn detach_commercial(&mut self) {
        self.commercial_added = false;
    }

    pub fn cycle_client_type(&mut self) {
        self.client_type = Some(ClientType::cycle(self.client_type));
        self.client = None;
    }

    pub fn cycle_client(&mut self) {
        if let Some(client_type) = self.client_type {
            self.client = Directory::cycle(Directory.clients(client_type), self.client);
        }
    }

    pub fn cycle_product(&mut self) {
        self.product = Directory::cycle(Directory.products(), self.product);
    }

    /// Unanswered and "no" both go to "yes"
    pub fn toggle_stock(&mut self) {
        self.in_stock = Some(self.in_stock != Some(true));
    }

    pub fn clear_doctor(&mut self) {
        self.doctor = None;
    }

    pub fn clear_presented(&mut self) {
        self.presented.clear();
    }

    pub fn clear_note(&mut self) {
        self.note.clear();
    }

    pub fn clear_client_type(&mut self) {
        self.client_type = None;
    }

    pub fn clear_client(&mut self) {
        self.client = None;
    }

    pub fn clear_product(&mut self) {
        self.product = None;
    }

    pub fn clear_stock(&mut self) {
        self.in_stock = None;
    }

    pub fn clear_quantity(&mut self) {
        self.quantity = 0;
    }
}

impl TourDomain for ReportForm {
    fn catalog(&self, role: Role) -> Vec<Step> {
        report_catalog(role, self.mode())
    }

    fn is_satisfied(&self, key: StepKey) -> bool {
        match key {
            StepKey::ReportDoctor => self.doctor.is_some(),
            StepKey::ReportProducts => !self.presented.is_empty(),
            StepKey::ReportNote => !self.note.trim().is_empty(),
            StepKey::ReportAddCommercial => self.commercial_added,
            StepKey::ReportClientType => self.client_type.is_some(),
            StepKey::ReportClient => self.client.is_some(),
            StepKey::ReportCommercialProduct => self.product.is_some(),
            StepKey::ReportStock => self.in_stock.is_some(),
            StepKey::ReportQuantity => self.quantity > 0,
            _ => false,
        }
    }

    /// The shelf quantity only exists once the product is reported in stock
    fn is_applicable(&self, key: StepKey) -> bool {
        key != StepKey::ReportQuantity || self.in_stock == Some(true)
    }

    fn rollback(&mut self, key: StepKey) {
        apply_rollback(REPORT_ROLLBACKS, key, self);
    }

    fn reset(&mut self) {
        *self = Self::default();
    }
}

impl FormModel for ReportForm {
    fn title(&self) -> &'static str {
        "New visit report"
    }

    fn sections(&self) -> &'static [Section] {
        SECTIONS
    }

    fn rows(&self, role: Role) -> Vec<FormRow> {
        let mut rows = Vec::new();

        if role.can_medical() {
            let presented = if self.presented.is_empty() {
                "None yet".to_string()
            } else {
                self.presented.join("\n")
            };
            rows.push(FormRow::header(SECTIONS[0]));
            rows.push(
                FormRow::new(
                    TourTarget::DoctorPicker,
                    "Doctor",
                    self.doctor.unwrap_or("Press Enter to choose"),
                    RowKind::Select,
                )
                .in_section(SectionId::Medical),
            );
            rows.push(
                FormRow::new(TourTarget::PresentedProducts, "Presented products", presented, RowKind::List)
                    .in_section(SectionId::Medical)
                    .with_height(self.presented.len().max(1) as u16 + 2),
            );
            rows.push(
                FormRow::new(TourTarget::NoteField, "Visit note", self.note.clone(), RowKind::Text)
                    .in_section(SectionId::Medical),
            );
        }

        if role.can_medical() && role.can_commercial() {
            let label = if self.commercial_added {
                "Remove commercial visit"
            } else {
                "Attach commercial visit"
            };
            rows.push(FormRow::new(TourTarget::AddCommercialButton, "Commercial", label, RowKind::Button));
        }

        if self.has_commercial(role) {
            let client = match (self.client_type, self.client) {
                (_, Some(client)) => client,
                (Some(_), None) => "Press Enter to pick",
                (None, None) => "Pick a client type first",
            };
            let stock = match self.in_stock {
                None => "Not answered",
                Some(true) => "Yes",
                Some(false) => "No",
            };
            rows.push(FormRow::header(SECTIONS[1]));
            rows.push(
                FormRow::new(
                    TourTarget::ClientType,
                    "Client type",
                    self.client_type.map_or("Press Enter to choose", ClientType::label),
                    RowKind::Select,
                )
                .in_section(SectionId::Commercial),
            );
            rows.push(
                FormRow::new(TourTarget::ClientPicker, "Client", client, RowKind::Select)
                    .in_section(SectionId::Commercial),
            );
            rows.push(
                FormRow::new(
                    TourTarget::ProductPicker,
                    "Product",
                    self.product.unwrap_or("Press Enter to choose"),
                    RowKind::Select,
                )
                .in_section(SectionId::Commercial),
            );
            rows.push(
                FormRow::new(TourTarget::StockChoice, "In stock", stock, RowKind::Select)
                    .in_section(SectionId::Commercial),
            );
            // Not laid out until the product is reported in stock
            if self.in_stock == Some(true) {
                rows.push(
                    FormRow::new(TourTarget::QuantityField, "Units on shelf", self.quantity.to_string(), RowKind::Counter)
                        .in_section(SectionId::Commercial),
                );
            }
        }

        rows.push(FormRow::new(TourTarget::SubmitButton, "Save report", "Press Enter to save", RowKind::Button));
        rows
    }

    fn activate(&mut self, target: TourTarget) {
        match target {
            TourTarget::DoctorPicker => self.cycle_doctor(),
            TourTarget::PresentedProducts => self.present_next(),
            TourTarget::AddCommercialButton => {
                if self.commercial_added {
                    self.detach_commercial();
                } else {
                    self.attach_commercial();
                }
            }
            TourTarget::ClientType => self.cycle_client_type(),
            TourTarget::ClientPicker => self.cycle_client(),
            TourTarget::ProductPicker => self.cycle_product(),
            TourTarget::StockChoice => self.toggle_stock(),
            TourTarget::QuantityField => self.quantity = adjust_count(self.quantity, 1),
            _ => {}
        }
    }

    fn adjust(&mut self, target: TourTarget, delta: i32) {
        if target == TourTarget::QuantityField {
            self.quantity = adjust_count(self.quantity, delta);
        }
    }

    fn clear(&mut self, target: TourTarget) {
        match target {
            TourTarget::DoctorPicker => self.clear_doctor(),
            TourTarget::PresentedProducts => {
                self.presented.pop();
            }
            TourTarget::NoteField => self.clear_note(),
            TourTarget::AddCommercialButton => self.detach_commercial(),
            TourTarget::ClientType => self.clear_client_type(),
            TourTarget::ClientPicker => self.clear_client(),
            TourTarget::ProductPicker => self.clear_product(),
            TourTarget::StockChoice => self.clear_stock(),
            TourTarget::QuantityField => self.clear_quantity(),
            _ => {}
        }
    }

    fn text_mut(&mut self, target: TourTarget) -> Option<&mut String> {
        (target == TourTarget::NoteField).then_some(&mut self.note)
    }

    fn validate(&self, role: Role) -> Result<(), FormError> {
        if role.can_medical() {
            if self.doctor.is_none() {
                return Err(FormError::MissingField("Doctor"));
            }
            if self.presented.is_empty() {
                return Err(FormError::MissingField("Presented product"));
            }
        }
        if self.has_commercial(role) {
            if self.client.is_none() {
                return Err(FormError::MissingField("Client"));
            }
            if self.product.is_none() {
                return Err(FormError::MissingField("Product"));
            }
            match self.in_stock {
                None => return Err(FormError::MissingField("Stock answer")),
                Some(true) if self.quantity == 0 => return Err(FormError::EmptyQuantity),
                _ => {}
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn filled() -> ReportForm {
        ReportForm {
            doctor: Some("Dr. Karim Haddad"),
            presented: vec!["Amoxil 500mg", "Zyrtec 10mg"],
            note: "Interested in samples".to_string(),
            commercial_added: true,
            client_type: Some(ClientType::Clinic),
            client: Some("Clinique Ibn Sina"),
            product: Some("Doliprane 1g"),
            in_stock: Some(true),
            quantity: 12,
        }
    }

    #[test]
    fn test_each_rollback_clears_exactly_its_field() {
        let cases: Vec<(StepKey, ReportForm)> = vec![
            (StepKey::ReportDoctor, ReportForm { doctor: None, ..filled() }),
            (StepKey::ReportProducts, ReportForm { presented: vec![], ..filled() }),
            (StepKey::ReportNote, ReportForm { note: String::new(), ..filled() }),
            (StepKey::ReportAddCommercial, ReportForm { commercial_added: false, ..filled() }),
            (StepKey::ReportClientType, ReportForm { client_type: None, ..filled() }),
            (StepKey::ReportClient, ReportForm { client: None, ..filled() }),
            (StepKey::ReportCommercialProduct, ReportForm { product: None, ..filled() }),
            (StepKey::ReportStock, ReportForm { in_stock: None, ..filled() }),
            (StepKey::ReportQuantity, ReportForm { quantity: 0, ..filled() }),
            (StepKey::Intro, filled()),
            (StepKey::Submit, filled()),
        ];
        for (key, expected) in cases {
            let mut form = filled();
            form.rollback(key);
            assert_eq!(form, expected, "rollback of {key:?}");
        }
    }

    #[test]
    fn test_every_report_step_has_a_rollback_entry() {
        let catalog = filled().catalog(Role::Hybrid);
        for step in catalog
            .iter()
            .filter(|s| !matches!(s.key, StepKey::Intro | StepKey::Submit))
        {
            assert!(
                REPORT_ROLLBACKS.iter().any(|(k, _)| *k == step.key),
                "missing rollback for {:?}",
                step.key
            );
        }
    }

    #[test]
    fn test_quantity_applies_only_when_in_stock() {
        let mut form = ReportForm::new();
        assert!(!form.is_applicable(StepKey::ReportQuantity));
        form.in_stock = Some(false);
        assert!(!form.is_applicable(StepKey::ReportQuantity));
        form.in_stock = Some(true);
        assert!(form.is_applicable(StepKey::ReportQuantity));
        assert!(form.is_applicable(StepKey::ReportDoctor));
    }

    #[test]
    fn test_catalog_follows_commercial_toggle() {
        let mut form = ReportForm::new();
        let without = form.catalog(Role::Hybrid).len();
        form.activate(TourTarget::AddCommercialButton);
        assert_eq!(form.catalog(Role::Hybrid).len(), without + 5);
        form.activate(TourTarget::AddCommercialButton);
        assert_eq!(form.catalog(Role::Hybrid).len(), without);
    }

    #[test]
    fn test_quantity_row_only_laid_out_when_in_stock() {
        let mut form = ReportForm::new();
        let has_quantity =
            |f: &ReportForm| f.rows(Role::Commercial).iter().any(|r| r.target == TourTarget::QuantityField);
        assert!(!has_quantity(&form));
        form.toggle_stock();
        assert_eq!(form.in_stock, Some(true));
        assert!(has_quantity(&form));
        form.toggle_stock();
        assert_eq!(form.in_stock, Some(false));
        assert!(!has_quantity(&form));
    }

    #[test]
    fn test_rows_by_role() {
        let form = ReportForm::new();
        let medical = form.rows(Role::Medical);
        assert!(medical.iter().all(|r| r.target != TourTarget::AddCommercialButton));
        assert!(medical.iter().any(|r| r.target == TourTarget::DoctorPicker));

        let commercial = form.rows(Role::Commercial);
        assert!(commercial.iter().all(|r| r.target != TourTarget::DoctorPicker));
        assert!(commercial.iter().any(|r| r.target == TourTarget::ClientType));

        let hybrid = form.rows(Role::Hybrid);
        assert!(hybrid.iter().any(|r| r.target == TourTarget::AddCommercialButton));
        assert!(hybrid.iter().all(|r| r.target != TourTarget::ClientType));
    }

    #[test]
    fn test_validate_by_role() {
        assert!(filled().validate(Role::Hybrid).is_ok());
        assert_eq!(
            ReportForm::new().validate(Role::Medical),
            Err(FormError::MissingField("Doctor"))
        );
        let commercial_only = ReportForm {
            client: Some("Medi-Distrib"),
            product: Some("Zyrtec 10mg"),
            in_stock: Some(true),
            ..ReportForm::default()
        };
        assert_eq!(commercial_only.validate(Role::Commercial), Err(FormError::EmptyQuantity));
        let out_of_stock = ReportForm {
            in_stock: Some(false),
            ..commercial_only
        };
        assert!(out_of_stock.validate(Role::Commercial).is_ok());
    }
}
