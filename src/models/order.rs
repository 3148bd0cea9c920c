// ABOUTME: Purchase order form ("bon de commande") and its guided-tour wiring

use super::directory::Directory;
use super::form::{adjust_count, FormError, FormModel, FormRow, RowKind, Section, SectionId};
use super::role::{ClientType, Role};
use crate::tour::domain::apply_rollback;
use crate::tour::{order_catalog, Rollback, Step, StepKey, TourDomain, TourTarget};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderLine {
    pub product: &'static str,
    pub quantity: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrderForm {
    pub client_type: Option<ClientType>,
    pub client: Option<&'static str>,
    pub lines: Vec<OrderLine>,
    pub note: String,
}

const SECTIONS: &[Section] = &[Section {
    id: SectionId::Details,
    title: "Delivery details",
    owns: &[TourTarget::NoteField],
    starts_open: false,
}];

/// Fields each order step populates, cleared when stepping back from it
pub const ORDER_ROLLBACKS: &[(StepKey, Rollback<OrderForm>)] = &[
    (StepKey::OrderClientType, OrderForm::clear_client_type as Rollback<OrderForm>),
    (StepKey::OrderClient, OrderForm::clear_client as Rollback<OrderForm>),
    (StepKey::OrderAddProduct, OrderForm::remove_last_line as Rollback<OrderForm>),
    (StepKey::OrderQuantity, OrderForm::clear_last_quantity as Rollback<OrderForm>),
    (StepKey::OrderNote, OrderForm::clear_note as Rollback<OrderForm>),
];

impl OrderForm {
    pub fn new() -> Self {
        Self::default()
    }

    // === Edits ===

    pub fn cycle_client_type(&mut self) {
        self.client_type = Some(ClientType::cycle(self.client_type));
        // A client belongs to one type
        self.client = None;
    }

    pub fn cycle_client(&mut self) {
        if let Some(client_type) = self.client_type {
            self.client = Directory::cycle(Directory.clients(client_type), self.client);
        }
    }

    /// Add a line for the first product not yet on the order
    pub fn add_line(&mut self) {
        let next = Directory
            .products()
            .iter()
            .find(|p| !self.lines.iter().any(|l| l.product == **p));
        if let Some(product) = next {
            self.lines.push(OrderLine {
                product,
                quantity: 0,
            });
        }
    }

    pub fn adjust_last_quantity(&mut self, delta: i32) {
        if let Some(line) = self.lines.last_mut() {
            line.quantity = adjust_count(line.quantity, delta);
        }
    }

    pub fn clear_client_type(&mut self) {
        self.client_type = None;
    }

    pub fn clear_client(&mut self) {
        self.client = None;
    }

    pub fn remove_last_line(&mut self) {
        self.lines.pop();
    }

    pub fn clear_last_quantity(&mut self) {
        if let Some(line) = self.lines.last_mut() {
            line.quantity = 0;
        }
    }

    pub fn clear_note(&mut self) {
        self.note.clear();
    }

    pub fn total_units(&self) -> u32 {
        self.lines.iter().map(|l| l.quantity).sum()
    }
}

impl TourDomain for OrderForm {
    fn catalog(&self, role: Role) -> Vec<Step> {
        order_catalog(role)
    }

    fn is_satisfied(&self, key: StepKey) -> bool {
        match key {
            StepKey::OrderClientType => self.client_type.is_some(),
            StepKey::OrderClient => self.client.is_some(),
            StepKey::OrderAddProduct => !self.lines.is_empty(),
            StepKey::OrderQuantity => self.lines.last().is_some_and(|l| l.quantity > 0),
            StepKey::OrderNote => !self.note.trim().is_empty(),
            _ => false,
        }
    }

    fn rollback(&mut self, key: StepKey) {
        apply_rollback(ORDER_ROLLBACKS, key, self);
    }

    fn reset(&mut self) {
        *self = Self::default();
    }
}

impl FormModel for OrderForm {
    fn title(&self) -> &'static str {
        "New purchase order"
    }

    fn sections(&self) -> &'static [Section] {
        SECTIONS
    }

    fn rows(&self, role: Role) -> Vec<FormRow> {
        if !role.can_commercial() {
            return vec![FormRow::new(
                TourTarget::SubmitButton,
                "Orders",
                "Commercial permission required",
                RowKind::Button,
            )];
        }

        let client = match (self.client_type, self.client) {
            (_, Some(client)) => client.to_string(),
            (Some(_), None) => "Press Enter to pick".to_string(),
            (None, None) => "Pick a client type first".to_string(),
        };
        let lines = if self.lines.is_empty() {
            "No products yet".to_string()
        } else {
            self.lines
                .iter()
                .map(|l| format!("{} x{}", l.product, l.quantity))
                .collect::<Vec<_>>()
                .join("\n")
        };
        let quantity = self
            .lines
            .last()
            .map_or_else(|| "-".to_string(), |l| format!("{} ({})", l.quantity, l.product));

        vec![
            FormRow::new(
                TourTarget::ClientType,
                "Client type",
                self.client_type.map_or("Press Enter to choose", ClientType::label),
                RowKind::Select,
            ),
            FormRow::new(TourTarget::ClientPicker, "Client", client, RowKind::Select),
            FormRow::new(TourTarget::ProductPicker, "Add product", "Press Enter to add a line", RowKind::Button),
            FormRow::new(TourTarget::ProductLines, "Lines", lines, RowKind::List)
                .with_height(self.lines.len().max(1) as u16 + 2),
            FormRow::new(TourTarget::QuantityField, "Quantity", quantity, RowKind::Counter),
            FormRow::header(SECTIONS[0]),
            FormRow::new(TourTarget::NoteField, "Note", self.note.clone(), RowKind::Text)
                .in_section(SectionId::Details),
            FormRow::new(
                TourTarget::SubmitButton,
                "Save order",
                format!("{} line(s), {} unit(s)", self.lines.len(), self.total_units()),
                RowKind::Button,
            ),
        ]
    }

    fn activate(&mut self, target: TourTarget) {
        match target {
            TourTarget::ClientType => self.cycle_client_type(),
            TourTarget::ClientPicker => self.cycle_client(),
            TourTarget::ProductPicker => self.add_line(),
            TourTarget::QuantityField => self.adjust_last_quantity(1),
            _ => {}
        }
    }

    fn adjust(&mut self, target: TourTarget, delta: i32) {
        if target == TourTarget::QuantityField {
            self.adjust_last_quantity(delta);
        }
    }

    fn clear(&mut self, target: TourTarget) {
        match target {
            TourTarget::ClientType => self.clear_client_type(),
            TourTarget::ClientPicker => self.clear_client(),
            TourTarget::ProductLines | TourTarget::ProductPicker => self.remove_last_line(),
            TourTarget::QuantityField => self.clear_last_quantity(),
            TourTarget::NoteField => self.clear_note(),
            _ => {}
        }
    }

    fn text_mut(&mut self, target: TourTarget) -> Option<&mut String> {
        (target == TourTarget::NoteField).then_some(&mut self.note)
    }

    fn validate(&self, role: Role) -> Result<(), FormError> {
        if !role.can_commercial() {
            return Err(FormError::MissingField("Commercial permission"));
        }
        if self.client.is_none() {
            return Err(FormError::MissingField("Client"));
        }
        if self.lines.is_empty() {
            return Err(FormError::MissingField("Product line"));
        }
        if self.lines.iter().any(|l| l.quantity == 0) {
            return Err(FormError::EmptyQuantity);
        }
        Ok(())
    }
}
