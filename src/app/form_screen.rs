// ABOUTME: State of one form screen - the form, its scroll body, focus, text editing and the attached guided tour

use super::viewport::{FormViewport, LayoutMap, LayoutNode, SectionToggle};
use crate::config::AppConfig;
use crate::models::{FormModel, FormRow, Role, RowKind, SectionId};
use crate::tour::{
    Collapsible, HostNavigator, Rect, ScrollViewport, TargetRegistry, TourController, TourEvent,
    TourSession, TourTarget,
};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

/// A row placed in content coordinates (row 0 is the top of the form)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaidOutRow {
    pub row: FormRow,
    pub y: u16,
}

impl LaidOutRow {
    pub const fn bottom(&self) -> u16 {
        self.y + self.row.height
    }
}

pub struct FormScreen<D> {
    form: D,
    role: Role,
    session: TourSession<D>,
    viewport: Arc<FormViewport>,
    layout: LayoutMap,
    sections: Vec<(SectionId, Arc<SectionToggle>)>,
    rows: Vec<LaidOutRow>,
    focus: usize,
    editing: Option<TourTarget>,
    status: Option<String>,
}

impl<D: FormModel> FormScreen<D> {
    pub fn new(form: D, role: Role, config: &AppConfig) -> Self {
        let viewport = Arc::new(FormViewport::new(config.ui.scroll_step));
        let layout = LayoutMap::new();

        let sections: Vec<(SectionId, Arc<SectionToggle>)> = form
            .sections()
            .iter()
            .map(|s| (s.id, Arc::new(SectionToggle::new(s.starts_open))))
            .collect();

        let mut registry = TargetRegistry::new();
        for target in TourTarget::ALL {
            let node = LayoutNode::new(target, layout.clone(), Arc::clone(&viewport));
            registry.register(target, Arc::new(node));
        }
        for (section, (_, toggle)) in form.sections().iter().zip(&sections) {
            for target in section.owns {
                let owner: Arc<dyn Collapsible> = toggle.clone();
                registry.register_owner(*target, owner);
            }
        }

        let controller = TourController::new(role, config.tour.clone(), &form);
        let scroll: Arc<dyn ScrollViewport> = viewport.clone();
        let session = TourSession::new(controller, registry, scroll);

        let mut screen = Self {
            form,
            role,
            session,
            viewport,
            layout,
            sections,
            rows: Vec::new(),
            focus: 0,
            editing: None,
            status: None,
        };
        screen.sync_layout();
        screen
    }

    // === Queries ===

    pub const fn form(&self) -> &D {
        &self.form
    }

    pub const fn role(&self) -> Role {
        self.role
    }

    pub const fn tour(&self) -> &TourController<D> {
        self.session.controller()
    }

    pub const fn viewport(&self) -> &Arc<FormViewport> {
        &self.viewport
    }

    pub fn rows(&self) -> &[LaidOutRow] {
        &self.rows
    }

    pub const fn focus(&self) -> usize {
        self.focus
    }

    pub fn focused_row(&self) -> Option<&LaidOutRow> {
        self.rows.get(self.focus)
    }

    pub const fn editing(&self) -> Option<TourTarget> {
        self.editing
    }

    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    pub fn is_section_open(&self, id: SectionId) -> bool {
        self.sections
            .iter()
            .find(|(section, _)| *section == id)
            .map_or(true, |(_, toggle)| toggle.is_open())
    }

    pub fn is_measuring(&self) -> bool {
        self.session.is_measuring()
    }

    // === Layout ===

    /// Lay out visible rows in content space and publish them for measurement
    pub fn sync_layout(&mut self) {
        let width = self.viewport.frame().map_or(80.0, |f| f.width);
        let mut y: u16 = 0;
        let mut rows = Vec::new();
        let mut placed = HashMap::new();

        for row in self.form.rows(self.role) {
            if row.section.is_some_and(|id| !self.is_section_open(id)) {
                continue;
            }
            if !row.target.is_none() {
                placed.insert(
                    row.target,
                    Rect::new(0.0, f32::from(y), width, f32::from(row.height)),
                );
            }
            let height = row.height;
            rows.push(LaidOutRow { row, y });
            y = y.saturating_add(height);
        }

        self.layout.replace(placed);
        self.viewport.set_content_height(f32::from(y));
        self.rows = rows;
        if self.focus >= self.rows.len() {
            self.focus = self.rows.len().saturating_sub(1);
        }
    }

    /// Per-frame housekeeping: scroll animation, layout changes, tour debounces and measurements
    pub fn tick(&mut self, now: Instant) {
        self.sync_layout();
        self.viewport.animate();

        if let Some(root) = self.viewport.take_layout_change() {
            let tour = self.session.controller_mut();
            tour.set_root_offset(root);
            tour.relayout();
        }

        if let Some(event) = self.session.controller_mut().tick(&self.form, now) {
            self.on_tour_event(&event);
        }
        self.session.pump();
    }

    // === Manual editing ===

    pub fn move_focus(&mut self, delta: isize) {
        if self.rows.is_empty() {
            return;
        }
        let last = self.rows.len() - 1;
        self.focus = self.focus.saturating_add_signed(delta).min(last);
        self.reveal_focus();
    }

    pub fn scroll(&mut self, delta: f32) {
        self.viewport.scroll_by(delta);
    }

    /// Enter on the focused row
    pub fn activate(&mut self, now: Instant, nav: &mut dyn HostNavigator) {
        let Some((target, kind)) = self.focused_row().map(|r| (r.row.target, r.row.kind)) else {
            return;
        };
        match kind {
            RowKind::Header(id) => self.toggle_section(id),
            RowKind::Text => {
                debug!("Editing {:?}", target);
                self.editing = Some(target);
            }
            RowKind::Button if target == TourTarget::SubmitButton => self.submit(now, nav),
            _ => {
                self.form.activate(target);
                self.observe(now);
            }
        }
    }

    pub fn adjust(&mut self, delta: i32, now: Instant) {
        if let Some(target) = self.focused_row().map(|r| r.row.target) {
            self.form.adjust(target, delta);
            self.observe(now);
        }
    }

    pub fn clear_focused(&mut self, now: Instant) {
        if let Some(target) = self.focused_row().map(|r| r.row.target) {
            self.form.clear(target);
            self.observe(now);
        }
    }

    pub fn input_char(&mut self, c: char, now: Instant) {
        if let Some(text) = self.editing.and_then(|t| self.form.text_mut(t)) {
            text.push(c);
            self.observe(now);
        }
    }

    pub fn input_backspace(&mut self, now: Instant) {
        if let Some(text) = self.editing.and_then(|t| self.form.text_mut(t)) {
            text.pop();
            self.observe(now);
        }
    }

    pub fn stop_editing(&mut self) {
        self.editing = None;
    }

    pub fn toggle_section(&mut self, id: SectionId) {
        if let Some((_, toggle)) = self.sections.iter().find(|(section, _)| *section == id) {
            toggle.toggle();
        }
        self.sync_layout();
        self.session.controller_mut().relayout();
    }

    fn submit(&mut self, now: Instant, nav: &mut dyn HostNavigator) {
        if self.tour().is_open() {
            self.finish_tour(nav);
            return;
        }
        match self.form.validate(self.role) {
            Ok(()) => {
                info!(title = self.form.title(), "Form saved");
                self.status = Some("Saved".to_string());
                self.form.reset();
                self.focus = 0;
                self.viewport.scroll_to(0.0, false);
                self.observe(now);
            }
            Err(e) => {
                warn!("Submit rejected: {}", e);
                self.status = Some(e.to_string());
            }
        }
    }

    // === Tour ===

    pub fn start_tour(&mut self, now: Instant) {
        if self.tour().is_open() {
            return;
        }
        self.status = None;
        let event = self.session.controller_mut().start(&self.form, now);
        self.on_tour_event(&event);
    }

    pub fn tour_next(&mut self, now: Instant) {
        if let Some(event) = self.session.controller_mut().next(&self.form, now) {
            self.on_tour_event(&event);
        }
    }

    pub fn tour_prev(&mut self, now: Instant) {
        if let Some(event) = self.session.controller_mut().prev(&mut self.form, now) {
            self.on_tour_event(&event);
        }
    }

    pub fn close_tour(&mut self, nav: &mut dyn HostNavigator) {
        if let Some(event) = self.session.controller_mut().close(&mut self.form, nav) {
            self.on_tour_event(&event);
        }
    }

    pub fn finish_tour(&mut self, nav: &mut dyn HostNavigator) {
        if let Some(event) = self.session.controller_mut().finish(&mut self.form, nav) {
            self.on_tour_event(&event);
        }
    }

    /// Report a form change to the tour
    fn observe(&mut self, now: Instant) {
        self.sync_layout();
        if let Some(event) = self.session.controller_mut().observe(&self.form, now) {
            self.on_tour_event(&event);
        }
    }

    fn on_tour_event(&mut self, event: &TourEvent) {
        match event {
            TourEvent::Started { .. } | TourEvent::StepChanged { .. } => {
                self.editing = None;
                self.sync_layout();
                if let Some(target) = self.tour().current_step().map(|s| s.target) {
                    self.focus_target(target);
                }
            }
            TourEvent::Finished | TourEvent::Closed => {
                self.editing = None;
                self.focus = 0;
                self.viewport.scroll_to(0.0, false);
                self.sync_layout();
            }
            TourEvent::Blocked(_) => {}
        }
    }

    fn focus_target(&mut self, target: TourTarget) {
        if target.is_none() {
            return;
        }
        if let Some(index) = self.rows.iter().position(|r| r.row.target == target) {
            self.focus = index;
        }
    }

    fn reveal_focus(&self) {
        if let Some(row) = self.focused_row() {
            self.viewport.reveal(f32::from(row.y), f32::from(row.bottom()));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{OrderForm, ReportForm};
    use crate::tour::{Point, StepKey};

    #[derive(Default)]
    struct Nav {
        returns: usize,
    }

    impl HostNavigator for Nav {
        fn return_to_entry(&mut self) {
            self.returns += 1;
        }
    }

    fn order_screen() -> FormScreen<OrderForm> {
        let screen = FormScreen::new(OrderForm::new(), Role::Hybrid, &AppConfig::default());
        screen
            .viewport()
            .set_frame(Rect::new(0.0, 2.0, 60.0, 12.0), Point::new(0.0, 1.0));
        screen
    }

    #[test]
    fn test_collapsed_section_rows_not_laid_out() {
        let mut screen = order_screen();
        screen.sync_layout();
        assert!(!screen.is_section_open(SectionId::Details));
        assert!(screen.rows().iter().all(|r| r.row.target != TourTarget::NoteField));

        screen.toggle_section(SectionId::Details);
        assert!(screen.rows().iter().any(|r| r.row.target == TourTarget::NoteField));
    }

    #[test]
    fn test_rows_stack_without_gaps() {
        let screen = order_screen();
        for pair in screen.rows().windows(2) {
            assert_eq!(pair[0].bottom(), pair[1].y);
        }
    }

    #[test]
    fn test_activate_edits_focused_row() {
        let mut screen = order_screen();
        let mut nav = Nav::default();
        let now = Instant::now();

        screen.activate(now, &mut nav);
        assert!(screen.form().client_type.is_some());

        screen.move_focus(2);
        screen.activate(now, &mut nav);
        assert_eq!(screen.form().lines.len(), 1);
    }

    #[test]
    fn test_text_editing_goes_to_note() {
        let mut screen = order_screen();
        let mut nav = Nav::default();
        let now = Instant::now();
        screen.toggle_section(SectionId::Details);
        let note = screen
            .rows()
            .iter()
            .position(|r| r.row.target == TourTarget::NoteField)
            .unwrap();
        screen.move_focus(note as isize);

        screen.activate(now, &mut nav);
        assert_eq!(screen.editing(), Some(TourTarget::NoteField));
        for c in "Hi!".chars() {
            screen.input_char(c, now);
        }
        screen.input_backspace(now);
        screen.stop_editing();
        assert_eq!(screen.form().note, "Hi");
    }

    #[test]
    fn test_invalid_submit_sets_status() {
        let mut screen = order_screen();
        let mut nav = Nav::default();
        screen.move_focus(100);
        screen.activate(Instant::now(), &mut nav);
        assert_eq!(screen.status(), Some("Client is required"));
        assert_eq!(nav.returns, 0);
    }

    #[test]
    fn test_tour_step_focuses_target_row() {
        let mut screen = FormScreen::new(ReportForm::new(), Role::Hybrid, &AppConfig::default());
        let now = Instant::now();
        screen.start_tour(now);
        screen.tour_next(now);
        assert_eq!(screen.tour().current_key(), Some(StepKey::ReportDoctor));
        assert_eq!(
            screen.focused_row().map(|r| r.row.target),
            Some(TourTarget::DoctorPicker)
        );
    }

    #[test]
    fn test_close_tour_resets_and_navigates() {
        let mut screen = order_screen();
        let mut nav = Nav::default();
        let now = Instant::now();
        screen.start_tour(now);
        screen.tour_next(now);
        screen.activate(now, &mut nav);
        assert!(screen.form().client_type.is_some());

        screen.close_tour(&mut nav);
        assert!(!screen.tour().is_open());
        assert_eq!(screen.form(), &OrderForm::default());
        assert_eq!(nav.returns, 1);
    }
}
