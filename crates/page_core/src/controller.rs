//! The page controller: attaches behaviors once, routes page events through
//! the listener table and runs timers against the virtual clock.

use std::{collections::HashSet, time::Duration};

use shared::{
    domain::{ElementId, ModalId, Severity, Timestamp},
    error::{ErrorCode, PageException},
    protocol::{ModalAction, PageEvent, RenderCommand},
};
use tracing::{debug, info, warn};

use crate::{
    config::ControllerConfig,
    context::{AppContext, ScheduledTask},
    modal::ModalOutcome,
    nav_menu::{MenuElements, MenuState, NavMenu},
    orchestration::{event_name, listeners_for, Behavior, Listener, Trigger},
    page::{FormDocument, PageStructure, StructureError},
    registry::{Attachment, ModuleRegistry},
    submission::{SubmissionPipeline, SubmissionState},
    validation::{validate_form, FieldFeedback},
};

/// What an attached behavior keeps for the page lifetime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BehaviorHandle {
    Menu { toggle: ElementId, overlay: ElementId },
    Forms(Vec<ElementId>),
    Honeypots(Vec<ElementId>),
}

#[derive(Debug)]
pub struct FormInstance {
    pub document: FormDocument,
    pub feedback: FieldFeedback,
    pub pipeline: SubmissionPipeline,
}

impl From<StructureError> for PageException {
    fn from(err: StructureError) -> Self {
        PageException::new(ErrorCode::MissingStructure, err.to_string())
    }
}

pub struct PageController {
    structure: PageStructure,
    registry: ModuleRegistry<BehaviorHandle>,
    listeners: Vec<Listener>,
    ctx: AppContext,
    menu: Option<NavMenu>,
    forms: Vec<FormInstance>,
}

impl PageController {
    pub fn new(structure: PageStructure, config: ControllerConfig) -> Self {
        Self {
            structure,
            registry: ModuleRegistry::new(),
            listeners: Vec::new(),
            ctx: AppContext::new(config),
            menu: None,
            forms: Vec::new(),
        }
    }

    /// Page-init entry point. Safe to call repeatedly: behaviors already
    /// attached are left alone. A behavior that fails to attach is reported
    /// and skipped; the rest still attach.
    pub fn init(&mut self) -> Vec<PageException> {
        let mut failures = Vec::new();
        for behavior in Behavior::ALL {
            if let Err(err) = self.ensure(behavior) {
                warn!(behavior = behavior.key(), error = %err, "behavior failed to attach");
                failures.push(err.into());
            }
        }
        debug!(
            attached = self.registry.len(),
            listeners = self.listeners.len(),
            "page init finished"
        );
        failures
    }

    fn ensure(&mut self, behavior: Behavior) -> Result<bool, StructureError> {
        let mut registry = std::mem::take(&mut self.registry);
        let result = registry.ensure(behavior.key(), || self.attach(behavior));
        self.registry = registry;
        result
    }

    fn attach(&mut self, behavior: Behavior) -> Result<Attachment<BehaviorHandle>, StructureError> {
        let attachment = match behavior {
            Behavior::SmoothScroll | Behavior::PrivacyModal => {
                self.bind(behavior, &[Trigger::LinkClick]);
                Attachment::Sentinel
            }
            Behavior::NetworkCheck => {
                self.bind(behavior, &[Trigger::Connectivity]);
                Attachment::Sentinel
            }
            Behavior::BurgerMenu => {
                let Some(elements) = self.structure.nav.as_ref().and_then(MenuElements::locate)
                else {
                    return Ok(Attachment::Skipped);
                };
                let handle = BehaviorHandle::Menu {
                    toggle: elements.toggle.clone(),
                    overlay: elements.overlay.clone(),
                };
                self.menu = Some(NavMenu::attach(elements, &mut self.ctx));
                self.bind(
                    behavior,
                    &[
                        Trigger::ToggleClick,
                        Trigger::BackdropClick,
                        Trigger::KeyDown,
                        Trigger::Resize,
                        Trigger::LinkClick,
                    ],
                );
                Attachment::Handle(handle)
            }
            Behavior::FormValidation => {
                if self.structure.forms.is_empty() {
                    return Ok(Attachment::Skipped);
                }
                self.forms = self.build_forms()?;
                self.bind(
                    behavior,
                    &[Trigger::FieldBlur, Trigger::FieldInput, Trigger::Submit],
                );
                Attachment::Handle(BehaviorHandle::Forms(
                    self.forms.iter().map(|f| f.document.id.clone()).collect(),
                ))
            }
            Behavior::Honeypot => {
                if self.forms.is_empty() {
                    return Ok(Attachment::Skipped);
                }
                let name = self.ctx.config.honeypot_name.clone();
                for form in &self.forms {
                    form.document.check_honeypot_name(&name)?;
                }
                let mut fields = Vec::with_capacity(self.forms.len());
                for form in &mut self.forms {
                    let pot = form.document.inject_honeypot(&name)?;
                    self.ctx.outbox.push(RenderCommand::InjectHoneypot {
                        form: form.document.id.clone(),
                        field: pot.field.clone(),
                        name: pot.name,
                    });
                    fields.push(pot.field);
                }
                Attachment::Handle(BehaviorHandle::Honeypots(fields))
            }
        };
        Ok(attachment)
    }

    fn build_forms(&self) -> Result<Vec<FormInstance>, StructureError> {
        let mut seen = HashSet::new();
        let mut forms = Vec::with_capacity(self.structure.forms.len());
        for def in &self.structure.forms {
            if !seen.insert(&def.id) {
                return Err(StructureError::DuplicateForm(def.id.clone()));
            }
            forms.push(FormInstance {
                document: FormDocument::from_structure(def)?,
                feedback: FieldFeedback::default(),
                pipeline: SubmissionPipeline::default(),
            });
        }
        Ok(forms)
    }

    fn bind(&mut self, behavior: Behavior, triggers: &[Trigger]) {
        self.listeners.extend(
            triggers
                .iter()
                .map(|&trigger| Listener { behavior, trigger }),
        );
    }

    /// Deliver one page event at the current virtual time.
    pub fn dispatch(&mut self, event: PageEvent) -> Result<(), PageException> {
        debug!(event = event_name(&event), at = %self.ctx.now(), "dispatching page event");
        self.apply_to_document(&event)?;

        if let PageEvent::Modal { modal, action } = &event {
            self.on_modal(*modal, *action);
            return Ok(());
        }
        let Some(trigger) = Trigger::of(&event) else {
            return Ok(());
        };
        for behavior in listeners_for(&self.listeners, trigger) {
            self.route(behavior, &event);
        }
        Ok(())
    }

    /// Advance the clock to `at`, firing due timers, then deliver `event`.
    pub fn dispatch_at(&mut self, at: Timestamp, event: PageEvent) -> Result<(), PageException> {
        self.advance_to(at);
        self.dispatch(event)
    }

    /// Fire every timer due at or before `now`, in deadline order.
    pub fn advance_to(&mut self, now: Timestamp) {
        while let Some((_, at, task)) = self.ctx.timers.pop_due(now) {
            self.ctx.set_now(at);
            self.run_task(task);
        }
        self.ctx.set_now(now);
    }

    pub fn advance_by(&mut self, delay: Duration) {
        let now = self.ctx.now().after(delay);
        self.advance_to(now);
    }

    pub fn next_deadline(&self) -> Option<Timestamp> {
        self.ctx.timers.next_deadline()
    }

    pub fn take_commands(&mut self) -> Vec<RenderCommand> {
        self.ctx.take_commands()
    }

    pub fn now(&self) -> Timestamp {
        self.ctx.now()
    }

    pub fn context(&self) -> &AppContext {
        &self.ctx
    }

    pub fn menu_state(&self) -> Option<MenuState> {
        self.menu.as_ref().map(NavMenu::state)
    }

    pub fn form(&self, id: &ElementId) -> Option<&FormInstance> {
        self.forms.iter().find(|form| &form.document.id == id)
    }

    pub fn submission_state(&self, form: &ElementId) -> Option<SubmissionState> {
        self.form(form).map(|form| form.pipeline.state())
    }

    pub fn registered(&self) -> impl Iterator<Item = &str> {
        self.registry.names()
    }

    pub fn handle(&self, behavior: Behavior) -> Option<&BehaviorHandle> {
        self.registry.handle(behavior.key())
    }

    pub fn listeners(&self) -> &[Listener] {
        &self.listeners
    }

    fn form_mut(&mut self, id: &ElementId) -> Result<&mut FormInstance, PageException> {
        self.forms
            .iter_mut()
            .find(|form| &form.document.id == id)
            .ok_or_else(|| PageException::unknown_element("form", id))
    }

    /// Mirror the new field value or connectivity into controller state
    /// before any behavior sees the event.
    fn apply_to_document(&mut self, event: &PageEvent) -> Result<(), PageException> {
        match event {
            PageEvent::FieldInput { form, field, value } => {
                let document = &mut self.form_mut(form)?.document;
                if let Some(pot) = document.honeypot.as_mut().filter(|pot| &pot.field == field) {
                    pot.value = value.clone();
                    return Ok(());
                }
                let control = document
                    .control_mut(field)
                    .ok_or_else(|| PageException::unknown_element("field", field))?;
                control.value = value.clone();
            }
            PageEvent::FieldToggled {
                form,
                field,
                checked,
            } => {
                let control = self
                    .form_mut(form)?
                    .document
                    .control_mut(field)
                    .ok_or_else(|| PageException::unknown_element("field", field))?;
                control.checked = *checked;
            }
            PageEvent::FieldBlurred { form, field } => {
                let document = &self.form_mut(form)?.document;
                if document.control(field).is_none() && !document.is_honeypot(field) {
                    return Err(PageException::unknown_element("field", field));
                }
            }
            PageEvent::FormSubmitted { form } => {
                self.form_mut(form)?;
            }
            PageEvent::ConnectivityChanged { online } => self.ctx.set_online(*online),
            _ => {}
        }
        Ok(())
    }

    fn route(&mut self, behavior: Behavior, event: &PageEvent) {
        match behavior {
            Behavior::BurgerMenu => self.on_menu_event(event),
            Behavior::SmoothScroll => {
                if let PageEvent::LinkClicked { href, .. } = event {
                    self.scroll_to_anchor(href);
                }
            }
            Behavior::PrivacyModal => {
                if let PageEvent::LinkClicked { href, .. } = event {
                    if href == "#privacy" || href == "privacy" {
                        let id = self.ctx.show_modal();
                        info!(modal = %id, "privacy modal opened");
                    }
                }
            }
            Behavior::NetworkCheck => {
                if let PageEvent::ConnectivityChanged { online } = event {
                    self.announce_connectivity(*online);
                }
            }
            Behavior::FormValidation => match event {
                PageEvent::FieldBlurred { form, field } => self.on_blur(form, field),
                PageEvent::FieldInput { form, field, .. }
                | PageEvent::FieldToggled { form, field, .. } => self.on_input(form, field),
                PageEvent::FormSubmitted { form } => self.on_submit(form),
                _ => {}
            },
            Behavior::Honeypot => {}
        }
    }

    fn on_menu_event(&mut self, event: &PageEvent) {
        let Some(menu) = self.menu.as_mut() else {
            return;
        };
        match event {
            PageEvent::ToggleClicked => menu.toggle(&mut self.ctx),
            PageEvent::BackdropClicked => menu.close(&mut self.ctx),
            PageEvent::KeyPressed { key } if key == "Escape" => menu.close(&mut self.ctx),
            PageEvent::Resized { width } => menu.close_if_wide(*width, &mut self.ctx),
            PageEvent::LinkClicked { in_menu: true, .. } => menu.close(&mut self.ctx),
            _ => {}
        }
    }

    fn scroll_to_anchor(&mut self, href: &str) {
        let Some(target) = href.strip_prefix('#') else {
            return;
        };
        if target.is_empty() || target == "!" {
            return;
        }
        if !self.structure.has_section(target) {
            debug!(anchor = href, "anchor target not on page");
            return;
        }
        let offset_px = self
            .structure
            .header_height_px
            .unwrap_or(self.ctx.config.header_height_px);
        self.ctx.outbox.push(RenderCommand::ScrollToAnchor {
            target: ElementId::from(target),
            offset_px,
        });
        if let Some(menu) = self.menu.as_mut() {
            menu.close(&mut self.ctx);
        }
    }

    fn announce_connectivity(&mut self, online: bool) {
        let messages = &self.ctx.config.messages;
        let (message, severity) = if online {
            (messages.connection_restored.clone(), Severity::Success)
        } else {
            (messages.connection_lost.clone(), Severity::Error)
        };
        info!(online, "connectivity changed");
        self.ctx.notify(message, severity);
    }

    fn on_modal(&mut self, id: ModalId, action: ModalAction) {
        match ModalOutcome::of(action) {
            ModalOutcome::Close => {
                if !self.ctx.close_modal(id) {
                    debug!(modal = %id, "modal already closing or gone");
                }
            }
            ModalOutcome::FollowLink => {
                if self.ctx.modal().live().map(|m| m.id) != Some(id) {
                    debug!(modal = %id, "link action for a modal that is not open");
                    return;
                }
                let destination = self.ctx.config.privacy_policy_url.clone();
                info!(%destination, "following privacy policy link");
                self.ctx.outbox.push(RenderCommand::Navigate { destination });
            }
            ModalOutcome::Ignore => {}
        }
    }

    fn on_blur(&mut self, form: &ElementId, field: &ElementId) {
        let Some(instance) = self.forms.iter_mut().find(|f| &f.document.id == form) else {
            return;
        };
        if let Some(control) = instance.document.control(field) {
            instance
                .feedback
                .check(control, &self.ctx.config.messages, &mut self.ctx.outbox);
        }
    }

    /// Only fields already marked invalid are re-checked while typing.
    fn on_input(&mut self, form: &ElementId, field: &ElementId) {
        let Some(instance) = self.forms.iter_mut().find(|f| &f.document.id == form) else {
            return;
        };
        if !instance.feedback.is_invalid(field) {
            return;
        }
        if let Some(control) = instance.document.control(field) {
            instance
                .feedback
                .check(control, &self.ctx.config.messages, &mut self.ctx.outbox);
        }
    }

    fn on_submit(&mut self, form: &ElementId) {
        let Some(instance) = self.forms.iter_mut().find(|f| &f.document.id == form) else {
            return;
        };
        if instance.pipeline.is_locked() {
            debug!(form = %form, "submit ignored while control is disabled");
            return;
        }
        if instance.document.honeypot_tripped() {
            warn!(form = %form, "honeypot filled; submission dropped as spam");
            return;
        }
        let verdict = validate_form(
            &instance.document,
            &mut instance.feedback,
            &self.ctx.config.messages,
            &mut self.ctx.outbox,
        );
        if !verdict.is_valid() {
            debug!(form = %form, invalid = verdict.invalid_count, "form invalid; submission blocked");
            return;
        }
        instance.pipeline.begin(&instance.document, &mut self.ctx);
    }

    fn run_task(&mut self, task: ScheduledTask) {
        match task {
            ScheduledTask::SubmitDeadline { form } => {
                if let Some(instance) = self.forms.iter_mut().find(|f| f.document.id == form) {
                    instance.pipeline.complete(&form, &mut self.ctx);
                }
            }
            other => self.ctx.run_timer(&other),
        }
    }
}

#[cfg(test)]
#[path = "tests/controller_tests.rs"]
mod tests;
