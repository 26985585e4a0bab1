//! Field and form validation.
//!
//! [`validate_field`] is pure: it looks at a [`FieldDescriptor`] built from the
//! control's live attributes and returns the first rule that fails. Rules are
//! tried in a fixed order and only the first applicable one is evaluated, so
//! e.g. a non-empty email field is never also checked as a name.
//!
//! [`FieldFeedback`] turns verdicts into error-slot rendering and remembers
//! which fields are currently marked invalid, which is what gates
//! re-validation on input.

use std::{
    collections::{HashMap, HashSet},
    sync::LazyLock,
};

use regex::Regex;
use shared::{domain::ElementId, protocol::RenderCommand};

use crate::{
    config::MessageCatalog,
    page::{
        Control, ControlTag, FormDocument, COMPONENT_ERROR_CLASS, COMPONENT_INPUT_CLASS,
        FRAMEWORK_ERROR_CLASS,
    },
};

static EMAIL_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern"));

static PHONE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9\s+\-()]{10,20}$").expect("phone pattern"));

static NAME_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-zA-ZА-Яа-яЁёÀ-ÿ\s\-']{2,50}$").expect("name pattern")
});

const MIN_MESSAGE_CHARS: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Email,
    Tel,
    /// Multi-line free text.
    LongText,
    Checkbox,
    Other,
}

impl FieldKind {
    pub fn of(control: &Control) -> Self {
        if control.def.tag == ControlTag::Textarea {
            return Self::LongText;
        }
        match control.def.control_type().to_ascii_lowercase().as_str() {
            "text" => Self::Text,
            "email" => Self::Email,
            "tel" => Self::Tel,
            "checkbox" => Self::Checkbox,
            _ => Self::Other,
        }
    }
}

/// One validation pass's view of a control; rebuilt every pass.
#[derive(Debug, Clone, Copy)]
pub struct FieldDescriptor<'a> {
    pub name: &'a str,
    pub kind: FieldKind,
    pub value: &'a str,
    pub checked: bool,
    pub required: bool,
    pub label: Option<&'a str>,
    pub placeholder: Option<&'a str>,
}

impl<'a> FieldDescriptor<'a> {
    pub fn of(control: &'a Control) -> Self {
        Self {
            name: control.key(),
            kind: FieldKind::of(control),
            value: &control.value,
            checked: control.checked,
            required: control.def.required,
            label: control.def.label.as_deref(),
            placeholder: control.def.placeholder.as_deref(),
        }
    }
}

/// Why a field failed; each variant carries only what its message needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldIssue {
    Required { label: String },
    InvalidEmail,
    InvalidPhone,
    MessageTooShort,
    InvalidName,
    ConsentRequired,
}

impl FieldIssue {
    pub fn message(&self, messages: &MessageCatalog) -> String {
        match self {
            Self::Required { label } => messages.required_field(label),
            Self::InvalidEmail => messages.invalid_email.clone(),
            Self::InvalidPhone => messages.invalid_phone.clone(),
            Self::MessageTooShort => messages.message_too_short.clone(),
            Self::InvalidName => messages.invalid_name.clone(),
            Self::ConsentRequired => messages.consent_required.clone(),
        }
    }
}

/// Visible label text (first `*` marker removed), else placeholder, else the
/// field's name or id, else `fallback`.
pub fn resolve_label(field: &FieldDescriptor<'_>, fallback: &str) -> String {
    if let Some(label) = field.label {
        return label.replacen('*', "", 1).trim().to_string();
    }
    if let Some(placeholder) = field.placeholder.filter(|p| !p.is_empty()) {
        return placeholder.to_string();
    }
    if !field.name.is_empty() {
        return field.name.to_string();
    }
    fallback.to_string()
}

pub fn validate_field(
    field: &FieldDescriptor<'_>,
    messages: &MessageCatalog,
) -> Result<(), FieldIssue> {
    let trimmed = field.value.trim();
    let filled = !trimmed.is_empty();

    match field.kind {
        _ if field.required && !filled => Err(FieldIssue::Required {
            label: resolve_label(field, &messages.fallback_label),
        }),
        FieldKind::Email if filled => {
            if EMAIL_PATTERN.is_match(trimmed) {
                Ok(())
            } else {
                Err(FieldIssue::InvalidEmail)
            }
        }
        FieldKind::Tel if filled => {
            if PHONE_PATTERN.is_match(trimmed) {
                Ok(())
            } else {
                Err(FieldIssue::InvalidPhone)
            }
        }
        FieldKind::LongText if filled && trimmed.chars().count() < MIN_MESSAGE_CHARS => {
            Err(FieldIssue::MessageTooShort)
        }
        FieldKind::Text if field.required => {
            if NAME_PATTERN.is_match(trimmed) {
                Ok(())
            } else {
                Err(FieldIssue::InvalidName)
            }
        }
        FieldKind::Checkbox if field.required && !field.checked => {
            Err(FieldIssue::ConsentRequired)
        }
        _ => Ok(()),
    }
}

/// Invalid marks and error slots for one form's fields.
#[derive(Debug, Default)]
pub struct FieldFeedback {
    invalid: HashSet<ElementId>,
    slots: HashMap<ElementId, ElementId>,
}

impl FieldFeedback {
    pub fn is_invalid(&self, field: &ElementId) -> bool {
        self.invalid.contains(field)
    }

    pub fn invalid_count(&self) -> usize {
        self.invalid.len()
    }

    /// Validate `control` and render the outcome. Returns whether it passed.
    pub fn check(
        &mut self,
        control: &Control,
        messages: &MessageCatalog,
        out: &mut Vec<RenderCommand>,
    ) -> bool {
        let verdict = validate_field(&FieldDescriptor::of(control), messages);
        let field = control.id().clone();

        match verdict {
            Ok(()) => {
                self.invalid.remove(&field);
                out.push(RenderCommand::ClearFieldError {
                    slot: self.slots.get(&field).cloned(),
                    field,
                });
                true
            }
            Err(issue) => {
                let slot = self.slot_for(control, out);
                self.invalid.insert(field.clone());
                out.push(RenderCommand::ShowFieldError {
                    field,
                    slot,
                    message: issue.message(messages),
                });
                false
            }
        }
    }

    fn slot_for(&mut self, control: &Control, out: &mut Vec<RenderCommand>) -> ElementId {
        if let Some(slot) = self.slots.get(control.id()) {
            return slot.clone();
        }
        let slot = control.id().suffixed("error");
        let class = if control.def.has_class(COMPONENT_INPUT_CLASS) {
            COMPONENT_ERROR_CLASS
        } else {
            FRAMEWORK_ERROR_CLASS
        };
        out.push(RenderCommand::CreateErrorSlot {
            field: control.id().clone(),
            slot: slot.clone(),
            class: class.to_string(),
        });
        self.slots.insert(control.id().clone(), slot.clone());
        slot
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormVerdict {
    pub first_invalid: Option<ElementId>,
    pub invalid_count: usize,
}

impl FormVerdict {
    pub fn is_valid(&self) -> bool {
        self.first_invalid.is_none()
    }
}

/// Check every control (the honeypot is not one), then bring the first
/// failing field into view and focus it.
pub fn validate_form(
    form: &FormDocument,
    feedback: &mut FieldFeedback,
    messages: &MessageCatalog,
    out: &mut Vec<RenderCommand>,
) -> FormVerdict {
    let mut first_invalid = None;
    let mut invalid_count = 0;

    for control in &form.controls {
        if !feedback.check(control, messages, out) {
            invalid_count += 1;
            first_invalid.get_or_insert_with(|| control.id().clone());
        }
    }

    if let Some(field) = &first_invalid {
        out.push(RenderCommand::ScrollIntoView {
            element: field.clone(),
        });
        out.push(RenderCommand::Focus {
            element: field.clone(),
        });
    }

    FormVerdict {
        first_invalid,
        invalid_count,
    }
}

#[cfg(test)]
#[path = "tests/validation_tests.rs"]
mod tests;
