//! Page structure the controller attaches to, and the live form document the
//! trigger surface keeps up to date.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use shared::domain::ElementId;
use thiserror::Error;

/// Component-styled inputs get component-styled error slots.
pub const COMPONENT_INPUT_CLASS: &str = "c-form__input";
pub const COMPONENT_ERROR_CLASS: &str = "c-form__error";
pub const FRAMEWORK_ERROR_CLASS: &str = "invalid-feedback";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum StructureError {
    #[error("form '{form}' declares control '{control}' more than once")]
    DuplicateControl { form: ElementId, control: ElementId },
    #[error("form id '{0}' is used by more than one form")]
    DuplicateForm(ElementId),
    #[error("form '{form}' already has a control named '{name}' (reserved for the honeypot)")]
    HoneypotCollision { form: ElementId, name: String },
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PageStructure {
    pub nav: Option<NavStructure>,
    pub header_height_px: Option<u32>,
    /// Ids of in-page anchor targets.
    pub sections: Vec<ElementId>,
    pub forms: Vec<FormStructure>,
}

impl PageStructure {
    pub fn has_section(&self, id: &str) -> bool {
        self.sections.iter().any(|section| section.as_str() == id)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct NavStructure {
    pub toggle: Option<ElementId>,
    pub nav: Option<ElementId>,
    /// The sliding list inside the nav container.
    pub menu: Option<ElementId>,
    pub links: Vec<ElementId>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FormStructure {
    pub id: ElementId,
    #[serde(default)]
    pub controls: Vec<ControlStructure>,
    #[serde(default)]
    pub submit: Option<SubmitControl>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmitControl {
    pub id: ElementId,
    pub label: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ControlTag {
    #[default]
    Input,
    Textarea,
    Select,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ControlStructure {
    pub id: ElementId,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub tag: ControlTag,
    /// The `type` attribute of an input; ignored for other tags.
    #[serde(default = "default_input_type")]
    pub input_type: String,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub placeholder: Option<String>,
    #[serde(default)]
    pub classes: Vec<String>,
    /// Initial value; `None` means the tag's default (`"on"` for checkboxes).
    #[serde(default)]
    pub value: Option<String>,
    #[serde(default)]
    pub checked: bool,
}

fn default_input_type() -> String {
    "text".to_string()
}

impl ControlStructure {
    /// The `type` property as the DOM reports it.
    pub fn control_type(&self) -> &str {
        match self.tag {
            ControlTag::Input => &self.input_type,
            ControlTag::Textarea => "textarea",
            ControlTag::Select => "select-one",
        }
    }

    pub fn is_checkbox(&self) -> bool {
        self.tag == ControlTag::Input && self.input_type.eq_ignore_ascii_case("checkbox")
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }
}

/// A form control with its live value.
#[derive(Debug, Clone)]
pub struct Control {
    pub def: ControlStructure,
    pub value: String,
    pub checked: bool,
}

impl Control {
    fn new(def: ControlStructure) -> Self {
        let value = match &def.value {
            Some(value) => value.clone(),
            None if def.is_checkbox() => "on".to_string(),
            None => String::new(),
        };
        let checked = def.checked;
        Self {
            def,
            value,
            checked,
        }
    }

    pub fn id(&self) -> &ElementId {
        &self.def.id
    }

    /// `name`, else `id`, as the form's data key.
    pub fn key(&self) -> &str {
        self.def
            .name
            .as_deref()
            .filter(|name| !name.is_empty())
            .unwrap_or(self.def.id.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Honeypot {
    pub field: ElementId,
    pub name: String,
    pub value: String,
}

/// Ordered name/value pairs a form would send, honeypot excluded.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FormPayload {
    pub entries: Vec<(String, String)>,
}

impl FormPayload {
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[derive(Debug, Clone)]
pub struct FormDocument {
    pub id: ElementId,
    pub controls: Vec<Control>,
    pub submit: Option<SubmitControl>,
    pub honeypot: Option<Honeypot>,
}

impl FormDocument {
    pub fn from_structure(def: &FormStructure) -> Result<Self, StructureError> {
        let mut seen = HashSet::new();
        for control in &def.controls {
            if !seen.insert(&control.id) {
                return Err(StructureError::DuplicateControl {
                    form: def.id.clone(),
                    control: control.id.clone(),
                });
            }
        }

        Ok(Self {
            id: def.id.clone(),
            controls: def.controls.iter().cloned().map(Control::new).collect(),
            submit: def.submit.clone(),
            honeypot: None,
        })
    }

    pub fn control(&self, id: &ElementId) -> Option<&Control> {
        self.controls.iter().find(|control| control.id() == id)
    }

    pub fn control_mut(&mut self, id: &ElementId) -> Option<&mut Control> {
        self.controls.iter_mut().find(|control| control.id() == id)
    }

    pub fn is_honeypot(&self, id: &ElementId) -> bool {
        self.honeypot.as_ref().is_some_and(|pot| &pot.field == id)
    }

    pub fn check_honeypot_name(&self, name: &str) -> Result<(), StructureError> {
        if self.controls.iter().any(|control| control.key() == name) {
            return Err(StructureError::HoneypotCollision {
                form: self.id.clone(),
                name: name.to_string(),
            });
        }
        Ok(())
    }

    /// Add the decoy field; returns a copy of the injected honeypot.
    pub fn inject_honeypot(&mut self, name: &str) -> Result<Honeypot, StructureError> {
        self.check_honeypot_name(name)?;
        let field = self.id.suffixed(name);
        let pot = self.honeypot.get_or_insert_with(|| Honeypot {
            field,
            name: name.to_string(),
            value: String::new(),
        });
        Ok(pot.clone())
    }

    pub fn honeypot_tripped(&self) -> bool {
        self.honeypot
            .as_ref()
            .is_some_and(|pot| !pot.value.is_empty())
    }

    /// Named controls only; unchecked checkboxes contribute nothing. The
    /// honeypot lives outside `controls` and never reaches the payload.
    pub fn payload(&self) -> FormPayload {
        let entries = self
            .controls
            .iter()
            .filter(|control| control.def.name.as_deref().is_some_and(|n| !n.is_empty()))
            .filter(|control| !control.def.is_checkbox() || control.checked)
            .map(|control| (control.key().to_string(), control.value.clone()))
            .collect();
        FormPayload { entries }
    }
}
