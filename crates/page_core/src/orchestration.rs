//! Routing helpers from page events to the behaviors bound to them.

use shared::protocol::PageEvent;

/// Named page behaviors, in the order init attaches them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Behavior {
    SmoothScroll,
    BurgerMenu,
    FormValidation,
    PrivacyModal,
    NetworkCheck,
    Honeypot,
}

impl Behavior {
    pub const ALL: [Behavior; 6] = [
        Behavior::SmoothScroll,
        Behavior::BurgerMenu,
        Behavior::FormValidation,
        Behavior::PrivacyModal,
        Behavior::NetworkCheck,
        Behavior::Honeypot,
    ];

    /// Registry key.
    pub fn key(self) -> &'static str {
        match self {
            Behavior::SmoothScroll => "smoothScroll",
            Behavior::BurgerMenu => "burgerMenu",
            Behavior::FormValidation => "formValidation",
            Behavior::PrivacyModal => "privacyModal",
            Behavior::NetworkCheck => "networkCheck",
            Behavior::Honeypot => "honeypot",
        }
    }
}

/// The event classes a behavior can bind to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Trigger {
    ToggleClick,
    BackdropClick,
    KeyDown,
    Resize,
    LinkClick,
    FieldInput,
    FieldBlur,
    Submit,
    Connectivity,
}

impl Trigger {
    /// `None` for events delivered straight to their owner (modal controls).
    pub fn of(event: &PageEvent) -> Option<Self> {
        let trigger = match event {
            PageEvent::ToggleClicked => Trigger::ToggleClick,
            PageEvent::BackdropClicked => Trigger::BackdropClick,
            PageEvent::KeyPressed { .. } => Trigger::KeyDown,
            PageEvent::Resized { .. } => Trigger::Resize,
            PageEvent::LinkClicked { .. } => Trigger::LinkClick,
            PageEvent::FieldInput { .. } | PageEvent::FieldToggled { .. } => Trigger::FieldInput,
            PageEvent::FieldBlurred { .. } => Trigger::FieldBlur,
            PageEvent::FormSubmitted { .. } => Trigger::Submit,
            PageEvent::ConnectivityChanged { .. } => Trigger::Connectivity,
            PageEvent::Modal { .. } => return None,
        };
        Some(trigger)
    }
}

/// One event binding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Listener {
    pub behavior: Behavior,
    pub trigger: Trigger,
}

/// Behaviors bound to `trigger`, in binding order.
pub fn listeners_for(listeners: &[Listener], trigger: Trigger) -> Vec<Behavior> {
    listeners
        .iter()
        .filter(|listener| listener.trigger == trigger)
        .map(|listener| listener.behavior)
        .collect()
}

pub fn event_name(event: &PageEvent) -> &'static str {
    match event {
        PageEvent::ToggleClicked => "toggle_clicked",
        PageEvent::BackdropClicked => "backdrop_clicked",
        PageEvent::KeyPressed { .. } => "key_pressed",
        PageEvent::Resized { .. } => "resized",
        PageEvent::LinkClicked { .. } => "link_clicked",
        PageEvent::FieldInput { .. } => "field_input",
        PageEvent::FieldToggled { .. } => "field_toggled",
        PageEvent::FieldBlurred { .. } => "field_blurred",
        PageEvent::FormSubmitted { .. } => "form_submitted",
        PageEvent::ConnectivityChanged { .. } => "connectivity_changed",
        PageEvent::Modal { .. } => "modal",
    }
}
