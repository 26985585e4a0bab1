use serde::{Deserialize, Serialize};

use crate::domain::{ElementId, ModalId, NotificationId, Severity};

/// Trigger surface: everything the page can tell the controller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "snake_case")]
pub enum PageEvent {
    ToggleClicked,
    BackdropClicked,
    KeyPressed {
        key: String,
    },
    Resized {
        width: u32,
    },
    LinkClicked {
        href: String,
        #[serde(default)]
        in_menu: bool,
    },
    FieldInput {
        form: ElementId,
        field: ElementId,
        value: String,
    },
    FieldToggled {
        form: ElementId,
        field: ElementId,
        checked: bool,
    },
    FieldBlurred {
        form: ElementId,
        field: ElementId,
    },
    FormSubmitted {
        form: ElementId,
    },
    ConnectivityChanged {
        online: bool,
    },
    Modal {
        modal: ModalId,
        action: ModalAction,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModalAction {
    Close,
    Accept,
    Backdrop,
    Content,
    LearnMore,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModalContent {
    pub title: String,
    pub paragraphs: Vec<String>,
    pub learn_more_label: String,
    pub learn_more_href: String,
    pub accept_label: String,
}

/// Rendering surface: every mutation the controller asks the page to make.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "snake_case")]
pub enum RenderCommand {
    MountOverlay {
        overlay: ElementId,
    },
    SetMenuExpanded {
        nav: ElementId,
        toggle: ElementId,
        expanded: bool,
    },
    SetScrollLock {
        locked: bool,
    },
    SetOverlayVisible {
        overlay: ElementId,
        visible: bool,
    },
    SlideMenuPanel {
        menu: ElementId,
        open: bool,
    },
    Focus {
        element: ElementId,
    },
    ScrollIntoView {
        element: ElementId,
    },
    ScrollToAnchor {
        target: ElementId,
        offset_px: u32,
    },
    InjectHoneypot {
        form: ElementId,
        field: ElementId,
        name: String,
    },
    CreateErrorSlot {
        field: ElementId,
        slot: ElementId,
        class: String,
    },
    ShowFieldError {
        field: ElementId,
        slot: ElementId,
        message: String,
    },
    ClearFieldError {
        field: ElementId,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        slot: Option<ElementId>,
    },
    SetSubmitBusy {
        form: ElementId,
        control: ElementId,
        label: String,
    },
    RestoreSubmit {
        form: ElementId,
        control: ElementId,
        label: String,
    },
    Navigate {
        destination: String,
    },
    MountNotificationContainer,
    ShowNotification {
        id: NotificationId,
        severity: Severity,
        message: String,
        accent: String,
        glyph: String,
    },
    BeginNotificationExit {
        id: NotificationId,
    },
    RemoveNotification {
        id: NotificationId,
    },
    MountModal {
        id: ModalId,
        content: ModalContent,
    },
    BeginModalExit {
        id: ModalId,
    },
    RemoveModal {
        id: ModalId,
    },
}
