use std::time::Duration;

use page_core::{ControllerConfig, MenuState, PageController, PageStructure, SubmissionState};
use shared::{
    domain::{ElementId, Timestamp},
    protocol::{PageEvent, RenderCommand},
};

const PAGE: &str = r#"{
    "nav": { "toggle": "burger", "nav": "site-nav", "links": ["nav-home"] },
    "header_height_px": 64,
    "sections": ["pricing"],
    "forms": [{
        "id": "callback",
        "controls": [
            { "id": "cb-name", "name": "name", "required": true, "label": "Ваше имя*" },
            { "id": "cb-phone", "name": "phone", "input_type": "tel", "required": true }
        ],
        "submit": { "id": "cb-send", "label": "Перезвоните мне" }
    }]
}"#;

fn controller() -> PageController {
    let structure: PageStructure = serde_json::from_str(PAGE).expect("page json");
    PageController::new(structure, ControllerConfig::default())
}

fn field(form: &str, field: &str, value: &str) -> PageEvent {
    PageEvent::FieldInput {
        form: form.into(),
        field: field.into(),
        value: value.into(),
    }
}

#[test]
fn repeated_init_keeps_single_bindings() {
    let mut controller = controller();
    for _ in 0..3 {
        assert!(controller.init().is_empty());
    }
    assert_eq!(controller.registered().count(), 6);

    controller.dispatch(PageEvent::ToggleClicked).expect("toggle");
    assert_eq!(controller.menu_state(), Some(MenuState::Open));
    controller.dispatch(PageEvent::ToggleClicked).expect("toggle");
    assert_eq!(controller.menu_state(), Some(MenuState::Closed));
}

#[test]
fn page_header_height_drives_anchor_offset() {
    let mut controller = controller();
    controller.init();
    controller.take_commands();

    controller
        .dispatch(PageEvent::LinkClicked {
            href: "#pricing".into(),
            in_menu: false,
        })
        .expect("anchor");
    assert_eq!(
        controller.take_commands(),
        vec![RenderCommand::ScrollToAnchor {
            target: "pricing".into(),
            offset_px: 64,
        }]
    );
}

#[test]
fn scripted_session_ends_in_navigation() {
    let mut controller = controller();
    controller.init();
    let form = ElementId::from("callback");

    controller
        .dispatch_at(Timestamp(100), field("callback", "cb-name", "Ольга"))
        .expect("name");
    controller
        .dispatch_at(Timestamp(200), field("callback", "cb-phone", "8 800 555-35-35"))
        .expect("phone");
    controller
        .dispatch_at(Timestamp(300), PageEvent::FormSubmitted { form: form.clone() })
        .expect("submit");
    assert_eq!(controller.next_deadline(), Some(Timestamp(1800)));

    controller.advance_by(Duration::from_secs(2));
    assert_eq!(controller.now(), Timestamp(2300));
    assert_eq!(
        controller.submission_state(&form),
        Some(SubmissionState::Redirecting)
    );
    let navigations = controller
        .take_commands()
        .into_iter()
        .filter(|cmd| matches!(cmd, RenderCommand::Navigate { .. }))
        .count();
    assert_eq!(navigations, 1);
}
