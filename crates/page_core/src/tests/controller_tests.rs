use std::time::Duration;

use serde_json::json;
use shared::{
    domain::{ElementId, ModalId, Severity},
    error::ErrorCode,
    protocol::{ModalAction, PageEvent, RenderCommand},
};

use super::*;

fn page() -> PageStructure {
    serde_json::from_value(json!({
        "nav": {
            "toggle": "nav-toggle",
            "nav": "main-nav",
            "menu": "nav-list",
            "links": ["link-services", "link-contact"]
        },
        "sections": ["services", "contact-section"],
        "forms": [{
            "id": "contact",
            "controls": [
                { "id": "name", "name": "name", "required": true, "label": "Имя *",
                  "classes": ["c-form__input"] },
                { "id": "email", "name": "email", "input_type": "email", "required": true,
                  "label": "Email *" },
                { "id": "phone", "name": "phone", "input_type": "tel", "placeholder": "Телефон" },
                { "id": "message", "name": "message", "tag": "textarea", "required": true,
                  "label": "Сообщение *" },
                { "id": "consent", "name": "consent", "input_type": "checkbox", "required": true }
            ],
            "submit": { "id": "send", "label": "Отправить" }
        }]
    }))
    .expect("page structure")
}

fn controller_with(config: ControllerConfig) -> PageController {
    let mut controller = PageController::new(page(), config);
    assert!(controller.init().is_empty());
    controller.take_commands();
    controller
}

fn controller() -> PageController {
    controller_with(ControllerConfig::default())
}

fn contact() -> ElementId {
    ElementId::from("contact")
}

fn input(field: &str, value: &str) -> PageEvent {
    PageEvent::FieldInput {
        form: contact(),
        field: field.into(),
        value: value.into(),
    }
}

fn fill_valid(controller: &mut PageController) {
    for (field, value) in [
        ("name", "Анна-Мария"),
        ("email", "anna@example.com"),
        ("phone", "+7 (999) 123-45"),
        ("message", "Хочу узнать стоимость"),
    ] {
        controller.dispatch(input(field, value)).expect("input");
    }
    controller
        .dispatch(PageEvent::FieldToggled {
            form: contact(),
            field: "consent".into(),
            checked: true,
        })
        .expect("toggle");
}

fn submit(controller: &mut PageController) {
    controller
        .dispatch(PageEvent::FormSubmitted { form: contact() })
        .expect("submit");
}

fn count(commands: &[RenderCommand], pred: impl Fn(&RenderCommand) -> bool) -> usize {
    commands.iter().filter(|cmd| pred(cmd)).count()
}

fn is_navigate(cmd: &RenderCommand) -> bool {
    matches!(cmd, RenderCommand::Navigate { .. })
}

#[test]
fn init_attaches_every_behavior_in_order() {
    let controller = controller();
    assert_eq!(
        controller.registered().collect::<Vec<_>>(),
        vec![
            "smoothScroll",
            "burgerMenu",
            "formValidation",
            "privacyModal",
            "networkCheck",
            "honeypot"
        ]
    );
    assert_eq!(
        controller.handle(Behavior::Honeypot),
        Some(&BehaviorHandle::Honeypots(vec!["contact__website".into()]))
    );
}

#[test]
fn init_injects_one_honeypot_per_form() {
    let mut controller = PageController::new(page(), ControllerConfig::default());
    assert!(controller.init().is_empty());
    let injected: Vec<_> = controller
        .take_commands()
        .into_iter()
        .filter(|cmd| matches!(cmd, RenderCommand::InjectHoneypot { .. }))
        .collect();
    assert_eq!(
        injected,
        vec![RenderCommand::InjectHoneypot {
            form: contact(),
            field: "contact__website".into(),
            name: "website".into(),
        }]
    );
}

#[test]
fn second_init_does_not_duplicate_bindings() {
    let mut controller = controller();
    let bound = controller.listeners().len();

    assert!(controller.init().is_empty());
    assert_eq!(controller.listeners().len(), bound);
    assert!(controller.take_commands().is_empty());

    controller.dispatch(PageEvent::ToggleClicked).expect("toggle");
    assert_eq!(controller.menu_state(), Some(MenuState::Open));
    let commands = controller.take_commands();
    assert_eq!(
        count(&commands, |cmd| matches!(
            cmd,
            RenderCommand::SetMenuExpanded { expanded: true, .. }
        )),
        1
    );
}

#[test]
fn toggle_then_escape_round_trips_the_menu() {
    let mut controller = controller();

    controller.dispatch(PageEvent::ToggleClicked).expect("toggle");
    let commands = controller.take_commands();
    assert!(commands.contains(&RenderCommand::SetOverlayVisible {
        overlay: "burger-overlay".into(),
        visible: true,
    }));
    assert_eq!(
        commands.last(),
        Some(&RenderCommand::Focus {
            element: "link-services".into()
        })
    );
    assert!(controller.context().is_scroll_locked());

    controller
        .dispatch(PageEvent::KeyPressed { key: "Enter".into() })
        .expect("key");
    assert_eq!(controller.menu_state(), Some(MenuState::Open));

    controller
        .dispatch(PageEvent::KeyPressed {
            key: "Escape".into(),
        })
        .expect("escape");
    assert_eq!(controller.menu_state(), Some(MenuState::Closed));
    assert!(!controller.context().is_scroll_locked());
    assert!(controller
        .take_commands()
        .contains(&RenderCommand::SetOverlayVisible {
            overlay: "burger-overlay".into(),
            visible: false,
        }));
}

#[test]
fn widening_past_breakpoint_closes_menu() {
    let mut controller = controller();
    controller.dispatch(PageEvent::ToggleClicked).expect("toggle");
    controller
        .dispatch(PageEvent::Resized { width: 500 })
        .expect("resize");
    assert_eq!(controller.menu_state(), Some(MenuState::Open));

    controller
        .dispatch(PageEvent::Resized { width: 1024 })
        .expect("resize");
    assert_eq!(controller.menu_state(), Some(MenuState::Closed));
}

#[test]
fn backdrop_and_menu_links_close_menu() {
    let mut controller = controller();
    controller.dispatch(PageEvent::ToggleClicked).expect("toggle");
    controller.dispatch(PageEvent::BackdropClicked).expect("backdrop");
    assert_eq!(controller.menu_state(), Some(MenuState::Closed));

    controller.dispatch(PageEvent::ToggleClicked).expect("toggle");
    controller
        .dispatch(PageEvent::LinkClicked {
            href: "about.html".into(),
            in_menu: true,
        })
        .expect("link");
    assert_eq!(controller.menu_state(), Some(MenuState::Closed));
}

#[test]
fn missing_toggle_skips_menu_only() {
    let mut structure = page();
    structure.nav.as_mut().expect("nav").toggle = None;
    let mut controller = PageController::new(structure, ControllerConfig::default());

    assert!(controller.init().is_empty());
    assert!(controller.menu_state().is_none());
    assert!(!controller.registered().any(|name| name == "burgerMenu"));
    assert_eq!(controller.registered().count(), 5);
    controller.dispatch(PageEvent::ToggleClicked).expect("toggle");
}

#[test]
fn anchor_links_scroll_with_header_offset_and_close_menu() {
    let mut controller = controller();
    controller.dispatch(PageEvent::ToggleClicked).expect("toggle");
    controller.take_commands();

    controller
        .dispatch(PageEvent::LinkClicked {
            href: "#services".into(),
            in_menu: true,
        })
        .expect("anchor");
    let commands = controller.take_commands();
    assert!(commands.contains(&RenderCommand::ScrollToAnchor {
        target: "services".into(),
        offset_px: 72,
    }));
    assert_eq!(controller.menu_state(), Some(MenuState::Closed));

    for href in ["#", "#!", "#missing"] {
        controller
            .dispatch(PageEvent::LinkClicked {
                href: href.into(),
                in_menu: false,
            })
            .expect("anchor");
    }
    assert!(controller.take_commands().is_empty());
}

#[test]
fn blur_validates_and_input_rechecks_only_invalid_fields() {
    let mut controller = controller();

    controller.dispatch(input("name", "Анна")).expect("input");
    assert!(controller.take_commands().is_empty());

    controller.dispatch(input("email", "a@b")).expect("input");
    controller
        .dispatch(PageEvent::FieldBlurred {
            form: contact(),
            field: "email".into(),
        })
        .expect("blur");
    let commands = controller.take_commands();
    assert!(commands.contains(&RenderCommand::ShowFieldError {
        field: "email".into(),
        slot: "email__error".into(),
        message: ControllerConfig::default().messages.invalid_email,
    }));

    controller.dispatch(input("email", "a@b.com")).expect("input");
    assert_eq!(
        controller.take_commands(),
        vec![RenderCommand::ClearFieldError {
            field: "email".into(),
            slot: Some("email__error".into()),
        }]
    );
}

#[test]
fn invalid_submit_focuses_first_failure_and_never_starts() {
    let mut controller = controller();
    submit(&mut controller);

    let commands = controller.take_commands();
    assert_eq!(
        count(&commands, |cmd| matches!(
            cmd,
            RenderCommand::ShowFieldError { .. }
        )),
        4
    );
    assert!(commands.contains(&RenderCommand::CreateErrorSlot {
        field: "name".into(),
        slot: "name__error".into(),
        class: "c-form__error".into(),
    }));
    assert!(commands.ends_with(&[
        RenderCommand::ScrollIntoView {
            element: "name".into()
        },
        RenderCommand::Focus {
            element: "name".into()
        },
    ]));
    assert_eq!(
        count(&commands, |cmd| matches!(
            cmd,
            RenderCommand::SetSubmitBusy { .. }
        )),
        0
    );
    assert_eq!(controller.submission_state(&contact()), Some(SubmissionState::Idle));
    assert!(controller.next_deadline().is_none());
}

#[test]
fn filled_honeypot_drops_submission_silently() {
    let mut controller = controller();
    fill_valid(&mut controller);
    controller
        .dispatch(input("contact__website", "http://spam.example"))
        .expect("honeypot input");
    submit(&mut controller);
    controller.advance_by(Duration::from_secs(10));

    let commands = controller.take_commands();
    assert!(commands.is_empty());
    assert!(controller.context().notifications().active().is_empty());
    assert_eq!(controller.submission_state(&contact()), Some(SubmissionState::Idle));
}

#[test]
fn offline_submit_restores_control_with_one_error() {
    let mut controller = controller_with(ControllerConfig {
        start_online: false,
        ..ControllerConfig::default()
    });
    fill_valid(&mut controller);
    submit(&mut controller);
    assert_eq!(
        controller.take_commands().last(),
        Some(&RenderCommand::SetSubmitBusy {
            form: contact(),
            control: "send".into(),
            label: "Отправка...".into(),
        })
    );

    controller.advance_by(Duration::from_millis(1500));
    let commands = controller.take_commands();
    assert!(commands.contains(&RenderCommand::RestoreSubmit {
        form: contact(),
        control: "send".into(),
        label: "Отправить".into(),
    }));
    assert_eq!(
        count(&commands, |cmd| matches!(
            cmd,
            RenderCommand::ShowNotification {
                severity: Severity::Error,
                ..
            }
        )),
        1
    );
    assert_eq!(count(&commands, is_navigate), 0);
    assert_eq!(
        controller.submission_state(&contact()),
        Some(SubmissionState::Failed)
    );

    controller
        .dispatch(PageEvent::ConnectivityChanged { online: true })
        .expect("online");
    submit(&mut controller);
    controller.advance_by(Duration::from_millis(1500));
    assert_eq!(count(&controller.take_commands(), is_navigate), 1);
}

#[test]
fn online_submit_navigates_exactly_once() {
    let mut controller = controller();
    fill_valid(&mut controller);
    submit(&mut controller);
    submit(&mut controller);
    assert_eq!(
        controller.submission_state(&contact()),
        Some(SubmissionState::Submitting)
    );
    assert_eq!(
        controller
            .form(&contact())
            .and_then(|form| form.pipeline.last_payload())
            .map(|payload| payload.len()),
        Some(5)
    );

    controller.advance_by(Duration::from_millis(1499));
    assert_eq!(count(&controller.take_commands(), is_navigate), 0);

    controller.advance_by(Duration::from_millis(1));
    assert_eq!(
        controller.take_commands(),
        vec![RenderCommand::Navigate {
            destination: "thank_you.html".into()
        }]
    );

    submit(&mut controller);
    controller.advance_by(Duration::from_secs(5));
    assert_eq!(count(&controller.take_commands(), is_navigate), 0);
    assert_eq!(
        controller.submission_state(&contact()),
        Some(SubmissionState::Redirecting)
    );
}

#[test]
fn connectivity_changes_raise_notifications() {
    let mut controller = controller();
    controller
        .dispatch(PageEvent::ConnectivityChanged { online: false })
        .expect("offline");
    assert!(!controller.context().is_online());
    controller
        .dispatch(PageEvent::ConnectivityChanged { online: true })
        .expect("online");

    let severities: Vec<_> = controller
        .context()
        .notifications()
        .active()
        .iter()
        .map(|n| n.severity)
        .collect();
    assert_eq!(severities, vec![Severity::Error, Severity::Success]);

    controller.advance_by(Duration::from_millis(5300));
    assert!(controller.context().notifications().active().is_empty());
}

#[test]
fn privacy_modal_lifecycle() {
    let mut controller = controller();
    controller
        .dispatch(PageEvent::LinkClicked {
            href: "privacy.html".into(),
            in_menu: false,
        })
        .expect("link");
    assert!(controller.context().modal().live().is_none());

    controller
        .dispatch(PageEvent::LinkClicked {
            href: "#privacy".into(),
            in_menu: false,
        })
        .expect("link");
    let id = controller.context().modal().live().map(|m| m.id).expect("modal");
    assert_eq!(id, ModalId(1));

    let modal = |action| PageEvent::Modal { modal: id, action };
    controller.dispatch(modal(ModalAction::Content)).expect("content");
    assert!(controller.context().modal().live().is_some());

    controller.take_commands();
    controller.dispatch(modal(ModalAction::LearnMore)).expect("learn more");
    assert_eq!(
        controller.take_commands(),
        vec![RenderCommand::Navigate {
            destination: "privacy.html".into()
        }]
    );
    assert!(controller.context().modal().live().is_some());

    controller.dispatch(modal(ModalAction::Accept)).expect("accept");
    assert!(controller.context().modal().live().is_none());
    controller.advance_by(Duration::from_millis(300));
    assert_eq!(
        controller.take_commands(),
        vec![
            RenderCommand::BeginModalExit { id },
            RenderCommand::RemoveModal { id }
        ]
    );
}

#[test]
fn learn_more_needs_the_live_modal() {
    let mut controller = controller();
    controller
        .dispatch(PageEvent::Modal {
            modal: ModalId(42),
            action: ModalAction::LearnMore,
        })
        .expect("learn more");
    assert!(controller.take_commands().is_empty());

    controller
        .dispatch(PageEvent::LinkClicked {
            href: "#privacy".into(),
            in_menu: false,
        })
        .expect("link");
    let id = controller.context().modal().live().map(|m| m.id).expect("modal");
    controller
        .dispatch(PageEvent::Modal {
            modal: id,
            action: ModalAction::Close,
        })
        .expect("close");
    controller.take_commands();

    controller
        .dispatch(PageEvent::Modal {
            modal: id,
            action: ModalAction::LearnMore,
        })
        .expect("learn more");
    assert_eq!(count(&controller.take_commands(), is_navigate), 0);
}

#[test]
fn duplicate_forms_fail_only_form_behaviors() {
    let mut structure = page();
    let copy = structure.forms[0].clone();
    structure.forms.push(copy);
    let mut controller = PageController::new(structure, ControllerConfig::default());

    let failures = controller.init();
    assert_eq!(failures.len(), 1);
    assert_eq!(failures[0].code, ErrorCode::MissingStructure);
    assert_eq!(
        controller.registered().collect::<Vec<_>>(),
        vec!["smoothScroll", "burgerMenu", "privacyModal", "networkCheck"]
    );
    controller.dispatch(PageEvent::ToggleClicked).expect("toggle");
    assert_eq!(controller.menu_state(), Some(MenuState::Open));
}

#[test]
fn unknown_elements_are_reported() {
    let mut controller = controller();
    let err = controller
        .dispatch(PageEvent::FormSubmitted {
            form: "newsletter".into(),
        })
        .expect_err("unknown form");
    assert_eq!(err.code, ErrorCode::UnknownElement);

    let err = controller
        .dispatch(input("surname", "Иванова"))
        .expect_err("unknown field");
    assert_eq!(err.code, ErrorCode::UnknownElement);
}
