//! Controller tunables and the user-visible message catalog.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use shared::protocol::ModalContent;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControllerConfig {
    /// Viewport width at or above which the collapsible menu is forced closed.
    pub breakpoint_px: u32,
    pub submit_latency_ms: u64,
    pub notification_ttl_ms: u64,
    /// Shared by notification and modal exit animations.
    pub exit_animation_ms: u64,
    pub confirmation_url: String,
    pub privacy_policy_url: String,
    pub honeypot_name: String,
    /// Used for anchor scrolling when the page does not report its header height.
    pub header_height_px: u32,
    pub start_online: bool,
    pub messages: MessageCatalog,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            breakpoint_px: 768,
            submit_latency_ms: 1500,
            notification_ttl_ms: 5000,
            exit_animation_ms: 300,
            confirmation_url: "thank_you.html".into(),
            privacy_policy_url: "privacy.html".into(),
            honeypot_name: "website".into(),
            header_height_px: 72,
            start_online: true,
            messages: MessageCatalog::default(),
        }
    }
}

impl ControllerConfig {
    pub fn submit_latency(&self) -> Duration {
        Duration::from_millis(self.submit_latency_ms)
    }

    pub fn notification_ttl(&self) -> Duration {
        Duration::from_millis(self.notification_ttl_ms)
    }

    pub fn exit_animation(&self) -> Duration {
        Duration::from_millis(self.exit_animation_ms)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MessageCatalog {
    /// `{label}` is replaced with the resolved field label.
    pub required: String,
    pub invalid_email: String,
    pub invalid_phone: String,
    pub message_too_short: String,
    pub invalid_name: String,
    pub consent_required: String,
    pub fallback_label: String,
    pub submit_busy: String,
    pub submit_offline: String,
    pub connection_restored: String,
    pub connection_lost: String,
    pub privacy: ModalContent,
}

impl Default for MessageCatalog {
    fn default() -> Self {
        Self {
            required: "Поле \"{label}\" обязательно для заполнения".into(),
            invalid_email: "Введите корректный email адрес (например: example@domain.com)".into(),
            invalid_phone:
                "Введите корректный номер телефона (10-20 символов, только цифры, +, -, (, ))"
                    .into(),
            message_too_short: "Сообщение должно содержать не менее 10 символов".into(),
            invalid_name:
                "Введите корректное имя (2-50 символов, только буквы, пробелы, дефис и апостроф)"
                    .into(),
            consent_required: "Необходимо согласие с условиями".into(),
            fallback_label: "Поле".into(),
            submit_busy: "Отправка...".into(),
            submit_offline:
                "Ошибка соединения. Проверьте подключение к интернету и попробуйте позже.".into(),
            connection_restored: "Соединение восстановлено".into(),
            connection_lost: "Отсутствует подключение к интернету".into(),
            privacy: ModalContent {
                title: "Политика конфиденциальности".into(),
                paragraphs: vec![
                    "Нажимая на кнопку отправки формы, вы соглашаетесь с нашей политикой конфиденциальности.".into(),
                    "Мы обязуемся защищать вашу конфиденциальность и обрабатывать ваши персональные данные в соответствии с законодательством.".into(),
                ],
                learn_more_label: "Подробнее".into(),
                learn_more_href: "privacy.html".into(),
                accept_label: "Принять".into(),
            },
        }
    }
}

impl MessageCatalog {
    pub fn required_field(&self, label: &str) -> String {
        self.required.replace("{label}", label)
    }
}
