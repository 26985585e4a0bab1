//! Page-lifetime singletons shared by every behavior: the clock, the timer
//! queue, the render outbox, the scroll lock, and the notification and modal
//! containers.

use std::time::Duration;

use shared::{
    domain::{ElementId, ModalId, NotificationId, Severity, Timestamp},
    protocol::RenderCommand,
};

use crate::{
    config::ControllerConfig,
    modal::ModalHost,
    notification::NotificationCenter,
    scheduler::{Scheduler, TaskId},
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScheduledTask {
    /// End of the simulated network latency for a form's submission.
    SubmitDeadline { form: ElementId },
    NotificationExpire(NotificationId),
    NotificationRemove(NotificationId),
    ModalRemove(ModalId),
}

#[derive(Debug)]
pub struct AppContext {
    pub config: ControllerConfig,
    pub outbox: Vec<RenderCommand>,
    pub timers: Scheduler<ScheduledTask>,
    now: Timestamp,
    online: bool,
    scroll_locked: bool,
    notifications: NotificationCenter,
    modal: ModalHost,
}

impl AppContext {
    pub fn new(config: ControllerConfig) -> Self {
        let online = config.start_online;
        Self {
            config,
            outbox: Vec::new(),
            timers: Scheduler::new(),
            now: Timestamp::ZERO,
            online,
            scroll_locked: false,
            notifications: NotificationCenter::default(),
            modal: ModalHost::default(),
        }
    }

    pub fn now(&self) -> Timestamp {
        self.now
    }

    /// The clock only moves forward.
    pub(crate) fn set_now(&mut self, now: Timestamp) {
        if now > self.now {
            self.now = now;
        }
    }

    pub fn is_online(&self) -> bool {
        self.online
    }

    pub(crate) fn set_online(&mut self, online: bool) {
        self.online = online;
    }

    pub fn is_scroll_locked(&self) -> bool {
        self.scroll_locked
    }

    /// Owned by the navigation menu.
    pub(crate) fn set_scroll_lock(&mut self, locked: bool) {
        self.scroll_locked = locked;
    }

    pub fn schedule_in(&mut self, delay: Duration, task: ScheduledTask) -> TaskId {
        let at = self.now.after(delay);
        self.timers.schedule(at, task)
    }

    pub fn notify(&mut self, message: impl Into<String>, severity: Severity) -> NotificationId {
        let id = self
            .notifications
            .push(self.now, message.into(), severity, &mut self.outbox);
        let ttl = self.config.notification_ttl();
        self.schedule_in(ttl, ScheduledTask::NotificationExpire(id));
        id
    }

    pub fn notifications(&self) -> &NotificationCenter {
        &self.notifications
    }

    pub fn show_modal(&mut self) -> ModalId {
        let content = self.config.messages.privacy.clone();
        self.modal.open(self.now, content, &mut self.outbox)
    }

    pub fn close_modal(&mut self, id: ModalId) -> bool {
        if !self.modal.begin_close(id, &mut self.outbox) {
            return false;
        }
        let fade = self.config.exit_animation();
        self.schedule_in(fade, ScheduledTask::ModalRemove(id));
        true
    }

    pub fn modal(&self) -> &ModalHost {
        &self.modal
    }

    /// Run a timer that fired.
    pub(crate) fn run_timer(&mut self, task: &ScheduledTask) {
        match task {
            ScheduledTask::NotificationExpire(id) => {
                if self.notifications.begin_exit(*id, &mut self.outbox) {
                    let fade = self.config.exit_animation();
                    self.schedule_in(fade, ScheduledTask::NotificationRemove(*id));
                }
            }
            ScheduledTask::NotificationRemove(id) => {
                self.notifications.remove(*id, &mut self.outbox);
            }
            ScheduledTask::ModalRemove(id) => {
                self.modal.remove(*id, &mut self.outbox);
            }
            ScheduledTask::SubmitDeadline { .. } => {}
        }
    }

    pub fn take_commands(&mut self) -> Vec<RenderCommand> {
        std::mem::take(&mut self.outbox)
    }
}
