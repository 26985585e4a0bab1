//! Stacked, self-expiring toast notifications.
//!
//! Every notification owns two timers: one that starts its exit animation
//! after the display lifetime, and one that removes it once the animation is
//! over. Timers are independent, so notifications never wait on each other.

use shared::{
    domain::{NotificationId, Severity, Timestamp},
    protocol::RenderCommand,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationPhase {
    Visible,
    Leaving,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub id: NotificationId,
    pub message: String,
    pub severity: Severity,
    pub created_at: Timestamp,
    pub phase: NotificationPhase,
}

#[derive(Debug, Default)]
pub struct NotificationCenter {
    container_mounted: bool,
    next_id: u64,
    queue: Vec<Notification>,
}

impl NotificationCenter {
    /// Append a notification at the tail, mounting the container on first use.
    pub fn push(
        &mut self,
        now: Timestamp,
        message: String,
        severity: Severity,
        out: &mut Vec<RenderCommand>,
    ) -> NotificationId {
        if !self.container_mounted {
            out.push(RenderCommand::MountNotificationContainer);
            self.container_mounted = true;
        }

        self.next_id += 1;
        let id = NotificationId(self.next_id);
        out.push(RenderCommand::ShowNotification {
            id,
            severity,
            message: message.clone(),
            accent: severity.accent().to_string(),
            glyph: severity.glyph().to_string(),
        });
        self.queue.push(Notification {
            id,
            message,
            severity,
            created_at: now,
            phase: NotificationPhase::Visible,
        });
        id
    }

    /// Start the exit animation. Returns `false` for unknown or already
    /// leaving notifications.
    pub fn begin_exit(&mut self, id: NotificationId, out: &mut Vec<RenderCommand>) -> bool {
        let Some(entry) = self.queue.iter_mut().find(|n| n.id == id) else {
            return false;
        };
        if entry.phase == NotificationPhase::Leaving {
            return false;
        }
        entry.phase = NotificationPhase::Leaving;
        out.push(RenderCommand::BeginNotificationExit { id });
        true
    }

    pub fn remove(
        &mut self,
        id: NotificationId,
        out: &mut Vec<RenderCommand>,
    ) -> Option<Notification> {
        let index = self.queue.iter().position(|n| n.id == id)?;
        out.push(RenderCommand::RemoveNotification { id });
        Some(self.queue.remove(index))
    }

    /// Display order, oldest first.
    pub fn active(&self) -> &[Notification] {
        &self.queue
    }
}
