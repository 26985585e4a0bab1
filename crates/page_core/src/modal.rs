//! Single-instance overlay dialog.

use shared::{
    domain::{ModalId, Timestamp},
    protocol::{ModalAction, ModalContent, RenderCommand},
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModalInstance {
    pub id: ModalId,
    pub opened_at: Timestamp,
}

/// What an activation inside the modal amounts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModalOutcome {
    Close,
    FollowLink,
    Ignore,
}

impl ModalOutcome {
    /// Only a direct backdrop hit closes; clicks inside the panel never do.
    pub fn of(action: ModalAction) -> Self {
        match action {
            ModalAction::Close | ModalAction::Accept | ModalAction::Backdrop => Self::Close,
            ModalAction::LearnMore => Self::FollowLink,
            ModalAction::Content => Self::Ignore,
        }
    }
}

#[derive(Debug, Default)]
pub struct ModalHost {
    live: Option<ModalInstance>,
    leaving: Vec<ModalId>,
    next_id: u64,
}

impl ModalHost {
    /// Always builds a fresh instance. A live one is dropped without
    /// animation so there is never more than one.
    pub fn open(
        &mut self,
        now: Timestamp,
        content: ModalContent,
        out: &mut Vec<RenderCommand>,
    ) -> ModalId {
        if let Some(previous) = self.live.take() {
            out.push(RenderCommand::RemoveModal { id: previous.id });
        }
        self.next_id += 1;
        let id = ModalId(self.next_id);
        out.push(RenderCommand::MountModal { id, content });
        self.live = Some(ModalInstance { id, opened_at: now });
        id
    }

    /// Start the reverse fade. Returns `false` if `id` is not the live modal.
    pub fn begin_close(&mut self, id: ModalId, out: &mut Vec<RenderCommand>) -> bool {
        if self.live.as_ref().map(|m| m.id) != Some(id) {
            return false;
        }
        self.live = None;
        self.leaving.push(id);
        out.push(RenderCommand::BeginModalExit { id });
        true
    }

    pub fn remove(&mut self, id: ModalId, out: &mut Vec<RenderCommand>) -> bool {
        let before = self.leaving.len();
        self.leaving.retain(|leaving| *leaving != id);
        if self.leaving.len() == before {
            return false;
        }
        out.push(RenderCommand::RemoveModal { id });
        true
    }

    pub fn live(&self) -> Option<&ModalInstance> {
        self.live.as_ref()
    }

    pub fn is_leaving(&self, id: ModalId) -> bool {
        self.leaving.contains(&id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MessageCatalog;

    fn content() -> ModalContent {
        MessageCatalog::default().privacy
    }

    #[test]
    fn reopening_replaces_the_live_instance() {
        let mut host = ModalHost::default();
        let mut out = Vec::new();
        let first = host.open(Timestamp(0), content(), &mut out);
        let second = host.open(Timestamp(5), content(), &mut out);

        assert_ne!(first, second);
        assert_eq!(host.live().map(|m| m.id), Some(second));
        assert!(out.contains(&RenderCommand::RemoveModal { id: first }));
    }

    #[test]
    fn close_then_remove() {
        let mut host = ModalHost::default();
        let mut out = Vec::new();
        let id = host.open(Timestamp(0), content(), &mut out);

        assert!(host.begin_close(id, &mut out));
        assert!(!host.begin_close(id, &mut out));
        assert!(host.live().is_none());
        assert!(host.is_leaving(id));

        assert!(host.remove(id, &mut out));
        assert!(!host.remove(id, &mut out));
        assert_eq!(out.last(), Some(&RenderCommand::RemoveModal { id }));
    }

    #[test]
    fn panel_clicks_never_close() {
        assert_eq!(ModalOutcome::of(ModalAction::Content), ModalOutcome::Ignore);
        assert_eq!(
            ModalOutcome::of(ModalAction::LearnMore),
            ModalOutcome::FollowLink
        );
        assert_eq!(ModalOutcome::of(ModalAction::Backdrop), ModalOutcome::Close);
    }
}
