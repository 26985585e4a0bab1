//! Per-form submission pipeline.
//!
//! ```text
//! Idle --submit(valid)--> Submitting --deadline, online--> Redirecting
//!                            |
//!                            +--deadline, offline--> Failed --submit--> Idle ...
//! ```
//!
//! Submission is always asynchronous and always ends either in navigation or
//! with the submit control restored and enabled.

use shared::{
    domain::{ElementId, Severity},
    protocol::RenderCommand,
};
use tracing::{debug, info, warn};

use crate::{
    context::{AppContext, ScheduledTask},
    page::{FormDocument, FormPayload, SubmitControl},
    scheduler::TaskId,
};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SubmissionState {
    #[default]
    Idle,
    Submitting,
    Failed,
    Redirecting,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    Redirected { destination: String },
    Offline,
}

#[derive(Debug)]
struct InFlight {
    control: SubmitControl,
    deadline: TaskId,
}

#[derive(Debug, Default)]
pub struct SubmissionPipeline {
    state: SubmissionState,
    in_flight: Option<InFlight>,
    last_payload: Option<FormPayload>,
}

impl SubmissionPipeline {
    pub fn state(&self) -> SubmissionState {
        self.state
    }

    /// While a submission is in flight or the page is leaving, the submit
    /// control is disabled and further submits cannot start.
    pub fn is_locked(&self) -> bool {
        matches!(
            self.state,
            SubmissionState::Submitting | SubmissionState::Redirecting
        )
    }

    pub fn last_payload(&self) -> Option<&FormPayload> {
        self.last_payload.as_ref()
    }

    /// Disable the submit control, snapshot the payload and arm the latency
    /// timer. Returns `false` when the form has no submit control.
    pub fn begin(&mut self, form: &FormDocument, ctx: &mut AppContext) -> bool {
        if self.state == SubmissionState::Failed {
            self.state = SubmissionState::Idle;
        }
        if self.is_locked() {
            debug!(form = %form.id, state = ?self.state, "submission already in flight");
            return false;
        }
        let Some(control) = form.submit.clone() else {
            warn!(form = %form.id, "form has no submit control; nothing to submit");
            return false;
        };

        ctx.outbox.push(RenderCommand::SetSubmitBusy {
            form: form.id.clone(),
            control: control.id.clone(),
            label: ctx.config.messages.submit_busy.clone(),
        });

        let payload = form.payload();
        let encoded = serde_json::to_string(&payload).unwrap_or_default();
        debug!(form = %form.id, payload = %encoded, "form payload assembled");
        self.last_payload = Some(payload);

        let latency = ctx.config.submit_latency();
        let deadline = ctx.schedule_in(
            latency,
            ScheduledTask::SubmitDeadline {
                form: form.id.clone(),
            },
        );
        self.in_flight = Some(InFlight { control, deadline });
        self.state = SubmissionState::Submitting;
        info!(
            form = %form.id,
            latency_ms = ctx.config.submit_latency_ms,
            "submission started"
        );
        true
    }

    /// The latency timer fired: navigate if online, otherwise restore the
    /// control and report the failure.
    pub fn complete(&mut self, form: &ElementId, ctx: &mut AppContext) -> Option<SubmitOutcome> {
        let in_flight = self.in_flight.take()?;
        debug!(form = %form, task = ?in_flight.deadline, "submission deadline reached");

        if !ctx.is_online() {
            self.state = SubmissionState::Failed;
            ctx.outbox.push(RenderCommand::RestoreSubmit {
                form: form.clone(),
                control: in_flight.control.id,
                label: in_flight.control.label,
            });
            let message = ctx.config.messages.submit_offline.clone();
            ctx.notify(message, Severity::Error);
            warn!(form = %form, "submission failed: offline");
            return Some(SubmitOutcome::Offline);
        }

        self.state = SubmissionState::Redirecting;
        let destination = ctx.config.confirmation_url.clone();
        ctx.outbox.push(RenderCommand::Navigate {
            destination: destination.clone(),
        });
        info!(form = %form, %destination, "submission accepted; navigating");
        Some(SubmitOutcome::Redirected { destination })
    }
}
