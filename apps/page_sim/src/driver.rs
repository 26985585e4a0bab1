//! Replays a scripted event log against the controller.

use std::time::Duration;

use page_core::PageController;
use serde::{Deserialize, Serialize};
use shared::{
    domain::Timestamp,
    protocol::{PageEvent, RenderCommand},
};
use tokio::time::{sleep_until, Instant};
use tracing::{debug, warn};

#[derive(Debug, Clone, Deserialize)]
pub struct ScriptedEvent {
    /// Offset from the start of the run.
    pub at_ms: u64,
    pub event: PageEvent,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pacing {
    /// Jump straight from one deadline to the next.
    Virtual,
    /// Sleep on the tokio clock until each deadline.
    Realtime,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TranscriptLine {
    pub at_ms: u64,
    pub command: RenderCommand,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    pub dispatched: usize,
    pub rejected: usize,
    pub commands: usize,
}

struct Runner<'a, F> {
    controller: &'a mut PageController,
    pacing: Pacing,
    started: Instant,
    emit: F,
    summary: RunSummary,
}

impl<F> Runner<'_, F>
where
    F: FnMut(TranscriptLine) -> anyhow::Result<()>,
{
    async fn wait_until(&self, at: Timestamp) {
        if self.pacing == Pacing::Realtime {
            sleep_until(self.started + Duration::from_millis(at.as_millis())).await;
        }
    }

    /// Fire every timer due at or before `until`, one deadline at a time.
    async fn run_timers(&mut self, until: Option<Timestamp>) -> anyhow::Result<()> {
        while let Some(deadline) = self
            .controller
            .next_deadline()
            .filter(|deadline| until.map_or(true, |until| *deadline <= until))
        {
            self.wait_until(deadline).await;
            self.controller.advance_to(deadline);
            self.flush()?;
        }
        Ok(())
    }

    fn flush(&mut self) -> anyhow::Result<()> {
        let at_ms = self.controller.now().as_millis();
        for command in self.controller.take_commands() {
            self.summary.commands += 1;
            (self.emit)(TranscriptLine { at_ms, command })?;
        }
        Ok(())
    }
}

/// Replay `script` in time order, then drain every pending timer. Events the
/// controller rejects are logged and counted; the run continues.
pub async fn run_script<F>(
    controller: &mut PageController,
    mut script: Vec<ScriptedEvent>,
    pacing: Pacing,
    emit: F,
) -> anyhow::Result<RunSummary>
where
    F: FnMut(TranscriptLine) -> anyhow::Result<()>,
{
    script.sort_by_key(|scripted| scripted.at_ms);

    let mut runner = Runner {
        controller,
        pacing,
        started: Instant::now(),
        emit,
        summary: RunSummary::default(),
    };
    runner.flush()?;

    for scripted in script {
        let at = Timestamp::from_millis(scripted.at_ms);
        runner.run_timers(Some(at)).await?;
        runner.wait_until(at).await;
        runner.controller.advance_to(at);

        debug!(at = %at, "replaying scripted event");
        match runner.controller.dispatch(scripted.event) {
            Ok(()) => runner.summary.dispatched += 1,
            Err(err) => {
                warn!(at = %at, error = %err, "scripted event rejected");
                runner.summary.rejected += 1;
            }
        }
        runner.flush()?;
    }

    runner.run_timers(None).await?;
    Ok(runner.summary)
}
