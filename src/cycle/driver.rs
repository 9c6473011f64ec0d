//! Session driver
//!
//! Runs one [`CycleController`] on a tokio task. The task is the only owner
//! of the controller: timer firings and commands from [`SessionHandle`] are
//! serialised by a single `select!` loop, so state is never mutated
//! concurrently.

use anyhow::{Context, Result};
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio::time::{self, Instant};
use tracing::{debug, warn};

use crate::cycle::controller::{
    CycleController, CycleSnapshot, Firing, Presenter, Scheduled, TimerToken, Transition,
};
use crate::error::CycleError;
use crate::log::jsonl::{TransitionLog, TransitionRecord};

const COMMAND_BUFFER: usize = 16;

enum SessionCommand {
    Select {
        index: usize,
        reply: oneshot::Sender<Result<Transition, CycleError>>,
    },
    Snapshot {
        reply: oneshot::Sender<CycleSnapshot>,
    },
    Stop,
}

/// Handle to a running session
///
/// Dropping the handle tears the session down.
#[derive(Debug)]
pub struct SessionHandle {
    commands: mpsc::Sender<SessionCommand>,
    task: JoinHandle<CycleSnapshot>,
}

impl std::fmt::Debug for SessionCommand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Select { index, .. } => write!(f, "Select({index})"),
            Self::Snapshot { .. } => write!(f, "Snapshot"),
            Self::Stop => write!(f, "Stop"),
        }
    }
}

/// Start driving `controller` on a new task.
///
/// Every transition is appended to `history` when one is given.
pub fn spawn_session<P>(
    controller: CycleController<P>,
    history: Option<TransitionLog>,
) -> SessionHandle
where
    P: Presenter + Send + 'static,
{
    let (commands, receiver) = mpsc::channel(COMMAND_BUFFER);
    let task = tokio::spawn(run(controller, history, receiver));
    SessionHandle { commands, task }
}

impl SessionHandle {
    /// Manually select `index`, stopping auto-advance.
    pub async fn select(&self, index: usize) -> Result<Transition, CycleError> {
        let (reply, response) = oneshot::channel();
        self.commands
            .send(SessionCommand::Select { index, reply })
            .await
            .map_err(|_| CycleError::SessionClosed)?;
        response.await.map_err(|_| CycleError::SessionClosed)?
    }

    /// Current state of the session.
    pub async fn snapshot(&self) -> Result<CycleSnapshot, CycleError> {
        let (reply, response) = oneshot::channel();
        self.commands
            .send(SessionCommand::Snapshot { reply })
            .await
            .map_err(|_| CycleError::SessionClosed)?;
        response.await.map_err(|_| CycleError::SessionClosed)
    }

    /// Tear the session down and wait for the task to finish.
    ///
    /// Returns the final state.
    pub async fn stop(self) -> Result<CycleSnapshot> {
        // the task may already be gone; joining below still reports its result
        let _ = self.commands.send(SessionCommand::Stop).await;
        self.task.await.context("Session task panicked")
    }
}

async fn run<P: Presenter>(
    mut controller: CycleController<P>,
    history: Option<TransitionLog>,
    mut commands: mpsc::Receiver<SessionCommand>,
) -> CycleSnapshot {
    let mut deadline = controller.pending().map(arm);

    loop {
        let wake_at = deadline.map(|(_, at)| at);
        let timer = async move {
            match wake_at {
                Some(at) => time::sleep_until(at).await,
                None => std::future::pending().await,
            }
        };

        tokio::select! {
            () = timer => {
                let Some((token, _)) = deadline.take() else { continue };
                match controller.fire(token) {
                    Firing::Advanced { transition, next } => {
                        record(history.as_ref(), &transition);
                        deadline = next.map(arm);
                    }
                    Firing::Stopped(reason) => debug!(?reason, "auto-advance finished"),
                    Firing::Stale => {}
                }
            }
            command = commands.recv() => {
                debug!(?command, "session command");
                match command {
                    Some(SessionCommand::Select { index, reply }) => {
                        let result = controller.select_manually(index);
                        if let Ok(transition) = &result {
                            record(history.as_ref(), transition);
                        }
                        let _ = reply.send(result);
                    }
                    Some(SessionCommand::Snapshot { reply }) => {
                        let _ = reply.send(controller.snapshot());
                    }
                    Some(SessionCommand::Stop) | None => {
                        controller.stop();
                        break;
                    }
                }
            }
        }
    }

    controller.snapshot()
}

fn arm(scheduled: Scheduled) -> (TimerToken, Instant) {
    (scheduled.token, Instant::now() + scheduled.after)
}

fn record(history: Option<&TransitionLog>, transition: &Transition) {
    let Some(history) = history else { return };
    if let Err(e) = history.append(&TransitionRecord::now(transition)) {
        warn!(error = %e, "failed to append transition to history");
    }
}
