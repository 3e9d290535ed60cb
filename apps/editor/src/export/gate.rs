//! Per-kind single-flight for export tasks.
//!
//! Each export kind has at most one running task. Triggering a kind that is already in
//! flight aborts the earlier task, which then resolves to [`ExportError::Superseded`].
//! Kinds are independent of each other.

use std::collections::HashMap;
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use tokio::task::AbortHandle;
use tracing::{debug, info};

use super::{ExportError, ExportKind};

struct InFlight {
    ticket: u64,
    abort: AbortHandle,
}

#[derive(Clone, Default)]
pub struct ExportGate {
    running: Arc<Mutex<HashMap<ExportKind, InFlight>>>,
    tickets: Arc<AtomicU64>,
}

impl ExportGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Runs `task` as the current export of `kind`.
    ///
    /// If the caller stops waiting, the task is aborted as well.
    pub async fn run<F, T>(&self, kind: ExportKind, task: F) -> Result<T, ExportError>
    where
        F: Future<Output = Result<T, ExportError>> + Send + 'static,
        T: Send + 'static,
    {
        let ticket = self.tickets.fetch_add(1, Ordering::Relaxed);
        let handle = tokio::spawn(task);

        let previous = self.lock().insert(
            kind,
            InFlight {
                ticket,
                abort: handle.abort_handle(),
            },
        );
        if let Some(previous) = previous {
            info!(kind = kind.as_str(), "Superseding in-flight export");
            previous.abort.abort();
        }

        let _release = Release {
            gate: self,
            kind,
            ticket,
        };

        match handle.await {
            Ok(result) => result,
            Err(e) if e.is_cancelled() => {
                debug!(kind = kind.as_str(), "Export task cancelled");
                Err(ExportError::Superseded)
            }
            Err(e) => Err(ExportError::Task(e.to_string())),
        }
    }

    /// Kinds with a task currently running, for disabling trigger buttons.
    pub fn in_flight(&self) -> Vec<ExportKind> {
        let mut kinds: Vec<ExportKind> = self
            .lock()
            .iter()
            .filter(|(_, flight)| !flight.abort.is_finished())
            .map(|(kind, _)| *kind)
            .collect();
        kinds.sort_by_key(|k| k.as_str());
        kinds
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<ExportKind, InFlight>> {
        self.running.lock().unwrap_or_else(|e| e.into_inner())
    }
}

/// Clears the slot on completion or abandonment, unless a newer ticket took it.
struct Release<'a> {
    gate: &'a ExportGate,
    kind: ExportKind,
    ticket: u64,
}

impl Drop for Release<'_> {
    fn drop(&mut self) {
        let mut running = self.gate.lock();
        if running.get(&self.kind).map(|f| f.ticket) == Some(self.ticket) {
            if let Some(flight) = running.remove(&self.kind) {
                flight.abort.abort();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tokio::sync::oneshot;

    #[tokio::test]
    async fn test_runs_to_completion() {
        let gate = ExportGate::new();
        let value = gate.run(ExportKind::Word, async { Ok(7) }).await.unwrap();
        assert_eq!(value, 7);
        assert!(gate.in_flight().is_empty());
    }

    #[tokio::test]
    async fn test_error_passes_through() {
        let gate = ExportGate::new();
        let err = gate
            .run::<_, ()>(ExportKind::Pdf, async { Err(ExportError::Encode("x".into())) })
            .await
            .unwrap_err();
        assert!(matches!(err, ExportError::Encode(_)));
    }

    #[tokio::test]
    async fn test_second_trigger_supersedes_first() {
        let gate = ExportGate::new();
        let (started_tx, started_rx) = oneshot::channel();

        let first = {
            let gate = gate.clone();
            tokio::spawn(async move {
                gate.run(ExportKind::Pdf, async move {
                    let _ = started_tx.send(());
                    tokio::time::sleep(Duration::from_secs(60)).await;
                    Ok("first")
                })
                .await
            })
        };
        started_rx.await.unwrap();
        assert_eq!(gate.in_flight(), vec![ExportKind::Pdf]);

        let second = gate.run(ExportKind::Pdf, async { Ok("second") }).await;
        assert_eq!(second.unwrap(), "second");

        let first = first.await.unwrap();
        assert!(matches!(first, Err(ExportError::Superseded)));
        assert!(gate.in_flight().is_empty());
    }

    #[tokio::test]
    async fn test_kinds_are_independent() {
        let gate = ExportGate::new();
        let (started_tx, started_rx) = oneshot::channel();
        let (release_tx, release_rx) = oneshot::channel::<()>();

        let pdf = {
            let gate = gate.clone();
            tokio::spawn(async move {
                gate.run(ExportKind::Pdf, async move {
                    let _ = started_tx.send(());
                    let _ = release_rx.await;
                    Ok(1)
                })
                .await
            })
        };
        started_rx.await.unwrap();

        let word = gate.run(ExportKind::Word, async { Ok(2) }).await.unwrap();
        assert_eq!(word, 2);
        assert_eq!(gate.in_flight(), vec![ExportKind::Pdf]);

        release_tx.send(()).unwrap();
        assert_eq!(pdf.await.unwrap().unwrap(), 1);
    }

    #[tokio::test]
    async fn test_abandoned_caller_aborts_task() {
        let gate = ExportGate::new();
        let (started_tx, started_rx) = oneshot::channel();
        let waiter = {
            let gate = gate.clone();
            tokio::spawn(async move {
                gate.run(ExportKind::Share, async move {
                    let _ = started_tx.send(());
                    tokio::time::sleep(Duration::from_secs(60)).await;
                    Ok(())
                })
                .await
            })
        };
        started_rx.await.unwrap();
        waiter.abort();
        let _ = waiter.await;
        assert!(gate.in_flight().is_empty());
    }
}
