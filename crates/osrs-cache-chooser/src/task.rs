//! Background listing and acquisition
//!
//! Both operations run as tokio tasks and report through a single-shot
//! channel. The caller either awaits [`TaskHandle::wait`] or polls
//! [`TaskHandle::try_result`] from its own loop. There is no cancellation or
//! progress reporting: a started task runs to completion.
//!
//! [`AcquisitionGate`] stands in for a download button that stays disabled
//! while an acquisition is running.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use osrs_cache_protocol::CacheSnapshot;
use tokio::sync::oneshot;

use crate::acquisition::{AcquisitionReport, Selection};
use crate::chooser::CacheChooser;
use crate::error::{ChooserError, Result};

/// Pending result of a background task
///
/// The result is handed out exactly once. After [`TaskHandle::try_result`]
/// has returned `Some`, later polls return `None`.
pub struct TaskHandle<T> {
    receiver: Option<oneshot::Receiver<Result<T>>>,
}

/// Pending catalog listing
pub type ListingHandle = TaskHandle<Vec<CacheSnapshot>>;

/// Pending acquisition
pub type AcquisitionHandle = TaskHandle<AcquisitionReport>;

impl<T> TaskHandle<T> {
    fn new(receiver: oneshot::Receiver<Result<T>>) -> Self {
        Self {
            receiver: Some(receiver),
        }
    }

    /// Wait for the task's result
    ///
    /// Fails with [`ChooserError::TaskFailed`] if the result was already
    /// taken by [`TaskHandle::try_result`].
    pub async fn wait(self) -> Result<T> {
        let Some(receiver) = self.receiver else {
            return Err(ChooserError::TaskFailed(
                "task result was already taken".to_string(),
            ));
        };
        receiver.await.unwrap_or_else(|_| Err(task_lost()))
    }

    /// Non-blocking check, `None` while the task is still running or once
    /// the result has been taken
    pub fn try_result(&mut self) -> Option<Result<T>> {
        let receiver = self.receiver.as_mut()?;
        let result = match receiver.try_recv() {
            Ok(result) => result,
            Err(oneshot::error::TryRecvError::Empty) => return None,
            Err(oneshot::error::TryRecvError::Closed) => Err(task_lost()),
        };
        self.receiver = None;
        Some(result)
    }

    /// Whether the result has already been handed out
    pub fn is_taken(&self) -> bool {
        self.receiver.is_none()
    }
}

impl<T> std::fmt::Debug for TaskHandle<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TaskHandle").finish_non_exhaustive()
    }
}

fn task_lost() -> ChooserError {
    ChooserError::TaskFailed("task ended without reporting a result".to_string())
}

/// Single-flight guard for acquisitions
#[derive(Debug, Clone, Default)]
pub struct AcquisitionGate {
    busy: Arc<AtomicBool>,
}

/// Proof that the gate is held; dropping it reopens the gate
#[derive(Debug)]
pub struct AcquisitionPermit {
    busy: Arc<AtomicBool>,
}

impl AcquisitionGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Close the gate, failing with [`ChooserError::Busy`] if already closed
    pub fn try_start(&self) -> Result<AcquisitionPermit> {
        self.busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| ChooserError::Busy)?;
        Ok(AcquisitionPermit {
            busy: Arc::clone(&self.busy),
        })
    }

    /// Whether an acquisition currently holds the gate
    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }
}

impl Drop for AcquisitionPermit {
    fn drop(&mut self) {
        self.busy.store(false, Ordering::Release);
    }
}

/// List snapshots in the background
pub fn spawn_listing(chooser: Arc<CacheChooser>) -> ListingHandle {
    let (sender, receiver) = oneshot::channel();
    tokio::spawn(async move {
        let result = chooser.list_snapshots().await;
        if sender.send(result).is_err() {
            tracing::debug!("listing finished after its handle was dropped");
        }
    });
    TaskHandle::new(receiver)
}

/// Acquire `snapshot` in the background while holding `gate`
pub fn spawn_acquisition(
    chooser: Arc<CacheChooser>,
    gate: &AcquisitionGate,
    snapshot: CacheSnapshot,
) -> Result<AcquisitionHandle> {
    let permit = gate.try_start()?;
    let (sender, receiver) = oneshot::channel();
    tokio::spawn(async move {
        let _permit = permit;
        let result = chooser.acquire(&snapshot).await;
        if sender.send(result).is_err() {
            tracing::debug!("acquisition finished after its handle was dropped");
        }
    });
    Ok(TaskHandle::new(receiver))
}

/// Select and acquire in the background while holding `gate`
pub fn spawn_selection(
    chooser: Arc<CacheChooser>,
    gate: &AcquisitionGate,
    selection: Selection,
) -> Result<AcquisitionHandle> {
    let permit = gate.try_start()?;
    let (sender, receiver) = oneshot::channel();
    tokio::spawn(async move {
        let _permit = permit;
        let result = chooser.acquire_selection(selection).await;
        if sender.send(result).is_err() {
            tracing::debug!("acquisition finished after its handle was dropped");
        }
    });
    Ok(TaskHandle::new(receiver))
}
