//! Cancellable deferred work
//!
//! Chat replies, entity extraction and upload progress all run as deferred
//! tasks on the tokio runtime. Each task belongs to a [`TaskScope`] owned by
//! the view that started it; dropping the scope cancels everything still
//! pending, so no callback ever fires against a view that is gone.

use std::future::Future;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use parking_lot::RwLock;
use tokio::runtime::Handle;
use tokio::sync::Notify;
use tokio::task::JoinHandle;
use tracing::debug;

#[derive(Debug, Default)]
struct CancelInner {
    cancelled: AtomicBool,
    notify: Notify,
}

/// Shared flag that can be awaited
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    inner: Arc<CancelInner>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        if !self.inner.cancelled.swap(true, Ordering::SeqCst) {
            self.inner.notify.notify_waiters();
        }
    }

    pub fn is_cancelled(&self) -> bool {
        self.inner.cancelled.load(Ordering::SeqCst)
    }

    /// Resolves once the token is cancelled
    pub async fn cancelled(&self) {
        loop {
            // Register before checking so a concurrent cancel is not missed
            let notified = self.inner.notify.notified();
            if self.is_cancelled() {
                return;
            }
            notified.await;
        }
    }
}

/// Decrements the scope's pending count when the task ends, however it ends
struct PendingGuard(Arc<AtomicUsize>);

impl Drop for PendingGuard {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

/// Handle to one spawned task
#[derive(Debug)]
pub struct DeferredTask {
    name: &'static str,
    token: CancelToken,
    join: JoinHandle<()>,
}

impl DeferredTask {
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Cancel this task only; its callback will not run
    pub fn cancel(&self) {
        self.token.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    pub fn is_finished(&self) -> bool {
        self.join.is_finished()
    }

    /// Wait for the task to complete or observe its cancellation
    pub async fn join(self) {
        let _ = self.join.await;
    }
}

/// Owner of a group of deferred tasks
pub struct TaskScope {
    handle: Handle,
    token: RwLock<CancelToken>,
    pending: Arc<AtomicUsize>,
}

impl TaskScope {
    pub fn new(handle: Handle) -> Self {
        Self {
            handle,
            token: RwLock::new(CancelToken::new()),
            pending: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Scope bound to the runtime of the calling task
    pub fn current() -> Self {
        Self::new(Handle::current())
    }

    /// Spawn a future that stops at its next await point once cancelled
    pub fn spawn<F>(&self, name: &'static str, future: F) -> DeferredTask
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let scope_token = self.token.read().clone();
        let task_token = CancelToken::new();
        let own_token = task_token.clone();

        self.pending.fetch_add(1, Ordering::SeqCst);
        let guard = PendingGuard(self.pending.clone());

        let join = self.handle.spawn(async move {
            let _guard = guard;
            tokio::select! {
                biased;
                _ = scope_token.cancelled() => debug!("Task {} cancelled with its scope", name),
                _ = own_token.cancelled() => debug!("Task {} cancelled", name),
                _ = future => debug!("Task {} finished", name),
            }
        });

        DeferredTask {
            name,
            token: task_token,
            join,
        }
    }

    /// Run `callback` once after `delay` unless cancelled first
    pub fn spawn_after<F>(&self, name: &'static str, delay: Duration, callback: F) -> DeferredTask
    where
        F: FnOnce() + Send + 'static,
    {
        self.spawn(name, async move {
            tokio::time::sleep(delay).await;
            callback();
        })
    }

    /// Cancel every task spawned so far; later spawns are unaffected
    pub fn cancel_all(&self) {
        let mut token = self.token.write();
        token.cancel();
        *token = CancelToken::new();
    }

    /// Number of tasks that have neither finished nor been torn down
    pub fn pending(&self) -> usize {
        self.pending.load(Ordering::SeqCst)
    }

    pub fn has_pending(&self) -> bool {
        self.pending() > 0
    }

    pub fn handle(&self) -> &Handle {
        &self.handle
    }
}

impl Drop for TaskScope {
    fn drop(&mut self) {
        self.token.read().cancel();
    }
}

impl std::fmt::Debug for TaskScope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TaskScope").field("pending", &self.pending()).finish()
    }
}
