use std::future::Future;

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// A spawned background task whose lifetime is bound to its owner.
///
/// The task receives a child of the handle's cancellation token and is also
/// aborted when the handle is dropped, so a timer can never outlive the
/// session view that scheduled it.
pub struct ScopedTask {
    handle: Option<JoinHandle<()>>,
    cancel_token: CancellationToken,
}

impl ScopedTask {
    pub fn spawn<F, Fut>(task: F) -> Self
    where
        F: FnOnce(CancellationToken) -> Fut,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let cancel_token = CancellationToken::new();
        let handle = tokio::spawn(task(cancel_token.child_token()));
        Self {
            handle: Some(handle),
            cancel_token,
        }
    }

    pub fn is_finished(&self) -> bool {
        self.handle
            .as_ref()
            .map(JoinHandle::is_finished)
            .unwrap_or(true)
    }

    pub fn cancel(&mut self) {
        self.cancel_token.cancel();
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }
}

impl Drop for ScopedTask {
    fn drop(&mut self) {
        self.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::ScopedTask;
    use std::sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    };
    use std::time::Duration;

    #[tokio::test(start_paused = true)]
    async fn dropping_the_handle_stops_the_task() {
        let fired = Arc::new(AtomicBool::new(false));
        let flag = fired.clone();

        let task = ScopedTask::spawn(move |_token| async move {
            tokio::time::sleep(Duration::from_secs(5)).await;
            flag.store(true, Ordering::SeqCst);
        });
        drop(task);

        tokio::time::sleep(Duration::from_secs(10)).await;
        assert!(!fired.load(Ordering::SeqCst));
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_marks_the_task_finished() {
        let mut task = ScopedTask::spawn(move |token| async move {
            token.cancelled().await;
        });
        tokio::task::yield_now().await;
        assert!(!task.is_finished());

        task.cancel();
        assert!(task.is_finished());
    }
}
