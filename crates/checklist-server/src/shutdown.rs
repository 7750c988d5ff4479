//! Background tasks that stop together: the HTTP listener and the idle
//! session sweeper.

use std::future::Future;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Grace period for in-flight requests when none is given.
pub const DEFAULT_GRACE: Duration = Duration::from_secs(10);

/// Tasks sharing one cancellation token.
///
/// Spawned futures receive nothing; they are expected to watch a token
/// obtained from [`TaskGroup::token`] before spawning.
pub struct TaskGroup {
    token: CancellationToken,
    tasks: Vec<(&'static str, JoinHandle<()>)>,
}

impl TaskGroup {
    pub fn new() -> Self {
        Self {
            token: CancellationToken::new(),
            tasks: Vec::new(),
        }
    }

    pub fn token(&self) -> CancellationToken {
        self.token.clone()
    }

    pub fn spawn<F>(&mut self, name: &'static str, task: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        debug!(task = name, "spawning background task");
        self.tasks.push((name, tokio::spawn(task)));
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn is_stopping(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Cancel the token and wait up to `grace` for every task. Tasks still
    /// running afterwards are aborted; their count is returned.
    pub async fn stop(mut self, grace: Duration) -> usize {
        self.token.cancel();
        info!(tasks = self.tasks.len(), grace_secs = grace.as_secs(), "stopping");

        let joins = futures::future::join_all(self.tasks.iter_mut().map(|(_, handle)| handle));
        if tokio::time::timeout(grace, joins).await.is_ok() {
            return 0;
        }

        let mut aborted = 0;
        for (name, handle) in &self.tasks {
            if !handle.is_finished() {
                warn!(task = *name, "task ignored shutdown, aborting");
                handle.abort();
                aborted += 1;
            }
        }
        aborted
    }
}

impl Default for TaskGroup {
    fn default() -> Self {
        Self::new()
    }
}
