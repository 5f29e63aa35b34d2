use std::collections::VecDeque;

use tokio::sync::{Mutex, Notify};

/// FIFO channel of submission tokens from the intake API to the workers.
///
/// Delivery is single-consumer-per-message: a popped token belongs to exactly
/// one worker, which is what keeps two workers from judging the same
/// submission at once.
pub struct SubmissionQueue {
    queue: Mutex<VecDeque<String>>,
    notify: Notify,
}

impl SubmissionQueue {
    pub fn new() -> Self {
        Self {
            queue: Mutex::new(VecDeque::new()),
            notify: Notify::new(),
        }
    }

    pub async fn push(&self, token: String) {
        self.queue.lock().await.push_back(token);
        self.notify.notify_one();
    }

    pub async fn pop(&self) -> String {
        loop {
            if let Some(token) = self.queue.lock().await.pop_front() {
                return token;
            }
            self.notify.notified().await;
        }
    }

    pub async fn len(&self) -> usize {
        self.queue.lock().await.len()
    }
}

impl Default for SubmissionQueue {
    fn default() -> Self {
        Self::new()
    }
}
