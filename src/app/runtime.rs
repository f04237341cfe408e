// SPDX-License-Identifier: GPL-3.0-only

//! Task executor
//!
//! Runs the actions of a [`Task`] on the tokio runtime and feeds the
//! resulting messages back through a single channel, so `update` keeps
//! running on one thread in the order messages arrive.

use super::state::Message;
use super::task::{Action, Task};
use tokio::sync::mpsc;
use tracing::trace;

/// Spawns task actions and collects their messages
pub struct Executor {
    sender: mpsc::UnboundedSender<Message>,
    receiver: mpsc::UnboundedReceiver<Message>,
}

impl Default for Executor {
    fn default() -> Self {
        Self::new()
    }
}

impl Executor {
    pub fn new() -> Self {
        let (sender, receiver) = mpsc::unbounded_channel();
        Self { sender, receiver }
    }

    /// Spawn every action of `task`; must be called inside a tokio runtime
    pub fn spawn(&self, task: Task) {
        for action in task.into_actions() {
            let sender = self.sender.clone();
            match action {
                Action::Delay { after, message } => {
                    tokio::spawn(async move {
                        tokio::time::sleep(after).await;
                        // Receiver gone means the app is shutting down
                        let _ = sender.send(message);
                    });
                }
                Action::Perform(future) => {
                    tokio::spawn(async move {
                        let message = future.await;
                        let _ = sender.send(message);
                    });
                }
            }
        }
    }

    /// Next completed message, without waiting
    pub fn try_next(&mut self) -> Option<Message> {
        let message = self.receiver.try_recv().ok();
        if let Some(message) = &message {
            trace!(?message, "Task completed");
        }
        message
    }

    /// Wait for the next completed message
    pub async fn next(&mut self) -> Option<Message> {
        self.receiver.recv().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test(start_paused = true)]
    async fn test_delays_arrive_in_time_order() {
        let mut executor = Executor::new();
        executor.spawn(Task::batch([
            Task::delay(Duration::from_millis(300), Message::ProcessingElapsed),
            Task::delay(Duration::from_millis(150), Message::ClearFlash),
        ]));

        assert!(executor.try_next().is_none());
        assert!(matches!(executor.next().await, Some(Message::ClearFlash)));
        assert!(matches!(
            executor.next().await,
            Some(Message::ProcessingElapsed)
        ));
    }

    #[tokio::test]
    async fn test_perform_delivers_result() {
        let mut executor = Executor::new();
        executor.spawn(Task::perform(async { 2 + 2 }, |n| {
            Message::SetTimer(n)
        }));
        assert!(matches!(executor.next().await, Some(Message::SetTimer(4))));
    }
}
