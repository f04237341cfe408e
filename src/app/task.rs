// SPDX-License-Identifier: GPL-3.0-only

//! Deferred work returned from `update`
//!
//! Handlers never block and never spawn on their own. They describe what
//! should happen later as a [`Task`] and the [`Executor`](super::runtime::Executor)
//! turns each action into a message once it completes.

use super::state::Message;
use futures::FutureExt;
use futures::future::BoxFuture;
use std::future::Future;
use std::time::Duration;

/// One unit of deferred work
pub enum Action {
    /// Deliver `message` after `after` has elapsed
    Delay { after: Duration, message: Message },
    /// Await the future and deliver its message
    Perform(BoxFuture<'static, Message>),
}

impl std::fmt::Debug for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Action::Delay { after, message } => f
                .debug_struct("Delay")
                .field("after", after)
                .field("message", message)
                .finish(),
            Action::Perform(_) => f.write_str("Perform(..)"),
        }
    }
}

/// A batch of actions; empty means nothing to do
#[derive(Debug, Default)]
#[must_use = "tasks do nothing unless handed to the executor"]
pub struct Task {
    actions: Vec<Action>,
}

impl Task {
    pub fn none() -> Self {
        Self::default()
    }

    /// Deliver `message` after a delay
    pub fn delay(after: Duration, message: Message) -> Self {
        Self {
            actions: vec![Action::Delay { after, message }],
        }
    }

    /// Run `future` and map its output into a message
    pub fn perform<F, T>(future: F, map: impl FnOnce(T) -> Message + Send + 'static) -> Self
    where
        F: Future<Output = T> + Send + 'static,
        T: Send + 'static,
    {
        Self {
            actions: vec![Action::Perform(future.map(map).boxed())],
        }
    }

    pub fn batch(tasks: impl IntoIterator<Item = Task>) -> Self {
        Self {
            actions: tasks.into_iter().flat_map(|task| task.actions).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    pub fn into_actions(self) -> Vec<Action> {
        self.actions
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_batch_flattens() {
        let task = Task::batch([
            Task::none(),
            Task::delay(Duration::from_millis(150), Message::ClearFlash),
            Task::perform(async { 1 }, |_| Message::ProcessingElapsed),
        ]);
        assert_eq!(task.len(), 2);

        let actions = task.into_actions();
        assert!(matches!(
            &actions[0],
            Action::Delay { after, message: Message::ClearFlash }
                if *after == Duration::from_millis(150)
        ));
        assert!(matches!(actions[1], Action::Perform(_)));
    }

    #[test]
    fn test_none_is_empty() {
        assert!(Task::none().is_empty());
        assert!(Task::batch(Vec::new()).is_empty());
    }
}
