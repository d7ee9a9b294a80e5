//! Outbound activity events.
//!
//! The engine publishes an [`ActivityEvent`] after a manually recorded
//! transaction commits. Delivery is fire-and-forget: a closed channel or a
//! failing hook is logged and never reaches the caller of the write.

use std::sync::Arc;

use chrono::NaiveDate;
use tokio::{sync::mpsc, task::JoinHandle};
use uuid::Uuid;

/// Points granted for every recorded transaction.
pub const POINTS_PER_TRANSACTION: u32 = 50;

pub type HookError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ActivityEvent {
    TransactionRecorded { user_id: Uuid, date: NaiveDate },
}

pub type ActivitySender = mpsc::UnboundedSender<ActivityEvent>;
pub type ActivityReceiver = mpsc::UnboundedReceiver<ActivityEvent>;

pub fn activity_channel() -> (ActivitySender, ActivityReceiver) {
    mpsc::unbounded_channel()
}

/// Gamification collaborator.
pub trait GamificationHooks: Send + Sync {
    /// Record that the user was active on `date` (streak bookkeeping).
    fn record_activity(&self, user_id: Uuid, date: NaiveDate) -> Result<(), HookError>;

    /// Grant `points` to the user.
    fn award_points(&self, user_id: Uuid, points: u32) -> Result<(), HookError>;
}

/// Hooks that only log what they receive.
#[derive(Clone, Copy, Debug, Default)]
pub struct LogHooks;

impl GamificationHooks for LogHooks {
    fn record_activity(&self, user_id: Uuid, date: NaiveDate) -> Result<(), HookError> {
        tracing::info!(%user_id, %date, "activity recorded");
        Ok(())
    }

    fn award_points(&self, user_id: Uuid, points: u32) -> Result<(), HookError> {
        tracing::info!(%user_id, points, "points awarded");
        Ok(())
    }
}

/// Drain `rx` on a background task, forwarding every event to `hooks`.
///
/// The task ends when every sender is dropped.
pub fn spawn_activity_consumer(
    mut rx: ActivityReceiver,
    hooks: Arc<dyn GamificationHooks>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(event) = rx.recv().await {
            dispatch(hooks.as_ref(), &event);
        }
        tracing::debug!("activity channel closed");
    })
}

fn dispatch(hooks: &dyn GamificationHooks, event: &ActivityEvent) {
    match *event {
        ActivityEvent::TransactionRecorded { user_id, date } => {
            if let Err(err) = hooks.record_activity(user_id, date) {
                tracing::warn!(%user_id, "record_activity hook failed: {err}");
            }
            if let Err(err) = hooks.award_points(user_id, POINTS_PER_TRANSACTION) {
                tracing::warn!(%user_id, "award_points hook failed: {err}");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;

    #[derive(Default)]
    struct Recorder {
        activity: Mutex<Vec<(Uuid, NaiveDate)>>,
        points: Mutex<Vec<(Uuid, u32)>>,
    }

    impl GamificationHooks for Recorder {
        fn record_activity(&self, user_id: Uuid, date: NaiveDate) -> Result<(), HookError> {
            self.activity.lock().unwrap().push((user_id, date));
            Err("streak store offline".into())
        }

        fn award_points(&self, user_id: Uuid, points: u32) -> Result<(), HookError> {
            self.points.lock().unwrap().push((user_id, points));
            Ok(())
        }
    }

    #[tokio::test]
    async fn consumer_calls_both_hooks_even_when_one_fails() {
        let recorder = Arc::new(Recorder::default());
        let (tx, rx) = activity_channel();
        let handle = spawn_activity_consumer(rx, recorder.clone());

        let user_id = Uuid::new_v4();
        let date = NaiveDate::from_ymd_opt(2026, 10, 1).unwrap();
        tx.send(ActivityEvent::TransactionRecorded { user_id, date })
            .unwrap();
        drop(tx);
        handle.await.unwrap();

        assert_eq!(*recorder.activity.lock().unwrap(), vec![(user_id, date)]);
        assert_eq!(
            *recorder.points.lock().unwrap(),
            vec![(user_id, POINTS_PER_TRANSACTION)]
        );
    }
}
