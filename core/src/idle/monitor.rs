use crate::session::{AuthPhase, SessionStore};
use crate::settings::SettingsStore;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};

const ACTIVITY_CHANNEL_CAPACITY: usize = 64;

/// 会重置空闲计时的用户输入
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActivityKind {
    PointerPress,
    KeyPress,
    Touch,
    Scroll,
}

impl ActivityKind {
    pub const ALL: [ActivityKind; 4] = [
        ActivityKind::PointerPress,
        ActivityKind::KeyPress,
        ActivityKind::Touch,
        ActivityKind::Scroll,
    ];

    /// 对应的 DOM 事件名
    pub fn dom_event(self) -> &'static str {
        match self {
            Self::PointerPress => "mousedown",
            Self::KeyPress => "keydown",
            Self::Touch => "touchstart",
            Self::Scroll => "scroll",
        }
    }

    pub fn from_dom_event(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.dom_event() == name)
    }
}

/// 输入事件入口，可克隆给多个来源
#[derive(Clone)]
pub struct ActivitySink {
    tx: mpsc::Sender<ActivityKind>,
}

impl ActivitySink {
    /// 记录一次输入；通道已满时丢弃（下一次输入同样会重置计时）
    pub fn record(&self, kind: ActivityKind) -> bool {
        self.tx.try_send(kind).is_ok()
    }
}

/// 监视任务句柄；drop 时停止
pub struct IdleMonitorHandle {
    sink: ActivitySink,
    task: JoinHandle<()>,
}

impl IdleMonitorHandle {
    pub fn sink(&self) -> ActivitySink {
        self.sink.clone()
    }

    pub fn stop(self) {
        self.task.abort();
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

impl Drop for IdleMonitorHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}

pub struct IdleLockMonitor {
    session: SessionStore,
    settings: SettingsStore,
}

impl IdleLockMonitor {
    pub fn spawn(
        session: SessionStore,
        settings: SettingsStore,
        poll_interval: Duration,
    ) -> IdleMonitorHandle {
        let (tx, rx) = mpsc::channel(ACTIVITY_CHANNEL_CAPACITY);
        let monitor = Self { session, settings };
        let task = tokio::spawn(monitor.run(rx, poll_interval));
        IdleMonitorHandle {
            sink: ActivitySink { tx },
            task,
        }
    }

    async fn run(self, mut activity_rx: mpsc::Receiver<ActivityKind>, poll: Duration) {
        let mut tick = tokio::time::interval_at(Instant::now() + poll, poll);
        tick.set_missed_tick_behavior(MissedTickBehavior::Delay);
        tracing::debug!(target: "texton.idle", poll_secs = poll.as_secs(), "idle monitor started");

        loop {
            tokio::select! {
                _ = tick.tick() => self.check().await,
                kind = activity_rx.recv() => match kind {
                    Some(kind) => self.on_activity(kind).await,
                    None => break,
                },
            }
        }
    }

    async fn on_activity(&self, kind: ActivityKind) {
        // 锁定或未登录时不计入活动
        if self.session.phase().await == AuthPhase::Unlocked {
            tracing::trace!(target: "texton.idle", kind = kind.dom_event(), "activity");
            self.session.update_activity().await;
        }
    }

    async fn check(&self) {
        let Some(threshold) = self.settings.get().await.auto_lock_after() else {
            return;
        };
        let snapshot = self.session.snapshot().await;
        if snapshot.phase() != AuthPhase::Unlocked {
            return;
        }
        let idle = snapshot.last_activity().elapsed();
        if idle < threshold {
            return;
        }
        tracing::info!(
            target: "texton.idle",
            idle_secs = idle.as_secs(),
            threshold_secs = threshold.as_secs(),
            "idle threshold reached, locking"
        );
        if let Err(err) = self.session.lock().await {
            tracing::debug!(target: "texton.idle", error = %err, "lock skipped");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const POLL: Duration = Duration::from_secs(10);

    async fn signed_in() -> (SessionStore, SettingsStore) {
        let session = SessionStore::in_memory();
        session.set_tokens("a".into(), "r".into()).await.unwrap();
        let settings = SettingsStore::in_memory();
        settings.update(|s| s.auto_lock_minutes = 5).await;
        (session, settings)
    }

    async fn advance_to(start: Instant, secs: u64) {
        tokio::time::sleep_until(start + Duration::from_secs(secs)).await;
    }

    #[tokio::test(start_paused = true)]
    async fn locks_within_one_interval_after_threshold() {
        let start = Instant::now();
        let (session, settings) = signed_in().await;
        let _handle = IdleLockMonitor::spawn(session.clone(), settings, POLL);

        advance_to(start, 299).await;
        assert!(!session.is_locked().await);

        advance_to(start, 310).await;
        assert!(session.is_locked().await);
        assert_eq!(session.access_token().await.as_deref(), Some("a"));
    }

    #[tokio::test(start_paused = true)]
    async fn activity_postpones_lock() {
        let start = Instant::now();
        let (session, settings) = signed_in().await;
        let handle = IdleLockMonitor::spawn(session.clone(), settings, POLL);

        advance_to(start, 200).await;
        assert!(handle.sink().record(ActivityKind::KeyPress));

        advance_to(start, 310).await;
        assert!(!session.is_locked().await);

        advance_to(start, 510).await;
        assert!(session.is_locked().await);
    }

    #[tokio::test(start_paused = true)]
    async fn activity_ignored_while_locked() {
        let (session, settings) = signed_in().await;
        let handle = IdleLockMonitor::spawn(session.clone(), settings, POLL);
        session.lock().await.unwrap();
        let before = session.last_activity().await;

        tokio::time::sleep(Duration::from_secs(30)).await;
        handle.sink().record(ActivityKind::PointerPress);
        tokio::time::sleep(Duration::from_secs(1)).await;

        assert_eq!(session.last_activity().await, before);
    }

    #[tokio::test(start_paused = true)]
    async fn disabled_auto_lock_never_locks() {
        let (session, settings) = signed_in().await;
        settings.update(|s| s.auto_lock_enabled = false).await;
        let _handle = IdleLockMonitor::spawn(session.clone(), settings, POLL);

        tokio::time::sleep(Duration::from_secs(3_600)).await;
        assert!(!session.is_locked().await);
    }

    #[tokio::test(start_paused = true)]
    async fn threshold_change_applies_on_next_tick() {
        let start = Instant::now();
        let (session, settings) = signed_in().await;
        let _handle = IdleLockMonitor::spawn(session.clone(), settings.clone(), POLL);

        advance_to(start, 65).await;
        assert!(!session.is_locked().await);
        settings.update(|s| s.auto_lock_minutes = 1).await;

        advance_to(start, 75).await;
        assert!(session.is_locked().await);
    }

    #[tokio::test(start_paused = true)]
    async fn stopped_monitor_does_not_lock() {
        let (session, settings) = signed_in().await;
        let handle = IdleLockMonitor::spawn(session.clone(), settings, POLL);
        handle.stop();

        tokio::time::sleep(Duration::from_secs(3_600)).await;
        assert!(!session.is_locked().await);
    }

    #[test]
    fn dom_event_names() {
        assert_eq!(ActivityKind::from_dom_event("touchstart"), Some(ActivityKind::Touch));
        assert_eq!(ActivityKind::from_dom_event("mousemove"), None);
        assert_eq!(ActivityKind::Scroll.dom_event(), "scroll");
    }
}
