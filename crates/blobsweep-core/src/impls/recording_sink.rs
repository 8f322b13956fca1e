//! RecordingEventSink - emit されたイベントをメモリに貯める（テスト用）

use std::sync::Mutex;

use crate::domain::SweepEvent;
use crate::ports::EventSink;

#[derive(Debug, Default)]
pub struct RecordingEventSink {
    events: Mutex<Vec<SweepEvent>>,
}

impl RecordingEventSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<SweepEvent> {
        self.events
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .clone()
    }

    /// 条件に合うイベントの数
    pub fn count(&self, pred: impl Fn(&SweepEvent) -> bool) -> usize {
        self.events
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .iter()
            .filter(|e| pred(e))
            .count()
    }
}

impl EventSink for RecordingEventSink {
    fn emit(&self, event: SweepEvent) {
        self.events
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .push(event);
    }
}
