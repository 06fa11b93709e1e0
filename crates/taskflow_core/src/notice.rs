//! Transient user notifications ("toasts").
//!
//! The core only decides *what* to show; rendering belongs to the UI layer.

use log::info;
use std::collections::VecDeque;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Success,
    Error,
}

impl NoticeLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Error => "error",
        }
    }
}

/// One transient message shown to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }
}

/// Notification boundary consumed by controllers.
pub trait Notifier {
    fn notify(&mut self, notice: Notice);
}

impl<T: Notifier + ?Sized> Notifier for &mut T {
    fn notify(&mut self, notice: Notice) {
        (**self).notify(notice);
    }
}

const DEFAULT_NOTICE_CAPACITY: usize = 16;

/// Bounded in-memory notice queue; the oldest notice is dropped when full.
#[derive(Debug, Clone)]
pub struct NoticeLog {
    notices: VecDeque<Notice>,
    capacity: usize,
}

impl Default for NoticeLog {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_NOTICE_CAPACITY)
    }
}

impl NoticeLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Capacity is clamped to at least one notice.
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            notices: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn len(&self) -> usize {
        self.notices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notices.is_empty()
    }

    pub fn last(&self) -> Option<&Notice> {
        self.notices.back()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Notice> {
        self.notices.iter()
    }

    /// Removes and returns all pending notices, oldest first.
    pub fn drain(&mut self) -> Vec<Notice> {
        self.notices.drain(..).collect()
    }
}

impl Notifier for NoticeLog {
    fn notify(&mut self, notice: Notice) {
        info!(
            "event=notice_posted module=notice level={}",
            notice.level.as_str()
        );
        if self.notices.len() == self.capacity {
            self.notices.pop_front();
        }
        self.notices.push_back(notice);
    }
}

#[cfg(test)]
mod tests {
    use super::{Notice, NoticeLevel, NoticeLog, Notifier};

    #[test]
    fn drops_oldest_notice_past_capacity() {
        let mut log = NoticeLog::with_capacity(2);
        log.notify(Notice::success("one"));
        log.notify(Notice::error("two"));
        log.notify(Notice::success("three"));

        let drained = log.drain();
        let messages: Vec<&str> = drained.iter().map(|n| n.message.as_str()).collect();
        assert_eq!(messages, vec!["two", "three"]);
        assert!(log.is_empty());
    }

    #[test]
    fn zero_capacity_is_clamped() {
        let mut log = NoticeLog::with_capacity(0);
        log.notify(Notice::error("only"));
        assert_eq!(log.len(), 1);
        assert_eq!(log.last().map(|n| n.level), Some(NoticeLevel::Error));
    }
}
