//! Toast notification queue.
//!
//! DESIGN
//! ======
//! Notices are plain data pushed by the session store and by views; the
//! `Toaster` component renders them and schedules dismissal. The queue is
//! bounded so a burst of failures cannot grow it without limit.

#[cfg(test)]
#[path = "notices_test.rs"]
mod notices_test;

/// Maximum notices kept on screen; older ones are dropped first.
pub const MAX_NOTICES: usize = 5;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Info,
    Error,
}

impl NoticeKind {
    /// CSS modifier for the toast.
    pub const fn class(self) -> &'static str {
        match self {
            Self::Success => "toast--success",
            Self::Info => "toast--info",
            Self::Error => "toast--error",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Notice {
    pub id: u64,
    pub kind: NoticeKind,
    pub title: String,
    pub description: String,
}

#[derive(Clone, Debug, Default)]
pub struct NoticeState {
    pub items: Vec<Notice>,
    next_id: u64,
}

impl NoticeState {
    /// Queue a notice and return its id.
    pub fn push(&mut self, kind: NoticeKind, title: &str, description: &str) -> u64 {
        self.next_id += 1;
        let id = self.next_id;
        self.items.push(Notice { id, kind, title: title.to_owned(), description: description.to_owned() });
        if self.items.len() > MAX_NOTICES {
            let overflow = self.items.len() - MAX_NOTICES;
            self.items.drain(..overflow);
        }
        id
    }

    pub fn success(&mut self, title: &str, description: &str) -> u64 {
        self.push(NoticeKind::Success, title, description)
    }

    pub fn error(&mut self, title: &str, description: &str) -> u64 {
        self.push(NoticeKind::Error, title, description)
    }

    pub fn dismiss(&mut self, id: u64) {
        self.items.retain(|notice| notice.id != id);
    }
}
