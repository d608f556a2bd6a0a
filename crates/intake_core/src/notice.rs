use std::fmt;

/// The logical operation a notice belongs to. A new notice replaces the
/// previous one for the same topic instead of stacking.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeTopic {
    Selection,
    Upload,
    Processing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    /// Transient in-progress message, expected to be replaced.
    Loading,
    Success,
    Error,
}

/// One transient user-facing message. Carries no retryable state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub topic: NoticeTopic,
    pub kind: NoticeKind,
    pub text: String,
}

impl Notice {
    pub fn loading(topic: NoticeTopic, text: impl Into<String>) -> Self {
        Self {
            topic,
            kind: NoticeKind::Loading,
            text: text.into(),
        }
    }

    pub fn success(topic: NoticeTopic, text: impl Into<String>) -> Self {
        Self {
            topic,
            kind: NoticeKind::Success,
            text: text.into(),
        }
    }

    pub fn error(topic: NoticeTopic, text: impl Into<String>) -> Self {
        Self {
            topic,
            kind: NoticeKind::Error,
            text: text.into(),
        }
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.text)
    }
}
