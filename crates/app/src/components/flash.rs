use dioxus::prelude::*;
use shared_types::AppError;
use shared_ui::{Notice, NoticeKind};

/// One-off page message shown above the content until dismissed.
#[derive(Debug, Clone, PartialEq)]
pub struct Flash {
    pub kind: NoticeKind,
    pub message: String,
}

impl Flash {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Success,
            message: message.into(),
        }
    }

    pub fn error(err: &AppError) -> Self {
        Self {
            kind: NoticeKind::Error,
            message: err.message.clone(),
        }
    }
}

#[component]
pub fn FlashNotice(flash: Signal<Option<Flash>>) -> Element {
    let Some(current) = flash() else {
        return rsx! {};
    };

    rsx! {
        Notice {
            kind: current.kind,
            on_dismiss: move |_| flash.set(None),
            "{current.message}"
        }
    }
}
