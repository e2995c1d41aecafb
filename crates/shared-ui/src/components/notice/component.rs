use dioxus::prelude::*;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum NoticeKind {
    #[default]
    Info,
    Success,
    Warning,
    Error,
}

impl NoticeKind {
    fn class(&self) -> &'static str {
        match self {
            NoticeKind::Info => "info",
            NoticeKind::Success => "success",
            NoticeKind::Warning => "warning",
            NoticeKind::Error => "error",
        }
    }

    fn role(&self) -> &'static str {
        match self {
            NoticeKind::Error | NoticeKind::Warning => "alert",
            _ => "status",
        }
    }
}

/// Inline message box replacing blocking alerts.
#[component]
pub fn Notice(
    #[props(default)] kind: NoticeKind,
    #[props(default)] title: Option<String>,
    #[props(default)] on_dismiss: Option<EventHandler<()>>,
    children: Element,
) -> Element {
    rsx! {
        div {
            class: "notice",
            "data-kind": kind.class(),
            role: kind.role(),
            if let Some(title) = title {
                h4 { class: "notice-title", "{title}" }
            }
            div { class: "notice-body", {children} }
            if let Some(handler) = on_dismiss {
                button {
                    class: "notice-dismiss",
                    r#type: "button",
                    "aria-label": "Cerrar",
                    onclick: move |_| handler.call(()),
                    "×"
                }
            }
        }
    }
}
