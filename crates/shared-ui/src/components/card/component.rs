use dioxus::prelude::*;

/// Emphasis of a panel.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum CardTone {
    #[default]
    Plain,
    /// Used for the panel the user is expected to act on next.
    Highlighted,
    Muted,
}

impl CardTone {
    fn class(&self) -> &'static str {
        match self {
            CardTone::Plain => "plain",
            CardTone::Highlighted => "highlighted",
            CardTone::Muted => "muted",
        }
    }
}

/// Panel container used by every dashboard view.
#[component]
pub fn Card(
    #[props(default)] tone: CardTone,
    #[props(extends = GlobalAttributes)] attributes: Vec<Attribute>,
    children: Element,
) -> Element {
    let base = vec![
        Attribute::new("class", "card", None, false),
        Attribute::new("data-tone", tone.class(), None, false),
    ];
    let merged = dioxus_primitives::merge_attributes(vec![base, attributes]);

    rsx! {
        section {
            ..merged,
            {children}
        }
    }
}

#[component]
pub fn CardHeader(
    #[props(extends = GlobalAttributes)] attributes: Vec<Attribute>,
    children: Element,
) -> Element {
    let base = vec![Attribute::new("class", "card-header", None, false)];
    let merged = dioxus_primitives::merge_attributes(vec![base, attributes]);

    rsx! {
        header {
            ..merged,
            {children}
        }
    }
}

#[component]
pub fn CardTitle(children: Element) -> Element {
    rsx! {
        h2 { class: "card-title", {children} }
    }
}

#[component]
pub fn CardDescription(children: Element) -> Element {
    rsx! {
        p { class: "card-description", {children} }
    }
}

#[component]
pub fn CardContent(
    #[props(extends = GlobalAttributes)] attributes: Vec<Attribute>,
    children: Element,
) -> Element {
    let base = vec![Attribute::new("class", "card-content", None, false)];
    let merged = dioxus_primitives::merge_attributes(vec![base, attributes]);

    rsx! {
        div {
            ..merged,
            {children}
        }
    }
}

/// Action row at the bottom of a panel.
#[component]
pub fn CardFooter(children: Element) -> Element {
    rsx! {
        footer { class: "card-footer", {children} }
    }
}
