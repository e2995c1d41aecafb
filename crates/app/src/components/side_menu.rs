use client::MenuSection;
use dioxus::prelude::*;

/// Sectioned navigation menu shared by both dashboards. Links are handled in
/// place through `on_open` instead of the router.
#[component]
pub fn SideMenu(
    sections: Vec<MenuSection>,
    #[props(default)] active: Option<String>,
    on_open: EventHandler<String>,
) -> Element {
    rsx! {
        nav { class: "side-menu",
            for section in sections {
                div { key: "{section.title}", class: "side-menu-section",
                    h4 { class: "side-menu-title", "{section.title}" }
                    ul {
                        for link in section.links {
                            li { key: "{link.path}",
                                a {
                                    class: if active.as_deref() == Some(link.path) { "side-menu-link active" } else { "side-menu-link" },
                                    href: "#",
                                    onclick: move |evt: MouseEvent| {
                                        evt.prevent_default();
                                        on_open.call(link.path.to_string());
                                    },
                                    "{link.name}"
                                }
                            }
                        }
                    }
                }
            }
        }
    }
}
