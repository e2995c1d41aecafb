use chrono::NaiveDate;
use dioxus::prelude::*;
use shared_types::{MonthGrid, WEEKDAYS_ES};

/// Monday-first month grid with previous/next navigation.
///
/// Weekend cells are never clickable. Past days are clickable only with
/// `allow_past`, which the doctor agenda uses to review earlier consultations.
#[component]
pub fn MonthCalendar(
    grid: MonthGrid,
    #[props(default = true)] can_prev: bool,
    #[props(default = true)] can_next: bool,
    #[props(default = false)] allow_past: bool,
    on_prev: EventHandler<()>,
    on_next: EventHandler<()>,
    on_select: EventHandler<NaiveDate>,
) -> Element {
    let title = grid.title.clone();
    let blanks = grid.leading_blanks;

    rsx! {
        div { class: "month-calendar",
            div { class: "month-calendar-nav",
                button {
                    class: "nav-btn",
                    r#type: "button",
                    "aria-label": "Mes anterior",
                    disabled: !can_prev,
                    onclick: move |_| on_prev.call(()),
                    "‹"
                }
                h3 { class: "month-title", "{title}" }
                button {
                    class: "nav-btn",
                    r#type: "button",
                    "aria-label": "Mes siguiente",
                    disabled: !can_next,
                    onclick: move |_| on_next.call(()),
                    "›"
                }
            }
            div { class: "month-calendar-grid",
                for name in WEEKDAYS_ES {
                    div { key: "{name}", class: "weekday", "{name}" }
                }
                for i in 0..blanks {
                    div { key: "blank-{i}", class: "calendar-day empty" }
                }
                for cell in grid.days.iter().cloned() {
                    {
                        let enabled = !cell.weekend && (allow_past || !cell.past);
                        let date = cell.date;
                        let day = cell.day;
                        let classes = cell.css_classes();
                        let busy = cell.has_appointments;
                        rsx! {
                            button {
                                key: "{date}",
                                r#type: "button",
                                class: "{classes}",
                                disabled: !enabled,
                                onclick: move |_| {
                                    if enabled {
                                        on_select.call(date);
                                    }
                                },
                                "{day}"
                                if busy {
                                    span { class: "day-dot" }
                                }
                            }
                        }
                    }
                }
            }
        }
    }
}
