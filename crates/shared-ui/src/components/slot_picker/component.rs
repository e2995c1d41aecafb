use dioxus::prelude::*;
use shared_types::Slot;

fn slot_class(selected: bool) -> &'static str {
    if selected {
        "slot selected"
    } else {
        "slot"
    }
}

/// Free hours for the chosen day as a row of toggle buttons.
#[component]
pub fn SlotPicker(
    slots: Vec<Slot>,
    #[props(!optional)] selected: Option<Slot>,
    on_select: EventHandler<Slot>,
) -> Element {
    if slots.is_empty() {
        return rsx! {
            p { class: "slot-picker-empty", "No hay horas disponibles para este día." }
        };
    }

    rsx! {
        div { class: "slot-picker", role: "listbox",
            for slot in slots {
                button {
                    key: "{slot}",
                    r#type: "button",
                    class: slot_class(selected == Some(slot)),
                    "aria-selected": selected == Some(slot),
                    onclick: move |_| on_select.call(slot),
                    "{slot}"
                }
            }
        }
    }
}
