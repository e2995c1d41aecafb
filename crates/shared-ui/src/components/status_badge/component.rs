use dioxus::prelude::*;
use shared_types::AppointmentStatus;

use crate::components::badge::{Badge, BadgeVariant};

fn variant_for(status: AppointmentStatus) -> BadgeVariant {
    match status {
        AppointmentStatus::Pending => BadgeVariant::Warning,
        AppointmentStatus::InConsultation => BadgeVariant::Info,
        AppointmentStatus::Finished => BadgeVariant::Success,
        AppointmentStatus::NoShow => BadgeVariant::Neutral,
        AppointmentStatus::Cancelled => BadgeVariant::Danger,
    }
}

/// Appointment status pill.
#[component]
pub fn StatusBadge(status: AppointmentStatus) -> Element {
    rsx! {
        Badge { variant: variant_for(status), class: status.css_class(), "{status}" }
    }
}
