// Generic building blocks
pub mod badge;
pub mod button;
pub mod card;
pub mod notice;

// Scheduling widgets
pub mod month_calendar;
pub mod slot_picker;
pub mod status_badge;

pub use badge::*;
pub use button::*;
pub use card::*;
pub use month_calendar::*;
pub use notice::*;
pub use slot_picker::*;
pub use status_badge::*;
