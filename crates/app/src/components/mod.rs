pub mod flash;
pub mod side_menu;
pub mod under_construction;

pub use flash::{Flash, FlashNotice};
pub use side_menu::SideMenu;
pub use under_construction::UnderConstruction;
