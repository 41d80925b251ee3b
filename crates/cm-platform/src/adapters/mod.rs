mod menu_surface;
mod text_insertion;
mod ui;

pub use menu_surface::InMemoryMenuSurface;
pub use text_insertion::ChannelTextInsertion;
pub use ui::ChannelUiPort;
