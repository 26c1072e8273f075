pub mod grid;
pub mod keybindings;
pub mod lightbox;
pub mod window;

pub use window::MainWindow;
