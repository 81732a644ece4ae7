pub mod tui;

pub use tui::TuiApplication;
