pub mod error_dialog;
pub mod error_screen;
pub mod file_view;
pub mod preview;
pub mod search_dialog;

pub use error_dialog::ErrorDialog;
pub use error_screen::ErrorScreen;
pub use file_view::FileView;
pub use preview::Preview;
pub use search_dialog::SearchDialog;
