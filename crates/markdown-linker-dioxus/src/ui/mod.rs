mod app;
pub mod components;
pub mod markdown;
pub mod state;

pub use app::App;
