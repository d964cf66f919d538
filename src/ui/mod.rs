//! Terminal form

pub mod run;
pub mod screens;
pub mod theme;
pub mod widgets;

pub use run::{refuse_service, run};
pub use screens::Screen;
