pub mod app;
pub mod assets;
pub mod center_panel;
pub mod fatal;
pub mod tab_bar;
