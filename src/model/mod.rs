pub mod tab;
pub mod tactical;
pub mod ui_state;
