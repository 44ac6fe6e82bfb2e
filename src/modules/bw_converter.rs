mod bc_main;
mod bc_tools;
mod bc_ui;

pub use bc_main::{BwConverter, Notice};
