pub mod collision;
pub mod config;
pub mod engine;
pub mod grid;
pub mod input;
pub mod modes;
pub mod renderer;
pub mod score;
pub mod snake;
pub mod spawn;
pub mod terminal_runtime;
pub mod theme;
pub mod ui;
