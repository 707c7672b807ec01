//! Global happiness dashboard: load a joined table of country indicators,
//! narrow it with filters and present summaries, rankings, trends and maps.

pub mod analysis;
pub mod app;
pub mod color;
pub mod config;
pub mod data;
pub mod geo;
pub mod state;
pub mod ui;
