//! rlg-tui: terminal interface for the rlg dungeon crawler.
//!
//! Implements the core's blocking [`rlg_core::Interface`] on top of
//! ratatui/crossterm: map rendering with fog of war, a message line, and
//! the key bindings that translate into core commands.

pub mod app;
pub mod display;
pub mod input;

pub use app::TuiInterface;
