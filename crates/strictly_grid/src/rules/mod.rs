//! Game rules for N×N tic-tac-toe.
//!
//! Pure functions over a [`Board`](super::Board); they never mutate state.

pub mod draw;
pub mod win;

pub use draw::is_full;
pub use win::{Line, all_lines, check_winner, completes_line};
