//! Business logic services

pub mod booking_window;

pub use booking_window::{evaluate, evaluate_raw, BookingWindowService};
