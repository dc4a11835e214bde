//! Data models

mod booking_settings;
mod booking_window;
mod organization;
mod working_hours;

pub use booking_settings::*;
pub use booking_window::*;
pub use organization::*;
pub use working_hours::*;
