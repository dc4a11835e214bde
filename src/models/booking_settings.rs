//! Booking policy model

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Upper bound for hour-based settings (one year)
pub const MAX_POLICY_HOURS: u32 = 8760;

/// Organization-level booking policy
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingPolicy {
    /// Minimum lead time in hours between "now" and a booking's start
    #[serde(default)]
    pub buffer_start_time: u32,
    /// Maximum booking length in hours; `None` means unlimited
    #[serde(default)]
    pub max_booking_length: Option<u32>,
    /// Fully closed days in the middle of a booking do not count toward its length
    #[serde(default)]
    pub max_booking_length_skip_closed_days: bool,
    /// Bookings must carry at least one tag (enforced by the booking form)
    #[serde(default)]
    pub tags_required: bool,
}

impl BookingPolicy {
    pub fn with_buffer(mut self, hours: u32) -> Self {
        self.buffer_start_time = hours;
        self
    }

    pub fn with_max_length(mut self, hours: u32, skip_closed_days: bool) -> Self {
        self.max_booking_length = Some(hours);
        self.max_booking_length_skip_closed_days = skip_closed_days;
        self
    }
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateBookingSettingsRequest {
    #[serde(default)]
    #[validate(range(max = 8760))]
    pub buffer_start_time: u32,
    #[serde(default)]
    #[validate(range(min = 1, max = 8760))]
    pub max_booking_length: Option<u32>,
    #[serde(default)]
    pub max_booking_length_skip_closed_days: bool,
    #[serde(default)]
    pub tags_required: bool,
}

impl From<UpdateBookingSettingsRequest> for BookingPolicy {
    fn from(req: UpdateBookingSettingsRequest) -> Self {
        Self {
            buffer_start_time: req.buffer_start_time,
            max_booking_length: req.max_booking_length,
            max_booking_length_skip_closed_days: req.max_booking_length_skip_closed_days,
            tags_required: req.tags_required,
        }
    }
}
