// libs/appointment-cell/src/services/lifecycle.rs
use chrono::{Duration, NaiveDate};
use tracing::{debug, warn};

use crate::models::AppointmentError;

/// Calendar-day rules governing when an appointment may be created or
/// changed. All comparisons are on whole dates; there is no time-of-day
/// component anywhere in the scheduling model.
#[derive(Debug, Clone)]
pub struct SchedulingWindowRules {
    pub change_lockout_days: i64,
}

impl Default for SchedulingWindowRules {
    fn default() -> Self {
        Self {
            change_lockout_days: 2, // 48-hour lockout before the appointment
        }
    }
}

pub struct AppointmentLifecycleService {
    rules: SchedulingWindowRules,
}

impl AppointmentLifecycleService {
    pub fn new() -> Self {
        Self {
            rules: SchedulingWindowRules::default(),
        }
    }

    pub fn with_rules(rules: SchedulingWindowRules) -> Self {
        Self { rules }
    }

    /// A new appointment must be dated strictly after the day it is booked.
    pub fn validate_booking_date(
        &self,
        timing: NaiveDate,
        today: NaiveDate,
    ) -> Result<(), AppointmentError> {
        debug!("Validating booking date {} against today {}", timing, today);

        if timing <= today {
            warn!("Rejected booking for non-future date {}", timing);
            return Err(AppointmentError::DateNotAcceptable(
                "Appointment date must be strictly in the future".to_string(),
            ));
        }

        Ok(())
    }

    /// Reschedule and cancel are blocked inside the lockout window, the
    /// `change_lockout_days` calendar days immediately before the
    /// appointment. Both bounds are strict: on the day the window opens the
    /// change is still allowed, and on or after the appointment date the
    /// window no longer applies.
    pub fn validate_change_window(
        &self,
        timing: NaiveDate,
        today: NaiveDate,
    ) -> Result<(), AppointmentError> {
        let window_opens = timing - Duration::days(self.rules.change_lockout_days);
        debug!(
            "Validating change window for appointment on {}: locked after {}",
            timing, window_opens
        );

        if today > window_opens && today < timing {
            warn!("Rejected change inside the lockout window for appointment on {}", timing);
            return Err(AppointmentError::DateNotAcceptable(format!(
                "Cannot reschedule or cancel within {} hours of the appointment",
                self.rules.change_lockout_days * 24,
            )));
        }

        Ok(())
    }
}

impl Default for AppointmentLifecycleService {
    fn default() -> Self {
        Self::new()
    }
}
