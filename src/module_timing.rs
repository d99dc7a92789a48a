//! Default A9G timings. These are the delays the module needs between
//! commands when no machine readable result code is awaited.

use embassy_time::Duration;

/// Time from `AT+GPS=1` until the receiver starts producing positions
pub fn gps_warmup_time() -> Duration {
    Duration::from_millis(1000)
}

/// How long `AT+GPSRD` reporting is left running before it is switched off
pub fn gps_report_time() -> Duration {
    Duration::from_millis(3000)
}

/// Settle time after switching `AT+GPSRD` reporting off
pub fn gps_report_off_time() -> Duration {
    Duration::from_millis(1000)
}

/// Settle time after `AT+LOCATION=2` before the reply is read
pub fn location_time() -> Duration {
    Duration::from_millis(1000)
}

/// Settle time after `AT+CGATT=1`
pub fn attach_time() -> Duration {
    Duration::from_millis(2000)
}

/// Settle time after `AT+CGDCONT`
pub fn context_definition_time() -> Duration {
    Duration::from_millis(2000)
}

/// Settle time after `AT+CGACT`
pub fn context_activation_time() -> Duration {
    Duration::from_millis(1000)
}

/// Settle time after `AT+CMGF`
pub fn message_format_time() -> Duration {
    Duration::from_millis(1000)
}

/// Pause between a finished location read and composing the SMS
pub fn fix_grace_time() -> Duration {
    Duration::from_millis(10000)
}

/// Time for the `>` prompt to follow `AT+CMGS`
pub fn submit_prompt_time() -> Duration {
    Duration::from_millis(2000)
}

/// Settle time after the message body has been written
pub fn message_body_time() -> Duration {
    Duration::from_millis(1000)
}

/// Time the network may take to confirm a submitted message
pub fn send_confirmation_time() -> Duration {
    Duration::from_millis(6000)
}

/// Settle time after `AT+CPMS`
pub fn storage_select_time() -> Duration {
    Duration::from_millis(1000)
}

/// Window used to drain replies of commands whose answer is not used
pub fn drain_time() -> Duration {
    Duration::from_millis(100)
}
