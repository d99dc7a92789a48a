//! Step plans of every modem procedure.
//!
//! Plans are built, and therefore encoded, before anything is written, so a
//! bad parameter fails the procedure without touching the modem.

use super::state::SessionState;
use super::step::{self, SessionStep};
use crate::command::{encode, CommandKind};
use crate::config::Timing;
use crate::error::Error;

pub const GPS_TAG: &str = "GPS_TASK";
pub const LOCATION_TAG: &str = "getLocation";
pub const GPRSGSM_TAG: &str = "GPRSGSM_TASK";
pub const SMS_TAG: &str = "sms_TASK";
pub const SMS_DISABLE_TAG: &str = "Disable_SMS";
pub const SEND_LOCATION_TAG: &str = "Location_SMS";
pub const DELETE_MESSAGE_TAG: &str = "Message_Deleted";

/// Seconds between NMEA reports while the receiver is being read
pub const GPS_REPORT_INTERVAL: u8 = 1;

pub struct GpsPlan {
    /// Power on, start reporting, stop reporting
    pub setup: [SessionStep; 3],
    /// Location read whose reply becomes the fix
    pub read: SessionStep,
    /// Power off, always attempted
    pub power_off: SessionStep,
}

pub fn gps_acquisition(timing: &Timing) -> Result<GpsPlan, Error> {
    Ok(GpsPlan {
        setup: [
            SessionStep::new(GPS_TAG, SessionState::GpsWarmup, encode(CommandKind::EnableGps)?)
                .settle(timing.gps_warmup)
                .window(timing.drain),
            SessionStep::new(
                LOCATION_TAG,
                SessionState::GpsReading,
                encode(CommandKind::StartGpsReport {
                    interval: GPS_REPORT_INTERVAL,
                })?,
            )
            .settle(timing.gps_report)
            .window(timing.drain),
            SessionStep::new(
                LOCATION_TAG,
                SessionState::GpsReading,
                encode(CommandKind::StopGpsReport)?,
            )
            .settle(timing.gps_report_off)
            .window(timing.drain),
        ],
        read: SessionStep::new(
            LOCATION_TAG,
            SessionState::GpsReading,
            encode(CommandKind::ReadLocation)?,
        )
        .settle(timing.location_settle)
        .window(timing.location_window)
        .required(),
        power_off: SessionStep::new(
            GPS_TAG,
            SessionState::GpsCooldown,
            encode(CommandKind::DisableGps)?,
        )
        .window(timing.drain),
    })
}

/// Attach, define the context, activate it. The A9G gives no dependable
/// result codes here, each step is only given time to settle.
pub fn network_attach(apn: &str, cid: u8, timing: &Timing) -> Result<[SessionStep; 3], Error> {
    Ok([
        SessionStep::new(
            GPRSGSM_TAG,
            SessionState::NetworkAttaching,
            encode(CommandKind::AttachPacketService)?,
        )
        .settle(timing.attach)
        .window(timing.drain),
        SessionStep::new(
            GPRSGSM_TAG,
            SessionState::NetworkAttaching,
            encode(CommandKind::DefineContext { cid, apn })?,
        )
        .settle(timing.context_definition)
        .window(timing.drain),
        SessionStep::new(
            GPRSGSM_TAG,
            SessionState::NetworkAttaching,
            encode(CommandKind::ActivateContext { cid })?,
        )
        .settle(timing.context_activation)
        .window(timing.drain),
    ])
}

/// Deactivate the context, then detach.
pub fn network_detach(cid: u8, timing: &Timing) -> Result<[SessionStep; 2], Error> {
    Ok([
        SessionStep::new(
            GPRSGSM_TAG,
            SessionState::NetworkDetaching,
            encode(CommandKind::DeactivateContext { cid })?,
        )
        .settle(timing.context_activation)
        .window(timing.drain),
        SessionStep::new(
            GPRSGSM_TAG,
            SessionState::NetworkDetaching,
            encode(CommandKind::DetachPacketService)?,
        )
        .settle(timing.attach)
        .window(timing.drain),
    ])
}

pub struct SmsPlan {
    pub text_mode: SessionStep,
    /// `AT+CMGS`, preceded by the fix grace delay
    pub submit: SessionStep,
    pub terminator: SessionStep,
    /// Back to PDU mode, always attempted
    pub text_mode_off: SessionStep,
}

pub fn sms_submission(recipient: &str, timing: &Timing) -> Result<SmsPlan, Error> {
    Ok(SmsPlan {
        text_mode: SessionStep::new(
            SMS_TAG,
            SessionState::SmsConfiguring,
            encode(CommandKind::TextMode)?,
        )
        .settle(timing.message_format)
        .window(timing.drain),
        submit: SessionStep::new(
            SEND_LOCATION_TAG,
            SessionState::SmsComposing,
            encode(CommandKind::SubmitMessage { recipient })?,
        )
        .lead(timing.fix_grace)
        .settle(timing.submit_prompt)
        .window(timing.drain)
        .validate(step::prompt),
        terminator: SessionStep::new(
            SEND_LOCATION_TAG,
            SessionState::SmsComposing,
            encode(CommandKind::SubmitTerminator)?,
        )
        .window(timing.send_confirmation)
        .required()
        .validate(step::no_error),
        text_mode_off: SessionStep::new(
            SMS_DISABLE_TAG,
            SessionState::Disabling,
            encode(CommandKind::PduMode)?,
        )
        .window(timing.drain),
    })
}

/// The text written at the `>` prompt.
pub fn message_body(text: &str, timing: &Timing) -> Result<SessionStep, Error> {
    Ok(SessionStep::new(
        SEND_LOCATION_TAG,
        SessionState::SmsComposing,
        encode(CommandKind::MessageBody { text })?,
    )
    .settle(timing.message_body)
    .window(timing.drain))
}

/// Select ME storage and delete everything in it.
pub fn storage_cleanup(timing: &Timing) -> Result<[SessionStep; 2], Error> {
    Ok([
        SessionStep::new(
            DELETE_MESSAGE_TAG,
            SessionState::ClearingStorage,
            encode(CommandKind::SelectStorage)?,
        )
        .settle(timing.storage_select)
        .window(timing.drain),
        SessionStep::new(
            DELETE_MESSAGE_TAG,
            SessionState::ClearingStorage,
            encode(CommandKind::DeleteAllMessages)?,
        )
        .window(timing.drain),
    ])
}

/// Switch off everything a procedure may have left on.
pub fn disable_features(timing: &Timing) -> Result<[SessionStep; 2], Error> {
    Ok([
        SessionStep::new(GPS_TAG, SessionState::Disabling, encode(CommandKind::DisableGps)?)
            .window(timing.drain),
        SessionStep::new(
            SMS_DISABLE_TAG,
            SessionState::Disabling,
            encode(CommandKind::PduMode)?,
        )
        .window(timing.drain),
    ])
}
