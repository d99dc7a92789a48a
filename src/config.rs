use embassy_time::Duration;

use crate::module_timing;

/// Longest command line the encoder will produce, terminator included.
pub const MAX_COMMAND_LEN: usize = 256;

/// Longest destination address accepted by `AT+CMGS`.
pub const MAX_PHONE_LEN: usize = 20;

/// Longest access point name accepted by `AT+CGDCONT`.
pub const MAX_APN_LEN: usize = 63;

/// Longest single coordinate token taken from a location reply.
pub const MAX_COORD_LEN: usize = 16;

/// Longest map link that is sent, one single-part text message.
pub const MAX_LINK_LEN: usize = 160;

pub const DEFAULT_APN: &str = "hologram";

/// Settle delays and response windows of every procedure step.
///
/// A settle delay is the time waited after a command is written and before the
/// reply is read. A window bounds the read itself.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Timing {
    pub gps_warmup: Duration,
    pub gps_report: Duration,
    pub gps_report_off: Duration,
    pub location_settle: Duration,
    pub location_window: Duration,

    pub attach: Duration,
    pub context_definition: Duration,
    pub context_activation: Duration,

    pub message_format: Duration,
    pub fix_grace: Duration,
    pub submit_prompt: Duration,
    pub message_body: Duration,
    pub send_confirmation: Duration,
    pub storage_select: Duration,

    pub drain: Duration,
}

impl Default for Timing {
    fn default() -> Self {
        Self {
            gps_warmup: module_timing::gps_warmup_time(),
            gps_report: module_timing::gps_report_time(),
            gps_report_off: module_timing::gps_report_off_time(),
            location_settle: module_timing::location_time(),
            location_window: module_timing::location_time(),

            attach: module_timing::attach_time(),
            context_definition: module_timing::context_definition_time(),
            context_activation: module_timing::context_activation_time(),

            message_format: module_timing::message_format_time(),
            fix_grace: module_timing::fix_grace_time(),
            submit_prompt: module_timing::submit_prompt_time(),
            message_body: module_timing::message_body_time(),
            send_confirmation: module_timing::send_confirmation_time(),
            storage_select: module_timing::storage_select_time(),

            drain: module_timing::drain_time(),
        }
    }
}

impl Timing {
    /// Every delay and window set to `d`. Mostly useful against simulated
    /// modems.
    pub const fn uniform(d: Duration) -> Self {
        Self {
            gps_warmup: d,
            gps_report: d,
            gps_report_off: d,
            location_settle: d,
            location_window: d,
            attach: d,
            context_definition: d,
            context_activation: d,
            message_format: d,
            fix_grace: d,
            submit_prompt: d,
            message_body: d,
            send_confirmation: d,
            storage_select: d,
            drain: d,
        }
    }
}

#[derive(Debug, Clone)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Config<'a> {
    /// Access point name of the packet data context
    pub apn: &'a str,
    /// Destination address of the location message
    pub recipient: &'a str,
    pub context_id: u8,
    pub timing: Timing,

    /// Attach to packet service before the location message is sent
    pub attach_network: bool,
    /// Wipe the message storage after a successful send
    pub clear_storage_after_send: bool,
}

impl<'a> Config<'a> {
    pub fn new(recipient: &'a str) -> Self {
        Self {
            recipient,
            ..Default::default()
        }
    }

    pub fn apn(mut self, apn: &'a str) -> Self {
        self.apn = apn;
        self
    }

    pub fn timing(mut self, timing: Timing) -> Self {
        self.timing = timing;
        self
    }

    pub fn attach_network(mut self, attach: bool) -> Self {
        self.attach_network = attach;
        self
    }

    pub fn clear_storage_after_send(mut self, clear: bool) -> Self {
        self.clear_storage_after_send = clear;
        self
    }
}

impl Default for Config<'_> {
    fn default() -> Self {
        Self {
            apn: DEFAULT_APN,
            recipient: "",
            context_id: 1,
            timing: Timing::default(),
            attach_network: false,
            clear_storage_after_send: false,
        }
    }
}
