use embassy_time::Duration;

use super::reader::contains;
use super::state::SessionState;
use crate::command::Command;

/// What a step's silence or refusal means for its procedure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StepPolicy {
    /// Continue with the next step whatever the modem answered.
    BestEffort,
    /// A later step depends on this reply: no reply is a timeout, a refused
    /// reply fails the procedure.
    Required,
}

/// One command of a procedure, with its own timing.
///
/// The step waits `lead`, writes `command`, waits `settle`, then reads the
/// reply for at most `window`.
#[derive(Clone)]
pub struct SessionStep {
    pub tag: &'static str,
    /// Session state while this step runs
    pub state: SessionState,
    pub command: Command,
    pub lead: Duration,
    pub settle: Duration,
    pub window: Duration,
    pub policy: StepPolicy,
    pub validate: Option<fn(&[u8]) -> bool>,
}

impl SessionStep {
    pub fn new(tag: &'static str, state: SessionState, command: Command) -> Self {
        Self {
            tag,
            state,
            command,
            lead: Duration::from_ticks(0),
            settle: Duration::from_ticks(0),
            window: Duration::from_ticks(0),
            policy: StepPolicy::BestEffort,
            validate: None,
        }
    }

    pub fn lead(mut self, lead: Duration) -> Self {
        self.lead = lead;
        self
    }

    pub fn settle(mut self, settle: Duration) -> Self {
        self.settle = settle;
        self
    }

    pub fn window(mut self, window: Duration) -> Self {
        self.window = window;
        self
    }

    pub fn required(mut self) -> Self {
        self.policy = StepPolicy::Required;
        self
    }

    pub fn validate(mut self, validate: fn(&[u8]) -> bool) -> Self {
        self.validate = Some(validate);
        self
    }

    /// Whether a non-empty reply passes this step's check.
    pub fn accepts(&self, reply: &[u8]) -> bool {
        self.validate.map_or(true, |f| f(reply))
    }
}

impl core::fmt::Debug for SessionStep {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("SessionStep")
            .field("tag", &self.tag)
            .field("state", &self.state)
            .field("command", &self.command)
            .field("lead", &self.lead)
            .field("settle", &self.settle)
            .field("window", &self.window)
            .field("policy", &self.policy)
            .field("validated", &self.validate.is_some())
            .finish()
    }
}

/// The reply holds no error result code.
pub fn no_error(reply: &[u8]) -> bool {
    !contains(reply, b"ERROR")
}

/// The reply holds the `>` text entry prompt.
pub fn prompt(reply: &[u8]) -> bool {
    contains(reply, b">")
}
