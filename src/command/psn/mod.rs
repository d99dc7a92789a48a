//! ### Packet Switched Data Services Commands
//!
//! Attach to the packet domain, define the PDP context used for data and
//! activate it. The A9G accepts the 3GPP syntax unchanged.

pub mod types;

use atat::atat_derive::AtatCmd;
use types::{GPRSAttachedState, PDPContextStatus};

use super::NoResponse;

/// PDP context definition +CGDCONT
///
/// Defines the connection parameters for a PDP context, identified by the
/// local context identification parameter <cid>.
#[derive(Clone, AtatCmd)]
#[at_cmd("+CGDCONT", NoResponse)]
pub struct SetPDPContextDefinition<'a> {
    #[at_arg(position = 0)]
    pub cid: u8,
    #[at_arg(position = 1, len = 6)]
    pub pdp_type: &'a str,
    #[at_arg(position = 2, len = 63)]
    pub apn: &'a str,
}

/// Set GPRS attach or detach +CGATT
///
/// Register (attach) the MT to, or deregister (detach) the MT from the GPRS
/// service. Any active PDP context is deactivated when the registration state
/// changes to detached.
#[derive(Clone, AtatCmd)]
#[at_cmd("+CGATT", NoResponse, attempts = 1, timeout_ms = 180000)]
pub struct SetGPRSAttached {
    #[at_arg(position = 0)]
    pub state: GPRSAttachedState,
}

/// PDP context activate or deactivate +CGACT
///
/// If the MT is not GPRS attached when activation is requested, it first
/// performs a GPRS attach.
#[derive(Clone, AtatCmd)]
#[at_cmd("+CGACT", NoResponse, attempts = 1, timeout_ms = 150000)]
pub struct SetPDPContextState {
    #[at_arg(position = 0)]
    pub status: PDPContextStatus,
    #[at_arg(position = 1)]
    pub cid: u8,
}
