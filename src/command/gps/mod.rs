//! ### GPS Commands
//!
//! A9G vendor commands controlling the integrated GNSS receiver.

pub mod types;

use atat::atat_derive::AtatCmd;
use types::{GpsPower, LocationSource};

use super::NoResponse;

/// Power the GNSS receiver on or off +GPS
#[derive(Clone, AtatCmd)]
#[at_cmd("+GPS", NoResponse)]
pub struct SetGpsPower {
    #[at_arg(position = 0)]
    pub power: GpsPower,
}

/// Periodic NMEA reporting +GPSRD
///
/// Reports NMEA sentences on the AT port every `interval` seconds. An interval
/// of 0 stops reporting.
#[derive(Clone, AtatCmd)]
#[at_cmd("+GPSRD", NoResponse)]
pub struct SetGpsReadInterval {
    #[at_arg(position = 0)]
    pub interval: u8,
}

/// Read the current position +LOCATION
///
/// The reply is a bare `<lat>,<lon>` line, or `GPS NOT FIX NOW` while the
/// receiver has no fix.
#[derive(Clone, AtatCmd)]
#[at_cmd("+LOCATION", NoResponse, timeout_ms = 5000)]
pub struct GetLocation {
    #[at_arg(position = 0)]
    pub source: LocationSource,
}
