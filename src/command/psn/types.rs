//! Argument and parameter types used by Packet Switched Data Services Commands
use atat::atat_derive::AtatEnum;

#[derive(Debug, Clone, PartialEq, AtatEnum)]
pub enum GPRSAttachedState {
    Detached = 0,
    Attached = 1,
}

#[derive(Debug, Clone, PartialEq, AtatEnum)]
pub enum PDPContextStatus {
    Deactivated = 0,
    Activated = 1,
}

/// Packet data protocol of a context definition
pub const PDP_TYPE_IP: &str = "IP";
