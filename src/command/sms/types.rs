//! Argument and parameter types used by Short Messages Service Commands
use atat::atat_derive::AtatEnum;

#[derive(Debug, Clone, PartialEq, AtatEnum)]
pub enum MessageFormat {
    Pdu = 0,
    Text = 1,
}

/// Which messages `+CMGD` removes besides the one at the given index
#[derive(Debug, Clone, PartialEq, AtatEnum)]
pub enum DeleteFlag {
    /// Only the message at the given index
    Indexed = 0,
    /// All read messages
    Read = 1,
    /// All read and sent messages
    ReadAndSent = 2,
    /// All read, sent and unsent messages
    ReadSentAndUnsent = 3,
    /// All messages
    All = 4,
}

/// Mobile equipment message storage
pub const STORAGE_ME: &str = "ME";
