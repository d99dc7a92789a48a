//! ### Short Messages Service
//!
//! Only text mode submission is used: `AT+CMGS="<da>"`, wait for the `>`
//! prompt, write the text and close it with Ctrl-Z.

pub mod types;

use atat::atat_derive::AtatCmd;
use types::{DeleteFlag, MessageFormat};

use super::NoResponse;

/// Message format +CMGF
#[derive(Clone, AtatCmd)]
#[at_cmd("+CMGF", NoResponse)]
pub struct SetMessageFormat {
    #[at_arg(position = 0)]
    pub format: MessageFormat,
}

/// Send message +CMGS
///
/// In text mode the command line carries the destination address only. The
/// module answers with a `>` prompt, after which the text is written and
/// terminated with Ctrl-Z.
#[derive(Clone, AtatCmd)]
#[at_cmd("+CMGS", NoResponse, timeout_ms = 60000)]
pub struct SendMessage<'a> {
    #[at_arg(position = 0, len = 20)]
    pub destination: &'a str,
}

/// Preferred message storage +CPMS
#[derive(Clone, AtatCmd)]
#[at_cmd("+CPMS", NoResponse)]
pub struct SetPreferredStorage<'a> {
    #[at_arg(position = 0, len = 2)]
    pub storage: &'a str,
}

/// Delete message +CMGD
#[derive(Clone, AtatCmd)]
#[at_cmd("+CMGD", NoResponse, timeout_ms = 55000)]
pub struct DeleteMessage {
    #[at_arg(position = 0)]
    pub index: u8,
    #[at_arg(position = 1)]
    pub flag: DeleteFlag,
}
