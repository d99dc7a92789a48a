//! AT Commands for the A9G GPRS/GPS module
//!
//! Commands are declared as `atat` command structs, grouped the way the
//! module's AT manual groups them. [`encode`] turns a [`CommandKind`] into the
//! exact bytes put on the wire.

pub mod gps;
pub mod psn;
pub mod sms;

use atat::atat_derive::AtatResp;
use atat::AtatCmd;
use heapless::Vec;

use crate::config::{MAX_APN_LEN, MAX_COMMAND_LEN, MAX_LINK_LEN, MAX_PHONE_LEN};
use crate::error::Error;

use gps::types::{GpsPower, LocationSource};
use psn::types::{GPRSAttachedState, PDPContextStatus, PDP_TYPE_IP};
use sms::types::{DeleteFlag, MessageFormat, STORAGE_ME};

/// Ctrl-Z, ends the text of a message in text mode
pub const CTRL_Z: u8 = 0x1A;

/// ESC, aborts a message in text mode
pub const ESC: u8 = 0x1B;

#[derive(Clone, AtatResp)]
pub struct NoResponse;

/// End-of-command sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Terminator {
    /// `\r\n`, ends every AT command line
    CrLf,
    /// Single Ctrl-Z byte submitting a message
    CtrlZ,
    /// Raw payload written at the `>` prompt
    None,
}

impl Terminator {
    pub const fn as_bytes(&self) -> &'static [u8] {
        match self {
            Self::CrLf => b"\r\n",
            Self::CtrlZ => &[CTRL_Z],
            Self::None => &[],
        }
    }
}

/// Encoded command, ready to be written once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    bytes: Vec<u8, MAX_COMMAND_LEN>,
    body_len: usize,
    terminator: Terminator,
}

impl Command {
    fn new(body: &[u8], terminator: Terminator) -> Result<Self, Error> {
        let mut bytes = Vec::new();
        bytes.extend_from_slice(body).map_err(|_| Error::Overflow)?;
        bytes
            .extend_from_slice(terminator.as_bytes())
            .map_err(|_| Error::Overflow)?;

        Ok(Self {
            bytes,
            body_len: body.len(),
            terminator,
        })
    }

    /// Serialize an `atat` command struct, `AT` prefix and `\r\n` included.
    pub fn from_at<Cmd: AtatCmd>(cmd: &Cmd) -> Result<Self, Error> {
        if Cmd::MAX_LEN > MAX_COMMAND_LEN {
            return Err(Error::Overflow);
        }

        let mut buf = [0u8; MAX_COMMAND_LEN];
        let len = cmd.write(&mut buf);
        let line = &buf[..len];
        let body = line.strip_suffix(b"\r\n").unwrap_or(line);

        Self::new(body, Terminator::CrLf)
    }

    /// Text written at the `>` prompt of `AT+CMGS`.
    pub fn message_body(text: &str) -> Result<Self, Error> {
        if text.is_empty()
            || text.len() > MAX_LINK_LEN
            || text.bytes().any(|b| b == CTRL_Z || b == ESC)
        {
            return Err(Error::InvalidParameter);
        }

        Self::new(text.as_bytes(), Terminator::None)
    }

    /// The lone Ctrl-Z byte that submits a message.
    pub fn submit() -> Self {
        Self {
            bytes: Vec::from_slice(&[CTRL_Z]).unwrap_or_default(),
            body_len: 0,
            terminator: Terminator::CtrlZ,
        }
    }

    pub fn body(&self) -> &[u8] {
        &self.bytes[..self.body_len]
    }

    pub fn terminator(&self) -> Terminator {
        self.terminator
    }

    /// Body and terminator, exactly as written to the modem.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// Everything the driver ever asks of the modem.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandKind<'a> {
    EnableGps,
    DisableGps,
    /// Periodic NMEA output every `interval` seconds
    StartGpsReport { interval: u8 },
    StopGpsReport,
    ReadLocation,

    AttachPacketService,
    DetachPacketService,
    DefineContext { cid: u8, apn: &'a str },
    ActivateContext { cid: u8 },
    DeactivateContext { cid: u8 },

    TextMode,
    PduMode,
    SubmitMessage { recipient: &'a str },
    MessageBody { text: &'a str },
    SubmitTerminator,
    SelectStorage,
    DeleteAllMessages,
}

/// Build the wire form of `kind`. Never touches the transport.
pub fn encode(kind: CommandKind<'_>) -> Result<Command, Error> {
    match kind {
        CommandKind::EnableGps => Command::from_at(&gps::SetGpsPower {
            power: GpsPower::On,
        }),
        CommandKind::DisableGps => Command::from_at(&gps::SetGpsPower {
            power: GpsPower::Off,
        }),
        CommandKind::StartGpsReport { interval } => {
            if interval == 0 {
                return Err(Error::InvalidParameter);
            }
            Command::from_at(&gps::SetGpsReadInterval { interval })
        }
        CommandKind::StopGpsReport => Command::from_at(&gps::SetGpsReadInterval { interval: 0 }),
        CommandKind::ReadLocation => Command::from_at(&gps::GetLocation {
            source: LocationSource::Gps,
        }),

        CommandKind::AttachPacketService => Command::from_at(&psn::SetGPRSAttached {
            state: GPRSAttachedState::Attached,
        }),
        CommandKind::DetachPacketService => Command::from_at(&psn::SetGPRSAttached {
            state: GPRSAttachedState::Detached,
        }),
        CommandKind::DefineContext { cid, apn } => {
            validate_apn(apn)?;
            Command::from_at(&psn::SetPDPContextDefinition {
                cid,
                pdp_type: PDP_TYPE_IP,
                apn,
            })
        }
        CommandKind::ActivateContext { cid } => Command::from_at(&psn::SetPDPContextState {
            status: PDPContextStatus::Activated,
            cid,
        }),
        CommandKind::DeactivateContext { cid } => Command::from_at(&psn::SetPDPContextState {
            status: PDPContextStatus::Deactivated,
            cid,
        }),

        CommandKind::TextMode => Command::from_at(&sms::SetMessageFormat {
            format: MessageFormat::Text,
        }),
        CommandKind::PduMode => Command::from_at(&sms::SetMessageFormat {
            format: MessageFormat::Pdu,
        }),
        CommandKind::SubmitMessage { recipient } => {
            validate_recipient(recipient)?;
            Command::from_at(&sms::SendMessage {
                destination: recipient,
            })
        }
        CommandKind::MessageBody { text } => Command::message_body(text),
        CommandKind::SubmitTerminator => Ok(Command::submit()),
        CommandKind::SelectStorage => Command::from_at(&sms::SetPreferredStorage {
            storage: STORAGE_ME,
        }),
        CommandKind::DeleteAllMessages => Command::from_at(&sms::DeleteMessage {
            index: 1,
            flag: DeleteFlag::All,
        }),
    }
}

/// Destination address: optional leading `+`, then digits only.
fn validate_recipient(recipient: &str) -> Result<(), Error> {
    let digits = recipient.strip_prefix('+').unwrap_or(recipient);

    if digits.is_empty()
        || recipient.len() > MAX_PHONE_LEN
        || !digits.bytes().all(|b| b.is_ascii_digit())
    {
        return Err(Error::InvalidParameter);
    }
    Ok(())
}

/// Access point names are dot separated labels of letters, digits and `-`.
/// `_` is tolerated since several operators use it.
fn validate_apn(apn: &str) -> Result<(), Error> {
    if apn.is_empty()
        || apn.len() > MAX_APN_LEN
        || !apn
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || matches!(b, b'.' | b'-' | b'_'))
    {
        return Err(Error::InvalidParameter);
    }
    Ok(())
}
