use embedded_io_async::ErrorKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum Error {
    // Local construction errors, never retried
    InvalidParameter,
    Overflow,

    // Serial link errors
    Transport(ErrorKind),

    // Modem behaviour
    Timeout,
    Rejected,
    IncompleteFix,

    // Session errors
    Cancelled,
    NotIdle,

    /// The receive buffer was found checked out by another read. This breaks
    /// the single-owner invariant of the reader and is never recoverable.
    BufferBusy,
}

impl Error {
    /// Errors that indicate a broken driver invariant rather than a modem or
    /// link condition.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::BufferBusy)
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for Error {
    fn format(&self, f: defmt::Formatter<'_>) {
        match self {
            Self::InvalidParameter => defmt::write!(f, "InvalidParameter"),
            Self::Overflow => defmt::write!(f, "Overflow"),
            Self::Transport(e) => defmt::write!(f, "Transport({:?})", e),
            Self::Timeout => defmt::write!(f, "Timeout"),
            Self::Rejected => defmt::write!(f, "Rejected"),
            Self::IncompleteFix => defmt::write!(f, "IncompleteFix"),
            Self::Cancelled => defmt::write!(f, "Cancelled"),
            Self::NotIdle => defmt::write!(f, "NotIdle"),
            Self::BufferBusy => defmt::write!(f, "BufferBusy"),
        }
    }
}

impl From<ErrorKind> for Error {
    fn from(e: ErrorKind) -> Self {
        Self::Transport(e)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn buffer_busy_is_the_only_fatal_error() {
        assert!(Error::BufferBusy.is_fatal());
        assert!(!Error::Timeout.is_fatal());
        assert!(!Error::Transport(ErrorKind::BrokenPipe).is_fatal());
    }

    #[test]
    fn transport_kind_converts() {
        let e: Error = ErrorKind::TimedOut.into();
        assert_eq!(e, Error::Transport(ErrorKind::TimedOut));
    }
}
