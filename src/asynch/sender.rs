use embedded_io_async::{Error as _, ErrorKind, Write};

use crate::command::Command;
use crate::error::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SendResult {
    pub bytes_written: usize,
}

/// Transmit side of the serial link.
pub struct Sender<W: Write> {
    tx: W,
}

impl<W: Write> Sender<W> {
    pub fn new(tx: W) -> Self {
        Self { tx }
    }

    /// Put `cmd` on the wire in a single write.
    ///
    /// A write accepting fewer bytes than the command holds is reported as a
    /// transport error. Nothing is retried here.
    pub async fn send(&mut self, tag: &str, cmd: &Command) -> Result<SendResult, Error> {
        let bytes = cmd.as_bytes();

        let written = self
            .tx
            .write(bytes)
            .await
            .map_err(|e| Error::Transport(e.kind()))?;

        if written < bytes.len() {
            error!("[{}] Short write: {} of {} bytes", tag, written, bytes.len());
            return Err(Error::Transport(ErrorKind::WriteZero));
        }

        self.tx
            .flush()
            .await
            .map_err(|e| Error::Transport(e.kind()))?;

        info!("[{}] Wrote {} bytes", tag, written);
        Ok(SendResult {
            bytes_written: written,
        })
    }
}
