//! Receive side of the serial link.
//!
//! All modem output lands in one [`ReceiveBuffer`] owned by the
//! [`ResponseReader`]. A read leases the buffer for its duration and hands the
//! caller a [`ModemResponse`] that borrows the reader, so the next read cannot
//! start before the previous response is gone.

use embassy_sync::blocking_mutex::raw::NoopRawMutex;
use embassy_sync::mutex::{Mutex, MutexGuard};
use embassy_futures::select::{select, Either};
use embassy_time::{Duration, Instant, Timer};
use embedded_io_async::{Error as _, Read};
use heapless::Vec;

use crate::error::Error;

pub struct ReceiveBuffer<const N: usize> {
    data: [u8; N],
    len: usize,
}

impl<const N: usize> Default for ReceiveBuffer<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> ReceiveBuffer<N> {
    pub const fn new() -> Self {
        Self {
            data: [0; N],
            len: 0,
        }
    }

    pub const fn capacity(&self) -> usize {
        N
    }

    /// Check the buffer out for a new read, discarding what it held.
    fn lease(&mut self) -> Lease<'_, N> {
        self.len = 0;
        Lease {
            buffer: Some(self),
            filled: 0,
        }
    }
}

/// Exclusive use of the receive buffer by one read. Dropping an uncommitted
/// lease leaves the buffer empty.
struct Lease<'a, const N: usize> {
    buffer: Option<&'a mut ReceiveBuffer<N>>,
    filled: usize,
}

impl<'a, const N: usize> Lease<'a, N> {
    fn space(&mut self) -> &mut [u8] {
        match self.buffer.as_mut() {
            Some(b) => &mut b.data[self.filled..],
            None => &mut [],
        }
    }

    fn advance(&mut self, n: usize) {
        self.filled = (self.filled + n).min(N);
    }

    fn is_full(&self) -> bool {
        self.filled >= N
    }

    fn commit(mut self, discarded: usize) -> ModemResponse<'a> {
        match self.buffer.take() {
            Some(buffer) => {
                buffer.len = self.filled;
                let buffer: &'a ReceiveBuffer<N> = buffer;
                ModemResponse {
                    bytes: &buffer.data[..self.filled],
                    discarded,
                }
            }
            None => ModemResponse::empty(),
        }
    }
}

impl<const N: usize> Drop for Lease<'_, N> {
    fn drop(&mut self) {
        if let Some(buffer) = self.buffer.take() {
            buffer.len = 0;
        }
    }
}

/// Bytes captured by one read. Zero bytes means nothing arrived within the
/// window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModemResponse<'a> {
    bytes: &'a [u8],
    discarded: usize,
}

impl<'a> ModemResponse<'a> {
    pub const fn empty() -> Self {
        Self {
            bytes: &[],
            discarded: 0,
        }
    }

    pub fn as_bytes(&self) -> &'a [u8] {
        self.bytes
    }

    /// The response as text, if it is valid UTF-8.
    pub fn as_str(&self) -> Option<&'a str> {
        core::str::from_utf8(self.bytes).ok()
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Bytes that arrived after the buffer was full and were thrown away.
    pub fn discarded(&self) -> usize {
        self.discarded
    }

    pub fn contains(&self, needle: &[u8]) -> bool {
        contains(self.bytes, needle)
    }

    /// Copy out the first `M` bytes at most.
    pub fn to_vec<const M: usize>(&self) -> Vec<u8, M> {
        let n = self.bytes.len().min(M);
        let mut v = Vec::new();
        v.extend_from_slice(&self.bytes[..n]).ok();
        v
    }
}

pub(crate) fn contains(haystack: &[u8], needle: &[u8]) -> bool {
    needle.is_empty() || haystack.windows(needle.len()).any(|w| w == needle)
}

pub struct ResponseReader<R: Read, const N: usize> {
    rx: R,
    buffer: ReceiveBuffer<N>,
}

impl<R: Read, const N: usize> ResponseReader<R, N> {
    pub fn new(rx: R) -> Self {
        Self {
            rx,
            buffer: ReceiveBuffer::new(),
        }
    }

    pub fn capacity(&self) -> usize {
        self.buffer.capacity()
    }

    /// Collect modem output for at most `max_wait`.
    ///
    /// Returns early when the buffer is full or the stream ends. Once full,
    /// anything else arriving inside the window is read and dropped so that
    /// it cannot leak into the next response. A transport error empties the
    /// buffer and is returned.
    pub async fn read_response(&mut self, max_wait: Duration) -> Result<ModemResponse<'_>, Error> {
        let deadline = Instant::now()
            .checked_add(max_wait)
            .unwrap_or(Instant::MAX);
        let mut lease = self.buffer.lease();

        while !lease.is_full() {
            match select(self.rx.read(lease.space()), Timer::at(deadline)).await {
                Either::First(Ok(0)) => break,
                Either::First(Ok(n)) => lease.advance(n),
                Either::First(Err(e)) => return Err(Error::Transport(e.kind())),
                Either::Second(()) => break,
            }
        }

        let mut discarded = 0;
        if lease.is_full() {
            let mut scratch = [0u8; 32];
            loop {
                match select(self.rx.read(&mut scratch), Timer::at(deadline)).await {
                    Either::First(Ok(0)) | Either::Second(()) => break,
                    Either::First(Ok(n)) => discarded += n,
                    Either::First(Err(e)) => return Err(Error::Transport(e.kind())),
                }
            }
            if discarded > 0 {
                warn!("[RX_TASK] Response truncated, dropped {} bytes", discarded);
            }
        }

        let response = lease.commit(discarded);
        debug!("[RX_TASK] Read {} bytes", response.len());
        Ok(response)
    }
}

/// Shared reference to the mutex guarding the reader.
pub struct ReaderHandle<'d, R: Read, const N: usize>(
    pub(crate) &'d Mutex<NoopRawMutex, ResponseReader<R, N>>,
);

impl<R: Read, const N: usize> Clone for ReaderHandle<'_, R, N> {
    fn clone(&self) -> Self {
        Self(self.0)
    }
}

impl<'d, R: Read, const N: usize> ReaderHandle<'d, R, N> {
    /// Wait until no other read is outstanding.
    pub async fn acquire(&self) -> MutexGuard<'d, NoopRawMutex, ResponseReader<R, N>> {
        self.0.lock().await
    }

    /// Take the reader only if it is free.
    pub fn try_acquire(&self) -> Result<MutexGuard<'d, NoopRawMutex, ResponseReader<R, N>>, Error> {
        self.0.try_lock().map_err(|_| Error::BufferBusy)
    }
}
