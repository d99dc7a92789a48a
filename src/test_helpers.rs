//! Simulated A9G serial link for unit tests.

use core::cell::{Cell, RefCell};
use core::future::Future;
use std::collections::VecDeque;
use std::sync::Once;
use std::vec::Vec;

use embassy_time::{Duration, Timer};
use embedded_io_async::{ErrorKind, ErrorType, Read, Write};

static INIT: Once = Once::new();

pub fn init_logger() {
    INIT.call_once(|| {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("trace"))
            .is_test(true)
            .init();
    });
}

pub fn block_on<F: Future>(fut: F) -> F::Output {
    init_logger();
    embassy_futures::block_on(fut)
}

/// Both ends of a serial link to a fake modem.
///
/// Every write is recorded, including failed ones. A write starting with a
/// registered prefix queues the matching reply for the read side.
pub struct MockModem {
    rx: RefCell<VecDeque<u8>>,
    writes: RefCell<Vec<Vec<u8>>>,
    replies: RefCell<Vec<(Vec<u8>, Vec<u8>)>>,
    failing_prefix: RefCell<Option<Vec<u8>>>,
    read_error: Cell<Option<ErrorKind>>,
    closed: Cell<bool>,
    chunk_size: usize,
    short_writes: bool,
    reads_in_flight: Cell<usize>,
    max_reads_in_flight: Cell<usize>,
}

impl MockModem {
    pub fn new() -> Self {
        Self {
            rx: RefCell::new(VecDeque::new()),
            writes: RefCell::new(Vec::new()),
            replies: RefCell::new(Vec::new()),
            failing_prefix: RefCell::new(None),
            read_error: Cell::new(None),
            closed: Cell::new(false),
            chunk_size: usize::MAX,
            short_writes: false,
            reads_in_flight: Cell::new(0),
            max_reads_in_flight: Cell::new(0),
        }
    }

    /// Largest number of bytes handed out per read call.
    pub fn chunk_size(mut self, n: usize) -> Self {
        self.chunk_size = n.max(1);
        self
    }

    /// Accept one byte less than offered on every write.
    pub fn short_writes(mut self, on: bool) -> Self {
        self.short_writes = on;
        self
    }

    pub fn reply(self, prefix: &[u8], reply: &[u8]) -> Self {
        self.push_reply(prefix, reply);
        self
    }

    pub fn push_reply(&self, prefix: &[u8], reply: &[u8]) {
        self.replies
            .borrow_mut()
            .push((prefix.to_vec(), reply.to_vec()));
    }

    /// Make output available to the read side right away.
    pub fn push_rx(&self, bytes: &[u8]) {
        self.rx.borrow_mut().extend(bytes.iter().copied());
    }

    pub fn fail_writes_starting_with(&self, prefix: &[u8]) {
        *self.failing_prefix.borrow_mut() = Some(prefix.to_vec());
    }

    pub fn fail_reads(&self, kind: ErrorKind) {
        self.read_error.set(Some(kind));
    }

    /// End the stream once queued output is read.
    pub fn close(&self) {
        self.closed.set(true);
    }

    /// Stop failing reads and writes.
    pub fn heal(&self) {
        self.read_error.set(None);
        *self.failing_prefix.borrow_mut() = None;
    }

    pub fn writes(&self) -> Vec<Vec<u8>> {
        self.writes.borrow().clone()
    }

    pub fn max_reads_in_flight(&self) -> usize {
        self.max_reads_in_flight.get()
    }

    pub fn tx(&self) -> MockTx<'_> {
        MockTx(self)
    }

    pub fn rx(&self) -> MockRx<'_> {
        MockRx(self)
    }

    fn on_write(&self, buf: &[u8]) -> Result<usize, ErrorKind> {
        self.writes.borrow_mut().push(buf.to_vec());

        if let Some(prefix) = self.failing_prefix.borrow().as_deref() {
            if buf.starts_with(prefix) {
                return Err(ErrorKind::BrokenPipe);
            }
        }

        if let Some((_, reply)) = self
            .replies
            .borrow()
            .iter()
            .find(|(prefix, _)| buf.starts_with(prefix))
        {
            self.push_rx(reply);
        }

        if self.short_writes && !buf.is_empty() {
            Ok(buf.len() - 1)
        } else {
            Ok(buf.len())
        }
    }

    fn take_rx(&self, buf: &mut [u8]) -> Option<usize> {
        let mut rx = self.rx.borrow_mut();
        if rx.is_empty() {
            return None;
        }
        let n = buf.len().min(self.chunk_size).min(rx.len());
        for (dst, src) in buf.iter_mut().zip(rx.drain(..n)) {
            *dst = src;
        }
        Some(n)
    }
}

struct InFlight<'a>(&'a MockModem);

impl<'a> InFlight<'a> {
    fn enter(modem: &'a MockModem) -> Self {
        let n = modem.reads_in_flight.get() + 1;
        modem.reads_in_flight.set(n);
        if n > modem.max_reads_in_flight.get() {
            modem.max_reads_in_flight.set(n);
        }
        Self(modem)
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.reads_in_flight.set(self.0.reads_in_flight.get() - 1);
    }
}

pub struct MockTx<'a>(&'a MockModem);

impl ErrorType for MockTx<'_> {
    type Error = ErrorKind;
}

impl Write for MockTx<'_> {
    async fn write(&mut self, buf: &[u8]) -> Result<usize, Self::Error> {
        self.0.on_write(buf)
    }

    async fn flush(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }
}

pub struct MockRx<'a>(&'a MockModem);

impl ErrorType for MockRx<'_> {
    type Error = ErrorKind;
}

impl Read for MockRx<'_> {
    async fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
        let _guard = InFlight::enter(self.0);
        loop {
            if let Some(kind) = self.0.read_error.get() {
                return Err(kind);
            }
            if let Some(n) = self.0.take_rx(buf) {
                return Ok(n);
            }
            if self.0.closed.get() {
                return Ok(0);
            }
            Timer::after(Duration::from_micros(200)).await;
        }
    }
}
