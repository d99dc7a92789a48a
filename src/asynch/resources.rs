use embassy_sync::{blocking_mutex::raw::NoopRawMutex, mutex::Mutex};
use embedded_io_async::Read;

use super::{reader::ResponseReader, state};

/// Statically allocatable storage of a modem session.
///
/// `INGRESS_BUF_SIZE` is the capacity of the single receive buffer, the
/// longest reply a step can see.
pub struct Resources<R: Read, const INGRESS_BUF_SIZE: usize> {
    pub(crate) ch: state::State,
    pub(crate) reader: Mutex<NoopRawMutex, ResponseReader<R, INGRESS_BUF_SIZE>>,
}

impl<R: Read, const INGRESS_BUF_SIZE: usize> Resources<R, INGRESS_BUF_SIZE> {
    pub fn new(rx: R) -> Self {
        Self {
            ch: state::State::new(),
            reader: Mutex::new(ResponseReader::new(rx)),
        }
    }
}
