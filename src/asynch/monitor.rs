use embassy_futures::yield_now;
use embassy_time::Duration;
use embedded_io_async::Read;

use super::reader::{ModemResponse, ReaderHandle};
use super::state;
use crate::error::Error;

/// Drains unsolicited modem output between procedures.
///
/// The monitor reads through the same buffer as the modem, so it waits while
/// a procedure is reading and the procedure waits while it drains. [`Self::run`]
/// stands down for as long as a procedure is running.
pub struct Monitor<'a, R: Read, const INGRESS_BUF_SIZE: usize> {
    state: state::Handle<'a>,
    reader: ReaderHandle<'a, R, INGRESS_BUF_SIZE>,
}

impl<R: Read, const INGRESS_BUF_SIZE: usize> Clone for Monitor<'_, R, INGRESS_BUF_SIZE> {
    fn clone(&self) -> Self {
        Self {
            state: self.state.clone(),
            reader: self.reader.clone(),
        }
    }
}

impl<'a, R: Read, const INGRESS_BUF_SIZE: usize> Monitor<'a, R, INGRESS_BUF_SIZE> {
    pub(crate) fn new(state: state::Handle<'a>, reader: ReaderHandle<'a, R, INGRESS_BUF_SIZE>) -> Self {
        Self { state, reader }
    }

    /// Read and log whatever arrives within `window`. Returns the number of
    /// bytes seen.
    pub async fn drain(&self, window: Duration) -> Result<usize, Error> {
        let mut reader = self.reader.acquire().await;
        let response = reader.read_response(window).await?;
        Ok(Self::report(&response))
    }

    /// Like [`Self::drain`], but fails with [`Error::BufferBusy`] instead of
    /// waiting for a read in progress.
    pub async fn try_drain(&self, window: Duration) -> Result<usize, Error> {
        let mut reader = self.reader.try_acquire()?;
        let response = reader.read_response(window).await?;
        Ok(Self::report(&response))
    }

    /// Drain forever, `window` at a time, whenever no procedure is running.
    pub async fn run(&self, window: Duration) -> ! {
        loop {
            self.state.wait_until_quiet().await;
            if let Err(e) = self.drain(window).await {
                error!("[RX_TASK] {:?}", e);
            }
            // Let a waiting step take the reader first.
            yield_now().await;
        }
    }

    fn report(response: &ModemResponse<'_>) -> usize {
        if !response.is_empty() {
            match response.as_str() {
                Some(text) => info!("[RX_TASK] Read {} bytes: '{}'", response.len(), text),
                None => info!("[RX_TASK] Read {} bytes", response.len()),
            }
            trace!("[RX_TASK] {:?}", response.as_bytes());
        }
        response.len() + response.discarded()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::asynch::{new, Resources};
    use crate::config::Config;
    use crate::test_helpers::{block_on, MockModem};
    use crate::asynch::state::SessionState;
    use crate::config::Timing;
    use embassy_futures::join::join;
    use embassy_futures::select::{select, Either};
    use embassy_time::Timer;

    #[test]
    fn drains_unsolicited_output() {
        let serial = MockModem::new();
        let mut resources: Resources<_, 64> = Resources::new(serial.rx());
        let (_modem, _control, monitor) = new(&mut resources, serial.tx(), Config::new("1"));

        serial.push_rx(b"\r\n+CREG: 1\r\n");
        assert_eq!(block_on(monitor.drain(Duration::from_millis(3))), Ok(12));
        assert_eq!(block_on(monitor.drain(Duration::from_millis(1))), Ok(0));
    }

    #[test]
    fn try_drain_refuses_while_buffer_is_leased() {
        let serial = MockModem::new();
        let mut resources: Resources<_, 64> = Resources::new(serial.rx());
        let (_modem, _control, monitor) = new(&mut resources, serial.tx(), Config::new("1"));
        let other = monitor.clone();

        let (first, second) = block_on(join(monitor.drain(Duration::from_millis(10)), async {
            yield_now().await;
            other.try_drain(Duration::from_millis(1)).await
        }));

        assert_eq!(first, Ok(0));
        assert_eq!(second, Err(Error::BufferBusy));
    }

    #[test]
    fn running_monitor_leaves_replies_to_the_session() {
        let serial = MockModem::new()
            .reply(b"AT+LOCATION=2", b"\r\n-34.8799074,174.7565664\r\n\r\nOK\r\n");
        let mut resources: Resources<_, 256> = Resources::new(serial.rx());
        let config = Config::new("14077564031").timing(Timing::uniform(Duration::from_millis(1)));
        let (mut modem, control, monitor) = new(&mut resources, serial.tx(), config);

        serial.push_rx(b"\r\n+CREG: 1\r\n");
        let session = async {
            Timer::after(Duration::from_millis(10)).await;
            modem.acquire_location().await
        };
        let bounded = select(session, Timer::after(Duration::from_secs(1)));

        let fix = match block_on(select(bounded, monitor.run(Duration::from_millis(5)))) {
            Either::First(Either::First(res)) => res.unwrap(),
            Either::First(Either::Second(())) => panic!("procedure starved"),
            Either::Second(never) => never,
        };

        assert_eq!(fix.latitude.as_deref(), Some("-34.8799074"));
        assert_eq!(serial.writes().last().unwrap(), b"AT+GPS=0\r\n");
        assert_eq!(control.session_state(), SessionState::Idle);
    }
}
