//! Async driver for the A9G.
//!
//! [`new`] splits a [`Resources`] into the three handles of a session: the
//! [`Modem`] that runs procedures, a [`Control`] to observe and cancel them,
//! and a [`Monitor`] that drains unsolicited output in between.

pub mod control;
pub mod modem;
pub mod monitor;
pub mod procedure;
pub mod reader;
mod resources;
pub mod scenario;
pub mod sender;
pub mod state;
pub mod step;

pub use control::Control;
pub use modem::Modem;
pub use monitor::Monitor;
pub use resources::Resources;

use embedded_io_async::{Read, Write};

use crate::config::Config;
use reader::ReaderHandle;

pub fn new<'a, W: Write, R: Read, const INGRESS_BUF_SIZE: usize>(
    resources: &'a mut Resources<R, INGRESS_BUF_SIZE>,
    tx: W,
    config: Config<'a>,
) -> (
    Modem<'a, W, R, INGRESS_BUF_SIZE>,
    Control<'a>,
    Monitor<'a, R, INGRESS_BUF_SIZE>,
) {
    let resources: &'a Resources<R, INGRESS_BUF_SIZE> = resources;
    let state = state::Handle::new(&resources.ch);
    let reader = ReaderHandle(&resources.reader);

    let modem = Modem::new(state.clone(), tx, reader.clone(), config);
    let monitor = Monitor::new(state.clone(), reader);
    let control = Control::new(state);

    (modem, control, monitor)
}
