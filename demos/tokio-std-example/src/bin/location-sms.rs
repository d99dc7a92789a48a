use a9g_cellular::asynch::scenario::{self, ScenarioOutcome};
use a9g_cellular::asynch::Resources;
use a9g_cellular::config::Config;
use embassy_time::Duration;
use embedded_io_adapters::tokio_1::FromTokio;
use log::*;
use static_cell::StaticCell;
use tokio::io::{ReadHalf, WriteHalf};
use tokio_serial::{SerialPortBuilderExt, SerialStream};

const INGRESS_BUF_SIZE: usize = 512;

const TTY: &str = "/dev/ttyUSB0";
const RECIPIENT: &str = "14077564031";

type Rx = FromTokio<ReadHalf<SerialStream>>;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let serial = tokio_serial::new(TTY, 115200).open_native_async()?;
    let (rx, tx) = tokio::io::split(serial);

    static RESOURCES: StaticCell<Resources<Rx, INGRESS_BUF_SIZE>> = StaticCell::new();
    let resources = RESOURCES.init(Resources::new(FromTokio::new(rx)));

    let config = Config::new(RECIPIENT)
        .attach_network(true)
        .clear_storage_after_send(true);

    let (mut modem, control, monitor) = a9g_cellular::asynch::new(
        resources,
        FromTokio::<WriteHalf<SerialStream>>::new(tx),
        config,
    );

    // Boot banners and network registration URCs arrive before the first
    // command.
    let _ = monitor.drain(Duration::from_secs(2)).await;

    let states = async {
        loop {
            let state = control.wait_for_session_state_change().await;
            debug!("session: {:?}", state);
        }
    };

    let outcome = tokio::select! {
        outcome = scenario::run(&mut modem) => outcome,
        _ = states => unreachable!(),
    };

    match outcome {
        ScenarioOutcome::Sent { link } => info!("sent {}", link),
        ScenarioOutcome::Aborted { reason } => error!("aborted: {:?}", reason),
    }

    Ok(())
}
