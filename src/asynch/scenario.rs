//! The whole tracker cycle: attach, send the location, tidy up.

use embedded_io_async::{Read, Write};

use super::modem::Modem;
use crate::error::Error;
use crate::location::MapLink;

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ScenarioOutcome {
    Sent { link: MapLink },
    Aborted { reason: Error },
}

/// Run one tracker cycle as configured.
///
/// A failed attach aborts before anything else is tried. Storage cleanup
/// failures are logged only. Features are disabled on every path.
pub async fn run<W: Write, R: Read, const INGRESS_BUF_SIZE: usize>(
    modem: &mut Modem<'_, W, R, INGRESS_BUF_SIZE>,
) -> ScenarioOutcome {
    let outcome = match cycle(modem).await {
        Ok(link) => {
            info!("location SMS sent: {}", link.as_str());
            ScenarioOutcome::Sent { link }
        }
        Err(reason) => {
            error!("aborted: {:?}", reason);
            ScenarioOutcome::Aborted { reason }
        }
    };

    if let Err(e) = modem.disable_features().await {
        warn!("Disabling features failed: {:?}", e);
    }
    outcome
}

async fn cycle<W: Write, R: Read, const INGRESS_BUF_SIZE: usize>(
    modem: &mut Modem<'_, W, R, INGRESS_BUF_SIZE>,
) -> Result<MapLink, Error> {
    if modem.config().attach_network && !modem.is_attached() {
        modem.attach_network().await?;
    }

    let link = modem.send_location_sms().await?;

    if modem.config().clear_storage_after_send {
        if let Err(e) = modem.clear_message_storage().await {
            warn!("Message storage left as is: {:?}", e);
            modem.recover();
        }
    }
    Ok(link)
}
