use embassy_futures::select::select;
use embassy_time::{Duration, Timer};
use embedded_io_async::{Read, Write};

use super::procedure::{self, GpsPlan, SmsPlan, LOCATION_TAG, SEND_LOCATION_TAG};
use super::reader::{ModemResponse, ReaderHandle};
use super::sender::Sender;
use super::state::{self, SessionState};
use super::step::{SessionStep, StepPolicy};
use crate::config::Config;
use crate::error::Error;
use crate::location::{format_link, LocationFix, MapLink};

/// Whether a step gives way to a pending cancellation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Cancel {
    Honor,
    Ignore,
}

/// Runs modem procedures, one command at a time.
///
/// Every procedure is a list of [`SessionStep`]s. A step's reply is read to
/// the end of its window before the next command is written, and cleanup
/// steps run whatever way the procedure ended.
pub struct Modem<'a, W: Write, R: Read, const INGRESS_BUF_SIZE: usize> {
    state: state::Handle<'a>,
    sender: Sender<W>,
    reader: ReaderHandle<'a, R, INGRESS_BUF_SIZE>,
    config: Config<'a>,
    attached: bool,
}

impl<'a, W: Write, R: Read, const INGRESS_BUF_SIZE: usize> Modem<'a, W, R, INGRESS_BUF_SIZE> {
    pub(crate) fn new(
        state: state::Handle<'a>,
        tx: W,
        reader: ReaderHandle<'a, R, INGRESS_BUF_SIZE>,
        config: Config<'a>,
    ) -> Self {
        Self {
            state,
            sender: Sender::new(tx),
            reader,
            config,
            attached: false,
        }
    }

    pub fn config(&self) -> &Config<'a> {
        &self.config
    }

    pub fn session_state(&self) -> SessionState {
        self.state.session_state(None)
    }

    /// Packet data was attached by this session.
    pub fn is_attached(&self) -> bool {
        self.attached
    }

    /// Leave [`SessionState::Failed`] so that procedures may run again.
    pub fn recover(&mut self) {
        if self.session_state().is_failed() {
            info!("Recovering from {:?}", self.session_state());
            self.state.set_session_state(self.resting_state());
        }
        self.state.clear_cancel();
    }

    /// Attach to the packet service and activate the configured context.
    pub async fn attach_network(&mut self) -> Result<(), Error> {
        self.begin()?;
        let result = self.attach().await;
        if result.is_ok() {
            self.attached = true;
        }
        self.finish(result)
    }

    /// Deactivate the configured context and detach from the packet service.
    pub async fn detach_network(&mut self) -> Result<(), Error> {
        self.begin()?;
        let result = self.detach().await;
        if result.is_ok() {
            self.attached = false;
        }
        self.finish(result)
    }

    /// Power the receiver, let it report for a while and read the position.
    ///
    /// The receiver is powered off again on every outcome. No reply to the
    /// location read is a [`Error::Timeout`], a reply without a position is
    /// [`Error::IncompleteFix`].
    pub async fn acquire_location(&mut self) -> Result<LocationFix, Error> {
        self.begin()?;
        let result = match self.locate().await {
            Ok(fix) if fix.is_set() => Ok(fix),
            Ok(_) => Err(Error::IncompleteFix),
            Err(e) => Err(e),
        };
        self.finish(result)
    }

    /// Text the current position, as a map link, to the configured recipient.
    ///
    /// Text mode is switched off again on every outcome. A missing position
    /// fails with [`Error::IncompleteFix`] before anything is submitted.
    pub async fn send_location_sms(&mut self) -> Result<MapLink, Error> {
        self.begin()?;
        let result = self.sms().await;
        self.finish(result)
    }

    /// Delete every message in ME storage.
    pub async fn clear_message_storage(&mut self) -> Result<(), Error> {
        self.begin()?;
        let result = self.clear_storage().await;
        self.finish(result)
    }

    /// Switch GPS off and leave text mode, best effort. Runs in any state and
    /// keeps a recorded failure.
    pub async fn disable_features(&mut self) -> Result<(), Error> {
        let previous = self.session_state();
        let steps = procedure::disable_features(&self.config.timing)?;
        self.cleanup(&steps).await;

        if previous.is_failed() {
            self.state.set_session_state(previous);
        } else {
            self.state.set_session_state(self.resting_state());
        }
        Ok(())
    }

    async fn attach(&mut self) -> Result<(), Error> {
        let steps =
            procedure::network_attach(self.config.apn, self.config.context_id, &self.config.timing)?;
        self.run(&steps).await
    }

    async fn detach(&mut self) -> Result<(), Error> {
        let steps = procedure::network_detach(self.config.context_id, &self.config.timing)?;
        self.run(&steps).await
    }

    async fn clear_storage(&mut self) -> Result<(), Error> {
        let steps = procedure::storage_cleanup(&self.config.timing)?;
        self.run(&steps).await
    }

    async fn locate(&mut self) -> Result<LocationFix, Error> {
        let plan = procedure::gps_acquisition(&self.config.timing)?;
        let result = self.locate_steps(&plan).await;
        self.cleanup(core::slice::from_ref(&plan.power_off)).await;
        result
    }

    async fn locate_steps(&mut self, plan: &GpsPlan) -> Result<LocationFix, Error> {
        self.run(&plan.setup).await?;

        let fix = self
            .execute(&plan.read, Cancel::Honor, |res| {
                LocationFix::parse(res.as_bytes())
            })
            .await?;

        match (&fix.latitude, &fix.longitude) {
            (Some(lat), Some(lon)) => {
                info!("[{}] Fix {},{}", LOCATION_TAG, lat.as_str(), lon.as_str())
            }
            _ => warn!("[{}] Reply holds no position", LOCATION_TAG),
        }
        Ok(fix)
    }

    async fn sms(&mut self) -> Result<MapLink, Error> {
        let plan = procedure::sms_submission(self.config.recipient, &self.config.timing)?;
        let result = self.sms_steps(&plan).await;
        self.cleanup(core::slice::from_ref(&plan.text_mode_off)).await;
        result
    }

    async fn sms_steps(&mut self, plan: &SmsPlan) -> Result<MapLink, Error> {
        self.execute(&plan.text_mode, Cancel::Honor, |_| ()).await?;

        self.checkpoint()?;
        let fix = match self.locate().await {
            Ok(fix) => fix,
            Err(e @ (Error::Timeout | Error::IncompleteFix)) => {
                warn!("[{}] No location: {:?}", SEND_LOCATION_TAG, e);
                LocationFix::unset()
            }
            Err(e) => return Err(e),
        };

        self.checkpoint()?;
        self.state.set_session_state(SessionState::SmsComposing);
        let link = format_link(&fix)?;
        info!("[{}] {}", SEND_LOCATION_TAG, link.as_str());
        let body = procedure::message_body(&link, &self.config.timing)?;

        // The submit step may still be cancelled during the fix grace. Once
        // the prompt is requested the message is completed, a cancel would
        // leave the modem waiting for text.
        self.execute(&plan.submit, Cancel::Honor, |_| ()).await?;
        self.execute(&body, Cancel::Ignore, |_| ()).await?;
        self.execute(&plan.terminator, Cancel::Ignore, |_| ()).await?;

        self.state.set_session_state(SessionState::SmsSent);
        info!("[{}] Location SMS sent", SEND_LOCATION_TAG);
        Ok(link)
    }

    fn resting_state(&self) -> SessionState {
        if self.attached {
            SessionState::NetworkActive
        } else {
            SessionState::Idle
        }
    }

    fn begin(&self) -> Result<(), Error> {
        let state = self.session_state();
        if !state.is_ready() {
            warn!("Procedure refused in state {:?}", state);
            return Err(Error::NotIdle);
        }
        Ok(())
    }

    fn finish<T>(&mut self, result: Result<T, Error>) -> Result<T, Error> {
        self.state.clear_cancel();
        match &result {
            Ok(_) => self.state.set_session_state(self.resting_state()),
            Err(e) => {
                error!("Procedure failed: {:?}", e);
                self.state.set_session_state(SessionState::Failed(*e));
            }
        }
        result
    }

    fn checkpoint(&self) -> Result<(), Error> {
        if self.state.is_cancel_requested() {
            info!("Cancelled in state {:?}", self.session_state());
            return Err(Error::Cancelled);
        }
        Ok(())
    }

    async fn run(&mut self, steps: &[SessionStep]) -> Result<(), Error> {
        for step in steps {
            self.execute(step, Cancel::Honor, |_| ()).await?;
        }
        Ok(())
    }

    async fn cleanup(&mut self, steps: &[SessionStep]) {
        for step in steps {
            if let Err(e) = self.execute(step, Cancel::Ignore, |_| ()).await {
                warn!("[{}] Cleanup step failed: {:?}", step.tag, e);
            }
        }
    }

    async fn execute<T>(
        &mut self,
        step: &SessionStep,
        cancel: Cancel,
        consume: impl FnOnce(&ModemResponse<'_>) -> T,
    ) -> Result<T, Error> {
        self.state.set_session_state(step.state);

        if step.lead > Duration::from_ticks(0) {
            match cancel {
                Cancel::Honor => {
                    select(Timer::after(step.lead), self.state.wait_for_cancel()).await;
                }
                Cancel::Ignore => Timer::after(step.lead).await,
            }
        }
        if cancel == Cancel::Honor {
            self.checkpoint()?;
        }

        // Held from the write on, so the reply cannot end up in a drain.
        let mut reader = self.reader.acquire().await;

        self.sender.send(step.tag, &step.command).await?;
        Timer::after(step.settle).await;

        let response = reader.read_response(step.window).await?;

        if response.is_empty() {
            if step.policy == StepPolicy::Required {
                warn!(
                    "[{}] No reply within {} ms",
                    step.tag,
                    step.window.as_millis()
                );
                return Err(Error::Timeout);
            }
            debug!("[{}] No reply, continuing", step.tag);
        } else {
            trace!("[{}] Reply: {:?}", step.tag, response.as_str());
            if !step.accepts(response.as_bytes()) {
                if step.policy == StepPolicy::Required {
                    warn!("[{}] Reply refused", step.tag);
                    return Err(Error::Rejected);
                }
                debug!("[{}] Unexpected reply, continuing", step.tag);
            }
        }

        Ok(consume(&response))
    }
}
