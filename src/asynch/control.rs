use super::state::{self, SessionState};

/// Observes a running session and asks it to stop.
#[derive(Clone)]
pub struct Control<'a> {
    state: state::Handle<'a>,
}

impl<'a> Control<'a> {
    pub(crate) fn new(state: state::Handle<'a>) -> Self {
        Self { state }
    }

    pub fn session_state(&self) -> SessionState {
        self.state.session_state(None)
    }

    /// Ask the running procedure to stop before its next step.
    ///
    /// Cleanup steps still run and the procedure ends in
    /// `Failed(Cancelled)`. A request made while idle applies to the next
    /// procedure.
    pub fn cancel(&self) {
        info!("Cancellation requested in state {:?}", self.session_state());
        self.state.request_cancel();
    }

    pub fn is_cancel_pending(&self) -> bool {
        self.state.is_cancel_requested()
    }

    pub async fn wait_for_session_state(&self, state: SessionState) {
        self.state.wait_for_session_state(state).await
    }

    pub async fn wait_for_session_state_change(&self) -> SessionState {
        self.state.wait_for_session_state_change().await
    }
}
