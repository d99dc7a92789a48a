use core::cell::RefCell;
use core::future::poll_fn;
use core::task::{Context, Poll};

use embassy_sync::blocking_mutex::raw::NoopRawMutex;
use embassy_sync::blocking_mutex::Mutex;
use embassy_sync::waitqueue::{MultiWakerRegistration, WakerRegistration};

use crate::error::Error;

/// Where the modem session currently is.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SessionState {
    Idle,

    GpsWarmup,
    GpsReading,
    GpsCooldown,

    NetworkAttaching,
    NetworkActive,
    NetworkDetaching,

    SmsConfiguring,
    SmsComposing,
    SmsSent,

    ClearingStorage,
    Disabling,

    /// A procedure stopped on this error. Left only through an explicit
    /// recovery.
    Failed(Error),
}

impl SessionState {
    /// A new procedure may start from this state.
    pub fn is_ready(&self) -> bool {
        matches!(self, Self::Idle | Self::NetworkActive)
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed(_))
    }

    /// A procedure is running.
    pub fn is_busy(&self) -> bool {
        !self.is_ready() && !self.is_failed()
    }
}

pub struct State {
    shared: Mutex<NoopRawMutex, RefCell<Shared>>,
}

impl Default for State {
    fn default() -> Self {
        Self::new()
    }
}

impl State {
    pub const fn new() -> Self {
        Self {
            shared: Mutex::new(RefCell::new(Shared {
                session_state: SessionState::Idle,
                cancel_requested: false,
                state_waker: MultiWakerRegistration::new(),
                cancel_waker: WakerRegistration::new(),
            })),
        }
    }
}

/// Control and monitor tasks, plus one spare
const STATE_WAITERS: usize = 3;

/// State shared between the modem and its control and monitor handles
pub struct Shared {
    session_state: SessionState,
    cancel_requested: bool,
    state_waker: MultiWakerRegistration<STATE_WAITERS>,
    cancel_waker: WakerRegistration,
}

#[derive(Clone)]
pub struct Handle<'d> {
    pub(crate) shared: &'d Mutex<NoopRawMutex, RefCell<Shared>>,
}

impl<'d> Handle<'d> {
    pub fn new(state: &'d State) -> Self {
        Self {
            shared: &state.shared,
        }
    }

    pub fn set_session_state(&self, state: SessionState) {
        self.shared.lock(|s| {
            let s = &mut *s.borrow_mut();
            if s.session_state != state {
                debug!("Session state: {:?} -> {:?}", s.session_state, state);
                s.session_state = state;
                s.state_waker.wake();
            }
        });
    }

    pub fn session_state(&self, cx: Option<&mut Context>) -> SessionState {
        self.shared.lock(|s| {
            let s = &mut *s.borrow_mut();
            if let Some(cx) = cx {
                s.state_waker.register(cx.waker());
            }
            s.session_state
        })
    }

    pub fn request_cancel(&self) {
        self.shared.lock(|s| {
            let s = &mut *s.borrow_mut();
            s.cancel_requested = true;
            s.cancel_waker.wake();
        });
    }

    pub fn is_cancel_requested(&self) -> bool {
        self.shared.lock(|s| s.borrow().cancel_requested)
    }

    pub fn clear_cancel(&self) {
        self.shared.lock(|s| s.borrow_mut().cancel_requested = false);
    }

    /// Resolves once cancellation has been requested.
    pub async fn wait_for_cancel(&self) {
        poll_fn(|cx| {
            self.shared.lock(|s| {
                let s = &mut *s.borrow_mut();
                if s.cancel_requested {
                    return Poll::Ready(());
                }
                s.cancel_waker.register(cx.waker());
                Poll::Pending
            })
        })
        .await
    }

    /// Resolves once no procedure is running.
    pub async fn wait_until_quiet(&self) {
        poll_fn(|cx| {
            if self.session_state(Some(cx)).is_busy() {
                return Poll::Pending;
            }
            Poll::Ready(())
        })
        .await
    }

    pub async fn wait_for_session_state(&self, state: SessionState) {
        if self.session_state(None) == state {
            return;
        }

        poll_fn(|cx| {
            if self.session_state(Some(cx)) == state {
                return Poll::Ready(());
            }
            Poll::Pending
        })
        .await
    }

    /// Resolves with the new state as soon as it differs from the current one.
    pub async fn wait_for_session_state_change(&self) -> SessionState {
        let old_state = self.session_state(None);

        poll_fn(|cx| {
            let current_state = self.session_state(Some(cx));
            if current_state != old_state {
                return Poll::Ready(current_state);
            }
            Poll::Pending
        })
        .await
    }
}
