//! The hierarchical state machine runtime.

use crate::builder::HsmConfig;
use crate::core::{Guard, GuardError, Held, Signal, State, StateHistory, StateId, INACTIVE_STATE};
use crate::machine::context::Context;
use crate::machine::error::HsmError;
use std::fmt;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use tracing::{debug, info, trace, warn};
use uuid::Uuid;

/// Machine-level entry or exit hook.
pub type MachineHook = Box<dyn Fn(&Hsm) + Send + Sync>;

/// What `raise` did with a signal.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Delivery {
    /// The machine was not active; nothing ran.
    Inactive,
    /// The state with this id reported the signal handled.
    Handled { by: StateId },
    /// Every state up to the root declined the signal.
    Unhandled,
}

impl Delivery {
    pub fn is_handled(self) -> bool {
        matches!(self, Self::Handled { .. })
    }

    pub fn handled_by(self) -> Option<StateId> {
        match self {
            Self::Handled { by } => Some(by),
            _ => None,
        }
    }
}

/// Everything the guard protects.
pub(crate) struct Slot {
    pub(crate) current: Option<&'static State>,
    pub(crate) history: StateHistory,
}

const ACTIVE_BIT: u64 = 1 << 32;

fn encode(state: Option<&State>) -> u64 {
    state.map_or(0, |s| ACTIVE_BIT | u64::from(s.id() as u32))
}

fn decode(word: u64) -> Option<StateId> {
    (word & ACTIVE_BIT != 0).then_some(word as u32 as StateId)
}

/// A hierarchical state machine bound to a top state.
///
/// The machine starts inactive. [`enter`](Self::enter) activates it by
/// transitioning into the top state, [`raise`](Self::raise) offers a signal
/// to the current state and then to each ancestor until one handles it,
/// and [`exit`](Self::exit) deactivates it again. Every operation that
/// touches the current state holds the machine's guard.
///
/// # Example
///
/// ```rust
/// use hsm::core::{Signal, SignalStatus, State, StateHandler};
/// use hsm::machine::{Context, Delivery, Hsm};
///
/// const PING: Signal = 0;
///
/// struct Ping;
///
/// impl StateHandler for Ping {
///     fn on_signal(&self, ctx: &mut Context<'_>, signal: Signal) -> SignalStatus {
///         if signal == PING {
///             ctx.transition_to(&PONG);
///             SignalStatus::Handled
///         } else {
///             SignalStatus::NotHandled
///         }
///     }
/// }
///
/// struct Pong;
///
/// impl StateHandler for Pong {
///     fn on_signal(&self, ctx: &mut Context<'_>, signal: Signal) -> SignalStatus {
///         if signal == PING {
///             ctx.transition_to(&PING_STATE);
///             SignalStatus::Handled
///         } else {
///             SignalStatus::NotHandled
///         }
///     }
/// }
///
/// static PING_STATE: State = State::new("Ping", 0, None, &Ping);
/// static PONG: State = State::new("Pong", 1, None, &Pong);
///
/// let hsm = Hsm::init(Some(&PING_STATE), None, None).unwrap();
/// assert!(!hsm.is_active());
///
/// hsm.enter().unwrap();
/// assert_eq!(hsm.current_state(), 0);
///
/// assert_eq!(hsm.raise(PING).unwrap(), Delivery::Handled { by: 0 });
/// assert_eq!(hsm.current_state(), 1);
///
/// hsm.exit().unwrap();
/// assert_eq!(hsm.current_state(), -1);
/// ```
pub struct Hsm {
    id: Uuid,
    name: String,
    top: &'static State,
    on_entry: Option<MachineHook>,
    on_exit: Option<MachineHook>,
    guard: Guard<Slot>,
    /// Set while an `enter` call is between its hook and its transition.
    entering: AtomicBool,
    /// Mirror of `current` for lock-free queries; written under the guard.
    published: AtomicU64,
}

impl Hsm {
    /// Bind a machine to `top` with optional machine-level hooks.
    ///
    /// Fails with [`HsmError::InvalidArgument`] when `top` is `None`. No
    /// callback runs and the machine starts inactive.
    pub fn init(
        top: Option<&'static State>,
        on_entry: Option<MachineHook>,
        on_exit: Option<MachineHook>,
    ) -> Result<Self, HsmError> {
        Self::with_config(top, on_entry, on_exit, HsmConfig::default())
    }

    pub(crate) fn with_config(
        top: Option<&'static State>,
        on_entry: Option<MachineHook>,
        on_exit: Option<MachineHook>,
        config: HsmConfig,
    ) -> Result<Self, HsmError> {
        let top = top.ok_or(HsmError::InvalidArgument("top state is required"))?;

        let hsm = Self {
            id: Uuid::new_v4(),
            name: config.name,
            top,
            on_entry,
            on_exit,
            guard: Guard::new(Slot {
                current: None,
                history: StateHistory::with_limit(config.history_limit),
            }),
            entering: AtomicBool::new(false),
            published: AtomicU64::new(encode(None)),
        };
        debug!(machine = %hsm.name, id = %hsm.id, top = top.name(), "initialized");
        Ok(hsm)
    }

    /// Activate the machine: run the machine entry hook, then transition
    /// into the top state. Does nothing if already active.
    ///
    /// The entry hook runs before the guard is taken and must not assume
    /// exclusive access to the machine. Concurrent callers are gated so that
    /// the hook and the top state's entry run once per activation: a caller
    /// that finds another activation in progress returns `Ok` without
    /// waiting for it.
    ///
    /// A poisoned guard, or a call from a callback that already holds the
    /// guard, fails before the hook runs.
    pub fn enter(&self) -> Result<(), HsmError> {
        if self.is_active() {
            return Ok(());
        }
        self.check_guard()?;

        let Some(_gate) = EntryGate::open(&self.entering) else {
            debug!(machine = %self.name, "activation already in progress");
            return Ok(());
        };
        if self.is_active() {
            return Ok(());
        }

        info!(machine = %self.name, "entering");
        if let Some(hook) = &self.on_entry {
            hook(self);
        }

        let mut slot = self.lock()?;
        if slot.current.is_some() {
            debug!(machine = %self.name, "activated concurrently, skipping entry transition");
            return Ok(());
        }
        Context::new(self, &mut slot).transition(Some(self.top));
        Ok(())
    }

    /// Deactivate the machine: under the guard, exit the current state
    /// (its ancestors are not exited) and then run the machine exit hook.
    /// Does nothing if already inactive.
    pub fn exit(&self) -> Result<(), HsmError> {
        if !self.is_active() {
            return Ok(());
        }

        let mut slot = self.lock()?;
        if slot.current.is_none() {
            return Ok(());
        }

        info!(machine = %self.name, "exiting");
        Context::new(self, &mut slot).transition(None);
        if let Some(hook) = &self.on_exit {
            hook(self);
        }
        Ok(())
    }

    /// Offer `signal` to the current state, then to each ancestor in turn,
    /// until one reports it handled or the root declines it.
    ///
    /// The chain walked is the one of the state that was current when the
    /// signal arrived, even if a handler transitions part way. An unhandled
    /// signal is absorbed silently.
    pub fn raise(&self, signal: Signal) -> Result<Delivery, HsmError> {
        if !self.is_active() {
            return Ok(Delivery::Inactive);
        }

        let mut slot = self.lock()?;
        let Some(start) = slot.current else {
            return Ok(Delivery::Inactive);
        };

        let mut ctx = Context::new(self, &mut slot);
        for state in start.ancestors() {
            trace!(machine = %self.name, signal, state = state.name(), "offering signal");
            if state.handler().on_signal(&mut ctx, signal).is_handled() {
                return Ok(Delivery::Handled { by: state.id() });
            }
        }

        trace!(machine = %self.name, signal, "signal unhandled");
        Ok(Delivery::Unhandled)
    }

    /// Flat transition from the current state to `dst` under the guard.
    /// See [`Context::transition`].
    pub fn transition(&self, dst: Option<&'static State>) -> Result<(), HsmError> {
        let mut slot = self.lock()?;
        Context::new(self, &mut slot).transition(dst);
        Ok(())
    }

    pub fn transition_to(&self, dst: &'static State) -> Result<(), HsmError> {
        self.transition(Some(dst))
    }

    /// Lock-free.
    pub fn is_active(&self) -> bool {
        decode(self.published.load(Ordering::Acquire)).is_some()
    }

    /// Id of the current state, or [`INACTIVE_STATE`] (`-1`). Lock-free.
    pub fn current_state(&self) -> StateId {
        self.current().unwrap_or(INACTIVE_STATE)
    }

    /// Id of the current state, `None` while inactive. Lock-free.
    pub fn current(&self) -> Option<StateId> {
        decode(self.published.load(Ordering::Acquire))
    }

    /// The current state itself. Takes the guard.
    pub fn active_state(&self) -> Result<Option<&'static State>, HsmError> {
        Ok(self.lock()?.current)
    }

    /// Copy of the transition history. Takes the guard.
    pub fn history(&self) -> Result<StateHistory, HsmError> {
        Ok(self.lock()?.history.clone())
    }

    /// Current state id and history read under one acquisition.
    pub(crate) fn observe(&self) -> Result<(Option<StateId>, StateHistory), HsmError> {
        let slot = self.lock()?;
        Ok((slot.current.map(State::id), slot.history.clone()))
    }

    pub fn top(&self) -> &'static State {
        self.top
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub(crate) fn publish(&self, state: Option<&State>) {
        self.published.store(encode(state), Ordering::Release);
    }

    /// Report what `lock` would fail with, without blocking.
    fn check_guard(&self) -> Result<(), HsmError> {
        let err = if self.guard.held_by_current_thread() {
            GuardError::Reentrant
        } else if self.guard.is_poisoned() {
            GuardError::Poisoned
        } else {
            return Ok(());
        };
        warn!(machine = %self.name, ?err, "guard unavailable");
        Err(HsmError::from_guard(err, &self.name))
    }

    fn lock(&self) -> Result<Held<'_, Slot>, HsmError> {
        self.guard.acquire().map_err(|err| {
            warn!(machine = %self.name, ?err, "guard unavailable");
            HsmError::from_guard(err, &self.name)
        })
    }
}

/// Claim on the `entering` flag, released on drop so a panicking entry
/// hook does not block later activations.
struct EntryGate<'a>(&'a AtomicBool);

impl<'a> EntryGate<'a> {
    fn open(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self(flag))
    }
}

impl Drop for EntryGate<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl fmt::Debug for Hsm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Hsm")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("top", &self.top.name())
            .field("current", &self.current())
            .field("has_on_entry", &self.on_entry.is_some())
            .field("has_on_exit", &self.on_exit.is_some())
            .finish()
    }
}
