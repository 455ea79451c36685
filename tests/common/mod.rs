//! The flip/flop/floop machine shared by the integration tests.
//!
//! Flip and Flop are roots; Floop is a child of Flop. Every callback writes
//! a line to a per-thread transcript so tests can assert on ordering.

#![allow(dead_code)]

use hsm::core::{Signal, SignalStatus, StateHandler, StateId};
use hsm::hsm_state;
use hsm::machine::{Context, Hsm};
use hsm::HsmBuilder;
use std::cell::RefCell;

pub const FLIP: Signal = 0;
pub const FLOP: Signal = 1;
pub const FLOOP: Signal = 2;
pub const UNKNOWN: Signal = 3;

pub const FLIP_ID: StateId = 0;
pub const FLOP_ID: StateId = 1;
pub const FLOOP_ID: StateId = 2;

pub const MACHINE_ENTRY: &str = "Flip and flop, but don't floop until you flop";
pub const MACHINE_EXIT: &str = "Done with the flip, flop, floop";

thread_local! {
    static TRANSCRIPT: RefCell<Vec<String>> = const { RefCell::new(Vec::new()) };
}

pub fn say(line: &str) {
    TRANSCRIPT.with(|t| t.borrow_mut().push(line.to_string()));
}

pub fn take_transcript() -> Vec<String> {
    TRANSCRIPT.with(|t| std::mem::take(&mut *t.borrow_mut()))
}

struct Flip;

impl StateHandler for Flip {
    fn on_entry(&self, _ctx: &mut Context<'_>) {
        say("You flipped");
    }

    fn on_exit(&self, _ctx: &mut Context<'_>) {
        say("After flipping...");
    }

    fn on_signal(&self, ctx: &mut Context<'_>, signal: Signal) -> SignalStatus {
        match signal {
            FLIP => say("Already flipped"),
            FLOP => ctx.transition_to(&FLOP_STATE),
            FLOOP => say("Can't floop until you flop"),
            _ => return SignalStatus::NotHandled,
        }
        SignalStatus::Handled
    }
}

struct Flop;

impl StateHandler for Flop {
    fn on_entry(&self, _ctx: &mut Context<'_>) {
        say("You flopped");
    }

    fn on_exit(&self, _ctx: &mut Context<'_>) {
        say("After flopping...");
    }

    fn on_signal(&self, ctx: &mut Context<'_>, signal: Signal) -> SignalStatus {
        match signal {
            FLIP => ctx.transition_to(&FLIP_STATE),
            FLOP => say("Already flopped"),
            FLOOP => ctx.transition_to(&FLOOP_STATE),
            _ => return SignalStatus::NotHandled,
        }
        SignalStatus::Handled
    }
}

/// Only knows FLOOP; everything else falls through to Flop.
struct Floop;

impl StateHandler for Floop {
    fn on_entry(&self, _ctx: &mut Context<'_>) {
        say("You flooped");
    }

    fn on_exit(&self, _ctx: &mut Context<'_>) {
        say("After flooping...");
    }

    fn on_signal(&self, _ctx: &mut Context<'_>, signal: Signal) -> SignalStatus {
        match signal {
            FLOOP => {
                say("Already flooped");
                SignalStatus::Handled
            }
            _ => SignalStatus::NotHandled,
        }
    }
}

hsm_state! {
    pub static FLIP_STATE {
        name: "Flip",
        id: FLIP_ID,
        handler: Flip,
    }

    pub static FLOP_STATE {
        name: "Flop",
        id: FLOP_ID,
        handler: Flop,
    }

    pub static FLOOP_STATE {
        name: "Floop",
        id: FLOOP_ID,
        parent: FLOP_STATE,
        handler: Floop,
    }
}

pub fn machine() -> Hsm {
    HsmBuilder::new()
        .name("flip-flop")
        .top(&FLIP_STATE)
        .on_entry(|_| say(MACHINE_ENTRY))
        .on_exit(|_| say(MACHINE_EXIT))
        .history_limit(64)
        .build()
        .expect("flip/flop machine builds")
}
