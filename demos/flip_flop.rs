//! Flip, Flop, Floop
//!
//! This example drives a three-state hierarchical machine from stdin.
//!
//! Key concepts:
//! - Flip and Flop are root states; Floop is a child of Flop
//! - Signals Floop does not handle bubble up to Flop
//! - Transitions are flat: only the outgoing and incoming states run
//!   their exit/entry callbacks
//!
//! Run with: cargo run --example flip_flop
//! Set RUST_LOG=hsm=debug to see the engine's transitions.

use hsm::core::{Signal, SignalStatus, StateHandler};
use hsm::hsm_state;
use hsm::machine::{Context, Delivery, Hsm};
use hsm::HsmBuilder;
use std::io::{self, BufRead, Write};
use tracing_subscriber::EnvFilter;

const FLIP: Signal = 0;
const FLOP: Signal = 1;
const FLOOP: Signal = 2;

const HELP: &str = "\
usage:
\tenter\t- Enter the state machine
\texit\t- Exit the state machine
\tflip\t- Raise the flip signal
\tflop\t- Raise the flop signal
\tfloop\t- Raise the floop signal
\tstate\t- Show the current state
\tquit\t- Leave the demo";

struct Flip;

impl StateHandler for Flip {
    fn on_entry(&self, _ctx: &mut Context<'_>) {
        println!("You flipped");
    }

    fn on_exit(&self, _ctx: &mut Context<'_>) {
        println!("After flipping...");
    }

    fn on_signal(&self, ctx: &mut Context<'_>, signal: Signal) -> SignalStatus {
        match signal {
            FLIP => println!("Already flipped"),
            FLOP => ctx.transition_to(&FLOP_STATE),
            FLOOP => println!("Can't floop until you flop"),
            _ => return SignalStatus::NotHandled,
        }
        SignalStatus::Handled
    }
}

struct Flop;

impl StateHandler for Flop {
    fn on_entry(&self, _ctx: &mut Context<'_>) {
        println!("You flopped");
    }

    fn on_exit(&self, _ctx: &mut Context<'_>) {
        println!("After flopping...");
    }

    fn on_signal(&self, ctx: &mut Context<'_>, signal: Signal) -> SignalStatus {
        match signal {
            FLIP => ctx.transition_to(&FLIP_STATE),
            FLOP => println!("Already flopped"),
            FLOOP => ctx.transition_to(&FLOOP_STATE),
            _ => return SignalStatus::NotHandled,
        }
        SignalStatus::Handled
    }
}

struct Floop;

impl StateHandler for Floop {
    fn on_entry(&self, _ctx: &mut Context<'_>) {
        println!("You flooped");
    }

    fn on_exit(&self, _ctx: &mut Context<'_>) {
        println!("After flooping...");
    }

    fn on_signal(&self, _ctx: &mut Context<'_>, signal: Signal) -> SignalStatus {
        match signal {
            FLOOP => {
                println!("Already flooped");
                SignalStatus::Handled
            }
            _ => SignalStatus::NotHandled,
        }
    }
}

hsm_state! {
    static FLIP_STATE { name: "Flip", id: 0, handler: Flip }
    static FLOP_STATE { name: "Flop", id: 1, handler: Flop }
    static FLOOP_STATE { name: "Floop", id: 2, parent: FLOP_STATE, handler: Floop }
}

fn run(hsm: &Hsm, command: &str) -> Result<bool, hsm::HsmError> {
    let signal = match command {
        "enter" => {
            hsm.enter()?;
            return Ok(true);
        }
        "exit" => {
            hsm.exit()?;
            return Ok(true);
        }
        "state" => {
            match hsm.active_state()? {
                Some(state) => println!("Current state: {} ({})", state.name(), state.id()),
                None => println!("Not entered"),
            }
            return Ok(true);
        }
        "help" => {
            println!("{}", HELP);
            return Ok(true);
        }
        "" => return Ok(true),
        "quit" => return Ok(false),
        "flip" => FLIP,
        "flop" => FLOP,
        "floop" => FLOOP,
        other => {
            println!("Unknown command '{}'; try 'help'", other);
            return Ok(true);
        }
    };

    if hsm.raise(signal)? == Delivery::Inactive {
        println!("Enter the state machine first");
    }
    Ok(true)
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let hsm = HsmBuilder::new()
        .name("flip-flop")
        .top(&FLIP_STATE)
        .on_entry(|_| println!("Flip and flop, but don't floop until you flop"))
        .on_exit(|_| println!("Done with the flip, flop, floop"))
        .build()
        .expect("demo machine has a top state");

    println!("=== Flip, Flop, Floop ===\n");
    println!("{}\n", HELP);

    let stdin = io::stdin();
    loop {
        print!("hsm> ");
        io::stdout().flush().ok();

        let mut line = String::new();
        match stdin.lock().read_line(&mut line) {
            Ok(0) => break,
            Ok(_) => {}
            Err(e) => {
                eprintln!("Failed to read command: {}", e);
                break;
            }
        }

        match run(&hsm, line.trim()) {
            Ok(true) => {}
            Ok(false) => break,
            Err(e) => eprintln!("Error: {}", e),
        }
    }

    hsm.exit().ok();
    println!("\n=== Example Complete ===");
}
