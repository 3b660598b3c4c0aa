//! swapsolve -- a tile-swap puzzle solver implementing the SPI protocol.
//!
//! This binary reads commands from stdin and writes responses to stdout.
//! `go` runs the search on a worker thread so that `stop`, `isready` and
//! friends are handled while it works.

use std::io::{self, BufRead};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use swapsolve::engine::Engine;
use swapsolve::protocol::parser::{parse_command, Command};
use swapsolve::search::SearchResult;

/// The search currently running on a worker thread.
struct Running {
    stop: Arc<AtomicBool>,
    worker: JoinHandle<SearchResult>,
}

/// Waits for the running search, if any, optionally cancelling it first.
fn finish(running: &mut Option<Running>, cancel: bool) {
    if let Some(search) = running.take() {
        if cancel {
            search.stop.store(true, Ordering::Relaxed);
        }
        if search.worker.join().is_err() {
            eprintln!("search thread panicked");
        }
    }
}

fn report(result: io::Result<()>) {
    if let Err(e) = result {
        eprintln!("failed to write response: {}", e);
    }
}

/// Runs the main protocol loop.
fn main() {
    let stdin = io::stdin();
    let mut out = io::stdout();
    let mut engine = Engine::new();
    let mut running: Option<Running> = None;

    for line in stdin.lock().lines() {
        let line = match line {
            Ok(l) => l,
            Err(_) => break,
        };

        let cmd = match parse_command(&line) {
            Some(c) => c,
            None => continue,
        };

        match cmd {
            Command::Spi => report(engine.handle_spi(&mut out)),
            Command::IsReady => report(engine.handle_isready(&mut out)),
            Command::SetOption { name, value } => {
                if let Err(e) = engine.set_option(&name, value.as_deref()) {
                    eprintln!("{}", e);
                }
            }
            Command::NewPuzzle => {
                finish(&mut running, true);
                engine.new_puzzle();
            }
            Command::Board { notation } => {
                if let Err(e) = engine.set_board(&notation) {
                    eprintln!("{}", e);
                }
            }
            Command::Verify { path } => report(engine.handle_verify(&path, &mut out)),
            Command::Go(params) => {
                finish(&mut running, true);
                match engine.prepare_go(&params) {
                    Ok(job) => {
                        let stop = job.stop_flag();
                        let worker = thread::spawn(move || job.run(io::stdout()));
                        running = Some(Running { stop, worker });
                    }
                    Err(e) => eprintln!("{}", e),
                }
            }
            Command::Stop => finish(&mut running, true),
            Command::Quit => {
                finish(&mut running, true);
                return;
            }
        }
    }

    // End of input: let the running search complete.
    finish(&mut running, false);
}
