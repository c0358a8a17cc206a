//! Per-session game clock.
//!
//! Wraps the `run_interval` handle so that starting and stopping the clock is tied to
//! one session generation. Ticks scheduled under an older generation are dropped by
//! [`GameSession::on_tick`](super::server::GameSession).

use std::time::Duration;

use actix::prelude::*;
use log::debug;

use super::server::GameSession;

#[derive(Default)]
pub struct SessionClock {
    handle: Option<SpawnHandle>,
    generation: Option<u64>,
}

impl SessionClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_running(&self) -> bool {
        self.handle.is_some()
    }

    /// Start ticking for `generation`. No-op if already running.
    pub fn start(&mut self, ctx: &mut Context<GameSession>, generation: u64, interval: Duration) {
        if self.handle.is_some() {
            return;
        }
        debug!("[SessionClock] Start (generation={})", generation);
        let handle = ctx.run_interval(interval, move |act, ctx| {
            act.on_tick(generation, ctx);
        });
        self.handle = Some(handle);
        self.generation = Some(generation);
    }

    /// Stop ticking. No further tick from the cancelled interval is delivered.
    pub fn stop(&mut self, ctx: &mut Context<GameSession>) {
        if let Some(handle) = self.handle.take() {
            ctx.cancel_future(handle);
            debug!("[SessionClock] Stop (generation={:?})", self.generation);
        }
        self.generation = None;
    }
}
