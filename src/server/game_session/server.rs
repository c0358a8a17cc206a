use actix::prelude::*;
use std::collections::HashMap;
use std::time::Duration;
use actix::MessageResult;
use rand::SeedableRng;
use rand::rngs::StdRng;
use uuid::Uuid;
use log::{debug, info, warn};

use crate::config::game::TICK_INTERVAL_SECS;
use crate::game::error::GameError;
use crate::game::snapshot::GameSnapshot;
use crate::game::state::{GameState, Resolution, Selection};
use crate::game::types::GridSize;
use crate::server::game_session::messages::{
    ServerMessage, VictorySummary, SelectTile, NewGame, ChangeDifficulty, Subscribe, Unsubscribe,
    GetSnapshot,
};
use crate::server::game_session::timer::SessionClock;

/// Wall-clock pacing of a session.
#[derive(Debug, Clone, Copy)]
pub struct SessionTimings {
    pub tick_interval: Duration,
    /// Resolution delays are divided by this factor. 1 in production.
    pub resolve_divisor: u32,
}

impl Default for SessionTimings {
    fn default() -> Self {
        Self {
            tick_interval: Duration::from_secs(TICK_INTERVAL_SECS),
            resolve_divisor: 1,
        }
    }
}

impl SessionTimings {
    fn resolve_delay(&self, resolution: &Resolution) -> Duration {
        resolution.delay() / self.resolve_divisor.max(1)
    }
}

/// One game, owned by one actor. Every mutation goes through this actor's mailbox.
pub struct GameSession {
    pub game_id: Uuid,
    generation: u64,
    state: GameState,
    rng: StdRng,
    timings: SessionTimings,
    clock: SessionClock,
    resolution_timer: Option<SpawnHandle>,
    subscribers: HashMap<Uuid, Recipient<ServerMessage>>,
    manager: Option<Addr<GameSessionManager>>,
    closing: bool,
}

impl Actor for GameSession {
    type Context = Context<Self>;

    fn stopped(&mut self, _ctx: &mut Self::Context) {
        info!("[GameSession] Session {} closed", self.game_id);
        if let Some(manager) = &self.manager {
            manager.do_send(RemoveGame { game_id: self.game_id });
        }
    }
}

impl GameSession {
    pub fn new(
        game_id: Uuid,
        size: GridSize,
        timings: SessionTimings,
        mut rng: StdRng,
    ) -> Result<Self, GameError> {
        let state = GameState::new(size, &mut rng)?;
        Ok(Self {
            game_id,
            generation: 0,
            state,
            rng,
            timings,
            clock: SessionClock::new(),
            resolution_timer: None,
            subscribers: HashMap::new(),
            manager: None,
            closing: false,
        })
    }

    fn snapshot(&self) -> GameSnapshot {
        self.state.snapshot(self.game_id, self.generation)
    }

    fn broadcast(&self, msg: ServerMessage) {
        for addr in self.subscribers.values() {
            addr.do_send(msg.clone());
        }
    }

    fn send_state(&self) {
        debug!(
            "[GameSession] Broadcast state: game_id={} generation={} phase={:?} moves={} pairs={}/{}",
            self.game_id,
            self.generation,
            self.state.phase(),
            self.state.move_count(),
            self.state.matched_pairs(),
            self.state.total_pairs()
        );
        self.broadcast(ServerMessage::game_state(self.snapshot()));
    }

    /// Replace the game wholesale. Invalidates every timer of the previous generation.
    fn restart(&mut self, size: GridSize, ctx: &mut Context<Self>) -> Result<(), GameError> {
        let state = match GameState::new(size, &mut self.rng) {
            Ok(state) => state,
            Err(e) => {
                warn!("[GameSession] Cannot deal a {} board: {}", size, e);
                self.broadcast(ServerMessage::error("CONFIGURATION_FAULT", &e.to_string(), Some(size.label())));
                return Err(e);
            }
        };

        self.generation += 1;
        self.clock.stop(ctx);
        if let Some(handle) = self.resolution_timer.take() {
            ctx.cancel_future(handle);
        }
        self.state = state;

        info!(
            "[GameSession] New game: game_id={} size={} generation={}",
            self.game_id, size, self.generation
        );
        self.send_state();
        Ok(())
    }

    fn schedule_resolution(&mut self, resolution: Resolution, ctx: &mut Context<Self>) {
        let generation = self.generation;
        let delay = self.timings.resolve_delay(&resolution);
        let handle = ctx.run_later(delay, move |act, ctx| {
            act.on_resolution_due(generation, ctx);
        });
        self.resolution_timer = Some(handle);
    }

    fn on_resolution_due(&mut self, generation: u64, ctx: &mut Context<Self>) {
        if generation != self.generation {
            debug!(
                "[GameSession] Dropping stale resolution (generation {} != {})",
                generation, self.generation
            );
            return;
        }
        self.resolution_timer = None;

        if self.state.resolve_pending().is_none() {
            return;
        }

        if self.state.is_finished() {
            // Stop before broadcasting so no tick lands after the final state.
            self.clock.stop(ctx);
            let summary = VictorySummary::new(
                self.game_id,
                self.state.move_count(),
                self.state.elapsed_seconds(),
            );
            info!(
                "[GameSession] Game {} finished in {} moves ({})",
                self.game_id, summary.moves, summary.time_display
            );
            self.send_state();
            self.broadcast(ServerMessage::Victory(summary));
        } else {
            self.send_state();
        }
    }

    pub(super) fn on_tick(&mut self, generation: u64, ctx: &mut Context<Self>) {
        if generation != self.generation {
            debug!("[GameSession] Dropping stale tick (generation {})", generation);
            return;
        }
        if self.state.tick() {
            self.send_state();
        } else {
            self.clock.stop(ctx);
        }
    }
}

impl Handler<SelectTile> for GameSession {
    type Result = ();

    fn handle(&mut self, msg: SelectTile, ctx: &mut Context<Self>) -> Self::Result {
        match self.state.select_tile(msg.position) {
            Selection::Ignored(_) => return,
            Selection::Flipped { .. } => {}
            Selection::PairCompleted(resolution) => {
                debug!(
                    "[GameSession] Pair {:?} on tiles {} and {}",
                    resolution.outcome, resolution.first, resolution.second
                );
                self.schedule_resolution(resolution, ctx);
            }
        }

        if !self.clock.is_running() && self.state.phase().is_clock_active() {
            self.clock.start(ctx, self.generation, self.timings.tick_interval);
        }
        self.send_state();
    }
}

impl Handler<NewGame> for GameSession {
    type Result = Result<(), GameError>;

    fn handle(&mut self, _msg: NewGame, ctx: &mut Context<Self>) -> Self::Result {
        let size = self.state.size();
        self.restart(size, ctx)
    }
}

impl Handler<ChangeDifficulty> for GameSession {
    type Result = Result<(), GameError>;

    fn handle(&mut self, msg: ChangeDifficulty, ctx: &mut Context<Self>) -> Self::Result {
        self.restart(msg.size, ctx)
    }
}

impl Handler<Subscribe> for GameSession {
    type Result = bool;

    fn handle(&mut self, msg: Subscribe, _: &mut Context<Self>) -> Self::Result {
        if self.closing {
            debug!("[GameSession] Refusing subscriber {} on closing session {}", msg.client_id, self.game_id);
            return false;
        }
        msg.addr.do_send(ServerMessage::game_state(self.snapshot()));
        self.subscribers.insert(msg.client_id, msg.addr);
        debug!("[GameSession] {} subscribers on {}", self.subscribers.len(), self.game_id);
        true
    }
}

impl Handler<Unsubscribe> for GameSession {
    type Result = ();

    fn handle(&mut self, msg: Unsubscribe, ctx: &mut Context<Self>) -> Self::Result {
        self.subscribers.remove(&msg.client_id);
        if self.subscribers.is_empty() {
            self.closing = true;
            self.clock.stop(ctx);
            ctx.stop();
        }
    }
}

impl Handler<GetSnapshot> for GameSession {
    type Result = MessageResult<GetSnapshot>;

    fn handle(&mut self, _msg: GetSnapshot, _: &mut Context<Self>) -> Self::Result {
        MessageResult(self.snapshot())
    }
}

/// Registry of live sessions.
pub struct GameSessionManager {
    sessions: HashMap<Uuid, Addr<GameSession>>,
    timings: SessionTimings,
}

impl GameSessionManager {
    pub fn new() -> Self {
        Self::with_timings(SessionTimings::default())
    }

    pub fn with_timings(timings: SessionTimings) -> Self {
        Self {
            sessions: HashMap::new(),
            timings,
        }
    }

    pub fn create_game(
        &mut self,
        size: GridSize,
        manager: Addr<GameSessionManager>,
    ) -> Result<(Uuid, Addr<GameSession>), GameError> {
        let game_id = Uuid::new_v4();
        let rng = StdRng::from_rng(&mut rand::rng());
        let mut session = GameSession::new(game_id, size, self.timings, rng)?;
        session.manager = Some(manager);

        let addr = session.start();
        self.sessions.insert(game_id, addr.clone());
        info!("[Manager] Created game {} ({}), {} live", game_id, size, self.sessions.len());
        Ok((game_id, addr))
    }
}

impl Default for GameSessionManager {
    fn default() -> Self {
        Self::new()
    }
}

impl Actor for GameSessionManager {
    type Context = Context<Self>;
}

#[derive(Message)]
#[rtype(result = "Result<(Uuid, Addr<GameSession>), GameError>")]
pub struct CreateGame {
    pub size: GridSize,
}

impl Handler<CreateGame> for GameSessionManager {
    type Result = Result<(Uuid, Addr<GameSession>), GameError>;

    fn handle(&mut self, msg: CreateGame, ctx: &mut Context<Self>) -> Self::Result {
        self.create_game(msg.size, ctx.address())
    }
}

#[derive(Message)]
#[rtype(result = "Result<Addr<GameSession>, String>")]
pub struct GetGameSession {
    pub game_id: Uuid,
}

impl Handler<GetGameSession> for GameSessionManager {
    type Result = Result<Addr<GameSession>, String>;

    fn handle(&mut self, msg: GetGameSession, _: &mut Context<Self>) -> Self::Result {
        self.sessions.get(&msg.game_id)
            .filter(|addr| addr.connected())
            .cloned()
            .ok_or_else(|| "Game session not found".to_string())
    }
}

#[derive(Message)]
#[rtype(result = "usize")]
pub struct CountGames;

impl Handler<CountGames> for GameSessionManager {
    type Result = usize;

    fn handle(&mut self, _msg: CountGames, _: &mut Context<Self>) -> Self::Result {
        self.sessions.len()
    }
}

#[derive(Message)]
#[rtype(result = "()")]
pub struct RemoveGame {
    pub game_id: Uuid,
}

impl Handler<RemoveGame> for GameSessionManager {
    type Result = ();

    fn handle(&mut self, msg: RemoveGame, _: &mut Context<Self>) -> Self::Result {
        if self.sessions.remove(&msg.game_id).is_some() {
            info!("[Manager] Removed game {}, {} live", msg.game_id, self.sessions.len());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    use crate::game::types::Phase;

    const SEED: u64 = 17;

    fn fast_timings(tick_ms: u64) -> SessionTimings {
        // Match settles after 30ms, mismatch after 100ms.
        SessionTimings {
            tick_interval: Duration::from_millis(tick_ms),
            resolve_divisor: 10,
        }
    }

    fn start_session(size: GridSize, timings: SessionTimings) -> Addr<GameSession> {
        GameSession::new(Uuid::nil(), size, timings, StdRng::seed_from_u64(SEED))
            .unwrap()
            .start()
    }

    /// Replays the session's rng to learn the boards it will deal.
    fn expected_boards(size: GridSize, count: usize) -> Vec<GameState> {
        let mut rng = StdRng::seed_from_u64(SEED);
        (0..count).map(|_| GameState::new(size, &mut rng).unwrap()).collect()
    }

    fn partner_of(board: &GameState, pos: usize) -> usize {
        let content = board.tiles()[pos].content;
        board.tiles().iter()
            .position(|t| t.id != pos && t.content == content)
            .unwrap()
    }

    fn stranger_of(board: &GameState, pos: usize) -> usize {
        let content = board.tiles()[pos].content;
        board.tiles().iter()
            .position(|t| t.content != content)
            .unwrap()
    }

    async fn sleep_ms(ms: u64) {
        tokio::time::sleep(Duration::from_millis(ms)).await;
    }

    struct Collector {
        seen: Arc<Mutex<Vec<ServerMessage>>>,
    }

    impl Actor for Collector {
        type Context = Context<Self>;
    }

    impl Handler<ServerMessage> for Collector {
        type Result = ();

        fn handle(&mut self, msg: ServerMessage, _: &mut Context<Self>) {
            self.seen.lock().unwrap().push(msg);
        }
    }

    #[actix::test]
    async fn mismatch_flips_back_after_the_longer_delay() {
        let board = &expected_boards(GridSize::Medium, 1)[0];
        let a = 0;
        let b = stranger_of(board, a);
        let session = start_session(GridSize::Medium, fast_timings(60_000));

        session.send(SelectTile { position: a }).await.unwrap();
        session.send(SelectTile { position: b }).await.unwrap();
        let snap = session.send(GetSnapshot).await.unwrap();
        assert_eq!(snap.phase, Phase::Locked);
        assert_eq!(snap.move_count, 1);

        sleep_ms(50).await;
        let snap = session.send(GetSnapshot).await.unwrap();
        assert_eq!(snap.phase, Phase::Locked);
        assert!(snap.tiles[a].is_flipped && snap.tiles[b].is_flipped);

        sleep_ms(120).await;
        let snap = session.send(GetSnapshot).await.unwrap();
        assert_eq!(snap.phase, Phase::Running);
        assert!(!snap.tiles[a].is_flipped && !snap.tiles[b].is_flipped);
        assert!(!snap.tiles[a].is_matched && !snap.tiles[b].is_matched);
        assert_eq!(snap.matched_pairs, 0);
    }

    #[actix::test]
    async fn match_settles_after_the_short_delay() {
        let board = &expected_boards(GridSize::Medium, 1)[0];
        let a = 0;
        let b = partner_of(board, a);
        let session = start_session(GridSize::Medium, fast_timings(60_000));

        session.send(SelectTile { position: a }).await.unwrap();
        session.send(SelectTile { position: b }).await.unwrap();

        // A third click during the lock is dropped.
        let other = stranger_of(board, a);
        session.send(SelectTile { position: other }).await.unwrap();

        sleep_ms(70).await;
        let snap = session.send(GetSnapshot).await.unwrap();
        assert_eq!(snap.phase, Phase::Running);
        assert!(snap.tiles[a].is_matched && snap.tiles[b].is_matched);
        assert!(!snap.tiles[other].is_flipped);
        assert_eq!(snap.matched_pairs, 1);
        assert_eq!(snap.move_count, 1);
    }

    #[actix::test]
    async fn restart_discards_in_flight_resolution() {
        let boards = expected_boards(GridSize::Medium, 2);
        let (old, new) = (&boards[0], &boards[1]);
        let session = start_session(GridSize::Medium, fast_timings(60_000));

        // Old game: a match that would settle at 30ms.
        session.send(SelectTile { position: 0 }).await.unwrap();
        session.send(SelectTile { position: partner_of(old, 0) }).await.unwrap();

        session.send(NewGame).await.unwrap().unwrap();

        // New game: a mismatch that must stay up for 100ms.
        let b = stranger_of(new, 0);
        session.send(SelectTile { position: 0 }).await.unwrap();
        session.send(SelectTile { position: b }).await.unwrap();

        sleep_ms(60).await;
        let snap = session.send(GetSnapshot).await.unwrap();
        assert_eq!(snap.generation, 1);
        assert_eq!(snap.phase, Phase::Locked);
        assert!(snap.tiles[0].is_flipped && snap.tiles[b].is_flipped);
        assert_eq!(snap.matched_pairs, 0);
        assert_eq!(snap.move_count, 1);
    }

    #[actix::test]
    async fn clock_runs_from_first_selection_until_finish() {
        let boards = expected_boards(GridSize::Small, 2);
        let board = &boards[0];
        let session = start_session(GridSize::Small, fast_timings(20));

        sleep_ms(70).await;
        let snap = session.send(GetSnapshot).await.unwrap();
        assert_eq!(snap.elapsed_seconds, 0);
        assert_eq!(snap.phase, Phase::Idle);

        session.send(SelectTile { position: 0 }).await.unwrap();
        sleep_ms(110).await;
        let snap = session.send(GetSnapshot).await.unwrap();
        assert!(snap.elapsed_seconds >= 2, "clock did not advance: {}", snap.elapsed_seconds);

        let first_partner = partner_of(board, 0);
        session.send(SelectTile { position: first_partner }).await.unwrap();
        sleep_ms(60).await;
        let rest: Vec<usize> = (0..4).filter(|&p| p != 0 && p != first_partner).collect();
        session.send(SelectTile { position: rest[0] }).await.unwrap();
        session.send(SelectTile { position: rest[1] }).await.unwrap();
        sleep_ms(60).await;

        let finished = session.send(GetSnapshot).await.unwrap();
        assert!(finished.finished);
        assert_eq!(finished.matched_pairs, 2);
        assert_eq!(finished.move_count, 2);

        sleep_ms(100).await;
        let later = session.send(GetSnapshot).await.unwrap();
        assert_eq!(later.elapsed_seconds, finished.elapsed_seconds);

        session.send(ChangeDifficulty { size: GridSize::Large }).await.unwrap().unwrap();
        let fresh = session.send(GetSnapshot).await.unwrap();
        assert_eq!(fresh.elapsed_seconds, 0);
        assert_eq!(fresh.tiles.len(), 36);
        assert_eq!(fresh.phase, Phase::Idle);
    }

    #[actix::test]
    async fn subscribers_receive_state_and_victory() {
        let board = &expected_boards(GridSize::Small, 1)[0];
        let session = start_session(GridSize::Small, fast_timings(60_000));
        let seen = Arc::new(Mutex::new(Vec::new()));
        let collector = Collector { seen: seen.clone() }.start();

        session
            .send(Subscribe { client_id: Uuid::new_v4(), addr: collector.recipient() })
            .await
            .unwrap();

        let p = partner_of(board, 0);
        let rest: Vec<usize> = (0..4).filter(|&x| x != 0 && x != p).collect();
        session.send(SelectTile { position: 0 }).await.unwrap();
        session.send(SelectTile { position: p }).await.unwrap();
        sleep_ms(60).await;
        session.send(SelectTile { position: rest[0] }).await.unwrap();
        session.send(SelectTile { position: rest[1] }).await.unwrap();
        sleep_ms(60).await;

        let seen = seen.lock().unwrap();
        assert!(matches!(seen.first(), Some(ServerMessage::GameState(s)) if s.phase == Phase::Idle));
        let victories: Vec<_> = seen.iter()
            .filter_map(|m| match m {
                ServerMessage::Victory(v) => Some(v.clone()),
                _ => None,
            })
            .collect();
        assert_eq!(victories.len(), 1);
        assert_eq!(victories[0].moves, 2);
    }

    #[actix::test]
    async fn manager_tracks_sessions() {
        let manager = GameSessionManager::with_timings(fast_timings(60_000)).start();

        let (game_id, session) = manager.send(CreateGame { size: GridSize::Small }).await.unwrap().unwrap();
        let found = manager.send(GetGameSession { game_id }).await.unwrap();
        assert!(found.is_ok());
        assert_eq!(manager.send(CountGames).await.unwrap(), 1);
        assert_eq!(session.send(GetSnapshot).await.unwrap().game_id, game_id);

        let missing = manager.send(GetGameSession { game_id: Uuid::new_v4() }).await.unwrap();
        assert!(missing.is_err());

        manager.send(RemoveGame { game_id }).await.unwrap();
        assert!(manager.send(GetGameSession { game_id }).await.unwrap().is_err());
        assert_eq!(manager.send(CountGames).await.unwrap(), 0);
    }

    #[actix::test]
    async fn restart_mid_game_leaves_no_stray_tick() {
        let session = start_session(GridSize::Medium, fast_timings(20));

        session.send(SelectTile { position: 0 }).await.unwrap();
        sleep_ms(70).await;
        let running = session.send(GetSnapshot).await.unwrap();
        assert!(running.elapsed_seconds > 0);
        assert_eq!(running.phase, Phase::Running);

        session.send(NewGame).await.unwrap().unwrap();
        sleep_ms(120).await;

        let fresh = session.send(GetSnapshot).await.unwrap();
        assert_eq!(fresh.generation, 1);
        assert_eq!(fresh.elapsed_seconds, 0);
        assert_eq!(fresh.phase, Phase::Idle);
    }

    #[actix::test]
    async fn closing_session_refuses_new_subscribers() {
        let session = start_session(GridSize::Small, fast_timings(60_000));
        let collector = Collector { seen: Arc::new(Mutex::new(Vec::new())) }.start();
        let first = Uuid::new_v4();

        let accepted = session
            .send(Subscribe { client_id: first, addr: collector.clone().recipient() })
            .await
            .unwrap();
        assert!(accepted);

        session.send(Unsubscribe { client_id: first }).await.unwrap();
        let late = session
            .send(Subscribe { client_id: Uuid::new_v4(), addr: collector.recipient() })
            .await;
        assert!(!matches!(late, Ok(true)));
    }
}
