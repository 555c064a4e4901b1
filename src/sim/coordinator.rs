//! Threaded unattended play.
//!
//! ## Workers
//!
//! - **Player** (one per seat): waits on the condvar until it is their turn,
//!   rolls, moves a token chosen by the [`TokenPolicy`], wakes everyone, then
//!   sleeps `move_delay` outside the lock. If it could not move, it waits on
//!   the condvar for `poll_interval` instead. Exits once the game is over or
//!   its player has finished or been eliminated.
//! - **Line watcher** (one per [`ScanLine`]): every `scan_interval`, resolves
//!   overlapping opposing tokens on its line as captures.
//! - **Supervisor**: every `supervisor_interval`, records finishers and
//!   eliminates players who went `stall_threshold` ticks without a six or a
//!   capture.
//!
//! All of them share one `Mutex<GameState>`. Nothing is held across a sleep,
//! and every wait has a timeout, so a worker always gets to observe game over
//! or its own cancellation.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};
use std::thread::{self, JoinHandle};

use tracing::{debug, info, instrument, trace, warn};

use super::config::{ScanLine, SimulationConfig};
use super::policy::{TokenPolicy, UniformRandom};
use crate::core::{GameRng, LudoError, PlayerId, PlayerMap, Result};
use crate::turn::{GameState, TurnPhase, TurnSequencer};

/// Game state shared between the facade and simulation workers.
pub type SharedGame = Arc<(Mutex<GameState>, Condvar)>;

/// Wrap a state for sharing.
#[must_use]
pub fn share(state: GameState) -> SharedGame {
    Arc::new((Mutex::new(state), Condvar::new()))
}

/// Lock the shared state, recovering it if a worker panicked while holding it.
pub fn lock(game: &SharedGame) -> MutexGuard<'_, GameState> {
    game.0.lock().unwrap_or_else(PoisonError::into_inner)
}

/// What a finished simulation run looked like.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SimulationReport {
    pub finishing_order: Vec<PlayerId>,
    pub eliminated: Vec<PlayerId>,
    pub moves: usize,
}

/// Everything a worker needs besides its own loop state.
struct WorkerContext<P> {
    game: SharedGame,
    config: SimulationConfig,
    policy: Arc<P>,
    sequencer: TurnSequencer,
    /// Raised when any worker panics so the rest stop instead of waiting on
    /// a game that can no longer finish.
    abort: AtomicBool,
}

impl<P> WorkerContext<P> {
    fn should_stop(&self, state: &GameState) -> bool {
        state.is_game_over() || self.abort.load(Ordering::Acquire)
    }

    fn notify(&self) {
        self.game.1.notify_all();
    }
}

/// Raises the abort flag if the owning worker unwinds.
struct PanicGuard<'a, P>(&'a WorkerContext<P>);

impl<P> Drop for PanicGuard<'_, P> {
    fn drop(&mut self) {
        if thread::panicking() {
            self.0.abort.store(true, Ordering::Release);
            self.0.notify();
        }
    }
}

/// Runs a game to completion on worker threads.
#[derive(Clone, Debug)]
pub struct SimulationCoordinator<P: TokenPolicy = UniformRandom> {
    config: SimulationConfig,
    policy: Arc<P>,
    sequencer: TurnSequencer,
}

impl SimulationCoordinator {
    /// Create a coordinator that moves random tokens.
    #[must_use]
    pub fn new(config: SimulationConfig) -> Self {
        Self::with_policy(config, UniformRandom)
    }
}

impl<P: TokenPolicy + 'static> SimulationCoordinator<P> {
    /// Create a coordinator with a custom token policy.
    #[must_use]
    pub fn with_policy(config: SimulationConfig, policy: P) -> Self {
        Self {
            config,
            policy: Arc::new(policy),
            sequencer: TurnSequencer::new(),
        }
    }

    /// Simulation configuration.
    #[must_use]
    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Play `game` until it is over, then join every worker.
    ///
    /// Returns [`LudoError::WorkerPanicked`] naming the first worker that
    /// panicked, after all the others have been joined.
    #[instrument(skip_all, fields(lines = self.config.scan_lines.len()))]
    pub fn run(&self, game: &SharedGame) -> Result<SimulationReport> {
        let (player_count, mut seed_rng) = {
            let mut state = lock(game);
            let rng = match self.config.seed {
                Some(seed) => GameRng::new(seed),
                None => state.rng.fork(),
            };
            (state.player_count(), rng)
        };

        let ctx = Arc::new(WorkerContext {
            game: Arc::clone(game),
            config: self.config.clone(),
            policy: Arc::clone(&self.policy),
            sequencer: self.sequencer,
            abort: AtomicBool::new(false),
        });

        info!(players = player_count, "simulation started");

        let mut handles: Vec<(String, std::io::Result<JoinHandle<()>>)> = Vec::new();
        for player in PlayerId::all(player_count) {
            let ctx = Arc::clone(&ctx);
            let rng = seed_rng.fork();
            let name = format!("player-{}", player.index() + 1);
            let handle = thread::Builder::new()
                .name(name.clone())
                .spawn(move || player_worker(&ctx, player, rng));
            handles.push((name, handle));
        }
        for &line in &self.config.scan_lines {
            let ctx = Arc::clone(&ctx);
            let name = format!("watch-{line}");
            let handle = thread::Builder::new()
                .name(name.clone())
                .spawn(move || line_watcher(&ctx, line));
            handles.push((name, handle));
        }
        {
            let ctx = Arc::clone(&ctx);
            let name = "supervisor".to_string();
            let handle = thread::Builder::new()
                .name(name.clone())
                .spawn(move || supervisor(&ctx, player_count));
            handles.push((name, handle));
        }

        for (name, handle) in &handles {
            if let Err(err) = handle {
                warn!(worker = %name, %err, "failed to spawn worker");
                ctx.abort.store(true, Ordering::Release);
                ctx.notify();
            }
        }

        let mut failure = None;
        for (name, handle) in handles {
            let joined = handle.is_ok_and(|handle| handle.join().is_ok());
            if !joined {
                warn!(worker = %name, "worker failed");
                failure.get_or_insert(name);
            }
        }

        if let Some(name) = failure {
            return Err(LudoError::WorkerPanicked(name));
        }

        let state = lock(game);
        let report = SimulationReport {
            finishing_order: state.board.finishing_order().to_vec(),
            eliminated: PlayerId::all(player_count)
                .filter(|&p| state.board.is_eliminated(p))
                .collect(),
            moves: state.history().len(),
        };
        info!(order = ?report.finishing_order, moves = report.moves, "simulation finished");
        Ok(report)
    }
}

fn player_worker<P: TokenPolicy>(ctx: &WorkerContext<P>, player: PlayerId, mut rng: GameRng) {
    let _guard = PanicGuard(ctx);
    let (mutex, condvar) = &*ctx.game;

    loop {
        let mut state = mutex.lock().unwrap_or_else(PoisonError::into_inner);

        loop {
            if ctx.should_stop(&state) || !state.board.in_contention(player) {
                debug!(%player, "player worker exiting");
                drop(state);
                ctx.notify();
                return;
            }
            if state.current_player() == player {
                break;
            }
            state = condvar
                .wait_timeout(state, ctx.config.poll_interval)
                .map_or_else(|poisoned| poisoned.into_inner().0, |(guard, _)| guard);
        }

        let dice = match state.phase() {
            TurnPhase::AwaitingMove(_, dice) => Ok(dice),
            _ => ctx.sequencer.roll(&mut state),
        };
        let moved = dice.and_then(|dice| {
            match ctx.policy.choose_token(&ctx.sequencer, &state, player, dice, &mut rng) {
                Some(token) => ctx.sequencer.move_token(&mut state, player, token).map(Some),
                None => Ok(None),
            }
        });
        let idle = match moved {
            Ok(Some(report)) => {
                trace!(%player, token = report.token, outcome = ?report.outcome, "simulated move");
                false
            }
            Ok(None) => {
                debug!(%player, "no token to move");
                true
            }
            Err(err) => {
                debug!(%player, %err, "simulated move rejected");
                true
            }
        };
        if idle {
            // Nothing moved: back off until another worker changes the board.
            drop(condvar.wait_timeout(state, ctx.config.poll_interval));
            continue;
        }

        drop(state);
        ctx.notify();
        if !ctx.config.move_delay.is_zero() {
            thread::sleep(ctx.config.move_delay);
        }
    }
}

fn line_watcher<P>(ctx: &WorkerContext<P>, line: ScanLine) {
    let _guard = PanicGuard(ctx);

    loop {
        {
            let mut state = lock(&ctx.game);
            if ctx.should_stop(&state) {
                return;
            }
            let resolved = ctx.sequencer.sweep_captures(&mut state, |square| line.contains(square));
            if resolved > 0 {
                debug!(%line, resolved, "line watcher resolved overlaps");
                drop(state);
                ctx.notify();
            }
        }
        thread::sleep(ctx.config.scan_interval);
    }
}

fn supervisor<P>(ctx: &WorkerContext<P>, player_count: usize) {
    let _guard = PanicGuard(ctx);
    let mut last_progress = PlayerMap::with_value(player_count, 0u64);
    let mut stalled = PlayerMap::with_value(player_count, 0u32);

    loop {
        thread::sleep(ctx.config.supervisor_interval);

        let mut state = lock(&ctx.game);
        if ctx.should_stop(&state) {
            return;
        }

        for player in PlayerId::all(player_count) {
            if state.is_game_over() {
                break;
            }
            if state.board.is_eliminated(player) {
                continue;
            }
            if state.board.all_finished(player) {
                ctx.sequencer.record_finish(&mut state, player);
                continue;
            }

            let progress = state.progress(player);
            if progress != last_progress[player] {
                last_progress[player] = progress;
                stalled[player] = 0;
                continue;
            }

            stalled[player] += 1;
            let threshold = ctx.config.stall_threshold;
            if threshold > 0 && stalled[player] >= threshold {
                warn!(%player, ticks = stalled[player], "no progress, eliminating");
                ctx.sequencer.eliminate(&mut state, player);
            }
        }

        let over = ctx.should_stop(&state);
        drop(state);
        ctx.notify();
        if over {
            return;
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::AtomicUsize;
    use std::time::Duration;

    use super::*;
    use crate::board::{Color, PathTable, TOKENS_PER_PLAYER};
    use crate::core::LudoConfig;

    fn fast_config() -> SimulationConfig {
        SimulationConfig::default()
            .with_move_delay(Duration::ZERO)
            .with_stall_threshold(0)
            .with_seed(11)
    }

    fn shared(players: usize, team: bool) -> SharedGame {
        let config = LudoConfig::new(players)
            .with_team_mode(team)
            .with_simulation(true)
            .with_seed(5);
        share(GameState::new(config).unwrap())
    }

    #[test]
    fn test_two_player_simulation_completes() {
        let game = shared(2, false);
        let report = SimulationCoordinator::new(fast_config()).run(&game).unwrap();

        let state = lock(&game);
        assert!(state.is_game_over());
        assert_eq!(report.finishing_order.len(), 1);
        assert_eq!(report.moves, state.history().len());
        assert!(report.eliminated.is_empty());
    }

    #[test]
    fn test_four_player_team_simulation_completes() {
        let game = shared(4, true);
        let report = SimulationCoordinator::new(fast_config()).run(&game).unwrap();

        let mut order = report.finishing_order.clone();
        order.sort_unstable();
        order.dedup();
        assert_eq!(order.len(), report.finishing_order.len());
        assert!((2..=3).contains(&report.finishing_order.len()));
        let state = lock(&game);
        assert!(state.is_game_over());
        assert!(state.is_decided());
    }

    #[test]
    fn test_stalled_players_are_eliminated() {
        let game = shared(3, false);
        // Supervisor ticks far outpace moves, so nobody can keep up.
        let config = SimulationConfig {
            supervisor_interval: Duration::from_millis(1),
            move_delay: Duration::from_millis(50),
            ..fast_config()
        }
        .with_stall_threshold(1);

        let report = SimulationCoordinator::new(config).run(&game).unwrap();
        let state = lock(&game);
        assert!(state.is_game_over());
        assert_eq!(report.eliminated.len(), 2);
        assert!(report.finishing_order.is_empty());
        assert_eq!(state.contenders().count(), 1);
    }

    #[test]
    fn test_finished_game_returns_immediately() {
        let game = shared(2, false);
        {
            let mut state = lock(&game);
            let seq = TurnSequencer::new();
            seq.eliminate(&mut state, PlayerId::new(1));
            assert!(state.is_game_over());
        }

        let report = SimulationCoordinator::new(fast_config()).run(&game).unwrap();
        assert_eq!(report.moves, 0);
        assert_eq!(report.eliminated, vec![PlayerId::new(1)]);
    }

    /// Never picks a token, counting how often it was asked.
    struct Idle(Arc<AtomicUsize>);

    impl TokenPolicy for Idle {
        fn choose_token(
            &self,
            _: &TurnSequencer,
            _: &GameState,
            _: PlayerId,
            _: u8,
            _: &mut GameRng,
        ) -> Option<usize> {
            self.0.fetch_add(1, Ordering::Relaxed);
            None
        }
    }

    fn idle_config() -> SimulationConfig {
        SimulationConfig::default()
            .with_move_delay(Duration::ZERO)
            .with_stall_threshold(3)
            .with_seed(11)
    }

    #[test]
    fn test_line_watcher_resolves_overlap() {
        let game = shared(2, false);
        let square = PathTable::get().main_path(Color::Red)[3];
        {
            let mut state = lock(&game);
            state.board.place_token(PlayerId::new(0), 0, square);
            state.board.place_token(PlayerId::new(1), 0, square);
        }
        let config = idle_config().with_scan_lines([ScanLine::Row(square.row)]);
        let calls = Arc::new(AtomicUsize::new(0));

        let report = SimulationCoordinator::with_policy(config, Idle(Arc::clone(&calls)))
            .run(&game)
            .unwrap();

        let state = lock(&game);
        // Player 2 arrived last and never held the dice, so the sweep is its
        // only source of progress.
        assert_eq!(state.progress(PlayerId::new(1)), 1);
        assert!(state.board.is_in_yard(PlayerId::new(0), 0));
        assert_eq!(state.board.token_at(PlayerId::new(1), square), Some(0));
        assert_eq!(report.eliminated, vec![PlayerId::new(0)]);
        assert_eq!(report.moves, 0);
        // The stuck player waited on the condvar instead of spinning.
        assert!(calls.load(Ordering::Relaxed) < 100);
    }

    #[test]
    fn test_supervisor_records_unrecorded_finisher() {
        let game = shared(3, false);
        {
            let mut state = lock(&game);
            for token in 0..TOKENS_PER_PLAYER {
                state.board.finish_token(PlayerId::new(1), token);
            }
            assert!(state.board.finishing_order().is_empty());
        }
        let calls = Arc::new(AtomicUsize::new(0));

        let report = SimulationCoordinator::with_policy(idle_config(), Idle(Arc::clone(&calls)))
            .run(&game)
            .unwrap();

        // Player 1 never passes the dice on, so only the supervisor can have
        // recorded player 2. Its worker exited, or `run` would not return.
        assert_eq!(report.finishing_order, vec![PlayerId::new(1)]);
        assert_eq!(report.eliminated.len(), 1);
        assert!(!report.eliminated.contains(&PlayerId::new(1)));
        assert!(lock(&game).is_game_over());
    }

    #[test]
    fn test_panicking_policy_is_reported() {
        struct Panics;

        impl TokenPolicy for Panics {
            fn choose_token(
                &self,
                _: &TurnSequencer,
                _: &GameState,
                _: PlayerId,
                _: u8,
                _: &mut GameRng,
            ) -> Option<usize> {
                panic!("policy failure");
            }
        }

        let game = shared(2, false);
        let err = SimulationCoordinator::with_policy(fast_config(), Panics)
            .run(&game)
            .unwrap_err();
        assert_eq!(err, LudoError::WorkerPanicked("player-1".to_string()));
    }
}
