use criterion::{black_box, criterion_group, criterion_main, Criterion};

use ludo_engine::board::{BoardState, Color, PathTable, LOOP_LEN};
use ludo_engine::core::{GameRng, LudoConfig, PlayerId};
use ludo_engine::rules::MovementResolver;
use ludo_engine::turn::{GameState, TurnSequencer};

/// A crowded mid-game board: every player has three tokens spread round the
/// loop.
fn crowded_board() -> BoardState {
    let table = PathTable::get();
    let mut board = BoardState::new(4, false);
    for player in PlayerId::all(4) {
        let main = table.main_path(Color::of(player));
        for token in 0..3 {
            board.place_token(player, token, main[(token * 17 + 5) % LOOP_LEN]);
        }
    }
    board
}

fn bench_resolve(c: &mut Criterion) {
    let resolver = MovementResolver::new();
    let board = crowded_board();

    c.bench_function("resolve_all_tokens_all_dice", |b| {
        b.iter(|| {
            for player in PlayerId::all(4) {
                for token in 0..4 {
                    for dice in 1..=6 {
                        black_box(resolver.resolve(black_box(&board), player, token, dice));
                    }
                }
            }
        });
    });
}

fn bench_random_game(c: &mut Criterion) {
    let sequencer = TurnSequencer::new();

    c.bench_function("random_four_player_game", |b| {
        let mut seed = 0;
        b.iter(|| {
            seed += 1;
            let mut state = GameState::new(LudoConfig::new(4).with_seed(seed)).unwrap();
            let mut rng = GameRng::new(seed);
            while !state.is_game_over() {
                sequencer.play_random_turn(&mut state, &mut rng).unwrap();
            }
            black_box(state.history().len())
        });
    });
}

criterion_group!(benches, bench_resolve, bench_random_game);
criterion_main!(benches);
