//! Property tests for the move primitives, terminal detection and session
//! bookkeeping.

use proptest::prelude::*;
use tile_2048::engine::{Board, Grid, Move, Tile, SIZE};
use tile_2048::game::{Game, GameStatus};

fn cell() -> impl Strategy<Value = Tile> {
    prop_oneof![
        3 => Just(0u32),
        5 => (1u32..12).prop_map(|k| 1 << k),
    ]
}

fn grid() -> impl Strategy<Value = Grid> {
    prop::array::uniform4(prop::array::uniform4(cell()))
}

fn direction() -> impl Strategy<Value = Move> {
    prop::sample::select(Move::ALL.to_vec())
}

fn tile_sum(b: &Board) -> u64 { b.tiles().map(u64::from).sum() }

fn reference_game_over(g: &Grid) -> bool {
    for i in 0..SIZE {
        for j in 0..SIZE {
            if g[i][j] == 0 {
                return false;
            }
            if (j + 1 < SIZE && g[i][j] == g[i][j + 1]) || (i + 1 < SIZE && g[i][j] == g[i + 1][j]) {
                return false;
            }
        }
    }
    true
}

#[test]
fn combine_never_cascades() {
    let mut b = Board::from_rows([[2, 2, 2, 2], [4, 4, 8, 0], [8, 8, 8, 0], [0; 4]]);
    let gained = b.combine();
    assert_eq!(b.rows(), &[[4, 0, 4, 0], [8, 0, 8, 0], [16, 0, 8, 0], [0; 4]]);
    assert_eq!(gained, 8 + 8 + 16);
}

#[test]
fn merges_left_and_right_end_to_end() {
    let mut b = Board::from_rows([[2, 2, 0, 0], [0; 4], [0; 4], [0; 4]]);
    let delta = b.apply_move(Move::Left);
    assert!(delta.changed);
    assert_eq!(delta.gained, 4);
    assert_eq!(b, Board::from_rows([[4, 0, 0, 0], [0; 4], [0; 4], [0; 4]]));

    let (b, gained) = Board::from_rows([[2, 0, 0, 2], [0; 4], [0; 4], [0; 4]]).shift(Move::Right);
    assert_eq!(b.rows()[0], [0, 0, 0, 4]);
    assert_eq!(gained, 4);
}

proptest! {
    #[test]
    fn stack_is_idempotent(g in grid()) {
        let mut b = Board::from_rows(g);
        b.stack();
        let once = b;
        b.stack();
        prop_assert_eq!(b, once);
    }

    #[test]
    fn stack_preserves_row_order(g in grid()) {
        let mut b = Board::from_rows(g);
        b.stack();
        for (before, after) in g.iter().zip(b.rows()) {
            let nz: Vec<Tile> = before.iter().copied().filter(|&v| v != 0).collect();
            prop_assert_eq!(&after[..nz.len()], &nz[..]);
            prop_assert!(after[nz.len()..].iter().all(|&v| v == 0));
        }
    }

    #[test]
    fn combine_only_doubles_existing_tiles(g in grid()) {
        let mut b = Board::from_rows(g);
        let gained = b.combine();
        prop_assert_eq!(tile_sum(&b), tile_sum(&Board::from_rows(g)));
        for (before, after) in g.iter().zip(b.rows()) {
            for &v in after.iter().filter(|&&v| v != 0) {
                prop_assert!(before.contains(&v) || before.contains(&(v / 2)));
            }
        }
        // Every merge removes exactly one tile and scores the doubled value.
        let removed = Board::from_rows(g).tiles().filter(|&v| v != 0).count()
            - b.tiles().filter(|&v| v != 0).count();
        prop_assert_eq!(removed == 0, gained == 0);
    }

    #[test]
    fn reverse_and_transpose_are_involutions(g in grid()) {
        let mut b = Board::from_rows(g);
        b.reverse();
        b.reverse();
        prop_assert_eq!(b.into_rows(), g);
        b.transpose();
        b.transpose();
        prop_assert_eq!(b.into_rows(), g);
    }

    #[test]
    fn moves_preserve_tile_sum_and_report_changes(g in grid(), dir in direction()) {
        let before = Board::from_rows(g);
        let mut after = before;
        let delta = after.apply_move(dir);
        prop_assert_eq!(tile_sum(&after), tile_sum(&before));
        prop_assert_eq!(delta.changed, after != before);
        prop_assert_eq!(before.can_move(dir), delta.changed);
    }

    #[test]
    fn right_is_mirrored_left(g in grid()) {
        let mut mirrored = Board::from_rows(g);
        mirrored.reverse();
        let (mut left, gained_left) = mirrored.shift(Move::Left);
        left.reverse();
        let (right, gained_right) = Board::from_rows(g).shift(Move::Right);
        prop_assert_eq!(left, right);
        prop_assert_eq!(gained_left, gained_right);
    }

    #[test]
    fn up_is_transposed_left(g in grid()) {
        let mut t = Board::from_rows(g);
        t.transpose();
        let (mut left, _) = t.shift(Move::Left);
        left.transpose();
        prop_assert_eq!(left, Board::from_rows(g).shift(Move::Up).0);
    }

    #[test]
    fn game_over_matches_reference(g in grid()) {
        let b = Board::from_rows(g);
        prop_assert_eq!(b.is_game_over(), reference_game_over(&g));
        if b.is_game_over() {
            prop_assert!(b.legal_moves().is_empty());
        }
        if b.is_full() {
            prop_assert_eq!(b.is_game_over(), b.legal_moves().is_empty());
        }
    }

    #[test]
    fn session_score_tracks_merges(seed in any::<u64>(), dirs in prop::collection::vec(direction(), 1..120)) {
        let mut game = Game::seeded(seed);
        for dir in dirs {
            let before = game.snapshot();
            let (expected, gained) = before.board.shift(dir);
            let out = game.handle_input(dir);
            if before.board.is_game_over() {
                prop_assert_eq!(out.status, GameStatus::Over);
                prop_assert_eq!(out.snapshot, before);
                continue;
            }
            prop_assert_eq!(out.snapshot.score, before.score + gained);
            prop_assert!(Board::try_from_rows(out.snapshot.board.into_rows()).is_ok());
            if out.changed {
                let spawn = out.spawned.expect("changed move spawns");
                prop_assert_eq!(expected.get(spawn.row, spawn.col), 0);
                prop_assert!(spawn.value == 2 || spawn.value == 4);
                prop_assert_eq!(out.snapshot.board.count_empty() + 1, expected.count_empty());
            } else {
                prop_assert_eq!(out.snapshot, before);
                prop_assert_eq!(out.spawned, None);
            }
            prop_assert_eq!(out.status == GameStatus::Over, out.snapshot.board.is_game_over());
        }
    }
}
