use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Side length of the board.
pub const SIZE: usize = 4;

/// Values a freshly spawned tile may take, drawn with equal probability.
pub const SPAWN_VALUES: [Tile; 2] = [2, 4];

/// Value of the tiles placed at game start.
pub const START_TILE: Tile = 2;

pub type Tile = u32;
pub type Score = u64;
pub type Grid = [[Tile; SIZE]; SIZE];

/// A direction to move/merge tiles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Move {
    Up,
    Down,
    Left,
    Right,
}

impl Move {
    pub const ALL: [Move; 4] = [Move::Up, Move::Down, Move::Left, Move::Right];

    /// Primitive operations that implement this direction, applied in order.
    ///
    /// Every pipeline is the left move (`Stack, Combine, Stack`) conjugated by
    /// the geometric ops that rotate this direction onto "left".
    #[inline]
    pub fn pipeline(self) -> &'static [Step] {
        match self {
            Move::Left => LEFT,
            Move::Right => RIGHT,
            Move::Up => UP,
            Move::Down => DOWN,
        }
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Move::Up => "up",
            Move::Down => "down",
            Move::Left => "left",
            Move::Right => "right",
        };
        f.write_str(s)
    }
}

/// A direction-agnostic board transformation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// Left-compact every row, preserving order of non-zero tiles.
    Stack,
    /// Single left-to-right merge sweep over every row.
    Combine,
    /// Mirror every row end-to-end.
    Reverse,
    /// Swap rows and columns.
    Transpose,
}

use Step::{Combine, Reverse, Stack, Transpose};

const LEFT: &[Step] = &[Stack, Combine, Stack];
const RIGHT: &[Step] = &[Reverse, Stack, Combine, Stack, Reverse];
const UP: &[Step] = &[Transpose, Stack, Combine, Stack, Transpose];
const DOWN: &[Step] = &[Transpose, Reverse, Stack, Combine, Stack, Reverse, Transpose];

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    #[error("cell ({row}, {col}) holds {value}, which is not a power of two >= 2")]
    InvalidTile { row: usize, col: usize, value: Tile },
}

/// Result of applying a move in place.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MoveDelta {
    /// True if any cell differs from the pre-move board.
    pub changed: bool,
    /// Sum of the values of all tiles produced by merges.
    pub gained: Score,
}

/// A tile placed by the spawner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Spawn {
    pub row: usize,
    pub col: usize,
    pub value: Tile,
}

/// Row-major 4x4 2048 board. `0` is an empty cell; every other cell holds a
/// power of two >= 2.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub struct Board(Grid);

impl Board {
    /// A constant empty board (all zeros).
    pub const EMPTY: Board = Board([[0; SIZE]; SIZE]);

    /// Build a board from raw rows without validating tile values.
    #[inline]
    pub const fn from_rows(rows: Grid) -> Self { Board(rows) }

    /// Build a board from raw rows, rejecting values that are neither 0 nor a
    /// power of two >= 2.
    ///
    /// ```
    /// use tile_2048::engine::{Board, EngineError};
    /// assert!(Board::try_from_rows([[2, 4, 0, 0], [0; 4], [0; 4], [0; 4]]).is_ok());
    /// assert_eq!(
    ///     Board::try_from_rows([[3, 0, 0, 0], [0; 4], [0; 4], [0; 4]]),
    ///     Err(EngineError::InvalidTile { row: 0, col: 0, value: 3 }),
    /// );
    /// ```
    pub fn try_from_rows(rows: Grid) -> Result<Self, EngineError> {
        for (row, line) in rows.iter().enumerate() {
            for (col, &value) in line.iter().enumerate() {
                if value != 0 && (value < 2 || !value.is_power_of_two()) {
                    return Err(EngineError::InvalidTile { row, col, value });
                }
            }
        }
        Ok(Board(rows))
    }

    /// Borrow the raw rows.
    #[inline]
    pub fn rows(&self) -> &Grid { &self.0 }

    /// Consume this `Board`, returning the raw rows.
    #[inline]
    pub fn into_rows(self) -> Grid { self.0 }

    #[inline]
    pub fn get(&self, row: usize, col: usize) -> Tile { self.0[row][col] }

    /// Run a single primitive step, returning the merge score it produced.
    pub fn apply_step(&mut self, step: Step) -> Score {
        match step {
            Step::Stack => {
                self.stack();
                0
            }
            Step::Combine => self.combine(),
            Step::Reverse => {
                self.reverse();
                0
            }
            Step::Transpose => {
                self.transpose();
                0
            }
        }
    }

    pub fn stack(&mut self) {
        for row in self.0.iter_mut() {
            stack_row(row);
        }
    }

    pub fn combine(&mut self) -> Score {
        self.0.iter_mut().map(combine_row).sum()
    }

    pub fn reverse(&mut self) {
        for row in self.0.iter_mut() {
            row.reverse();
        }
    }

    pub fn transpose(&mut self) {
        for i in 0..SIZE {
            for j in (i + 1)..SIZE {
                let tmp = self.0[i][j];
                self.0[i][j] = self.0[j][i];
                self.0[j][i] = tmp;
            }
        }
    }

    /// Slide and merge tiles in `dir` in place. No tile is spawned.
    ///
    /// ```
    /// use tile_2048::engine::{Board, Move};
    /// let mut b = Board::from_rows([[2, 2, 0, 0], [0; 4], [0; 4], [0; 4]]);
    /// let delta = b.apply_move(Move::Left);
    /// assert!(delta.changed);
    /// assert_eq!(delta.gained, 4);
    /// assert_eq!(b.rows()[0], [4, 0, 0, 0]);
    /// ```
    pub fn apply_move(&mut self, dir: Move) -> MoveDelta {
        let before = *self;
        let gained = dir.pipeline().iter().map(|&step| self.apply_step(step)).sum();
        MoveDelta { changed: *self != before, gained }
    }

    /// Return the board resulting from sliding/merging tiles in `dir`, and the
    /// score that move earns. No randomness.
    #[inline]
    pub fn shift(self, dir: Move) -> (Self, Score) {
        let mut next = self;
        let delta = next.apply_move(dir);
        (next, delta.gained)
    }

    /// True if moving in `dir` would change the board.
    #[inline]
    pub fn can_move(self, dir: Move) -> bool { self.shift(dir).0 != self }

    /// Directions that would change the board, in `Move::ALL` order.
    pub fn legal_moves(self) -> Vec<Move> {
        Move::ALL.into_iter().filter(|&m| self.can_move(m)).collect()
    }

    /// Place a 2 or 4 (50/50) on a uniformly random empty cell.
    ///
    /// Returns `None` and leaves the board untouched when it is full.
    pub fn spawn_tile<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Option<Spawn> {
        let (row, col) = self.random_empty_cell(rng)?;
        let value = SPAWN_VALUES[rng.gen_range(0..SPAWN_VALUES.len())];
        self.0[row][col] = value;
        Some(Spawn { row, col, value })
    }

    /// Place `value` on a uniformly random empty cell. `None` if the board is full.
    pub fn place_random<R: Rng + ?Sized>(&mut self, value: Tile, rng: &mut R) -> Option<Spawn> {
        let (row, col) = self.random_empty_cell(rng)?;
        self.0[row][col] = value;
        Some(Spawn { row, col, value })
    }

    /// Like [`Self::spawn_tile`] but by value, for chaining on fresh boards.
    ///
    /// ```
    /// use tile_2048::engine::Board;
    /// use rand::{SeedableRng, rngs::StdRng};
    /// let mut rng = StdRng::seed_from_u64(123);
    /// let b = Board::EMPTY.with_random_tile(&mut rng).with_random_tile(&mut rng);
    /// assert_eq!(b.count_empty(), 14);
    /// ```
    #[inline]
    pub fn with_random_tile<R: Rng + ?Sized>(mut self, rng: &mut R) -> Self {
        self.spawn_tile(rng);
        self
    }

    // Rejection sampling: draw (row, col) pairs until one is empty.
    fn random_empty_cell<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<(usize, usize)> {
        if self.is_full() {
            return None;
        }
        loop {
            let row = rng.gen_range(0..SIZE);
            let col = rng.gen_range(0..SIZE);
            if self.0[row][col] == 0 {
                return Some((row, col));
            }
        }
    }

    /// Return true if the board is full and no two orthogonal neighbours match.
    ///
    /// ```
    /// use tile_2048::engine::Board;
    /// assert!(!Board::EMPTY.is_game_over());
    /// let stuck = Board::from_rows([
    ///     [2, 4, 2, 4],
    ///     [4, 2, 4, 2],
    ///     [2, 4, 2, 4],
    ///     [4, 2, 4, 2],
    /// ]);
    /// assert!(stuck.is_game_over());
    /// ```
    pub fn is_game_over(&self) -> bool {
        if !self.is_full() {
            return false;
        }
        for i in 0..SIZE {
            for j in 0..SIZE {
                let v = self.0[i][j];
                if j + 1 < SIZE && v == self.0[i][j + 1] {
                    return false;
                }
                if i + 1 < SIZE && v == self.0[i + 1][j] {
                    return false;
                }
            }
        }
        true
    }

    /// Count the number of empty cells on the board.
    #[inline]
    pub fn count_empty(&self) -> usize { self.tiles().filter(|&v| v == 0).count() }

    #[inline]
    pub fn is_full(&self) -> bool { self.tiles().all(|v| v != 0) }

    /// Return the highest tile value present on the board (0 if empty).
    #[inline]
    pub fn highest_tile(&self) -> Tile { self.tiles().max().unwrap_or(0) }

    /// Cell values in row-major order.
    #[inline]
    pub fn tiles(&self) -> impl Iterator<Item = Tile> + '_ { self.0.iter().flatten().copied() }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, row) in self.0.iter().enumerate() {
            if i > 0 {
                writeln!(f, "-------------------------------")?;
            }
            let cells: Vec<String> = row.iter().map(format_val).collect();
            writeln!(f, "{}", cells.join("|"))?;
        }
        Ok(())
    }
}

impl From<Grid> for Board { fn from(rows: Grid) -> Self { Board::from_rows(rows) } }
impl From<Board> for Grid { fn from(b: Board) -> Self { b.into_rows() } }

fn stack_row(row: &mut [Tile; SIZE]) {
    let mut fill = 0;
    for j in 0..SIZE {
        let v = row[j];
        if v != 0 {
            row[j] = 0;
            row[fill] = v;
            fill += 1;
        }
    }
}

fn combine_row(row: &mut [Tile; SIZE]) -> Score {
    let mut score = 0;
    for j in 0..SIZE - 1 {
        // A merged cell is zeroed at j + 1, so it can never pair again at the next j.
        if row[j] != 0 && row[j] == row[j + 1] {
            row[j] *= 2;
            row[j + 1] = 0;
            score += Score::from(row[j]);
        }
    }
    score
}

fn format_val(val: &Tile) -> String {
    match val {
        0 => " ".repeat(7),
        x => format!("{:^7}", x),
    }
}
