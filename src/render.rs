//! Stateless rendering of a [`BoardSnapshot`] into styled text.
//!
//! [`render`] is a pure function; terminal I/O lives in [`crate::ui`].

use crate::engine::{Tile, SIZE};
use crate::game::{BoardSnapshot, GameStatus};

/// 24-bit colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    const fn hex(v: u32) -> Self { Rgb((v >> 16) as u8, (v >> 8) as u8, v as u8) }
}

pub const GRID_COLOR: Rgb = Rgb::hex(0xa39489);
pub const EMPTY_CELL_COLOR: Rgb = Rgb::hex(0xc2b3a9);
pub const GAME_OVER_COLOR: Rgb = Rgb::hex(0xff0000);
const DARK_NUMBER: Rgb = Rgb::hex(0x695c57);
const LIGHT_NUMBER: Rgb = Rgb::hex(0xffffff);

// Tiles above 2048 reuse the 2048 colour.
const CELL_COLORS: [(Tile, Rgb); 11] = [
    (2, Rgb::hex(0xfcefe6)),
    (4, Rgb::hex(0xf2e8cb)),
    (8, Rgb::hex(0xf5b682)),
    (16, Rgb::hex(0xf29446)),
    (32, Rgb::hex(0xff775c)),
    (64, Rgb::hex(0xe64c2e)),
    (128, Rgb::hex(0xede291)),
    (256, Rgb::hex(0xfce130)),
    (512, Rgb::hex(0xffdb4a)),
    (1024, Rgb::hex(0xf0b922)),
    (2048, Rgb::hex(0xfad74d)),
];

/// Cell width in columns, excluding borders.
pub const CELL_WIDTH: usize = 7;
/// Cell height in lines, excluding borders.
pub const CELL_HEIGHT: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderOptions {
    pub color: bool,
}

impl Default for RenderOptions {
    fn default() -> Self { Self { color: true } }
}

/// A run of text sharing one style.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Span {
    pub text: String,
    pub fg: Option<Rgb>,
    pub bg: Option<Rgb>,
    pub bold: bool,
}

impl Span {
    fn plain(text: impl Into<String>) -> Self { Self { text: text.into(), fg: None, bg: None, bold: false } }
}

pub type Line = Vec<Span>;

/// A fully laid-out screen.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Frame {
    pub lines: Vec<Line>,
}

impl Frame {
    /// Frame text without styling, one string per line.
    pub fn plain_lines(&self) -> Vec<String> {
        self.lines
            .iter()
            .map(|line| line.iter().map(|s| s.text.as_str()).collect())
            .collect()
    }
}

/// Background and number colour for a tile value.
pub fn tile_colors(value: Tile) -> (Rgb, Rgb) {
    if value == 0 {
        return (EMPTY_CELL_COLOR, DARK_NUMBER);
    }
    let bg = CELL_COLORS
        .iter()
        .find(|&&(v, _)| v == value)
        .map(|&(_, c)| c)
        .unwrap_or(CELL_COLORS[CELL_COLORS.len() - 1].1);
    let fg = if value <= 4 { DARK_NUMBER } else { LIGHT_NUMBER };
    (bg, fg)
}

/// Lay out the score header, the board and either the key help or the
/// game-over banner.
pub fn render(snapshot: &BoardSnapshot, status: GameStatus, opts: RenderOptions) -> Frame {
    let mut lines: Vec<Line> = Vec::with_capacity(SIZE * (CELL_HEIGHT + 1) + 6);
    lines.push(vec![Span { bold: true, ..Span::plain(" 2048") }]);
    lines.push(vec![Span::plain(format!(" Score: {}", snapshot.score))]);
    lines.push(Vec::new());

    let border = |left: char, cross: char, right: char| -> Line {
        let mut s = String::from(" ");
        s.push(left);
        for c in 0..SIZE {
            s.extend(std::iter::repeat('─').take(CELL_WIDTH));
            s.push(if c + 1 < SIZE { cross } else { right });
        }
        vec![styled(s, opts.color.then_some(GRID_COLOR), None)]
    };

    lines.push(border('┌', '┬', '┐'));
    for r in 0..SIZE {
        for sub in 0..CELL_HEIGHT {
            let mut line = vec![styled(" │".to_string(), opts.color.then_some(GRID_COLOR), None)];
            for c in 0..SIZE {
                let value = snapshot.cell(r, c);
                let text = if sub == CELL_HEIGHT / 2 && value != 0 {
                    format!("{:^width$}", value, width = CELL_WIDTH)
                } else {
                    " ".repeat(CELL_WIDTH)
                };
                let (bg, fg) = tile_colors(value);
                if opts.color {
                    line.push(Span { text, fg: Some(fg), bg: Some(bg), bold: true });
                } else {
                    line.push(Span::plain(text));
                }
                line.push(styled("│".to_string(), opts.color.then_some(GRID_COLOR), None));
            }
            lines.push(line);
        }
        if r + 1 < SIZE {
            lines.push(border('├', '┼', '┤'));
        }
    }
    lines.push(border('└', '┴', '┘'));
    lines.push(Vec::new());

    match status {
        GameStatus::InProgress => {
            lines.push(vec![Span::plain(" ←↑→↓ / WASD / HJKL: move   n: new game   q: quit")]);
        }
        GameStatus::Over => {
            lines.push(vec![Span {
                bold: true,
                ..styled(" Game Over".to_string(), opts.color.then_some(GAME_OVER_COLOR), None)
            }]);
            lines.push(vec![Span::plain(format!(" Final score: {}   n: new game   q: quit", snapshot.score))]);
        }
    }
    Frame { lines }
}

fn styled(text: String, fg: Option<Rgb>, bg: Option<Rgb>) -> Span { Span { text, fg, bg, bold: false } }
