//! crossterm front end: forwards key presses to a [`Game`] and paints the
//! frame produced by [`render`] after every input.

use std::io::{self, Write};

use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    style::{self, Attribute, Color},
    terminal::{self, ClearType},
    ExecutableCommand, QueueableCommand,
};
use log::debug;
use rand::Rng;

use crate::engine::Move;
use crate::game::{Game, GameStatus};
use crate::render::{render, Frame, RenderOptions, Rgb};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    Dir(Move),
    NewGame,
    Quit,
}

/// Map a key press to a game input. Releases and unbound keys map to `None`.
pub fn map_key(key: KeyEvent) -> Option<InputEvent> {
    if key.kind != KeyEventKind::Press {
        return None;
    }
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return Some(InputEvent::Quit);
    }
    let input = match key.code {
        KeyCode::Up | KeyCode::Char('w' | 'W' | 'k' | 'K') => InputEvent::Dir(Move::Up),
        KeyCode::Down | KeyCode::Char('s' | 'S' | 'j' | 'J') => InputEvent::Dir(Move::Down),
        KeyCode::Left | KeyCode::Char('a' | 'A' | 'h' | 'H') => InputEvent::Dir(Move::Left),
        KeyCode::Right | KeyCode::Char('d' | 'D' | 'l' | 'L') => InputEvent::Dir(Move::Right),
        KeyCode::Char('n' | 'N') => InputEvent::NewGame,
        KeyCode::Char('q' | 'Q') | KeyCode::Esc => InputEvent::Quit,
        _ => return None,
    };
    Some(input)
}

/// Raw mode + alternate screen for as long as the guard lives.
pub struct TerminalGuard {
    _private: (),
}

impl TerminalGuard {
    pub fn enter() -> io::Result<Self> {
        terminal::enable_raw_mode()?;
        // Built before the screen commands so a failure below still restores raw mode.
        let guard = Self { _private: () };
        prepare_screen(&mut io::stdout())?;
        Ok(guard)
    }
}

fn prepare_screen<W: Write>(out: &mut W) -> io::Result<()> {
    out.execute(terminal::EnterAlternateScreen)?;
    out.execute(cursor::Hide)?;
    Ok(())
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let mut stdout = io::stdout();
        let _ = stdout.execute(cursor::Show);
        let _ = stdout.execute(terminal::LeaveAlternateScreen);
        let _ = terminal::disable_raw_mode();
    }
}

fn color(c: Rgb) -> Color { Color::Rgb { r: c.0, g: c.1, b: c.2 } }

/// Paint `frame` from the top-left corner.
pub fn draw<W: Write>(out: &mut W, frame: &Frame) -> io::Result<()> {
    out.queue(terminal::Clear(ClearType::All))?;
    out.queue(cursor::MoveTo(0, 0))?;
    for line in &frame.lines {
        for span in line {
            if let Some(fg) = span.fg {
                out.queue(style::SetForegroundColor(color(fg)))?;
            }
            if let Some(bg) = span.bg {
                out.queue(style::SetBackgroundColor(color(bg)))?;
            }
            if span.bold {
                out.queue(style::SetAttribute(Attribute::Bold))?;
            }
            out.queue(style::Print(&span.text))?;
            out.queue(style::SetAttribute(Attribute::Reset))?;
            out.queue(style::ResetColor)?;
        }
        out.queue(style::Print("\r\n"))?;
    }
    out.flush()
}

/// Block until a bound key is pressed.
pub fn next_input() -> io::Result<InputEvent> {
    loop {
        if let Event::Key(key) = event::read()? {
            if let Some(input) = map_key(key) {
                return Ok(input);
            }
        }
    }
}

/// Run the interactive loop until the player quits.
pub fn run<R: Rng>(game: &mut Game<R>, opts: RenderOptions) -> io::Result<()> {
    let _guard = TerminalGuard::enter()?;
    let mut stdout = io::stdout();
    draw(&mut stdout, &render(&game.snapshot(), game.status(), opts))?;

    loop {
        match next_input()? {
            InputEvent::Quit => break,
            InputEvent::NewGame => {
                game.new_game();
            }
            // Over only accepts new game or quit.
            InputEvent::Dir(_) if game.status() == GameStatus::Over => continue,
            InputEvent::Dir(dir) => {
                let outcome = game.handle_input(dir);
                if !outcome.changed {
                    debug!("{dir} did not change the board");
                }
            }
        }
        draw(&mut stdout, &render(&game.snapshot(), game.status(), opts))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::Span;
    use crossterm::event::KeyEventState;

    fn press(code: KeyCode) -> KeyEvent { KeyEvent::new(code, KeyModifiers::NONE) }

    #[test]
    fn it_maps_arrow_and_letter_keys() {
        assert_eq!(map_key(press(KeyCode::Left)), Some(InputEvent::Dir(Move::Left)));
        assert_eq!(map_key(press(KeyCode::Char('w'))), Some(InputEvent::Dir(Move::Up)));
        assert_eq!(map_key(press(KeyCode::Char('j'))), Some(InputEvent::Dir(Move::Down)));
        assert_eq!(map_key(press(KeyCode::Char('D'))), Some(InputEvent::Dir(Move::Right)));
        assert_eq!(map_key(press(KeyCode::Char('n'))), Some(InputEvent::NewGame));
        assert_eq!(map_key(press(KeyCode::Esc)), Some(InputEvent::Quit));
        assert_eq!(map_key(press(KeyCode::Char('x'))), None);
        assert_eq!(
            map_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)),
            Some(InputEvent::Quit)
        );
    }

    #[test]
    fn it_maps_uppercase_vim_keys() {
        assert_eq!(map_key(press(KeyCode::Char('K'))), Some(InputEvent::Dir(Move::Up)));
        assert_eq!(map_key(press(KeyCode::Char('J'))), Some(InputEvent::Dir(Move::Down)));
        assert_eq!(map_key(press(KeyCode::Char('H'))), Some(InputEvent::Dir(Move::Left)));
        assert_eq!(map_key(press(KeyCode::Char('L'))), Some(InputEvent::Dir(Move::Right)));
    }

    struct FailingWriter;

    impl Write for FailingWriter {
        fn write(&mut self, _: &[u8]) -> io::Result<usize> { Err(io::Error::new(io::ErrorKind::Other, "closed")) }
        fn flush(&mut self) -> io::Result<()> { Ok(()) }
    }

    #[test]
    fn test_prepare_screen_order_and_errors() {
        let mut buf = Vec::new();
        prepare_screen(&mut buf).unwrap();
        let out = String::from_utf8(buf).unwrap();
        let alt = out.find("\x1b[?1049h").expect("enters alternate screen");
        let hide = out.find("\x1b[?25l").expect("hides cursor");
        assert!(alt < hide);
        assert!(prepare_screen(&mut FailingWriter).is_err());
    }

    #[test]
    fn it_ignores_key_release() {
        let release = KeyEvent::new_with_kind_and_state(
            KeyCode::Up,
            KeyModifiers::NONE,
            KeyEventKind::Release,
            KeyEventState::NONE,
        );
        assert_eq!(map_key(release), None);
    }

    #[test]
    fn test_draw_writes_text() {
        let frame = Frame {
            lines: vec![
                vec![Span { text: "Score: 4".into(), fg: None, bg: None, bold: true }],
                vec![Span { text: "2".into(), fg: Some(Rgb(1, 2, 3)), bg: Some(Rgb(4, 5, 6)), bold: false }],
            ],
        };
        let mut buf = Vec::new();
        draw(&mut buf, &frame).unwrap();
        let out = String::from_utf8(buf).unwrap();
        assert!(out.contains("Score: 4"));
        assert_eq!(out.matches("\r\n").count(), 2);
        assert!(out.contains("38;2;1;2;3"));
    }
}
