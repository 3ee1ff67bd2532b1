//! Action applier
//!
//! Walks parsed actions against the grid, scrollback, brush, and mode
//! flags. This is the only place every component meets.

use log::{debug, trace};

use umi_core::{Cell, Color, Mode, ScreenErase};
use umi_parser::Action;

use crate::terminal::{Event, Terminal};

impl Terminal {
    pub(crate) fn apply(&mut self, action: Action, events: &mut Vec<Event>) {
        match action {
            Action::Print(c) => {
                let evicted =
                    self.grid
                        .put_char(c, self.style, self.modes.auto_wrap, self.modes.insert);
                self.push_rows(evicted);
            }
            Action::Execute(byte) => trace!("unhandled control 0x{byte:02X}"),

            Action::Bell => events.push(Event::Bell),
            Action::Backspace => self.grid.backspace(),
            Action::Tab => self.grid.tab(),
            Action::LineFeed => {
                let evicted = self.grid.linefeed();
                self.push_rows(evicted);
            }
            Action::CarriageReturn => self.grid.carriage_return(),
            Action::ReverseIndex => self.grid.reverse_index(),

            Action::CursorUp(n) => self.grid.move_up(n),
            Action::CursorDown(n) => self.grid.move_down(n),
            Action::CursorForward(n) => self.grid.move_forward(n),
            Action::CursorBack(n) => self.grid.move_back(n),
            Action::CursorToRow(row) => self.grid.goto_row(row),
            Action::CursorToColumn(col) => self.grid.goto_col(col),
            Action::CursorTo { row, col } => self.grid.goto(row, col),
            Action::CursorSave => self.grid.save_cursor(),
            Action::CursorRestore => self.grid.restore_cursor(),
            Action::SetCursorShape(shape) => self.grid.cursor_mut().shape = shape,

            Action::EraseScreen(mode) => {
                self.grid.erase_screen(mode);
                if mode == ScreenErase::AllAndScrollback {
                    self.scrollback.clear();
                }
            }
            Action::EraseLine(mode) => self.grid.erase_line(mode),

            Action::SetForeground(color) => self.style.fg = color,
            Action::SetBackground(color) => self.style.bg = color,
            Action::ResetForeground => self.style.fg = Color::Default,
            Action::ResetBackground => self.style.bg = Color::Default,
            Action::SetAttribute(flags) => self.style.attrs.insert(flags),
            Action::ResetAttribute(flags) => self.style.attrs.remove(flags),
            Action::ResetAttributes => self.style.reset(),

            Action::ScrollUp(n) => {
                let evicted = self.grid.scroll_up(n);
                self.push_rows(evicted);
            }
            Action::ScrollDown(n) => self.grid.scroll_down(n),
            Action::SetScrollRegion { top, bottom } => self.grid.set_scroll_region(top, bottom),
            Action::ResetScrollRegion => self.grid.reset_scroll_region(),

            Action::InsertLines(n) => self.grid.insert_lines(n),
            Action::DeleteLines(n) => self.grid.delete_lines(n),
            Action::InsertChars(n) => self.grid.insert_chars(n),
            Action::DeleteChars(n) => self.grid.delete_chars(n),
            Action::EraseChars(n) => self.grid.erase_chars(n),

            Action::SetTitle(title) => events.push(Event::Title(title)),
            Action::SetHyperlink { url, id } => events.push(Event::Hyperlink { url, id }),

            Action::SetMode(mode) => self.set_mode(mode, true),
            Action::UnsetMode(mode) => self.set_mode(mode, false),

            Action::Reset => {
                debug!("full reset");
                self.soft_reset();
            }
        }
    }

    fn set_mode(&mut self, mode: Mode, enabled: bool) {
        self.modes.set(mode, enabled);
        if mode == Mode::ShowCursor {
            self.grid.cursor_mut().visible = enabled;
        }
    }

    fn push_rows(&mut self, rows: Vec<Vec<Cell>>) {
        for row in rows {
            self.scrollback.push_row(row);
        }
    }
}

#[cfg(test)]
mod tests {
    use umi_core::{Attrs, Color, CursorShape, NamedColor};

    use crate::terminal::{Event, Terminal};

    #[test]
    fn test_cursor_position_sequence() {
        let mut term = Terminal::new(80, 24);
        term.feed(b"\x1b[10;20H");
        assert_eq!(term.cursor().row, 9);
        assert_eq!(term.cursor().col, 19);
    }

    #[test]
    fn test_cursor_moves_clamp() {
        let mut term = Terminal::new(80, 24);
        term.feed(b"\x1b[999A\x1b[999D");
        assert_eq!((term.cursor().row, term.cursor().col), (0, 0));

        term.feed(b"\x1b[999B\x1b[999C");
        assert_eq!((term.cursor().row, term.cursor().col), (23, 79));
    }

    #[test]
    fn test_printed_cells_carry_style() {
        let mut term = Terminal::new(10, 2);
        term.feed(b"\x1b[1;31mx");
        let cell = *term.grid().get(0, 0).unwrap();
        assert_eq!(cell.c, 'x');
        assert_eq!(cell.fg, Color::Named(NamedColor::Red));
        assert!(cell.attrs.contains(Attrs::BOLD));
    }

    #[test]
    fn test_sgr_reset_restores_defaults() {
        let mut term = Terminal::new(10, 2);
        term.feed(b"\x1b[1;4;31mx\x1b[0my");
        let y = *term.grid().get(0, 1).unwrap();
        assert_eq!(y.fg, Color::Default);
        assert!(y.attrs.is_empty());
    }

    #[test]
    fn test_attribute_unset() {
        let mut term = Terminal::new(10, 2);
        term.feed(b"\x1b[1;2mx\x1b[22my");
        let x = *term.grid().get(0, 0).unwrap();
        let y = *term.grid().get(0, 1).unwrap();
        assert!(x.attrs.contains(Attrs::BOLD | Attrs::DIM));
        assert!(y.attrs.is_empty());
    }

    #[test]
    fn test_save_restore_cursor() {
        let mut term = Terminal::new(80, 24);
        term.feed(b"\x1b[10;20H\x1b7\x1b[1;1H");
        assert_eq!(term.cursor().row, 0);

        term.feed(b"\x1b8");
        assert_eq!(term.cursor().row, 9);
        assert_eq!(term.cursor().col, 19);
    }

    #[test]
    fn test_restore_without_save_is_noop() {
        let mut term = Terminal::new(80, 24);
        term.feed(b"\x1b[5;5H\x1b8");
        assert_eq!((term.cursor().row, term.cursor().col), (4, 4));
    }

    #[test]
    fn test_cursor_visibility_mode() {
        let mut term = Terminal::new(10, 2);
        term.feed(b"\x1b[?25l");
        assert!(!term.cursor().visible);
        assert!(!term.modes().show_cursor);

        term.feed(b"\x1b[?25h");
        assert!(term.cursor().visible);
    }

    #[test]
    fn test_cursor_shape() {
        let mut term = Terminal::new(10, 2);
        term.feed(b"\x1b[5 q");
        assert_eq!(term.cursor().shape, CursorShape::Bar);
    }

    #[test]
    fn test_insert_mode_shifts() {
        let mut term = Terminal::new(10, 1);
        term.feed(b"abc\x1b[1;1H\x1b[4hX");
        assert_eq!(term.snapshot().row_text(0), "Xabc");

        term.feed(b"\x1b[4l");
        term.feed(b"Y");
        assert_eq!(term.snapshot().row_text(0), "XYbc");
    }

    #[test]
    fn test_autowrap_mode_off() {
        let mut term = Terminal::new(3, 2);
        term.feed(b"\x1b[?7labcdef");
        assert_eq!(term.snapshot().row_text(0), "abf");
        assert_eq!(term.cursor().row, 0);
    }

    #[test]
    fn test_erase_screen_keeps_scrollback() {
        let mut term = Terminal::new(4, 2);
        term.feed(b"a\r\nb\r\nc\r\n");
        let history = term.scrollback().len();
        assert!(history > 0);

        term.feed(b"\x1b[2J");
        assert_eq!(term.scrollback().len(), history);
    }

    #[test]
    fn test_erase_screen_with_history() {
        let mut term = Terminal::new(4, 2);
        term.feed(b"a\r\nb\r\nc\r\n");
        assert!(!term.scrollback().is_empty());

        term.feed(b"\x1b[3J");
        assert!(term.scrollback().is_empty());
        assert!(term.snapshot().cells.iter().all(|c| c.is_blank()));
    }

    #[test]
    fn test_title_event() {
        let mut term = Terminal::new(10, 2);
        let events = term.feed(b"\x1b]0;My Shell\x07");
        assert_eq!(events, vec![Event::Title("My Shell".to_string())]);
        // no title state is retained; only the event is surfaced
    }

    #[test]
    fn test_hyperlink_events() {
        let mut term = Terminal::new(30, 2);
        let events = term.feed(b"\x1b]8;;https://example.com\x07link\x1b]8;;\x07");
        assert_eq!(
            events,
            vec![
                Event::Hyperlink {
                    url: Some("https://example.com".to_string()),
                    id: None,
                },
                Event::Hyperlink { url: None, id: None },
            ]
        );
        assert_eq!(term.snapshot().row_text(0), "link");
    }

    #[test]
    fn test_bell_event() {
        let mut term = Terminal::new(10, 2);
        let events = term.feed(b"ding\x07");
        assert_eq!(events, vec![Event::Bell]);
    }

    #[test]
    fn test_scroll_up_feeds_scrollback() {
        let mut term = Terminal::new(4, 3);
        term.feed(b"top\x1b[2S");
        assert_eq!(term.scrollback().len(), 2);
        assert_eq!(term.scrollback().get(0).unwrap()[0].c, 't');
    }

    #[test]
    fn test_region_scroll_skips_scrollback() {
        let mut term = Terminal::new(10, 6);
        term.feed(b"\x1b[2;4r");
        term.feed(b"\x1b[2S\x1b[T");
        assert!(term.scrollback().is_empty());

        // back to full-grid scrolling, history flows again
        term.feed(b"\x1b[r\x1b[S");
        assert_eq!(term.scrollback().len(), 1);
    }

    #[test]
    fn test_linefeed_in_region_skips_scrollback() {
        let mut term = Terminal::new(10, 6);
        term.feed(b"\x1b[1;3r");
        term.feed(b"a\r\nb\r\nc\r\nd\r\n");
        assert!(term.scrollback().is_empty());
    }

    #[test]
    fn test_reverse_index_at_top() {
        let mut term = Terminal::new(10, 3);
        term.feed(b"one\x1b[1;1H\x1bM");
        assert_eq!(term.snapshot().row_text(0), "");
        assert_eq!(term.snapshot().row_text(1), "one");
    }

    #[test]
    fn test_insert_delete_lines_via_csi() {
        let mut term = Terminal::new(4, 3);
        term.feed(b"aa\r\nbb\r\ncc\x1b[1;1H\x1b[L");
        assert_eq!(term.snapshot().row_text(0), "");
        assert_eq!(term.snapshot().row_text(1), "aa");

        term.feed(b"\x1b[M");
        assert_eq!(term.snapshot().row_text(0), "aa");
    }

    #[test]
    fn test_delete_and_erase_chars_via_csi() {
        let mut term = Terminal::new(10, 1);
        term.feed(b"abcdef\x1b[1;2H\x1b[2P");
        assert_eq!(term.snapshot().row_text(0), "adef");

        term.feed(b"\x1b[2X");
        assert_eq!(term.snapshot().row_text(0), "a  f");
    }

    #[test]
    fn test_unknown_sequences_ignored() {
        let mut term = Terminal::new(10, 2);
        // unsupported CSI, unknown OSC, DCS blob: all consumed silently
        term.feed(b"\x1b[8;24;80t\x1b]52;c;x\x07\x1bPqdata\x1b\\ok");
        assert_eq!(term.snapshot().row_text(0), "ok");
    }

    #[test]
    fn test_reset_action() {
        let mut term = Terminal::new(10, 2);
        term.feed(b"\x1b[31mhello\x1bcx");
        let cell = *term.grid().get(0, 0).unwrap();
        assert_eq!(cell.c, 'x');
        assert_eq!(cell.fg, Color::Default);
        assert_eq!(term.cursor().col, 1);
    }
}
