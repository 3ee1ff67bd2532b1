//! End-to-end scenarios: byte streams in, screen state out
//!
//! These pin the behaviors that real terminals disagree on or that
//! regressions tend to hit: erase boundaries, resize overlap, the
//! scroll-region/scrollback policy, and chunked delivery.

use umi_core::{Attrs, Cell, Color, NamedColor};
use umi_term::Terminal;

#[test]
fn red_text_scenario() {
    let mut term = Terminal::new(10, 1);
    term.feed(b"Hi\x1b[31mRed\x1b[0m!");

    let snapshot = term.snapshot();
    assert_eq!(snapshot.row_text(0), "HiRed!");

    for col in 0..2 {
        let cell = snapshot.cell(0, col).unwrap();
        assert_eq!(cell.fg, Color::Default);
        assert!(cell.attrs.is_empty());
    }
    for col in 2..5 {
        let cell = snapshot.cell(0, col).unwrap();
        assert_eq!(cell.fg, Color::Named(NamedColor::Red));
    }
    let bang = snapshot.cell(0, 5).unwrap();
    assert_eq!(bang.c, '!');
    assert_eq!(bang.fg, Color::Default);
}

#[test]
fn clear_and_home_scenario() {
    let mut term = Terminal::new(20, 5);
    term.feed(b"some\r\ntext\r\neverywhere");
    term.feed(b"\x1b[2J\x1b[H");

    let snapshot = term.snapshot();
    assert!(snapshot.cells.iter().all(Cell::is_blank));
    assert_eq!(snapshot.cursor.row, 0);
    assert_eq!(snapshot.cursor.col, 0);
}

#[test]
fn sgr_roundtrip() {
    let mut term = Terminal::new(10, 1);
    term.feed(b"\x1b[1;4;31mx\x1b[0my");

    let x = *term.grid().get(0, 0).unwrap();
    assert!(x.attrs.contains(Attrs::BOLD));
    assert!(x.attrs.contains(Attrs::UNDERLINE));
    assert_eq!(x.fg, Color::Named(NamedColor::Red));

    let y = *term.grid().get(0, 1).unwrap();
    assert!(y.attrs.is_empty());
    assert_eq!(y.fg, Color::Default);
}

#[test]
fn erase_line_to_end_from_cursor() {
    let mut term = Terminal::new(5, 1);
    term.feed(b"AAAAA\x1b[1;3H\x1b[K");

    let snapshot = term.snapshot();
    assert_eq!(snapshot.cell(0, 0).unwrap().c, 'A');
    assert_eq!(snapshot.cell(0, 1).unwrap().c, 'A');
    for col in 2..5 {
        assert!(snapshot.cell(0, col).unwrap().is_blank());
    }
}

#[test]
fn resize_roundtrip_preserves_overlap() {
    let mut term = Terminal::new(8, 4);
    term.feed(b"abcdefgh\r\nsecond\r\nthird");

    term.resize(5, 2).unwrap();
    term.resize(8, 4).unwrap();

    let snapshot = term.snapshot();
    assert_eq!(snapshot.row_text(0), "abcde");
    assert_eq!(snapshot.row_text(1), "secon");
    assert_eq!(snapshot.row_text(2), "");
}

#[test]
fn scrollback_keeps_newest_rows_in_order() {
    let mut term = Terminal::with_scrollback(8, 2, 3);
    for i in 0..8 {
        term.feed(format!("line{i}\r\n").as_bytes());
    }

    let sb = term.scrollback();
    assert_eq!(sb.len(), 3);
    // lines 0..=6 scrolled off through the 2-row grid; the newest 3 remain
    assert_eq!(sb.get(0).unwrap()[4].c, '4');
    assert_eq!(sb.get(1).unwrap()[4].c, '5');
    assert_eq!(sb.get(2).unwrap()[4].c, '6');
}

#[test]
fn region_scrolling_never_feeds_scrollback() {
    let mut term = Terminal::new(10, 6);
    term.feed(b"\x1b[2;5r");
    for _ in 0..20 {
        term.feed(b"x\r\n");
    }
    assert!(term.scrollback().is_empty());

    term.feed(b"\x1b[r");
    term.feed(b"\x1b[6;1H\r\n");
    assert_eq!(term.scrollback().len(), 1);
}

#[test]
fn wrap_scroll_feeds_scrollback() {
    let mut term = Terminal::new(3, 2);
    term.feed(b"abcdefg");

    assert_eq!(term.scrollback().len(), 1);
    assert_eq!(term.scrollback().get(0).unwrap()[0].c, 'a');
    let snapshot = term.snapshot();
    assert_eq!(snapshot.row_text(0), "def");
    assert_eq!(snapshot.row_text(1), "g");
}

#[test]
fn chunked_delivery_matches_whole() {
    let input: &[u8] = b"Hi\x1b[1;31mRed\x1b[0m \x1b]0;t\x07\x1b[2;2H*\xE4\xB8\x96";

    let mut whole = Terminal::new(12, 4);
    whole.feed(input);

    for chunk_size in [1usize, 2, 3, 5] {
        let mut chunked = Terminal::new(12, 4);
        for chunk in input.chunks(chunk_size) {
            chunked.feed(chunk);
        }
        assert_eq!(
            chunked.snapshot(),
            whole.snapshot(),
            "chunk size {chunk_size} diverged"
        );
    }
}

#[test]
fn shell_session_transcript() {
    let mut term = Terminal::new(40, 6);
    term.feed(b"$ ls -la\r\n");
    term.feed(b"total 48\r\n");
    term.feed(b"drwxr-xr-x  \x1b[1;34m.\x1b[0m\r\n");
    term.feed(b"-rw-r--r--  file.txt\r\n");
    term.feed(b"$ ");

    let snapshot = term.snapshot();
    assert_eq!(snapshot.row_text(0), "$ ls -la");
    assert_eq!(snapshot.row_text(2), "drwxr-xr-x  .");
    assert_eq!(snapshot.row_text(4), "$ ");
    assert_eq!(
        snapshot.cell(2, 12).unwrap().fg,
        Color::Named(NamedColor::Blue)
    );
    assert!(snapshot.cell(2, 12).unwrap().attrs.contains(Attrs::BOLD));
    assert_eq!(snapshot.cursor.row, 4);
    assert_eq!(snapshot.cursor.col, 2);
}

#[test]
fn garbage_input_leaves_terminal_usable() {
    let mut term = Terminal::new(10, 3);
    let garbage: Vec<u8> = (0u8..=255).cycle().take(4096).collect();
    term.feed(&garbage);

    term.feed(b"\x1b[2J\x1b[Hok");
    assert_eq!(term.snapshot().row_text(0), "ok");
}
