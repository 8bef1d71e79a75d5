//! App Integration Tests
//!
//! The editor is replaced by in-memory pipes and the terminal by ratatui's
//! `TestBackend`, so the whole host loop can be driven step by step.

use std::time::{Duration, Instant};

use crossterm::event::{Event, KeyCode, KeyEvent, KeyModifiers};
use ratatui::backend::TestBackend;
use ratatui::buffer::Buffer;
use ratatui::style::Color;
use ratatui::Terminal;
use tokio::io::{duplex, AsyncBufReadExt, AsyncWriteExt, BufReader, DuplexStream};
use tokio::time::timeout;

use bridge_core::{
    CellMetrics, GridSize, LayoutOptions, RpcBridge, ScreenModel, Session, Viewport,
};
use kak_surface_tui::App;

const STEP_TIMEOUT: Duration = Duration::from_secs(2);

// ============================================================================
// Fixtures
// ============================================================================

/// App on a `columns` × `rows` terminal, with the editor's ends of the pipes
fn app(columns: u16, rows: u16) -> (App, DuplexStream, BufReader<DuplexStream>) {
    let (editor_out, bridge_in) = duplex(64 * 1024);
    let (bridge_out, editor_in) = duplex(64 * 1024);
    let bridge = RpcBridge::from_streams(bridge_in, bridge_out);
    let session = Session::new(
        ScreenModel::new(),
        Viewport::with_grid(rows, columns, CellMetrics::default()),
        Duration::from_millis(50),
        LayoutOptions::default(),
    );
    (
        App::with_parts(session, bridge),
        editor_out,
        BufReader::new(editor_in),
    )
}

fn face(fg: &str, bg: &str) -> String {
    format!(r#"{{"fg":"{fg}","bg":"{bg}","attributes":[]}}"#)
}

fn line(text: &str) -> String {
    format!(r#"[{{"face":{},"contents":"{text}"}}]"#, face("default", "default"))
}

fn notification(method: &str, params: &str) -> String {
    format!(r#"{{"jsonrpc":"2.0","method":"{method}","params":[{params}]}}"#) + "\n"
}

/// Feed lines, close the editor's output and apply everything
async fn feed_and_close(app: &mut App, mut editor: DuplexStream, lines: &[String]) {
    editor.write_all(lines.concat().as_bytes()).await.unwrap();
    drop(editor);
    timeout(STEP_TIMEOUT, async {
        while app.is_running() && app.pump_bridge().await {}
    })
    .await
    .expect("bridge did not close");
}

fn row(buffer: &Buffer, y: u16) -> String {
    (0..buffer.area.width)
        .map(|x| buffer[(x, y)].symbol().to_string())
        .collect()
}

// ============================================================================
// Rendering
// ============================================================================

#[tokio::test]
async fn test_draw_reaches_terminal() {
    let (mut app, editor, _editor_in) = app(20, 4);
    let lines = [
        notification(
            "draw",
            &format!(
                "[{},{}],{},{}",
                line("hello"),
                line("world"),
                face("white", "black"),
                face("blue", "black")
            ),
        ),
        notification("draw_status", &format!("{},{}", line(":q"), line("normal"))),
    ];
    feed_and_close(&mut app, editor, &lines).await;
    assert!(!app.is_running());

    let mut terminal = Terminal::new(TestBackend::new(20, 4)).unwrap();
    app.draw(&mut terminal).unwrap();

    let buffer = terminal.backend().buffer();
    assert_eq!(row(buffer, 0), "hello               ");
    assert_eq!(row(buffer, 1), "world               ");
    assert_eq!(row(buffer, 3), ":q            normal");
    assert_eq!(buffer[(0, 0)].fg, Color::Gray);
    assert_eq!(buffer[(0, 2)].bg, Color::Black);
}

#[tokio::test]
async fn test_menu_overlays_buffer() {
    let (mut app, editor, _editor_in) = app(12, 4);
    let items = ["aaa", "bbb", "ccc", "ddd"].map(line).join(",");
    let lines = [
        notification(
            "draw",
            &format!(
                "[{},{},{}],{},{}",
                line("xxxxxxxxxxxx"),
                line("xxxxxxxxxxxx"),
                line("xxxxxxxxxxxx"),
                face("white", "black"),
                face("white", "black")
            ),
        ),
        notification(
            "menu_show",
            &format!(
                r#"[{items}],{{"line":0,"column":0}},{},{},"prompt""#,
                face("black", "cyan"),
                face("white", "blue")
            ),
        ),
        notification("menu_select", "0"),
    ];
    feed_and_close(&mut app, editor, &lines).await;

    let mut terminal = Terminal::new(TestBackend::new(12, 4)).unwrap();
    app.draw(&mut terminal).unwrap();

    let buffer = terminal.backend().buffer();
    assert_eq!(row(buffer, 1), "xxxxxxxxxxxx");
    assert_eq!(row(buffer, 2), "aaabbbcccddd");
    assert_eq!(buffer[(0, 2)].bg, Color::Cyan);
    assert_eq!(buffer[(3, 2)].bg, Color::Blue);
}

// ============================================================================
// Input and resize
// ============================================================================

#[tokio::test]
async fn test_keys_are_forwarded() {
    let (mut app, _editor, mut editor_in) = app(20, 4);

    app.handle_terminal_event(Event::Key(KeyEvent::new(
        KeyCode::Char('x'),
        KeyModifiers::CONTROL | KeyModifiers::ALT,
    )));
    app.handle_terminal_event(Event::Key(KeyEvent::new(KeyCode::F(9), KeyModifiers::NONE)));
    app.handle_terminal_event(Event::Key(KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE)));

    let mut received = String::new();
    for _ in 0..2 {
        timeout(STEP_TIMEOUT, editor_in.read_line(&mut received))
            .await
            .unwrap()
            .unwrap();
    }
    assert_eq!(
        received,
        concat!(
            r#"{"jsonrpc":"2.0","method":"keys","params":["<c-a-x>"]}"#,
            "\n",
            r#"{"jsonrpc":"2.0","method":"keys","params":["<ret>"]}"#,
            "\n"
        )
    );
}

#[tokio::test]
async fn test_resize_updates_layout_immediately() {
    let (mut app, _editor, _editor_in) = app(20, 4);
    let before = Instant::now();

    app.handle_terminal_event(Event::Resize(30, 8));

    let session = app.session();
    assert_eq!(session.viewport().grid, GridSize::new(8, 30));
    let deadline = session.resize_deadline().unwrap();
    assert!(deadline >= before + Duration::from_millis(50));
}

#[tokio::test]
async fn test_session_end_stops_app() {
    let (mut app, editor, _editor_in) = app(20, 4);
    feed_and_close(&mut app, editor, &[]).await;

    assert!(!app.is_running());
    assert!(app.session().is_ended());
    app.shutdown().await.unwrap();
}
