//! End-to-end flow: wire lines → bridge events → session → frame → canvas

mod common;

use bridge_core::{
    Applied, BridgeEvent, CellMetrics, Color, EditorMessage, LayoutOptions, Region, ScreenModel,
    Session, Viewport,
};
use pretty_assertions::assert_eq;

use common::{draw, draw_status, info_show, menu_show, notification, session, TextCanvas};

/// Decode wire lines and feed them to the session
fn feed(session: &mut Session, lines: &[String]) {
    for line in lines {
        let msg = EditorMessage::parse(line.trim_end()).unwrap();
        session.handle(BridgeEvent::Message(msg)).unwrap();
    }
}

fn paint(session: &Session) -> TextCanvas {
    let viewport = session.viewport();
    let mut canvas = TextCanvas::new(viewport.rows(), viewport.columns());
    session.render().paint(&mut canvas);
    canvas
}

// =============================================================================
// Ordering
// =============================================================================

#[test]
fn test_message_ordering_scenario() {
    let mut session = session(10, 40);
    feed(
        &mut session,
        &[
            draw(&["hello", "world"]),
            draw_status(":edit", "normal"),
            info_show("title", "body", "prompt"),
            notification("info_hide", ""),
        ],
    );

    let model = session.model();
    assert!(model.info().is_none());
    assert_eq!(model.buffer_lines().len(), 2);
    assert_eq!(model.buffer_lines()[1].text(), "world");
    assert_eq!(model.status().text(), ":edit");
    assert_eq!(model.mode().text(), "normal");

    let canvas = paint(&session);
    assert_eq!(canvas.row(0).trim_end(), "hello");
    assert_eq!(canvas.row(1).trim_end(), "world");
    assert_eq!(canvas.row(9), format!("{:<34}normal", ":edit"));
}

#[test]
fn test_no_mutation_after_session_end() {
    let mut session = session(10, 40);
    feed(&mut session, &[draw_status("", "normal")]);
    session.handle(BridgeEvent::SessionEnded).unwrap();
    let frozen = session.render();

    let late = EditorMessage::parse(draw_status("", "insert").trim_end()).unwrap();
    assert_eq!(
        session.handle(BridgeEvent::Message(late)).unwrap(),
        Applied::Ignored
    );
    assert_eq!(session.render(), frozen);
    assert_eq!(session.title(), "normal - kak-surface");
}

// =============================================================================
// Rendering
// =============================================================================

#[test]
fn test_render_idempotent_across_calls() {
    let mut session = session(24, 80);
    feed(
        &mut session,
        &[
            draw(&["fn main() {}", ""]),
            draw_status("", "insert"),
            menu_show(&["alpha", "beta", "gamma", "delta"], "inline"),
            notification("menu_select", "0"),
        ],
    );
    assert_eq!(session.render(), session.render());
}

#[test]
fn test_info_box_golden() {
    let mut session = session(12, 30);
    feed(&mut session, &[info_show("type", "a\\nbb\\nccc", "modal")]);

    let canvas = paint(&session);
    // Pad is 11 × 30; a 10 × 5 box is centered at (3, 10)
    assert_eq!(
        canvas.snippet(3, 10, 5, 10),
        vec![
            "╭─┤type├─╮",
            "│ a      │",
            "│ bb     │",
            "│ ccc    │",
            "╰────────╯",
        ]
    );
    assert_eq!(canvas.background(3, 10), Some(&Color::new("yellow")));
}

#[test]
fn test_menu_capped_at_ten_rows() {
    // 37 items of width 20 on 80 columns → 4 columns
    let names: Vec<String> = (0..37).map(|i| format!("{i:<20}")).collect();
    let items: Vec<&str> = names.iter().map(String::as_str).collect();

    let mut few = session(40, 80);
    feed(&mut few, &[menu_show(&items, "prompt")]);

    let menu = few.render().region(Region::Menu).unwrap();
    assert_eq!(menu.height, 9.0);
    assert_eq!(menu.width, 80.0);

    let mut many = session(40, 80);
    let names: Vec<String> = (0..100).map(|i| format!("{i:<20}")).collect();
    let items: Vec<&str> = names.iter().map(String::as_str).collect();
    feed(&mut many, &[menu_show(&items, "prompt")]);
    assert_eq!(many.render().region(Region::Menu).unwrap().height, 10.0);
}

#[test]
fn test_menu_selection_survives_rerender() {
    let mut session = session(10, 20);
    feed(
        &mut session,
        &[
            menu_show(&["aa", "bb", "cc", "dd", "ee", "ff", "gg", "hh", "ii", "jj"], "prompt"),
            notification("menu_select", "1"),
        ],
    );

    // Status at row 9, one menu row docked above it
    let canvas = paint(&session);
    assert_eq!(canvas.row(8), "aabbccddeeffgghhiijj");
    assert_eq!(canvas.background(8, 0), Some(&Color::new("blue")));
    assert_eq!(canvas.background(8, 2), Some(&Color::new("cyan")));

    feed(&mut session, &[notification("menu_select", "-1")]);
    let canvas = paint(&session);
    assert_eq!(canvas.background(8, 2), Some(&Color::new("blue")));
}

#[test]
fn test_status_on_top_layout() {
    let mut session = Session::new(
        ScreenModel::new(),
        Viewport::with_grid(5, 20, CellMetrics::default()),
        std::time::Duration::from_millis(50),
        LayoutOptions { status_on_top: true },
    );
    feed(&mut session, &[draw(&["first"]), draw_status("msg", "mode")]);

    let canvas = paint(&session);
    assert_eq!(canvas.row(0), format!("{:<16}mode", "msg"));
    assert_eq!(canvas.row(1).trim_end(), "first");
    assert_eq!(canvas.background(2, 0), Some(&Color::new("black")));
}
