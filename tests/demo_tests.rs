use crossterm::event::{
    Event as TerminalEvent, KeyCode, KeyEvent, KeyModifiers, MouseButton,
    MouseEvent as TerminalMouse, MouseEventKind as TerminalMouseKind,
};
use flexloop::demo::{self, Counter, INCREMENT_ID, RESET_ID};
use flexloop_tui::{ChannelInput, Rect, Runtime, RuntimeConfig, TestBackend};
use std::sync::mpsc::Sender;

const WIDTH: u16 = 30;
const HEIGHT: u16 = 6;

fn key(c: char) -> TerminalEvent {
    TerminalEvent::Key(KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE))
}

fn click(input: &Sender<TerminalEvent>, area: Rect) {
    for kind in [
        TerminalMouseKind::Down(MouseButton::Left),
        TerminalMouseKind::Up(MouseButton::Left),
    ] {
        input
            .send(TerminalEvent::Mouse(TerminalMouse {
                kind,
                column: area.x,
                row: area.y,
                modifiers: KeyModifiers::NONE,
            }))
            .unwrap();
    }
}

fn button(id: &str) -> Rect {
    demo::region_area(&Counter::new(), Rect::sized(WIDTH, HEIGHT), id).unwrap()
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_keys_drive_counter() {
    let runtime = Runtime::new(RuntimeConfig::default());
    let screen = TestBackend::new(WIDTH, HEIGHT);
    let (input_tx, input) = ChannelInput::channel();

    for c in ['+', '+', '+', '-', 'q'] {
        input_tx.send(key(c)).unwrap();
    }

    let app = runtime.run(Counter::new(), screen.clone(), input).await.unwrap();

    assert_eq!(app.count(), 2);
    assert!(!screen.is_active());
    assert_eq!(screen.restore_count(), 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_clicking_buttons() {
    let runtime = Runtime::new(RuntimeConfig::default());
    let screen = TestBackend::new(WIDTH, HEIGHT);
    let (input_tx, input) = ChannelInput::channel();

    let increment = button(INCREMENT_ID);
    click(&input_tx, increment);
    input_tx.send(key('q')).unwrap();

    let app = runtime.run(Counter::new(), screen.clone(), input).await.unwrap();

    assert_eq!(app.count(), 1);
    assert!(app.status().starts_with("Release at"));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_reset_button_clears_after_delay() {
    let runtime = Runtime::new(RuntimeConfig::default());
    let handle = runtime.handle();
    let screen = TestBackend::new(WIDTH, HEIGHT);
    let (input_tx, input) = ChannelInput::channel();

    input_tx.send(key('+')).unwrap();
    input_tx.send(key('+')).unwrap();
    click(&input_tx, button(RESET_ID));

    let (app, _) = tokio::join!(runtime.run(Counter::new(), screen.clone(), input), async {
        tokio::time::sleep(demo::RESET_DELAY * 3).await;
        handle.quit().await.unwrap();
    });
    let app = app.unwrap();

    assert_eq!(app.count(), 0);
    assert_eq!(app.status(), "reset");
    let frame = screen.last_frame().unwrap();
    assert_eq!(frame.row_text(1).trim_end(), "count: 0");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_closed_input_ends_demo() {
    let runtime = Runtime::new(RuntimeConfig::default());
    let (input_tx, input) = ChannelInput::channel();
    input_tx.send(key('+')).unwrap();
    drop(input_tx);

    let app = runtime
        .run(Counter::new(), TestBackend::new(WIDTH, HEIGHT), input)
        .await
        .unwrap();
    assert_eq!(app.count(), 1);
}
