use crossterm::event::{
    Event as TerminalEvent, KeyCode, KeyEvent, KeyModifiers, MouseButton,
    MouseEvent as TerminalMouse, MouseEventKind as TerminalMouseKind,
};
use flexloop_tui::event::Interaction;
use flexloop_tui::{
    App, ChannelInput, Command, Event, Frame, MouseRegion, Rect, Runtime, RuntimeConfig,
    RuntimeError, TestBackend, Text,
};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq)]
enum Msg {
    Add(u32),
    Clicked,
}

type QuitWhen = fn(&Event<Msg>) -> bool;

#[derive(Default)]
struct Recorder {
    count: u32,
    log: Vec<String>,
    quit_when: Option<QuitWhen>,
    init: Option<Command<Msg>>,
    fail_init: bool,
    torn_down: Arc<AtomicBool>,
}

impl std::fmt::Debug for Recorder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Recorder")
            .field("count", &self.count)
            .field("log", &self.log)
            .finish_non_exhaustive()
    }
}

impl Recorder {
    fn quitting_when(quit_when: QuitWhen) -> Self {
        Self {
            quit_when: Some(quit_when),
            ..Self::default()
        }
    }
}

impl App for Recorder {
    type Message = Msg;

    fn init(&mut self) -> anyhow::Result<Command<Msg>> {
        if self.fail_init {
            anyhow::bail!("state file is corrupt");
        }
        Ok(self.init.take().unwrap_or_default())
    }

    fn update(&mut self, event: Event<Msg>) -> Command<Msg> {
        let quit = self.quit_when.is_some_and(|quit_when| quit_when(&event));
        match event {
            Event::Message(Msg::Add(n)) => {
                self.count += n;
                self.log.push(format!("add:{n}"));
            }
            Event::Message(Msg::Clicked) => self.log.push("clicked".to_string()),
            Event::Mouse(mouse) => self.log.push(format!("{:?}", mouse.kind)),
            Event::Key(key) => self.log.push(format!("key:{:?}", key.code)),
            Event::InputError(_) => self.log.push("input-error".to_string()),
            Event::Resize { width, height } => self.log.push(format!("resize:{width}x{height}")),
            Event::Tick(_) => self.log.push("tick".to_string()),
            _ => {}
        }
        if quit {
            Command::quit()
        } else {
            Command::none()
        }
    }

    fn view(&self, frame: &mut Frame<'_, Msg>) {
        let area = frame.area();
        frame.render(&Text::new(format!("count: {}", self.count)), area);
        frame.register(
            MouseRegion::new("button", Rect::new(0, 0, 10, 1))
                .on_message(Interaction::Click, Msg::Clicked),
        );
    }

    fn teardown(&mut self) {
        self.torn_down.store(true, Ordering::SeqCst);
    }
}

fn config() -> RuntimeConfig {
    RuntimeConfig {
        fps: 20,
        ..RuntimeConfig::default()
    }
}

async fn wait_until(mut condition: impl FnMut() -> bool) {
    tokio::time::timeout(Duration::from_secs(5), async {
        while !condition() {
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    })
    .await
    .expect("condition not reached in time");
}

fn mouse(kind: TerminalMouseKind, column: u16, row: u16) -> TerminalEvent {
    TerminalEvent::Mouse(TerminalMouse {
        kind,
        column,
        row,
        modifiers: KeyModifiers::NONE,
    })
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_queued_burst_renders_once() {
    let runtime = Runtime::new(config());
    let handle = runtime.handle();
    let screen = TestBackend::new(20, 3);
    let (_input_tx, input) = ChannelInput::channel();

    for _ in 0..10 {
        handle.message(Msg::Add(1)).await.unwrap();
    }

    let (result, _) = tokio::join!(runtime.run(Recorder::default(), screen.clone(), input), async {
        wait_until(|| screen.draw_count() >= 2).await;
        handle.shutdown();
    });

    let app = result.unwrap();
    assert_eq!(app.count, 10);
    // the initial frame, then one frame for the whole burst
    assert_eq!(runtime.frames(), 2);
    assert_eq!(screen.draw_count(), 2);
    assert_eq!(screen.last_frame().unwrap().row_text(0).trim_end(), "count: 10");
    assert!(!screen.is_active());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_quit_in_batch_skips_the_rest() {
    let runtime = Runtime::new(config());
    let handle = runtime.handle();
    let (_input_tx, input) = ChannelInput::channel();

    handle
        .send(Event::Batch(vec![
            Event::Message(Msg::Add(1)),
            Event::Quit,
            Event::Message(Msg::Add(100)),
        ]))
        .await
        .unwrap();

    let app = runtime
        .run(Recorder::default(), TestBackend::new(20, 3), input)
        .await
        .unwrap();

    assert_eq!(app.count, 1);
    assert_eq!(app.log, vec!["add:1"]);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_second_run_while_running_is_rejected() {
    let runtime = Runtime::new(config());
    let handle = runtime.handle();
    let (_first_tx, first_input) = ChannelInput::channel();
    let (_second_tx, second_input) = ChannelInput::channel();

    let (first, second) = tokio::join!(
        runtime.run(Recorder::default(), TestBackend::new(20, 3), first_input),
        async {
            wait_until(|| runtime.is_running()).await;
            let second = runtime
                .run(Recorder::default(), TestBackend::new(20, 3), second_input)
                .await;
            handle.quit().await.unwrap();
            second
        }
    );

    assert!(first.is_ok());
    assert!(matches!(second, Err(RuntimeError::AlreadyRunning)));
    assert!(!runtime.is_running());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_init_failure_never_touches_terminal() {
    let runtime = Runtime::new(config());
    let screen = TestBackend::new(20, 3);
    let (_input_tx, input) = ChannelInput::channel();

    let app = Recorder {
        fail_init: true,
        ..Recorder::default()
    };
    let err = runtime.run(app, screen.clone(), input).await.unwrap_err();

    assert!(matches!(err, RuntimeError::Init(_)));
    assert!(err.to_string().contains("state file is corrupt"));
    assert_eq!(screen.enter_count(), 0);
    assert_eq!(screen.restore_count(), 0);
    assert_eq!(screen.draw_count(), 0);

    // the runtime is still usable afterwards
    let (_input_tx, input) = ChannelInput::channel();
    let app = Recorder {
        init: Some(Command::quit()),
        ..Recorder::default()
    };
    assert!(runtime.run(app, screen.clone(), input).await.is_ok());
    assert_eq!(screen.enter_count(), 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_terminal_restored_after_render_error() {
    let runtime = Runtime::new(config());
    let screen = TestBackend::new(20, 3).failing_draw();
    let (_input_tx, input) = ChannelInput::channel();

    let app = Recorder::default();
    let torn_down = app.torn_down.clone();
    let err = runtime.run(app, screen.clone(), input).await.unwrap_err();

    assert!(matches!(err, RuntimeError::Render(_)));
    assert_eq!(screen.restore_count(), 1);
    assert!(!screen.is_active());
    assert!(torn_down.load(Ordering::SeqCst));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_previous_reader_does_not_feed_next_run() {
    let runtime = Runtime::new(config());
    let handle = runtime.handle();

    let (first_tx, first_input) = ChannelInput::channel();
    let first = Recorder {
        init: Some(Command::quit()),
        ..Recorder::default()
    };
    runtime.run(first, TestBackend::new(20, 3), first_input).await.unwrap();

    let (_second_tx, second_input) = ChannelInput::channel();
    let (second, _) = tokio::join!(
        runtime.run(Recorder::default(), TestBackend::new(20, 3), second_input),
        async {
            wait_until(|| runtime.is_running()).await;
            let key = KeyEvent::new(KeyCode::Char('x'), KeyModifiers::NONE);
            // the first reader may already be gone, taking its receiver
            let _ = first_tx.send(TerminalEvent::Key(key));
            drop(first_tx);
            // several reader polls
            tokio::time::sleep(Duration::from_millis(250)).await;
            handle.quit().await.unwrap();
        }
    );

    assert!(second.unwrap().log.is_empty());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_enter_failure_is_terminal_error() {
    let runtime = Runtime::new(config());
    let (_input_tx, input) = ChannelInput::channel();

    let err = runtime
        .run(Recorder::default(), TestBackend::new(20, 3).failing_enter(), input)
        .await
        .unwrap_err();
    assert!(matches!(err, RuntimeError::Terminal(_)));
    assert!(!runtime.is_running());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_input_end_is_reported() {
    let runtime = Runtime::new(config());
    let (input_tx, input) = ChannelInput::channel();
    drop(input_tx);

    let app = Recorder::quitting_when(|event| matches!(event, Event::InputError(_)));
    let app = runtime.run(app, TestBackend::new(20, 3), input).await.unwrap();

    assert_eq!(app.log, vec!["input-error"]);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_click_arrives_before_release() {
    let runtime = Runtime::new(config());
    let (input_tx, input) = ChannelInput::channel();

    input_tx
        .send(mouse(TerminalMouseKind::Down(MouseButton::Left), 2, 0))
        .unwrap();
    input_tx
        .send(mouse(TerminalMouseKind::Up(MouseButton::Left), 2, 0))
        .unwrap();

    let app = Recorder::quitting_when(|event| {
        matches!(event, Event::Mouse(m) if m.kind == flexloop_tui::MouseEventKind::Release)
    });
    let app = runtime.run(app, TestBackend::new(20, 3), input).await.unwrap();

    assert_eq!(app.log, vec!["Press", "Click", "clicked", "Release"]);
    drop(input_tx);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_sequence_from_init_arrives_in_order() {
    let runtime = Runtime::new(config());
    let (_input_tx, input) = ChannelInput::channel();

    let app = Recorder {
        init: Some(Command::sequence([
            Command::tick(Duration::from_millis(30), |_| Msg::Add(1)),
            Command::message(Msg::Add(2)),
        ])),
        quit_when: Some(|event| matches!(event, Event::Message(Msg::Add(2)))),
        ..Recorder::default()
    };
    let app = runtime.run(app, TestBackend::new(20, 3), input).await.unwrap();

    assert_eq!(app.log, vec!["add:1", "add:2"]);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_resize_invalidates_backend() {
    let runtime = Runtime::new(config());
    let handle = runtime.handle();
    let screen = TestBackend::new(20, 3);
    let (_input_tx, input) = ChannelInput::channel();

    screen.resize(40, 5);
    handle
        .send(Event::Batch(vec![
            Event::Resize { width: 40, height: 5 },
            Event::Quit,
        ]))
        .await
        .unwrap();

    let app = runtime.run(Recorder::default(), screen.clone(), input).await.unwrap();

    assert_eq!(app.log, vec!["resize:40x5"]);
    assert_eq!(screen.invalidations(), 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_after_command_delivers_tick() {
    let runtime = Runtime::new(config());
    let (_input_tx, input) = ChannelInput::channel();

    let app = Recorder {
        init: Some(Command::after(Duration::from_millis(10))),
        quit_when: Some(|event| matches!(event, Event::Tick(_))),
        ..Recorder::default()
    };
    let app = runtime.run(app, TestBackend::new(20, 3), input).await.unwrap();

    assert_eq!(app.log, vec!["tick"]);
}
