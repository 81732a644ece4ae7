pub mod session;
pub mod view;

use crate::bridge::{NativeBridge, QueuedDialog};
use crate::config::SyncOptions;
use crate::documents::PostStore;
use crate::error::{Result, SyncError};
use crate::notify::QueueNotifier;
use crate::storage::FileStorage;
use crate::store::LocalDirectoryStore;
use crossterm::event::{self, Event, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io::stdout;
use std::sync::Arc;
use std::time::Duration;

pub use session::{ListRow, PromptState, Session};

pub struct TuiApplication {
    session: Session,
}

impl TuiApplication {
    /// 設定から状態保存先とブリッジを組み立てる
    pub fn new(options: &SyncOptions) -> Result<Self> {
        let dialog = Arc::new(QueuedDialog::new());
        let bridge = Arc::new(NativeBridge::with_dialog(dialog.clone()));
        let storage = FileStorage::new(options.resolve_state_dir()?);
        let notifier = QueueNotifier::new();

        let store = LocalDirectoryStore::new(bridge, Box::new(storage))
            .with_notifier(notifier.clone())
            .with_walk_options(options.walk)
            .with_development(options.development);

        let session = Session::new(store, PostStore::new(), dialog, notifier)?;
        Ok(Self { session })
    }

    pub fn run(&mut self) -> Result<()> {
        enter_terminal()?;

        let backend = CrosstermBackend::new(stdout());
        let mut terminal = Terminal::new(backend).map_err(|err| terminal_error("terminal init", err))?;
        terminal.hide_cursor().map_err(|err| terminal_error("hide cursor", err))?;

        let loop_result = self.event_loop(&mut terminal);
        let show_cursor_result = terminal.show_cursor().map_err(|err| terminal_error("show cursor", err));
        drop(terminal);
        let cleanup_result = leave_terminal();

        loop_result.and(show_cursor_result).and(cleanup_result)
    }

    fn event_loop<B: ratatui::backend::Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<()> {
        while self.session.is_running() {
            terminal
                .draw(|frame| view::draw(frame, &self.session))
                .map_err(|err| terminal_error("render", err))?;

            if event::poll(Duration::from_millis(16)).map_err(|err| terminal_error("event poll", err))? {
                match event::read().map_err(|err| terminal_error("event read", err))? {
                    Event::Key(key_event) if key_event.kind == KeyEventKind::Press => {
                        self.session.handle_key(key_event)
                    }
                    Event::Key(_) | Event::Resize(_, _) => {}
                    Event::Mouse(_) | Event::FocusGained | Event::FocusLost | Event::Paste(_) => {}
                }
            }
        }

        Ok(())
    }
}

fn enter_terminal() -> Result<()> {
    enable_raw_mode().map_err(|err| terminal_error("enable raw mode", err))?;
    let mut out = stdout();
    execute!(out, EnterAlternateScreen).map_err(|err| terminal_error("enter alternate screen", err))?;
    Ok(())
}

fn leave_terminal() -> Result<()> {
    let mut out = stdout();
    execute!(out, LeaveAlternateScreen).map_err(|err| terminal_error("leave alternate screen", err))?;
    disable_raw_mode().map_err(|err| terminal_error("disable raw mode", err))?;
    Ok(())
}

fn terminal_error(context: &str, err: impl std::fmt::Display) -> SyncError {
    SyncError::Terminal(format!("{}: {}", context, err))
}
