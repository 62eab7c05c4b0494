//! Application host.
//!
//! [`App`] owns the terminal and the active [`Screen`]. It forwards input to
//! the screen, spawns the commands the screen returns and lets the screen
//! process their results once they complete.

use std::sync::Arc;

use color_eyre::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::layout::{Constraint, Layout, Rect};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::{debug, warn};

use crate::Theme;
use crate::commands::Command;
use crate::config::{GlobalAction, KeyResolver};
use crate::screen::{Screen, ScreenMsg};
use crate::tui::{Event, Tui};
use crate::ui::StatusBar;

const FRAME_RATE: f64 = 30.0;
const TICK_RATE: f64 = 8.0;
const STATUS_BAR_HEIGHT: u16 = 6;

/// Application-level messages.
#[derive(Debug, Clone, PartialEq, Eq)]
enum AppMessage {
    /// Periodic tick for animations
    Tick,
    /// Render the UI
    Render,
    /// Terminal resized
    Resize(u16, u16),
    /// Suspend the application (Ctrl+Z)
    Suspend,
    /// Quit the application
    Quit,
    /// A spawned command finished, the screen should process its messages
    CommandCompleted { name: String, success: bool },
}

pub struct App {
    /// `None` once the screen has been closed.
    screen: Option<Box<dyn Screen>>,
    status_bar: StatusBar,
    resolver: Arc<KeyResolver>,
    theme: Theme,
    should_quit: bool,
    should_suspend: bool,
    msg_tx: UnboundedSender<AppMessage>,
    msg_rx: UnboundedReceiver<AppMessage>,
}

impl App {
    pub fn new(
        screen: Box<dyn Screen>,
        status_bar: StatusBar,
        resolver: Arc<KeyResolver>,
        theme: Theme,
    ) -> Self {
        let (msg_tx, msg_rx) = mpsc::unbounded_channel();
        Self {
            screen: Some(screen),
            status_bar,
            resolver,
            theme,
            should_quit: false,
            should_suspend: false,
            msg_tx,
            msg_rx,
        }
    }

    pub async fn run(&mut self) -> Result<()> {
        let mut tui = Tui::new(FRAME_RATE, TICK_RATE)?;
        tui.enter()?;

        if let Some(screen) = self.screen.as_mut() {
            screen.init();
        }
        self.update_screen()?;

        loop {
            self.handle_events(&mut tui).await?;
            self.handle_messages(&mut tui)?;
            if self.should_suspend {
                tui.suspend()?;
                self.should_suspend = false;
                tui.resume()?;
            } else if self.should_quit {
                break;
            }
        }

        self.close_screen();
        tui.exit()?;
        Ok(())
    }

    async fn handle_events(&mut self, tui: &mut Tui) -> Result<()> {
        let Some(event) = tui.next_event().await else {
            self.should_quit = true;
            return Ok(());
        };

        match event {
            Event::Quit => self.msg_tx.send(AppMessage::Quit)?,
            Event::Tick => self.msg_tx.send(AppMessage::Tick)?,
            Event::Render => self.msg_tx.send(AppMessage::Render)?,
            Event::Resize(width, height) => self.msg_tx.send(AppMessage::Resize(width, height))?,
            Event::Key(key) => self.handle_key(key)?,
            Event::Error(e) => warn!("Terminal event error: {}", e),
        }
        Ok(())
    }

    fn handle_key(&mut self, key: KeyEvent) -> Result<()> {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('z') {
            self.msg_tx.send(AppMessage::Suspend)?;
            return Ok(());
        }

        let consumed = self
            .screen
            .as_mut()
            .is_some_and(|screen| screen.handle_key(key).is_consumed());

        if consumed {
            self.update_screen()?;
        } else if self.resolver.matches_global(&key, GlobalAction::Quit) {
            self.msg_tx.send(AppMessage::Quit)?;
        }
        Ok(())
    }

    fn handle_messages(&mut self, tui: &mut Tui) -> Result<()> {
        while let Ok(msg) = self.msg_rx.try_recv() {
            if matches!(msg, AppMessage::Resize(..) | AppMessage::Suspend | AppMessage::Quit) {
                debug!("Handling message: {:?}", msg);
            }

            match msg {
                AppMessage::Tick => {
                    if let Some(screen) = self.screen.as_mut() {
                        screen.handle_tick();
                    }
                }
                AppMessage::Render => self.render(tui)?,
                AppMessage::Resize(width, height) => {
                    tui.resize(Rect::new(0, 0, width, height))?;
                    self.render(tui)?;
                }
                AppMessage::Suspend => self.should_suspend = true,
                AppMessage::Quit => self.should_quit = true,
                AppMessage::CommandCompleted { name, success } => {
                    debug!("Command '{}' finished (success: {})", name, success);
                    self.update_screen()?;
                }
            }
        }
        Ok(())
    }

    /// Let the screen drain its queue and act on the outcome.
    fn update_screen(&mut self) -> Result<()> {
        let Some(screen) = self.screen.as_mut() else {
            return Ok(());
        };

        match screen.update()? {
            ScreenMsg::Idle => {}
            ScreenMsg::Run(commands) => {
                for command in commands {
                    self.spawn(command);
                }
            }
            ScreenMsg::Close => {
                // Nothing sits below the booking screen
                self.close_screen();
                self.should_quit = true;
            }
        }
        Ok(())
    }

    fn spawn(&self, command: Box<dyn Command>) {
        let name = command.name();
        debug!("Spawning command: {}", name);

        let msg_tx = self.msg_tx.clone();
        tokio::spawn(async move {
            let success = match command.execute().await {
                Ok(()) => true,
                Err(e) => {
                    warn!("Command '{}' failed: {}", name, e);
                    false
                }
            };
            let _ = msg_tx.send(AppMessage::CommandCompleted { name, success });
        });
    }

    fn close_screen(&mut self) {
        if let Some(mut screen) = self.screen.take() {
            screen.destroy();
        }
    }

    fn render(&mut self, tui: &mut Tui) -> Result<()> {
        let screen = &mut self.screen;
        let status_bar = &self.status_bar;
        let theme = &self.theme;

        tui.draw(|frame| {
            let [main_area, status_area] = Layout::vertical([
                Constraint::Min(0),
                Constraint::Length(STATUS_BAR_HEIGHT),
            ])
            .areas(frame.area());

            let Some(screen) = screen.as_mut() else {
                return;
            };
            screen.render(frame, main_area, theme);
            status_bar.render(
                frame,
                status_area,
                theme,
                &screen.breadcrumbs(),
                &screen.keybindings(),
            );
        })?;
        Ok(())
    }
}
