mod view;

use std::env;
use std::fs::File;
use std::io::{self, stdout};
use std::time::Duration;

use crossterm::event::{
    self,
    DisableMouseCapture,
    EnableMouseCapture,
    KeyCode,
    KeyEvent,
    KeyEventKind,
    MouseButton,
    MouseEvent,
    MouseEventKind,
};
use crossterm::execute;
use log::LevelFilter;
use ratatui::{DefaultTerminal, Frame};
use simplelog::{Config as LogConfig, WriteLogger};

use player::{PlayerConfig, PlayerController, RodioBackend};

use view::PlayerView;

const FRAME_MS: u64 = 100;
const SEEK_STEP: f64 = 0.05;
const VOLUME_STEP: f32 = 0.05;

fn main() -> io::Result<()> {
    if let Ok(file) = File::create("player-cli.log") {
        let _ = WriteLogger::init(LevelFilter::Debug, LogConfig::default(), file);
    }

    let source = env::args()
        .nth(1)
        .unwrap_or_else(|| PlayerConfig::default().source);
    let title = env::args().nth(2).unwrap_or_else(|| {
        PlayerConfig::default().title
    });

    let backend = match RodioBackend::new() {
        Ok(backend) => backend,
        Err(e) => {
            eprintln!("{e}");
            return Ok(());
        }
    };

    let config = PlayerConfig::new().with_source(source).with_title(title);
    let mut controller = match PlayerController::new(config, backend) {
        Ok(controller) => controller,
        Err(e) => {
            eprintln!("failed to start player: {e}");
            return Ok(());
        }
    };

    let mut terminal = ratatui::init();
    let _ = execute!(stdout(), EnableMouseCapture);
    let app_result = App::default().run(&mut terminal, &mut controller);
    let _ = execute!(stdout(), DisableMouseCapture);
    ratatui::restore();
    app_result
}

#[derive(Default)]
pub struct App {
    exit: bool,
    view: PlayerView,
}

impl App {
    pub fn run(
        &mut self,
        terminal: &mut DefaultTerminal,
        controller: &mut PlayerController<RodioBackend>,
    ) -> io::Result<()> {
        while !self.exit {
            if let Err(e) = controller.tick() {
                log::error!("tick failed: {e}");
            }
            terminal.draw(|frame| self.draw(frame, controller))?;

            if event::poll(Duration::from_millis(FRAME_MS))? {
                self.handle_event(event::read()?, controller);
            }
        }
        Ok(())
    }

    fn draw(&mut self, frame: &mut Frame, controller: &PlayerController<RodioBackend>) {
        self.view.render(frame, controller.state());
    }

    fn handle_event(
        &mut self,
        ev: event::Event,
        controller: &mut PlayerController<RodioBackend>,
    ) {
        match ev {
            event::Event::Key(key_event) => self.handle_key(key_event, controller),
            event::Event::Mouse(mouse_event) => self.handle_mouse(mouse_event, controller),
            _ => {}
        }
    }

    fn handle_key(
        &mut self,
        key_event: KeyEvent,
        controller: &mut PlayerController<RodioBackend>,
    ) {
        if key_event.kind != KeyEventKind::Press {
            return;
        }

        let result = match key_event.code {
            KeyCode::Char('q') => {
                self.exit = true;
                Ok(())
            }
            KeyCode::Char(' ') => controller.toggle_play(),
            KeyCode::Char('m') => controller.toggle_mute(),
            KeyCode::Left => {
                let fraction = controller.state().progress() - SEEK_STEP;
                controller.seek(fraction.max(0.0))
            }
            KeyCode::Right => controller.seek(controller.state().progress() + SEEK_STEP),
            KeyCode::Up => controller.set_volume(controller.state().volume + VOLUME_STEP),
            KeyCode::Down => controller.set_volume(controller.state().volume - VOLUME_STEP),
            _ => Ok(()),
        };

        if let Err(e) = result {
            log::error!("key action failed: {e}");
        }
    }

    fn handle_mouse(
        &mut self,
        mouse_event: MouseEvent,
        controller: &mut PlayerController<RodioBackend>,
    ) {
        if mouse_event.kind != MouseEventKind::Down(MouseButton::Left) {
            return;
        }

        // aim for the middle of the clicked cell
        let pointer_x = f64::from(mouse_event.column) + 0.5;

        let result = if let Some(bar) = self
            .view
            .timeline_hit(mouse_event.column, mouse_event.row)
        {
            controller.seek_click(pointer_x, bar)
        } else if let Some(bar) = self.view.volume_hit(mouse_event.column, mouse_event.row) {
            controller.volume_click(pointer_x, bar)
        } else {
            Ok(())
        };

        if let Err(e) = result {
            log::error!("click action failed: {e}");
        }
    }
}
