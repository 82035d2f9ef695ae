use ratatui::layout::{Alignment, Constraint, Direction, Layout, Position, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Gauge, Paragraph};
use ratatui::Frame;

use player::{to_timecode, BarBounds, LoadState, PlayerState};

/// Renders the player bar and remembers where the clickable bars landed so
/// mouse events can be mapped back into fractions.
#[derive(Debug, Default)]
pub struct PlayerView {
    timeline_area: Rect,
    volume_area: Rect,
}

impl PlayerView {
    pub fn render(&mut self, frame: &mut Frame, state: &PlayerState) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),
                Constraint::Length(1),
                Constraint::Length(1),
                Constraint::Min(0),
            ])
            .split(frame.area());

        self.draw_timeline(frame, chunks[0], state);
        self.draw_body(frame, chunks[1], state);
        self.draw_status(frame, chunks[2], state);
    }

    /// Bar bounds for a click landing on the timeline, if it did.
    pub fn timeline_hit(&self, column: u16, row: u16) -> Option<BarBounds> {
        Self::hit(self.timeline_area, column, row)
    }

    /// Bar bounds for a click landing on the volume bar, if it did.
    pub fn volume_hit(&self, column: u16, row: u16) -> Option<BarBounds> {
        Self::hit(self.volume_area, column, row)
    }

    fn hit(area: Rect, column: u16, row: u16) -> Option<BarBounds> {
        if area.contains(Position::new(column, row)) {
            Some(BarBounds::new(area.x as f64, area.width as f64))
        } else {
            None
        }
    }

    fn draw_timeline(&mut self, frame: &mut Frame, area: Rect, state: &PlayerState) {
        self.timeline_area = area;
        let gauge = Gauge::default()
            .ratio(state.progress())
            .label("")
            .gauge_style(Style::default().fg(Color::LightRed).bg(Color::White));
        frame.render_widget(gauge, area);
    }

    fn draw_body(&mut self, frame: &mut Frame, area: Rect, state: &PlayerState) {
        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Length(4),
                Constraint::Min(10),
                Constraint::Length(15),
                Constraint::Length(20),
                Constraint::Length(6),
            ])
            .split(area);

        let glyph = if state.is_playing { "||" } else { " >" };
        frame.render_widget(Paragraph::new(glyph), columns[0]);

        let title = Paragraph::new(state.title.clone())
            .style(Style::default().add_modifier(Modifier::BOLD));
        frame.render_widget(title, columns[1]);

        let times = format!(
            "{} / {}",
            to_timecode(state.current_time),
            to_timecode(state.duration)
        );
        frame.render_widget(
            Paragraph::new(times).alignment(Alignment::Right),
            columns[2],
        );

        self.volume_area = columns[3];
        let volume = Gauge::default()
            .ratio(f64::from(state.volume).clamp(0.0, 1.0))
            .label(format!("{:.0}%", state.volume * 100.0))
            .gauge_style(Style::default().fg(Color::LightRed).bg(Color::Gray));
        frame.render_widget(volume, columns[3]);

        let speaker = if state.is_muted { " mute" } else { " vol" };
        frame.render_widget(Paragraph::new(speaker), columns[4]);
    }

    fn draw_status(&mut self, frame: &mut Frame, area: Rect, state: &PlayerState) {
        let status = match &state.load {
            LoadState::Failed(message) => Paragraph::new(format!("load error: {message}"))
                .style(Style::default().fg(Color::Red)),
            LoadState::Loading => Paragraph::new("loading..."),
            LoadState::Ready => Paragraph::new(
                "space: play/pause  m: mute  arrows: seek/volume  click bars  q: quit",
            )
            .style(Style::default().fg(Color::DarkGray)),
        };
        frame.render_widget(status, area);
    }
}
