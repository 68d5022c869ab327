use crate::app::App;
use crate::map::MapLayers;
use crate::palette::{color_for, BORDER_COLOR, OCEAN_COLOR};
use crate::region::RegionState;
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget},
    Frame,
};

/// Longest label drawn on the map
const MAX_LABEL_CHARS: usize = 24;

/// Render the UI
pub fn render(frame: &mut Frame, app: &App) {
    let area = frame.area();

    if app.fullscreen {
        render_map(frame, app, area);
        return;
    }

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(3),    // Map
            Constraint::Length(1), // Status bar
        ])
        .split(area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(Span::styled(
            " World Map ",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ));
    let inner = block.inner(chunks[0]);
    frame.render_widget(block, chunks[0]);

    render_map(frame, app, inner);
    render_status_bar(frame, app, chunks[1]);
}

fn render_map(frame: &mut Frame, app: &App, area: Rect) {
    let mut viewport = app.viewport.clone();
    viewport.width = area.width as usize * 2;
    viewport.height = area.height as usize * 4;

    let layers = app
        .map_renderer
        .render(area.width as usize, area.height as usize, &viewport);
    frame.render_widget(MapWidget { layers }, area);
}

/// Region fills as cell backgrounds, braille outlines and labels on top
struct MapWidget {
    layers: MapLayers,
}

impl Widget for MapWidget {
    fn render(self, area: Rect, buf: &mut Buffer) {
        for row in 0..area.height {
            for col in 0..area.width {
                let (cx, cy) = (col as usize, row as usize);
                let cell = &mut buf[(area.x + col, area.y + row)];
                cell.set_bg(self.layers.fill(cx, cy).unwrap_or(OCEAN_COLOR));
                match self.layers.outlines.glyph(cx, cy) {
                    Some(ch) => cell.set_char(ch).set_fg(BORDER_COLOR),
                    None => cell.set_char(' '),
                };
            }
        }

        let label_style = Style::default()
            .fg(Color::Black)
            .add_modifier(Modifier::BOLD);
        for (lx, ly, text) in &self.layers.labels {
            if *ly >= area.height || *lx >= area.width {
                continue;
            }
            let room = (area.width - *lx) as usize;
            let y = area.y + *ly;
            for (i, ch) in text.chars().take(room.min(MAX_LABEL_CHARS)).enumerate() {
                buf[(area.x + *lx + i as u16, y)]
                    .set_char(ch)
                    .set_style(label_style);
            }
        }
    }
}

fn toggle_span(on: bool, on_text: &'static str, off_text: &'static str) -> Span<'static> {
    Span::styled(
        if on { on_text } else { off_text },
        Style::default().fg(if on { Color::Green } else { Color::DarkGray }),
    )
}

fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    frame.render_widget(Paragraph::new(status_line(app)), area);
}

fn status_line(app: &App) -> Line<'static> {
    let settings = &app.map_renderer.settings;
    let tally = app.registry().tally();
    let dim = Style::default().fg(Color::DarkGray);

    let mut spans = vec![
        Span::styled(" Zoom: ", dim),
        Span::styled(app.zoom_level(), Style::default().fg(Color::Yellow)),
        Span::styled(" | ", dim),
    ];

    for (state, count) in [
        (RegionState::Neutral, tally.neutral),
        (RegionState::AffiliationA, tally.affiliation_a),
        (RegionState::AffiliationB, tally.affiliation_b),
    ] {
        spans.push(Span::styled(
            format!("{} {} ", state.label(), count),
            Style::default().fg(color_for(state, false)),
        ));
    }

    spans.push(Span::styled("| ", dim));
    match app.hovered_summary() {
        Some((name, state)) => {
            spans.push(Span::styled(
                name.to_string(),
                Style::default()
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD),
            ));
            spans.push(Span::styled(
                format!(" ({}) ", state.label()),
                Style::default().fg(color_for(state, false)),
            ));
        }
        None => spans.push(Span::styled(app.center_coords(), Style::default().fg(Color::Cyan))),
    }

    spans.push(Span::styled(" | ", dim));
    spans.push(toggle_span(settings.show_borders, "[B]order ", "[b]order "));
    spans.push(toggle_span(settings.show_labels, "[L]abels ", "[L]abels "));
    spans.push(Span::styled(
        "| click:cycle shift/right-click:reset f:fullscreen r:reset view q:quit",
        dim,
    ));

    Line::from(spans)
}
