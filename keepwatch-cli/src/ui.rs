use ratatui::{
    backend::Backend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, Paragraph},
    Frame, Terminal,
};

use crate::controls::StatusSnapshot;

pub fn draw_status<B: Backend>(
    terminal: &mut Terminal<B>,
    status: &StatusSnapshot,
    log_lines: &[String],
) {
    // Render the controls, clock and status panels.
    let _ = terminal.draw(|f| {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .margin(1)
            .constraints([
                Constraint::Length(1),
                Constraint::Length(3),
                Constraint::Length(5),
                Constraint::Length(4),
                Constraint::Min(0),
            ])
            .split(f.size());

        let title = Paragraph::new("keepwatch").style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        );
        f.render_widget(title, chunks[0]);

        let controls = Paragraph::new("space=start/pause  r=reset  q=quit")
            .style(Style::default().fg(Color::Blue))
            .block(Block::default().borders(Borders::ALL).title("Controls"));
        f.render_widget(controls, chunks[1]);

        draw_clock(f, chunks[2], status);

        let state_color = if status.running {
            Color::Green
        } else {
            Color::Red
        };
        let status_widget = Paragraph::new(status.text.as_str())
            .style(Style::default().fg(state_color))
            .block(Block::default().borders(Borders::ALL).title("Status"));
        f.render_widget(status_widget, chunks[3]);

        let log_height = chunks[4].height.saturating_sub(2) as usize;
        let start = log_lines.len().saturating_sub(log_height);
        let log_text = if log_lines.is_empty() {
            "No logs yet.".to_string()
        } else {
            log_lines[start..].join("\n")
        };

        let log_widget = Paragraph::new(log_text)
            .style(Style::default().fg(Color::DarkGray))
            .block(Block::default().borders(Borders::ALL).title("Logs"));
        f.render_widget(log_widget, chunks[4]);
    });
}

fn draw_clock(f: &mut Frame, area: Rect, status: &StatusSnapshot) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Ratio(1, 3),
            Constraint::Ratio(1, 3),
            Constraint::Ratio(1, 3),
        ])
        .split(area);

    let units = [
        ("hours", status.hours.as_str()),
        ("min", status.minutes.as_str()),
        ("second", status.seconds.as_str()),
    ];
    for ((label, value), column) in units.into_iter().zip(columns.iter()) {
        let widget = Paragraph::new(format!("\n{}", value))
            .alignment(Alignment::Center)
            .style(
                Style::default()
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD),
            )
            .block(Block::default().borders(Borders::ALL).title(label));
        f.render_widget(widget, *column);
    }
}
