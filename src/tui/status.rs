use ratatui::prelude::*;
use ratatui::widgets::*;

use crate::view::controller::StatusPanel;

use super::app::App;
use super::chrome;

pub fn render(frame: &mut Frame, area: Rect, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(2),
            Constraint::Min(0),
        ])
        .split(area);

    frame.render_widget(
        chrome::input("Document ID", &app.ctx.view.status_input, true),
        chunks[0],
    );

    let link = match &app.ctx.view.opened_url {
        Some(url) => Line::from(vec![
            Span::styled("  ⇩ ", Style::default().fg(Color::Green).bold()),
            Span::styled(url.as_str(), Style::default().fg(Color::Cyan)),
        ]),
        None => Line::from(""),
    };
    frame.render_widget(Paragraph::new(link), chunks[1]);

    let body = match &app.ctx.view.status {
        StatusPanel::Idle => Paragraph::new(Line::from(Span::styled(
            "  Enter a document ID and press Enter",
            Style::default().fg(Color::DarkGray),
        ))),
        StatusPanel::Checking => Paragraph::new(Line::from(Span::styled(
            "  Checking status...",
            Style::default().fg(Color::Cyan),
        ))),
        StatusPanel::Empty => Paragraph::new(Line::from(Span::styled(
            "  No status records found",
            Style::default().fg(Color::DarkGray),
        ))),
        StatusPanel::Failed(msg) => Paragraph::new(Line::from(Span::styled(
            format!("  {}", msg),
            Style::default().fg(Color::Red),
        ))),
        StatusPanel::History { current, timeline } => {
            let mut lines = vec![
                Line::from(vec![
                    Span::styled("  Current Status: ", Style::default().fg(Color::DarkGray)),
                    Span::styled(
                        current.label.as_str(),
                        Style::default().fg(Color::Cyan).bold(),
                    ),
                    Span::styled(
                        format!("  {}", current.when),
                        Style::default().fg(Color::DarkGray),
                    ),
                ]),
                Line::from(Span::styled(
                    format!("  {}", current.message),
                    Style::default().fg(Color::White),
                )),
                Line::from(""),
                Line::from(Span::styled(
                    "  Status History",
                    Style::default().fg(Color::White).bold(),
                )),
            ];
            for (i, entry) in timeline.iter().enumerate() {
                let connector = if i + 1 == timeline.len() { "└" } else { "│" };
                lines.push(Line::from(vec![
                    Span::styled(
                        format!("  {} ", connector),
                        Style::default().fg(Color::DarkGray),
                    ),
                    Span::styled(
                        format!("{:<24}", entry.label),
                        Style::default().fg(Color::Cyan),
                    ),
                    Span::styled(
                        format!("{}  ", entry.when),
                        Style::default().fg(Color::DarkGray),
                    ),
                    Span::styled(entry.message.as_str(), Style::default().fg(Color::Gray)),
                ]));
            }
            Paragraph::new(lines).scroll((app.status_scroll as u16, 0))
        }
    };

    frame.render_widget(
        body.wrap(Wrap { trim: false }).block(chrome::panel("Status")),
        chunks[2],
    );
}
