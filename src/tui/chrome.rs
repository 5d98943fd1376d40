use ratatui::prelude::*;
use ratatui::widgets::*;

use crate::view::controller::{Notice, Screen, Tab};

use super::app::App;

pub fn panel(title: &str) -> Block<'static> {
    Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(format!(" {} ", title))
        .title_style(Style::default().fg(Color::White).bold())
}

/// Bordered single-line input. Focused inputs get a cyan border and a cursor.
pub fn input<'a>(label: &'a str, value: &'a str, focused: bool) -> Paragraph<'a> {
    let (border, cursor) = if focused {
        (Color::Cyan, "_")
    } else {
        (Color::DarkGray, "")
    };
    Paragraph::new(Line::from(vec![
        Span::styled("  ", Style::default()),
        Span::styled(
            format!("{}{}", value, cursor),
            Style::default().fg(Color::White),
        ),
    ]))
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(border))
            .title(format!(" {} ", label))
            .title_style(Style::default().fg(border)),
    )
}

pub fn notice_line(notice: &Notice) -> Line<'_> {
    match notice {
        Notice::Success(msg) => Line::from(vec![
            Span::styled("  ✓ ", Style::default().fg(Color::Green).bold()),
            Span::styled(msg.as_str(), Style::default().fg(Color::Green)),
        ]),
        Notice::Error(msg) => Line::from(vec![
            Span::styled("  ✗ ", Style::default().fg(Color::Red).bold()),
            Span::styled(msg.as_str(), Style::default().fg(Color::Red)),
        ]),
    }
}

pub fn render_header(frame: &mut Frame, area: Rect, app: &App) {
    let mut spans = vec![Span::styled(
        "  docdesk",
        Style::default().fg(Color::Cyan).bold(),
    )];

    match app.ctx.view.screen() {
        Screen::Unauthenticated => {
            spans.push(Span::styled(
                "  sign in to continue",
                Style::default().fg(Color::DarkGray),
            ));
        }
        Screen::Authenticated(active) => {
            spans.push(Span::raw("   "));
            for (i, tab) in Tab::ALL.iter().enumerate() {
                let style = if *tab == active {
                    Style::default()
                        .fg(Color::Cyan)
                        .bg(Color::Rgb(30, 35, 50))
                        .bold()
                } else {
                    Style::default().fg(Color::Gray)
                };
                spans.push(Span::styled(format!(" F{} {} ", i + 1, tab.title()), style));
                spans.push(Span::raw(" "));
            }
            if let Some(user) = app.ctx.username() {
                spans.push(Span::styled("   ● ", Style::default().fg(Color::Green)));
                spans.push(Span::styled(
                    user.to_string(),
                    Style::default().fg(Color::White).bold(),
                ));
            }
        }
    }

    let header = Paragraph::new(Line::from(spans)).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray)),
    );
    frame.render_widget(header, area);
}

fn key_hints(app: &App) -> Vec<(&'static str, &'static str)> {
    if app.ctx.view.current_alert().is_some() {
        return vec![(" Enter/Esc", " dismiss")];
    }
    let mut hints = match app.ctx.view.screen() {
        Screen::Unauthenticated => vec![
            (" Tab", " next field  "),
            ("Enter", " submit  "),
            ("Ctrl-R", " login/register  "),
        ],
        Screen::Authenticated(tab) => {
            let mut hints = vec![(" Tab/F1-F3", " switch tab  ")];
            match tab {
                Tab::Upload => hints.extend([
                    ("Enter", " upload path or open recent  "),
                    ("↑/↓", " recent  "),
                ]),
                Tab::Search => hints.extend([
                    ("Enter", " search  "),
                    ("↑/↓", " field  "),
                    ("←/→", " filter  "),
                    ("PgUp/PgDn", " scroll  "),
                ]),
                Tab::Status => hints.extend([
                    ("Enter", " check  "),
                    ("Ctrl-D", " download  "),
                    ("PgUp/PgDn", " scroll  "),
                ]),
            }
            hints.push(("Ctrl-L", " logout  "));
            hints
        }
    };
    hints.push(("Ctrl-Q", " quit"));
    hints
}

pub fn render_help(frame: &mut Frame, area: Rect, app: &App) {
    let spans: Vec<Span> = key_hints(app)
        .into_iter()
        .flat_map(|(key, what)| {
            [
                Span::styled(key, Style::default().fg(Color::Cyan)),
                Span::styled(what, Style::default().fg(Color::DarkGray)),
            ]
        })
        .collect();
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

pub fn render_alert(frame: &mut Frame, area: Rect, message: &str) {
    let popup = centered(area, 60, 7);
    let body = Paragraph::new(vec![
        Line::from(""),
        Line::from(Span::styled(
            message,
            Style::default().fg(Color::White).bold(),
        )),
        Line::from(""),
        Line::from(Span::styled(
            "press Enter",
            Style::default().fg(Color::DarkGray),
        )),
    ])
    .alignment(Alignment::Center)
    .wrap(Wrap { trim: true })
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Yellow))
            .title(" ! ")
            .title_style(Style::default().fg(Color::Yellow).bold()),
    );
    frame.render_widget(Clear, popup);
    frame.render_widget(body, popup);
}
