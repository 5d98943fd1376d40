use ratatui::prelude::*;
use ratatui::widgets::*;

use crate::view::controller::UploadResult;

use super::app::App;
use super::chrome;

pub fn render(frame: &mut Frame, area: Rect, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Length(5),
            Constraint::Min(0),
        ])
        .split(area);

    frame.render_widget(
        chrome::input("File path (type, paste or drop a file)", &app.upload_path, true),
        chunks[0],
    );

    match app.ctx.view.progress() {
        Some(stage) => {
            let gauge = Gauge::default()
                .block(chrome::panel("Progress"))
                .gauge_style(Style::default().fg(Color::Cyan).bg(Color::Rgb(30, 35, 50)))
                .percent(stage.percent())
                .label(stage.label());
            frame.render_widget(gauge, chunks[1]);
        }
        None => {
            let hint = Paragraph::new(Line::from(Span::styled(
                "  PDF, DOCX, DOC, TXT or CSV",
                Style::default().fg(Color::DarkGray),
            )))
            .block(chrome::panel("Progress"));
            frame.render_widget(hint, chunks[1]);
        }
    }

    render_result(frame, chunks[2], app);
    render_recent(frame, chunks[3], app);
}

fn render_result(frame: &mut Frame, area: Rect, app: &App) {
    let lines = match &app.ctx.view.upload_result {
        Some(UploadResult::Success {
            document_id,
            filename,
        }) => vec![
            Line::from(Span::styled(
                "  Upload Successful!",
                Style::default().fg(Color::Green).bold(),
            )),
            Line::from(vec![
                Span::styled("  Document ID: ", Style::default().fg(Color::DarkGray)),
                Span::styled(document_id.as_str(), Style::default().fg(Color::Cyan).bold()),
            ]),
            Line::from(vec![
                Span::styled("  Filename:    ", Style::default().fg(Color::DarkGray)),
                Span::styled(filename.as_str(), Style::default().fg(Color::White)),
            ]),
        ],
        Some(UploadResult::Failed(msg)) => vec![
            Line::from(Span::styled(
                "  Upload Failed",
                Style::default().fg(Color::Red).bold(),
            )),
            Line::from(Span::styled(
                format!("  {}", msg),
                Style::default().fg(Color::Red),
            )),
        ],
        None => vec![Line::from(Span::styled(
            "  Nothing uploaded yet",
            Style::default().fg(Color::DarkGray),
        ))],
    };
    frame.render_widget(
        Paragraph::new(lines)
            .wrap(Wrap { trim: false })
            .block(chrome::panel("Result")),
        area,
    );
}

fn render_recent(frame: &mut Frame, area: Rect, app: &App) {
    let uploads = &app.ctx.recent_uploads;
    if uploads.is_empty() {
        let empty = Paragraph::new(Line::from(Span::styled(
            "  No upload history",
            Style::default().fg(Color::DarkGray),
        )))
        .block(chrome::panel("Recent Uploads"));
        frame.render_widget(empty, area);
        return;
    }

    let items: Vec<ListItem> = uploads
        .iter()
        .enumerate()
        .map(|(i, upload)| {
            let is_selected = i == app.recent_selected;
            let marker = if is_selected { ">" } else { " " };
            let line = Line::from(vec![
                Span::styled(
                    format!(" {} ", marker),
                    Style::default().fg(Color::Cyan).bold(),
                ),
                Span::styled(
                    format!("{:<32}", upload.filename),
                    if is_selected {
                        Style::default().fg(Color::White).bold()
                    } else {
                        Style::default().fg(Color::Gray)
                    },
                ),
                Span::styled(
                    format!(" ID: {}...  ", upload.short_id()),
                    Style::default().fg(Color::Cyan),
                ),
                Span::styled(
                    upload.upload_time.as_str(),
                    Style::default().fg(Color::DarkGray),
                ),
            ]);
            let style = if is_selected {
                Style::default().bg(Color::Rgb(30, 35, 50))
            } else {
                Style::default()
            };
            ListItem::new(line).style(style)
        })
        .collect();

    frame.render_widget(List::new(items).block(chrome::panel("Recent Uploads")), area);
}
