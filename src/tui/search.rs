use ratatui::prelude::*;
use ratatui::widgets::*;

use crate::view::controller::SearchPanel;
use crate::view::format::ResultCard;

use super::app::{App, SearchField, CATEGORIES, FILE_TYPES};
use super::chrome;

pub fn render(frame: &mut Frame, area: Rect, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Min(0),
        ])
        .split(area);

    frame.render_widget(
        chrome::input("Query", &app.search_input, app.search_field == SearchField::Query),
        chunks[0],
    );

    let filters = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(chunks[1]);
    frame.render_widget(
        filter(
            "Category",
            CATEGORIES[app.category_idx],
            app.search_field == SearchField::Category,
        ),
        filters[0],
    );
    frame.render_widget(
        filter(
            "File type",
            FILE_TYPES[app.type_idx],
            app.search_field == SearchField::Type,
        ),
        filters[1],
    );

    render_results(frame, chunks[2], app);
}

fn filter<'a>(label: &'a str, value: &'a str, focused: bool) -> Paragraph<'a> {
    let shown = if value.is_empty() { "All" } else { value };
    let border = if focused { Color::Cyan } else { Color::DarkGray };
    Paragraph::new(Line::from(vec![
        Span::styled("  ◀ ", Style::default().fg(border)),
        Span::styled(shown, Style::default().fg(Color::White)),
        Span::styled(" ▶", Style::default().fg(border)),
    ]))
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(border))
            .title(format!(" {} ", label))
            .title_style(Style::default().fg(border)),
    )
}

fn message(text: &str, color: Color) -> Paragraph<'_> {
    Paragraph::new(Line::from(Span::styled(
        format!("  {}", text),
        Style::default().fg(color),
    )))
    .wrap(Wrap { trim: false })
    .block(chrome::panel("Results"))
}

fn card_lines(card: &ResultCard) -> Vec<Line<'_>> {
    let mut lines = vec![
        Line::from(Span::styled(
            format!("  {}", card.title),
            Style::default().fg(Color::White).bold(),
        )),
        Line::from(vec![
            Span::styled(format!("  {}", card.category), Style::default().fg(Color::Blue)),
            Span::styled(format!("  {}", card.file_type), Style::default().fg(Color::Magenta)),
            Span::styled(
                format!("  {}", card.document_type),
                Style::default().fg(Color::DarkGray),
            ),
            Span::styled(format!("  {}", card.date), Style::default().fg(Color::DarkGray)),
        ]),
        Line::from(Span::styled(
            format!("  ID: {}", card.document_id),
            Style::default().fg(Color::Cyan),
        )),
        Line::from(Span::styled(
            format!("  {}", card.summary),
            Style::default().fg(Color::Gray),
        )),
    ];
    if !card.tags.is_empty() {
        let tags: Vec<String> = card.tags.iter().map(|t| format!("#{}", t)).collect();
        lines.push(Line::from(Span::styled(
            format!("  {}", tags.join(" ")),
            Style::default().fg(Color::Green),
        )));
    }
    lines.push(Line::from(""));
    lines
}

fn render_results(frame: &mut Frame, area: Rect, app: &App) {
    let cards = match &app.ctx.view.search {
        SearchPanel::Idle => {
            frame.render_widget(
                message("Type a query or pick a filter, then press Enter", Color::DarkGray),
                area,
            );
            return;
        }
        SearchPanel::Searching => {
            frame.render_widget(message("Searching...", Color::Cyan), area);
            return;
        }
        SearchPanel::Empty => {
            frame.render_widget(message("No matching documents found", Color::DarkGray), area);
            return;
        }
        SearchPanel::Failed(msg) => {
            let text = format!("Search failed: {}", msg);
            frame.render_widget(message(&text, Color::Red), area);
            return;
        }
        SearchPanel::Results(cards) => cards,
    };

    let scroll = app.search_scroll.min(cards.len().saturating_sub(1));
    let items: Vec<ListItem> = cards
        .iter()
        .skip(scroll)
        .map(|card| ListItem::new(card_lines(card)))
        .collect();

    let position = format!(" {}/{} ", scroll + 1, cards.len());
    let list = List::new(items).block(
        chrome::panel(&format!("Results ({})", cards.len()))
            .title_bottom(Line::from(position).right_aligned()),
    );
    frame.render_widget(list, area);
}
