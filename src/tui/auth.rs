use ratatui::prelude::*;
use ratatui::widgets::*;

use super::app::{App, AuthField, AuthMode};
use super::chrome;

pub fn render(frame: &mut Frame, area: Rect, app: &App) {
    let register = app.auth_mode == AuthMode::Register;
    let form_height = if register { 15 } else { 12 };
    let form = Rect {
        x: area.x + area.width.saturating_sub(56) / 2,
        y: area.y + 1,
        width: area.width.min(56),
        height: area.height.saturating_sub(1).min(form_height),
    };

    let title = if register { "Register" } else { "Login" };
    let block = chrome::panel(title);
    let inner = block.inner(form);
    frame.render_widget(block, form);

    let mut constraints = vec![Constraint::Length(3), Constraint::Length(3)];
    if register {
        constraints.push(Constraint::Length(3));
    }
    constraints.push(Constraint::Min(0));
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(inner);

    let masked = "•".repeat(app.password.chars().count());
    frame.render_widget(
        chrome::input("Username", &app.username, app.auth_field == AuthField::Username),
        rows[0],
    );
    frame.render_widget(
        chrome::input("Password", &masked, app.auth_field == AuthField::Password),
        rows[1],
    );
    if register {
        frame.render_widget(
            chrome::input("Email (optional)", &app.email, app.auth_field == AuthField::Email),
            rows[2],
        );
    }

    let mut lines = Vec::new();
    if let Some(notice) = &app.ctx.view.auth_notice {
        lines.push(chrome::notice_line(notice));
    }
    let other = if register {
        "Have an account? Ctrl-R to log in"
    } else {
        "New here? Ctrl-R to register"
    };
    lines.push(Line::from(Span::styled(
        format!("  {}", other),
        Style::default().fg(Color::DarkGray),
    )));
    frame.render_widget(
        Paragraph::new(lines).wrap(Wrap { trim: false }),
        rows[rows.len() - 1],
    );
}
