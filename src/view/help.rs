//! Help overlay widget displaying keyboard shortcuts.
//!
//! Shows a centered modal overlay with all keyboard shortcuts grouped by category.
//! Triggered by '?' key, dismissed by 'Esc' or '?'.

use super::styles::BoardStyles;
use ratatui::{
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

const HELP_POPUP_WIDTH_PERCENT: u16 = 70;
const HELP_POPUP_HEIGHT_PERCENT: u16 = 80;

/// Shortcut table: (category, keys, description).
const SHORTCUTS: &[(&str, &[(&str, &str)])] = &[
    (
        "List",
        &[
            ("j/↓ k/↑", "Move between questions"),
            ("Enter", "Open question"),
            ("n/→ p/←", "Next / previous page"),
            ("g/Home G/End", "First / last page"),
            ("/", "Search titles"),
            ("t", "Choose tag (←/→, Enter)"),
            ("x", "Clear search and tag"),
            ("r", "Retry after an error"),
            ("R", "Reload"),
            ("a", "Ask a question"),
        ],
    ),
    (
        "Question",
        &[
            ("Esc", "Back to list"),
            ("j/↓ k/↑", "Select answer"),
            ("e", "Edit title"),
            ("T", "Edit tags"),
            ("E", "Edit selected answer"),
            ("w", "Write an answer"),
            ("d", "Delete selected answer (if enabled)"),
        ],
    ),
    (
        "Editing",
        &[
            ("Enter", "Save / submit"),
            ("Ctrl+j", "New line"),
            ("Tab", "Next form field"),
            ("Esc", "Cancel"),
        ],
    ),
    (
        "Application",
        &[("?", "Toggle this help"), ("q / Ctrl+c", "Quit")],
    ),
];

/// Render the help overlay centered on the screen.
pub fn render_help_overlay(frame: &mut Frame, styles: &BoardStyles) {
    let area = frame.area();
    let popup_area = centered_rect(HELP_POPUP_WIDTH_PERCENT, HELP_POPUP_HEIGHT_PERCENT, area);

    frame.render_widget(Clear, popup_area);

    let help_paragraph = Paragraph::new(build_help_content(styles))
        .block(
            Block::default()
                .title(" Keyboard Shortcuts ")
                .borders(Borders::ALL)
                .border_style(styles.focused_border),
        )
        .wrap(Wrap { trim: false })
        .alignment(Alignment::Left);

    frame.render_widget(help_paragraph, popup_area);

    let hint_area = Rect {
        x: popup_area.x,
        y: popup_area.y + popup_area.height.saturating_sub(1),
        width: popup_area.width,
        height: 1,
    };
    let hint = Paragraph::new(Line::from(Span::styled(
        " Press Esc or ? to close ",
        Style::default().add_modifier(Modifier::DIM),
    )))
    .alignment(Alignment::Center);
    frame.render_widget(hint, hint_area);
}

/// Calculate the centered rect for the help overlay.
fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let popup_width = area.width * percent_x / 100;
    let popup_height = area.height * percent_y / 100;
    let popup_x = (area.width.saturating_sub(popup_width)) / 2;
    let popup_y = (area.height.saturating_sub(popup_height)) / 2;

    Rect {
        x: area.x + popup_x,
        y: area.y + popup_y,
        width: popup_width,
        height: popup_height,
    }
}

fn build_help_content(styles: &BoardStyles) -> Vec<Line<'static>> {
    let key_style = styles.tag.add_modifier(Modifier::BOLD);
    let mut lines = Vec::new();
    for (i, (category, entries)) in SHORTCUTS.iter().enumerate() {
        if i > 0 {
            lines.push(Line::from(""));
        }
        lines.push(Line::from(Span::styled(*category, styles.title)));
        for (keys, desc) in entries.iter() {
            lines.push(Line::from(vec![
                Span::styled(format!("  {keys:<14}"), key_style),
                Span::raw(*desc),
            ]));
        }
    }
    lines
}

#[cfg(test)]
#[path = "help_tests.rs"]
mod tests;
