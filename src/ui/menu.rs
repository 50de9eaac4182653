use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, Clear, Paragraph};

use crate::config::SessionConfig;
use crate::engine::Snapshot;
use crate::theme::{Theme, palette};

/// Draws the start screen: mode/level/theme selection as a centered popup.
pub fn render_start_menu(
    frame: &mut Frame<'_>,
    area: Rect,
    config: &SessionConfig,
    best_score: u32,
    theme: &Theme,
) {
    let popup = centered_popup(area, 70, 50);
    frame.render_widget(Clear, popup);

    let [title_row, body_row, footer_row] = Layout::vertical([
        Constraint::Length(2),
        Constraint::Min(3),
        Constraint::Length(2),
    ])
    .areas(popup);

    frame.render_widget(
        Paragraph::new(Line::from("SNAKE ARENA"))
            .alignment(Alignment::Center)
            .style(
                Style::default()
                    .fg(theme.menu_title)
                    .add_modifier(Modifier::BOLD),
            ),
        title_row,
    );

    let body = vec![
        Line::from(format!("Mode   < {} >", config.mode.label())),
        Line::from(format!("Level  - {} +", config.level)),
        Line::from(format!("Theme    {}", palette(config.theme).name)),
        Line::from(""),
        Line::from(format!("Best ({}): {best_score}", config.mode.label())),
        Line::from(""),
        Line::from("[Enter] Start"),
    ];
    frame.render_widget(
        Paragraph::new(body)
            .alignment(Alignment::Center)
            .block(Block::bordered().title(" new game ")),
        body_row,
    );

    frame.render_widget(
        Paragraph::new(Line::from(
            "←/→ mode   ↑/↓ level   [T] theme   [Q] quit",
        ))
        .alignment(Alignment::Center)
        .style(Style::default().fg(theme.menu_footer)),
        footer_row,
    );
}

/// Draws the pause overlay.
pub fn render_pause_menu(frame: &mut Frame<'_>, area: Rect, theme: &Theme) {
    let popup = centered_popup(area, 50, 30);
    frame.render_widget(Clear, popup);

    let lines = vec![
        Line::from("PAUSED"),
        Line::from(""),
        Line::from("[P] Resume"),
        Line::from("[Q] Quit"),
    ];
    frame.render_widget(
        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .style(Style::default().fg(theme.menu_title))
            .block(Block::bordered().title(" pause ")),
        popup,
    );
}

/// Draws the game-over overlay with the final and best scores.
pub fn render_game_over_menu(
    frame: &mut Frame<'_>,
    area: Rect,
    snapshot: &Snapshot<'_>,
    best_score: u32,
    is_new_best: bool,
    theme: &Theme,
) {
    let popup = centered_popup(area, 70, 45);
    frame.render_widget(Clear, popup);

    let cause = if snapshot.remaining_secs == Some(0) {
        "Time ran out"
    } else {
        "Crashed"
    };

    let lines = vec![
        Line::from("GAME OVER"),
        Line::from(""),
        Line::from(cause),
        Line::from(format!("Score: {}", snapshot.score)),
        Line::from(format!("Best ({}): {best_score}", snapshot.mode.label())),
        Line::from(if is_new_best { "New best score!" } else { "" }),
        Line::from(""),
        Line::from("[Enter] Play Again   [M] Menu   [Q] Quit"),
    ];

    frame.render_widget(
        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .style(Style::default().fg(theme.menu_title))
            .block(Block::bordered().title(" game over ")),
        popup,
    );
}

fn centered_popup(area: Rect, width_percent: u16, height_percent: u16) -> Rect {
    let [_, mid, _] = Layout::vertical([
        Constraint::Percentage((100 - height_percent) / 2),
        Constraint::Percentage(height_percent),
        Constraint::Percentage((100 - height_percent) / 2),
    ])
    .areas(area);

    let [_, center, _] = Layout::horizontal([
        Constraint::Percentage((100 - width_percent) / 2),
        Constraint::Percentage(width_percent),
        Constraint::Percentage((100 - width_percent) / 2),
    ])
    .areas(mid);

    center
}
