use std::time::{Duration, Instant};

use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use unicode_width::UnicodeWidthStr;

use crate::engine::Snapshot;
use crate::theme::Theme;

/// How long the "+20s" time-bonus flash stays visible.
const BONUS_FLASH_DURATION: Duration = Duration::from_secs(2);

/// Supplemental values the HUD shows alongside the snapshot.
#[derive(Debug, Clone, Copy)]
pub struct HudInfo {
    pub best_score: u32,
    /// The running score has already passed the persisted best.
    pub ahead_of_best: bool,
    pub now: Instant,
    pub bonus_flash_at: Option<Instant>,
}

/// Renders the single HUD line at the bottom and returns the play area
/// above it.
#[must_use]
pub fn render_hud(
    frame: &mut Frame<'_>,
    area: Rect,
    snapshot: &Snapshot<'_>,
    info: HudInfo,
    theme: &Theme,
) -> Rect {
    let [play_area, hud_area] =
        Layout::vertical([Constraint::Min(0), Constraint::Length(1)]).areas(area);

    let line = hud_line(snapshot, info, theme, true);
    // Drop the mode label when the full line does not fit the terminal.
    let line = if line_width(&line) > usize::from(hud_area.width) {
        hud_line(snapshot, info, theme, false)
    } else {
        line
    };

    frame.render_widget(
        Paragraph::new(line).alignment(Alignment::Center),
        hud_area,
    );

    play_area
}

fn hud_line(
    snapshot: &Snapshot<'_>,
    info: HudInfo,
    theme: &Theme,
    with_mode: bool,
) -> Line<'static> {
    let text = Style::new().fg(theme.hud_text);
    let accent = Style::new().fg(theme.hud_accent);
    let mut spans = Vec::new();

    if with_mode {
        spans.push(Span::styled(snapshot.mode.label().to_owned(), accent));
        spans.push(Span::styled("   ", text));
    }

    spans.push(Span::styled(format!("Lv {}", snapshot.level), text));
    spans.push(Span::styled("   ", text));
    spans.push(Span::styled(format!("Score {}", snapshot.score), accent));
    spans.push(Span::styled("   ", text));

    // While the running score beats the persisted best, show it as the best.
    let best = if info.ahead_of_best {
        snapshot.score
    } else {
        info.best_score
    };
    let best_style = if info.ahead_of_best {
        accent.add_modifier(Modifier::BOLD)
    } else {
        text
    };
    spans.push(Span::styled(format!("Best {best}"), best_style));

    if let Some(secs) = snapshot.remaining_secs {
        spans.push(Span::styled("   ", text));
        spans.push(Span::styled(
            format!("Time {secs}s"),
            Style::new().fg(theme.hud_timer),
        ));
    }

    if bonus_flash_visible(info) {
        spans.push(Span::styled("  ", text));
        spans.push(Span::styled(
            "+20s!",
            Style::new()
                .fg(theme.hud_timer)
                .add_modifier(Modifier::BOLD),
        ));
    }

    Line::from(spans)
}

fn bonus_flash_visible(info: HudInfo) -> bool {
    info.bonus_flash_at
        .is_some_and(|at| info.now.saturating_duration_since(at) < BONUS_FLASH_DURATION)
}

fn line_width(line: &Line<'_>) -> usize {
    line.spans
        .iter()
        .map(|span| span.content.as_ref().width())
        .sum()
}
