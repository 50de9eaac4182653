//! Frame rendering: a pure function of the engine snapshot and UI state.

use std::time::Instant;

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::widgets::Block;

use crate::config::SessionConfig;
use crate::engine::{Phase, Snapshot};
use crate::input::Direction;
use crate::theme::Theme;
use crate::ui::hud::{self, HudInfo};
use crate::ui::menu;

pub const GLYPH_SNAKE_BODY: &str = "█";
pub const GLYPH_SNAKE_TAIL: &str = "░";
pub const GLYPH_FOOD: &str = "●";
pub const GLYPH_OBSTACLE: &str = "▒";
pub const GLYPH_HEAD_UP: &str = "▲";
pub const GLYPH_HEAD_DOWN: &str = "▼";
pub const GLYPH_HEAD_LEFT: &str = "◀";
pub const GLYPH_HEAD_RIGHT: &str = "▶";

/// Everything one frame needs besides the engine snapshot.
#[derive(Debug, Clone, Copy)]
pub struct FrameInfo<'a> {
    pub snapshot: Option<Snapshot<'a>>,
    /// Menu selections shown while no session is active.
    pub menu_config: SessionConfig,
    /// Best score for the relevant mode.
    pub best_score: u32,
    /// The running score has already passed the persisted best.
    pub ahead_of_best: bool,
    pub theme: &'static Theme,
    pub now: Instant,
    /// Wall-clock instant of the last time-bonus event, for the HUD flash.
    pub bonus_flash_at: Option<Instant>,
    /// Whether the finished session set a new best score.
    pub final_is_new_best: bool,
}

/// Renders one full frame. No game-state mutation happens here.
pub fn render(frame: &mut Frame<'_>, info: &FrameInfo<'_>) {
    let area = frame.area();

    let Some(snapshot) = info.snapshot else {
        menu::render_start_menu(frame, area, &info.menu_config, info.best_score, info.theme);
        return;
    };

    let play_area = hud::render_hud(
        frame,
        area,
        &snapshot,
        HudInfo {
            best_score: info.best_score,
            ahead_of_best: info.ahead_of_best,
            now: info.now,
            bonus_flash_at: info.bonus_flash_at,
        },
        info.theme,
    );

    let board = board_rect(play_area, snapshot.grid);
    let block = Block::bordered().border_style(Style::new().fg(info.theme.border_fg));
    let inner = block.inner(board);
    frame.render_widget(block, board);

    render_obstacles(frame, inner, &snapshot, info.theme);
    render_food(frame, inner, &snapshot, info.theme);
    render_snake(frame, inner, &snapshot, info.theme);

    match snapshot.phase {
        Phase::Paused => menu::render_pause_menu(frame, play_area, info.theme),
        Phase::GameOver => menu::render_game_over_menu(
            frame,
            play_area,
            &snapshot,
            info.best_score,
            info.final_is_new_best,
            info.theme,
        ),
        _ => {}
    }
}

fn render_obstacles(frame: &mut Frame<'_>, inner: Rect, snapshot: &Snapshot<'_>, theme: &Theme) {
    let buffer = frame.buffer_mut();
    for obstacle in snapshot.obstacles {
        let Some((x, y)) = cell_to_terminal(inner, snapshot, *obstacle) else {
            continue;
        };
        buffer.set_string(x, y, GLYPH_OBSTACLE, Style::new().fg(theme.obstacle));
    }
}

fn render_food(frame: &mut Frame<'_>, inner: Rect, snapshot: &Snapshot<'_>, theme: &Theme) {
    let Some((x, y)) = cell_to_terminal(inner, snapshot, snapshot.food) else {
        return;
    };
    frame
        .buffer_mut()
        .set_string(x, y, GLYPH_FOOD, Style::new().fg(theme.food));
}

fn render_snake(frame: &mut Frame<'_>, inner: Rect, snapshot: &Snapshot<'_>, theme: &Theme) {
    let head = snapshot.snake.head();
    let tail = snapshot.snake.tail();

    let buffer = frame.buffer_mut();
    for segment in snapshot.snake.segments() {
        let Some((x, y)) = cell_to_terminal(inner, snapshot, *segment) else {
            continue;
        };

        if *segment == head {
            buffer.set_string(
                x,
                y,
                head_glyph(snapshot.heading),
                Style::new()
                    .fg(theme.snake_head)
                    .add_modifier(Modifier::BOLD),
            );
        } else if Some(*segment) == tail {
            buffer.set_string(x, y, GLYPH_SNAKE_TAIL, Style::new().fg(theme.snake_tail));
        } else {
            buffer.set_string(x, y, GLYPH_SNAKE_BODY, Style::new().fg(theme.snake_body));
        }
    }
}

fn head_glyph(heading: Option<Direction>) -> &'static str {
    match heading {
        Some(Direction::Up) => GLYPH_HEAD_UP,
        Some(Direction::Down) => GLYPH_HEAD_DOWN,
        Some(Direction::Left) => GLYPH_HEAD_LEFT,
        Some(Direction::Right) => GLYPH_HEAD_RIGHT,
        None => GLYPH_SNAKE_BODY,
    }
}

/// Centers the bordered board inside the available play area, clipping on
/// terminals smaller than the grid.
fn board_rect(area: Rect, grid: crate::grid::Grid) -> Rect {
    let cells = u16::try_from(grid.cells_per_axis()).unwrap_or(u16::MAX);
    let width = cells.saturating_add(2).min(area.width);
    let height = cells.saturating_add(2).min(area.height);

    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

fn cell_to_terminal(
    inner: Rect,
    snapshot: &Snapshot<'_>,
    position: crate::grid::Position,
) -> Option<(u16, u16)> {
    let (cx, cy) = snapshot.grid.cell_of(position)?;
    let x = inner.x.saturating_add(cx);
    let y = inner.y.saturating_add(cy);
    if x >= inner.right() || y >= inner.bottom() {
        return None;
    }
    Some((x, y))
}
