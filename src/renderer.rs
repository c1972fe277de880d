use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::widgets::{Block, Paragraph};
use ratatui::Frame;

use crate::config::{GridSize, Palette};
use crate::engine::Snapshot;
use crate::snake::Cell;
use crate::ui::hud::render_hud;
use crate::ui::menu::{render_game_over_menu, render_pause_menu};

/// Terminal columns per grid cell; keeps cells roughly square.
pub const CELL_COLUMNS: u16 = 2;

pub const GLYPH_SNAKE: &str = "██";
pub const GLYPH_FOOD: &str = "◆ ";
pub const GLYPH_EMPTY: &str = "· ";

/// Renders one frame from a snapshot. Never mutates engine state.
pub fn render(frame: &mut Frame<'_>, snapshot: &Snapshot, palette: &Palette, paused: bool) {
    let area = frame.area();
    frame.render_widget(
        Paragraph::new("").style(Style::new().bg(palette.background)),
        area,
    );

    let play_area = render_hud(frame, area, snapshot, palette);
    let board = board_rect(play_area, snapshot.grid);

    let block =
        Block::bordered().border_style(Style::new().fg(palette.grid).bg(palette.background));
    let inner = block.inner(board);
    frame.render_widget(block, board);

    render_grid(frame, inner, snapshot.grid, palette);
    render_food(frame, inner, snapshot, palette);
    render_snake(frame, inner, snapshot, palette);

    if !snapshot.alive {
        render_game_over_menu(frame, board, snapshot.score, snapshot.collision, palette);
    } else if paused {
        render_pause_menu(frame, board, palette);
    }
}

/// Centers the bordered board inside `area`, clipped to it.
#[must_use]
pub fn board_rect(area: Rect, grid: GridSize) -> Rect {
    let width = grid.width.saturating_mul(CELL_COLUMNS).saturating_add(2);
    let height = grid.height.saturating_add(2);

    let x = area.x + area.width.saturating_sub(width) / 2;
    let y = area.y + area.height.saturating_sub(height) / 2;

    Rect::new(x, y, width, height).intersection(area)
}

/// Maps a grid cell to its top-left terminal position inside `inner`.
///
/// Returns `None` for cells off the grid or clipped by a small terminal.
#[must_use]
pub fn cell_to_terminal(inner: Rect, grid: GridSize, cell: Cell) -> Option<(u16, u16)> {
    if !cell.is_within_bounds(grid) {
        return None;
    }

    let x_offset = u16::try_from(cell.col).ok()?.checked_mul(CELL_COLUMNS)?;
    let y_offset = u16::try_from(cell.row).ok()?;

    let x = inner.x.checked_add(x_offset)?;
    let y = inner.y.checked_add(y_offset)?;
    if x.saturating_add(CELL_COLUMNS) > inner.right() || y >= inner.bottom() {
        return None;
    }

    Some((x, y))
}

fn render_grid(frame: &mut Frame<'_>, inner: Rect, grid: GridSize, palette: &Palette) {
    let style = Style::new().fg(palette.grid).bg(palette.background);
    let buffer = frame.buffer_mut();

    for row in 0..i32::from(grid.height) {
        for col in 0..i32::from(grid.width) {
            if let Some((x, y)) = cell_to_terminal(inner, grid, Cell::new(col, row)) {
                buffer.set_string(x, y, GLYPH_EMPTY, style);
            }
        }
    }
}

fn render_food(frame: &mut Frame<'_>, inner: Rect, snapshot: &Snapshot, palette: &Palette) {
    let Some(food) = snapshot.food else {
        return;
    };
    let Some((x, y)) = cell_to_terminal(inner, snapshot.grid, food) else {
        return;
    };

    frame.buffer_mut().set_string(
        x,
        y,
        GLYPH_FOOD,
        Style::new()
            .fg(palette.food)
            .bg(palette.background)
            .add_modifier(Modifier::BOLD),
    );
}

fn render_snake(frame: &mut Frame<'_>, inner: Rect, snapshot: &Snapshot, palette: &Palette) {
    let buffer = frame.buffer_mut();

    for (index, cell) in snapshot.snake.iter().enumerate() {
        let Some((x, y)) = cell_to_terminal(inner, snapshot.grid, *cell) else {
            continue;
        };

        let color = if index == 0 {
            palette.snake_head
        } else {
            palette.snake_body[index % 2]
        };
        buffer.set_string(x, y, GLYPH_SNAKE, Style::new().fg(color).bg(palette.background));
    }
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use ratatui::backend::TestBackend;
    use ratatui::layout::Rect;
    use ratatui::Terminal;

    use super::{board_rect, cell_to_terminal, render, GLYPH_FOOD};
    use crate::config::{EngineConfig, GridSize, Palette};
    use crate::engine::SnakeEngine;
    use crate::input::Direction;
    use crate::snake::Cell;

    const GRID: GridSize = GridSize {
        width: 10,
        height: 6,
    };

    #[test]
    fn cells_map_two_columns_wide() {
        let inner = Rect::new(1, 1, 20, 6);

        assert_eq!(cell_to_terminal(inner, GRID, Cell::new(0, 0)), Some((1, 1)));
        assert_eq!(cell_to_terminal(inner, GRID, Cell::new(3, 2)), Some((7, 3)));
        assert_eq!(cell_to_terminal(inner, GRID, Cell::new(9, 5)), Some((19, 6)));
        assert_eq!(cell_to_terminal(inner, GRID, Cell::new(10, 0)), None);
    }

    #[test]
    fn clipped_cells_are_skipped() {
        let small = Rect::new(0, 0, 6, 2);

        assert_eq!(cell_to_terminal(small, GRID, Cell::new(2, 1)), Some((4, 1)));
        assert_eq!(cell_to_terminal(small, GRID, Cell::new(3, 0)), None);
        assert_eq!(cell_to_terminal(small, GRID, Cell::new(0, 2)), None);
    }

    #[test]
    fn board_is_centered_and_clipped() {
        let board = board_rect(Rect::new(0, 0, 40, 20), GRID);
        assert_eq!(board, Rect::new(9, 6, 22, 8));

        let tiny = board_rect(Rect::new(0, 0, 10, 4), GRID);
        assert_eq!(tiny, Rect::new(0, 0, 10, 4));
    }

    #[test]
    fn frame_shows_food_and_game_over_overlay() {
        let config = EngineConfig::with_grid(GRID.width, GRID.height);
        let mut engine = SnakeEngine::with_state(
            config,
            StdRng::seed_from_u64(8),
            vec![Cell::new(1, 2)],
            Direction::Left,
            Cell::new(4, 2),
        )
        .expect("scenario state should be valid");

        let mut terminal = Terminal::new(TestBackend::new(40, 20)).expect("test backend");
        let palette = Palette::default();

        let snapshot = engine.snapshot();
        terminal
            .draw(|frame| render(frame, &snapshot, &palette, false))
            .expect("draw should succeed");

        // The HUD takes the last row; food (4, 2) sits inside the bordered board.
        let board = board_rect(Rect::new(0, 0, 40, 19), GRID);
        let food_x = board.x + 1 + 4 * 2;
        let food_y = board.y + 1 + 2;
        assert_eq!(
            terminal.backend().buffer()[(food_x, food_y)].symbol(),
            GLYPH_FOOD.trim_end()
        );

        engine.step().expect("no placement fault");
        engine.step().expect("no placement fault");
        assert!(!engine.is_alive());

        let snapshot = engine.snapshot();
        terminal
            .draw(|frame| render(frame, &snapshot, &palette, false))
            .expect("draw should succeed");

        let text: String = terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect();
        assert!(text.contains("GAME OVER"));
    }
}
