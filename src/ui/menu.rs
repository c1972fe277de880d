use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, Clear, Paragraph};
use ratatui::Frame;

use crate::config::Palette;
use crate::engine::Collision;

/// Draws the game-over popup over the board.
pub fn render_game_over_menu(
    frame: &mut Frame<'_>,
    area: Rect,
    score: u32,
    collision: Option<Collision>,
    palette: &Palette,
) {
    let popup = centered_popup(area, 70, 50);
    frame.render_widget(Clear, popup);

    let title = Style::new()
        .fg(palette.accent)
        .add_modifier(Modifier::BOLD);
    let lines = vec![
        Line::styled("GAME OVER", title),
        Line::from(""),
        Line::from(format!("Score: {score}")),
        Line::from(cause_text(collision)),
        Line::from(""),
        Line::from("Press SPACE to Restart  |  Q to Quit"),
    ];

    frame.render_widget(
        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .style(Style::new().fg(palette.text).bg(palette.background))
            .block(Block::bordered().border_style(Style::new().fg(palette.accent))),
        popup,
    );
}

/// Draws the pause popup over the board.
pub fn render_pause_menu(frame: &mut Frame<'_>, area: Rect, palette: &Palette) {
    let popup = centered_popup(area, 60, 30);
    frame.render_widget(Clear, popup);

    let lines = vec![
        Line::from("PAUSED"),
        Line::from(""),
        Line::from("[P]/[Esc] Resume  |  [Q] Quit"),
    ];
    frame.render_widget(
        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .style(Style::new().fg(palette.text).bg(palette.background))
            .block(Block::bordered().title(" pause ")),
        popup,
    );
}

fn cause_text(collision: Option<Collision>) -> &'static str {
    match collision {
        Some(Collision::Boundary) => "Cause: hit the wall",
        Some(Collision::SelfBody) => "Cause: hit yourself",
        None => "Cause: no room left for food",
    }
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

#[cfg(test)]
mod tests {
    use ratatui::layout::Rect;

    use super::{cause_text, centered_popup};
    use crate::engine::Collision;

    #[test]
    fn popup_is_inside_the_area() {
        let area = Rect::new(0, 0, 80, 24);
        let popup = centered_popup(area, 70, 50);

        assert!(popup.width <= 56 && popup.height <= 12);
        assert_eq!(area.intersection(popup), popup);
    }

    #[test]
    fn each_cause_has_its_own_text() {
        assert_ne!(
            cause_text(Some(Collision::Boundary)),
            cause_text(Some(Collision::SelfBody))
        );
        assert_ne!(cause_text(None), cause_text(Some(Collision::Boundary)));
    }
}
