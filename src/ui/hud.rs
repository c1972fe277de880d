use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::config::Palette;
use crate::engine::Snapshot;

const HUD_HEIGHT: u16 = 1;

/// Renders the status bar and returns the play area above it.
#[must_use]
pub fn render_hud(
    frame: &mut Frame<'_>,
    area: Rect,
    snapshot: &Snapshot,
    palette: &Palette,
) -> Rect {
    let [play_area, hud_area] =
        Layout::vertical([Constraint::Min(0), Constraint::Length(HUD_HEIGHT)]).areas(area);

    let label = Style::new().fg(palette.text).bg(palette.background);
    let value = Style::new()
        .fg(palette.accent)
        .bg(palette.background)
        .add_modifier(Modifier::BOLD);

    let width = usize::from(hud_area.width);
    let score = format!("{}", snapshot.score);
    let speed = format!("{:.1}", snapshot.speed);
    let length = format!("{}", snapshot.snake.len());

    let spans = vec![
        Span::styled(" Score: ", label),
        Span::styled(score, value),
        Span::styled("  Speed: ", label),
        Span::styled(speed, value),
        Span::styled("  Length: ", label),
        Span::styled(length, value),
    ];

    let line = Line::from(spans);
    let text_width = line.width();
    let paragraph = if text_width <= width {
        Paragraph::new(line).style(Style::new().bg(palette.background))
    } else {
        // Too narrow for styled spans; fall back to a plain clipped line.
        let plain: String = line.spans.iter().map(|span| span.content.as_ref()).collect();
        Paragraph::new(fit_to_width(&plain, width)).style(label)
    };

    frame.render_widget(paragraph.alignment(Alignment::Left), hud_area);

    play_area
}

/// Clips `text` to at most `width` terminal columns.
#[must_use]
pub fn fit_to_width(text: &str, width: usize) -> String {
    if text.width() <= width {
        return text.to_owned();
    }

    let mut used = 0;
    let mut clipped = String::new();
    for ch in text.chars() {
        let ch_width = ch.width().unwrap_or(0);
        if used + ch_width > width {
            break;
        }
        used += ch_width;
        clipped.push(ch);
    }
    clipped
}

#[cfg(test)]
mod tests {
    use unicode_width::UnicodeWidthStr;

    use super::fit_to_width;

    #[test]
    fn short_text_is_untouched() {
        assert_eq!(fit_to_width("Score: 3", 20), "Score: 3");
    }

    #[test]
    fn long_text_is_clipped_by_columns() {
        assert_eq!(fit_to_width("Score: 12345", 5), "Score");
    }

    #[test]
    fn wide_glyphs_never_overflow() {
        let clipped = fit_to_width("蛇蛇蛇", 5);
        assert_eq!(clipped, "蛇蛇");
        assert!(clipped.width() <= 5);
    }
}
