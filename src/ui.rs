use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Widget, Wrap},
};
use unicode_width::UnicodeWidthStr;

use typeflow::engine::{CharState, WordView};
use typeflow::session::SessionSummary;

use crate::App;

const HORIZONTAL_MARGIN: u16 = 5;
const VERTICAL_MARGIN: u16 = 1;

struct Styles {
    bold: Style,
    correct: Style,
    incorrect: Style,
    untyped: Style,
    current: Style,
    italic: Style,
}

impl Styles {
    fn new() -> Self {
        let bold = Style::default().add_modifier(Modifier::BOLD);
        Self {
            bold,
            correct: Style::default().patch(bold).fg(Color::Green),
            incorrect: Style::default().patch(bold).fg(Color::Red),
            untyped: Style::default().patch(bold).add_modifier(Modifier::DIM),
            current: Style::default().patch(bold).fg(Color::White),
            italic: Style::default().add_modifier(Modifier::ITALIC),
        }
    }
}

fn word_spans<'a>(word: &WordView<'a>, styles: &Styles) -> Vec<Span<'a>> {
    let mut spans: Vec<Span> = word
        .chars
        .iter()
        .enumerate()
        .map(|(idx, &(ch, state))| {
            let mut style = match state {
                CharState::Correct => styles.correct,
                CharState::Incorrect => styles.incorrect,
                CharState::Untyped if word.is_current => styles.current,
                CharState::Untyped => styles.untyped,
            };
            if word.active_char == Some(idx) {
                style = style.add_modifier(Modifier::UNDERLINED);
            }
            Span::styled(ch.to_string(), style)
        })
        .collect();

    if word.end_active {
        spans.push(Span::styled(
            " ",
            styles.untyped.add_modifier(Modifier::UNDERLINED),
        ));
    } else {
        spans.push(Span::raw(" "));
    }
    spans
}

fn summary_line(summary: &SessionSummary) -> String {
    format!(
        "Finished ({}). Net WPM: {}, Accuracy: {}%, Keystrokes: {}.",
        summary.reason, summary.net_wpm, summary.accuracy_percent, summary.total_keystrokes
    )
}

impl Widget for &App {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let styles = Styles::new();
        let game = &self.game;
        let stats = self.scoreboard.stats;

        let board_text_width: usize = game.engine().words().map(|w| w.width() + 1).sum();
        let max_chars_per_line = area.width.saturating_sub(HORIZONTAL_MARGIN * 2).max(1);
        let board_lines = ((board_text_width as f64 / max_chars_per_line as f64).ceil() as u16)
            .max(1)
            + 1;

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .horizontal_margin(HORIZONTAL_MARGIN)
            .vertical_margin(VERTICAL_MARGIN)
            .constraints([
                Constraint::Length(1), // stats
                Constraint::Length(1), // settings
                Constraint::Length(1), // padding
                Constraint::Min(board_lines.min(area.height / 2)),
                Constraint::Length(1), // result
                Constraint::Length(1), // legend
            ])
            .split(area);

        let stats_line = Paragraph::new(Line::from(vec![
            Span::styled(format!("{}s", stats.remaining_seconds), styles.bold),
            Span::raw("   "),
            Span::styled(format!("{} wpm", stats.net_wpm), styles.bold),
            Span::raw("   "),
            Span::styled(format!("{}% acc", stats.accuracy_percent), styles.bold),
            Span::raw("   "),
            Span::styled(format!("{} chars", stats.total_keystrokes), styles.bold),
        ]))
        .alignment(Alignment::Center);
        stats_line.render(chunks[0], buf);

        let settings = Paragraph::new(Span::styled(
            format!(
                "duration: {}s | words: {}",
                game.config().duration_secs,
                game.config().mode
            ),
            styles.italic.fg(Color::Gray),
        ))
        .alignment(Alignment::Center);
        settings.render(chunks[1], buf);

        let spans: Vec<Span> = game
            .engine()
            .word_views()
            .flat_map(|w| word_spans(&w, &styles))
            .collect();
        let board = Paragraph::new(Line::from(spans))
            .alignment(if board_text_width <= max_chars_per_line as usize {
                Alignment::Center
            } else {
                Alignment::Left
            })
            .wrap(Wrap { trim: true });
        board.render(chunks[3], buf);

        if let Some(summary) = game.session().summary() {
            Paragraph::new(Span::styled(summary_line(&summary), styles.bold.fg(Color::Cyan)))
                .alignment(Alignment::Center)
                .render(chunks[4], buf);
        }

        let legend = if game.has_finished() {
            "(→) start again / (←) reset / (esc)ape"
        } else if game.has_started() {
            "(←) reset / (esc)ape"
        } else {
            "type to start / (↑↓) duration / (→) word set / (←) reset / (esc)ape"
        };
        Paragraph::new(Span::styled(legend, styles.italic))
            .alignment(Alignment::Center)
            .render(chunks[5], buf);
    }
}
