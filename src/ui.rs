use chrono::Local;
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style, Stylize},
    text::{Line, Span},
    widgets::{
        Block, BorderType, Borders, Clear, Paragraph, Wrap,
        block::{Position, Title},
    },
};

use crate::app::App;
use crate::dataset::Record;
use crate::deck::Selection;

struct HelpTopic {
    title: &'static str,
    detail: &'static str,
}

const HELP_TOPICS: &[HelpTopic] = &[
    HelpTopic {
        title: "Flip the card",
        detail: "Press Space or Enter, or click the card, to see the journal prompt and suggested actions.",
    },
    HelpTopic {
        title: "Another idea",
        detail: "Press n, s or Tab (or click the button at the bottom) for a new random card. You never get the same concept twice in a row.",
    },
    HelpTopic {
        title: "Expand Prompt",
        detail: "On the back of a card press e to get a longer, deeper version of the prompt.",
    },
    HelpTopic {
        title: "More Actions",
        detail: "On the back of a card press m for two extra suggestions.",
    },
    HelpTopic {
        title: "Image",
        detail: "Press o to open a placeholder image for the concept in your browser.",
    },
    HelpTopic {
        title: "Your own prompts",
        detail: "Start with --source <file.csv> or --source <https://…/cards.csv>. The header row needs a Concept column plus the Journal Prompt and Action columns.",
    },
    HelpTopic {
        title: "Quit",
        detail: "Press q, Esc or Ctrl+C.",
    },
];

pub fn draw(frame: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(10),
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Length(1),
        ])
        .split(frame.size());

    let selection = app.selection().clone();

    draw_header(frame, &selection, chunks[0]);

    match selection.card() {
        Some(card) => {
            if selection.is_flipped() {
                draw_card_back(frame, app, &selection, card, chunks[1]);
            } else {
                draw_card_front(frame, app, &selection, card, chunks[1]);
            }
            draw_image_link(frame, app, chunks[2]);
        }
        None => {
            draw_loading(frame, app, chunks[1]);
            app.image_btn = Rect::default();
        }
    }

    draw_shuffle_button(frame, app, &selection, chunks[3]);
    draw_status_line(frame, app, chunks[4]);

    if app.show_help {
        draw_help_overlay(frame, app);
    }
}

fn draw_header(frame: &mut Frame, selection: &Selection, area: Rect) {
    let colors = selection.colors();
    let title = Line::from(vec![
        Span::styled(
            "Grow & Go",
            Style::default()
                .fg(colors.from_color())
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw("  |  "),
        Span::styled(
            Local::now().format("%A, %B %-d").to_string(),
            Style::default().fg(colors.to_color()),
        ),
    ]);
    let header = Paragraph::new(title)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(colors.from_color()))
                .title(
                    Title::from(" ? for help ")
                        .position(Position::Bottom)
                        .alignment(Alignment::Right),
                ),
        )
        .alignment(Alignment::Center);
    frame.render_widget(header, area);
}

fn draw_loading(frame: &mut Frame, app: &mut App, area: Rect) {
    let msg = Paragraph::new("Loading journal prompts...")
        .block(Block::default().borders(Borders::ALL))
        .alignment(Alignment::Center)
        .style(Style::default().fg(Color::Gray));
    app.card_area = Rect::default();
    app.expand_btn = Rect::default();
    app.more_actions_btn = Rect::default();
    frame.render_widget(msg, area);
}

fn card_block(selection: &Selection) -> Block<'static> {
    let colors = selection.colors();
    Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(colors.from_color()))
}

fn draw_card_front(frame: &mut Frame, app: &mut App, selection: &Selection, card: &Record, area: Rect) {
    let block = card_block(selection).title(
        Title::from(Span::styled(
            " Space to flip ",
            Style::default().fg(Color::DarkGray).italic(),
        ))
        .position(Position::Bottom)
        .alignment(Alignment::Right),
    );
    let inner = block.inner(area);

    // Vertically center the concept.
    let pad = inner.height.saturating_sub(1) / 2;
    let mut lines: Vec<Line> = (0..pad).map(|_| Line::from("")).collect();
    lines.push(Line::from(Span::styled(
        card.concept().to_string(),
        Style::default()
            .fg(selection.colors().to_color())
            .add_modifier(Modifier::BOLD),
    )));

    let front = Paragraph::new(lines)
        .block(block)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });

    app.card_area = area;
    app.expand_btn = Rect::default();
    app.more_actions_btn = Rect::default();
    frame.render_widget(front, area);
}

fn draw_card_back(frame: &mut Frame, app: &mut App, selection: &Selection, card: &Record, area: Rect) {
    let block = card_block(selection).title(Span::styled(
        format!(" {} ", card.concept()),
        Style::default()
            .fg(selection.colors().to_color())
            .add_modifier(Modifier::BOLD),
    ));
    let inner = block.inner(area);
    app.card_area = area;
    frame.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(2),
            Constraint::Length(3),
            Constraint::Length(1),
            Constraint::Min(3),
            Constraint::Length(3),
            Constraint::Length(1),
        ])
        .split(inner);

    let heading = Style::default().fg(Color::Gray).add_modifier(Modifier::BOLD);
    let enhancements = selection.enhancements();

    frame.render_widget(Paragraph::new("Journal Prompt:").style(heading), chunks[0]);

    let prompt = Paragraph::new(selection.displayed_prompt().unwrap_or_default().to_string())
        .style(Style::default().fg(Color::White).italic())
        .wrap(Wrap { trim: true });
    frame.render_widget(prompt, chunks[1]);

    let (expand_text, expand_color) = if enhancements.expanding {
        ("Expanding...", Color::DarkGray)
    } else {
        ("✨ Expand Prompt (e)", Color::Magenta)
    };
    render_button(frame, expand_text, button_area(chunks[2]), expand_color);
    app.expand_btn = button_area(chunks[2]);

    frame.render_widget(Paragraph::new("Suggested Actions:").style(heading), chunks[3]);

    let mut actions: Vec<Line> = card
        .actions()
        .into_iter()
        .map(|action| Line::from(format!("• {action}")))
        .collect();
    actions.extend(enhancements.extra_actions.iter().map(|action| {
        Line::from(Span::styled(
            format!("• {action}"),
            Style::default().fg(Color::Green).italic(),
        ))
    }));
    let action_list = Paragraph::new(actions).wrap(Wrap { trim: true });
    frame.render_widget(action_list, chunks[4]);

    let (more_text, more_color) = if enhancements.generating {
        ("Generating...", Color::DarkGray)
    } else {
        ("✨ More Actions (m)", Color::Green)
    };
    render_button(frame, more_text, button_area(chunks[5]), more_color);
    app.more_actions_btn = button_area(chunks[5]);

    let hint = Paragraph::new("Click to flip back")
        .alignment(Alignment::Right)
        .style(Style::default().fg(Color::DarkGray).italic());
    frame.render_widget(hint, chunks[6]);
}

// Buttons take the left part of their row so they read as buttons.
fn button_area(row: Rect) -> Rect {
    Rect {
        width: row.width.min(28),
        ..row
    }
}

fn render_button(frame: &mut Frame, text: &str, area: Rect, color: Color) {
    let btn = Paragraph::new(text)
        .block(Block::default().borders(Borders::ALL))
        .alignment(Alignment::Center)
        .style(Style::default().fg(color));
    frame.render_widget(btn, area);
}

fn draw_image_link(frame: &mut Frame, app: &mut App, area: Rect) {
    let text = match app.image_url() {
        Some(url) => format!("Image (o to open): {url}"),
        None => "Image unavailable".to_string(),
    };
    let link = Paragraph::new(text)
        .block(Block::default().borders(Borders::ALL))
        .style(Style::default().fg(Color::Rgb(0x7e, 0x3a, 0xed)));
    app.image_btn = area;
    frame.render_widget(link, area);
}

fn draw_shuffle_button(frame: &mut Frame, app: &mut App, selection: &Selection, area: Rect) {
    let btn = Paragraph::new("Let's play with another idea")
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded),
        )
        .alignment(Alignment::Center)
        .style(
            Style::default()
                .fg(selection.colors().to_color())
                .add_modifier(Modifier::BOLD),
        );
    app.shuffle_btn = area;
    frame.render_widget(btn, area);
}

fn draw_status_line(frame: &mut Frame, app: &App, area: Rect) {
    let text = match &app.status_message {
        Some(msg) => Span::styled(msg.clone(), Style::default().fg(Color::Yellow)),
        None => Span::styled(
            "Space flip  n next  e expand  m more  o image  ? help  q quit",
            Style::default().fg(Color::DarkGray),
        ),
    };
    frame.render_widget(Paragraph::new(Line::from(text)), area);
}

fn draw_help_overlay(frame: &mut Frame, app: &App) {
    let size = frame.size();
    let width = size.width.saturating_mul(3) / 4;
    let height = size.height.saturating_mul(3) / 4;
    let x = size.x + (size.width.saturating_sub(width)) / 2;
    let y = size.y + (size.height.saturating_sub(height)) / 2;
    let area = Rect { x, y, width, height };

    frame.render_widget(Clear, area);

    let mut lines: Vec<Line> = Vec::new();
    for topic in HELP_TOPICS {
        lines.push(Line::from(Span::styled(
            topic.title,
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        )));
        lines.push(Line::from(topic.detail));
        lines.push(Line::from(""));
    }

    let help = Paragraph::new(lines)
        .block(
            Block::default()
                .title("Quick Help (Esc to close, ↑↓ to scroll)")
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded),
        )
        .wrap(Wrap { trim: false })
        .scroll((app.help_scroll, 0))
        .style(Style::default().fg(Color::White));
    frame.render_widget(help, area);
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use ratatui::{Terminal, backend::TestBackend};
    use tokio::runtime::Handle;

    use super::*;
    use crate::enhance::DelayedStub;
    use crate::source::DataSource;

    fn screen(terminal: &Terminal<TestBackend>) -> String {
        let buffer = terminal.backend().buffer();
        let width = buffer.area.width as usize;
        buffer
            .content
            .chunks(width)
            .map(|row| row.iter().map(|cell| cell.symbol()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn app() -> App {
        App::new(
            Arc::new(DelayedStub::new(Duration::ZERO)),
            Handle::current(),
            Some(4),
        )
    }

    #[tokio::test]
    async fn shows_loading_until_cards_arrive() {
        let mut app = app();
        let mut terminal = Terminal::new(TestBackend::new(100, 30)).unwrap();
        terminal.draw(|f| draw(f, &mut app)).unwrap();
        let text = screen(&terminal);
        assert!(text.contains("Loading journal prompts..."));
        assert!(text.contains("Let's play with another idea"));
        assert_eq!(app.card_area, Rect::default());
    }

    #[tokio::test]
    async fn front_shows_concept_and_back_shows_prompt() {
        let mut app = app();
        app.start_loading(DataSource::Bundled);
        assert!(app.process_next_event().await);
        let concept = app
            .selection()
            .card()
            .map(|c| c.concept().to_string())
            .unwrap_or_default();

        let mut terminal = Terminal::new(TestBackend::new(120, 40)).unwrap();
        terminal.draw(|f| draw(f, &mut app)).unwrap();
        let front = screen(&terminal);
        assert!(front.contains(&concept));
        assert!(!front.contains("Journal Prompt:"));
        assert!(app.card_area.height > 0);
        assert_eq!(app.expand_btn, Rect::default());

        app.flip();
        terminal.draw(|f| draw(f, &mut app)).unwrap();
        let back = screen(&terminal);
        assert!(back.contains("Journal Prompt:"));
        assert!(back.contains("Suggested Actions:"));
        assert!(back.contains("Click to flip back"));
        assert!(app.expand_btn.height > 0);
        assert!(app.more_actions_btn.height > 0);
    }

    #[tokio::test]
    async fn help_overlay_lists_topics() {
        let mut app = app();
        app.show_help = true;
        let mut terminal = Terminal::new(TestBackend::new(100, 40)).unwrap();
        terminal.draw(|f| draw(f, &mut app)).unwrap();
        assert!(screen(&terminal).contains("Quick Help"));
    }
}
