use chrono::{Datelike, Local};
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Color, Modifier, Style, Stylize},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Paragraph},
};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::app::ChatViewport;
use crate::conversation::ConversationView;
use crate::message::Message;

const TITLE: &str = "RAG Chatbot";
const BADGE: &str = "Powered by LlamaIndex";
const PLACEHOLDER: &str = "Ask a question...";

/// Split a word into pieces no wider than `width` display columns.
/// A single char wider than `width` still gets a piece of its own.
fn split_by_width(word: &str, width: usize) -> Vec<String> {
    let mut pieces = Vec::new();
    let mut current = String::new();
    let mut current_width = 0;

    for c in word.chars() {
        let w = c.width().unwrap_or(0);
        if current_width + w > width && !current.is_empty() {
            pieces.push(std::mem::take(&mut current));
            current_width = 0;
        }
        current.push(c);
        current_width += w;
    }
    if !current.is_empty() {
        pieces.push(current);
    }

    pieces
}

/// Wrap text to fit within a given number of display columns.
/// Breaks on word boundaries; a word wider than `width` is split.
fn wrap_text_to_width(text: &str, width: usize) -> Vec<String> {
    if width == 0 {
        return vec![text.to_string()];
    }

    let mut lines = Vec::new();
    let mut current_line = String::new();
    let mut current_width = 0;

    for word in text.split_whitespace() {
        for piece in split_by_width(word, width) {
            let piece_width = piece.width();

            if current_width == 0 {
                current_line = piece;
                current_width = piece_width;
            } else if current_width + 1 + piece_width <= width {
                current_line.push(' ');
                current_line.push_str(&piece);
                current_width += 1 + piece_width;
            } else {
                lines.push(std::mem::take(&mut current_line));
                current_line = piece;
                current_width = piece_width;
            }
        }
    }

    if !current_line.is_empty() {
        lines.push(current_line);
    }

    if lines.is_empty() {
        lines.push(String::new());
    }

    lines
}

/// Lines for one message bubble: author label, padded body, blank spacer.
///
/// Only `is_user()` decides the look: user bubbles sit on the right in blue,
/// everything else on the left in gray.
pub fn message_lines(message: &Message, width: u16) -> Vec<Line<'static>> {
    let is_user = message.is_user();
    let (alignment, bubble_style, label_style) = if is_user {
        (
            Alignment::Right,
            Style::default().bg(Color::Blue).fg(Color::White),
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        )
    } else {
        (
            Alignment::Left,
            Style::default().bg(Color::Gray).fg(Color::Black),
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        )
    };

    // Bubbles take at most 80% of the row, minus one column of padding per side
    let max_bubble = (usize::from(width) * 4 / 5).max(4);
    let text_width = max_bubble - 2;

    let body: Vec<String> = message
        .content()
        .lines()
        .flat_map(|line| wrap_text_to_width(line, text_width))
        .collect();
    let body = if body.is_empty() { vec![String::new()] } else { body };
    let inner = body.iter().map(|l| l.width()).max().unwrap_or(0);

    let time = message.timestamp().with_timezone(&Local).format("%H:%M");
    let mut lines = Vec::with_capacity(body.len() + 2);
    lines.push(
        Line::from(vec![
            Span::styled(message.role().display_name(), label_style),
            Span::styled(format!(" {}", time), Style::default().fg(Color::DarkGray)),
        ])
        .alignment(alignment),
    );
    for text in body {
        let pad = " ".repeat(inner - text.width());
        lines.push(
            Line::from(Span::styled(format!(" {}{} ", text, pad), bubble_style))
                .alignment(alignment),
        );
    }
    lines.push(Line::default());

    lines
}

fn thinking_lines(frame: u8) -> Vec<Line<'static>> {
    // Animated ellipsis: cycles through ".", "..", "..."
    let dots = ".".repeat(usize::from(frame) + 1);
    vec![
        Line::from(Span::styled(
            "Assistant",
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            format!("Thinking{}", dots),
            Style::default().fg(Color::DarkGray).add_modifier(Modifier::ITALIC),
        )),
    ]
}

/// Slice of the input that fits in `inner_width` columns, and the cursor
/// column within it. Scrolls horizontally to keep the cursor visible.
fn visible_input(input: &str, cursor: usize, inner_width: usize) -> (String, u16) {
    if inner_width == 0 {
        return (String::new(), 0);
    }

    let chars: Vec<char> = input.chars().collect();
    let cursor = cursor.min(chars.len());
    let width_of = |cs: &[char]| cs.iter().map(|c| c.width().unwrap_or(0)).sum::<usize>();

    // Leave one column for the cursor itself
    let mut start = 0;
    while start < cursor && width_of(&chars[start..cursor]) >= inner_width {
        start += 1;
    }

    let mut visible = String::new();
    let mut used = 0;
    for &c in &chars[start..] {
        let w = c.width().unwrap_or(0);
        if used + w > inner_width {
            break;
        }
        visible.push(c);
        used += w;
    }

    let cursor_x = u16::try_from(width_of(&chars[start..cursor])).unwrap_or(u16::MAX);
    (visible, cursor_x)
}

/// Draw the whole screen from a conversation snapshot. Only the chat
/// viewport is written back.
pub fn render(
    frame: &mut Frame,
    view: &ConversationView,
    viewport: &mut ChatViewport,
    animation_frame: u8,
) {
    let area = frame.area();

    // Main layout: header, conversation, input, footer
    let [header_area, chat_area, input_area, footer_area] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Min(0),
        Constraint::Length(3),
        Constraint::Length(2),
    ])
    .areas(area);

    render_header(frame, header_area);
    render_chat(frame, chat_area, view, viewport, animation_frame);
    render_input(frame, input_area, view);
    render_footer(frame, footer_area, view);
}

fn render_header(frame: &mut Frame, area: Rect) {
    let header_style = Style::default().bg(Color::Blue).fg(Color::White);
    let badge_text = format!(" {} ", BADGE);
    let badge_width = u16::try_from(badge_text.width()).unwrap_or(0);

    let [title_area, badge_area] =
        Layout::horizontal([Constraint::Min(0), Constraint::Length(badge_width)]).areas(area);

    let title = Paragraph::new(Line::from(Span::raw(format!(" {}", TITLE)).bold()))
        .style(header_style);
    frame.render_widget(title, title_area);

    let badge = Paragraph::new(Line::from(Span::styled(
        badge_text,
        Style::default().bg(Color::LightBlue).fg(Color::Black),
    )));
    frame.render_widget(badge, badge_area);
}

fn render_chat(
    frame: &mut Frame,
    area: Rect,
    view: &ConversationView,
    viewport: &mut ChatViewport,
    animation_frame: u8,
) {
    // Store area for mouse hit-testing and inner size for scroll calculations
    viewport.area = Some(area);
    viewport.height = area.height.saturating_sub(2);
    viewport.width = area.width.saturating_sub(2);

    let mut lines: Vec<Line> = view
        .messages
        .iter()
        .flat_map(|msg| message_lines(msg, viewport.width))
        .collect();
    if view.pending {
        lines.extend(thinking_lines(animation_frame));
    }

    viewport.total_lines = u16::try_from(lines.len()).unwrap_or(u16::MAX);
    viewport.scroll = if viewport.follow_bottom {
        viewport.max_scroll()
    } else {
        viewport.scroll.min(viewport.max_scroll())
    };

    let chat_block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray));

    let chat = Paragraph::new(Text::from(lines))
        .block(chat_block)
        .scroll((viewport.scroll, 0));

    frame.render_widget(chat, area);
}

fn render_input(frame: &mut Frame, area: Rect, view: &ConversationView) {
    let (title, border_color) = if view.pending {
        (" Waiting for reply... ", Color::DarkGray)
    } else {
        (" Ask (Enter to send) ", Color::Yellow)
    };

    let input_block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color))
        .title(title);

    // Inner width = total width - 2 (for borders)
    let inner_width = usize::from(area.width.saturating_sub(2));
    let (visible_text, cursor_x) = visible_input(&view.input, view.cursor, inner_width);

    let input = if view.input.is_empty() {
        Paragraph::new(Span::styled(PLACEHOLDER, Style::default().fg(Color::DarkGray)))
    } else {
        Paragraph::new(visible_text).style(Style::default().fg(Color::Cyan))
    };

    frame.render_widget(input.block(input_block), area);

    // The cursor is hidden while the input is disabled
    if !view.pending {
        frame.set_cursor_position((area.x + cursor_x + 1, area.y + 1));
    }
}

fn render_footer(frame: &mut Frame, area: Rect, view: &ConversationView) {
    let [credit_area, hints_area] =
        Layout::vertical([Constraint::Length(1), Constraint::Length(1)]).areas(area);

    let credit = Paragraph::new(format!(
        "© {} RAG Chatbot Demo | Connected to FastAPI backend",
        Local::now().year()
    ))
    .style(Style::default().fg(Color::DarkGray))
    .alignment(Alignment::Center);
    frame.render_widget(credit, credit_area);

    // Key style: dark background with bright text for visibility on both light/dark terminals
    let key_style = Style::default().bg(Color::DarkGray).fg(Color::White);
    let label_style = Style::default().bg(Color::Black).fg(Color::White);

    let mut hints = if view.pending {
        vec![Span::styled(" waiting ", label_style)]
    } else {
        vec![
            Span::styled(" Enter ", key_style),
            Span::styled(" send ", label_style),
        ]
    };
    hints.extend(vec![
        Span::styled(" ↑/↓ PgUp/PgDn ", key_style),
        Span::styled(" scroll ", label_style),
        Span::styled(" Esc ", key_style),
        Span::styled(" quit ", label_style),
    ]);

    let footer = Paragraph::new(Line::from(hints)).style(Style::default().bg(Color::Black));
    frame.render_widget(footer, hints_area);
}
