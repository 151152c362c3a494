//! Transcript area
//!
//! Displays the message transcript, anchored to the newest entry.

use dropwire_app::render::{RenderedBody, RenderedMessage};
use dropwire_app::{App, Entry};
use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem},
};

const BORDER_SIZE: u16 = 2;

/// Render the transcript area.
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default().borders(Borders::ALL).title(" dropwire ");

    let items: Vec<ListItem> = if app.transcript().is_empty() {
        vec![ListItem::new(Line::from(Span::styled(
            "No messages yet",
            Style::default().fg(Color::DarkGray),
        )))]
    } else {
        app.transcript().iter().map(entry_item).collect()
    };

    let visible_height = area.height.saturating_sub(BORDER_SIZE) as usize;
    let skip = items.len().saturating_sub(visible_height);
    let visible_items: Vec<_> = items.into_iter().skip(skip).collect();

    let list = List::new(visible_items).block(block);

    frame.render_widget(list, area);
}

fn entry_item(entry: &Entry) -> ListItem<'static> {
    match entry {
        Entry::Message(message) => message_item(message),
        Entry::Notice { text, .. } => ListItem::new(Line::from(Span::styled(
            text.clone(),
            Style::default().fg(Color::DarkGray).add_modifier(Modifier::ITALIC),
        ))),
    }
}

fn message_item(message: &RenderedMessage) -> ListItem<'static> {
    let sender_color = if message.is_self { Color::Cyan } else { Color::Green };

    let mut spans = vec![
        Span::styled(
            message.sender.clone(),
            Style::default().fg(sender_color).add_modifier(Modifier::BOLD),
        ),
        Span::raw(" "),
    ];

    match &message.body {
        RenderedBody::Text { content } => {
            spans.push(Span::raw(content.clone()));
        },
        RenderedBody::File { filename, ext_tag, .. } => {
            spans.push(Span::styled(
                format!("[{ext_tag}]"),
                Style::default().fg(Color::Magenta).add_modifier(Modifier::BOLD),
            ));
            spans.push(Span::raw(" "));
            spans.push(Span::raw(filename.clone()));
        },
    }

    if !message.timestamp.is_empty() {
        spans.push(Span::raw(" "));
        spans.push(Span::styled(
            message.timestamp.clone(),
            Style::default().fg(Color::DarkGray),
        ));
    }

    ListItem::new(Line::from(spans))
}
