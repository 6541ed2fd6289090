use ratatui::layout::Rect;
use tokio::sync::{mpsc, watch};

use crate::client::QueryClient;
use crate::conversation::{Conversation, ConversationView};
use crate::tui::AppEvent;

/// Scroll and layout state of the chat pane. This is the only thing the
/// renderer writes to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatViewport {
    pub scroll: u16,
    pub follow_bottom: bool,
    pub height: u16,      // Inner height of the chat area, set during render
    pub width: u16,       // Inner width of the chat area, set during render
    pub total_lines: u16,
    // Panel area for mouse hit-testing (updated during render)
    pub area: Option<Rect>,
}

impl Default for ChatViewport {
    fn default() -> Self {
        Self {
            scroll: 0,
            follow_bottom: true,
            height: 0,
            width: 0,
            total_lines: 0,
            area: None,
        }
    }
}

impl ChatViewport {
    pub fn max_scroll(&self) -> u16 {
        self.total_lines.saturating_sub(self.height)
    }

    pub fn scroll_up(&mut self, lines: u16) {
        self.scroll = self.scroll.min(self.max_scroll()).saturating_sub(lines);
        self.follow_bottom = false;
    }

    pub fn scroll_down(&mut self, lines: u16) {
        let max = self.max_scroll();
        self.scroll = self.scroll.saturating_add(lines).min(max);
        if self.scroll == max {
            self.follow_bottom = true;
        }
    }

    pub fn page_up(&mut self) {
        self.scroll_up(self.height.saturating_sub(1).max(1));
    }

    pub fn page_down(&mut self) {
        self.scroll_down(self.height.saturating_sub(1).max(1));
    }
}

pub struct App {
    // Core state
    pub should_quit: bool,
    pub conversation: Conversation,
    pub view: watch::Receiver<ConversationView>,

    pub viewport: ChatViewport,
    seen_messages: usize,

    // Animation state
    pub animation_frame: u8, // 0-2 for ellipsis animation

    client: QueryClient,
    events: mpsc::UnboundedSender<AppEvent>,
}

impl App {
    pub fn new(client: QueryClient, events: mpsc::UnboundedSender<AppEvent>) -> Self {
        let conversation = Conversation::new();
        let view = conversation.subscribe();
        let seen_messages = conversation.messages().len();

        Self {
            should_quit: false,
            conversation,
            view,
            viewport: ChatViewport::default(),
            seen_messages,
            animation_frame: 0,
            client,
            events,
        }
    }

    /// Submit the current input and spawn the query in the background.
    ///
    /// The result comes back as [`AppEvent::QueryFinished`]. Quitting
    /// abandons the task.
    pub fn submit_query(&mut self) {
        let Some(query) = self.conversation.submit() else {
            return;
        };

        let client = self.client.clone();
        let events = self.events.clone();
        tokio::spawn(async move {
            let result = client.send_query(&query).await;
            let _ = events.send(AppEvent::QueryFinished(result));
        });
    }

    /// Pick up controller updates before drawing. New messages snap the
    /// chat back to the bottom.
    pub fn sync_view(&mut self) {
        if !self.view.has_changed().unwrap_or(false) {
            return;
        }
        let len = self.view.borrow_and_update().messages.len();
        if len != self.seen_messages {
            self.seen_messages = len;
            self.viewport.follow_bottom = true;
        }
    }

    /// Tick animation frame (called by Tick event)
    pub fn tick_animation(&mut self) {
        if self.view.borrow().pending {
            self.animation_frame = (self.animation_frame + 1) % 3;
        } else {
            self.animation_frame = 0;
        }
    }
}
