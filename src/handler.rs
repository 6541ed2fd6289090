use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseEvent, MouseEventKind};
use ratatui::layout::Rect;
use crate::app::App;
use crate::tui::AppEvent;

const MOUSE_SCROLL_LINES: u16 = 3;

pub fn handle_event(app: &mut App, event: AppEvent) {
    match event {
        AppEvent::Key(key) => handle_key(app, key),
        AppEvent::Mouse(mouse) => handle_mouse(app, mouse),
        AppEvent::Resize(_, _) => {}
        AppEvent::Tick => {
            app.tick_animation();
        }
        AppEvent::QueryFinished(result) => {
            app.conversation.resolve(result);
        }
    }
}

fn handle_key(app: &mut App, key: KeyEvent) {
    // Global keys that work in any state
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        app.should_quit = true;
        return;
    }

    match key.code {
        KeyCode::Esc => app.should_quit = true,
        KeyCode::Enter => app.submit_query(),

        // Conversation scrolling
        KeyCode::Up => app.viewport.scroll_up(1),
        KeyCode::Down => app.viewport.scroll_down(1),
        KeyCode::PageUp => app.viewport.page_up(),
        KeyCode::PageDown => app.viewport.page_down(),

        // Input editing; the controller ignores these while a reply is pending
        KeyCode::Backspace => app.conversation.backspace(),
        KeyCode::Delete => app.conversation.delete(),
        KeyCode::Left => app.conversation.move_left(),
        KeyCode::Right => app.conversation.move_right(),
        KeyCode::Home => app.conversation.move_home(),
        KeyCode::End => app.conversation.move_end(),
        // Ctrl/Alt chords are not text
        KeyCode::Char(c) if (key.modifiers - KeyModifiers::SHIFT).is_empty() => {
            app.conversation.insert_char(c)
        }
        _ => {}
    }
}

/// Check if a point is within a rectangle
fn point_in_rect(x: u16, y: u16, rect: Rect) -> bool {
    x >= rect.x && x < rect.x + rect.width && y >= rect.y && y < rect.y + rect.height
}

fn handle_mouse(app: &mut App, mouse: MouseEvent) {
    let in_chat = app
        .viewport
        .area
        .map(|r| point_in_rect(mouse.column, mouse.row, r))
        .unwrap_or(false);
    if !in_chat {
        return;
    }

    match mouse.kind {
        MouseEventKind::ScrollDown => app.viewport.scroll_down(MOUSE_SCROLL_LINES),
        MouseEventKind::ScrollUp => app.viewport.scroll_up(MOUSE_SCROLL_LINES),
        _ => {}
    }
}
