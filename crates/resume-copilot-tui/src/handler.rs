use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseEvent, MouseEventKind};
use ratatui::layout::Rect;
use crate::app::{App, FocusPane, InputMode};
use crate::tui::AppEvent;

pub fn handle_event(app: &mut App, event: AppEvent) {
    match event {
        AppEvent::Key(key) => handle_key(app, key),
        AppEvent::Mouse(mouse) => handle_mouse(app, mouse),
        AppEvent::Resize => app.follow_after_resize(),
        AppEvent::Tick => app.tick_animation(),
        AppEvent::Answer(result) => app.on_answer(result),
    }
}

fn handle_key(app: &mut App, key: KeyEvent) {
    // Global keys that work in any mode
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        app.should_quit = true;
        return;
    }

    match app.input_mode {
        InputMode::Normal => handle_normal_mode(app, key),
        InputMode::Editing => handle_editing_mode(app, key),
    }
}

fn handle_normal_mode(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('q') => app.should_quit = true,
        KeyCode::Tab => app.focus = app.focus.next(),
        KeyCode::Char('i') => {
            app.focus = FocusPane::Composer;
            app.input_mode = InputMode::Editing;
        }
        KeyCode::Char('r') => app.reset_conversation(),
        KeyCode::PageDown => app.scroll_chat_down(app.chat_page()),
        KeyCode::PageUp => app.scroll_chat_up(app.chat_page()),
        KeyCode::Char('j') | KeyCode::Down => match app.focus {
            FocusPane::Prompts => app.prompt_nav_down(),
            FocusPane::Chat => app.scroll_chat_down(1),
            FocusPane::Composer => {}
        },
        KeyCode::Char('k') | KeyCode::Up => match app.focus {
            FocusPane::Prompts => app.prompt_nav_up(),
            FocusPane::Chat => app.scroll_chat_up(1),
            FocusPane::Composer => {}
        },
        KeyCode::Char('G') | KeyCode::End if app.focus == FocusPane::Chat => {
            app.scroll_chat_to_bottom();
        }
        KeyCode::Enter => match app.focus {
            FocusPane::Prompts => app.submit_selected_prompt(),
            FocusPane::Composer => app.input_mode = InputMode::Editing,
            FocusPane::Chat => {}
        },
        _ => {}
    }
}

fn handle_editing_mode(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => {
            app.input_mode = InputMode::Normal;
        }
        KeyCode::Enter
            if key.modifiers.intersects(KeyModifiers::SHIFT | KeyModifiers::ALT) =>
        {
            app.insert_char('\n');
        }
        KeyCode::Enter => app.submit_draft(),
        KeyCode::Backspace => app.backspace(),
        KeyCode::Delete => app.delete(),
        KeyCode::Left => app.cursor_left(),
        KeyCode::Right => app.cursor_right(),
        KeyCode::Home => app.cursor_home(),
        KeyCode::End => app.cursor_end(),
        KeyCode::Tab => {
            app.input_mode = InputMode::Normal;
            app.focus = app.focus.next();
        }
        KeyCode::Char(c) => app.insert_char(c),
        _ => {}
    }
}

/// Check if a point is within a rectangle
fn point_in_rect(x: u16, y: u16, rect: Rect) -> bool {
    x >= rect.x && x < rect.x + rect.width && y >= rect.y && y < rect.y + rect.height
}

fn handle_mouse(app: &mut App, mouse: MouseEvent) {
    let x = mouse.column;
    let y = mouse.row;

    let in_chat = app.chat_area.map(|r| point_in_rect(x, y, r)).unwrap_or(false);
    let in_prompts = app.prompts_area.map(|r| point_in_rect(x, y, r)).unwrap_or(false);

    match mouse.kind {
        MouseEventKind::ScrollDown => {
            if in_chat {
                app.scroll_chat_down(3);
            } else if in_prompts {
                app.prompt_nav_down();
            }
        }
        MouseEventKind::ScrollUp => {
            if in_chat {
                app.scroll_chat_up(3);
            } else if in_prompts {
                app.prompt_nav_up();
            }
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use crossterm::event::KeyEventKind;
    use resume_copilot_core::conversation::FALLBACK_REPLY;
    use resume_copilot_core::{AskError, ChatResponse, ResumeQuery};
    use std::sync::Arc;
    use tokio::sync::mpsc;

    struct DownBackend;

    #[async_trait]
    impl ResumeQuery for DownBackend {
        async fn ask(&self, _question: &str) -> Result<ChatResponse, AskError> {
            Err(AskError::from_body("backend offline"))
        }
    }

    fn press(app: &mut App, code: KeyCode) {
        press_with(app, code, KeyModifiers::NONE);
    }

    fn press_with(app: &mut App, code: KeyCode, modifiers: KeyModifiers) {
        let mut key = KeyEvent::new(code, modifiers);
        key.kind = KeyEventKind::Press;
        handle_event(app, AppEvent::Key(key));
    }

    fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            press(app, KeyCode::Char(c));
        }
    }

    fn test_app() -> (App, mpsc::UnboundedReceiver<AppEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let app = App::new(Arc::new(DownBackend), "http://localhost:8000".to_string(), tx);
        (app, rx)
    }

    #[tokio::test]
    async fn test_enter_with_one_char_does_nothing() {
        let (mut app, _rx) = test_app();
        type_text(&mut app, " a ");
        press(&mut app, KeyCode::Enter);

        assert!(!app.conversation.is_busy());
        assert_eq!(app.conversation.messages().len(), 1);
        assert_eq!(app.conversation.draft(), " a ");
    }

    #[tokio::test]
    async fn test_failed_answer_shows_error_and_fallback() {
        let (mut app, mut rx) = test_app();
        type_text(&mut app, "hi");
        press(&mut app, KeyCode::Enter);
        assert!(app.conversation.is_busy());

        // Typing while busy still edits the draft, but Enter is gated
        type_text(&mut app, "next one");
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.conversation.messages().len(), 2);

        let event = rx.recv().await.expect("answer event");
        handle_event(&mut app, event);

        let messages = app.conversation.messages();
        assert_eq!(messages.len(), 3);
        assert_eq!(messages[2].content, FALLBACK_REPLY);
        assert_eq!(app.conversation.last_error(), Some("backend offline"));
        assert_eq!(app.conversation.draft(), "next one");
    }

    #[tokio::test]
    async fn test_shift_enter_inserts_newline() {
        let (mut app, _rx) = test_app();
        type_text(&mut app, "ab");
        press_with(&mut app, KeyCode::Enter, KeyModifiers::SHIFT);
        type_text(&mut app, "cd");

        assert_eq!(app.conversation.draft(), "ab\ncd");
        assert!(!app.conversation.is_busy());
    }

    #[tokio::test]
    async fn test_normal_mode_keys() {
        let (mut app, _rx) = test_app();
        press(&mut app, KeyCode::Esc);
        assert_eq!(app.input_mode, InputMode::Normal);

        press(&mut app, KeyCode::Tab);
        assert_eq!(app.focus, FocusPane::Prompts);
        press(&mut app, KeyCode::Char('j'));
        assert_eq!(app.prompt_state.selected(), Some(1));

        press(&mut app, KeyCode::Enter);
        assert!(app.conversation.is_busy());

        // Reset is refused while the prompt is in flight
        press(&mut app, KeyCode::Char('r'));
        assert_eq!(app.conversation.messages().len(), 2);

        press(&mut app, KeyCode::Char('q'));
        assert!(app.should_quit);
    }

    #[tokio::test]
    async fn test_reset_after_answer() {
        let (mut app, mut rx) = test_app();
        type_text(&mut app, "projects?");
        press(&mut app, KeyCode::Enter);
        let event = rx.recv().await.expect("answer event");
        handle_event(&mut app, event);

        press(&mut app, KeyCode::Esc);
        press(&mut app, KeyCode::Char('r'));
        assert_eq!(app.conversation.messages().len(), 1);
        assert!(app.conversation.last_error().is_none());
    }

    #[tokio::test]
    async fn test_resize_waits_for_new_viewport() {
        let (mut app, _rx) = test_app();
        app.set_chat_viewport(4, 20);
        app.scroll_chat_up(100);

        handle_event(&mut app, AppEvent::Resize);
        assert_eq!(app.chat_scroll, 0);

        app.set_chat_viewport(4, 20);
        assert_eq!(app.chat_scroll, 4);
    }

    #[tokio::test]
    async fn test_ctrl_c_quits_while_editing() {
        let (mut app, _rx) = test_app();
        press_with(&mut app, KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert!(app.should_quit);
        assert_eq!(app.conversation.draft(), "");
    }
}
