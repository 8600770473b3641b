use std::sync::Arc;

use log::{debug, info};
use ratatui::layout::Rect;
use ratatui::widgets::ListState;
use resume_copilot_core::{AskError, ChatResponse, Conversation, ResumeQuery, STARTER_PROMPTS};

use crate::tui::{AppEvent, EventSender};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    Editing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusPane {
    Prompts,
    Chat,
    Composer,
}

impl FocusPane {
    pub fn next(self) -> Self {
        match self {
            FocusPane::Prompts => FocusPane::Chat,
            FocusPane::Chat => FocusPane::Composer,
            FocusPane::Composer => FocusPane::Prompts,
        }
    }
}

/// Convert a character index to a byte index for UTF-8 safe string operations
fn char_to_byte_index(s: &str, char_idx: usize) -> usize {
    s.char_indices()
        .nth(char_idx)
        .map(|(i, _)| i)
        .unwrap_or(s.len())
}

pub struct App {
    pub should_quit: bool,
    pub input_mode: InputMode,
    pub focus: FocusPane,

    pub conversation: Conversation,
    pub cursor: usize, // cursor position in the draft, in chars

    // Chat log viewport
    pub chat_scroll: u16,
    pub chat_height: u16, // inner height of the log, set during render
    pub chat_width: u16,  // inner width of the log, set during render
    pending_follow: bool, // scroll to bottom once the next viewport size is known

    pub prompt_state: ListState,

    // Animation state
    pub animation_frame: u8, // 0-2 for the typing dots

    // Panel areas for mouse hit-testing (updated during render)
    pub chat_area: Option<Rect>,
    pub prompts_area: Option<Rect>,

    pub api_base_url: String,
    client: Arc<dyn ResumeQuery>,
    events: EventSender,
}

impl App {
    pub fn new(client: Arc<dyn ResumeQuery>, api_base_url: String, events: EventSender) -> Self {
        let mut prompt_state = ListState::default();
        prompt_state.select(Some(0));

        Self {
            should_quit: false,
            input_mode: InputMode::Editing,
            focus: FocusPane::Composer,

            conversation: Conversation::new(),
            cursor: 0,

            chat_scroll: 0,
            chat_height: 0,
            chat_width: 0,
            pending_follow: false,

            prompt_state,
            animation_frame: 0,

            chat_area: None,
            prompts_area: None,

            api_base_url,
            client,
            events,
        }
    }

    /// Send the composer draft if it is a question and nothing is in flight
    pub fn submit_draft(&mut self) {
        if !self.conversation.can_submit() {
            return;
        }
        let draft = self.conversation.draft().to_string();
        self.dispatch(&draft);
    }

    /// Send the highlighted starter prompt
    pub fn submit_selected_prompt(&mut self) {
        let prompt = self
            .prompt_state
            .selected()
            .and_then(|i| STARTER_PROMPTS.get(i).copied());
        if let Some(prompt) = prompt {
            self.dispatch(prompt);
        }
    }

    fn dispatch(&mut self, text: &str) {
        let Some(question) = self.conversation.begin_submit(text) else {
            return;
        };
        self.cursor = 0;
        self.animation_frame = 0;
        self.scroll_chat_to_bottom();

        info!("Asking resume backend ({} chars)", question.chars().count());
        let client = Arc::clone(&self.client);
        let events = self.events.clone();
        tokio::spawn(async move {
            let result = client.ask(&question).await;
            // Receiver only goes away on shutdown
            let _ = events.send(AppEvent::Answer(result));
        });
    }

    pub fn on_answer(&mut self, result: Result<ChatResponse, AskError>) {
        if let Err(err) = &result {
            info!("Resume query failed: {}", err);
        }
        self.conversation.complete(result);
        self.scroll_chat_to_bottom();
    }

    pub fn reset_conversation(&mut self) {
        match self.conversation.reset() {
            Ok(()) => {
                self.cursor = 0;
                self.chat_scroll = 0;
            }
            Err(err) => debug!("Reset ignored: {}", err),
        }
    }

    // Composer editing

    pub fn insert_char(&mut self, c: char) {
        let cursor = self.cursor;
        let draft = self.conversation.draft_mut();
        let byte_pos = char_to_byte_index(draft, cursor);
        draft.insert(byte_pos, c);
        self.cursor += 1;
    }

    pub fn backspace(&mut self) {
        if self.cursor == 0 {
            return;
        }
        self.cursor -= 1;
        let cursor = self.cursor;
        let draft = self.conversation.draft_mut();
        let byte_pos = char_to_byte_index(draft, cursor);
        draft.remove(byte_pos);
    }

    pub fn delete(&mut self) {
        let cursor = self.cursor;
        let draft = self.conversation.draft_mut();
        if cursor < draft.chars().count() {
            let byte_pos = char_to_byte_index(draft, cursor);
            draft.remove(byte_pos);
        }
    }

    pub fn cursor_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn cursor_right(&mut self) {
        let char_count = self.conversation.draft().chars().count();
        self.cursor = (self.cursor + 1).min(char_count);
    }

    pub fn cursor_home(&mut self) {
        self.cursor = 0;
    }

    pub fn cursor_end(&mut self) {
        self.cursor = self.conversation.draft().chars().count();
    }

    // Starter prompt navigation

    pub fn prompt_nav_down(&mut self) {
        let i = self.prompt_state.selected().unwrap_or(0);
        self.prompt_state.select(Some((i + 1).min(STARTER_PROMPTS.len() - 1)));
    }

    pub fn prompt_nav_up(&mut self) {
        let i = self.prompt_state.selected().unwrap_or(0);
        self.prompt_state.select(Some(i.saturating_sub(1)));
    }

    // Chat log scrolling

    pub fn scroll_chat_down(&mut self, lines: u16) {
        self.chat_scroll = self.chat_scroll.saturating_add(lines).min(self.max_chat_scroll());
    }

    pub fn scroll_chat_up(&mut self, lines: u16) {
        self.chat_scroll = self.chat_scroll.saturating_sub(lines);
    }

    /// Scroll to the bottom after the next render has measured the log
    pub fn follow_after_resize(&mut self) {
        self.pending_follow = true;
    }

    /// Record the log's inner size for this frame
    pub fn set_chat_viewport(&mut self, height: u16, width: u16) {
        self.chat_height = height;
        self.chat_width = width;
        if self.pending_follow {
            self.pending_follow = false;
            self.scroll_chat_to_bottom();
        }
    }

    pub fn chat_page(&self) -> u16 {
        (self.visible_chat_height() / 2).max(1)
    }

    /// Tick animation frame (called by Tick event)
    pub fn tick_animation(&mut self) {
        if self.conversation.is_busy() {
            self.animation_frame = (self.animation_frame + 1) % 3;
        }
    }

    /// Scroll the log so the newest message (or the typing indicator) is visible
    pub fn scroll_chat_to_bottom(&mut self) {
        self.chat_scroll = self.max_chat_scroll();
    }

    fn visible_chat_height(&self) -> u16 {
        if self.chat_height > 0 {
            self.chat_height
        } else {
            20
        }
    }

    fn max_chat_scroll(&self) -> u16 {
        self.total_chat_lines().saturating_sub(self.visible_chat_height())
    }

    /// Estimated wrapped height of the chat log
    fn total_chat_lines(&self) -> u16 {
        // Use actual chat width for wrap calculation, default to 50 if not set
        let wrap_width = if self.chat_width > 0 {
            self.chat_width as usize
        } else {
            50
        };

        let mut total_lines: u16 = 0;

        for msg in self.conversation.messages() {
            total_lines = total_lines.saturating_add(1); // role label
            for line in msg.content.lines() {
                let char_count = line.chars().count();
                let wrapped = if char_count == 0 { 1 } else { char_count / wrap_width + 1 };
                total_lines = total_lines.saturating_add(wrapped as u16);
            }
            total_lines = total_lines.saturating_add(1); // blank separator
        }

        if self.conversation.is_busy() {
            total_lines = total_lines.saturating_add(2);
        }

        total_lines
    }
}
