use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style, Stylize},
    text::{Line, Span, Text},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap},
};
use resume_copilot_core::{ChatRole, ConversationView, Status, PROFILE, STARTER_PROMPTS};
use crate::app::{App, FocusPane, InputMode};

/// Below this width the profile panel is dropped and the chat takes the whole body
const PROFILE_MIN_WIDTH: u16 = 90;

/// Parse a line of answer text: `**bold**` becomes styled, leading `- ` / `* ` become bullets
fn parse_markdown_line(text: &str) -> Line<'static> {
    let (prefix, body) = match text.trim_start().strip_prefix("- ").or_else(|| text.trim_start().strip_prefix("* ")) {
        Some(rest) => (Some("  • "), rest),
        None => (None, text),
    };

    let mut spans: Vec<Span<'static>> = Vec::new();
    if let Some(prefix) = prefix {
        spans.push(Span::styled(prefix, Style::default().fg(Color::Yellow)));
    }

    let mut rest = body;
    while let Some(start) = rest.find("**") {
        let after_open = &rest[start + 2..];
        let Some(len) = after_open.find("**") else {
            break;
        };
        if len == 0 {
            // "****" has nothing to embolden, keep it literal
            spans.push(Span::raw(rest[..start + 4].to_string()));
            rest = &rest[start + 4..];
            continue;
        }
        if start > 0 {
            spans.push(Span::raw(rest[..start].to_string()));
        }
        spans.push(Span::styled(
            after_open[..len].to_string(),
            Style::default().add_modifier(Modifier::BOLD),
        ));
        rest = &after_open[len + 2..];
    }
    if !rest.is_empty() {
        spans.push(Span::raw(rest.to_string()));
    }

    if spans.is_empty() {
        Line::default()
    } else {
        Line::from(spans)
    }
}

pub fn render(app: &mut App, frame: &mut Frame) {
    let area = frame.area();

    // Main layout: header, body, footer
    let [header_area, body_area, footer_area] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Min(0),
        Constraint::Length(1),
    ])
    .areas(area);

    render_header(app, frame, header_area);

    if body_area.width >= PROFILE_MIN_WIDTH {
        let [profile_area, chat_area] = Layout::horizontal([
            Constraint::Percentage(38),
            Constraint::Percentage(62),
        ])
        .areas(body_area);
        render_profile(frame, profile_area);
        render_chat_panel(app, frame, chat_area);
    } else {
        render_chat_panel(app, frame, body_area);
    }

    render_footer(app, frame, footer_area);
}

fn render_header(app: &App, frame: &mut Frame, area: Rect) {
    let title = Line::from(vec![
        Span::styled(format!(" {} ", PROFILE.eyebrow), Style::default().fg(Color::DarkGray)),
        Span::styled(format!("{} ", PROFILE.name), Style::default().fg(Color::Cyan).bold()),
        Span::styled(
            format!("v{}", env!("CARGO_PKG_VERSION")),
            Style::default().fg(Color::DarkGray),
        ),
        Span::raw("  "),
        Span::styled(app.api_base_url.clone(), Style::default().fg(Color::DarkGray)),
    ]);

    let header = Paragraph::new(title).style(Style::default().bg(Color::Black));
    frame.render_widget(header, area);
}

fn render_profile(frame: &mut Frame, area: Rect) {
    let heading = Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD);
    let muted = Style::default().fg(Color::DarkGray);

    let mut lines: Vec<Line> = vec![
        Line::from(Span::styled(PROFILE.tag.to_uppercase(), muted)),
        Line::from(vec![
            Span::styled(format!("{} ", PROFILE.headline), Style::default().bold()),
            Span::styled(PROFILE.headline_accent, Style::default().fg(Color::Yellow).bold()),
        ]),
        Line::default(),
        Line::from(PROFILE.intro),
        Line::default(),
    ];

    for stat in PROFILE.stats {
        lines.push(Line::from(Span::styled(stat.label, muted)));
        lines.push(Line::from(Span::styled(stat.value, Style::default().bold())));
    }

    lines.push(Line::default());
    lines.push(Line::from(Span::styled("Highlights", heading)));
    for highlight in PROFILE.highlights {
        lines.push(Line::from(vec![
            Span::styled("  • ", Style::default().fg(Color::Yellow)),
            Span::raw(*highlight),
        ]));
    }

    lines.push(Line::default());
    lines.push(Line::from(Span::styled("Links", heading)));
    for link in PROFILE.links {
        lines.push(Line::from(vec![
            Span::styled(format!("  {:<14}", link.label), Style::default().bold()),
            Span::styled(link.url, Style::default().fg(Color::Blue).add_modifier(Modifier::UNDERLINED)),
        ]));
    }

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(format!(" {} ", PROFILE.name));

    let profile = Paragraph::new(Text::from(lines))
        .block(block)
        .wrap(Wrap { trim: true });
    frame.render_widget(profile, area);
}

fn composer_height(draft: &str) -> u16 {
    let lines = draft.split('\n').count() as u16;
    lines.clamp(1, 4) + 2
}

fn render_chat_panel(app: &mut App, frame: &mut Frame, area: Rect) {
    let (composer_h, error_h) = {
        let view = app.conversation.view();
        (composer_height(view.draft), u16::from(view.error.is_some()))
    };

    let [topbar_area, prompts_area, log_area, composer_area, error_area] = Layout::vertical([
        Constraint::Length(2),
        Constraint::Length(STARTER_PROMPTS.len() as u16 + 2),
        Constraint::Min(0),
        Constraint::Length(composer_h),
        Constraint::Length(error_h),
    ])
    .areas(area);

    // Store areas for mouse hit-testing
    app.chat_area = Some(log_area);
    app.prompts_area = Some(prompts_area);

    // Inner size minus borders, for scroll calculations
    app.set_chat_viewport(log_area.height.saturating_sub(2), log_area.width.saturating_sub(2));

    let view = app.conversation.view();
    render_topbar(&view, frame, topbar_area);
    render_prompts(app.focus, &view, &mut app.prompt_state, frame, prompts_area);
    render_log(app, &view, frame, log_area);
    render_composer(app, &view, frame, composer_area);

    if let Some(error) = view.error {
        let error_line = Paragraph::new(Span::styled(
            format!(" {}", error),
            Style::default().fg(Color::Red),
        ));
        frame.render_widget(error_line, error_area);
    }
}

fn render_topbar(view: &ConversationView<'_>, frame: &mut Frame, area: Rect) {
    let badge_style = match view.status {
        Status::Live => Style::default().bg(Color::Green).fg(Color::Black).bold(),
        Status::Busy => Style::default().bg(Color::Yellow).fg(Color::Black).bold(),
    };
    let reset_style = if view.can_reset {
        Style::default().fg(Color::White)
    } else {
        Style::default().fg(Color::DarkGray)
    };

    let lines = vec![
        Line::from(vec![
            Span::styled(" Ask Resume Copilot ", Style::default().fg(Color::Cyan).bold()),
            Span::styled(format!(" {} ", view.status.label()), badge_style),
            Span::raw(" "),
            Span::styled("[r] Reset", reset_style),
        ]),
        Line::from(Span::styled(
            format!(" {}", view.status.subtitle()),
            Style::default().fg(Color::DarkGray),
        )),
    ];

    frame.render_widget(Paragraph::new(lines), area);
}

fn render_prompts(
    focus: FocusPane,
    view: &ConversationView<'_>,
    state: &mut ListState,
    frame: &mut Frame,
    area: Rect,
) {
    let focused = focus == FocusPane::Prompts;
    let busy = view.busy;
    let border_color = if focused { Color::Cyan } else { Color::DarkGray };

    let item_style = if busy {
        Style::default().fg(Color::DarkGray)
    } else {
        Style::default()
    };
    let items: Vec<ListItem> = STARTER_PROMPTS
        .iter()
        .map(|prompt| ListItem::new(format!(" {} ", prompt)).style(item_style))
        .collect();

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color))
        .title(" Try asking (Enter to send) ");

    let mut list = List::new(items).block(block);
    if focused {
        let highlight = if busy {
            Style::default().fg(Color::DarkGray).add_modifier(Modifier::BOLD)
        } else {
            Style::default().bg(Color::Cyan).fg(Color::Black).add_modifier(Modifier::BOLD)
        };
        list = list.highlight_style(highlight).highlight_symbol("> ");
    }

    frame.render_stateful_widget(list, area, state);
}

fn role_label(role: ChatRole) -> Line<'static> {
    let color = match role {
        ChatRole::User => Color::Cyan,
        ChatRole::Assistant => Color::Yellow,
    };
    Line::from(Span::styled(
        role.label(),
        Style::default().fg(color).add_modifier(Modifier::BOLD),
    ))
}

fn render_log(app: &App, view: &ConversationView<'_>, frame: &mut Frame, area: Rect) {
    let focused = app.focus == FocusPane::Chat;
    let border_color = if focused { Color::Cyan } else { Color::DarkGray };

    let mut lines: Vec<Line> = Vec::new();
    for msg in view.messages {
        lines.push(role_label(msg.role));
        match msg.role {
            ChatRole::User => {
                for line in msg.content.lines() {
                    lines.push(Line::from(line.to_string()));
                }
            }
            ChatRole::Assistant => {
                for line in msg.content.lines() {
                    lines.push(parse_markdown_line(line));
                }
            }
        }
        lines.push(Line::default());
    }

    if view.busy {
        lines.push(role_label(ChatRole::Assistant));
        // One lit dot walks across three
        let dots: String = (0..3)
            .map(|i| if i == app.animation_frame as usize { '●' } else { '○' })
            .collect();
        lines.push(Line::from(Span::styled(
            dots,
            Style::default().fg(Color::DarkGray),
        )));
    }

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color))
        .title(" Chat ");

    let log = Paragraph::new(Text::from(lines))
        .block(block)
        .wrap(Wrap { trim: true })
        .scroll((app.chat_scroll, 0));

    frame.render_widget(log, area);
}

/// (row, column) of a char cursor inside possibly multi-line text
fn cursor_row_col(text: &str, cursor: usize) -> (usize, usize) {
    let before: String = text.chars().take(cursor).collect();
    let row = before.matches('\n').count();
    let col = before.rsplit('\n').next().map(|l| l.chars().count()).unwrap_or(0);
    (row, col)
}

fn render_composer(app: &App, view: &ConversationView<'_>, frame: &mut Frame, area: Rect) {
    let editing = app.input_mode == InputMode::Editing;
    let focused = app.focus == FocusPane::Composer;
    let border_color = if editing {
        Color::Yellow
    } else if focused {
        Color::Cyan
    } else {
        Color::DarkGray
    };

    let title = if view.can_submit {
        " Ask (Enter to send, Shift+Enter for newline) "
    } else {
        " Ask about skills, projects, stack, or experience... "
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color))
        .title(title);

    // Keep the cursor visible by scrolling both ways
    let inner_width = area.width.saturating_sub(2) as usize;
    let inner_height = area.height.saturating_sub(2) as usize;
    let draft = view.draft;
    let (row, col) = cursor_row_col(draft, app.cursor);

    let col_offset = if inner_width == 0 || col < inner_width {
        0
    } else {
        col - inner_width + 1
    };
    let row_offset = if inner_height == 0 || row < inner_height {
        0
    } else {
        row - inner_height + 1
    };

    let visible: Vec<Line> = draft
        .split('\n')
        .skip(row_offset)
        .take(inner_height.max(1))
        .map(|line| {
            Line::from(line.chars().skip(col_offset).take(inner_width).collect::<String>())
        })
        .collect();

    let input = Paragraph::new(Text::from(visible))
        .style(Style::default().fg(Color::Cyan))
        .block(block);

    frame.render_widget(input, area);

    // Show cursor when editing
    if editing {
        frame.set_cursor_position((
            area.x + 1 + (col - col_offset) as u16,
            area.y + 1 + (row - row_offset) as u16,
        ));
    }
}

fn render_footer(app: &App, frame: &mut Frame, area: Rect) {
    let (mode_text, mode_style) = match app.input_mode {
        InputMode::Normal => (" NORMAL ", Style::default().bg(Color::Blue).fg(Color::White)),
        InputMode::Editing => (" EDIT ", Style::default().bg(Color::Yellow).fg(Color::Black)),
    };

    // Key style: dark background with bright text for visibility on both light/dark terminals
    let key_style = Style::default().bg(Color::DarkGray).fg(Color::White);
    let label_style = Style::default().bg(Color::Black).fg(Color::White);

    let mut hints = vec![Span::styled(mode_text, mode_style), Span::raw(" ")];
    let pairs: &[(&str, &str)] = match (app.input_mode, app.focus) {
        (InputMode::Editing, _) => &[
            (" Enter ", " send "),
            (" S-Enter ", " newline "),
            (" Esc ", " normal "),
            (" Tab ", " focus "),
        ],
        (InputMode::Normal, FocusPane::Prompts) => &[
            (" j/k ", " choose "),
            (" Enter ", " ask "),
            (" Tab ", " focus "),
            (" r ", " reset "),
            (" q ", " quit "),
        ],
        (InputMode::Normal, FocusPane::Chat) => &[
            (" j/k ", " scroll "),
            (" PgUp/PgDn ", " page "),
            (" G ", " latest "),
            (" Tab ", " focus "),
            (" r ", " reset "),
            (" q ", " quit "),
        ],
        (InputMode::Normal, FocusPane::Composer) => &[
            (" i ", " type "),
            (" Tab ", " focus "),
            (" r ", " reset "),
            (" q ", " quit "),
        ],
    };
    for (key, label) in pairs {
        hints.push(Span::styled(*key, key_style));
        hints.push(Span::styled(*label, label_style));
    }

    frame.render_widget(Paragraph::new(Line::from(hints)), area);
}
