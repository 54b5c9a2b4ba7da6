use chrono::Local;
use color_eyre::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    ExecutableCommand,
};
use mood_journal::{
    journal_entry::{
        emotion_vocabulary, format_emotions, mood_label_for_value, validate_content, Emotions,
        JournalEntry, MoodLevel,
    },
    journal_store::JournalStore,
    mood_trend::{mood_trend, Averaging, ChartBucket, TrendWindow},
    quotes::QuoteRotator,
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Bar, BarChart, BarGroup, Block, Borders, List, ListItem, ListState, Paragraph, Wrap},
    Frame, Terminal,
};
use std::{
    io::{stdout, Stdout},
    time::{Duration, Instant},
};
use unicode_width::UnicodeWidthChar;

pub enum Action {
    Write,
    View,
    Edit,
    Delete,
    Search,
    CycleWindow,
    NextQuote,
    Quit,
}

/// Values collected by the entry form.
pub struct EntryDraft {
    pub content: String,
    pub mood: MoodLevel,
    pub emotions: Emotions,
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Field {
    Mood,
    Content,
    Emotions,
}

impl Field {
    fn next(self) -> Self {
        match self {
            Field::Mood => Field::Content,
            Field::Content => Field::Emotions,
            Field::Emotions => Field::Mood,
        }
    }
}

struct EntryForm {
    title: &'static str,
    content: String,
    cursor: usize,
    mood: MoodLevel,
    emotions: Emotions,
    emotion_cursor: usize,
    focus: Field,
    error: Option<String>,
}

impl EntryForm {
    fn new(title: &'static str, content: String, mood: MoodLevel, emotions: Emotions) -> Self {
        EntryForm {
            title,
            cursor: content.len(),
            content,
            mood,
            emotions,
            emotion_cursor: 0,
            focus: Field::Mood,
            error: None,
        }
    }

    fn prev_boundary(&self) -> Option<usize> {
        self.content[..self.cursor].char_indices().last().map(|(i, _)| i)
    }

    fn next_boundary(&self) -> Option<usize> {
        self.content[self.cursor..]
            .chars()
            .next()
            .map(|c| self.cursor + c.len_utf8())
    }

    fn line_start(&self, pos: usize) -> usize {
        self.content[..pos].rfind('\n').map(|i| i + 1).unwrap_or(0)
    }

    fn line_end(&self, pos: usize) -> usize {
        self.content[pos..]
            .find('\n')
            .map(|i| pos + i)
            .unwrap_or(self.content.len())
    }

    /// Byte offset of `column` chars into the line starting at `start`.
    fn offset_in_line(&self, start: usize, column: usize) -> usize {
        let end = self.line_end(start);
        self.content[start..end]
            .char_indices()
            .nth(column)
            .map(|(i, _)| start + i)
            .unwrap_or(end)
    }

    fn column(&self) -> usize {
        self.content[self.line_start(self.cursor)..self.cursor]
            .chars()
            .count()
    }

    fn edit_content(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char(c) => {
                self.content.insert(self.cursor, c);
                self.cursor += c.len_utf8();
            }
            KeyCode::Enter => {
                self.content.insert(self.cursor, '\n');
                self.cursor += 1;
            }
            KeyCode::Backspace => {
                if let Some(prev) = self.prev_boundary() {
                    self.content.remove(prev);
                    self.cursor = prev;
                }
            }
            KeyCode::Delete => {
                if self.cursor < self.content.len() {
                    self.content.remove(self.cursor);
                }
            }
            KeyCode::Left => {
                if let Some(prev) = self.prev_boundary() {
                    self.cursor = prev;
                }
            }
            KeyCode::Right => {
                if let Some(next) = self.next_boundary() {
                    self.cursor = next;
                }
            }
            KeyCode::Up => {
                let start = self.line_start(self.cursor);
                if start > 0 {
                    let column = self.column();
                    let prev_start = self.line_start(start - 1);
                    self.cursor = self.offset_in_line(prev_start, column);
                }
            }
            KeyCode::Down => {
                let end = self.line_end(self.cursor);
                if end < self.content.len() {
                    let column = self.column();
                    self.cursor = self.offset_in_line(end + 1, column);
                }
            }
            _ => {}
        }
    }

    fn edit_mood(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Left => self.mood = self.mood.lower(),
            KeyCode::Right => self.mood = self.mood.raise(),
            KeyCode::Char(c) => {
                if let Some(mood) = c
                    .to_digit(10)
                    .and_then(|d| MoodLevel::new(d as u8).ok())
                {
                    self.mood = mood;
                }
            }
            _ => {}
        }
    }

    fn edit_emotions(&mut self, key: KeyEvent) {
        let vocabulary = emotion_vocabulary();
        match key.code {
            KeyCode::Up => self.emotion_cursor = self.emotion_cursor.saturating_sub(1),
            KeyCode::Down => {
                if self.emotion_cursor + 1 < vocabulary.len() {
                    self.emotion_cursor += 1;
                }
            }
            KeyCode::Char(' ') | KeyCode::Enter => {
                let tag = vocabulary[self.emotion_cursor];
                if !self.emotions.remove(&tag) {
                    self.emotions.insert(tag);
                }
            }
            _ => {}
        }
    }

    fn draw(&self, f: &mut Frame, cursor_visible: bool) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .margin(1)
            .constraints([
                Constraint::Length(3),
                Constraint::Length(3),
                Constraint::Min(6),
                Constraint::Length(3),
            ])
            .split(f.area());
        f.render_widget(title(self.title), chunks[0]);

        let mood_spans: Vec<Span> = MoodLevel::all()
            .flat_map(|m| {
                let style = if m == self.mood {
                    Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD | Modifier::REVERSED)
                } else {
                    Style::default()
                };
                [Span::styled(format!(" {} ", m), style), Span::raw(" ")]
            })
            .collect();
        let mood = Paragraph::new(Line::from(mood_spans))
            .alignment(Alignment::Center)
            .block(focus_block("How are you feeling today?", self.focus == Field::Mood));
        f.render_widget(mood, chunks[1]);

        let body = Layout::horizontal([Constraint::Min(20), Constraint::Length(22)]).split(chunks[2]);

        let text = if cursor_visible && self.focus == Field::Content {
            let mut shown = self.content.clone();
            shown.insert(self.cursor, '|');
            shown
        } else {
            self.content.clone()
        };
        let content = Paragraph::new(text)
            .wrap(Wrap { trim: false })
            .block(focus_block("What's on your mind?", self.focus == Field::Content));
        f.render_widget(content, body[0]);

        let items: Vec<ListItem> = emotion_vocabulary()
            .into_iter()
            .map(|tag| {
                let mark = if self.emotions.contains(&tag) { "[x]" } else { "[ ]" };
                ListItem::new(format!("{mark} {} {}", tag.emoji(), tag))
            })
            .collect();
        let emotions = List::new(items)
            .block(focus_block("Emotions", self.focus == Field::Emotions))
            .highlight_style(Style::default().add_modifier(Modifier::BOLD));
        let selected = (self.focus == Field::Emotions).then_some(self.emotion_cursor);
        f.render_stateful_widget(
            emotions,
            body[1],
            &mut ListState::default().with_selected(selected),
        );

        let footer = match &self.error {
            Some(error) => Paragraph::new(error.as_str())
                .style(Style::default().fg(Color::Red))
                .alignment(Alignment::Center),
            None => hint("Tab: Next field, Space: Toggle emotion, Ctrl+S: Save, Esc: Cancel"),
        };
        f.render_widget(footer, chunks[3]);
    }
}

pub struct UI {
    terminal: Terminal<CrosstermBackend<Stdout>>,
    cursor_visible: bool,
    last_cursor_update: Instant,
    window: TrendWindow,
    averaging: Averaging,
    quotes: QuoteRotator,
    status: Option<String>,
}

impl UI {
    pub fn new(window: TrendWindow, averaging: Averaging, quotes: QuoteRotator) -> Result<Self> {
        enable_raw_mode()?;
        stdout().execute(EnterAlternateScreen)?;

        let backend = CrosstermBackend::new(stdout());
        let terminal = Terminal::new(backend)?;

        Ok(UI {
            terminal,
            cursor_visible: true,
            last_cursor_update: Instant::now(),
            window,
            averaging,
            quotes,
            status: None,
        })
    }

    pub fn set_status(&mut self, message: impl Into<String>) {
        self.status = Some(message.into());
    }

    pub fn cycle_window(&mut self) {
        self.window = self.window.next();
    }

    pub fn next_quote(&mut self) {
        self.quotes.advance();
    }

    pub fn display(&mut self, store: &JournalStore) -> Result<()> {
        self.quotes.tick(Instant::now());
        let entries = store.newest_first();
        let series = mood_trend(store.list(), self.window.days(), Local::now(), self.averaging);
        let quote = self.quotes.current();
        let status = self.status.clone();
        let window = self.window;

        self.terminal.draw(|f| {
            let chunks = Layout::default()
                .direction(Direction::Vertical)
                .margin(1)
                .constraints([
                    Constraint::Length(3),
                    Constraint::Min(0),
                    Constraint::Length(3),
                ])
                .split(f.area());
            f.render_widget(title("Mood Journal"), chunks[0]);

            let columns = Layout::horizontal([Constraint::Percentage(55), Constraint::Percentage(45)])
                .split(chunks[1]);

            let width = columns[0].width.saturating_sub(4) as usize;
            let items: Vec<ListItem> = entries.iter().map(|e| entry_item(e, width)).collect();
            let list = if items.is_empty() {
                List::new(vec![ListItem::new(
                    "You haven't created any journal entries yet.",
                )])
            } else {
                List::new(items)
            };
            f.render_widget(
                list.block(Block::default().borders(Borders::ALL).title("Journal Entries")),
                columns[0],
            );

            let side = Layout::vertical([Constraint::Min(8), Constraint::Length(7)]).split(columns[1]);
            render_trend(f, side[0], &series, window);

            let quote_text = vec![
                Line::from(Span::styled(
                    format!("\"{}\"", quote.text),
                    Style::default().add_modifier(Modifier::ITALIC),
                )),
                Line::from(Span::styled(
                    format!("- {}", quote.author),
                    Style::default().fg(Color::DarkGray),
                )),
            ];
            let quote_widget = Paragraph::new(quote_text)
                .wrap(Wrap { trim: true })
                .alignment(Alignment::Center)
                .block(Block::default().borders(Borders::ALL).title("Quote of the Day"));
            f.render_widget(quote_widget, side[1]);

            let controls = match &status {
                Some(message) => Line::from(Span::styled(
                    message.clone(),
                    Style::default().fg(Color::Red),
                )),
                None if entries.is_empty() => key_line(&[("w", "write"), ("n", "next quote"), ("q", "quit")]),
                None => key_line(&[
                    ("w", "write"),
                    ("v", "view"),
                    ("e", "edit"),
                    ("d", "delete"),
                    ("s", "search"),
                    ("t", "trend range"),
                    ("n", "next quote"),
                    ("q", "quit"),
                ]),
            };
            let controls_paragraph = Paragraph::new(controls)
                .style(Style::default().fg(Color::Yellow))
                .alignment(Alignment::Center);
            f.render_widget(controls_paragraph, chunks[2]);
        })?;

        Ok(())
    }

    /// Waits briefly for a key so the quote panel keeps rotating while idle.
    pub fn handle_input(&mut self, store: &JournalStore) -> Result<Option<Action>> {
        if !event::poll(Duration::from_millis(250))? {
            return Ok(None);
        }
        let Event::Key(key) = event::read()? else {
            return Ok(None);
        };
        if key.kind != KeyEventKind::Press {
            return Ok(None);
        }
        self.status = None;
        let has_entries = !store.is_empty();
        let action = match key.code {
            KeyCode::Char('w') => Some(Action::Write),
            KeyCode::Char('q') => Some(Action::Quit),
            KeyCode::Char('n') => Some(Action::NextQuote),
            KeyCode::Char('t') if has_entries => Some(Action::CycleWindow),
            KeyCode::Char('v') if has_entries => Some(Action::View),
            KeyCode::Char('e') if has_entries => Some(Action::Edit),
            KeyCode::Char('d') if has_entries => Some(Action::Delete),
            KeyCode::Char('s') if has_entries => Some(Action::Search),
            _ => None,
        };
        Ok(action)
    }

    pub fn get_new_entry(&mut self) -> Result<Option<EntryDraft>> {
        let form = EntryForm::new(
            "New Journal Entry",
            String::new(),
            MoodLevel::default(),
            Emotions::new(),
        );
        self.run_form(form)
    }

    pub fn edit_entry(&mut self, entry: &JournalEntry) -> Result<Option<EntryDraft>> {
        let form = EntryForm::new(
            "Edit Journal Entry",
            entry.content.clone(),
            entry.mood,
            entry.emotions.clone(),
        );
        self.run_form(form)
    }

    fn run_form(&mut self, mut form: EntryForm) -> Result<Option<EntryDraft>> {
        let mut last_content_update = Instant::now();

        loop {
            let now = Instant::now();
            let should_update_cursor =
                now.duration_since(self.last_cursor_update) >= Duration::from_millis(500);
            let should_redraw = should_update_cursor
                || now.duration_since(last_content_update) < Duration::from_millis(50);

            if should_redraw {
                let cursor_visible = self.cursor_visible;
                self.terminal.draw(|f| form.draw(f, cursor_visible))?;
                if should_update_cursor {
                    self.cursor_visible = !self.cursor_visible;
                    self.last_cursor_update = now;
                }
            }

            if !event::poll(Duration::from_millis(50))? {
                continue;
            }
            let Event::Key(key) = event::read()? else {
                continue;
            };
            if key.kind != KeyEventKind::Press {
                continue;
            }
            last_content_update = Instant::now();

            match key.code {
                KeyCode::Esc => return Ok(None),
                KeyCode::Char('s') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                    match validate_content(&form.content) {
                        Ok(()) => {
                            return Ok(Some(EntryDraft {
                                content: form.content,
                                mood: form.mood,
                                emotions: form.emotions,
                            }))
                        }
                        Err(e) => {
                            form.error = Some(e.to_string());
                            form.focus = Field::Content;
                        }
                    }
                }
                KeyCode::Tab => form.focus = form.focus.next(),
                _ => {
                    form.error = None;
                    match form.focus {
                        Field::Mood => form.edit_mood(key),
                        Field::Content => form.edit_content(key),
                        Field::Emotions => form.edit_emotions(key),
                    }
                }
            }
        }
    }

    pub fn view_entries(&mut self, store: &JournalStore) -> Result<()> {
        let entries = store.newest_first();
        self.browse(
            "View Entries",
            &entries,
            "Up/Down: Navigate, Enter: View full entry, Esc: Back",
        )
    }

    pub fn display_search_results(&mut self, results: &[JournalEntry]) -> Result<()> {
        self.browse(
            "Search Results",
            results,
            "Up/Down: Navigate, Enter: View full entry, Esc: Back",
        )
    }

    fn browse(&mut self, heading: &str, entries: &[JournalEntry], help: &str) -> Result<()> {
        loop {
            match self.pick_entry(heading, entries, help)? {
                Some(entry) => self.view_full_entry(&entry)?,
                None => return Ok(()),
            }
        }
    }

    pub fn select_entry_to_edit(&mut self, store: &JournalStore) -> Result<Option<JournalEntry>> {
        let entries = store.newest_first();
        self.pick_entry(
            "Select Entry to Edit",
            &entries,
            "Up/Down: Navigate, Enter: Select, Esc: Cancel",
        )
    }

    pub fn select_entry_to_delete(
        &mut self,
        store: &JournalStore,
    ) -> Result<Option<JournalEntry>> {
        let entries = store.newest_first();
        self.pick_entry(
            "Select Entry to Delete",
            &entries,
            "Up/Down: Navigate, Enter: Delete, Esc: Cancel",
        )
    }

    fn pick_entry(
        &mut self,
        heading: &str,
        entries: &[JournalEntry],
        help: &str,
    ) -> Result<Option<JournalEntry>> {
        let mut selected_index = 0;

        loop {
            self.terminal.draw(|f| {
                let chunks = Layout::default()
                    .direction(Direction::Vertical)
                    .margin(1)
                    .constraints([
                        Constraint::Length(3),
                        Constraint::Min(10),
                        Constraint::Length(3),
                    ])
                    .split(f.area());
                f.render_widget(title(heading), chunks[0]);

                let width = chunks[1].width.saturating_sub(6) as usize;
                let items: Vec<ListItem> = if entries.is_empty() {
                    vec![ListItem::new("No matching entries.")]
                } else {
                    entries.iter().map(|e| entry_item(e, width)).collect()
                };
                let entries_list = List::new(items)
                    .block(Block::default().borders(Borders::ALL).title("Entries"))
                    .highlight_style(Style::default().add_modifier(Modifier::BOLD))
                    .highlight_symbol("> ");

                f.render_stateful_widget(
                    entries_list,
                    chunks[1],
                    &mut ListState::default().with_selected(Some(selected_index)),
                );
                f.render_widget(hint(help), chunks[2]);
            })?;

            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                match key.code {
                    KeyCode::Up => selected_index = selected_index.saturating_sub(1),
                    KeyCode::Down => {
                        if selected_index + 1 < entries.len() {
                            selected_index += 1;
                        }
                    }
                    KeyCode::Enter if !entries.is_empty() => {
                        return Ok(Some(entries[selected_index].clone()))
                    }
                    KeyCode::Esc => return Ok(None),
                    _ => {}
                }
            }
        }
    }

    fn view_full_entry(&mut self, entry: &JournalEntry) -> Result<()> {
        loop {
            self.terminal.draw(|f| {
                let chunks = Layout::default()
                    .direction(Direction::Vertical)
                    .margin(1)
                    .constraints([
                        Constraint::Length(3),
                        Constraint::Length(3),
                        Constraint::Min(10),
                        Constraint::Length(3),
                    ])
                    .split(f.area());

                f.render_widget(
                    title(&format!("Entry from {}", entry.date.format("%Y-%m-%d %H:%M"))),
                    chunks[0],
                );

                let feelings = Paragraph::new(format!(
                    "Mood: {}    Emotions: {}",
                    entry.mood,
                    emotion_summary(&entry.emotions)
                ))
                .block(Block::default().borders(Borders::ALL));
                f.render_widget(feelings, chunks[1]);

                let content = Paragraph::new(entry.content.as_str())
                    .wrap(Wrap { trim: false })
                    .block(Block::default().borders(Borders::ALL).title("Content"));
                f.render_widget(content, chunks[2]);

                f.render_widget(hint("Esc: Back"), chunks[3]);
            })?;

            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    break;
                }
            }
        }

        Ok(())
    }

    pub fn get_search_query(&mut self) -> Result<Option<String>> {
        let mut query = String::new();

        loop {
            self.terminal.draw(|f| {
                let chunks = Layout::default()
                    .direction(Direction::Vertical)
                    .margin(1)
                    .constraints([
                        Constraint::Length(3),
                        Constraint::Length(3),
                        Constraint::Min(1),
                    ])
                    .split(f.area());

                f.render_widget(title("Search Entries"), chunks[0]);
                let search_input = Paragraph::new(query.as_str()).block(
                    Block::default()
                        .borders(Borders::ALL)
                        .title("Search text or emotion"),
                );
                f.render_widget(search_input, chunks[1]);
                f.render_widget(hint("Enter: Submit, Esc: Cancel"), chunks[2]);
            })?;

            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                match key.code {
                    KeyCode::Enter => break,
                    KeyCode::Char(c) => query.push(c),
                    KeyCode::Backspace => {
                        query.pop();
                    }
                    KeyCode::Esc => return Ok(None),
                    _ => {}
                }
            }
        }

        Ok(Some(query))
    }
}

impl Drop for UI {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = stdout().execute(LeaveAlternateScreen);
    }
}

fn title(text: &str) -> Paragraph<'_> {
    Paragraph::new(text)
        .style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .alignment(Alignment::Center)
}

fn hint(text: &str) -> Paragraph<'_> {
    Paragraph::new(text)
        .style(Style::default().fg(Color::Yellow))
        .alignment(Alignment::Center)
}

fn focus_block(label: &str, focused: bool) -> Block<'_> {
    let block = Block::default().borders(Borders::ALL).title(label);
    if focused {
        block.border_style(Style::default().fg(Color::Cyan))
    } else {
        block
    }
}

fn key_line(keys: &[(&'static str, &'static str)]) -> Line<'static> {
    let mut spans = vec![Span::raw("Press ")];
    for (i, (key, what)) in keys.iter().enumerate() {
        if i > 0 {
            spans.push(Span::raw(", "));
        }
        spans.push(Span::styled(*key, Style::default().add_modifier(Modifier::BOLD)));
        spans.push(Span::raw(format!(" to {what}")));
    }
    Line::from(spans)
}

fn emotion_summary(emotions: &Emotions) -> String {
    if emotions.is_empty() {
        "none".to_string()
    } else {
        format_emotions(emotions)
    }
}

fn entry_item(entry: &JournalEntry, width: usize) -> ListItem<'static> {
    let header = format!(
        "{} [{}] {}",
        entry.mood.emoji(),
        entry.date.format("%Y-%m-%d %H:%M"),
        entry.headline()
    );
    let tags: String = entry
        .emotions
        .iter()
        .map(|t| format!("{} {}", t.emoji(), t))
        .collect::<Vec<_>>()
        .join("  ");
    ListItem::new(vec![
        Line::from(Span::raw(truncate_to_width(&header, width))),
        Line::from(Span::styled(
            truncate_to_width(&tags, width),
            Style::default().fg(Color::DarkGray),
        )),
    ])
}

/// Cuts `text` to at most `width` terminal columns, marking the cut.
fn truncate_to_width(text: &str, width: usize) -> String {
    let mut used = 0;
    let mut out = String::new();
    for c in text.chars() {
        let w = c.width().unwrap_or(0);
        if used + w > width.saturating_sub(1) {
            out.push('…');
            return out;
        }
        used += w;
        out.push(c);
    }
    out
}

fn render_trend(
    f: &mut Frame,
    area: Rect,
    series: &[ChartBucket],
    window: TrendWindow,
) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!("Mood Trends ({window})"));

    if series.is_empty() {
        let empty = Paragraph::new(vec![
            Line::from("No mood data available for the selected period."),
            Line::from(Span::styled(
                "Start adding journal entries to see your mood trends.",
                Style::default().fg(Color::DarkGray),
            )),
        ])
        .wrap(Wrap { trim: true })
        .alignment(Alignment::Center)
        .block(block);
        f.render_widget(empty, area);
        return;
    }

    let bars: Vec<Bar> = series
        .iter()
        .map(|bucket| {
            Bar::default()
                .value((bucket.value * 10.0).round() as u64)
                .text_value(format!("{:.1}", bucket.value))
                .label(Line::from(bucket.date.format("%d").to_string()))
                .style(Style::default().fg(mood_color(bucket.value)))
        })
        .collect();

    let latest = series.last().map(|b| b.value).unwrap_or_default();
    let chart = BarChart::default()
        .block(block.title_bottom(format!(
            "Latest: {} ({:.1})",
            mood_label_for_value(latest),
            latest
        )))
        .data(BarGroup::default().bars(&bars))
        .bar_width(3)
        .bar_gap(1)
        .max(50);
    f.render_widget(chart, area);
}

fn mood_color(value: f64) -> Color {
    match mood_label_for_value(value) {
        "Very Good" => Color::Green,
        "Good" => Color::LightGreen,
        "Neutral" => Color::Yellow,
        "Bad" => Color::LightRed,
        _ => Color::Red,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn truncation_respects_wide_chars() {
        assert_eq!(truncate_to_width("short", 10), "short");
        assert_eq!(truncate_to_width("abcdefghij", 5), "abcd…");
        assert_eq!(truncate_to_width("😊😊😊", 4), "😊…");
    }

    #[test]
    fn form_cursor_moves_by_chars_and_lines() {
        let mut form = EntryForm::new(
            "t",
            "héllo\nab".to_string(),
            MoodLevel::default(),
            Emotions::new(),
        );
        form.edit_content(key(KeyCode::Up));
        assert_eq!(&form.content[form.cursor..], "llo\nab");
        form.edit_content(key(KeyCode::Backspace));
        assert_eq!(form.content, "hllo\nab");
        form.edit_content(key(KeyCode::Down));
        assert_eq!(form.cursor, form.content.len() - 1);
    }

    #[test]
    fn form_toggles_emotions_and_sets_mood() {
        let mut form = EntryForm::new("t", String::new(), MoodLevel::default(), Emotions::new());
        form.edit_mood(key(KeyCode::Char('5')));
        assert_eq!(form.mood.value(), 5);
        form.edit_mood(key(KeyCode::Right));
        assert_eq!(form.mood.value(), 5);

        form.edit_emotions(key(KeyCode::Down));
        form.edit_emotions(key(KeyCode::Char(' ')));
        assert_eq!(format_emotions(&form.emotions), "sad");
        form.edit_emotions(key(KeyCode::Enter));
        assert!(form.emotions.is_empty());
    }
}
