//! Markdown → ratatui `Text` renderer for blog bodies and chat replies.
//!
//! Walks `pulldown_cmark` events and builds styled `Line`s. Headings drop
//! the `#` markers and take the accent color, bold text is accented too (the
//! chat's job-fit answers lean on `**Match Score**`), fenced code is
//! highlighted by syntect with a theme matching the active palette.

use std::sync::LazyLock;

use pulldown_cmark::{CodeBlockKind, CowStr, Event, HeadingLevel, Options, Parser, Tag, TagEnd};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span, Text};
use syntect::easy::HighlightLines;
use syntect::highlighting::ThemeSet;
use syntect::parsing::SyntaxSet;
use syntect::util::LinesWithEndings;

use crate::core::state::Theme;
use crate::tui::component::Palette;

static SYNTAX_SET: LazyLock<SyntaxSet> = LazyLock::new(SyntaxSet::load_defaults_newlines);
static THEME_SET: LazyLock<ThemeSet> = LazyLock::new(ThemeSet::load_defaults);

/// Colors the renderer draws with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MarkdownStyle {
    pub base: Color,
    pub accent: Color,
    pub muted: Color,
    pub theme: Theme,
}

impl MarkdownStyle {
    pub fn new(palette: Palette, base: Color, theme: Theme) -> Self {
        Self {
            base,
            accent: palette.accent,
            muted: palette.muted,
            theme,
        }
    }

    fn syntect_theme(&self) -> &'static str {
        match self.theme {
            Theme::Dark => "base16-ocean.dark",
            Theme::Light => "InspiredGitHub",
        }
    }
}

pub fn render(content: &str, style: MarkdownStyle) -> Text<'static> {
    let mut opts = Options::empty();
    opts.insert(Options::ENABLE_STRIKETHROUGH);

    let mut w = Writer::new(style);
    for event in Parser::new_ext(content, opts) {
        w.handle(event);
    }
    w.text
}

/// Rows `text` occupies when wrapped to `width` columns.
///
/// Uses the same word splitting as `Paragraph` with `Wrap { trim: true }`,
/// so callers can size a scroll view before rendering into it.
pub fn wrapped_height(text: &Text<'_>, width: u16) -> u16 {
    if width == 0 {
        return text.lines.len() as u16;
    }
    let options = textwrap::Options::new(width as usize)
        .break_words(true)
        .word_separator(textwrap::WordSeparator::AsciiSpace);

    text.lines
        .iter()
        .map(|line| {
            let plain: String = line.spans.iter().map(|s| s.content.as_ref()).collect();
            textwrap::wrap(plain.trim_end(), &options).len().max(1) as u16
        })
        .sum()
}

struct Writer {
    text: Text<'static>,
    style: MarkdownStyle,
    /// Inline style stack; nested styles compose via `patch`.
    styles: Vec<Style>,
    /// Per-line prefix spans (blockquote and code gutters).
    line_prefixes: Vec<Span<'static>>,
    /// List nesting: None = bullets, Some(n) = numbered at n.
    list_indices: Vec<Option<u64>>,
    highlighter: Option<HighlightLines<'static>>,
    in_plain_code: bool,
    link_url: Option<String>,
    needs_newline: bool,
}

impl Writer {
    fn new(style: MarkdownStyle) -> Self {
        Self {
            text: Text::default(),
            style,
            styles: vec![],
            line_prefixes: vec![],
            list_indices: vec![],
            highlighter: None,
            in_plain_code: false,
            link_url: None,
            needs_newline: false,
        }
    }

    fn current(&self) -> Style {
        self.styles
            .last()
            .copied()
            .unwrap_or_else(|| Style::default().fg(self.style.base))
    }

    fn push_style(&mut self, overlay: Style) {
        self.styles.push(self.current().patch(overlay));
    }

    fn pop_style(&mut self) {
        self.styles.pop();
    }

    fn gutter(&self) -> Style {
        Style::default().fg(self.style.muted)
    }

    fn push_line(&mut self, line: Line<'static>) {
        let mut out = line;
        for prefix in self.line_prefixes.iter().rev().cloned() {
            out.spans.insert(0, prefix);
        }
        self.text.lines.push(out);
    }

    fn push_span(&mut self, span: Span<'static>) {
        match self.text.lines.last_mut() {
            Some(line) => line.push_span(span),
            None => self.push_line(Line::from(vec![span])),
        }
    }

    fn blank_line_if_needed(&mut self) {
        if self.needs_newline {
            self.push_line(Line::default());
            self.needs_newline = false;
        }
    }

    fn handle(&mut self, event: Event<'_>) {
        match event {
            Event::Start(tag) => self.open(tag),
            Event::End(tag) => self.close(tag),
            Event::Text(t) => self.text(t),
            Event::Code(c) => {
                let style = self.current().add_modifier(Modifier::REVERSED);
                self.push_span(Span::styled(format!(" {} ", &*c), style));
            }
            Event::SoftBreak => self.push_span(Span::raw(" ")),
            Event::HardBreak => self.push_line(Line::default()),
            Event::Rule => {
                self.blank_line_if_needed();
                self.push_line(Line::from(Span::styled("─".repeat(32), self.gutter())));
                self.needs_newline = true;
            }
            _ => {}
        }
    }

    fn open(&mut self, tag: Tag<'_>) {
        match tag {
            Tag::Paragraph => {
                self.blank_line_if_needed();
                self.push_line(Line::default());
            }
            Tag::Heading { level, .. } => {
                self.blank_line_if_needed();
                self.push_line(Line::default());
                self.push_style(heading_style(self.style.accent, level));
            }
            Tag::BlockQuote(_) => {
                self.blank_line_if_needed();
                self.line_prefixes.push(Span::styled("▌ ", self.gutter()));
                self.push_style(Style::default().add_modifier(Modifier::ITALIC));
            }
            Tag::CodeBlock(kind) => {
                self.blank_line_if_needed();
                let lang = match &kind {
                    CodeBlockKind::Fenced(l) => l.to_string(),
                    CodeBlockKind::Indented => String::new(),
                };
                if !lang.is_empty() {
                    self.push_line(Line::from(Span::styled(
                        lang.clone(),
                        self.gutter().add_modifier(Modifier::BOLD),
                    )));
                }
                self.line_prefixes.push(Span::styled("│ ", self.gutter()));

                if !lang.is_empty()
                    && let Some(syntax) = SYNTAX_SET.find_syntax_by_token(&lang)
                    && let Some(theme) = THEME_SET.themes.get(self.style.syntect_theme())
                {
                    self.highlighter = Some(HighlightLines::new(syntax, theme));
                }
                self.in_plain_code = self.highlighter.is_none();
            }
            Tag::List(start) => {
                if self.list_indices.is_empty() {
                    self.blank_line_if_needed();
                }
                self.list_indices.push(start);
            }
            Tag::Item => {
                self.push_line(Line::default());
                let indent = "  ".repeat(self.list_indices.len().saturating_sub(1));
                let marker = match self.list_indices.last_mut() {
                    Some(Some(n)) => {
                        let marker = format!("{indent}{n}. ");
                        *n += 1;
                        marker
                    }
                    Some(None) => format!("{indent}• "),
                    None => return,
                };
                self.push_span(Span::styled(marker, Style::default().fg(self.style.accent)));
            }
            Tag::Emphasis => self.push_style(Style::default().add_modifier(Modifier::ITALIC)),
            Tag::Strong => self.push_style(
                Style::default()
                    .fg(self.style.accent)
                    .add_modifier(Modifier::BOLD),
            ),
            Tag::Strikethrough => {
                self.push_style(Style::default().add_modifier(Modifier::CROSSED_OUT))
            }
            Tag::Link { dest_url, .. } => {
                self.link_url = Some(dest_url.to_string());
                self.push_style(Style::default().add_modifier(Modifier::UNDERLINED));
            }
            _ => {}
        }
    }

    fn close(&mut self, tag: TagEnd) {
        match tag {
            TagEnd::Paragraph => self.needs_newline = true,
            TagEnd::Heading(_) => {
                self.pop_style();
                self.needs_newline = true;
            }
            TagEnd::BlockQuote(_) => {
                self.line_prefixes.pop();
                self.pop_style();
                self.needs_newline = true;
            }
            TagEnd::CodeBlock => {
                self.highlighter = None;
                self.in_plain_code = false;
                self.line_prefixes.pop();
                self.needs_newline = true;
            }
            TagEnd::List(_) => {
                self.list_indices.pop();
                self.needs_newline = true;
            }
            TagEnd::Emphasis | TagEnd::Strong | TagEnd::Strikethrough => self.pop_style(),
            TagEnd::Link => {
                self.pop_style();
                if let Some(url) = self.link_url.take() {
                    self.push_span(Span::styled(format!(" <{url}>"), self.gutter()));
                }
            }
            _ => {}
        }
    }

    fn text(&mut self, cow: CowStr<'_>) {
        // ratatui renders \t as zero-width
        let text = cow.replace('\t', "    ");

        if let Some(mut highlighter) = self.highlighter.take() {
            for line in LinesWithEndings::from(text.as_str()) {
                let Ok(ranges) = highlighter.highlight_line(line, &SYNTAX_SET) else {
                    continue;
                };
                let spans: Vec<Span<'static>> = ranges
                    .into_iter()
                    .filter_map(|(hl, fragment)| {
                        let content = fragment.trim_end_matches('\n');
                        (!content.is_empty()).then(|| {
                            let fg = Color::Rgb(hl.foreground.r, hl.foreground.g, hl.foreground.b);
                            Span::styled(content.to_owned(), Style::default().fg(fg))
                        })
                    })
                    .collect();
                self.push_line(Line::from(spans));
            }
            self.highlighter = Some(highlighter);
            return;
        }

        if self.in_plain_code {
            let style = Style::default().fg(self.style.base);
            for line in text.lines() {
                self.push_line(Line::from(Span::styled(line.to_owned(), style)));
            }
            return;
        }

        let style = self.current();
        self.push_span(Span::styled(text, style));
    }
}

fn heading_style(accent: Color, level: HeadingLevel) -> Style {
    let style = Style::default().fg(accent).add_modifier(Modifier::BOLD);
    match level {
        HeadingLevel::H1 => style.add_modifier(Modifier::UNDERLINED),
        HeadingLevel::H2 => style,
        _ => style.add_modifier(Modifier::ITALIC),
    }
}
