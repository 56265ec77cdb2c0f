use crate::model::PlayerView;
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Clear, Gauge, Paragraph, Tabs, Wrap};
use std::path::Path;

const APP_TITLE: &str = "Studio Player  ";
const KEY_HELP: &str = concat!(
    "Tab/Shift-Tab: change page   Space: play/pause   n/p: next/prev   ",
    ",/.: seek   +/-: volume   m: mute   x: close player   o: reopen   q: quit"
);

const BG: Color = Color::Rgb(10, 15, 24);
const PANEL_BG: Color = Color::Rgb(30, 41, 59);
const BORDER: Color = Color::Rgb(69, 121, 176);
const TEXT: Color = Color::Rgb(214, 228, 248);
const MUTED: Color = Color::Rgb(148, 163, 184);
const ACCENT: Color = Color::Rgb(16, 185, 129);
const ALERT: Color = Color::Rgb(249, 174, 88);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    Home,
    Portfolio,
    Blog,
    Contact,
}

impl Page {
    pub const ALL: [Page; 4] = [Page::Home, Page::Portfolio, Page::Blog, Page::Contact];

    pub fn title(self) -> &'static str {
        match self {
            Self::Home => "Home",
            Self::Portfolio => "Portfolio",
            Self::Blog => "Blog",
            Self::Contact => "Contact",
        }
    }

    pub fn route(self) -> &'static str {
        match self {
            Self::Home => "/",
            Self::Portfolio => "/portfolio",
            Self::Blog => "/blog",
            Self::Contact => "/contact",
        }
    }

    fn blurb(self) -> &'static str {
        match self {
            Self::Home => "Video production for brands, events and artists. Watch the showreel.",
            Self::Portfolio => "Selected work: corporate films, music videos and aerial footage.",
            Self::Blog => "Behind the scenes: gear notes, shoot diaries and editing workflows.",
            Self::Contact => "Tell us about your project; we reply within two working days.",
        }
    }

    pub fn index(self) -> usize {
        Self::ALL.iter().position(|page| *page == self).unwrap_or(0)
    }

    pub fn next(self) -> Self {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }

    pub fn previous(self) -> Self {
        Self::ALL[(self.index() + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

pub struct Screen<'a> {
    pub page: Page,
    pub player: &'a PlayerView,
    pub status: &'a str,
    pub output: &'a str,
}

pub fn format_clock(seconds: f64) -> String {
    if !seconds.is_finite() || seconds < 0.0 {
        return String::from("00:00");
    }
    let total = seconds.floor() as u64;
    format!("{:02}:{:02}", total / 60, total % 60)
}

pub fn draw(frame: &mut Frame, screen: &Screen) {
    let area = frame.area();
    frame.render_widget(Block::default().style(Style::default().bg(BG)), area);

    let rows = Layout::vertical([
        Constraint::Length(3),
        Constraint::Min(3),
        Constraint::Length(7),
        Constraint::Length(1),
    ])
    .split(area);

    draw_tabs(frame, rows[0], screen.page);
    draw_page(frame, rows[1], screen.page);

    if screen.player.visible {
        draw_player(frame, rows[2], screen.player);
    } else if screen.player.reopen_visible {
        draw_reopen(frame, rows[2]);
    }

    let footer = Paragraph::new(Line::from(vec![
        Span::styled(screen.status, Style::default().fg(TEXT)),
        Span::styled(format!("  [{}]", screen.output), Style::default().fg(MUTED)),
    ]));
    frame.render_widget(footer, rows[3]);

    if screen.player.prompt_visible {
        draw_prompt(frame, area);
    }
}

fn draw_tabs(frame: &mut Frame, area: Rect, page: Page) {
    let titles: Vec<Line> = Page::ALL.iter().map(|page| Line::from(page.title())).collect();
    let tabs = Tabs::new(titles)
        .select(page.index())
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(BORDER))
                .title(APP_TITLE),
        )
        .style(Style::default().fg(MUTED))
        .highlight_style(Style::default().fg(ACCENT).add_modifier(Modifier::BOLD));
    frame.render_widget(tabs, area);
}

fn draw_page(frame: &mut Frame, area: Rect, page: Page) {
    let body = Paragraph::new(vec![
        Line::from(Span::styled(page.route(), Style::default().fg(MUTED))),
        Line::from(""),
        Line::from(Span::styled(page.blurb(), Style::default().fg(TEXT))),
        Line::from(""),
        Line::from(Span::styled(KEY_HELP, Style::default().fg(MUTED))),
    ])
    .wrap(Wrap { trim: true })
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(BORDER))
            .title(format!(" {} ", page.title())),
    );
    frame.render_widget(body, area);
}

fn draw_player(frame: &mut Frame, area: Rect, player: &PlayerView) {
    let width = area.width.min(56);
    let area = Rect::new(area.x, area.y, width, area.height);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(BORDER))
        .style(Style::default().bg(PANEL_BG))
        .title(format!(" {}/{} ", player.track_index + 1, player.track_count));
    let inner = block.inner(area);
    frame.render_widget(Clear, area);
    frame.render_widget(block, area);

    let rows = Layout::vertical([
        Constraint::Length(1),
        Constraint::Length(1),
        Constraint::Length(1),
        Constraint::Length(1),
        Constraint::Min(0),
    ])
    .split(inner);

    let title = Paragraph::new(Line::from(vec![
        Span::styled(
            player.track.title.as_str(),
            Style::default().fg(TEXT).add_modifier(Modifier::BOLD),
        ),
        Span::styled(format!("  {}", player.track.artist), Style::default().fg(MUTED)),
        Span::styled(
            cover_label(&player.track.cover_image)
                .map(|name| format!("  [{name}]"))
                .unwrap_or_default(),
            Style::default().fg(BORDER),
        ),
    ]));
    frame.render_widget(title, rows[0]);

    let duration = player.duration.unwrap_or(0.0);
    let ratio = if duration > 0.0 {
        (player.current_time / duration).clamp(0.0, 1.0)
    } else {
        0.0
    };
    let progress = Gauge::default()
        .gauge_style(Style::default().fg(ACCENT).bg(BG))
        .ratio(ratio)
        .label(format!(
            "{} / {}",
            format_clock(player.current_time),
            player
                .duration
                .map(format_clock)
                .unwrap_or_else(|| String::from("00:00"))
        ));
    frame.render_widget(progress, rows[1]);

    let volume = if player.is_muted {
        String::from("muted")
    } else {
        format!("vol {}%", (player.volume * 100.0).round() as u16)
    };
    let controls = Paragraph::new(Line::from(vec![
        Span::styled("|<  ", Style::default().fg(MUTED)),
        Span::styled(
            if player.is_playing { "||" } else { "|>" },
            Style::default().fg(ACCENT).add_modifier(Modifier::BOLD),
        ),
        Span::styled("  >|", Style::default().fg(MUTED)),
        Span::styled(format!("    {volume}"), Style::default().fg(MUTED)),
    ]));
    frame.render_widget(controls, rows[2]);

    if let Some(error) = &player.load_error {
        let error = Paragraph::new(Span::styled(
            format!("unavailable: {error}"),
            Style::default().fg(ALERT),
        ));
        frame.render_widget(error, rows[3]);
    }
}

/// File name of the album cover, shown beside the artist.
pub fn cover_label(cover_image: &str) -> Option<&str> {
    Path::new(cover_image.trim())
        .file_name()
        .and_then(|name| name.to_str())
        .filter(|name| !name.is_empty())
}

fn draw_reopen(frame: &mut Frame, area: Rect) {
    let button = Paragraph::new(Span::styled(
        " o: music ",
        Style::default().fg(BG).bg(ACCENT),
    ));
    let area = Rect::new(area.x, area.bottom().saturating_sub(1), 10.min(area.width), 1);
    frame.render_widget(button, area);
}

fn draw_prompt(frame: &mut Frame, area: Rect) {
    let popup = centered_rect(area, 48, 7);
    frame.render_widget(Clear, popup);
    let prompt = Paragraph::new(vec![
        Line::from(Span::styled(
            "Enable music?",
            Style::default().fg(TEXT).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(Span::styled(
            "Would you like background music while you browse?",
            Style::default().fg(MUTED),
        )),
        Line::from(""),
        Line::from(vec![
            Span::styled(" n: No thanks ", Style::default().fg(TEXT).bg(PANEL_BG)),
            Span::raw("   "),
            Span::styled(" y: Yes ", Style::default().fg(BG).bg(ACCENT)),
        ]),
    ])
    .wrap(Wrap { trim: true })
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(ACCENT))
            .style(Style::default().bg(BG)),
    );
    frame.render_widget(prompt, popup);
}

fn centered_rect(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect::new(
        area.x + (area.width - width) / 2,
        area.y + (area.height - height) / 2,
        width,
        height,
    )
}
