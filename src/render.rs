//! Drawing, one function per screen. Menu rows double as tap targets.

use ratzilla::ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratzilla::ratatui::style::{Color, Modifier, Style};
use ratzilla::ratatui::text::{Line, Span};
use ratzilla::ratatui::widgets::{Block, Borders, Gauge, List, ListItem, Paragraph, Wrap};
use ratzilla::ratatui::Frame;

use crate::catalog::{self, Price, ALL_ITEMS};
use crate::challenges::{Challenge, ChallengeKind, Outcome};
use crate::input::{is_narrow_layout, TapTargets};
use crate::leaderboard::{self, TOP};
use crate::profile::{BoosterId, SkinId};
use crate::router::{App, Screen};
use crate::session::Phase;

/// One menu row: key, label, label style.
type MenuRow = (char, String, Style);

pub fn draw(f: &mut Frame, app: &App, targets: &mut TapTargets) {
    let size = f.area();
    targets.reset(size.width, size.height);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(10),
            Constraint::Length(3),
        ])
        .split(size);

    render_title(f, app, chunks[0]);

    // Narrow: screen above the log. Wide: side by side.
    let body = if is_narrow_layout(size.width) {
        Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(8), Constraint::Length(6)])
            .split(chunks[1])
    } else {
        Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
            .split(chunks[1])
    };

    match app.screen() {
        Screen::Home => render_home(f, app, body[0], targets),
        Screen::Game => render_game(f, app, body[0], targets),
        Screen::Fail => render_fail(f, app, body[0], targets),
        Screen::Shop => render_shop(f, app, body[0], targets),
        Screen::Skins => render_skins(f, app, body[0], targets),
        Screen::Leaderboard => render_leaderboard(f, app, body[0]),
    }
    render_notices(f, app, body[1]);
    render_help(f, app, chunks[2], targets);
}

fn render_title(f: &mut Frame, app: &App, area: Rect) {
    let mut spans = vec![Span::styled(
        "🔥 RAGE TAP 🔥",
        Style::default().fg(Color::LightRed).add_modifier(Modifier::BOLD),
    )];
    if app.profile().is_vip {
        spans.push(Span::styled("  🌟 VIP", Style::default().fg(Color::Yellow)));
    }
    let title = Paragraph::new(Line::from(spans))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::DarkGray)),
        )
        .alignment(Alignment::Center);
    f.render_widget(title, area);
}

/// Bordered list of `[K] label` rows, each row tapping as its key.
fn render_menu(
    f: &mut Frame,
    area: Rect,
    title: &str,
    color: Color,
    rows: &[MenuRow],
    targets: &mut TapTargets,
) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(color))
        .title(format!(" {title} "));
    let inner = block.inner(area);

    let items: Vec<ListItem> = rows
        .iter()
        .map(|(key, label, style)| {
            ListItem::new(Line::from(vec![
                Span::styled(
                    format!(" [{}] ", key.to_ascii_uppercase()),
                    Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
                ),
                Span::styled(label.as_str(), *style),
            ]))
        })
        .collect();
    f.render_widget(List::new(items).block(block), area);

    for (i, (key, _, _)) in rows.iter().enumerate() {
        targets.add_row(inner, inner.y + i as u16, *key);
    }
}

fn plain() -> Style {
    Style::default().fg(Color::White)
}

fn dim() -> Style {
    Style::default().fg(Color::DarkGray)
}

fn render_home(f: &mut Frame, app: &App, area: Rect, targets: &mut TapTargets) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(4), Constraint::Min(6)])
        .split(area);

    let p = app.profile();
    let skin = catalog::skin_info(p.current_skin);
    let stats = vec![
        Line::from(format!("💰 {} coins   🏆 Best: {}", p.coins, p.high_score)),
        Line::from(format!("{} {}", skin.emoji, skin.name)),
    ];
    f.render_widget(
        Paragraph::new(stats).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Green))
                .title(" Player "),
        ),
        chunks[0],
    );

    let rows = [
        ('p', "▶ Play".to_string(), plain().add_modifier(Modifier::BOLD)),
        ('s', "🛒 Shop".to_string(), plain()),
        ('k', "👕 Skins".to_string(), plain()),
        ('l', "🏆 Leaderboard".to_string(), plain()),
    ];
    render_menu(f, chunks[1], "Menu", Color::Yellow, &rows, targets);
}

fn render_game(f: &mut Frame, app: &App, area: Rect, targets: &mut TapTargets) {
    let Some(session) = app.session() else {
        return;
    };
    let p = app.profile();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(3),
            Constraint::Min(6),
            Constraint::Length(4),
        ])
        .split(area);

    let status = format!(
        "{}  Score {}  Level {}  💰 {}",
        "❤️".repeat(p.lives as usize),
        p.score,
        p.level,
        p.coins
    );
    f.render_widget(Paragraph::new(status), chunks[0]);

    let ratio = f64::from(session.timer()) / f64::from(session.countdown_start().max(1));
    let color = if app.is_resolving() {
        Color::DarkGray
    } else if ratio > 0.5 {
        Color::Green
    } else if ratio > 0.25 {
        Color::Yellow
    } else {
        Color::Red
    };
    let gauge = Gauge::default()
        .block(Block::default().borders(Borders::ALL).title(" Time "))
        .gauge_style(Style::default().fg(color))
        .ratio(ratio.clamp(0.0, 1.0))
        .label(format!("⏱ {}", session.timer()));
    f.render_widget(gauge, chunks[1]);

    render_challenge(f, session.phase(), session.challenge(), chunks[2], targets);

    let rows = [
        (
            'e',
            format!("❤️ Extra Life ×{}", p.booster_count(BoosterId::ExtraLife)),
            plain(),
        ),
        (
            'a',
            format!("⚡ Auto Win ×{}", p.booster_count(BoosterId::AutoWin)),
            plain(),
        ),
    ];
    render_menu(f, chunks[3], "Boosters", Color::Magenta, &rows, targets);
}

fn render_challenge(
    f: &mut Frame,
    phase: Phase,
    challenge: Option<&dyn Challenge>,
    area: Rect,
    targets: &mut TapTargets,
) {
    let banner = |text: &'static str, color: Color| {
        Paragraph::new(Line::from(Span::styled(
            text,
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        )))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL))
    };

    match (phase, challenge) {
        (Phase::Active, Some(c)) => {
            let kind = c.kind();
            let block = Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan))
                .title(format!(" {} {} ", kind.emoji(), kind.title()))
                .title_bottom(Line::from(format!(" {} ", c.controls())).style(dim()));
            let inner = block.inner(area);
            let lines = c.lines();
            // No wrapping: line i must stay on row i for the option targets.
            let text: Vec<Line> = lines.iter().map(|l| Line::from(l.as_str())).collect();
            f.render_widget(Paragraph::new(text).block(block), area);
            add_challenge_targets(kind, inner, &lines, targets);
        }
        (Phase::Resolving(Outcome::Success), _) => {
            f.render_widget(banner("✅ SUCCESS!", Color::Green), area);
        }
        (Phase::Resolving(Outcome::Fail), _) => {
            f.render_widget(banner("❌ FAILED!", Color::Red), area);
        }
        (Phase::GameOver, _) => f.render_widget(banner("💀 GAME OVER", Color::Red), area),
        _ => f.render_widget(banner("Get ready...", Color::Gray), area),
    }
}

enum TapLayout {
    /// Anywhere taps.
    Whole,
    /// Left half goes left, right half goes right.
    Halves,
    /// `[n]` markers in the text are the buttons.
    Options,
}

fn tap_layout(kind: ChallengeKind) -> TapLayout {
    match kind {
        ChallengeKind::Laddoo | ChallengeKind::Cracker | ChallengeKind::Proposal => TapLayout::Whole,
        ChallengeKind::Mosquito | ChallengeKind::Chai | ChallengeKind::Aunty => TapLayout::Halves,
        ChallengeKind::Chappal
        | ChallengeKind::Money
        | ChallengeKind::WhatsApp
        | ChallengeKind::Traffic => TapLayout::Options,
    }
}

/// Digits of every `[n]` marker in `line`, in order.
fn option_keys(line: &str) -> Vec<char> {
    let chars: Vec<char> = line.chars().collect();
    chars
        .windows(3)
        .filter(|w| w[0] == '[' && w[2] == ']' && matches!(w[1], '1'..='9'))
        .map(|w| w[1])
        .collect()
}

fn add_challenge_targets(kind: ChallengeKind, inner: Rect, lines: &[String], targets: &mut TapTargets) {
    match tap_layout(kind) {
        TapLayout::Whole => targets.add(inner, ' '),
        TapLayout::Halves => {
            let half = inner.width / 2;
            targets.add(Rect::new(inner.x, inner.y, half, inner.height), 'h');
            targets.add(
                Rect::new(inner.x + half, inner.y, inner.width - half, inner.height),
                'l',
            );
        }
        TapLayout::Options => {
            for (i, line) in lines.iter().enumerate() {
                let row = inner.y + i as u16;
                if row >= inner.y + inner.height {
                    break;
                }
                let keys = option_keys(line);
                if keys.is_empty() {
                    continue;
                }
                // Several options on one row share it evenly.
                let cell = inner.width / keys.len() as u16;
                for (j, key) in keys.iter().enumerate() {
                    let x = inner.x + cell * j as u16;
                    let width = if j + 1 == keys.len() {
                        inner.x + inner.width - x
                    } else {
                        cell
                    };
                    targets.add(Rect::new(x, row, width, 1), *key);
                }
            }
        }
    }
}

fn render_fail(f: &mut Frame, app: &App, area: Rect, targets: &mut TapTargets) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(6), Constraint::Min(5)])
        .split(area);

    let p = app.profile();
    let summary = vec![
        Line::from(Span::styled(
            "💀 GAME OVER",
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        )),
        Line::from(format!("Score: {}", p.score)),
        Line::from(format!("High score: {}", p.high_score)),
        Line::from(format!("Rank: #{}", leaderboard::player_rank(p.high_score))),
    ];
    f.render_widget(
        Paragraph::new(summary)
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL)),
        chunks[0],
    );

    let continue_label = if app.awaiting_continue() {
        ("📺 Waiting for the ad...".to_string(), dim())
    } else {
        ("📺 Watch ad to continue".to_string(), plain())
    };
    let rows = [
        ('r', "🔄 Play Again".to_string(), plain().add_modifier(Modifier::BOLD)),
        ('w', continue_label.0, continue_label.1),
        ('b', "🏠 Home".to_string(), plain()),
    ];
    render_menu(f, chunks[1], "What now?", Color::Yellow, &rows, targets);
}

fn price_label(price: Price, payments_enabled: bool) -> (String, Style) {
    match price {
        Price::Coins(n) => (format!("{n} coins"), plain()),
        Price::Real { rupees, .. } if payments_enabled => (format!("₹{rupees}"), plain()),
        Price::Real { rupees, .. } => (format!("₹{rupees} (unavailable)"), dim()),
    }
}

fn render_shop(f: &mut Frame, app: &App, area: Rect, targets: &mut TapTargets) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(7)])
        .split(area);

    let p = app.profile();
    let header = format!(
        "💰 {}   ❤️ ×{}   ⚡ ×{}",
        p.coins,
        p.booster_count(BoosterId::ExtraLife),
        p.booster_count(BoosterId::AutoWin)
    );
    f.render_widget(
        Paragraph::new(header).block(Block::default().borders(Borders::ALL).title(" Wallet ")),
        chunks[0],
    );

    let mut rows: Vec<MenuRow> = ALL_ITEMS
        .iter()
        .enumerate()
        .map(|(i, id)| {
            let item = catalog::item(*id);
            let (price, style) = price_label(item.price, app.payments_enabled());
            let key = char::from(b'1' + i as u8);
            (key, format!("{}: {} · {}", item.name, price, item.description), style)
        })
        .collect();
    rows.push((
        'w',
        format!("📺 Watch ad: +{} coins, +1 life", crate::economy::AD_REWARD_COINS),
        plain(),
    ));
    render_menu(f, chunks[1], "Shop", Color::Green, &rows, targets);
}

fn render_skins(f: &mut Frame, app: &App, area: Rect, targets: &mut TapTargets) {
    let p = app.profile();
    let rows: Vec<MenuRow> = SkinId::all()
        .iter()
        .enumerate()
        .map(|(i, skin)| {
            let info = catalog::skin_info(*skin);
            let (state, style) = if p.current_skin == *skin {
                ("✓ wearing".to_string(), Style::default().fg(Color::Green))
            } else if p.has_skin(*skin) {
                ("owned".to_string(), plain())
            } else {
                (format!("{} coins", info.price), dim())
            };
            let key = char::from(b'1' + i as u8);
            (key, format!("{} {} · {} · {}", info.emoji, info.name, state, info.description), style)
        })
        .collect();
    render_menu(f, area, "Skins", Color::Magenta, &rows, targets);
}

fn render_leaderboard(f: &mut Frame, app: &App, area: Rect) {
    let high = app.profile().high_score;
    let rank = leaderboard::player_rank(high);

    let mut lines: Vec<Line> = TOP
        .iter()
        .enumerate()
        .map(|(i, e)| {
            let style = match i {
                0 => Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
                1 | 2 => Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
                _ => Style::default().fg(Color::Gray),
            };
            Line::from(Span::styled(
                format!("#{:<2} {} {:<14} {:>5}", i + 1, e.avatar, e.name, e.score),
                style,
            ))
        })
        .collect();
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        format!("You: #{rank} with {high}"),
        Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
    )));

    f.render_widget(
        Paragraph::new(lines).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Yellow))
                .title(" 🏆 Leaderboard "),
        ),
        area,
    );
}

fn render_notices(f: &mut Frame, app: &App, area: Rect) {
    let notices = app.notices();
    let visible = area.height.saturating_sub(2) as usize;
    let start = notices.len().saturating_sub(visible);

    let lines: Vec<Line> = notices[start..]
        .iter()
        .map(|n| {
            let style = if n.is_important {
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::Gray)
            };
            Line::from(Span::styled(n.text.as_str(), style))
        })
        .collect();

    let log = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Blue))
                .title(" Log "),
        )
        .wrap(Wrap { trim: false });
    f.render_widget(log, area);
}

fn render_help(f: &mut Frame, app: &App, area: Rect, targets: &mut TapTargets) {
    let (text, key) = match app.screen() {
        Screen::Home => ("P play · S shop · K skins · L leaderboard", Some('p')),
        Screen::Game => ("Space tap · 1-6 pick · ←/→ move · E/A boosters · Esc home", None),
        Screen::Fail => ("R play again · W continue · B home", Some('r')),
        Screen::Shop => ("1-4 buy · W watch ad · B back", Some('b')),
        Screen::Skins => ("1-8 select · B back", Some('b')),
        Screen::Leaderboard => ("B back", Some('b')),
    };
    let help = Paragraph::new(Line::from(Span::styled(text, dim())))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::DarkGray)),
        )
        .alignment(Alignment::Center);
    f.render_widget(help, area);

    if let Some(key) = key {
        targets.add(area, key);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ads::InstantAds;
    use crate::challenges::Dispatcher;
    use crate::config::GameConfig;
    use crate::gateway::OfflineGateway;
    use crate::save::{InMemoryStorage, SaveSlot};
    use ratzilla::ratatui::backend::TestBackend;
    use ratzilla::ratatui::Terminal;

    fn app(kinds: Vec<ChallengeKind>) -> App {
        App::new(
            SaveSlot::open(Box::new(InMemoryStorage::new())),
            GameConfig::default(),
            Dispatcher::scripted(kinds),
            Box::new(OfflineGateway::new()),
            Box::new(InstantAds::new()),
        )
    }

    fn draw_at(app: &App, width: u16, height: u16) -> (TapTargets, String) {
        let mut terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
        let mut targets = TapTargets::new();
        terminal.draw(|f| draw(f, app, &mut targets)).unwrap();
        let text: String = terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect();
        (targets, text)
    }

    fn keys(targets: &TapTargets) -> Vec<char> {
        targets.targets.iter().map(|t| t.key).collect()
    }

    #[test]
    fn home_menu_rows_are_tappable() {
        let a = app(vec![ChallengeKind::Laddoo]);
        let (targets, text) = draw_at(&a, 100, 30);
        assert!(text.contains("Leaderboard"));
        for key in ['p', 's', 'k', 'l'] {
            let t = targets.targets.iter().find(|t| t.key == key).unwrap();
            assert_eq!(targets.hit(t.rect.x, t.rect.y), Some(key));
        }
    }

    #[test]
    fn option_challenge_registers_each_option() {
        let mut a = app(vec![ChallengeKind::Chappal]);
        a.handle_key('p');
        a.tick();
        let (targets, _) = draw_at(&a, 100, 40);
        let keys = keys(&targets);
        for d in '1'..='6' {
            assert!(keys.contains(&d), "missing {d}");
        }
        assert!(!keys.contains(&' '));
    }

    #[test]
    fn swipe_challenge_splits_left_and_right() {
        let mut a = app(vec![ChallengeKind::Mosquito]);
        a.handle_key('p');
        a.tick();
        let (targets, _) = draw_at(&a, 100, 40);
        let keys = keys(&targets);
        assert!(keys.contains(&'h'));
        assert!(keys.contains(&'l'));
    }

    #[test]
    fn tap_challenge_covers_the_panel() {
        let mut a = app(vec![ChallengeKind::Proposal]);
        a.handle_key('p');
        a.tick();
        let (targets, text) = draw_at(&a, 100, 40);
        assert!(keys(&targets).contains(&' '));
        assert!(text.contains("Time"));
    }

    #[test]
    fn narrow_layout_still_draws_the_log() {
        let mut a = app(vec![ChallengeKind::Laddoo]);
        a.add_notice("hello there", true);
        let (_, text) = draw_at(&a, 40, 40);
        assert!(text.contains("hello there"));
    }

    #[test]
    fn shop_marks_real_money_unavailable_without_key() {
        let mut a = app(vec![ChallengeKind::Laddoo]);
        a.handle_key('s');
        let (targets, text) = draw_at(&a, 140, 30);
        assert!(text.contains("unavailable"));
        let keys = keys(&targets);
        assert!(keys.contains(&'4'));
        assert!(keys.contains(&'w'));
    }

    #[test]
    fn option_marker_parsing() {
        assert_eq!(option_keys("[1]🟢✓  [2]🔴   [3]🟡 "), vec!['1', '2', '3']);
        assert_eq!(option_keys("[Space] burst"), Vec::<char>::new());
        assert_eq!(option_keys("no markers"), Vec::<char>::new());
    }
}
