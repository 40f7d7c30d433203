//! Map and status rendering.

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use rlg_core::world::WorldState;
use rlg_core::{COLNO, LIGHT_RADIUS, ROWNO, S_PLAYER, S_ROCK};

/// Map a description-file color name to a terminal color; the first listed
/// color wins.
pub fn color_for(colors: &[String]) -> Color {
    match colors.first().map(String::as_str) {
        Some("RED") => Color::Red,
        Some("GREEN") => Color::Green,
        Some("BLUE") => Color::Blue,
        Some("CYAN") => Color::Cyan,
        Some("MAGENTA") => Color::Magenta,
        Some("YELLOW") => Color::Yellow,
        Some("BLACK") => Color::DarkGray,
        _ => Color::White,
    }
}

/// Draw the whole screen: message line, map, status line
pub fn draw(frame: &mut Frame, world: &WorldState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(ROWNO as u16),
            Constraint::Min(1),
        ])
        .split(frame.area());

    draw_messages(frame, chunks[0], world);
    draw_map(frame, chunks[1], world);
    draw_status(frame, chunks[2], world);
}

fn draw_messages(frame: &mut Frame, area: Rect, world: &WorldState) {
    let text = world.messages.join("  ");
    frame.render_widget(Paragraph::new(text), area);
}

fn draw_status(frame: &mut Frame, area: Rect, world: &WorldState) {
    let player = world.player();
    let status = format!(
        "HP {}  speed {}  monsters {}  {}",
        player.hp,
        player.speed,
        world.living_monsters(),
        if world.fog_enabled { "fog" } else { "no fog" },
    );
    frame.render_widget(
        Paragraph::new(status).style(Style::default().fg(Color::Gray)),
        area,
    );
}

fn draw_map(frame: &mut Frame, area: Rect, world: &WorldState) {
    let (px, py) = world.player().pos();
    let mut lines = Vec::with_capacity(ROWNO);

    for y in 0..ROWNO {
        let mut spans = Vec::with_capacity(COLNO);
        for x in 0..COLNO {
            let visible = !world.fog_enabled
                || ((x as i32 - px).abs() <= LIGHT_RADIUS && (y as i32 - py).abs() <= LIGHT_RADIUS);

            let span = if visible {
                live_cell_span(world, x, y)
            } else {
                // Remembered terrain, dimmed
                Span::styled(
                    world.seen[y][x].to_string(),
                    Style::default().fg(Color::DarkGray),
                )
            };
            spans.push(span);
        }
        lines.push(Line::from(spans));
    }

    frame.render_widget(Paragraph::new(lines), area);
}

/// The glyph and color for a currently-visible cell: the player, then a
/// monster, then an object, then bare terrain.
fn live_cell_span(world: &WorldState, x: usize, y: usize) -> Span<'static> {
    let cell = world.dungeon.live_at(x, y);

    if cell == S_PLAYER {
        return Span::styled(
            S_PLAYER.to_string(),
            Style::default().fg(Color::White).bg(Color::Blue),
        );
    }

    if let Some(idx) = world.monster_at(x as i32, y as i32) {
        let monster = &world.agents[idx];
        return Span::styled(
            monster.glyph.to_string(),
            Style::default().fg(color_for(&monster.colors)),
        );
    }

    if let Some(idx) = world.object_index_at(x as i32, y as i32) {
        let object = &world.objects[idx];
        return Span::styled(
            object.symbol.to_string(),
            Style::default().fg(color_for(&object.colors)),
        );
    }

    let style = if cell == S_ROCK {
        Style::default()
    } else {
        Style::default().fg(Color::White)
    };
    Span::styled(cell.to_string(), style)
}
