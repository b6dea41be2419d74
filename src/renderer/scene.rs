//! Scene assembly: game state in, draw commands out
//!
//! Paint order: background, terrain, enemies, player (all in world space),
//! then the HUD and whichever overlay is open in screen space.

use std::f32::consts::{PI, TAU};

use glam::Vec2;

use super::shapes::lobed_ring;
use super::{Color, DrawCommand, Frame, TextAlign, block_color, palette};
use crate::consts::*;
use crate::emotes::{Emote, EmoteWheel};
use crate::shop::{Shop, ShopLayout};
use crate::sim::{Digger, GameState};

/// Ring spin per simulation tick
const RING_STEP: f32 = TAU / 180.0;
const RING_LOBES: u32 = 8;
const RING_SAMPLES: u32 = 6;
const BAR_HEIGHT: f32 = 5.0;

/// Overlay state owned by the session rather than the simulation
#[derive(Debug, Clone, Copy)]
pub struct UiView<'a> {
    pub shop: &'a Shop,
    pub wheel: &'a EmoteWheel,
}

/// Build the frame for the current state. Reads only.
pub fn render(state: &GameState, ui: &UiView<'_>) -> Frame {
    let camera = &state.camera;
    let mut frame = Frame::new(camera.viewport);
    frame.push(DrawCommand::Clear { color: palette::BLACK });

    frame.push(DrawCommand::PushTransform {
        scale: camera.zoom,
        offset: camera.pos,
    });
    draw_terrain(&mut frame, state);

    let view = camera.view_rect();
    let rotation = (state.time_ticks % 180) as f32 * RING_STEP;
    for enemy in &state.enemies {
        let body = &enemy.body;
        if !view.touches_circle(body.pos, body.size) {
            continue;
        }
        draw_digger(&mut frame, body, rotation);
        frame.push(DrawCommand::StrokeCircle {
            center: body.pos,
            radius: body.size / 2.0 + 2.0,
            width: 2.0,
            color: palette::RED,
        });
    }
    draw_digger(&mut frame, &state.player.body, rotation);
    frame.push(DrawCommand::PopTransform);

    frame.text(
        Vec2::new(10.0, 22.0),
        format!("Level: {}", state.player.body.level()),
        24.0,
        palette::WHITE,
        TextAlign::Left,
    );

    if ui.shop.is_open() {
        draw_shop(&mut frame, ui.shop, state.player.body.gold);
    } else if ui.wheel.is_open() {
        let owned: Vec<Emote> = state.player.owned_emotes().iter().copied().collect();
        draw_emote_wheel(&mut frame, ui.wheel, &owned);
    }

    frame
}

/// Visible cells, merging vertical runs of the same color into one rect
fn draw_terrain(frame: &mut Frame, state: &GameState) {
    let terrain = &state.terrain;
    let cells = state.camera.view_rect().cells().intersect(&terrain.bounds());
    if cells.is_empty() {
        return;
    }

    for cx in cells.x0..cells.x1 {
        let mut run: Option<(i64, i64, Color)> = None;
        for cy in cells.y0..cells.y1 {
            let color = terrain.cell(cx, cy).map(block_color);
            match (run, color) {
                (Some((start, _, current)), Some(color)) if current == color => {
                    run = Some((start, cy + 1, current));
                }
                (previous, color) => {
                    if let Some(finished) = previous {
                        push_column_run(frame, cx, finished);
                    }
                    run = color.map(|color| (cy, cy + 1, color));
                }
            }
        }
        if let Some(finished) = run {
            push_column_run(frame, cx, finished);
        }
    }
}

fn push_column_run(frame: &mut Frame, cx: i64, (start, end, color): (i64, i64, Color)) {
    frame.fill_rect(
        Vec2::new(cx as f32 * CELL_SIZE, start as f32 * CELL_SIZE),
        Vec2::new(CELL_SIZE, (end - start) as f32 * CELL_SIZE),
        color,
    );
}

/// Ring, body, face, bars, labels and emote of one digger
fn draw_digger(frame: &mut Frame, digger: &Digger, rotation: f32) {
    let (pos, size) = (digger.pos, digger.size);

    let ring_radius = size / 2.0 + size / 6.0;
    frame.push(DrawCommand::FillPolygon {
        points: lobed_ring(pos, ring_radius, size / 4.0, RING_LOBES, rotation, RING_SAMPLES),
        color: palette::BLACK,
        outline: Some((palette::BLACK, 5.0)),
    });
    frame.push(DrawCommand::FillCircle {
        center: pos,
        radius: size / 2.0,
        color: palette::GRAY,
    });

    // Eyes follow the facing direction
    let eye = Vec2::new(size / 6.0, size / 4.0);
    let pupil = eye * 0.6;
    let look = digger.facing * (eye.x - pupil.x) / 2.0;
    for side in [-1.0, 1.0] {
        let eye_center = pos + Vec2::new(side * size / 6.0, 0.0);
        frame.fill_rect(eye_center - eye / 2.0, eye, palette::WHITE);
        frame.fill_rect(eye_center - pupil / 2.0 + look, pupil, palette::BLACK);
    }

    frame.push(DrawCommand::StrokeArc {
        center: pos + Vec2::new(0.0, size / 8.0),
        radius: size / 5.0,
        start: 0.2 * PI,
        end: 0.8 * PI,
        width: 2.0,
        color: palette::BLACK,
    });

    // Health (green) then shield (blue) over a red track, XP bar above
    let bar_width = size * 2.0;
    let top = pos.y - size / 2.0;
    let left = pos.x - bar_width / 2.0;
    let health = ratio(digger.health, digger.max_health());
    let shield = ratio(digger.shield, digger.max_shield());
    frame.fill_rect(Vec2::new(left, top - 10.0), Vec2::new(bar_width, BAR_HEIGHT), palette::RED);
    frame.fill_rect(Vec2::new(left, top - 10.0), Vec2::new(bar_width * health, BAR_HEIGHT), palette::GREEN);
    frame.fill_rect(
        Vec2::new(left + bar_width * health, top - 10.0),
        Vec2::new(bar_width * shield, BAR_HEIGHT),
        palette::BLUE,
    );
    frame.fill_rect(Vec2::new(left, top - 25.0), Vec2::new(bar_width, BAR_HEIGHT), palette::XP_TRACK);
    frame.fill_rect(
        Vec2::new(left, top - 25.0),
        Vec2::new(bar_width * digger.progression.xp_fraction(), BAR_HEIGHT),
        palette::YELLOW,
    );

    let label_size = size / 3.0;
    frame.text(
        Vec2::new(pos.x - size / 2.0, top - 20.0),
        digger.score.to_string(),
        label_size,
        palette::WHITE,
        TextAlign::Center,
    );
    frame.text(
        Vec2::new(pos.x + size / 2.0, top - 20.0),
        digger.gold.to_string(),
        label_size,
        palette::GOLD,
        TextAlign::Center,
    );

    if let Some(active) = digger.emote {
        frame.text(
            Vec2::new(pos.x, pos.y - size * 1.5),
            active.emote.glyph(),
            size * 1.5,
            palette::WHITE,
            TextAlign::Center,
        );
    }
}

fn ratio(value: u32, max: u32) -> f32 {
    if max == 0 {
        0.0
    } else {
        (value as f32 / max as f32).clamp(0.0, 1.0)
    }
}

fn draw_shop(frame: &mut Frame, shop: &Shop, gold: u64) {
    let layout = ShopLayout::centered(frame.viewport);
    let panel_center_x = layout.origin.x + ShopLayout::PANEL_WIDTH / 2.0;
    frame.fill_rect(layout.origin, ShopLayout::size(), palette::SHOP_PANEL);
    frame.text(
        Vec2::new(panel_center_x, layout.origin.y + 30.0),
        "Emote Shop",
        24.0,
        palette::WHITE,
        TextAlign::Center,
    );
    frame.text(
        Vec2::new(panel_center_x, layout.origin.y + 60.0),
        format!("Gold: {gold}"),
        18.0,
        palette::GOLD,
        TextAlign::Center,
    );

    let slot = ShopLayout::SLOT_SIZE;
    for (index, emote) in shop.slots().iter().enumerate() {
        let min = layout.slot_origin(index);
        frame.fill_rect(min, Vec2::splat(slot), palette::SHOP_SLOT);
        frame.text(
            min + Vec2::new(slot / 2.0, slot * 0.4),
            emote.glyph(),
            slot * 0.5,
            palette::WHITE,
            TextAlign::Center,
        );
        frame.text(
            min + Vec2::new(slot / 2.0, slot - 6.0),
            EMOTE_PRICE.to_string(),
            12.0,
            palette::GOLD,
            TextAlign::Center,
        );
    }
}

fn draw_emote_wheel(frame: &mut Frame, wheel: &EmoteWheel, owned: &[Emote]) {
    let center = frame.viewport / 2.0;
    frame.push(DrawCommand::FillCircle {
        center,
        radius: EmoteWheel::RADIUS,
        color: palette::WHEEL,
    });
    for (index, &emote) in owned.iter().enumerate() {
        let color = if wheel.selected() == Some(emote) {
            palette::YELLOW
        } else {
            palette::WHITE
        };
        frame.text(
            EmoteWheel::slot_position(index, center),
            emote.glyph(),
            20.0,
            color,
            TextAlign::Center,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::Profile;
    use crate::sim::{BlockKind, WorldConfig};

    fn small_state() -> GameState {
        let config = WorldConfig {
            width: 1000,
            height: 1000,
            initial_enemies: 0,
            max_enemies: 0,
            pregenerate_terrain: false,
            ..Default::default()
        };
        GameState::new(&config, 4, &Profile::default(), Vec2::new(400.0, 300.0))
    }

    fn texts(frame: &Frame) -> Vec<&str> {
        frame
            .commands
            .iter()
            .filter_map(|c| match c {
                DrawCommand::Text { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_frame_structure() {
        let state = small_state();
        let shop = Shop::new(state.player.owned_emotes(), 1);
        let wheel = EmoteWheel::default();
        let frame = render(&state, &UiView { shop: &shop, wheel: &wheel });

        assert_eq!(frame.viewport, Vec2::new(400.0, 300.0));
        assert_eq!(frame.commands[0], DrawCommand::Clear { color: palette::BLACK });
        assert!(matches!(frame.commands[1], DrawCommand::PushTransform { .. }));
        let pops = frame
            .commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::PopTransform))
            .count();
        assert_eq!(pops, 1);
        assert!(texts(&frame).contains(&"Level: 1"));
    }

    #[test]
    fn test_uniform_columns_merge() {
        let state = small_state();
        let shop = Shop::new(state.player.owned_emotes(), 1);
        let wheel = EmoteWheel::default();
        let frame = render(&state, &UiView { shop: &shop, wheel: &wheel });

        // All-dirt view: one rect per visible column
        let cells = state.camera.view_rect().cells();
        let dirt_columns = frame
            .commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::FillRect { color, .. } if *color == palette::DIRT))
            .count();
        assert_eq!(dirt_columns as i64, cells.x1 - cells.x0);
    }

    #[test]
    fn test_dug_cell_splits_column() {
        let mut state = small_state();
        let (cx, cy) = (50, 50);
        state.terrain.set_cell(cx, cy + 1, crate::sim::Block::new(BlockKind::Lava));
        state.terrain.remove_cell(cx, cy);
        let shop = Shop::new(state.player.owned_emotes(), 1);
        let wheel = EmoteWheel::default();
        let frame = render(&state, &UiView { shop: &shop, wheel: &wheel });

        let column_x = cx as f32 * CELL_SIZE;
        let column: Vec<Color> = frame
            .commands
            .iter()
            .filter_map(|c| match c {
                DrawCommand::FillRect { min, size, color } if min.x == column_x && size.x == CELL_SIZE => Some(*color),
                _ => None,
            })
            .collect();
        assert_eq!(column, vec![palette::DIRT, palette::DUG, palette::LAVA, palette::DIRT]);
    }

    #[test]
    fn test_render_is_pure() {
        let state = small_state();
        let shop = Shop::new(state.player.owned_emotes(), 1);
        let wheel = EmoteWheel::default();
        let ui = UiView { shop: &shop, wheel: &wheel };
        let generated = state.terrain.generated_cells();
        assert_eq!(render(&state, &ui), render(&state, &ui));
        assert_eq!(state.terrain.generated_cells(), generated);
    }

    #[test]
    fn test_overlays() {
        let state = small_state();
        let owned = state.player.owned_emotes().clone();
        let mut shop = Shop::new(&owned, 1);
        let mut wheel = EmoteWheel::default();
        wheel.toggle();

        let frame = render(&state, &UiView { shop: &shop, wheel: &wheel });
        assert!(texts(&frame).contains(&Emote::Happy.glyph()));
        assert!(!texts(&frame).contains(&"Emote Shop"));

        // The shop takes priority over the wheel
        shop.toggle(&owned);
        let frame = render(&state, &UiView { shop: &shop, wheel: &wheel });
        let labels = texts(&frame);
        assert!(labels.contains(&"Emote Shop"));
        assert!(labels.contains(&"Gold: 0"));
        assert_eq!(labels.iter().filter(|t| **t == "300").count(), SHOP_SIZE);
    }

    #[test]
    fn test_offscreen_enemies_are_culled() {
        let mut state = small_state();
        let id = state.next_entity_id();
        state.enemies.push(crate::sim::Enemy::new(id, Vec2::new(950.0, 950.0)));
        let shop = Shop::new(state.player.owned_emotes(), 1);
        let wheel = EmoteWheel::default();
        let frame = render(&state, &UiView { shop: &shop, wheel: &wheel });
        assert!(!frame.commands.iter().any(|c| matches!(c, DrawCommand::StrokeCircle { color, .. } if *color == palette::RED)));
    }
}
