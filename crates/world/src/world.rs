use voxrelic_common::{Color, TileCoord};
use voxrelic_math::{Mat4, Vec3};
use voxrelic_render::{DrawCall, TextureId};

/// Side length of the square world grid, in tiles.
pub const GRID_SIZE: i32 = 32;
/// Maximum stacked cubes per tile.
pub const MAX_HEIGHT: u8 = 4;
/// Horizontal distance from the camera beyond which wall blocks are not
/// drawn.
pub const CULL_RADIUS: f32 = 14.0;

/// Seconds a toast stays on screen.
const TOAST_SECS: f64 = 2.5;

const RELIC_TILES: [TileCoord; 5] = [
    TileCoord::new(6, 6),
    TileCoord::new(25, 6),
    TileCoord::new(5, 16),
    TileCoord::new(22, 13),
    TileCoord::new(16, 22),
];
const PORTAL_TILE: TileCoord = TileCoord::new(27, 27);

const SKY_COLOR: Color = [0.35, 0.55, 0.95, 1.0];
const WHITE: Color = [1.0, 1.0, 1.0, 1.0];
const RELIC_GOLD: Color = [1.0, 0.85, 0.3, 1.0];
const PORTAL_PURPLE: Color = [0.55, 0.2, 0.9, 1.0];
const PORTAL_WON: Color = [0.8, 0.5, 1.0, 1.0];

const RELIC_BOB_BASE: f32 = 0.5;
const RELIC_BOB_AMPLITUDE: f32 = 0.15;
const RELIC_BOB_RATE: f32 = 4.0;
const PORTAL_PULSE_RATE: f32 = 3.0;

const WIN_BANNER: &str = "You win!";

/// One occupied unit-cube cell of the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Block {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

/// A scripted pickup sitting on one tile. Collection is one-way.
#[derive(Debug, Clone, Copy)]
pub struct Relic {
    pub tile: TileCoord,
    pub collected: bool,
}

#[derive(Debug, Clone)]
struct Toast {
    text: String,
    expires_at: f64,
}

/// The voxel world: a square height grid, its derived block list, and the
/// relic-hunt state machine.
///
/// Heights are addressed `[z][x]` with z as the row index, matching the
/// map layout literals below.
pub struct World {
    size: i32,
    max_height: u8,
    /// Flat `size * size` height grid, row-major in z.
    map: Vec<u8>,
    /// Derived enumeration of occupied cells, authoritative for rendering.
    blocks: Vec<Block>,
    relics: Vec<Relic>,
    portal: TileCoord,
    relics_collected: usize,
    has_won: bool,
    toast: Option<Toast>,
}

impl World {
    /// The fixed default map: walled border, a few corridors and pillars,
    /// five relics, and the portal in the far corner.
    pub fn new() -> Self {
        let mut map = vec![0u8; (GRID_SIZE * GRID_SIZE) as usize];
        let n = GRID_SIZE as usize;
        let at = |x: usize, z: usize| z * n + x;

        for i in 0..n {
            map[at(i, 0)] = MAX_HEIGHT;
            map[at(i, n - 1)] = MAX_HEIGHT;
            map[at(0, i)] = MAX_HEIGHT;
            map[at(n - 1, i)] = MAX_HEIGHT;
        }

        // Corridors and rooms
        for x in 3..29 {
            map[at(x, 8)] = 2;
        }
        for z in 10..27 {
            map[at(12, z)] = 3;
        }
        for x in 10..22 {
            map[at(x, 18)] = 1;
        }

        // Pillars
        map[at(16, 16)] = 4;
        map[at(20, 20)] = 3;
        map[at(24, 6)] = 3;

        // A gate through the long corridor
        map[at(12, 24)] = 0;
        map[at(12, 25)] = 0;

        Self::build(GRID_SIZE, MAX_HEIGHT, map, &RELIC_TILES, PORTAL_TILE)
    }

    fn build(
        size: i32,
        max_height: u8,
        map: Vec<u8>,
        relic_tiles: &[TileCoord],
        portal: TileCoord,
    ) -> Self {
        debug_assert_eq!(map.len(), (size * size) as usize);
        let mut world = Self {
            size,
            max_height,
            map,
            blocks: Vec::new(),
            relics: relic_tiles
                .iter()
                .filter(|t| t.x >= 0 && t.x < size && t.z >= 0 && t.z < size)
                .map(|&tile| Relic {
                    tile,
                    collected: false,
                })
                .collect(),
            portal,
            relics_collected: 0,
            has_won: false,
            toast: None,
        };
        world.rebuild_blocks();
        world
    }

    pub fn size(&self) -> i32 {
        self.size
    }

    pub fn in_bounds(&self, tile: TileCoord) -> bool {
        tile.x >= 0 && tile.x < self.size && tile.z >= 0 && tile.z < self.size
    }

    /// Height at `tile`, or 0 out of bounds.
    pub fn height(&self, tile: TileCoord) -> u8 {
        if self.in_bounds(tile) {
            self.map[(tile.z * self.size + tile.x) as usize]
        } else {
            0
        }
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub fn relics(&self) -> &[Relic] {
        &self.relics
    }

    pub fn portal(&self) -> TileCoord {
        self.portal
    }

    pub fn relics_collected(&self) -> usize {
        self.relics_collected
    }

    pub fn relics_total(&self) -> usize {
        self.relics.len()
    }

    pub fn has_won(&self) -> bool {
        self.has_won
    }

    /// Raise the stack at `tile` by one cube, clamped at the maximum
    /// height. Out of bounds is a no-op.
    pub fn add_block(&mut self, tile: TileCoord) {
        if !self.in_bounds(tile) {
            return;
        }
        let i = (tile.z * self.size + tile.x) as usize;
        self.map[i] = (self.map[i] + 1).min(self.max_height);
        self.rebuild_blocks();
    }

    /// Lower the stack at `tile` by one cube, clamped at zero. Out of
    /// bounds is a no-op.
    pub fn remove_block(&mut self, tile: TileCoord) {
        if !self.in_bounds(tile) {
            return;
        }
        let i = (tile.z * self.size + tile.x) as usize;
        self.map[i] = self.map[i].saturating_sub(1);
        self.rebuild_blocks();
    }

    /// Full recompute of the flattened occupied-cell list from the grid.
    ///
    /// O(size^2 * max_height), so it only runs after a height mutation,
    /// never per frame.
    fn rebuild_blocks(&mut self) {
        self.blocks.clear();
        for z in 0..self.size {
            for x in 0..self.size {
                let h = self.map[(z * self.size + x) as usize];
                for y in 0..h as i32 {
                    self.blocks.push(Block { x, y, z });
                }
            }
        }
    }

    fn set_toast(&mut self, text: String, now: f64) {
        self.toast = Some(Toast {
            text,
            expires_at: now + TOAST_SECS,
        });
    }

    /// Advance the game state for the tile the camera currently stands on.
    ///
    /// Relics on the player's tile are collected first; the win check then
    /// re-reads the updated counter within the same call, so collecting the
    /// last relic while standing on the portal tile wins on that tick.
    /// Once won, this is a no-op.
    pub fn update_game(&mut self, camera_pos: Vec3, now: f64) {
        if self.has_won {
            return;
        }
        let tile = TileCoord::at(camera_pos.x, camera_pos.z);

        let total = self.relics.len();
        for i in 0..self.relics.len() {
            if self.relics[i].collected || self.relics[i].tile != tile {
                continue;
            }
            self.relics[i].collected = true;
            self.relics_collected += 1;
            tracing::info!(
                x = tile.x,
                z = tile.z,
                collected = self.relics_collected,
                total,
                "relic collected"
            );
            if self.relics_collected == total {
                self.set_toast("All relics collected! Find the portal!".into(), now);
            } else {
                self.set_toast(
                    format!("Relic collected! {}/{}", self.relics_collected, total),
                    now,
                );
            }
        }

        if self.relics_collected == total && tile == self.portal {
            self.has_won = true;
            tracing::info!("portal reached, game won");
            self.set_toast(format!("The portal accepts you. {WIN_BANNER}"), now);
        }
    }

    /// The active status line: the toast while it lasts, the win banner
    /// once won, otherwise empty.
    pub fn get_message(&self, now: f64) -> String {
        if let Some(toast) = &self.toast {
            if now < toast.expires_at {
                return toast.text.clone();
            }
        }
        if self.has_won {
            return WIN_BANNER.into();
        }
        String::new()
    }

    /// Emit this frame's draw calls in paint order: sky, ground, culled
    /// walls, uncollected relics, portal.
    pub fn draw_list(&self, camera_pos: Vec3, now: f64) -> Vec<DrawCall> {
        let mut calls = Vec::with_capacity(self.blocks.len() + 8);
        let t = now as f32;
        let center = self.size as f32 / 2.0;

        // Sky: one huge cube around the world. Negative scale inverts the
        // winding so the inside faces survive back-face culling.
        calls.push(DrawCall {
            model: Mat4::IDENTITY
                .translate(center, center, center)
                .scale(-200.0, -200.0, -200.0),
            color: SKY_COLOR,
            tex_weight: 0.0,
            texture: TextureId::Dirt,
        });

        // Ground: one flattened cube under the whole grid.
        calls.push(DrawCall {
            model: Mat4::IDENTITY
                .translate(center, -0.55, center)
                .scale(self.size as f32, 0.1, self.size as f32),
            color: WHITE,
            tex_weight: 1.0,
            texture: TextureId::Dirt,
        });

        // Walls: linear scan of the block list, kept when the tile center
        // is horizontally within the cull radius.
        let r2 = CULL_RADIUS * CULL_RADIUS;
        for b in &self.blocks {
            let cx = b.x as f32 + 0.5;
            let cz = b.z as f32 + 0.5;
            let dx = cx - camera_pos.x;
            let dz = cz - camera_pos.z;
            if dx * dx + dz * dz > r2 {
                continue;
            }
            calls.push(DrawCall {
                model: Mat4::IDENTITY.translate(cx, b.y as f32, cz),
                color: WHITE,
                tex_weight: 1.0,
                texture: TextureId::Wall,
            });
        }

        // Relics: small bobbing cubes, skipped once collected.
        let bob = RELIC_BOB_BASE + RELIC_BOB_AMPLITUDE * (t * RELIC_BOB_RATE).sin();
        for relic in self.relics.iter().filter(|r| !r.collected) {
            calls.push(DrawCall {
                model: Mat4::IDENTITY
                    .translate(relic.tile.x as f32 + 0.5, bob, relic.tile.z as f32 + 0.5)
                    .scale(0.3, 0.3, 0.3),
                color: RELIC_GOLD,
                tex_weight: 0.15,
                texture: TextureId::Dirt,
            });
        }

        // Portal: a flat pad, pulsing until won.
        let (portal_color, portal_weight) = if self.has_won {
            (PORTAL_WON, 0.0)
        } else {
            (PORTAL_PURPLE, 0.5 + 0.5 * (t * PORTAL_PULSE_RATE).sin())
        };
        calls.push(DrawCall {
            model: Mat4::IDENTITY
                .translate(self.portal.x as f32 + 0.5, -0.45, self.portal.z as f32 + 0.5)
                .scale(1.0, 0.1, 1.0),
            color: portal_color,
            tex_weight: portal_weight,
            texture: TextureId::Wall,
        });

        calls
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tile_center(tile: TileCoord) -> Vec3 {
        Vec3::new(tile.x as f32 + 0.5, 1.5, tile.z as f32 + 0.5)
    }

    /// Walk the whole relic list, then stand on the portal.
    fn collect_everything(world: &mut World, now: f64) {
        let tiles: Vec<TileCoord> = world.relics().iter().map(|r| r.tile).collect();
        for tile in tiles {
            world.update_game(tile_center(tile), now);
        }
        world.update_game(tile_center(world.portal()), now);
    }

    fn expected_blocks(world: &World) -> Vec<Block> {
        let mut expected = Vec::new();
        for z in 0..world.size() {
            for x in 0..world.size() {
                for y in 0..world.height(TileCoord::new(x, z)) as i32 {
                    expected.push(Block { x, y, z });
                }
            }
        }
        expected
    }

    #[test]
    fn border_is_walled_at_max_height() {
        let world = World::new();
        for i in 0..GRID_SIZE {
            assert_eq!(world.height(TileCoord::new(i, 0)), MAX_HEIGHT);
            assert_eq!(world.height(TileCoord::new(i, GRID_SIZE - 1)), MAX_HEIGHT);
            assert_eq!(world.height(TileCoord::new(0, i)), MAX_HEIGHT);
            assert_eq!(world.height(TileCoord::new(GRID_SIZE - 1, i)), MAX_HEIGHT);
        }
    }

    #[test]
    fn default_map_has_expected_features() {
        let world = World::new();
        assert_eq!(world.height(TileCoord::new(16, 16)), 4);
        assert_eq!(world.height(TileCoord::new(20, 20)), 3);
        assert_eq!(world.height(TileCoord::new(5, 8)), 2);
        // the gate cuts the corridor
        assert_eq!(world.height(TileCoord::new(12, 24)), 0);
        assert_eq!(world.height(TileCoord::new(12, 25)), 0);
        // relic tiles are open floor
        for relic in world.relics() {
            assert_eq!(world.height(relic.tile), 0, "relic at {:?}", relic.tile);
        }
        assert_eq!(world.height(world.portal()), 0);
    }

    #[test]
    fn add_then_remove_round_trips_height() {
        let mut world = World::new();
        let tile = TileCoord::new(5, 5);
        let before = world.height(tile);
        world.add_block(tile);
        assert_eq!(world.height(tile), before + 1);
        world.remove_block(tile);
        assert_eq!(world.height(tile), before);
    }

    #[test]
    fn add_clamps_at_max_height() {
        let mut world = World::new();
        let wall = TileCoord::new(0, 0);
        assert_eq!(world.height(wall), MAX_HEIGHT);
        world.add_block(wall);
        assert_eq!(world.height(wall), MAX_HEIGHT);
    }

    #[test]
    fn remove_clamps_at_zero() {
        let mut world = World::new();
        let open = TileCoord::new(5, 5);
        assert_eq!(world.height(open), 0);
        world.remove_block(open);
        assert_eq!(world.height(open), 0);
    }

    #[test]
    fn out_of_bounds_edits_are_ignored() {
        let mut world = World::new();
        let before = world.blocks().len();
        world.add_block(TileCoord::new(-1, 5));
        world.add_block(TileCoord::new(5, GRID_SIZE));
        world.remove_block(TileCoord::new(GRID_SIZE, GRID_SIZE));
        assert_eq!(world.blocks().len(), before);
    }

    #[test]
    fn block_list_matches_grid_after_edits() {
        let mut world = World::new();
        world.add_block(TileCoord::new(5, 5));
        world.add_block(TileCoord::new(5, 5));
        world.remove_block(TileCoord::new(16, 16));
        world.add_block(TileCoord::new(30, 30));
        assert_eq!(world.blocks(), expected_blocks(&world).as_slice());
    }

    #[test]
    fn rebuild_is_idempotent_without_mutation() {
        let mut world = World::new();
        let first: Vec<Block> = world.blocks().to_vec();
        world.rebuild_blocks();
        assert_eq!(world.blocks(), first.as_slice());
    }

    #[test]
    fn toy_grid_block_list_is_exactly_the_border() {
        // 4x4 grid, max height 1: 12 border cells at y=0, empty 2x2 interior.
        let size = 4;
        let mut map = vec![0u8; 16];
        for i in 0..4usize {
            map[i] = 1;
            map[12 + i] = 1;
            map[i * 4] = 1;
            map[i * 4 + 3] = 1;
        }
        let world = World::build(size, 1, map, &[], TileCoord::new(3, 3));
        assert_eq!(world.blocks().len(), 12);
        assert!(world.blocks().iter().all(|b| b.y == 0));
        assert!(world
            .blocks()
            .iter()
            .all(|b| b.x == 0 || b.x == 3 || b.z == 0 || b.z == 3));
    }

    #[test]
    fn relics_out_of_bounds_are_dropped_at_construction() {
        let tiles = [TileCoord::new(1, 1), TileCoord::new(9, 1), TileCoord::new(-1, 2)];
        let world = World::build(4, 1, vec![0; 16], &tiles, TileCoord::new(3, 3));
        assert_eq!(world.relics_total(), 1);
        assert_eq!(world.relics()[0].tile, TileCoord::new(1, 1));
    }

    #[test]
    fn standing_on_a_relic_collects_it_once() {
        let mut world = World::new();
        let pos = tile_center(TileCoord::new(6, 6));
        world.update_game(pos, 10.0);
        assert_eq!(world.relics_collected(), 1);
        assert!(world.get_message(10.0).contains("1/5"));

        // staying on the tile does not collect again
        world.update_game(pos, 10.5);
        assert_eq!(world.relics_collected(), 1);
    }

    #[test]
    fn collecting_all_relics_prompts_for_the_portal() {
        let mut world = World::new();
        let tiles: Vec<TileCoord> = world.relics().iter().map(|r| r.tile).collect();
        for (i, tile) in tiles.iter().enumerate() {
            world.update_game(tile_center(*tile), 20.0);
            assert_eq!(world.relics_collected(), i + 1);
        }
        assert!(!world.has_won());
        assert!(world.get_message(20.0).contains("Find the portal"));
    }

    #[test]
    fn portal_without_all_relics_does_not_win() {
        let mut world = World::new();
        world.update_game(tile_center(world.portal()), 5.0);
        assert!(!world.has_won());

        world.update_game(tile_center(TileCoord::new(6, 6)), 6.0);
        world.update_game(tile_center(world.portal()), 7.0);
        assert!(!world.has_won());
    }

    #[test]
    fn all_relics_plus_portal_tile_wins() {
        let mut world = World::new();
        collect_everything(&mut world, 30.0);
        assert!(world.has_won());
    }

    #[test]
    fn win_is_irreversible() {
        let mut world = World::new();
        collect_everything(&mut world, 30.0);
        assert!(world.has_won());
        // moving away and updating again changes nothing
        world.update_game(Vec3::new(2.5, 1.5, 2.5), 40.0);
        assert!(world.has_won());
        assert_eq!(world.relics_collected(), world.relics_total());
    }

    #[test]
    fn wins_on_same_tick_as_last_relic() {
        // A relic sharing the portal tile: relics resolve before the win
        // check inside one call, so one update both collects and wins.
        let portal = TileCoord::new(3, 3);
        let world_tiles = [TileCoord::new(1, 1), portal];
        let mut world = World::build(8, 1, vec![0; 64], &world_tiles, portal);

        world.update_game(tile_center(TileCoord::new(1, 1)), 1.0);
        assert!(!world.has_won());
        world.update_game(tile_center(portal), 2.0);
        assert_eq!(world.relics_collected(), 2);
        assert!(world.has_won());
    }

    #[test]
    fn toast_expires_then_win_banner_persists() {
        let mut world = World::new();
        collect_everything(&mut world, 30.0);
        let during = world.get_message(31.0);
        assert!(during.contains("portal accepts"));
        // after the toast window only the banner remains
        let after = world.get_message(100.0);
        assert_eq!(after, "You win!");
    }

    #[test]
    fn toast_expires_to_empty_before_win() {
        let mut world = World::new();
        world.update_game(tile_center(TileCoord::new(6, 6)), 10.0);
        assert!(!world.get_message(12.0).is_empty());
        assert!(world.get_message(13.0).is_empty());
    }

    #[test]
    fn draw_list_culls_distant_walls() {
        let world = World::new();
        let corner = Vec3::new(2.0, 2.0, 2.0);

        let near_corner = world.draw_list(corner, 0.0);
        let walls: Vec<&DrawCall> = near_corner
            .iter()
            .filter(|c| c.texture == TextureId::Wall && c.tex_weight == 1.0)
            .collect();
        assert!(!walls.is_empty());
        // every drawn wall is within the radius of the camera
        for call in &walls {
            let dx = call.model.m[12] - corner.x;
            let dz = call.model.m[14] - corner.z;
            assert!(dx * dx + dz * dz <= CULL_RADIUS * CULL_RADIUS + 1e-3);
        }
        // the far corner of the map is beyond the radius, so fewer blocks
        // survive than exist in total
        assert!(walls.len() < world.blocks().len());
    }

    #[test]
    fn draw_list_always_has_sky_ground_and_portal() {
        let mut world = World::new();
        let calls = world.draw_list(Vec3::new(16.0, 3.0, 28.0), 1.0);
        // sky is the only solid-color call before the win
        assert_eq!(calls.iter().filter(|c| c.tex_weight == 0.0).count(), 1);
        assert_eq!(calls[0].color, [0.35, 0.55, 0.95, 1.0]);

        // relic cubes: all five uncollected
        let relic_calls = calls
            .iter()
            .filter(|c| c.color == [1.0, 0.85, 0.3, 1.0])
            .count();
        assert_eq!(relic_calls, 5);

        // collected relics disappear from the list
        world.update_game(tile_center(TileCoord::new(6, 6)), 2.0);
        let calls = world.draw_list(Vec3::new(16.0, 3.0, 28.0), 3.0);
        let relic_calls = calls
            .iter()
            .filter(|c| c.color == [1.0, 0.85, 0.3, 1.0])
            .count();
        assert_eq!(relic_calls, 4);
    }

    #[test]
    fn portal_pulses_until_won_then_goes_solid() {
        let mut world = World::new();
        let calls = world.draw_list(Vec3::ZERO, 0.25);
        let portal = calls.last().unwrap();
        assert_eq!(portal.color, [0.55, 0.2, 0.9, 1.0]);
        assert!(portal.tex_weight > 0.0 && portal.tex_weight <= 1.0);

        collect_everything(&mut world, 5.0);
        let calls = world.draw_list(Vec3::ZERO, 6.0);
        let portal = calls.last().unwrap();
        assert_eq!(portal.color, [0.8, 0.5, 1.0, 1.0]);
        assert_eq!(portal.tex_weight, 0.0);
    }
}
