//! Path: native/arena_sim/src/game_logic/systems/player.rs
//! Summary: プレイヤー更新（タイマー減衰・移動・インパルス・マップ内クランプ・数値ガード）

use crate::world::{contain_in, GameWorld};
use arena_core::constants::IMPULSE_DECAY;
use arena_core::physics::math::is_finite2;

pub(crate) fn update_player(w: &mut GameWorld) {
    let (map_w, map_h) = (w.config.map_width, w.config.map_height);
    let p = &mut w.player;

    if !is_finite2(p.x, p.y) || !is_finite2(p.vx, p.vy) || !is_finite2(p.impulse_x, p.impulse_y) {
        let (sx, sy) = w.config.safe_position;
        log::warn!("player had non-finite position/velocity; reset to ({}, {})", sx, sy);
        p.x = sx;
        p.y = sy;
        p.vx = 0.0;
        p.vy = 0.0;
        p.impulse_x = 0.0;
        p.impulse_y = 0.0;
        w.stats.nan_resets += 1;
        return;
    }

    p.invuln_frames = p.invuln_frames.saturating_sub(1);
    // スタン中は入力による移動を無視する（押し出しは受ける）
    let (mvx, mvy) = if p.stun_frames > 0 { (0.0, 0.0) } else { (p.vx, p.vy) };
    p.stun_frames = p.stun_frames.saturating_sub(1);

    p.x += mvx + p.impulse_x;
    p.y += mvy + p.impulse_y;
    p.impulse_x *= IMPULSE_DECAY;
    p.impulse_y *= IMPULSE_DECAY;
    let (cx, cy, _) = contain_in(p.x, p.y, p.radius, map_w, map_h);
    p.x = cx;
    p.y = cy;
}

#[cfg(test)]
mod tests {
    use super::*;
    use arena_core::{EnemyConfigTable, SimConfig};

    #[test]
    fn stun_blocks_input_movement() {
        let mut w = GameWorld::new(SimConfig::default(), EnemyConfigTable::default());
        let x0 = w.player.x;
        w.player.vx = 4.0;
        w.player.stun_frames = 1;
        update_player(&mut w);
        assert_eq!(w.player.x, x0);
        update_player(&mut w);
        assert_eq!(w.player.x, x0 + 4.0);
    }

    #[test]
    fn player_stays_inside_the_map() {
        let mut w = GameWorld::new(SimConfig::default(), EnemyConfigTable::default());
        w.player.x = 5.0;
        w.player.vx = -10.0;
        update_player(&mut w);
        assert_eq!(w.player.x, w.player.radius);
    }

    #[test]
    fn non_finite_player_is_reset() {
        let mut w = GameWorld::new(SimConfig::default(), EnemyConfigTable::default());
        w.player.y = f32::INFINITY;
        update_player(&mut w);
        assert_eq!((w.player.x, w.player.y), w.config.safe_position);
    }
}
