//! Path: native/arena_sim/src/game_logic/targeting.rs
//! Summary: 最近接の敵探索（Spatial Hash 経由）

use crate::world::{Enemy, EnemyId};
use arena_core::physics::math::dist_sq;
use arena_core::{EntityPool, SpatialHash};

/// 半径 `range` 内で最も近い狙える敵を返す。`buf` はクエリ用の再利用バッファ。
pub fn find_nearest_enemy(
    grid: &SpatialHash<EnemyId>,
    enemies: &EntityPool<EnemyId, Enemy>,
    x: f32,
    y: f32,
    range: f32,
    buf: &mut Vec<EnemyId>,
) -> Option<EnemyId> {
    find_nearest_enemy_excluding(grid, enemies, x, y, range, &[], buf)
}

/// `exclude` に含まれる敵を除いた最近接の敵
pub fn find_nearest_enemy_excluding(
    grid: &SpatialHash<EnemyId>,
    enemies: &EntityPool<EnemyId, Enemy>,
    x: f32,
    y: f32,
    range: f32,
    exclude: &[EnemyId],
    buf: &mut Vec<EnemyId>,
) -> Option<EnemyId> {
    grid.query_radius_into(x, y, range, buf);
    let range_sq = range * range;
    let mut min_dist = f32::MAX;
    let mut nearest  = None;
    for &key in buf.iter() {
        if exclude.contains(&key) {
            continue;
        }
        let Some(e) = enemies.get(key) else {
            continue;
        };
        if !e.is_targetable() {
            continue;
        }
        let d = dist_sq(e.x, e.y, x, y);
        if d <= range_sq && d < min_dist {
            min_dist = d;
            nearest  = Some(key);
        }
    }
    nearest
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::EnemyState;
    use arena_core::Recycle;

    fn pool_with(positions: &[(f32, f32)]) -> (EntityPool<EnemyId, Enemy>, Vec<EnemyId>) {
        let mut pool = EntityPool::new();
        let keys = positions
            .iter()
            .map(|&(x, y)| pool.acquire_with(|e: &mut Enemy| { e.x = x; e.y = y; }))
            .collect();
        (pool, keys)
    }

    fn grid_of(pool: &EntityPool<EnemyId, Enemy>) -> SpatialHash<EnemyId> {
        let mut grid = SpatialHash::new(100.0);
        grid.insert_all(pool.iter().map(|(k, e)| (k, e.x, e.y)));
        grid
    }

    #[test]
    fn picks_closest_targetable_enemy() {
        let (mut pool, keys) = pool_with(&[(10.0, 0.0), (30.0, 0.0), (500.0, 0.0)]);
        let grid = grid_of(&pool);
        let mut buf = Vec::new();
        assert_eq!(find_nearest_enemy(&grid, &pool, 0.0, 0.0, 200.0, &mut buf), Some(keys[0]));

        pool.get_mut(keys[0]).unwrap().state = EnemyState::Spawning { frames: 5 };
        assert_eq!(find_nearest_enemy(&grid, &pool, 0.0, 0.0, 200.0, &mut buf), Some(keys[1]));
        assert_eq!(
            find_nearest_enemy_excluding(&grid, &pool, 0.0, 0.0, 200.0, &[keys[1]], &mut buf),
            None
        );
        assert!(pool.get(keys[2]).unwrap().is_active());
    }
}
