//! Path: native/arena_sim/src/world/zone.rs
//! Summary: 一時的な範囲効果（Zone）: 爆発リング・危険地帯・遅延爆発・壁・捕獲ビーコン

use super::enemy::EnemyId;
use super::projectile::Faction;

#[derive(Clone, Copy, PartialEq, Debug)]
pub enum ZoneKind {
    /// 広がるだけの見た目用リング
    Ring { max_radius: f32 },
    /// `interval` フレームごとに範囲内の `victims` 側へダメージ
    Hazard { damage: f32, interval: u32, victims: Faction },
    /// 寿命が尽きた瞬間に範囲ダメージ（予告円）
    DelayedBlast { damage: f32, victims: Faction },
    /// 敵弾を止め、敵を押し出す
    Wall,
    /// 捕獲中の敵をつなぎ止める。対象が消えたら自分も消える。
    CaptureBeacon { target: EnemyId },
}

#[derive(Clone, Copy, PartialEq, Debug)]
pub struct Zone {
    pub x:        f32,
    pub y:        f32,
    pub radius:   f32,
    pub life:     u32,
    pub max_life: u32,
    pub kind:     ZoneKind,
}

impl Zone {
    pub fn new(x: f32, y: f32, radius: f32, life: u32, kind: ZoneKind) -> Self {
        Self { x, y, radius, life, max_life: life, kind }
    }

    pub fn contains(&self, x: f32, y: f32, extra: f32) -> bool {
        let r = self.radius + extra;
        let dx = x - self.x;
        let dy = y - self.y;
        dx * dx + dy * dy <= r * r
    }

    /// 経過割合（0 → 1）
    pub fn progress(&self) -> f32 {
        if self.max_life == 0 {
            1.0
        } else {
            1.0 - self.life as f32 / self.max_life as f32
        }
    }
}
