//! Path: native/arena_sim/src/world/game_world.rs
//! Summary: ゲームワールド（GameWorld）: 生存プール・グリッド・イベント・生成/ダメージ/撃破 API

use super::{
    DamageSource, Enemy, EnemyId, EnemyState, EventQueue, FloatingText, FrameEvent, Particle,
    ParticleId, Player, PlayerHit, Projectile, ProjectileId, ProjectileSpec, StatusEffect, TextId,
    Zone, ZoneKind,
};
use super::projectile::behavior_order_ok;
use arena_core::enemy_config::EnemyRank;
use arena_core::{EnemyConfigTable, EntityPool, SimConfig, SimpleRng, SpatialHash};

/// 捕獲ビーコンの表示半径
const CAPTURE_BEACON_RADIUS: f32 = 48.0;

/// 1 フレーム分の統計（毎フレーム先頭でリセット）
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FrameStats {
    pub ai_updates:        u32,
    pub inertial_updates:  u32,
    pub critical:          u32,
    pub near:              u32,
    pub far:               u32,
    pub contact_checks:    u32,
    pub projectile_checks: u32,
    pub explosion_hits:    u32,
    pub nan_resets:        u32,
    /// 直近フレームの処理時間（ミリ秒）
    pub last_tick_ms:      f64,
}

impl FrameStats {
    pub(crate) fn reset_counters(&mut self) {
        *self = Self { last_tick_ms: self.last_tick_ms, ..Self::default() };
    }
}

/// 撃破記録（on_kill フック用）
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct KillRecord {
    pub serial:    u32,
    pub config_id: u8,
    pub x:         f32,
    pub y:         f32,
    pub source:    DamageSource,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DamageOutcome {
    Hurt,
    Killed,
}

/// シミュレーション全体の状態。グローバルは持たず、各システムに `&mut` で渡す。
pub struct GameWorld {
    pub frame:       u64,
    pub config:      SimConfig,
    pub enemy_table: EnemyConfigTable,
    pub player:      Player,
    pub enemies:     EntityPool<EnemyId, Enemy>,
    pub projectiles: EntityPool<ProjectileId, Projectile>,
    pub particles:   EntityPool<ParticleId, Particle>,
    pub texts:       EntityPool<TextId, FloatingText>,
    pub zones:       Vec<Zone>,
    /// 毎フレーム敵位置から再構築する
    pub grid:        SpatialHash<EnemyId>,
    pub rng:         SimpleRng,
    pub events:      EventQueue,
    pub stats:       FrameStats,
    pub wave:        u32,
    /// 撃破済みで解放待ちの敵（二段階削除）
    pub(crate) pending_release: Vec<EnemyId>,
    pub(crate) kills:           Vec<KillRecord>,
    /// 近傍クエリ結果の再利用バッファ（毎フレームのヒープアロケーションを回避）
    pub(crate) query_buf:       Vec<EnemyId>,
    pub(crate) hit_buf:         Vec<(f32, EnemyId)>,
    next_serial:                u32,
}

impl GameWorld {
    pub fn new(config: SimConfig, enemy_table: EnemyConfigTable) -> Self {
        let player = Player::new(config.map_width / 2.0, config.map_height / 2.0);
        Self {
            frame:           0,
            player,
            enemies:         EntityPool::new(),
            projectiles:     EntityPool::new(),
            particles:       EntityPool::with_limit(config.max_particles),
            texts:           EntityPool::with_limit(config.max_floating_texts),
            zones:           Vec::new(),
            grid:            SpatialHash::new(config.grid_cell_size),
            rng:             SimpleRng::new(config.rng_seed),
            events:          EventQueue::new(config.max_frame_events),
            stats:           FrameStats::default(),
            wave:            0,
            pending_release: Vec::new(),
            kills:           Vec::new(),
            query_buf:       Vec::new(),
            hit_buf:         Vec::new(),
            next_serial:     0,
            enemy_table,
            config,
        }
    }

    /// マップ内に収める。壁に当たったら true。
    pub fn contain(&self, x: f32, y: f32, radius: f32) -> (f32, f32, bool) {
        let (w, h) = (self.config.map_width, self.config.map_height);
        contain_in(x, y, radius, w, h)
    }

    // ── 生成 ────────────────────────────────────────────────

    /// 指定 ID の敵を (x, y) にスポーン（O(1) でスロット取得）
    pub fn spawn_enemy(&mut self, config_id: u8, x: f32, y: f32) -> EnemyId {
        let serial = self.next_serial;
        self.next_serial = self.next_serial.wrapping_add(1);
        let config = *self.enemy_table.get(config_id);
        let frame = self.frame;
        if self.enemies.free_len() == 0 {
            log::debug!("enemy pool grows: live={}", self.enemies.live_len() + 1);
        }
        let key = self.enemies.acquire_with(|e| {
            e.init_from_config(config_id, &config, x, y);
            e.serial = serial;
            e.last_ai_frame = frame;
        });
        self.events.push(FrameEvent::EnemySpawned { serial, config_id, x, y });
        key
    }

    /// 出現演出付き（演出中は接触・被弾しない）
    pub fn spawn_enemy_with_intro(&mut self, config_id: u8, x: f32, y: f32, frames: u32) -> EnemyId {
        let key = self.spawn_enemy(config_id, x, y);
        if frames > 0 {
            if let Some(e) = self.enemies.get_mut(key) {
                e.state = EnemyState::Spawning { frames };
            }
        }
        key
    }

    pub fn spawn_projectile(&mut self, spec: &ProjectileSpec<'_>) -> ProjectileId {
        if !behavior_order_ok(spec.behaviors) {
            log::warn!("projectile behaviors check life before decaying it: {:?}", spec.behaviors);
        }
        self.projectiles.acquire_with(|p| {
            p.owner       = spec.owner;
            p.x           = spec.x;
            p.y           = spec.y;
            p.z           = spec.z;
            p.vx          = spec.vx;
            p.vy          = spec.vy;
            p.vz          = spec.vz;
            p.radius      = spec.radius;
            p.life        = spec.life;
            p.max_life    = spec.life;
            p.damage      = spec.damage;
            p.pierce      = spec.pierce;
            p.knockback   = spec.knockback;
            p.crit_chance = spec.crit_chance;
            p.crit_mult   = spec.crit_mult;
            p.on_hit      = spec.on_hit;
            p.explosion   = spec.explosion;
            p.render_kind = spec.render_kind;
            p.behaviors.extend_from_slice(spec.behaviors);
        })
    }

    /// 放射状にパーティクルを出す
    pub fn emit_particles(&mut self, x: f32, y: f32, count: usize, color: [f32; 4]) {
        for _ in 0..count {
            let angle = self.rng.angle();
            let speed = self.rng.range(1.0, 4.0);
            let life = self.rng.range(18.0, 40.0) as i32;
            let size = self.rng.range(3.0, 7.0);
            self.particles.acquire_with(|p| {
                p.x        = x;
                p.y        = y;
                p.vx       = angle.cos() * speed;
                p.vy       = angle.sin() * speed;
                p.gravity  = 0.15;
                p.life     = life;
                p.max_life = life;
                p.size     = size;
                p.color    = color;
            });
        }
    }

    pub fn spawn_text(&mut self, x: f32, y: f32, value: f32, crit: bool) {
        self.texts.acquire_with(|t| {
            t.x     = x;
            t.y     = y;
            t.vy    = -1.5;
            t.life  = 45;
            t.value = value;
            t.crit  = crit;
        });
    }

    pub fn spawn_zone(&mut self, zone: Zone) {
        self.zones.push(zone);
    }

    // ── 状態操作（外部コンテンツ・アイテムから呼ばれる）─────────

    /// 敵をアンカーへ捕獲する。ボス・撃破済み・無効ハンドルは false。
    pub fn capture_enemy(&mut self, key: EnemyId, anchor_x: f32, anchor_y: f32, frames: u32) -> bool {
        let Some(e) = self.enemies.get_mut(key) else {
            return false;
        };
        if !e.active || e.dying || e.rank == EnemyRank::Boss || frames == 0 {
            return false;
        }
        e.state = EnemyState::Captured { anchor_x, anchor_y, frames };
        e.vx = 0.0;
        e.vy = 0.0;
        self.zones.push(Zone::new(
            anchor_x,
            anchor_y,
            CAPTURE_BEACON_RADIUS,
            frames,
            ZoneKind::CaptureBeacon { target: key },
        ));
        true
    }

    /// 敵を投げ飛ばす（通常・捕獲状態からのみ）
    pub fn throw_enemy(&mut self, key: EnemyId, vx: f32, vy: f32, frames: u32) -> bool {
        let Some(e) = self.enemies.get_mut(key) else {
            return false;
        };
        let throwable = matches!(e.state, EnemyState::Normal | EnemyState::Captured { .. });
        if !e.active || e.dying || !throwable || e.rank == EnemyRank::Boss || frames == 0 {
            return false;
        }
        e.state = EnemyState::Thrown { frames };
        e.vx = vx;
        e.vy = vy;
        true
    }

    pub fn apply_status(&mut self, key: EnemyId, effect: StatusEffect) -> bool {
        match self.enemies.get_mut(key) {
            Some(e) if e.active && !e.dying => {
                e.status.apply(effect);
                true
            }
            _ => false,
        }
    }

    // ── ダメージ・撃破 ────────────────────────────────────────

    /// 敵にダメージを与える。無効ハンドル・撃破済みは None。
    pub fn damage_enemy(
        &mut self,
        key: EnemyId,
        amount: f32,
        crit: bool,
        source: DamageSource,
    ) -> Option<DamageOutcome> {
        let e = self.enemies.get_mut(key)?;
        if !e.active || e.dying || !(amount > 0.0) {
            return None;
        }
        e.hp -= amount;
        let (serial, x, y, top, killed) = (e.serial, e.x, e.y, e.y - e.radius, e.hp <= 0.0);
        self.events.push(FrameEvent::EnemyDamaged { serial, x, y, amount, crit });
        self.spawn_text(x, top, amount, crit);
        if killed {
            self.kill_enemy(key, source);
            Some(DamageOutcome::Killed)
        } else {
            Some(DamageOutcome::Hurt)
        }
    }

    /// 撃破扱いにして解放キューへ積む（生存配列からの削除は `flush_releases` で行う）
    pub fn kill_enemy(&mut self, key: EnemyId, source: DamageSource) -> bool {
        let Some(e) = self.enemies.get_mut(key) else {
            return false;
        };
        if !e.active || e.dying {
            return false;
        }
        e.dying = true;
        e.hp = 0.0;
        e.vx = 0.0;
        e.vy = 0.0;
        let record = KillRecord { serial: e.serial, config_id: e.config_id, x: e.x, y: e.y, source };
        self.pending_release.push(key);
        self.kills.push(record);
        self.events.push(FrameEvent::EnemyDied {
            serial:    record.serial,
            config_id: record.config_id,
            x:         record.x,
            y:         record.y,
            source,
        });
        let color = self.enemy_table.get(record.config_id).particle_color;
        self.emit_particles(record.x, record.y, 8, color);
        true
    }

    /// プレイヤーへのダメージ（無敵時間・シールド・アーマー込み）
    pub fn damage_player(&mut self, amount: f32) -> PlayerHit {
        let hit = self.player.take_hit(amount, self.config.player_invuln_frames);
        let (x, y) = (self.player.x, self.player.y);
        match hit {
            PlayerHit::Absorbed => {
                self.events.push(FrameEvent::ShieldBreak { x, y, shields_left: self.player.shield });
                self.emit_particles(x, y, 10, [0.4, 0.8, 1.0, 1.0]);
            }
            PlayerHit::Damaged(dmg) => {
                self.events.push(FrameEvent::PlayerHurt { x, y, amount: dmg, hp_left: self.player.hp });
                // 赤いパーティクルをプレイヤー位置に発生
                self.emit_particles(x, y, 6, [1.0, 0.15, 0.15, 1.0]);
            }
            PlayerHit::Ignored => {}
        }
        hit
    }

    /// 解放キューを生存配列に反映する（swap-pop）
    pub fn flush_releases(&mut self) -> usize {
        if self.pending_release.is_empty() {
            return 0;
        }
        let mut pending = std::mem::take(&mut self.pending_release);
        let released = self.enemies.release_batch(&mut pending);
        self.pending_release = pending;
        released
    }

    /// 衝突判定用の Spatial Hash を再構築する
    pub fn rebuild_grid(&mut self) {
        self.grid.clear();
        self.grid.insert_all(
            self.enemies
                .iter()
                .filter(|(_, e)| e.active && !e.dying)
                .map(|(key, e)| (key, e.x, e.y)),
        );
    }

    pub fn enemy_count(&self) -> usize {
        self.enemies.live_len()
    }

    pub fn projectile_count(&self) -> usize {
        self.projectiles.live_len()
    }
}

/// 半径分内側に収める。はみ出していたら true。
pub(crate) fn contain_in(x: f32, y: f32, radius: f32, w: f32, h: f32) -> (f32, f32, bool) {
    let r = radius.min(w / 2.0).min(h / 2.0).max(0.0);
    let cx = x.clamp(r, w - r);
    let cy = y.clamp(r, h - r);
    (cx, cy, cx != x || cy != y)
}
