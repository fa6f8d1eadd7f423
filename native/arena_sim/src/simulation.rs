//! Path: native/arena_sim/src/simulation.rs
//! Summary: 外部向けファサード（設定検証・tick・ウェーブ開始・イベント取り出し・アイテム登録）

use crate::game_logic::{physics_step_inner, HookRegistry, ItemHook};
use crate::world::{FrameEvent, GameWorld};
use arena_core::constants::{ENEMY_MAX_RADIUS, PLAYER_RADIUS};
use arena_core::{ConfigError, EnemyConfigTable, SimConfig};

/// ワールドとアイテムフックをまとめて持つ。1 インスタンス = 1 ラン。
pub struct Simulation {
    pub world: GameWorld,
    hooks:     HookRegistry,
}

impl Simulation {
    /// 設定と敵テーブルの組み合わせを検証してから生成する
    pub fn new(config: SimConfig, table: EnemyConfigTable) -> Result<Self, ConfigError> {
        config.validate()?;
        let max_radius = table.max_radius();
        if max_radius > ENEMY_MAX_RADIUS {
            return Err(ConfigError::Invalid("enemy radius exceeds ENEMY_MAX_RADIUS"));
        }
        if max_radius + PLAYER_RADIUS > config.grid_cell_size {
            return Err(ConfigError::Invalid("grid_cell_size is smaller than the largest contact reach"));
        }
        log::info!(
            "simulation created: map {}x{}, cell {}, {} enemy kinds",
            config.map_width,
            config.map_height,
            config.grid_cell_size,
            table.len()
        );
        Ok(Self {
            world: GameWorld::new(config, table),
            hooks: HookRegistry::new(),
        })
    }

    pub fn with_defaults() -> Result<Self, ConfigError> {
        Self::new(SimConfig::default(), EnemyConfigTable::default())
    }

    /// 戻り値は登録後のスタック数
    pub fn register_item(&mut self, hook: Box<dyn ItemHook>) -> u32 {
        self.hooks.register(hook)
    }

    pub fn hooks(&self) -> &HookRegistry {
        &self.hooks
    }

    pub fn tick(&mut self) {
        physics_step_inner(&mut self.world, &mut self.hooks);
    }

    pub fn start_wave(&mut self, wave: u32) {
        self.world.wave = wave;
        log::debug!("wave {} started at frame {}", wave, self.world.frame);
        self.hooks.run_wave_start(&mut self.world, wave);
    }

    /// 溜まったイベントを古い順に取り出す。呼ばなくても上限で古いものから捨てられる。
    pub fn drain_events(&mut self) -> Vec<FrameEvent> {
        self.world.events.drain().collect()
    }
}
