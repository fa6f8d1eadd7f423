//! Path: native/arena_sim/src/game_logic/hooks.rs
//! Summary: アイテムフック（on_tick / on_kill / on_wave_start）とスタック数付きレジストリ
//!
//! 同じ名前のフックを重ねて登録するとスタック数が増える。`on_tick` は
//! スタック数に関係なく 1 フレーム 1 回だけ呼ばれ、強度はフック側でスタック数から決める。

use crate::world::{GameWorld, KillRecord};

/// 撃破フックが新たな撃破を生んだときの連鎖上限（1 フレームあたり）
const MAX_KILL_HOOK_ROUNDS: usize = 8;

pub trait ItemHook: Send {
    /// スタック判定に使う一意な名前
    fn name(&self) -> &str;

    fn on_tick(&mut self, _world: &mut GameWorld, _stacks: u32) {}

    fn on_kill(&mut self, _world: &mut GameWorld, _kill: &KillRecord, _stacks: u32) {}

    fn on_wave_start(&mut self, _world: &mut GameWorld, _wave: u32, _stacks: u32) {}
}

struct HookEntry {
    hook:   Box<dyn ItemHook>,
    stacks: u32,
}

#[derive(Default)]
pub struct HookRegistry {
    entries: Vec<HookEntry>,
}

impl HookRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// 登録済みの名前ならスタックを 1 増やす。戻り値は登録後のスタック数。
    pub fn register(&mut self, hook: Box<dyn ItemHook>) -> u32 {
        if let Some(entry) = self.entries.iter_mut().find(|e| e.hook.name() == hook.name()) {
            entry.stacks += 1;
            return entry.stacks;
        }
        log::debug!("item hook registered: {}", hook.name());
        self.entries.push(HookEntry { hook, stacks: 1 });
        1
    }

    pub fn stacks(&self, name: &str) -> u32 {
        self.entries
            .iter()
            .find(|e| e.hook.name() == name)
            .map_or(0, |e| e.stacks)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub(crate) fn run_tick(&mut self, w: &mut GameWorld) {
        for entry in &mut self.entries {
            entry.hook.on_tick(w, entry.stacks);
        }
    }

    /// 今フレームの撃破記録を消化する。フック内の撃破は次のラウンドで処理する。
    pub(crate) fn run_kills(&mut self, w: &mut GameWorld) {
        let mut kills = Vec::new();
        for round in 0..MAX_KILL_HOOK_ROUNDS {
            if w.kills.is_empty() {
                break;
            }
            std::mem::swap(&mut kills, &mut w.kills);
            if self.entries.is_empty() {
                kills.clear();
                continue;
            }
            for kill in &kills {
                for entry in &mut self.entries {
                    entry.hook.on_kill(w, kill, entry.stacks);
                }
            }
            kills.clear();
            w.flush_releases();
            if round + 1 == MAX_KILL_HOOK_ROUNDS && !w.kills.is_empty() {
                log::warn!("kill hooks still chaining after {} rounds; {} kills dropped", MAX_KILL_HOOK_ROUNDS, w.kills.len());
                w.kills.clear();
            }
        }
    }

    pub(crate) fn run_wave_start(&mut self, w: &mut GameWorld, wave: u32) {
        for entry in &mut self.entries {
            entry.hook.on_wave_start(w, wave, entry.stacks);
        }
    }
}
