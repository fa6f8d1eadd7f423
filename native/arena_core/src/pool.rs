//! Path: native/arena_core/src/pool.rs
//! Summary: 世代付きハンドルのエンティティプール（空きスタック + 生存配列の swap-pop 削除）
//!
//! 生存配列は順序を保持しない。逆順イテレーション中に現在のインデックスを
//! `release_at` しても、入れ替わりで来るのは処理済みの末尾要素だけなので安全。

use slotmap::{Key, SlotMap};
use std::collections::VecDeque;

/// プールに戻して再利用できるレコード
pub trait Recycle: Default {
    /// 前の占有者が残した状態をすべて既定値に戻す（内部バッファの容量は保持してよい）
    fn recycle(&mut self);
    fn is_active(&self) -> bool;
    fn set_active(&mut self, active: bool);
}

struct Slot<T> {
    value:      T,
    live_index: usize,
}

/// 診断用カウンタ
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PoolStats {
    pub allocated: usize,
    pub reused:    usize,
    pub evicted:   usize,
}

pub struct EntityPool<K: Key, T: Recycle> {
    slots:       SlotMap<K, Slot<T>>,
    /// 生存ハンドル（swap-pop で削除）
    live:        Vec<K>,
    /// 空きレコードのスタック。O(1) で取得・返却
    free_list:   Vec<T>,
    limit:       Option<usize>,
    /// 上限付きプールのみ: 生成順（追い出し候補）。解放済みキーは世代で判別して読み飛ばす。
    spawn_order: VecDeque<K>,
    stats:       PoolStats,
}

impl<K: Key, T: Recycle> Default for EntityPool<K, T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Key, T: Recycle> EntityPool<K, T> {
    pub fn new() -> Self {
        Self {
            slots:       SlotMap::with_key(),
            live:        Vec::new(),
            free_list:   Vec::new(),
            limit:       None,
            spawn_order: VecDeque::new(),
            stats:       PoolStats::default(),
        }
    }

    /// 生存数の上限付き。超過時は最も古いレコードを追い出す。
    pub fn with_limit(limit: usize) -> Self {
        Self {
            limit: Some(limit.max(1)),
            ..Self::new()
        }
    }

    /// レコードを取得して生存配列に追加する。返るレコードは前の占有者の状態を持たない。
    pub fn acquire(&mut self) -> K {
        if let Some(limit) = self.limit {
            while self.live.len() >= limit {
                if !self.evict_oldest() {
                    break;
                }
            }
        }

        let mut value = match self.free_list.pop() {
            Some(mut v) => {
                v.recycle();
                self.stats.reused += 1;
                v
            }
            None => {
                self.stats.allocated += 1;
                if self.stats.allocated.is_power_of_two() && self.stats.allocated >= 64 {
                    log::debug!("pool grew to {} records", self.stats.allocated);
                }
                T::default()
            }
        };
        value.set_active(true);

        let live_index = self.live.len();
        let key = self.slots.insert(Slot { value, live_index });
        self.live.push(key);
        if self.limit.is_some() {
            self.spawn_order.push_back(key);
        }
        key
    }

    /// 取得して初期化クロージャを適用する
    pub fn acquire_with(&mut self, init: impl FnOnce(&mut T)) -> K {
        let key = self.acquire();
        if let Some(slot) = self.slots.get_mut(key) {
            init(&mut slot.value);
        }
        key
    }

    /// 生存配列の `index` を swap-pop で取り除き、レコードを空きスタックに戻す
    pub fn release_at(&mut self, index: usize) -> Option<K> {
        if index >= self.live.len() {
            return None;
        }
        let key = self.live.swap_remove(index);
        if let Some(&moved) = self.live.get(index) {
            if let Some(slot) = self.slots.get_mut(moved) {
                slot.live_index = index;
            }
        }
        if let Some(mut slot) = self.slots.remove(key) {
            slot.value.set_active(false);
            self.free_list.push(slot.value);
        }
        Some(key)
    }

    /// 古い（世代の合わない）ハンドルは何もせず false
    pub fn release(&mut self, key: K) -> bool {
        let Some(index) = self.slots.get(key).map(|s| s.live_index) else {
            return false;
        };
        self.release_at(index).is_some()
    }

    /// 読み取りパスで集めたキーをまとめて解放する（重複・解放済みは無視）
    pub fn release_batch(&mut self, keys: &mut Vec<K>) -> usize {
        let mut released = 0;
        for key in keys.drain(..) {
            if self.release(key) {
                released += 1;
            }
        }
        released
    }

    fn evict_oldest(&mut self) -> bool {
        while let Some(key) = self.spawn_order.pop_front() {
            if self.release(key) {
                self.stats.evicted += 1;
                if self.stats.evicted.is_power_of_two() {
                    log::debug!("pool at limit {:?}: {} records evicted so far", self.limit, self.stats.evicted);
                }
                return true;
            }
        }
        false
    }

    /// 生成順キューから解放済みキーを取り除く（上限付きプールで定期的に呼ぶ）
    pub fn compact_spawn_order(&mut self) {
        if self.spawn_order.len() > self.live.len() * 2 + 16 {
            let slots = &self.slots;
            self.spawn_order.retain(|&k| slots.contains_key(k));
        }
    }

    #[inline]
    pub fn get(&self, key: K) -> Option<&T> {
        self.slots.get(key).map(|s| &s.value)
    }

    #[inline]
    pub fn get_mut(&mut self, key: K) -> Option<&mut T> {
        self.slots.get_mut(key).map(|s| &mut s.value)
    }

    #[inline]
    pub fn contains(&self, key: K) -> bool {
        self.slots.contains_key(key)
    }

    #[inline]
    pub fn live_len(&self) -> usize {
        self.live.len()
    }

    pub fn is_empty(&self) -> bool {
        self.live.is_empty()
    }

    #[inline]
    pub fn key_at(&self, index: usize) -> Option<K> {
        self.live.get(index).copied()
    }

    pub fn live_keys(&self) -> &[K] {
        &self.live
    }

    /// 生存配列内の現在位置（swap-pop で動くので都度引く）
    pub fn index_of(&self, key: K) -> Option<usize> {
        self.slots.get(key).map(|s| s.live_index)
    }

    /// 生存配列順のイテレータ
    pub fn iter(&self) -> impl Iterator<Item = (K, &T)> + '_ {
        self.live
            .iter()
            .filter_map(move |&k| self.slots.get(k).map(|s| (k, &s.value)))
    }

    /// 順序不定の可変イテレータ（rayon の par_bridge 用に Send）
    pub fn records_mut(&mut self) -> impl Iterator<Item = &mut T> + Send + '_
    where
        K: Send,
        T: Send,
    {
        self.slots.values_mut().map(|s| &mut s.value)
    }

    pub fn free_len(&self) -> usize {
        self.free_list.len()
    }

    pub fn stats(&self) -> PoolStats {
        self.stats
    }

    pub fn limit(&self) -> Option<usize> {
        self.limit
    }

    /// すべて解放する（レコードは空きスタックへ）
    pub fn release_all(&mut self) {
        while !self.live.is_empty() {
            let last = self.live.len() - 1;
            self.release_at(last);
        }
        self.spawn_order.clear();
    }
}
