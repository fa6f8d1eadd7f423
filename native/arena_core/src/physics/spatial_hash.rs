//! Path: native/arena_core/src/physics/spatial_hash.rs
//! Summary: 毎フレーム再構築する一様グリッド空間ハッシュ（3x3 近傍クエリ）
//!
//! 削除操作は持たない。毎フレーム `clear` → `insert_all` で作り直す。

use rustc_hash::FxHashMap;

/// 保持するセル数がこれを超えたらマップごと作り直す（訪れたセルの Vec が溜まり続けるのを防ぐ）
const MAX_RETAINED_CELLS: usize = 4096;

pub struct SpatialHash<T> {
    pub cell_size: f32,
    cells:         FxHashMap<(i32, i32), Vec<T>>,
    len:           usize,
}

impl<T: Copy> SpatialHash<T> {
    pub fn new(cell_size: f32) -> Self {
        Self {
            cell_size,
            cells: FxHashMap::default(),
            len:   0,
        }
    }

    /// 全エントリを消す。セルの Vec は容量を保ったまま再利用する。
    pub fn clear(&mut self) {
        if self.cells.len() > MAX_RETAINED_CELLS {
            self.cells.clear();
        } else {
            self.cells.values_mut().for_each(Vec::clear);
        }
        self.len = 0;
    }

    #[inline]
    pub fn cell_key(&self, x: f32, y: f32) -> (i32, i32) {
        (
            (x / self.cell_size).floor() as i32,
            (y / self.cell_size).floor() as i32,
        )
    }

    /// 非有限座標のエントリは登録しない
    pub fn insert(&mut self, entry: T, x: f32, y: f32) {
        if !x.is_finite() || !y.is_finite() {
            return;
        }
        let key = self.cell_key(x, y);
        self.cells.entry(key).or_default().push(entry);
        self.len += 1;
    }

    pub fn insert_all<I>(&mut self, entries: I)
    where
        I: IntoIterator<Item = (T, f32, f32)>,
    {
        for (entry, x, y) in entries {
            self.insert(entry, x, y);
        }
    }

    /// (x, y) のセルとその 8 近傍に入っているエントリを `buf` に書き込む（アロケーションなし）。
    /// 呼び出し前に `buf` をクリアする必要はない。
    pub fn query_into(&self, x: f32, y: f32, buf: &mut Vec<T>) {
        self.query_block_into(x, y, 1, buf);
    }

    pub fn query(&self, x: f32, y: f32) -> Vec<T> {
        let mut buf = Vec::new();
        self.query_into(x, y, &mut buf);
        buf
    }

    /// 半径がセルサイズを超える場合でも取りこぼさないブロックで検索する
    pub fn query_radius_into(&self, x: f32, y: f32, radius: f32, buf: &mut Vec<T>) {
        let reach = (radius.max(0.0) / self.cell_size).ceil().max(1.0) as i32;
        self.query_block_into(x, y, reach, buf);
    }

    fn query_block_into(&self, x: f32, y: f32, reach: i32, buf: &mut Vec<T>) {
        buf.clear();
        if !x.is_finite() || !y.is_finite() {
            return;
        }
        let (cx, cy) = self.cell_key(x, y);
        for ix in (cx - reach)..=(cx + reach) {
            for iy in (cy - reach)..=(cy + reach) {
                if let Some(entries) = self.cells.get(&(ix, iy)) {
                    buf.extend_from_slice(entries);
                }
            }
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// エントリを持つセルの数
    pub fn occupied_cells(&self) -> usize {
        self.cells.values().filter(|v| !v.is_empty()).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::physics::rng::SimpleRng;

    #[test]
    fn query_returns_neighbor_cells_only() {
        let mut grid = SpatialHash::new(100.0);
        grid.insert(1_u32, 50.0, 50.0);
        grid.insert(2, 150.0, 50.0);
        grid.insert(3, 450.0, 450.0);

        let mut found = grid.query(60.0, 60.0);
        found.sort();
        assert_eq!(found, vec![1, 2]);
        assert_eq!(grid.query(460.0, 460.0), vec![3]);
        assert_eq!(grid.len(), 3);
        assert_eq!(grid.occupied_cells(), 3);
    }

    #[test]
    fn negative_coordinates_use_floor() {
        let grid = SpatialHash::<u32>::new(100.0);
        assert_eq!(grid.cell_key(-1.0, -0.5), (-1, -1));
        assert_eq!(grid.cell_key(99.9, 100.0), (0, 1));
    }

    #[test]
    fn clear_empties_but_keeps_working() {
        let mut grid = SpatialHash::new(100.0);
        grid.insert(7_u32, 10.0, 10.0);
        grid.clear();
        assert!(grid.is_empty());
        assert_eq!(grid.occupied_cells(), 0);
        assert!(grid.query(10.0, 10.0).is_empty());
        grid.insert(8, 10.0, 10.0);
        assert_eq!(grid.query(10.0, 10.0), vec![8]);
    }

    #[test]
    fn non_finite_positions_are_ignored() {
        let mut grid = SpatialHash::new(100.0);
        grid.insert(1_u32, f32::NAN, 0.0);
        grid.insert(2, 0.0, f32::INFINITY);
        assert!(grid.is_empty());
        assert!(grid.query(f32::NAN, 0.0).is_empty());
    }

    #[test]
    fn no_false_negatives_within_one_cell() {
        let cell = 400.0;
        let mut rng = SimpleRng::new(2024);
        let points: Vec<(f32, f32)> = (0..400)
            .map(|_| (rng.range(-2000.0, 2000.0), rng.range(-2000.0, 2000.0)))
            .collect();
        let mut grid = SpatialHash::new(cell);
        grid.insert_all(points.iter().enumerate().map(|(i, &(x, y))| (i, x, y)));

        let mut buf = Vec::new();
        for (a, &(ax, ay)) in points.iter().enumerate() {
            grid.query_into(ax, ay, &mut buf);
            for (b, &(bx, by)) in points.iter().enumerate() {
                let (dx, dy) = (ax - bx, ay - by);
                if dx * dx + dy * dy <= cell * cell {
                    assert!(buf.contains(&b), "{b} missing from query at {a}");
                }
            }
        }
    }

    #[test]
    fn radius_query_covers_large_radius() {
        let mut grid = SpatialHash::new(100.0);
        grid.insert(1_u32, 0.0, 0.0);
        grid.insert(2, 350.0, 0.0);
        let mut buf = Vec::new();
        grid.query_into(0.0, 0.0, &mut buf);
        assert_eq!(buf, vec![1]);
        grid.query_radius_into(0.0, 0.0, 360.0, &mut buf);
        buf.sort();
        assert_eq!(buf, vec![1, 2]);
    }
}
