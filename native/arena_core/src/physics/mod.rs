//! Path: native/arena_core/src/physics/mod.rs
//! Summary: 物理プリミティブ（空間ハッシュ・RNG・ベクトル補助）

pub mod math;
pub mod rng;
pub mod spatial_hash;
