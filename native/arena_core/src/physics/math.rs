//! Path: native/arena_core/src/physics/math.rs
//! Summary: 2D ベクトル補助関数（二乗距離・正規化・回転・角度差）

/// 二乗距離（sqrt を避けて高速化）
#[inline]
pub fn dist_sq(x1: f32, y1: f32, x2: f32, y2: f32) -> f32 {
    let dx = x1 - x2;
    let dy = y1 - y2;
    dx * dx + dy * dy
}

/// 正規化。長さがほぼ 0 のときは (0, 0) と長さ 0 を返す。
#[inline]
pub fn normalize(x: f32, y: f32) -> (f32, f32, f32) {
    let len = (x * x + y * y).sqrt();
    if len > 1e-4 {
        (x / len, y / len, len)
    } else {
        (0.0, 0.0, 0.0)
    }
}

/// -π〜π に正規化した角度差
#[inline]
pub fn wrap_angle(mut a: f32) -> f32 {
    use std::f32::consts::{PI, TAU};
    while a > PI {
        a -= TAU;
    }
    while a < -PI {
        a += TAU;
    }
    a
}

#[inline]
pub fn is_finite2(x: f32, y: f32) -> bool {
    x.is_finite() && y.is_finite()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_zero_vector() {
        assert_eq!(normalize(0.0, 0.0), (0.0, 0.0, 0.0));
        let (nx, ny, len) = normalize(3.0, 4.0);
        assert!((nx - 0.6).abs() < 1e-6 && (ny - 0.8).abs() < 1e-6);
        assert!((len - 5.0).abs() < 1e-6);
    }

    #[test]
    fn wrap_angle_across_pi() {
        let d = wrap_angle(3.0 * std::f32::consts::PI / 2.0);
        assert!((d + std::f32::consts::FRAC_PI_2).abs() < 1e-5);
    }
}
