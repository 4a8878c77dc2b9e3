//! Script integers -> stick axis values and polar form.

use crate::model::{ANALOG_SCALE, MAX_POWER, Stick};

use super::ast::RawStick;

/// Convert one raw script value to an axis value.
pub fn axis(raw: f64) -> f64 {
    // `+ 0.0` turns -0 into +0 so atan2 never yields -PI
    raw / ANALOG_SCALE + 0.0
}

/// Build a stick from already-converted axes.
pub fn stick(x: f64, y: f64) -> Stick {
    Stick {
        x,
        y,
        power: x.hypot(y).abs().min(MAX_POWER),
        angle: y.atan2(x),
    }
}

/// Absent pairs mean a centred stick.
pub fn convert(raw: Option<RawStick>) -> Stick {
    let RawStick { x, y } = raw.unwrap_or_default();
    stick(axis(x), axis(y))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::{FRAC_PI_2, PI};

    fn raw(x: f64, y: f64) -> Option<RawStick> {
        Some(RawStick { x, y })
    }

    #[test]
    fn test_full_right() {
        let s = convert(raw(300.0, 0.0));
        assert_eq!(s.x, 1.0);
        assert_eq!(s.y, 0.0);
        assert_eq!(s.power, 1.0);
        assert_eq!(s.angle, 0.0);
    }

    #[test]
    fn test_directions() {
        let test_cases = vec![
            ((0.0, 300.0), FRAC_PI_2),
            ((0.0, -300.0), -FRAC_PI_2),
            ((-300.0, 0.0), PI),
            ((-300.0, -0.0), PI),
            ((0.0, 0.0), 0.0),
        ];

        for ((x, y), angle) in test_cases {
            let s = convert(raw(x, y));
            assert!((s.angle - angle).abs() < 1e-12, "({x}, {y}) -> {}", s.angle);
            assert!(s.angle > -PI && s.angle <= PI);
        }
    }

    #[test]
    fn test_power_cap() {
        let s = convert(raw(30_000.0, 30_000.0));
        assert_eq!(s.x, 100.0);
        assert_eq!(s.power, MAX_POWER);

        let s = convert(raw(-90_000.0, 0.0));
        assert_eq!(s.x, -300.0, "axes are not clamped");
        assert_eq!(s.power, MAX_POWER);
    }

    #[test]
    fn test_absent_pair_is_centred() {
        assert_eq!(convert(None), Stick::default());
    }

    #[test]
    fn test_pythagorean_power() {
        let s = convert(raw(900.0, 1200.0));
        assert!((s.power - 5.0).abs() < 1e-12);
    }
}
