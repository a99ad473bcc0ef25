//! Parameter ranges and host-float clamping

/// Closed range for one control parameter
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParamRange {
    pub name: &'static str,
    pub min: f32,
    pub max: f32,
}

impl ParamRange {
    pub const MODE: Self = Self::new("mode", 0.0, 6.0);
    pub const DEGREE: Self = Self::new("degree", 0.0, 6.0);
    pub const OCTAVE: Self = Self::new("octave", 0.0, 7.0);
    pub const ARPEGGIO: Self = Self::new("arpeggio", 1.0, 6.0);
    pub const TEMPO: Self = Self::new("tempo", 30.0, 1000.0);

    pub const fn new(name: &'static str, min: f32, max: f32) -> Self {
        Self { name, min, max }
    }

    /// Saturate `value` into the range.
    ///
    /// Uses `min` then `max` instead of `f32::clamp` so a NaN input lands on
    /// the upper bound rather than propagating.
    pub fn clamp(&self, value: f32) -> f32 {
        value.min(self.max).max(self.min)
    }

    /// Clamp, then truncate toward zero like a float-to-integer store
    pub fn clamp_u8(&self, value: f32) -> u8 {
        self.clamp(value) as u8
    }

    pub fn clamp_u16(&self, value: f32) -> u16 {
        self.clamp(value) as u16
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_saturates_at_bounds() {
        assert_eq!(ParamRange::MODE.clamp_u8(99.0), 6);
        assert_eq!(ParamRange::OCTAVE.clamp_u8(-5.0), 0);
        assert_eq!(ParamRange::ARPEGGIO.clamp_u8(0.0), 1);
        assert_eq!(ParamRange::TEMPO.clamp_u16(5.0), 30);
        assert_eq!(ParamRange::TEMPO.clamp_u16(60_000.0), 1000);
    }

    #[test]
    fn test_fraction_truncates() {
        assert_eq!(ParamRange::DEGREE.clamp_u8(3.9), 3);
        assert_eq!(ParamRange::TEMPO.clamp_u16(200.7), 200);
    }

    #[test]
    fn test_nan_and_infinities() {
        assert_eq!(ParamRange::MODE.clamp_u8(f32::NAN), 6);
        assert_eq!(ParamRange::TEMPO.clamp_u16(f32::INFINITY), 1000);
        assert_eq!(ParamRange::TEMPO.clamp_u16(f32::NEG_INFINITY), 30);
    }
}
