//! 8-bit to 16-bit DAC color channel conversion.

/// Convert an 8-bit control-protocol color value to the DAC's 16-bit channel.
///
/// The input is clamped to `[0, 255]` and scaled by 257, the unique integer
/// factor that maps 0 to 0 and 255 to 65535. Pure and total; out-of-range
/// input saturates rather than erroring because control traffic is
/// best-effort.
pub fn to_dac_channel(value: i32) -> u16 {
    value.clamp(0, 255) as u16 * 257
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoints_map_exactly() {
        assert_eq!(to_dac_channel(0), 0);
        assert_eq!(to_dac_channel(255), 65535);
    }

    #[test]
    fn out_of_range_saturates() {
        assert_eq!(to_dac_channel(-5), 0);
        assert_eq!(to_dac_channel(300), 65535);
        assert_eq!(to_dac_channel(i32::MIN), 0);
        assert_eq!(to_dac_channel(i32::MAX), 65535);
    }

    #[test]
    fn scale_is_linear_times_257() {
        for byte in 0..=255 {
            assert_eq!(to_dac_channel(byte), byte as u16 * 257);
        }
    }
}
