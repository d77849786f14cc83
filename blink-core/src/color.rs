/// Represents an RGB color value.
///
/// # Fields
/// * `r` - Red component of the color.
/// * `g` - Green component of the color.
/// * `b` - Blue component of the color.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rgb {
    r: u8,
    g: u8,
    b: u8,
}

impl Rgb {
    /// Creates a new `Rgb` instance.
    ///
    /// # Arguments
    /// * `r` - Red component of the color.
    /// * `g` - Green component of the color.
    /// * `b` - Blue component of the color.
    ///
    /// # Returns
    /// A new `Rgb` instance.
    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

impl From<&Rgb> for u32 {
    /// Converts an `Rgb` instance to the GRB word a WS2812 expects.
    /// e.g. rgb: (1,2,4)
    /// G        R        B
    /// 7      0 7      0 7      0
    /// 00000010 00000001 00000100
    fn from(rgb: &Rgb) -> Self {
        (u32::from(rgb.g) << 16) | (u32::from(rgb.r) << 8) | u32::from(rgb.b)
    }
}

/// Predefined black color, i.e. every pixel cleared.
pub const BLACK: Rgb = Rgb::new(0, 0, 0);

/// Color shown by a strip LED while on: full red.
pub const RED: Rgb = Rgb::new(255, 0, 0);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grb_word_puts_green_first() {
        assert_eq!(u32::from(&Rgb::new(1, 2, 4)), 0x0002_0104);
    }

    #[test]
    fn red_lands_in_middle_byte() {
        assert_eq!(u32::from(&RED), 0x0000_FF00);
    }

    #[test]
    fn black_clears_every_channel() {
        assert_eq!(u32::from(&BLACK), 0);
    }
}
