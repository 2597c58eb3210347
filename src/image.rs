use image::RgbImage;

/// One scan channel of an RGB-sequential line, in the green-first order the
/// Martin and Scottie families transmit.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Channel {
    #[default]
    Green,
    Blue,
    Red,
}

/// Read-only pixel access, handed in by the image-processing collaborator.
///
/// The buffer must already be resized, cropped or padded to exactly the
/// mode's dimensions in 8-bit sRGB; the engine never rescales and never
/// writes through this interface.
pub trait PixelSource {
    fn width(&self) -> usize;
    fn height(&self) -> usize;
    fn rgb(&self, x: usize, y: usize) -> [u8; 3];

    #[inline]
    fn channel(&self, x: usize, y: usize, channel: Channel) -> u8 {
        let [r, g, b] = self.rgb(x, y);
        match channel {
            Channel::Green => g,
            Channel::Blue => b,
            Channel::Red => r,
        }
    }
}

impl<F> PixelSource for &F
where
    F: PixelSource,
{
    #[inline]
    fn width(&self) -> usize {
        (&**self).width()
    }

    #[inline]
    fn height(&self) -> usize {
        (&**self).height()
    }

    #[inline]
    fn rgb(&self, x: usize, y: usize) -> [u8; 3] {
        (&**self).rgb(x, y)
    }
}

impl PixelSource for RgbImage {
    #[inline]
    fn width(&self) -> usize {
        RgbImage::width(self).try_into().unwrap()
    }

    #[inline]
    fn height(&self) -> usize {
        RgbImage::height(self).try_into().unwrap()
    }

    #[inline]
    fn rgb(&self, x: usize, y: usize) -> [u8; 3] {
        self.get_pixel(x.try_into().unwrap(), y.try_into().unwrap())
            .0
    }
}

/// ITU-R BT.601 luma, nominally [16, 235] for 8-bit input.
#[inline]
pub fn luma([r, g, b]: [u8; 3]) -> f64 {
    16.0 + 0.003906 * (65.738 * f64::from(r) + 129.057 * f64::from(g) + 25.064 * f64::from(b))
}

/// R−Y chroma plane (Cr), centered on 128.
#[inline]
pub fn chroma_red([r, g, b]: [u8; 3]) -> f64 {
    128.0 + 0.003906 * (112.439 * f64::from(r) - 94.154 * f64::from(g) - 18.285 * f64::from(b))
}

/// B−Y chroma plane (Cb), centered on 128.
#[inline]
pub fn chroma_blue([r, g, b]: [u8; 3]) -> f64 {
    128.0 + 0.003906 * (-37.945 * f64::from(r) - 74.494 * f64::from(g) + 112.439 * f64::from(b))
}
