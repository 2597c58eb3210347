//! Mode timing tables.
//!
//! Timings adapted from the N7CXI Dayton paper, cross-checked against the
//! [slowrx mode table][1]. [Vis codes][2]
//!
//! [1]: https://github.com/windytan/slowrx/blob/master/modespec.c
//! [2]: https://web.archive.org/web/20050306193820/http://www.tima.com/~djones/vis.txt

use std::{
    collections::HashMap,
    sync::OnceLock,
};

use crate::image::Channel;

/// Scan-line structure families. The finite set is matched exhaustively in
/// the scan-line encoder, so adding a family is a compile-visible change.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ColorFamily {
    /// Three full-resolution color channels per line (Martin, Scottie).
    RgbSequential,
    /// Full-resolution luma and one half-resolution chroma plane per line,
    /// alternating R−Y and B−Y on successive lines (Robot 36).
    YuvSubsampled420,
    /// Full-resolution luma and both chroma planes at half horizontal
    /// resolution on every line (Robot 72).
    YuvSubsampled422,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub struct VisCode(u8);

impl VisCode {
    #[inline]
    pub const fn new(value: u8) -> Option<Self> {
        if value & 0x80 == 0 {
            Some(Self(value))
        }
        else {
            None
        }
    }

    #[inline]
    pub const fn new_unchecked(value: u8) -> Self {
        Self(value)
    }

    #[inline]
    pub fn get(&self) -> u8 {
        self.0
    }

    /// Data bit `bit` of the transmitted LSB-first word. Bit 7 of a 7-bit
    /// code is always zero.
    #[inline]
    pub fn get_bit(&self, bit: u8) -> bool {
        assert!(bit < 8);
        (self.0 >> bit) & 1 != 0
    }

    /// Even-parity bit over the 8 data bits: set iff the data word has an
    /// odd number of ones.
    #[inline]
    pub fn parity(&self) -> bool {
        let parity = (self.0 >> 6)
            ^ (self.0 >> 5)
            ^ (self.0 >> 4)
            ^ (self.0 >> 3)
            ^ (self.0 >> 2)
            ^ (self.0 >> 1)
            ^ self.0;
        parity & 1 != 0
    }
}

/// Timing and format parameters of one SSTV mode. All durations are in
/// seconds; together with `pixels_per_line` they determine the per-line and
/// total transmission time, see [`line_duration`](Self::line_duration).
#[derive(Clone, Copy, Debug)]
pub struct ModeSpecification {
    pub name: &'static str,
    /// Lookup id, e.g. `"m1"`, `"s2"`, `"r36"`.
    pub short_name: &'static str,
    pub vis_code: VisCode,
    pub family: ColorFamily,
    pub pixels_per_line: usize,
    pub num_lines: usize,
    /// Transmission order of the color channels (RGB-sequential family).
    pub channel_order: [Channel; 3],
    /// Martin puts the sync pulse at the line start; Scottie transmits it
    /// mid-line, before the last channel, plus one starting sync before the
    /// first line. This positional difference defines the two families.
    pub sync_at_line_start: bool,
    pub sync_time: f64,
    pub porch_time: f64,
    pub sep_time: f64,
    pub pixel_time: f64,
    /// Robot family only: porch before each chroma scan (1900 Hz).
    pub chroma_porch_time: f64,
    /// Robot family only: duration of one half-resolution chroma sample.
    pub chroma_pixel_time: f64,
}

impl ModeSpecification {
    /// N7CXI, 2000
    pub const M1: Self = Self {
        name: "Martin M1",
        short_name: "m1",
        vis_code: VisCode(0x2c),
        family: ColorFamily::RgbSequential,
        pixels_per_line: 320,
        num_lines: 256,
        channel_order: [Channel::Green, Channel::Blue, Channel::Red],
        sync_at_line_start: true,
        sync_time: 4.862e-3,
        porch_time: 0.572e-3,
        sep_time: 0.572e-3,
        pixel_time: 0.4576e-3,
        chroma_porch_time: 0.0,
        chroma_pixel_time: 0.0,
    };

    /// N7CXI, 2000
    pub const M2: Self = Self {
        name: "Martin M2",
        short_name: "m2",
        vis_code: VisCode(0x28),
        family: ColorFamily::RgbSequential,
        pixels_per_line: 320,
        num_lines: 256,
        channel_order: [Channel::Green, Channel::Blue, Channel::Red],
        sync_at_line_start: true,
        sync_time: 4.862e-3,
        porch_time: 0.572e-3,
        sep_time: 0.572e-3,
        pixel_time: 0.2288e-3,
        chroma_porch_time: 0.0,
        chroma_pixel_time: 0.0,
    };

    /// N7CXI, 2000
    pub const S1: Self = Self {
        name: "Scottie S1",
        short_name: "s1",
        vis_code: VisCode(0x3c),
        family: ColorFamily::RgbSequential,
        pixels_per_line: 320,
        num_lines: 256,
        channel_order: [Channel::Green, Channel::Blue, Channel::Red],
        sync_at_line_start: false,
        sync_time: 9e-3,
        porch_time: 1.5e-3,
        sep_time: 1.5e-3,
        pixel_time: 0.4320e-3,
        chroma_porch_time: 0.0,
        chroma_pixel_time: 0.0,
    };

    /// N7CXI, 2000
    pub const S2: Self = Self {
        name: "Scottie S2",
        short_name: "s2",
        vis_code: VisCode(0x38),
        family: ColorFamily::RgbSequential,
        pixels_per_line: 320,
        num_lines: 256,
        channel_order: [Channel::Green, Channel::Blue, Channel::Red],
        sync_at_line_start: false,
        sync_time: 9e-3,
        porch_time: 1.5e-3,
        sep_time: 1.5e-3,
        pixel_time: 0.2752e-3,
        chroma_porch_time: 0.0,
        chroma_pixel_time: 0.0,
    };

    /// N7CXI, 2000
    pub const SDX: Self = Self {
        name: "Scottie DX",
        short_name: "sdx",
        vis_code: VisCode(0x4c),
        family: ColorFamily::RgbSequential,
        pixels_per_line: 320,
        num_lines: 256,
        channel_order: [Channel::Green, Channel::Blue, Channel::Red],
        sync_at_line_start: false,
        sync_time: 9e-3,
        porch_time: 1.5e-3,
        sep_time: 1.5e-3,
        pixel_time: 1.08e-3,
        chroma_porch_time: 0.0,
        chroma_pixel_time: 0.0,
    };

    /// N7CXI, 2000
    pub const R36: Self = Self {
        name: "Robot 36",
        short_name: "r36",
        vis_code: VisCode(0x08),
        family: ColorFamily::YuvSubsampled420,
        pixels_per_line: 320,
        num_lines: 240,
        channel_order: [Channel::Green, Channel::Blue, Channel::Red],
        sync_at_line_start: true,
        sync_time: 9e-3,
        porch_time: 3e-3,
        sep_time: 4.5e-3,
        pixel_time: 0.275e-3,
        chroma_porch_time: 1.5e-3,
        chroma_pixel_time: 0.275e-3,
    };

    /// N7CXI, 2000
    pub const R72: Self = Self {
        name: "Robot 72",
        short_name: "r72",
        vis_code: VisCode(0x0c),
        family: ColorFamily::YuvSubsampled422,
        pixels_per_line: 320,
        num_lines: 240,
        channel_order: [Channel::Green, Channel::Blue, Channel::Red],
        sync_at_line_start: true,
        sync_time: 9e-3,
        porch_time: 3e-3,
        sep_time: 4.5e-3,
        pixel_time: 0.43125e-3,
        chroma_porch_time: 1.5e-3,
        chroma_pixel_time: 0.43125e-3,
    };

    pub const ALL: [&'static Self; 7] = [
        &Self::M1,
        &Self::M2,
        &Self::S1,
        &Self::S2,
        &Self::SDX,
        &Self::R36,
        &Self::R72,
    ];

    /// Number of half-resolution chroma samples per line (Robot family).
    #[inline]
    pub fn chroma_samples(&self) -> usize {
        self.pixels_per_line / 2
    }

    /// Duration of one transmitted scan line, derived from the same
    /// components the scan-line encoder emits.
    pub fn line_duration(&self) -> f64 {
        let scan = self.pixel_time * self.pixels_per_line as f64;
        let chroma_scan = self.chroma_pixel_time * self.chroma_samples() as f64;

        match self.family {
            ColorFamily::RgbSequential => {
                // Martin: sync, porch, 3 × (scan, separator)
                // Scottie: separator, scan, separator, scan, sync, porch, scan
                let num_separators = if self.sync_at_line_start { 3.0 } else { 2.0 };
                self.sync_time + self.porch_time + num_separators * self.sep_time + 3.0 * scan
            }
            ColorFamily::YuvSubsampled420 => {
                self.sync_time
                    + self.porch_time
                    + scan
                    + self.sep_time
                    + self.chroma_porch_time
                    + chroma_scan
            }
            ColorFamily::YuvSubsampled422 => {
                self.sync_time
                    + self.porch_time
                    + scan
                    + 2.0 * (self.sep_time + self.chroma_porch_time + chroma_scan)
            }
        }
    }

    /// Total duration of the image portion of a transmission, including the
    /// Scottie starting sync but not the VIS header.
    pub fn total_duration(&self) -> f64 {
        let starting_sync = if self.sync_at_line_start {
            0.0
        }
        else {
            self.sync_time
        };
        starting_sync + self.line_duration() * self.num_lines as f64
    }

    /// Static-table sanity checks. A violation here is a corrupted table,
    /// not user input, and aborts.
    fn validate(&self) {
        assert!(self.pixels_per_line * self.num_lines > 0, "{}: empty image", self.short_name);
        assert!(self.sync_time > 0.0, "{}: sync_time", self.short_name);
        assert!(self.porch_time > 0.0, "{}: porch_time", self.short_name);
        assert!(self.sep_time > 0.0, "{}: sep_time", self.short_name);
        assert!(self.pixel_time > 0.0, "{}: pixel_time", self.short_name);
        if !matches!(self.family, ColorFamily::RgbSequential) {
            assert!(self.chroma_porch_time > 0.0, "{}: chroma_porch_time", self.short_name);
            assert!(self.chroma_pixel_time > 0.0, "{}: chroma_pixel_time", self.short_name);
        }
    }
}

/// Look up a mode by its short id (ASCII case-insensitive). Unknown ids are
/// the caller's user-facing error, not ours.
pub fn lookup(id: &str) -> Option<&'static ModeSpecification> {
    static MAP: OnceLock<HashMap<&'static str, &'static ModeSpecification>> = OnceLock::new();
    let map = MAP.get_or_init(|| {
        let mut map = HashMap::new();
        for mode in ModeSpecification::ALL {
            mode.validate();
            map.insert(mode.short_name, mode);
        }
        map
    });

    map.get(id.to_ascii_lowercase().as_str()).copied()
}
