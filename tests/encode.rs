//! End-to-end checks against the protocol's published timings, decoding the
//! emitted tones the way a receiver would (frequency discrimination over the
//! documented bit/scan windows).

use slowtx::{
    CwIdentification,
    EncodeError,
    ModeSpecification,
    PixelSource,
    ToneSynthesizer,
    VisCode,
    encode_callsign,
    encode_transmission,
    encode_vis_header,
};

struct Solid {
    width: usize,
    height: usize,
    rgb: [u8; 3],
}

impl Solid {
    fn black(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            rgb: [0, 0, 0],
        }
    }
}

impl PixelSource for Solid {
    fn width(&self) -> usize {
        self.width
    }

    fn height(&self) -> usize {
        self.height
    }

    fn rgb(&self, _x: usize, _y: usize) -> [u8; 3] {
        self.rgb
    }
}

struct Gradient {
    width: usize,
    height: usize,
}

impl PixelSource for Gradient {
    fn width(&self) -> usize {
        self.width
    }

    fn height(&self) -> usize {
        self.height
    }

    fn rgb(&self, x: usize, y: usize) -> [u8; 3] {
        [
            (x * 255 / (self.width - 1)) as u8,
            (y * 255 / (self.height - 1)) as u8,
            ((x + y) % 256) as u8,
        ]
    }
}

/// Dominant frequency of a sample window, estimated from zero crossings.
/// Plenty to tell protocol tones at least 100 Hz apart from one another.
fn estimate_frequency(samples: &[i16], sample_rate: f64) -> f64 {
    let crossings = samples
        .windows(2)
        .filter(|pair| (pair[0] >= 0) != (pair[1] >= 0))
        .count();
    crossings as f64 * sample_rate / (2.0 * samples.len() as f64)
}

/// Window of `samples` covering `[t0, t1]` seconds, trimmed at both ends so
/// segment-boundary samples don't skew the estimate.
fn window(samples: &[i16], sample_rate: f64, t0: f64, t1: f64) -> &[i16] {
    let trim = ((t1 - t0) * sample_rate * 0.15) as usize;
    let start = (t0 * sample_rate).round() as usize + trim;
    let end = ((t1 * sample_rate).round() as usize).saturating_sub(trim);
    &samples[start..end]
}

/// Decode the 8 data bits and parity bit of an emitted VIS header.
fn decode_vis(samples: &[i16], sample_rate: f64) -> (u8, bool) {
    let bit_at = |index: usize| {
        let t0 = 0.64 + 0.03 * index as f64;
        let frequency = estimate_frequency(window(samples, sample_rate, t0, t0 + 0.03), sample_rate);
        frequency < 1200.0
    };

    let mut data = 0u8;
    for bit in 0..8 {
        if bit_at(bit) {
            data |= 1 << bit;
        }
    }
    (data, bit_at(8))
}

#[test]
fn vis_round_trip_all_codes() {
    let sample_rate = 11025;

    for value in 0..0x80u8 {
        let mut synth = ToneSynthesizer::new(sample_rate);
        let mut samples = Vec::new();
        encode_vis_header(VisCode::new(value).unwrap(), &mut synth, &mut samples).unwrap();

        assert_eq!(
            samples.len(),
            (0.94 * f64::from(sample_rate)).round() as usize
        );

        let rate = f64::from(sample_rate);

        // both leaders and the start bit have to be where receivers look
        // for them
        let leader1 = estimate_frequency(window(&samples, rate, 0.0, 0.3), rate);
        let leader2 = estimate_frequency(window(&samples, rate, 0.31, 0.61), rate);
        let start = estimate_frequency(window(&samples, rate, 0.61, 0.64), rate);
        assert!((leader1 - 1900.0).abs() < 15.0, "leader 1: {leader1}");
        assert!((leader2 - 1900.0).abs() < 15.0, "leader 2: {leader2}");
        assert!((start - 1200.0).abs() < 50.0, "start bit: {start}");

        let (data, parity) = decode_vis(&samples, rate);
        assert_eq!(data, value, "vis code {value:#04x}");
        assert_eq!(
            (data.count_ones() + u32::from(parity)) % 2,
            0,
            "parity of {value:#04x}"
        );
    }
}

#[test]
fn image_duration_matches_mode_table() {
    let sample_rate = 8000;

    for mode in ModeSpecification::ALL {
        let pixels = Solid::black(mode.pixels_per_line, mode.num_lines);
        let samples =
            encode_transmission(mode.short_name, &pixels, sample_rate, false, None).unwrap();

        let expected = (mode.total_duration() * f64::from(sample_rate)).round() as i64;
        let got = samples.len() as i64;
        assert!(
            (got - expected).abs() <= 1,
            "{}: {got} vs {expected}",
            mode.short_name
        );
    }
}

#[test]
fn robot36_black_image_scenario() {
    let sample_rate = 22050;
    let rate = f64::from(sample_rate);
    let pixels = Solid::black(320, 240);

    let samples = encode_transmission("r36", &pixels, sample_rate, true, None).unwrap();

    // 0.94 s of header plus the 36.0 s image
    let expected = (36.94 * rate).round() as i64;
    assert!((samples.len() as i64 - expected).abs() <= 1);

    // vis code 8 is bits 00001000 (lsb first: bit 3 set), odd data ones, so
    // the parity bit fires to make the total even
    let (data, parity) = decode_vis(&samples, rate);
    assert_eq!(data, 8);
    assert!(parity);

    // line 0 after the header: sync 9 ms, porch 3 ms, luma 88 ms, separator
    // 4.5 ms, chroma porch 1.5 ms, chroma 44 ms
    let sync = estimate_frequency(window(&samples, rate, 0.94, 0.949), rate);
    assert!((sync - 1200.0).abs() < 25.0, "sync: {sync}");

    // black luma is 16, not 0: bt.601 footroom puts it at 1550 Hz
    let luma = estimate_frequency(window(&samples, rate, 0.952, 1.040), rate);
    assert!((luma - 1550.2).abs() < 15.0, "luma: {luma}");

    // the window is only 4.5 ms, so the estimate is coarse; it just has to
    // discriminate the even-line 1500 Hz from the odd-line 2300 Hz
    let separator = estimate_frequency(window(&samples, rate, 1.0400, 1.0445), rate);
    assert!((separator - 1500.0).abs() < 300.0, "separator: {separator}");

    // neutral chroma sits mid-band
    let chroma = estimate_frequency(window(&samples, rate, 1.046, 1.090), rate);
    assert!((chroma - 1901.6).abs() < 25.0, "chroma: {chroma}");
}

#[test]
fn martin_black_and_white_scan_levels() {
    let sample_rate = 22050;
    let rate = f64::from(sample_rate);

    // green channel of line 0 runs from sync+porch for 320 pixel times
    let scan_start = 4.862e-3 + 0.572e-3;
    let scan_end = scan_start + 320.0 * 0.4576e-3;

    let black = encode_transmission("m1", &Solid::black(320, 256), sample_rate, false, None)
        .unwrap();
    let frequency = estimate_frequency(window(&black, rate, scan_start, scan_end), rate);
    assert!((frequency - 1500.0).abs() < 10.0, "black: {frequency}");

    let white = Solid {
        width: 320,
        height: 256,
        rgb: [255, 255, 255],
    };
    let white = encode_transmission("m1", &white, sample_rate, false, None).unwrap();
    let frequency = estimate_frequency(window(&white, rate, scan_start, scan_end), rate);
    assert!((frequency - 2300.0).abs() < 10.0, "white: {frequency}");
}

#[test]
fn cw_sos_scenario() {
    let sample_rate = 8000;
    let rate = f64::from(sample_rate);
    let mut synth = ToneSynthesizer::new(sample_rate);
    let mut samples = Vec::new();

    encode_callsign("SOS", 20, 800.0, &mut synth, &mut samples).unwrap();

    // ... --- ... at 20 wpm: dots 0.06 s, dashes 0.18 s, unit gaps inside
    // characters, 3-unit gaps between them: 27 units, 1.62 s
    let expected = (1.62 * rate).round() as i64;
    assert!((samples.len() as i64 - expected).abs() <= 1);

    // first dot keys 800 Hz
    let dot = estimate_frequency(window(&samples, rate, 0.0, 0.06), rate);
    assert!((dot - 800.0).abs() < 25.0, "dot: {dot}");

    // the inter-character gap is dead air
    let gap = window(&samples, rate, 0.31, 0.47);
    assert!(gap.iter().all(|sample| *sample == 0));

    // first dash of the O
    let dash = estimate_frequency(window(&samples, rate, 0.48, 0.66), rate);
    assert!((dash - 800.0).abs() < 15.0, "dash: {dash}");
}

#[test]
fn encoding_is_deterministic() {
    let pixels = Gradient {
        width: 320,
        height: 240,
    };

    let first = encode_transmission("r72", &pixels, 11025, true, None).unwrap();
    let second = encode_transmission("r72", &pixels, 11025, true, None).unwrap();
    assert_eq!(first, second);
}

#[test]
fn vis_header_is_skippable() {
    let sample_rate = 11025;
    let pixels = Solid::black(320, 256);

    let with_vis = encode_transmission("m2", &pixels, sample_rate, true, None).unwrap();
    let without = encode_transmission("m2", &pixels, sample_rate, false, None).unwrap();

    let header = (0.94 * f64::from(sample_rate)).round() as i64;
    let got = with_vis.len() as i64 - without.len() as i64;
    assert!((got - header).abs() <= 1, "{got} vs {header}");
}

#[test]
fn transmission_appends_cw_identification() {
    let sample_rate = 8000;
    let pixels = Solid::black(320, 240);
    let ident = CwIdentification {
        callsign: "N0CALL/P",
        words_per_minute: 20,
        tone: 800.0,
    };

    let plain = encode_transmission("r36", &pixels, sample_rate, false, None).unwrap();
    let identified =
        encode_transmission("r36", &pixels, sample_rate, false, Some(ident)).unwrap();

    assert!(identified.len() > plain.len());
    assert_eq!(identified[..plain.len()], plain[..]);
    // the keyed tail is not silence
    assert!(identified[plain.len()..].iter().any(|sample| *sample != 0));
}

#[test]
fn bad_cw_text_fails_the_whole_transmission() {
    let pixels = Solid::black(320, 240);
    let ident = CwIdentification {
        callsign: "N0CÄLL",
        words_per_minute: 20,
        tone: 800.0,
    };

    let error = encode_transmission("r36", &pixels, 8000, false, Some(ident)).unwrap_err();
    assert!(matches!(
        error,
        EncodeError::UnsupportedCharacter { character: 'Ä' }
    ));
}
