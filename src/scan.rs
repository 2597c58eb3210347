use crate::{
    CHANNEL_HIGH_TONE,
    CHANNEL_LOW_TONE,
    CHROMA_PORCH_TONE,
    EVEN_SEPARATOR_TONE,
    ODD_SEPARATOR_TONE,
    PORCH_TONE,
    SYNC_TONE,
    image::{
        Channel,
        PixelSource,
        chroma_blue,
        chroma_red,
        luma,
    },
    modes::{
        ColorFamily,
        ModeSpecification,
    },
    sink::SampleSink,
    synth::{
        ToneSegment,
        ToneSynthesizer,
    },
};

/// Which chroma plane a Robot-family line carries. The alternation spans
/// line-encoder calls, so the image encoder owns the value and threads it
/// into every [`encode_line`] call.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ChromaPlane {
    #[default]
    RminusY,
    BminusY,
}

impl ChromaPlane {
    #[inline]
    pub fn next(self) -> Self {
        match self {
            Self::RminusY => Self::BminusY,
            Self::BminusY => Self::RminusY,
        }
    }
}

/// Map a scan level to its tone: 0 is black (1500 Hz), 255 is white
/// (2300 Hz). Chroma math can land slightly outside [0, 255], so the result
/// is clamped into the channel band.
#[inline]
pub(crate) fn level_frequency(value: f64) -> f64 {
    let t = value / 255.0;
    ((1.0 - t) * CHANNEL_LOW_TONE + t * CHANNEL_HIGH_TONE)
        .clamp(CHANNEL_LOW_TONE, CHANNEL_HIGH_TONE)
}

/// Emit one scan line of `pixels` through the shared synthesizer.
///
/// `chroma` selects the plane a 4:2:0 line carries and is ignored by the
/// other families.
pub fn encode_line<P, S>(
    mode: &ModeSpecification,
    pixels: &P,
    y: usize,
    chroma: ChromaPlane,
    synth: &mut ToneSynthesizer,
    sink: &mut S,
) -> Result<(), S::Error>
where
    P: PixelSource,
    S: SampleSink,
{
    match mode.family {
        ColorFamily::RgbSequential => {
            if mode.sync_at_line_start {
                encode_martin_line(mode, pixels, y, synth, sink)
            }
            else {
                encode_scottie_line(mode, pixels, y, synth, sink)
            }
        }
        ColorFamily::YuvSubsampled420 => encode_yuv420_line(mode, pixels, y, chroma, synth, sink),
        ColorFamily::YuvSubsampled422 => encode_yuv422_line(mode, pixels, y, synth, sink),
    }
}

fn encode_martin_line<P, S>(
    mode: &ModeSpecification,
    pixels: &P,
    y: usize,
    synth: &mut ToneSynthesizer,
    sink: &mut S,
) -> Result<(), S::Error>
where
    P: PixelSource,
    S: SampleSink,
{
    synth.emit(ToneSegment::new(SYNC_TONE, mode.sync_time), sink)?;
    synth.emit(ToneSegment::new(PORCH_TONE, mode.porch_time), sink)?;

    for channel in mode.channel_order {
        scan_channel(mode, pixels, y, channel, synth, sink)?;
        synth.emit(ToneSegment::new(PORCH_TONE, mode.sep_time), sink)?;
    }

    Ok(())
}

fn encode_scottie_line<P, S>(
    mode: &ModeSpecification,
    pixels: &P,
    y: usize,
    synth: &mut ToneSynthesizer,
    sink: &mut S,
) -> Result<(), S::Error>
where
    P: PixelSource,
    S: SampleSink,
{
    // one extra sync pulse marks the start of the very first line
    if y == 0 {
        synth.emit(ToneSegment::new(SYNC_TONE, mode.sync_time), sink)?;
    }

    let [first, second, last] = mode.channel_order;

    synth.emit(ToneSegment::new(PORCH_TONE, mode.sep_time), sink)?;
    scan_channel(mode, pixels, y, first, synth, sink)?;
    synth.emit(ToneSegment::new(PORCH_TONE, mode.sep_time), sink)?;
    scan_channel(mode, pixels, y, second, synth, sink)?;

    // the sync sits mid-line, ahead of the last channel
    synth.emit(ToneSegment::new(SYNC_TONE, mode.sync_time), sink)?;
    synth.emit(ToneSegment::new(PORCH_TONE, mode.porch_time), sink)?;
    scan_channel(mode, pixels, y, last, synth, sink)?;

    Ok(())
}

fn encode_yuv420_line<P, S>(
    mode: &ModeSpecification,
    pixels: &P,
    y: usize,
    chroma: ChromaPlane,
    synth: &mut ToneSynthesizer,
    sink: &mut S,
) -> Result<(), S::Error>
where
    P: PixelSource,
    S: SampleSink,
{
    synth.emit(ToneSegment::new(SYNC_TONE, mode.sync_time), sink)?;
    synth.emit(ToneSegment::new(PORCH_TONE, mode.porch_time), sink)?;
    scan_luma(mode, pixels, y, synth, sink)?;

    // the separator tone tells the receiver which plane follows
    let separator_tone = match chroma {
        ChromaPlane::RminusY => EVEN_SEPARATOR_TONE,
        ChromaPlane::BminusY => ODD_SEPARATOR_TONE,
    };
    synth.emit(ToneSegment::new(separator_tone, mode.sep_time), sink)?;
    synth.emit(
        ToneSegment::new(CHROMA_PORCH_TONE, mode.chroma_porch_time),
        sink,
    )?;
    scan_chroma(mode, pixels, y, chroma, synth, sink)?;

    Ok(())
}

fn encode_yuv422_line<P, S>(
    mode: &ModeSpecification,
    pixels: &P,
    y: usize,
    synth: &mut ToneSynthesizer,
    sink: &mut S,
) -> Result<(), S::Error>
where
    P: PixelSource,
    S: SampleSink,
{
    synth.emit(ToneSegment::new(SYNC_TONE, mode.sync_time), sink)?;
    synth.emit(ToneSegment::new(PORCH_TONE, mode.porch_time), sink)?;
    scan_luma(mode, pixels, y, synth, sink)?;

    synth.emit(ToneSegment::new(EVEN_SEPARATOR_TONE, mode.sep_time), sink)?;
    synth.emit(
        ToneSegment::new(CHROMA_PORCH_TONE, mode.chroma_porch_time),
        sink,
    )?;
    scan_chroma(mode, pixels, y, ChromaPlane::RminusY, synth, sink)?;

    synth.emit(ToneSegment::new(ODD_SEPARATOR_TONE, mode.sep_time), sink)?;
    synth.emit(
        ToneSegment::new(CHROMA_PORCH_TONE, mode.chroma_porch_time),
        sink,
    )?;
    scan_chroma(mode, pixels, y, ChromaPlane::BminusY, synth, sink)?;

    Ok(())
}

fn scan_channel<P, S>(
    mode: &ModeSpecification,
    pixels: &P,
    y: usize,
    channel: Channel,
    synth: &mut ToneSynthesizer,
    sink: &mut S,
) -> Result<(), S::Error>
where
    P: PixelSource,
    S: SampleSink,
{
    for x in 0..mode.pixels_per_line {
        let value = pixels.channel(x, y, channel);
        synth.emit(
            ToneSegment::new(level_frequency(value.into()), mode.pixel_time),
            sink,
        )?;
    }
    Ok(())
}

fn scan_luma<P, S>(
    mode: &ModeSpecification,
    pixels: &P,
    y: usize,
    synth: &mut ToneSynthesizer,
    sink: &mut S,
) -> Result<(), S::Error>
where
    P: PixelSource,
    S: SampleSink,
{
    for x in 0..mode.pixels_per_line {
        let value = luma(pixels.rgb(x, y));
        synth.emit(
            ToneSegment::new(level_frequency(value), mode.pixel_time),
            sink,
        )?;
    }
    Ok(())
}

fn scan_chroma<P, S>(
    mode: &ModeSpecification,
    pixels: &P,
    y: usize,
    plane: ChromaPlane,
    synth: &mut ToneSynthesizer,
    sink: &mut S,
) -> Result<(), S::Error>
where
    P: PixelSource,
    S: SampleSink,
{
    for x in 0..mode.chroma_samples() {
        // half horizontal resolution: average each column pair
        let left = pixels.rgb(2 * x, y);
        let right = pixels.rgb(2 * x + 1, y);
        let value = match plane {
            ChromaPlane::RminusY => 0.5 * (chroma_red(left) + chroma_red(right)),
            ChromaPlane::BminusY => 0.5 * (chroma_blue(left) + chroma_blue(right)),
        };
        synth.emit(
            ToneSegment::new(level_frequency(value), mode.chroma_pixel_time),
            sink,
        )?;
    }
    Ok(())
}
