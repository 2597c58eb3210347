use std::convert::Infallible;

use crate::{
    cw,
    header,
    image::PixelSource,
    modes::{
        self,
        ModeSpecification,
    },
    scan::{
        ChromaPlane,
        encode_line,
    },
    sink::SampleSink,
    synth::ToneSynthesizer,
};

/// Pause between the end of the image and the CW identification.
const CW_IDENT_GAP_TIME: f64 = 0.5;

#[derive(Debug, thiserror::Error)]
#[error("encode error")]
pub enum EncodeError<E> {
    #[error("unknown mode: {id:?}")]
    UnknownMode { id: String },
    #[error(
        "pixel source is {actual_width}x{actual_height}, mode wants {expected_width}x{expected_height}"
    )]
    DimensionMismatch {
        expected_width: usize,
        expected_height: usize,
        actual_width: usize,
        actual_height: usize,
    },
    #[error("character not in the morse table: {character:?}")]
    UnsupportedCharacter { character: char },
    #[error("invalid parameter: {name}")]
    InvalidParameter { name: &'static str },
    Sink(#[source] E),
}

/// CW identification appended after the image.
#[derive(Clone, Copy, Debug)]
pub struct CwIdentification<'a> {
    pub callsign: &'a str,
    pub words_per_minute: u32,
    pub tone: f64,
}

/// Encode a full image in the given mode, VIS header first unless disabled.
///
/// The pixel source must already match the mode's dimensions; the engine
/// reports a mismatch instead of cropping or scaling.
pub fn encode_image<P, S>(
    mode_id: &str,
    pixels: &P,
    emit_vis: bool,
    synth: &mut ToneSynthesizer,
    sink: &mut S,
) -> Result<(), EncodeError<S::Error>>
where
    P: PixelSource,
    S: SampleSink,
{
    let mode = modes::lookup(mode_id).ok_or_else(|| {
        EncodeError::UnknownMode {
            id: mode_id.to_owned(),
        }
    })?;
    encode_image_with_mode(mode, pixels, emit_vis, synth, sink)
}

pub fn encode_image_with_mode<P, S>(
    mode: &ModeSpecification,
    pixels: &P,
    emit_vis: bool,
    synth: &mut ToneSynthesizer,
    sink: &mut S,
) -> Result<(), EncodeError<S::Error>>
where
    P: PixelSource,
    S: SampleSink,
{
    if pixels.width() != mode.pixels_per_line || pixels.height() != mode.num_lines {
        return Err(EncodeError::DimensionMismatch {
            expected_width: mode.pixels_per_line,
            expected_height: mode.num_lines,
            actual_width: pixels.width(),
            actual_height: pixels.height(),
        });
    }

    tracing::debug!(mode = mode.short_name, emit_vis, "encoding image");

    if emit_vis {
        header::encode_vis_header(mode.vis_code, synth, sink).map_err(EncodeError::Sink)?;
    }

    // the robot chroma alternation spans lines, so the plane selector lives
    // out here and is threaded through each call
    let mut chroma = ChromaPlane::default();
    for y in 0..mode.num_lines {
        tracing::trace!(y, "scan line");
        encode_line(mode, pixels, y, chroma, synth, sink).map_err(EncodeError::Sink)?;
        chroma = chroma.next();
    }

    Ok(())
}

/// Encode a complete transmission into a sample buffer: VIS header, image,
/// and optional CW identification, on a single synthesizer so the waveform
/// stays phase-continuous throughout.
pub fn encode_transmission<P>(
    mode_id: &str,
    pixels: &P,
    sample_rate: u32,
    emit_vis: bool,
    cw_identification: Option<CwIdentification<'_>>,
) -> Result<Vec<i16>, EncodeError<Infallible>>
where
    P: PixelSource,
{
    let mut samples = Vec::new();
    let mut synth = ToneSynthesizer::new(sample_rate);

    encode_image(mode_id, pixels, emit_vis, &mut synth, &mut samples)?;

    if let Some(ident) = cw_identification {
        synth
            .emit_silence(CW_IDENT_GAP_TIME, &mut samples)
            .map_err(EncodeError::Sink)?;
        cw::encode_callsign(
            ident.callsign,
            ident.words_per_minute,
            ident.tone,
            &mut synth,
            &mut samples,
        )?;
    }

    tracing::debug!(num_samples = samples.len(), "transmission encoded");

    Ok(samples)
}
