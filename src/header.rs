use crate::{
    LEADER_BREAK_TIME,
    LEADER_TIME,
    LEADER_TONE,
    SYNC_TONE,
    VIS_BIT_TIME,
    VIS_HIGH_TONE,
    VIS_LOW_TONE,
    modes::VisCode,
    sink::SampleSink,
    synth::{
        ToneSegment,
        ToneSynthesizer,
    },
};

/// Emit the VIS (Vertical Interval Signaling) header announcing `vis_code`.
///
/// Two 300 ms leader tones around a 10 ms break, then the 30 ms-per-bit code
/// word: start bit, eight data bits LSB first (1 → 1100 Hz, 0 → 1300 Hz),
/// even-parity bit, stop bit. Receivers key their mode auto-detection off
/// this sequence, so the layout is load-bearing down to the second leader
/// tone — reference captures show both.
pub fn encode_vis_header<S>(
    vis_code: VisCode,
    synth: &mut ToneSynthesizer,
    sink: &mut S,
) -> Result<(), S::Error>
where
    S: SampleSink,
{
    synth.emit(ToneSegment::new(LEADER_TONE, LEADER_TIME), sink)?;
    synth.emit(ToneSegment::new(SYNC_TONE, LEADER_BREAK_TIME), sink)?;
    synth.emit(ToneSegment::new(LEADER_TONE, LEADER_TIME), sink)?;

    synth.emit(ToneSegment::new(SYNC_TONE, VIS_BIT_TIME), sink)?;
    for bit in 0..8 {
        synth.emit(vis_bit(vis_code.get_bit(bit)), sink)?;
    }
    synth.emit(vis_bit(vis_code.parity()), sink)?;
    synth.emit(ToneSegment::new(SYNC_TONE, VIS_BIT_TIME), sink)?;

    Ok(())
}

#[inline]
fn vis_bit(bit: bool) -> ToneSegment {
    ToneSegment::new(
        if bit { VIS_HIGH_TONE } else { VIS_LOW_TONE },
        VIS_BIT_TIME,
    )
}

/// Total header duration: both leaders, the break, and the 11-bit code word.
pub fn vis_header_duration() -> f64 {
    2.0 * LEADER_TIME + LEADER_BREAK_TIME + 11.0 * VIS_BIT_TIME
}
