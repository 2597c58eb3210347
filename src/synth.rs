use std::f64::consts::{
    PI,
    TAU,
};

use crate::sink::SampleSink;

/// A single constant-frequency tone: the unit of work submitted to the
/// [`ToneSynthesizer`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ToneSegment {
    pub frequency: f64,
    pub duration: f64,
}

impl ToneSegment {
    #[inline]
    pub fn new(frequency: f64, duration: f64) -> Self {
        Self {
            frequency,
            duration,
        }
    }
}

/// Direct digital synthesis of a tone sequence into signed 16-bit samples.
///
/// The phase accumulator persists across segments, so consecutive tones of
/// different frequency join without a discontinuity that would splatter into
/// the passband and degrade decoding. One instance drives an entire
/// transmission (header, scan lines, CW identification) and must not be
/// shared between jobs.
#[derive(Clone, Copy, Debug)]
pub struct ToneSynthesizer {
    sample_rate: f64,
    phase: f64,
    elapsed: f64,
    num_samples_emitted: u64,
}

impl ToneSynthesizer {
    pub fn new(sample_rate: u32) -> Self {
        Self {
            sample_rate: sample_rate.into(),
            phase: 0.0,
            elapsed: 0.0,
            num_samples_emitted: 0,
        }
    }

    #[inline]
    pub fn sample_rate(&self) -> f64 {
        self.sample_rate
    }

    /// Current phase in radians, wrapped to [0, 2π).
    #[inline]
    pub fn phase(&self) -> f64 {
        self.phase
    }

    #[inline]
    pub fn num_samples_emitted(&self) -> u64 {
        self.num_samples_emitted
    }

    /// Number of samples the next segment of `duration` seconds gets.
    ///
    /// Derived from the cumulative elapsed time rather than the segment
    /// duration alone. A scan line is split into hundreds of sub-sample-exact
    /// tones; rounding each one separately would drift by dozens of samples
    /// per line, while the cumulative count stays within half a sample of
    /// `elapsed * sample_rate` for the whole transmission.
    fn segment_samples(&mut self, duration: f64) -> u64 {
        self.elapsed += duration;
        ((self.elapsed * self.sample_rate).round() as u64)
            .saturating_sub(self.num_samples_emitted)
    }

    #[inline]
    fn step(&self, frequency: f64) -> f64 {
        (TAU * frequency / self.sample_rate).rem_euclid(TAU)
    }

    #[inline]
    fn advance(&mut self, step: f64) {
        self.phase += step;
        if self.phase > TAU {
            self.phase -= TAU;
        }
    }

    /// Emit one tone segment at full amplitude.
    pub fn emit<S>(&mut self, segment: ToneSegment, sink: &mut S) -> Result<(), S::Error>
    where
        S: SampleSink,
    {
        let num_samples = self.segment_samples(segment.duration);
        let step = self.step(segment.frequency);

        for _ in 0..num_samples {
            sink.write_sample(sample_from_float(self.phase.sin()))?;
            self.advance(step);
        }

        self.num_samples_emitted += num_samples;
        Ok(())
    }

    /// Emit one tone segment with a raised-cosine amplitude ramp over the
    /// first and last tenth of its samples. Used for CW keying, where hard
    /// edges are audible as key clicks well outside the tone's bandwidth.
    pub fn emit_shaped<S>(&mut self, segment: ToneSegment, sink: &mut S) -> Result<(), S::Error>
    where
        S: SampleSink,
    {
        let num_samples = self.segment_samples(segment.duration);
        let step = self.step(segment.frequency);
        let ramp = num_samples / 10;

        for i in 0..num_samples {
            let amplitude = raised_cosine(i, num_samples, ramp);
            sink.write_sample(sample_from_float(amplitude * self.phase.sin()))?;
            self.advance(step);
        }

        self.num_samples_emitted += num_samples;
        Ok(())
    }

    /// Emit silence. The phase accumulator is held, but the elapsed-time
    /// accounting still advances.
    pub fn emit_silence<S>(&mut self, duration: f64, sink: &mut S) -> Result<(), S::Error>
    where
        S: SampleSink,
    {
        let num_samples = self.segment_samples(duration);

        for _ in 0..num_samples {
            sink.write_sample(0)?;
        }

        self.num_samples_emitted += num_samples;
        Ok(())
    }
}

#[inline]
fn sample_from_float(value: f64) -> i16 {
    (value * f64::from(i16::MAX)).round() as i16
}

#[inline]
fn raised_cosine(index: u64, num_samples: u64, ramp: u64) -> f64 {
    let position = index.min(num_samples - 1 - index);
    if ramp == 0 || position >= ramp {
        1.0
    }
    else {
        0.5 * (1.0 - (PI * position as f64 / ramp as f64).cos())
    }
}
