// plays a materialized transmission on the local soundcard, for monitoring
// before keying the actual radio

use parking_lot::Mutex;
use rodio::Source as _;

#[derive(Clone, Debug)]
pub struct TransmissionSource {
    samples: std::vec::IntoIter<i16>,
    sample_rate: u32,
}

impl TransmissionSource {
    pub fn new(samples: Vec<i16>, sample_rate: u32) -> Self {
        Self {
            samples: samples.into_iter(),
            sample_rate,
        }
    }
}

impl Iterator for TransmissionSource {
    type Item = f32;

    fn next(&mut self) -> Option<Self::Item> {
        self.samples
            .next()
            .map(|sample| f32::from(sample) / 32768.0)
    }
}

impl rodio::Source for TransmissionSource {
    #[inline]
    fn current_span_len(&self) -> Option<usize> {
        None
    }

    #[inline]
    fn channels(&self) -> rodio::ChannelCount {
        1
    }

    #[inline]
    fn sample_rate(&self) -> rodio::SampleRate {
        self.sample_rate
    }

    #[inline]
    fn total_duration(&self) -> Option<std::time::Duration> {
        Some(std::time::Duration::from_secs_f64(
            self.samples.len() as f64 / f64::from(self.sample_rate),
        ))
    }
}

#[derive(Debug, thiserror::Error)]
#[error("audio error")]
pub enum Error {
    Stream(#[from] rodio::StreamError),
}

/// Queue a transmission on the default output device. Returns immediately;
/// playback continues on rodio's mixer thread.
pub fn play_transmission(samples: Vec<i16>, sample_rate: u32, volume: f32) -> Result<(), Error> {
    let source = TransmissionSource::new(samples, sample_rate);
    global_output_stream()?
        .mixer()
        .add(source.amplify_normalized(volume));
    Ok(())
}

fn global_output_stream() -> Result<&'static rodio::OutputStream, Error> {
    static OUTPUT_STREAM: Mutex<Option<&'static rodio::OutputStream>> = Mutex::new(None);

    let mut output_stream = OUTPUT_STREAM.lock();

    if output_stream.is_none() {
        *output_stream = Some(Box::leak(Box::new(
            rodio::OutputStreamBuilder::open_default_stream()?,
        )));
    }

    Ok(output_stream.unwrap())
}
