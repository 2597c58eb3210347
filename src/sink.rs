use std::{
    convert::Infallible,
    fs::File,
    io::{
        BufWriter,
        Seek,
        Write,
    },
    path::Path,
};

#[derive(Debug, thiserror::Error)]
#[error("wav sink error")]
pub enum Error {
    Hound(#[from] hound::Error),
    Closed,
}

/// Incremental consumer of encoded samples.
///
/// The engine pushes samples strictly in order and never revisits them, so
/// implementations can materialize the stream ([`Vec<i16>`]) or forward it
/// as it is produced ([`WavSink`]) without buffering a whole transmission.
pub trait SampleSink {
    type Error;

    fn write_sample(&mut self, sample: i16) -> Result<(), Self::Error>;

    fn write_samples(&mut self, samples: &[i16]) -> Result<(), Self::Error> {
        for sample in samples {
            self.write_sample(*sample)?;
        }
        Ok(())
    }
}

impl SampleSink for Vec<i16> {
    type Error = Infallible;

    #[inline]
    fn write_sample(&mut self, sample: i16) -> Result<(), Self::Error> {
        self.push(sample);
        Ok(())
    }

    #[inline]
    fn write_samples(&mut self, samples: &[i16]) -> Result<(), Self::Error> {
        self.extend_from_slice(samples);
        Ok(())
    }
}

impl<S> SampleSink for &mut S
where
    S: SampleSink,
{
    type Error = S::Error;

    #[inline]
    fn write_sample(&mut self, sample: i16) -> Result<(), Self::Error> {
        (&mut **self).write_sample(sample)
    }

    #[inline]
    fn write_samples(&mut self, samples: &[i16]) -> Result<(), Self::Error> {
        (&mut **self).write_samples(samples)
    }
}

/// Streams samples into a 16-bit mono PCM WAV file as they are produced.
#[derive(derive_more::Debug)]
pub struct WavSink<W>
where
    W: Write + Seek,
{
    #[debug(skip)]
    inner: Option<hound::WavWriter<W>>,
}

impl<W> WavSink<W>
where
    W: Write + Seek,
{
    #[inline]
    pub fn new(inner: hound::WavWriter<W>) -> Self {
        Self { inner: Some(inner) }
    }

    #[inline]
    pub fn from_writer(writer: W, sample_rate: u32) -> Result<Self, Error> {
        Ok(Self::new(hound::WavWriter::new(
            writer,
            wav_spec(sample_rate),
        )?))
    }

    #[inline]
    fn writer_mut(&mut self) -> Result<&mut hound::WavWriter<W>, Error> {
        self.inner.as_mut().ok_or(Error::Closed)
    }

    /// Patches up the RIFF headers and closes the writer. Dropping the sink
    /// finalizes too, but silently.
    pub fn finalize(mut self) -> Result<(), Error> {
        if let Some(writer) = self.inner.take() {
            writer.finalize()?;
        }
        Ok(())
    }
}

impl WavSink<BufWriter<File>> {
    #[inline]
    pub fn from_path(path: impl AsRef<Path>, sample_rate: u32) -> Result<Self, Error> {
        Ok(Self::new(hound::WavWriter::create(
            path,
            wav_spec(sample_rate),
        )?))
    }
}

impl<W> SampleSink for WavSink<W>
where
    W: Write + Seek,
{
    type Error = Error;

    #[inline]
    fn write_sample(&mut self, sample: i16) -> Result<(), Self::Error> {
        self.writer_mut()?.write_sample(sample)?;
        Ok(())
    }
}

fn wav_spec(sample_rate: u32) -> hound::WavSpec {
    hound::WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    }
}

pub fn write_samples_to_wav(
    path: impl AsRef<Path>,
    sample_rate: u32,
    samples: &[i16],
) -> Result<(), Error> {
    let mut sink = WavSink::from_path(path, sample_rate)?;
    sink.write_samples(samples)?;
    sink.finalize()
}
