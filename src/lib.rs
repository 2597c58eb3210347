//! SSTV (Slow-Scan Television) transmit encoder.
//!
//! Turns a normalized RGB pixel buffer into a phase-continuous stream of
//! signed 16-bit mono samples: VIS header, scan lines, and an optional CW
//! identification, ready for a narrowband analog voice channel. Decoding
//! is out of scope.
//!
//! # References
//!
//! - <http://lionel.cordesses.free.fr/gpages/sstv.html>
//! - <http://www.barberdsp.com/downloads/Dayton%20Paper.pdf>
//! - <https://web.archive.org/web/20120313215600/http://lionel.cordesses.free.fr/gpages/Cordesses.pdf>

#[cfg(feature = "audio")]
pub mod audio;
pub mod cw;
pub mod encoder;
pub mod header;
pub mod image;
pub mod modes;
pub mod scan;
pub mod sink;
pub mod synth;

pub use crate::{
    cw::encode_callsign,
    encoder::{
        CwIdentification,
        EncodeError,
        encode_image,
        encode_transmission,
    },
    header::encode_vis_header,
    image::{
        Channel,
        PixelSource,
    },
    modes::{
        ColorFamily,
        ModeSpecification,
        VisCode,
    },
    scan::{
        ChromaPlane,
        encode_line,
    },
    sink::{
        SampleSink,
        WavSink,
    },
    synth::{
        ToneSegment,
        ToneSynthesizer,
    },
};

pub const LEADER_TONE: f64 = 1900.0;
pub const LEADER_TIME: f64 = 0.300;

pub const LEADER_BREAK_TIME: f64 = 0.010;

pub const VIS_BIT_TIME: f64 = 0.030;
pub const VIS_LOW_TONE: f64 = 1300.0;
pub const VIS_HIGH_TONE: f64 = 1100.0;

// line sync, leader break, vis start/stop
pub const SYNC_TONE: f64 = 1200.0;

pub const PORCH_TONE: f64 = 1500.0;

// black..white scan levels
pub const CHANNEL_LOW_TONE: f64 = 1500.0;
pub const CHANNEL_HIGH_TONE: f64 = 2300.0;

// robot family chroma framing
pub const CHROMA_PORCH_TONE: f64 = 1900.0;
pub const EVEN_SEPARATOR_TONE: f64 = 1500.0;
pub const ODD_SEPARATOR_TONE: f64 = 2300.0;
