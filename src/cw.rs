use crate::{
    encoder::EncodeError,
    sink::SampleSink,
    synth::{
        ToneSegment,
        ToneSynthesizer,
    },
};

const DASH_UNITS: f64 = 3.0;
const CHARACTER_GAP_UNITS: f64 = 3.0;
const WORD_GAP_UNITS: f64 = 7.0;

/// Duration of one dot at the given speed, from the standard PARIS timing
/// (50 units per word).
#[inline]
pub fn dot_duration(words_per_minute: u32) -> f64 {
    1.2 / f64::from(words_per_minute)
}

/// Dot/dash sequence for a supported character, dots as `'.'` and dashes as
/// `'-'`. Covers letters, digits and the stroke used in portable and club
/// callsigns.
pub fn morse_symbols(character: char) -> Option<&'static str> {
    Some(match character.to_ascii_uppercase() {
        'A' => ".-",
        'B' => "-...",
        'C' => "-.-.",
        'D' => "-..",
        'E' => ".",
        'F' => "..-.",
        'G' => "--.",
        'H' => "....",
        'I' => "..",
        'J' => ".---",
        'K' => "-.-",
        'L' => ".-..",
        'M' => "--",
        'N' => "-.",
        'O' => "---",
        'P' => ".--.",
        'Q' => "--.-",
        'R' => ".-.",
        'S' => "...",
        'T' => "-",
        'U' => "..-",
        'V' => "...-",
        'W' => ".--",
        'X' => "-..-",
        'Y' => "-.--",
        'Z' => "--..",
        '0' => "-----",
        '1' => ".----",
        '2' => "..---",
        '3' => "...--",
        '4' => "....-",
        '5' => ".....",
        '6' => "-....",
        '7' => "--...",
        '8' => "---..",
        '9' => "----.",
        '/' => "-..-.",
        _ => return None,
    })
}

/// Key `text` as CW on the shared synthesizer.
///
/// Dots are one unit, dashes three; gaps are one unit between symbols,
/// three between characters, seven between words (spaces in `text`). Each
/// tone gets the synthesizer's raised-cosine keying envelope. The whole
/// text is validated before the first sample is written, so a bad character
/// never leaves a half-keyed identification in the sink.
pub fn encode_callsign<S>(
    text: &str,
    words_per_minute: u32,
    tone: f64,
    synth: &mut ToneSynthesizer,
    sink: &mut S,
) -> Result<(), EncodeError<S::Error>>
where
    S: SampleSink,
{
    if words_per_minute == 0 {
        return Err(EncodeError::InvalidParameter {
            name: "words_per_minute",
        });
    }

    let mut words = Vec::new();
    for word in text.split(' ').filter(|word| !word.is_empty()) {
        let mut characters = Vec::new();
        for character in word.chars() {
            let symbols = morse_symbols(character)
                .ok_or(EncodeError::UnsupportedCharacter { character })?;
            characters.push(symbols);
        }
        words.push(characters);
    }

    let unit = dot_duration(words_per_minute);
    tracing::debug!(text, words_per_minute, tone, "keying cw identification");

    for (word_index, characters) in words.iter().enumerate() {
        if word_index > 0 {
            synth
                .emit_silence(WORD_GAP_UNITS * unit, sink)
                .map_err(EncodeError::Sink)?;
        }

        for (character_index, symbols) in characters.iter().enumerate() {
            if character_index > 0 {
                synth
                    .emit_silence(CHARACTER_GAP_UNITS * unit, sink)
                    .map_err(EncodeError::Sink)?;
            }

            for (symbol_index, symbol) in symbols.chars().enumerate() {
                if symbol_index > 0 {
                    synth.emit_silence(unit, sink).map_err(EncodeError::Sink)?;
                }

                let duration = if symbol == '-' { DASH_UNITS * unit } else { unit };
                synth
                    .emit_shaped(ToneSegment::new(tone, duration), sink)
                    .map_err(EncodeError::Sink)?;
            }
        }
    }

    Ok(())
}
