use std::io::Cursor;

/// Encodes mono f32 samples as a 16-bit PCM WAV byte buffer at the given
/// rate. Samples outside [-1, 1] are clamped before quantization.
pub fn encode_wav_pcm16(samples: &[f32], sample_rate_hz: u32) -> Result<Vec<u8>, hound::Error> {
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate: sample_rate_hz,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };

    let mut cursor = Cursor::new(Vec::new());
    {
        let mut writer = hound::WavWriter::new(&mut cursor, spec)?;
        for &s in samples {
            let v = s.clamp(-1.0, 1.0);
            writer.write_sample((v * i16::MAX as f32).round() as i16)?;
        }
        writer.finalize()?;
    }

    Ok(cursor.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn produces_riff_wave_header() {
        let bytes = encode_wav_pcm16(&[0.0, 0.5, -0.5], 44_100).unwrap();
        assert_eq!(&bytes[0..4], b"RIFF");
        assert_eq!(&bytes[8..12], b"WAVE");
    }

    #[test]
    fn preserves_length_and_rate() {
        let samples = vec![0.25f32; 480];
        let bytes = encode_wav_pcm16(&samples, 48_000).unwrap();

        let reader = hound::WavReader::new(Cursor::new(bytes)).unwrap();
        assert_eq!(reader.spec().sample_rate, 48_000);
        assert_eq!(reader.spec().channels, 1);
        assert_eq!(reader.len(), 480);
    }

    #[test]
    fn clamps_out_of_range_samples() {
        let bytes = encode_wav_pcm16(&[2.0, -2.0], 16_000).unwrap();
        let mut reader = hound::WavReader::new(Cursor::new(bytes)).unwrap();
        let vals: Vec<i16> = reader.samples::<i16>().map(|s| s.unwrap()).collect();
        assert_eq!(vals, vec![i16::MAX, -i16::MAX]);
    }

    #[test]
    fn empty_take_is_still_a_valid_file() {
        let bytes = encode_wav_pcm16(&[], 16_000).unwrap();
        let reader = hound::WavReader::new(Cursor::new(bytes)).unwrap();
        assert_eq!(reader.len(), 0);
    }
}
