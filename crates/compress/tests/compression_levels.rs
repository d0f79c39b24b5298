//! Compression levels 0-9 across different kinds of content.
//!
//! Verifies that:
//! 1. Every level produces a valid stream in both framings
//! 2. Compression ratio generally improves with level (not strictly monotonic)
//! 3. Level 0 emits stored blocks only
//! 4. Round trips are exact for text, binary, random and sparse data
//! 5. Huffman-only and RLE strategies change the encoding of matchable text

use compress::{CodecConfig, CompressionLevel, Deflater, FlushMode, Strategy, compress_to_vec, decompress_to_vec};

/// Test data generators for different content types.
mod test_data {
    /// Highly compressible repetitive text.
    pub fn repetitive_text(size: usize) -> Vec<u8> {
        let pattern = b"The quick brown fox jumps over the lazy dog. ";
        pattern.iter().cycle().take(size).copied().collect()
    }

    /// Structured binary records: length, type tag, payload.
    pub fn structured_binary(size: usize) -> Vec<u8> {
        let mut data = Vec::with_capacity(size);
        let mut counter: u32 = 0;
        while data.len() < size {
            let record_type = (counter % 5) as u8;
            let record_len = 16 + (counter % 32) as usize;
            data.extend_from_slice(&(record_len as u32).to_le_bytes());
            data.push(record_type);
            for i in 0..record_len.min(size.saturating_sub(data.len())) {
                data.push((i as u8).wrapping_add(record_type));
            }
            counter += 1;
        }
        data.truncate(size);
        data
    }

    /// Runs of zeros separated by short data bursts.
    pub fn sparse_data(size: usize) -> Vec<u8> {
        let mut data = Vec::with_capacity(size);
        let mut i = 0;
        while data.len() < size {
            let data_len = 10 + (i % 20);
            let zero_len = 50 + (i % 100);
            for j in 0..data_len.min(size - data.len()) {
                data.push((j + i) as u8);
            }
            data.resize((data.len() + zero_len).min(size), 0);
            i += 1;
        }
        data
    }
}

fn config(level: i32, raw: bool) -> CodecConfig {
    CodecConfig {
        level: CompressionLevel::from_numeric(level).expect("valid level"),
        ..CodecConfig::default()
    }
    .with_raw(raw)
}

#[test]
fn every_level_round_trips_every_content_type() {
    let samples = [
        test_data::repetitive_text(16 * 1024),
        test_data::structured_binary(16 * 1024),
        test_data::sparse_data(16 * 1024),
        test_support::pseudo_random_bytes(99, 16 * 1024),
    ];
    for level in -1..=9 {
        for raw in [false, true] {
            let config = config(level, raw);
            for sample in &samples {
                let compressed = compress_to_vec(sample, &config).expect("compress");
                let restored = decompress_to_vec(&compressed, &config).expect("decompress");
                assert_eq!(&restored, sample, "level {level}, raw {raw}");
            }
        }
    }
}

#[test]
fn higher_levels_do_not_compress_worse_than_level_one_on_text() {
    let data = test_data::repetitive_text(64 * 1024);
    let fast = compress_to_vec(&data, &config(1, false)).unwrap().len();
    let best = compress_to_vec(&data, &config(9, false)).unwrap().len();
    assert!(best <= fast, "level 9 produced {best} bytes, level 1 {fast}");
}

#[test]
fn level_zero_stores_data() {
    let data = test_support::pseudo_random_bytes(5, 10_000);
    let compressed = compress_to_vec(&data, &config(0, true)).unwrap();
    assert!(compressed.len() >= data.len());
    assert!(compressed.len() < data.len() + 64);
}

#[test]
fn repetitive_data_compresses_substantially() {
    let data = test_data::repetitive_text(100_000);
    let compressed = compress_to_vec(&data, &CodecConfig::default()).unwrap();
    assert!(compressed.len() * 50 < data.len());
}

#[test]
fn header_level_hint_tracks_level() {
    let expected = [(1, 0x01), (3, 0x5E), (6, 0x9C), (-1, 0x9C), (9, 0xDA)];
    for (level, flag) in expected {
        let compressed = compress_to_vec(b"hint", &config(level, false)).unwrap();
        assert_eq!(compressed[..2], [0x78, flag], "level {level}");
    }
}

#[test]
fn every_strategy_produces_a_valid_stream() {
    for code in 0..=4 {
        let strategy = Strategy::from_code(code).unwrap();
        let mut deflater = Deflater::with_level(CompressionLevel::Best, strategy, false).unwrap();
        assert_eq!(deflater.strategy(), strategy);

        let data = test_data::structured_binary(4096);
        let mut output = vec![0u8; 8192];
        let outcome = deflater
            .transform(FlushMode::Finish, &data, &mut output)
            .unwrap();
        assert!(outcome.is_stream_end());
        let restored =
            decompress_to_vec(&output[..outcome.produced], &CodecConfig::default()).unwrap();
        assert_eq!(restored, data);
    }
}

#[test]
fn matchless_strategies_cost_more_on_repetitive_text() {
    let data = test_data::repetitive_text(8 * 1024);
    let size = |strategy| {
        let config = CodecConfig::default().with_strategy(strategy);
        let compressed = compress_to_vec(&data, &config).unwrap();
        assert_eq!(decompress_to_vec(&compressed, &config).unwrap(), data);
        compressed.len()
    };
    let default = size(Strategy::Default);
    assert!(size(Strategy::HuffmanOnly) > default * 4);
    assert!(size(Strategy::Rle) > default * 4);
}
