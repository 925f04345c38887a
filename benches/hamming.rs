use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use hamming_channel::ecc::{
    decode_all, ChannelConfig, Codeword, HammingCodec, MessageBlock, NoisyChannel,
};

fn bench_block_codec(c: &mut Criterion) {
    let codec = HammingCodec::new();
    let messages: Vec<MessageBlock> = (0..16).map(MessageBlock::from_value).collect();
    let received: Vec<Codeword> = messages
        .iter()
        .enumerate()
        .map(|(i, m)| codec.encode(m).flipped(i % 7))
        .collect();

    c.bench_function("encode_all_messages", |b| {
        b.iter(|| {
            for m in &messages {
                black_box(codec.encode(black_box(m)));
            }
        })
    });

    c.bench_function("decode_single_errors", |b| {
        b.iter(|| {
            for r in &received {
                black_box(codec.decode(black_box(r)));
            }
        })
    });
}

fn bench_streams(c: &mut Criterion) {
    let mut group = c.benchmark_group("byte_stream");
    for size in [1_000usize, 10_000, 100_000] {
        let data: Vec<u8> = (0..size).map(|i| (i % 256) as u8).collect();
        group.throughput(Throughput::Bytes(size as u64));

        group.bench_with_input(BenchmarkId::new("transmit_bytes", size), &data, |b, data| {
            let mut channel = NoisyChannel::new(ChannelConfig::default().with_seed(1)).unwrap();
            b.iter(|| black_box(channel.transmit_bytes(black_box(data))))
        });

        let codec = HammingCodec::new();
        let codewords: Vec<Codeword> = (0..size * 2)
            .map(|i| codec.encode(&MessageBlock::from_value(i as u32)).flipped(i % 7))
            .collect();
        group.bench_with_input(BenchmarkId::new("decode_all", size), &codewords, |b, cws| {
            b.iter(|| black_box(decode_all(&codec, black_box(cws))))
        });
    }
    group.finish();
}

criterion_group!(benches, bench_block_codec, bench_streams);
criterion_main!(benches);
