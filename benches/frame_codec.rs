//! Frame and header codec benchmarks
//!
//! Measures the per-read work of an h2c connection:
//! - Frame header encoding
//! - Decoding a read holding the preface plus several frames
//! - Encoding a HEADERS + DATA response pair
//! - HPACK request decoding
//!
//! Run with: cargo bench --bench frame_codec

use bytes::{Bytes, BytesMut};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use h2c::http::h2::{Frame, FrameCodec, FrameFlags, FrameType, HeaderCodec, CONNECTION_PREFACE};
use h2c::http::Status;
use std::time::Duration;

fn bench_frame_header_encode(c: &mut Criterion) {
    let mut group = c.benchmark_group("frame_header_encode");

    group.bench_function("encode_data_header", |b| {
        b.iter(|| {
            let header = FrameCodec::encode_header(
                black_box(FrameType::Data.as_u8()),
                black_box(FrameFlags::from_u8(FrameFlags::END_STREAM)),
                black_box(1),
                black_box(1024),
            );
            black_box(header);
        });
    });

    group.bench_function("decode_header", |b| {
        let header = FrameCodec::encode_header(FrameType::Headers.as_u8(), FrameFlags::from_u8(0x05), 3, 4096);
        b.iter(|| black_box(FrameCodec::decode_header(black_box(&header))));
    });

    group.finish();
}

fn bench_decode_read(c: &mut Criterion) {
    let mut group = c.benchmark_group("decode_read");

    for frame_count in [1usize, 10, 50] {
        let mut wire = BytesMut::from(CONNECTION_PREFACE);
        for stream_id in 0..frame_count as u32 {
            FrameCodec::encode_into(&Frame::data(stream_id * 2 + 1, Bytes::from(vec![0x61; 64])), &mut wire).unwrap();
        }
        let wire = wire.freeze();

        group.throughput(Throughput::Bytes(wire.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(frame_count), &wire, |b, wire| {
            b.iter(|| black_box(FrameCodec::decode(black_box(wire)).unwrap()));
        });
    }

    group.finish();
}

fn bench_encode_response(c: &mut Criterion) {
    let mut group = c.benchmark_group("encode_response");

    for body_size in [4usize, 1024, 16 * 1024] {
        let body = Bytes::from(vec![0x62; body_size]);
        group.throughput(Throughput::Bytes(body_size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(body_size), &body, |b, body| {
            let mut codec = HeaderCodec::new();
            b.iter(|| {
                let mut out = BytesMut::new();
                let block = codec.encode_response(Status::OK, body.len()).unwrap();
                FrameCodec::encode_into(&Frame::headers(1, block), &mut out).unwrap();
                FrameCodec::encode_into(&Frame::data(1, body.clone()), &mut out).unwrap();
                black_box(out);
            });
        });
    }

    group.finish();
}

fn bench_hpack_decode_request(c: &mut Criterion) {
    let mut group = c.benchmark_group("hpack");

    group.bench_function("decode_request", |b| {
        let mut client = HeaderCodec::new();
        let block = client.encode(&[
            (":method", "POST"),
            (":scheme", "http"),
            (":path", "/echo"),
            (":authority", "localhost"),
            ("content-type", "text/plain"),
        ]).unwrap();
        b.iter(|| {
            // Fresh decoder each time so the block stays valid
            let mut server = HeaderCodec::new();
            black_box(server.decode_request(black_box(&block)).unwrap());
        });
    });

    group.finish();
}

criterion_group! {
    name = frame_codec;
    config = Criterion::default()
        .measurement_time(Duration::from_secs(10))
        .sample_size(500);
    targets =
        bench_frame_header_encode,
        bench_decode_read,
        bench_encode_response
}

criterion_group! {
    name = header_codec;
    config = Criterion::default()
        .measurement_time(Duration::from_secs(10))
        .sample_size(500);
    targets = bench_hpack_decode_request
}

criterion_main!(frame_codec, header_codec);
