use std::hint::black_box;

use bencher::TestCase;
use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use micro_channel::{ByteWriter, ChannelConfig, StreamError, byte_channel_with_config, split_with_config};
use tokio::runtime::Runtime;

fn create_test_cases() -> Vec<TestCase> {
    vec![TestCase::small("small_payload_4k_buffer", 4 * 1024), TestCase::normal("normal_payload_8k_buffer", 8 * 1024)]
}

async fn produce(mut writer: ByteWriter, payload: Vec<u8>, piece_size: usize) -> Result<(), StreamError> {
    for piece in payload.chunks(piece_size) {
        writer.write(piece).await?;
    }
    writer.close();
    Ok(())
}

fn benchmark_channel(criterion: &mut Criterion) {
    let runtime = Runtime::new().expect("tokio runtime should build");
    let mut group = criterion.benchmark_group("byte_channel");

    for case in create_test_cases() {
        group.throughput(Throughput::Bytes(case.payload_size() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(case.name()), &case, |b, case| {
            let payload = case.payload();
            let capacity = case.capacity();
            b.to_async(&runtime).iter(|| {
                let payload = payload.clone();
                async move {
                    let (writer, mut reader) = byte_channel_with_config(ChannelConfig::with_capacity(capacity));
                    let producer = tokio::spawn(produce(writer, payload, capacity));
                    let size = reader.discard().await.expect("channel should end normally");
                    producer.await.expect("producer should not panic").expect("producer should finish");
                    black_box(size);
                }
            });
        });
    }

    group.finish();
}

fn benchmark_split(criterion: &mut Criterion) {
    let runtime = Runtime::new().expect("tokio runtime should build");
    let mut group = criterion.benchmark_group("split");

    for case in create_test_cases() {
        group.throughput(Throughput::Bytes(case.payload_size() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(case.name()), &case, |b, case| {
            let payload = case.payload();
            let capacity = case.capacity();
            b.to_async(&runtime).iter(|| {
                let payload = payload.clone();
                async move {
                    let config = ChannelConfig::with_capacity(capacity);
                    let (writer, reader) = byte_channel_with_config(config);
                    let (mut first, mut second) = split_with_config(reader, config);
                    let producer = tokio::spawn(produce(writer, payload, capacity));
                    let (first, second) = tokio::join!(first.discard(), second.discard());
                    producer.await.expect("producer should not panic").expect("producer should finish");
                    black_box((first.expect("first copy should end normally"), second.expect("second copy should end normally")));
                }
            });
        });
    }

    group.finish();
}

criterion_group!(channel, benchmark_channel, benchmark_split);
criterion_main!(channel);
