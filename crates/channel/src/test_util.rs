use bytes::Bytes;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

/// `size` bytes counting up from 0 and wrapping at 256.
pub(crate) fn sequential_bytes(size: usize) -> Bytes {
    (0..size).map(|i| (i % 256) as u8).collect::<Vec<_>>().into()
}

pub(crate) fn init_tracing() {
    let subscriber = FmtSubscriber::builder().with_max_level(Level::DEBUG).with_test_writer().finish();
    // another test may have installed it already
    let _ = tracing::subscriber::set_global_default(subscriber);
}

#[test]
fn sequential_bytes_wrap_around() {
    let bytes = sequential_bytes(300);
    assert_eq!(bytes[0], 0);
    assert_eq!(bytes[255], 255);
    assert_eq!(bytes[256], 0);
    assert_eq!(bytes[299], 43);
}
