use std::error::Error;

use bytes::Bytes;
use http_body_util::{BodyExt, Full};
use micro_channel::body::pump_body;
use micro_channel::{ByteReader, Cause, byte_channel, split};
use tracing::{Level, error, info};
use tracing_subscriber::FmtSubscriber;

/// Records a copy of a response body while another task serves it.
#[tokio::main]
async fn main() -> Result<(), Box<dyn Error + Send + Sync>> {
    let subscriber = FmtSubscriber::builder().with_max_level(Level::DEBUG).finish();
    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");

    let body = Full::new(Bytes::from_static(b"Hello World!\r\n"));
    let (writer, reader) = byte_channel();
    tokio::spawn(pump_body(body, writer));

    let (served, recorded) = split(reader);
    let record_task = tokio::spawn(record(recorded));

    let served = served.collect().await?.to_bytes();
    info!(size = served.len(), "served response body");
    record_task.await?;

    // a consumer that gives up takes the producer and the other copy down with it
    let (mut writer, reader) = byte_channel();
    let (served, mut recorded) = split(reader);
    served.cancel(Cause::msg("client went away"));

    if let Err(e) = writer.write(&[0u8; 64 * 1024]).await {
        error!(cause = %e, "producer stopped");
    }
    if let Err(e) = recorded.read_to_end().await {
        error!(cause = %e, "recorder stopped");
    }

    Ok(())
}

async fn record(mut reader: ByteReader) {
    match reader.read_to_end().await {
        Ok(bytes) => info!(size = bytes.len(), "recorded response body"),
        Err(e) => error!(cause = %e, "failed to record response body"),
    }
}
