//! Two ends of an emulated serial cable: one side writes framed messages, the
//! other polls them into a ring buffer.

use embring::frame::{DataType, SerialBuffer};
use embring::transport::SerialStream;

/// `[u16 tag, hi, lo, fixint, end]`
fn encode_message(value: u16, small: u8) -> Vec<u8> {
    let [hi, lo] = value.to_be_bytes();
    vec![
        DataType::UINT16,
        hi,
        lo,
        DataType::PosFixInt(small).tag(),
        DataType::END_OF_MESSAGE,
    ]
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let (device, host) = SerialStream::pair()?;
    let mut device = SerialBuffer::new(device);
    let mut host = SerialBuffer::new(host);

    for i in 0..3u16 {
        device.write_bytes(&encode_message(1000 + i, i as u8))?;
    }

    while host.pending_messages() < 3 {
        host.ingest_available()?;
    }

    while let Some(message) = host.read_message()? {
        let value = u16::from_be_bytes([message[1], message[2]]);
        println!(
            "message: {} bytes, u16={value}, fixint={}",
            message.len(),
            message[3]
        );
    }

    println!("{}", host.dump());
    Ok(())
}
