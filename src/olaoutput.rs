use std::io;
use std::net::{SocketAddr, UdpSocket};

use rosc::{encoder, OscMessage, OscPacket, OscType};

use crate::error::MeterError;
use crate::meter::zones::Rgb;
use crate::sink::PixelSink;

const DMX_CHANNELS: usize = 512;

/// Sends a strip as one DMX universe to OLA's OSC plugin, three channels
/// per pixel starting at channel 0.
pub struct OlaOutput {
    sock: UdpSocket,
    target_addr: SocketAddr,
    universe: u16,
    pixel_count: usize,
    buffer: Vec<u8>,
}

impl OlaOutput {
    pub fn new(target_addr: SocketAddr, universe: u16, pixel_count: usize) -> Result<Self, MeterError> {
        if pixel_count * 3 > DMX_CHANNELS {
            return Err(MeterError::DmxOverflow {
                pixels: pixel_count,
                channels: DMX_CHANNELS,
            });
        }

        let our_addr: SocketAddr = if target_addr.is_ipv4() {
            ([0u8; 4], 0).into()
        } else {
            ([0u16; 8], 0).into()
        };
        let sock = UdpSocket::bind(our_addr).map_err(|source| MeterError::Bind {
            target: target_addr,
            source,
        })?;
        log::info!("Sending {pixel_count} pixels to OLA universe {universe} at {target_addr}");

        Ok(OlaOutput {
            sock,
            target_addr,
            universe,
            pixel_count,
            buffer: vec![0; DMX_CHANNELS],
        })
    }

    fn address(&self) -> String {
        format!("/dmx/universe/{}", self.universe)
    }

    fn encode(&self) -> io::Result<Vec<u8>> {
        encoder::encode(&OscPacket::Message(OscMessage {
            addr: self.address(),
            args: vec![OscType::Blob(self.buffer.clone())],
        }))
        .map_err(|err| io::Error::new(io::ErrorKind::InvalidData, format!("{:?}", err)))
    }
}

impl PixelSink for OlaOutput {
    fn len(&self) -> usize {
        self.pixel_count
    }

    fn replace(&mut self, pixels: &[Rgb]) {
        self.buffer.fill(0);
        for (channels, pixel) in self.buffer.chunks_exact_mut(3).zip(pixels) {
            channels.copy_from_slice(&[pixel.red, pixel.green, pixel.blue]);
        }
    }

    fn show(&mut self) -> io::Result<()> {
        let msg_buf = self.encode()?;
        self.sock.send_to(&msg_buf, self.target_addr)?;
        Ok(())
    }
}
