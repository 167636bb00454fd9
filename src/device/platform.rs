#![cfg(feature = "serial")]

use std::io::{self, Write};
use std::time::Duration;

use anyhow::Result;

use super::{Endpoint, SerialBackend, SerialConnection};

/// Backend over the `serialport` crate.
pub struct SerialportBackend;

impl SerialBackend for SerialportBackend {
    fn list(&self) -> Result<Vec<Endpoint>> {
        let mut out = Vec::new();
        for p in serialport::available_ports()? {
            let (manufacturer, product_id) = match p.port_type {
                serialport::SerialPortType::UsbPort(info) => {
                    (info.manufacturer, Some(format!("{:04x}", info.pid)))
                }
                _ => (None, None),
            };
            out.push(Endpoint {
                path: p.port_name,
                manufacturer,
                product_id,
            });
        }
        Ok(out)
    }

    fn open(&self, path: &str, baud: u32) -> Result<Box<dyn SerialConnection>> {
        let port = serialport::new(path, baud)
            .timeout(Duration::from_millis(250))
            .open()?;
        Ok(Box::new(PortConnection { port }))
    }
}

struct PortConnection {
    port: Box<dyn serialport::SerialPort>,
}

impl SerialConnection for PortConnection {
    fn write_all(&mut self, bytes: &[u8]) -> io::Result<()> {
        self.port.write_all(bytes)?;
        self.port.flush()
    }

    fn is_open(&self) -> bool {
        // Any control query fails once the adapter is unplugged.
        self.port.bytes_to_write().is_ok()
    }
}
