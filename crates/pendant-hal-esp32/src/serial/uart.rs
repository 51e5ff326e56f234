use esp_hal::{
    Blocking,
    uart::{TxError, Uart},
};
use pendant_core::command::CommandSink;

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum SerialError {
    Tx(TxError),
    /// The FIFO stopped accepting bytes mid-line.
    Stalled,
}

/// Writes command lines to the controller link and waits for them to drain.
pub struct UartSink<'d> {
    uart: Uart<'d, Blocking>,
}

impl<'d> UartSink<'d> {
    pub fn new(uart: Uart<'d, Blocking>) -> Self {
        Self { uart }
    }

    pub fn release(self) -> Uart<'d, Blocking> {
        self.uart
    }

    fn write_all(&mut self, mut bytes: &[u8]) -> Result<(), SerialError> {
        while !bytes.is_empty() {
            let written = self.uart.write(bytes).map_err(SerialError::Tx)?;
            if written == 0 {
                return Err(SerialError::Stalled);
            }
            bytes = &bytes[written..];
        }
        self.uart.flush().map_err(SerialError::Tx)
    }
}

impl CommandSink for UartSink<'_> {
    type Error = SerialError;

    fn send_line(&mut self, line: &str) -> Result<(), Self::Error> {
        self.write_all(line.as_bytes())
    }
}
