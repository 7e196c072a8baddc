use embassy_stm32::mode::Async;
use embassy_stm32::usart::{Error, UartRx, UartTx};

use crate::serial::{ByteSink, ByteSource};

impl ByteSource for UartRx<'_, Async> {
    type Error = Error;

    async fn read_byte(&mut self) -> Result<u8, Error> {
        let mut byte = [0u8; 1];
        self.read(&mut byte).await?;
        Ok(byte[0])
    }
}

impl ByteSink for UartTx<'_, Async> {
    type Error = Error;

    async fn write_all(&mut self, bytes: &[u8]) -> Result<(), Error> {
        self.write(bytes).await
    }
}
