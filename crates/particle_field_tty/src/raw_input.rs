//! Read the end user's raw keyboard and mouse input.

use std::io::Read as _;

use color_eyre::eyre::Result;

/// Bytes from STDIN
pub type BytesFromSTDIN = [u8; 128];

/// Reads and parses STDIN
pub(crate) struct RawInput {
    /// The main protocol channel.
    protocol_tx: tokio::sync::broadcast::Sender<crate::run::Protocol>,
}

impl RawInput {
    /// Start a thread to listen to and parse the end user's STDIN, forwarding every event to the
    /// rest of the application.
    pub fn start(
        protocol_tx: tokio::sync::broadcast::Sender<crate::run::Protocol>,
    ) -> std::thread::JoinHandle<Result<()>> {
        // Blocking reads on STDIN don't play well with Tokio's runtime, so a plain thread it is.
        std::thread::spawn(move || -> Result<()> {
            let protocol_for_shutdown = protocol_tx.clone();
            let input = Self { protocol_tx };
            let result = input.consume_stdin();
            if let Err(error) = result {
                crate::run::broadcast_protocol_end(&protocol_for_shutdown);
                return Err(error);
            }
            Ok(())
        })
    }

    /// Listen to the end user's STDIN until it closes.
    fn consume_stdin(&self) -> Result<()> {
        tracing::debug!("Starting to listen on STDIN");

        let stdin = std::io::stdin();
        let mut reader = std::io::BufReader::new(stdin);
        let mut parser = termwiz::input::InputParser::new();

        loop {
            let mut buffer: BytesFromSTDIN = [0; 128];
            let count = reader.read(&mut buffer[..])?;
            if count == 0 {
                tracing::debug!("STDIN closed");
                crate::run::broadcast_protocol_end(&self.protocol_tx);
                return Ok(());
            }

            let Some(bytes) = buffer.get(0..count) else {
                tracing::warn!("Couldn't get bytes from STDIN input buffer");
                continue;
            };
            tracing::trace!("Received STDIN input: {bytes:x?}");
            parser.parse(bytes, |event| self.forward(event), false);
        }
    }

    /// Send a parsed event to whoever is listening.
    fn forward(&self, event: termwiz::input::InputEvent) {
        tracing::trace!("Parsed input event: {event:?}");
        let result = self.protocol_tx.send(crate::run::Protocol::Input(event));
        if let Err(error) = result {
            tracing::error!("Error sending input event from thread to task: {error:?}");
        }
    }
}
