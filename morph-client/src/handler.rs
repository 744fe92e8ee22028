//! Response delivery strategy.

/// Error type returned by frame handlers.
pub type HandlerError = Box<dyn std::error::Error + Send + Sync>;

/// Receives decoded response payloads, in arrival order.
///
/// The drain loop invokes the handler synchronously for each complete
/// frame before parsing the next one. Returning an error stops the loop
/// and discards any frames still buffered from that read.
pub trait FrameHandler {
    fn handle(&mut self, payload: &[u8]) -> Result<(), HandlerError>;
}

impl<F> FrameHandler for F
where
    F: FnMut(&[u8]) -> Result<(), HandlerError>,
{
    fn handle(&mut self, payload: &[u8]) -> Result<(), HandlerError> {
        self(payload)
    }
}
