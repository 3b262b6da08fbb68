//! The response surface a host exposes to the dispatcher.

/// Name of the header carrying the redirect target.
pub const LOCATION_HEADER: &str = "Location";

/// Where a redirect decision is written.
///
/// Hosts implement this over their own response type. The dispatcher calls
/// `clear`, `set_status`, `set_header` and finally `end`, in that order, and
/// only when a redirect is issued.
pub trait ResponseSink {
    /// Discard anything already buffered for the response.
    fn clear(&mut self);

    /// Set the response status code.
    fn set_status(&mut self, status: u16);

    /// Set a response header, replacing any previous value.
    fn set_header(&mut self, name: &str, value: &str);

    /// Complete the response; no further request processing should run.
    fn end(&mut self);
}
