//! Request dispatch: turning a resolved match into a redirect response.

mod dispatcher;
mod sink;

pub use dispatcher::{DispatchOutcome, RedirectDispatcher};
pub use sink::{ResponseSink, LOCATION_HEADER};
