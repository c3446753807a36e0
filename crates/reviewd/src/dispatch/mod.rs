//! JSONL request dispatch over the socket transport.
//!
//! Each connection carries exactly one request line and receives exactly one
//! response line:
//!
//! ```json
//! {"kind":"invoke","operation":"read","arguments":["r1"]}
//! {"status":200,"message":"OK","payload":"{\"text\":\"Widget\",...}"}
//! ```
//!
//! Lines that cannot be read or parsed are answered with a 400 envelope so
//! clients always see the same response shape.

mod errors;
mod handler;
mod request;
mod response;

pub use self::errors::DispatchError;
pub(crate) use self::handler::DispatchConnectionHandler;
pub use self::handler::MAX_REQUEST_BYTES;
pub use self::request::InvocationRequest;
pub use self::response::ResponseWriter;

pub(crate) const DISPATCH_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::dispatch");
