//! Connection handler that feeds request lines to the review service.

use std::io::{self, Read};
use std::sync::Arc;

use review_ledger::Ledger;
use tracing::{debug, warn};

use crate::envelope::Response;
use crate::service::ReviewService;
use crate::transport::{ConnectionHandler, ConnectionStream};

use super::DISPATCH_TARGET;
use super::errors::DispatchError;
use super::request::InvocationRequest;
use super::response::ResponseWriter;

/// Largest accepted request line, newline included.
pub const MAX_REQUEST_BYTES: usize = 1024 * 1024;

/// Reads one request per connection and writes one response line.
pub(crate) struct DispatchConnectionHandler<L> {
    service: Arc<ReviewService<L>>,
}

impl<L> DispatchConnectionHandler<L>
where
    L: Ledger,
{
    pub(crate) fn new(service: Arc<ReviewService<L>>) -> Self {
        Self { service }
    }

    fn dispatch(&self, mut stream: ConnectionStream) {
        let line = match read_request_line(&mut stream) {
            Ok(Some(line)) => line,
            Ok(None) => {
                debug!(target: DISPATCH_TARGET, "client disconnected without request");
                return;
            }
            Err(error) => {
                warn!(target: DISPATCH_TARGET, %error, "failed to read request");
                reply(&mut stream, &error.to_response());
                return;
            }
        };

        let response = match InvocationRequest::parse(&line) {
            Ok(request) => {
                debug!(
                    target: DISPATCH_TARGET,
                    request = request.label(),
                    "dispatching request"
                );
                self.route(request)
            }
            Err(error) => {
                warn!(target: DISPATCH_TARGET, %error, "malformed request");
                error.to_response()
            }
        };
        reply(&mut stream, &response);
    }

    fn route(&self, request: InvocationRequest) -> Response {
        match request {
            InvocationRequest::Init { arguments } => self.service.init(&arguments),
            InvocationRequest::Invoke {
                operation,
                arguments,
            } => self.service.invoke(&operation, &arguments),
        }
    }
}

impl<L> ConnectionHandler for DispatchConnectionHandler<L>
where
    L: Ledger + 'static,
{
    fn handle(&self, stream: ConnectionStream) {
        self.dispatch(stream);
    }
}

fn reply(stream: &mut ConnectionStream, response: &Response) {
    if let Err(error) = ResponseWriter::new(stream).write_response(response) {
        warn!(target: DISPATCH_TARGET, %error, "failed to write response");
    }
}

/// Reads a bounded request line.
///
/// Returns `Ok(None)` when the client disconnects without sending anything,
/// and the partial line when it disconnects before a newline.
fn read_request_line(stream: &mut ConnectionStream) -> Result<Option<Vec<u8>>, DispatchError> {
    let mut buffer = Vec::new();
    let mut chunk = [0_u8; 4096];

    loop {
        let bytes_read = read_with_retry(stream, &mut chunk)?;
        let Some(received) = chunk.get(..bytes_read).filter(|bytes| !bytes.is_empty()) else {
            return Ok((!buffer.is_empty()).then_some(buffer));
        };

        match received.iter().position(|byte| *byte == b'\n') {
            Some(newline) => {
                buffer.extend(received.iter().take(newline + 1));
                enforce_limit(buffer.len())?;
                return Ok(Some(buffer));
            }
            None => {
                buffer.extend_from_slice(received);
                enforce_limit(buffer.len())?;
            }
        }
    }
}

fn read_with_retry(stream: &mut ConnectionStream, buf: &mut [u8]) -> io::Result<usize> {
    loop {
        match stream.read(buf) {
            Ok(n) => return Ok(n),
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
}

fn enforce_limit(size: usize) -> Result<(), DispatchError> {
    if size > MAX_REQUEST_BYTES {
        return Err(DispatchError::request_too_large(size, MAX_REQUEST_BYTES));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::io::{BufRead, BufReader, Write};
    use std::net::{Shutdown, TcpListener, TcpStream};
    use std::thread::{self, JoinHandle};

    use review_ledger::MemoryLedger;
    use rstest::{fixture, rstest};
    use serde_json::Value;

    use crate::service::ServiceOptions;

    use super::*;

    struct HandlerTestHarness {
        client: TcpStream,
        server_handle: JoinHandle<()>,
    }

    impl HandlerTestHarness {
        fn exchange(mut self, request: &[u8]) -> Option<Value> {
            self.client.write_all(request).expect("write request");
            self.client.flush().expect("flush");
            self.client
                .shutdown(Shutdown::Write)
                .expect("half-close client");

            let mut line = String::new();
            BufReader::new(&mut self.client)
                .read_line(&mut line)
                .expect("read response");
            self.server_handle.join().expect("server join");
            (!line.is_empty()).then(|| serde_json::from_str(&line).expect("json response"))
        }
    }

    #[fixture]
    fn harness() -> HandlerTestHarness {
        let listener = TcpListener::bind(("127.0.0.1", 0)).expect("bind");
        let addr = listener.local_addr().expect("addr");
        let service = Arc::new(ReviewService::new(
            MemoryLedger::new(),
            ServiceOptions::default(),
        ));

        let server_handle = thread::spawn(move || {
            let (stream, _) = listener.accept().expect("accept");
            DispatchConnectionHandler::new(service).handle(ConnectionStream::Tcp(stream));
        });

        let client = TcpStream::connect(addr).expect("connect");
        HandlerTestHarness {
            client,
            server_handle,
        }
    }

    #[rstest]
    fn answers_invocations_with_one_envelope(harness: HandlerTestHarness) {
        let response = harness
            .exchange(b"{\"kind\":\"invoke\",\"operation\":\"read\",\"arguments\":[\"r1\"]}\n")
            .expect("response line");
        assert_eq!(response["status"], 404);
        assert_eq!(response["message"], "Not Found");
        assert!(response.get("payload").is_none());
    }

    #[rstest]
    fn accepts_a_final_line_without_newline(harness: HandlerTestHarness) {
        let response = harness
            .exchange(br#"{"kind":"init"}"#)
            .expect("response line");
        assert_eq!(response["status"], 200);
    }

    #[rstest]
    fn rejects_malformed_json(harness: HandlerTestHarness) {
        let response = harness.exchange(b"not valid json\n").expect("response line");
        assert_eq!(response["status"], 400);
    }

    #[rstest]
    fn rejects_oversized_requests(harness: HandlerTestHarness) {
        let request = vec![b'x'; MAX_REQUEST_BYTES + 1];
        let response = harness.exchange(&request).expect("response line");
        assert_eq!(response["status"], 400);
        assert!(
            response["message"]
                .as_str()
                .is_some_and(|message| message.contains("request too large"))
        );
    }

    #[rstest]
    fn silent_clients_get_no_reply(harness: HandlerTestHarness) {
        assert!(harness.exchange(b"").is_none());
    }
}
