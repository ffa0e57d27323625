//! In-memory transport for unit tests: answers from a routing closure and records every request.

use parking_lot::Mutex;

use crate::http::{HttpError, Method, Request, Response, Transport};

type Handler = dyn Fn(&Request) -> Result<Response, HttpError> + Send + Sync;

pub struct MockTransport {
    handler: Box<Handler>,
    log: Mutex<Vec<Request>>,
}

impl MockTransport {
    pub fn new<F>(handler: F) -> Self
    where
        F: Fn(&Request) -> Result<Response, HttpError> + Send + Sync + 'static,
    {
        Self {
            handler: Box::new(handler),
            log: Mutex::new(Vec::new()),
        }
    }

    pub fn requests(&self) -> Vec<Request> {
        self.log.lock().clone()
    }

    pub fn count(&self, method: &Method, path: &str) -> usize {
        self.log
            .lock()
            .iter()
            .filter(|req| &req.method == method && req.url.path() == path)
            .count()
    }

    pub fn last(&self, method: &Method, path: &str) -> Option<Request> {
        self.log
            .lock()
            .iter()
            .rev()
            .find(|req| &req.method == method && req.url.path() == path)
            .cloned()
    }
}

impl Transport for MockTransport {
    fn execute(&self, request: &Request) -> Result<Response, HttpError> {
        self.log.lock().push(request.clone());
        (self.handler)(request)
    }
}
