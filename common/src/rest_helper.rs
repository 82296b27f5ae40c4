//! Helper functions for REST handlers

use crate::{
    messages::{Message, RESTResponse},
    rest_error::RESTError,
};
use caryatid_sdk::Context;
use futures::future::Future;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{error, info};

/// Handle a REST request with path parameters; `path_elements` after the
/// first (the route name) are passed to the handler
pub fn handle_rest_with_path_parameters<F, Fut>(
    context: Arc<Context<Message>>,
    topic: &str,
    handler: F,
) -> JoinHandle<()>
where
    F: Fn(Vec<String>) -> Fut + Send + Sync + Clone + 'static,
    Fut: Future<Output = Result<RESTResponse, RESTError>> + Send + 'static,
{
    handle_rest_with_body(context, topic, move |params, _body| handler(params))
}

/// Handle a REST request with path parameters and a request body
pub fn handle_rest_with_body<F, Fut>(
    context: Arc<Context<Message>>,
    topic: &str,
    handler: F,
) -> JoinHandle<()>
where
    F: Fn(Vec<String>, String) -> Fut + Send + Sync + Clone + 'static,
    Fut: Future<Output = Result<RESTResponse, RESTError>> + Send + 'static,
{
    context.handle(topic, move |message: Arc<Message>| {
        let handler = handler.clone();
        async move {
            let response = match message.as_ref() {
                Message::RESTRequest(request) => {
                    info!("REST received {} {}", request.method, request.path);
                    let params = request.path_elements.iter().skip(1).cloned().collect();
                    match handler(params, request.body.clone()).await {
                        Ok(response) => response,
                        Err(error) => {
                            if error.status_code() >= 500 {
                                error!("REST {} failed: {error}", request.path);
                            }
                            error.into()
                        }
                    }
                }
                _ => {
                    error!("Unexpected message type {:?}", message);
                    RESTResponse::with_text(500, "Unexpected message in REST request")
                }
            };

            Arc::new(Message::RESTResponse(response))
        }
    })
}

/// Pick out a required path parameter by position
pub fn path_parameter<'a>(
    params: &'a [String],
    index: usize,
    name: &str,
) -> Result<&'a str, RESTError> {
    params.get(index).map(String::as_str).ok_or_else(|| RESTError::param_missing(name))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn path_parameter_by_position() {
        let params = vec!["addr_test1xyz".to_string(), "42".to_string()];
        assert_eq!(path_parameter(&params, 1, "number").unwrap(), "42");
        assert_eq!(path_parameter(&params, 2, "other").unwrap_err().status_code(), 400);
    }
}
