//! REST handlers for the minter

use std::sync::Arc;

use minter_common::{
    messages::RESTResponse,
    rest_error::RESTError,
    rest_helper::path_parameter,
};
use serde::Deserialize;

use crate::service::MinterService;

/// Body of `POST /submit`
#[derive(Debug, Deserialize)]
pub struct SubmitRequest {
    pub number: u64,

    /// Payer-signed transaction, hex CBOR
    pub tx: String,
}

fn boolean(value: bool) -> RESTResponse {
    RESTResponse::with_json(200, if value { "true" } else { "false" })
}

/// `GET /alreadyminted/{number}`
pub async fn handle_already_minted(
    service: Arc<MinterService>,
    params: Vec<String>,
) -> Result<RESTResponse, RESTError> {
    let number = path_parameter(&params, 0, "number")?;
    Ok(boolean(service.already_minted(number).await?))
}

/// `GET /mintingtx/{address}/{number}`
pub async fn handle_minting_tx(
    service: Arc<MinterService>,
    params: Vec<String>,
) -> Result<RESTResponse, RESTError> {
    let address = path_parameter(&params, 0, "address")?;
    let number = path_parameter(&params, 1, "number")?;
    let cbor_hex = service.create_transaction(address, number).await?;
    Ok(RESTResponse::with_text(200, &cbor_hex))
}

/// `POST /submit`
pub async fn handle_submit(
    service: Arc<MinterService>,
    body: String,
) -> Result<RESTResponse, RESTError> {
    let request: SubmitRequest = serde_json::from_str(&body)?;
    let id = service.submit_transaction(&request.tx, &request.number.to_string()).await?;
    Ok(boolean(id.is_some()))
}
