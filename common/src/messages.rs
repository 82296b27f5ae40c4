//! Definition of minter messages

use crate::commands::minting::{MintingCommand, MintingCommandResponse};

// Caryatid core messages which we re-export
pub use caryatid_module_rest_server::messages::{GetRESTResponse, RESTRequest, RESTResponse};

/// Commands we send
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub enum Command {
    Minting(MintingCommand),
}

/// Responses to commands
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub enum CommandResponse {
    Minting(MintingCommandResponse),
}

// === Global message enum ===
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub enum Message {
    None(()), // Just so we have a simple default

    // REST messages
    RESTRequest(RESTRequest),   // REST request
    RESTResponse(RESTResponse), // REST response

    // Commands and their responses
    Command(Command),
    CommandResponse(CommandResponse),
}

impl Default for Message {
    fn default() -> Self {
        Self::None(())
    }
}

// Casts from specific messages
impl From<RESTRequest> for Message {
    fn from(msg: RESTRequest) -> Self {
        Message::RESTRequest(msg)
    }
}

impl From<MintingCommand> for Message {
    fn from(command: MintingCommand) -> Self {
        Message::Command(Command::Minting(command))
    }
}

// Casts to specific messages
impl GetRESTResponse for Message {
    fn get_rest_response(&self) -> Option<RESTResponse> {
        if let Message::RESTResponse(result) = self {
            Some(result.clone())
        } else {
            None
        }
    }
}
