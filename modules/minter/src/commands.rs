//! Bus command handling

use std::sync::Arc;

use anyhow::{Result, bail};
use minter_common::{
    commands::minting::{MintingCommand, MintingCommandResponse},
    messages::{Command, Message},
};

use crate::service::MinterService;

pub async fn handle_command(
    service: &MinterService,
    message: Arc<Message>,
) -> Result<MintingCommandResponse> {
    let Message::Command(Command::Minting(command)) = message.as_ref() else {
        bail!("unexpected minting request")
    };

    let response = match command {
        MintingCommand::CreateTransaction { payer, context_id } => {
            MintingCommandResponse::Created {
                cbor_hex: service.create_transaction(payer, context_id).await?,
            }
        }
        MintingCommand::SubmitTransaction {
            cbor_hex,
            context_id,
        } => MintingCommandResponse::Submitted {
            id: service.submit_transaction(cbor_hex, context_id).await?,
        },
        MintingCommand::AlreadyMinted { context_id } => {
            MintingCommandResponse::AlreadyMinted(service.already_minted(context_id).await?)
        }
    };
    Ok(response)
}
