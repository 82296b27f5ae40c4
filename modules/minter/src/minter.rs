//! Minter module for Caryatid
//! Builds native asset minting transactions for payers and submits them once
//! the payer has signed

mod blockfrost;
mod commands;
mod configuration;
mod keystore;
mod registry;
mod rest;
mod service;

use std::{sync::Arc, time::Duration};

use anyhow::Result;
use caryatid_sdk::{Context, Module, module};
use config::Config;
use minter_cardano::{
    backend::ChainBackend, builder::TransactionBuilder, selection::FirstFitSelector,
};
use minter_common::{
    commands::minting::MintingCommandResponse,
    messages::{CommandResponse, Message},
    rest_helper::{handle_rest_with_body, handle_rest_with_path_parameters},
};
use tracing::{error, info};

use crate::{
    blockfrost::BlockfrostBackend,
    configuration::MinterConfig,
    keystore::Keystore,
    registry::MintRegistry,
    service::{MintSettings, MinterService},
};

#[module(
    message_type(Message),
    name = "minter",
    description = "Native asset minting module"
)]
pub struct Minter;

impl Minter {
    pub async fn init(&self, context: Arc<Context<Message>>, config: Arc<Config>) -> Result<()> {
        let cfg = MinterConfig::try_load(&config)?;
        let network = cfg.network;

        let keystore = Keystore::load_or_create(&cfg.data_dir, network)?;
        let registry = MintRegistry::new(&cfg.data_dir)?;

        let backend: Arc<dyn ChainBackend> = Arc::new(BlockfrostBackend::new(
            &cfg.blockfrost_url(),
            &cfg.blockfrost_api_key,
            Duration::from_secs(cfg.request_timeout_secs),
            Duration::from_secs(cfg.connect_timeout_secs),
        )?);

        let selector = FirstFitSelector::new(backend.clone())
            .only_base_currency(cfg.only_base_currency)
            .allow_datum_hash(cfg.allow_datum_hash);
        let builder = TransactionBuilder::new(backend.clone())
            .with_selector(Arc::new(selector))
            .with_estimation_signers(cfg.fee_estimation_signers);

        let settings = MintSettings {
            network: network.address_network(),
            asset_name: cfg.asset_name()?,
            transfer_amount: cfg.transfer_amount,
            allow_deposit_shortfall: cfg.allow_deposit_shortfall,
        };
        let service = Arc::new(MinterService::new(
            backend, builder, keystore, registry, settings,
        ));

        info!("Serving minting commands on '{}'", cfg.command_topic);
        let service_bus = service.clone();
        context.handle(&cfg.command_topic, move |message| {
            let service = service_bus.clone();
            async move {
                let response = commands::handle_command(&service, message).await.unwrap_or_else(
                    |e| {
                        error!("Minting command failed: {e}");
                        MintingCommandResponse::Error(e.to_string())
                    },
                );
                Arc::new(Message::CommandResponse(CommandResponse::Minting(response)))
            }
        });

        info!("Creating REST handler on '{}'", cfg.mintingtx_rest_topic);
        let service_rest = service.clone();
        handle_rest_with_path_parameters(context.clone(), &cfg.mintingtx_rest_topic, move |params| {
            rest::handle_minting_tx(service_rest.clone(), params)
        });

        info!("Creating REST handler on '{}'", cfg.alreadyminted_rest_topic);
        let service_rest = service.clone();
        handle_rest_with_path_parameters(
            context.clone(),
            &cfg.alreadyminted_rest_topic,
            move |params| rest::handle_already_minted(service_rest.clone(), params),
        );

        info!("Creating REST handler on '{}'", cfg.submit_rest_topic);
        handle_rest_with_body(context.clone(), &cfg.submit_rest_topic, move |_, body| {
            rest::handle_submit(service.clone(), body)
        });

        Ok(())
    }
}
