// certificate-generation-service/src/main.rs

mod assembly;
mod config;
mod defects;
mod error;
mod generators;
mod invoke;
mod models;
mod odometer;
mod pubsub;
mod remote;
mod retry;
mod storage;
mod tech_records;

use std::sync::Arc;

use google_cloud_pubsub::client::{Client, ClientConfig};
use google_cloud_pubsub::subscription::Subscription;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::assembly::CertificateAssembler;
use crate::config::Config;
use crate::generators::GeneratorContext;
use crate::invoke::HttpFunctionInvoker;
use crate::pubsub::{MessageHandler, Publisher};
use crate::remote::RemoteRepository;
use crate::retry::Retry;
use crate::storage::GcsSignatureStore;
use crate::tech_records::TechRecordResolver;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Print to stderr BEFORE logging initialization to catch early failures
    eprintln!("Starting certificate-generation-service...");

    // Load configuration
    let config = match Config::load() {
        Ok(cfg) => {
            eprintln!("Configuration loaded successfully");
            cfg
        }
        Err(e) => {
            eprintln!("FATAL: Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| config.service.log_level.clone().into()),
        )
        .with(tracing_subscriber::fmt::layer().json())
        .init();

    info!(
        service = %config.service.name,
        version = env!("CARGO_PKG_VERSION"),
        branch = %config.service.branch,
        "Starting Certificate Generation Service"
    );

    // Wire the assembly pipeline
    let invoker = HttpFunctionInvoker::new(config.remote.endpoints())?;
    let repository = RemoteRepository::new(
        Arc::new(invoker),
        Retry::new(config.remote.retry_attempts),
    );
    let storage = match GcsSignatureStore::new().await {
        Ok(store) => store,
        Err(e) => {
            error!("Failed to initialize signature storage: {}", e);
            eprintln!("FATAL: Failed to initialize signature storage: {}", e);
            return Err(e.into());
        }
    };

    let context = GeneratorContext {
        resolver: TechRecordResolver::new(repository.clone()),
        repository,
        storage: Arc::new(storage),
        signature_bucket: config.storage.signature_bucket.clone(),
        branch: config.service.branch.clone(),
    };
    let assembler = CertificateAssembler::new(context);

    // Initialize Pub/Sub client
    let client_config = match ClientConfig::default().with_auth().await {
        Ok(cfg) => cfg,
        Err(e) => {
            error!("Failed to create Pub/Sub client config: {}", e);
            eprintln!("FATAL: Failed to create Pub/Sub client config: {}", e);
            return Err(e.into());
        }
    };

    let client = match Client::new(client_config).await {
        Ok(c) => c,
        Err(e) => {
            error!("Failed to create Pub/Sub client: {}", e);
            eprintln!("FATAL: Failed to create Pub/Sub client: {}", e);
            return Err(e.into());
        }
    };

    info!(
        project_id = %config.pubsub.project_id,
        subscription = %config.pubsub.request_subscription,
        "Initializing Pub/Sub client"
    );

    // Get subscription
    let subscription = client.subscription(&config.pubsub.request_subscription);

    // Initialize publisher for responses
    let publisher = Publisher::new(
        &config.pubsub.project_id,
        &config.pubsub.response_topic,
    )
    .await?;

    // Initialize message handler
    let handler = Arc::new(MessageHandler::new(assembler, config.documents.clone()));
    let publisher = Arc::new(publisher);

    info!("Starting message processing loop");

    process_messages(
        subscription,
        handler,
        publisher,
        config.pubsub.max_concurrent_messages,
    )
    .await;

    Ok(())
}

async fn process_messages(
    subscription: Subscription,
    handler: Arc<MessageHandler>,
    publisher: Arc<Publisher>,
    _max_concurrent: usize,
) {
    use tokio::signal;
    use tokio_util::sync::CancellationToken;

    let cancel = CancellationToken::new();
    let cancel_for_signal = cancel.clone();

    // Spawn signal handler
    tokio::spawn(async move {
        match signal::ctrl_c().await {
            Ok(()) => {
                info!("Received shutdown signal, cancelling message processing");
                cancel_for_signal.cancel();
            }
            Err(err) => {
                error!("Unable to listen for shutdown signal: {}", err);
            }
        }
    });

    loop {
        if cancel.is_cancelled() {
            info!("Message processing cancelled, exiting loop");
            break;
        }

        let handler_clone = handler.clone();
        let publisher_clone = publisher.clone();

        let result = subscription
            .receive(
                move |message, cancel| {
                    let handler = handler_clone.clone();
                    let publisher = publisher_clone.clone();

                    async move {
                        if cancel.is_cancelled() {
                            return;
                        }

                        info!(
                            message_id = %message.message.message_id,
                            "Processing message"
                        );

                        // Process the message
                        let response = handler.handle_message(&message.message.data).await;

                        // Publish response
                        publisher.publish_response(&response).await;

                        // Acknowledge the message
                        if let Err(e) = message.ack().await {
                            error!(
                                message_id = %message.message.message_id,
                                error = %e,
                                "Failed to acknowledge message"
                            );
                        } else {
                            info!(
                                message_id = %message.message.message_id,
                                "Message processed and acknowledged"
                            );
                        }
                    }
                },
                cancel.clone(),
                None,
            )
            .await;

        match result {
            Ok(()) => {
                info!("subscription.receive() completed, continuing loop");
            }
            Err(e) => {
                error!("Error receiving messages: {}", e);
                error!("Retrying in 5 seconds...");
                tokio::time::sleep(tokio::time::Duration::from_secs(5)).await;
            }
        }
    }

    info!("Message processing loop exited");
}
