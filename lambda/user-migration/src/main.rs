use anyhow::Context;
use aws_config::BehaviorVersion;
use lambda_runtime::{run, service_fn, Error, LambdaEvent};
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use migration_shared::{MigrationConfig, MigrationPipeline, UserMigrationEvent};

async fn function_handler(
    pipeline: &MigrationPipeline,
    event: LambdaEvent<UserMigrationEvent>,
) -> Result<UserMigrationEvent, Error> {
    let (event, context) = event.into_parts();

    info!("Received user migration event");
    info!("Request ID: {}", context.request_id);
    info!("User: {}", event.user_name);
    info!("Trigger source: {}", event.trigger_source);

    match pipeline.migrate(event).await {
        Ok(response_event) => {
            info!(
                "Final response - message_action: {:?}, final_user_status: {:?}",
                response_event.response.message_action, response_event.response.final_user_status
            );
            Ok(response_event)
        }
        Err(e) => {
            error!("User migration failed: {:?}", e);
            // Cognito shows this message to the user as-is
            Err(e.into())
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .without_time()
        .init();

    info!("Starting user-migration Lambda function");

    let config = MigrationConfig::from_env().context("Failed to load migration configuration")?;
    info!(
        "Legacy pool {} in {} ({:?} lookup, {:?} access), migrating attributes: {:?}",
        config.source_user_pool_id,
        config.source_region,
        config.lookup,
        config.access,
        config.allow_list.names()
    );

    let sdk_config = aws_config::load_defaults(BehaviorVersion::latest()).await;
    let pipeline = Arc::new(MigrationPipeline::from_config(&sdk_config, &config));

    run(service_fn(move |event: LambdaEvent<UserMigrationEvent>| {
        let pipeline = Arc::clone(&pipeline);
        async move { function_handler(&pipeline, event).await }
    }))
    .await
}
