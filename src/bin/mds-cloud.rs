use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::Utc;
use clap::{Parser, Subcommand};
use serde_json::json;
use tracing::info;

use mds_cloud_sdk::clients::identity::{AuthenticateArgs, RegisterAccountArgs, UpdateUserArgs};
use mds_cloud_sdk::clients::queue::{CreateQueueArgs, UpdateQueueArgs, CLEAR_FIELD};
use mds_cloud_sdk::config::loader::load_config;
use mds_cloud_sdk::observability::metrics::render_metrics;
use mds_cloud_sdk::utils::logging;
use mds_cloud_sdk::utils::logging::LogLevel;
use mds_cloud_sdk::{Sdk, SdkConfig};

const DEMO_PASSWORD: &str = "Password";

const DEFINITION: &str = r#"{
  "Name": "test",
  "StartAt": "Success",
  "States": {
    "Success": {
      "Type": "Succeed"
    }
  }
}"#;

const DEFINITION_WITH_WAIT: &str = r#"{
  "Name": "test",
  "StartAt": "Wait",
  "States": {
    "Wait": {
      "Type": "Wait",
      "Seconds": "5",
      "Next": "Success"
    },
    "Success": {
      "Type": "Succeed"
    }
  }
}"#;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[arg(short, long, env = "MDS_CONFIG", default_value = "mds-cloud.yaml")]
    config: String,
    #[arg(long, env = "LOG_LEVEL", value_enum)]
    log_level: Option<LogLevel>,
    /// Print collected metrics after the command finishes.
    #[arg(long)]
    print_metrics: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Register a throwaway account and authenticate as it.
    Register,
    /// Create, read, update and delete a queue.
    QueueDemo,
    /// Create, list and delete a container.
    FileDemo,
    /// Create a function, upload code, invoke it and clean up.
    FunctionsDemo {
        #[arg(long)]
        archive: PathBuf,
    },
    /// Create, update, read and delete a state machine.
    StateMachineDemo,
    /// Update the configured user's friendly name.
    IdentityDemo,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let config = load_config(&args.config).await?;
    logging::run(&config, args.log_level);
    info!(config = %args.config, "configuration loaded");

    match args.command {
        Command::Register => register(config).await?,
        Command::QueueDemo => queue_demo(&Sdk::new(config)?).await?,
        Command::FileDemo => file_demo(&Sdk::new(config)?).await?,
        Command::FunctionsDemo { archive } => functions_demo(&Sdk::new(config)?, &archive).await?,
        Command::StateMachineDemo => state_machine_demo(&Sdk::new(config)?).await?,
        Command::IdentityDemo => {
            let user = config.user_id.clone();
            identity_demo(&Sdk::new(config)?, &user).await?
        }
    }

    if args.print_metrics {
        println!("{}", render_metrics().await?);
    }
    Ok(())
}

async fn register(config: SdkConfig) -> Result<()> {
    // registration runs without credentials
    let anonymous = SdkConfig {
        account: String::new(),
        user_id: String::new(),
        password: String::new(),
        ..config
    };
    let identity = Sdk::new(anonymous)?.identity_client();
    let name = format!("Test-{}", Utc::now().timestamp());

    println!("== Register ==");
    let registered = identity
        .register(&RegisterAccountArgs {
            user_id: name.clone(),
            email: format!("{}@no.com", name),
            password: DEMO_PASSWORD.to_owned(),
            friendly_name: name.clone(),
            account_name: name.clone(),
        })
        .await
        .context("register failed")?;
    println!("AccountID: {}", registered.account_id);
    println!("Status: {}", registered.status);
    println!();

    println!("== Authenticate ==");
    let auth = identity
        .authenticate(&AuthenticateArgs {
            account_id: registered.account_id.clone(),
            user_id: name.clone(),
            password: DEMO_PASSWORD.to_owned(),
        })
        .await
        .context("authenticate failed")?;
    println!("Token: {}", auth.token);
    println!();
    Ok(())
}

async fn identity_demo(sdk: &Sdk, user: &str) -> Result<()> {
    println!("== Update User ==");
    sdk.identity_client()
        .update_user(&UpdateUserArgs {
            friendly_name: Some(format!("{}-updated", user)),
            ..Default::default()
        })
        .await?;
    println!("== Update Complete ==");
    println!();
    Ok(())
}

async fn queue_demo(sdk: &Sdk) -> Result<()> {
    let client = sdk.queue_service_client();

    println!("== Create Queue ==");
    let created = client
        .create_queue(&CreateQueueArgs {
            name: "TestQueue".to_owned(),
            resource: Some("Foo Bar".to_owned()),
            dlq: None,
        })
        .await?;
    println!("Name: {}", created.name);
    println!("Orid: {}", created.orid);
    println!("Status: {}", created.status);
    println!();

    println!("== Read Queue ==");
    let details = client.get_queue_details(&created.orid).await?;
    println!("Orid: {}", details.orid);
    println!("Resource: {}", details.resource.unwrap_or_default());
    println!();

    println!("== Modify Queue ==");
    client
        .update_queue(&UpdateQueueArgs {
            orid: created.orid.clone(),
            resource: Some(CLEAR_FIELD.to_owned()),
            dlq: None,
        })
        .await?;
    println!("== Modify Completed ==");
    println!();

    println!("== Read 2 Queue ==");
    let details = client.get_queue_details(&created.orid).await?;
    println!("Orid: {}", details.orid);
    println!("Resource: {}", details.resource.unwrap_or_default());
    println!();

    println!("== Delete Queue ==");
    client.delete_queue(&created.orid).await?;
    println!("== Delete Completed ==");
    println!();
    Ok(())
}

async fn file_demo(sdk: &Sdk) -> Result<()> {
    let client = sdk.file_service_client();

    println!("== Create Container ==");
    let created = client.create_container("TestContainer").await?;
    println!("Orid: {}", created.orid);
    println!();

    println!("== Read Container Contents ==");
    let contents = client.list_container_contents(&created.orid).await?;
    println!("Directories: {:?}", contents.directories);
    println!("Files: {:?}", contents.files);
    println!();

    println!("== Delete Container ==");
    client.delete_container_or_path(&created.orid).await?;
    println!("== Delete Completed ==");
    println!();
    Ok(())
}

async fn functions_demo(sdk: &Sdk, archive: &Path) -> Result<()> {
    let client = sdk.serverless_functions_client();

    println!("== List ==");
    for summary in client.list_functions().await? {
        println!("Name: {}", summary.name);
        println!("Orid: {}", summary.orid);
    }
    println!();

    println!("== Create ==");
    let function = client.create_function("test").await?;
    println!("Name: {}", function.name);
    println!("Orid: {}", function.orid);
    println!();

    println!("== Updating Code ==");
    client
        .update_function_code(&function.orid, "node", "src/one:main", archive)
        .await
        .with_context(|| format!("upload of '{}' failed", archive.display()))?;
    println!("== Update Complete ==");
    println!();

    println!("== Invoking Code ==");
    let output = client.invoke_function(&function.orid, &json!({ "name": "Frito" })).await?;
    println!("Result: {}", String::from_utf8_lossy(&output));
    println!("== Invoke Complete ==");
    println!();

    println!("== Details ==");
    let details = client.get_function_details(&function.orid).await?;
    println!("Name: {}", details.name);
    println!("Orid: {}", details.orid);
    println!("Version: {}", details.version);
    println!("Runtime: {}", details.runtime);
    println!("EntryPoint: {}", details.entry_point);
    println!("Created: {}", details.created);
    println!("LastInvoke: {}", details.last_invoke);
    println!("LastUpdate: {}", details.last_update);
    println!();

    client.delete_function(&function.orid).await?;
    println!("== Delete ==");
    println!("Successfully deleted: {}", function.orid);
    println!();
    Ok(())
}

async fn state_machine_demo(sdk: &Sdk) -> Result<()> {
    let client = sdk.state_machine_client();

    println!("== Create State Machine ==");
    let created = client.create_state_machine(DEFINITION).await?;
    println!("Orid: {}", created.orid);
    println!();

    println!("== Update State Machine ==");
    let updated = client.update_state_machine(&created.orid, DEFINITION_WITH_WAIT).await?;
    println!("== Update Completed ==");
    println!("Orid: {}", updated.orid);
    println!();

    println!("== Read State Machine ==");
    let details = client.get_state_machine_details(&created.orid).await?;
    println!("Orid: {}", details.orid);
    println!("Name: {}", details.name);
    println!("Definition: {}", details.definition);
    println!();

    println!("== Delete State Machine ==");
    let deleted = client.delete_state_machine(&created.orid).await?;
    println!("== Delete Completed ==");
    println!("Orid: {}", deleted.orid);
    println!();
    Ok(())
}
