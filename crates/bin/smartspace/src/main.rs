//! # smartspace: controller client and mock controller
//!
//! Composition root that wires the adapters into the application services.
//!
//! ## Responsibilities
//! - Parse configuration (CLI args, env vars, config file)
//! - Open the persisted connection session
//! - Construct the HTTP controller client, the in-memory device store and the
//!   notification bus, and inject them into the services and sync controllers
//! - Serve the mock controller on request
//!
//! ## Dependency rule
//! This is the **only** crate that depends on all other crates.
//! It is the wiring layer; no domain logic belongs here.

mod config;
mod session;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tokio::sync::broadcast;

use smartspace_adapter_http_axum::state::MockState;
use smartspace_adapter_http_reqwest::ReqwestDeviceController;
use smartspace_adapter_virtual::VirtualController;
use smartspace_app::memory::InMemoryDeviceStore;
use smartspace_app::notification_bus::NotificationBus;
use smartspace_app::ports::DeviceStore;
use smartspace_app::services::connection_service::ConnectionService;
use smartspace_app::services::device_service::DeviceService;
use smartspace_app::sync::{SliderController, SyncContext, ToggleController};
use smartspace_domain::connection::ConnectionConfig;
use smartspace_domain::device::{Device, DeviceKind, DevicePatch, Level, PowerState};
use smartspace_domain::error::SmartSpaceError;
use smartspace_domain::id::VenueId;
use smartspace_domain::notification::{Notification, Severity};

use crate::config::Config;
use crate::session::FileConfigProvider;

#[derive(Parser)]
#[command(name = "smartspace", version, about = "Control the devices of a smart space")]
struct Cli {
    /// Path of the configuration file
    #[arg(long, default_value = config::DEFAULT_PATH)]
    config: PathBuf,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Ping the controller and remember its address if it answers
    Check { ip: String, port: String },
    /// Remember the controller address without checking it
    Save { ip: String, port: String },
    /// Flip a NORMAL device
    Toggle {
        #[arg(long)]
        venue: VenueId,
        #[arg(long)]
        name: String,
        /// State the device is in before the toggle
        #[arg(long, default_value = "off")]
        state: PowerState,
    },
    /// Feed slider values to a REGULATABLE device, debounced
    Set {
        #[arg(long)]
        venue: VenueId,
        #[arg(long)]
        name: String,
        /// Level the device is at before the first input
        #[arg(long, default_value = "0")]
        current: Level,
        /// Pause between two inputs, in milliseconds
        #[arg(long, default_value_t = 0)]
        interval_ms: u64,
        /// Raw slider inputs, in order
        #[arg(required = true)]
        values: Vec<Level>,
    },
    /// Serve the mock controller
    Mock,
}

type AppContext = SyncContext<
    ReqwestDeviceController,
    InMemoryDeviceStore,
    NotificationBus,
    FileConfigProvider,
>;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = Config::load(&cli.config)
        .with_context(|| format!("unable to load {}", cli.config.display()))?;

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_new(&config.logging.filter)
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    if let Commands::Mock = cli.command {
        return serve_mock(&config).await;
    }

    // Ports
    let session = FileConfigProvider::open(&config.session.path)?.with_fallback(
        ConnectionConfig::new(&config.controller.ip, &config.controller.port),
    );
    tracing::debug!(path = %session.path().display(), "session opened");
    let session = Arc::new(session);
    let controller = Arc::new(ReqwestDeviceController::with_timeout(
        config.request_timeout(),
    ));
    let store = Arc::new(InMemoryDeviceStore::default());
    let bus = Arc::new(NotificationBus::new(64));
    let mut notifications = bus.subscribe();

    // Services
    let connection = ConnectionService::new(
        Arc::clone(&controller),
        Arc::clone(&session),
        Arc::clone(&bus),
    );
    let devices = DeviceService::new(Arc::clone(&store));
    let ctx = SyncContext::new(controller, store, bus, session);

    let result = match cli.command {
        Commands::Check { ip, port } => connection.check_connection(&ip, &port).await.map(|_| ()),
        Commands::Save { ip, port } => connection.save(&ip, &port).map(|_| ()),
        Commands::Toggle { venue, name, state } => {
            match devices.add_device(&venue, &name, DeviceKind::Normal) {
                Ok(device) => toggle(ctx, device, state).await,
                Err(err) => Err(err),
            }
        }
        Commands::Set {
            venue,
            name,
            current,
            interval_ms,
            values,
        } => match devices.add_device(&venue, &name, DeviceKind::Regulatable) {
            Ok(device) => {
                let pacing = Duration::from_millis(interval_ms);
                set(ctx, config.debounce(), device, current, pacing, &values).await
            }
            Err(err) => Err(err),
        },
        Commands::Mock => Ok(()),
    };

    print_notifications(&mut notifications);
    result.map_err(anyhow::Error::from)
}

/// Toggle `device`, starting from `state`.
async fn toggle(ctx: AppContext, device: Device, state: PowerState) -> Result<(), SmartSpaceError> {
    ctx.store()
        .update_local(&device.venue_id, device.id, DevicePatch::State(state))?;
    let next = ToggleController::new(ctx)
        .toggle(&device.venue_id, device.id)
        .await?;
    println!("{}: {next}", device.name);
    Ok(())
}

/// Feed `values` to a slider bound to `device`, starting from `current`.
async fn set(
    ctx: AppContext,
    debounce: Duration,
    device: Device,
    current: Level,
    pacing: Duration,
    values: &[Level],
) -> Result<(), SmartSpaceError> {
    ctx.store()
        .update_local(&device.venue_id, device.id, DevicePatch::Value(current))?;

    let slider = SliderController::bind(ctx, &device.venue_id, device.id, debounce)?;
    for value in values {
        slider.input(*value);
        if !pacing.is_zero() {
            tokio::time::sleep(pacing).await;
        }
    }
    slider.settle().await;

    println!("{}: {}", device.name, slider.confirmed());
    match slider.last_error() {
        Some(err) => Err(err.into()),
        None => Ok(()),
    }
}

fn print_notifications(notifications: &mut broadcast::Receiver<Notification>) {
    while let Ok(notification) = notifications.try_recv() {
        match notification.severity {
            Severity::Error => eprintln!("[{}] {}", notification.severity, notification.message),
            Severity::Success | Severity::Info => {
                println!("[{}] {}", notification.severity, notification.message);
            }
        }
    }
}

async fn serve_mock(config: &Config) -> anyhow::Result<()> {
    let mut controller = VirtualController::new();
    for device in &config.mock.devices {
        controller.add(&device.venue, &device.name, device.kind)?;
        tracing::info!(
            venue = %device.venue,
            name = %device.name,
            kind = %device.kind,
            "simulating device"
        );
    }
    let app = smartspace_adapter_http_axum::router::build(MockState::new(controller));

    let bind_addr = config.mock_bind_addr();
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("unable to bind {bind_addr}"))?;
    tracing::info!("mock controller listening on http://{bind_addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
        })
        .await?;
    Ok(())
}
