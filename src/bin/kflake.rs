//! Snowflake ID generation service: a thin HTTP front-end over the
//! `kflake` generator. See the `restful` module for the endpoint surface.

use clap::{Parser, ValueEnum};
use kflake::{BoxDynError, MaskConfig, Snowflake, restful, worker_id};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::signal;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum WorkerIdType {
    /// Trailing ordinal of the StatefulSet pod name in MY_POD_NAME
    PodId,
    /// Lower 16 bits of the IP address in MY_HOST_IP
    PodIp,
    /// Lower 16 bits of a private interface address
    PrivateIp,
    /// Random 16-bit value (single-node or throwaway deployments only)
    Random,
}

#[derive(Debug, Parser)]
#[command(name = "kflake", about = "Snowflake unique-ID generation service")]
struct Args {
    /// Worker-ID strategy
    #[arg(short = 't', long = "worker-id-type", value_enum, default_value = "pod-id")]
    worker_id_type: WorkerIdType,

    /// Comma-separated bit widths: time,worker,sequence
    #[arg(short = 'm', long = "mask", value_parser = parse_mask, default_value = "41,10,12")]
    mask: MaskConfig,

    /// Listen address
    #[arg(short = 'l', long = "listen", env = "KFLAKE_LISTEN", default_value = "0.0.0.0:3080")]
    listen: SocketAddr,
}

fn parse_mask(value: &str) -> Result<MaskConfig, String> {
    let parts: Vec<&str> = value.split(',').collect();
    if parts.len() != 3 {
        return Err("expected three comma-separated widths: time,worker,sequence".into());
    }
    let mut bits = [0u8; 3];
    for (slot, part) in bits.iter_mut().zip(&parts) {
        *slot = part
            .trim()
            .parse()
            .map_err(|_| format!("invalid bit width `{part}`"))?;
    }
    Ok(MaskConfig::new(bits[0], bits[1], bits[2]))
}

fn random_worker_id() -> Result<u16, BoxDynError> {
    Ok(rand::random())
}

fn init_flake(args: &Args) -> Result<Snowflake, BoxDynError> {
    let builder = Snowflake::builder().mask_config(args.mask);
    let flake = match args.worker_id_type {
        WorkerIdType::PodId => builder.worker_id(&worker_id::pod_ordinal_worker_id),
        WorkerIdType::PodIp => builder.worker_id(&worker_id::env_ip_worker_id),
        WorkerIdType::PrivateIp => builder.worker_id(&worker_id::lower16_bit_private_ip),
        WorkerIdType::Random => builder.worker_id(&random_worker_id),
    }
    .finalize()?;
    Ok(flake)
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install ctrl-c handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    tracing::info!("shutdown signal received");
}

#[tokio::main]
async fn main() -> Result<(), BoxDynError> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();
    let flake = init_flake(&args)?;
    tracing::info!(
        worker_id = flake.worker_id(),
        mask = ?args.mask,
        "snowflake node initialized"
    );

    let app = restful::router(Arc::new(flake));
    let listener = TcpListener::bind(args.listen).await?;
    tracing::info!(addr = %args.listen, "listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    tracing::info!("server exiting");
    Ok(())
}
