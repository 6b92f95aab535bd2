use clap::{Args, Parser, Subcommand};
use iterdns_application::ports::{CacheMaintenancePort, DnsResolver};
use iterdns_domain::{CliOverrides, Config, Name};
use iterdns_infrastructure::dns::{DnsServerHandler, RecordCache};
use iterdns_jobs::{CacheSnapshotJob, JobRunner};
use std::net::{Ipv4Addr, SocketAddr};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

mod bootstrap;
mod di;
mod server;

#[derive(Parser)]
#[command(name = "iterdns")]
#[command(version)]
#[command(about = "Iterative DNS resolver and authoritative UDP server")]
struct Cli {
    /// Configuration file path
    #[arg(short = 'c', long, value_name = "FILE", global = true)]
    config: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Answer DNS queries over UDP
    Serve(ServeArgs),

    /// Resolve a host name iteratively and print the result
    Resolve {
        hostname: String,

        /// Cache snapshot file
        #[arg(long, value_name = "FILE")]
        cache_file: Option<String>,

        /// Per-server query timeout in milliseconds
        #[arg(long)]
        timeout_ms: Option<u64>,

        /// Root server address; repeat to give several
        #[arg(long = "root", value_name = "IPV4")]
        roots: Vec<Ipv4Addr>,
    },
}

#[derive(Args)]
struct ServeArgs {
    /// DNS server port
    #[arg(short = 'p', long)]
    port: Option<u16>,

    /// Bind address
    #[arg(short = 'b', long)]
    bind: Option<String>,

    /// Zone master file served authoritatively
    #[arg(short = 'z', long, value_name = "FILE")]
    zone: Option<String>,

    /// Cache snapshot file
    #[arg(long, value_name = "FILE")]
    cache_file: Option<String>,

    /// Disable the record cache
    #[arg(long)]
    no_cache: bool,

    /// Replace every cached record's TTL with this many seconds
    #[arg(long)]
    ttl: Option<u32>,

    /// Per-server query timeout in milliseconds
    #[arg(long)]
    timeout_ms: Option<u64>,

    /// Root server address; repeat to give several
    #[arg(long = "root", value_name = "IPV4")]
    roots: Vec<Ipv4Addr>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut cli_overrides = CliOverrides {
        log_level: cli.log_level.clone(),
        ..CliOverrides::default()
    };
    match &cli.command {
        Command::Serve(args) => {
            cli_overrides.dns_port = args.port;
            cli_overrides.bind_address = args.bind.clone();
            cli_overrides.zone_path = args.zone.clone();
            cli_overrides.cache_path = args.cache_file.clone();
            cli_overrides.disable_cache = args.no_cache;
            cli_overrides.cache_ttl = args.ttl;
            cli_overrides.query_timeout_ms = args.timeout_ms;
            cli_overrides.root_servers = args.roots.clone();
        }
        Command::Resolve {
            cache_file,
            timeout_ms,
            roots,
            ..
        } => {
            cli_overrides.cache_path = cache_file.clone();
            cli_overrides.query_timeout_ms = *timeout_ms;
            cli_overrides.root_servers = roots.clone();
        }
    }

    let config = bootstrap::load_config(cli.config.as_deref(), cli_overrides)?;
    bootstrap::init_logging(&config);

    match cli.command {
        Command::Serve(_) => serve(config).await,
        Command::Resolve { hostname, .. } => resolve(config, &hostname).await,
    }
}

async fn serve(config: Config) -> anyhow::Result<()> {
    info!("Starting iterdns v{}", env!("CARGO_PKG_VERSION"));

    let dns_services = di::DnsServices::new(&config)?;
    let shutdown = CancellationToken::new();

    let mut jobs = JobRunner::new().with_shutdown_token(shutdown.clone());
    if let Some(cache) = snapshot_cache(&dns_services.cache) {
        jobs = jobs.with_cache_snapshot(
            CacheSnapshotJob::new(cache).with_interval(config.cache.snapshot_interval_secs),
        );
    }
    let job_handles = jobs.start();

    let bind_addr: SocketAddr =
        format!("{}:{}", config.server.bind_address, config.server.dns_port).parse()?;
    let handler = Arc::new(DnsServerHandler::new(dns_services.handler_use_case.clone()));

    let server_shutdown = shutdown.clone();
    let mut server = tokio::spawn(async move {
        server::start_dns_server(bind_addr, handler, server_shutdown).await
    });

    let server_result = tokio::select! {
        signal = tokio::signal::ctrl_c() => {
            if let Err(e) = signal {
                error!(error = %e, "Failed to listen for shutdown signal");
            }
            info!("Shutdown signal received");
            shutdown.cancel();
            server.await
        }
        result = &mut server => {
            shutdown.cancel();
            result
        }
    };

    match server_result {
        Ok(Err(e)) => error!(error = %e, "DNS server error"),
        Err(e) => error!(error = %e, "DNS server task failed"),
        Ok(Ok(())) => {}
    }
    for handle in job_handles {
        let _ = handle.await;
    }

    if let Some(cache) = &dns_services.cache {
        if let Err(e) = cache.save_snapshot() {
            error!(error = %e, "Failed to save cache snapshot on shutdown");
        }
    }

    info!("Server shutdown complete");
    Ok(())
}

async fn resolve(config: Config, hostname: &str) -> anyhow::Result<()> {
    let name: Name = hostname.parse()?;
    let dns_services = di::DnsServices::new(&config)?;

    let resolution = dns_services.resolver.resolve(&name).await;
    if !resolution.is_resolved() {
        anyhow::bail!("could not resolve {}", name);
    }

    println!("canonical name: {}", resolution.canonical_name);
    for alias in &resolution.aliases {
        println!("alias:          {}", alias);
    }
    for address in &resolution.addresses {
        println!("address:        {}", address);
    }

    if let Some(cache) = &dns_services.cache {
        cache.save_snapshot()?;
    }
    Ok(())
}

/// The cache, when it has somewhere to persist to.
fn snapshot_cache(cache: &Option<Arc<RecordCache>>) -> Option<Arc<dyn CacheMaintenancePort>> {
    let cache = cache.as_ref()?;
    cache.snapshot_path()?;
    Some(cache.clone())
}
