use anyhow::Result;
use paramscope_server::{ApiServer, ServerConfig};
use std::net::IpAddr;

pub fn execute(host: IpAddr, port: u16, compact: bool) -> Result<()> {
    let config = ServerConfig {
        pretty: !compact,
        ..ServerConfig::new(host, port)
    };

    tracing::info!("Starting paramscope API on {}", config.addr());

    println!("✓ Serving parameter analysis on http://{}/api", config.addr());
    println!();
    println!("Try:  curl 'http://{}/api?n=1,2,3&flag=true'", config.addr());
    println!();
    println!("Press Ctrl+C to stop...");

    let server = ApiServer::new(config);

    // Blocks until Ctrl+C
    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(server.start())?;

    println!("✅ Server stopped");
    Ok(())
}
