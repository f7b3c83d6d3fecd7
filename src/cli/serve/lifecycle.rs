//! Server lifecycle management.

use crate::{config::FigmaConfig, core::register_server, log};
use anyhow::Result;
use owo_colors::OwoColorize;
use std::{
    net::{IpAddr, SocketAddr},
    sync::Arc,
};
use tiny_http::Server;

/// Maximum number of port binding attempts.
const MAX_PORT_RETRIES: u16 = 10;

/// Bind to the specified interface and port, with automatic port retry.
///
/// Returns the address actually bound, which differs from the request when
/// the base port was taken or `base_port` is 0.
pub fn bind_with_retry(interface: IpAddr, base_port: u16) -> Result<(Server, SocketAddr)> {
    let mut last_error = None;

    for offset in 0..MAX_PORT_RETRIES {
        let port = base_port.saturating_add(offset);
        let addr = SocketAddr::new(interface, port);

        match Server::http(addr) {
            Ok(server) => {
                if offset > 0 {
                    log!("serve"; "port {} in use, using {} instead", base_port, port);
                }
                let bound = server.server_addr().to_ip().unwrap_or(addr);
                return Ok((server, bound));
            }
            Err(e) => last_error = Some(e),
        }
    }

    Err(anyhow::anyhow!(
        "Failed to bind after {} attempts (ports {}-{}): {}",
        MAX_PORT_RETRIES,
        base_port,
        base_port.saturating_add(MAX_PORT_RETRIES - 1),
        last_error.map(|e| e.to_string()).unwrap_or_default()
    ))
}

/// Register server for graceful shutdown.
///
/// When Ctrl+C is pressed, the handler unblocks the accept loop.
pub fn register_server_for_shutdown(server: Arc<Server>) {
    register_server(server);
}

/// Log the bound address and which document identifiers are configured.
pub fn report_startup(addr: SocketAddr, figma: &FigmaConfig) {
    log!("serve"; "http://{}", addr);
    log!("serve"; "file id: {}", configured(figma.has_file_id()));
    log!("serve"; "group node id: {}", configured(figma.has_group_node_id()));
}

fn configured(present: bool) -> String {
    if present {
        "configured".green().to_string()
    } else {
        "missing".red().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::Ipv4Addr;

    #[test]
    fn test_bind_ephemeral_reports_real_port() {
        let (_server, addr) = bind_with_retry(IpAddr::V4(Ipv4Addr::LOCALHOST), 0).unwrap();
        assert_ne!(addr.port(), 0);
    }

    #[test]
    fn test_bind_retries_next_port() {
        let (_first, taken) = bind_with_retry(IpAddr::V4(Ipv4Addr::LOCALHOST), 0).unwrap();
        match bind_with_retry(taken.ip(), taken.port()) {
            Ok((_second, addr)) => assert_ne!(addr.port(), taken.port()),
            // every following port may also be taken on a busy machine
            Err(e) => assert!(e.to_string().contains("Failed to bind")),
        }
    }
}
