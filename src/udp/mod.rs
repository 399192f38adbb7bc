use bytes::Bytes;
use std::net::SocketAddr;
use tokio::net::UdpSocket;
use tracing::{debug, error, info};

use crate::config::UdpConfig;
use crate::error::GoipError;
use crate::goip::{KeepAliveRequest, MessageKind, ReceiveMessage};

/// Bind the listening socket
pub async fn bind(config: &UdpConfig) -> anyhow::Result<UdpSocket> {
    let socket = UdpSocket::bind(&config.bind)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to bind UDP socket on {}: {}", config.bind, e))?;
    info!("Start listening for GoIP messages on {}", socket.local_addr()?);
    Ok(socket)
}

/// Receive loop. Datagrams are handled one at a time; a failure on one
/// datagram is logged and never ends the loop.
pub async fn serve(socket: UdpSocket, max_datagram: usize) -> anyhow::Result<()> {
    let mut buf = vec![0u8; max_datagram];

    loop {
        let (len, src) = match socket.recv_from(&mut buf).await {
            Ok(received) => received,
            Err(e) => {
                error!(error = %e, "Error reading from UDP");
                continue;
            }
        };

        let payload = &buf[..len];
        let remote_addr = src.to_string();
        info!(
            remote_address = %remote_addr,
            payload = %String::from_utf8_lossy(payload),
            "Received message"
        );

        let reply = match handle_datagram(payload, &remote_addr) {
            Ok(reply) => reply,
            Err(e) => {
                error!(error = %e, remote_address = %remote_addr, "Dropping malformed message");
                continue;
            }
        };

        if let Some(response) = reply {
            if let Err(e) = send_reply(&socket, &response, src).await {
                error!(error = %e, remote_address = %remote_addr, "Error sending response");
                continue;
            }
            info!(
                response = %String::from_utf8_lossy(&response),
                remote_address = %remote_addr,
                "Sent response"
            );
        }
    }
}

/// Classify one datagram and act on it.
///
/// Returns the reply to send back to `remote_addr`, if any. Only the
/// keep-alive path sees the raw bytes; RECEIVE fields are decoded lossily.
pub fn handle_datagram(payload: &[u8], remote_addr: &str) -> Result<Option<Bytes>, GoipError> {
    let text = String::from_utf8_lossy(payload);

    match MessageKind::classify(&text) {
        MessageKind::Receive => {
            let message = ReceiveMessage::parse(&text, remote_addr)?;
            info!(
                id = %message.id,
                has_password = !message.password.is_empty(),
                srcnum = %message.source_number,
                msg = %message.message_body,
                remote_addr = %message.remote_addr,
                "Parsed RECEIVE message"
            );
            Ok(None)
        }
        MessageKind::KeepAlive => {
            let request = KeepAliveRequest::parse(payload)?;
            debug!(
                device = %String::from_utf8_lossy(request.device_id()),
                fields = request.fields().len(),
                "Keep-alive request"
            );
            Ok(Some(request.response()))
        }
        MessageKind::Unrecognized => {
            debug!(remote_address = %remote_addr, "Ignoring unrecognized message");
            Ok(None)
        }
    }
}

async fn send_reply(
    socket: &UdpSocket,
    response: &Bytes,
    dest: SocketAddr,
) -> Result<(), GoipError> {
    socket.send_to(response, dest).await?;
    Ok(())
}
