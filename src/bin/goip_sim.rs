//! GoIP Device Simulator
//!
//! Sends the text datagrams a GoIP GSM gateway would send to the
//! goip-gateway server. Useful for testing without hardware.
//!
//! Usage: cargo run --bin goip-sim [server_addr]

use std::env;
use std::net::SocketAddr;
use tokio::net::UdpSocket;
use tokio::time::{sleep, Duration};

/// Fake device identifier
const DEVICE_ID: &str = "goip01";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let server_addr: SocketAddr = env::args()
        .nth(1)
        .unwrap_or_else(|| "127.0.0.1:44444".to_string())
        .parse()?;

    println!("📱 GoIP Device Simulator");
    println!("  Target: {}", server_addr);
    println!("  Device: {}", DEVICE_ID);
    println!();

    let socket = UdpSocket::bind("0.0.0.0:0").await?;

    // (description, datagram, expects an ack)
    let scenarios = vec![
        ("Keep-alive", keepalive(), true),
        (
            "Incoming SMS",
            format!(
                "RECEIVE:id:{};password:1234;srcnum:15551234567;msg:Hello World",
                DEVICE_ID
            ),
            false,
        ),
        (
            "Incoming SMS with a malformed field",
            format!("RECEIVE:id:{};badfield;msg:Hi", DEVICE_ID),
            false,
        ),
        ("Unrecognized line", "hello world".to_string(), false),
        ("Keep-alive (again)", keepalive(), true),
    ];

    for (desc, datagram, expects_ack) in &scenarios {
        println!("📡 Sending: {}", desc);
        println!("   Payload: {}", datagram);

        socket.send_to(datagram.as_bytes(), server_addr).await?;

        if *expects_ack {
            let mut buf = [0u8; 256];
            match tokio::time::timeout(Duration::from_secs(2), socket.recv_from(&mut buf)).await {
                Ok(Ok((len, from))) => {
                    let reply = String::from_utf8_lossy(&buf[..len]);
                    if reply == format!("reg:{};status:200;", DEVICE_ID) {
                        println!("   ✅ Registered: {} (from {})", reply, from);
                    } else {
                        println!("   ⚠️  Unexpected response '{}' from {}", reply, from);
                    }
                }
                Ok(Err(e)) => println!("   ❌ Recv error: {}", e),
                Err(_) => println!("   ⏰ No ack (timeout)"),
            }
        }
        println!();

        sleep(Duration::from_secs(1)).await;
    }

    println!("✨ Simulation complete!");
    Ok(())
}

/// Keep-alive in the shape real devices send
fn keepalive() -> String {
    format!(
        "req:{};id:{};pass:1234;num:;signal:25;gsm_status:LOGIN;voip_status:LOGIN;",
        DEVICE_ID, DEVICE_ID
    )
}
