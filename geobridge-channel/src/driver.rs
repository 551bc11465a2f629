use clap::{Parser, Subcommand};
use geobridge_core::BridgeRequest;
use geobridge_wire::{WireEvent, WireRequest, get_socket_name, prelude::*};
use interprocess::local_socket::{tokio::Stream, traits::tokio::Stream as _};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};

#[derive(Parser)]
struct Cli {
    /// Name of the local socket the location daemon is listening on
    socket: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// One-shot query for the last known fix
    LastKnown,
    /// Start continuous updates and print them as they arrive
    Start {
        /// How many updates to wait for before stopping again
        #[arg(short, long, default_value_t = 3)]
        updates: u32,
    },
    /// Stop continuous updates
    Stop,
    /// Send a raw method name, to poke at unrecognized calls
    Call {
        /// The method name to send as-is
        method: String,
    },
}

async fn send_request(stream: &mut (impl AsyncWrite + Unpin), method: &str) -> Result {
    let mut encoded =
        serde_json::to_vec(&WireRequest::new(method)).context("Failed to encode request")?;
    encoded.push(b'\n');
    stream
        .write_all(&encoded)
        .await
        .context("Failed to send request")
}

async fn read_event(recv: &mut (impl AsyncBufRead + Unpin)) -> Result<WireEvent> {
    let mut line = String::with_capacity(256);
    let amnt = recv
        .read_line(&mut line)
        .await
        .context("Failed to read from daemon")?;
    if amnt == 0 {
        bail!("Daemon closed the connection");
    }
    serde_json::from_str(line.trim_end()).context("Failed to parse daemon reply")
}

fn print_event(event: &WireEvent) {
    match event {
        WireEvent::Response(resp) => println!("{resp:?}"),
        WireEvent::Update(Some(fix)) => {
            println!("update: {:.5}, {:.5}", fix.latitude, fix.longitude)
        }
        WireEvent::Update(None) => println!("update: no fix"),
        WireEvent::Error(msg) => eprintln!("daemon error: {msg}"),
    }
}

/// Read replies until the next direct response arrives, printing everything
async fn await_response(recv: &mut (impl AsyncBufRead + Unpin)) -> Result {
    loop {
        let event = read_event(recv).await?;
        let done = matches!(event, WireEvent::Response(_));
        print_event(&event);
        if done {
            return Ok(());
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result {
    let cli = Cli::parse();

    let socket_name = get_socket_name(cli.socket.clone()).context("Failed to get socket name")?;

    let stream = Stream::connect(socket_name)
        .await
        .context("Failed to connect to socket")?;
    let mut recv = BufReader::new(&stream);
    let mut send = &stream;

    match cli.command {
        Commands::LastKnown => {
            send_request(&mut send, BridgeRequest::GetLastKnownLocation.method()).await?;
            await_response(&mut recv).await?;
        }
        Commands::Start { updates } => {
            send_request(&mut send, BridgeRequest::StartLocationUpdates.method()).await?;
            await_response(&mut recv).await?;

            let mut seen = 0;
            while seen < updates {
                let event = read_event(&mut recv).await?;
                if matches!(event, WireEvent::Update(_)) {
                    seen += 1;
                }
                print_event(&event);
            }

            send_request(&mut send, BridgeRequest::StopLocationUpdates.method()).await?;
            await_response(&mut recv).await?;
        }
        Commands::Stop => {
            send_request(&mut send, BridgeRequest::StopLocationUpdates.method()).await?;
            await_response(&mut recv).await?;
        }
        Commands::Call { method } => {
            send_request(&mut send, &method).await?;
            await_response(&mut recv).await?;
        }
    }

    Ok(())
}
