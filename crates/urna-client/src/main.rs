//! Urna interactive voting client.
//!
//! A thin I/O loop around the wire protocol: it serializes menu choices to
//! the server and displays the replies. All voting rules live server-side;
//! the only local validation is rejecting non-numeric input before it ever
//! reaches the wire.
//!
//! # Usage
//!
//! ```bash
//! urna-client --server 127.0.0.1:4950 --name ana
//! ```

// stdout is this binary's user interface.
#![allow(clippy::print_stdout, clippy::print_stderr)]

mod results;

use clap::Parser;
use thiserror::Error;
use tokio::{
    io::{AsyncBufReadExt, BufReader, Lines, Stdin},
    net::TcpStream,
};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};
use urna_proto::{ServerMessage, WireError, wire};

/// Menu selector for casting a vote.
const MENU_VOTE: i32 = 1;

/// Menu selector for viewing results.
const MENU_RESULTS: i32 = 2;

/// Urna voting client
#[derive(Parser, Debug)]
#[command(name = "urna-client")]
#[command(about = "Interactive client for the urna voting server")]
#[command(version)]
struct Args {
    /// Server address
    #[arg(short, long, default_value = "127.0.0.1:4950")]
    server: String,

    /// Your display name (prompted when omitted)
    #[arg(short, long)]
    name: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "warn")]
    log_level: String,
}

/// Client-side failures.
#[derive(Debug, Error)]
enum ClientError {
    /// Could not reach the server.
    #[error("connection failed: {0}")]
    Connection(String),

    /// Wire-level failure mid-session.
    #[error(transparent)]
    Wire(#[from] WireError),

    /// Local terminal I/O failure.
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    /// The server sent a message the protocol does not allow here.
    #[error("unexpected server message: {0:?}")]
    Unexpected(ServerMessage),
}

/// Line-oriented stdin.
type Input = Lines<BufReader<Stdin>>;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));

    tracing_subscriber::registry().with(fmt::layer()).with(filter).init();

    match run(args).await {
        Ok(()) => Ok(()),
        Err(ClientError::Wire(WireError::ConnectionClosed)) => {
            println!("Servidor desconectado.");
            Ok(())
        },
        Err(error) => Err(error.into()),
    }
}

/// Announce, then loop on the menu until the user quits, the vote is cast,
/// or the server goes away.
async fn run(args: Args) -> Result<(), ClientError> {
    let mut input = BufReader::new(tokio::io::stdin()).lines();

    let name = match args.name {
        Some(name) => name,
        None => {
            println!("Introduce tu nombre:");
            match next_line(&mut input).await? {
                Some(name) => name,
                None => return Ok(()),
            }
        },
    };

    let mut stream = TcpStream::connect(&args.server)
        .await
        .map_err(|e| ClientError::Connection(format!("'{}': {e}", args.server)))?;
    tracing::debug!(server = %args.server, "connected");

    wire::write_string(&mut stream, &name).await?;

    println!("Bienvenido al sistema de votación, {name}.");

    loop {
        println!();
        println!("Elige una opción:");
        println!("1. Votar");
        println!("2. Ver resultados");
        println!("3. Salir");

        let Some(line) = next_line(&mut input).await? else {
            break;
        };

        match line.parse::<i32>() {
            Ok(MENU_VOTE) => {
                wire::write_i32(&mut stream, MENU_VOTE).await?;
                if handle_voting(&mut stream, &mut input).await? {
                    break;
                }
            },
            Ok(MENU_RESULTS) => {
                wire::write_i32(&mut stream, MENU_RESULTS).await?;
                handle_results(&mut stream).await?;
            },
            Ok(3) => {
                println!("Saliendo del programa.");
                break;
            },
            Ok(_) => println!("Opción inválida. Elige 1, 2 o 3."),
            Err(_) => println!("Entrada inválida. Introduce un número."),
        }
    }

    Ok(())
}

/// Drive one voting exchange. Returns `true` when the turn is over and the
/// client should exit.
async fn handle_voting(stream: &mut TcpStream, input: &mut Input) -> Result<bool, ClientError> {
    let labels = match ServerMessage::read_from(stream).await? {
        ServerMessage::Options(labels) => labels,
        ServerMessage::Error(detail) => {
            println!("ERROR: {detail}");
            return Ok(false);
        },
        other => return Err(ClientError::Unexpected(other)),
    };

    println!("Opciones de votación:");
    for label in &labels {
        println!("{label}");
    }

    let choice = loop {
        println!("Elige el número de opción por la que quieres votar:");
        match next_line(input).await? {
            Some(line) => match line.parse::<i32>() {
                Ok(choice) => break choice,
                Err(_) => println!("Entrada inválida. Introduce un número."),
            },
            None => return Ok(true),
        }
    };

    wire::write_i32(stream, choice).await?;

    match ServerMessage::read_from(stream).await? {
        ServerMessage::VoteAccepted => {
            println!("Voto registrado correctamente.");
            match ServerMessage::read_from(stream).await? {
                ServerMessage::TurnEnded => {
                    println!("Tu turno ha terminado. Gracias por votar.");
                    Ok(true)
                },
                other => Err(ClientError::Unexpected(other)),
            }
        },
        ServerMessage::Error(detail) => {
            println!("ERROR: {detail}");
            Ok(false)
        },
        other => Err(ClientError::Unexpected(other)),
    }
}

/// Read and display one results message.
async fn handle_results(stream: &mut TcpStream) -> Result<(), ClientError> {
    match ServerMessage::read_from(stream).await? {
        ServerMessage::Results(line) => {
            println!("Votos:");
            for (index, (name, percentage)) in results::parse_results(&line).iter().enumerate() {
                println!("{}. {name} ({percentage})", index + 1);
            }
            Ok(())
        },
        ServerMessage::Error(detail) => {
            println!("ERROR: {detail}");
            Ok(())
        },
        other => Err(ClientError::Unexpected(other)),
    }
}

/// Read one trimmed line; `None` when stdin is closed.
async fn next_line(input: &mut Input) -> Result<Option<String>, ClientError> {
    Ok(input.next_line().await?.map(|line| line.trim().to_string()))
}
