//! snmptrap-listen: Print received SNMP traps and informs.
//!
//! Part of the snmp-trap CLI utilities.

use std::net::SocketAddr;
use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use snmp_trap::cli::args::LogArgs;
use snmp_trap::transport::{
    DEFAULT_BUFFER_SIZE, ErrorSink, InformRequestListener, Origin, TrapV1Listener, TrapV2Listener,
};
use snmp_trap::{Error, TrapReceiver, TrapV1Pdu, TrapV2Pdu, VarBind};

/// Listen for SNMP notifications and print them to stdout.
#[derive(Debug, Parser)]
#[command(name = "snmptrap-listen", version, about)]
struct Args {
    /// Address to listen on.
    #[arg(short = 'b', long = "bind", default_value = "0.0.0.0:162")]
    bind: String,

    /// Receive buffer size in bytes (minimum 484).
    #[arg(long = "buffer-size", default_value_t = DEFAULT_BUFFER_SIZE)]
    buffer_size: usize,

    /// Do not send Response PDUs for informs.
    #[arg(long = "no-ack")]
    no_ack: bool,

    #[command(flatten)]
    log: LogArgs,
}

fn print_varbinds(varbinds: &[VarBind]) {
    for vb in varbinds {
        println!("  {}", vb);
    }
}

fn header(origin: &Origin, kind: &str) {
    println!(
        "{} {} from {} community={}",
        origin.version,
        kind,
        origin.source,
        String::from_utf8_lossy(&origin.community)
    );
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    args.log.init_tracing();

    let sink: Arc<dyn ErrorSink> =
        Arc::new(|source: Option<SocketAddr>, error: &Error| match source {
            Some(source) => eprintln!("Error from {}: {}", source, error),
            None => eprintln!("Error: {}", error),
        });

    let receiver = match TrapReceiver::builder()
        .bind(args.bind)
        .buffer_size(args.buffer_size)
        .acknowledge_informs(!args.no_ack)
        .error_sink(sink)
        .build()
        .await
    {
        Ok(receiver) => receiver,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let v1: Arc<dyn TrapV1Listener> = Arc::new(|origin: &Origin, trap: &TrapV1Pdu| {
        header(origin, "Trap");
        println!(
            "  enterprise={} agent={} generic={} specific={} uptime={}",
            trap.enterprise,
            std::net::Ipv4Addr::from(trap.agent_addr),
            trap.generic_trap,
            trap.specific_trap,
            snmp_trap::value::format_timeticks(trap.time_stamp)
        );
        print_varbinds(&trap.varbinds);
    });
    let v2: Arc<dyn TrapV2Listener> = Arc::new(|origin: &Origin, trap: &TrapV2Pdu| {
        header(origin, "Trap");
        print_varbinds(&trap.varbinds);
    });
    let inform: Arc<dyn InformRequestListener> = Arc::new(|origin: &Origin, inform: &TrapV2Pdu| {
        header(origin, "InformRequest");
        print_varbinds(&inform.varbinds);
    });

    receiver.add_trap_v1_listener(v1);
    receiver.add_trap_v2_listener(v2);
    receiver.add_inform_listener(inform);

    receiver.start();
    eprintln!("listening on {}", receiver.local_addr());

    if let Err(e) = tokio::signal::ctrl_c().await {
        eprintln!("Error: {}", e);
    }
    receiver.stop().await;

    let stats = receiver.stats();
    eprintln!(
        "received {} datagrams, {} undecodable, {} dispatched",
        stats.received, stats.decode_failures, stats.dispatched
    );
    ExitCode::SUCCESS
}
