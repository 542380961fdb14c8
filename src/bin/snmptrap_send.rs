//! snmptrap-send: Send an SNMP trap or inform.
//!
//! Part of the snmp-trap CLI utilities.

use std::net::IpAddr;
use std::process::ExitCode;

use clap::Parser;
use snmp_trap::cli::args::{LogArgs, SnmpVersion, parse_oid, parse_varbind, resolve_host};
use snmp_trap::transport::TRAP_PORT;
use snmp_trap::{InformSender, Oid, TrapSender, TrapV1Pdu, VarBind};

/// Send an SNMPv1 trap, SNMPv2c trap or SNMPv2c inform.
#[derive(Debug, Parser)]
#[command(name = "snmptrap-send", version, about)]
struct Args {
    /// Manager host name or IP address.
    #[arg(value_name = "TARGET")]
    target: String,

    /// SNMP version: 1 or 2c.
    #[arg(short = 'v', long = "snmp-version", default_value = "2c")]
    snmp_version: SnmpVersion,

    /// Community string.
    #[arg(short = 'c', long = "community", default_value = "public")]
    community: String,

    /// Destination UDP port.
    #[arg(short = 'p', long = "port", default_value_t = TRAP_PORT)]
    port: u16,

    /// Send an InformRequest instead of a trap (v2c only).
    #[arg(long = "inform")]
    inform: bool,

    /// sysUpTime / time-stamp in hundredths of a second.
    #[arg(long = "uptime", default_value_t = 0)]
    uptime: u32,

    /// Notification OID (v2c) or enterprise OID (v1).
    #[arg(value_name = "TRAP_OID", value_parser = parse_oid)]
    trap_oid: Oid,

    /// v1 generic-trap code (0-6).
    #[arg(long = "generic", default_value_t = 6)]
    generic: i32,

    /// v1 specific-trap code.
    #[arg(long = "specific", default_value_t = 0)]
    specific: i32,

    /// v1 agent address.
    #[arg(long = "agent-addr", default_value = "0.0.0.0")]
    agent_addr: std::net::Ipv4Addr,

    /// Variable bindings as OID=TYPE:VALUE (types: i s x o a t c g C n).
    #[arg(value_name = "VARBIND", value_parser = parse_varbind)]
    varbinds: Vec<VarBind>,

    #[command(flatten)]
    log: LogArgs,
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    args.log.init_tracing();

    let host = match resolve_host(&args.target) {
        Ok(host) => host,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    if args.inform && args.snmp_version == SnmpVersion::V1 {
        eprintln!("Error: informs require SNMP version 2c");
        return ExitCode::FAILURE;
    }

    match run(host, args).await {
        Ok(Some(request_id)) => {
            println!("sent request-id {}", request_id);
            ExitCode::SUCCESS
        }
        Ok(None) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(host: IpAddr, args: Args) -> snmp_trap::Result<Option<i32>> {
    let bind = if host.is_ipv6() { "[::]:0" } else { "0.0.0.0:0" };

    if args.inform {
        let sender = InformSender::builder()
            .bind(bind)
            .port(args.port)
            .community(args.community)
            .build()
            .await?;
        let id = sender
            .inform(host, args.uptime, args.trap_oid, args.varbinds)
            .await?;
        return Ok(Some(id));
    }

    let sender = TrapSender::builder()
        .bind(bind)
        .port(args.port)
        .community(args.community)
        .build()
        .await?;

    match args.snmp_version {
        SnmpVersion::V1 => {
            let trap = TrapV1Pdu {
                enterprise: args.trap_oid,
                agent_addr: args.agent_addr.octets(),
                generic_trap: args.generic,
                specific_trap: args.specific,
                time_stamp: args.uptime,
                varbinds: args.varbinds,
            };
            sender.send_v1_trap(host, &trap).await?;
            Ok(None)
        }
        SnmpVersion::V2c => {
            let id = sender
                .notify(host, args.uptime, args.trap_oid, args.varbinds)
                .await?;
            Ok(Some(id))
        }
    }
}
