//! Replay Updates Example
//!
//! Feeds JSON-lines `UpdateEvent`s through a control loop and prints the
//! notifications and transport requests they produce. Without an argument
//! a built-in script is replayed; pass a file path or `-` for stdin.
//!
//! Run with: `cargo run -p netsync-state --example replay_updates [FILE|-]`
//!
//! Set `NETSYNC_LOG_MODE=debug` to watch each update cycle.

use std::io::{self, BufRead, BufReader};
use std::sync::Arc;

use netsync_state::{
    channel, init_logging_from_env, ControlLoop, HandlerConfig, RecordingTransport, StateStore,
};

const DEMO_SCRIPT: &str = r#"
{"event":"manager_property","property":"available_technologies","values":["ethernet","wifi"]}
{"event":"manager_property","property":"enabled_technologies","values":["wifi"]}
{"event":"managed_list","kind":"device","paths":["/device/wlan0"]}
{"event":"property_set","kind":"device","path":"/device/wlan0","properties":{"Type":"wifi","Address":"0123456789ab"}}
{"event":"managed_list","kind":"network","paths":["/service/home","/service/cafe"]}
{"event":"property_set","kind":"network","path":"/service/cafe","properties":{"Type":"wifi","State":"idle","Strength":40}}
{"event":"property_set","kind":"network","path":"/service/home","properties":{"Type":"wifi","State":"association","Device":"/device/wlan0"}}
{"event":"single_property","kind":"network","path":"/service/home","key":"State","value":"online"}
{"event":"managed_list","kind":"network","paths":["/service/cafe","/service/home"]}
{"event":"property_set","kind":"network","path":"/service/home","properties":{"IPConfig":"/ipconfig/home"}}
{"event":"ip_address","service_path":"/service/home","address":"192.168.1.20"}
{"event":"managed_list","kind":"network","paths":["/service/home"]}
"#;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logging_from_env()?;

    let lines: Vec<String> = match std::env::args().nth(1).as_deref() {
        None => DEMO_SCRIPT.lines().map(str::to_string).collect(),
        Some("-") => io::stdin().lock().lines().collect::<Result<_, _>>()?,
        Some(path) => BufReader::new(std::fs::File::open(path)?)
            .lines()
            .collect::<Result<_, _>>()?,
    };

    let config = HandlerConfig::default().with_scan_on_list(false);
    let transport = RecordingTransport::new();
    let mut store = StateStore::new(transport.clone(), config.clone())?;
    let (observer, changes) = channel();
    store.add_observer(Arc::new(observer));

    let control = ControlLoop::spawn(store, &config)?;
    let sender = control.sender();

    let mut replayed = 0;
    for (number, line) in lines.iter().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        if let Err(e) = sender.send_json(line) {
            eprintln!("line {}: {}", number + 1, e);
            continue;
        }
        replayed += 1;
    }

    let store = control.shutdown()?;
    println!("Replayed {} update(s)\n", replayed);

    println!("Notifications:");
    for event in changes.try_iter() {
        println!("  {}", serde_json::to_string(&event)?);
    }

    println!("\nTransport requests:");
    for request in transport.requests() {
        println!("  {}", serde_json::to_string(&request)?);
    }

    println!("\nNetworks:");
    for network in store.networks() {
        println!(
            "  {} type={} state={:?} ip={}",
            network.path(),
            network.network_type().unwrap_or("-"),
            network.connection_state(),
            network.ip_address().unwrap_or("-"),
        );
    }

    match store.active_network() {
        Some(active) => println!("\nActive network: {}", active.path()),
        None => println!("\nActive network: none"),
    }
    if let Some(address) = store.formatted_hardware_address_for_type("wifi") {
        println!("Wifi hardware address: {}", address);
    }

    Ok(())
}
