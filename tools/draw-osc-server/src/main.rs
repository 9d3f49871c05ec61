//! UDP/OSC front end for laser-draw.
//!
//! Listens for OSC drawing commands and streams assembled frames to the
//! first discovered DAC. Set `LASER_DRAW_SIM_DAC=1` to use the in-process
//! simulator instead of hardware.

use std::process::ExitCode;

use clap::Parser;
use log::{error, info};

use laser_draw::control::osc::OscServer;
use laser_draw::{connect_first_dac, CancelToken, RunExit, SimulatorDiscovery};

#[derive(Parser)]
#[command(name = "draw-osc-server", about = "OSC laser drawing server")]
struct Args {
    /// UDP port to listen on
    #[arg(default_value_t = 9000)]
    port: u16,
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let cancel = CancelToken::new();
    {
        let cancel = cancel.clone();
        if let Err(err) = ctrlc::set_handler(move || cancel.cancel()) {
            error!("failed to install SIGINT handler: {}", err);
            return ExitCode::FAILURE;
        }
    }

    let mut discovery = SimulatorDiscovery::from_env();
    let dac = match connect_first_dac(&mut discovery) {
        Ok(Some(dac)) => dac,
        Ok(None) => {
            info!("no DACs found, nothing to do");
            return ExitCode::SUCCESS;
        }
        Err(err) => {
            error!("failed to connect to DAC: {}", err);
            return ExitCode::FAILURE;
        }
    };

    let server = match OscServer::bind(args.port, dac) {
        Ok(server) => server,
        Err(err) => {
            error!("failed to bind port {}: {}", args.port, err);
            return ExitCode::FAILURE;
        }
    };

    match server.run(&cancel) {
        Ok(RunExit::Stopped) => {
            info!("bye!");
            ExitCode::SUCCESS
        }
        Ok(RunExit::Disconnected) => {
            error!("DAC disconnected");
            ExitCode::FAILURE
        }
        Err(err) => {
            error!("server error: {}", err);
            ExitCode::FAILURE
        }
    }
}
