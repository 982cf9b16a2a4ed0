//! libecc driver
//!
//! Runs the fixed key facade demonstration: generate a key pair, print its
//! PEM encodings, decode them into new handles and hex-dump the marshaled
//! public key.

mod demo;

use anyhow::Result;
use ecc_config::AppConfig;
use ecc_keys::{FacadeOptions, KeyFacade};
use ecc_logging::init_logging;
use std::io;
use tracing::info;

fn main() -> Result<()> {
    // Load configuration
    let config = AppConfig::from_env()
        .map_err(|e| anyhow::anyhow!("Failed to load configuration: {}", e))?;

    // Initialize logging
    let _service = init_logging("ecc-driver", config.log_format, config.log_level())
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;

    info!(
        key_bits = config.key_bits,
        pbkdf2_iterations = config.pbkdf2_iterations,
        "Configuration loaded"
    );

    let facade = KeyFacade::new(FacadeOptions {
        pbkdf2_iterations: config.pbkdf2_iterations,
    });

    let stdout = io::stdout();
    let mut out = stdout.lock();
    demo::run(&facade, config.key_bits, &config.demo_passphrase, &mut out)?;

    info!("Driver finished");
    Ok(())
}
