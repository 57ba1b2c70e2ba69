//! Check command implementation.
//!
//! Validates the jstat executable and the target process.

use crate::config::Config;
use crate::startup_checks;

/// Checks runtime requirements and prints a summary.
pub fn command_check(config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    println!("🔍 Checking Runtime Requirements");
    println!("================================\n");
    println!("   jstat:   {}", config.jstat_path().display());
    println!("   target:  {}", config.target_pid());
    println!("   timeout: {} ms", config.sampler_timeout().as_millis());
    println!();

    match startup_checks::validate_requirements(&config.jstat_path(), config.target_pid()) {
        Ok(()) => {
            println!("✅ All requirements met");
            Ok(())
        }
        Err(e) => {
            eprintln!("❌ Requirements check failed: {}", e);
            std::process::exit(1);
        }
    }
}
