//! Just `main()`. Keep as small as possible.

pub mod cli_args;
pub mod config;
pub mod controls;
pub mod raw_input;
pub mod run;
pub mod screen;
pub mod surface;

use color_eyre::eyre::Result;

#[expect(
    clippy::print_stdout,
    clippy::print_stderr,
    reason = "It's our central place for communicating with the user on CLI"
)]
#[tokio::main(flavor = "multi_thread")]
async fn main() -> Result<()> {
    color_eyre::install()?;
    let result = run::run().await;
    tracing::debug!("Particle field is exiting");

    match result {
        Ok(summary) => {
            if let Some(log_path) = summary.log_path {
                println!("Logs saved to {}", log_path.display());
            }
        }
        Err(error) => {
            tracing::error!("{error:?}");
            eprintln!("Error: {error:?}");
            #[expect(clippy::exit, reason = "The user's terminal has already been restored")]
            std::process::exit(1);
        }
    }

    Ok(())
}
