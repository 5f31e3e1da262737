// src/main.rs

use exectester::{cli, logging, resolve_parameters, run};

#[tokio::main]
async fn main() {
    match run_main().await {
        Ok(code) => std::process::exit(code),
        Err(err) => {
            eprintln!("et error: {err:#}");
            std::process::exit(1);
        }
    }
}

async fn run_main() -> anyhow::Result<i32> {
    let args = cli::parse();
    let params = resolve_parameters(&args)?;
    logging::init_logging(args.log_level, params.output_format)?;
    Ok(run(params).await?)
}
