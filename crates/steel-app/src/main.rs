//! Main application entry point (native).

#[cfg(feature = "native")]
fn main() {
    env_logger::init();
    log::info!("Starting Steel");

    let result = steel_app::CliArgs::parse(std::env::args().skip(1))
        .and_then(|args| pollster::block_on(steel_app::run_native(args)));
    if let Err(e) = result {
        eprintln!("{}", e);
        std::process::exit(2);
    }
}

#[cfg(not(feature = "native"))]
fn main() {
    panic!("Native feature not enabled. Use `cargo run --features native`");
}
