mod app;

fn main() {
    tracing_subscriber::fmt::init();
    if let Err(err) = app::run() {
        eprintln!("Error: {err:#}");
        std::process::exit(1);
    }
}
