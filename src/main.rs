fn main() {
    if let Err(err) = sketch_renderer::run() {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}
