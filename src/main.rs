fn main() {
    if let Err(err) = wigmore_renderer::run() {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}
