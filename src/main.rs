fn main() {
    if let Err(err) = knowledge_map_renderer::run() {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}
