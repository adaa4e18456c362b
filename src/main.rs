fn main() {
    if let Err(err) = homenet_topology::run() {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}
