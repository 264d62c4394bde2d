fn main() {
    if let Err(err) = eda_insight::run() {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}
