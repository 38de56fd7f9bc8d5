fn main() {
    if let Err(err) = chart_table::run() {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}
