fn main() {
    if let Err(e) = tibia_announcer_lib::run() {
        eprintln!("tibia-announcer: {:#}", e);
        std::process::exit(1);
    }
}
