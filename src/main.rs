fn main() {
  if let Err(e) = nontonanime_lib::run() {
    log::error!("NontonAnime stopped: {:#}", e);
    eprintln!("NontonAnime stopped: {:#}", e);
    std::process::exit(1);
  }
}
