//! protoc plugin: `protoc --plugin=protoc-gen-twirp_ts --twirp_ts_out=DIR ...`.

fn main() {
    protots::init_tracing();

    if let Err(e) = protots::commands::plugin::run_stdio() {
        eprintln!("protoc-gen-twirp_ts: {e:#}");
        std::process::exit(1);
    }
}
