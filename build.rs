fn main() {
    // Forward the ESP-IDF build environment to dependents when the device
    // feature is enabled. Host builds emit nothing.
    if std::env::var("CARGO_FEATURE_ESPIDF").is_ok() {
        embuild::espidf::sysenv::output();
    }
}
