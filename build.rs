fn main() {
    // Only the ESP-IDF target needs the embuild environment; host builds of
    // the library (unit and integration tests) skip it.
    if std::env::var("CARGO_CFG_TARGET_OS").as_deref() == Ok("espidf") {
        embuild::espidf::sysenv::output();
    }
}
