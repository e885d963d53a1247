fn main() {
    // embuild emits the esp-idf link arguments; only relevant when
    // cross-compiling for the device.
    if std::env::var_os("CARGO_FEATURE_ESPIDF").is_some() {
        espidf_sysenv();
    }
}

#[cfg(feature = "espidf")]
fn espidf_sysenv() {
    embuild::espidf::sysenv::output();
}

#[cfg(not(feature = "espidf"))]
fn espidf_sysenv() {}
