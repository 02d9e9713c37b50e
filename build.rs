fn main() {
    // ESP-IDF link arguments are only needed for the firmware binary; host
    // test builds leave the `espidf` feature off.
    #[cfg(feature = "espidf")]
    embuild::espidf::sysenv::output();
}
