// Values baked into the firmware at compile time, read with `option_env!`.
const FORWARDED: [&str; 4] = ["WIFI_SSID", "WIFI_PASSWORD", "BLINK_PERIOD_MS", "OTA_URL"];

fn main() {
    // A missing .env is fine as long as the variables come from the environment.
    if let Err(e) = dotenvy::dotenv() {
        println!("cargo:warning=.env not loaded ({e}), using the process environment");
    }
    println!("cargo:rerun-if-changed=.env");

    for key in FORWARDED {
        println!("cargo:rerun-if-env-changed={key}");
        if let Ok(value) = std::env::var(key) {
            println!("cargo:rustc-env={key}={value}");
        }
    }

    embuild::espidf::sysenv::output();
}
