//! `powercli-offline version`

/// Print the version, plain or as JSON.
pub fn run(json: bool) {
    let version = env!("CARGO_PKG_VERSION");
    if json {
        let native_dialog = cfg!(feature = "native-dialog");
        println!(
            "{}",
            serde_json::json!({ "version": version, "native_dialog": native_dialog })
        );
    } else {
        println!("powercli-offline {version}");
    }
}
