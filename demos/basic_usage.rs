// Basic usage example for rcini
//
// Run with: RUST_LOG=debug cargo run --example basic_usage

use rcini::ConfigStore;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    // Store at ./example_config/config/basic.ini
    let store = ConfigStore::builder()
        .base_dir("./example_config")
        .program_name("basic")
        .build()?;

    println!("Config file: {}", store.current_path()?.display());

    store.write("Server", "host", "localhost")?;
    store.write("Server", "port", "8080")?;
    store.write("Client", "retries", "3")?;

    println!("\n=== Sections ===");
    for section in store.section_list() {
        println!("[{section}]");
        for key in store.key_list(&section) {
            println!("  {key} = {}", store.find(&section, &key));
        }
    }

    // Overwrite in place
    store.write("Server", "port", "9090")?;
    println!("\nServer port is now {}", store.exist_value("Server", "port")?);

    // find() never fails; missing values come back empty
    let timeout = match store.find("Client", "timeout") {
        t if t.is_empty() => "30".to_string(),
        t => t,
    };
    println!("Client timeout (defaulted): {timeout}");

    println!("\n=== JSON export ===");
    println!("{}", store.export_json(true)?);

    // Deleting something already gone is fine
    store.delete_value("Client", "timeout")?;
    store.delete_section("Client")?;
    println!("\nAfter delete: {:?}", store.section_list());

    store.clear()?;
    println!("After clear: {:?}", store.section_list());

    std::fs::remove_dir_all("./example_config")?;
    Ok(())
}
