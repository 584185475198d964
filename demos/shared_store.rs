// Sharing one store between threads
//
// Run with: RUST_LOG=info cargo run --example shared_store

use rcini::{ConfigStore, Error};
use std::sync::Arc;
use std::thread;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let store = Arc::new(
        ConfigStore::builder()
            .base_dir("./example_config")
            .file("shared.ini")
            .strict_writes(true)
            .build()?,
    );

    let handles: Vec<_> = (0..8)
        .map(|i| {
            let store = Arc::clone(&store);
            thread::spawn(move || -> Result<(), Error> {
                store.write("Workers", &format!("worker{i}"), "ready")?;
                // Readers never block each other, and always see fresh data
                let seen = store.key_list("Workers").len();
                println!("worker{i} sees {seen} registered worker(s)");
                Ok(())
            })
        })
        .collect();

    for handle in handles {
        handle.join().map_err(|_| "worker thread panicked")??;
    }

    println!("\nFinal: {:?}", store.key_list("Workers"));

    match store.exist_value("Workers", "worker99") {
        Err(e) if e.is_not_found() => println!("worker99 never registered ({e})"),
        other => println!("unexpected: {other:?}"),
    }

    std::fs::remove_dir_all("./example_config")?;
    Ok(())
}
