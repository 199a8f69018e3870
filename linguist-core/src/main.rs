use std::io::{self, BufRead, Write};
use std::panic::AssertUnwindSafe;

use linguist_core::model::config::CoreConfig;
use linguist_core::protocol::Core;
use linguist_core::{logging, services};

fn main() {
    logging::init();

    let config = match services::config::load() {
        Ok(c) => c,
        Err(e) => {
            tracing::error!(error = %e, "falling back to default config");
            CoreConfig::default()
        }
    };

    let core = Core::new(config);
    core.preload();
    tracing::info!(
        languages = ?core.store().list_loaded_languages(),
        "linguist-core ready"
    );

    let stdin = io::stdin();
    let mut stdout = io::stdout();

    for line in stdin.lock().lines() {
        let line = match line {
            Ok(l) => l,
            Err(_) => continue,
        };

        if line.trim().is_empty() {
            continue;
        }

        let result = std::panic::catch_unwind(AssertUnwindSafe(|| core.handle(&line)));

        let response = match result {
            Ok(resp) => resp,
            Err(_) => {
                tracing::error!("panic while handling request");
                serde_json::json!({
                    "status": "error",
                    "code": "internal",
                    "message": "internal core error"
                })
                .to_string()
            }
        };

        if writeln!(stdout, "{response}").is_err() {
            break;
        }

        let _ = stdout.flush();
    }
}
