use std::fs;
use std::path::{Path, PathBuf};

use serde_json::{json, Value};

use crate::error::{CatalogError, StoreError};
use crate::model::config::CoreConfig;
use crate::services::resolver::Resolver;
use crate::services::store::{self, CatalogStore};
use crate::services::{encoding, qa};

mod command;
pub use command::Command;

fn get_cmd(req: &Value) -> &str {
    req.get("cmd").and_then(|v| v.as_str()).unwrap_or("")
}

fn get_id(req: &Value) -> Value {
    req.get("id").cloned().unwrap_or(Value::Null)
}

fn get_payload(req: &Value) -> &Value {
    static EMPTY: Value = Value::Null;
    req.get("payload").unwrap_or(&EMPTY)
}

fn ok(id: Value, payload: Value) -> String {
    json!({
        "id": id,
        "status": "ok",
        "payload": payload
    })
    .to_string()
}

fn err(id: Value, code: &str, message: impl Into<String>) -> String {
    json!({
        "id": id,
        "status": "error",
        "code": code,
        "message": message.into()
    })
    .to_string()
}

/// A request that could not be served, carried back as an error response.
#[derive(Debug)]
struct Failure {
    code: &'static str,
    message: String,
}

impl Failure {
    fn bad_request(message: impl Into<String>) -> Self {
        Failure {
            code: "bad_request",
            message: message.into(),
        }
    }
}

impl From<CatalogError> for Failure {
    fn from(e: CatalogError) -> Self {
        Failure {
            code: e.code(),
            message: e.to_string(),
        }
    }
}

impl From<StoreError> for Failure {
    fn from(e: StoreError) -> Self {
        Failure {
            code: e.code(),
            message: e.to_string(),
        }
    }
}

fn opt_str<'a>(payload: &'a Value, field: &str) -> Option<&'a str> {
    payload
        .get(field)
        .and_then(|v| v.as_str())
        .filter(|s| !s.is_empty())
}

fn required<'a>(payload: &'a Value, field: &str) -> Result<&'a str, Failure> {
    opt_str(payload, field).ok_or_else(|| Failure::bad_request(format!("payload.{field} is required")))
}

/// Host-facing state: one store and resolver per process, handed to every request.
#[derive(Debug)]
pub struct Core {
    store: CatalogStore,
    resolver: Resolver,
    config: CoreConfig,
}

impl Core {
    pub fn new(config: CoreConfig) -> Self {
        Core {
            store: CatalogStore::new(),
            resolver: Resolver::new(config.treat_empty_as_missing),
            config,
        }
    }

    pub fn store(&self) -> &CatalogStore {
        &self.store
    }

    /// Loads the configured `preload` languages from `catalog_dir`.
    /// Failures are logged; the host can still load languages later.
    pub fn preload(&self) {
        let dir = PathBuf::from(&self.config.catalog_dir);

        for language in &self.config.preload {
            let Some(path) = find_catalog_file(&dir, language) else {
                tracing::warn!(language = %language, dir = %dir.display(), "no catalog file to preload");
                continue;
            };
            if let Err(e) = self.store.load_file(language, &path) {
                tracing::error!(language = %language, path = %path.display(), error = %e, "preload failed");
            }
        }
    }

    pub fn handle(&self, input: &str) -> String {
        let req: Value = match serde_json::from_str(input) {
            Ok(v) => v,
            Err(_) => {
                return json!({
                    "status": "error",
                    "code": "bad_request",
                    "message": "invalid json"
                })
                .to_string();
            }
        };

        let id = get_id(&req);
        let cmd_str = get_cmd(&req);
        let payload = get_payload(&req);

        match self.dispatch(Command::from(cmd_str), payload) {
            Ok(v) => ok(id, v),
            Err(f) => {
                tracing::debug!(cmd = cmd_str, code = f.code, "request failed: {}", f.message);
                err(id, f.code, f.message)
            }
        }
    }

    fn dispatch(&self, cmd: Command, payload: &Value) -> Result<Value, Failure> {
        match cmd {
            Command::Ping => Ok(json!({ "message": "linguist-core alive" })),

            Command::CatalogLoad => {
                let language_id = required(payload, "language_id")?;

                let outcome = match (opt_str(payload, "document"), opt_str(payload, "path")) {
                    (Some(document), _) => self.store.load(language_id, document)?,
                    (None, Some(path)) => self.store.load_file(language_id, Path::new(path))?,
                    (None, None) => {
                        return Err(Failure::bad_request(
                            "payload.document or payload.path is required",
                        ))
                    }
                };

                Ok(json!(outcome))
            }

            Command::CatalogLoadDir => {
                let dir = opt_str(payload, "path").unwrap_or(&self.config.catalog_dir);
                let results = self.store.load_dir(Path::new(dir))?;

                let items: Vec<Value> = results
                    .into_iter()
                    .map(|(path, r)| match r {
                        Ok(outcome) => json!({
                            "path": path.to_string_lossy(),
                            "status": "ok",
                            "outcome": outcome
                        }),
                        Err(e) => json!({
                            "path": path.to_string_lossy(),
                            "status": "error",
                            "code": e.code(),
                            "message": e.to_string()
                        }),
                    })
                    .collect();

                Ok(json!({ "results": items }))
            }

            Command::CatalogResolve => {
                let language_id = required(payload, "language_id")?;
                let context = payload.get("context").and_then(|v| v.as_str()).unwrap_or("");
                let source_text = payload
                    .get("source_text")
                    .and_then(|v| v.as_str())
                    .ok_or_else(|| Failure::bad_request("payload.source_text is required"))?;
                let disambiguation = opt_str(payload, "disambiguation");

                let text = match payload.get("count").and_then(|v| v.as_u64()) {
                    Some(n) => self.store.resolve_plural(
                        &self.resolver,
                        language_id,
                        context,
                        source_text,
                        disambiguation,
                        n,
                    )?,
                    None => self.store.resolve(
                        &self.resolver,
                        language_id,
                        context,
                        source_text,
                        disambiguation,
                    )?,
                };

                Ok(json!({ "text": text }))
            }

            Command::CatalogUnload => {
                let language_id = required(payload, "language_id")?;
                Ok(json!({ "unloaded": self.store.unload(language_id) }))
            }

            Command::CatalogList => Ok(json!({
                "languages": self.store.list_loaded_languages(),
                "default_language": self.config.default_language
            })),

            Command::CatalogStats => {
                let catalog = self.store.snapshot(required(payload, "language_id")?)?;
                Ok(json!(catalog.stats()))
            }

            Command::CatalogQa => {
                let language_id = required(payload, "language_id")?;
                let catalog = self.store.snapshot(language_id)?;
                Ok(json!({ "issues": qa::run(&catalog, language_id) }))
            }

            Command::DetectEncoding => {
                let path = required(payload, "path")?;
                let result = encoding::detect_from_file(Path::new(path))?;
                Ok(json!(result))
            }

            Command::Unknown => Err(Failure {
                code: "unknown_command",
                message: "unknown command".to_string(),
            }),
        }
    }
}

fn find_catalog_file(dir: &Path, language: &str) -> Option<PathBuf> {
    let mut candidates: Vec<PathBuf> = fs::read_dir(dir)
        .ok()?
        .flatten()
        .map(|e| e.path())
        .filter(|p| p.extension().and_then(|e| e.to_str()) == Some("ts"))
        .filter(|p| store::language_from_file_name(p).as_deref() == Some(language))
        .collect();
    candidates.sort();
    candidates.into_iter().next()
}
