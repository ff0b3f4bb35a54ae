//! JSON entry point for embedding services and language bindings.
//!
//! ## Response Envelope
//!
//! - Success: `{"ok": true, "data": ...}`
//! - Error: `{"ok": false, "error": {"code": "...", "message": "...", "details": "..."}}`
//!
//! ## Parameters
//!
//! Request objects are laid over the engine's configured defaults: a key
//! present in the request wins, a missing or `null` key keeps the
//! configured value. A value of the wrong type is an `invalid_settings`
//! error, never a silent fallback.

use churnlens_types::TimeWindow;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use tracing::debug;

use crate::engine::Engine;
use crate::error::{CoreError, ResponseEnvelope};

/// Modes [`run_json`] understands.
pub const MODES: &[&str] = &[
    "version",
    "frequency",
    "file",
    "collision_risk",
    "analyze",
    "diff_stats",
    "cache_stats",
    "invalidate",
];

/// Run one request against `engine` and return the JSON envelope.
///
/// ```no_run
/// use churnlens_core::{Engine, run_json};
///
/// let engine = Engine::open(".").unwrap();
/// let out = run_json(&engine, "frequency", r#"{"time_window": "7d", "top_n": 5}"#);
/// assert!(out.starts_with(r#"{"ok":"#));
/// ```
pub fn run_json(engine: &Engine, mode: &str, args_json: &str) -> String {
    match run_json_inner(engine, mode, args_json) {
        Ok(data) => ResponseEnvelope::success(data).to_json(),
        Err(err) => {
            debug!(mode, code = %err.code, "request failed");
            ResponseEnvelope::error(&err).to_json()
        }
    }
}

fn run_json_inner(engine: &Engine, mode: &str, args_json: &str) -> Result<Value, CoreError> {
    let args: Value = if args_json.trim().is_empty() {
        Value::Null
    } else {
        serde_json::from_str(args_json)?
    };
    if !(args.is_null() || args.is_object()) {
        return Err(CoreError::invalid_json("arguments must be a JSON object"));
    }

    match mode {
        "version" => Ok(json!({ "version": env!("CARGO_PKG_VERSION") })),
        "frequency" => {
            let params = overlay(&engine.frequency_defaults(), &args)?;
            to_value(&engine.change_frequency(&params)?)
        }
        "file" => {
            let path = required_string(&args, "file_path")?;
            let window = match optional_string(&args, "time_window")? {
                Some(w) => TimeWindow::parse(&w),
                None => TimeWindow::parse(&engine.frequency_defaults().time_window),
            };
            to_value(&engine.analyze_file(&path, window)?)
        }
        "collision_risk" => {
            let path = required_string(&args, "file_path")?;
            to_value(&engine.collision_risk(&path)?)
        }
        "analyze" => {
            let params = overlay(&engine.analysis_defaults(), &args)?;
            to_value(&engine.analyze_changes(&params)?)
        }
        "diff_stats" => {
            let params = overlay(&engine.analysis_defaults(), &args)?;
            to_value(&engine.diff_stats(&params)?)
        }
        "cache_stats" => to_value(&engine.cache_stats()),
        "invalidate" => invalidate(engine, &args),
        _ => Err(CoreError::unknown_mode(mode)),
    }
}

/// `{"file_path": ...}` drops one file, `{"pattern": ...}` one report
/// pattern, and an empty request clears the cache.
fn invalidate(engine: &Engine, args: &Value) -> Result<Value, CoreError> {
    if let Some(path) = optional_string(args, "file_path")? {
        engine.invalidate_file(&path);
        return Ok(json!({ "invalidated": "file", "file_path": path }));
    }
    if let Some(pattern) = optional_string(args, "pattern")? {
        engine.invalidate_pattern(&pattern);
        return Ok(json!({ "invalidated": "pattern", "pattern": pattern }));
    }
    engine.clear_cache();
    Ok(json!({ "invalidated": "all" }))
}

/// Lay the non-null keys of `args` over the serialized `defaults`.
pub(crate) fn overlay<T: Serialize + DeserializeOwned>(defaults: &T, args: &Value) -> Result<T, CoreError> {
    let mut merged = serde_json::to_value(defaults).map_err(CoreError::internal)?;
    if let (Value::Object(base), Value::Object(fields)) = (&mut merged, args) {
        for (key, value) in fields.iter().filter(|(_, v)| !v.is_null()) {
            base.insert(key.clone(), value.clone());
        }
    }
    serde_json::from_value(merged).map_err(CoreError::invalid_settings)
}

fn to_value<T: Serialize>(value: &T) -> Result<Value, CoreError> {
    serde_json::to_value(value).map_err(CoreError::internal)
}

/// Missing/null -> `None`, non-string -> error.
fn optional_string(args: &Value, field: &str) -> Result<Option<String>, CoreError> {
    match args.get(field) {
        None | Some(Value::Null) => Ok(None),
        Some(v) => v
            .as_str()
            .map(|s| Some(s.to_string()))
            .ok_or_else(|| CoreError::invalid_field(field, "a string")),
    }
}

fn required_string(args: &Value, field: &str) -> Result<String, CoreError> {
    optional_string(args, field)?
        .filter(|s| !s.is_empty())
        .ok_or_else(|| CoreError::invalid_field(field, "a non-empty string"))
}
