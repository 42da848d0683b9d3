use colored::Colorize;
use groundgen_backend_texture::{GenerateError, SavedFile};
use groundgen_spec::{BackendError, ValidationError};
use serde_json::{json, Value};

/// Print validation errors to the console.
pub(crate) fn print_validation_errors(errors: &[ValidationError]) {
    if errors.is_empty() {
        return;
    }
    println!("\n{}", "Validation Errors:".red().bold());
    for error in errors {
        let path_info = error
            .path
            .as_ref()
            .map(|p| format!(" at {}", p))
            .unwrap_or_default();
        println!(
            "  {} [{}]{}: {}",
            "x".red(),
            error.code.to_string().red(),
            path_info.dimmed(),
            error.message
        );
    }
}

/// Print the files of one written image set.
pub(crate) fn print_saved_files(name: &str, seed: u32, files: &[SavedFile]) {
    println!(
        "{} {} {}",
        "SUCCESS".green().bold(),
        name,
        format!("(seed {})", seed).dimmed()
    );
    for file in files {
        println!(
            "  {} {} {}",
            "+".green(),
            file.path.display(),
            file.hash[..16].dimmed()
        );
    }
}

pub(crate) fn validation_errors_to_json(errors: &[ValidationError]) -> Value {
    Value::Array(
        errors
            .iter()
            .map(|e| {
                json!({
                    "code": e.code.code(),
                    "message": e.message,
                    "path": e.path,
                })
            })
            .collect(),
    )
}

pub(crate) fn generate_error_to_json(error: &GenerateError) -> Value {
    json!({
        "code": error.code(),
        "category": error.category(),
        "message": error.message(),
    })
}

pub(crate) fn saved_set_to_json(name: &str, seed: u32, files: &[SavedFile]) -> Value {
    json!({
        "name": name,
        "seed": seed,
        "files": files
            .iter()
            .map(|f| json!({ "path": f.path.display().to_string(), "hash": f.hash }))
            .collect::<Vec<_>>(),
    })
}
