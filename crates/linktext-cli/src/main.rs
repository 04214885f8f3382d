use std::env;
use std::fs;
use std::io::{self, Read};
use std::process;

use linktext_core::{
    DESCRIPTIVE_LINK_TEXT, Diagnostic, LintConfig, RuleConfig, SyntaxTree, check_document,
};
use tracing::debug;
use tracing_subscriber::EnvFilter;

fn main() {
    init_tracing();

    let mut inputs: Vec<String> = Vec::new();
    let mut config_path: Option<String> = None;
    let mut format = OutputFormat::Pretty;

    let mut args = env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "-h" | "--help" => {
                print_usage();
                return;
            }
            "--config" => match args.next() {
                Some(path) => config_path = Some(path),
                None => {
                    eprintln!("--config expects a file path");
                    print_usage();
                    process::exit(2);
                }
            },
            "--format" => {
                format = match args.next().as_deref() {
                    Some("json") => OutputFormat::Json,
                    Some("pretty") => OutputFormat::Pretty,
                    _ => {
                        eprintln!("--format expects: json | pretty");
                        print_usage();
                        process::exit(2);
                    }
                };
            }
            _ if arg.starts_with("--") => {
                eprintln!("unexpected argument: {}", arg);
                print_usage();
                process::exit(2);
            }
            _ => inputs.push(arg),
        }
    }

    let config = match load_config(config_path.as_deref()) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("invalid configuration: {}", err);
            process::exit(2);
        }
    };

    let documents = if inputs.is_empty() {
        let mut buffer = String::new();
        io::stdin()
            .read_to_string(&mut buffer)
            .unwrap_or_else(|err| {
                eprintln!("failed to read stdin: {}", err);
                process::exit(1);
            });
        vec![("stdin".to_string(), buffer)]
    } else {
        inputs
            .into_iter()
            .map(|path| {
                let contents = fs::read_to_string(&path).unwrap_or_else(|err| {
                    eprintln!("failed to read {}: {}", path, err);
                    process::exit(1);
                });
                (path, contents)
            })
            .collect()
    };

    let mut reports: Vec<(String, Diagnostic)> = Vec::new();
    for (path, contents) in &documents {
        let tree = SyntaxTree::from_json(contents).unwrap_or_else(|err| {
            eprintln!("failed to load syntax tree {}: {}", path, err);
            process::exit(1);
        });
        let findings = check_document(&tree, &config);
        debug!(path = path.as_str(), findings = findings.len(), "checked document");
        reports.extend(findings.iter().map(|finding| {
            (
                path.clone(),
                Diagnostic::from_finding(&DESCRIPTIVE_LINK_TEXT, finding),
            )
        }));
    }

    match format {
        OutputFormat::Pretty => {
            for (path, diagnostic) in &reports {
                println!("{}", diagnostic.to_pretty(path));
            }
        }
        OutputFormat::Json => match reports_to_json(&reports) {
            Ok(json) => println!("{}", json),
            Err(err) => {
                eprintln!("failed to serialize diagnostics: {}", err);
                process::exit(1);
            }
        },
    }

    if !reports.is_empty() {
        process::exit(1);
    }
}

fn print_usage() {
    eprintln!("Usage: linktext [--config FILE] [--format pretty|json] [TREE.json ...]");
}

#[derive(Clone, Copy)]
enum OutputFormat {
    Json,
    Pretty,
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env("LINKTEXT_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn load_config(path: Option<&str>) -> Result<RuleConfig, Box<dyn std::error::Error>> {
    let Some(path) = path else {
        return Ok(RuleConfig::default());
    };
    let contents = fs::read_to_string(path).map_err(|err| format!("{}: {}", path, err))?;
    Ok(LintConfig::from_json(&contents)?.rule_config()?)
}

fn reports_to_json(reports: &[(String, Diagnostic)]) -> Result<String, serde_json::Error> {
    let entries = reports
        .iter()
        .map(|(path, diagnostic)| {
            let mut value = serde_json::to_value(diagnostic)?;
            if let Some(object) = value.as_object_mut() {
                object.insert("fileName".to_string(), path.clone().into());
            }
            Ok(value)
        })
        .collect::<Result<Vec<serde_json::Value>, serde_json::Error>>()?;
    serde_json::to_string_pretty(&entries)
}

#[cfg(test)]
mod tests {
    use linktext_core::{ColumnRange, DESCRIPTIVE_LINK_TEXT, Diagnostic, Finding};

    use super::reports_to_json;

    #[test]
    fn json_reports_carry_file_names() -> Result<(), serde_json::Error> {
        let finding = Finding {
            line: 2,
            text: "[here]".to_string(),
            range: ColumnRange {
                column: 3,
                length: 6,
            },
        };
        let reports = vec![(
            "docs/index.json".to_string(),
            Diagnostic::from_finding(&DESCRIPTIVE_LINK_TEXT, &finding),
        )];

        let value: serde_json::Value = serde_json::from_str(&reports_to_json(&reports)?)?;
        assert_eq!(value[0]["fileName"], "docs/index.json");
        assert_eq!(value[0]["lineNumber"], 2);
        assert_eq!(value[0]["errorRange"], serde_json::json!([3, 6]));

        assert_eq!(reports_to_json(&[])?, "[]");
        Ok(())
    }
}
