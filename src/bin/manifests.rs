//! manifests - inspect and edit multi-document Kubernetes manifests.

use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use workload_manifests::value::{to_yaml, Map};
use workload_manifests::{locate_and_mutate, split, DocumentSet, WorkloadKind};

const LOG_ENV: &str = "MANIFESTS_LOG";

type CliResult<T> = Result<T, Box<dyn std::error::Error>>;

#[derive(Debug, Parser)]
#[command(name = "manifests", version, about)]
struct Cli {
    /// Output location. Use '-' for stdout.
    #[arg(short, long, global = true, default_value = "-")]
    output: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// List the type identity of every document in FILE ('-' reads stdin).
    List { file: PathBuf },

    /// Set a label on the pod template of every workload in FILE.
    Label {
        file: PathBuf,

        #[arg(short, long)]
        key: String,

        #[arg(short, long)]
        value: String,
    },
}

fn main() -> ExitCode {
    init_logging();
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

fn init_logging() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn run(cli: Cli) -> CliResult<()> {
    let mut output: Box<dyn Write> = if cli.output.as_os_str() == "-" {
        Box::new(io::stdout())
    } else {
        Box::new(
            fs::File::create(&cli.output)
                .map_err(|e| format!("Failed to create output file {:?}: {}", cli.output, e))?,
        )
    };

    match cli.command {
        Command::List { file } => list(&file, &mut output),
        Command::Label { file, key, value } => label(&file, &key, &value, &mut output),
    }
}

fn read_input(file: &Path) -> CliResult<Vec<u8>> {
    if file.as_os_str() == "-" {
        let mut buf = Vec::new();
        io::stdin().read_to_end(&mut buf)?;
        return Ok(buf);
    }
    fs::read(file).map_err(|e| format!("Failed to read file {:?}: {}", file, e).into())
}

/// Splits the input and reports every rejected document on stderr.
fn read_documents(file: &Path) -> CliResult<DocumentSet> {
    let input = read_input(file)?;
    split(&input).into_result().map_err(|errors| {
        eprintln!("Invalid documents:");
        for err in &errors {
            eprintln!("  - {}", err);
        }
        format!("{} document(s) rejected", errors.len()).into()
    })
}

fn list(file: &Path, output: &mut dyn Write) -> CliResult<()> {
    let documents = read_documents(file)?;
    for (identity, _) in documents.in_stream_order() {
        writeln!(output, "{}", identity)?;
    }
    Ok(())
}

fn label(file: &Path, key: &str, value: &str, output: &mut dyn Write) -> CliResult<()> {
    let documents = read_documents(file)?;
    write_labelled(&documents, key, value, output)
}

/// Writes `documents` as a YAML stream, with `key: value` added to the pod
/// template labels of every workload. Other documents are copied verbatim.
fn write_labelled(
    documents: &DocumentSet,
    key: &str,
    value: &str,
    output: &mut dyn Write,
) -> CliResult<()> {
    for (i, (identity, document)) in documents.in_stream_order().into_iter().enumerate() {
        if i > 0 {
            writeln!(output, "---")?;
        }

        let Some(kind) = WorkloadKind::from_kind(&identity.kind) else {
            let bytes = document.as_bytes();
            output.write_all(bytes)?;
            if !bytes.ends_with(b"\n") {
                writeln!(output)?;
            }
            continue;
        };

        let mut tree = document
            .decode()
            .map_err(|e| format!("Failed to decode {}: {}", identity, e))?;
        let set_label = |template: &mut Map| -> CliResult<()> {
            let labels = template
                .entry_map("metadata")
                .and_then(|metadata| metadata.entry_map("labels"))
                .ok_or_else(|| format!("{}: metadata.labels is not a map", identity))?;
            labels.set(key, value);
            Ok(())
        };

        if kind == WorkloadKind::Pod {
            let root = tree
                .as_map_mut()
                .ok_or_else(|| format!("{}: document is not a map", identity))?;
            set_label(root)?;
        } else {
            locate_and_mutate(&mut tree, kind, set_label)?;
        }

        write!(output, "{}", to_yaml(&tree)?)?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use workload_manifests::value::Value;
    use workload_manifests::TypeIdentity;

    const SERVICE: &str = "apiVersion: v1
kind: Service
metadata:
  name: web   # kept as written
spec:
  ports: [{port: 80}]
";

    const DEPLOYMENT: &str = "apiVersion: apps/v1
kind: Deployment
metadata:
  name: web
spec:
  template:
    metadata:
      labels:
        app: web
    spec:
      containers: []
";

    const POD: &str = "apiVersion: v1
kind: Pod
metadata:
  name: debug
spec: {}
";

    fn labelled(input: &str) -> String {
        let documents = split(input.as_bytes()).into_result().unwrap();
        let mut output = Vec::new();
        write_labelled(&documents, "team", "core", &mut output).unwrap();
        String::from_utf8(output).unwrap()
    }

    fn label_at<'a>(document: &'a Value, keys: &[&str]) -> Option<&'a Value> {
        let mut current = document;
        for key in keys {
            current = current.as_map()?.get(key)?;
        }
        current.as_map()?.get("metadata")?.as_map()?.get("labels")?.as_map()?.get("team")
    }

    #[test]
    fn test_label_workload_template() {
        let output = labelled(DEPLOYMENT);
        let documents = split(output.as_bytes()).into_result().unwrap();
        let tree = documents
            .get(&TypeIdentity::new("apps", "v1", "Deployment"))
            .unwrap()
            .decode()
            .unwrap();

        assert_eq!(label_at(&tree, &["spec", "template"]), Some(&Value::from("core")));
        assert_eq!(label_at(&tree, &[]), None);
    }

    #[test]
    fn test_label_pod_at_root() {
        let output = labelled(POD);
        let documents = split(output.as_bytes()).into_result().unwrap();
        let tree = documents.get_by_kind("Pod").unwrap().1.decode().unwrap();
        assert_eq!(label_at(&tree, &[]), Some(&Value::from("core")));
    }

    #[test]
    fn test_other_documents_copied_verbatim() {
        let input = format!("{SERVICE}---\n{DEPLOYMENT}---\n{POD}");
        let output = labelled(&input);

        assert!(output.starts_with(&format!("{SERVICE}---\n")));
        let documents = split(output.as_bytes()).into_result().unwrap();
        assert_eq!(documents.len(), 3);
        assert_eq!(documents.get_by_kind("Service").unwrap().1.as_str().unwrap(), SERVICE);
    }

    #[test]
    fn test_unterminated_document_gets_newline() {
        let input = format!("{POD}---\napiVersion: v1\nkind: ConfigMap");
        let output = labelled(&input);
        assert!(output.ends_with("kind: ConfigMap\n"));
        assert_eq!(split(output.as_bytes()).documents.len(), 2);
    }
}
