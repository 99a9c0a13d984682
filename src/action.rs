//! Communication with the GitHub Actions runner that started the upload.
//!
//! Inputs are read from `INPUT_*` environment variables. Outputs are appended to the
//! file named by `GITHUB_OUTPUT`, or printed as `::set-output` workflow commands when
//! the runner is too old to provide that file. Failures are printed as an `::error`
//! workflow command.

use std::collections::HashMap;
use std::env;
use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::PathBuf;

use rand::distributions::Alphanumeric;
use rand::Rng;
use serde_json::Value;

use crate::files::upload::UploadedFile;
use crate::B2Error;

const OUTPUT_FILE_VAR: &str = "GITHUB_OUTPUT";

/// A snapshot of the environment provided by the runner.
#[derive(Clone, Debug)]
pub struct Runner {
    vars: HashMap<String, String>,
}

impl Runner {
    /// Take a snapshot of the environment of this process.
    pub fn from_env() -> Runner {
        Runner::from_vars(env::vars())
    }
    /// Create a runner from an explicit set of environment variables.
    pub fn from_vars<I>(vars: I) -> Runner
    where
        I: IntoIterator<Item = (String, String)>,
    {
        Runner {
            vars: vars.into_iter().collect(),
        }
    }
    /// Read an input. Missing inputs are read as the empty string, and surrounding
    /// whitespace is removed.
    pub fn input(&self, name: &str) -> String {
        self.vars
            .get(&input_var(name))
            .map(|value| value.trim().to_string())
            .unwrap_or_default()
    }
    fn output_file(&self) -> Option<PathBuf> {
        self.vars
            .get(OUTPUT_FILE_VAR)
            .filter(|path| !path.is_empty())
            .map(PathBuf::from)
    }
    /// Publish one output per field of the uploaded file.
    ///
    /// All outputs are written with a single write, so either every output is
    /// published or the call fails.
    pub fn publish(&self, file: &UploadedFile) -> Result<(), B2Error> {
        match self.output_file() {
            Some(path) => {
                let delimiter = random_delimiter();
                let mut buf = String::new();
                for (name, value) in file.outputs().iter() {
                    buf.push_str(&file_command(name, &command_value(*value), &delimiter)?);
                }
                let mut out = OpenOptions::new().append(true).open(&path)?;
                out.write_all(buf.as_bytes())?;
            }
            None => {
                let stdout = io::stdout();
                let mut out = stdout.lock();
                out.write_all(set_output_commands(file).as_bytes())?;
                out.flush()?;
            }
        }
        Ok(())
    }
    /// Report the failure of the step to the runner.
    pub fn set_failed(&self, message: &str) {
        println!("::error::{}", escape_data(message));
    }
}

/// The name of the environment variable holding an input.
pub fn input_var(name: &str) -> String {
    format!("INPUT_{}", name.replace(' ', "_").to_uppercase())
}

/// Render a json value the way the runner expects output values.
///
/// Missing values and `null` become the empty string, strings are used as is, and
/// anything else is written as compact json.
pub fn command_value(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

/// Escape the data part of a workflow command.
pub fn escape_data(s: &str) -> String {
    s.replace('%', "%25").replace('\r', "%0D").replace('\n', "%0A")
}

fn escape_property(s: &str) -> String {
    escape_data(s).replace(':', "%3A").replace(',', "%2C")
}

fn set_output_commands(file: &UploadedFile) -> String {
    let mut buf = String::new();
    for (name, value) in file.outputs().iter() {
        buf.push_str(&format!(
            "::set-output name={}::{}\n",
            escape_property(name),
            escape_data(&command_value(*value))
        ));
    }
    buf
}

fn file_command(name: &str, value: &str, delimiter: &str) -> Result<String, B2Error> {
    if name.contains(delimiter) || value.contains(delimiter) {
        let msg = format!("output {} contains the delimiter {}", name, delimiter);
        return Err(io::Error::new(io::ErrorKind::InvalidData, msg).into());
    }
    Ok(format!("{}<<{}\n{}\n{}\n", name, delimiter, value, delimiter))
}

fn random_delimiter() -> String {
    let suffix: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(32)
        .map(char::from)
        .collect();
    format!("ghadelimiter_{}", suffix)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn uploaded() -> UploadedFile {
        serde_json::from_value(json!({
            "bucketId": "b1",
            "contentLength": 3,
            "contentSha1": "a9993e364706816aba3e25717850c26c9cd0d89d",
            "contentType": "text/plain",
            "fileId": "4_z1",
            "fileInfo": {},
            "fileName": "dir/a b.txt",
            "legalHold": null
        }))
        .unwrap()
    }

    #[test]
    fn input_names() {
        assert_eq!(input_var("keyId"), "INPUT_KEYID");
        assert_eq!(input_var("upload key"), "INPUT_UPLOAD_KEY");
    }

    #[test]
    fn command_values() {
        assert_eq!(command_value(None), "");
        assert_eq!(command_value(Some(&Value::Null)), "");
        assert_eq!(command_value(Some(&json!("text/plain"))), "text/plain");
        assert_eq!(command_value(Some(&json!(1024))), "1024");
        assert_eq!(command_value(Some(&json!(true))), "true");
        assert_eq!(
            command_value(Some(&json!({"mode": null, "value": null}))),
            r#"{"mode":null,"value":null}"#
        );
    }

    #[test]
    fn escaping() {
        assert_eq!(escape_data("50% done\r\nnext"), "50%25 done%0D%0Anext");
        assert_eq!(escape_property("a:b,c"), "a%3Ab%2Cc");
    }

    #[test]
    fn legacy_commands() {
        let commands = set_output_commands(&uploaded());
        let lines: Vec<&str> = commands.lines().collect();
        assert_eq!(lines.len(), 11);
        assert_eq!(lines[0], "::set-output name=bucketId::b1");
        assert_eq!(lines[1], "::set-output name=contentLength::3");
        assert_eq!(lines[3], "::set-output name=contentMd5::");
        assert_eq!(lines[6], "::set-output name=fileInfo::{}");
        assert_eq!(lines[7], "::set-output name=fileName::dir/a b.txt");
        assert_eq!(lines[9], "::set-output name=legalHold::");
    }

    #[test]
    fn file_commands_use_heredoc() {
        assert_eq!(
            file_command("fileId", "4_z1", "ghadelimiter_x").unwrap(),
            "fileId<<ghadelimiter_x\n4_z1\nghadelimiter_x\n"
        );
        assert!(file_command("fileId", "a ghadelimiter_x b", "ghadelimiter_x").is_err());
    }

    #[test]
    fn publish_appends_to_output_file() {
        let mut out = tempfile::NamedTempFile::new().unwrap();
        out.write_all(b"earlier<<EOF\nvalue\nEOF\n").unwrap();
        let path = out.path().to_string_lossy().into_owned();
        let runner = Runner::from_vars(vec![(OUTPUT_FILE_VAR.to_string(), path.clone())]);

        runner.publish(&uploaded()).unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.starts_with("earlier<<EOF\nvalue\nEOF\n"));
        let lines: Vec<&str> = written.lines().skip(3).collect();
        assert_eq!(lines.len(), 33);
        let delimiter = lines[0].trim_start_matches("bucketId<<");
        assert!(delimiter.starts_with("ghadelimiter_"));
        assert_eq!(lines[1], "b1");
        assert_eq!(lines[2], delimiter);
        assert_eq!(lines[3], format!("contentLength<<{}", delimiter));
        assert_eq!(lines[4], "3");
        // contentMd5 is missing from the response
        assert_eq!(lines[10], "");
    }

    #[test]
    fn publish_needs_existing_output_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing");
        let runner = Runner::from_vars(vec![(
            OUTPUT_FILE_VAR.to_string(),
            path.to_string_lossy().into_owned(),
        )]);
        assert!(runner.publish(&uploaded()).is_err());
    }
}
