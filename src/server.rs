//! The line protocol: one space-delimited command per line, one reply
//! line per command. Command keywords are case-insensitive.

use crate::block_dev::BlockDevice;
use crate::manager::FsManager;

/// Outcome of one protocol line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    Line(String),
    /// Final line before the connection closes.
    Quit(String),
}

impl Reply {
    pub fn text(&self) -> &str {
        match self {
            Reply::Line(s) | Reply::Quit(s) => s,
        }
    }
}

/// Executes one command line against the manager and renders the reply.
pub fn handle_line<D: BlockDevice>(fs: &FsManager<D>, line: &str) -> Reply {
    let mut parts = line.split_whitespace();
    let command = parts.next().unwrap_or("").to_ascii_uppercase();

    match command.as_str() {
        "CREATE" => match parts.next() {
            None => Reply::Line("ERROR: Filename required for CREATE command.".into()),
            Some(name) => match fs.create_file(name) {
                Ok(()) => Reply::Line(format!("SUCCESS: File '{name}' created.")),
                Err(err) => Reply::Line(format!("ERROR: {err}")),
            },
        },
        "LIST" => {
            let files = fs.list_files();
            if files.is_empty() {
                Reply::Line("No files found.".into())
            } else {
                Reply::Line(format!("FILES: {}", files.join(" ")))
            }
        }
        "WRITE" => match parts.next() {
            None => Reply::Line("ERROR: Filename missing.".into()),
            Some(name) => {
                // Remaining tokens rejoined with single spaces.
                let content = parts.collect::<Vec<_>>().join(" ");
                match fs.write_file(name, content.as_bytes()) {
                    Ok(()) => Reply::Line(format!("SUCCESS: File '{name}' written.")),
                    Err(err) => Reply::Line(format!("ERROR: {err}")),
                }
            }
        },
        "READ" => match parts.next() {
            None => Reply::Line("ERROR: Filename missing.".into()),
            Some(name) => match fs.read_file(name) {
                Ok(data) => Reply::Line(format!("CONTENTS: {}", String::from_utf8_lossy(&data))),
                Err(err) => Reply::Line(format!("ERROR: {err}")),
            },
        },
        "DELETE" => match parts.next() {
            None => Reply::Line("ERROR: Filename missing.".into()),
            Some(name) => match fs.delete_file(name) {
                Ok(()) => Reply::Line(format!("SUCCESS: File '{name}' deleted.")),
                Err(err) => Reply::Line(format!("ERROR: {err}")),
            },
        },
        "QUIT" => Reply::Quit("SUCCESS: Disconnecting.".into()),
        _ => Reply::Line("ERROR: Unknown command.".into()),
    }
}
