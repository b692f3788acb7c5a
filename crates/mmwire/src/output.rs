use std::io::{IsTerminal, Write};

use clap::ValueEnum;
use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use mmwire_api::{Command, CommandKind, Request, RunSummary};
use mmwire_frame::Frame;
use mmwire_notify::Severity;
use serde::Serialize;

#[derive(Clone, Debug, Copy, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Pretty,
    Raw,
}

impl OutputFormat {
    pub fn default_for_stdout() -> Self {
        if std::io::stdout().is_terminal() {
            Self::Pretty
        } else {
            Self::Json
        }
    }
}

#[derive(Serialize)]
struct FrameOutput<'a> {
    index: usize,
    channel: String,
    channel_name: &'a str,
    severity: Option<Severity>,
    payload_size: usize,
    payload: String,
}

pub fn print_frame(index: usize, frame: &Frame, format: OutputFormat) {
    let severity = Severity::from_tag(frame.channel);
    match format {
        OutputFormat::Json => {
            let out = FrameOutput {
                index,
                channel: frame.channel.to_string(),
                channel_name: frame.channel.name(),
                severity,
                payload_size: frame.payload.len(),
                payload: payload_preview(frame),
            };
            print_json(&out);
        }
        OutputFormat::Table => {
            let mut table = table(vec!["#", "CHANNEL", "SEVERITY", "SIZE", "PAYLOAD"]);
            table.add_row(vec![
                index.to_string(),
                frame.channel.to_string(),
                severity_label(severity).to_string(),
                frame.payload.len().to_string(),
                payload_preview(frame),
            ]);
            println!("{table}");
        }
        OutputFormat::Pretty => {
            println!(
                "[{}] {} ({} bytes) {}",
                frame.channel,
                severity_label(severity),
                frame.payload.len(),
                payload_preview(frame)
            );
        }
        OutputFormat::Raw => {
            print_raw(frame.payload.as_ref());
        }
    }
}

#[derive(Serialize)]
struct NotificationOutput<'a> {
    severity: Severity,
    message: &'a str,
}

pub fn print_notification(message: &str, severity: Severity, format: OutputFormat) {
    match format {
        OutputFormat::Json => print_json(&NotificationOutput { severity, message }),
        OutputFormat::Table | OutputFormat::Pretty => {
            println!("{:<7} {message}", severity.as_str().to_uppercase())
        }
        OutputFormat::Raw => {
            print_raw(message.as_bytes());
            print_raw(b"\n");
        }
    }
}

#[derive(Serialize)]
struct RequestOutput<'a> {
    #[serde(flatten)]
    command: &'a Command,
    #[serde(flatten)]
    request: &'a Request,
    #[serde(skip_serializing_if = "Option::is_none")]
    confirmation: Option<&'a str>,
}

pub fn print_request(command: &Command, request: &Request, format: OutputFormat) {
    let args = serde_json::to_string(&request.args).unwrap_or_else(|_| "[]".to_string());
    match format {
        OutputFormat::Json => print_json(&RequestOutput {
            command,
            request,
            confirmation: command.confirmation(),
        }),
        OutputFormat::Table => {
            let mut table = table(vec!["COMMAND", "PATH", "ARGS", "FORMAT"]);
            table.add_row(vec![
                command.kind().to_string(),
                request.path.clone(),
                args,
                format_label(request).to_string(),
            ]);
            println!("{table}");
        }
        OutputFormat::Pretty => {
            println!("POST {} {} ({})", request.path, args, format_label(request));
            if let Some(prompt) = command.confirmation() {
                println!("confirm: {prompt}");
            }
        }
        OutputFormat::Raw => print_raw(request.path.as_bytes()),
    }
}

#[derive(Serialize)]
struct CommandOutput {
    name: &'static str,
    target: &'static str,
}

pub fn print_commands(format: OutputFormat) {
    let rows: Vec<CommandOutput> = CommandKind::ALL
        .into_iter()
        .map(|kind| CommandOutput {
            name: kind.name(),
            target: kind.target().as_str(),
        })
        .collect();
    match format {
        OutputFormat::Json => print_json(&rows),
        OutputFormat::Table => {
            let mut table = table(vec!["COMMAND", "TARGET"]);
            for row in &rows {
                table.add_row(vec![row.name, row.target]);
            }
            println!("{table}");
        }
        OutputFormat::Pretty | OutputFormat::Raw => {
            for row in &rows {
                println!("{:<20} {}", row.name, row.target);
            }
        }
    }
}

pub fn print_summary(summary: &RunSummary, format: OutputFormat) {
    match format {
        OutputFormat::Json => print_json(summary),
        OutputFormat::Table | OutputFormat::Pretty => println!(
            "frames={} delivered={} ignored={}",
            summary.frames, summary.delivered, summary.ignored
        ),
        OutputFormat::Raw => {}
    }
}

pub fn print_raw(data: &[u8]) {
    let mut out = std::io::stdout();
    let _ = out.write_all(data);
    let _ = out.flush();
}

fn print_json<T: Serialize + ?Sized>(value: &T) {
    println!(
        "{}",
        serde_json::to_string(value).unwrap_or_else(|_| "{}".to_string())
    );
}

fn table(header: Vec<&str>) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(header);
    table
}

fn severity_label(severity: Option<Severity>) -> &'static str {
    severity.map(Severity::as_str).unwrap_or("ignored")
}

fn format_label(request: &Request) -> &'static str {
    if request.is_streamed() {
        "stream"
    } else {
        "json"
    }
}

fn payload_preview(frame: &Frame) -> String {
    match frame.text() {
        Ok(text) => text.to_string(),
        Err(_) => format!("<binary {} bytes>", frame.payload.len()),
    }
}
