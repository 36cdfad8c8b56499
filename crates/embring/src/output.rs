use std::io::{IsTerminal, Write};
use std::time::{SystemTime, UNIX_EPOCH};

use clap::ValueEnum;
use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use embring_frame::{split_fields, DataType, StandardCatalog};
use serde::Serialize;

use crate::hexfmt::to_hex;

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
            Self::Table
        } else {
            Self::Json
        }
    }
}

#[derive(Serialize)]
struct FieldOutput {
    tag: String,
    kind: &'static str,
    payload: String,
}

#[derive(Serialize)]
struct MessageOutput<'a> {
    index: usize,
    size: usize,
    bytes: String,
    fields: Vec<FieldOutput>,
    source: &'a str,
    timestamp: String,
}

pub fn print_message(message: &[u8], index: usize, source: &str, format: OutputFormat) {
    match format {
        OutputFormat::Json => {
            let out = MessageOutput {
                index,
                size: message.len(),
                bytes: to_hex(message),
                fields: describe_fields(message),
                source,
                timestamp: now_unix_seconds(),
            };
            println!(
                "{}",
                serde_json::to_string(&out).unwrap_or_else(|_| "{}".to_string())
            );
        }
        OutputFormat::Table => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["#", "TAG", "TYPE", "PAYLOAD"]);
            for field in describe_fields(message) {
                table.add_row(vec![index.to_string(), field.tag, field.kind.to_string(), field.payload]);
            }
            println!("{table}");
        }
        OutputFormat::Pretty => {
            let fields = describe_fields(message)
                .into_iter()
                .map(|f| {
                    if f.payload.is_empty() {
                        f.kind.to_string()
                    } else {
                        format!("{}[{}]", f.kind, f.payload)
                    }
                })
                .collect::<Vec<_>>()
                .join(" ");
            println!(
                "message={} size={} source={} fields={}",
                index,
                message.len(),
                source,
                fields
            );
        }
        OutputFormat::Raw => print_raw(message),
    }
}

pub fn print_raw(data: &[u8]) {
    let mut out = std::io::stdout();
    let _ = out.write_all(data);
    let _ = out.flush();
}

fn describe_fields(message: &[u8]) -> Vec<FieldOutput> {
    match split_fields(&StandardCatalog, message) {
        Ok(fields) => fields
            .into_iter()
            .map(|(tag, payload)| FieldOutput {
                tag: format!("0x{tag:02X}"),
                kind: DataType::from_tag(tag).map_or("unknown", DataType::name),
                payload: to_hex(payload),
            })
            .collect(),
        Err(_) => vec![FieldOutput {
            tag: "-".to_string(),
            kind: "unparsed",
            payload: to_hex(message),
        }],
    }
}

fn now_unix_seconds() -> String {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs().to_string())
        .unwrap_or_else(|_| "0".to_string())
}
