use anyhow::Result;
use clap::ValueEnum;
use colored::Colorize;
use comfy_table::{Attribute, Cell, Color as TableColor, Table};
use forumcat::CategoryRecord;
use serde_json::Value;

use crate::theme::{ICONS, THEME};

/// Output format options for CLI commands
#[derive(Clone, Debug, ValueEnum, Default, PartialEq)]
pub enum OutputFormat {
    /// Formatted table output (default)
    #[default]
    Table,
    /// JSON output for scripting
    Json,
}

/// Global CLI options that affect output and behavior
#[derive(Clone, Debug, Default)]
pub struct GlobalOptions {
    pub output_format: OutputFormat,
    pub quiet: bool,
    pub no_color: bool,
}

/// Output manager handles formatting and display
pub struct OutputManager {
    pub options: GlobalOptions,
}

/// Columns shown by `list` when no fields were requested.
const DEFAULT_LIST_COLUMNS: &[&str] = &["cid", "name", "parentCid", "order", "topic_count", "post_count"];

impl OutputManager {
    pub fn new(options: GlobalOptions) -> Self {
        Self { options }
    }

    /// Display one category as field/value rows.
    pub fn category(&self, cid: i64, category: Option<&CategoryRecord>) -> Result<()> {
        if self.options.quiet {
            return Ok(());
        }
        let Some(category) = category else {
            return self.missing(cid);
        };

        match self.options.output_format {
            OutputFormat::Json => println!("{}", serde_json::to_string_pretty(category)?),
            OutputFormat::Table => {
                let mut table = self.create_table();
                self.add_table_header(&mut table, vec!["field", "value"]);
                for (field, value) in category {
                    table.add_row(vec![Cell::new(field), Cell::new(display_value(value))]);
                }
                println!("{table}");
            }
        }
        Ok(())
    }

    /// Display many categories, one row each.
    pub fn categories(&self, categories: &[Option<CategoryRecord>], fields: &[String]) -> Result<()> {
        if self.options.quiet {
            return Ok(());
        }

        match self.options.output_format {
            OutputFormat::Json => println!("{}", serde_json::to_string_pretty(categories)?),
            OutputFormat::Table => {
                let columns: Vec<&str> = if fields.is_empty() {
                    DEFAULT_LIST_COLUMNS.to_vec()
                } else {
                    fields.iter().map(String::as_str).collect()
                };
                let mut table = self.create_table();
                self.add_table_header(&mut table, columns.clone());
                for category in categories.iter().flatten() {
                    table.add_row(
                        columns
                            .iter()
                            .map(|column| Cell::new(category.get(*column).map(display_value).unwrap_or_default())),
                    );
                }
                println!("{table}");
            }
        }
        Ok(())
    }

    /// Display a single field value.
    pub fn value(&self, cid: i64, field: &str, value: Option<&Value>) -> Result<()> {
        if self.options.quiet {
            return Ok(());
        }
        match (&self.options.output_format, value) {
            (OutputFormat::Json, value) => println!("{}", serde_json::to_string(&value)?),
            (OutputFormat::Table, Some(value)) => self.key_value(field, &display_value(value)),
            (OutputFormat::Table, None) => self.missing_field(cid, field),
        }
        Ok(())
    }

    fn missing(&self, cid: i64) -> Result<()> {
        match self.options.output_format {
            OutputFormat::Json => println!("null"),
            OutputFormat::Table => self.muted(&format!("{} category {cid} does not exist", ICONS.missing)),
        }
        Ok(())
    }

    fn missing_field(&self, cid: i64, field: &str) {
        self.muted(&format!("{} category {cid} has no {field}", ICONS.missing));
    }

    fn muted(&self, message: &str) {
        if self.options.no_color {
            println!("{message}");
        } else {
            println!("{}", message.color(THEME.muted));
        }
    }

    /// Display a success message with color and icon
    pub fn success(&self, message: &str) {
        if !self.options.quiet {
            let output = if self.options.no_color {
                format!("{} {message}", ICONS.success)
            } else {
                format!("{} {}", ICONS.success.color(THEME.success), message.color(THEME.success))
            };
            println!("{output}");
        }
    }

    /// Display an error message with color and icon
    pub fn error(&self, message: &str) {
        let output = if self.options.no_color {
            format!("{} {message}", ICONS.error)
        } else {
            format!("{} {}", ICONS.error.color(THEME.error), message.color(THEME.error))
        };
        eprintln!("{output}");
    }

    /// Display a key-value pair
    pub fn key_value(&self, key: &str, value: &str) {
        if !self.options.quiet {
            let output = if self.options.no_color {
                format!("{key}: {value}")
            } else {
                format!("{}: {}", key.color(THEME.key).bold(), value.color(THEME.value))
            };
            println!("{output}");
        }
    }

    /// Create a themed table
    pub fn create_table(&self) -> Table {
        let mut table = Table::new();

        if !self.options.no_color {
            table.load_preset(comfy_table::presets::UTF8_FULL_CONDENSED);
        } else {
            table.load_preset(comfy_table::presets::ASCII_FULL);
        }

        table
    }

    /// Add themed header to table
    pub fn add_table_header(&self, table: &mut Table, headers: Vec<&str>) {
        let header_cells: Vec<Cell> = if self.options.no_color {
            headers.iter().map(|h| Cell::new(h).add_attribute(Attribute::Bold)).collect()
        } else {
            headers
                .iter()
                .map(|h| Cell::new(h).add_attribute(Attribute::Bold).fg(TableColor::Cyan))
                .collect()
        };
        table.set_header(header_cells);
    }
}

fn display_value(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}
